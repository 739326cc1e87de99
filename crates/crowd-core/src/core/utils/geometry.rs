use nalgebra::{Rotation3, Unit, Vector3};
use rand::Rng;

/// Samples a point uniformly inside the open unit disk by rejection.
///
/// Draws `(dx, dy)` uniformly in `[-1, 1)²` and retries while the point falls
/// on or outside the unit circle. Consumes a variable but finite number of
/// draws; the acceptance probability per attempt is π/4.
pub fn sample_unit_disk(rng: &mut impl Rng) -> (f64, f64) {
    let mut dx: f64 = rng.gen_range(-1.0..1.0);
    let mut dy: f64 = rng.gen_range(-1.0..1.0);
    while dx * dx + dy * dy >= 1.0 {
        dx = rng.gen_range(-1.0..1.0);
        dy = rng.gen_range(-1.0..1.0);
    }
    (dx, dy)
}

/// Samples an axis uniformly on the unit sphere.
///
/// Uses the cylinder projection: `z` uniform in `[-1, 1)`, azimuth uniform in
/// `[0, 2π)`. Exactly two draws per call.
pub fn random_axis(rng: &mut impl Rng) -> Unit<Vector3<f64>> {
    let z: f64 = rng.gen_range(-1.0..1.0);
    let phi: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
    let r = (1.0 - z * z).sqrt();
    Unit::new_unchecked(Vector3::new(r * phi.cos(), r * phi.sin(), z))
}

/// Builds a rotation by `angle` radians about a uniformly random axis.
pub fn random_rotation(angle: f64, rng: &mut impl Rng) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&random_axis(rng), angle)
}
