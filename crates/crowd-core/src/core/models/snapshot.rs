use nalgebra::{Matrix3, Point3};

/// A bit-exact capture of a particle's pose.
///
/// Snapshots exist so a rejected move can restore the particle to exactly the
/// state it had before the perturbation: position, body frame, and the frame's
/// transpose are stored verbatim. Snapshots are stack-scoped value objects,
/// created and discarded within a single move transaction; they own nothing
/// beyond their own fields and are never visible to any collaborator.
///
/// Capture and restore live on [`super::particle::Particle`]
/// ([`snapshot`](super::particle::Particle::snapshot) /
/// [`restore`](super::particle::Particle::restore)).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSnapshot {
    pub(crate) position: Point3<f64>,
    pub(crate) orientation: Matrix3<f64>,
    pub(crate) orientation_t: Matrix3<f64>,
}

impl PoseSnapshot {
    /// The captured position.
    pub fn position(&self) -> &Point3<f64> {
        &self.position
    }

    /// The captured body frame.
    pub fn orientation(&self) -> &Matrix3<f64> {
        &self.orientation
    }
}
