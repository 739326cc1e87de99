use super::particle::Particle;
use nalgebra::Point3;

/// An ephemeral depletant test particle.
///
/// The probe stands in for one depletant molecule during free-volume
/// sampling: it is placed at successive trial positions and its pairwise
/// interaction with real particles is queried, but it never becomes part of
/// the particle population or the neighbor index. The wrapped particle is
/// detached (see [`super::particle::DETACHED`]) and carries a species tag
/// distinct from the colloid species it is sampled around.
#[derive(Debug, Clone)]
pub struct DepletantProbe {
    particle: Particle,
}

impl DepletantProbe {
    /// Creates a probe with the given species tag.
    pub fn new(species: i32) -> Self {
        Self {
            particle: Particle::detached(species),
        }
    }

    /// Moves the probe to a trial insertion position.
    pub fn place(&mut self, position: Point3<f64>) {
        self.particle.position = position;
    }

    /// The probe viewed as a particle, for pairwise energy queries.
    pub fn particle(&self) -> &Particle {
        &self.particle
    }
}
