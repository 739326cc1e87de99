use super::config::MoveParameters;
use super::context::PairEnergy;
use super::error::EngineError;
use crate::core::models::particle::Particle;
use crate::core::models::probe::DepletantProbe;
use crate::core::utils::geometry::sample_unit_disk;
use rand::Rng;

/// Widom-style free-volume estimator.
///
/// Runs a fixed number of virtual depletant insertions inside the sampling
/// cylinder of a rod and reports the non-overlapping fraction scaled to the
/// trial volume. The estimate is stochastic; its precision grows with the
/// trial count and no bias correction is applied.
#[derive(Debug, Clone)]
pub(crate) struct FreeVolumeEstimator {
    sigma_depletant: f64,
    trial_volume: f64,
    n_tries: u32,
    particle_length: f64,
    species: i32,
}

impl FreeVolumeEstimator {
    pub fn new(params: &MoveParameters) -> Self {
        Self {
            sigma_depletant: params.sigma_depletant,
            trial_volume: params.trial_volume,
            n_tries: params.n_tries,
            particle_length: params.particle_length,
            species: params.restrict_to_type,
        }
    }

    /// Estimates the volume accessible to a depletant sphere around `around`.
    ///
    /// Probe positions are sampled uniformly within the cylinder of radius
    /// `0.5 + σ` and length `L + 2σ` aligned with `around`'s frame. Each probe
    /// is tested against `counterpart` (the same particle frozen at its other
    /// pose) and against every `neighbors` entry, short-circuiting as soon as
    /// the evaluator flags an overlap; the flag is cleared after every trial.
    /// The result lies in `[0, trial_volume]`.
    ///
    /// A neighbor whose species differs from the restricted species means the
    /// neighbor index and the configuration have diverged; that is fatal.
    pub fn estimate<I, R>(
        &self,
        around: &Particle,
        counterpart: &Particle,
        neighbors: &[usize],
        particles: &[Particle],
        interaction: &mut I,
        rng: &mut R,
    ) -> Result<f64, EngineError>
    where
        I: PairEnergy,
        R: Rng,
    {
        // Probe species stays distinct from the colloid species.
        let mut probe = DepletantProbe::new(self.species + 1);
        let radial = 0.5 + self.sigma_depletant;
        let axial = self.particle_length + 2.0 * self.sigma_depletant;

        let mut free = 0u32;
        for _ in 0..self.n_tries {
            let (dx, dy) = sample_unit_disk(rng);
            let u: f64 = rng.gen_range(0.0..1.0);
            probe.place(
                around.position
                    + around.axis1() * radial * dx
                    + around.axis2() * radial * dy
                    + around.axis3() * axial * (u - 0.5),
            );

            let _ = interaction.pair_energy(counterpart, probe.particle());
            for &ni in neighbors {
                let neighbor = &particles[ni];
                let _ = interaction.pair_energy(neighbor, probe.particle());
                if neighbor.species != self.species {
                    return Err(EngineError::ConsistencyViolation {
                        index: ni,
                        expected: self.species,
                        found: neighbor.species,
                    });
                }
                if interaction.has_overlap() {
                    break;
                }
            }

            if !interaction.has_overlap() {
                free += 1;
            }
            interaction.clear_overlap();
        }

        Ok(self.trial_volume * f64::from(free) / f64::from(self.n_tries))
    }
}
