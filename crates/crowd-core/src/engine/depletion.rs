use super::config::MoveParameters;
use super::context::{ChainContext, ExternalField, NeighborIndex, PairEnergy};
use super::error::EngineError;
use super::free_volume::FreeVolumeEstimator;
use super::step_size::{MoveKind, StepSizeController};
use crate::core::models::particle::Particle;
use crate::core::utils::geometry::random_rotation;
use rand::Rng;
use tracing::{info, trace};

/// Terminal state of one elementary move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Accepted,
    Rejected,
}

impl MoveOutcome {
    pub fn is_accepted(self) -> bool {
        self == MoveOutcome::Accepted
    }
}

/// The depletion-biased Monte Carlo move.
///
/// Each call to [`apply`](DepletionMove::apply) is one complete transaction
/// over exactly one particle of the restricted species: perturb, relist,
/// evaluate the direct and external energy change, add the depletant
/// contribution `-mu_gas · Δ(free volume)` obtained by virtual insertions,
/// and accept or reject under the Metropolis criterion. A rejected move
/// restores the particle and the neighbor index to their pre-move state
/// before returning; collaborators never observe an intermediate state
/// between calls.
///
/// The move owns its adaptive step sizes and its attempted/accepted counters;
/// no other writer exists, so a single chain needs no synchronisation.
pub struct DepletionMove {
    params: MoveParameters,
    controller: StepSizeController,
    estimator: FreeVolumeEstimator,
}

impl DepletionMove {
    pub fn new(params: MoveParameters) -> Self {
        info!(
            "depletion move initialised with delta_trs={} (max {}), delta_rot={} (max {}), delta_swm={} (max {})",
            params.delta_translation,
            params.delta_translation_max,
            params.delta_rotation,
            params.delta_rotation_max,
            params.delta_swim,
            params.delta_swim_max,
        );
        info!(
            "tries={}, sigma_dep={}, mu_gas={}, tryvolume={}, restrict_to_type={}",
            params.n_tries,
            params.sigma_depletant,
            params.mu_gas,
            params.trial_volume,
            params.restrict_to_type,
        );

        let controller = StepSizeController::new(&params);
        let estimator = FreeVolumeEstimator::new(&params);
        Self {
            params,
            controller,
            estimator,
        }
    }

    /// The finalized parameter set this move was built from.
    pub fn parameters(&self) -> &MoveParameters {
        &self.params
    }

    /// Current step sizes and acceptance counters.
    pub fn step_sizes(&self) -> &StepSizeController {
        &self.controller
    }

    pub fn log_parameters(&self) {
        info!(
            "\tdelta_trs = {}, delta_rot = {}, delta_swm = {}, acceptance = {:.4}",
            self.controller.delta(MoveKind::Translation),
            self.controller.delta(MoveKind::Rotation),
            self.controller.delta(MoveKind::Swim),
            self.controller.acceptance_ratio(),
        );
    }

    /// Runs one elementary move transaction.
    ///
    /// The caller must guarantee at least one particle of the restricted
    /// species exists; selection resamples indices until one is drawn.
    /// Random draws are consumed in a fixed order per call, so a seeded
    /// generator reproduces the chain exactly.
    pub fn apply<I, X, F, R>(
        &mut self,
        ctx: ChainContext<'_, I, X, F>,
        rng: &mut R,
        current_step: u64,
    ) -> Result<MoveOutcome, EngineError>
    where
        I: PairEnergy,
        X: NeighborIndex,
        F: ExternalField,
        R: Rng,
    {
        let ChainContext {
            particles,
            interaction,
            index,
            field,
        } = ctx;

        self.controller.record_attempt();
        if particles.is_empty() {
            return Err(EngineError::EmptyPopulation);
        }

        let mut pi = rng.gen_range(0..particles.len());
        while particles[pi].species != self.params.restrict_to_type {
            pi = rng.gen_range(0..particles.len());
        }

        let neighbors_old = index.neighbors_of(pi, particles);

        let mut delta_energy = 0.0;
        if self.params.compute_energy_before {
            delta_energy -= particle_energy(&particles[pi], &neighbors_old, particles, interaction);
        }
        let potential_before = field.potential(&particles[pi], current_step);
        particles[pi].external_potential = potential_before;
        let mut delta_external = -potential_before;

        let snapshot = particles[pi].snapshot();

        let kind = self.controller.choose_kind(rng.gen_range(0..21));
        match kind {
            MoveKind::Translation => {
                let delta = self.controller.delta(MoveKind::Translation);
                let particle = &mut particles[pi];
                particle.position.x += 2.0 * delta * (rng.gen_range(0.0..1.0) - 0.5);
                particle.position.y += 2.0 * delta * (rng.gen_range(0.0..1.0) - 0.5);
                particle.position.z += 2.0 * delta * (rng.gen_range(0.0..1.0) - 0.5);
            }
            MoveKind::Rotation => {
                let angle = self.controller.delta(MoveKind::Rotation) * rng.gen_range(0.0..1.0);
                let rotation = random_rotation(angle, rng);
                particles[pi].rotate(&rotation);
            }
            MoveKind::Swim => {
                let delta = self.controller.delta(MoveKind::Swim);
                let shift = 2.0 * delta * (rng.gen_range(0.0..1.0) - 0.5);
                let axis = particles[pi].axis3();
                particles[pi].position += axis * shift;
            }
        }

        index.update_particle(pi, particles);
        if !index.is_consistent() {
            index.rebuild(particles);
        }

        let neighbors_new = index.neighbors_of(pi, particles);

        delta_energy += particle_energy(&particles[pi], &neighbors_new, particles, interaction);
        let potential_after = field.potential(&particles[pi], current_step);
        particles[pi].external_potential = potential_after;
        delta_external += potential_after;

        // The depletant contribution is irrelevant once the direct
        // interaction already forbids the move.
        if !interaction.has_overlap() {
            let mut counterpart = particles[pi].clone();
            counterpart.restore(&snapshot);

            // Sampling around the post-move pose against the pre-move
            // configuration measures the old free volume, and vice versa;
            // outside the two sampling regions the accessible volume is
            // unchanged and cancels in the difference.
            let free_volume_old = self.estimator.estimate(
                &particles[pi],
                &counterpart,
                &neighbors_new,
                particles,
                interaction,
                rng,
            )?;
            let free_volume_new = self.estimator.estimate(
                &counterpart,
                &particles[pi],
                &neighbors_old,
                particles,
                interaction,
                rng,
            )?;
            delta_energy -= self.params.mu_gas * (free_volume_new - free_volume_old);
        }

        let delta_total = delta_energy + delta_external;
        let accepted = !interaction.has_overlap()
            && (delta_total < 0.0
                || (-delta_total / self.params.temperature).exp() > rng.gen_range(0.0..1.0));

        if accepted {
            trace!(
                "step {}: {:?} move on particle {} accepted (ΔE = {:.4})",
                current_step, kind, pi, delta_total
            );
            self.controller.record_accept(kind, current_step);
            Ok(MoveOutcome::Accepted)
        } else {
            particles[pi].restore(&snapshot);
            let restored_potential = field.potential(&particles[pi], current_step);
            particles[pi].external_potential = restored_potential;

            index.update_particle(pi, particles);
            interaction.clear_overlap();
            if !index.is_consistent() {
                index.rebuild(particles);
            }

            trace!(
                "step {}: {:?} move on particle {} rejected (ΔE = {:.4})",
                current_step, kind, pi, delta_total
            );
            self.controller.record_reject(kind, current_step);
            Ok(MoveOutcome::Rejected)
        }
    }
}

fn particle_energy<I: PairEnergy>(
    particle: &Particle,
    neighbors: &[usize],
    particles: &[Particle],
    interaction: &mut I,
) -> f64 {
    let mut energy = 0.0;
    for &ni in neighbors {
        energy += interaction.pair_energy(particle, &particles[ni]);
        if interaction.has_overlap() {
            break;
        }
    }
    energy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::{MoveConfiguration, MoveSettings};
    use crate::engine::context::ZeroField;
    use nalgebra::Point3;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct IdealGas {
        overlap: bool,
    }

    impl IdealGas {
        fn new() -> Self {
            Self { overlap: false }
        }
    }

    impl PairEnergy for IdealGas {
        fn pair_energy(&mut self, _a: &Particle, _b: &Particle) -> f64 {
            0.0
        }
        fn has_overlap(&self) -> bool {
            self.overlap
        }
        fn clear_overlap(&mut self) {
            self.overlap = false;
        }
    }

    struct HardWall {
        overlap: bool,
    }

    impl HardWall {
        fn new() -> Self {
            Self { overlap: false }
        }
    }

    impl PairEnergy for HardWall {
        fn pair_energy(&mut self, _a: &Particle, _b: &Particle) -> f64 {
            self.overlap = true;
            0.0
        }
        fn has_overlap(&self) -> bool {
            self.overlap
        }
        fn clear_overlap(&mut self) {
            self.overlap = false;
        }
    }

    struct DecayingInteraction {
        calls: u32,
        overlap: bool,
    }

    impl PairEnergy for DecayingInteraction {
        fn pair_energy(&mut self, _a: &Particle, _b: &Particle) -> f64 {
            self.calls += 1;
            if self.calls == 1 { 10.0 } else { 0.0 }
        }
        fn has_overlap(&self) -> bool {
            self.overlap
        }
        fn clear_overlap(&mut self) {
            self.overlap = false;
        }
    }

    struct AllPairs {
        cutoff: f64,
        consistent: bool,
        updates: usize,
        rebuilds: usize,
    }

    impl AllPairs {
        fn new(cutoff: f64) -> Self {
            Self {
                cutoff,
                consistent: true,
                updates: 0,
                rebuilds: 0,
            }
        }
    }

    impl NeighborIndex for AllPairs {
        fn neighbors_of(&self, index: usize, particles: &[Particle]) -> Vec<usize> {
            particles
                .iter()
                .enumerate()
                .filter(|(j, q)| {
                    *j != index && (q.position - particles[index].position).norm() < self.cutoff
                })
                .map(|(j, _)| j)
                .collect()
        }
        fn update_particle(&mut self, _index: usize, _particles: &[Particle]) {
            self.updates += 1;
        }
        fn is_consistent(&self) -> bool {
            self.consistent
        }
        fn rebuild(&mut self, _particles: &[Particle]) {
            self.rebuilds += 1;
        }
    }

    struct LinearField {
        slope: f64,
    }

    impl ExternalField for LinearField {
        fn potential(&self, particle: &Particle, _step: u64) -> f64 {
            self.slope * particle.position.z
        }
    }

    fn make_move(restrict_to_type: i32) -> DepletionMove {
        let settings = MoveSettings {
            deltas: "0.1,0.1,0.1".to_string(),
            deltas_max: "1.0,1.0,1.0".to_string(),
            sigma_depletant: None,
            mu_gas: None,
            trial_volume: None,
            n_tries: Some(5),
            particle_length: None,
            restrict_to_type: Some(restrict_to_type),
            adjust_moves: None,
            equilibration_steps: None,
            acc_factor: None,
            rej_factor: None,
            compute_energy_before: None,
            swim_shrink: None,
        };
        let params = MoveConfiguration::parse(&settings)
            .unwrap()
            .finalize(1.0)
            .unwrap();
        DepletionMove::new(params)
    }

    fn rod(index: usize, species: i32, x: f64) -> Particle {
        Particle::new(index, species, Point3::new(x, 0.0, 0.0))
    }

    #[test]
    fn rejected_move_restores_the_configuration_bit_for_bit() {
        let mut depletion = make_move(0);
        let mut particles = vec![rod(0, 0, 0.0), rod(1, 0, 1.0)];
        let mut interaction = HardWall::new();
        let mut index = AllPairs::new(5.0);
        let mut rng = StdRng::seed_from_u64(7);

        let reference = particles.clone();
        for step in 0..20 {
            let outcome = depletion
                .apply(
                    ChainContext {
                        particles: &mut particles,
                        interaction: &mut interaction,
                        index: &mut index,
                        field: &ZeroField,
                    },
                    &mut rng,
                    step,
                )
                .unwrap();

            assert_eq!(outcome, MoveOutcome::Rejected);
            assert_eq!(particles, reference);
            assert!(!interaction.has_overlap());
        }
    }

    #[test]
    fn zero_energy_moves_are_always_accepted() {
        let mut depletion = make_move(0);
        let mut particles = vec![rod(0, 0, 0.0)];
        let mut interaction = IdealGas::new();
        let mut index = AllPairs::new(5.0);
        let mut rng = StdRng::seed_from_u64(8);

        let reference = particles.clone();
        let outcome = depletion
            .apply(
                ChainContext {
                    particles: &mut particles,
                    interaction: &mut interaction,
                    index: &mut index,
                    field: &ZeroField,
                },
                &mut rng,
                0,
            )
            .unwrap();

        assert_eq!(outcome, MoveOutcome::Accepted);
        assert_ne!(particles, reference);
    }

    #[test]
    fn a_negative_energy_delta_is_always_accepted() {
        for seed in 0..20 {
            let mut depletion = make_move(0);
            let mut particles = vec![rod(0, 0, 0.0), rod(1, 0, 1.0)];
            let mut interaction = DecayingInteraction {
                calls: 0,
                overlap: false,
            };
            let mut index = AllPairs::new(5.0);
            let mut rng = StdRng::seed_from_u64(seed);

            let outcome = depletion
                .apply(
                    ChainContext {
                        particles: &mut particles,
                        interaction: &mut interaction,
                        index: &mut index,
                        field: &ZeroField,
                    },
                    &mut rng,
                    0,
                )
                .unwrap();

            assert_eq!(outcome, MoveOutcome::Accepted);
        }
    }

    #[test]
    fn population_size_is_invariant_across_moves() {
        let mut depletion = make_move(0);
        let mut particles = vec![rod(0, 0, 0.0), rod(1, 0, 3.0), rod(2, 0, 6.0)];
        let mut interaction = IdealGas::new();
        let mut index = AllPairs::new(1.5);
        let mut rng = StdRng::seed_from_u64(9);

        for step in 0..50 {
            depletion
                .apply(
                    ChainContext {
                        particles: &mut particles,
                        interaction: &mut interaction,
                        index: &mut index,
                        field: &ZeroField,
                    },
                    &mut rng,
                    step,
                )
                .unwrap();
            assert_eq!(particles.len(), 3);
        }
        assert_eq!(depletion.step_sizes().attempted(), 50);
    }

    #[test]
    fn only_the_restricted_species_is_ever_moved() {
        let mut depletion = make_move(7);
        let mut particles = vec![rod(0, 0, 0.0), rod(1, 7, 10.0), rod(2, 7, 20.0)];
        let mut interaction = IdealGas::new();
        let mut index = AllPairs::new(1.0);
        let mut rng = StdRng::seed_from_u64(10);

        let bystander = particles[0].clone();
        for step in 0..30 {
            depletion
                .apply(
                    ChainContext {
                        particles: &mut particles,
                        interaction: &mut interaction,
                        index: &mut index,
                        field: &ZeroField,
                    },
                    &mut rng,
                    step,
                )
                .unwrap();
        }

        assert_eq!(particles[0], bystander);
        assert!(particles[1] != rod(1, 7, 10.0) || particles[2] != rod(2, 7, 20.0));
    }

    #[test]
    fn chains_with_the_same_seed_are_identical() {
        let run = |seed: u64| {
            let mut depletion = make_move(0);
            let mut particles = vec![rod(0, 0, 0.0), rod(1, 0, 2.0)];
            let mut interaction = IdealGas::new();
            let mut index = AllPairs::new(5.0);
            let mut rng = StdRng::seed_from_u64(seed);

            let mut outcomes = Vec::new();
            for step in 0..25 {
                outcomes.push(
                    depletion
                        .apply(
                            ChainContext {
                                particles: &mut particles,
                                interaction: &mut interaction,
                                index: &mut index,
                                field: &ZeroField,
                            },
                            &mut rng,
                            step,
                        )
                        .unwrap(),
                );
            }
            (outcomes, particles)
        };

        let (outcomes_a, particles_a) = run(123);
        let (outcomes_b, particles_b) = run(123);

        assert_eq!(outcomes_a, outcomes_b);
        assert_eq!(particles_a, particles_b);
    }

    #[test]
    fn a_wrong_species_neighbor_aborts_the_move() {
        let mut depletion = make_move(0);
        let mut particles = vec![rod(0, 0, 0.0), rod(1, 2, 1.0)];
        let mut interaction = IdealGas::new();
        let mut index = AllPairs::new(5.0);
        let mut rng = StdRng::seed_from_u64(11);

        let result = depletion.apply(
            ChainContext {
                particles: &mut particles,
                interaction: &mut interaction,
                index: &mut index,
                field: &ZeroField,
            },
            &mut rng,
            0,
        );

        assert!(matches!(
            result,
            Err(EngineError::ConsistencyViolation {
                index: 1,
                expected: 0,
                found: 2,
            })
        ));
    }

    #[test]
    fn an_inconsistent_index_triggers_a_full_rebuild() {
        let mut depletion = make_move(0);
        let mut particles = vec![rod(0, 0, 0.0)];
        let mut interaction = IdealGas::new();
        let mut index = AllPairs::new(5.0);
        index.consistent = false;
        let mut rng = StdRng::seed_from_u64(12);

        depletion
            .apply(
                ChainContext {
                    particles: &mut particles,
                    interaction: &mut interaction,
                    index: &mut index,
                    field: &ZeroField,
                },
                &mut rng,
                0,
            )
            .unwrap();

        assert!(index.updates >= 1);
        assert!(index.rebuilds >= 1);
    }

    #[test]
    fn the_external_potential_tracks_the_final_pose() {
        let mut depletion = make_move(0);
        let mut particles = vec![rod(0, 0, 0.0)];
        let mut interaction = IdealGas::new();
        let mut index = AllPairs::new(5.0);
        let field = LinearField { slope: 2.0 };
        let mut rng = StdRng::seed_from_u64(13);

        for step in 0..10 {
            depletion
                .apply(
                    ChainContext {
                        particles: &mut particles,
                        interaction: &mut interaction,
                        index: &mut index,
                        field: &field,
                    },
                    &mut rng,
                    step,
                )
                .unwrap();

            assert_eq!(
                particles[0].external_potential,
                2.0 * particles[0].position.z
            );
        }
    }

    #[test]
    fn an_empty_population_is_reported_not_sampled() {
        let mut depletion = make_move(0);
        let mut particles: Vec<Particle> = Vec::new();
        let mut interaction = IdealGas::new();
        let mut index = AllPairs::new(5.0);
        let mut rng = StdRng::seed_from_u64(14);

        let result = depletion.apply(
            ChainContext {
                particles: &mut particles,
                interaction: &mut interaction,
                index: &mut index,
                field: &ZeroField,
            },
            &mut rng,
            0,
        );

        assert!(matches!(result, Err(EngineError::EmptyPopulation)));
    }
}
