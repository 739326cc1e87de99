use crate::core::models::particle::Particle;

/// Pairwise interaction evaluator with an overlap side-channel.
///
/// A `pair_energy` call may raise the overlap flag instead of returning a
/// literal infinity when the pair is in a physically forbidden configuration.
/// The flag is sticky: it stays raised across subsequent calls until
/// [`clear_overlap`](PairEnergy::clear_overlap) is invoked, which is what lets
/// the move protocol short-circuit further pairwise evaluation mid-loop.
pub trait PairEnergy {
    fn pair_energy(&mut self, a: &Particle, b: &Particle) -> f64;
    fn has_overlap(&self) -> bool;
    fn clear_overlap(&mut self);
}

/// Neighbor query with incremental update and full-rebuild fallback.
///
/// `neighbors_of` returns indices into the particle slice, never the moved
/// particle's own index. After a pose change, `update_particle` refreshes the
/// moved particle's bucket; when `is_consistent` then reports `false` the
/// index can no longer guarantee correct queries and `rebuild` must be called.
pub trait NeighborIndex {
    fn neighbors_of(&self, index: usize, particles: &[Particle]) -> Vec<usize>;
    fn update_particle(&mut self, index: usize, particles: &[Particle]);
    fn is_consistent(&self) -> bool;
    fn rebuild(&mut self, particles: &[Particle]);
}

/// External field acting on single particles.
pub trait ExternalField {
    fn potential(&self, particle: &Particle, step: u64) -> f64;
}

/// The absent external field.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroField;

impl ExternalField for ZeroField {
    fn potential(&self, _particle: &Particle, _step: u64) -> f64 {
        0.0
    }
}

/// Per-call borrow bundle handed to [`super::depletion::DepletionMove::apply`].
///
/// The context is rebuilt for every elementary move; it owns nothing and only
/// groups the mutable borrows the transaction needs. The particle slice and
/// the collaborators must describe the same configuration when the call
/// starts, and are left mutually consistent when it returns.
pub struct ChainContext<'a, I, X, F>
where
    I: PairEnergy,
    X: NeighborIndex,
    F: ExternalField,
{
    pub particles: &'a mut [Particle],
    pub interaction: &'a mut I,
    pub index: &'a mut X,
    pub field: &'a F,
}
