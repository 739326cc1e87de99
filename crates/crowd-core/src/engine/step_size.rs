use super::config::{MoveParameters, SwimShrinkTarget};

/// The three elementary perturbation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Translation,
    Rotation,
    Swim,
}

/// Adaptive step-size bookkeeping shared by the move family.
///
/// Holds the current and maximum step sizes for the three perturbation kinds
/// together with the attempted/accepted counters. Step sizes grow
/// multiplicatively on acceptance (clamped at their maxima) and shrink on
/// rejection, but only while the equilibration window is open and adaptation
/// is enabled. The counters are diagnostics only; nothing branches on them.
#[derive(Debug, Clone)]
pub struct StepSizeController {
    delta_translation: f64,
    delta_rotation: f64,
    delta_swim: f64,
    delta_translation_max: f64,
    delta_rotation_max: f64,
    delta_swim_max: f64,
    acc_factor: f64,
    rej_factor: f64,
    equilibration_steps: u64,
    adjust_moves: bool,
    swim_shrink: SwimShrinkTarget,
    attempted: u64,
    accepted: u64,
}

impl StepSizeController {
    pub fn new(params: &MoveParameters) -> Self {
        Self {
            delta_translation: params.delta_translation,
            delta_rotation: params.delta_rotation,
            delta_swim: params.delta_swim,
            delta_translation_max: params.delta_translation_max,
            delta_rotation_max: params.delta_rotation_max,
            delta_swim_max: params.delta_swim_max,
            acc_factor: params.acc_factor,
            rej_factor: params.rej_factor,
            equilibration_steps: params.equilibration_steps,
            adjust_moves: params.adjust_moves,
            swim_shrink: params.swim_shrink,
            attempted: 0,
            accepted: 0,
        }
    }

    /// Maps a uniform draw from `0..=20` to a move kind (10:10:1 weighting;
    /// the rare swim models an axial displacement along the rod's own axis).
    pub fn choose_kind(&self, roll: u32) -> MoveKind {
        match roll {
            0..=9 => MoveKind::Translation,
            10..=19 => MoveKind::Rotation,
            _ => MoveKind::Swim,
        }
    }

    /// The current step size for a kind.
    pub fn delta(&self, kind: MoveKind) -> f64 {
        match kind {
            MoveKind::Translation => self.delta_translation,
            MoveKind::Rotation => self.delta_rotation,
            MoveKind::Swim => self.delta_swim,
        }
    }

    pub fn attempted(&self) -> u64 {
        self.attempted
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn acceptance_ratio(&self) -> f64 {
        if self.attempted == 0 {
            return 0.0;
        }
        self.accepted as f64 / self.attempted as f64
    }

    pub fn record_attempt(&mut self) {
        self.attempted += 1;
    }

    /// Registers an accepted move of the given kind, growing its step size
    /// while the equilibration window is open.
    pub fn record_accept(&mut self, kind: MoveKind, current_step: u64) {
        self.accepted += 1;
        if !self.window_open(current_step) {
            return;
        }
        match kind {
            MoveKind::Translation => {
                self.delta_translation =
                    (self.delta_translation * self.acc_factor).min(self.delta_translation_max);
            }
            MoveKind::Rotation => {
                self.delta_rotation =
                    (self.delta_rotation * self.acc_factor).min(self.delta_rotation_max);
            }
            MoveKind::Swim => {
                self.delta_swim = (self.delta_swim * self.acc_factor).min(self.delta_swim_max);
            }
        }
    }

    /// Registers a rejected move of the given kind, shrinking a step size
    /// while the equilibration window is open. For a rejected swim the shrunk
    /// delta is selected by the configured [`SwimShrinkTarget`].
    pub fn record_reject(&mut self, kind: MoveKind, current_step: u64) {
        if !self.window_open(current_step) {
            return;
        }
        match kind {
            MoveKind::Translation => self.delta_translation /= self.rej_factor,
            MoveKind::Rotation => self.delta_rotation /= self.rej_factor,
            MoveKind::Swim => match self.swim_shrink {
                SwimShrinkTarget::Rotation => self.delta_rotation /= self.rej_factor,
                SwimShrinkTarget::Swim => self.delta_swim /= self.rej_factor,
            },
        }
    }

    fn window_open(&self, current_step: u64) -> bool {
        self.adjust_moves && current_step < self.equilibration_steps
    }
}
