use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("could not parse `{key}` (found \"{found}\", provide {key}=<float>,<float>,<float>)")]
    MalformedTriple { key: &'static str, found: String },

    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("the depletion move must be restricted to a non-negative species (got {0})")]
    InvalidSpecies(i32),

    #[error("temperature must be positive (got {0})")]
    InvalidTemperature(f64),
}

/// Which step size shrinks when a swim move is rejected.
///
/// The historical control flow shrinks the rotation delta; `Swim` couples the
/// rejection to the swim delta instead. The choice changes observable
/// acceptance statistics, so it is a setting rather than a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwimShrinkTarget {
    #[default]
    Rotation,
    Swim,
}

/// Raw key-value settings for the depletion move, as supplied by an external
/// configuration loader.
///
/// `deltas` and `deltas_max` each hold three comma-separated numbers
/// (translation, rotation, swim). Every other field is optional and falls
/// back to a documented default or to a value derived at finalization.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoveSettings {
    /// Current step sizes as `"<trs>,<rot>,<swm>"`.
    pub deltas: String,
    /// Upper step-size clamps as `"<trs>,<rot>,<swm>"`.
    pub deltas_max: String,
    /// Depletant hard-sphere radius parameter (default 0.5).
    pub sigma_depletant: Option<f64>,
    /// Depletant reservoir chemical potential (default 1.0).
    pub mu_gas: Option<f64>,
    /// Sampling volume for trial insertions; derived from the particle
    /// geometry when unset.
    pub trial_volume: Option<f64>,
    /// Insertion trials per free-volume estimate; derived from `mu_gas` and
    /// the temperature when unset, kept within `[1, 50]` either way.
    pub n_tries: Option<u32>,
    /// Length of the rod's long axis (default 10.0).
    pub particle_length: Option<f64>,
    /// Species this move acts on. Required, and must be non-negative.
    pub restrict_to_type: Option<i32>,
    /// Whether step sizes adapt during equilibration (default false).
    pub adjust_moves: Option<bool>,
    /// Step count after which adaptation stops (default 0).
    pub equilibration_steps: Option<u64>,
    /// Multiplicative step-size growth on acceptance (default 1.03).
    pub acc_factor: Option<f64>,
    /// Multiplicative step-size shrink on rejection (default 1.03).
    pub rej_factor: Option<f64>,
    /// Whether the pre-move pairwise energy is evaluated (default true);
    /// hard-core-only systems can skip it.
    pub compute_energy_before: Option<bool>,
    /// Shrink target for rejected swim moves (default `rotation`).
    pub swim_shrink: Option<SwimShrinkTarget>,
}

/// Parsed but not yet finalized move configuration.
///
/// Produced by [`MoveConfiguration::parse`]; derived quantities stay unset
/// until [`MoveConfiguration::finalize`] resolves them against the simulation
/// temperature and validates the whole set into [`MoveParameters`].
#[derive(Debug, Clone, PartialEq)]
pub struct MoveConfiguration {
    pub delta_translation: f64,
    pub delta_rotation: f64,
    pub delta_swim: f64,
    pub delta_translation_max: f64,
    pub delta_rotation_max: f64,
    pub delta_swim_max: f64,
    pub sigma_depletant: f64,
    pub mu_gas: f64,
    pub particle_length: f64,
    pub trial_volume: Option<f64>,
    pub n_tries: Option<u32>,
    pub restrict_to_type: Option<i32>,
    pub acc_factor: f64,
    pub rej_factor: f64,
    pub equilibration_steps: u64,
    pub adjust_moves: bool,
    pub compute_energy_before: bool,
    pub swim_shrink: SwimShrinkTarget,
}

/// The finalized, immutable parameter set of a depletion move.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveParameters {
    pub delta_translation: f64,
    pub delta_rotation: f64,
    pub delta_swim: f64,
    pub delta_translation_max: f64,
    pub delta_rotation_max: f64,
    pub delta_swim_max: f64,
    pub sigma_depletant: f64,
    pub mu_gas: f64,
    pub particle_length: f64,
    pub trial_volume: f64,
    pub n_tries: u32,
    pub restrict_to_type: i32,
    pub temperature: f64,
    pub acc_factor: f64,
    pub rej_factor: f64,
    pub equilibration_steps: u64,
    pub adjust_moves: bool,
    pub compute_energy_before: bool,
    pub swim_shrink: SwimShrinkTarget,
}

const N_TRIES_MIN: u32 = 1;
const N_TRIES_MAX: u32 = 50;

impl MoveConfiguration {
    /// Parses raw settings, validating the two step-size triples.
    pub fn parse(settings: &MoveSettings) -> Result<Self, ConfigError> {
        let (delta_translation, delta_rotation, delta_swim) =
            parse_triple("deltas", &settings.deltas)?;
        let (delta_translation_max, delta_rotation_max, delta_swim_max) =
            parse_triple("deltas_max", &settings.deltas_max)?;

        Ok(Self {
            delta_translation,
            delta_rotation,
            delta_swim,
            delta_translation_max,
            delta_rotation_max,
            delta_swim_max,
            sigma_depletant: settings.sigma_depletant.unwrap_or(0.5),
            mu_gas: settings.mu_gas.unwrap_or(1.0),
            particle_length: settings.particle_length.unwrap_or(10.0),
            trial_volume: settings.trial_volume,
            n_tries: settings.n_tries,
            restrict_to_type: settings.restrict_to_type,
            acc_factor: settings.acc_factor.unwrap_or(1.03),
            rej_factor: settings.rej_factor.unwrap_or(1.03),
            equilibration_steps: settings.equilibration_steps.unwrap_or(0),
            adjust_moves: settings.adjust_moves.unwrap_or(false),
            compute_energy_before: settings.compute_energy_before.unwrap_or(true),
            swim_shrink: settings.swim_shrink.unwrap_or_default(),
        })
    }

    /// Resolves derived quantities against the simulation temperature and
    /// validates the configuration into an immutable [`MoveParameters`].
    ///
    /// When `trial_volume` was not supplied it becomes the volume of the
    /// sampling cylinder, `π (0.5+σ)² (L+2σ)`. When `n_tries` was not
    /// supplied it becomes `round(exp(mu_gas / T) · trial_volume)`. Any
    /// trial count outside `[1, 50]` is logged and set to 50.
    pub fn finalize(self, temperature: f64) -> Result<MoveParameters, ConfigError> {
        let restrict_to_type = self
            .restrict_to_type
            .ok_or(ConfigError::MissingParameter("restrict_to_type"))?;
        if restrict_to_type < 0 {
            return Err(ConfigError::InvalidSpecies(restrict_to_type));
        }
        if temperature <= 0.0 {
            return Err(ConfigError::InvalidTemperature(temperature));
        }

        let radius = 0.5 + self.sigma_depletant;
        let trial_volume = self.trial_volume.unwrap_or_else(|| {
            std::f64::consts::PI
                * radius
                * radius
                * (self.particle_length + 2.0 * self.sigma_depletant)
        });

        let n_tries = match self.n_tries {
            Some(n) => clamp_n_tries(f64::from(n)),
            None => clamp_n_tries(((self.mu_gas / temperature).exp() * trial_volume).round()),
        };

        Ok(MoveParameters {
            delta_translation: self.delta_translation,
            delta_rotation: self.delta_rotation,
            delta_swim: self.delta_swim,
            delta_translation_max: self.delta_translation_max,
            delta_rotation_max: self.delta_rotation_max,
            delta_swim_max: self.delta_swim_max,
            sigma_depletant: self.sigma_depletant,
            mu_gas: self.mu_gas,
            particle_length: self.particle_length,
            trial_volume,
            n_tries,
            restrict_to_type,
            temperature,
            acc_factor: self.acc_factor,
            rej_factor: self.rej_factor,
            equilibration_steps: self.equilibration_steps,
            adjust_moves: self.adjust_moves,
            compute_energy_before: self.compute_energy_before,
            swim_shrink: self.swim_shrink,
        })
    }
}

fn clamp_n_tries(candidate: f64) -> u32 {
    if !(f64::from(N_TRIES_MIN)..=f64::from(N_TRIES_MAX)).contains(&candidate) {
        warn!(
            "trial count {} outside [{}, {}]; setting it to {}",
            candidate, N_TRIES_MIN, N_TRIES_MAX, N_TRIES_MAX
        );
        return N_TRIES_MAX;
    }
    candidate as u32
}

fn parse_triple(key: &'static str, raw: &str) -> Result<(f64, f64, f64), ConfigError> {
    let malformed = || ConfigError::MalformedTriple {
        key,
        found: raw.to_string(),
    };

    let fields: Vec<&str> = raw.split(',').map(str::trim).collect();
    if fields.len() != 3 {
        return Err(malformed());
    }

    let mut values = [0.0f64; 3];
    for (value, field) in values.iter_mut().zip(&fields) {
        *value = field.parse().map_err(|_| malformed())?;
    }
    Ok((values[0], values[1], values[2]))
}
