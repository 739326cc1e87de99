//! # Core Models Module
//!
//! Data structures describing the particles the move engine operates on.
//!
//! ## Overview
//!
//! The models here deliberately carry no behaviour beyond invariant
//! maintenance: a particle's orientation matrix and its transpose are mutated
//! together through dedicated methods, and every orientation change refreshes
//! the lab-frame interaction-site offsets derived from it. Rollback and
//! virtual insertion are modelled as separate value types so that neither can
//! accidentally become part of the persistent particle population.
//!
//! ## Key Components
//!
//! - [`particle`] - A rod-like colloidal particle: identity, species tag,
//!   position, orthonormal body frame, and derived interaction sites
//! - [`snapshot`] - Bit-exact pose capture and restore for move rollback
//! - [`probe`] - The ephemeral depletant test particle used by free-volume
//!   sampling

pub mod particle;
pub mod probe;
pub mod snapshot;
