//! # Core Module
//!
//! This module provides the fundamental building blocks for the depletion
//! Monte Carlo engine: the particle representation and the pure geometric
//! sampling routines the move protocol is assembled from.
//!
//! ## Overview
//!
//! Everything in this layer is stateless with respect to the simulation: a
//! [`models::particle::Particle`] is a plain value the surrounding simulation
//! owns, a [`models::snapshot::PoseSnapshot`] is a stack-scoped capture used
//! for rollback, and a [`models::probe::DepletantProbe`] is an ephemeral
//! test particle that never joins any collection. The geometry utilities are
//! free functions over a caller-supplied random number generator, so the
//! engine's draw order stays fixed and reproducible.
//!
//! ## Key Components
//!
//! - **Particle Models** ([`models`]) - Rod-like particle state, pose
//!   snapshots, and depletant probes
//! - **Sampling Geometry** ([`utils`]) - Uniform disk/axis sampling and
//!   random rotations used by the perturbation and insertion steps

pub mod models;
pub mod utils;
