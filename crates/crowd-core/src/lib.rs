//! # crowdmc Core Library
//!
//! A Monte Carlo move engine for rod-like colloidal particles suspended in an
//! implicit depletant bath: a single elementary move is proposed, the change in
//! free energy (direct, external, and depletion-mediated) is evaluated, and the
//! move is accepted or rejected under the Metropolis criterion.
//!
//! ## Architectural Philosophy
//!
//! The library is split into two layers with a strict dependency direction,
//! keeping the stochastic protocol testable in isolation from any concrete
//! simulation backend.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Particle`,
//!   `PoseSnapshot`, `DepletantProbe`) and pure geometric sampling routines.
//!
//! - **[`engine`]: The Logic Core.** The stateful move machinery: validated
//!   configuration (`MoveParameters`), adaptive step-size control, the
//!   Widom-style free-volume estimator, and the `DepletionMove` transaction
//!   itself. The engine talks to the surrounding simulation exclusively
//!   through three narrow collaborator traits (`PairEnergy`, `NeighborIndex`,
//!   `ExternalField`), so any pair potential, cell/Verlet list, or external
//!   field implementation can be plugged in.
//!
//! The outer simulation loop, the scheduling of competing move types, and the
//! spatial index itself are deliberately not part of this crate: one call to
//! [`engine::depletion::DepletionMove::apply`] is one complete, reversible
//! transaction over exactly one particle.

pub mod core;
pub mod engine;
