#![deny(unsafe_code)]
//! # evolution-controller
//!
//! Decides when a mutation may be applied and retires the ones that hurt.
//!
//! Guards, checked in order on every attempt:
//! 1. session cap
//! 2. cooldown since the last applied mutation
//! 3. stability floor
//! 4. an undecided trial still running
//! 5. catalogue exhaustion for the cluster
//!
//! Refusals are ordinary outcomes, not errors.

pub mod config;
pub mod controller;
pub mod state;

pub use config::ControllerConfig;
pub use controller::EvolutionController;
pub use state::{AttemptOutcome, ControllerState, FeedOutcome, RefusalReason};
