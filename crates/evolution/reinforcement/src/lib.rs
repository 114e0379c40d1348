#![deny(unsafe_code)]
//! # evolution-reinforcement
//!
//! Scores measurement epochs and decides, once per trial, whether a layout
//! mutation is kept or rolled back.
//!
//! A trial moves `Pending -> Reinforced` or `Pending -> RolledBack` and never
//! goes back.

pub mod ledger;
pub mod reward;

pub use ledger::{MutationRecord, MutationStatus, Observation, ReinforcementLedger};
pub use reward::{compute_reward, RewardInputs, DEFAULT_MIN_SAMPLES};
