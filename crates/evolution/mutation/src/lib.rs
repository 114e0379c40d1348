#![deny(unsafe_code)]
//! # evolution-mutation
//!
//! Bounded layout mutations for the evolution engine.
//!
//! - [`MutationCatalogue`]: the fixed set of candidate adjustments and the
//!   per-cluster preference order used to pick the next one
//! - [`mutation_guardrail`]: pure safety validator (contrast, layout shift,
//!   overlap, numeric bounds, density token)
//! - [`StyleApplier`]: applies and reverts style-variable patches through a
//!   [`StyleScheduler`] so writes never run on the interactive path

pub mod catalogue;
pub mod error;
pub mod guardrail;
pub mod style;

pub use catalogue::{LayoutMutation, MutationCatalogue};
pub use error::MutationError;
pub use guardrail::{
    contrast_ratio, mutation_guardrail, GuardrailResult, GuardrailViolation, MutationPayload,
    WCAG_AA_NORMAL,
};
pub use style::{
    HeadlessStyleScheduler, IdleStyleScheduler, ImmediateStyleScheduler, InMemoryStyleTarget,
    StyleApplier, StylePatch, StyleScheduler, StyleTarget, StyleVar,
};
