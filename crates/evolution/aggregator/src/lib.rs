#![deny(unsafe_code)]
//! # evolution-aggregator
//!
//! The sensory layer of the evolution engine. Ingests raw interaction events
//! per anonymous session and keeps a rolling [`SessionMetrics`] snapshot that
//! the classifier and reward function consume.
//!
//! Also hosts the [`NavigationOptimizer`], which re-weights a navigation tree
//! from recorded hop events.

pub mod event;
pub mod metrics;
pub mod navigation;
pub mod store;

pub use event::BehaviorEvent;
pub use metrics::{SessionMetrics, FEATURE_FREQ_CEILING, SESSION_MINUTES_CEILING};
pub use navigation::{NavEvent, NavNode, NavigationOptimizer};
pub use store::SessionStore;
