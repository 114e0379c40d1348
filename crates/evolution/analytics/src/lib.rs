#![deny(unsafe_code)]
//! # evolution-analytics
//!
//! In-memory record of what the evolution engine did and how it went:
//! applied, reinforced and rolled-back mutations, reward samples, cluster
//! assignments, stability updates and UI health checks.
//!
//! Export is best-effort. [`EvolutionAnalytics::flush`] never fails; delivery
//! problems are logged and dropped.

pub mod error;
pub mod event;
pub mod recorder;
pub mod sink;

pub use error::AnalyticsError;
pub use event::{AnalyticsEvent, EventKind, EvolutionEvent};
pub use recorder::{ClusterStats, EvolutionAnalytics, DEFAULT_TREND_WINDOW};
pub use sink::{AnalyticsSink, HttpAnalyticsSink};
