#![deny(unsafe_code)]
//! # evolution-types
//!
//! Shared vocabulary for the Evolution Intelligence Engine.
//!
//! Every other evolution crate speaks in these types:
//! - [`SessionId`]: anonymous, ephemeral tracking token
//! - [`BehaviorCluster`]: the six fixed behavioral archetypes
//! - [`FeatureVector`]: the 7-dimension normalized behavioral summary
//! - [`PersonalizationProfile`]: per-cluster presentation hints
//! - [`Clock`]: injectable millisecond clock

pub mod clock;
pub mod cluster;
pub mod feature;
pub mod profile;
pub mod session;

pub use clock::{Clock, ManualClock, SystemClock};
pub use cluster::BehaviorCluster;
pub use feature::{FeatureVector, FEATURE_DIMENSIONS};
pub use profile::{CtaStrength, DensityToken, LineHeight, NavigationFocus, PersonalizationProfile};
pub use session::SessionId;
