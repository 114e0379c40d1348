#![deny(unsafe_code)]
//! # evolution-classifier
//!
//! Maps a normalized [`FeatureVector`] onto one of the six fixed behavioral
//! clusters. The default strategy is an untrained nearest-centroid lookup;
//! callers depend on the [`ClusterClassifier`] trait so a trained model can
//! replace it without touching the evaluation loop.

pub mod centroid;
pub mod profiles;

pub use centroid::{default_centroid, NearestCentroidClassifier};
pub use profiles::personalization_profile;

use evolution_aggregator::SessionMetrics;
use evolution_types::{BehaviorCluster, FeatureVector};

/// Pure classification strategy.
pub trait ClusterClassifier: Send + Sync {
    fn classify(&self, vector: &FeatureVector) -> BehaviorCluster;
}

/// Classify a session snapshot via its derived feature vector.
pub fn classify_metrics(
    classifier: &dyn ClusterClassifier,
    metrics: &SessionMetrics,
) -> BehaviorCluster {
    classifier.classify(&metrics.feature_vector())
}
