use crate::ClusterClassifier;
use evolution_types::{BehaviorCluster, FeatureVector};

/// Reference centroid for each cluster, derived from domain knowledge.
///
/// Dimensions: `[ctr, scroll, minutes, bounce, conversion, feature_freq, nav_efficiency]`.
pub fn default_centroid(cluster: BehaviorCluster) -> FeatureVector {
    let values = match cluster {
        BehaviorCluster::Explorer => [0.6, 0.8, 0.7, 0.1, 0.2, 0.7, 0.5],
        BehaviorCluster::DecisiveBuyer => [0.8, 0.5, 0.3, 0.1, 0.9, 0.4, 0.9],
        BehaviorCluster::SlowReader => [0.3, 0.9, 0.9, 0.2, 0.2, 0.2, 0.4],
        BehaviorCluster::MobileHeavy => [0.5, 0.6, 0.4, 0.3, 0.4, 0.5, 0.5],
        BehaviorCluster::PowerUser => [0.7, 0.7, 0.8, 0.1, 0.6, 0.9, 0.9],
        BehaviorCluster::PassiveScroller => [0.2, 0.4, 0.2, 0.7, 0.1, 0.1, 0.2],
    };
    FeatureVector::new(values)
}

/// Minimum-Euclidean-distance classifier over fixed centroids.
///
/// Stateless apart from its centroid table; ties resolve to the cluster that
/// comes first in [`BehaviorCluster::ALL`].
#[derive(Clone, Debug)]
pub struct NearestCentroidClassifier {
    centroids: [(BehaviorCluster, FeatureVector); 6],
}

impl NearestCentroidClassifier {
    pub fn new() -> Self {
        Self {
            centroids: BehaviorCluster::ALL.map(|c| (c, default_centroid(c))),
        }
    }

    /// Replace one cluster's centroid.
    pub fn with_centroid(mut self, cluster: BehaviorCluster, centroid: FeatureVector) -> Self {
        for (c, v) in self.centroids.iter_mut() {
            if *c == cluster {
                *v = centroid;
            }
        }
        self
    }

    pub fn centroid(&self, cluster: BehaviorCluster) -> FeatureVector {
        self.centroids
            .iter()
            .find(|(c, _)| *c == cluster)
            .map(|(_, v)| *v)
            .unwrap_or_else(|| default_centroid(cluster))
    }
}

impl Default for NearestCentroidClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusterClassifier for NearestCentroidClassifier {
    fn classify(&self, vector: &FeatureVector) -> BehaviorCluster {
        let mut best = BehaviorCluster::default();
        let mut best_distance = f64::INFINITY;
        for (cluster, centroid) in &self.centroids {
            let d = vector.distance(centroid);
            if d < best_distance {
                best_distance = d;
                best = *cluster;
            }
        }
        best
    }
}
