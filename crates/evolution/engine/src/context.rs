use evolution_aggregator::SessionStore;
use evolution_analytics::EvolutionAnalytics;
use evolution_classifier::{ClusterClassifier, NearestCentroidClassifier};
use evolution_mutation::MutationCatalogue;
use evolution_types::{Clock, SystemClock};
use std::sync::Arc;

/// Process-wide stores shared by every mounted engine.
#[derive(Clone)]
pub struct EngineContext {
    pub sessions: Arc<SessionStore>,
    pub analytics: Arc<EvolutionAnalytics>,
    pub catalogue: Arc<MutationCatalogue>,
    pub classifier: Arc<dyn ClusterClassifier>,
    pub clock: Arc<dyn Clock>,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Fresh stores that all read time from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Arc::new(SessionStore::with_clock(clock.clone())),
            analytics: Arc::new(EvolutionAnalytics::new()),
            catalogue: Arc::new(MutationCatalogue::standard()),
            classifier: Arc::new(NearestCentroidClassifier::new()),
            clock,
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn ClusterClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_catalogue(mut self, catalogue: MutationCatalogue) -> Self {
        self.catalogue = Arc::new(catalogue);
        self
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}
