use crate::event::{AnalyticsEvent, EventKind, EvolutionEvent};
use crate::sink::{AnalyticsSink, HttpAnalyticsSink};
use evolution_types::{BehaviorCluster, SessionId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reward samples returned by [`EvolutionAnalytics::reward_trend`] by default.
pub const DEFAULT_TREND_WINDOW: usize = 20;

/// Weight of the newest sample in the running reward average.
const REWARD_EMA_ALPHA: f64 = 0.3;

/// Running performance of one cluster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStats {
    pub cluster: BehaviorCluster,
    /// Sessions assigned to this cluster.
    pub sessions: u64,
    /// Exponential moving average of sampled rewards.
    pub avg_reward: f64,
}

impl ClusterStats {
    fn new(cluster: BehaviorCluster) -> Self {
        Self {
            cluster,
            sessions: 0,
            avg_reward: 0.0,
        }
    }
}

#[derive(Default)]
struct Inner {
    events: Vec<AnalyticsEvent>,
    stats: BTreeMap<BehaviorCluster, ClusterStats>,
}

impl Inner {
    fn stats_mut(&mut self, cluster: BehaviorCluster) -> &mut ClusterStats {
        self.stats
            .entry(cluster)
            .or_insert_with(|| ClusterStats::new(cluster))
    }
}

/// Append-only evolution event log with per-cluster aggregates.
///
/// Shared by `Arc`; reads and writes go through an internal lock.
#[derive(Default)]
pub struct EvolutionAnalytics {
    inner: RwLock<Inner>,
}

impl EvolutionAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, event: EvolutionEvent) {
        self.inner.write().events.push(AnalyticsEvent::now(event));
    }

    pub fn track_mutation_applied(&self, mutation_id: &str, action: &str) {
        self.record(EvolutionEvent::MutationApplied {
            mutation_id: mutation_id.to_string(),
            action: action.to_string(),
        });
    }

    pub fn track_mutation_reinforced(&self, mutation_id: &str, delta_reward: f64) {
        self.record(EvolutionEvent::MutationReinforced {
            mutation_id: mutation_id.to_string(),
            delta_reward,
        });
    }

    pub fn track_mutation_rolled_back(&self, mutation_id: &str, delta_reward: f64) {
        self.record(EvolutionEvent::MutationRolledBack {
            mutation_id: mutation_id.to_string(),
            delta_reward,
        });
    }

    /// Log a reward sample and fold it into the cluster's running average.
    pub fn track_reward_sample(
        &self,
        mutation_id: Option<&str>,
        reward: f64,
        cluster: BehaviorCluster,
    ) {
        let mut inner = self.inner.write();
        inner.events.push(AnalyticsEvent::now(EvolutionEvent::RewardSampled {
            mutation_id: mutation_id.map(str::to_string),
            reward,
            cluster,
        }));
        let stats = inner.stats_mut(cluster);
        stats.avg_reward = stats.avg_reward * (1.0 - REWARD_EMA_ALPHA) + reward * REWARD_EMA_ALPHA;
    }

    pub fn track_cluster_assigned(&self, session_id: &SessionId, cluster: BehaviorCluster) {
        let mut inner = self.inner.write();
        inner.events.push(AnalyticsEvent::now(EvolutionEvent::ClusterAssigned {
            session_id: session_id.clone(),
            cluster,
        }));
        inner.stats_mut(cluster).sessions += 1;
    }

    pub fn track_stability_update(&self, score: f64) {
        self.record(EvolutionEvent::StabilityUpdate { score });
    }

    pub fn track_ui_health_check(&self, healthy: bool, details: Option<&str>) {
        self.record(EvolutionEvent::UiHealthCheck {
            healthy,
            details: details.unwrap_or_default().to_string(),
        });
    }

    /// Every event, or only those of `kind`, in insertion order.
    pub fn events(&self, kind: Option<EventKind>) -> Vec<AnalyticsEvent> {
        let inner = self.inner.read();
        match kind {
            Some(kind) => inner
                .events
                .iter()
                .filter(|e| e.kind() == kind)
                .cloned()
                .collect(),
            None => inner.events.clone(),
        }
    }

    pub fn cluster_stats(&self) -> Vec<ClusterStats> {
        self.inner.read().stats.values().cloned().collect()
    }

    pub fn cluster_stats_for(&self, cluster: BehaviorCluster) -> Option<ClusterStats> {
        self.inner.read().stats.get(&cluster).cloned()
    }

    /// The most recent `window` reward samples, oldest first.
    pub fn reward_trend(&self, window: usize) -> Vec<f64> {
        let inner = self.inner.read();
        let rewards: Vec<f64> = inner
            .events
            .iter()
            .filter_map(|e| match e.event {
                EvolutionEvent::RewardSampled { reward, .. } => Some(reward),
                _ => None,
            })
            .collect();
        let skip = rewards.len().saturating_sub(window);
        rewards[skip..].to_vec()
    }

    /// Healthy checks over total checks; 1 when none were recorded.
    pub fn ui_health_score(&self) -> f64 {
        let inner = self.inner.read();
        let (healthy, total) = inner
            .events
            .iter()
            .filter_map(|e| match e.event {
                EvolutionEvent::UiHealthCheck { healthy, .. } => Some(healthy),
                _ => None,
            })
            .fold((0usize, 0usize), |(h, t), ok| (h + ok as usize, t + 1));
        if total == 0 {
            return 1.0;
        }
        healthy as f64 / total as f64
    }

    pub fn len(&self) -> usize {
        self.inner.read().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop the log and every cluster aggregate.
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.events.clear();
        inner.stats.clear();
    }

    /// Send the current log to `sink`. Never fails; the log is kept either way.
    pub async fn flush(&self, sink: &dyn AnalyticsSink) {
        let events = self.events(None);
        match sink.deliver(&events).await {
            Ok(()) => tracing::debug!(count = events.len(), "Flushed analytics"),
            Err(e) => tracing::warn!(error = %e, count = events.len(), "Analytics flush failed"),
        }
    }

    /// POST the log to `endpoint`, if one is configured.
    pub async fn flush_to(&self, endpoint: Option<&str>) {
        let Some(endpoint) = endpoint else {
            return;
        };
        match HttpAnalyticsSink::new(endpoint) {
            Ok(sink) => self.flush(&sink).await,
            Err(e) => tracing::warn!(error = %e, endpoint, "Analytics sink unavailable"),
        }
    }
}
