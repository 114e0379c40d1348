use chrono::{DateTime, Utc};
use evolution_types::{BehaviorCluster, SessionId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Event discriminant, for filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    MutationApplied,
    MutationReinforced,
    MutationRolledBack,
    RewardSampled,
    ClusterAssigned,
    StabilityUpdate,
    UiHealthCheck,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::MutationApplied => "mutation_applied",
            EventKind::MutationReinforced => "mutation_reinforced",
            EventKind::MutationRolledBack => "mutation_rolled_back",
            EventKind::RewardSampled => "reward_sampled",
            EventKind::ClusterAssigned => "cluster_assigned",
            EventKind::StabilityUpdate => "stability_update",
            EventKind::UiHealthCheck => "ui_health_check",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened. Serialized as `{"kind": ..., "payload": {...}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum EvolutionEvent {
    #[serde(rename_all = "camelCase")]
    MutationApplied { mutation_id: String, action: String },
    #[serde(rename_all = "camelCase")]
    MutationReinforced { mutation_id: String, delta_reward: f64 },
    #[serde(rename_all = "camelCase")]
    MutationRolledBack { mutation_id: String, delta_reward: f64 },
    #[serde(rename_all = "camelCase")]
    RewardSampled {
        mutation_id: Option<String>,
        reward: f64,
        cluster: BehaviorCluster,
    },
    #[serde(rename_all = "camelCase")]
    ClusterAssigned {
        session_id: SessionId,
        cluster: BehaviorCluster,
    },
    StabilityUpdate { score: f64 },
    UiHealthCheck { healthy: bool, details: String },
}

impl EvolutionEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            EvolutionEvent::MutationApplied { .. } => EventKind::MutationApplied,
            EvolutionEvent::MutationReinforced { .. } => EventKind::MutationReinforced,
            EvolutionEvent::MutationRolledBack { .. } => EventKind::MutationRolledBack,
            EvolutionEvent::RewardSampled { .. } => EventKind::RewardSampled,
            EvolutionEvent::ClusterAssigned { .. } => EventKind::ClusterAssigned,
            EvolutionEvent::StabilityUpdate { .. } => EventKind::StabilityUpdate,
            EvolutionEvent::UiHealthCheck { .. } => EventKind::UiHealthCheck,
        }
    }
}

/// A timestamped log entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    #[serde(flatten)]
    pub event: EvolutionEvent,
    pub timestamp: DateTime<Utc>,
}

impl AnalyticsEvent {
    pub fn now(event: EvolutionEvent) -> Self {
        Self {
            event,
            timestamp: Utc::now(),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.event.kind()
    }
}
