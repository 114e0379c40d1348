use serde::{Deserialize, Serialize};

/// Raw interaction event emitted by UI instrumentation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BehaviorEvent {
    Click,
    /// Scroll depth reached, 0-1.
    Scroll { value: f64 },
    SessionEnd,
    /// Conversion completion, 0-1. `None` means a full conversion.
    Conversion {
        #[serde(default)]
        value: Option<f64>,
    },
    FeatureUse,
    /// Per-hop efficiency signal: 1 for an efficient path, 0 for a detour.
    Navigation { value: f64 },
    /// The user abandoned the page at `target`.
    DropOff { target: String },
}

impl BehaviorEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            BehaviorEvent::Click => "click",
            BehaviorEvent::Scroll { .. } => "scroll",
            BehaviorEvent::SessionEnd => "session_end",
            BehaviorEvent::Conversion { .. } => "conversion",
            BehaviorEvent::FeatureUse => "feature_use",
            BehaviorEvent::Navigation { .. } => "navigation",
            BehaviorEvent::DropOff { .. } => "drop_off",
        }
    }

    /// Whether the event counts as interaction. Ending the session and
    /// dropping off are passive.
    pub fn clears_bounce(&self) -> bool {
        !matches!(self, BehaviorEvent::SessionEnd | BehaviorEvent::DropOff { .. })
    }
}
