//! Controller limits

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Mutations applied per session before the controller stops
    #[serde(default = "default_max_mutations")]
    pub max_mutations_per_session: u32,

    /// Minimum milliseconds between applied mutations
    #[serde(default = "default_cooldown_ms")]
    pub mutation_cooldown_ms: u64,

    /// Stability score below which nothing new is tried
    #[serde(default = "default_stability_floor")]
    pub stability_floor: f64,

    /// Reward samples before a trial is decided
    #[serde(default = "default_min_samples")]
    pub min_samples_before_decision: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_mutations_per_session: default_max_mutations(),
            mutation_cooldown_ms: default_cooldown_ms(),
            stability_floor: default_stability_floor(),
            min_samples_before_decision: default_min_samples(),
        }
    }
}

impl ControllerConfig {
    pub fn with_max_mutations(mut self, max: u32) -> Self {
        self.max_mutations_per_session = max;
        self
    }

    pub fn with_cooldown_ms(mut self, cooldown_ms: u64) -> Self {
        self.mutation_cooldown_ms = cooldown_ms;
        self
    }

    pub fn with_stability_floor(mut self, floor: f64) -> Self {
        self.stability_floor = floor;
        self
    }

    pub fn with_min_samples(mut self, samples: u32) -> Self {
        self.min_samples_before_decision = samples;
        self
    }
}

fn default_max_mutations() -> u32 {
    3
}

fn default_cooldown_ms() -> u64 {
    60_000
}

fn default_stability_floor() -> f64 {
    0.4
}

fn default_min_samples() -> u32 {
    evolution_reinforcement::DEFAULT_MIN_SAMPLES
}
