use serde::{Deserialize, Serialize};

/// Observations required before a trial is decided.
pub const DEFAULT_MIN_SAMPLES: u32 = 3;

const CONVERSION_WEIGHT: f64 = 0.4;
const ENGAGEMENT_WEIGHT: f64 = 0.25;
const NAVIGATION_WEIGHT: f64 = 0.2;
const BOUNCE_WEIGHT: f64 = 0.15;

/// One measurement epoch. Every field is expected in [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardInputs {
    pub conversion_rate: f64,
    /// Normalized engagement (minutes / 30, capped at 1).
    pub engagement_time: f64,
    pub navigation_efficiency: f64,
    /// 1 when the epoch saw no bounce.
    pub bounce_reduction: f64,
}

/// Weighted reward: `conv×0.4 + engagement×0.25 + nav×0.2 + bounce×0.15`.
///
/// No renormalization; inputs in [0, 1] give a reward in [0, 1].
pub fn compute_reward(inputs: &RewardInputs) -> f64 {
    inputs.conversion_rate * CONVERSION_WEIGHT
        + inputs.engagement_time * ENGAGEMENT_WEIGHT
        + inputs.navigation_efficiency * NAVIGATION_WEIGHT
        + inputs.bounce_reduction * BOUNCE_WEIGHT
}
