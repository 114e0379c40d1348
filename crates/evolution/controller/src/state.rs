use evolution_mutation::LayoutMutation;
use evolution_reinforcement::MutationStatus;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Controller state for one session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ControllerState {
    pub active_mutation: Option<LayoutMutation>,
    /// Every id ever applied this session. Never shrinks until reset.
    pub tried_mutation_ids: HashSet<String>,
    /// `None` until the first mutation is applied.
    pub last_mutation_at_ms: Option<u64>,
    pub total_mutations: u32,
    pub stability_score: f64,
    pub baseline_reward: f64,
}

impl ControllerState {
    pub fn new() -> Self {
        Self {
            active_mutation: None,
            tried_mutation_ids: HashSet::new(),
            last_mutation_at_ms: None,
            total_mutations: 0,
            stability_score: 1.0,
            baseline_reward: 0.0,
        }
    }

    pub fn active_mutation_id(&self) -> Option<&str> {
        self.active_mutation.as_ref().map(|m| m.id.as_str())
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Why an attempt did not apply anything.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefusalReason {
    SessionCapReached,
    CoolingDown { remaining_ms: u64 },
    BelowStabilityFloor { stability: f64 },
    TrialPending { mutation_id: String },
    CatalogueExhausted,
}

impl fmt::Display for RefusalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefusalReason::SessionCapReached => write!(f, "session cap reached"),
            RefusalReason::CoolingDown { remaining_ms } => {
                write!(f, "cooling down ({}ms left)", remaining_ms)
            }
            RefusalReason::BelowStabilityFloor { stability } => {
                write!(f, "stability {:.2} below floor", stability)
            }
            RefusalReason::TrialPending { mutation_id } => {
                write!(f, "trial pending for {}", mutation_id)
            }
            RefusalReason::CatalogueExhausted => write!(f, "no safe untried mutation"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AttemptOutcome {
    Applied(LayoutMutation),
    Refused(RefusalReason),
}

impl AttemptOutcome {
    pub fn applied(&self) -> Option<&LayoutMutation> {
        match self {
            AttemptOutcome::Applied(m) => Some(m),
            AttemptOutcome::Refused(_) => None,
        }
    }

    pub fn is_applied(&self) -> bool {
        self.applied().is_some()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FeedOutcome {
    /// Nothing active; the sample was dropped.
    NoActiveMutation,
    Observed {
        mutation_id: String,
        reward: f64,
        status: MutationStatus,
        /// This sample decided the trial.
        newly_decided: bool,
    },
}

impl FeedOutcome {
    pub fn reward(&self) -> Option<f64> {
        match self {
            FeedOutcome::NoActiveMutation => None,
            FeedOutcome::Observed { reward, .. } => Some(*reward),
        }
    }

    /// The decision this sample made, if any.
    pub fn decision(&self) -> Option<(&str, MutationStatus)> {
        match self {
            FeedOutcome::Observed {
                mutation_id,
                status,
                newly_decided: true,
                ..
            } => Some((mutation_id.as_str(), *status)),
            _ => None,
        }
    }
}
