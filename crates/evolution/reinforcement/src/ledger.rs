use evolution_types::{Clock, SystemClock};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Trial lifecycle stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationStatus {
    Pending,
    Reinforced,
    RolledBack,
}

impl MutationStatus {
    pub fn is_decided(&self) -> bool {
        !matches!(self, MutationStatus::Pending)
    }
}

impl fmt::Display for MutationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MutationStatus::Pending => "pending",
            MutationStatus::Reinforced => "reinforced",
            MutationStatus::RolledBack => "rolledBack",
        };
        f.write_str(s)
    }
}

/// Outcome record for one mutation trial.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationRecord {
    pub mutation_id: String,
    pub action: String,
    pub applied_at_ms: u64,
    pub baseline_reward: f64,
    pub current_reward: f64,
    pub sample_count: u32,
    pub status: MutationStatus,
}

/// Result of feeding one reward sample to a trial.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub record: MutationRecord,
    /// `true` only for the sample that moved the trial out of `Pending`.
    pub newly_decided: bool,
}

/// Per-session ledger of mutation trials, in registration order.
pub struct ReinforcementLedger {
    records: Vec<MutationRecord>,
    clock: Arc<dyn Clock>,
}

impl ReinforcementLedger {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Vec::new(),
            clock,
        }
    }

    /// Open a pending trial measured against `baseline_reward`. Registering an
    /// id that already exists starts its trial over.
    pub fn register_mutation(
        &mut self,
        mutation_id: impl Into<String>,
        action: impl Into<String>,
        baseline_reward: f64,
    ) {
        let record = MutationRecord {
            mutation_id: mutation_id.into(),
            action: action.into(),
            applied_at_ms: self.clock.now_ms(),
            baseline_reward,
            current_reward: baseline_reward,
            sample_count: 0,
            status: MutationStatus::Pending,
        };
        tracing::debug!(
            mutation_id = %record.mutation_id,
            baseline = baseline_reward,
            "Registered mutation trial"
        );
        match self
            .records
            .iter_mut()
            .find(|r| r.mutation_id == record.mutation_id)
        {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    /// Feed a reward sample.
    ///
    /// Rolled-back trials ignore the sample. Otherwise the current reward and
    /// sample count are updated; a pending trial is decided on reaching
    /// `min_samples` (reinforced when the reward did not regress below the
    /// baseline). Reinforced trials keep tracking without being re-decided.
    pub fn observe_reward(
        &mut self,
        mutation_id: &str,
        reward: f64,
        min_samples: u32,
    ) -> Option<Observation> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.mutation_id == mutation_id)?;

        if record.status == MutationStatus::RolledBack {
            return Some(Observation {
                record: record.clone(),
                newly_decided: false,
            });
        }

        record.current_reward = reward;
        record.sample_count += 1;

        let mut newly_decided = false;
        if record.status == MutationStatus::Pending && record.sample_count >= min_samples {
            let delta = reward - record.baseline_reward;
            record.status = if delta >= 0.0 {
                MutationStatus::Reinforced
            } else {
                MutationStatus::RolledBack
            };
            newly_decided = true;
            tracing::info!(
                mutation_id = %record.mutation_id,
                status = %record.status,
                delta,
                samples = record.sample_count,
                "Mutation trial decided"
            );
        }

        Some(Observation {
            record: record.clone(),
            newly_decided,
        })
    }

    pub fn record(&self, mutation_id: &str) -> Option<&MutationRecord> {
        self.records.iter().find(|r| r.mutation_id == mutation_id)
    }

    pub fn records(&self) -> &[MutationRecord] {
        &self.records
    }

    pub fn reinforced(&self) -> Vec<&MutationRecord> {
        self.with_status(MutationStatus::Reinforced)
    }

    pub fn pending(&self) -> Vec<&MutationRecord> {
        self.with_status(MutationStatus::Pending)
    }

    /// Reinforced / decided, or 1 when nothing has been decided yet.
    pub fn stability_score(&self) -> f64 {
        let decided = self.records.iter().filter(|r| r.status.is_decided()).count();
        if decided == 0 {
            return 1.0;
        }
        self.reinforced().len() as f64 / decided as f64
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    fn with_status(&self, status: MutationStatus) -> Vec<&MutationRecord> {
        self.records.iter().filter(|r| r.status == status).collect()
    }
}

impl Default for ReinforcementLedger {
    fn default() -> Self {
        Self::new()
    }
}
