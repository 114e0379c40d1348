use crate::config::ControllerConfig;
use crate::state::{AttemptOutcome, ControllerState, FeedOutcome, RefusalReason};
use evolution_mutation::{MutationCatalogue, StyleApplier};
use evolution_reinforcement::{compute_reward, MutationStatus, ReinforcementLedger, RewardInputs};
use evolution_types::{BehaviorCluster, Clock, SystemClock};
use std::sync::Arc;

/// Per-session mutation orchestrator.
///
/// Owns the session's trial ledger. Callers that share a controller across
/// tasks wrap it in a lock; every method is synchronous.
pub struct EvolutionController {
    config: ControllerConfig,
    state: ControllerState,
    ledger: ReinforcementLedger,
    catalogue: Arc<MutationCatalogue>,
    applier: StyleApplier,
    clock: Arc<dyn Clock>,
}

impl EvolutionController {
    pub fn new(
        config: ControllerConfig,
        catalogue: Arc<MutationCatalogue>,
        applier: StyleApplier,
    ) -> Self {
        Self::with_clock(config, catalogue, applier, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: ControllerConfig,
        catalogue: Arc<MutationCatalogue>,
        applier: StyleApplier,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            state: ControllerState::new(),
            ledger: ReinforcementLedger::with_clock(clock.clone()),
            catalogue,
            applier,
            clock,
        }
    }

    /// Try to apply the next mutation for `cluster`, measured against
    /// `current_reward`.
    pub fn attempt_mutation(
        &mut self,
        cluster: BehaviorCluster,
        current_reward: f64,
    ) -> AttemptOutcome {
        let now = self.clock.now_ms();

        if let Some(reason) = self.refusal(now) {
            tracing::debug!(cluster = %cluster, reason = %reason, "Mutation attempt refused");
            return AttemptOutcome::Refused(reason);
        }

        let Some(mutation) = self
            .catalogue
            .select_mutation(cluster, &self.state.tried_mutation_ids)
            .cloned()
        else {
            tracing::debug!(cluster = %cluster, "No safe untried mutation left");
            return AttemptOutcome::Refused(RefusalReason::CatalogueExhausted);
        };

        self.applier.apply(&mutation);
        self.ledger
            .register_mutation(mutation.id.clone(), mutation.label.clone(), current_reward);

        self.state.tried_mutation_ids.insert(mutation.id.clone());
        self.state.last_mutation_at_ms = Some(now);
        self.state.total_mutations += 1;
        self.state.baseline_reward = current_reward;
        self.state.active_mutation = Some(mutation.clone());

        tracing::info!(
            cluster = %cluster,
            mutation_id = %mutation.id,
            baseline = current_reward,
            total = self.state.total_mutations,
            "Applied mutation"
        );
        AttemptOutcome::Applied(mutation)
    }

    /// Score an epoch against the active trial; roll back when the trial
    /// is decided against.
    pub fn feed_reward(&mut self, inputs: &RewardInputs) -> FeedOutcome {
        let Some(active_id) = self.state.active_mutation_id().map(str::to_string) else {
            return FeedOutcome::NoActiveMutation;
        };

        let reward = compute_reward(inputs);
        let Some(observation) = self.ledger.observe_reward(
            &active_id,
            reward,
            self.config.min_samples_before_decision,
        ) else {
            return FeedOutcome::NoActiveMutation;
        };

        if observation.record.status == MutationStatus::RolledBack {
            if let Some(mutation) = self.state.active_mutation.take() {
                self.applier.revert(&mutation);
                tracing::info!(mutation_id = %mutation.id, reward, "Rolled back mutation");
            }
        }

        self.state.stability_score = self.ledger.stability_score();

        FeedOutcome::Observed {
            mutation_id: active_id,
            reward,
            status: observation.record.status,
            newly_decided: observation.newly_decided,
        }
    }

    /// Revert every patch still applied, drop the ledger and start over.
    pub fn reset(&mut self) {
        self.state.active_mutation = None;
        for record in self.ledger.records().iter().rev() {
            if record.status == MutationStatus::RolledBack {
                continue;
            }
            if let Some(mutation) = self.catalogue.get(&record.mutation_id) {
                self.applier.revert(mutation);
            }
        }
        self.ledger.clear();
        self.state = ControllerState::new();
        tracing::debug!("Controller reset");
    }

    /// Replace limits and reset.
    pub fn reconfigure(&mut self, config: ControllerConfig) {
        self.config = config;
        self.reset();
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn ledger(&self) -> &ReinforcementLedger {
        &self.ledger
    }

    fn refusal(&self, now: u64) -> Option<RefusalReason> {
        if self.state.total_mutations >= self.config.max_mutations_per_session {
            return Some(RefusalReason::SessionCapReached);
        }

        if let Some(last) = self.state.last_mutation_at_ms {
            let elapsed = now.saturating_sub(last);
            if elapsed < self.config.mutation_cooldown_ms {
                return Some(RefusalReason::CoolingDown {
                    remaining_ms: self.config.mutation_cooldown_ms - elapsed,
                });
            }
        }

        if self.state.stability_score < self.config.stability_floor {
            return Some(RefusalReason::BelowStabilityFloor {
                stability: self.state.stability_score,
            });
        }

        if let Some(id) = self.state.active_mutation_id() {
            if self
                .ledger
                .record(id)
                .is_some_and(|r| r.status == MutationStatus::Pending)
            {
                return Some(RefusalReason::TrialPending {
                    mutation_id: id.to_string(),
                });
            }
        }

        None
    }
}
