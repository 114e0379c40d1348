use crate::config::EngineConfig;
use crate::context::EngineContext;
use crate::emitter::EventEmitter;
use evolution_aggregator::{NavEvent, NavNode, NavigationOptimizer, SESSION_MINUTES_CEILING};
use evolution_classifier::{classify_metrics, personalization_profile};
use evolution_controller::{AttemptOutcome, ControllerConfig, EvolutionController, FeedOutcome};
use evolution_mutation::{LayoutMutation, StyleApplier, StyleScheduler};
use evolution_reinforcement::{compute_reward, MutationStatus, RewardInputs};
use evolution_types::{BehaviorCluster, PersonalizationProfile, SessionId};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::watch;

/// What consumers observe after each evaluation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
    pub session_id: SessionId,
    pub cluster: BehaviorCluster,
    pub active_mutation: Option<LayoutMutation>,
    pub reward_score: f64,
    pub stability_score: f64,
    pub personalization_mode: PersonalizationProfile,
    pub performance_safe: bool,
}

impl EngineSnapshot {
    fn initial(session_id: SessionId) -> Self {
        let cluster = BehaviorCluster::default();
        Self {
            session_id,
            cluster,
            active_mutation: None,
            reward_score: 0.0,
            stability_score: 1.0,
            personalization_mode: personalization_profile(cluster),
            performance_safe: true,
        }
    }
}

/// Everything one evaluation did.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub snapshot: EngineSnapshot,
    pub feed: FeedOutcome,
    pub attempt: AttemptOutcome,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// No metrics for the session yet; nothing was evaluated.
    NotReady,
    Evaluated(TickReport),
}

impl TickOutcome {
    pub fn report(&self) -> Option<&TickReport> {
        match self {
            TickOutcome::NotReady => None,
            TickOutcome::Evaluated(report) => Some(report),
        }
    }
}

struct TickState {
    assigned: Option<BehaviorCluster>,
    loop_started_ms: u64,
}

pub(crate) struct Shared {
    pub(crate) session_id: SessionId,
    pub(crate) ctx: EngineContext,
    pub(crate) config: EngineConfig,
    controller: Mutex<EvolutionController>,
    navigation: Mutex<NavigationOptimizer>,
    tick: Mutex<TickState>,
    snapshot_tx: watch::Sender<EngineSnapshot>,
    pub(crate) running: AtomicBool,
}

/// One mounted evolution engine: a single anonymous session, its controller
/// and its snapshot stream. Cheap to clone.
#[derive(Clone)]
pub struct EvolutionEngine {
    pub(crate) shared: Arc<Shared>,
}

impl EvolutionEngine {
    /// Mount under a freshly generated session id.
    pub fn mount(
        ctx: EngineContext,
        config: EngineConfig,
        scheduler: Arc<dyn StyleScheduler>,
    ) -> Self {
        Self::mount_with_session(ctx, config, scheduler, SessionId::generate())
    }

    pub fn mount_with_session(
        ctx: EngineContext,
        config: EngineConfig,
        scheduler: Arc<dyn StyleScheduler>,
        session_id: SessionId,
    ) -> Self {
        let applier = StyleApplier::new(scheduler);
        applier.seed_baseline();

        let controller = EvolutionController::with_clock(
            config.controller.clone(),
            ctx.catalogue.clone(),
            applier,
            ctx.clock.clone(),
        );
        let (snapshot_tx, _) = watch::channel(EngineSnapshot::initial(session_id.clone()));
        let loop_started_ms = ctx.clock.now_ms();

        tracing::info!(session_id = %session_id, "Mounted evolution engine");

        Self {
            shared: Arc::new(Shared {
                session_id,
                ctx,
                config,
                controller: Mutex::new(controller),
                navigation: Mutex::new(NavigationOptimizer::new()),
                tick: Mutex::new(TickState {
                    assigned: None,
                    loop_started_ms,
                }),
                snapshot_tx,
                running: AtomicBool::new(false),
            }),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.shared.session_id
    }

    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    pub fn context(&self) -> &EngineContext {
        &self.shared.ctx
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> EngineSnapshot {
        self.shared.snapshot_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<EngineSnapshot> {
        self.shared.snapshot_tx.subscribe()
    }

    /// Debounced event sink bound to this engine's session.
    ///
    /// Must be called inside a tokio runtime.
    pub fn emitter(&self) -> EventEmitter {
        EventEmitter::new(
            self.shared.ctx.sessions.clone(),
            self.shared.session_id.clone(),
            self.shared.config.evaluation.debounce(),
        )
    }

    /// Count one meaningful render toward click-through rate.
    pub fn track_impression(&self) {
        self.shared.ctx.sessions.track_impression(&self.shared.session_id);
    }

    pub fn record_navigation_hop(&self, from: impl Into<String>, to: impl Into<String>) {
        self.shared.navigation.lock().record(&NavEvent {
            from: from.into(),
            to: to.into(),
        });
    }

    /// Re-weight `tree` from the hops recorded so far.
    pub fn optimize_navigation(&self, tree: &[NavNode]) -> Vec<NavNode> {
        self.shared.navigation.lock().optimize(tree)
    }

    /// Restart the engagement clock; called when the loop is armed.
    pub(crate) fn mark_loop_start(&self) {
        self.shared.tick.lock().loop_started_ms = self.shared.ctx.clock.now_ms();
    }

    /// Run one evaluation.
    pub fn evaluate(&self) -> TickOutcome {
        let shared = &self.shared;
        let ctx = &shared.ctx;

        let Some(metrics) = ctx.sessions.session_metrics(&shared.session_id) else {
            tracing::debug!(session_id = %shared.session_id, "No metrics yet; skipping evaluation");
            return TickOutcome::NotReady;
        };

        let cluster = classify_metrics(ctx.classifier.as_ref(), &metrics);
        let loop_started_ms = {
            let mut tick = shared.tick.lock();
            if tick.assigned != Some(cluster) {
                tick.assigned = Some(cluster);
                ctx.analytics.track_cluster_assigned(&shared.session_id, cluster);
                tracing::debug!(session_id = %shared.session_id, cluster = %cluster, "Cluster assigned");
            }
            tick.loop_started_ms
        };

        let elapsed_minutes =
            ctx.clock.now_ms().saturating_sub(loop_started_ms) as f64 / 60_000.0;
        let inputs = RewardInputs {
            conversion_rate: metrics.conversion_rate,
            engagement_time: (elapsed_minutes / SESSION_MINUTES_CEILING).min(1.0),
            navigation_efficiency: metrics.navigation_efficiency,
            bounce_reduction: if metrics.bounced { 0.0 } else { 1.0 },
        };
        let reward = compute_reward(&inputs);

        let (feed, attempt, decision_delta, stability, stability_floor, active_mutation) = {
            let mut controller = shared.controller.lock();
            let active_id = controller.state().active_mutation_id().map(str::to_string);
            ctx.analytics
                .track_reward_sample(active_id.as_deref(), reward, cluster);

            let feed = controller.feed_reward(&inputs);
            let decision_delta = feed.decision().and_then(|(id, _)| {
                controller
                    .ledger()
                    .record(id)
                    .map(|r| r.current_reward - r.baseline_reward)
            });

            let attempt = controller.attempt_mutation(cluster, reward);
            let state = controller.state();
            (
                feed,
                attempt,
                decision_delta,
                state.stability_score,
                controller.config().stability_floor,
                state.active_mutation.clone(),
            )
        };

        if let Some((id, status)) = feed.decision() {
            let delta = decision_delta.unwrap_or_default();
            match status {
                MutationStatus::Reinforced => ctx.analytics.track_mutation_reinforced(id, delta),
                MutationStatus::RolledBack => ctx.analytics.track_mutation_rolled_back(id, delta),
                MutationStatus::Pending => {}
            }
        }
        if let Some(applied) = attempt.applied() {
            ctx.analytics.track_mutation_applied(&applied.id, &applied.label);
        }

        let performance_safe = stability >= stability_floor;
        ctx.analytics.track_stability_update(stability);
        ctx.analytics.track_ui_health_check(
            performance_safe,
            (!performance_safe).then_some("stability below controller floor"),
        );

        let snapshot = EngineSnapshot {
            session_id: shared.session_id.clone(),
            cluster,
            active_mutation,
            reward_score: reward,
            stability_score: stability,
            personalization_mode: personalization_profile(cluster),
            performance_safe,
        };
        shared.snapshot_tx.send_replace(snapshot.clone());

        tracing::debug!(
            session_id = %shared.session_id,
            cluster = %cluster,
            reward,
            stability,
            "Evaluation complete"
        );

        TickOutcome::Evaluated(TickReport {
            snapshot,
            feed,
            attempt,
        })
    }

    /// Revert applied mutations and start the session's trials over.
    /// Collected metrics and recorded navigation hops are kept.
    pub fn reset(&self) {
        self.shared.controller.lock().reset();
        self.restart_tick();
    }

    /// Swap the controller's limits. Trials restart as with [`reset`](Self::reset).
    pub fn reconfigure_controller(&self, config: ControllerConfig) {
        self.shared.controller.lock().reconfigure(config);
        self.restart_tick();
    }

    fn restart_tick(&self) {
        {
            let mut tick = self.shared.tick.lock();
            tick.assigned = None;
            tick.loop_started_ms = self.shared.ctx.clock.now_ms();
        }
        self.shared
            .snapshot_tx
            .send_replace(EngineSnapshot::initial(self.shared.session_id.clone()));
    }

    /// Best-effort export of the analytics log to the configured endpoint.
    pub async fn flush_analytics(&self) {
        self.shared
            .ctx
            .analytics
            .flush_to(self.shared.config.analytics.endpoint.as_deref())
            .await;
    }

    /// Read the controller under its lock.
    pub fn with_controller<R>(&self, f: impl FnOnce(&EvolutionController) -> R) -> R {
        f(&self.shared.controller.lock())
    }
}
