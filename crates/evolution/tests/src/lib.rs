//! Shared fixtures for the evolution integration suites.

use async_trait::async_trait;
use evolution_aggregator::BehaviorEvent;
use evolution_analytics::{AnalyticsError, AnalyticsEvent, AnalyticsSink};
use evolution_engine::{EngineConfig, EngineContext, EvolutionEngine};
use evolution_mutation::{ImmediateStyleScheduler, InMemoryStyleTarget};
use evolution_types::{ManualClock, SessionId};
use parking_lot::Mutex;
use std::sync::Arc;

/// Epoch the manual clock starts at.
pub const START_MS: u64 = 1_700_000_000_000;

/// One mounted engine over a manual clock and an inspectable style target.
pub struct TestBed {
    pub clock: Arc<ManualClock>,
    pub styles: Arc<InMemoryStyleTarget>,
    pub ctx: EngineContext,
    pub engine: EvolutionEngine,
}

impl TestBed {
    pub fn new(config: EngineConfig) -> Self {
        let clock = Arc::new(ManualClock::new(START_MS));
        let ctx = EngineContext::with_clock(clock.clone());
        Self::mount(clock, ctx, config, "bed")
    }

    /// Mount another engine into an existing context.
    pub fn mount(
        clock: Arc<ManualClock>,
        ctx: EngineContext,
        config: EngineConfig,
        session: &str,
    ) -> Self {
        let styles = Arc::new(InMemoryStyleTarget::new());
        let engine = EvolutionEngine::mount_with_session(
            ctx.clone(),
            config,
            Arc::new(ImmediateStyleScheduler::new(styles.clone())),
            SessionId::from(session),
        );
        Self {
            clock,
            styles,
            ctx,
            engine,
        }
    }

    /// Ingest directly, bypassing the emitter's debounce.
    pub fn ingest(&self, event: BehaviorEvent) {
        self.ctx.sessions.ingest_event(self.engine.session_id(), event);
    }

    pub fn advance_minutes(&self, minutes: u64) {
        self.clock.advance(minutes * 60_000);
    }
}

/// Config with a short cooldown and single-sample decisions.
pub fn fast_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.controller = config
        .controller
        .with_cooldown_ms(1_000)
        .with_min_samples(1);
    config
}

/// Analytics sink that keeps every delivered batch.
#[derive(Default)]
pub struct RecordingSink {
    batches: Mutex<Vec<Vec<AnalyticsEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches(&self) -> Vec<Vec<AnalyticsEvent>> {
        self.batches.lock().clone()
    }
}

#[async_trait]
impl AnalyticsSink for RecordingSink {
    async fn deliver(&self, events: &[AnalyticsEvent]) -> Result<(), AnalyticsError> {
        self.batches.lock().push(events.to_vec());
        Ok(())
    }
}
