//! End-to-end test: the background loop, the debounced emitter and the idle
//! style worker running together on a paused tokio clock.

use evolution_aggregator::BehaviorEvent;
use evolution_analytics::EventKind;
use evolution_engine::{EngineConfig, EngineContext, EngineError, EvolutionEngine, TokioClock};
use evolution_mutation::{
    HeadlessStyleScheduler, IdleStyleScheduler, InMemoryStyleTarget, StyleScheduler, StyleVar,
};
use evolution_types::SessionId;
use std::sync::Arc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn loop_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.evaluation.interval_ms = 1_000;
    config.evaluation.debounce_ms = 200;
    config
}

fn mount(ctx: &EngineContext, session: &str, scheduler: Arc<dyn StyleScheduler>) -> EvolutionEngine {
    EvolutionEngine::mount_with_session(
        ctx.clone(),
        loop_config(),
        scheduler,
        SessionId::from(session),
    )
}

fn tokio_context() -> EngineContext {
    EngineContext::with_clock(Arc::new(TokioClock::new()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn emitter_burst_ingests_once_before_first_tick() {
    let ctx = tokio_context();
    let engine = mount(&ctx, "burst", Arc::new(HeadlessStyleScheduler));
    let emitter = engine.emitter();

    for _ in 0..5 {
        emitter.emit(BehaviorEvent::FeatureUse);
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    let handle = engine.spawn().unwrap();
    tokio::time::sleep(Duration::from_millis(1_100)).await;
    handle.shutdown().await.unwrap();

    let metrics = ctx.sessions.session_metrics(engine.session_id()).unwrap();
    assert_eq!(metrics.feature_use_count, 1);
    assert_eq!(
        ctx.analytics.events(Some(EventKind::RewardSampled)).len(),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_each_evaluation() {
    let ctx = tokio_context();
    let engine = mount(&ctx, "watch", Arc::new(HeadlessStyleScheduler));
    ctx.sessions
        .ingest_event(engine.session_id(), BehaviorEvent::Scroll { value: 0.7 });

    let mut rx = engine.subscribe();
    assert!(rx.borrow().active_mutation.is_none());

    let handle = engine.spawn().unwrap();
    rx.changed().await.unwrap();
    let first = rx.borrow_and_update().clone();
    assert!(first.active_mutation.is_some());
    assert!(first.performance_safe);

    rx.changed().await.unwrap();
    let second = rx.borrow_and_update().clone();
    // engagement keeps growing while nothing else changes
    assert!(second.reward_score > first.reward_score);

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn idle_worker_writes_applied_styles() {
    let ctx = tokio_context();
    let styles = Arc::new(InMemoryStyleTarget::new());
    let scheduler = Arc::new(IdleStyleScheduler::new(styles.clone()));
    let engine = mount(&ctx, "idle", scheduler.clone());
    ctx.sessions
        .ingest_event(engine.session_id(), BehaviorEvent::Scroll { value: 0.6 });

    scheduler.settle().await;
    for var in StyleVar::ALL {
        assert_eq!(styles.value_of(var).as_deref(), Some(var.baseline()));
    }

    let handle = engine.spawn().unwrap();
    tokio::time::sleep(Duration::from_millis(1_100)).await;
    scheduler.settle().await;

    let active = engine.snapshot().active_mutation.expect("first tick applies");
    for (var, value) in &active.style_vars {
        assert_eq!(styles.value_of(*var).as_deref(), Some(value.as_str()));
    }
    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn dropping_handle_stops_loop() {
    let ctx = tokio_context();
    let engine = mount(&ctx, "drop", Arc::new(HeadlessStyleScheduler));
    ctx.sessions
        .ingest_event(engine.session_id(), BehaviorEvent::Click);

    let handle = engine.spawn().unwrap();
    tokio::time::sleep(Duration::from_millis(1_100)).await;
    assert!(engine.is_running());
    drop(handle);

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!engine.is_running());
    let sampled = ctx.analytics.events(Some(EventKind::RewardSampled)).len();
    tokio::time::sleep(Duration::from_millis(5_000)).await;
    assert_eq!(ctx.analytics.events(Some(EventKind::RewardSampled)).len(), sampled);
}

#[tokio::test(start_paused = true)]
async fn one_loop_per_session() {
    let ctx = tokio_context();
    let a = mount(&ctx, "a", Arc::new(HeadlessStyleScheduler));
    let b = mount(&ctx, "b", Arc::new(HeadlessStyleScheduler));
    ctx.sessions.ingest_event(a.session_id(), BehaviorEvent::Click);
    ctx.sessions.ingest_event(b.session_id(), BehaviorEvent::Click);

    let ha = a.spawn().unwrap();
    let hb = b.spawn().unwrap();
    assert!(matches!(a.spawn(), Err(EngineError::AlreadyRunning(id)) if id == "a"));

    tokio::time::sleep(Duration::from_millis(2_100)).await;
    ha.shutdown().await.unwrap();
    hb.shutdown().await.unwrap();

    assert_eq!(ctx.analytics.events(Some(EventKind::RewardSampled)).len(), 4);
    assert_eq!(ctx.analytics.events(Some(EventKind::ClusterAssigned)).len(), 2);
}
