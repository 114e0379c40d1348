//! End-to-end test: events flow from ingestion through classification into a
//! reinforced layout mutation.

use evolution_aggregator::BehaviorEvent;
use evolution_analytics::EventKind;
use evolution_engine::{EngineConfig, TickOutcome};
use evolution_mutation::StyleVar;
use evolution_reinforcement::{compute_reward, MutationStatus, RewardInputs};
use evolution_tests::{fast_config, TestBed};
use evolution_types::BehaviorCluster;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn decisive_buyer(bed: &TestBed) {
    for _ in 0..5 {
        bed.engine.track_impression();
    }
    for _ in 0..4 {
        bed.ingest(BehaviorEvent::Click);
    }
    bed.ingest(BehaviorEvent::Scroll { value: 0.5 });
    bed.ingest(BehaviorEvent::Conversion { value: Some(0.9) });
    for _ in 0..4 {
        bed.ingest(BehaviorEvent::Navigation { value: 1.0 });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn weighted_reward_scenario() {
    let reward = compute_reward(&RewardInputs {
        conversion_rate: 0.9,
        engagement_time: 0.8,
        navigation_efficiency: 0.9,
        bounce_reduction: 1.0,
    });
    assert!((reward - 0.89).abs() < 1e-9);
}

#[test]
fn buyer_session_gets_compact_density() {
    let bed = TestBed::new(EngineConfig::default());
    decisive_buyer(&bed);
    bed.advance_minutes(1);

    let outcome = bed.engine.evaluate();
    let report = outcome.report().expect("metrics exist");
    assert_eq!(report.snapshot.cluster, BehaviorCluster::DecisiveBuyer);
    assert_eq!(report.attempt.applied().unwrap().id, "density-compact");
    assert_eq!(bed.styles.value_of(StyleVar::FontScale).as_deref(), Some("0.9"));
    assert_eq!(bed.styles.value_of(StyleVar::SpacingScale).as_deref(), Some("0.8"));

    let assigned = bed.ctx.analytics.events(Some(EventKind::ClusterAssigned));
    assert_eq!(assigned.len(), 1);
}

#[test]
fn improving_reward_reinforces_mutation() {
    let bed = TestBed::new(fast_config());
    decisive_buyer(&bed);
    bed.engine.evaluate();

    // engagement grows with elapsed time, so the next sample beats the baseline
    bed.advance_minutes(10);
    let outcome = bed.engine.evaluate();
    let report = outcome.report().unwrap();

    assert_eq!(
        report.feed.decision(),
        Some(("density-compact", MutationStatus::Reinforced))
    );
    assert_eq!(report.snapshot.stability_score, 1.0);
    assert!(report.snapshot.performance_safe);
    assert_eq!(bed.styles.value_of(StyleVar::FontScale).as_deref(), Some("0.9"));
    assert_eq!(
        bed.ctx
            .analytics
            .events(Some(EventKind::MutationReinforced))
            .len(),
        1
    );
}

#[test]
fn reinforced_trial_allows_next_mutation_after_cooldown() {
    let bed = TestBed::new(fast_config());
    decisive_buyer(&bed);
    bed.engine.evaluate();
    bed.advance_minutes(10);
    let outcome = bed.engine.evaluate();

    // same tick: reinforced trial no longer blocks, cooldown has elapsed
    let applied = outcome.report().unwrap().attempt.applied().cloned().unwrap();
    assert_eq!(applied.id, "cta-prominent");
    assert_eq!(bed.styles.value_of(StyleVar::CtaWeight).as_deref(), Some("700"));
    bed.engine.with_controller(|c| {
        assert_eq!(c.state().total_mutations, 2);
        assert!(c.state().tried_mutation_ids.contains("density-compact"));
    });
}

#[test]
fn never_acts_before_metrics_exist() {
    let bed = TestBed::new(EngineConfig::default());
    for _ in 0..3 {
        bed.advance_minutes(1);
        assert_eq!(bed.engine.evaluate(), TickOutcome::NotReady);
    }
    bed.engine.with_controller(|c| assert_eq!(c.state().total_mutations, 0));
    assert!(bed.ctx.analytics.is_empty());
}

#[test]
fn sessions_share_stores_but_not_controllers() {
    let a = TestBed::new(EngineConfig::default());
    let b = TestBed::mount(a.clock.clone(), a.ctx.clone(), EngineConfig::default(), "other");

    decisive_buyer(&a);
    b.ingest(BehaviorEvent::Scroll { value: 0.95 });
    a.engine.evaluate();
    b.engine.evaluate();

    assert_eq!(a.ctx.sessions.len(), 2);
    a.engine
        .with_controller(|c| assert_eq!(c.state().total_mutations, 1));
    b.engine
        .with_controller(|c| assert_eq!(c.state().total_mutations, 1));
    assert_eq!(
        a.ctx.analytics.events(Some(EventKind::ClusterAssigned)).len(),
        2
    );
}
