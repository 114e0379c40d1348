//! Property tests: whatever the sequence of ticks, the controller respects its
//! session cap, cooldown, stability floor and never-retry rule.

use evolution_controller::{AttemptOutcome, ControllerConfig, EvolutionController};
use evolution_mutation::{MutationCatalogue, StyleApplier};
use evolution_reinforcement::RewardInputs;
use evolution_types::{BehaviorCluster, Clock, ManualClock};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
enum Op {
    Attempt(BehaviorCluster, f64),
    Feed(RewardInputs),
    Wait(u64),
}

fn arb_cluster() -> impl Strategy<Value = BehaviorCluster> {
    prop::sample::select(BehaviorCluster::ALL.to_vec())
}

fn arb_inputs() -> impl Strategy<Value = RewardInputs> {
    (0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0, prop_oneof![Just(0.0), Just(1.0)]).prop_map(
        |(conversion_rate, engagement_time, navigation_efficiency, bounce_reduction)| {
            RewardInputs {
                conversion_rate,
                engagement_time,
                navigation_efficiency,
                bounce_reduction,
            }
        },
    )
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (arb_cluster(), 0.0f64..=1.0).prop_map(|(c, r)| Op::Attempt(c, r)),
        3 => arb_inputs().prop_map(Op::Feed),
        2 => (0u64..20_000).prop_map(Op::Wait),
    ]
}

fn arb_config() -> impl Strategy<Value = ControllerConfig> {
    (1u32..6, 0u64..10_000, 0.0f64..=1.0, 1u32..4).prop_map(|(cap, cooldown, floor, samples)| {
        ControllerConfig::default()
            .with_max_mutations(cap)
            .with_cooldown_ms(cooldown)
            .with_stability_floor(floor)
            .with_min_samples(samples)
    })
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn controller_respects_its_limits(
        config in arb_config(),
        ops in prop::collection::vec(arb_op(), 0..120),
    ) {
        let clock = Arc::new(ManualClock::new(0));
        let mut controller = EvolutionController::with_clock(
            config.clone(),
            Arc::new(MutationCatalogue::standard()),
            StyleApplier::headless(),
            clock.clone(),
        );

        let mut applied_ids = HashSet::new();
        let mut last_applied_at: Option<u64> = None;

        for op in ops {
            match op {
                Op::Wait(ms) => clock.advance(ms),
                Op::Feed(inputs) => {
                    controller.feed_reward(&inputs);
                }
                Op::Attempt(cluster, reward) => {
                    let stability = controller.state().stability_score;
                    let active_pending = controller
                        .state()
                        .active_mutation_id()
                        .and_then(|id| controller.ledger().record(id))
                        .map(|r| !r.status.is_decided())
                        .unwrap_or(false);
                    let now = clock.now_ms();

                    if let AttemptOutcome::Applied(mutation) =
                        controller.attempt_mutation(cluster, reward)
                    {
                        prop_assert!(applied_ids.insert(mutation.id.clone()), "{} retried", mutation.id);
                        prop_assert!(stability >= config.stability_floor);
                        prop_assert!(!active_pending);
                        if let Some(at) = last_applied_at {
                            prop_assert!(now - at >= config.mutation_cooldown_ms);
                        }
                        last_applied_at = Some(now);
                    }
                }
            }

            let state = controller.state();
            prop_assert!(state.total_mutations <= config.max_mutations_per_session);
            prop_assert_eq!(state.total_mutations as usize, state.tried_mutation_ids.len());
            prop_assert_eq!(controller.ledger().len(), state.tried_mutation_ids.len());
            prop_assert!((0.0..=1.0).contains(&state.stability_score));
        }
    }

    /// Feeding rewards without an active trial never changes anything.
    #[test]
    fn feeding_without_trial_is_inert(inputs in prop::collection::vec(arb_inputs(), 1..20)) {
        let mut controller = EvolutionController::with_clock(
            ControllerConfig::default(),
            Arc::new(MutationCatalogue::standard()),
            StyleApplier::headless(),
            Arc::new(ManualClock::new(0)),
        );
        for i in &inputs {
            controller.feed_reward(i);
        }
        prop_assert_eq!(controller.state().total_mutations, 0);
        prop_assert_eq!(controller.state().stability_score, 1.0);
        prop_assert!(controller.ledger().is_empty());
    }
}
