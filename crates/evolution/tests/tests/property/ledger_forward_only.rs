//! Property tests: trial statuses only move forward, and stability is the
//! reinforced share of decided trials.

use evolution_reinforcement::{MutationStatus, ReinforcementLedger};
use evolution_types::ManualClock;
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

const IDS: [&str; 4] = ["a", "b", "c", "d"];

/// Baseline reward for each registered trial.
fn arb_baselines() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..=1.0, IDS.len())
}

/// Reward samples addressed to one of the registered trials.
fn arb_samples() -> impl Strategy<Value = Vec<(usize, f64)>> {
    prop::collection::vec((0..IDS.len(), 0.0f64..=1.0), 0..80)
}

fn ledger_with(baselines: &[f64]) -> ReinforcementLedger {
    let mut ledger = ReinforcementLedger::with_clock(Arc::new(ManualClock::new(0)));
    for (id, baseline) in IDS.iter().zip(baselines) {
        ledger.register_mutation(*id, format!("apply {}", id), *baseline);
    }
    ledger
}

fn rank(status: MutationStatus) -> u8 {
    match status {
        MutationStatus::Pending => 0,
        MutationStatus::Reinforced | MutationStatus::RolledBack => 1,
    }
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Decided trials never return to pending, and a decision never flips.
    #[test]
    fn statuses_only_move_forward(
        baselines in arb_baselines(),
        samples in arb_samples(),
        min_samples in 1u32..5,
    ) {
        let mut ledger = ledger_with(&baselines);
        let mut seen: HashMap<&str, MutationStatus> =
            IDS.iter().map(|id| (*id, MutationStatus::Pending)).collect();

        for (index, reward) in samples {
            let id = IDS[index];
            let before = seen[id];
            let observation = ledger.observe_reward(id, reward, min_samples).unwrap();
            let after = observation.record.status;

            prop_assert!(rank(after) >= rank(before));
            if before.is_decided() {
                prop_assert_eq!(after, before);
                prop_assert!(!observation.newly_decided);
            }
            prop_assert_eq!(observation.newly_decided, !before.is_decided() && after.is_decided());
            seen.insert(id, after);
        }
    }

    /// A rolled-back trial ignores every later sample.
    #[test]
    fn rolled_back_trials_are_frozen(
        baseline in 0.5f64..=1.0,
        later in prop::collection::vec(0.0f64..=1.0, 1..20),
    ) {
        let mut ledger = ledger_with(&[baseline]);
        let decided = ledger.observe_reward("a", baseline - 0.5, 1).unwrap();
        prop_assert_eq!(decided.record.status, MutationStatus::RolledBack);

        for reward in later {
            let observation = ledger.observe_reward("a", reward, 1).unwrap();
            prop_assert_eq!(&observation.record, &decided.record);
        }
    }

    /// Stability is within [0, 1] and equals reinforced / decided.
    #[test]
    fn stability_is_reinforced_share(
        baselines in arb_baselines(),
        samples in arb_samples(),
        min_samples in 1u32..4,
    ) {
        let mut ledger = ledger_with(&baselines);
        for (index, reward) in samples {
            ledger.observe_reward(IDS[index], reward, min_samples);
            let score = ledger.stability_score();
            prop_assert!((0.0..=1.0).contains(&score));
        }

        let decided = ledger.records().iter().filter(|r| r.status.is_decided()).count();
        let expected = if decided == 0 {
            1.0
        } else {
            ledger.reinforced().len() as f64 / decided as f64
        };
        prop_assert_eq!(ledger.stability_score(), expected);
        prop_assert_eq!(ledger.pending().len() + decided, IDS.len());
    }

    /// A trial is decided exactly on its `min_samples`-th sample.
    #[test]
    fn decision_waits_for_min_samples(
        baseline in 0.0f64..=1.0,
        rewards in prop::collection::vec(0.0f64..=1.0, 1..10),
        min_samples in 1u32..10,
    ) {
        let mut ledger = ledger_with(&[baseline]);
        for (i, reward) in rewards.iter().enumerate() {
            let observation = ledger.observe_reward("a", *reward, min_samples).unwrap();
            let count = i as u32 + 1;
            if count < min_samples {
                prop_assert_eq!(observation.record.status, MutationStatus::Pending);
            } else if count == min_samples {
                prop_assert!(observation.newly_decided);
                let expected = if *reward >= baseline {
                    MutationStatus::Reinforced
                } else {
                    MutationStatus::RolledBack
                };
                prop_assert_eq!(observation.record.status, expected);
            }
        }
    }
}
