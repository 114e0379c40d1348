//! Simulated visitors for the demo.
//!
//! Each persona produces a noisy but recognisable stream of interaction
//! events, so different sessions drift toward different clusters.

use evolution_aggregator::BehaviorEvent;
use rand::Rng;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Persona {
    /// Clicks around, reads most of the page, uses many features.
    Browser,
    /// Few impressions, goes straight for the conversion.
    Buyer,
    /// Scrolls everything slowly, rarely clicks.
    Reader,
    /// Lands, glances, leaves.
    Drifter,
}

impl Persona {
    pub const ALL: [Persona; 4] = [
        Persona::Browser,
        Persona::Buyer,
        Persona::Reader,
        Persona::Drifter,
    ];

    pub fn for_index(i: usize) -> Self {
        Self::ALL[i % Self::ALL.len()]
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Persona::Browser => "browser",
            Persona::Buyer => "buyer",
            Persona::Reader => "reader",
            Persona::Drifter => "drifter",
        };
        f.pad(s)
    }
}

/// One evaluation interval's worth of activity.
pub struct TickActivity {
    pub impressions: u32,
    pub events: Vec<BehaviorEvent>,
}

/// Generate activity for `persona` at `tick`.
pub fn tick_activity(persona: Persona, tick: usize, rng: &mut impl Rng) -> TickActivity {
    let mut events = Vec::new();
    let impressions;

    match persona {
        Persona::Browser => {
            impressions = rng.gen_range(4..8);
            for _ in 0..rng.gen_range(2..5) {
                events.push(BehaviorEvent::Click);
            }
            events.push(BehaviorEvent::Scroll {
                value: rng.gen_range(0.6..1.0),
            });
            for _ in 0..rng.gen_range(1..4) {
                events.push(BehaviorEvent::FeatureUse);
            }
            events.push(BehaviorEvent::Navigation {
                value: rng.gen_range(0.3..0.7),
            });
        }
        Persona::Buyer => {
            impressions = rng.gen_range(2..4);
            events.push(BehaviorEvent::Click);
            events.push(BehaviorEvent::Click);
            events.push(BehaviorEvent::Navigation {
                value: rng.gen_range(0.8..1.0),
            });
            if tick >= 1 && rng.gen_bool(0.7) {
                events.push(BehaviorEvent::Conversion {
                    value: Some(rng.gen_range(0.7..1.0)),
                });
            }
        }
        Persona::Reader => {
            impressions = rng.gen_range(3..6);
            events.push(BehaviorEvent::Scroll {
                value: (0.3 + 0.15 * tick as f64).min(1.0),
            });
            if rng.gen_bool(0.3) {
                events.push(BehaviorEvent::Click);
            }
            events.push(BehaviorEvent::Navigation {
                value: rng.gen_range(0.2..0.5),
            });
        }
        Persona::Drifter => {
            impressions = rng.gen_range(1..3);
            events.push(BehaviorEvent::Scroll {
                value: rng.gen_range(0.05..0.3),
            });
            events.push(BehaviorEvent::DropOff {
                target: "hero".to_string(),
            });
        }
    }

    TickActivity {
        impressions,
        events,
    }
}
