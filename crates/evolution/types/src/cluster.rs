use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed behavioral archetypes.
///
/// Declaration order matters: the classifier breaks distance ties in favor of
/// the cluster that appears first in [`BehaviorCluster::ALL`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BehaviorCluster {
    Explorer,
    DecisiveBuyer,
    SlowReader,
    MobileHeavy,
    PowerUser,
    PassiveScroller,
}

impl BehaviorCluster {
    pub const ALL: [BehaviorCluster; 6] = [
        BehaviorCluster::Explorer,
        BehaviorCluster::DecisiveBuyer,
        BehaviorCluster::SlowReader,
        BehaviorCluster::MobileHeavy,
        BehaviorCluster::PowerUser,
        BehaviorCluster::PassiveScroller,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorCluster::Explorer => "explorer",
            BehaviorCluster::DecisiveBuyer => "decisiveBuyer",
            BehaviorCluster::SlowReader => "slowReader",
            BehaviorCluster::MobileHeavy => "mobileHeavy",
            BehaviorCluster::PowerUser => "powerUser",
            BehaviorCluster::PassiveScroller => "passiveScroller",
        }
    }
}

/// Sessions start as passive scrollers until the first evaluation tick.
impl Default for BehaviorCluster {
    fn default() -> Self {
        BehaviorCluster::PassiveScroller
    }
}

impl fmt::Display for BehaviorCluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
