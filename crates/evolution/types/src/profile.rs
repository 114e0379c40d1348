use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout density token shared by personalization profiles and mutation
/// payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityToken {
    Compact,
    Default,
    Comfortable,
}

impl DensityToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            DensityToken::Compact => "compact",
            DensityToken::Default => "default",
            DensityToken::Comfortable => "comfortable",
        }
    }

    /// Parse a raw token. Unknown tokens return `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "compact" => Some(DensityToken::Compact),
            "default" => Some(DensityToken::Default),
            "comfortable" => Some(DensityToken::Comfortable),
            _ => None,
        }
    }
}

impl fmt::Display for DensityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CtaStrength {
    Strong,
    Normal,
    Subtle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineHeight {
    Tight,
    Normal,
    Loose,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationFocus {
    Top,
    Bottom,
    Sidebar,
}

/// Presentation hints attached to a behavioral cluster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizationProfile {
    pub ui_density: DensityToken,
    pub cta_strength: CtaStrength,
    pub line_height: LineHeight,
    pub navigation_focus: NavigationFocus,
    pub feature_highlights: bool,
}
