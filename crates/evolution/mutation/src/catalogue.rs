use crate::error::MutationError;
use crate::guardrail::{mutation_guardrail, MutationPayload};
use crate::style::StyleVar;
use evolution_types::{BehaviorCluster, DensityToken};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One bounded, reversible presentation adjustment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutMutation {
    pub id: String,
    pub label: String,
    /// Variable writes, in application order.
    pub style_vars: Vec<(StyleVar, String)>,
    /// What the guardrail validates before this mutation may be selected.
    pub payload: MutationPayload,
}

impl LayoutMutation {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            style_vars: Vec::new(),
            payload: MutationPayload::default(),
        }
    }

    pub fn with_var(mut self, var: StyleVar, value: impl Into<String>) -> Self {
        self.style_vars.push((var, value.into()));
        self
    }

    pub fn with_payload(mut self, payload: MutationPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn touches(&self, var: StyleVar) -> bool {
        self.style_vars.iter().any(|(v, _)| *v == var)
    }
}

/// Fixed mutation set plus per-cluster preference order.
#[derive(Clone, Debug)]
pub struct MutationCatalogue {
    mutations: Vec<LayoutMutation>,
    preferences: BTreeMap<BehaviorCluster, Vec<String>>,
}

impl MutationCatalogue {
    /// Build a catalogue, rejecting duplicate ids, empty patches and
    /// preferences that name unknown mutations.
    pub fn new(
        mutations: Vec<LayoutMutation>,
        preferences: BTreeMap<BehaviorCluster, Vec<String>>,
    ) -> Result<Self, MutationError> {
        let mut seen = HashSet::new();
        for m in &mutations {
            if !seen.insert(m.id.as_str()) {
                return Err(MutationError::DuplicateId(m.id.clone()));
            }
            if m.style_vars.is_empty() {
                return Err(MutationError::EmptyPatch(m.id.clone()));
            }
        }
        for (cluster, ids) in &preferences {
            if let Some(id) = ids.iter().find(|id| !seen.contains(id.as_str())) {
                return Err(MutationError::UnknownPreference {
                    cluster: cluster.to_string(),
                    id: id.clone(),
                });
            }
        }
        Ok(Self {
            mutations,
            preferences,
        })
    }

    /// The six built-in mutations and their cluster preferences.
    pub fn standard() -> Self {
        let mutations = vec![
            LayoutMutation::new("density-compact", "Compact density")
                .with_var(StyleVar::FontScale, "0.9")
                .with_var(StyleVar::SpacingScale, "0.8")
                .with_var(StyleVar::CardPadding, "1rem")
                .with_var(StyleVar::ContentGap, "1rem")
                .with_payload(
                    MutationPayload::new()
                        .with_font_scale(0.9)
                        .with_spacing_scale(0.8)
                        .with_density(DensityToken::Compact),
                ),
            LayoutMutation::new("density-comfortable", "Comfortable density")
                .with_var(StyleVar::FontScale, "1.05")
                .with_var(StyleVar::SpacingScale, "1.25")
                .with_var(StyleVar::CardPadding, "2rem")
                .with_var(StyleVar::ContentGap, "2rem")
                .with_payload(
                    MutationPayload::new()
                        .with_font_scale(1.05)
                        .with_spacing_scale(1.25)
                        .with_density(DensityToken::Comfortable),
                ),
            LayoutMutation::new("line-height-loose", "Loose line height")
                .with_var(StyleVar::LineHeight, "1.9")
                .with_payload(MutationPayload::new().with_spacing_scale(1.0)),
            LayoutMutation::new("cta-prominent", "Prominent calls to action")
                .with_var(StyleVar::CtaWeight, "700")
                .with_payload(MutationPayload::new().with_density(DensityToken::Default)),
            LayoutMutation::new("content-gap-wide", "Wide content gap")
                .with_var(StyleVar::ContentGap, "2.5rem")
                .with_var(StyleVar::CardPadding, "2rem")
                .with_payload(
                    MutationPayload::new()
                        .with_spacing_scale(1.4)
                        .with_density(DensityToken::Comfortable),
                ),
            LayoutMutation::new("font-scale-large", "Larger type")
                .with_var(StyleVar::FontScale, "1.1")
                .with_payload(MutationPayload::new().with_font_scale(1.1)),
        ];

        let prefs = |ids: [&str; 2]| ids.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let preferences = BTreeMap::from([
            (BehaviorCluster::Explorer, prefs(["content-gap-wide", "density-comfortable"])),
            (BehaviorCluster::DecisiveBuyer, prefs(["density-compact", "cta-prominent"])),
            (BehaviorCluster::SlowReader, prefs(["line-height-loose", "font-scale-large"])),
            (BehaviorCluster::MobileHeavy, prefs(["density-compact", "cta-prominent"])),
            (BehaviorCluster::PowerUser, prefs(["density-compact", "cta-prominent"])),
            (BehaviorCluster::PassiveScroller, prefs(["density-comfortable", "line-height-loose"])),
        ]);

        Self {
            mutations,
            preferences,
        }
    }

    pub fn get(&self, id: &str) -> Option<&LayoutMutation> {
        self.mutations.iter().find(|m| m.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayoutMutation> {
        self.mutations.iter()
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn preferences(&self, cluster: BehaviorCluster) -> &[String] {
        self.preferences
            .get(&cluster)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Candidate order for a cluster: its preferred ids first, then every
    /// other catalogue entry in catalogue order.
    pub fn candidates(&self, cluster: BehaviorCluster) -> Vec<&LayoutMutation> {
        let preferred = self.preferences(cluster);
        let mut ordered: Vec<&LayoutMutation> =
            preferred.iter().filter_map(|id| self.get(id)).collect();
        ordered.extend(
            self.mutations
                .iter()
                .filter(|m| !preferred.iter().any(|p| *p == m.id)),
        );
        ordered
    }

    /// First untried, guardrail-safe candidate for the cluster.
    pub fn select_mutation(
        &self,
        cluster: BehaviorCluster,
        tried: &HashSet<String>,
    ) -> Option<&LayoutMutation> {
        self.candidates(cluster).into_iter().find(|m| {
            if tried.contains(&m.id) {
                return false;
            }
            let verdict = mutation_guardrail(&m.payload);
            if !verdict.safe {
                tracing::debug!(
                    mutation_id = %m.id,
                    violations = ?verdict.violations,
                    "Skipping unsafe mutation"
                );
            }
            verdict.safe
        })
    }
}

impl Default for MutationCatalogue {
    fn default() -> Self {
        Self::standard()
    }
}
