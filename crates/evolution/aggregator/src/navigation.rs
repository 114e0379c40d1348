//! Navigation tree optimization from recorded hop events.
//!
//! Hot routes are promoted toward the top of the navigation, cold routes are
//! demoted, and siblings are reordered most-used first.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Weight at or above which a node is promoted one level.
pub const PROMOTE_WEIGHT: f64 = 0.7;
/// Weight below which a node is demoted one level.
pub const DEMOTE_WEIGHT: f64 = 0.2;
/// Deepest level a demoted node can reach.
pub const MAX_DEPTH: u32 = 3;

/// A node in the rendered navigation tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavNode {
    pub path: String,
    pub label: String,
    /// Relative usage weight, 0-1.
    pub weight: f64,
    /// Lower is more prominent.
    pub depth: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavNode>,
}

impl NavNode {
    pub fn new(path: impl Into<String>, label: impl Into<String>, depth: u32) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            weight: 0.0,
            depth,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<NavNode>) -> Self {
        self.children = children;
        self
    }
}

/// One recorded navigation hop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEvent {
    pub from: String,
    pub to: String,
}

/// Hit counter over navigation destinations.
#[derive(Debug, Default)]
pub struct NavigationOptimizer {
    hits: HashMap<String, u64>,
}

impl NavigationOptimizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: &NavEvent) {
        *self.hits.entry(event.to.clone()).or_insert(0) += 1;
    }

    pub fn hits(&self, path: &str) -> u64 {
        self.hits.get(path).copied().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.hits.clear();
    }

    /// Return a re-weighted, re-ordered copy of `nodes`.
    pub fn optimize(&self, nodes: &[NavNode]) -> Vec<NavNode> {
        let mut paths = Vec::new();
        collect_paths(nodes, &mut paths);
        let max = paths
            .iter()
            .map(|p| self.hits(p))
            .max()
            .unwrap_or(0)
            .max(1);
        let weights: HashMap<&str, f64> = paths
            .iter()
            .map(|p| (p.as_str(), self.hits(p) as f64 / max as f64))
            .collect();
        optimize_level(nodes, &weights)
    }
}

/// Depth-first flattening of an (optimized) tree.
pub fn flatten(nodes: &[NavNode]) -> Vec<NavNode> {
    let mut out = Vec::new();
    for node in nodes {
        out.push(node.clone());
        out.extend(flatten(&node.children));
    }
    out
}

fn collect_paths(nodes: &[NavNode], out: &mut Vec<String>) {
    for node in nodes {
        out.push(node.path.clone());
        collect_paths(&node.children, out);
    }
}

fn optimize_level(nodes: &[NavNode], weights: &HashMap<&str, f64>) -> Vec<NavNode> {
    let mut updated: Vec<NavNode> = nodes
        .iter()
        .map(|node| {
            let weight = weights.get(node.path.as_str()).copied().unwrap_or(node.weight);
            let depth = if weight >= PROMOTE_WEIGHT {
                node.depth.saturating_sub(1)
            } else if weight < DEMOTE_WEIGHT {
                (node.depth + 1).min(MAX_DEPTH)
            } else {
                node.depth
            };
            NavNode {
                path: node.path.clone(),
                label: node.label.clone(),
                weight,
                depth,
                children: optimize_level(&node.children, weights),
            }
        })
        .collect();

    updated.sort_by(|a, b| {
        a.depth.cmp(&b.depth).then(
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });
    updated
}
