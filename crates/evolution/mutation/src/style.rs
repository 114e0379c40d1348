//! Style-variable contract and off-path application.
//!
//! Mutations never touch the render target directly. A [`StyleApplier`] turns
//! a mutation into a [`StylePatch`] and hands it to a [`StyleScheduler`],
//! which decides when (and whether) the patch reaches a [`StyleTarget`].

use crate::catalogue::LayoutMutation;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// The seven style variables a mutation may touch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleVar {
    FontScale,
    SpacingScale,
    LineHeight,
    CardPadding,
    NavOrder,
    CtaWeight,
    ContentGap,
}

impl StyleVar {
    pub const ALL: [StyleVar; 7] = [
        StyleVar::FontScale,
        StyleVar::SpacingScale,
        StyleVar::LineHeight,
        StyleVar::CardPadding,
        StyleVar::NavOrder,
        StyleVar::CtaWeight,
        StyleVar::ContentGap,
    ];

    /// Custom-property name on the render target.
    pub fn name(&self) -> &'static str {
        match self {
            StyleVar::FontScale => "--evo-font-scale",
            StyleVar::SpacingScale => "--evo-spacing-scale",
            StyleVar::LineHeight => "--evo-line-height",
            StyleVar::CardPadding => "--evo-card-padding",
            StyleVar::NavOrder => "--evo-nav-order",
            StyleVar::CtaWeight => "--evo-cta-weight",
            StyleVar::ContentGap => "--evo-content-gap",
        }
    }

    /// Value the variable holds when no mutation is active.
    pub fn baseline(&self) -> &'static str {
        match self {
            StyleVar::FontScale => "1",
            StyleVar::SpacingScale => "1",
            StyleVar::LineHeight => "1.6",
            StyleVar::CardPadding => "1.5rem",
            StyleVar::NavOrder => "0",
            StyleVar::CtaWeight => "600",
            StyleVar::ContentGap => "1.5rem",
        }
    }
}

impl fmt::Display for StyleVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered set of variable writes applied together.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StylePatch {
    writes: Vec<(StyleVar, String)>,
}

impl StylePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, var: StyleVar, value: impl Into<String>) -> Self {
        self.writes.push((var, value.into()));
        self
    }

    /// Every variable at its baseline value.
    pub fn baseline() -> Self {
        StyleVar::ALL
            .into_iter()
            .fold(Self::new(), |patch, var| patch.set(var, var.baseline()))
    }

    pub fn writes(&self) -> &[(StyleVar, String)] {
        &self.writes
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    fn write_to(&self, target: &dyn StyleTarget) {
        for (var, value) in &self.writes {
            target.set_property(var.name(), value);
        }
    }
}

/// Where style variables end up (a document root, a test map, ...).
pub trait StyleTarget: Send + Sync {
    fn set_property(&self, name: &str, value: &str);
}

/// Style target backed by a map; used headless and in tests.
#[derive(Debug, Default)]
pub struct InMemoryStyleTarget {
    properties: RwLock<BTreeMap<String, String>>,
}

impl InMemoryStyleTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.properties.read().get(name).cloned()
    }

    pub fn value_of(&self, var: StyleVar) -> Option<String> {
        self.get(var.name())
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.properties.read().clone()
    }
}

impl StyleTarget for InMemoryStyleTarget {
    fn set_property(&self, name: &str, value: &str) {
        self.properties
            .write()
            .insert(name.to_string(), value.to_string());
    }
}

/// Decides when a patch reaches its target.
pub trait StyleScheduler: Send + Sync {
    fn schedule(&self, patch: StylePatch);
}

enum IdleMessage {
    Patch(StylePatch),
    Settle(oneshot::Sender<()>),
}

/// Writes patches from a background task, yielding to the runtime before
/// each write so callers never pay for it on their own path.
///
/// Must be created inside a tokio runtime.
pub struct IdleStyleScheduler {
    tx: mpsc::UnboundedSender<IdleMessage>,
}

impl IdleStyleScheduler {
    pub fn new(target: Arc<dyn StyleTarget>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<IdleMessage>();
        tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                tokio::task::yield_now().await;
                match message {
                    IdleMessage::Patch(patch) => {
                        patch.write_to(target.as_ref());
                        tracing::trace!(writes = patch.len(), "Applied style patch");
                    }
                    IdleMessage::Settle(done) => {
                        let _ = done.send(());
                    }
                }
            }
        });
        Self { tx }
    }

    /// Resolves once every patch scheduled before this call has been written.
    pub async fn settle(&self) {
        let (done, wait) = oneshot::channel();
        if self.tx.send(IdleMessage::Settle(done)).is_ok() {
            let _ = wait.await;
        }
    }
}

impl StyleScheduler for IdleStyleScheduler {
    fn schedule(&self, patch: StylePatch) {
        if self.tx.send(IdleMessage::Patch(patch)).is_err() {
            tracing::warn!("Style worker stopped; dropping patch");
        }
    }
}

/// Writes synchronously on the caller's thread.
pub struct ImmediateStyleScheduler {
    target: Arc<dyn StyleTarget>,
}

impl ImmediateStyleScheduler {
    pub fn new(target: Arc<dyn StyleTarget>) -> Self {
        Self { target }
    }
}

impl StyleScheduler for ImmediateStyleScheduler {
    fn schedule(&self, patch: StylePatch) {
        patch.write_to(self.target.as_ref());
    }
}

/// Discards every patch. For contexts with no render target.
#[derive(Debug, Default)]
pub struct HeadlessStyleScheduler;

impl StyleScheduler for HeadlessStyleScheduler {
    fn schedule(&self, _patch: StylePatch) {}
}

/// Applies and reverts catalogue mutations through a scheduler.
#[derive(Clone)]
pub struct StyleApplier {
    scheduler: Arc<dyn StyleScheduler>,
}

impl StyleApplier {
    pub fn new(scheduler: Arc<dyn StyleScheduler>) -> Self {
        Self { scheduler }
    }

    pub fn headless() -> Self {
        Self::new(Arc::new(HeadlessStyleScheduler))
    }

    /// Write every baseline variable.
    pub fn seed_baseline(&self) {
        self.scheduler.schedule(StylePatch::baseline());
    }

    pub fn apply(&self, mutation: &LayoutMutation) {
        let patch = mutation
            .style_vars
            .iter()
            .fold(StylePatch::new(), |p, (var, value)| p.set(*var, value.clone()));
        tracing::debug!(mutation_id = %mutation.id, writes = patch.len(), "Scheduling mutation patch");
        self.scheduler.schedule(patch);
    }

    /// Reset exactly the variables the mutation touched.
    pub fn revert(&self, mutation: &LayoutMutation) {
        let patch = mutation
            .style_vars
            .iter()
            .fold(StylePatch::new(), |p, (var, _)| p.set(*var, var.baseline()));
        tracing::debug!(mutation_id = %mutation.id, writes = patch.len(), "Scheduling mutation revert");
        self.scheduler.schedule(patch);
    }
}
