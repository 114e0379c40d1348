use crate::event::BehaviorEvent;
use crate::metrics::SessionMetrics;
use dashmap::DashMap;
use evolution_types::{Clock, FeatureVector, SessionId, SystemClock};
use std::sync::Arc;

/// In-memory store of per-session metrics.
///
/// One store is created per process (or per engine instance in tests) and
/// shared by `Arc`. Each session's metrics are mutated under its map entry
/// lock, so concurrent emitters for the same session serialize.
///
/// Memory is unbounded unless callers evict: see [`SessionStore::evict`] and
/// [`SessionStore::evict_idle`].
pub struct SessionStore {
    sessions: DashMap<SessionId, SessionMetrics>,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: DashMap::new(),
            clock,
        }
    }

    /// Create a zeroed session if it does not exist yet. Returns `true` when
    /// a new session was created.
    pub fn create(&self, session_id: &SessionId) -> bool {
        if self.sessions.contains_key(session_id) {
            return false;
        }
        let now = self.clock.now_ms();
        let mut created = false;
        self.sessions.entry(session_id.clone()).or_insert_with(|| {
            created = true;
            SessionMetrics::new(session_id.clone(), now)
        });
        created
    }

    /// Record one meaningful render for CTR accounting.
    pub fn track_impression(&self, session_id: &SessionId) {
        let now = self.clock.now_ms();
        let mut entry = self
            .sessions
            .entry(session_id.clone())
            .or_insert_with(|| SessionMetrics::new(session_id.clone(), now));
        entry.record_impression(now);
    }

    /// Fold an interaction event into the session's snapshot, creating the
    /// session lazily.
    pub fn ingest_event(&self, session_id: &SessionId, event: BehaviorEvent) {
        let now = self.clock.now_ms();
        let mut entry = self
            .sessions
            .entry(session_id.clone())
            .or_insert_with(|| SessionMetrics::new(session_id.clone(), now));
        entry.apply(&event, now);
        tracing::trace!(session_id = %session_id, kind = event.kind(), "Ingested behavior event");
    }

    /// Current snapshot, or `None` if the session was never seen.
    pub fn session_metrics(&self, session_id: &SessionId) -> Option<SessionMetrics> {
        self.sessions.get(session_id).map(|m| m.clone())
    }

    pub fn all_sessions(&self) -> Vec<SessionMetrics> {
        self.sessions.iter().map(|m| m.value().clone()).collect()
    }

    /// Mean feature vector across all live sessions.
    pub fn aggregate_vector(&self) -> FeatureVector {
        let vectors: Vec<FeatureVector> =
            self.sessions.iter().map(|m| m.feature_vector()).collect();
        FeatureVector::mean(&vectors)
    }

    pub fn evict(&self, session_id: &SessionId) -> Option<SessionMetrics> {
        self.sessions.remove(session_id).map(|(_, m)| m)
    }

    /// Evict every session not updated within `max_idle_ms`. Returns the
    /// number of evicted sessions.
    pub fn evict_idle(&self, max_idle_ms: u64) -> usize {
        let now = self.clock.now_ms();
        let before = self.sessions.len();
        self.sessions
            .retain(|_, m| now.saturating_sub(m.updated_at_ms) <= max_idle_ms);
        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted idle sessions");
        }
        evicted
    }

    pub fn clear(&self) {
        self.sessions.clear();
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
