use evolution_aggregator::{BehaviorEvent, SessionStore};
use evolution_types::SessionId;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Debounced event sink bound to one session.
///
/// Trailing edge: a burst of events spaced closer than the debounce window
/// collapses into a single ingestion of the burst's last event. Clones share
/// the same window. When every clone is dropped, a pending event is still
/// ingested.
#[derive(Clone)]
pub struct EventEmitter {
    session_id: SessionId,
    tx: mpsc::UnboundedSender<BehaviorEvent>,
}

impl EventEmitter {
    /// Must be called inside a tokio runtime.
    pub fn new(store: Arc<SessionStore>, session_id: SessionId, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(debounce_loop(store, session_id.clone(), debounce, rx));
        Self { session_id, tx }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn emit(&self, event: BehaviorEvent) {
        if self.tx.send(event).is_err() {
            tracing::warn!(session_id = %self.session_id, "Emitter closed; dropping event");
        }
    }
}

async fn debounce_loop(
    store: Arc<SessionStore>,
    session_id: SessionId,
    debounce: Duration,
    mut rx: mpsc::UnboundedReceiver<BehaviorEvent>,
) {
    while let Some(mut latest) = rx.recv().await {
        loop {
            tokio::select! {
                next = rx.recv() => match next {
                    Some(event) => latest = event,
                    None => {
                        store.ingest_event(&session_id, latest);
                        return;
                    }
                },
                _ = tokio::time::sleep(debounce) => break,
            }
        }
        tracing::debug!(session_id = %session_id, kind = latest.kind(), "Ingesting debounced event");
        store.ingest_event(&session_id, latest);
    }
}
