//! Background evaluation loop

use crate::engine::EvolutionEngine;
use crate::error::EngineError;
use std::sync::atomic::Ordering;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Handle to a running evaluation loop.
///
/// Dropping the handle also stops the loop at its next wake-up.
pub struct EngineHandle {
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl EngineHandle {
    /// Stop the loop and wait for it to exit.
    pub async fn shutdown(self) -> Result<(), EngineError> {
        let _ = self.shutdown_tx.send(());
        self.task.await?;
        Ok(())
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl EvolutionEngine {
    /// Start the periodic evaluation loop.
    ///
    /// The first evaluation is armed after the runtime has had a chance to run
    /// other ready work (when `loop.defer_until_idle` is set), then every
    /// `loop.interval_ms`. Only one loop may run per engine.
    pub fn spawn(&self) -> Result<EngineHandle, EngineError> {
        if self.shared.running.swap(true, Ordering::SeqCst) {
            return Err(EngineError::AlreadyRunning(
                self.shared.session_id.to_string(),
            ));
        }

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let engine = self.clone();
        let interval = self.shared.config.evaluation.interval();
        let defer = self.shared.config.evaluation.defer_until_idle;

        let task = tokio::spawn(async move {
            if defer {
                tokio::task::yield_now().await;
            }
            engine.mark_loop_start();
            tracing::info!(
                session_id = %engine.session_id(),
                interval_ms = interval.as_millis() as u64,
                "Evaluation loop started"
            );

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = tokio::time::sleep(interval) => {
                        engine.evaluate();
                    }
                }
            }

            engine.shared.running.store(false, Ordering::SeqCst);
            tracing::info!(session_id = %engine.session_id(), "Evaluation loop stopped");
        });

        Ok(EngineHandle { shutdown_tx, task })
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }
}
