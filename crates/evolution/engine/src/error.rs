/// Errors from configuring or running the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("evaluation loop already running for session {0}")]
    AlreadyRunning(String),
    #[error("evaluation loop failed: {0}")]
    LoopJoin(String),
}

impl From<config::ConfigError> for EngineError {
    fn from(e: config::ConfigError) -> Self {
        EngineError::Config(e.to_string())
    }
}

impl From<tokio::task::JoinError> for EngineError {
    fn from(e: tokio::task::JoinError) -> Self {
        EngineError::LoopJoin(e.to_string())
    }
}
