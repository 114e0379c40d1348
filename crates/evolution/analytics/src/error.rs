/// Errors from delivering analytics to an external sink.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("sink rejected batch with status {0}")]
    Status(u16),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for AnalyticsError {
    fn from(e: reqwest::Error) -> Self {
        AnalyticsError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for AnalyticsError {
    fn from(e: serde_json::Error) -> Self {
        AnalyticsError::Serialization(e.to_string())
    }
}
