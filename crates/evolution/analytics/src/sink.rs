use crate::error::AnalyticsError;
use crate::event::AnalyticsEvent;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Destination for exported analytics batches.
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn deliver(&self, events: &[AnalyticsEvent]) -> Result<(), AnalyticsError>;
}

#[derive(Serialize)]
struct Batch<'a> {
    events: &'a [AnalyticsEvent],
}

/// POSTs `{"events": [...]}` as JSON to an HTTP endpoint.
pub struct HttpAnalyticsSink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAnalyticsSink {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(endpoint: impl Into<String>) -> Result<Self, AnalyticsError> {
        Self::with_timeout(endpoint, Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AnalyticsError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnalyticsSink for HttpAnalyticsSink {
    async fn deliver(&self, events: &[AnalyticsEvent]) -> Result<(), AnalyticsError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&Batch { events })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalyticsError::Status(status.as_u16()));
        }
        Ok(())
    }
}
