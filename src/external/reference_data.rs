use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReferenceDataError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Source of real-world figures folded into the fair value prompt
#[async_trait]
pub trait ReferenceDataProvider: Send + Sync {
    /// Most recent record of the feed, or an empty object when the feed has none
    async fn fetch_latest(&self) -> Result<serde_json::Value, ReferenceDataError>;
}
