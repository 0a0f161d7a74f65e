use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Error types for news retrieval
#[derive(Debug, Error)]
pub enum NewsError {
    /// No credential is configured for the search provider
    #[error("API key not configured")]
    MissingApiKey,
    /// Provider answered with a non-success HTTP status
    #[error("API error: {0}")]
    Status(u16),
    /// Malformed response payload
    #[error("Parse error: {0}")]
    Parse(String),
    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for NewsError {
    fn from(error: reqwest::Error) -> Self {
        NewsError::Network(error.to_string())
    }
}

/// One raw result from the search provider, before enrichment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Trait for news search providers
#[async_trait]
pub trait NewsSearchProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Run one search, capped at `max_results` hits
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, NewsError>;
}
