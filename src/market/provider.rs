use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for market data operations.
///
/// Display strings double as the `error` field of normalized records, so
/// they stay short and human-readable.
#[derive(Debug, Error)]
pub enum MarketDataError {
    /// No credential is configured for the quote provider
    #[error("API key not configured")]
    MissingApiKey,
    /// Blank or otherwise unusable ticker symbol
    #[error("Invalid symbol")]
    InvalidSymbol,
    /// Provider answered with a non-success HTTP status
    #[error("API error: {0}")]
    Status(u16),
    /// Provider answered 200 but without a usable payload
    #[error("No data found")]
    NoData,
    /// Unexpected numeric or date format in the payload
    #[error("Parse error: {0}")]
    Parse(String),
    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for MarketDataError {
    fn from(error: reqwest::Error) -> Self {
        MarketDataError::Network(error.to_string())
    }
}

/// Provider-level quote for a single symbol, parsed but not yet normalized
/// into the shape the dashboard renders.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalQuote {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
}

/// One day of OHLCV history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Trait for market data providers
#[async_trait]
pub trait QuoteDataProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Fetch the current quote for a single symbol
    async fn global_quote(&self, symbol: &str) -> Result<GlobalQuote, MarketDataError>;

    /// Fetch up to `days` of daily bars, newest first
    async fn daily_series(
        &self,
        symbol: &str,
        days: usize,
    ) -> Result<Vec<DailyBar>, MarketDataError>;
}
