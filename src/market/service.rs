use super::alpha_vantage::AlphaVantageProvider;
use super::provider::{DailyBar, GlobalQuote, MarketDataError, QuoteDataProvider};
use crate::config::Settings;
use serde::{Deserialize, Serialize};

/// Normalized quote shape the dashboard renders.
///
/// Always fully populated: failures zero the numeric fields and carry the
/// cause in `error`, so callers never have to null-check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
    /// Placeholder until a richer fundamentals endpoint is wired in
    pub market_cap: f64,
    pub pe_ratio: f64,
    pub dividend_yield: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QuoteRecord {
    fn from_quote(quote: GlobalQuote) -> Self {
        Self {
            symbol: quote.symbol,
            price: quote.price,
            change: quote.change,
            change_percent: quote.change_percent,
            volume: quote.volume,
            market_cap: 0.0,
            pe_ratio: 0.0,
            dividend_yield: 0.0,
            error: None,
        }
    }

    fn unavailable(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            price: 0.0,
            change: 0.0,
            change_percent: 0.0,
            volume: 0,
            market_cap: 0.0,
            pe_ratio: 0.0,
            dividend_yield: 0.0,
            error: Some(reason.into()),
        }
    }
}

/// One index entry in the market summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexQuote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
}

/// Sector performance entry; the collection stays empty until a sector data
/// source is wired in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorPerformance {
    pub name: String,
    pub change_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSummary {
    pub indices: Vec<IndexQuote>,
    pub sectors: Vec<SectorPerformance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Index basket shown on the dashboard, in display order.
pub const MARKET_BASKET: [(&str, &str); 3] = [
    ("SPY", "S&P 500"),
    ("DIA", "Dow Jones Industrial Average"),
    ("QQQ", "NASDAQ-100"),
];

/// Market data service normalizing provider results for the web layer.
pub struct MarketDataService {
    provider: Option<Box<dyn QuoteDataProvider>>,
}

impl MarketDataService {
    /// Build from settings. A missing key yields a degraded service that
    /// answers every call without touching the network.
    pub fn from_settings(settings: &Settings) -> Self {
        match &settings.alpha_vantage_api_key {
            Some(key) => Self::with_provider(Box::new(AlphaVantageProvider::new(key.clone()))),
            None => Self::unconfigured(),
        }
    }

    pub fn with_provider(provider: Box<dyn QuoteDataProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    pub fn unconfigured() -> Self {
        Self { provider: None }
    }

    /// Current quote for a symbol. Total: configuration, transport, and
    /// parse failures all come back as a zeroed record carrying the cause
    /// in `error`.
    pub async fn quote(&self, symbol: &str) -> QuoteRecord {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return QuoteRecord::unavailable(symbol, MarketDataError::InvalidSymbol.to_string());
        }

        let Some(provider) = self.provider.as_ref() else {
            return QuoteRecord::unavailable(symbol, MarketDataError::MissingApiKey.to_string());
        };

        match provider.global_quote(&symbol).await {
            Ok(quote) => {
                log::info!("Fetched quote for {}: ${:.2}", quote.symbol, quote.price);
                QuoteRecord::from_quote(quote)
            }
            Err(e) => {
                log::error!("Failed to fetch quote for {symbol}: {e}");
                QuoteRecord::unavailable(symbol, e.to_string())
            }
        }
    }

    /// Compose the fixed index basket into a summary: three sequential
    /// quote lookups, output order matching basket order.
    ///
    /// The basket shape is the same on every path. An unconfigured service
    /// falls through without network calls because `quote` degrades per
    /// symbol; the first per-symbol error (if any) is surfaced on the
    /// summary.
    pub async fn market_summary(&self) -> MarketSummary {
        let mut indices = Vec::with_capacity(MARKET_BASKET.len());
        let mut error = None;

        for (symbol, name) in MARKET_BASKET {
            let record = self.quote(symbol).await;
            if error.is_none() {
                error = record.error.clone();
            }
            indices.push(IndexQuote {
                symbol: symbol.to_string(),
                name: name.to_string(),
                price: record.price,
                change: record.change,
                change_percent: record.change_percent,
            });
        }

        MarketSummary {
            indices,
            sectors: Vec::new(),
            error,
        }
    }

    /// Daily price history for a symbol, newest first.
    pub async fn history(
        &self,
        symbol: &str,
        days: usize,
    ) -> Result<Vec<DailyBar>, MarketDataError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(MarketDataError::InvalidSymbol);
        }

        let provider = self
            .provider
            .as_ref()
            .ok_or(MarketDataError::MissingApiKey)?;

        let bars = provider.daily_series(&symbol, days).await?;
        log::info!("Fetched {} daily bars for {symbol}", bars.len());
        Ok(bars)
    }
}

/// Valuation of a single holding at its latest quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingValuation {
    pub symbol: String,
    pub quantity: f64,
    pub purchase_price: f64,
    pub current_price: f64,
    pub value: f64,
    pub profit_loss: f64,
}

/// Value a holding against its latest quote. A degraded quote (price zero)
/// values the position at zero rather than failing.
pub fn value_holding(quote: &QuoteRecord, quantity: f64, purchase_price: f64) -> HoldingValuation {
    HoldingValuation {
        symbol: quote.symbol.clone(),
        quantity,
        purchase_price,
        current_price: quote.price,
        value: quantity * quote.price,
        profit_loss: (quote.price - purchase_price) * quantity,
    }
}
