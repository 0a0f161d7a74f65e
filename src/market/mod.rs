/// Market data functionality: quote provider seam, the Alpha Vantage
/// adapter, and the normalizing service the web layer consumes.
pub mod alpha_vantage;
pub mod provider;
pub mod service;

// Re-export commonly used types
pub use alpha_vantage::AlphaVantageProvider;
pub use provider::{DailyBar, GlobalQuote, MarketDataError, QuoteDataProvider};
pub use service::{
    HoldingValuation, IndexQuote, MarketDataService, MarketSummary, QuoteRecord,
    SectorPerformance, value_holding, MARKET_BASKET,
};
