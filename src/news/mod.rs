/// Financial news functionality: search provider seam, the Tavily adapter,
/// and the enrichment pipeline (sentiment, ticker extraction, summaries).
pub mod enrich;
pub mod provider;
pub mod service;
pub mod tavily;

// Re-export commonly used types
pub use enrich::{Sentiment, classify_sentiment, extract_symbols, parse_published, summarize};
pub use provider::{NewsError, NewsSearchProvider, SearchHit};
pub use service::{DEFAULT_MAX_RESULTS, NewsItem, NewsService};
pub use tavily::{FINANCIAL_DOMAINS, TavilyClient};
