use super::enrich::{Sentiment, classify_sentiment, extract_symbols, parse_published, summarize};
use super::provider::{NewsError, NewsSearchProvider, SearchHit};
use super::tavily::TavilyClient;
use crate::config::Settings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result cap used by the web layer when the request does not specify one.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Query used when the caller asks for headlines without a topic.
const LATEST_NEWS_QUERY: &str = "latest financial news stock market";
/// Suffix keeping caller-supplied searches on financial ground.
const QUERY_CONTEXT: &str = "financial news stock market";

/// One enriched news article. `url` is the caller's dedup key when it
/// reconciles results against storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
    pub summary: String,
    pub sentiment: Sentiment,
    pub symbols: Vec<String>,
}

/// News service: one provider query per call, then local enrichment and
/// ordering. Never persists; the caller reconciles by URL.
pub struct NewsService {
    provider: Option<Box<dyn NewsSearchProvider>>,
}

impl NewsService {
    /// Build from settings. A missing key yields a degraded service whose
    /// calls fail fast with `MissingApiKey`, without touching the network.
    pub fn from_settings(settings: &Settings) -> Self {
        match &settings.tavily_api_key {
            Some(key) => Self::with_provider(Box::new(TavilyClient::new(key.clone()))),
            None => Self::unconfigured(),
        }
    }

    pub fn with_provider(provider: Box<dyn NewsSearchProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    pub fn unconfigured() -> Self {
        Self { provider: None }
    }

    /// Latest financial headlines.
    pub async fn latest_news(&self, max_results: usize) -> Result<Vec<NewsItem>, NewsError> {
        self.run_search(LATEST_NEWS_QUERY, max_results).await
    }

    /// Keyword search, steered toward financial coverage.
    pub async fn search_news(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<NewsItem>, NewsError> {
        let query = format!("{query} {QUERY_CONTEXT}");
        self.run_search(&query, max_results).await
    }

    async fn run_search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<NewsItem>, NewsError> {
        let provider = self.provider.as_ref().ok_or(NewsError::MissingApiKey)?;

        let hits = provider.search(query, max_results).await.map_err(|e| {
            log::error!("News search failed for {query:?}: {e}");
            e
        })?;
        log::info!("Search {query:?} returned {} results", hits.len());

        let retrieved_at = Utc::now();
        let mut items: Vec<NewsItem> = hits
            .into_iter()
            .map(|hit| enrich_hit(hit, retrieved_at))
            .collect();

        // Newest first, whatever order the provider used.
        items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(items)
    }
}

fn enrich_hit(hit: SearchHit, retrieved_at: DateTime<Utc>) -> NewsItem {
    let content = hit.content.as_deref().unwrap_or("");
    let published_at = hit
        .published_date
        .as_deref()
        .and_then(parse_published)
        .unwrap_or(retrieved_at);

    NewsItem {
        title: hit.title,
        url: hit.url,
        source: hit.source.unwrap_or_else(|| "Unknown".to_string()),
        published_at,
        summary: summarize(content),
        sentiment: classify_sentiment(content),
        symbols: extract_symbols(content),
    }
}
