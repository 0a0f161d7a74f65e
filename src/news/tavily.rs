use super::provider::{NewsError, NewsSearchProvider, SearchHit};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const DEFAULT_SEARCH_URL: &str = "https://api.tavily.com/search";

/// Domains the dashboard trusts for financial coverage.
pub const FINANCIAL_DOMAINS: [&str; 8] = [
    "bloomberg.com",
    "cnbc.com",
    "reuters.com",
    "wsj.com",
    "ft.com",
    "marketwatch.com",
    "investing.com",
    "finance.yahoo.com",
];

#[derive(Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'a str,
    include_domains: &'a [&'a str],
    max_results: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

/// Tavily web-search client restricted to financial media.
///
/// One POST per call: no retry, no caching, client-default timeout.
pub struct TavilyClient {
    http: reqwest::Client,
    api_key: String,
    search_url: String,
}

impl TavilyClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (stub servers in tests).
    pub fn with_search_url(mut self, search_url: impl Into<String>) -> Self {
        self.search_url = search_url.into();
        self
    }
}

#[async_trait]
impl NewsSearchProvider for TavilyClient {
    fn name(&self) -> &str {
        "Tavily"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, NewsError> {
        log::debug!("Searching news: {query:?} (max {max_results})");

        let request = SearchRequest {
            api_key: &self.api_key,
            query,
            search_depth: "advanced",
            include_domains: &FINANCIAL_DOMAINS,
            max_results,
        };

        let response = self
            .http
            .post(&self.search_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::error!("Tavily request failed with status {status}");
            return Err(NewsError::Status(status.as_u16()));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| NewsError::Parse(e.to_string()))?;

        Ok(body.results)
    }
}
