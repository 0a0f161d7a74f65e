use std::env;

/// Model used for financial analysis when `ANALYSIS_MODEL` is not set.
pub const DEFAULT_ANALYSIS_MODEL: &str = "llama3-70b-8192";

/// Environment-sourced credentials and tuning for the three integrations.
///
/// Read once at startup; services are constructed from this value and never
/// touch the environment mid-call. A missing credential degrades only the
/// integration it gates.
#[derive(Debug, Clone)]
pub struct Settings {
    pub alpha_vantage_api_key: Option<String>,
    pub tavily_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub analysis_model: String,
}

impl Settings {
    pub fn new(
        alpha_vantage_api_key: Option<String>,
        tavily_api_key: Option<String>,
        groq_api_key: Option<String>,
        analysis_model: Option<String>,
    ) -> Self {
        Self {
            alpha_vantage_api_key: normalize(alpha_vantage_api_key),
            tavily_api_key: normalize(tavily_api_key),
            groq_api_key: normalize(groq_api_key),
            analysis_model: normalize(analysis_model)
                .unwrap_or_else(|| DEFAULT_ANALYSIS_MODEL.to_string()),
        }
    }

    /// Load settings from the process environment (and `.env` when present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let settings = Self::new(
            env::var("ALPHA_VANTAGE_API_KEY").ok(),
            env::var("TAVILY_API_KEY").ok(),
            env::var("GROQ_API_KEY").ok(),
            env::var("ANALYSIS_MODEL").ok(),
        );

        if settings.alpha_vantage_api_key.is_none() {
            log::warn!("ALPHA_VANTAGE_API_KEY is not set; market data will run degraded");
        }
        if settings.tavily_api_key.is_none() {
            log::warn!("TAVILY_API_KEY is not set; news retrieval will run degraded");
        }
        if settings.groq_api_key.is_none() {
            log::warn!("GROQ_API_KEY is not set; AI analysis will run degraded");
        }

        settings
    }
}

// Empty variables behave the same as unset ones.
fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
