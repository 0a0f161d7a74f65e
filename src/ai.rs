use crate::config::Settings;
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for AI analysis
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No credential is configured for the LLM provider
    #[error("API key not configured")]
    MissingApiKey,
    /// The model call failed (network, provider error, bad request)
    #[error("Model invocation failed: {0}")]
    Invocation(String),
    /// The model answered without any usable content
    #[error("Empty response from model")]
    EmptyResponse,
}

impl From<async_openai::error::OpenAIError> for AnalysisError {
    fn from(error: async_openai::error::OpenAIError) -> Self {
        AnalysisError::Invocation(error.to_string())
    }
}

/// One question/answer turn, in the shape the caller persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisExchange {
    pub query: String,
    pub response: String,
}

/// Running conversation for a single invocation scope.
///
/// Not persisted across requests: the caller owns its lifetime and decides
/// whether to thread it through consecutive `analyze` calls.
#[derive(Debug, Clone, Default)]
pub struct ConversationMemory {
    exchanges: Vec<AnalysisExchange>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, query: impl Into<String>, response: impl Into<String>) {
        self.exchanges.push(AnalysisExchange {
            query: query.into(),
            response: response.into(),
        });
    }

    pub fn exchanges(&self) -> &[AnalysisExchange] {
        &self.exchanges
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// History block for the prompt; empty string on a fresh exchange.
    pub fn render(&self) -> String {
        let mut history = String::new();
        for exchange in &self.exchanges {
            history.push_str("User: ");
            history.push_str(&exchange.query);
            history.push('\n');
            history.push_str("Analyst: ");
            history.push_str(&exchange.response);
            history.push('\n');
        }
        history
    }
}

// Extensible analysis backend trait
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, AnalysisError>;
    fn name(&self) -> &'static str;
}

const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
/// Low temperature keeps the analysis factual rather than creative.
const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 2048;

// Groq implementation via the OpenAI-compatible chat API
pub struct GroqBackend {
    client: Client<OpenAIConfig>,
    model: String,
}

impl GroqBackend {
    pub fn new(api_key: String, model: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(GROQ_API_BASE);
        Self {
            client: Client::with_config(config),
            model,
        }
    }
}

#[async_trait]
impl AnalysisBackend for GroqBackend {
    async fn complete(&self, prompt: &str) -> Result<String, AnalysisError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(TEMPERATURE)
            .max_tokens(MAX_TOKENS)
            .messages(vec![
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()?
                    .into(),
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_ref())
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(AnalysisError::EmptyResponse)
    }

    fn name(&self) -> &'static str {
        "Groq"
    }
}

/// Render the full analyst prompt around the conversation so far.
fn build_prompt(history: &str, query: &str) -> String {
    format!(
        "You are a professional financial analyst with deep expertise in stock markets, \
         economy, and investment strategies.\n\n\
         Provide detailed, accurate analysis based on facts. If you're uncertain about \
         specific data points, acknowledge the limitations.\n\n\
         Previous conversation:\n{history}\n\n\
         User's question about finance:\n{query}\n\n\
         Please provide your expert financial analysis:"
    )
}

/// Analysis service wrapping an LLM backend behind the degradation contract.
pub struct AnalysisService {
    backend: Option<Box<dyn AnalysisBackend>>,
}

impl AnalysisService {
    /// Build from settings. A missing key yields a degraded service whose
    /// calls fail fast with `MissingApiKey`.
    pub fn from_settings(settings: &Settings) -> Self {
        match &settings.groq_api_key {
            Some(key) => Self::with_backend(Box::new(GroqBackend::new(
                key.clone(),
                settings.analysis_model.clone(),
            ))),
            None => Self::unconfigured(),
        }
    }

    pub fn with_backend(backend: Box<dyn AnalysisBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn unconfigured() -> Self {
        Self { backend: None }
    }

    /// Run one analysis turn against the running memory. The exchange is
    /// recorded only on success.
    pub async fn analyze(
        &self,
        query: &str,
        memory: &mut ConversationMemory,
    ) -> Result<String, AnalysisError> {
        let backend = self.backend.as_ref().ok_or(AnalysisError::MissingApiKey)?;

        let prompt = build_prompt(&memory.render(), query);
        log::info!(
            "Requesting analysis from {} ({} prior exchanges)",
            backend.name(),
            memory.exchanges().len()
        );

        let response = backend.complete(&prompt).await.map_err(|e| {
            log::error!("Analysis request failed: {e}");
            e
        })?;

        memory.record(query, response.clone());
        Ok(response)
    }

    /// One-shot analysis with a fresh, request-scoped memory.
    pub async fn analyze_once(&self, query: &str) -> Result<String, AnalysisError> {
        let mut memory = ConversationMemory::new();
        self.analyze(query, &mut memory).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Echoes the prompt back so tests can inspect what was sent.
    struct EchoBackend;

    #[async_trait]
    impl AnalysisBackend for EchoBackend {
        async fn complete(&self, prompt: &str) -> Result<String, AnalysisError> {
            Ok(format!("analysis of: {prompt}"))
        }

        fn name(&self) -> &'static str {
            "echo"
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl AnalysisBackend for FailingBackend {
        async fn complete(&self, _prompt: &str) -> Result<String, AnalysisError> {
            Err(AnalysisError::Invocation("connection refused".to_string()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_unconfigured_analyze_fails_with_fixed_message() {
        let service = AnalysisService::unconfigured();
        let result = service
            .analyze_once("Is now a good time to buy bonds?")
            .await;

        let error = result.unwrap_err();
        assert!(matches!(error, AnalysisError::MissingApiKey));
        assert_eq!(error.to_string(), "API key not configured");
    }

    #[tokio::test]
    async fn test_analyze_builds_prompt_from_query() {
        let service = AnalysisService::with_backend(Box::new(EchoBackend));
        let response = service
            .analyze_once("What drives bond yields?")
            .await
            .unwrap();

        assert!(response.contains("professional financial analyst"));
        assert!(response.contains("User's question about finance:\nWhat drives bond yields?"));
    }

    #[tokio::test]
    async fn test_analyze_records_and_replays_memory() {
        let service = AnalysisService::with_backend(Box::new(EchoBackend));
        let mut memory = ConversationMemory::new();

        service
            .analyze("first question", &mut memory)
            .await
            .unwrap();
        assert_eq!(memory.exchanges().len(), 1);
        assert_eq!(memory.exchanges()[0].query, "first question");

        let second = service
            .analyze("second question", &mut memory)
            .await
            .unwrap();
        assert!(second.contains("User: first question"));
        assert!(second.contains("Analyst: analysis of:"));
        assert_eq!(memory.exchanges().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_analyze_leaves_memory_untouched() {
        let service = AnalysisService::with_backend(Box::new(FailingBackend));
        let mut memory = ConversationMemory::new();

        let result = service.analyze("question", &mut memory).await;

        assert!(matches!(result, Err(AnalysisError::Invocation(_))));
        assert!(memory.is_empty());
    }

    #[test]
    fn test_fresh_memory_renders_empty_history() {
        assert_eq!(ConversationMemory::new().render(), "");
    }

    #[test]
    fn test_memory_render_format() {
        let mut memory = ConversationMemory::new();
        memory.record("q1", "a1");
        memory.record("q2", "a2");

        assert_eq!(
            memory.render(),
            "User: q1\nAnalyst: a1\nUser: q2\nAnalyst: a2\n"
        );
    }

    #[test]
    fn test_prompt_embeds_history_block() {
        let prompt = build_prompt("User: q1\nAnalyst: a1\n", "q2");

        assert!(prompt.contains("Previous conversation:\nUser: q1\nAnalyst: a1\n"));
        assert!(prompt.ends_with("Please provide your expert financial analysis:"));
    }
}
