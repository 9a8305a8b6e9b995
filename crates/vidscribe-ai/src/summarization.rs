//! Transcript summarization client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{AiError, AiResult};

/// Default endpoint base.
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

const SUMMARIZATION_MODEL: &str = "gpt-3.5-turbo";

/// Low temperature keeps summaries consistent across runs.
const SUMMARIZATION_TEMPERATURE: f64 = 0.3;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const SYSTEM_PROMPT: &str =
    "You are an assistant that summarizes video transcripts clearly and concisely.";

/// Capability interface for summarization services.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Submit transcript text and return the generated summary.
    async fn summarize(&self, text: &str) -> AiResult<String>;
}

/// Chat-completion backed summarizer.
pub struct ChatSummarizer {
    api_key: String,
    base_url: String,
    http: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: &'static str,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl ChatSummarizer {
    /// Create a new summarizer. The credential is only required once a
    /// request is made, so the server can start without one configured.
    pub fn new(api_key: impl Into<String>) -> AiResult<Self> {
        Ok(Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
        })
    }

    /// Override the endpoint base URL (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_request(text: &str) -> ChatRequest {
        let prompt = format!(
            "Please provide a concise summary of the following transcript. \
             Focus on the main topics, key points, and important details:\n\n{text}"
        );

        ChatRequest {
            model: SUMMARIZATION_MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: SUMMARIZATION_TEMPERATURE,
        }
    }
}

#[async_trait]
impl Summarizer for ChatSummarizer {
    async fn summarize(&self, text: &str) -> AiResult<String> {
        if self.api_key.is_empty() {
            return Err(AiError::MissingApiKey);
        }

        debug!("Summarizing {} chars of transcript", text.len());

        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&Self::build_request(text))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let body: ChatResponse = serde_json::from_slice(&response.bytes().await?)?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(AiError::NoSummary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_missing_key_rejected_before_any_request() {
        let client = ChatSummarizer::new("").unwrap();
        let err = client.summarize("words").await.unwrap_err();
        assert!(matches!(err, AiError::MissingApiKey));
    }

    #[test]
    fn test_request_shape() {
        let request = ChatSummarizer::build_request("the transcript");

        assert_eq!(request.model, "gpt-3.5-turbo");
        assert!((request.temperature - 0.3).abs() < f64::EPSILON);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1].role, "user");
        assert!(request.messages[1].content.contains("the transcript"));
    }

    #[tokio::test]
    async fn test_summarize_returns_first_choice() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-3.5-turbo",
                "temperature": 0.3
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [
                    { "message": { "content": "a tidy summary" } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ChatSummarizer::new("key").unwrap().with_base_url(server.uri());
        assert_eq!(client.summarize("words").await.unwrap(), "a tidy summary");
    }

    #[tokio::test]
    async fn test_zero_choices_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&server)
            .await;

        let client = ChatSummarizer::new("key").unwrap().with_base_url(server.uri());
        assert!(matches!(client.summarize("words").await, Err(AiError::NoSummary)));
    }

    #[tokio::test]
    async fn test_empty_transcript_still_issues_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "choices": [] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ChatSummarizer::new("key").unwrap().with_base_url(server.uri());
        // No short-circuit on empty input; the endpoint decides.
        assert!(matches!(client.summarize("").await, Err(AiError::NoSummary)));
    }

    #[tokio::test]
    async fn test_non_success_surfaces_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let client = ChatSummarizer::new("key").unwrap().with_base_url(server.uri());
        match client.summarize("words").await.unwrap_err() {
            AiError::RequestFailed { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "upstream exploded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
