// OpenAI chat-completions client — one HTTPS POST per call.
//
// Deliberately minimal: no retries, no backoff, no caching. A transport or
// API failure is folded into the returned string rather than propagated, so
// the round loop never aborts on a transient error. The miner treats an
// unparsable reply as a no-op round either way.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{CallOptions, ChatMessage, CompletionBackend};

/// Default OpenAI chat-completions endpoint.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Bearer-token client for a chat-completions-style endpoint.
#[derive(Debug)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl OpenAiClient {
    /// Create a new client. An empty API key is a construction-time error —
    /// the pipeline must fail before any round starts, not mid-run.
    pub fn new(api_key: &str, endpoint: &str) -> Result<Self> {
        if api_key.is_empty() {
            anyhow::bail!("API key is not set. Set the OPENAI_API_KEY environment variable.");
        }

        let client = reqwest::Client::builder()
            .user_agent("gleaner/0.1 (topic-mining)")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// The fallible inner call — `execute` converts its error into a
    /// descriptive string per the backend contract.
    async fn try_execute(&self, messages: &[ChatMessage], options: &CallOptions) -> Result<String> {
        let request = CompletionRequest {
            model: &options.model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            seed: options.seed,
            response_format: options.force_json.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        debug!(
            model = options.model,
            messages = messages.len(),
            force_json = options.force_json,
            "Completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Completion API request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            // Surface the API's own error message when the envelope has one
            let detail = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            anyhow::bail!("Completion API returned {status}: {detail}");
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .context("Failed to parse completion response")?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow::anyhow!("Completion response contained no choices"))?;

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl CompletionBackend for OpenAiClient {
    async fn execute(&self, messages: &[ChatMessage], options: &CallOptions) -> String {
        match self.try_execute(messages, options).await {
            Ok(text) => text,
            Err(e) => format!("Completion call failed: {e:#}"),
        }
    }
}

// --- Chat-completions request/response types ---

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    seed: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}
