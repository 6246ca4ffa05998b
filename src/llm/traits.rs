// Completion backend trait — the swap-ready abstraction.
//
// The topic miner only ever sees this trait, so tests can drive it with
// scripted responses and no network. The real implementation is
// `client::OpenAiClient`.

use async_trait::async_trait;
use serde::Serialize;

/// Role tag for one message in a chat-style conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged message in a conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Generation parameters for a single completion call.
#[derive(Debug, Clone)]
pub struct CallOptions {
    /// Model identifier. Defaults to a fast/cheap variant.
    pub model: String,
    /// Low by default — the pipeline wants stable, repeatable output.
    pub temperature: f32,
    pub max_tokens: u32,
    /// When true, asks the service to constrain output to one JSON object.
    pub force_json: bool,
    /// Best-effort determinism hint; the service may ignore it.
    pub seed: i64,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            max_tokens: 500,
            force_json: false,
            seed: 42,
        }
    }
}

/// Trait for executing one chat completion. Implementations must be async
/// because real providers require HTTP API calls.
///
/// The result is always a string: on success the model's trimmed reply, on
/// failure a human-readable description of what went wrong. Callers must
/// treat any result as possibly-not-JSON and validate before use — this
/// keeps one bad call from aborting a multi-round run.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn execute(&self, messages: &[ChatMessage], options: &CallOptions) -> String;
}
