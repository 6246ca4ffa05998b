use std::env;

use anyhow::Result;

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    /// OpenAI API key (OPENAI_API_KEY) — required before any network call.
    pub api_key: String,
    /// Chat-completions endpoint (defaults to the OpenAI API).
    /// Override with GLEANER_API_URL for testing or compatible providers.
    pub api_url: String,
    /// Model used for the per-round extraction calls (fast/cheap variant).
    pub round_model: String,
    /// Model used for the single consolidation call (stronger variant).
    pub final_model: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Only the API key has no default — everything else falls back to
    /// the standard OpenAI endpoint and model names.
    pub fn load() -> Result<Self> {
        Ok(Self {
            api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            api_url: env::var("GLEANER_API_URL")
                .unwrap_or_else(|_| crate::llm::client::DEFAULT_API_URL.to_string()),
            round_model: env::var("GLEANER_ROUND_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            final_model: env::var("GLEANER_FINAL_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
        })
    }

    /// Check that the OpenAI API key is configured.
    /// Call this before constructing the client — the pipeline makes one
    /// network call per round and must fail fast, not mid-run.
    pub fn require_api_key(&self) -> Result<()> {
        if self.api_key.is_empty() {
            anyhow::bail!(
                "OPENAI_API_KEY not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }
}
