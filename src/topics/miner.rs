// The topic miner — drives the multi-round accumulation loop and the
// terminal consolidation call.
//
// Rounds are strictly sequential: each round's prompt embeds the registry
// state left by the previous round, so there is nothing to parallelize
// without changing the result.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tracing::{info, warn};

use crate::corpus;
use crate::llm::traits::{CallOptions, CompletionBackend};

use super::instructions::RoundInstructions;
use super::prompt;
use super::registry::TopicRegistry;

/// Output-token budget for one round — enough for both add/remove lists.
const ROUND_MAX_TOKENS: u32 = 1000;
/// Output-token budget for the consolidation call.
const FINAL_MAX_TOKENS: u32 = 4000;

/// Tunables for one mining run.
#[derive(Debug, Clone)]
pub struct MinerSettings {
    /// Tweets sampled per round (without replacement within the batch).
    pub batch_size: usize,
    /// Number of extraction rounds.
    pub num_batches: usize,
    /// Model for per-round calls (fast/cheap variant).
    pub round_model: String,
    /// Model for the consolidation call (stronger variant).
    pub final_model: String,
    /// Size of the final consolidated list.
    pub final_count: usize,
}

impl Default for MinerSettings {
    fn default() -> Self {
        Self {
            batch_size: 500,
            num_batches: 3,
            round_model: "gpt-4o-mini".to_string(),
            final_model: "gpt-4o".to_string(),
            final_count: 20,
        }
    }
}

/// Accumulates topics over `num_batches` rounds, then consolidates.
///
/// Owns the registry exclusively; the completion backend is only ever
/// handed prompts and returns text.
pub struct TopicMiner<C: CompletionBackend> {
    client: C,
    registry: TopicRegistry,
    settings: MinerSettings,
}

impl<C: CompletionBackend> TopicMiner<C> {
    pub fn new(client: C, settings: MinerSettings) -> Self {
        Self {
            client,
            registry: TopicRegistry::new(),
            settings,
        }
    }

    /// The current registry state (read-only).
    pub fn registry(&self) -> &TopicRegistry {
        &self.registry
    }

    /// The underlying backend — lets tests inspect recorded prompts.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run one extraction round over an already-sampled batch.
    ///
    /// Returns the raw model reply. A reply that fails strict parsing is
    /// logged and leaves the registry untouched — one bad round must not
    /// abort the run, it just loses that round's suggestions.
    pub async fn run_round(&mut self, batch: &[String], round: usize) -> String {
        let messages = prompt::round_messages(
            &self.registry,
            round,
            self.settings.num_batches,
            batch,
        );

        let options = CallOptions {
            model: self.settings.round_model.clone(),
            max_tokens: ROUND_MAX_TOKENS,
            force_json: true,
            ..CallOptions::default()
        };

        let response = self.client.execute(&messages, &options).await;

        match RoundInstructions::parse(&response) {
            Ok(instructions) => {
                let (added, removed) = instructions.apply(&mut self.registry);
                info!(
                    round = round + 1,
                    added,
                    removed,
                    topics = self.registry.len(),
                    "Round applied"
                );
            }
            Err(e) => {
                warn!(round = round + 1, error = %e, "Round response unusable, registry unchanged");
            }
        }

        response
    }

    /// Run the full accumulation loop: sample, prompt, merge, repeat.
    pub async fn mine(&mut self, tweets: &[String]) -> Result<()> {
        if tweets.is_empty() {
            anyhow::bail!("Corpus is empty — nothing to mine topics from");
        }

        let pb = ProgressBar::new(self.settings.num_batches as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  Rounds [{bar:30}] {pos}/{len} ({eta})")
                .unwrap(),
        );

        for round in 0..self.settings.num_batches {
            let batch = corpus::sample_batch(tweets, self.settings.batch_size);
            let response = self.run_round(&batch, round).await;

            // Surface every raw reply for inspection
            pb.println(format!(
                "--- Round {}/{} response ---\n{response}",
                round + 1,
                self.settings.num_batches,
            ));
            pb.inc(1);
        }
        pb.finish_and_clear();

        Ok(())
    }

    /// Consolidate the full registry into exactly `final_count` topics.
    ///
    /// Unlike rounds, there is no graceful degradation here: a reply that
    /// fails to parse or has the wrong cardinality ends the run without a
    /// final list.
    pub async fn finalize(&self) -> Result<Vec<String>> {
        let messages = prompt::consolidation_messages(&self.registry, self.settings.final_count);

        let options = CallOptions {
            model: self.settings.final_model.clone(),
            max_tokens: FINAL_MAX_TOKENS,
            force_json: true,
            ..CallOptions::default()
        };

        let response = self.client.execute(&messages, &options).await;
        let topics = parse_final_topics(&response, self.settings.final_count)?;

        info!(count = topics.len(), "Consolidation complete");
        Ok(topics)
    }
}

/// Extract and validate the consolidated topic list from a raw reply.
pub fn parse_final_topics(text: &str, expected_count: usize) -> Result<Vec<String>> {
    let consolidated: ConsolidatedTopics =
        serde_json::from_str(text).context("Consolidation response is not a valid JSON object")?;

    if consolidated.response.len() != expected_count {
        anyhow::bail!(
            "Consolidation returned {} topics, expected exactly {expected_count}",
            consolidated.response.len()
        );
    }

    Ok(consolidated.response)
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConsolidatedTopics {
    response: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_topics_accepted_at_exact_count() {
        let text = r#"{"response": ["a", "b", "c"]}"#;
        let topics = parse_final_topics(text, 3).unwrap();
        assert_eq!(topics, vec!["a", "b", "c"]);
    }

    #[test]
    fn final_topics_rejected_at_wrong_count() {
        let text = r#"{"response": ["a", "b"]}"#;
        let err = parse_final_topics(text, 20).unwrap_err();
        assert!(err.to_string().contains("expected exactly 20"));
    }

    #[test]
    fn final_topics_rejected_when_not_json() {
        assert!(parse_final_topics("Completion call failed: timeout", 20).is_err());
        assert!(parse_final_topics(r#"{"topics": []}"#, 0).is_err());
    }
}
