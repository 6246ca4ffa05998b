// Round instruction parsing — the model's add/remove decisions.
//
// The reply is parsed with a strict serde schema rather than anything
// looser: unknown keys and wrong shapes are rejected outright, so a
// malformed reply can never partially mutate the registry.

use anyhow::{Context, Result};
use serde::Deserialize;

use super::registry::TopicRegistry;

/// Parsed structured output of one round's model call.
///
/// Either key may be absent or empty; anything else in the object is a
/// schema violation and fails the parse.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoundInstructions {
    #[serde(default)]
    pub add: Vec<String>,
    #[serde(default)]
    pub remove: Vec<RemoveEntry>,
}

/// One topic the model believes is obsolete.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoveEntry {
    pub topic: String,
    /// The id the model saw in the prompt enumeration. Removal is keyed by
    /// label — the id is informational and not trusted.
    pub id: u64,
}

impl RoundInstructions {
    /// Parse a raw model reply. The reply may be a failure description from
    /// the client rather than JSON — that surfaces here as a parse error.
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Round response is not a valid instruction object")
    }

    /// Fold these instructions into the registry. Adds are applied before
    /// removes, matching the original protocol. Returns (added, removed)
    /// counts for logging.
    pub fn apply(&self, registry: &mut TopicRegistry) -> (usize, usize) {
        let mut added = 0;
        for label in &self.add {
            if registry.add(label).is_some() {
                added += 1;
            }
        }

        let mut removed = 0;
        for entry in &self.remove {
            if registry.remove(&entry.topic) {
                removed += 1;
            }
        }

        (added, removed)
    }
}
