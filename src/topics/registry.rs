// The topic registry — label → id mapping, the core state of the pipeline.
//
// Identifiers are increment-then-assign and never reused: removing a topic
// retires its id permanently, so a label that disappears and later comes
// back gets a fresh id. Because ids only grow, enumerating entries in id
// order reproduces discovery order without tracking insertion separately.

use std::collections::HashMap;

/// Evolving mapping of topic label to unique positive identifier.
///
/// Owned exclusively by one `TopicMiner`; created empty, mutated once per
/// round, read (never mutated) to build the consolidation prompt.
#[derive(Debug, Default, Clone)]
pub struct TopicRegistry {
    topics: HashMap<String, u64>,
    max_id: u64,
}

impl TopicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new topic and return its assigned id, or `None` if the
    /// label already exists (registry and counter both unchanged).
    pub fn add(&mut self, label: &str) -> Option<u64> {
        if self.topics.contains_key(label) {
            return None;
        }
        self.max_id += 1;
        self.topics.insert(label.to_string(), self.max_id);
        Some(self.max_id)
    }

    /// Remove a topic by label. Returns true if it was present.
    /// Removing an absent label is a no-op — the id counter never rewinds.
    pub fn remove(&mut self, label: &str) -> bool {
        self.topics.remove(label).is_some()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.topics.contains_key(label)
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.topics.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Highest id ever assigned (0 if nothing was ever added).
    pub fn last_assigned_id(&self) -> u64 {
        self.max_id
    }

    /// Surviving entries in discovery order (ascending id).
    pub fn entries(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self
            .topics
            .iter()
            .map(|(label, id)| (label.as_str(), *id))
            .collect();
        entries.sort_by_key(|(_, id)| *id);
        entries
    }

    /// Surviving labels in discovery order.
    pub fn labels(&self) -> Vec<&str> {
        self.entries().into_iter().map(|(label, _)| label).collect()
    }
}
