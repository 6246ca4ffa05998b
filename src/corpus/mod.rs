// Corpus input — CSV loading and batch sampling.
//
// The corpus arrives cleaned and lemmatized; this module only reads one
// named text column and hands out random batches. Pre-processing is an
// upstream concern.

use std::path::Path;

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use tracing::info;

/// Read the given text column from a CSV file, skipping empty cells.
/// The whole file is read once, before any round begins.
pub fn load(path: &Path, column: &str) -> Result<Vec<String>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open corpus file {}", path.display()))?;

    let headers = reader
        .headers()
        .context("Failed to read CSV headers")?
        .clone();
    let column_index = headers
        .iter()
        .position(|h| h == column)
        .with_context(|| format!("Column '{column}' not found in {}", path.display()))?;

    let mut tweets = Vec::new();
    for record in reader.records() {
        let record = record.context("Failed to read CSV record")?;
        if let Some(text) = record.get(column_index) {
            if !text.trim().is_empty() {
                tweets.push(text.to_string());
            }
        }
    }

    info!(
        count = tweets.len(),
        column = column,
        "Loaded corpus"
    );

    Ok(tweets)
}

/// Sample up to `size` tweets without replacement within the batch.
/// Sampling is not deterministic across rounds and the same tweet may
/// appear in multiple rounds' batches.
pub fn sample_batch(tweets: &[String], size: usize) -> Vec<String> {
    let mut rng = rand::thread_rng();
    tweets
        .choose_multiple(&mut rng, size)
        .cloned()
        .collect()
}
