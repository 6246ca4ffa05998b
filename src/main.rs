use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use gleaner::config::Config;

/// Gleaner: iterative LLM topic mining for tweet corpora.
///
/// Samples batches from a cleaned tweet corpus, asks an LLM for add/remove
/// topic decisions over several rounds, and consolidates the accumulated
/// registry into a fixed-size final list.
#[derive(Parser)]
#[command(name = "gleaner", version, about)]
struct Cli {
    /// CSV file containing the cleaned, lemmatized tweet corpus
    input: PathBuf,

    /// Name of the column holding the cleaned tweet text
    #[arg(long, default_value = "Lemmatized Cleaned Text")]
    column: String,

    /// Tweets sampled per extraction round
    #[arg(long, default_value = "500")]
    batch_size: usize,

    /// Number of extraction rounds
    #[arg(long, default_value = "3")]
    num_batches: usize,

    /// Size of the final consolidated topic list
    #[arg(long, default_value = "20")]
    final_count: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("gleaner=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = Config::load()?;
    config.require_api_key()?;

    let client = gleaner::llm::client::OpenAiClient::new(&config.api_key, &config.api_url)?;

    println!("Reading corpus from {}...", cli.input.display());
    let tweets = gleaner::corpus::load(&cli.input, &cli.column)?;
    println!("  {} tweets loaded", tweets.len());

    let settings = gleaner::topics::miner::MinerSettings {
        batch_size: cli.batch_size,
        num_batches: cli.num_batches,
        round_model: config.round_model,
        final_model: config.final_model,
        final_count: cli.final_count,
    };

    println!(
        "Mining topics ({} rounds of {} tweets)...",
        settings.num_batches, settings.batch_size
    );

    let mut miner = gleaner::topics::miner::TopicMiner::new(client, settings);
    miner.mine(&tweets).await?;

    gleaner::output::terminal::display_registry(miner.registry());

    println!(
        "Consolidating {} topics down to {}...",
        miner.registry().len(),
        cli.final_count
    );

    // Terminal step — a failure here ends the run with no final list
    let final_topics = miner.finalize().await?;

    gleaner::output::terminal::display_final_topics(&final_topics);
    println!("{}", "Topic mining complete.".bold());

    Ok(())
}
