//! Semsearch CLI - semantic search over the built-in sample corpus.
//!
//! # Usage
//!
//! ```bash
//! semsearch "healthy lifestyle tips"
//! semsearch "machine learning" -n 3 --json
//! semsearch --list
//!
//! # Keyword mode without loading the model
//! semsearch "renewable energy" --keyword-only
//! ```

mod config;
mod output;
mod search;

use anyhow::{bail, Context, Result};
use clap::Parser;
use semsearch_core::config::{DEFAULT_TOP_K, MAX_INTERACTIVE_TOP_K};
use semsearch_core::storage::{DocumentStore, InMemoryDocumentStore};
use std::future::Future;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Semantic search over a small document collection.
///
/// Uses all-MiniLM-L6-v2 embeddings when the model files are available and
/// falls back to keyword matching otherwise.
#[derive(Parser)]
#[command(name = "semsearch", version, about)]
struct Cli {
    /// Search query
    query: Option<String>,

    /// Number of results to return
    #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_K, value_parser = parse_limit)]
    limit: usize,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Skip the embedding model and use keyword search
    #[arg(long)]
    keyword_only: bool,

    /// Print the document collection and exit
    #[arg(long)]
    list: bool,

    /// Directory holding config.json, tokenizer.json and model.safetensors
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Seconds allowed for loading the model and encoding the corpus
    #[arg(long, default_value_t = 120)]
    build_timeout: u64,

    /// Return keyword results when a semantic query fails
    #[arg(long)]
    fallback_on_error: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_limit(s: &str) -> Result<usize, String> {
    let limit: usize = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if (1..=MAX_INTERACTIVE_TOP_K).contains(&limit) {
        Ok(limit)
    } else {
        Err(format!("must be between 1 and {MAX_INTERACTIVE_TOP_K}"))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.list {
        let store = InMemoryDocumentStore::sample();
        println!("{}", output::format_corpus_table(store.as_slice(), store.stats()));
        return Ok(());
    }

    let Some(query) = cli.query.as_deref() else {
        bail!("No search query provided. Use --help for usage information.");
    };

    block_on_detached(run_query(&cli, query))?
}

/// Runs `future` on a fresh runtime, then shuts the runtime down without
/// waiting on blocking tasks. An engine build abandoned after
/// `--build-timeout` keeps running on its thread and must not hold the
/// process open.
fn block_on_detached<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let output = runtime.block_on(future);
    runtime.shutdown_background();
    Ok(output)
}

async fn run_query(cli: &Cli, query: &str) -> Result<()> {
    let options = search::EngineOptions {
        keyword_only: cli.keyword_only,
        model_dir: cli.model_dir.clone(),
        build_timeout: Duration::from_secs(cli.build_timeout),
        fallback_on_error: cli.fallback_on_error,
    };
    let (engine, retrieval) = search::execute_search(query, cli.limit, &options).await?;

    let rendered = if cli.json {
        output::format_json(query, &retrieval)
    } else {
        let markers = if std::io::stdout().is_terminal() {
            output::Markers::ANSI
        } else {
            output::Markers::PLAIN
        };
        output::format_human(query, &retrieval, engine, markers)
    };
    println!("{}", rendered);

    Ok(())
}
