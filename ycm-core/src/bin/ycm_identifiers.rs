//! Rank identifiers from source files and tag files against a query.
//!
//! Usage:
//!     cargo run --release --bin ycm-identifiers -- -f cpp -t tags fo src/*.cpp
//!     cargo run --release --bin ycm-identifiers -- --paths main $(git ls-files)

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use ycm_core::logging::init_logging;
use ycm_core::{CompleterConfig, IdentifierCompleter, IdentifierCompleterApi};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Query to rank against
    query: String,

    /// Source files to collect identifiers from (or paths to score with --paths)
    files: Vec<String>,

    /// Filetype the files are stored under
    #[arg(short, long, default_value = "")]
    filetype: String,

    /// ctags files to load
    #[arg(short, long)]
    tags: Vec<String>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Maximum number of results (defaults to the configured max_results)
    #[arg(short, long)]
    max: Option<u32>,

    /// Also collect identifiers inside comments and string literals
    #[arg(long)]
    collect_from_comments: bool,

    /// Score FILES as paths instead of reading them
    #[arg(long)]
    paths: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => CompleterConfig::load(path).with_context(|| format!("Failed to load config {}", path))?,
        None => CompleterConfig::default(),
    };
    init_logging(&config.log_filter);

    let max = args.max.unwrap_or(config.max_results as u32);
    let completer = IdentifierCompleter::with_config(config);

    if args.paths {
        for scored in completer.score_paths(args.files, args.query, max) {
            println!("{:.4}\t{}", scored.score, scored.path);
        }
        return Ok(());
    }

    for file in &args.files {
        let buffer = fs::read(file).with_context(|| format!("Failed to read {}", file))?;
        completer.add_identifiers_to_database_from_buffer(
            args.filetype.clone(),
            file.clone(),
            String::from_utf8_lossy(&buffer).into_owned(),
            args.collect_from_comments,
        );
    }

    if !args.tags.is_empty() {
        let added = completer.add_identifiers_to_database_from_tag_files(args.tags.clone());
        tracing::info!(added, "loaded tag files");
    }

    let results = completer
        .query_async(args.query, args.filetype, max)
        .await
        .context("Query failed")?;
    for identifier in results {
        println!("{}", identifier);
    }
    Ok(())
}
