//! `aura-gemini query` command
//!
//! Searches an `.aura` archive by keyword overlap.
//!
//! # Usage
//! ```bash
//! aura-gemini query kb.aura retry policy timeout
//! aura-gemini query --limit 10 kb.aura "error handling"
//! aura-gemini query --format json kb.aura tokio
//! ```
//!
//! Options go before the archive; every word after it is part of the query.
//!
//! # Architecture
//! - Archive opened through the external loader (`core::loader`)
//! - Scanned once by `core::ranker`, then closed

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use crate::config::Config;
use crate::core::archive::Archive;
use crate::core::loader::{ArchiveLoader, PythonLoader};
use crate::core::ranker::{Query, Ranker, Ranking};

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Archive to search
    pub archive: PathBuf,

    /// Search words (joined with spaces)
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub query: Vec<String>,

    /// Maximum results shown (default: query.limit, 5)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

pub fn run(args: QueryArgs, config: &Config) -> Result<i32> {
    let loader = PythonLoader::new(&config.tools.python);
    let mut archive = loader.open(&args.archive)?;

    let query_text = args.query.join(" ");
    let ranker = Ranker::new().with_limit(args.limit.unwrap_or(config.query.limit));

    if args.format == OutputFormat::Pretty {
        println!(
            "🔍 Searching '{}' for: {}",
            args.archive.display(),
            query_text
        );
        println!("📦 Archive contains {} documents", archive.len());
        println!("{}", "-".repeat(60));
    }

    let ranking = search(&ranker, &query_text, archive.as_mut())?;

    match args.format {
        OutputFormat::Pretty => print!(
            "{}",
            render_pretty(&ranking, ranker.limit(), config.query.preview_chars)
        ),
        OutputFormat::Json => print_json(&args, &query_text, archive.len(), &ranking, config)?,
    }

    Ok(0)
}

/// Rank the archive, closing it whether or not the scan succeeds
pub fn search(ranker: &Ranker, query_text: &str, archive: &mut dyn Archive) -> Result<Ranking> {
    let query = Query::parse(query_text);
    let ranking = ranker.rank_archive(&query, archive);
    let closed = archive.close().context("Failed to close archive");
    let ranking = ranking.context("Failed to scan archive")?;
    closed?;
    Ok(ranking)
}

fn render_pretty(ranking: &Ranking, limit: usize, preview_chars: usize) -> String {
    if ranking.total_matches == 0 {
        return "No matching documents found.\n".to_string();
    }

    let mut out = String::new();
    for (i, result) in ranking.results.iter().enumerate() {
        out.push_str(&format!(
            "\n📄 [{}] {} (relevance: {})\n",
            i + 1,
            result.document.label(),
            result.score
        ));
        out.push_str(&format!("   {}...\n", result.document.preview(preview_chars)));
    }
    out.push_str(&format!(
        "\n✅ Found {} matching documents (showing top {})\n",
        ranking.total_matches, limit
    ));
    out
}

#[derive(Serialize)]
struct JsonHit<'a> {
    rank: usize,
    score: usize,
    id: &'a str,
    source: String,
    preview: String,
    metadata: &'a crate::core::document::Metadata,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    archive: String,
    query: &'a str,
    documents: usize,
    total_matches: usize,
    results: Vec<JsonHit<'a>>,
}

fn print_json(
    args: &QueryArgs,
    query_text: &str,
    documents: usize,
    ranking: &Ranking,
    config: &Config,
) -> Result<()> {
    let output = JsonOutput {
        archive: args.archive.display().to_string(),
        query: query_text,
        documents,
        total_matches: ranking.total_matches,
        results: ranking
            .results
            .iter()
            .enumerate()
            .map(|(i, r)| JsonHit {
                rank: i + 1,
                score: r.score,
                id: r.id(),
                source: r.document.label(),
                preview: r.document.preview(config.query.preview_chars),
                metadata: r.metadata(),
            })
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
