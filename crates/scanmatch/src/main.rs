//! scanmatch command line
//!
//! Looks up each query in OCR text and prints the closest match plus the
//! distance-1 and distance-2 candidates.
//!
//! ## Usage
//!
//! ```bash
//! scanmatch --text-file scan.txt --queries "invoice number, total amount"
//! ocr-tool page.png | scanmatch --queries quick,fox --format json
//! ```
//!
//! ## Configuration
//!
//! Environment variables:
//! - `SCANMATCH_WORKERS`: worker count (default: available cores)
//! - `SCANMATCH_MAX_WINDOW`: largest window size in words (default: 3)
//! - `SCANMATCH_DEADLINE_MS`: batch deadline (default: none)
//! - `RUST_LOG`: Logging filter (overrides `--log-level`)

use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use scanmatch::config::{self, Overrides};
use scanmatch::render::{self, Format};
use scanmatch::{Error, Result};
use scanmatch_core::{contexts, SearchEngine};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "scanmatch")]
#[command(about = "Fuzzy lookup of phrases in noisy OCR text")]
#[command(version)]
struct Args {
    /// File holding the OCR text (reads stdin when omitted)
    #[arg(short, long)]
    text_file: Option<PathBuf>,

    /// Comma-separated queries
    #[arg(short, long)]
    queries: String,

    /// JSON file with search options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Worker count
    #[arg(short, long)]
    workers: Option<usize>,

    /// Smallest window size, in words
    #[arg(long)]
    min_window: Option<usize>,

    /// Largest window size, in words
    #[arg(long)]
    max_window: Option<usize>,

    /// Batch deadline in milliseconds
    #[arg(long)]
    deadline_ms: Option<u64>,

    /// Scan each window size of a query in parallel
    #[arg(long)]
    split_windows: bool,

    /// Map OCR digit confusions (1->i, 0->o, 5->s) before scoring
    #[arg(long)]
    ocr_digits: bool,

    /// Print every occurrence of each closest match with surrounding text
    #[arg(long)]
    context: bool,

    /// Characters kept on each side of an occurrence
    #[arg(long, default_value_t = scanmatch_core::DEFAULT_CONTEXT_CHARS)]
    context_chars: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Log level (debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    /// Reject flag combinations clap cannot express
    fn validate(&self) -> Result<()> {
        if self.context && self.format != Format::Text {
            return Err(Error::Config(
                "--context is only supported with --format text".to_string(),
            ));
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    args.validate()?;

    scanmatch::tracing::init_with_filter(&args.log_level);

    let overrides = Overrides {
        workers: args.workers,
        min_window: args.min_window,
        max_window: args.max_window,
        deadline_ms: args.deadline_ms,
        split_windows: args.split_windows,
        ocr_digits: args.ocr_digits,
    };
    let options = config::resolve(args.config.as_deref(), &overrides)?;

    let queries = config::parse_queries(&args.queries);
    if queries.is_empty() {
        return Err(Error::Config("no queries given".to_string()));
    }

    let text = match &args.text_file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    info!(queries = queries.len(), bytes = text.len(), "starting search");

    let engine = SearchEngine::new(options)?;
    let report = engine.run_batch(&text, &queries)?;

    print!("{}", render::render(&report, args.format)?);

    if args.context {
        for (_, result) in report.iter() {
            if let Some(best) = result.closest_match.as_deref().filter(|b| !b.is_empty()) {
                let found = contexts(&text, best, args.context_chars);
                print!("{}", render::render_contexts(best, &found));
            }
        }
    }

    Ok(())
}
