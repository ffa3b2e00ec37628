//! `timeline` CLI — expand event definitions and replay live-feed deltas
//! from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Expand definitions over a window (stdin → stdout)
//! echo '[{"id":"e2","startTime":"2024-03-05T09:00:00Z"}]' \
//!   | timeline expand --from 2024-03-01 --to 2024-03-31
//!
//! # Expand a saved bulk-fetch body, chronologically sorted
//! timeline expand --from 2024-01-01 --to 2024-01-31 -i events.json --sort
//!
//! # Replay a delta log against a definition set
//! timeline apply --from 2024-03-01 --to 2024-03-31 -i events.json \
//!   --deltas feed.ndjson
//! ```
//!
//! Set `RUST_LOG=timeline_engine=warn` to see dropped-record warnings on
//! stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use timeline_engine::wire::require_instant;
use timeline_engine::{expand, Delta, DisplaySet, EventDefinition, FetchResponse, RawEventDefinition};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "timeline",
    version,
    about = "Event timeline materialization CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand definitions into occurrences for a display window
    Expand {
        /// Window start (ISO-8601 instant or bare date)
        #[arg(long)]
        from: String,
        /// Window end (ISO-8601 instant or bare date)
        #[arg(long)]
        to: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Sort occurrences chronologically (the engine emits input order)
        #[arg(long)]
        sort: bool,
    },
    /// Apply a newline-delimited feed-message log to a definition set
    Apply {
        /// Window start (ISO-8601 instant or bare date)
        #[arg(long)]
        from: String,
        /// Window end (ISO-8601 instant or bare date)
        #[arg(long)]
        to: String,
        /// Input file with the starting definitions (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// File of newline-delimited JSON feed messages
        #[arg(long)]
        deltas: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Expand {
            from,
            to,
            input,
            output,
            sort,
        } => {
            let range_start = require_instant(&from).context("--from")?;
            let range_end = require_instant(&to).context("--to")?;
            let definitions = parse_definitions(&read_input(input.as_deref())?)?;

            let mut occurrences = expand(&definitions, range_start, range_end);
            if sort {
                occurrences.sort_by(|a, b| {
                    a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id))
                });
            }

            write_output(output.as_deref(), &serde_json::to_string_pretty(&occurrences)?)
        }
        Commands::Apply {
            from,
            to,
            input,
            output,
            deltas,
        } => {
            let range_start = require_instant(&from).context("--from")?;
            let range_end = require_instant(&to).context("--to")?;

            let mut set = DisplaySet::new();
            set.load(parse_definitions(&read_input(input.as_deref())?)?);

            for delta in read_deltas(&deltas)? {
                set.apply(delta, range_start, range_end);
            }

            let mut definitions = set.snapshot();
            definitions.sort_by(|a, b| a.id.cmp(&b.id));
            write_output(output.as_deref(), &serde_json::to_string_pretty(&definitions)?)
        }
    }
}

/// Accept either a saved bulk-fetch body (`{"events": [...]}`) or a bare
/// JSON array of definition records. Corrupt records are dropped with a
/// warning, matching the engine's boundary policy.
fn parse_definitions(json: &str) -> Result<Vec<EventDefinition>> {
    if let Ok(response) = serde_json::from_str::<FetchResponse>(json) {
        return Ok(response.into_definitions());
    }

    let raw: Vec<RawEventDefinition> = serde_json::from_str(json)
        .context("input is neither a bulk-fetch body nor a definition array")?;
    Ok(raw
        .into_iter()
        .filter_map(RawEventDefinition::into_definition)
        .collect())
}

/// Read a newline-delimited feed-message log. Blank lines are skipped;
/// messages with unrecognized types map to no delta and are dropped.
fn read_deltas(path: &str) -> Result<Vec<Delta>> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read delta log '{}'", path))?;

    let mut parsed = Vec::new();
    for (lineno, line) in body.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let message = timeline_engine::wire::decode_feed_message(line)
            .with_context(|| format!("{}:{}", path, lineno + 1))?;
        if let Some(delta) = message.into_delta() {
            parsed.push(delta);
        }
    }
    Ok(parsed)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(p) => {
            std::fs::read_to_string(p).with_context(|| format!("failed to read input file '{}'", p))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(p) => std::fs::write(p, content)
            .with_context(|| format!("failed to write output file '{}'", p)),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}
