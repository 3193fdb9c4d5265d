//! persona-dataset CLI: build an SFT dataset from a dialogue transcript.
//!
//! Usage:
//!   cargo run -p persona-dataset -- [--config persona.toml] [--input t.jsonl] [--output out.json] [--speaker 孔明]
//!
//! Reads every line of the transcript, pairs each line answered by the target speaker with
//! that speaker's (merged) reply, and writes the pairs as a JSON array.

use clap::Parser;
use persona_core::PersonaConfig;
use persona_dataset::build_dataset;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "persona-dataset", about = "Extract one speaker's instruction/response pairs from a transcript")]
struct Args {
    /// Config file (TOML). Defaults to PERSONA_CONFIG or config/persona if present.
    #[arg(long, env = "PERSONA_CONFIG")]
    config: Option<PathBuf>,

    /// Line-delimited transcript to read.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Dataset file to write.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Speaker whose lines become responses.
    #[arg(long)]
    speaker: Option<String>,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[persona-dataset] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = PersonaConfig::load_from(args.config.as_deref())?;
    if let Some(input) = args.input {
        config.dataset.input_path = input;
    }
    if let Some(output) = args.output {
        config.dataset.output_path = output;
    }
    if let Some(speaker) = args.speaker {
        config.dataset.target_speaker = speaker;
    }
    config.validate()?;

    if args.dump_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let summary = build_dataset(&config.dataset)?;
    info!(
        "Done: {} pairs for {} written to {}",
        summary.segments.pairs,
        summary.target_speaker,
        summary.output_path.display()
    );
    if !summary.parse.malformed.is_empty() {
        info!(
            "{} malformed line(s) skipped (first at line {})",
            summary.parse.malformed.len(),
            summary.parse.malformed[0].line
        );
    }
    Ok(())
}
