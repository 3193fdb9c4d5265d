//! persona-generate CLI: spot-check a persona adapter with one sample reply.
//!
//! Usage:
//!   cargo run -p persona-generate -- [--config persona.toml] [--prompt "..."] [--context "..."]
//!
//! Backend, endpoint, adapter and sampling come from config (`[generation]`) or
//! `PERSONA_GENERATION__*` env vars. The reply is printed to stdout.

use clap::Parser;
use persona_core::{GenerationBackend, PersonaConfig};
use persona_generate::{create_generator, generate_sample};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "persona-generate", about = "Generate one sample reply from a persona-tuned model")]
struct Args {
    /// Config file (TOML). Defaults to PERSONA_CONFIG or config/persona if present.
    #[arg(long, env = "PERSONA_CONFIG")]
    config: Option<PathBuf>,

    /// Prompt to answer (defaults to the configured sample prompt).
    #[arg(long)]
    prompt: Option<String>,

    /// Persona context sent ahead of the prompt.
    #[arg(long)]
    context: Option<String>,

    /// Use the placeholder backend regardless of config.
    #[arg(long)]
    placeholder: bool,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[persona-generate] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = PersonaConfig::load_from(args.config.as_deref())?;
    if let Some(prompt) = args.prompt {
        config.generation.prompt = prompt;
    }
    if let Some(context) = args.context {
        config.generation.system_context = context;
    }
    if args.placeholder {
        config.generation.backend = GenerationBackend::Placeholder;
    }
    config.validate()?;

    if args.dump_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let generator = create_generator(&config.generation)?;
    info!(prompt = %config.generation.prompt, "generating sample reply");
    let reply = generate_sample(generator.as_ref(), &config.generation)?;
    println!("{}", reply);
    Ok(())
}
