//! Chatbridge - ask OpenAI, Claude or Gemini from one command line
//!
//! A thin operator CLI over chatbridge-core:
//! - List the model catalog
//! - Classify a model identifier
//! - Ask a one-shot question, optionally streamed or with images

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use chatbridge_core::{paths, AiConfig};

mod commands;

/// Chatbridge - multi-provider AI routing
#[derive(Parser, Debug)]
#[command(name = "chatbridge")]
#[command(about = "Route chat requests to OpenAI, Claude or Gemini", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ~/.chatbridge/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to ~/.chatbridge/logs/chatbridge.log instead of stderr
    #[arg(long, global = true)]
    log_file: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available models
    Models {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which provider serves a model id
    Classify { model: String },

    /// Send one prompt and print the reply
    Ask {
        /// Model id (e.g. gpt-4, claude-3-haiku-20240307, gemini-1.5-flash)
        #[arg(short, long, default_value = chatbridge_core::constants::ai::DEFAULT_OPENAI_MODEL)]
        model: String,

        /// Output token cap
        #[arg(long, default_value_t = chatbridge_core::constants::ai::DEFAULT_MAX_TOKENS)]
        max_tokens: u32,

        /// Sampling temperature
        #[arg(long, default_value_t = chatbridge_core::constants::ai::DEFAULT_TEMPERATURE)]
        temperature: f32,

        /// Image file path or http(s) URL; repeatable
        #[arg(long = "image")]
        images: Vec<String>,

        /// Print the reply as it arrives (OpenAI models only)
        #[arg(long)]
        stream: bool,

        /// Print token usage after the reply
        #[arg(short, long)]
        verbose: bool,

        /// The question to ask
        prompt: String,
    },
}

fn init_logging(to_file: bool) {
    let filter = || {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into())
    };

    if to_file {
        let log_dir = paths::logs_dir();
        std::fs::create_dir_all(&log_dir).ok();
        match std::fs::File::create(log_dir.join("chatbridge.log")) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter())
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false)
                    .init();
                return;
            }
            Err(e) => eprintln!("Cannot open log file, logging to stderr: {}", e),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<AiConfig> {
    match path {
        Some(path) => AiConfig::load_from_path(path),
        None => AiConfig::load(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file);

    match cli.command {
        Commands::Classify { model } => commands::classify(&model),
        Commands::Models { json } => {
            let config = load_config(cli.config.as_ref())?;
            commands::models(&config, json)
        }
        Commands::Ask {
            model,
            max_tokens,
            temperature,
            images,
            stream,
            verbose,
            prompt,
        } => {
            let config = load_config(cli.config.as_ref())?;
            let request = commands::AskRequest {
                model,
                prompt,
                images,
                max_tokens,
                temperature,
                stream,
                verbose,
            };
            commands::ask(&config, request).await
        }
    }
}
