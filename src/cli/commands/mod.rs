//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod ask;
mod config_cmd;
mod helpers;
mod prompt;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Config, LoadOptions};

#[derive(Parser)]
#[command(name = "lexo")]
#[command(about = "Structured document analysis with a generative-AI model")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// API key (defaults to GEMINI_API_KEY, then the config file)
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

/// Where document text comes from.
#[derive(clap::Args, Debug, Clone)]
pub struct InputArgs {
    /// File path, URL (with --url) or "-" for stdin
    input: String,

    /// Treat INPUT as a URL and fetch it
    #[arg(long)]
    url: bool,

    /// Label to send with the document (defaults to file name or URL)
    #[arg(long)]
    label: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a document: abstract, summary, entities, sentiment, timeline, Q&A
    Analyze {
        #[command(flatten)]
        input: InputArgs,
        /// Print the analysis as JSON instead of tiles
        #[arg(long)]
        json: bool,
        /// Retry transient failures up to N times (overrides config)
        #[arg(long)]
        retries: Option<u32>,
    },

    /// Ask a question about a document
    Ask {
        #[command(flatten)]
        input: InputArgs,
        /// The question to answer from the document
        question: String,
        /// Retry transient failures up to N times (overrides config)
        #[arg(long)]
        retries: Option<u32>,
    },

    /// Print the prompt that would be sent, without calling the API
    Prompt {
        #[command(flatten)]
        input: InputArgs,
        /// Show the question prompt for this question instead
        #[arg(long)]
        question: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration (API key redacted)
    Show,
    /// Show which config file was loaded
    Path,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
    };
    let mut config = Config::load_with_options(&options).await?;

    match cli.command {
        Commands::Analyze {
            input,
            json,
            retries,
        } => {
            if let Some(n) = retries {
                config.retry.max_retries = n;
            }
            analyze::cmd_analyze(&config, cli.api_key.as_deref(), &input, json).await
        }
        Commands::Ask {
            input,
            question,
            retries,
        } => {
            if let Some(n) = retries {
                config.retry.max_retries = n;
            }
            ask::cmd_ask(&config, cli.api_key.as_deref(), &input, &question).await
        }
        Commands::Prompt { input, question } => {
            prompt::cmd_prompt(&config, &input, question.as_deref()).await
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => config_cmd::cmd_config_show(&config, cli.api_key.as_deref()),
            ConfigCommands::Path => config_cmd::cmd_config_path(&config),
        },
    }
}
