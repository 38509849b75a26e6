//! Configuration management commands.

use console::style;

use crate::cli::icons::{done, notice, pointer};
use crate::config::{Config, API_KEY_ENV};

/// Show the effective configuration with the API key redacted.
pub fn cmd_config_show(config: &Config, api_key: Option<&str>) -> anyhow::Result<()> {
    println!("\n{}", style("Configuration").bold());
    println!("{}", "-".repeat(40));
    println!("{:<20} {}", "Endpoint:", config.llm.endpoint);
    println!("{:<20} {}", "Model:", config.llm.model);
    println!(
        "{:<20} {}",
        "API Key:",
        match config.resolve_api_key(api_key) {
            Some(key) => key.redacted(),
            None => "Not set".to_string(),
        }
    );
    println!(
        "{:<20} {:.2} / {} tokens",
        "Analysis:", config.llm.analysis.temperature, config.llm.analysis.max_output_tokens
    );
    println!(
        "{:<20} {:.2} / {} tokens",
        "Questions:", config.llm.question.temperature, config.llm.question.max_output_tokens
    );
    println!(
        "{:<20} {} chars ({:?})",
        "Content limit:", config.llm.max_content_chars, config.llm.oversize
    );
    println!("{:<20} {}", "Max retries:", config.retry.max_retries);

    println!("\n{}", style("Effective config (TOML)").bold());
    println!("{}", "-".repeat(40));
    print!("{}", config.to_redacted_toml()?);

    if config.resolve_api_key(api_key).is_none() {
        eprintln!("\n{} Set {} to analyze documents", notice(), API_KEY_ENV);
    }
    Ok(())
}

/// Show which config file was loaded.
pub fn cmd_config_path(config: &Config) -> anyhow::Result<()> {
    match config.source_path {
        Some(ref path) => {
            println!("{} {}", done(), path.display());
        }
        None => {
            eprintln!(
                "{} No config file found; using defaults and environment",
                notice()
            );
            eprintln!(
                "  {} Create lexo.toml (or .yaml/.json) to configure",
                pointer()
            );
        }
    }
    Ok(())
}
