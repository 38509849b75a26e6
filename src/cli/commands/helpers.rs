//! Shared helper functions for CLI commands.

use std::path::Path;

use anyhow::Context;

use super::InputArgs;
use crate::config::{Config, API_KEY_ENV};
use crate::llm::{AnalysisClient, DocumentAnalyzer, Retrying};
use crate::source::{self, SourceDocument};

/// Load document text for the given input arguments.
pub async fn load_input(args: &InputArgs) -> anyhow::Result<SourceDocument> {
    let mut doc = if args.url {
        let client = reqwest::Client::new();
        source::fetch_url(&client, &args.input)
            .await
            .with_context(|| format!("Failed to load {}", args.input))?
    } else if args.input == "-" {
        source::read_stdin(args.label.as_deref().unwrap_or("stdin"))
            .await
            .context("Failed to read stdin")?
    } else {
        source::load_file(Path::new(&args.input))
            .await
            .with_context(|| format!("Failed to load {}", args.input))?
    };

    if let Some(ref label) = args.label {
        doc.label = label.clone();
    }
    Ok(doc)
}

/// Build the analyzer: the client, wrapped in a retry policy if one is set.
pub fn build_analyzer(
    config: &Config,
    api_key: Option<&str>,
) -> anyhow::Result<Box<dyn DocumentAnalyzer>> {
    let key = config.resolve_api_key(api_key).with_context(|| {
        format!(
            "No API key configured. Set {} or pass --api-key.\n\
             Get a Gemini API key from https://aistudio.google.com/app/apikey",
            API_KEY_ENV
        )
    })?;

    let client = AnalysisClient::new(config.llm.clone(), key)?;
    if config.retry.is_enabled() {
        Ok(Box::new(Retrying::new(client, config.retry)))
    } else {
        Ok(Box::new(client))
    }
}
