//! Document analysis command.

use console::style;

use super::helpers::{build_analyzer, load_input};
use super::InputArgs;
use crate::cli::icons::done;
use crate::cli::render::render_analysis;
use crate::config::Config;

/// Analyze a document and print the result.
pub async fn cmd_analyze(
    config: &Config,
    api_key: Option<&str>,
    input: &InputArgs,
    json: bool,
) -> anyhow::Result<()> {
    let analyzer = build_analyzer(config, api_key)?;
    let doc = load_input(input).await?;

    if !json {
        eprintln!(
            "{} Analyzing {} ({} characters)...",
            style("→").cyan(),
            doc.label,
            doc.text.chars().count()
        );
    }

    let analysis = analyzer.analyze_document(&doc.text, &doc.label).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        eprintln!("{} Analysis complete", done());
        print!("{}", render_analysis(&analysis, &doc.label));
    }

    Ok(())
}
