//! Question answering command.

use super::helpers::{build_analyzer, load_input};
use super::InputArgs;
use crate::config::Config;

/// Ask a question about a document and print the raw answer.
pub async fn cmd_ask(
    config: &Config,
    api_key: Option<&str>,
    input: &InputArgs,
    question: &str,
) -> anyhow::Result<()> {
    let analyzer = build_analyzer(config, api_key)?;
    let doc = load_input(input).await?;

    let answer = analyzer.ask_question(question, &doc.text).await?;
    println!("{}", answer);
    Ok(())
}
