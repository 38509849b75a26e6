//! Offline prompt preview.

use super::helpers::load_input;
use super::InputArgs;
use crate::cli::icons::notice;
use crate::config::Config;
use crate::llm::{build_analysis_prompt, build_question_prompt, OversizePolicy};

/// Print the prompt that `analyze` (or `ask`, with a question) would send.
///
/// The document is shown as loaded; the size limit is applied by the
/// client at request time.
pub async fn cmd_prompt(
    config: &Config,
    input: &InputArgs,
    question: Option<&str>,
) -> anyhow::Result<()> {
    let doc = load_input(input).await?;

    let chars = doc.text.chars().count();
    let limit = config.llm.max_content_chars;
    if chars > limit {
        let action = match config.llm.oversize {
            OversizePolicy::Truncate => "truncated",
            OversizePolicy::Reject => "rejected",
        };
        eprintln!(
            "{} Document is {} characters; requests will be {} (limit {})",
            notice(),
            chars,
            action,
            limit
        );
    }

    let prompt = match question {
        Some(q) => build_question_prompt(q, &doc.text),
        None => build_analysis_prompt(&doc.text, &doc.label),
    };
    println!("{}", prompt);
    Ok(())
}
