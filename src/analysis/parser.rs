//! Extracts the JSON object from a free-text model reply.

use thiserror::Error;
use tracing::debug;

use super::validate::decode_analysis;
use super::{AnalysisError, DocumentAnalysis};

/// Errors locating or reading the JSON object in a reply.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("No JSON object found in model reply")]
    NoJsonObject,

    #[error("Invalid JSON in model reply: {0}")]
    Json(#[from] serde_json::Error),
}

/// Locate the JSON span in a reply: first `{` through last `}`, inclusive.
///
/// Greedy on purpose so prose before and after the object is ignored. A
/// reply containing several brace-delimited fragments yields the span
/// covering all of them, which then fails to parse.
pub fn extract_json_span(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&reply[start..=end])
}

/// Parse a model reply into a validated [`DocumentAnalysis`].
pub fn parse_analysis(reply: &str) -> Result<DocumentAnalysis, AnalysisError> {
    let span = extract_json_span(reply).ok_or(ParseError::NoJsonObject)?;
    debug!(
        "Extracted {} byte JSON span from {} byte reply",
        span.len(),
        reply.len()
    );

    let value: serde_json::Value = serde_json::from_str(span).map_err(ParseError::Json)?;
    Ok(decode_analysis(value)?)
}
