//! Errors from the analysis client.

use thiserror::Error;

use crate::analysis::{AnalysisError, ParseError, ValidationError};

/// Errors that can occur during an analysis or question request.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No usable API key was supplied at construction.
    #[error("API key is missing or empty")]
    MissingCredential,

    /// Document text was empty or whitespace.
    #[error("Document has no text content")]
    EmptyDocument,

    /// Document exceeds the configured size limit and the policy is `reject`.
    #[error("Document is {chars} characters, limit is {limit}")]
    ContentTooLarge { chars: usize, limit: usize },

    /// Request could not complete or the endpoint returned a non-success status.
    #[error("{}", transport_message(.status, .message))]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// The response envelope lacks candidate content.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

fn transport_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Gemini API error (HTTP {}): {}", code, message),
        None => format!("Connection error: {}", message),
    }
}

impl LlmError {
    pub(crate) fn connection(err: impl std::fmt::Display) -> Self {
        LlmError::Transport {
            status: None,
            message: err.to_string(),
        }
    }

    /// HTTP status carried by a transport failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether a retry could plausibly succeed.
    ///
    /// Only transport failures qualify: connection errors, 429 and 5xx.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Transport { status: None, .. } => true,
            LlmError::Transport {
                status: Some(code), ..
            } => *code == 429 || (500..600).contains(code),
            _ => false,
        }
    }
}

impl From<AnalysisError> for LlmError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Parse(e) => LlmError::Parse(e),
            AnalysisError::Validation(e) => LlmError::Validation(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(code: u16) -> LlmError {
        LlmError::Transport {
            status: Some(code),
            message: "boom".to_string(),
        }
    }

    #[test]
    fn retryable_statuses() {
        assert!(LlmError::connection("refused").is_retryable());
        assert!(http(429).is_retryable());
        assert!(http(503).is_retryable());
        assert!(!http(400).is_retryable());
        assert!(!http(403).is_retryable());
        assert!(!LlmError::MalformedResponse("x".into()).is_retryable());
        assert!(!LlmError::Parse(ParseError::NoJsonObject).is_retryable());
    }

    #[test]
    fn transport_display_includes_status() {
        assert_eq!(
            http(403).to_string(),
            "Gemini API error (HTTP 403): boom"
        );
        assert_eq!(
            LlmError::connection("dns failure").to_string(),
            "Connection error: dns failure"
        );
    }
}
