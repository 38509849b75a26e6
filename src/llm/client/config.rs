//! Analysis client configuration.

use serde::{Deserialize, Serialize};

/// What to do with a document longer than `max_content_chars`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OversizePolicy {
    /// Keep the first `max_content_chars` characters (default).
    #[default]
    Truncate,
    /// Fail before sending anything.
    Reject,
}

impl OversizePolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "truncate" => Some(Self::Truncate),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

/// Generation knobs sent with one kind of request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Temperature for generation (0.0 - 1.0)
    pub temperature: f32,
    /// Maximum tokens in response
    pub max_output_tokens: u32,
}

/// Configuration for the analysis client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API base URL (default: https://generativelanguage.googleapis.com/v1beta)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Model to use (default: gemini-1.5-flash-latest)
    #[serde(default = "default_model")]
    pub model: String,
    /// Generation settings for structured document analysis
    #[serde(default = "default_analysis_generation")]
    pub analysis: GenerationSettings,
    /// Generation settings for free-text questions
    #[serde(default = "default_question_generation")]
    pub question: GenerationSettings,
    /// Maximum characters of document content to send
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
    /// Behaviour for documents over `max_content_chars`
    #[serde(default)]
    pub oversize: OversizePolicy,
    /// Request timeout in seconds; unset leaves cancellation to the transport
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash-latest".to_string()
}

fn default_analysis_generation() -> GenerationSettings {
    GenerationSettings {
        temperature: 0.2,
        max_output_tokens: 4096,
    }
}

fn default_question_generation() -> GenerationSettings {
    GenerationSettings {
        temperature: 0.3,
        max_output_tokens: 1024,
    }
}

fn default_max_content_chars() -> usize {
    100_000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl LlmConfig {
    /// Base default without env overrides.
    pub fn base_default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            analysis: default_analysis_generation(),
            question: default_question_generation(),
            max_content_chars: default_max_content_chars(),
            oversize: OversizePolicy::default(),
            timeout_secs: None,
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `LEXO_ENDPOINT`: API base URL
    /// - `LEXO_MODEL`: Model name
    /// - `LEXO_TEMPERATURE`: Temperature for analysis requests
    /// - `LEXO_MAX_OUTPUT_TOKENS`: Output limit for analysis requests
    /// - `LEXO_MAX_CONTENT_CHARS`: Max document chars to send
    /// - `LEXO_OVERSIZE`: "truncate" or "reject"
    /// - `LEXO_TIMEOUT_SECS`: Request timeout
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("LEXO_ENDPOINT") {
            self.endpoint = val;
        }
        if let Ok(val) = std::env::var("LEXO_MODEL") {
            self.model = val;
        }
        if let Ok(val) = std::env::var("LEXO_TEMPERATURE") {
            if let Ok(t) = val.parse() {
                self.analysis.temperature = t;
            }
        }
        if let Ok(val) = std::env::var("LEXO_MAX_OUTPUT_TOKENS") {
            if let Ok(n) = val.parse() {
                self.analysis.max_output_tokens = n;
            }
        }
        if let Ok(val) = std::env::var("LEXO_MAX_CONTENT_CHARS") {
            if let Ok(n) = val.parse() {
                self.max_content_chars = n;
            }
        }
        if let Ok(val) = std::env::var("LEXO_OVERSIZE") {
            if let Some(policy) = OversizePolicy::from_str(&val) {
                self.oversize = policy;
            }
        }
        if let Ok(val) = std::env::var("LEXO_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.timeout_secs = Some(n);
            }
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_max_content_chars(mut self, max: usize) -> Self {
        self.max_content_chars = max;
        self
    }

    pub fn with_oversize(mut self, policy: OversizePolicy) -> Self {
        self.oversize = policy;
        self
    }

    /// Full `generateContent` URL for the configured model (without the key).
    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_defaults_match_generation_knobs() {
        let config = LlmConfig::base_default();
        assert_eq!(config.analysis.temperature, 0.2);
        assert_eq!(config.analysis.max_output_tokens, 4096);
        assert_eq!(config.question.temperature, 0.3);
        assert_eq!(config.question.max_output_tokens, 1024);
        assert_eq!(config.oversize, OversizePolicy::Truncate);
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn generate_url_joins_endpoint_and_model() {
        let config = LlmConfig::base_default()
            .with_endpoint("http://127.0.0.1:9000/v1beta/")
            .with_model("gemini-test");
        assert_eq!(
            config.generate_url(),
            "http://127.0.0.1:9000/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: LlmConfig = toml::from_str(
            r#"
            model = "gemini-1.5-pro"
            oversize = "reject"

            [question]
            temperature = 0.0
            max_output_tokens = 256
            "#,
        )
        .unwrap();

        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.oversize, OversizePolicy::Reject);
        assert_eq!(config.question.max_output_tokens, 256);
        assert_eq!(config.analysis.max_output_tokens, 4096);
        assert_eq!(config.max_content_chars, 100_000);
    }

    #[test]
    fn oversize_policy_from_str() {
        assert_eq!(OversizePolicy::from_str("REJECT"), Some(OversizePolicy::Reject));
        assert_eq!(OversizePolicy::from_str("truncate"), Some(OversizePolicy::Truncate));
        assert_eq!(OversizePolicy::from_str("summarize"), None);
    }
}
