//! Analysis client for Google's Generative Language API.
//!
//! One call to [`AnalysisClient::analyze_document`] or
//! [`AnalysisClient::ask_question`] issues exactly one `generateContent`
//! request. There is no retry, backoff or deduplication here; see
//! [`crate::llm::Retrying`] for an opt-in wrapper.

mod config;
mod prompts;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub use config::{GenerationSettings, LlmConfig, OversizePolicy};
pub use prompts::{build_analysis_prompt, build_question_prompt};

use super::{ApiKey, DocumentAnalyzer, LlmError};
use crate::analysis::{parse_analysis, DocumentAnalysis};

/// Client that turns document text into a [`DocumentAnalysis`].
pub struct AnalysisClient {
    config: LlmConfig,
    api_key: ApiKey,
    client: Client,
}

/// `generateContent` request body.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

/// `generateContent` response envelope.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Error body returned alongside non-success statuses.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

impl AnalysisClient {
    /// Create a client. Fails if the key is empty.
    pub fn new(config: LlmConfig, api_key: ApiKey) -> Result<Self, LlmError> {
        if api_key.is_empty() {
            return Err(LlmError::MissingCredential);
        }

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build().map_err(LlmError::connection)?;

        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    /// Get the config.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Analyze a document and return the validated analysis record.
    pub async fn analyze_document(
        &self,
        text: &str,
        label: &str,
    ) -> Result<DocumentAnalysis, LlmError> {
        let content = self.prepare_content(text, label)?;
        let prompt = build_analysis_prompt(content, label);

        info!("Analyzing document: {}", label);
        let reply = self.generate(&prompt, self.config.analysis).await?;

        let analysis = parse_analysis(&reply).map_err(|e| {
            debug!("Unparseable reply for {}: {}", label, reply);
            LlmError::from(e)
        })?;

        info!(
            "Analysis complete for {}: {} keywords, {} entities, {} sections",
            label,
            analysis.keywords.len(),
            analysis.entities.len(),
            analysis.sections.len()
        );
        Ok(analysis)
    }

    /// Answer a question about a document. The reply text is returned as-is.
    pub async fn ask_question(&self, question: &str, text: &str) -> Result<String, LlmError> {
        let content = self.prepare_content(text, "question context")?;
        let prompt = build_question_prompt(question, content);

        debug!("Asking question: {}", question);
        self.generate(&prompt, self.config.question).await
    }

    /// Apply the empty-text check and the oversize policy.
    fn prepare_content<'a>(&self, text: &'a str, label: &str) -> Result<&'a str, LlmError> {
        if text.trim().is_empty() {
            return Err(LlmError::EmptyDocument);
        }

        let limit = self.config.max_content_chars;
        let Some((cut, _)) = text.char_indices().nth(limit) else {
            return Ok(text);
        };

        match self.config.oversize {
            OversizePolicy::Truncate => {
                warn!(
                    "{} exceeds {} characters, truncating before analysis",
                    label, limit
                );
                Ok(&text[..cut])
            }
            OversizePolicy::Reject => Err(LlmError::ContentTooLarge {
                chars: text.chars().count(),
                limit,
            }),
        }
    }

    /// POST one prompt and return the first candidate's text.
    async fn generate(
        &self,
        prompt: &str,
        settings: GenerationSettings,
    ) -> Result<String, LlmError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: settings.temperature,
                max_output_tokens: settings.max_output_tokens,
            },
        };

        let url = self.config.generate_url();
        debug!(
            "POST {} (key {}, {} byte prompt)",
            url,
            self.api_key.redacted(),
            prompt.len()
        );

        let resp = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.expose())])
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::connection(e.without_url()))?;

        let status = resp.status();
        debug!("Gemini API response status: {}", status);

        let body = resp
            .text()
            .await
            .map_err(|e| LlmError::connection(e.without_url()))?;

        if !status.is_success() {
            return Err(LlmError::Transport {
                status: Some(status.as_u16()),
                message: upstream_error_message(status, &body),
            });
        }

        extract_candidate_text(&body)
    }
}

#[async_trait]
impl DocumentAnalyzer for AnalysisClient {
    async fn analyze_document(
        &self,
        text: &str,
        label: &str,
    ) -> Result<DocumentAnalysis, LlmError> {
        AnalysisClient::analyze_document(self, text, label).await
    }

    async fn ask_question(&self, question: &str, text: &str) -> Result<String, LlmError> {
        AnalysisClient::ask_question(self, question, text).await
    }
}

/// Message for a non-success response: the API's own message if present,
/// otherwise the status reason.
fn upstream_error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error)
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown status")
                .to_string()
        })
}

/// Pull `candidates[0].content.parts[0].text` out of a success body.
fn extract_candidate_text(body: &str) -> Result<String, LlmError> {
    let envelope: GenerateResponse = serde_json::from_str(body).map_err(|e| {
        LlmError::MalformedResponse(format!("response is not a JSON envelope: {}", e))
    })?;

    let candidate = envelope.candidates.and_then(|c| c.into_iter().next());
    let Some(candidate) = candidate else {
        if let Some(message) = envelope.error.and_then(|e| e.message) {
            return Err(LlmError::Transport {
                status: None,
                message,
            });
        }
        return Err(LlmError::MalformedResponse(
            "no candidates in response".to_string(),
        ));
    };

    candidate
        .content
        .and_then(|c| c.parts)
        .and_then(|p| p.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| LlmError::MalformedResponse("candidate has no text content".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(config: LlmConfig) -> AnalysisClient {
        AnalysisClient::new(config, ApiKey::new("test-key")).unwrap()
    }

    #[test]
    fn rejects_empty_credential() {
        let result = AnalysisClient::new(LlmConfig::base_default(), ApiKey::new("  "));
        assert!(matches!(result, Err(LlmError::MissingCredential)));
    }

    #[test]
    fn request_body_matches_wire_format() {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: "hello" }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.25,
                max_output_tokens: 4096,
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(value["generationConfig"]["temperature"], 0.25);
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 4096);
    }

    #[test]
    fn candidate_text_is_returned_verbatim() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"  {not json} \n"}]}}]}"#;
        assert_eq!(extract_candidate_text(body).unwrap(), "  {not json} \n");
    }

    #[test]
    fn empty_candidate_text_is_not_an_error() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":""}]}}]}"#;
        assert_eq!(extract_candidate_text(body).unwrap(), "");
    }

    #[test]
    fn missing_candidates_is_malformed() {
        for body in [
            r#"{}"#,
            r#"{"candidates":[]}"#,
            r#"{"candidates":[{"finishReason":"SAFETY"}]}"#,
            r#"{"candidates":[{"content":{"role":"model"}}]}"#,
            r#"{"candidates":[{"content":{"parts":[{}]}}]}"#,
            "<html>gateway</html>",
        ] {
            assert!(
                matches!(extract_candidate_text(body), Err(LlmError::MalformedResponse(_))),
                "body: {body}"
            );
        }
    }

    #[test]
    fn error_envelope_without_candidates_is_transport() {
        let body = r#"{"error":{"message":"quota exhausted"}}"#;
        match extract_candidate_text(body) {
            Err(LlmError::Transport { message, .. }) => assert_eq!(message, "quota exhausted"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn upstream_message_prefers_api_error() {
        let msg = upstream_error_message(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"code":400,"message":"API key not valid."}}"#,
        );
        assert_eq!(msg, "API key not valid.");

        let msg = upstream_error_message(StatusCode::SERVICE_UNAVAILABLE, "upstream down");
        assert_eq!(msg, "Service Unavailable");
    }

    #[test]
    fn short_content_passes_through() {
        let c = client(LlmConfig::base_default().with_max_content_chars(10));
        assert_eq!(c.prepare_content("0123456789", "doc").unwrap(), "0123456789");
    }

    #[test]
    fn oversized_content_is_truncated_on_char_boundary() {
        let c = client(LlmConfig::base_default().with_max_content_chars(3));
        assert_eq!(c.prepare_content("héllo wörld", "doc").unwrap(), "hél");
    }

    #[test]
    fn oversized_content_rejected_under_reject_policy() {
        let c = client(
            LlmConfig::base_default()
                .with_max_content_chars(4)
                .with_oversize(OversizePolicy::Reject),
        );
        match c.prepare_content("ünïcode", "doc") {
            Err(LlmError::ContentTooLarge { chars, limit }) => {
                assert_eq!(chars, 7);
                assert_eq!(limit, 4);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn whitespace_document_is_rejected() {
        let c = client(LlmConfig::base_default());
        assert!(matches!(
            c.prepare_content(" \n\t ", "doc"),
            Err(LlmError::EmptyDocument)
        ));
    }
}
