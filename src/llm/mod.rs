//! Generative-AI integration for document analysis and question answering.
//!
//! [`AnalysisClient`] talks to the Gemini `generateContent` endpoint.
//! Callers depend on the [`DocumentAnalyzer`] seam so wrappers such as
//! [`Retrying`] can be layered on without touching the client.

mod client;
mod credential;
mod error;
mod retry;

use async_trait::async_trait;

use crate::analysis::DocumentAnalysis;

pub use client::{
    build_analysis_prompt, build_question_prompt, AnalysisClient, GenerationSettings, LlmConfig,
    OversizePolicy,
};
pub use credential::ApiKey;
pub use error::LlmError;
pub use retry::{RetryPolicy, Retrying};

/// Anything that can analyze a document and answer questions about it.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    /// Produce a validated analysis record for `text`, labelled `label`.
    async fn analyze_document(&self, text: &str, label: &str)
        -> Result<DocumentAnalysis, LlmError>;

    /// Answer `question` from `text`, returning the model's reply unmodified.
    async fn ask_question(&self, question: &str, text: &str) -> Result<String, LlmError>;
}
