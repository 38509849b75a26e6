//! Lexo - structured document analysis with a generative-AI model.
//!
//! Sends a document to the Gemini `generateContent` API with a fixed
//! instruction prompt, extracts the JSON object from the free-form reply
//! and validates it into a [`analysis::DocumentAnalysis`].

pub mod analysis;
pub mod cli;
pub mod config;
pub mod llm;
pub mod source;

pub use analysis::DocumentAnalysis;
pub use llm::{AnalysisClient, ApiKey, DocumentAnalyzer, LlmConfig, LlmError};
