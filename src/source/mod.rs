//! Document text sources.
//!
//! Turns a file, a URL or stdin into plain text plus a label for the
//! analysis client. Binary formats such as PDF or DOCX are detected and
//! refused rather than parsed.

mod html;

use std::path::Path;

use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

pub use html::extract_text as html_to_text;

/// Largest document accepted from any source (50 MB).
pub const MAX_DOCUMENT_BYTES: u64 = 50 * 1024 * 1024;

/// Text obtained from a source, ready for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// File name, URL or caller-supplied label.
    pub label: String,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported document format: {0} (only text and HTML are supported)")]
    UnsupportedFormat(String),

    #[error("Document is not valid UTF-8 text")]
    NotText,

    #[error("Document is {bytes} bytes, limit is {limit}")]
    TooLarge { bytes: u64, limit: u64 },

    #[error("Document contains no text")]
    Empty,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to fetch document: {0}")]
    Fetch(String),
}

/// Read a text or HTML file from disk.
pub async fn load_file(path: &Path) -> Result<SourceDocument, SourceError> {
    let size = tokio::fs::metadata(path).await?.len();
    check_size(size, MAX_DOCUMENT_BYTES)?;

    let bytes = tokio::fs::read(path).await?;
    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let is_html = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"));

    debug!("Loaded {} ({} bytes)", label, bytes.len());
    let text = decode_text(bytes, is_html)?;
    finish(label, text)
}

/// Fetch a document over HTTP(S).
pub async fn fetch_url(client: &reqwest::Client, url: &str) -> Result<SourceDocument, SourceError> {
    fetch_url_limited(client, url, MAX_DOCUMENT_BYTES).await
}

async fn fetch_url_limited(
    client: &reqwest::Client,
    url: &str,
    limit: u64,
) -> Result<SourceDocument, SourceError> {
    let parsed = url::Url::parse(url).map_err(|e| SourceError::InvalidUrl(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(SourceError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            parsed.scheme()
        )));
    }

    let mut resp = client
        .get(parsed.clone())
        .send()
        .await
        .map_err(|e| SourceError::Fetch(e.to_string()))?;

    if !resp.status().is_success() {
        return Err(SourceError::Fetch(format!("HTTP {}", resp.status())));
    }
    if let Some(len) = resp.content_length() {
        check_size(len, limit)?;
    }

    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_lowercase());

    let is_html = match content_type.as_deref() {
        Some(ct) if ct.contains("html") => true,
        Some(ct) if is_text_mime(ct) => false,
        Some(ct) => return Err(SourceError::UnsupportedFormat(ct.to_string())),
        None => false,
    };

    // Chunked bodies carry no length up front; stop as soon as the cap is passed.
    let mut bytes = Vec::new();
    while let Some(chunk) = resp
        .chunk()
        .await
        .map_err(|e| SourceError::Fetch(e.to_string()))?
    {
        bytes.extend_from_slice(&chunk);
        check_size(bytes.len() as u64, limit)?;
    }
    debug!(
        "Fetched {} ({} bytes, {:?})",
        parsed,
        bytes.len(),
        content_type
    );

    let text = decode_text(bytes, is_html)?;
    finish(parsed.to_string(), text)
}

/// Read all of stdin.
pub async fn read_stdin(label: &str) -> Result<SourceDocument, SourceError> {
    read_limited(tokio::io::stdin(), label, MAX_DOCUMENT_BYTES).await
}

async fn read_limited<R>(reader: R, label: &str, limit: u64) -> Result<SourceDocument, SourceError>
where
    R: AsyncRead + Unpin,
{
    let mut bytes = Vec::new();
    reader.take(limit + 1).read_to_end(&mut bytes).await?;
    check_size(bytes.len() as u64, limit)?;

    let text = decode_text(bytes, false)?;
    finish(label.to_string(), text)
}

fn check_size(bytes: u64, limit: u64) -> Result<(), SourceError> {
    if bytes > limit {
        return Err(SourceError::TooLarge { bytes, limit });
    }
    Ok(())
}

fn is_text_mime(mime: &str) -> bool {
    mime.starts_with("text/")
        || mime == "application/json"
        || mime == "application/xml"
        || mime.ends_with("+json")
        || mime.ends_with("+xml")
}

/// Sniff binary formats, then decode UTF-8 and optionally strip markup.
fn decode_text(bytes: Vec<u8>, is_html: bool) -> Result<String, SourceError> {
    let mut is_html = is_html;
    if let Some(kind) = infer::get(&bytes) {
        let mime = kind.mime_type();
        if kind.matcher_type() != infer::MatcherType::Text {
            return Err(SourceError::UnsupportedFormat(mime.to_string()));
        }
        is_html |= mime == "text/html";
    }

    let text = String::from_utf8(bytes).map_err(|_| SourceError::NotText)?;
    Ok(if is_html { html_to_text(&text) } else { text })
}

fn finish(label: String, text: String) -> Result<SourceDocument, SourceError> {
    if text.trim().is_empty() {
        return Err(SourceError::Empty);
    }
    Ok(SourceDocument { label, text })
}
