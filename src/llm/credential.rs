//! API credential handed to the analysis client.

use std::fmt;

/// Generative-AI API key.
///
/// Set once per session and read-only afterwards. `Debug` and `Display`
/// never reveal the key.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into().trim().to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw key, for building requests only.
    pub(crate) fn expose(&self) -> &str {
        &self.0
    }

    /// Short hint suitable for logs, e.g. `AIza…(39 chars)`.
    pub fn redacted(&self) -> String {
        if self.0.is_empty() {
            return "<unset>".to_string();
        }
        let prefix: String = self.0.chars().take(4).collect();
        format!("{}…({} chars)", prefix, self.0.chars().count())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&"<redacted>").finish()
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl From<String> for ApiKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

impl From<&str> for ApiKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}
