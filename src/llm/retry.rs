//! Capped retry with exponential backoff and jitter.
//!
//! Wraps any [`DocumentAnalyzer`]. Only retryable transport failures are
//! retried (connection errors, 429, 5xx); malformed envelopes, parse and
//! validation errors surface immediately.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{DocumentAnalyzer, LlmError};
use crate::analysis::DocumentAnalysis;

/// Upper bound on a single backoff wait, before jitter.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Retry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first attempt (0 disables retrying)
    #[serde(default)]
    pub max_retries: u32,
    /// Base delay, doubled on each retry
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Upper bound of the random delay added to each wait
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_jitter_ms() -> u64 {
    250
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: default_base_delay_ms(),
            jitter_ms: default_jitter_ms(),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.max_retries > 0
    }

    /// Exponential delay for `attempt` (0-based), capped, without jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor)).min(MAX_BACKOFF)
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        let jitter = if self.jitter_ms > 0 {
            rand::thread_rng().gen_range(0..=self.jitter_ms)
        } else {
            0
        };
        self.backoff(attempt) + Duration::from_millis(jitter)
    }
}

/// Analyzer wrapper that retries transient transport failures.
pub struct Retrying<A> {
    inner: A,
    policy: RetryPolicy,
}

impl<A: DocumentAnalyzer> Retrying<A> {
    pub fn new(inner: A, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    async fn run<T, F, Fut>(&self, operation: &str, call: F) -> Result<T, LlmError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let mut attempt = 0;
        loop {
            match call().await {
                Err(e) if e.is_retryable() && attempt < self.policy.max_retries => {
                    let wait = self.policy.delay_for(attempt);
                    warn!(
                        "{} failed (attempt {}/{}): {}; retrying in {:?}",
                        operation,
                        attempt + 1,
                        self.policy.max_retries + 1,
                        e,
                        wait
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

#[async_trait]
impl<A: DocumentAnalyzer> DocumentAnalyzer for Retrying<A> {
    async fn analyze_document(
        &self,
        text: &str,
        label: &str,
    ) -> Result<DocumentAnalysis, LlmError> {
        self.run("Document analysis", || self.inner.analyze_document(text, label))
            .await
    }

    async fn ask_question(&self, question: &str, text: &str) -> Result<String, LlmError> {
        self.run("Question", || self.inner.ask_question(question, text))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::analysis::ParseError;

    /// Analyzer that replays scripted question results in order.
    struct Scripted {
        results: Mutex<Vec<Result<String, LlmError>>>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(mut results: Vec<Result<String, LlmError>>) -> Self {
            results.reverse();
            Self {
                results: Mutex::new(results),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DocumentAnalyzer for Scripted {
        async fn analyze_document(&self, _: &str, _: &str) -> Result<DocumentAnalysis, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(LlmError::Parse(ParseError::NoJsonObject))
        }

        async fn ask_question(&self, _: &str, _: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.results.lock().unwrap().pop();
            next.unwrap_or_else(|| Ok("exhausted".to_string()))
        }
    }

    fn http(code: u16) -> LlmError {
        LlmError::Transport {
            status: Some(code),
            message: "upstream".to_string(),
        }
    }

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay_ms: 1,
            jitter_ms: 0,
        }
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_millis(1000));
        assert_eq!(policy.backoff(3), Duration::from_millis(8000));
        assert_eq!(policy.backoff(10), MAX_BACKOFF);
        assert_eq!(policy.backoff(200), MAX_BACKOFF);
    }

    #[test]
    fn jitter_stays_within_bound() {
        let policy = RetryPolicy {
            max_retries: 1,
            base_delay_ms: 100,
            jitter_ms: 50,
        };
        for _ in 0..50 {
            let d = policy.delay_for(0);
            assert!(d >= Duration::from_millis(100) && d <= Duration::from_millis(150));
        }
    }

    #[test]
    fn default_policy_is_disabled() {
        assert!(!RetryPolicy::default().is_enabled());
        assert!(RetryPolicy::default().with_max_retries(2).is_enabled());
    }

    #[tokio::test]
    async fn retries_service_unavailable_then_succeeds() {
        let retrying = Retrying::new(
            Scripted::new(vec![Err(http(503)), Ok("answer".to_string())]),
            fast_policy(3),
        );

        let answer = retrying.ask_question("q", "text").await.unwrap();
        assert_eq!(answer, "answer");
        assert_eq!(retrying.inner().calls(), 2);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let retrying = Retrying::new(
            Scripted::new(vec![Err(http(429)), Err(http(429)), Err(http(429))]),
            fast_policy(1),
        );

        let err = retrying.ask_question("q", "text").await.unwrap_err();
        assert_eq!(err.status(), Some(429));
        assert_eq!(retrying.inner().calls(), 2);
    }

    #[tokio::test]
    async fn does_not_retry_client_errors() {
        let retrying = Retrying::new(Scripted::new(vec![Err(http(400))]), fast_policy(5));

        assert!(retrying.ask_question("q", "text").await.is_err());
        assert_eq!(retrying.inner().calls(), 1);
    }

    #[tokio::test]
    async fn never_retries_parse_errors() {
        let retrying = Retrying::new(Scripted::new(vec![]), fast_policy(5));

        let err = retrying.analyze_document("text", "doc").await.unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
        assert_eq!(retrying.inner().calls(), 1);
    }
}
