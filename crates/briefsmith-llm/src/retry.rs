//! Bounded exponential backoff for remote providers
//!
//! Rate-limit and transient failures are retried after waiting
//! `initial_delay`, doubling the wait each time, for as long as the wait does
//! not exceed `max_delay`. With the defaults (2s, 32s) that is five retries
//! waiting 2, 4, 8, 16 and 32 seconds. Fatal failures are returned at once.

use crate::LlmError;
use async_trait::async_trait;
use briefsmith_domain::traits::{Classified, CompletionProvider};
use std::time::Duration;
use tracing::warn;

/// Default wait before the first retry
pub const DEFAULT_INITIAL_DELAY_SECS: u64 = 2;

/// Default longest wait before giving up
pub const DEFAULT_MAX_DELAY_SECS: u64 = 32;

/// Backoff schedule shared by all remote providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Wait before the first retry
    pub initial_delay: Duration,
    /// Longest wait; a retry that would wait longer is not attempted
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy from its two delays
    pub fn new(initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            initial_delay,
            max_delay,
        }
    }

    /// Policy that never retries
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// The waits before each retry, in order
    ///
    /// # Examples
    ///
    /// ```
    /// use briefsmith_llm::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let secs: Vec<u64> = RetryPolicy::default().delays().iter().map(|d| d.as_secs()).collect();
    /// assert_eq!(secs, vec![2, 4, 8, 16, 32]);
    /// ```
    pub fn delays(&self) -> Vec<Duration> {
        let mut delays = Vec::new();
        if self.initial_delay.is_zero() {
            return delays;
        }

        let mut delay = self.initial_delay;
        while delay <= self.max_delay {
            delays.push(delay);
            if delay == Duration::MAX {
                break;
            }
            delay = delay.saturating_mul(2);
        }
        delays
    }

    /// Number of retries after the first attempt
    pub fn max_retries(&self) -> usize {
        self.delays().len()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(DEFAULT_INITIAL_DELAY_SECS),
            Duration::from_secs(DEFAULT_MAX_DELAY_SECS),
        )
    }
}

/// Provider wrapper that retries retryable failures per a [`RetryPolicy`]
///
/// # Examples
///
/// ```
/// use briefsmith_llm::{MockProvider, RetryPolicy, Retrying};
/// use briefsmith_domain::traits::CompletionProvider;
/// use briefsmith_domain::FailureKind;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mock = MockProvider::new("drafted");
/// mock.push_failure(FailureKind::RateLimit);
///
/// let policy = RetryPolicy::new(Duration::from_millis(1), Duration::from_millis(8));
/// let provider = Retrying::new(mock.clone(), policy);
///
/// assert_eq!(provider.generate("prompt", 100).await.unwrap(), "drafted");
/// assert_eq!(mock.call_count(), 2);
/// # }
/// ```
pub struct Retrying<P> {
    inner: P,
    policy: RetryPolicy,
}

impl<P> Retrying<P> {
    /// Wrap `inner` with `policy`
    pub fn new(inner: P, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// The wrapped provider
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// The backoff schedule
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl<P> CompletionProvider for Retrying<P>
where
    P: CompletionProvider<Error = LlmError>,
{
    type Error = LlmError;

    fn context_window(&self) -> usize {
        self.inner.context_window()
    }

    fn units_per_token(&self) -> usize {
        self.inner.units_per_token()
    }

    fn encode(&self, text: &str) -> Result<Vec<u32>, Self::Error> {
        self.inner.encode(text)
    }

    fn decode(&self, units: &[u32]) -> Result<String, Self::Error> {
        self.inner.decode(units)
    }

    async fn generate(&self, prompt: &str, max_output_tokens: usize) -> Result<String, Self::Error> {
        let mut delays = self.policy.delays().into_iter();
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            let error = match self.inner.generate(prompt, max_output_tokens).await {
                Ok(text) => return Ok(text),
                Err(e) if e.kind().is_retryable() => e,
                Err(e) => return Err(e),
            };

            match delays.next() {
                Some(delay) => {
                    warn!(
                        "Attempt {} failed ({}): {}; retrying in {}s",
                        attempts,
                        error.kind(),
                        error,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    warn!("Giving up after {} attempts: {}", attempts, error);
                    return Err(LlmError::RetriesExhausted {
                        attempts,
                        last: Box::new(error),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockProvider;
    use briefsmith_domain::FailureKind;
    use tokio::time::Instant;

    /// Provider that fails every call with the same class
    struct AlwaysFailing {
        kind: FailureKind,
        mock: MockProvider,
    }

    #[async_trait]
    impl CompletionProvider for AlwaysFailing {
        type Error = LlmError;

        fn context_window(&self) -> usize {
            self.mock.context_window()
        }

        fn encode(&self, text: &str) -> Result<Vec<u32>, Self::Error> {
            self.mock.encode(text)
        }

        fn decode(&self, units: &[u32]) -> Result<String, Self::Error> {
            self.mock.decode(units)
        }

        async fn generate(&self, prompt: &str, max: usize) -> Result<String, Self::Error> {
            self.mock.push_failure(self.kind);
            self.mock.generate(prompt, max).await
        }
    }

    fn always_failing(kind: FailureKind) -> (Retrying<AlwaysFailing>, MockProvider) {
        let mock = MockProvider::default();
        let provider = Retrying::new(
            AlwaysFailing {
                kind,
                mock: mock.clone(),
            },
            RetryPolicy::default(),
        );
        (provider, mock)
    }

    #[test]
    fn test_default_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries(), 5);
        assert_eq!(policy.delays().last(), Some(&Duration::from_secs(32)));
    }

    #[test]
    fn test_zero_initial_delay_never_retries() {
        assert!(RetryPolicy::none().delays().is_empty());
        let policy = RetryPolicy::new(Duration::ZERO, Duration::from_secs(60));
        assert_eq!(policy.max_retries(), 0);
    }

    #[test]
    fn test_initial_above_ceiling_never_retries() {
        let policy = RetryPolicy::new(Duration::from_secs(10), Duration::from_secs(5));
        assert_eq!(policy.max_retries(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_gives_up_after_ceiling() {
        let (provider, mock) = always_failing(FailureKind::RateLimit);
        let start = Instant::now();

        let result = provider.generate("prompt", 10).await;

        match result {
            Err(LlmError::RetriesExhausted { attempts, last }) => {
                assert_eq!(attempts, 6);
                assert!(matches!(*last, LlmError::RateLimitExceeded(_)));
            }
            other => panic!("Expected RetriesExhausted, got {:?}", other),
        }
        // One initial call plus retries after 2, 4, 8, 16 and 32 seconds
        assert_eq!(mock.call_count(), 6);
        assert_eq!(start.elapsed(), Duration::from_secs(62));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_uses_same_schedule() {
        let (provider, mock) = always_failing(FailureKind::Transient);
        assert!(provider.generate("prompt", 10).await.is_err());
        assert_eq!(mock.call_count(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_is_not_retried() {
        let (provider, mock) = always_failing(FailureKind::Fatal);
        let start = Instant::now();

        let result = provider.generate("prompt", 10).await;

        assert!(matches!(result, Err(LlmError::Authentication(_))));
        assert_eq!(mock.call_count(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failures() {
        let mock = MockProvider::new("done");
        mock.push_failure(FailureKind::Transient);
        mock.push_failure(FailureKind::RateLimit);
        let provider = Retrying::new(mock.clone(), RetryPolicy::default());
        let start = Instant::now();

        assert_eq!(provider.generate("prompt", 10).await.unwrap(), "done");
        assert_eq!(mock.call_count(), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(6));
    }

    #[test]
    fn test_measurement_delegates_to_inner() {
        let mock = MockProvider::default().with_context_window(128);
        let provider = Retrying::new(mock, RetryPolicy::default());
        assert_eq!(provider.context_window(), 128);
        assert_eq!(provider.encode("abc").unwrap().len(), 3);
        assert_eq!(provider.decode(&[104, 105]).unwrap(), "hi");
        assert_eq!(provider.inner().context_window(), 128);
        assert_eq!(provider.policy().max_retries(), 5);
    }
}
