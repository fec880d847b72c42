use std::time::Duration;

/// Retry policy applied to HTTP 429 responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of requests allowed for one logical fetch
    pub max_attempts: u32,
    /// Base of the exponential backoff
    pub backoff_base: Duration,
    /// Upper bound for any single delay, including `Retry-After` values
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Whether another request may follow after `attempts` requests were made
    pub fn allows_retry(&self, attempts: u32) -> bool {
        attempts < self.max_attempts.max(1)
    }

    /// Delay to wait after the `attempts`-th request was rate limited
    ///
    /// A server-provided `Retry-After` wins; otherwise the delay is
    /// `backoff_base * 2^attempts`. Either way it is capped at `max_backoff`.
    pub fn delay_for(&self, attempts: u32, retry_after: Option<Duration>) -> Duration {
        let delay = retry_after.unwrap_or_else(|| {
            self.backoff_base
                .saturating_mul(2u32.saturating_pow(attempts))
        });
        // A longer Retry-After is cut short, so that retry will likely see
        // another 429 and use up an attempt
        delay.min(self.max_backoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff_base, Duration::from_secs(1));
    }

    #[test]
    fn test_exponential_delays_strictly_increase() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay_for(1, None), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2, None), Duration::from_secs(4));
        assert_eq!(policy.delay_for(3, None), Duration::from_secs(8));
    }

    #[test]
    fn test_retry_after_overrides_exponential_delay() {
        let policy = RetryPolicy::default();

        assert_eq!(
            policy.delay_for(2, Some(Duration::from_secs(1))),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_delays_are_capped() {
        let policy = RetryPolicy {
            max_backoff: Duration::from_secs(5),
            ..Default::default()
        };

        assert_eq!(policy.delay_for(10, None), Duration::from_secs(5));
        assert_eq!(
            policy.delay_for(1, Some(Duration::from_secs(120))),
            Duration::from_secs(5)
        );
        // Large exponents saturate instead of overflowing
        assert_eq!(policy.delay_for(64, None), Duration::from_secs(5));
    }

    #[test]
    fn test_allows_retry_until_ceiling() {
        let policy = RetryPolicy::default();

        assert!(policy.allows_retry(1));
        assert!(policy.allows_retry(2));
        assert!(!policy.allows_retry(3));
    }

    #[test]
    fn test_zero_attempts_still_allows_one_request() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..Default::default()
        };

        assert!(!policy.allows_retry(1));
    }
}
