//! Bounded refresh-and-retry policy for 401 responses.

/// Configuration for the 401 refresh-and-retry behaviour.
#[derive(Debug, Clone)]
pub struct AuthRetryConfig {
    /// How many times a request may be resent after a token refresh.
    pub max_refresh_retries: u32,
}

impl Default for AuthRetryConfig {
    fn default() -> Self {
        Self {
            max_refresh_retries: 1,
        }
    }
}

impl AuthRetryConfig {
    /// Set the maximum number of refresh retries.
    pub fn with_max_refresh_retries(mut self, retries: u32) -> Self {
        self.max_refresh_retries = retries;
        self
    }

    /// Disable refresh retries.
    pub fn no_retry() -> Self {
        Self {
            max_refresh_retries: 0,
        }
    }
}

/// Tracks refresh attempts for a single logical request.
#[derive(Debug, Clone)]
pub struct AuthRetryPolicy {
    config: AuthRetryConfig,
    attempt: u32,
}

impl AuthRetryPolicy {
    /// Create a new retry policy from config.
    pub fn new(config: AuthRetryConfig) -> Self {
        Self { config, attempt: 0 }
    }

    /// Returns the number of refreshes already spent.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Returns true if another refresh-and-resend is allowed.
    pub fn should_retry(&self) -> bool {
        self.attempt < self.config.max_refresh_retries
    }

    /// Record a refresh attempt. Returns false once the budget is exhausted.
    pub fn next_attempt(&mut self) -> bool {
        if !self.should_retry() {
            return false;
        }
        self.attempt += 1;
        true
    }

    /// Reset the policy for a new request.
    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allows_single_retry() {
        let mut policy = AuthRetryPolicy::new(AuthRetryConfig::default());
        assert!(policy.should_retry());
        assert!(policy.next_attempt());
        assert_eq!(policy.attempt(), 1);
        assert!(!policy.should_retry());
        assert!(!policy.next_attempt());
        assert_eq!(policy.attempt(), 1);
    }

    #[test]
    fn test_no_retry() {
        let mut policy = AuthRetryPolicy::new(AuthRetryConfig::no_retry());
        assert!(!policy.should_retry());
        assert!(!policy.next_attempt());
    }

    #[test]
    fn test_custom_budget_and_reset() {
        let mut policy =
            AuthRetryPolicy::new(AuthRetryConfig::default().with_max_refresh_retries(3));
        assert!(policy.next_attempt());
        assert!(policy.next_attempt());
        assert!(policy.next_attempt());
        assert!(!policy.next_attempt());

        policy.reset();
        assert_eq!(policy.attempt(), 0);
        assert!(policy.should_retry());
    }
}
