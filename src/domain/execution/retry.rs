//! Retry policy for transaction submission

use std::time::Duration;

use crate::shared::errors::{FailureClass, SubmissionError};

/// Transaction retry configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_backoff: Duration,
    /// Retry causes classified as permanent too (the historical behaviour)
    pub retry_permanent: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(1000),
            retry_permanent: true,
        }
    }
}

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter(Duration),
    GiveUp,
}

impl RetryPolicy {
    /// Delay after the `failures`-th failure: base * 2^failures, no jitter
    pub fn backoff_after(&self, failures: u32) -> Duration {
        self.base_backoff.saturating_mul(2u32.saturating_pow(failures))
    }

    pub fn decide(&self, failures: u32, cause: &SubmissionError) -> RetryDecision {
        if failures >= self.max_attempts {
            return RetryDecision::GiveUp;
        }
        if !self.retry_permanent && cause.class() == FailureClass::Permanent {
            return RetryDecision::GiveUp;
        }
        RetryDecision::RetryAfter(self.backoff_after(failures))
    }
}
