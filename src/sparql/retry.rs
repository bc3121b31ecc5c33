//! Retry state machine for SPARQL execution.
//!
//! The machine is pure: [`RetryPolicy::on_failure`] maps the current state
//! and a failure kind to the next step without sleeping or touching the
//! network, so the executor owns all side effects.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::config::RetryConfig;

/// Classified failure of a SPARQL execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    Timeout,
    ConnectionError,
    QueryBadFormed,
    MaxRetriesExceeded,
    Unknown,
}

impl ErrorKind {
    /// `QueryBadFormed` is terminal; everything else is worth another try.
    pub fn is_retryable(self) -> bool {
        !matches!(self, ErrorKind::QueryBadFormed | ErrorKind::MaxRetriesExceeded)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Timeout => "Timeout",
            ErrorKind::ConnectionError => "ConnectionError",
            ErrorKind::QueryBadFormed => "QueryBadFormed",
            ErrorKind::MaxRetriesExceeded => "MaxRetriesExceeded",
            ErrorKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-invocation retry state. Never shared between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    /// Zero-based index of the attempt in flight.
    pub attempt: u32,
    /// Current backoff. Doubled before every wait, saturating at `Duration::MAX`.
    pub backoff: Duration,
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Sleep for `delay`, then attempt again with `next`.
    Retry { delay: Duration, next: RetryState },
    /// Stop and report `kind`.
    GiveUp { kind: ErrorKind },
}

/// Attempt cap and backoff seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
        }
    }
}

impl RetryPolicy {
    /// State for the first attempt.
    pub fn start(&self) -> RetryState {
        RetryState {
            attempt: 0,
            backoff: self.initial_backoff,
        }
    }

    /// Transition after the attempt described by `state` failed with `kind`.
    ///
    /// With the default policy the waits are 2s and then 4s: `2^n` seconds
    /// where `n` counts the failures so far.
    pub fn on_failure(&self, state: RetryState, kind: ErrorKind) -> Step {
        if !kind.is_retryable() {
            return Step::GiveUp { kind };
        }

        let attempt = state.attempt + 1;
        if attempt >= self.max_attempts {
            return Step::GiveUp {
                kind: ErrorKind::MaxRetriesExceeded,
            };
        }

        let backoff = state.backoff.saturating_mul(2);
        Step::Retry {
            delay: backoff,
            next: RetryState { attempt, backoff },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_until_cap() {
        let policy = RetryPolicy::default();
        let first = policy.start();
        assert_eq!(first.attempt, 0);
        assert_eq!(first.backoff, Duration::from_secs(1));

        let Step::Retry { delay, next: second } = policy.on_failure(first, ErrorKind::ConnectionError)
        else {
            panic!("expected retry after first failure");
        };
        assert_eq!(delay, Duration::from_secs(2));
        assert_eq!(second.attempt, 1);

        let Step::Retry { delay, next: third } = policy.on_failure(second, ErrorKind::Timeout) else {
            panic!("expected retry after second failure");
        };
        assert_eq!(delay, Duration::from_secs(4));
        assert_eq!(third.attempt, 2);

        assert_eq!(
            policy.on_failure(third, ErrorKind::Unknown),
            Step::GiveUp {
                kind: ErrorKind::MaxRetriesExceeded
            }
        );
    }

    #[test]
    fn test_bad_query_is_terminal() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.on_failure(policy.start(), ErrorKind::QueryBadFormed),
            Step::GiveUp {
                kind: ErrorKind::QueryBadFormed
            }
        );
    }

    #[test]
    fn test_single_attempt_policy_never_retries() {
        let policy = RetryPolicy::from(&RetryConfig {
            max_attempts: 0,
            initial_backoff_ms: 10,
        });
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(
            policy.on_failure(policy.start(), ErrorKind::Timeout),
            Step::GiveUp {
                kind: ErrorKind::MaxRetriesExceeded
            }
        );
    }

    #[test]
    fn test_backoff_saturates_instead_of_overflowing() {
        let policy = RetryPolicy {
            max_attempts: u32::MAX,
            initial_backoff: Duration::from_secs(1),
        };
        let state = RetryState {
            attempt: 100,
            backoff: Duration::MAX,
        };

        let Step::Retry { delay, next } = policy.on_failure(state, ErrorKind::Timeout) else {
            panic!("expected retry below the attempt cap");
        };
        assert_eq!(delay, Duration::MAX);
        assert_eq!(next.attempt, 101);
    }

    #[test]
    fn test_error_kind_serializes_as_name() {
        let json = serde_json::to_string(&ErrorKind::ConnectionError).unwrap();
        assert_eq!(json, "\"ConnectionError\"");
        assert!(!ErrorKind::QueryBadFormed.is_retryable());
        assert!(ErrorKind::Unknown.is_retryable());
    }
}
