// Retry policy for idempotent GET requests.
// Classifies failures into transient and terminal kinds and bounds the
// number of re-issues per request.

use std::time::Duration;

use crate::error::PulseError;

/// Retries allowed beyond the first attempt.
pub const MAX_RETRIES: u32 = 2;
/// Fixed delay between attempts.
pub const RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Failure classification, used both for retry decisions and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Request hit the per-request time ceiling.
    Timeout,
    /// No response received (unreachable host, refused connection).
    NoResponse,
    /// HTTP 5xx.
    ServerError(u16),
    /// HTTP 4xx or any other non-success status.
    HttpStatus(u16),
    /// Envelope carried `status: "error"` despite a 200 transport status.
    Envelope,
    /// Response body did not match the expected shape.
    Malformed,
    /// The request was never sent (builder or local configuration error).
    RequestSetup,
}

impl FailureKind {
    pub fn from_error(err: &PulseError) -> Self {
        match err {
            PulseError::Http(e) => {
                if e.is_timeout() {
                    FailureKind::Timeout
                } else if e.is_builder() || e.is_request() {
                    FailureKind::RequestSetup
                } else if e.is_decode() {
                    FailureKind::Malformed
                } else {
                    FailureKind::NoResponse
                }
            }
            PulseError::Status { status } if (500..600).contains(status) => {
                FailureKind::ServerError(*status)
            }
            PulseError::Status { status } => FailureKind::HttpStatus(*status),
            PulseError::Envelope { .. } => FailureKind::Envelope,
            PulseError::MissingData | PulseError::Json(_) => FailureKind::Malformed,
            PulseError::BaseUrl(_) => FailureKind::RequestSetup,
        }
    }

    /// Transient failures are safe to retry for GET requests.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FailureKind::Timeout | FailureKind::NoResponse | FailureKind::ServerError(_)
        )
    }
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Re-issue the identical request after the fixed delay.
    /// `attempt` is the 1-based retry number, for progress notices.
    RetryAfter { delay: Duration, attempt: u32 },
    /// Terminal failure: surface it to the caller.
    Fail,
}

/// Per-request retry state. Starts at attempt 0 and never exceeds
/// `MAX_RETRIES`.
#[derive(Debug, Default)]
pub struct RetryState {
    attempt: u32,
}

impl RetryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Record a failed attempt and decide whether to retry.
    pub fn on_failure(&mut self, kind: FailureKind) -> RetryDecision {
        if kind.is_transient() && self.attempt < MAX_RETRIES {
            self.attempt += 1;
            RetryDecision::RetryAfter {
                delay: RETRY_DELAY,
                attempt: self.attempt,
            }
        } else {
            RetryDecision::Fail
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistent_503_retries_exactly_twice() {
        let mut state = RetryState::new();
        let kind = FailureKind::ServerError(503);

        assert_eq!(
            state.on_failure(kind),
            RetryDecision::RetryAfter {
                delay: RETRY_DELAY,
                attempt: 1
            }
        );
        assert_eq!(
            state.on_failure(kind),
            RetryDecision::RetryAfter {
                delay: RETRY_DELAY,
                attempt: 2
            }
        );
        // Budget exhausted: terminal.
        assert_eq!(state.on_failure(kind), RetryDecision::Fail);
        assert_eq!(state.attempt(), MAX_RETRIES);
    }

    #[test]
    fn test_404_fails_without_retry() {
        let mut state = RetryState::new();
        assert_eq!(
            state.on_failure(FailureKind::HttpStatus(404)),
            RetryDecision::Fail
        );
        assert_eq!(state.attempt(), 0);
    }

    #[test]
    fn test_envelope_error_is_terminal() {
        let mut state = RetryState::new();
        assert_eq!(state.on_failure(FailureKind::Envelope), RetryDecision::Fail);
    }

    #[test]
    fn test_timeout_and_no_response_are_transient() {
        assert!(FailureKind::Timeout.is_transient());
        assert!(FailureKind::NoResponse.is_transient());
        assert!(FailureKind::ServerError(500).is_transient());
        assert!(!FailureKind::HttpStatus(400).is_transient());
        assert!(!FailureKind::Malformed.is_transient());
        assert!(!FailureKind::RequestSetup.is_transient());
    }

    #[test]
    fn test_classification_of_status_errors() {
        let server = PulseError::Status { status: 502 };
        assert_eq!(
            FailureKind::from_error(&server),
            FailureKind::ServerError(502)
        );

        let client = PulseError::Status { status: 403 };
        assert_eq!(FailureKind::from_error(&client), FailureKind::HttpStatus(403));
    }

    #[test]
    fn test_classification_of_malformed_body() {
        let err: PulseError = serde_json::from_str::<serde_json::Value>("nope")
            .unwrap_err()
            .into();
        assert_eq!(FailureKind::from_error(&err), FailureKind::Malformed);
    }

    #[test]
    fn test_transient_then_terminal_mix() {
        let mut state = RetryState::new();
        assert!(matches!(
            state.on_failure(FailureKind::Timeout),
            RetryDecision::RetryAfter { attempt: 1, .. }
        ));
        // A non-retryable failure ends the request even with budget left.
        assert_eq!(
            state.on_failure(FailureKind::HttpStatus(400)),
            RetryDecision::Fail
        );
    }
}
