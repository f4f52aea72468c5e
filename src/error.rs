//! Error types returned by wrapped operations and by configuration.

use std::error::Error;
use std::fmt;

/// Why a wrapped call gave up.
///
/// The payload is always the original failure of the last attempt, never a synthesized
/// "retries exhausted" error, so callers can inspect it exactly as the operation produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError<T, E> {
    /// The last attempt failed with an error, either because attempts ran out or because
    /// the retry predicate declined to retry it.
    Failed(E),
    /// The last attempt resolved, but the retry predicate flagged its value as a failure
    /// and no attempts were left.
    Rejected(T),
}

impl<T, E> RetryError<T, E> {
    /// Returns `true` if the final attempt failed with an error.
    pub fn is_failed(&self) -> bool {
        matches!(self, RetryError::Failed(_))
    }

    /// Returns `true` if the final attempt's value was rejected.
    pub fn is_rejected(&self) -> bool {
        matches!(self, RetryError::Rejected(_))
    }

    /// Borrow the error of the final attempt, if it failed with one.
    pub fn error(&self) -> Option<&E> {
        match self {
            RetryError::Failed(err) => Some(err),
            RetryError::Rejected(_) => None,
        }
    }

    /// Borrow the rejected value of the final attempt, if there was one.
    pub fn rejected(&self) -> Option<&T> {
        match self {
            RetryError::Rejected(value) => Some(value),
            RetryError::Failed(_) => None,
        }
    }

    /// Extract the error of the final attempt.
    pub fn into_error(self) -> Option<E> {
        match self {
            RetryError::Failed(err) => Some(err),
            RetryError::Rejected(_) => None,
        }
    }

    /// Extract the rejected value of the final attempt.
    pub fn into_rejected(self) -> Option<T> {
        match self {
            RetryError::Rejected(value) => Some(value),
            RetryError::Failed(_) => None,
        }
    }
}

impl<T, E: fmt::Display> fmt::Display for RetryError<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Failed(err) => write!(f, "{}", err),
            RetryError::Rejected(_) => write!(f, "result rejected by retry policy"),
        }
    }
}

impl<T: fmt::Debug, E: Error + 'static> Error for RetryError<T, E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RetryError::Failed(err) => Some(err),
            RetryError::Rejected(_) => None,
        }
    }
}

/// Invalid retry configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `max_retries` counts total attempts, so zero would never run the operation.
    #[error("max_retries must allow at least one attempt")]
    ZeroAttempts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_accessors() {
        let err: RetryError<u32, &str> = RetryError::Failed("connection reset");
        assert!(err.is_failed());
        assert!(!err.is_rejected());
        assert_eq!(err.error(), Some(&"connection reset"));
        assert_eq!(err.rejected(), None);
        assert_eq!(err.to_string(), "connection reset");
        assert_eq!(err.into_error(), Some("connection reset"));
    }

    #[test]
    fn rejected_accessors() {
        let err: RetryError<u32, &str> = RetryError::Rejected(503);
        assert!(err.is_rejected());
        assert_eq!(err.rejected(), Some(&503));
        assert!(err.to_string().contains("rejected"));
        assert_eq!(err.clone().into_error(), None);
        assert_eq!(err.into_rejected(), Some(503));
    }

    #[test]
    fn source_is_inner_error() {
        let io = std::io::Error::other("disk on fire");
        let err: RetryError<(), std::io::Error> = RetryError::Failed(io);
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("disk on fire"));
    }

    #[test]
    fn config_error_display() {
        assert_eq!(
            ConfigError::ZeroAttempts.to_string(),
            "max_retries must allow at least one attempt"
        );
    }
}
