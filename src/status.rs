//! Retry predicates keyed on HTTP status codes.
//!
//! Both predicates have the shape expected by
//! [`RetryConfigBuilder::retry_on`](crate::RetryConfigBuilder::retry_on) and can be passed by
//! name:
//!
//! ```
//! use retryable::RetryConfig;
//! use retryable::status::{HttpStatus, rate_limited, transient_http_status};
//!
//! struct Response {
//!     status: u16,
//! }
//!
//! impl HttpStatus for Response {
//!     fn status_code(&self) -> Option<u16> {
//!         Some(self.status)
//!     }
//! }
//!
//! let config = RetryConfig::<Response, std::convert::Infallible, ()>::builder()
//!     .retry_on(transient_http_status)
//!     .retry_on(rate_limited)
//!     .build()
//!     .unwrap();
//! assert!(config.has_custom_retry_on());
//! ```

use std::convert::Infallible;

use crate::Outcome;

/// Types that may carry an HTTP status code, such as responses or transport errors.
pub trait HttpStatus {
    /// The status code, if this value has one.
    fn status_code(&self) -> Option<u16>;
}

impl HttpStatus for u16 {
    fn status_code(&self) -> Option<u16> {
        Some(*self)
    }
}

impl HttpStatus for Infallible {
    fn status_code(&self) -> Option<u16> {
        match *self {}
    }
}

impl<S: HttpStatus + ?Sized> HttpStatus for &S {
    fn status_code(&self) -> Option<u16> {
        (**self).status_code()
    }
}

impl<T: HttpStatus, E: HttpStatus> HttpStatus for Outcome<'_, T, E> {
    fn status_code(&self) -> Option<u16> {
        match self {
            Outcome::Value(value) => value.status_code(),
            Outcome::Error(err) => err.status_code(),
        }
    }
}

/// Bad gateway, service unavailable or gateway timeout.
pub fn is_transient_status(code: u16) -> bool {
    matches!(code, 502..=504)
}

/// Too many requests.
pub fn is_rate_limit_status(code: u16) -> bool {
    code == 429
}

/// Retries when the attempt produced a 502, 503 or 504.
pub fn transient_http_status<T, E, A>(outcome: Outcome<'_, T, E>, _attempt: u32, _args: &A) -> bool
where
    T: HttpStatus,
    E: HttpStatus,
{
    outcome.status_code().is_some_and(is_transient_status)
}

/// Retries when the attempt was rate limited (429).
pub fn rate_limited<T, E, A>(outcome: Outcome<'_, T, E>, _attempt: u32, _args: &A) -> bool
where
    T: HttpStatus,
    E: HttpStatus,
{
    outcome.status_code().is_some_and(is_rate_limit_status)
}
