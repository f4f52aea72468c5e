//! # Retryable
//!
//! Wrap an operation that may fail into a callable with the same arguments that retries it
//! according to a policy.
//!
//! An attempt can fail in two ways:
//!
//! - **hard failure**: the operation returns `Err`. Retried by default.
//! - **soft failure**: the operation returns `Ok`, but a custom `retry_on` predicate flags the
//!   value. Only possible once a predicate is configured.
//!
//! The policy bounds the total number of attempts, decides which failures are worth another
//! attempt, computes the pause in between and notifies an `on_error` hook of every failure.
//! When the policy gives up, the last failure comes back unchanged inside [`RetryError`].
//!
//! ## Usage Examples
//!
//! ### Asynchronous Usage
//!
//! ```rust
//! use retryable::{RetryConfig, RetryError};
//! use retryable::strategy::Exponential;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = RetryConfig::<u16, String, &str>::builder()
//!     .max_retries(4)
//!     .backoff(Exponential::from_millis(1))
//!     .retry_on(|failure, _, _| failure.error().is_some() || failure.value() == Some(&503))
//!     .on_error(|failure, attempt, url| eprintln!("{url}: attempt {attempt} failed: {failure:?}"))
//!     .build()
//!     .unwrap();
//!
//! let status = config.wrap(|_url: &'static str| async { Ok(503) });
//!
//! // Every attempt answered 503, so the last answer is handed back as the failure.
//! assert_eq!(status.call("https://example.com").await, Err(RetryError::Rejected(503)));
//! # }
//! ```
//!
//! ### Synchronous Usage
//!
//! ```rust
//! use retryable::{RetryConfig, sync::wrap};
//!
//! let read = wrap(
//!     |path: &'static str| std::fs::read_to_string(path),
//!     RetryConfig::builder().max_retries(2).delay_ms(1).build().unwrap(),
//! );
//!
//! let err = read.call("/definitely/not/here").unwrap_err();
//! assert_eq!(err.into_error().unwrap().kind(), std::io::ErrorKind::NotFound);
//! ```
//!
//! ## Feature Flags
//!
//! - `random`: Enables `strategy::random_between` jittered delays (depends on rand)
//!
//! ## Logging
//!
//! Attempts, retries and give-ups are reported as `tracing` events at `trace` and `debug`
//! level. Install a subscriber to see them; the `on_error` hook is the way to act on failures.
pub mod config;
pub mod error;
pub mod outcome;
mod policy;
pub mod status;
pub mod strategy;
pub mod sync;
pub mod unsync;

pub use config::{Predicate, RetryConfig, RetryConfigBuilder};
pub use error::{ConfigError, RetryError};
pub use outcome::Outcome;
