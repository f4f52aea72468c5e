//! Blocking retry controller for synchronous operations.
//!
//! Same policy and decisions as [`unsync`](crate::unsync), with pauses taken by
//! [`std::thread::sleep`]. Use it off the async runtime only.
use std::thread::sleep;

use tracing::trace;

use crate::config::RetryConfig;
use crate::error::RetryError;
use crate::policy::Verdict;

/// A synchronous operation wrapped with a [`RetryConfig`].
pub struct Retryable<Op, T, E, A> {
    operation: Op,
    config: RetryConfig<T, E, A>,
}

/// Wrap a blocking operation with a retry policy.
///
/// # Examples
///
/// ```
/// use retryable::{RetryConfig, RetryError, sync::wrap};
///
/// let parse = wrap(
///     |input: &'static str| input.parse::<u8>(),
///     RetryConfig::builder().max_retries(2).build().unwrap(),
/// );
///
/// assert_eq!(parse.call("42"), Ok(42));
/// assert!(matches!(parse.call("x"), Err(RetryError::Failed(_))));
/// ```
pub fn wrap<Op, T, E, A>(operation: Op, config: RetryConfig<T, E, A>) -> Retryable<Op, T, E, A>
where
    Op: Fn(A) -> Result<T, E>,
{
    Retryable { operation, config }
}

impl<Op, T, E, A> Retryable<Op, T, E, A>
where
    Op: Fn(A) -> Result<T, E>,
    A: Clone,
{
    /// The policy this callable applies.
    pub fn config(&self) -> &RetryConfig<T, E, A> {
        &self.config
    }

    /// Invoke the operation with `args`, blocking the thread for any pause between attempts.
    pub fn call(&self, args: A) -> Result<T, RetryError<T, E>> {
        let mut attempt = 1;

        loop {
            trace!(attempt, max_retries = self.config.max_retries(), "starting attempt");
            let result = (self.operation)(args.clone());

            match self.config.judge(result, attempt, &args) {
                Verdict::Done(result) => return result,
                Verdict::Retry(pause) => {
                    if let Some(pause) = pause {
                        sleep(pause);
                    }
                    attempt += 1;
                }
            }
        }
    }
}
