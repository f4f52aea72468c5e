//! Asynchronous retry controller: wraps an async operation into a callable with the same
//! arguments and retry behavior interposed.
use std::future::Future;

use tokio::time::sleep;
use tracing::trace;

use crate::config::RetryConfig;
use crate::error::RetryError;
use crate::policy::Verdict;

/// An asynchronous operation wrapped with a [`RetryConfig`].
///
/// Each [`call`](Retryable::call) keeps its own attempt counter, so one `Retryable` can be
/// shared and called concurrently.
pub struct Retryable<Op, T, E, A> {
    operation: Op,
    config: RetryConfig<T, E, A>,
}

/// Wrap an asynchronous operation with a retry policy.
///
/// Nothing runs until the returned callable is invoked.
///
/// # Examples
///
/// ```
/// use retryable::{RetryConfig, unsync::wrap};
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() {
/// let calls = Arc::new(AtomicU32::new(0));
/// let counter = calls.clone();
///
/// let fetch = wrap(
///     move |(host, port): (String, u16)| {
///         let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
///         async move {
///             if attempt < 3 {
///                 Err(format!("{host}:{port} refused the connection"))
///             } else {
///                 Ok(format!("connected to {host}:{port}"))
///             }
///         }
///     },
///     RetryConfig::builder().max_retries(5).delay_ms(10).build().unwrap(),
/// );
///
/// let response = fetch.call(("localhost".to_string(), 8080)).await;
/// assert_eq!(response.unwrap(), "connected to localhost:8080");
/// assert_eq!(calls.load(Ordering::SeqCst), 3);
/// # }
/// ```
pub fn wrap<Op, Fut, T, E, A>(
    operation: Op,
    config: RetryConfig<T, E, A>,
) -> Retryable<Op, T, E, A>
where
    Op: Fn(A) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    Retryable { operation, config }
}

impl<Op, T, E, A> Retryable<Op, T, E, A> {
    /// The policy this callable applies.
    pub fn config(&self) -> &RetryConfig<T, E, A> {
        &self.config
    }

    /// Invoke the operation with `args`, retrying per the configured policy.
    ///
    /// Every attempt receives a clone of `args`. Attempts run strictly one after another; the
    /// only suspension points are the operation itself and the pause between attempts.
    ///
    /// # Returns
    ///
    /// `Ok(T)` from the first attempt that succeeds. Otherwise the last attempt's failure,
    /// unchanged: [`RetryError::Failed`] if it returned an error, [`RetryError::Rejected`] if
    /// its value was flagged by `retry_on` and no attempts were left.
    pub async fn call<Fut>(&self, args: A) -> Result<T, RetryError<T, E>>
    where
        Op: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        A: Clone,
    {
        let mut attempt = 1;

        loop {
            trace!(attempt, max_retries = self.config.max_retries(), "starting attempt");
            let result = (self.operation)(args.clone()).await;

            match self.config.judge(result, attempt, &args) {
                Verdict::Done(result) => return result,
                Verdict::Retry(pause) => {
                    if let Some(pause) = pause {
                        sleep(pause).await;
                    }
                    attempt += 1;
                }
            }
        }
    }
}

impl<Op: Clone, T, E, A> Clone for Retryable<Op, T, E, A> {
    fn clone(&self) -> Self {
        Self {
            operation: self.operation.clone(),
            config: self.config.clone(),
        }
    }
}
