//! The retry decision taken after every attempt.
//!
//! Both the async and the blocking callables drive the same loop: run an attempt, hand its
//! result to [`RetryConfig::judge`], then either return or sleep and go again.

use std::time::Duration;

use tracing::{debug, trace};

use crate::Outcome;
use crate::config::{RetryConfig, RetryOn};
use crate::error::RetryError;

/// What the loop does next.
#[derive(Debug)]
pub(crate) enum Verdict<T, E> {
    /// Stop and hand this to the caller.
    Done(Result<T, RetryError<T, E>>),
    /// Run another attempt, after sleeping if a pause is given.
    Retry(Option<Duration>),
}

impl<T, E, A> RetryConfig<T, E, A> {
    /// Classify the result of attempt number `attempt` (1-indexed).
    ///
    /// `on_error` fires exactly once for every failed attempt, the last one included, and
    /// always before the delay is computed. No pause is produced once attempts are exhausted.
    pub(crate) fn judge(&self, result: Result<T, E>, attempt: u32, args: &A) -> Verdict<T, E> {
        match result {
            Ok(value) => {
                let RetryOn::Custom(should_retry) = self.retry_on() else {
                    trace!(attempt, "attempt succeeded");
                    return Verdict::Done(Ok(value));
                };

                if !should_retry(Outcome::Value(&value), attempt, args) {
                    trace!(attempt, "attempt succeeded");
                    return Verdict::Done(Ok(value));
                }

                self.notify(Outcome::Value(&value), attempt, args);

                if attempt >= self.max_retries() {
                    debug!(attempt, "result rejected on final attempt, giving up");
                    return Verdict::Done(Err(RetryError::Rejected(value)));
                }

                let pause = self.pause(Outcome::Value(&value), attempt, args);
                debug!(
                    attempt,
                    max_retries = self.max_retries(),
                    delay = ?pause,
                    "result rejected, retrying"
                );
                Verdict::Retry(pause)
            }
            Err(err) => {
                self.notify(Outcome::Error(&err), attempt, args);

                if attempt >= self.max_retries() {
                    debug!(attempt, "attempt failed, no attempts left");
                    return Verdict::Done(Err(RetryError::Failed(err)));
                }

                let retryable = match self.retry_on() {
                    RetryOn::NoCustomRetryOnResult => true,
                    RetryOn::Custom(should_retry) => {
                        should_retry(Outcome::Error(&err), attempt, args)
                    }
                };
                if !retryable {
                    debug!(attempt, "attempt failed with a non-retryable error");
                    return Verdict::Done(Err(RetryError::Failed(err)));
                }

                let pause = self.pause(Outcome::Error(&err), attempt, args);
                debug!(
                    attempt,
                    max_retries = self.max_retries(),
                    delay = ?pause,
                    "attempt failed, retrying"
                );
                Verdict::Retry(pause)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    type Config = RetryConfig<u32, &'static str, ()>;

    fn is_done_ok(verdict: &Verdict<u32, &'static str>, expected: u32) -> bool {
        matches!(verdict, Verdict::Done(Ok(v)) if *v == expected)
    }

    #[test]
    fn default_accepts_any_value() {
        let config = Config::default();
        assert!(is_done_ok(&config.judge(Ok(500), 1, &()), 500));
    }

    #[test]
    fn default_retries_errors_until_the_last_attempt() {
        let config = Config::builder().max_retries(2).build().unwrap();
        assert!(matches!(
            config.judge(Err("e"), 1, &()),
            Verdict::Retry(None)
        ));
        assert!(matches!(
            config.judge(Err("e"), 2, &()),
            Verdict::Done(Err(RetryError::Failed("e")))
        ));
    }

    #[test]
    fn rejected_value_on_last_attempt_is_surfaced_as_is() {
        let config = Config::builder()
            .max_retries(2)
            .retry_on(|failure, _, _| failure.value() == Some(&503))
            .delay_ms(7)
            .build()
            .unwrap();

        assert!(matches!(
            config.judge(Ok(503), 1, &()),
            Verdict::Retry(Some(d)) if d == Duration::from_millis(7)
        ));
        assert!(matches!(
            config.judge(Ok(503), 2, &()),
            Verdict::Done(Err(RetryError::Rejected(503)))
        ));
        assert!(is_done_ok(&config.judge(Ok(200), 1, &()), 200));
    }

    #[test]
    fn custom_predicate_can_stop_on_errors() {
        let config = Config::builder()
            .max_retries(5)
            .retry_on(|failure, _, _| failure.error() == Some(&"transient"))
            .build()
            .unwrap();

        assert!(matches!(
            config.judge(Err("transient"), 1, &()),
            Verdict::Retry(None)
        ));
        assert!(matches!(
            config.judge(Err("fatal"), 1, &()),
            Verdict::Done(Err(RetryError::Failed("fatal")))
        ));
    }

    #[test]
    fn hooks_see_each_failure_once_and_delay_skips_the_last() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let (notified, delayed) = (events.clone(), events.clone());

        let config = Config::builder()
            .max_retries(2)
            .on_error(move |failure, attempt, _| {
                notified
                    .lock()
                    .unwrap()
                    .push(format!("error {attempt} {:?}", failure.error()));
            })
            .delay_with(move |_, attempt, _| {
                delayed.lock().unwrap().push(format!("delay {attempt}"));
                Duration::ZERO
            })
            .build()
            .unwrap();

        let _ = config.judge(Err("a"), 1, &());
        let _ = config.judge(Err("b"), 2, &());

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "error 1 Some(\"a\")".to_string(),
                "delay 1".to_string(),
                "error 2 Some(\"b\")".to_string(),
            ]
        );
    }

    #[test]
    fn predicate_is_not_consulted_once_attempts_are_exhausted() {
        let consulted = Arc::new(Mutex::new(0));
        let counter = consulted.clone();

        let config = Config::builder()
            .max_retries(1)
            .retry_on(move |_, _, _| {
                *counter.lock().unwrap() += 1;
                true
            })
            .build()
            .unwrap();

        let _ = config.judge(Err("e"), 1, &());
        assert_eq!(*consulted.lock().unwrap(), 0);

        // A resolved value still has to be classified, once.
        let _ = config.judge(Ok(1), 1, &());
        assert_eq!(*consulted.lock().unwrap(), 1);
    }
}
