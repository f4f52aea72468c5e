//! Retry configuration and its builder.
//!
//! A [`RetryConfig`] is built once per wrapped operation and is read-only afterwards. All the
//! shape dispatch (fixed vs computed delay, one vs many predicates) happens in
//! [`RetryConfigBuilder::build`], so the retry loop never re-inspects its options.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::Outcome;
use crate::error::ConfigError;
use crate::strategy::Backoff;
use crate::unsync::Retryable;

/// Default number of attempts, the first invocation included.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// A shareable retry predicate, as accepted by [`RetryConfigBuilder::retry_on_any`].
pub type Predicate<T, E, A> = Arc<dyn Fn(Outcome<'_, T, E>, u32, &A) -> bool + Send + Sync>;

pub(crate) type Hook<T, E, A> = Arc<dyn Fn(Outcome<'_, T, E>, u32, &A) + Send + Sync>;

pub(crate) type DelayFn<T, E, A> =
    Arc<dyn Fn(Outcome<'_, T, E>, u32, &A) -> Duration + Send + Sync>;

/// Pause between two attempts, normalized at build time.
pub(crate) enum Delay<T, E, A> {
    /// Retry right away without suspending.
    None,
    Fixed(Duration),
    Computed(DelayFn<T, E, A>),
}

impl<T, E, A> Clone for Delay<T, E, A> {
    fn clone(&self) -> Self {
        match self {
            Delay::None => Delay::None,
            Delay::Fixed(duration) => Delay::Fixed(*duration),
            Delay::Computed(f) => Delay::Computed(Arc::clone(f)),
        }
    }
}

/// Whether resolved values can be flagged as failures.
pub(crate) enum RetryOn<T, E, A> {
    /// Every resolved value is a success and every error is retried.
    NoCustomRetryOnResult,
    /// Caller-supplied predicate, consulted for values and errors alike.
    Custom(Predicate<T, E, A>),
}

impl<T, E, A> Clone for RetryOn<T, E, A> {
    fn clone(&self) -> Self {
        match self {
            RetryOn::NoCustomRetryOnResult => RetryOn::NoCustomRetryOnResult,
            RetryOn::Custom(predicate) => RetryOn::Custom(Arc::clone(predicate)),
        }
    }
}

/// Immutable retry policy for operations producing `Result<T, E>` from arguments `A`.
///
/// `A` is whatever the operation takes: a tuple for several arguments, `()` for none.
///
/// # Examples
///
/// ```
/// use retryable::RetryConfig;
/// use std::time::Duration;
///
/// let config = RetryConfig::<String, std::io::Error, (&str, u16)>::builder()
///     .max_retries(5)
///     .fixed_delay(Duration::from_millis(200))
///     .on_error(|failure, attempt, (host, port)| {
///         eprintln!("attempt {attempt} against {host}:{port} failed: {failure:?}");
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(config.max_retries(), 5);
/// ```
pub struct RetryConfig<T, E, A> {
    max_retries: u32,
    on_error: Option<Hook<T, E, A>>,
    retry_on: RetryOn<T, E, A>,
    delay: Delay<T, E, A>,
}

impl<T, E, A> RetryConfig<T, E, A> {
    /// Start building a configuration from the defaults.
    pub fn builder() -> RetryConfigBuilder<T, E, A> {
        RetryConfigBuilder::new()
    }

    /// Total number of attempts allowed.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns `true` if a `retry_on` predicate was configured, which is what makes resolved
    /// values eligible for retry.
    pub fn has_custom_retry_on(&self) -> bool {
        matches!(self.retry_on, RetryOn::Custom(_))
    }

    /// Wrap an asynchronous operation with this policy.
    ///
    /// Shorthand for [`unsync::wrap`](crate::unsync::wrap).
    pub fn wrap<Op, Fut>(self, operation: Op) -> Retryable<Op, T, E, A>
    where
        Op: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        crate::unsync::wrap(operation, self)
    }

    pub(crate) fn notify(&self, failure: Outcome<'_, T, E>, attempt: u32, args: &A) {
        if let Some(on_error) = &self.on_error {
            on_error(failure, attempt, args);
        }
    }

    pub(crate) fn retry_on(&self) -> &RetryOn<T, E, A> {
        &self.retry_on
    }

    pub(crate) fn pause(
        &self,
        failure: Outcome<'_, T, E>,
        attempt: u32,
        args: &A,
    ) -> Option<Duration> {
        match &self.delay {
            Delay::None => None,
            Delay::Fixed(duration) => Some(*duration),
            Delay::Computed(delay) => Some(delay(failure, attempt, args)),
        }
    }
}

impl<T, E, A> Default for RetryConfig<T, E, A> {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            on_error: None,
            retry_on: RetryOn::NoCustomRetryOnResult,
            delay: Delay::None,
        }
    }
}

impl<T, E, A> Clone for RetryConfig<T, E, A> {
    fn clone(&self) -> Self {
        Self {
            max_retries: self.max_retries,
            on_error: self.on_error.clone(),
            retry_on: self.retry_on.clone(),
            delay: self.delay.clone(),
        }
    }
}

impl<T, E, A> fmt::Debug for RetryConfig<T, E, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let delay = match &self.delay {
            Delay::None => "none".to_string(),
            Delay::Fixed(duration) => format!("{:?}", duration),
            Delay::Computed(_) => "computed".to_string(),
        };
        f.debug_struct("RetryConfig")
            .field("max_retries", &self.max_retries)
            .field("on_error", &self.on_error.is_some())
            .field("custom_retry_on", &self.has_custom_retry_on())
            .field("delay", &delay)
            .finish()
    }
}

/// Builder for [`RetryConfig`].
///
/// Every closure receives the failing [`Outcome`], the 1-indexed attempt number and the
/// arguments the wrapped callable was invoked with.
pub struct RetryConfigBuilder<T, E, A> {
    max_retries: u32,
    on_error: Option<Hook<T, E, A>>,
    retry_on: Option<Vec<Predicate<T, E, A>>>,
    delay: Delay<T, E, A>,
}

impl<T, E, A> Default for RetryConfigBuilder<T, E, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E, A> RetryConfigBuilder<T, E, A> {
    /// Create a builder with the defaults: three attempts, no delay, no hook, every error
    /// retried and every value accepted.
    pub fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            on_error: None,
            retry_on: None,
            delay: Delay::None,
        }
    }

    /// Total number of attempts, the first invocation included.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Callback invoked once for every failed attempt, including the last one.
    ///
    /// The callback runs inline and its return value is ignored. A panic inside it is not
    /// caught and unwinds through the wrapped call.
    pub fn on_error<F>(mut self, on_error: F) -> Self
    where
        F: Fn(Outcome<'_, T, E>, u32, &A) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(on_error));
        self
    }

    /// Add a retry predicate.
    ///
    /// Predicates accumulate in call order and the outcome is retried if any of them returns
    /// `true`. Configuring at least one predicate also makes resolved values subject to it: a
    /// value the predicate accepts becomes a soft failure and is retried like an error.
    pub fn retry_on<F>(mut self, predicate: F) -> Self
    where
        F: Fn(Outcome<'_, T, E>, u32, &A) -> bool + Send + Sync + 'static,
    {
        self.retry_on
            .get_or_insert_with(Vec::new)
            .push(Arc::new(predicate));
        self
    }

    /// Add an ordered collection of retry predicates.
    ///
    /// Passing an empty collection still counts as a custom policy, one that never retries.
    pub fn retry_on_any<I>(mut self, predicates: I) -> Self
    where
        I: IntoIterator<Item = Predicate<T, E, A>>,
    {
        self.retry_on
            .get_or_insert_with(Vec::new)
            .extend(predicates);
        self
    }

    /// Wait a fixed number of milliseconds between attempts.
    pub fn delay_ms(self, millis: u64) -> Self {
        self.fixed_delay(Duration::from_millis(millis))
    }

    /// Wait a fixed duration between attempts.
    pub fn fixed_delay(mut self, delay: Duration) -> Self {
        self.delay = Delay::Fixed(delay);
        self
    }

    /// Compute the pause from the failure, the attempt that produced it and the call arguments.
    pub fn delay_with<F>(mut self, delay: F) -> Self
    where
        F: Fn(Outcome<'_, T, E>, u32, &A) -> Duration + Send + Sync + 'static,
    {
        self.delay = Delay::Computed(Arc::new(delay));
        self
    }

    /// Use a [`Backoff`] strategy for the pause, keyed on the attempt number alone.
    pub fn backoff<B>(self, backoff: B) -> Self
    where
        B: Backoff + Send + Sync + 'static,
        T: 'static,
        E: 'static,
        A: 'static,
    {
        self.delay_with(move |_, attempt, _| backoff.delay(attempt))
    }

    /// Validate the options and freeze them into a [`RetryConfig`].
    pub fn build(self) -> Result<RetryConfig<T, E, A>, ConfigError>
    where
        T: 'static,
        E: 'static,
        A: 'static,
    {
        if self.max_retries == 0 {
            return Err(ConfigError::ZeroAttempts);
        }

        let retry_on = match self.retry_on {
            None => RetryOn::NoCustomRetryOnResult,
            Some(mut predicates) if predicates.len() == 1 => RetryOn::Custom(predicates.remove(0)),
            Some(predicates) => RetryOn::Custom(any_of(predicates)),
        };

        Ok(RetryConfig {
            max_retries: self.max_retries,
            on_error: self.on_error,
            retry_on,
            delay: self.delay,
        })
    }
}

/// OR-combine predicates, stopping at the first that returns `true`.
fn any_of<T, E, A>(predicates: Vec<Predicate<T, E, A>>) -> Predicate<T, E, A>
where
    T: 'static,
    E: 'static,
    A: 'static,
{
    Arc::new(move |failure: Outcome<'_, T, E>, attempt: u32, args: &A| {
        predicates
            .iter()
            .any(|predicate| predicate(failure, attempt, args))
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::strategy::Exponential;
    use proptest::prelude::*;

    type Config = RetryConfig<u32, String, ()>;

    fn decide(config: &Config, failure: Outcome<'_, u32, String>) -> bool {
        match config.retry_on() {
            RetryOn::NoCustomRetryOnResult => failure.is_error(),
            RetryOn::Custom(predicate) => predicate(failure, 1, &()),
        }
    }

    #[test]
    fn defaults() {
        let config = Config::builder().build().unwrap();
        assert_eq!(config.max_retries(), DEFAULT_MAX_RETRIES);
        assert!(!config.has_custom_retry_on());
        assert_eq!(config.pause(Outcome::Value(&1), 1, &()), None);

        let default = Config::default();
        assert_eq!(default.max_retries(), 3);
        assert!(!default.has_custom_retry_on());
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let err = Config::builder().max_retries(0).build().unwrap_err();
        assert_eq!(err, ConfigError::ZeroAttempts);
    }

    #[test]
    fn fixed_and_computed_delays() {
        let fixed = Config::builder().delay_ms(250).build().unwrap();
        assert_eq!(
            fixed.pause(Outcome::Value(&0), 2, &()),
            Some(Duration::from_millis(250))
        );

        let computed = Config::builder()
            .delay_with(|failure, attempt, _| match failure {
                Outcome::Value(v) => Duration::from_millis(u64::from(*v) * u64::from(attempt)),
                Outcome::Error(_) => Duration::from_secs(1),
            })
            .build()
            .unwrap();
        assert_eq!(
            computed.pause(Outcome::Value(&10), 3, &()),
            Some(Duration::from_millis(30))
        );
        let err = "down".to_string();
        assert_eq!(
            computed.pause(Outcome::Error(&err), 3, &()),
            Some(Duration::from_secs(1))
        );
    }

    #[test]
    fn backoff_is_keyed_on_attempt() {
        let config = Config::builder()
            .backoff(Exponential::from_millis(10))
            .build()
            .unwrap();
        assert_eq!(
            config.pause(Outcome::Value(&0), 1, &()),
            Some(Duration::from_millis(10))
        );
        assert_eq!(
            config.pause(Outcome::Value(&0), 4, &()),
            Some(Duration::from_millis(80))
        );
    }

    #[test]
    fn later_delay_option_wins() {
        let config = Config::builder()
            .delay_ms(5)
            .fixed_delay(Duration::from_secs(2))
            .build()
            .unwrap();
        assert_eq!(
            config.pause(Outcome::Value(&0), 1, &()),
            Some(Duration::from_secs(2))
        );
    }

    #[test]
    fn single_predicate_is_used_directly() {
        let config = Config::builder()
            .retry_on(|failure, _, _| failure.value() == Some(&503))
            .build()
            .unwrap();
        assert!(config.has_custom_retry_on());
        assert!(decide(&config, Outcome::Value(&503)));
        assert!(!decide(&config, Outcome::Value(&200)));
    }

    #[test]
    fn predicates_are_or_combined_and_short_circuit() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (first, second) = (seen.clone(), seen.clone());

        let config = Config::builder()
            .retry_on(move |failure, _, _| {
                first.lock().unwrap().push("first");
                failure.value() == Some(&429)
            })
            .retry_on(move |failure, _, _| {
                second.lock().unwrap().push("second");
                failure.value() == Some(&503)
            })
            .build()
            .unwrap();

        assert!(decide(&config, Outcome::Value(&429)));
        assert_eq!(*seen.lock().unwrap(), vec!["first"]);

        seen.lock().unwrap().clear();
        assert!(decide(&config, Outcome::Value(&503)));
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);

        assert!(!decide(&config, Outcome::Value(&200)));
    }

    #[test]
    fn empty_collection_never_retries() {
        let config = Config::builder().retry_on_any(Vec::new()).build().unwrap();
        assert!(config.has_custom_retry_on());
        let err = "boom".to_string();
        assert!(!decide(&config, Outcome::Error(&err)));
        assert!(!decide(&config, Outcome::Value(&1)));
    }

    #[test]
    fn building_runs_no_callbacks() {
        let calls = Arc::new(Mutex::new(0));
        let (a, b, c) = (calls.clone(), calls.clone(), calls.clone());

        let _config = Config::builder()
            .on_error(move |_, _, _| *a.lock().unwrap() += 1)
            .retry_on(move |_, _, _| {
                *b.lock().unwrap() += 1;
                true
            })
            .delay_with(move |_, _, _| {
                *c.lock().unwrap() += 1;
                Duration::ZERO
            })
            .build()
            .unwrap();

        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn debug_output_names_the_options() {
        let config = Config::builder()
            .max_retries(4)
            .delay_ms(10)
            .build()
            .unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("max_retries: 4"));
        assert!(debug.contains("10ms"));
    }

    proptest! {
        #[test]
        fn predicate_order_does_not_change_the_decision(
            codes in proptest::collection::vec(0u32..600, 0..6),
            value in 0u32..600,
        ) {
            let forward: Vec<Predicate<u32, String, ()>> = codes
                .iter()
                .map(|&code| {
                    Arc::new(move |failure: Outcome<'_, u32, String>, _: u32, _: &()| {
                        failure.value() == Some(&code)
                    }) as Predicate<u32, String, ()>
                })
                .collect();
            let mut backward = forward.clone();
            backward.reverse();

            let forward = Config::builder().retry_on_any(forward).build().unwrap();
            let backward = Config::builder().retry_on_any(backward).build().unwrap();

            let expected = codes.contains(&value);
            prop_assert_eq!(decide(&forward, Outcome::Value(&value)), expected);
            prop_assert_eq!(decide(&backward, Outcome::Value(&value)), expected);
        }
    }
}
