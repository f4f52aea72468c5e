//! Borrowed view of a finished attempt.

/// What a single attempt produced, as seen by predicates, hooks and delay functions.
///
/// A `Value` is only ever treated as a failure when a custom `retry_on` predicate flags it.
#[derive(Debug)]
pub enum Outcome<'a, T, E> {
    /// The operation resolved with a value.
    Value(&'a T),
    /// The operation failed with an error.
    Error(&'a E),
}

impl<'a, T, E> Outcome<'a, T, E> {
    /// Returns `true` if the attempt failed with an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }

    /// Returns `true` if the attempt resolved with a value.
    pub fn is_value(&self) -> bool {
        matches!(self, Outcome::Value(_))
    }

    /// The resolved value, if any.
    pub fn value(&self) -> Option<&'a T> {
        match *self {
            Outcome::Value(value) => Some(value),
            Outcome::Error(_) => None,
        }
    }

    /// The error, if any.
    pub fn error(&self) -> Option<&'a E> {
        match *self {
            Outcome::Error(err) => Some(err),
            Outcome::Value(_) => None,
        }
    }
}

impl<T, E> Clone for Outcome<'_, T, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, E> Copy for Outcome<'_, T, E> {}
