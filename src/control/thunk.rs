//! Memoized deferred computations.
//!
//! A [`Thunk`] wraps a zero-argument initializer and evaluates it at most once.
//! The first call to [`Thunk::force`] runs the initializer and caches the result;
//! every later call returns the cached value. The memoization cell is guarded by
//! a `parking_lot::Mutex`, so a `Thunk` can be shared between threads (for
//! example by a [`Par::lazy_unit`](crate::par::Par::lazy_unit) description that
//! is run on several pool threads).
//!
//! # Poisoning
//!
//! If the initializer panics the thunk becomes poisoned: the panic is resumed
//! for the caller that triggered it, `force` panics for every later caller and
//! [`Thunk::try_force`] returns [`ThunkPoisonedError`].
//!
//! # Re-entry
//!
//! Forcing a thunk from inside its own initializer deadlocks: the memoization
//! lock is held for the whole evaluation.
//!
//! # Examples
//!
//! ```rust
//! use parstate::control::Thunk;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let calls = AtomicUsize::new(0);
//! let thunk = Thunk::new(|| {
//!     calls.fetch_add(1, Ordering::SeqCst);
//!     42
//! });
//!
//! assert_eq!(calls.load(Ordering::SeqCst), 0);
//! assert_eq!(thunk.force(), 42);
//! assert_eq!(thunk.force(), 42);
//! assert_eq!(calls.load(Ordering::SeqCst), 1);
//! ```

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};

use parking_lot::Mutex;

/// The internal state of a [`Thunk`].
#[derive(Debug)]
pub enum ThunkState<T, F> {
    /// Not evaluated yet; holds the initializer.
    Pending(F),
    /// Evaluated; holds the memoized value.
    Evaluated(T),
    /// The initializer panicked.
    Poisoned,
}

/// Error returned by [`Thunk::try_force`] when the initializer has panicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThunkPoisonedError;

impl fmt::Display for ThunkPoisonedError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Thunk: initializer panicked, value is unavailable")
    }
}

impl std::error::Error for ThunkPoisonedError {}

/// A thread-safe, memoized, zero-argument computation.
///
/// # Type Parameters
///
/// * `T` - The type of the computed value
/// * `F` - The type of the initializer (defaults to `fn() -> T`)
pub struct Thunk<T, F = fn() -> T> {
    state: Mutex<ThunkState<T, F>>,
}

impl<T, F: FnOnce() -> T> Thunk<T, F> {
    /// Creates a thunk that will run `initializer` on first use.
    #[inline]
    pub const fn new(initializer: F) -> Self {
        Self {
            state: Mutex::new(ThunkState::Pending(initializer)),
        }
    }

    /// Evaluates the thunk if needed and returns a copy of the value.
    ///
    /// # Panics
    ///
    /// - If the initializer panics (the panic is resumed here).
    /// - If the thunk was poisoned by an earlier panic.
    pub fn force(&self) -> T
    where
        T: Clone,
    {
        match self.try_force() {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }

    /// Evaluates the thunk if needed, reporting a poisoned thunk as an error.
    ///
    /// A panic raised by the initializer during this call is still resumed;
    /// only callers arriving after the poisoning observe the error.
    ///
    /// # Errors
    ///
    /// Returns [`ThunkPoisonedError`] if an earlier evaluation panicked.
    pub fn try_force(&self) -> Result<T, ThunkPoisonedError>
    where
        T: Clone,
    {
        let mut state = self.state.lock();
        match &*state {
            ThunkState::Evaluated(value) => return Ok(value.clone()),
            ThunkState::Poisoned => return Err(ThunkPoisonedError),
            ThunkState::Pending(_) => {}
        }

        let ThunkState::Pending(initializer) = std::mem::replace(&mut *state, ThunkState::Poisoned)
        else {
            unreachable!()
        };

        match catch_unwind(AssertUnwindSafe(initializer)) {
            Ok(value) => {
                *state = ThunkState::Evaluated(value.clone());
                Ok(value)
            }
            Err(payload) => {
                drop(state);
                resume_unwind(payload)
            }
        }
    }
}

impl<T> Thunk<T, fn() -> T> {
    /// Creates a thunk that is already evaluated.
    #[inline]
    pub const fn evaluated(value: T) -> Self {
        Self {
            state: Mutex::new(ThunkState::Evaluated(value)),
        }
    }
}

impl<T, F> Thunk<T, F> {
    /// Returns whether the initializer has already run successfully.
    pub fn is_evaluated(&self) -> bool {
        matches!(&*self.state.lock(), ThunkState::Evaluated(_))
    }

    /// Returns whether the initializer panicked.
    pub fn is_poisoned(&self) -> bool {
        matches!(&*self.state.lock(), ThunkState::Poisoned)
    }
}

impl<T: fmt::Debug, F> fmt::Debug for Thunk<T, F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.state.lock() {
            ThunkState::Pending(_) => formatter.write_str("Thunk(<pending>)"),
            ThunkState::Evaluated(value) => formatter.debug_tuple("Thunk").field(value).finish(),
            ThunkState::Poisoned => formatter.write_str("Thunk(<poisoned>)"),
        }
    }
}

static_assertions::assert_impl_all!(Thunk<i32, fn() -> i32>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[rstest]
    fn thunk_defers_until_forced() {
        let calls = AtomicUsize::new(0);
        let thunk = Thunk::new(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            "value".to_string()
        });

        assert!(!thunk.is_evaluated());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(thunk.force(), "value");
        assert!(thunk.is_evaluated());
    }

    #[rstest]
    fn thunk_evaluated_skips_initializer() {
        let thunk = Thunk::evaluated(7);
        assert!(thunk.is_evaluated());
        assert_eq!(thunk.force(), 7);
    }

    #[rstest]
    fn thunk_evaluates_once_across_threads() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let thunk = Arc::new(Thunk::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            99
        }));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let thunk = Arc::clone(&thunk);
                thread::spawn(move || thunk.force())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 99);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn thunk_poisoned_after_panic() {
        let thunk: Thunk<i32, _> = Thunk::new(|| panic!("boom"));

        let first = catch_unwind(AssertUnwindSafe(|| thunk.force()));
        assert!(first.is_err());
        assert!(thunk.is_poisoned());
        assert_eq!(thunk.try_force(), Err(ThunkPoisonedError));
    }

    #[rstest]
    fn thunk_debug_shows_state() {
        let thunk = Thunk::new(|| 3);
        assert_eq!(format!("{thunk:?}"), "Thunk(<pending>)");
        let _ = thunk.force();
        assert_eq!(format!("{thunk:?}"), "Thunk(3)");
    }
}
