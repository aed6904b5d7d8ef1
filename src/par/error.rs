//! Errors surfaced when retrieving the result of a parallel computation.

use std::error::Error;
use std::fmt;
use std::time::Duration;

/// Why a future did not produce a value.
///
/// A computed value and any of these conditions are mutually exclusive: a
/// timed-out `get` leaves the future untouched, so the caller may retry,
/// cancel or give up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParError {
    /// `get_timeout` gave up before the result was available.
    Timeout {
        /// How long the caller waited.
        waited: Duration,
    },

    /// The computation was cancelled, or abandoned by an executor that shut
    /// down before running it.
    Cancelled,

    /// The computation panicked on the thread that ran it.
    Panicked {
        /// The panic payload, when it was a string.
        message: String,
    },

    /// The executor refused the task (for example after shutdown).
    Rejected {
        /// Name of the refusing executor.
        executor: String,
    },
}

impl ParError {
    /// Returns whether this is a [`ParError::Timeout`].
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl fmt::Display for ParError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout { waited } => {
                write!(formatter, "result not available after waiting {waited:?}")
            }
            Self::Cancelled => write!(formatter, "computation was cancelled"),
            Self::Panicked { message } => write!(formatter, "computation panicked: {message}"),
            Self::Rejected { executor } => {
                write!(formatter, "executor `{executor}` rejected the task")
            }
        }
    }
}

impl Error for ParError {}
