//! Control structures shared by the combinator algebras.
//!
//! - [`Thunk`]: a deferred, memoized, thread-safe computation evaluated at most once
//!
//! # Examples
//!
//! ```rust
//! use parstate::control::Thunk;
//!
//! let thunk = Thunk::new(|| (1..=10).sum::<i32>());
//! assert_eq!(thunk.force(), 55);
//! ```

mod thunk;

pub use thunk::{Thunk, ThunkPoisonedError, ThunkState};
