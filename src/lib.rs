//! # parstate
//!
//! Pure descriptions, separate interpreters.
//!
//! This library builds two combinator algebras from the same primitives
//! (`unit`, `map`, `map2` and a runner) and keeps description and execution
//! apart:
//!
//! - **State threading**: [`effect::State`] describes `S -> (A, S)`
//!   transitions that are run by threading an explicit state value. The
//!   [`random`] generator and the candy-dispenser [`machine`] are built on it.
//! - **Parallel computations**: [`par::Par`] describes work that an
//!   interpreter later submits to an executor, with future-based retrieval,
//!   timeouts and cancellation, or evaluates directly on the calling thread.
//!
//! ## Feature Flags
//!
//! - `tokio`: [`par::TokioExecutor`], running tasks on a tokio blocking pool
//! - `serde`: `Serialize`/`Deserialize` for machines, generators and pool configuration
//! - `full`: all of the above
//!
//! ## Example
//!
//! ```rust
//! use parstate::prelude::*;
//!
//! let (rolls, _) = random::ints::<SimpleRng>(4).run(SimpleRng::new(7));
//! let total = sum(&rolls.iter().map(|roll| roll.rem_euclid(6) + 1).collect::<Vec<_>>());
//! let expected: i32 = rolls.iter().map(|roll| roll.rem_euclid(6) + 1).sum();
//! assert_eq!(total.evaluate(), Ok(expected));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// ```rust
/// use parstate::prelude::*;
/// ```
pub mod prelude {
    pub use crate::control::*;
    pub use crate::effect::*;
    pub use crate::machine::{Input, Machine, simulate, simulate_machine};
    pub use crate::par::*;
    pub use crate::random::{self, Rand, RandomGenerator, SimpleRng};
}

pub mod control;
pub mod effect;
pub mod machine;
pub mod par;
pub mod random;
