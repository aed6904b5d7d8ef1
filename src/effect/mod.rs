//! Sequential, state-threading effects.
//!
//! [`State`] describes a pure transition `S -> (A, S)`. Descriptions are built
//! by composition (`pure`, `fmap`, `map2`, `flat_map`, `sequence`) and only
//! executed by [`State::run`], which threads an explicit state value through
//! the whole composition. The random generator in [`crate::random`] and the
//! candy machine in [`crate::machine`] are both built on it.
//!
//! ```rust
//! use parstate::effect::State;
//!
//! let program = State::put(5)
//!     .then(State::modify(|s: i32| s + 1))
//!     .then(State::get());
//! assert_eq!(program.run(0), (6, 6));
//! ```

mod state;

pub use state::State;
