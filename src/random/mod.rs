//! Deterministic pseudo-random generation built on [`State`](crate::effect::State).
//!
//! [`SimpleRng`] is an immutable 48-bit linear-congruential generator: drawing
//! a value returns the next generator instead of mutating the current one.
//! The combinators in this module describe random values as [`Rand`]
//! transitions over the generator, so larger random structures are composed
//! with the ordinary state combinators and drawn with a single `run`.
//!
//! # Examples
//!
//! ```rust
//! use parstate::random::{self, SimpleRng};
//!
//! let dice = random::ints::<SimpleRng>(3)
//!     .fmap(|values| values.into_iter().map(|value| value.rem_euclid(6) + 1).collect::<Vec<_>>());
//! let (rolls, _next) = dice.run(SimpleRng::new(42));
//! assert_eq!(rolls.len(), 3);
//! assert!(rolls.iter().all(|roll| (1..=6).contains(roll)));
//! ```

mod rand;
mod rng;

pub use rand::{
    Rand, both, double, double_int, double3, int, int_double, ints, non_negative_even,
    non_negative_int, non_negative_less_than, non_negative_less_than_via_flat_map, unit,
};
pub use rng::{RandomGenerator, SimpleRng, random_pair, random_pair2};
