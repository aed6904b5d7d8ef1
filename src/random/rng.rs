//! The generator interface and its linear-congruential implementation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const MULTIPLIER: u64 = 0x5_DEEC_E66D;
const INCREMENT: u64 = 0xB;
const SEED_MASK: u64 = (1 << 48) - 1;

/// A purely functional source of pseudo-random 32-bit integers.
///
/// `next_int` never mutates the receiver: it returns the produced value
/// together with the generator to use next. Calling it twice on the same
/// generator yields the same pair.
pub trait RandomGenerator: Sized {
    /// Produces a value and the successor generator.
    fn next_int(&self) -> (i32, Self);
}

/// A 48-bit linear-congruential generator.
///
/// `seed' = (seed * 0x5DEECE66D + 0xB) mod 2^48`; the produced value is
/// bits 16..47 of `seed'` read as a signed 32-bit integer.
///
/// # Examples
///
/// ```rust
/// use parstate::random::{RandomGenerator, SimpleRng};
///
/// let rng = SimpleRng::new(42);
/// let (first, next) = rng.next_int();
/// assert_eq!(first, 16_159_453);
/// assert_eq!(next.next_int().0, -1_281_479_697);
///
/// // Pure: the old generator still produces the same value.
/// assert_eq!(rng.next_int().0, first);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimpleRng {
    seed: u64,
}

impl SimpleRng {
    /// Creates a generator from a caller supplied seed, reduced modulo `2^48`.
    #[allow(clippy::cast_sign_loss)]
    pub const fn new(seed: i64) -> Self {
        Self {
            seed: (seed as u64) & SEED_MASK,
        }
    }

    /// The current 48-bit seed.
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomGenerator for SimpleRng {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn next_int(&self) -> (i32, Self) {
        let seed = self
            .seed
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT)
            & SEED_MASK;
        let value = (seed >> 16) as u32 as i32;
        (value, Self { seed })
    }
}

/// Draws two values from the *same* generator, so both are equal.
pub fn random_pair<R: RandomGenerator>(rng: &R) -> (i32, i32) {
    let (first, _) = rng.next_int();
    let (second, _) = rng.next_int();
    (first, second)
}

/// Draws two values by threading the generator, returning the final one.
pub fn random_pair2<R: RandomGenerator>(rng: &R) -> ((i32, i32), R) {
    let (first, rng2) = rng.next_int();
    let (second, rng3) = rng2.next_int();
    ((first, second), rng3)
}
