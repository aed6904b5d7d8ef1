//! Random values as state-threading descriptions.
//!
//! Every function here returns a [`Rand`], i.e. a [`State`] whose state is the
//! generator. Nothing is drawn until the description is run with a generator.

use super::rng::{RandomGenerator, SimpleRng};
use crate::effect::State;

/// A description of a random value of type `A`, drawn from generator `R`.
pub type Rand<A, R = SimpleRng> = State<R, A>;

const UNIT_INTERVAL_SCALE: f64 = 2_147_483_648.0; // i32::MAX + 1

/// The raw 32-bit value of the generator.
pub fn int<R>() -> Rand<i32, R>
where
    R: RandomGenerator + 'static,
{
    State::new(|rng: R| rng.next_int())
}

/// Produces `value` without advancing the generator.
pub fn unit<A, R>(value: A) -> Rand<A, R>
where
    A: Clone + 'static,
    R: 'static,
{
    State::pure(value)
}

/// Folds a raw value into `0..=i32::MAX`.
///
/// Negative values map to `-(value + 1)`, which is total over `i32`:
/// `i32::MIN` becomes `i32::MAX` and no value is ever negated directly.
const fn fold_non_negative(value: i32) -> i32 {
    if value >= 0 { value } else { -(value + 1) }
}

/// A value in `0..=i32::MAX`.
pub fn non_negative_int<R>() -> Rand<i32, R>
where
    R: RandomGenerator + 'static,
{
    int().fmap(fold_non_negative)
}

/// An even value in `0..=i32::MAX - 1`.
pub fn non_negative_even<R>() -> Rand<i32, R>
where
    R: RandomGenerator + 'static,
{
    non_negative_int().fmap(|value| value - value % 2)
}

/// A value in `[0, 1)`.
pub fn double<R>() -> Rand<f64, R>
where
    R: RandomGenerator + 'static,
{
    non_negative_int().fmap(|value| f64::from(value) / UNIT_INTERVAL_SCALE)
}

/// Pairs two descriptions, running `first` before `second`.
pub fn both<A, B, R>(first: Rand<A, R>, second: Rand<B, R>) -> Rand<(A, B), R>
where
    A: 'static,
    B: 'static,
    R: 'static,
{
    first.product(second)
}

/// A raw integer followed by a double.
pub fn int_double<R>() -> Rand<(i32, f64), R>
where
    R: RandomGenerator + 'static,
{
    both(int(), double())
}

/// A double followed by a raw integer.
pub fn double_int<R>() -> Rand<(f64, i32), R>
where
    R: RandomGenerator + 'static,
{
    both(double(), int())
}

/// Three consecutive doubles.
pub fn double3<R>() -> Rand<(f64, f64, f64), R>
where
    R: RandomGenerator + 'static,
{
    double()
        .map2(double(), |first, second| (first, second))
        .map2(double(), |(first, second), third| (first, second, third))
}

/// `count` raw integers in draw order.
///
/// Drawn with an explicit loop, so `count` is not limited by stack depth.
/// A `count` of zero leaves the generator untouched.
pub fn ints<R>(count: usize) -> Rand<Vec<i32>, R>
where
    R: RandomGenerator + 'static,
{
    State::new(move |rng: R| {
        let mut values = Vec::with_capacity(count);
        let mut rng = rng;
        for _ in 0..count {
            let (value, next) = rng.next_int();
            values.push(value);
            rng = next;
        }
        (values, rng)
    })
}

/// Whether `value` lies in a complete bucket of width `bound`, i.e. the bucket
/// `[value - value % bound, value - value % bound + bound - 1]` fits in `i32`.
const fn in_complete_bucket(value: i32, bound: i32) -> bool {
    let bucket_start = value - value % bound;
    bucket_start.checked_add(bound - 1).is_some()
}

/// A value in `0..bound` without modulo bias.
///
/// Draws from the top, incomplete bucket are rejected and redrawn.
///
/// # Panics
///
/// Panics if `bound <= 0`.
pub fn non_negative_less_than<R>(bound: i32) -> Rand<i32, R>
where
    R: RandomGenerator + 'static,
{
    assert!(bound > 0, "non_negative_less_than: bound must be positive, got {bound}");
    State::new(move |rng: R| {
        let mut rng = rng;
        loop {
            let (raw, next) = rng.next_int();
            let value = fold_non_negative(raw);
            if in_complete_bucket(value, bound) {
                return (value % bound, next);
            }
            rng = next;
        }
    })
}

/// [`non_negative_less_than`] written with `flat_map`; draws the same sequence.
///
/// # Panics
///
/// Panics if `bound <= 0`.
pub fn non_negative_less_than_via_flat_map<R>(bound: i32) -> Rand<i32, R>
where
    R: RandomGenerator + 'static,
{
    assert!(bound > 0, "non_negative_less_than: bound must be positive, got {bound}");
    non_negative_int().flat_map(move |value| {
        if in_complete_bucket(value, bound) {
            unit(value % bound)
        } else {
            non_negative_less_than_via_flat_map(bound)
        }
    })
}
