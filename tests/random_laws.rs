//! Property-based tests for the random generator.
//!
//! - **Determinism**: equal seeds give equal `(value, next)` pairs
//! - **Range**: non-negative ints, doubles in `[0, 1)`, bounded draws below the bound
//! - **Length**: `ints(n)` yields exactly `n` values

use parstate::effect::State;
use parstate::random::{self, RandomGenerator, SimpleRng};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_next_int_is_deterministic(seed in any::<i64>()) {
        let first = SimpleRng::new(seed).next_int();
        let second = SimpleRng::new(seed).next_int();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_seed_stays_within_48_bits(seed in any::<i64>(), draws in 0usize..50) {
        let (_, rng) = random::ints::<SimpleRng>(draws).run(SimpleRng::new(seed));
        prop_assert!(rng.seed() < (1 << 48));
    }

    #[test]
    fn prop_non_negative_int_is_non_negative(seed in any::<i64>()) {
        let (value, _) = random::non_negative_int().run(SimpleRng::new(seed));
        prop_assert!(value >= 0);
    }

    #[test]
    fn prop_double_is_in_unit_interval(seed in any::<i64>()) {
        let (value, _) = random::double().run(SimpleRng::new(seed));
        prop_assert!((0.0..1.0).contains(&value));
    }

    #[test]
    fn prop_double3_components_in_unit_interval(seed in any::<i64>()) {
        let ((a, b, c), _) = random::double3().run(SimpleRng::new(seed));
        for value in [a, b, c] {
            prop_assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn prop_non_negative_even_is_even(seed in any::<i64>()) {
        let (value, _) = random::non_negative_even().run(SimpleRng::new(seed));
        prop_assert!(value >= 0);
        prop_assert_eq!(value % 2, 0);
    }

    #[test]
    fn prop_non_negative_less_than_is_bounded(seed in any::<i64>(), bound in 1..i32::MAX) {
        let (value, _) = random::non_negative_less_than(bound).run(SimpleRng::new(seed));
        prop_assert!((0..bound).contains(&value));
    }

    #[test]
    fn prop_bounded_draw_versions_agree(seed in any::<i64>(), bound in 1..i32::MAX) {
        let rng = SimpleRng::new(seed);
        prop_assert_eq!(
            random::non_negative_less_than(bound).run(rng),
            random::non_negative_less_than_via_flat_map(bound).run(rng)
        );
    }

    #[test]
    fn prop_ints_has_requested_length(seed in any::<i64>(), count in 0usize..200) {
        let rng = SimpleRng::new(seed);
        let (values, next) = random::ints(count).run(rng);
        prop_assert_eq!(values.len(), count);
        if count == 0 {
            prop_assert_eq!(next, rng);
        }
    }

    #[test]
    fn prop_ints_matches_sequence_of_int(seed in any::<i64>(), count in 0usize..50) {
        let rng = SimpleRng::new(seed);
        let sequenced = State::sequence((0..count).map(|_| random::int()).collect());
        prop_assert_eq!(random::ints(count).run(rng), sequenced.run(rng));
    }

    #[test]
    fn prop_both_threads_generator(seed in any::<i64>()) {
        let rng = SimpleRng::new(seed);
        let ((first, second), next) = random::both(random::int(), random::int()).run(rng);
        let (expected, expected_next) = random::ints(2).run(rng);
        prop_assert_eq!(vec![first, second], expected);
        prop_assert_eq!(next, expected_next);
    }
}

#[test]
fn ints_five_from_seed_42_advances_generator() {
    let rng = SimpleRng::new(42);
    let (values, next) = random::ints(5).run(rng);
    assert_eq!(
        values,
        vec![16_159_453, -1_281_479_697, -340_305_902, -2_015_756_020, 1_770_001_318]
    );
    assert_ne!(next, rng);
}

#[test]
fn unit_does_not_advance_generator() {
    let rng = SimpleRng::new(3);
    assert_eq!(random::unit("same").run(rng), ("same", rng));
}
