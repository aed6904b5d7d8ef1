//! Property-based tests for Par laws.
//!
//! - **Identity**: `unit(a)` interprets to `a`
//! - **map2**: `map2(unit(a), unit(b), f)` interprets to `f(a, b)`
//! - **Functor**: identity and composition of `map`
//! - **Fork transparency**: `fork(x)` interprets to the same value as `x`
//! - **Reduction**: parallel `sum` equals the sequential fold
//!
//! Every law is checked in direct mode and against a shared thread pool.

use std::sync::{Arc, LazyLock};

use parstate::par::{ExecutorRef, Par, PoolConfig, ThreadPool, reduce, sum};
use proptest::prelude::*;

static POOL: LazyLock<ExecutorRef> = LazyLock::new(|| {
    let pool = ThreadPool::new(PoolConfig::default().with_threads(256).with_thread_name("par-laws"))
        .expect("pool for law tests");
    Arc::new(pool)
});

fn both_modes<A>(par: &Par<A>) -> (Result<A, parstate::par::ParError>, Result<A, parstate::par::ParError>)
where
    A: Clone + Send + Sync + 'static,
{
    (par.evaluate(), par.run_blocking(&POOL))
}

// =============================================================================
// Identity and map2
// =============================================================================

proptest! {
    #[test]
    fn prop_par_unit_identity(value in any::<i64>()) {
        let (direct, pooled) = both_modes(&Par::unit(value));
        prop_assert_eq!(direct, Ok(value));
        prop_assert_eq!(pooled, Ok(value));
    }

    #[test]
    fn prop_par_map2_of_units(first in any::<i32>(), second in any::<i32>()) {
        let function = |a: i32, b: i32| a.wrapping_mul(31).wrapping_add(b);
        let par = Par::unit(first).map2(Par::unit(second), function);
        let (direct, pooled) = both_modes(&par);
        prop_assert_eq!(direct, Ok(function(first, second)));
        prop_assert_eq!(pooled, Ok(function(first, second)));
    }

    #[test]
    fn prop_par_functor_identity(value in any::<i32>()) {
        let par = Par::unit(value).map(|x| x);
        prop_assert_eq!(par.run_blocking(&POOL), Ok(value));
    }

    #[test]
    fn prop_par_functor_composition(value in any::<i32>()) {
        let function1 = |n: i32| n.wrapping_add(1);
        let function2 = |n: i32| n.wrapping_mul(2);

        let left = Par::unit(value).map(function1).map(function2);
        let right = Par::unit(value).map(move |x| function2(function1(x)));

        prop_assert_eq!(left.run_blocking(&POOL), right.run_blocking(&POOL));
    }
}

// =============================================================================
// Fork Transparency
// =============================================================================

proptest! {
    #[test]
    fn prop_par_fork_transparency(first in any::<i32>(), second in any::<i32>()) {
        let computation = Par::unit(first).map2(Par::lazy_unit(move || second), i32::wrapping_sub);
        let inner = computation.clone();
        let forked = Par::fork(move || inner.clone());

        prop_assert_eq!(forked.evaluate(), computation.evaluate());
        prop_assert_eq!(forked.run_blocking(&POOL), computation.run_blocking(&POOL));
    }

    #[test]
    fn prop_par_nested_fork_transparency(value in any::<u16>(), depth in 0usize..6) {
        let mut par = Par::unit(u32::from(value));
        for _ in 0..depth {
            let inner = par.clone();
            par = Par::fork(move || inner.clone());
        }
        prop_assert_eq!(par.run_blocking(&POOL), Ok(u32::from(value)));
    }
}

// =============================================================================
// Parallel Reduction
// =============================================================================

proptest! {
    #[test]
    fn prop_sum_matches_sequential_fold(values in prop::collection::vec(any::<i32>(), 0..16)) {
        let expected = values.iter().fold(0_i32, |acc, value| acc.wrapping_add(*value));
        let (direct, pooled) = both_modes(&sum(&values));
        prop_assert_eq!(direct, Ok(expected));
        prop_assert_eq!(pooled, Ok(expected));
    }

    #[test]
    fn prop_reduce_preserves_order(words in prop::collection::vec("[a-z]{0,3}", 0..12)) {
        let expected: String = words.concat();
        let par = reduce(&words, String::new(), |left, right| left + &right);
        prop_assert_eq!(par.run_blocking(&POOL), Ok(expected));
    }

    #[test]
    fn prop_par_map_matches_iterator_map(values in prop::collection::vec(any::<i32>(), 0..12)) {
        let expected: Vec<i64> = values.iter().map(|value| i64::from(*value) * 3).collect();
        let par = Par::par_map(values, |value: i32| i64::from(value) * 3);
        prop_assert_eq!(par.run_blocking(&POOL), Ok(expected));
    }
}

#[test]
fn parallel_sum_examples() {
    assert_eq!(sum(&[]).run_blocking(&POOL), Ok(0));
    assert_eq!(sum(&[7]).run_blocking(&POOL), Ok(7));
    assert_eq!(sum(&[1, 2, 3, 4, 5]).run_blocking(&POOL), Ok(15));
}
