//! Divide-and-conquer reductions built from `fork` and `map2`.
//!
//! The input is split at its midpoint until pieces hold at most one element;
//! each half is forked and the halves are joined with `map2`. The resulting
//! tree has `O(log n)` depth and `O(n)` leaves. How much of it actually runs
//! concurrently is decided by the executor, and the result is the same as a
//! sequential fold for any associative `combine`.
//!
//! Every forked internal node blocks a worker while it waits for its
//! children, and forks are queued breadth first, so nearly all of them can be
//! waiting at once. Summing `n` values on a [`ThreadPool`](super::ThreadPool)
//! needs about `n - 1` workers, one more when the root is wrapped in
//! `Par::fork`. Smaller pools starve.
//!
//! The root of a reduction of two or more values is a `map2`, so `run`
//! blocks until the result is ready. Wrap it in `Par::fork` to get a handle
//! whose `get_timeout` bounds the wait:
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use parstate::par::{ExecutorRef, Par, ParFuture, ThreadPool, sum};
//!
//! let pool: ExecutorRef = Arc::new(ThreadPool::with_threads(8).unwrap());
//! let future = Par::fork(|| sum(&[1, 2, 3, 4, 5, 6, 7, 8])).run(&pool);
//! assert_eq!(future.get_timeout(Duration::from_secs(10)), Ok(36));
//! ```
//!
//! # Examples
//!
//! ```rust
//! use parstate::par::sum;
//!
//! assert_eq!(sum(&[1, 2, 3, 4, 5]).evaluate(), Ok(15));
//! assert_eq!(sum(&[]).evaluate(), Ok(0));
//! ```

use std::ops::Range;
use std::sync::Arc;

use super::par::Par;

/// Sums `values` by parallel divide and conquer.
///
/// Addition wraps on overflow, matching `values.iter().fold(0, |a, b| a.wrapping_add(*b))`.
pub fn sum(values: &[i32]) -> Par<i32> {
    reduce(values, 0, i32::wrapping_add)
}

/// Reduces `values` with `combine` by parallel divide and conquer.
///
/// An empty slice reduces to `zero`; a single element reduces to itself.
/// `combine` must be associative for the result to match a sequential fold.
pub fn reduce<A, F>(values: &[A], zero: A, combine: F) -> Par<A>
where
    A: Clone + Send + Sync + 'static,
    F: Fn(A, A) -> A + Send + Sync + 'static,
{
    let values: Arc<[A]> = values.into();
    let range = 0..values.len();
    reduce_range(values, range, zero, Arc::new(combine))
}

fn reduce_range<A, F>(values: Arc<[A]>, range: Range<usize>, zero: A, combine: Arc<F>) -> Par<A>
where
    A: Clone + Send + Sync + 'static,
    F: Fn(A, A) -> A + Send + Sync + 'static,
{
    if range.len() <= 1 {
        let value = values.get(range).and_then(<[A]>::first).cloned().unwrap_or(zero);
        return Par::unit(value);
    }

    let middle = range.start + range.len() / 2;
    let left = fork_range(Arc::clone(&values), range.start..middle, zero.clone(), Arc::clone(&combine));
    let right = fork_range(values, middle..range.end, zero, Arc::clone(&combine));
    left.map2(right, move |left_value, right_value| combine(left_value, right_value))
}

fn fork_range<A, F>(values: Arc<[A]>, range: Range<usize>, zero: A, combine: Arc<F>) -> Par<A>
where
    A: Clone + Send + Sync + 'static,
    F: Fn(A, A) -> A + Send + Sync + 'static,
{
    Par::fork(move || {
        reduce_range(
            Arc::clone(&values),
            range.clone(),
            zero.clone(),
            Arc::clone(&combine),
        )
    })
}
