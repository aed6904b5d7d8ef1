//! [`Executor`] adapters for existing thread pools.
//!
//! - [`TokioExecutor`] (feature `tokio`): runs tasks on a tokio runtime's
//!   blocking pool via `spawn_blocking`, so `map2`'s blocking waits never
//!   stall the runtime's async workers.
//! - [`RayonExecutor`]: runs tasks on a caller-owned rayon thread pool
//!   via `ThreadPool::spawn`. Blocking waits do occupy rayon workers, so
//!   the starvation caveats of [`ThreadPool`](super::ThreadPool) apply.
//!
//! Both adapters borrow infrastructure owned by the caller: they never build
//! or shut down the underlying runtime.

#[cfg(feature = "tokio")]
pub use self::tokio_executor::TokioExecutor;

pub use self::rayon_executor::RayonExecutor;

#[cfg(feature = "tokio")]
mod tokio_executor {
    use std::fmt;

    use tokio::runtime::Handle;

    use crate::par::executor::{Executor, Task};

    /// Submits tasks to a tokio runtime's blocking thread pool.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "tokio")]
    /// # {
    /// use std::sync::Arc;
    /// use parstate::par::{ExecutorRef, Par, TokioExecutor};
    ///
    /// let runtime = tokio::runtime::Builder::new_multi_thread().build().unwrap();
    /// let executor: ExecutorRef = Arc::new(TokioExecutor::new(runtime.handle().clone()));
    /// assert_eq!(Par::lazy_unit(|| 6 * 7).run_blocking(&executor), Ok(42));
    /// # }
    /// ```
    #[derive(Clone)]
    pub struct TokioExecutor {
        handle: Handle,
    }

    impl TokioExecutor {
        /// Wraps a runtime handle.
        pub const fn new(handle: Handle) -> Self {
            Self { handle }
        }

        /// Wraps the runtime the calling thread is running in, if any.
        pub fn current() -> Option<Self> {
            Handle::try_current().ok().map(Self::new)
        }
    }

    impl fmt::Debug for TokioExecutor {
        fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter
                .debug_struct("TokioExecutor")
                .field("flavor", &self.handle.runtime_flavor())
                .finish()
        }
    }

    impl Executor for TokioExecutor {
        fn execute(&self, task: Task) -> Result<(), Task> {
            // A task dropped by a runtime that is shutting down cancels its future.
            drop(self.handle.spawn_blocking(move || task.run()));
            Ok(())
        }

        fn name(&self) -> &str {
            "tokio"
        }
    }
}

mod rayon_executor {
    use std::fmt;
    use std::sync::Arc;

    use rayon::ThreadPool;

    use crate::par::executor::{Executor, Task};

    /// Submits tasks to a rayon thread pool.
    #[derive(Clone)]
    pub struct RayonExecutor {
        pool: Arc<ThreadPool>,
    }

    impl RayonExecutor {
        /// Wraps a shared rayon pool.
        pub const fn new(pool: Arc<ThreadPool>) -> Self {
            Self { pool }
        }
    }

    impl fmt::Debug for RayonExecutor {
        fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter
                .debug_struct("RayonExecutor")
                .field("threads", &self.pool.current_num_threads())
                .finish()
        }
    }

    impl Executor for RayonExecutor {
        fn execute(&self, task: Task) -> Result<(), Task> {
            self.pool.spawn(move || task.run());
            Ok(())
        }

        fn name(&self) -> &str {
            "rayon"
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rstest::rstest;

    use super::RayonExecutor;
    use crate::par::{Executor, ExecutorRef, Par, ParFuture, sum};

    fn rayon_executor(threads: usize) -> ExecutorRef {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build().unwrap();
        Arc::new(RayonExecutor::new(Arc::new(pool)))
    }

    #[rstest]
    fn rayon_fork_transparency() {
        let executor = rayon_executor(8);
        let computation = Par::unit(40).map2(Par::lazy_unit(|| 2), |a, b| a + b);
        let inner = computation.clone();
        let forked = Par::fork(move || inner.clone());
        assert_eq!(forked.run_blocking(&executor), computation.evaluate());
        assert_eq!(executor.name(), "rayon");
    }

    #[rstest]
    fn rayon_sum_of_small_slice() {
        let executor = rayon_executor(64);
        let values: Vec<i32> = (1..=20).collect();
        let future = Par::fork(move || sum(&values)).run(&executor);
        assert_eq!(future.get_timeout(Duration::from_secs(30)), Ok(210));
    }

    #[rstest]
    fn rayon_par_map_keeps_order() {
        let executor = rayon_executor(32);
        let par = Par::par_map(vec![3, 1, 2], |value: i32| value * 10);
        assert_eq!(par.run_blocking(&executor), Ok(vec![30, 10, 20]));
    }
}
