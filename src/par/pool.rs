//! Fixed-size worker pool implementing [`Executor`].
//!
//! `ThreadPool` runs [`Task`]s on a dedicated `rayon` thread pool sized and
//! named by [`PoolConfig`]. Submitted tasks wait in a FIFO queue; every
//! submission spawns one rayon job that takes the oldest waiting task, so
//! tasks start in submission order even when they are forked from inside a
//! worker.
//!
//! # Starvation
//!
//! A task that blocks on another task's future occupies its worker while it
//! waits. `Par::map2` blocks this way, so a description whose waiting forks
//! outnumber the workers can deadlock: every worker waits on a task still
//! sitting in the queue. Forks are queued breadth first, so nearly every
//! internal node of a fork tree can be waiting at once. A parallel
//! [`sum`](super::sum) of `n` values needs about `n - 1` workers.
//!
//! `get_timeout` only bounds a run whose root is a `fork`: `Par::run` returns
//! the root task's future immediately. A root `map2` blocks inside `run`
//! itself, before any handle exists. Wrap the root in `Par::fork` to keep a
//! starved pool observable as a [`ParError::Timeout`](super::ParError::Timeout).
//!
//! # Shutdown
//!
//! [`ThreadPool::shutdown`] (also run when the last handle is dropped) stops
//! accepting tasks and abandons everything still queued. Their futures
//! resolve as cancelled, which also releases workers blocked on them. Running
//! tasks finish and the workers exit afterwards. Forked tasks never keep
//! their pool alive, so dropping the last handle to a starved pool still
//! shuts it down.
//!
//! # Examples
//!
//! ```rust
//! use parstate::par::{ParFuture, PoolConfig, ThreadPool, submit};
//!
//! let pool = ThreadPool::new(PoolConfig::default().with_threads(2)).unwrap();
//! let future = submit(&pool, || 20 + 22);
//! assert_eq!(future.get(), Ok(42));
//! ```

use std::collections::VecDeque;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::executor::{Executor, Task};

const DEFAULT_THREAD_NAME: &str = "parstate-worker";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when creating a `ThreadPool`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The pool was configured with zero threads.
    InvalidThreadCount,

    /// The worker threads could not be started.
    Spawn {
        /// The underlying build error, rendered.
        message: String,
    },
}

impl fmt::Display for PoolError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidThreadCount => {
                write!(formatter, "thread count must be greater than 0")
            }
            Self::Spawn { message } => {
                write!(formatter, "failed to start worker threads: {message}")
            }
        }
    }
}

impl Error for PoolError {}

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a [`ThreadPool`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoolConfig {
    /// Number of worker threads. Defaults to the number of logical CPUs.
    pub threads: usize,
    /// Prefix of worker thread names; workers are named `{prefix}-{index}`.
    pub thread_name: String,
    /// Stack size of each worker, or the platform default.
    pub stack_size: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            threads: num_cpus::get(),
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            stack_size: None,
        }
    }
}

impl PoolConfig {
    /// Sets the number of worker threads.
    #[must_use]
    pub const fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Sets the worker thread name prefix.
    #[must_use]
    pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }

    /// Sets the worker stack size in bytes.
    #[must_use]
    pub const fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = Some(stack_size);
        self
    }

    fn validate(&self) -> Result<(), PoolError> {
        if self.threads == 0 {
            return Err(PoolError::InvalidThreadCount);
        }
        Ok(())
    }
}

// =============================================================================
// ThreadPool
// =============================================================================

struct Queue {
    tasks: VecDeque<Task>,
    shutdown: bool,
}

struct Shared {
    queue: Mutex<Queue>,
}

impl Shared {
    fn run_next(&self) {
        let task = self.queue.lock().tasks.pop_front();
        if let Some(task) = task {
            task.run();
        }
    }
}

/// A fixed-size pool of worker threads.
pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Mutex<Option<rayon::ThreadPool>>,
    config: PoolConfig,
}

impl fmt::Debug for ThreadPool {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ThreadPool")
            .field("threads", &self.config.threads)
            .field("thread_name", &self.config.thread_name)
            .finish_non_exhaustive()
    }
}

impl ThreadPool {
    /// Starts a pool as described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidThreadCount`] for a zero thread count and
    /// [`PoolError::Spawn`] if the worker threads cannot be started.
    pub fn new(config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;

        let prefix = config.thread_name.clone();
        let mut builder = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(move |index| format!("{prefix}-{index}"))
            .start_handler(|index| tracing::debug!(worker = index, "worker started"))
            .exit_handler(|index| tracing::debug!(worker = index, "worker stopped"));
        if let Some(stack_size) = config.stack_size {
            builder = builder.stack_size(stack_size);
        }
        let workers = builder.build().map_err(|error| PoolError::Spawn {
            message: error.to_string(),
        })?;

        tracing::debug!(
            threads = config.threads,
            thread_name = %config.thread_name,
            "thread pool started"
        );
        Ok(Self {
            shared: Arc::new(Shared {
                queue: Mutex::new(Queue {
                    tasks: VecDeque::new(),
                    shutdown: false,
                }),
            }),
            workers: Mutex::new(Some(workers)),
            config,
        })
    }

    /// Starts a pool with `threads` workers and default naming.
    ///
    /// # Errors
    ///
    /// See [`ThreadPool::new`].
    pub fn with_threads(threads: usize) -> Result<Self, PoolError> {
        Self::new(PoolConfig::default().with_threads(threads))
    }

    /// Starts a pool with [`PoolConfig::default`]: one worker per logical CPU.
    ///
    /// # Errors
    ///
    /// See [`ThreadPool::new`].
    pub fn default_pool() -> Result<Self, PoolError> {
        Self::new(PoolConfig::default())
    }

    /// The pool's configuration.
    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Number of worker threads.
    pub const fn threads(&self) -> usize {
        self.config.threads
    }

    /// Number of tasks waiting for a worker.
    pub fn queued(&self) -> usize {
        self.shared.queue.lock().tasks.len()
    }

    /// Whether [`ThreadPool::shutdown`] has been called.
    pub fn is_shutdown(&self) -> bool {
        self.shared.queue.lock().shutdown
    }

    /// Stops the pool.
    ///
    /// New submissions are rejected and queued tasks are abandoned (their
    /// futures resolve as cancelled). Running tasks finish, then the workers
    /// exit; this call does not wait for them. Calling it again is a no-op.
    pub fn shutdown(&self) {
        let abandoned: Vec<Task> = {
            let mut queue = self.shared.queue.lock();
            if queue.shutdown {
                Vec::new()
            } else {
                queue.shutdown = true;
                queue.tasks.drain(..).collect()
            }
        };

        if !abandoned.is_empty() {
            tracing::warn!(
                count = abandoned.len(),
                thread_name = %self.config.thread_name,
                "abandoning queued tasks at shutdown"
            );
        }
        for task in abandoned {
            task.abandon();
        }

        let workers = self.workers.lock().take();
        if workers.is_some() {
            drop(workers);
            tracing::debug!(thread_name = %self.config.thread_name, "thread pool shut down");
        }
    }
}

impl Executor for ThreadPool {
    fn execute(&self, task: Task) -> Result<(), Task> {
        let guard = self.workers.lock();
        let Some(workers) = guard.as_ref() else {
            return Err(task);
        };
        {
            let mut queue = self.shared.queue.lock();
            if queue.shutdown {
                return Err(task);
            }
            queue.tasks.push_back(task);
        }
        let shared = Arc::clone(&self.shared);
        workers.spawn(move || shared.run_next());
        Ok(())
    }

    fn name(&self) -> &str {
        &self.config.thread_name
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

static_assertions::assert_impl_all!(ThreadPool: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::par::{ParError, ParFuture, submit};
    use rstest::rstest;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[rstest]
    fn zero_threads_is_rejected() {
        let result = ThreadPool::with_threads(0);
        assert_eq!(result.err(), Some(PoolError::InvalidThreadCount));
    }

    #[rstest]
    fn default_config_uses_cpu_count() {
        let config = PoolConfig::default();
        assert_eq!(config.threads, num_cpus::get());
        assert_eq!(config.thread_name, "parstate-worker");
        assert_eq!(config.stack_size, None);
    }

    #[rstest]
    fn workers_carry_configured_names() {
        let pool = ThreadPool::new(
            PoolConfig::default()
                .with_threads(1)
                .with_thread_name("summer")
                .with_stack_size(256 * 1024),
        )
        .unwrap();
        let future = submit(&pool, || thread::current().name().map(str::to_string));
        assert_eq!(future.get(), Ok(Some("summer-0".to_string())));
        assert_eq!(pool.name(), "summer");
    }

    #[rstest]
    fn runs_many_tasks() {
        let pool = ThreadPool::with_threads(4).unwrap();
        let futures: Vec<_> = (0..100).map(|index| submit(&pool, move || index * 2)).collect();
        let results: Vec<_> = futures.iter().map(|future| future.get().unwrap()).collect();
        assert_eq!(results, (0..100).map(|index| index * 2).collect::<Vec<_>>());
    }

    #[rstest]
    fn worker_survives_panicking_task() {
        let pool = ThreadPool::with_threads(1).unwrap();
        let failed: crate::par::TaskFuture<i32> = submit(&pool, || panic!("task failure"));
        assert!(matches!(failed.get(), Err(ParError::Panicked { .. })));
        assert_eq!(submit(&pool, || 5).get(), Ok(5));
    }

    #[rstest]
    fn submissions_after_shutdown_are_rejected() {
        let pool = ThreadPool::with_threads(1).unwrap();
        pool.shutdown();
        assert!(pool.is_shutdown());
        let future = submit(&pool, || 1);
        assert!(matches!(future.get(), Err(ParError::Rejected { .. })));
    }

    #[rstest]
    fn default_pool_uses_cpu_count() {
        let pool = ThreadPool::default_pool().unwrap();
        assert_eq!(pool.threads(), num_cpus::get());
        assert_eq!(pool.name(), "parstate-worker");
        assert_eq!(submit(&pool, || 3).get(), Ok(3));
    }

    #[rstest]
    fn tasks_start_in_submission_order() {
        let pool = ThreadPool::with_threads(1).unwrap();
        let (release, gate) = mpsc::channel::<()>();
        let blocker = submit(&pool, move || gate.recv().is_ok());
        let order = Arc::new(Mutex::new(Vec::new()));
        let futures: Vec<_> = (0..5)
            .map(|index| {
                let order = Arc::clone(&order);
                submit(&pool, move || order.lock().push(index))
            })
            .collect();

        release.send(()).unwrap();
        assert_eq!(blocker.get(), Ok(true));
        for future in &futures {
            assert_eq!(future.get(), Ok(()));
        }
        assert_eq!(*order.lock(), vec![0, 1, 2, 3, 4]);
    }

    #[rstest]
    fn shutdown_abandons_queued_tasks() {
        let pool = ThreadPool::with_threads(1).unwrap();
        let (release, gate) = mpsc::channel::<()>();
        let blocker = submit(&pool, move || gate.recv_timeout(Duration::from_secs(5)).is_ok());
        let queued = submit(&pool, || 2);

        // The blocker has been picked up once only the second task is queued.
        while pool.queued() != 1 {
            thread::yield_now();
        }

        pool.shutdown();
        assert_eq!(pool.queued(), 0);
        assert_eq!(queued.get(), Err(ParError::Cancelled));

        release.send(()).unwrap();
        assert_eq!(blocker.get(), Ok(true));
    }

    #[rstest]
    fn pending_task_can_be_cancelled_before_it_runs() {
        let pool = ThreadPool::with_threads(1).unwrap();
        let (release, gate) = mpsc::channel::<()>();
        let blocker = submit(&pool, move || gate.recv().is_ok());
        let queued = submit(&pool, || 2);

        assert!(queued.cancel(false));
        release.send(()).unwrap();
        assert_eq!(blocker.get(), Ok(true));
        assert_eq!(queued.get(), Err(ParError::Cancelled));
    }
}
