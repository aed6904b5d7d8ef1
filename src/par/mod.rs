//! Parallel computations as pure descriptions.
//!
//! A [`Par<A>`] describes a computation without performing it. Descriptions
//! are composed with [`Par::unit`], [`Par::lazy_unit`], [`Par::map2`] and
//! [`Par::fork`], then handed to an interpreter:
//!
//! - **Executor mode**: [`Par::run`] interprets against an [`Executor`] and
//!   returns a [`ParFuture`] handle with blocking `get`, `get_timeout`,
//!   `cancel`, `is_done` and `is_cancelled`.
//! - **Direct mode**: [`Par::evaluate`] interprets against the
//!   [`InlineExecutor`], running everything synchronously on the caller's thread.
//!
//! Forking never changes a result, only where it is computed.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use parstate::par::{ExecutorRef, Par, ThreadPool, sum};
//!
//! let pool: ExecutorRef = Arc::new(ThreadPool::with_threads(8).unwrap());
//! let total = sum(&[1, 2, 3, 4, 5]);
//!
//! assert_eq!(total.run_blocking(&pool), Ok(15));
//! assert_eq!(total.evaluate(), Ok(15));
//! ```

mod error;
mod executor;
mod future;
#[allow(clippy::module_inception)]
mod par;
mod pool;
mod runtime;
mod sum;

pub use error::ParError;
pub use executor::{Executor, ExecutorRef, InlineExecutor, Task, interrupted, submit};
pub use future::{FutureRef, ParFuture, TaskFuture, UnitFuture};
pub use par::Par;
pub use pool::{PoolConfig, PoolError, ThreadPool};
pub use runtime::RayonExecutor;
#[cfg(feature = "tokio")]
pub use runtime::TokioExecutor;
pub use sum::{reduce, sum};
