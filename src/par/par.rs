//! Descriptions of parallel computations.
//!
//! A [`Par<A>`] is a value: building one never runs anything. It is a function
//! from an executor to a future, interpreted by [`Par::run`]. Only
//! [`Par::fork`] hands work to the executor; a description without forks runs
//! entirely on the thread that interprets it.
//!
//! # Laws
//!
//! - `Par::unit(a).evaluate() == Ok(a)`
//! - `Par::unit(a).map2(Par::unit(b), f).evaluate() == Ok(f(a, b))`
//! - Fork transparency: `Par::fork(move || x.clone())` produces the same
//!   result as `x` for every pure `x`, under every executor
//!
//! # Blocking
//!
//! [`Par::map2`] blocks the interpreting thread on both operands. When that
//! thread is itself a pool worker (inside a fork), nested forks can exhaust a
//! bounded pool; see the starvation notes on [`ThreadPool`](super::ThreadPool).
//!
//! A description whose root is `map2` blocks inside [`Par::run`] itself, so
//! the returned future is already resolved and `get_timeout` cannot bound the
//! wait. Only a root `fork` makes `run` return at once.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use super::error::ParError;
use super::executor::{ExecutorRef, InlineExecutor, WeakExecutor, panic_message, submit_fallible};
use super::future::{FutureRef, ParFuture, UnitFuture};
use crate::control::Thunk;

type Interpreter<A> = dyn Fn(&ExecutorRef) -> FutureRef<A> + Send + Sync;

/// A not-yet-executed computation producing `A`.
///
/// Cloning is cheap and clones share their structure. A description may be
/// run any number of times; each run is scheduled independently.
pub struct Par<A> {
    interpret: Arc<Interpreter<A>>,
}

impl<A> Clone for Par<A> {
    fn clone(&self) -> Self {
        Self {
            interpret: Arc::clone(&self.interpret),
        }
    }
}

impl<A> fmt::Display for Par<A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "<Par>")
    }
}

impl<A> Par<A>
where
    A: Clone + Send + Sync + 'static,
{
    /// Wraps an interpreter function.
    pub fn new<F>(interpret: F) -> Self
    where
        F: Fn(&ExecutorRef) -> FutureRef<A> + Send + Sync + 'static,
    {
        Self {
            interpret: Arc::new(interpret),
        }
    }

    /// An already computed value. Interpreting it yields a resolved future.
    ///
    /// ```rust
    /// use parstate::par::Par;
    ///
    /// assert_eq!(Par::unit(3).evaluate(), Ok(3));
    /// ```
    pub fn unit(value: A) -> Self {
        Self::new(move |_| Arc::new(UnitFuture::resolved(value.clone())))
    }

    /// Defers `compute` to the executor.
    ///
    /// This is `fork(unit(compute()))`, except that `compute` runs at most once:
    /// its outcome is memoized in a [`Thunk`] shared by every run of the
    /// description. A panic is memoized too, so every run reports the same
    /// [`ParError::Panicked`].
    pub fn lazy_unit<F>(compute: F) -> Self
    where
        F: FnOnce() -> A + Send + 'static,
    {
        let thunk = Arc::new(Thunk::new(move || {
            catch_unwind(AssertUnwindSafe(compute)).map_err(|payload| {
                let message = panic_message(payload.as_ref());
                tracing::warn!(%message, "deferred computation panicked");
                ParError::Panicked { message }
            })
        }));
        Self::fork(move || {
            let thunk = Arc::clone(&thunk);
            Self::new(move |_| Arc::new(UnitFuture::from_result(thunk.force())))
        })
    }

    /// Marks a computation for concurrent evaluation.
    ///
    /// Interpreting the result submits a task that builds `describe()` and
    /// interprets it against the same executor, then waits for its value.
    /// The task reaches the executor through a weak handle: it never keeps
    /// the executor alive, and work it forks after the executor's last handle
    /// is dropped resolves as [`ParError::Cancelled`].
    ///
    /// ```rust
    /// use parstate::par::Par;
    ///
    /// let forked = Par::fork(|| Par::unit(1).map2(Par::unit(2), |a, b| a + b));
    /// assert_eq!(forked.evaluate(), Ok(3));
    /// ```
    pub fn fork<F>(describe: F) -> Self
    where
        F: Fn() -> Self + Send + Sync + 'static,
    {
        let describe = Arc::new(describe);
        Self::new(move |executor| {
            let describe = Arc::clone(&describe);
            let inner_executor: ExecutorRef = Arc::new(WeakExecutor::new(executor));
            let future = submit_fallible(&**executor, move || {
                describe().run(&inner_executor).get()
            });
            Arc::new(future)
        })
    }

    /// Combines the results of two descriptions.
    ///
    /// Both operands are interpreted against the same executor before either
    /// is awaited, so forked operands may run concurrently. The interpreting
    /// thread then blocks on `self` and on `other`, in that order. If `self`
    /// fails, `other` is cancelled (best effort) and the failure propagates.
    pub fn map2<B, C, F>(self, other: Par<B>, combine: F) -> Par<C>
    where
        B: Clone + Send + Sync + 'static,
        C: Clone + Send + Sync + 'static,
        F: Fn(A, B) -> C + Send + Sync + 'static,
    {
        Par::new(move |executor| {
            let first = self.run(executor);
            let second = other.run(executor);
            let outcome = match first.get() {
                Ok(value_a) => second.get().map(|value_b| combine(value_a, value_b)),
                Err(error) => {
                    second.cancel(true);
                    Err(error)
                }
            };
            Arc::new(UnitFuture::from_result(outcome))
        })
    }

    /// Transforms the result.
    pub fn map<B, F>(self, function: F) -> Par<B>
    where
        B: Clone + Send + Sync + 'static,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        self.map2(Par::unit(()), move |value, ()| function(value))
    }

    /// Lifts `function` into one whose result is computed on the executor.
    pub fn as_async<T, F>(function: F) -> impl Fn(T) -> Self + Send + Sync + Clone + 'static
    where
        T: Send + 'static,
        F: Fn(T) -> A + Send + Sync + 'static,
    {
        let function = Arc::new(function);
        move |argument| {
            let function = Arc::clone(&function);
            Self::lazy_unit(move || function(argument))
        }
    }

    /// Collects the results of `pars` in order.
    ///
    /// Every element is interpreted before any is awaited, then the results
    /// are awaited left to right. The first failure wins.
    pub fn sequence(pars: Vec<Self>) -> Par<Vec<A>> {
        let pars: Arc<[Self]> = pars.into();
        Par::new(move |executor| {
            let futures: Vec<FutureRef<A>> = pars.iter().map(|par| par.run(executor)).collect();
            let outcome = futures
                .iter()
                .map(|future| future.get())
                .collect::<Result<Vec<A>, ParError>>();
            Arc::new(UnitFuture::from_result(outcome))
        })
    }

    /// Applies `function` to every item, each on its own fork.
    pub fn par_map<T, F>(items: Vec<T>, function: F) -> Par<Vec<A>>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(T) -> A + Send + Sync + 'static,
    {
        let lift = Self::as_async(function);
        let items: Arc<[T]> = items.into();
        Par::fork(move || Self::sequence(items.iter().cloned().map(&lift).collect()))
    }

    /// Interprets the description against `executor` (executor mode).
    pub fn run(&self, executor: &ExecutorRef) -> FutureRef<A> {
        (self.interpret)(executor)
    }

    /// Interprets against `executor` and waits for the result.
    ///
    /// # Errors
    ///
    /// Any [`ParError`] produced while computing the result.
    pub fn run_blocking(&self, executor: &ExecutorRef) -> Result<A, ParError> {
        self.run(executor).get()
    }

    /// Evaluates synchronously on the calling thread (direct mode).
    ///
    /// Forks run inline, so no concurrency and no pool is involved.
    ///
    /// # Errors
    ///
    /// [`ParError::Panicked`] if a forked computation panicked.
    pub fn evaluate(&self) -> Result<A, ParError> {
        let executor: ExecutorRef = Arc::new(InlineExecutor);
        self.run_blocking(&executor)
    }
}

static_assertions::assert_impl_all!(Par<i32>: Send, Sync, Clone);
