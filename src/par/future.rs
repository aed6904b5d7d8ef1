//! Result handles for submitted computations.
//!
//! [`ParFuture`] is the retrieval interface: blocking `get`, bounded
//! `get_timeout`, best-effort `cancel` and the `is_done`/`is_cancelled`
//! predicates. Two implementations exist:
//!
//! - [`UnitFuture`]: resolved at construction (`is_done()` is `true` from the start)
//! - [`TaskFuture`]: resolved later by whichever thread runs the task
//!
//! A `TaskFuture` moves through `pending -> running -> done` or ends in
//! `cancelled`; once done or cancelled it never changes again.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use super::error::ParError;

/// A handle to a result that may not be available yet.
///
/// All operations are internally synchronized; any number of threads may
/// hold and query the same handle.
pub trait ParFuture<A>: Send + Sync {
    /// Blocks until the result is available.
    ///
    /// # Errors
    ///
    /// Returns [`ParError::Cancelled`], [`ParError::Panicked`] or
    /// [`ParError::Rejected`] when no value was produced.
    fn get(&self) -> Result<A, ParError>;

    /// Blocks for at most `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ParError::Timeout`] if the result is still pending when the
    /// timeout elapses, otherwise the same errors as [`ParFuture::get`].
    fn get_timeout(&self, timeout: Duration) -> Result<A, ParError>;

    /// Attempts to cancel the computation. Returns whether cancellation took effect.
    fn cancel(&self, may_interrupt_if_running: bool) -> bool;

    /// Whether the computation has finished, successfully or not, or was cancelled.
    fn is_done(&self) -> bool;

    /// Whether the computation was cancelled.
    fn is_cancelled(&self) -> bool;
}

/// A shareable future handle.
pub type FutureRef<A> = Arc<dyn ParFuture<A>>;

/// A future that already holds its outcome.
#[derive(Debug, Clone)]
pub struct UnitFuture<A> {
    outcome: Result<A, ParError>,
}

impl<A> UnitFuture<A> {
    /// A future resolved with `value`.
    pub const fn resolved(value: A) -> Self {
        Self { outcome: Ok(value) }
    }

    /// A future resolved with `error`.
    pub const fn failed(error: ParError) -> Self {
        Self {
            outcome: Err(error),
        }
    }

    /// A future resolved with `outcome`.
    pub const fn from_result(outcome: Result<A, ParError>) -> Self {
        Self { outcome }
    }
}

impl<A: Clone + Send + Sync> ParFuture<A> for UnitFuture<A> {
    fn get(&self) -> Result<A, ParError> {
        self.outcome.clone()
    }

    fn get_timeout(&self, _timeout: Duration) -> Result<A, ParError> {
        self.outcome.clone()
    }

    fn cancel(&self, _may_interrupt_if_running: bool) -> bool {
        false
    }

    fn is_done(&self) -> bool {
        true
    }

    fn is_cancelled(&self) -> bool {
        false
    }
}

#[derive(Debug)]
enum Slot<A> {
    Pending,
    Running,
    Done(Result<A, ParError>),
    Cancelled,
}

#[derive(Debug)]
struct Shared<A> {
    slot: Mutex<Slot<A>>,
    resolved: Condvar,
    interrupted: Arc<AtomicBool>,
}

/// A future completed by the thread that runs its task.
///
/// Created by [`submit`](super::submit); cloning yields another handle to the
/// same result slot.
#[derive(Debug)]
pub struct TaskFuture<A> {
    shared: Arc<Shared<A>>,
}

impl<A> Clone for TaskFuture<A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A> TaskFuture<A> {
    pub(crate) fn pending() -> Self {
        Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot::Pending),
                resolved: Condvar::new(),
                interrupted: Arc::new(AtomicBool::new(false)),
            }),
        }
    }

    /// Whether `cancel(true)` was called while the task was running.
    pub fn is_interrupted(&self) -> bool {
        self.shared.interrupted.load(Ordering::Acquire)
    }

    pub(crate) fn interrupt_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shared.interrupted)
    }

    /// Claims the task for execution. Returns `false` if it was cancelled first.
    pub(crate) fn start(&self) -> bool {
        let mut slot = self.shared.slot.lock();
        match *slot {
            Slot::Pending => {
                *slot = Slot::Running;
                true
            }
            Slot::Running | Slot::Done(_) | Slot::Cancelled => false,
        }
    }

    /// Stores the outcome unless the future was cancelled in the meantime.
    pub(crate) fn complete(&self, outcome: Result<A, ParError>) {
        let mut slot = self.shared.slot.lock();
        match *slot {
            Slot::Pending | Slot::Running => {
                *slot = Slot::Done(outcome);
                self.shared.resolved.notify_all();
            }
            Slot::Done(_) | Slot::Cancelled => {
                tracing::trace!("discarding result of a cancelled task");
            }
        }
    }

    /// Resolves a task that will never run as cancelled.
    pub(crate) fn abandon(&self) {
        let mut slot = self.shared.slot.lock();
        if matches!(*slot, Slot::Pending | Slot::Running) {
            *slot = Slot::Cancelled;
            self.shared.resolved.notify_all();
        }
    }

    fn wait(&self, deadline: Option<Instant>) -> Result<A, ParError>
    where
        A: Clone,
    {
        let started = Instant::now();
        let mut slot = self.shared.slot.lock();
        loop {
            match &*slot {
                Slot::Done(outcome) => return outcome.clone(),
                Slot::Cancelled => return Err(ParError::Cancelled),
                Slot::Pending | Slot::Running => {}
            }
            match deadline {
                None => self.shared.resolved.wait(&mut slot),
                Some(deadline) => {
                    if Instant::now() >= deadline {
                        return Err(ParError::Timeout {
                            waited: started.elapsed(),
                        });
                    }
                    let _ = self.shared.resolved.wait_until(&mut slot, deadline);
                }
            }
        }
    }
}

impl<A: Clone + Send + Sync> ParFuture<A> for TaskFuture<A> {
    fn get(&self) -> Result<A, ParError> {
        self.wait(None)
    }

    fn get_timeout(&self, timeout: Duration) -> Result<A, ParError> {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.wait(Some(deadline)),
            None => self.wait(None),
        }
    }

    fn cancel(&self, may_interrupt_if_running: bool) -> bool {
        let mut slot = self.shared.slot.lock();
        match *slot {
            Slot::Pending => {
                *slot = Slot::Cancelled;
                self.shared.resolved.notify_all();
                true
            }
            Slot::Running if may_interrupt_if_running => {
                *slot = Slot::Cancelled;
                self.shared.interrupted.store(true, Ordering::Release);
                self.shared.resolved.notify_all();
                true
            }
            Slot::Running | Slot::Done(_) | Slot::Cancelled => false,
        }
    }

    fn is_done(&self) -> bool {
        matches!(*self.shared.slot.lock(), Slot::Done(_) | Slot::Cancelled)
    }

    fn is_cancelled(&self) -> bool {
        matches!(*self.shared.slot.lock(), Slot::Cancelled)
    }
}

static_assertions::assert_impl_all!(TaskFuture<i32>: Send, Sync, Clone);
