//! The executor boundary: tasks, submission and the inline executor.
//!
//! An [`Executor`] only has to accept type-erased [`Task`]s. Pairing a task
//! with its [`TaskFuture`], capturing panics and honouring cancellation all
//! happen here, so every executor (the bundled [`ThreadPool`](super::ThreadPool),
//! the tokio and rayon adapters, or a caller's own) resolves futures the same way.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Weak};
use std::sync::atomic::{AtomicBool, Ordering};

use super::error::ParError;
use super::future::TaskFuture;

/// Something that runs tasks, typically on other threads.
pub trait Executor: Send + Sync {
    /// Accepts `task` for execution, or hands it back when refusing it.
    ///
    /// # Errors
    ///
    /// Returns the task unchanged when the executor cannot run it; the
    /// caller resolves the task's future as rejected.
    fn execute(&self, task: Task) -> Result<(), Task>;

    /// A short name used in logs and rejection errors.
    fn name(&self) -> &str {
        "executor"
    }
}

/// A shareable executor handle, as consumed by [`Par::run`](super::Par::run).
pub type ExecutorRef = Arc<dyn Executor>;

/// Reaches an executor without keeping it alive.
///
/// Forked tasks submit through this handle, so queued and blocked tasks never
/// own the executor they run on. Tasks submitted after its last handle is
/// dropped are abandoned.
pub(crate) struct WeakExecutor {
    target: Weak<dyn Executor>,
    name: String,
}

impl WeakExecutor {
    pub(crate) fn new(executor: &ExecutorRef) -> Self {
        Self {
            target: Arc::downgrade(executor),
            name: executor.name().to_string(),
        }
    }
}

impl Executor for WeakExecutor {
    fn execute(&self, task: Task) -> Result<(), Task> {
        match self.target.upgrade() {
            Some(executor) => executor.execute(task),
            None => {
                tracing::debug!(executor = %self.name, "executor dropped; cancelling task");
                task.abandon();
                Ok(())
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

trait Job: Send {
    fn run(self: Box<Self>);
    fn abandon(self: Box<Self>);
    fn reject(self: Box<Self>, executor: &str);
}

struct FutureJob<A, F> {
    future: TaskFuture<A>,
    body: F,
}

impl<A, F> Job for FutureJob<A, F>
where
    A: Send,
    F: FnOnce() -> Result<A, ParError> + Send,
{
    fn run(self: Box<Self>) {
        let Self { future, body } = *self;
        if !future.start() {
            tracing::trace!("skipping task cancelled before it started");
            return;
        }
        let _scope = InterruptScope::enter(future.interrupt_flag());
        let outcome = match catch_unwind(AssertUnwindSafe(body)) {
            Ok(outcome) => outcome,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::warn!(%message, "task panicked");
                Err(ParError::Panicked { message })
            }
        };
        future.complete(outcome);
    }

    fn abandon(self: Box<Self>) {
        self.future.abandon();
    }

    fn reject(self: Box<Self>, executor: &str) {
        self.future.complete(Err(ParError::Rejected {
            executor: executor.to_string(),
        }));
    }
}

/// A unit of work handed to an [`Executor`].
///
/// A task must eventually be [`run`](Task::run) or [`abandon`](Task::abandon)ed.
/// Dropping it unrun counts as abandoning it, so its future never hangs.
pub struct Task {
    job: Option<Box<dyn Job>>,
}

impl Task {
    fn new(job: Box<dyn Job>) -> Self {
        Self { job: Some(job) }
    }

    /// Runs the task on the current thread and resolves its future.
    pub fn run(mut self) {
        if let Some(job) = self.job.take() {
            job.run();
        }
    }

    /// Resolves the task's future as cancelled without running it.
    pub fn abandon(mut self) {
        if let Some(job) = self.job.take() {
            job.abandon();
        }
    }

    fn reject(mut self, executor: &str) {
        if let Some(job) = self.job.take() {
            job.reject(executor);
        }
    }
}

impl Drop for Task {
    fn drop(&mut self) {
        if let Some(job) = self.job.take() {
            tracing::debug!("task dropped without running; cancelling its future");
            job.abandon();
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Task")
            .field("pending", &self.job.is_some())
            .finish()
    }
}

/// Submits `body` to `executor` and returns the future it will resolve.
///
/// A panic in `body` resolves the future with [`ParError::Panicked`]; the
/// executing thread survives. A refused submission resolves it with
/// [`ParError::Rejected`].
pub fn submit<A, F>(executor: &dyn Executor, body: F) -> TaskFuture<A>
where
    A: Send + 'static,
    F: FnOnce() -> A + Send + 'static,
{
    submit_fallible(executor, move || Ok(body()))
}

/// Like [`submit`], for bodies that may themselves fail with a [`ParError`].
pub(crate) fn submit_fallible<A, F>(executor: &dyn Executor, body: F) -> TaskFuture<A>
where
    A: Send + 'static,
    F: FnOnce() -> Result<A, ParError> + Send + 'static,
{
    let future = TaskFuture::pending();
    let task = Task::new(Box::new(FutureJob {
        future: future.clone(),
        body,
    }));
    if let Err(task) = executor.execute(task) {
        tracing::debug!(executor = executor.name(), "task rejected");
        task.reject(executor.name());
    }
    future
}

thread_local! {
    static CURRENT_INTERRUPT: RefCell<Option<Arc<AtomicBool>>> = const { RefCell::new(None) };
}

/// Marks the interrupt flag of the task running on this thread, restoring the
/// outer task's flag when an inline task finishes.
struct InterruptScope {
    previous: Option<Arc<AtomicBool>>,
}

impl InterruptScope {
    fn enter(flag: Arc<AtomicBool>) -> Self {
        let previous = CURRENT_INTERRUPT.with(|current| current.replace(Some(flag)));
        Self { previous }
    }
}

impl Drop for InterruptScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT_INTERRUPT.with(|current| *current.borrow_mut() = previous);
    }
}

/// Whether the task running on the current thread was cancelled with
/// `may_interrupt_if_running == true`.
///
/// Interruption is cooperative: long-running task bodies may poll this and
/// return early. Outside of a task it is always `false`.
pub fn interrupted() -> bool {
    CURRENT_INTERRUPT.with(|current| {
        current
            .borrow()
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    })
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Runs every task immediately on the submitting thread.
///
/// Interpreting a [`Par`](super::Par) against it introduces no concurrency:
/// this is the direct mode behind [`Par::evaluate`](super::Par::evaluate).
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn execute(&self, task: Task) -> Result<(), Task> {
        task.run();
        Ok(())
    }

    fn name(&self) -> &str {
        "inline"
    }
}
