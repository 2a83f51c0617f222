//! Execution contexts for delivering request callbacks.

use tokio::{runtime::Handle, sync::mpsc};

/// A boxed callback ready to run.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Somewhere request callbacks can run.
pub trait CallbackExecutor: Send + Sync + 'static {
    /// Schedules `job` to run on this context.
    fn execute(&self, job: Job);
}

/// Runs each callback in its own task on a tokio runtime.
impl CallbackExecutor for Handle {
    fn execute(&self, job: Job) {
        self.spawn(async move { job() });
    }
}

/// Runs callbacks immediately on the thread that delivers the completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

impl CallbackExecutor for InlineExecutor {
    fn execute(&self, job: Job) {
        job();
    }
}

/// Runs callbacks one at a time, in submission order, on a single tokio task.
///
/// The draining task ends once the executor is dropped and the queue is empty.
#[derive(Debug, Clone)]
pub struct SerialExecutor {
    queue: mpsc::UnboundedSender<Job>,
}

impl SerialExecutor {
    /// Spawns the draining task on `handle`.
    pub fn new(handle: &Handle) -> Self {
        let (queue, mut jobs) = mpsc::unbounded_channel::<Job>();
        handle.spawn(async move {
            while let Some(job) = jobs.recv().await {
                job();
            }
        });
        Self { queue }
    }

    /// Spawns the draining task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(&Handle::current())
    }
}

impl CallbackExecutor for SerialExecutor {
    fn execute(&self, job: Job) {
        if self.queue.send(job).is_err() {
            crate::debug_log!("Serial executor is shut down, dropping callback");
        }
    }
}
