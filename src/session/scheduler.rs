//! Deferred, cancellable re-arm tasks.
//!
//! The engine only needs "run this callback after D unless cancelled".
//! [`TokioScheduler`] satisfies that on an async runtime; [`ManualScheduler`]
//! serves hosts that drive time themselves (tick loops, tests).

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;

use crate::core::error::SchedulerError;

/// Callback run when a cooldown elapses
pub type RearmTask = Box<dyn FnOnce() + Send + 'static>;

/// Schedules a callback after a delay without blocking the caller.
pub trait RearmScheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: RearmTask) -> Result<RearmHandle, SchedulerError>;
}

/// Cancels a scheduled task; dropping the handle leaves the task running.
pub struct RearmHandle {
    cancel: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl RearmHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Handle for a task that cannot be cancelled
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for RearmHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RearmHandle")
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

/// Runs re-arm tasks on a tokio runtime
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Scheduler bound to the runtime of the calling context
    pub fn current() -> Result<Self, SchedulerError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| SchedulerError::RuntimeUnavailable)
    }
}

impl RearmScheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: RearmTask) -> Result<RearmHandle, SchedulerError> {
        let join = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
        Ok(RearmHandle::new(move || join.abort()))
    }
}

struct PendingTask {
    id: u64,
    due: Duration,
    task: RearmTask,
}

#[derive(Default)]
struct ManualQueue {
    elapsed: Duration,
    next_id: u64,
    pending: Vec<PendingTask>,
}

/// Scheduler whose clock only moves through [`ManualScheduler::advance`]
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Arc<Mutex<ManualQueue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward and run every task that came due, in due order.
    ///
    /// Returns how many tasks ran.
    pub fn advance(&self, by: Duration) -> usize {
        let mut due = {
            let mut queue = lock_queue(&self.queue);
            queue.elapsed += by;
            let now = queue.elapsed;
            let (due, waiting): (Vec<_>, Vec<_>) =
                queue.pending.drain(..).partition(|pending| pending.due <= now);
            queue.pending = waiting;
            due
        };

        due.sort_by_key(|pending| (pending.due, pending.id));
        let count = due.len();
        // Run outside the queue lock so tasks may schedule again
        for pending in due {
            (pending.task)();
        }
        count
    }

    /// Tasks still waiting
    pub fn pending(&self) -> usize {
        lock_queue(&self.queue).pending.len()
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let queue = lock_queue(&self.queue);
        f.debug_struct("ManualScheduler")
            .field("elapsed", &queue.elapsed)
            .field("pending", &queue.pending.len())
            .finish()
    }
}

impl RearmScheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: RearmTask) -> Result<RearmHandle, SchedulerError> {
        let id = {
            let mut queue = lock_queue(&self.queue);
            let id = queue.next_id;
            queue.next_id += 1;
            let due = queue.elapsed + delay;
            queue.pending.push(PendingTask { id, due, task });
            id
        };

        let weak = Arc::downgrade(&self.queue);
        Ok(RearmHandle::new(move || {
            if let Some(queue) = weak.upgrade() {
                lock_queue(&queue).pending.retain(|pending| pending.id != id);
            }
        }))
    }
}

fn lock_queue(queue: &Mutex<ManualQueue>) -> std::sync::MutexGuard<'_, ManualQueue> {
    queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
