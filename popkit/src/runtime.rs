//! Virtual-time run loop.
//!
//! Everything runs on one thread. "Deferring" work queues it for the next
//! [`Ui::tick`](crate::Ui::tick); work queued while a tick is running waits
//! for the tick after. Delayed tasks fire once the clock reaches their due
//! time and can be cancelled through their [`TaskHandle`].

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::ui::Ui;

/// Frame interval used when advancing time (60 Hz).
pub const FRAME: Duration = Duration::from_micros(16_667);

pub type Task = Box<dyn FnOnce(&Ui)>;

/// Handle to a delayed task.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: u64,
    cancelled: Rc<Cell<bool>>,
}

impl TaskHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Prevent the task from running. No effect if it already ran.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

struct Timer {
    id: u64,
    due: Duration,
    cancelled: Rc<Cell<bool>>,
    task: Task,
}

/// Task queue plus timers on a virtual clock.
#[derive(Default)]
pub struct RunLoop {
    now: Cell<Duration>,
    queue: RefCell<VecDeque<Task>>,
    timers: RefCell<Vec<Timer>>,
    next_id: Cell<u64>,
}

impl fmt::Debug for RunLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunLoop")
            .field("now", &self.now.get())
            .field("queued", &self.queue.borrow().len())
            .field("timers", &self.timers.borrow().len())
            .finish()
    }
}

impl RunLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now.get()
    }

    pub(crate) fn set_now(&self, now: Duration) {
        self.now.set(now.max(self.now.get()));
    }

    /// Queue a task for the next tick.
    pub fn defer(&self, task: Task) {
        self.queue.borrow_mut().push_back(task);
    }

    /// Queue a task to run once `delay` has elapsed.
    pub fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let cancelled = Rc::new(Cell::new(false));
        self.timers.borrow_mut().push(Timer {
            id,
            due: self.now() + delay,
            cancelled: Rc::clone(&cancelled),
            task,
        });
        TaskHandle { id, cancelled }
    }

    /// True if tasks are waiting for the next tick.
    pub fn has_queued(&self) -> bool {
        !self.queue.borrow().is_empty()
    }

    /// Number of delayed tasks that are still live.
    pub fn pending_timers(&self) -> usize {
        self.timers
            .borrow()
            .iter()
            .filter(|t| !t.cancelled.get())
            .count()
    }

    /// Due time of the earliest live timer.
    pub fn next_due(&self) -> Option<Duration> {
        self.timers
            .borrow()
            .iter()
            .filter(|t| !t.cancelled.get())
            .map(|t| t.due)
            .min()
    }

    pub(crate) fn take_queue(&self) -> VecDeque<Task> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }

    /// Remove cancelled timers and hand back the due ones in due order.
    /// Each comes with its cancel flag so it can still be skipped if an
    /// earlier task in the same batch cancels it.
    pub(crate) fn take_due(&self) -> Vec<(Rc<Cell<bool>>, Task)> {
        let now = self.now();
        let mut timers = self.timers.borrow_mut();
        timers.retain(|t| !t.cancelled.get());

        let (mut due, pending): (Vec<Timer>, Vec<Timer>) =
            std::mem::take(&mut *timers).into_iter().partition(|t| t.due <= now);
        *timers = pending;

        due.sort_by_key(|t| (t.due, t.id));
        due.into_iter().map(|t| (t.cancelled, t.task)).collect()
    }
}
