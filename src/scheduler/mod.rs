//! Scheduling: the repeating task behind a running countdown.
//!
//! The engine asks a [`Scheduler`] for one repeating task per countdown and
//! keeps the returned [`TaskHandle`] for as long as the countdown runs.
//! Fires are delivered to the engine by the host calling
//! [`TimerEngine::on_scheduled_tick`](crate::TimerEngine::on_scheduled_tick)
//! with the task's id, which lets the engine ignore fires from a task it
//! has already cancelled.
//!
//! ```text
//! ┌──────────────┐   Tick { task, .. }   ┌──────────────┐
//! │ Ticker Thread│ ───────────────────▶  │  Host Loop   │
//! └──────────────┘                       └──────┬───────┘
//!         ▲                                     │ on_scheduled_tick(task)
//!         │ cancel                              ▼
//!         │                              ┌──────────────┐
//!         └───────────────────────────── │ TimerEngine  │
//!                                        └──────────────┘
//! ```

mod manual;
mod ticker;

pub use manual::{ManualScheduler, ScheduledTask};
pub use ticker::TickerScheduler;

use std::fmt;
use std::time::Duration;

use crate::error::TimerError;

/// Identifies one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// One fire of a repeating task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Task that fired.
    pub task: TaskId,
    /// Fire number for this task, starting at 0.
    pub sequence: u64,
}

/// A cancellable reference to a scheduled task.
pub trait TaskHandle {
    /// Id stamped on every fire of this task.
    fn id(&self) -> TaskId;

    /// Stop future fires. A fire already delivered is not recalled.
    fn cancel(&mut self);
}

/// Creates repeating tasks.
pub trait Scheduler {
    /// Schedule a task that first fires after `initial_delay`, then every
    /// `period`.
    fn schedule_repeating(
        &mut self,
        initial_delay: Duration,
        period: Duration,
    ) -> Result<Box<dyn TaskHandle>, TimerError>;
}
