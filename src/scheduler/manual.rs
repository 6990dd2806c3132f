//! Manual scheduler: records schedule requests, never fires on its own.
//!
//! For hosts that already own a one-second loop, and for tests. The host
//! drives the countdown by calling the engine's tick itself; the scheduler
//! only tracks which tasks exist and whether they were cancelled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::{Scheduler, TaskHandle, TaskId};
use crate::error::TimerError;

/// A schedule request seen by [`ManualScheduler`].
#[derive(Debug, Clone)]
pub struct ScheduledTask {
    /// Id given to the task.
    pub id: TaskId,
    /// Requested delay before the first fire.
    pub initial_delay: Duration,
    /// Requested interval between fires.
    pub period: Duration,
    cancelled: Arc<AtomicBool>,
}

impl ScheduledTask {
    /// Whether the task's handle has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Scheduler whose tasks are fired by the caller.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    tasks: Vec<ScheduledTask>,
    /// Next task id to assign.
    next_id: u64,
}

impl ManualScheduler {
    /// Create a scheduler with no tasks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every task ever scheduled, oldest first.
    pub fn tasks(&self) -> &[ScheduledTask] {
        &self.tasks
    }

    /// Tasks that have not been cancelled.
    pub fn live_tasks(&self) -> impl Iterator<Item = &ScheduledTask> {
        self.tasks.iter().filter(|t| !t.is_cancelled())
    }

    /// The most recently scheduled task.
    pub fn last(&self) -> Option<&ScheduledTask> {
        self.tasks.last()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(
        &mut self,
        initial_delay: Duration,
        period: Duration,
    ) -> Result<Box<dyn TaskHandle>, TimerError> {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let cancelled = Arc::new(AtomicBool::new(false));
        self.tasks.push(ScheduledTask {
            id,
            initial_delay,
            period,
            cancelled: cancelled.clone(),
        });

        Ok(Box::new(ManualHandle { id, cancelled }))
    }
}

struct ManualHandle {
    id: TaskId,
    cancelled: Arc<AtomicBool>,
}

impl TaskHandle for ManualHandle {
    fn id(&self) -> TaskId {
        self.id
    }

    fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_requests_and_cancellation() {
        let mut scheduler = ManualScheduler::new();
        let mut first = scheduler
            .schedule_repeating(Duration::from_secs(1), Duration::from_secs(1))
            .unwrap();
        let second = scheduler
            .schedule_repeating(Duration::ZERO, Duration::from_secs(5))
            .unwrap();

        assert_eq!(scheduler.tasks().len(), 2);
        assert_eq!(scheduler.live_tasks().count(), 2);
        assert_eq!(scheduler.last().unwrap().id, second.id());
        assert_eq!(scheduler.last().unwrap().period, Duration::from_secs(5));

        first.cancel();
        assert!(scheduler.tasks()[0].is_cancelled());
        assert_eq!(scheduler.live_tasks().map(|t| t.id).collect::<Vec<_>>(), vec![second.id()]);
        assert_eq!(first.id(), TaskId(0));
        assert_eq!(second.id(), TaskId(1));
    }
}
