//! Ticker scheduler: one timing thread per scheduled task.
//!
//! Each task runs on its own named thread and sends a [`Tick`] on a channel
//! shared by all tasks of the scheduler. The host selects on
//! [`TickerScheduler::receiver`] and hands each tick to the engine.
//! Cancelling wakes the thread through a second channel, so a cancelled
//! task stops at once instead of at its next fire.

use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use super::{Scheduler, TaskHandle, TaskId, Tick};
use crate::error::TimerError;

/// Scheduler backed by ticker threads.
pub struct TickerScheduler {
    /// Sender cloned into every ticker thread.
    tick_tx: Sender<Tick>,
    /// Receiver for ticks from every task.
    tick_rx: Receiver<Tick>,
    /// Next task id to assign.
    next_id: u64,
}

impl Default for TickerScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TickerScheduler {
    /// Create a scheduler with no tasks.
    pub fn new() -> Self {
        // Unbounded: every countdown second matters, ticks must not be skipped
        let (tick_tx, tick_rx) = unbounded();
        Self {
            tick_tx,
            tick_rx,
            next_id: 0,
        }
    }

    /// Get a reference to the tick receiver.
    ///
    /// Use this with `select!` for event-driven loops:
    ///
    /// ```ignore
    /// loop {
    ///     select! {
    ///         recv(ticks) -> tick => {
    ///             engine.on_scheduled_tick(tick?.task)?;
    ///         }
    ///         recv(commands) -> command => handle(command),
    ///     }
    /// }
    /// ```
    #[inline]
    pub const fn receiver(&self) -> &Receiver<Tick> {
        &self.tick_rx
    }

    /// Main ticker loop.
    fn run_loop(
        task: TaskId,
        tick_tx: &Sender<Tick>,
        cancel_rx: &Receiver<()>,
        initial_delay: Duration,
        period: Duration,
    ) {
        let mut sequence = 0u64;
        let mut next_tick = Instant::now() + initial_delay;

        loop {
            let wait = next_tick.saturating_duration_since(Instant::now());
            match cancel_rx.recv_timeout(wait) {
                Err(RecvTimeoutError::Timeout) => {}
                // Cancelled, or the handle was dropped
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }

            trace!(%task, sequence, "Tick");
            if tick_tx.send(Tick { task, sequence }).is_err() {
                // Scheduler dropped, nobody is listening
                break;
            }

            sequence += 1;
            next_tick += period;
        }
    }
}

impl Scheduler for TickerScheduler {
    fn schedule_repeating(
        &mut self,
        initial_delay: Duration,
        period: Duration,
    ) -> Result<Box<dyn TaskHandle>, TimerError> {
        let task = TaskId(self.next_id);
        self.next_id += 1;

        let tick_tx = self.tick_tx.clone();
        let (cancel_tx, cancel_rx) = bounded(1);

        let handle = thread::Builder::new()
            .name(format!("hourglass-{task}"))
            .spawn(move || {
                Self::run_loop(task, &tick_tx, &cancel_rx, initial_delay, period);
            })
            .map_err(TimerError::Schedule)?;

        debug!(%task, ?initial_delay, ?period, "Ticker task scheduled");
        Ok(Box::new(TickerHandle {
            task,
            cancel_tx: Some(cancel_tx),
            thread: Some(handle),
        }))
    }
}

/// Handle to a ticker thread.
///
/// Dropping it cancels the task and waits for the thread, which wakes at
/// once on cancellation.
struct TickerHandle {
    task: TaskId,
    /// Cancellation signal, `None` once cancelled.
    cancel_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl TaskHandle for TickerHandle {
    fn id(&self) -> TaskId {
        self.task
    }

    fn cancel(&mut self) {
        if let Some(cancel_tx) = self.cancel_tx.take() {
            let _ = cancel_tx.try_send(());
            debug!(task = %self.task, "Ticker task cancelled");
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.cancel();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!(task = %self.task, "Ticker thread panicked");
            }
        }
    }
}
