//! Engine: the countdown state machine.
//!
//! ```text
//!            start(msg, n)                 tick, elapsed < target
//!   ┌──────┐ ─────────────▶ ┌─────────┐ ◀──────────────────────┐
//!   │ Idle │                │ Running │ ───────────────────────┘
//!   └──────┘ ◀───────────── └─────────┘
//!            cancel() or tick reaching target
//! ```
//!
//! `Running` is exactly "a scheduled task handle is held". Every path back
//! to `Idle` cancels the task, drops the handle and stops the renderer.

use std::fmt;
use std::time::Duration;

use tracing::{debug, trace, warn};

use super::state::CountdownState;
use crate::config::ConfigStore;
use crate::error::TimerError;
use crate::message::TimerMessage;
use crate::platform::{ObserverId, Platform};
use crate::renderer::{select_renderer, RendererKind, TimerRenderer};
use crate::scheduler::{Scheduler, TaskHandle, TaskId};

/// Interval between ticks, and the delay before the first one.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// The renderer was updated.
    Updated {
        /// Seconds left after this tick.
        remaining: u64,
        /// Fraction of time remaining sent to the renderer.
        progress: f64,
    },
    /// The countdown reached its target and the engine is idle again.
    Finished,
    /// The tick came from a task that is no longer current and was ignored.
    Stale,
}

/// Countdown engine driving one renderer.
pub struct TimerEngine<S> {
    renderer: Box<dyn TimerRenderer>,
    scheduler: S,
    state: CountdownState,
    /// Present exactly while a countdown runs.
    task: Option<Box<dyn TaskHandle>>,
}

impl<S: Scheduler> TimerEngine<S> {
    /// Create an idle engine around an already chosen renderer.
    pub fn new(renderer: Box<dyn TimerRenderer>, scheduler: S) -> Self {
        Self {
            renderer,
            scheduler,
            state: CountdownState::default(),
            task: None,
        }
    }

    /// Select a renderer from the configuration and create an idle engine.
    ///
    /// The configuration is healed with defaults and saved. A failed save is
    /// logged and does not stop initialization; finding no usable renderer
    /// does, with [`TimerError::NoRendererAvailable`].
    pub fn initialize(
        config: &mut dyn ConfigStore,
        platform: &dyn Platform,
        scheduler: S,
    ) -> Result<Self, TimerError> {
        let selected = select_renderer(config, platform);
        if let Err(e) = config.save() {
            warn!(error = %e, "Failed to save timer config");
        }
        let renderer = selected?;
        debug!(renderer = %renderer.kind(), "Timer engine initialized");
        Ok(Self::new(renderer, scheduler))
    }

    /// Start a countdown of `seconds`, replacing any running one.
    ///
    /// The renderer is started immediately with the text for the full
    /// duration; the first tick follows one second later.
    pub fn start(
        &mut self,
        message: impl TimerMessage + 'static,
        seconds: u64,
    ) -> Result<(), TimerError> {
        if seconds == 0 {
            return Err(TimerError::InvalidArgument(
                "timers must be longer than 0 seconds",
            ));
        }

        if self.is_running() {
            debug!("Replacing running countdown");
            self.cancel();
        }

        let task = self
            .scheduler
            .schedule_repeating(TICK_INTERVAL, TICK_INTERVAL)?;
        debug!(task = %task.id(), seconds, "Countdown started");

        self.state.begin(Box::new(message), seconds);
        self.task = Some(task);
        self.renderer.on_start(&self.state.render());
        Ok(())
    }

    /// Add `ticks` seconds to the running countdown.
    pub fn extend(&mut self, ticks: u64) -> Result<(), TimerError> {
        if !self.is_running() {
            return Err(TimerError::IllegalState("there is no timer in progress"));
        }
        if ticks == 0 {
            return Err(TimerError::InvalidArgument(
                "must provide a positive value to extend the timer",
            ));
        }

        self.state.extend(ticks);
        debug!(ticks, target = self.state.target(), "Countdown extended");
        Ok(())
    }

    /// Advance the countdown by one second.
    ///
    /// The tick reaching the target stops the countdown instead of updating
    /// the renderer.
    pub fn tick(&mut self) -> Result<TickOutcome, TimerError> {
        if !self.is_running() {
            return Err(TimerError::IllegalState("there is no timer in progress"));
        }

        if self.state.advance() {
            debug!(target = self.state.target(), "Countdown finished");
            self.cancel();
            return Ok(TickOutcome::Finished);
        }

        let progress = self.update_message()?;
        Ok(TickOutcome::Updated {
            remaining: self.state.remaining(),
            progress,
        })
    }

    /// Handle a fire of scheduled task `task`.
    ///
    /// Fires from a task other than the current one were queued before a
    /// cancel or restart and are ignored.
    pub fn on_scheduled_tick(&mut self, task: TaskId) -> Result<TickOutcome, TimerError> {
        match self.task.as_ref().map(|t| t.id()) {
            Some(current) if current == task => self.tick(),
            current => {
                trace!(%task, ?current, "Ignoring tick from stale task");
                Ok(TickOutcome::Stale)
            }
        }
    }

    /// Push the current text and progress to the renderer.
    ///
    /// Returns the progress sent.
    pub fn update_message(&mut self) -> Result<f64, TimerError> {
        if !self.is_running() {
            return Err(TimerError::IllegalState("there is no timer in progress"));
        }

        let progress = self.state.progress_remaining();
        let text = self.state.render();
        trace!(
            elapsed = self.state.elapsed(),
            target = self.state.target(),
            progress,
            "Countdown update"
        );
        self.renderer.on_update(&text, progress);
        Ok(progress)
    }

    /// Scheduler the engine creates its tasks with.
    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Mutable access to the scheduler.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

impl<S> TimerEngine<S> {
    /// Stop the running countdown. Does nothing when idle.
    pub fn cancel(&mut self) {
        let Some(mut task) = self.task.take() else {
            return;
        };

        task.cancel();
        self.state.clear();
        self.renderer.on_stop();
        debug!(task = %task.id(), "Countdown stopped");
    }

    /// Whether a countdown is running.
    pub const fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Current countdown progress.
    pub const fn state(&self) -> &CountdownState {
        &self.state
    }

    /// Id of the current task, `None` when idle.
    pub fn current_task(&self) -> Option<TaskId> {
        self.task.as_ref().map(|t| t.id())
    }

    /// Kind of the active renderer.
    pub fn renderer_kind(&self) -> RendererKind {
        self.renderer.kind()
    }

    /// Tell the renderer an observer connected, if a countdown is running.
    pub fn observer_joined(&mut self, observer: ObserverId) {
        if self.is_running() {
            self.renderer.on_observer_joined(observer);
        }
    }
}

impl<S> Drop for TimerEngine<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl<S> fmt::Debug for TimerEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerEngine")
            .field("renderer", &self.renderer)
            .field("running", &self.is_running())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
