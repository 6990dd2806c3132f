//! Renderers: strategies that turn countdown state into something observers see.
//!
//! The engine holds exactly one [`TimerRenderer`] and calls it in a fixed
//! rhythm: one [`on_start`](TimerRenderer::on_start), then one
//! [`on_update`](TimerRenderer::on_update) per tick, then one
//! [`on_stop`](TimerRenderer::on_stop) when the countdown ends or is
//! cancelled.
//!
//! Two implementations ship with the crate:
//!
//! - [`BossBarRenderer`]: a persistent bar whose title and fill follow the
//!   countdown.
//! - [`ActionBarRenderer`]: a transient line re-sent every tick; it clears
//!   itself, so stopping is a no-op.
//!
//! Which one is used is decided once by [`select_renderer`].

mod action_bar;
mod boss_bar;
mod selection;

pub use action_bar::ActionBarRenderer;
pub use boss_bar::BossBarRenderer;
pub use selection::{build_candidates, select_renderer, RendererCandidate};

use std::fmt;

use crate::platform::ObserverId;

/// The kinds of renderer the crate knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RendererKind {
    /// Persistent progress bar.
    BossBar,
    /// Transient single-line message.
    ActionBar,
}

impl RendererKind {
    /// Human readable name used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::BossBar => "boss bar",
            Self::ActionBar => "action bar",
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Output strategy driven by the timer engine.
pub trait TimerRenderer {
    /// Which kind of renderer this is.
    fn kind(&self) -> RendererKind;

    /// A countdown started; `message` is the text for the full duration.
    fn on_start(&mut self, message: &str);

    /// One tick passed. `progress` is the fraction of time *remaining*,
    /// already normalized to `0.0..=1.0`.
    fn on_update(&mut self, message: &str, progress: f64);

    /// The countdown finished or was cancelled.
    fn on_stop(&mut self);

    /// An observer connected while a countdown is running.
    fn on_observer_joined(&mut self, _observer: ObserverId) {}
}

impl fmt::Debug for dyn TimerRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimerRenderer({})", self.kind())
    }
}
