//! Platform: the host features renderers draw through.
//!
//! The timer never talks to a display directly. A [`Platform`] hands out
//! three collaborators, any of which a renderer may need:
//!
//! - an [`Audience`] resolving the observers connected *right now*,
//! - a [`BarFactory`] creating persistent bars (absent on old runtimes),
//! - an [`ActionTransport`] sending transient one-line messages (absent
//!   when the optional plugin providing it is not installed).
//!
//! [`terminal::TerminalPlatform`] is the implementation shipped with the
//! crate; hosts embedding the timer elsewhere implement these traits.

pub mod terminal;
mod widget;

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::config::{BarColour, BarStyle};
use crate::error::{SurfaceError, TimerError};

/// Identifies one connected observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(pub u64);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags! {
    /// Optional features a platform may offer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Persistent bars with a title and a fill level.
        const BOSS_BAR = 0b0000_0001;
        /// Transient single-line messages.
        const ACTION_BAR = 0b0000_0010;
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}

/// The set of observers currently connected.
pub trait Audience {
    /// Observers connected at the moment of the call. Never cached.
    fn observers(&self) -> Vec<ObserverId>;
}

/// Sends a transient message that clears itself after a short time.
pub trait ActionTransport {
    /// Show `message` to `observer`.
    fn send_action(&self, observer: ObserverId, message: &str) -> Result<(), SurfaceError>;
}

/// A persistent bar registered with the platform.
pub trait BarHandle {
    /// Replace the title.
    fn set_title(&mut self, title: &str) -> Result<(), SurfaceError>;

    /// Set the fill level, `0.0..=1.0`.
    fn set_progress(&mut self, progress: f64) -> Result<(), SurfaceError>;

    /// Show the bar to `observer`.
    fn add_observer(&mut self, observer: ObserverId) -> Result<(), SurfaceError>;

    /// Hide the bar from every observer.
    fn remove_all_observers(&mut self) -> Result<(), SurfaceError>;

    /// Toggle visibility without changing the observer set.
    fn set_visible(&mut self, visible: bool) -> Result<(), SurfaceError>;
}

/// Creates persistent bars.
pub trait BarFactory {
    /// Create a hidden bar with no observers.
    ///
    /// Returns [`TimerError::CapabilityUnavailable`] when the runtime cannot
    /// draw bars at all.
    fn create_bar(
        &self,
        title: &str,
        colour: BarColour,
        style: BarStyle,
    ) -> Result<Box<dyn BarHandle>, TimerError>;
}

/// Entry point renderers use to look up host features.
pub trait Platform {
    /// Connected observers.
    fn audience(&self) -> Arc<dyn Audience>;

    /// Bar factory, `None` when bars are not supported.
    fn bar_factory(&self) -> Option<Arc<dyn BarFactory>>;

    /// Action transport, `None` when the providing plugin is missing.
    fn action_transport(&self) -> Option<Arc<dyn ActionTransport>>;
}
