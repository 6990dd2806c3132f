//! Action bar renderer: re-sends the countdown text every tick.

use std::sync::Arc;

use tracing::warn;

use super::{RendererKind, TimerRenderer};
use crate::error::TimerError;
use crate::platform::{ActionTransport, Audience, Platform};

/// Sends the countdown as a transient message to everyone connected.
///
/// The message expires on the observer's side, so there is nothing to do
/// when the countdown stops.
pub struct ActionBarRenderer {
    transport: Arc<dyn ActionTransport>,
    audience: Arc<dyn Audience>,
}

impl ActionBarRenderer {
    /// Build the renderer from the platform's action transport.
    ///
    /// Fails with [`TimerError::CapabilityUnavailable`] if the platform has
    /// no transport installed.
    pub fn new(platform: &dyn Platform) -> Result<Self, TimerError> {
        let transport = platform.action_transport().ok_or_else(|| {
            TimerError::unavailable(
                RendererKind::ActionBar,
                "no action bar transport is installed",
            )
        })?;

        Ok(Self {
            transport,
            audience: platform.audience(),
        })
    }
}

impl TimerRenderer for ActionBarRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::ActionBar
    }

    fn on_start(&mut self, message: &str) {
        for observer in self.audience.observers() {
            if let Err(e) = self.transport.send_action(observer, message) {
                warn!(%observer, error = %e, "Failed to send action bar message");
            }
        }
    }

    fn on_update(&mut self, message: &str, _progress: f64) {
        // ignores the progress
        self.on_start(message);
    }

    fn on_stop(&mut self) {
        // action bar times out automatically
    }
}
