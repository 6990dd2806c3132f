//! Boss bar renderer: a persistent bar whose fill follows the countdown.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{RendererKind, TimerRenderer};
use crate::config::{BarColour, BarStyle};
use crate::error::{SurfaceError, TimerError};
use crate::platform::{Audience, BarHandle, ObserverId, Platform};

/// Shows the countdown on one bar created at construction time.
pub struct BossBarRenderer {
    bar: Box<dyn BarHandle>,
    audience: Arc<dyn Audience>,
    showing: bool,
}

impl BossBarRenderer {
    /// Create the bar through the platform's bar factory.
    ///
    /// Fails with [`TimerError::CapabilityUnavailable`] when the platform
    /// cannot draw bars.
    pub fn new(
        platform: &dyn Platform,
        colour: BarColour,
        style: BarStyle,
    ) -> Result<Self, TimerError> {
        let factory = platform.bar_factory().ok_or_else(|| {
            TimerError::unavailable(
                RendererKind::BossBar,
                "bars are not supported by this runtime",
            )
        })?;
        let bar = factory.create_bar("", colour, style)?;
        debug!(%colour, %style, "Boss bar renderer ready");

        Ok(Self {
            bar,
            audience: platform.audience(),
            showing: false,
        })
    }

    fn check(result: Result<(), SurfaceError>, action: &'static str) {
        if let Err(e) = result {
            warn!(action, error = %e, "Boss bar update failed");
        }
    }
}

impl TimerRenderer for BossBarRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::BossBar
    }

    fn on_start(&mut self, message: &str) {
        Self::check(self.bar.set_title(message), "set title");
        Self::check(self.bar.set_progress(1.0), "set progress");
        for observer in self.audience.observers() {
            Self::check(self.bar.add_observer(observer), "add observer");
        }
        Self::check(self.bar.set_visible(true), "show");
        self.showing = true;
    }

    fn on_update(&mut self, message: &str, progress: f64) {
        Self::check(self.bar.set_title(message), "set title");
        Self::check(self.bar.set_progress(progress), "set progress");
    }

    fn on_stop(&mut self) {
        Self::check(self.bar.set_visible(false), "hide");
        Self::check(self.bar.remove_all_observers(), "remove observers");
        self.showing = false;
    }

    fn on_observer_joined(&mut self, observer: ObserverId) {
        if self.showing {
            Self::check(self.bar.add_observer(observer), "add observer");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::terminal::TerminalPlatform;
    use crate::platform::Capabilities;

    fn renderer(platform: &TerminalPlatform) -> BossBarRenderer {
        BossBarRenderer::new(platform, BarColour::Pink, BarStyle::Segmented6).unwrap()
    }

    #[test]
    fn test_unavailable_on_old_runtime() {
        let platform = TerminalPlatform::new(Capabilities::ACTION_BAR);
        let err = BossBarRenderer::new(&platform, BarColour::Blue, BarStyle::Solid)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            TimerError::CapabilityUnavailable {
                surface: RendererKind::BossBar,
                ..
            }
        ));
    }

    #[test]
    fn test_lifecycle() {
        let platform = TerminalPlatform::default();
        let viewer = platform.connect(std::io::sink(), 60);
        let mut renderer = renderer(&platform);
        assert_eq!(platform.visible_bar(viewer), None);

        renderer.on_start("5s left");
        assert_eq!(platform.visible_bar(viewer), Some(("5s left".to_string(), 1.0)));

        renderer.on_update("4s left", 0.8);
        assert_eq!(platform.visible_bar(viewer), Some(("4s left".to_string(), 0.8)));

        renderer.on_stop();
        assert_eq!(platform.visible_bar(viewer), None);
    }

    #[test]
    fn test_late_joiner_is_attached_while_showing() {
        let platform = TerminalPlatform::default();
        let mut renderer = renderer(&platform);

        let before = platform.connect(std::io::sink(), 60);
        renderer.on_observer_joined(before);
        assert_eq!(platform.visible_bar(before), None, "nothing to show yet");

        renderer.on_start("go");
        let late = platform.connect(std::io::sink(), 60);
        assert_eq!(platform.visible_bar(late), None);
        renderer.on_observer_joined(late);
        assert_eq!(platform.visible_bar(late), Some(("go".to_string(), 1.0)));
    }
}
