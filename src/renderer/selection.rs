//! Renderer selection: build what the configuration enables, keep the first.
//!
//! Candidates are tried in a fixed order, boss bar then action bar. A
//! candidate whose platform feature is missing is skipped:
//!
//! - a missing bar feature is structural (the runtime is too old), so it is
//!   logged as an error and `use_bar` is switched off in the configuration;
//! - a missing action bar transport is an optional plugin that may be
//!   installed later, so it is only a warning and the flag stays on.
//!
//! The first candidate that was built becomes the active renderer. There is
//! no fallback later on.

use tracing::{debug, error, warn};

use super::{ActionBarRenderer, BossBarRenderer, RendererKind, TimerRenderer};
use crate::config::{ConfigStore, TimerSettings, USE_ACTION_BAR_KEY, USE_BAR_KEY};
use crate::error::TimerError;
use crate::platform::Platform;

/// A renderer that was built but not yet chosen.
pub struct RendererCandidate {
    /// Configuration key that enabled this candidate.
    pub flag: &'static str,
    /// Position in the preference order, lower wins.
    pub rank: usize,
    /// The renderer itself.
    pub renderer: Box<dyn TimerRenderer>,
}

impl RendererCandidate {
    /// Kind of the wrapped renderer.
    pub fn kind(&self) -> RendererKind {
        self.renderer.kind()
    }
}

/// Build every enabled candidate in preference order.
///
/// Missing capabilities are recovered here; any other construction error is
/// returned.
pub fn build_candidates(
    config: &mut dyn ConfigStore,
    platform: &dyn Platform,
) -> Result<Vec<RendererCandidate>, TimerError> {
    let settings = TimerSettings::load(config);
    let mut candidates = Vec::new();

    if settings.use_bar {
        match BossBarRenderer::new(platform, settings.bar_colour, settings.bar_style) {
            Ok(renderer) => candidates.push(RendererCandidate {
                flag: USE_BAR_KEY,
                rank: candidates.len(),
                renderer: Box::new(renderer),
            }),
            Err(e) if e.is_unavailable() => {
                error!(
                    error = %e,
                    "Could not load the boss bar timer type, disabling it in the config"
                );
                // stop the failure repeating on every load
                config.set_bool(USE_BAR_KEY, false);
            }
            Err(e) => return Err(e),
        }
    }

    if settings.use_action_bar {
        match ActionBarRenderer::new(platform) {
            Ok(renderer) => candidates.push(RendererCandidate {
                flag: USE_ACTION_BAR_KEY,
                rank: candidates.len(),
                renderer: Box::new(renderer),
            }),
            Err(e) if e.is_unavailable() => {
                warn!(
                    error = %e,
                    "Could not load the action bar timer type, it needs an action bar transport"
                );
            }
            Err(e) => return Err(e),
        }
    }

    Ok(candidates)
}

/// Pick the active renderer for the configuration and platform.
///
/// Returns [`TimerError::NoRendererAvailable`] if nothing could be built.
pub fn select_renderer(
    config: &mut dyn ConfigStore,
    platform: &dyn Platform,
) -> Result<Box<dyn TimerRenderer>, TimerError> {
    let mut candidates = build_candidates(config, platform)?.into_iter();

    let Some(chosen) = candidates.next() else {
        return Err(TimerError::NoRendererAvailable);
    };

    let discarded: Vec<String> = candidates
        .map(|c| format!("{} ({})", c.kind(), c.flag))
        .collect();
    if discarded.is_empty() {
        debug!(renderer = %chosen.kind(), "Timer renderer selected");
    } else {
        warn!(
            using = %chosen.kind(),
            discarded = %discarded.join(", "),
            "More than one style of timer is enabled, using only the first one loaded"
        );
    }

    Ok(chosen.renderer)
}
