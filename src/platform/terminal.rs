//! Terminal platform: renders bars and action messages to terminal sessions.
//!
//! Every connected session is one observer with its own writer and width.
//! The top two rows of a session form the overlay:
//!
//! ```text
//! row 0 │ Game starts in 42s ████████████████░░░░░░░░░░░░░  70%
//! row 1 │              Game starts in 42s
//! ```
//!
//! Row 0 belongs to the first visible bar the session observes. Row 1 shows
//! the last action message until [`ACTION_BAR_LIFETIME`] has passed and the
//! host calls [`TerminalPlatform::expire_actions`].
//!
//! Sessions may connect and disconnect at any time; audience queries always
//! reflect the current set.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use super::widget::{draw_line, ActionWidget, BarWidget};
use super::{
    ActionTransport, Audience, BarFactory, BarHandle, Capabilities, ObserverId, Platform,
};
use crate::config::{BarColour, BarStyle};
use crate::error::{SurfaceError, TimerError};

/// How long an action message stays on screen.
pub const ACTION_BAR_LIFETIME: Duration = Duration::from_secs(3);

const BAR_ROW: u16 = 0;
const ACTION_ROW: u16 = 1;

struct Session {
    writer: Box<dyn Write + Send>,
    width: u16,
    action: Option<(String, Instant)>,
}

#[derive(Debug, Clone)]
struct BarState {
    title: String,
    progress: f64,
    colour: BarColour,
    style: BarStyle,
    visible: bool,
    observers: BTreeSet<ObserverId>,
}

#[derive(Default)]
struct HostState {
    sessions: BTreeMap<ObserverId, Session>,
    bars: BTreeMap<u64, BarState>,
    next_observer: u64,
    next_bar: u64,
}

impl HostState {
    /// The bar a session shows on its bar row.
    fn bar_for(&self, observer: ObserverId) -> Option<&BarState> {
        self.bars
            .values()
            .find(|bar| bar.visible && bar.observers.contains(&observer))
    }

    /// Redraw both overlay rows of one session.
    fn redraw(&mut self, observer: ObserverId) -> Result<(), SurfaceError> {
        let bar_line = {
            let width = self
                .sessions
                .get(&observer)
                .ok_or(SurfaceError::UnknownObserver(observer))?
                .width;
            self.bar_for(observer).map(|bar| {
                BarWidget {
                    title: &bar.title,
                    progress: bar.progress,
                    colour: bar.colour,
                    style: bar.style,
                }
                .layout(width)
            })
        };

        let session = self
            .sessions
            .get_mut(&observer)
            .ok_or(SurfaceError::UnknownObserver(observer))?;
        let action_line = session
            .action
            .as_ref()
            .map(|(message, _)| ActionWidget { message }.layout(session.width));

        draw_line(&mut session.writer, BAR_ROW, bar_line.as_deref().unwrap_or_default())?;
        draw_line(
            &mut session.writer,
            ACTION_ROW,
            action_line.as_deref().unwrap_or_default(),
        )?;
        session.writer.flush()?;
        Ok(())
    }

    /// Redraw every connected observer of a bar.
    ///
    /// A failing session does not hold up the others; the first failure is
    /// returned once all of them were tried.
    fn redraw_all(&mut self, observers: &BTreeSet<ObserverId>) -> Result<(), SurfaceError> {
        let mut first_error = None;
        for &observer in observers {
            if !self.sessions.contains_key(&observer) {
                continue;
            }
            if let Err(e) = self.redraw(observer) {
                warn!(%observer, error = %e, "Failed to redraw session");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[derive(Clone, Default)]
struct Shared(Arc<Mutex<HostState>>);

impl Shared {
    fn lock(&self) -> MutexGuard<'_, HostState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Audience for Shared {
    fn observers(&self) -> Vec<ObserverId> {
        self.lock().sessions.keys().copied().collect()
    }
}

impl ActionTransport for Shared {
    fn send_action(&self, observer: ObserverId, message: &str) -> Result<(), SurfaceError> {
        let mut state = self.lock();
        let session = state
            .sessions
            .get_mut(&observer)
            .ok_or(SurfaceError::UnknownObserver(observer))?;
        session.action = Some((message.to_string(), Instant::now() + ACTION_BAR_LIFETIME));
        state.redraw(observer)
    }
}

impl BarFactory for Shared {
    fn create_bar(
        &self,
        title: &str,
        colour: BarColour,
        style: BarStyle,
    ) -> Result<Box<dyn BarHandle>, TimerError> {
        let mut state = self.lock();
        let id = state.next_bar;
        state.next_bar += 1;
        state.bars.insert(
            id,
            BarState {
                title: title.to_string(),
                progress: 1.0,
                colour,
                style,
                visible: false,
                observers: BTreeSet::new(),
            },
        );
        debug!(bar = id, %colour, %style, "Bar created");

        Ok(Box::new(TerminalBar {
            id,
            shared: self.clone(),
        }))
    }
}

/// Handle to a bar drawn by [`TerminalPlatform`]. Dropping it removes the bar.
struct TerminalBar {
    id: u64,
    shared: Shared,
}

impl TerminalBar {
    /// Apply `change` to the bar, then redraw whoever can see it.
    fn update(&self, change: impl FnOnce(&mut BarState)) -> Result<(), SurfaceError> {
        let mut state = self.shared.lock();
        let Some(bar) = state.bars.get_mut(&self.id) else {
            return Ok(());
        };
        let before = bar.observers.clone();
        change(bar);
        let mut affected = bar.observers.clone();
        affected.extend(before);
        state.redraw_all(&affected)
    }
}

impl BarHandle for TerminalBar {
    fn set_title(&mut self, title: &str) -> Result<(), SurfaceError> {
        self.update(|bar| title.clone_into(&mut bar.title))
    }

    fn set_progress(&mut self, progress: f64) -> Result<(), SurfaceError> {
        self.update(|bar| bar.progress = progress.clamp(0.0, 1.0))
    }

    fn add_observer(&mut self, observer: ObserverId) -> Result<(), SurfaceError> {
        self.update(|bar| {
            bar.observers.insert(observer);
        })
    }

    fn remove_all_observers(&mut self) -> Result<(), SurfaceError> {
        self.update(|bar| bar.observers.clear())
    }

    fn set_visible(&mut self, visible: bool) -> Result<(), SurfaceError> {
        self.update(|bar| bar.visible = visible)
    }
}

impl Drop for TerminalBar {
    fn drop(&mut self) {
        let mut state = self.shared.lock();
        if let Some(bar) = state.bars.remove(&self.id) {
            if let Err(e) = state.redraw_all(&bar.observers) {
                warn!(bar = self.id, error = %e, "Failed to clear removed bar");
            }
            trace!(bar = self.id, "Bar removed");
        }
    }
}

/// A [`Platform`] drawing to connected terminal sessions.
///
/// Cloning is cheap; clones share the same sessions and bars.
#[derive(Clone)]
pub struct TerminalPlatform {
    shared: Shared,
    capabilities: Capabilities,
}

impl Default for TerminalPlatform {
    fn default() -> Self {
        Self::new(Capabilities::all())
    }
}

impl TerminalPlatform {
    /// Create a platform offering only `capabilities`.
    ///
    /// Leaving out [`Capabilities::BOSS_BAR`] behaves like a runtime too old
    /// for bars; leaving out [`Capabilities::ACTION_BAR`] behaves like a
    /// missing action-bar plugin.
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            shared: Shared::default(),
            capabilities,
        }
    }

    /// Features this platform offers.
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Connect a session `width` columns wide and return its observer id.
    pub fn connect(&self, writer: impl Write + Send + 'static, width: u16) -> ObserverId {
        let mut state = self.shared.lock();
        let id = ObserverId(state.next_observer);
        state.next_observer += 1;
        state.sessions.insert(
            id,
            Session {
                writer: Box::new(writer),
                width,
                action: None,
            },
        );
        debug!(observer = %id, width, "Session connected");
        id
    }

    /// Disconnect a session. Returns `false` if it was not connected.
    pub fn disconnect(&self, observer: ObserverId) -> bool {
        let mut state = self.shared.lock();
        for bar in state.bars.values_mut() {
            bar.observers.remove(&observer);
        }
        let removed = state.sessions.remove(&observer).is_some();
        if removed {
            debug!(observer = %observer, "Session disconnected");
        }
        removed
    }

    /// Change a session's width and redraw it.
    pub fn resize(&self, observer: ObserverId, width: u16) -> Result<(), SurfaceError> {
        let mut state = self.shared.lock();
        state
            .sessions
            .get_mut(&observer)
            .ok_or(SurfaceError::UnknownObserver(observer))?
            .width = width;
        state.redraw(observer)
    }

    /// Clear action messages older than [`ACTION_BAR_LIFETIME`] at `now`.
    ///
    /// Returns how many sessions were cleared.
    pub fn expire_actions(&self, now: Instant) -> Result<usize, SurfaceError> {
        let mut state = self.shared.lock();
        let expired: Vec<ObserverId> = state
            .sessions
            .iter_mut()
            .filter_map(|(&id, session)| match &session.action {
                Some((_, expires_at)) if *expires_at <= now => {
                    session.action = None;
                    Some(id)
                }
                _ => None,
            })
            .collect();

        for &observer in &expired {
            state.redraw(observer)?;
        }
        if !expired.is_empty() {
            trace!(count = expired.len(), "Action messages expired");
        }
        Ok(expired.len())
    }

    /// Action message a session currently shows.
    pub fn action_message(&self, observer: ObserverId) -> Option<String> {
        self.shared
            .lock()
            .sessions
            .get(&observer)
            .and_then(|s| s.action.as_ref().map(|(message, _)| message.clone()))
    }

    /// Title and fill of the bar a session currently shows.
    pub fn visible_bar(&self, observer: ObserverId) -> Option<(String, f64)> {
        self.shared
            .lock()
            .bar_for(observer)
            .map(|bar| (bar.title.clone(), bar.progress))
    }

    /// Number of bars registered, visible or not.
    pub fn bar_count(&self) -> usize {
        self.shared.lock().bars.len()
    }
}

impl Platform for TerminalPlatform {
    fn audience(&self) -> Arc<dyn Audience> {
        Arc::new(self.shared.clone())
    }

    fn bar_factory(&self) -> Option<Arc<dyn BarFactory>> {
        self.capabilities
            .contains(Capabilities::BOSS_BAR)
            .then(|| Arc::new(self.shared.clone()) as Arc<dyn BarFactory>)
    }

    fn action_transport(&self) -> Option<Arc<dyn ActionTransport>> {
        self.capabilities
            .contains(Capabilities::ACTION_BAR)
            .then(|| Arc::new(self.shared.clone()) as Arc<dyn ActionTransport>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writer whose bytes stay readable after it is moved into a session.
    #[derive(Clone, Default)]
    struct Screen(Arc<Mutex<Vec<u8>>>);

    impl Write for Screen {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Screen {
        fn rows(&self, width: u16) -> Vec<String> {
            let mut parser = vt100::Parser::new(4, width, 0);
            parser.process(&self.0.lock().unwrap());
            parser.screen().rows(0, width).collect()
        }
    }

    #[test]
    fn test_audience_tracks_sessions() {
        let platform = TerminalPlatform::default();
        let audience = platform.audience();
        assert!(audience.observers().is_empty());

        let a = platform.connect(Screen::default(), 40);
        let b = platform.connect(Screen::default(), 40);
        assert_eq!(audience.observers(), vec![a, b]);

        assert!(platform.disconnect(a));
        assert!(!platform.disconnect(a));
        assert_eq!(audience.observers(), vec![b]);
    }

    #[test]
    fn test_action_message_is_drawn_and_expires() {
        let platform = TerminalPlatform::default();
        let screen = Screen::default();
        let id = platform.connect(screen.clone(), 30);
        let transport = platform.action_transport().unwrap();

        transport.send_action(id, "Hello there").unwrap();
        assert_eq!(platform.action_message(id).as_deref(), Some("Hello there"));
        assert_eq!(screen.rows(30)[1].trim(), "Hello there");

        // not yet expired
        assert_eq!(platform.expire_actions(Instant::now()).unwrap(), 0);

        let later = Instant::now() + ACTION_BAR_LIFETIME + Duration::from_millis(1);
        assert_eq!(platform.expire_actions(later).unwrap(), 1);
        assert_eq!(platform.action_message(id), None);
        assert_eq!(screen.rows(30)[1].trim(), "");
    }

    #[test]
    fn test_action_to_unknown_observer_fails() {
        let platform = TerminalPlatform::default();
        let transport = platform.action_transport().unwrap();
        let err = transport.send_action(ObserverId(9), "hi").unwrap_err();
        assert!(matches!(err, SurfaceError::UnknownObserver(ObserverId(9))));
    }

    #[test]
    fn test_bar_visible_only_to_observers() {
        let platform = TerminalPlatform::default();
        let screen = Screen::default();
        let watcher = platform.connect(screen.clone(), 40);
        let other = platform.connect(Screen::default(), 40);

        let factory = platform.bar_factory().unwrap();
        let mut bar = factory
            .create_bar("", BarColour::Blue, BarStyle::Solid)
            .unwrap();
        bar.set_title("Start").unwrap();
        bar.add_observer(watcher).unwrap();
        assert_eq!(platform.visible_bar(watcher), None, "hidden until shown");

        bar.set_visible(true).unwrap();
        bar.set_progress(0.25).unwrap();
        assert_eq!(platform.visible_bar(watcher), Some(("Start".to_string(), 0.25)));
        assert_eq!(platform.visible_bar(other), None);

        let row = &screen.rows(40)[0];
        assert!(row.starts_with("Start "));
        assert!(row.ends_with(" 25%"));

        bar.remove_all_observers().unwrap();
        assert_eq!(platform.visible_bar(watcher), None);
        assert_eq!(screen.rows(40)[0].trim(), "");
    }

    /// Writer whose terminal has gone away.
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    #[test]
    fn test_broken_session_does_not_block_others() {
        let platform = TerminalPlatform::default();
        let dead = platform.connect(Broken, 40);
        let screen = Screen::default();
        let alive = platform.connect(screen.clone(), 40);
        assert!(dead < alive, "broken session must be redrawn first");

        let factory = platform.bar_factory().unwrap();
        let mut bar = factory
            .create_bar("", BarColour::Blue, BarStyle::Solid)
            .unwrap();
        bar.add_observer(dead).unwrap();
        bar.add_observer(alive).unwrap();

        let err = bar.set_visible(true).unwrap_err();
        assert!(matches!(err, SurfaceError::Io(_)));
        bar.set_title("Ends in 4s").unwrap_err();

        let row = &screen.rows(40)[0];
        assert!(row.starts_with("Ends in 4s"), "row was {row:?}");
    }

    #[test]
    fn test_dropping_bar_unregisters_it() {
        let platform = TerminalPlatform::default();
        let factory = platform.bar_factory().unwrap();
        let bar = factory
            .create_bar("x", BarColour::Red, BarStyle::Segmented6)
            .unwrap();
        assert_eq!(platform.bar_count(), 1);
        drop(bar);
        assert_eq!(platform.bar_count(), 0);
    }

    #[test]
    fn test_capabilities_gate_features() {
        let old = TerminalPlatform::new(Capabilities::ACTION_BAR);
        assert!(old.bar_factory().is_none());
        assert!(old.action_transport().is_some());

        let bare = TerminalPlatform::new(Capabilities::BOSS_BAR);
        assert!(bare.bar_factory().is_some());
        assert!(bare.action_transport().is_none());
    }

    #[test]
    fn test_resize_redraws_at_new_width() {
        let platform = TerminalPlatform::default();
        let screen = Screen::default();
        let id = platform.connect(screen.clone(), 20);
        platform.action_transport().unwrap().send_action(id, "ab").unwrap();

        platform.resize(id, 40).unwrap();
        let row = &screen.rows(40)[1];
        assert_eq!(row.find("ab"), Some(19));
    }
}
