//! # Hourglass
//!
//! A countdown timer engine that shows its progress through whichever
//! display surface the host offers.
//!
//! Hourglass counts a timer down one second at a time and pushes the
//! remaining time to a single renderer chosen at startup: a persistent
//! progress bar where the host supports one, a transient one-line message
//! otherwise.
//!
//! ## Core Concepts
//!
//! - **Renderers**: interchangeable output strategies behind one trait
//! - **Capability-tolerant selection**: a missing display feature disables
//!   its renderer instead of failing startup
//! - **Explicit ticks**: the host delivers scheduler fires to the engine, so
//!   all timer state lives on one thread
//! - **Self-healing config**: missing or invalid settings are reset to
//!   defaults and saved back
//!
//! ## Example
//!
//! ```rust,no_run
//! use hourglass::{format_remaining, TerminalPlatform, TickerScheduler, TimerEngine, TomlStore};
//!
//! let platform = TerminalPlatform::default();
//! platform.connect(std::io::stdout(), 80);
//!
//! let mut config = TomlStore::load("timer.toml")?;
//! let mut engine = TimerEngine::initialize(&mut config, &platform, TickerScheduler::new())?;
//! engine.start(|secs: u64| format!("Game starts in {}", format_remaining(secs)), 30)?;
//!
//! while engine.is_running() {
//!     let tick = engine.scheduler().receiver().recv()?;
//!     engine.on_scheduled_tick(tick.task)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod error;
pub mod message;
pub mod platform;
pub mod renderer;
pub mod scheduler;
pub mod timer;

// Re-exports for convenience
pub use config::{BarColour, BarStyle, ConfigStore, TimerSettings, TomlStore};
pub use error::{ConfigError, SurfaceError, TimerError};
pub use message::{format_remaining, TimerMessage};
pub use platform::terminal::TerminalPlatform;
pub use platform::{Capabilities, ObserverId, Platform};
pub use renderer::{select_renderer, ActionBarRenderer, BossBarRenderer, RendererKind, TimerRenderer};
pub use scheduler::{ManualScheduler, Scheduler, TaskHandle, TaskId, Tick, TickerScheduler};
pub use timer::{CountdownState, TickOutcome, TimerEngine};
