//! Countdown Demo: Runs a timer on the terminal overlay.
//!
//! Usage: `cargo run --example countdown -- [seconds] [config.toml]`
//!
//! Rows 0 and 1 show the bar and the action line. Set `use_bar = false` in
//! the config file to see the action-bar renderer instead. Halfway through,
//! the countdown is extended by five seconds once.
//!
//! Set `RUST_LOG=hourglass=debug` for engine logs on stderr.

use std::time::{Duration, Instant};

use crossbeam_channel::{select, tick};
use crossterm::{cursor, execute, terminal};
use hourglass::{
    format_remaining, TerminalPlatform, TickOutcome, TickerScheduler, TimerEngine, TomlStore,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_SECONDS: u64 = 15;
const DEFAULT_CONFIG: &str = "hourglass.toml";
const EXTENSION: u64 = 5;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let seconds = match args.next() {
        Some(arg) => arg.parse()?,
        None => DEFAULT_SECONDS,
    };
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    let (width, _) = terminal::size()?;
    execute!(
        std::io::stdout(),
        terminal::Clear(terminal::ClearType::All),
        cursor::Hide
    )?;

    let platform = TerminalPlatform::default();
    platform.connect(std::io::stdout(), width);

    let mut config = TomlStore::load(&config_path)?;
    let mut engine = TimerEngine::initialize(&mut config, &platform, TickerScheduler::new())?;
    engine.start(
        |secs: u64| format!("Demo ends in {}", format_remaining(secs)),
        seconds,
    )?;

    // Action lines expire on wall-clock time, independent of countdown ticks
    let housekeeping = tick(Duration::from_millis(250));
    let ticks = engine.scheduler().receiver().clone();
    let mut extended = false;

    while engine.is_running() {
        select! {
            recv(ticks) -> fired => {
                match engine.on_scheduled_tick(fired?.task)? {
                    TickOutcome::Updated { remaining, .. } if !extended && remaining <= seconds / 2 => {
                        engine.extend(EXTENSION)?;
                        extended = true;
                    }
                    _ => {}
                }
            }
            recv(housekeeping) -> _ => {
                platform.expire_actions(Instant::now())?;
            }
        }
    }

    execute!(std::io::stdout(), cursor::MoveTo(0, 3), cursor::Show)?;
    println!("Countdown finished.");
    Ok(())
}
