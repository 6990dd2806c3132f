//! Configuration: the key-value store the timer reads its settings from.
//!
//! The store is self-healing. Reading [`TimerSettings`] writes every missing
//! key back with its default and replaces values that do not parse, so a
//! fresh or hand-damaged file ends up complete after the first load.
//!
//! | Key              | Type   | Default  |
//! |------------------|--------|----------|
//! | `use_bar`        | bool   | `true`   |
//! | `bar_colour`     | string | `BLUE`   |
//! | `bar_style`      | string | `SOLID`  |
//! | `use_action_bar` | bool   | `true`   |

mod bar;
mod store;

pub use bar::{BarColour, BarStyle, UnknownVariant};
pub use store::TomlStore;

use tracing::warn;

use crate::error::ConfigError;

/// Enables the boss bar renderer.
pub const USE_BAR_KEY: &str = "use_bar";
/// Colour of the boss bar.
pub const BAR_COLOUR_KEY: &str = "bar_colour";
/// Segment style of the boss bar.
pub const BAR_STYLE_KEY: &str = "bar_style";
/// Enables the action bar renderer.
pub const USE_ACTION_BAR_KEY: &str = "use_action_bar";

/// A read/write key-value store supplied by the host.
pub trait ConfigStore {
    /// Whether `key` has any value at all.
    fn contains(&self, key: &str) -> bool;

    /// Boolean value of `key`, `None` when absent or not a boolean.
    fn get_bool(&self, key: &str) -> Option<bool>;

    /// String value of `key`, `None` when absent or not a string.
    fn get_string(&self, key: &str) -> Option<String>;

    /// Set `key` to a boolean.
    fn set_bool(&mut self, key: &str, value: bool);

    /// Set `key` to a string.
    fn set_string(&mut self, key: &str, value: &str);

    /// Persist pending changes. Stores without a backing medium do nothing.
    fn save(&mut self) -> Result<(), ConfigError> {
        Ok(())
    }
}

/// Timer settings after defaults and corrections are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSettings {
    /// Try to build the boss bar renderer.
    pub use_bar: bool,
    /// Colour of the boss bar.
    pub bar_colour: BarColour,
    /// Segment style of the boss bar.
    pub bar_style: BarStyle,
    /// Try to build the action bar renderer.
    pub use_action_bar: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            use_bar: true,
            bar_colour: BarColour::Blue,
            bar_style: BarStyle::Solid,
            use_action_bar: true,
        }
    }
}

impl TimerSettings {
    /// Read the settings, healing the store as a side effect.
    pub fn load(config: &mut dyn ConfigStore) -> Self {
        let defaults = Self::default();

        Self {
            use_bar: read_bool(config, USE_BAR_KEY, defaults.use_bar),
            bar_colour: read_enum(config, BAR_COLOUR_KEY, defaults.bar_colour, BarColour::name),
            bar_style: read_enum(config, BAR_STYLE_KEY, defaults.bar_style, BarStyle::name),
            use_action_bar: read_bool(config, USE_ACTION_BAR_KEY, defaults.use_action_bar),
        }
    }
}

fn read_bool(config: &mut dyn ConfigStore, key: &str, default: bool) -> bool {
    if !config.contains(key) {
        config.set_bool(key, default);
        return default;
    }

    config.get_bool(key).unwrap_or_else(|| {
        warn!(key, default, "Invalid boolean in timer config, resetting to default");
        config.set_bool(key, default);
        default
    })
}

fn read_enum<T>(config: &mut dyn ConfigStore, key: &str, default: T, name: fn(T) -> &'static str) -> T
where
    T: std::str::FromStr + Copy,
{
    if !config.contains(key) {
        config.set_string(key, name(default));
        return default;
    }

    let raw = config.get_string(key);
    match raw.as_deref().map(str::parse::<T>) {
        Some(Ok(value)) => value,
        _ => {
            warn!(
                key,
                value = raw.as_deref().unwrap_or("<not a string>"),
                default = name(default),
                "Invalid value in timer config, switching to default"
            );
            config.set_string(key, name(default));
            default
        }
    }
}
