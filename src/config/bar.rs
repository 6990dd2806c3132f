//! Bar appearance: colour and segment style.
//!
//! Both enums round-trip through their configuration names (`BLUE`,
//! `SEGMENTED_10`, ...). Parsing is case-insensitive and accepts `-` or a
//! space in place of `_`.

use std::fmt;
use std::str::FromStr;

use crossterm::style::Color;
use thiserror::Error;

/// A name that does not match any variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown value `{0}`")]
pub struct UnknownVariant(pub String);

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

/// Colour of the bar fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BarColour {
    /// Pink fill.
    Pink,
    /// Blue fill.
    #[default]
    Blue,
    /// Red fill.
    Red,
    /// Green fill.
    Green,
    /// Yellow fill.
    Yellow,
    /// Purple fill.
    Purple,
    /// White fill.
    White,
}

impl BarColour {
    /// Every colour, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Pink,
        Self::Blue,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Purple,
        Self::White,
    ];

    /// Configuration name of this colour.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pink => "PINK",
            Self::Blue => "BLUE",
            Self::Red => "RED",
            Self::Green => "GREEN",
            Self::Yellow => "YELLOW",
            Self::Purple => "PURPLE",
            Self::White => "WHITE",
        }
    }

    /// Terminal colour used for the filled portion.
    pub const fn color(self) -> Color {
        match self {
            Self::Pink => Color::Rgb { r: 236, g: 0, b: 184 },
            Self::Blue => Color::Rgb { r: 0, g: 183, b: 236 },
            Self::Red => Color::Rgb { r: 236, g: 53, b: 0 },
            Self::Green => Color::Rgb { r: 29, g: 236, b: 0 },
            Self::Yellow => Color::Rgb { r: 233, g: 236, b: 0 },
            Self::Purple => Color::Rgb { r: 123, g: 0, b: 236 },
            Self::White => Color::Rgb { r: 236, g: 236, b: 236 },
        }
    }
}

impl fmt::Display for BarColour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BarColour {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// How the bar is divided into segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BarStyle {
    /// One continuous bar.
    #[default]
    Solid,
    /// Six segments.
    Segmented6,
    /// Ten segments.
    Segmented10,
    /// Twelve segments.
    Segmented12,
    /// Twenty segments.
    Segmented20,
}

impl BarStyle {
    /// Every style, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Solid,
        Self::Segmented6,
        Self::Segmented10,
        Self::Segmented12,
        Self::Segmented20,
    ];

    /// Configuration name of this style.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Solid => "SOLID",
            Self::Segmented6 => "SEGMENTED_6",
            Self::Segmented10 => "SEGMENTED_10",
            Self::Segmented12 => "SEGMENTED_12",
            Self::Segmented20 => "SEGMENTED_20",
        }
    }

    /// Number of segments, `1` for a solid bar.
    pub const fn segments(self) -> u16 {
        match self {
            Self::Solid => 1,
            Self::Segmented6 => 6,
            Self::Segmented10 => 10,
            Self::Segmented12 => 12,
            Self::Segmented20 => 20,
        }
    }

    /// Filled and empty glyphs for this style.
    pub const fn glyphs(self) -> (char, char) {
        match self {
            Self::Solid => ('█', '░'),
            _ => ('▓', '░'),
        }
    }
}

impl fmt::Display for BarStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BarStyle {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colour_parse_is_lenient() {
        assert_eq!("blue".parse::<BarColour>(), Ok(BarColour::Blue));
        assert_eq!(" Purple ".parse::<BarColour>(), Ok(BarColour::Purple));
        assert!("teal".parse::<BarColour>().is_err());
    }

    #[test]
    fn test_unknown_variant_names_the_input() {
        let err = "Segmented 7".parse::<BarStyle>().unwrap_err();
        assert_eq!(err, UnknownVariant("Segmented 7".to_string()));
        assert_eq!(err.to_string(), "unknown value `Segmented 7`");
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_style_parse_accepts_separators() {
        assert_eq!("segmented-10".parse::<BarStyle>(), Ok(BarStyle::Segmented10));
        assert_eq!("Segmented 20".parse::<BarStyle>(), Ok(BarStyle::Segmented20));
        assert_eq!("SOLID".parse::<BarStyle>(), Ok(BarStyle::Solid));
        assert!("SEGMENTED_7".parse::<BarStyle>().is_err());
    }

    #[test]
    fn test_names_round_trip() {
        for colour in BarColour::ALL {
            assert_eq!(colour.name().parse::<BarColour>(), Ok(colour));
        }
        for style in BarStyle::ALL {
            assert_eq!(style.to_string().parse::<BarStyle>(), Ok(style));
        }
    }
}
