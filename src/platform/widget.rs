//! Line widgets for the terminal platform.
//!
//! Each widget lays itself out into a row of coloured spans for a given
//! width; [`draw_line`] queues the row onto a terminal writer. Widths are
//! measured in columns, so wide graphemes are never split.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::config::{BarColour, BarStyle};

const EMPTY_FG: Color = Color::Rgb { r: 60, g: 60, b: 60 };
const SEPARATOR_FG: Color = Color::Rgb { r: 110, g: 110, b: 110 };
const TITLE_FG: Color = Color::White;
const PERCENT_FG: Color = Color::Rgb { r: 150, g: 150, b: 150 };
const ACTION_FG: Color = Color::Rgb { r: 255, g: 255, b: 85 };

/// A run of text drawn in one colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Span {
    pub text: String,
    pub fg: Color,
}

impl Span {
    fn new(text: impl Into<String>, fg: Color) -> Self {
        Self {
            text: text.into(),
            fg,
        }
    }
}

/// Cut `text` to at most `max_cols` columns on a grapheme boundary.
///
/// Returns the kept text and its width in columns.
pub(crate) fn fit(text: &str, max_cols: usize) -> (String, usize) {
    let mut kept = String::new();
    let mut cols = 0;
    for grapheme in text.graphemes(true) {
        let w = grapheme.width();
        if cols + w > max_cols {
            break;
        }
        kept.push_str(grapheme);
        cols += w;
    }
    (kept, cols)
}

/// Title, fill and percentage for one bar.
#[derive(Debug, Clone)]
pub(crate) struct BarWidget<'a> {
    pub title: &'a str,
    pub progress: f64,
    pub colour: BarColour,
    pub style: BarStyle,
}

impl BarWidget<'_> {
    /// Lay out the bar across `width` columns:
    /// `title ▓▓▓▓│▓▓░░│░░░░  50%`.
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    #[allow(clippy::cast_precision_loss)]
    pub fn layout(&self, width: u16) -> Vec<Span> {
        let width = usize::from(width);
        let mut spans = Vec::new();

        // Title takes at most a third of the row
        let (title, title_cols) = fit(self.title, width / 3);
        let label_cols = if title_cols > 0 { title_cols + 1 } else { 0 };
        let pct_cols = 5; // " 100%"
        let bar_width = width.saturating_sub(label_cols + pct_cols);

        if label_cols > 0 {
            spans.push(Span::new(format!("{title} "), TITLE_FG));
        }
        if bar_width == 0 {
            return spans;
        }

        let progress = self.progress.clamp(0.0, 1.0);
        let filled_count = (progress * bar_width as f64).round() as usize;
        let (filled_char, empty_char) = self.style.glyphs();
        let segments = usize::from(self.style.segments());
        let is_separator = |i: usize| {
            segments > 1 && i > 0 && (i * segments) % bar_width < segments && bar_width > segments
        };

        let mut current: Option<Span> = None;
        for i in 0..bar_width {
            let (c, fg) = if is_separator(i) {
                ('│', SEPARATOR_FG)
            } else if i < filled_count {
                (filled_char, self.colour.color())
            } else {
                (empty_char, EMPTY_FG)
            };
            match current.as_mut() {
                Some(span) if span.fg == fg => span.text.push(c),
                _ => {
                    spans.extend(current.take());
                    current = Some(Span::new(c, fg));
                }
            }
        }
        spans.extend(current);

        let pct = (progress * 100.0).round() as u32;
        spans.push(Span::new(format!(" {pct:>3}%"), PERCENT_FG));
        spans
    }
}

/// A transient message centred on its row.
#[derive(Debug, Clone)]
pub(crate) struct ActionWidget<'a> {
    pub message: &'a str,
}

impl ActionWidget<'_> {
    pub fn layout(&self, width: u16) -> Vec<Span> {
        let width = usize::from(width);
        let (text, cols) = fit(self.message, width);
        if cols == 0 {
            return Vec::new();
        }
        let pad = (width - cols) / 2;
        vec![Span::new(format!("{}{text}", " ".repeat(pad)), ACTION_FG)]
    }
}

/// Clear `row` and draw `spans` from its first column.
pub(crate) fn draw_line<W: Write>(out: &mut W, row: u16, spans: &[Span]) -> io::Result<()> {
    queue!(out, MoveTo(0, row), Clear(ClearType::CurrentLine))?;
    for span in spans {
        queue!(out, SetForegroundColor(span.fg), Print(&span.text))?;
    }
    queue!(out, ResetColor)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(spans: &[Span]) -> String {
        spans.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_fit_respects_wide_graphemes() {
        assert_eq!(fit("hello", 3), ("hel".to_string(), 3));
        // each CJK character is two columns wide
        assert_eq!(fit("日本語", 5), ("日本".to_string(), 4));
        assert_eq!(fit("", 10), (String::new(), 0));
    }

    #[test]
    fn test_bar_layout_fills_width() {
        let widget = BarWidget {
            title: "PvP",
            progress: 0.5,
            colour: BarColour::Red,
            style: BarStyle::Solid,
        };
        let line = text(&widget.layout(40));

        assert_eq!(line.chars().count(), 40);
        assert!(line.starts_with("PvP "));
        assert!(line.ends_with("  50%"));
        // 40 - 4 label - 5 percent = 31 cells, half of them filled
        assert_eq!(line.matches('█').count(), 16);
        assert_eq!(line.matches('░').count(), 15);
    }

    #[test]
    fn test_bar_layout_full_and_empty() {
        let mut widget = BarWidget {
            title: "",
            progress: 1.0,
            colour: BarColour::Blue,
            style: BarStyle::Solid,
        };
        let full = text(&widget.layout(25));
        assert_eq!(full.matches('█').count(), 20);
        assert!(full.ends_with(" 100%"));

        widget.progress = 0.0;
        let empty = text(&widget.layout(25));
        assert_eq!(empty.matches('█').count(), 0);
        assert!(empty.ends_with("   0%"));
    }

    #[test]
    fn test_segmented_bar_draws_separators() {
        let widget = BarWidget {
            title: "",
            progress: 1.0,
            colour: BarColour::Green,
            style: BarStyle::Segmented10,
        };
        let line = text(&widget.layout(105));
        // 100 cells split into 10 segments leaves 9 separators
        assert_eq!(line.matches('│').count(), 9);
    }

    #[test]
    fn test_bar_too_narrow_keeps_title_only() {
        let widget = BarWidget {
            title: "Countdown",
            progress: 0.3,
            colour: BarColour::Blue,
            style: BarStyle::Solid,
        };
        let spans = widget.layout(6);
        assert_eq!(text(&spans), "Co ");
    }

    #[test]
    fn test_action_is_centred() {
        let spans = ActionWidget { message: "go" }.layout(10);
        assert_eq!(text(&spans), "    go");
        assert!(ActionWidget { message: "" }.layout(10).is_empty());
    }
}
