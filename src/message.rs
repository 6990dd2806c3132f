//! Countdown messages: text built from the seconds left.

/// Formats the text shown for a given number of remaining seconds.
///
/// Any `Fn(u64) -> String` closure is a message:
///
/// ```
/// use hourglass::TimerMessage;
///
/// let message = |secs: u64| format!("Border shrinks in {secs}s");
/// assert_eq!(message.render(30), "Border shrinks in 30s");
/// ```
pub trait TimerMessage {
    /// Text for `remaining_secs` seconds left.
    fn render(&self, remaining_secs: u64) -> String;
}

impl<F> TimerMessage for F
where
    F: Fn(u64) -> String,
{
    fn render(&self, remaining_secs: u64) -> String {
        self(remaining_secs)
    }
}

/// Format seconds as `1h 02m 03s`, `4m 05s` or `6s`.
pub fn format_remaining(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}h {m:02}m {s:02}s")
    } else if m > 0 {
        format!("{m}m {s:02}s")
    } else {
        format!("{s}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(0), "0s");
        assert_eq!(format_remaining(59), "59s");
        assert_eq!(format_remaining(60), "1m 00s");
        assert_eq!(format_remaining(245), "4m 05s");
        assert_eq!(format_remaining(3723), "1h 02m 03s");
    }

    #[test]
    fn test_closure_is_a_message() {
        let prefix = String::from("PvP in ");
        let message = move |secs: u64| format!("{prefix}{}", format_remaining(secs));
        assert_eq!(message.render(90), "PvP in 1m 30s");
    }
}
