//! Countdown state owned by the engine.

use std::fmt;

use crate::message::TimerMessage;

/// Progress of the current countdown.
///
/// `elapsed` counts up from zero towards `target`, one per tick. Both are
/// zero and no message is stored while the engine is idle.
#[derive(Default)]
pub struct CountdownState {
    elapsed: u64,
    target: u64,
    message: Option<Box<dyn TimerMessage>>,
}

impl CountdownState {
    /// Ticks counted since the countdown started.
    pub const fn elapsed(&self) -> u64 {
        self.elapsed
    }

    /// Tick count at which the countdown ends.
    pub const fn target(&self) -> u64 {
        self.target
    }

    /// Seconds left, `target - elapsed`.
    pub const fn remaining(&self) -> u64 {
        self.target.saturating_sub(self.elapsed)
    }

    /// Fraction of the countdown still to go, `1 - elapsed / target`.
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_remaining(&self) -> f64 {
        if self.target == 0 {
            return 0.0;
        }
        let percent_remaining = 100.0 - (self.elapsed as f64 / self.target as f64) * 100.0;
        percent_remaining / 100.0
    }

    /// Message text for the seconds currently left.
    pub fn render(&self) -> String {
        self.message
            .as_ref()
            .map_or_else(String::new, |m| m.render(self.remaining()))
    }

    pub(crate) fn begin(&mut self, message: Box<dyn TimerMessage>, target: u64) {
        self.elapsed = 0;
        self.target = target;
        self.message = Some(message);
    }

    /// Count one tick. Returns `true` once the target is reached.
    pub(crate) fn advance(&mut self) -> bool {
        self.elapsed += 1;
        self.elapsed >= self.target
    }

    pub(crate) fn extend(&mut self, ticks: u64) {
        self.target = self.target.saturating_add(ticks);
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Debug for CountdownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountdownState")
            .field("elapsed", &self.elapsed)
            .field("target", &self.target)
            .field("has_message", &self.message.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Step {
        Tick,
        Extend(u64),
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            4 => Just(Step::Tick),
            1 => (1u64..10_000).prop_map(Step::Extend),
        ]
    }

    proptest! {
        #[test]
        #[allow(clippy::cast_precision_loss)]
        fn test_progress_stays_in_unit_range(
            target in 1u64..100_000,
            steps in prop::collection::vec(step(), 0..200),
        ) {
            let mut state = CountdownState::default();
            state.begin(Box::new(|s: u64| s.to_string()), target);
            let mut last = state.progress_remaining();
            prop_assert!((last - 1.0).abs() < 1e-9);

            for step in steps {
                match step {
                    Step::Tick => {
                        if state.advance() {
                            break;
                        }
                        let progress = state.progress_remaining();
                        prop_assert!(progress <= last + 1e-9);
                        last = progress;
                    }
                    Step::Extend(ticks) => {
                        state.extend(ticks);
                        last = state.progress_remaining();
                    }
                }

                let progress = state.progress_remaining();
                prop_assert!((0.0..=1.0).contains(&progress), "progress {progress} out of range");
                let expected = 1.0 - state.elapsed() as f64 / state.target() as f64;
                prop_assert!((progress - expected).abs() < 1e-9);
                prop_assert_eq!(state.remaining(), state.target() - state.elapsed());
            }
        }
    }

    #[test]
    fn test_extend_after_ticks_on_long_target() {
        let mut state = CountdownState::default();
        state.begin(Box::new(|s: u64| s.to_string()), 3600);
        for _ in 0..3599 {
            assert!(!state.advance());
        }
        assert!((state.progress_remaining() - 1.0 / 3600.0).abs() < 1e-9);

        state.extend(400);
        assert_eq!(state.remaining(), 401);
        assert!((state.progress_remaining() - 0.100_25).abs() < 1e-9);
        assert_eq!(state.render(), "401");
    }

    #[test]
    fn test_progress_counts_time_remaining() {
        let mut state = CountdownState::default();
        state.begin(Box::new(|s: u64| format!("{s} left")), 4);

        assert!((state.progress_remaining() - 1.0).abs() < 1e-9);
        assert!(!state.advance());
        assert!((state.progress_remaining() - 0.75).abs() < 1e-9);
        assert_eq!(state.render(), "3 left");

        state.extend(4);
        assert_eq!(state.remaining(), 7);
        assert!((state.progress_remaining() - 0.875).abs() < 1e-9);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut state = CountdownState::default();
        state.begin(Box::new(|s: u64| s.to_string()), 2);
        state.advance();
        state.clear();

        assert_eq!(state.elapsed(), 0);
        assert_eq!(state.target(), 0);
        assert_eq!(state.render(), "");
        assert!(state.progress_remaining().abs() < f64::EPSILON);
    }
}
