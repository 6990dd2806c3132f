//! The countdown timer: engine and its state.

mod engine;
mod state;

pub use engine::{TickOutcome, TimerEngine, TICK_INTERVAL};
pub use state::CountdownState;
