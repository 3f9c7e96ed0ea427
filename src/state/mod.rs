//! Command loop state machine and presentation state
//!
//! Provides the loop that drives one wake/command/dispatch cycle at a time:
//! - AwaitingWake: blocking wait for a wake phrase
//! - AwaitingCommand: bounded wait for the command
//! - Dispatching: routing and executing the command
//! - Stopped: terminal, after Exit or an interrupt
//!
//! and the presentation state it shares with the indicator ticker.

mod machine;
mod presentation;

pub use machine::{CommandLoop, LoopState, LoopTimings, StopReason};
pub use presentation::{Expression, Presentation, PresentationState};
