//! Events broadcast by the command loop
//!
//! Every state transition, expression change and dispatch outcome is sent
//! on a broadcast channel. Nothing in the loop depends on a receiver
//! existing.

use crate::actions::ActionKind;
use crate::intent::IntentKind;
use crate::state::{Expression, LoopState, StopReason};

/// Events emitted by the command loop
#[derive(Debug, Clone, PartialEq)]
pub enum LoopEvent {
    /// The loop moved between states
    StateChanged { from: LoopState, to: LoopState },

    /// The indicator expression was written
    ExpressionChanged(Expression),

    /// A wake phrase was heard
    WakeDetected,

    /// An utterance was classified
    IntentRouted { intent: IntentKind },

    /// A local action returned normally
    ActionCompleted { action: ActionKind },

    /// The provider chain produced a reply
    ProviderReplied,

    /// The shutdown confirmation dialog finished
    ShutdownConfirmation { confirmed: bool },

    /// A dispatch raised an unexpected fault and the loop reset
    FaultRecovered { message: String },

    /// The loop reached its terminal state
    Stopped { reason: StopReason },
}

impl std::fmt::Display for LoopEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoopEvent::StateChanged { from, to } => write!(f, "STATE_CHANGED ({from} -> {to})"),
            LoopEvent::ExpressionChanged(expression) => {
                write!(f, "EXPRESSION_CHANGED ({expression})")
            }
            LoopEvent::WakeDetected => write!(f, "WAKE_DETECTED"),
            LoopEvent::IntentRouted { intent } => write!(f, "INTENT_ROUTED ({intent})"),
            LoopEvent::ActionCompleted { action } => write!(f, "ACTION_COMPLETED ({action})"),
            LoopEvent::ProviderReplied => write!(f, "PROVIDER_REPLIED"),
            LoopEvent::ShutdownConfirmation { confirmed } => {
                write!(f, "SHUTDOWN_CONFIRMATION (confirmed={confirmed})")
            }
            LoopEvent::FaultRecovered { message } => write!(f, "FAULT_RECOVERED ({message})"),
            LoopEvent::Stopped { reason } => write!(f, "STOPPED ({reason})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_display() {
        let event = LoopEvent::StateChanged {
            from: LoopState::AwaitingWake,
            to: LoopState::AwaitingCommand,
        };
        assert_eq!(event.to_string(), "STATE_CHANGED (AwaitingWake -> AwaitingCommand)");

        let event = LoopEvent::Stopped {
            reason: StopReason::Exit,
        };
        assert_eq!(event.to_string(), "STOPPED (exit)");
    }
}
