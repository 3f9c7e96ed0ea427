//! Shared presentation state for the indicator.
//!
//! The command loop is the only writer; the ticker reads a snapshot on every
//! tick. Expression and activity are packed into a single `AtomicU8` so a
//! snapshot never mixes fields from two different updates.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

const EXPRESSION_MASK: u8 = 0b0000_0011;
const ACTIVE_BIT: u8 = 0b1000_0000;

/// Visual mode of the assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Expression {
    Neutral = 0,
    Listening = 1,
    Processing = 2,
    Error = 3,
}

impl Expression {
    fn from_bits(bits: u8) -> Self {
        match bits & EXPRESSION_MASK {
            1 => Self::Listening,
            2 => Self::Processing,
            3 => Self::Error,
            _ => Self::Neutral,
        }
    }
}

impl Default for Expression {
    fn default() -> Self {
        Self::Neutral
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Neutral => write!(f, "neutral"),
            Self::Listening => write!(f, "listening"),
            Self::Processing => write!(f, "processing"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A consistent copy of the presentation state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Presentation {
    pub expression: Expression,
    /// The assistant is currently speaking
    pub is_active: bool,
}

impl Presentation {
    fn from_bits(bits: u8) -> Self {
        Self {
            expression: Expression::from_bits(bits),
            is_active: bits & ACTIVE_BIT != 0,
        }
    }
}

/// Thread-safe presentation state, shareable via `Arc`.
#[derive(Debug)]
pub struct PresentationState {
    bits: AtomicU8,
}

impl PresentationState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn snapshot(&self) -> Presentation {
        Presentation::from_bits(self.bits.load(Ordering::Acquire))
    }

    pub fn expression(&self) -> Expression {
        self.snapshot().expression
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.snapshot().is_active
    }

    /// Replace the expression, keeping the activity flag.
    pub fn set_expression(&self, expression: Expression) {
        self.update(|bits| (bits & !EXPRESSION_MASK) | expression as u8);
    }

    pub fn set_active(&self, active: bool) {
        self.update(|bits| {
            if active {
                bits | ACTIVE_BIT
            } else {
                bits & !ACTIVE_BIT
            }
        });
    }

    fn update(&self, f: impl Fn(u8) -> u8) {
        // Single writer: the closure runs exactly once.
        let _ = self
            .bits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| Some(f(bits)));
    }
}

impl Default for PresentationState {
    fn default() -> Self {
        Self {
            bits: AtomicU8::new(Expression::Neutral as u8),
        }
    }
}
