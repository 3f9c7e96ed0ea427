//! Input capture and announcement collaborators
//!
//! Provides the `InputSource` and `Announcer` traits the command loop is
//! generic over, with console implementations:
//! - `ConsoleInput`: reads lower-cased lines, empty on timeout
//! - `ConsoleAnnouncer`: prints replies, optionally speaks them

mod console;

pub use console::{ConsoleAnnouncer, ConsoleInput};

use std::time::Duration;

/// Hard failures from an input backend
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("input stream closed")]
    Closed,

    #[error("input device error: {0}")]
    Device(#[from] std::io::Error),
}

/// Source of lower-cased utterances.
#[allow(async_fn_in_trait)]
pub trait InputSource {
    /// Capture one utterance.
    ///
    /// `None` waits indefinitely. Timeout and silence produce an empty
    /// string, never an error.
    async fn capture(&mut self, timeout: Option<Duration>) -> Result<String, InputError>;
}

/// Sink for assistant replies. Device errors are swallowed.
#[allow(async_fn_in_trait)]
pub trait Announcer {
    async fn announce(&self, text: &str);
}
