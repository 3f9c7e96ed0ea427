//! Intent classification for captured utterances
//!
//! Provides a closed set of intents and a router that picks one by
//! ordered keyword tests. Freeform is the catch-all.

mod keywords;
mod router;

pub use keywords::contains_wake_word;
pub use router::IntentRouter;

use crate::actions::ActionKind;

/// The classified purpose of an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    Exit,
    Shutdown,
    OpenApp,
    Search,
    Play,
    Note,
    Screenshot,
    /// No keyword matched; goes to the provider chain
    Freeform,
}

impl IntentKind {
    /// The local action that handles this intent, if any
    pub fn action(self) -> Option<ActionKind> {
        match self {
            Self::Shutdown => Some(ActionKind::Shutdown),
            Self::OpenApp => Some(ActionKind::OpenApp),
            Self::Search => Some(ActionKind::Search),
            Self::Play => Some(ActionKind::Play),
            Self::Note => Some(ActionKind::Note),
            Self::Screenshot => Some(ActionKind::Screenshot),
            Self::Exit | Self::Freeform => None,
        }
    }

    /// Words dropped from the argument besides the trigger phrases
    fn filler_words(self) -> &'static [&'static str] {
        match self {
            Self::OpenApp => &["app"],
            Self::Play => &["song", "video"],
            _ => &[],
        }
    }
}

impl std::fmt::Display for IntentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntentKind::Exit => write!(f, "Exit"),
            IntentKind::Shutdown => write!(f, "Shutdown"),
            IntentKind::OpenApp => write!(f, "OpenApp"),
            IntentKind::Search => write!(f, "Search"),
            IntentKind::Play => write!(f, "Play"),
            IntentKind::Note => write!(f, "Note"),
            IntentKind::Screenshot => write!(f, "Screenshot"),
            IntentKind::Freeform => write!(f, "Freeform"),
        }
    }
}

/// A classified utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intent {
    pub kind: IntentKind,
    /// The utterance exactly as it was classified
    pub utterance: String,
    argument: String,
}

impl Intent {
    pub fn new(
        kind: IntentKind,
        utterance: impl Into<String>,
        argument: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            utterance: utterance.into(),
            argument: argument.into(),
        }
    }

    /// The utterance with this intent's trigger and filler words removed.
    ///
    /// For Freeform this is the trimmed utterance.
    pub fn argument(&self) -> &str {
        &self.argument
    }
}
