//! Local actions dispatched by the command loop
//!
//! The executor reports ordinary failures as message text. An `Err` is an
//! unexpected fault, which the command loop contains and recovers from.

mod system;

pub use system::SystemActions;

/// Kinds of local action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    OpenApp,
    Search,
    Play,
    Note,
    Screenshot,
    Shutdown,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::OpenApp => write!(f, "open_app"),
            ActionKind::Search => write!(f, "search"),
            ActionKind::Play => write!(f, "play"),
            ActionKind::Note => write!(f, "note"),
            ActionKind::Screenshot => write!(f, "screenshot"),
            ActionKind::Shutdown => write!(f, "shutdown"),
        }
    }
}

/// Performs OS, web and file actions
#[allow(async_fn_in_trait)]
pub trait ActionExecutor {
    /// Run the action and return a sentence to announce.
    async fn execute(&self, kind: ActionKind, payload: &str) -> anyhow::Result<String>;
}
