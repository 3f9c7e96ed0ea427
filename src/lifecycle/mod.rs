//! Process lifecycle: shutdown signalling and startup checks

mod connectivity;
mod shutdown;

pub use connectivity::check_internet;
pub use shutdown::{ShutdownListener, ShutdownSignal};
