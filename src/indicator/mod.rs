//! Animated state indicator
//!
//! The ticker runs on its own fixed schedule, reads the shared
//! presentation state and hands a frame to a renderer. It never waits on
//! the command loop.

mod frame;
mod ticker;

pub use frame::{EyeColor, IndicatorFrame};
pub use ticker::Ticker;

use tracing::{debug, trace};

/// Applies presentation instructions. Called only from the ticker task.
pub trait IndicatorRenderer: Send + 'static {
    fn render(&mut self, frame: &IndicatorFrame);
}

/// Renderer that reports frames through tracing
#[derive(Debug, Default)]
pub struct LogIndicator {
    last: Option<IndicatorFrame>,
}

impl LogIndicator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IndicatorRenderer for LogIndicator {
    fn render(&mut self, frame: &IndicatorFrame) {
        let changed = self.last.map_or(true, |last| !last.same_shape(frame));
        if changed {
            debug!(eyes = frame.eyes.name(), mouth = ?frame.mouth, "indicator changed");
        } else {
            trace!(mouth = ?frame.mouth, "indicator frame");
        }
        self.last = Some(*frame);
    }
}
