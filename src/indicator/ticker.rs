//! Fixed-period indicator scheduler

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::{IndicatorFrame, IndicatorRenderer};
use crate::lifecycle::ShutdownListener;
use crate::state::PresentationState;

/// Periodic task that renders the presentation state
pub struct Ticker<R> {
    state: Arc<PresentationState>,
    renderer: R,
    period: Duration,
    shutdown: ShutdownListener,
}

/// Handle to a running ticker
pub struct TickerHandle {
    ready: Option<oneshot::Receiver<()>>,
    task: JoinHandle<u64>,
}

impl<R: IndicatorRenderer> Ticker<R> {
    pub fn new(
        state: Arc<PresentationState>,
        renderer: R,
        period: Duration,
        shutdown: ShutdownListener,
    ) -> Self {
        Self {
            state,
            renderer,
            period,
            shutdown,
        }
    }

    /// Start ticking on the runtime
    pub fn spawn(self) -> TickerHandle {
        let (ready_tx, ready_rx) = oneshot::channel();
        let task = tokio::spawn(self.run(ready_tx));
        TickerHandle {
            ready: Some(ready_rx),
            task,
        }
    }

    /// Tick until the shutdown flag is set, returning the number of frames
    async fn run(mut self, ready: oneshot::Sender<()>) -> u64 {
        info!(period_ms = self.period.as_millis() as u64, "indicator ticker started");

        let started = Instant::now();
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut ready = Some(ready);
        let mut frames = 0u64;

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.wait() => break,

                _ = interval.tick() => {
                    let frame = IndicatorFrame::compute(self.state.snapshot(), started.elapsed());
                    self.renderer.render(&frame);
                    frames += 1;

                    if let Some(ready) = ready.take() {
                        let _ = ready.send(());
                    }
                }
            }
        }

        info!(frames, "indicator ticker stopped");
        frames
    }
}

impl TickerHandle {
    /// Wait until the first frame has been rendered
    pub async fn ready(&mut self) {
        if let Some(ready) = self.ready.take() {
            if ready.await.is_err() {
                debug!("ticker exited before its first frame");
            }
        }
    }

    /// Wait for the ticker to exit; it must have been told to shut down
    pub async fn join(self) -> u64 {
        match self.task.await {
            Ok(frames) => frames,
            Err(e) => {
                warn!(?e, "indicator ticker task failed");
                0
            }
        }
    }
}
