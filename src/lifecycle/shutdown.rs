//! Shutdown flag shared by the command loop and the ticker
//!
//! The flag is set once by an OS signal (SIGTERM, SIGINT) or by the command
//! loop on Exit, and every listener observes it.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Owner side of the shutdown flag; cheap to clone
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    /// Create a new, untriggered shutdown signal
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Set the flag; later calls are no-ops
    pub fn trigger(&self) {
        if !self.tx.send_replace(true) {
            debug!("shutdown triggered");
        }
    }

    #[cfg(test)]
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }

    /// Trigger the flag when the process receives SIGTERM or SIGINT
    pub fn trigger_on_os_signal(&self) -> JoinHandle<()> {
        let signal = self.clone();
        tokio::spawn(async move {
            match wait_for_os_signal().await {
                Ok(()) => {
                    info!("interrupt received");
                    signal.trigger();
                }
                Err(e) => error!(?e, "failed to register signal handlers"),
            }
        })
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of the shutdown flag
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownListener {
    /// Resolve once the flag is set. Cancel safe.
    pub async fn wait(&mut self) {
        // An Err means every sender is gone, which is also a shutdown
        let _ = self.rx.wait_for(|triggered| *triggered).await;
    }

    #[cfg(test)]
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }
}

#[cfg(unix)]
async fn wait_for_os_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => {
            debug!("received SIGTERM");
        }
        _ = sigint.recv() => {
            debug!("received SIGINT");
        }
    }
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_os_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    debug!("received ctrl-c");
    Ok(())
}
