//! jarvis: console voice-command assistant
//!
//! Runs two concurrent units until shutdown:
//! - Command loop: wake phrase, command, local action or remote model reply
//! - Indicator ticker: renders the shared presentation state every tick
//!
//! Typed lines stand in for recognized speech. Replies go to stdout, logs
//! to stderr.

mod actions;
mod config;
mod events;
mod indicator;
mod intent;
mod lifecycle;
mod provider;
mod state;
mod voice;

#[cfg(test)]
mod testing;

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::actions::SystemActions;
use crate::config::Config;
use crate::events::LoopEvent;
use crate::indicator::{LogIndicator, Ticker};
use crate::intent::IntentRouter;
use crate::lifecycle::{check_internet, ShutdownSignal};
use crate::provider::{Credential, OpenRouterTransport, ProviderChain};
use crate::state::{CommandLoop, LoopTimings, PresentationState};
use crate::voice::{ConsoleAnnouncer, ConsoleInput};

const CONNECTIVITY_TIMEOUT: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "jarvis starting");

    // Load configuration
    let config = Config::load()?;
    config
        .ensure_dirs()
        .with_context(|| format!("failed to create {}", config.data_dir.display()))?;
    info!(data_dir = ?config.data_dir, models = config.models.len(), "configuration loaded");

    if !check_internet(CONNECTIVITY_TIMEOUT).await {
        warn!("no internet connection detected, some features may be limited");
    }

    // Create shutdown signal handler
    let shutdown = ShutdownSignal::new();
    let os_signal = shutdown.trigger_on_os_signal();

    // Start the indicator on its own schedule
    let presentation = PresentationState::new();
    let mut ticker = Ticker::new(
        presentation.clone(),
        LogIndicator::new(),
        config.timings.tick_interval(),
        shutdown.subscribe(),
    )
    .spawn();

    // Command loop -> event log
    let (event_tx, mut event_rx) = broadcast::channel::<LoopEvent>(64);
    let event_log = tokio::spawn(async move {
        loop {
            match event_rx.recv().await {
                Ok(event) => debug!(%event, "loop event"),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "loop event receiver lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let credential = Credential::from_value(config.api_key.as_deref());
    let providers = ProviderChain::new(
        OpenRouterTransport::new(config.api_url.clone())
            .with_referer(config.referer.clone()),
        config.models.clone(),
        credential,
        config.timings.provider_timeout(),
    );
    if !providers.is_configured() {
        warn!("OPENROUTER_API_KEY is not set, questions will not be answered");
    }

    let router = IntentRouter::new().context("failed to compile keyword patterns")?;

    let mut command_loop = CommandLoop::new(
        ConsoleInput::stdin(),
        ConsoleAnnouncer::new(config.speech_command.clone()),
        SystemActions::from_config(&config),
        providers,
        router,
        presentation,
        shutdown.clone(),
        event_tx,
    )
    .with_timings(LoopTimings::from(&config.timings));

    ticker.ready().await;
    info!("jarvis initialized, entering command loop");

    let reason = command_loop.run().await;

    // Cleanup
    info!(%reason, "shutting down...");
    shutdown.trigger();
    let frames = ticker.join().await;
    drop(command_loop);
    let _ = event_log.await;
    os_signal.abort();

    info!(frames, "jarvis stopped");

    Ok(())
}
