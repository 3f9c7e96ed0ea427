//! Core command loop implementation
//!
//! Drives AwaitingWake → AwaitingCommand → Dispatching → AwaitingWake until
//! an Exit intent, an interrupt or closed input moves it to Stopped. A fault
//! raised while dispatching resets the loop instead of ending it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use super::presentation::{Expression, PresentationState};
use crate::actions::{ActionExecutor, ActionKind};
use crate::events::LoopEvent;
use crate::intent::{contains_wake_word, IntentKind, IntentRouter};
use crate::lifecycle::{ShutdownListener, ShutdownSignal};
use crate::provider::{ModelTransport, ProviderChain};
use crate::voice::{Announcer, InputError, InputSource};

const GREETING: &str = "Hello, I am Jarvis. Say my name to activate me.";
const WAKE_REPLY: &str = "Yes, how can I help?";
const NOTE_PROMPT: &str = "What should I write in the note?";
const CONFIRM_PROMPT: &str =
    "Are you sure you want to shut down the computer? Say 'yes' to confirm.";
const SHUTDOWN_CANCELLED: &str = "Shutdown cancelled.";
const RESET_REPLY: &str = "I've encountered an error. Resetting.";
const EXIT_FAREWELL: &str = "Goodbye! Have a nice day.";
const FAREWELL: &str = "Goodbye!";

/// Whole words accepted as a shutdown confirmation
const AFFIRMATIVE_WORDS: &[&str] = &["yes", "confirm"];

/// Pause after a hard input failure before capturing again
const INPUT_RETRY_DELAY: Duration = Duration::from_millis(200);

/// The states of the command loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoopState {
    /// Blocking on input until a wake phrase is heard
    #[default]
    AwaitingWake,
    /// Waiting a bounded time for the command
    AwaitingCommand,
    /// Routing and executing a command
    Dispatching,
    /// Terminal
    Stopped,
}

impl std::fmt::Display for LoopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoopState::AwaitingWake => write!(f, "AwaitingWake"),
            LoopState::AwaitingCommand => write!(f, "AwaitingCommand"),
            LoopState::Dispatching => write!(f, "Dispatching"),
            LoopState::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The user asked to exit
    Exit,
    /// The shutdown signal was triggered
    Interrupted,
    /// The input source has no more input
    InputClosed,
}

impl StopReason {
    fn farewell(self) -> &'static str {
        match self {
            StopReason::Exit => EXIT_FAREWELL,
            StopReason::Interrupted | StopReason::InputClosed => FAREWELL,
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Exit => write!(f, "exit"),
            StopReason::Interrupted => write!(f, "interrupted"),
            StopReason::InputClosed => write!(f, "input_closed"),
        }
    }
}

/// Bounded waits used by the loop
#[derive(Debug, Clone, Copy)]
pub struct LoopTimings {
    /// Wait for the command after the wake phrase
    pub command_timeout: Duration,
    /// Wait for the shutdown confirmation
    pub confirm_timeout: Duration,
    /// Wait for note content when the command had none
    pub note_timeout: Duration,
}

impl Default for LoopTimings {
    fn default() -> Self {
        Self {
            command_timeout: Duration::from_secs(10),
            confirm_timeout: Duration::from_secs(7),
            note_timeout: Duration::from_secs(10),
        }
    }
}

/// Why a cycle ended before returning to AwaitingWake
enum Halt {
    Stop(StopReason),
    Fault(anyhow::Error),
}

impl From<StopReason> for Halt {
    fn from(reason: StopReason) -> Self {
        Halt::Stop(reason)
    }
}

/// Check a confirmation reply for an affirmative word
fn is_affirmative(reply: &str) -> bool {
    reply
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| AFFIRMATIVE_WORDS.contains(&word))
}

/// The command loop, generic over its collaborators
pub struct CommandLoop<I, A, X, T> {
    input: I,
    announcer: A,
    actions: X,
    providers: ProviderChain<T>,
    router: IntentRouter,
    presentation: Arc<PresentationState>,
    shutdown: ShutdownSignal,
    interrupt: ShutdownListener,
    timings: LoopTimings,
    /// Current state
    state: LoopState,
    /// Time the current state was entered
    state_entered_at: Instant,
    /// Channel for emitting loop events
    event_tx: broadcast::Sender<LoopEvent>,
}

impl<I, A, X, T> CommandLoop<I, A, X, T>
where
    I: InputSource,
    A: Announcer,
    X: ActionExecutor,
    T: ModelTransport,
{
    /// Create a new command loop in AwaitingWake
    pub fn new(
        input: I,
        announcer: A,
        actions: X,
        providers: ProviderChain<T>,
        router: IntentRouter,
        presentation: Arc<PresentationState>,
        shutdown: ShutdownSignal,
        event_tx: broadcast::Sender<LoopEvent>,
    ) -> Self {
        let interrupt = shutdown.subscribe();
        Self {
            input,
            announcer,
            actions,
            providers,
            router,
            presentation,
            shutdown,
            interrupt,
            timings: LoopTimings::default(),
            state: LoopState::AwaitingWake,
            state_entered_at: Instant::now(),
            event_tx,
        }
    }

    pub fn with_timings(mut self, timings: LoopTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Get the current state
    #[cfg(test)]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Run cycles until the loop stops.
    ///
    /// On return the farewell has been announced and the shared shutdown
    /// signal is set, so the ticker exits on its next tick.
    pub async fn run(&mut self) -> StopReason {
        info!("command loop started in AwaitingWake state");
        self.announce(GREETING).await;

        let reason = loop {
            match self.cycle().await {
                Ok(()) => {}
                Err(Halt::Stop(reason)) => break reason,
                Err(Halt::Fault(fault)) => self.recover(fault).await,
            }
        };

        self.stop(reason).await;
        reason
    }

    /// One pass from AwaitingWake back to AwaitingWake
    async fn cycle(&mut self) -> Result<(), Halt> {
        let heard = self.capture(None).await?;
        if !contains_wake_word(&heard) {
            if !heard.is_empty() {
                debug!(%heard, "ignoring input without wake phrase");
            }
            return Ok(());
        }

        self.emit(LoopEvent::WakeDetected);
        self.set_expression(Expression::Listening);
        self.transition_to(LoopState::AwaitingCommand);
        self.announce(WAKE_REPLY).await;

        let command = self.capture(Some(self.timings.command_timeout)).await?;
        if command.is_empty() {
            info!("no command heard");
        } else {
            self.transition_to(LoopState::Dispatching);
            self.set_expression(Expression::Processing);
            self.dispatch(&command).await?;
        }

        self.set_expression(Expression::Neutral);
        self.transition_to(LoopState::AwaitingWake);
        Ok(())
    }

    /// Route a non-empty command and announce the result
    async fn dispatch(&mut self, command: &str) -> Result<(), Halt> {
        let intent = self.router.classify(command);
        info!(intent = %intent.kind, "dispatching command");
        self.emit(LoopEvent::IntentRouted {
            intent: intent.kind,
        });

        if intent.kind == IntentKind::Exit {
            return Err(StopReason::Exit.into());
        }

        let reply = match intent.kind.action() {
            None => self.ask_providers(&intent.utterance).await?,
            Some(ActionKind::Shutdown) => self.confirm_shutdown().await?,
            Some(ActionKind::Note) => {
                let mut content = intent.argument().to_string();
                if content.is_empty() {
                    self.announce(NOTE_PROMPT).await;
                    content = self.capture(Some(self.timings.note_timeout)).await?;
                }
                self.execute(ActionKind::Note, &content).await?
            }
            Some(action) => self.execute(action, intent.argument()).await?,
        };

        self.announce(&reply).await;
        Ok(())
    }

    /// Ask for confirmation, then shut down or cancel
    async fn confirm_shutdown(&mut self) -> Result<String, Halt> {
        self.announce(CONFIRM_PROMPT).await;

        let reply = self.capture(Some(self.timings.confirm_timeout)).await?;
        let confirmed = is_affirmative(&reply);
        info!(confirmed, "shutdown confirmation");
        self.emit(LoopEvent::ShutdownConfirmation { confirmed });

        if confirmed {
            self.execute(ActionKind::Shutdown, "").await
        } else {
            self.set_expression(Expression::Neutral);
            Ok(SHUTDOWN_CANCELLED.to_string())
        }
    }

    async fn execute(&self, action: ActionKind, payload: &str) -> Result<String, Halt> {
        match self.actions.execute(action, payload).await {
            Ok(reply) => {
                debug!(%action, "action completed");
                self.emit(LoopEvent::ActionCompleted { action });
                Ok(reply)
            }
            Err(fault) => Err(Halt::Fault(fault.context(format!("{action} action failed")))),
        }
    }

    /// Query the provider chain, abandoning the call on interrupt
    async fn ask_providers(&mut self, prompt: &str) -> Result<String, Halt> {
        self.set_expression(Expression::Processing);

        tokio::select! {
            biased;

            _ = self.interrupt.wait() => {
                debug!("interrupted during provider call, discarding its result");
                Err(StopReason::Interrupted.into())
            }

            reply = self.providers.query(prompt) => {
                self.emit(LoopEvent::ProviderReplied);
                Ok(reply)
            }
        }
    }

    /// Capture input, racing it against the shutdown signal
    async fn capture(&mut self, timeout: Option<Duration>) -> Result<String, Halt> {
        let result = tokio::select! {
            biased;

            _ = self.interrupt.wait() => return Err(StopReason::Interrupted.into()),

            result = self.input.capture(timeout) => result,
        };

        match result {
            Ok(text) => Ok(text),
            Err(InputError::Closed) => {
                info!("input closed");
                Err(StopReason::InputClosed.into())
            }
            Err(e) => {
                warn!(error = %e, "input capture failed, treating as silence");
                tokio::time::sleep(INPUT_RETRY_DELAY).await;
                Ok(String::new())
            }
        }
    }

    async fn announce(&self, text: &str) {
        self.presentation.set_active(true);
        self.announcer.announce(text).await;
        self.presentation.set_active(false);
    }

    /// Contain a dispatch fault and return to AwaitingWake
    async fn recover(&mut self, fault: anyhow::Error) {
        error!(error = ?fault, "unexpected fault while dispatching, resetting");
        self.emit(LoopEvent::FaultRecovered {
            message: format!("{fault:#}"),
        });

        self.set_expression(Expression::Error);
        self.announce(RESET_REPLY).await;
        self.transition_to(LoopState::AwaitingWake);
    }

    /// Enter Stopped: farewell, then signal the ticker
    async fn stop(&mut self, reason: StopReason) {
        self.transition_to(LoopState::Stopped);
        self.announce(reason.farewell()).await;
        self.set_expression(Expression::Neutral);

        self.shutdown.trigger();
        self.emit(LoopEvent::Stopped { reason });
        info!(%reason, "command loop stopped");
    }

    fn set_expression(&self, expression: Expression) {
        if self.presentation.expression() != expression {
            debug!(%expression, "expression updated");
        }
        self.presentation.set_expression(expression);
        self.emit(LoopEvent::ExpressionChanged(expression));
    }

    /// Perform a state transition
    fn transition_to(&mut self, new_state: LoopState) {
        let old_state = self.state;
        if old_state == new_state {
            return;
        }

        let duration_ms = self.state_entered_at.elapsed().as_millis() as u64;
        info!(
            from = %old_state,
            to = %new_state,
            duration_ms = duration_ms,
            "state transition"
        );

        self.state = new_state;
        self.state_entered_at = Instant::now();
        self.emit(LoopEvent::StateChanged {
            from: old_state,
            to: new_state,
        });
    }

    fn emit(&self, event: LoopEvent) {
        let _ = self.event_tx.send(event);
    }
}

impl From<&crate::config::Timings> for LoopTimings {
    fn from(timings: &crate::config::Timings) -> Self {
        Self {
            command_timeout: timings.command_timeout(),
            confirm_timeout: timings.confirm_timeout(),
            note_timeout: timings.note_timeout(),
        }
    }
}
