//! Scripted collaborators for unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::bail;

use crate::actions::{ActionExecutor, ActionKind};
use crate::indicator::{IndicatorFrame, IndicatorRenderer};
use crate::provider::{Credential, ModelTransport, RemoteReply};
use crate::state::{Presentation, PresentationState};
use crate::voice::{Announcer, InputError, InputSource};

/// Replays captures in order, then waits forever
pub struct ScriptedInput {
    script: VecDeque<Result<String, InputError>>,
    timeouts: Arc<Mutex<Vec<Option<Duration>>>>,
}

impl ScriptedInput {
    pub fn new(lines: &[&str]) -> Self {
        Self::from_results(lines.iter().map(|line| Ok(line.to_string())).collect())
    }

    pub fn from_results(script: Vec<Result<String, InputError>>) -> Self {
        Self {
            script: script.into(),
            timeouts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Timeout passed to each capture, in call order
    pub fn timeouts(&self) -> Arc<Mutex<Vec<Option<Duration>>>> {
        Arc::clone(&self.timeouts)
    }
}

impl InputSource for ScriptedInput {
    async fn capture(&mut self, timeout: Option<Duration>) -> Result<String, InputError> {
        self.timeouts.lock().unwrap().push(timeout);
        match self.script.pop_front() {
            Some(next) => next,
            None => std::future::pending().await,
        }
    }
}

/// Records announcements with the presentation seen while announcing
pub struct RecordingAnnouncer {
    presentation: Arc<PresentationState>,
    announcements: Arc<Mutex<Vec<String>>>,
    snapshots: Arc<Mutex<Vec<Presentation>>>,
}

impl RecordingAnnouncer {
    pub fn new(presentation: Arc<PresentationState>) -> Self {
        Self {
            presentation,
            announcements: Arc::new(Mutex::new(Vec::new())),
            snapshots: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn announcements(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.announcements)
    }

    pub fn snapshots(&self) -> Arc<Mutex<Vec<Presentation>>> {
        Arc::clone(&self.snapshots)
    }
}

impl Announcer for RecordingAnnouncer {
    async fn announce(&self, text: &str) {
        self.snapshots.lock().unwrap().push(self.presentation.snapshot());
        self.announcements.lock().unwrap().push(text.to_string());
    }
}

/// Records executed actions and replies "<action> done"
#[derive(Default)]
pub struct RecordingActions {
    calls: Arc<Mutex<Vec<(ActionKind, String)>>>,
    fault_on: Option<ActionKind>,
}

impl RecordingActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise an unexpected fault whenever `kind` runs
    pub fn fault_on(mut self, kind: ActionKind) -> Self {
        self.fault_on = Some(kind);
        self
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<(ActionKind, String)>>> {
        Arc::clone(&self.calls)
    }
}

impl ActionExecutor for RecordingActions {
    async fn execute(&self, kind: ActionKind, payload: &str) -> anyhow::Result<String> {
        self.calls.lock().unwrap().push((kind, payload.to_string()));
        if self.fault_on == Some(kind) {
            bail!("simulated fault");
        }
        Ok(format!("{kind} done"))
    }
}

/// Answers per model from a script; unscripted models fail
#[derive(Default)]
pub struct ScriptedTransport {
    replies: HashMap<String, RemoteReply>,
    delays: HashMap<String, Duration>,
    calls: Arc<Mutex<Vec<String>>>,
    spans: Arc<Mutex<Vec<(Instant, Instant)>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, model: &str, reply: RemoteReply) -> Self {
        self.replies.insert(model.to_string(), reply);
        self
    }

    /// Hold the reply for `model` back for `delay`
    pub fn delay(mut self, model: &str, delay: Duration) -> Self {
        self.delays.insert(model.to_string(), delay);
        self
    }

    /// Models called, in order
    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }

    /// Start and end of every completed call
    pub fn spans(&self) -> Arc<Mutex<Vec<(Instant, Instant)>>> {
        Arc::clone(&self.spans)
    }
}

impl ModelTransport for ScriptedTransport {
    async fn call(
        &self,
        _credential: &Credential,
        model: &str,
        _prompt: &str,
        _timeout: Duration,
    ) -> RemoteReply {
        self.calls.lock().unwrap().push(model.to_string());
        let started = Instant::now();

        if let Some(delay) = self.delays.get(model) {
            tokio::time::sleep(*delay).await;
        }

        self.spans.lock().unwrap().push((started, Instant::now()));
        self.replies
            .get(model)
            .cloned()
            .unwrap_or_else(|| RemoteReply::failure("500 Internal Server Error - unscripted"))
    }
}

/// A frame and the moment it was rendered
#[derive(Debug, Clone, Copy)]
pub struct RenderedFrame {
    pub at: Instant,
    pub frame: IndicatorFrame,
}

#[derive(Default)]
pub struct RecordingRenderer {
    frames: Arc<Mutex<Vec<RenderedFrame>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Arc<Mutex<Vec<RenderedFrame>>> {
        Arc::clone(&self.frames)
    }
}

impl IndicatorRenderer for RecordingRenderer {
    fn render(&mut self, frame: &IndicatorFrame) {
        self.frames.lock().unwrap().push(RenderedFrame {
            at: Instant::now(),
            frame: *frame,
        });
    }
}
