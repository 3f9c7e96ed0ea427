//! Console-backed input and announcer
//!
//! Typed lines stand in for recognized speech. An external TTS command
//! (`say`, `espeak`) can be configured to speak announcements aloud.

use std::io::BufRead;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use super::{Announcer, InputError, InputSource};

/// Reads utterances line by line.
///
/// Lines are read on a dedicated thread and forwarded over a channel, so a
/// pending read never holds up runtime shutdown.
pub struct ConsoleInput {
    lines: mpsc::UnboundedReceiver<std::io::Result<String>>,
}

impl ConsoleInput {
    /// Read from the process's standard input
    pub fn stdin() -> Self {
        Self::from_reader(std::io::BufReader::new(std::io::stdin()))
    }

    pub fn from_reader<R: BufRead + Send + 'static>(reader: R) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let spawned = std::thread::Builder::new()
            .name("console-input".to_string())
            .spawn(move || {
                for line in reader.lines() {
                    // A bad line has already been consumed, so reading can go on
                    let fatal = matches!(&line, Err(e) if !is_recoverable(e));
                    if tx.send(line).is_err() || fatal {
                        break;
                    }
                }
                debug!("console input thread exiting");
            });

        // Without the thread the sender is gone and the first capture
        // reports the input as closed.
        if let Err(e) = spawned {
            error!(?e, "failed to spawn console input thread");
        }

        Self { lines: rx }
    }

    #[cfg(test)]
    fn from_channel(lines: mpsc::UnboundedReceiver<std::io::Result<String>>) -> Self {
        Self { lines }
    }
}

fn is_recoverable(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::InvalidData | std::io::ErrorKind::Interrupted
    )
}

impl InputSource for ConsoleInput {
    async fn capture(&mut self, timeout: Option<Duration>) -> Result<String, InputError> {
        // `recv` is cancel safe, so a timed-out read loses nothing
        let next = match timeout {
            None => self.lines.recv().await,
            Some(limit) => match tokio::time::timeout(limit, self.lines.recv()).await {
                Ok(next) => next,
                Err(_) => {
                    debug!(timeout_ms = limit.as_millis() as u64, "no input before timeout");
                    return Ok(String::new());
                }
            },
        };

        let utterance = match next {
            Some(Ok(line)) => line.trim().to_lowercase(),
            Some(Err(e)) => return Err(InputError::Device(e)),
            None => return Err(InputError::Closed),
        };

        if !utterance.is_empty() {
            debug!(%utterance, "input captured");
        }
        Ok(utterance)
    }
}

/// Prints announcements to stdout and optionally speaks them
#[derive(Debug, Clone, Default)]
pub struct ConsoleAnnouncer {
    speech_command: Option<String>,
}

impl ConsoleAnnouncer {
    pub fn new(speech_command: Option<String>) -> Self {
        Self { speech_command }
    }

    async fn speak(&self, program: &str, text: &str) {
        let status = Command::new(program)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => {}
            Ok(status) => warn!(program, %status, "speech command failed"),
            Err(e) => warn!(program, error = %e, "failed to run speech command"),
        }
    }
}

impl Announcer for ConsoleAnnouncer {
    async fn announce(&self, text: &str) {
        println!("Jarvis: {text}");

        if let Some(program) = &self.speech_command {
            self.speak(program, text).await;
        }
    }
}
