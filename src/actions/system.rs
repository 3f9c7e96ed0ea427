//! Action executor backed by the host system
//!
//! Launches applications and the default browser, appends to the notes file,
//! and shells out to the platform screenshot and shutdown tools.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::Result;
use chrono::Local;
use reqwest::Url;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{info, warn};

use super::{ActionExecutor, ActionKind};
use crate::config::Config;

const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search";
const YOUTUBE_SEARCH_URL: &str = "https://www.youtube.com/results";

/// Executes actions on the local machine
#[derive(Debug, Clone)]
pub struct SystemActions {
    notes_path: PathBuf,
    screenshot_dir: PathBuf,
}

impl SystemActions {
    pub fn new(notes_path: impl Into<PathBuf>, screenshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            notes_path: notes_path.into(),
            screenshot_dir: screenshot_dir.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.notes_path, &config.screenshot_dir)
    }

    async fn open_app(&self, app: &str) -> String {
        if app.is_empty() {
            return "Which application should I open?".to_string();
        }

        match launch_app(app) {
            Ok(()) => {
                info!(app, "application launched");
                format!("Opening {app}.")
            }
            Err(e) => {
                warn!(app, error = %e, "failed to launch application");
                format!("Sorry, I couldn't open {app}. Error: {e}")
            }
        }
    }

    async fn search(&self, query: &str) -> Result<String> {
        if query.is_empty() {
            return Ok("What should I search for?".to_string());
        }

        let url = search_url(query)?;
        if let Err(e) = open_url(&url) {
            warn!(error = %e, "failed to open browser");
            return Ok(format!("I couldn't open the browser: {e}"));
        }
        Ok(format!("Here are the search results for {query}"))
    }

    async fn play(&self, query: &str) -> Result<String> {
        if query.is_empty() {
            return Ok("What video or song should I play?".to_string());
        }

        let url = youtube_url(query)?;
        if let Err(e) = open_url(&url) {
            warn!(error = %e, "failed to open browser");
            return Ok(format!("I ran into an error trying to search YouTube: {e}"));
        }
        Ok(format!("Searching YouTube for {query}"))
    }

    async fn note(&self, content: &str) -> String {
        if content.is_empty() {
            return "I didn't hear anything to note down.".to_string();
        }

        match append_note(&self.notes_path, content).await {
            Ok(()) => {
                info!(path = %self.notes_path.display(), "note saved");
                "Note saved successfully.".to_string()
            }
            Err(e) => {
                warn!(error = %e, "failed to save note");
                format!("I couldn't save the note: {e}")
            }
        }
    }

    async fn screenshot(&self) -> String {
        let file_name = screenshot_file_name();
        let path = self.screenshot_dir.join(&file_name);

        match capture_screen(&path).await {
            Ok(()) => {
                info!(path = %path.display(), "screenshot saved");
                format!("Screenshot saved as {file_name}")
            }
            Err(e) => {
                warn!(error = %e, "screenshot failed");
                format!("Failed to take screenshot: {e}")
            }
        }
    }

    async fn shutdown(&self) -> String {
        match power_off().await {
            Ok(()) => "Initiating shutdown. Goodbye!".to_string(),
            Err(e) => {
                warn!(error = %e, "shutdown failed");
                "I couldn't complete the shutdown.".to_string()
            }
        }
    }
}

impl ActionExecutor for SystemActions {
    async fn execute(&self, kind: ActionKind, payload: &str) -> Result<String> {
        let payload = payload.trim();
        match kind {
            ActionKind::OpenApp => Ok(self.open_app(payload).await),
            ActionKind::Search => self.search(payload).await,
            ActionKind::Play => self.play(payload).await,
            ActionKind::Note => Ok(self.note(payload).await),
            ActionKind::Screenshot => Ok(self.screenshot().await),
            ActionKind::Shutdown => Ok(self.shutdown().await),
        }
    }
}

fn search_url(query: &str) -> Result<Url> {
    Ok(Url::parse_with_params(GOOGLE_SEARCH_URL, &[("q", query)])?)
}

fn youtube_url(query: &str) -> Result<Url> {
    Ok(Url::parse_with_params(
        YOUTUBE_SEARCH_URL,
        &[("search_query", query)],
    )?)
}

fn screenshot_file_name() -> String {
    format!("screenshot_{}.png", Local::now().format("%Y%m%d-%H%M%S"))
}

fn note_line(content: &str) -> String {
    format!("[{}] {}\n", Local::now().format("%Y-%m-%d %H:%M:%S"), content)
}

async fn append_note(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(note_line(content).as_bytes()).await?;
    file.flush().await
}

/// Spawn a detached process without waiting for it
fn spawn_detached(mut command: Command) -> std::io::Result<()> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}

fn launch_app(app: &str) -> std::io::Result<()> {
    let command = if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg("-a").arg(app);
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(app);
        cmd
    } else {
        Command::new(app)
    };
    spawn_detached(command)
}

fn open_url(url: &Url) -> std::io::Result<()> {
    let command = if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(url.as_str());
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(url.as_str());
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url.as_str());
        cmd
    };
    spawn_detached(command)
}

/// Run a command to completion and turn a non-zero exit into an error
async fn run_checked(mut command: Command) -> std::io::Result<()> {
    let status = command.stdin(Stdio::null()).status().await?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other(format!("command exited with {status}")))
    }
}

async fn capture_screen(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let command = if cfg!(target_os = "macos") {
        let mut cmd = Command::new("screencapture");
        cmd.arg("-x").arg(path);
        cmd
    } else if cfg!(target_os = "windows") {
        return Err(std::io::Error::other(
            "screen capture is not supported on this platform",
        ));
    } else {
        let mut cmd = Command::new("grim");
        cmd.arg(path);
        cmd
    };
    run_checked(command).await
}

async fn power_off() -> std::io::Result<()> {
    let command = if cfg!(target_os = "windows") {
        let mut cmd = Command::new("shutdown");
        cmd.args(["/s", "/t", "1"]);
        cmd
    } else {
        // -n: fail instead of prompting for a password on the console
        let mut cmd = Command::new("sudo");
        cmd.args(["-n", "shutdown", "-h", "now"]);
        cmd
    };
    info!("invoking system shutdown");
    run_checked(command).await
}
