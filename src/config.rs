//! Configuration loading and management
//!
//! Defaults, then an optional JSON file, then environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::provider::DEFAULT_API_URL;

/// Default fail-through order of remote models
const DEFAULT_MODELS: [&str; 4] = [
    "openai/gpt-3.5-turbo",
    "google/gemini-pro",
    "anthropic/claude-3-haiku",
    "meta-llama/llama-3-8b-instruct",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Assistant configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for notes and screenshots
    pub data_dir: PathBuf,

    pub notes_path: PathBuf,

    pub screenshot_dir: PathBuf,

    /// Chat-completion endpoint
    pub api_url: String,

    /// OpenRouter key; validated when the provider chain is built
    pub api_key: Option<String>,

    /// Site URL sent to the provider for attribution
    pub referer: Option<String>,

    /// Models in fail-through order
    pub models: Vec<String>,

    /// Program that speaks an announcement passed as its argument
    pub speech_command: Option<String>,

    pub timings: Timings,
}

/// Timeouts and periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub command_timeout_secs: u64,
    pub confirm_timeout_secs: u64,
    pub note_timeout_secs: u64,
    pub provider_timeout_secs: u64,
    pub tick_interval_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            command_timeout_secs: 10,
            confirm_timeout_secs: 7,
            note_timeout_secs: 10,
            provider_timeout_secs: 15,
            tick_interval_ms: 50,
        }
    }
}

impl Timings {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.confirm_timeout_secs)
    }

    pub fn note_timeout(&self) -> Duration {
        Duration::from_secs(self.note_timeout_secs)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    /// Ticker period, never zero
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

/// On-disk layout; every field optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    data_dir: Option<PathBuf>,
    notes_path: Option<PathBuf>,
    screenshot_dir: Option<PathBuf>,
    api_url: Option<String>,
    api_key: Option<String>,
    referer: Option<String>,
    models: Option<Vec<String>>,
    speech_command: Option<String>,
    timings: Option<Timings>,
}

impl FileConfig {
    fn read(path: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl Config {
    /// Load configuration from the config file and environment
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os("JARVIS_CONFIG")
            .map(PathBuf::from)
            .or_else(default_config_path);

        let file = match &path {
            Some(path) => FileConfig::read(path)?,
            None => None,
        };
        debug!(?path, found = file.is_some(), "config file resolved");

        Ok(Self::resolve(file.unwrap_or_default(), |key| {
            std::env::var(key).ok()
        }))
    }

    fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let data_dir = env("JARVIS_DATA_DIR")
            .map(PathBuf::from)
            .or(file.data_dir)
            .unwrap_or_else(default_data_dir);

        let notes_path = file
            .notes_path
            .unwrap_or_else(|| data_dir.join("notes.txt"));
        let screenshot_dir = file
            .screenshot_dir
            .unwrap_or_else(|| data_dir.join("screenshots"));

        let models = file
            .models
            .filter(|models| !models.is_empty())
            .unwrap_or_else(|| DEFAULT_MODELS.iter().map(|m| m.to_string()).collect());

        Self {
            data_dir,
            notes_path,
            screenshot_dir,
            api_url: file.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_key: env("OPENROUTER_API_KEY").or(file.api_key),
            referer: file.referer.filter(|referer| !referer.trim().is_empty()),
            models,
            speech_command: env("JARVIS_SPEECH_COMMAND").or(file.speech_command),
            timings: file.timings.unwrap_or_default(),
        }
    }

    /// Ensure data directories exist
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.screenshot_dir)?;
        if let Some(parent) = self.notes_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("jarvis").join("config.json"))
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("jarvis")
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = Config::resolve(FileConfig::default(), no_env);

        assert!(config.data_dir.ends_with("jarvis"));
        assert_eq!(config.notes_path, config.data_dir.join("notes.txt"));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.models.len(), 4);
        assert_eq!(config.models[0], "openai/gpt-3.5-turbo");
        assert!(config.api_key.is_none());
        assert!(config.referer.is_none());
        assert_eq!(config.timings.command_timeout(), Duration::from_secs(10));
        assert_eq!(config.timings.confirm_timeout(), Duration::from_secs(7));
        assert_eq!(config.timings.provider_timeout(), Duration::from_secs(15));
        assert_eq!(config.timings.tick_interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_file_values_and_partial_timings() {
        let file: FileConfig = serde_json::from_str(
            r#"{
                "data_dir": "/srv/jarvis",
                "models": ["x/only"],
                "speech_command": "espeak",
                "referer": "https://example.org/jarvis",
                "timings": { "confirm_timeout_secs": 3 }
            }"#,
        )
        .unwrap();

        let config = Config::resolve(file, no_env);

        assert_eq!(config.data_dir, PathBuf::from("/srv/jarvis"));
        assert_eq!(config.screenshot_dir, PathBuf::from("/srv/jarvis/screenshots"));
        assert_eq!(config.models, vec!["x/only"]);
        assert_eq!(config.speech_command.as_deref(), Some("espeak"));
        assert_eq!(config.referer.as_deref(), Some("https://example.org/jarvis"));
        assert_eq!(config.timings.confirm_timeout_secs, 3);
        assert_eq!(config.timings.command_timeout_secs, 10);
    }

    #[test]
    fn test_env_overrides_file() {
        let file: FileConfig =
            serde_json::from_str(r#"{ "api_key": "from-file", "data_dir": "/a" }"#).unwrap();
        let env: HashMap<&str, &str> = [
            ("OPENROUTER_API_KEY", "from-env"),
            ("JARVIS_DATA_DIR", "/b"),
            ("JARVIS_SPEECH_COMMAND", "  "),
        ]
        .into_iter()
        .collect();

        let config = Config::resolve(file, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.data_dir, PathBuf::from("/b"));
        assert!(config.speech_command.is_none());
    }

    #[test]
    fn test_empty_model_list_falls_back() {
        let file: FileConfig = serde_json::from_str(r#"{ "models": [] }"#).unwrap();
        assert_eq!(Config::resolve(file, no_env).models.len(), 4);
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let found = FileConfig::read(&dir.path().join("absent.json")).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = FileConfig::read(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.json"));
    }

    #[test]
    fn test_ensure_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::resolve(FileConfig::default(), no_env);
        config.data_dir = dir.path().join("data");
        config.notes_path = dir.path().join("notes").join("notes.txt");
        config.screenshot_dir = dir.path().join("shots");

        config.ensure_dirs().unwrap();

        assert!(config.data_dir.is_dir());
        assert!(config.screenshot_dir.is_dir());
        assert!(dir.path().join("notes").is_dir());
    }
}
