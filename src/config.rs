//! Checkpoint configuration.
//!
//! Loaded from `~/.checkpoint/config.toml`. Every key is optional; a missing
//! file means the defaults: single-shot mode, editor enabled, whole-word
//! finish matching, and a 600 second editor timeout.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::classify::FinishPolicy;

/// Default editor timeout in seconds.
pub const DEFAULT_EDITOR_TIMEOUT_SECS: u64 = 600;

/// Errors that can occur while loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("editor-command in {0} must name a program")]
    EmptyEditorCommand(PathBuf),
}

/// Checkpoint configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Whether the human may end the session.
    ///
    /// `true` is the single-shot product: finish keywords end the session
    /// with a summary request. `false` is the continuous product: every
    /// instruction continues and the assistant is told to run the
    /// checkpoint again.
    pub finish: bool,

    /// Whether `gui`, `edit` or `editor` at the prompt opens the editor.
    pub gui: bool,

    /// How finish keywords are matched.
    pub finish_policy: FinishPolicy,

    /// Seconds to wait for the editor process. `0` waits forever.
    pub editor_timeout_secs: u64,

    /// Program (and leading arguments) run as the editor process.
    /// The current content is appended as the final argument.
    /// Defaults to this executable's `surface` subcommand.
    pub editor_command: Option<Vec<String>>,

    /// Where the session log lives.
    pub log_file: Option<PathBuf>,

    /// Command the assistant is told to run for the next checkpoint
    /// in continuous mode. Defaults to this executable's path.
    pub rerun_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            finish: true,
            gui: true,
            finish_policy: FinishPolicy::default(),
            editor_timeout_secs: DEFAULT_EDITOR_TIMEOUT_SECS,
            editor_command: None,
            log_file: None,
            rerun_command: None,
        }
    }
}

impl Config {
    /// Load config from `path`, or from `~/.checkpoint/config.toml` when
    /// no path is given.
    ///
    /// A missing file yields the defaults. An unreadable or invalid file is
    /// an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        let contents = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        Self::parse(&contents, &path)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(command) = &config.editor_command
            && command.first().is_none_or(|program| program.trim().is_empty())
        {
            return Err(ConfigError::EmptyEditorCommand(path.to_path_buf()));
        }

        Ok(config)
    }

    /// The config file path: `~/.checkpoint/config.toml`.
    pub fn path() -> Option<PathBuf> {
        Self::home().map(|h| h.join("config.toml"))
    }

    /// The resolved log path.
    ///
    /// Falls back to `session_log.json` in the working directory when the
    /// home directory cannot be determined.
    pub fn log_path(&self) -> PathBuf {
        if let Some(path) = &self.log_file {
            return path.clone();
        }
        Self::home().map_or_else(
            || PathBuf::from("session_log.json"),
            |h| h.join("session_log.json"),
        )
    }

    /// The editor timeout, or `None` when waiting forever.
    pub fn editor_timeout(&self) -> Option<Duration> {
        (self.editor_timeout_secs > 0).then(|| Duration::from_secs(self.editor_timeout_secs))
    }

    fn home() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".checkpoint"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();

        assert_eq!(config, Config::default());
        assert!(config.finish);
        assert!(config.gui);
        assert_eq!(config.finish_policy, FinishPolicy::WholeWord);
        assert_eq!(config.editor_timeout(), Some(Duration::from_secs(600)));
    }

    #[test]
    fn parses_kebab_case_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
finish = false
gui = false
finish-policy = "substring"
editor-timeout-secs = 0
editor-command = ["python3", "gui_helper.py"]
log-file = "/tmp/log.json"
rerun-command = "checkpoint"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert!(!config.finish);
        assert!(!config.gui);
        assert_eq!(config.finish_policy, FinishPolicy::Substring);
        assert_eq!(config.editor_timeout(), None);
        assert_eq!(
            config.editor_command,
            Some(vec!["python3".to_string(), "gui_helper.py".to_string()])
        );
        assert_eq!(config.log_path(), PathBuf::from("/tmp/log.json"));
        assert_eq!(config.rerun_command.as_deref(), Some("checkpoint"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "gui = false\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert!(!config.gui);
        assert!(config.finish);
        assert_eq!(config.editor_timeout_secs, DEFAULT_EDITOR_TIMEOUT_SECS);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "finish = \"sometimes\"").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn empty_editor_command_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "editor-command = []").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();

        assert!(matches!(err, ConfigError::EmptyEditorCommand(_)));
    }
}
