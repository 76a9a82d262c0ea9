//! Local persistence for the session log.
//!
//! The log is a single pretty-printed JSON array, rewritten in full on
//! every append. The new array goes to a temporary file in the same
//! directory, which then replaces the log, so an interrupted write leaves
//! the previous log intact:
//!
//! ```text
//! ~/.checkpoint/
//!   session_log.json          # [{timestamp, action, user_input}, ...]
//!   session_log.json.backup   # last entry only, when the primary write failed
//! ```
//!
//! Reads and writes are not locked; two checkpoints running at once can
//! lose an entry.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::io::Write;
use std::{fs, io};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::model::LogEntry;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// File-backed session log.
#[derive(Debug, Clone)]
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    /// Creates a store for the log at `path`. Nothing is touched on disk
    /// until the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The sibling written when the primary log cannot be.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".backup");
        PathBuf::from(name)
    }

    /// Appends an entry to the log.
    ///
    /// A missing or empty log starts a new array. A corrupt log is discarded
    /// with a warning and replaced by an array holding only `entry`.
    /// When the primary log cannot be read or written, `[entry]` is written
    /// to [`backup_path`](Self::backup_path) instead; the primary error is
    /// returned only if that fails too.
    pub fn append(&self, entry: &LogEntry) -> Result<()> {
        let Err(primary) = self.append_primary(entry) else {
            return Ok(());
        };

        warn!(path = %self.path.display(), error = %primary, "could not save log");

        let backup = self.backup_path();
        match write_entries(&backup, std::slice::from_ref(entry)) {
            Ok(()) => {
                warn!(path = %backup.display(), "log saved to backup");
                Ok(())
            }
            Err(e) => {
                debug!(path = %backup.display(), error = %e, "backup write failed");
                Err(primary)
            }
        }
    }

    /// Loads all entries, oldest first.
    ///
    /// A missing or empty log is an empty list. Unlike [`append`](Self::append),
    /// corrupt contents are reported as an error.
    pub fn load(&self) -> Result<Vec<LogEntry>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(Vec::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn append_primary(&self, entry: &LogEntry) -> Result<()> {
        let mut entries = self.load_lossy()?;
        entries.push(entry.clone());
        write_entries(&self.path, &entries)
    }

    /// Like [`load`](Self::load), but a corrupt log reads as empty.
    fn load_lossy(&self) -> Result<Vec<LogEntry>> {
        match self.load() {
            Err(StorageError::Json(e)) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "log file was corrupted, starting fresh"
                );
                Ok(Vec::new())
            }
            other => other,
        }
    }
}

fn write_entries(path: &Path, entries: &[LogEntry]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let json = serde_json::to_string_pretty(entries)?;
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(json.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;
    use tempfile::TempDir;

    use crate::model::Intent;

    fn test_store() -> (TempDir, LogStore) {
        let dir = TempDir::new().unwrap();
        let store = LogStore::new(dir.path().join("session_log.json"));
        (dir, store)
    }

    fn entry(seconds: i64, action: Intent, input: &str) -> LogEntry {
        LogEntry {
            timestamp: Timestamp::new(seconds, 0).unwrap(),
            action,
            user_input: input.into(),
        }
    }

    #[test]
    fn append_and_load_preserves_order() {
        let (_dir, store) = test_store();
        let e1 = entry(1_000, Intent::Continue, "add a dark mode toggle");
        let e2 = entry(2_000, Intent::Continue, "fix the header");
        let e3 = entry(3_000, Intent::Finish, "done");

        store.append(&e1).unwrap();
        store.append(&e2).unwrap();
        store.append(&e3).unwrap();

        assert_eq!(store.load().unwrap(), vec![e1, e2, e3]);
    }

    #[test]
    fn load_missing_log_is_empty() {
        let (_dir, store) = test_store();

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_log_is_replaced() {
        let (_dir, store) = test_store();
        fs::write(store.path(), "{ not json [").unwrap();
        let e1 = entry(1_000, Intent::Continue, "first");

        store.append(&e1).unwrap();

        assert_eq!(store.load().unwrap(), vec![e1]);
        assert!(!store.backup_path().exists());
    }

    #[test]
    fn empty_log_file_starts_fresh() {
        let (_dir, store) = test_store();
        fs::write(store.path(), "  \n").unwrap();
        let e1 = entry(1_000, Intent::Finish, "done");

        store.append(&e1).unwrap();

        assert_eq!(store.load().unwrap(), vec![e1]);
    }

    #[test]
    fn log_is_pretty_printed_array() {
        let (_dir, store) = test_store();
        store
            .append(&entry(1_000, Intent::Continue, "hello"))
            .unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();

        assert!(raw.starts_with("[\n  {"));
        assert!(raw.contains(r#""action": "continue""#));
        assert!(raw.contains(r#""user_input": "hello""#));
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = LogStore::new(dir.path().join("nested").join("log.json"));

        store
            .append(&entry(1_000, Intent::Continue, "hello"))
            .unwrap();

        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn unwritable_primary_falls_back_to_backup() {
        let (_dir, store) = test_store();
        // A directory where the log file should be makes reads and writes fail.
        fs::create_dir(store.path()).unwrap();
        let e1 = entry(1_000, Intent::Continue, "keep me");

        store.append(&e1).unwrap();

        let backup = fs::read_to_string(store.backup_path()).unwrap();
        let saved: Vec<LogEntry> = serde_json::from_str(&backup).unwrap();
        assert_eq!(saved, vec![e1]);
    }

    #[test]
    fn backup_failure_returns_primary_error() {
        let (_dir, store) = test_store();
        fs::create_dir(store.path()).unwrap();
        fs::create_dir(store.backup_path()).unwrap();

        let err = store
            .append(&entry(1_000, Intent::Continue, "lost"))
            .unwrap_err();

        assert!(matches!(err, StorageError::Io(_)));
    }

    #[test]
    fn backup_path_appends_suffix() {
        let store = LogStore::new("/var/tmp/session_log.json");

        assert_eq!(
            store.backup_path(),
            PathBuf::from("/var/tmp/session_log.json.backup")
        );
    }

    #[test]
    fn append_keeps_history_without_offsets() {
        let (_dir, store) = test_store();
        fs::write(
            store.path(),
            r#"[{"timestamp":"2025-06-01T10:15:30.123456","action":"continue","user_input":"add a dark mode toggle"}]"#,
        )
        .unwrap();

        store.append(&entry(2_000, Intent::Finish, "done")).unwrap();

        let log = store.load().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].user_input, "add a dark mode toggle");
        assert_eq!(log[1].user_input, "done");
    }

    #[test]
    fn append_leaves_no_temporary_files() {
        let (dir, store) = test_store();

        store.append(&entry(1_000, Intent::Continue, "one")).unwrap();
        store.append(&entry(2_000, Intent::Continue, "two")).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![OsString::from("session_log.json")]);
    }

    #[cfg(unix)]
    #[test]
    fn append_replaces_the_log_instead_of_truncating_it() {
        use std::io::Read;

        let (_dir, store) = test_store();
        store.append(&entry(1_000, Intent::Continue, "first")).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();
        let mut old = fs::File::open(store.path()).unwrap();

        store.append(&entry(2_000, Intent::Continue, "second")).unwrap();

        // The previous file is never truncated, so a reader holding it
        // still sees the complete earlier log.
        let mut seen = String::new();
        old.read_to_string(&mut seen).unwrap();
        assert_eq!(seen, before);
        assert_eq!(store.load().unwrap().len(), 2);
    }
}
