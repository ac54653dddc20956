//! The append-only run history.
//!
//! A JSON document `{"entries": [...]}` capped at `max_entries`. Appends
//! are safe under concurrent invocation from multiple processes on the
//! same host: an advisory lock on a sidecar file serialises the
//! read-modify-write cycle, and the document itself is replaced via
//! temp+fsync+rename so readers see either the old or the new version,
//! never a torn one. Reads take no lock.

use crate::errors::{Error, Result};
use crate::model::{History, HistoryEntry};
use fs2::FileExt;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_ENTRIES: usize = 100;
pub const DEFAULT_HISTORY_PATH: &str = ".coverctl.history.json";

#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    max_entries: usize,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lock-free read. A missing file is an empty history; malformed
    /// JSON is corruption.
    pub fn load(&self) -> Result<History> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(History::default()),
            Err(e) => {
                return Err(Error::io(
                    format!("failed to read history {}", self.path.display()),
                    e,
                ))
            }
        };
        serde_json::from_str(&raw)
            .map_err(|e| Error::HistoryCorrupt(format!("{}: {}", self.path.display(), e)))
    }

    /// Replace the whole document under the sidecar lock.
    pub fn save(&self, history: &History) -> Result<()> {
        let lock = self.acquire_lock()?;
        let result = self.write_capped(history.clone());
        let _ = lock.unlock();
        result
    }

    /// Append one entry: reload under the lock, push, trim to the cap,
    /// replace atomically. A failure anywhere leaves the target file
    /// untouched and the lock released.
    pub fn append(&self, entry: HistoryEntry) -> Result<()> {
        let lock = self.acquire_lock()?;
        let result = self.load().and_then(|mut history| {
            history.entries.push(entry);
            self.write_capped(history)
        });
        let _ = lock.unlock();
        result
    }

    fn write_capped(&self, mut history: History) -> Result<()> {
        if history.entries.len() > self.max_entries {
            let drop = history.entries.len() - self.max_entries;
            history.entries.drain(..drop);
        }
        let rendered = serde_json::to_vec_pretty(&history)
            .map_err(|e| Error::HistoryCorrupt(format!("failed to render history: {}", e)))?;
        crate::fsio::write_atomic(&self.path, &rendered)
    }

    /// Blocking exclusive lock on `<path>.lock` (0600, parent 0750).
    fn acquire_lock(&self) -> Result<File> {
        let lock_path = self.lock_path();
        if let Some(parent) = lock_path.parent() {
            create_private_dir(parent)?;
        }
        let file = open_lock_file(&lock_path)
            .map_err(|e| Error::io(format!("failed to open {}", lock_path.display()), e))?;
        file.lock_exclusive()
            .map_err(|e| Error::io(format!("failed to lock {}", lock_path.display()), e))?;
        Ok(file)
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        self.path.with_file_name(name)
    }
}

#[cfg(unix)]
fn open_lock_file(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_lock_file(path: &Path) -> std::io::Result<File> {
    std::fs::OpenOptions::new().write(true).create(true).open(path)
}

#[cfg(unix)]
fn create_private_dir(path: &Path) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    if path.as_os_str().is_empty() || path.is_dir() {
        return Ok(());
    }
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o750)
        .create(path)
        .map_err(|e| Error::io(format!("failed to create {}", path.display()), e))
}

#[cfg(not(unix))]
fn create_private_dir(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() || path.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(path)
        .map_err(|e| Error::io(format!("failed to create {}", path.display()), e))
}
