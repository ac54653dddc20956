//! Crash-safe file replacement shared by the config and history writers.

use crate::errors::{Error, Result};
use std::io::Write;
use std::path::Path;

/// Write `bytes` to a temp sibling, fsync, and rename over `path`. The
/// target is never observed half-written; on failure the temp file is
/// unlinked and the target untouched.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)
        .map_err(|e| Error::io(format!("failed to create {}", parent.display()), e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| Error::io(format!("failed to create temp file in {}", parent.display()), e))?;
    tmp.write_all(bytes)
        .map_err(|e| Error::io(format!("failed to write {}", path.display()), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| Error::io(format!("failed to sync {}", path.display()), e))?;
    tmp.persist(path)
        .map_err(|e| Error::io(format!("failed to replace {}", path.display()), e.error))?;
    Ok(())
}
