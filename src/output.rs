//! Filesystem output: idempotent directory creation and whole-file writes.
//!
//! Under dry-run every operation is logged and skipped.

use crate::error::{Result, TocError};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, Clone, Copy)]
pub struct OutputWriter {
    write_output: bool,
}

impl OutputWriter {
    pub fn new(write_output: bool) -> Self {
        Self { write_output }
    }

    pub fn dry_run() -> Self {
        Self::new(false)
    }

    pub fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !self.write_output {
            tracing::debug!(dir = %path.display(), "Dry run: would create directory");
            return Ok(());
        }
        create_dir_idempotent(path)
    }

    pub fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        if !self.write_output {
            tracing::info!(path = %path.display(), bytes = contents.len(), "Dry run: would write file");
            return Ok(());
        }
        write_replacing(path, contents)?;
        tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote file");
        Ok(())
    }
}

/// Create `path` and its parents. An existing directory is success.
pub fn create_dir_idempotent(path: &Path) -> Result<()> {
    match fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(source) => Err(TocError::DirectoryCreate { path: path.to_path_buf(), source }),
    }
}

/// Write to a sibling temp file, then rename over `path`, so readers never
/// see a half-written document.
fn write_replacing(path: &Path, contents: &str) -> Result<()> {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let tmp = path.with_file_name(format!(".{}.tmp", name));
    fs::write(&tmp, contents).map_err(|e| TocError::io(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(TocError::io(path, e));
    }
    Ok(())
}
