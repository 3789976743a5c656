//! Decides which files under the source root qualify for conversion.

use crate::error::{Result, TocError};
use globset::{Glob, GlobMatcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Shell-glob match on base names plus exact-name and exact-directory exclusions.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    pattern: String,
    glob: GlobMatcher,
    ignore_names: HashSet<String>,
    ignore_paths: HashSet<PathBuf>,
}

impl FileMatcher {
    /// Compile `pattern` (`*`, `?`, `[...]` syntax) into a matcher.
    pub fn new(pattern: &str) -> Result<Self> {
        let glob = Glob::new(pattern)
            .map_err(|source| TocError::Pattern { pattern: pattern.to_string(), source })?
            .compile_matcher();
        Ok(Self {
            pattern: pattern.to_string(),
            glob,
            ignore_names: HashSet::new(),
            ignore_paths: HashSet::new(),
        })
    }

    /// Base names that are never converted, even when they match the pattern.
    pub fn ignore_names(mut self, names: HashSet<String>) -> Self {
        self.ignore_names = names;
        self
    }

    /// Absolute directory paths whose own files are skipped.
    pub fn ignore_paths(mut self, paths: HashSet<PathBuf>) -> Self {
        self.ignore_paths = paths;
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// True when `basename` matches the pattern and is not an ignored name.
    pub fn matches(&self, basename: &str) -> bool {
        if self.ignore_names.contains(basename) {
            return false;
        }
        self.glob.is_match(basename)
    }

    /// Exact comparison only: subdirectories of an ignored directory are
    /// still walked and their files still considered.
    pub fn is_ignored_dir(&self, dir: &Path) -> bool {
        self.ignore_paths.contains(dir)
    }
}

/// One-shot form of [`FileMatcher::matches`].
pub fn matches(basename: &str, pattern: &str, ignore_names: &HashSet<String>) -> Result<bool> {
    Ok(FileMatcher::new(pattern)?.ignore_names(ignore_names.clone()).matches(basename))
}
