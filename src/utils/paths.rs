//! Root resolution and path-stub computation

use std::path::{Component, Path, PathBuf};

/// Resolve a root directory to the absolute form every path stub is computed
/// against. Symlinks are resolved when the path exists.
pub fn resolve_base(path: &Path) -> std::io::Result<PathBuf> {
    match path.canonicalize() {
        Ok(resolved) => Ok(resolved),
        Err(_) => std::path::absolute(path),
    }
}

/// Express `dir` relative to `base` as `/`-joined segments, e.g. `"sub/section"`.
///
/// Returns an empty string for `base` itself and `None` when `dir` does not
/// live under `base`. `.` segments are dropped; `..` segments are rejected.
pub fn path_stub(base: &Path, dir: &Path) -> Option<String> {
    let rel = dir.strip_prefix(base).ok()?;
    let mut segments = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(name) => segments.push(name.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(segments.join("/"))
}

/// Base name without its final extension (`"guide.md"` -> `"guide"`).
pub fn file_stem(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}
