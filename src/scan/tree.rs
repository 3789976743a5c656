//! Directory-shaped document tree: construction, pruning and display.

use crate::error::{Result, TocError};
use crate::scan::matcher::FileMatcher;
use crate::utils::{path_stub, resolve_base};
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

/// One directory level. `T` is the per-file payload: a converted
/// [`ContentRecord`](crate::materialize::ContentRecord) for builds, a bare
/// path when only the layout is wanted.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode<T> {
    pub children: BTreeMap<String, TreeNode<T>>,
    pub files: Vec<T>,
}

impl<T> Default for TreeNode<T> {
    fn default() -> Self {
        Self { children: BTreeMap::new(), files: Vec::new() }
    }
}

impl<T> TreeNode<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// No children and no files.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.files.is_empty()
    }

    /// Descend one segment at a time, creating missing nodes on the way.
    pub fn get_or_create(&mut self, stub: &str) -> &mut TreeNode<T> {
        let mut node = self;
        for segment in stub.split('/').filter(|s| !s.is_empty()) {
            node = node.children.entry(segment.to_string()).or_default();
        }
        node
    }

    /// Read-only lookup; never creates nodes.
    pub fn get(&self, stub: &str) -> Option<&TreeNode<T>> {
        let mut node = self;
        for segment in stub.split('/').filter(|s| !s.is_empty()) {
            node = node.children.get(segment)?;
        }
        Some(node)
    }

    /// Files in this node and every descendant.
    pub fn file_count(&self) -> usize {
        self.files.len() + self.children.values().map(TreeNode::file_count).sum::<usize>()
    }

    /// This node plus every descendant.
    pub fn node_count(&self) -> usize {
        1 + self.children.values().map(TreeNode::node_count).sum::<usize>()
    }

    /// Nodes (this one included) holding exactly one file.
    pub fn collapse_count(&self) -> usize {
        usize::from(self.files.len() == 1)
            + self.children.values().map(TreeNode::collapse_count).sum::<usize>()
    }
}

/// Walk `root` and build the tree of matching files.
///
/// `materialize(directory, file)` is called once per matching file and its
/// result is appended to the node for `directory`. Every directory that is not
/// ignored gets a node, so the result must be [`prune`]d before use.
/// Any walk or materialize error aborts construction.
pub fn construct<T, F>(
    root: &Path,
    matcher: &FileMatcher,
    follow_symlinks: bool,
    mut materialize: F,
) -> Result<TreeNode<T>>
where
    F: FnMut(&Path, &Path) -> Result<T>,
{
    let base = resolve_base(root).map_err(|e| TocError::io(root, e))?;
    let mut tree = TreeNode::new();

    for entry in WalkDir::new(&base).follow_links(follow_symlinks).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();

        if entry.file_type().is_dir() {
            if matcher.is_ignored_dir(path) {
                tracing::debug!(dir = %path.display(), "Skipping ignored directory");
                continue;
            }
            tree.get_or_create(&stub_for(&base, path)?);
            continue;
        }

        if !path.is_file() {
            continue;
        }
        let Some(dir) = path.parent() else {
            continue;
        };
        if matcher.is_ignored_dir(dir) {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !matcher.matches(&name) {
            continue;
        }

        let stub = stub_for(&base, dir)?;
        tracing::debug!(file = %path.display(), stub = %stub, "Matched document");
        let record = materialize(dir, path)?;
        tree.get_or_create(&stub).files.push(record);
    }

    Ok(tree)
}

fn stub_for(base: &Path, dir: &Path) -> Result<String> {
    path_stub(base, dir).ok_or_else(|| {
        TocError::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "path is outside the source root"),
        )
    })
}

/// Remove every node with no content anywhere in its subtree.
///
/// Children are pruned before their parent is checked, so emptiness cascades
/// up to (but never removes) the root. Returns the number of nodes removed.
pub fn prune<T>(root: &mut TreeNode<T>) -> usize {
    let mut removed = 0;
    for child in root.children.values_mut() {
        removed += prune(child);
    }
    let before = root.children.len();
    root.children.retain(|_, child| !child.is_empty());
    removed + (before - root.children.len())
}

/// Render the tree with box-drawing connectors, directories before files.
/// Directories that hold exactly one file are marked `(collapses)`.
pub fn format_tree<T>(root: &TreeNode<T>, root_label: &str, label: &dyn Fn(&T) -> String) -> String {
    let mut lines = vec![format!("{}/{}", root_label, collapse_marker(root))];
    walk_tree(root, "", label, &mut lines);
    lines.join("\n")
}

fn walk_tree<T>(node: &TreeNode<T>, prefix: &str, label: &dyn Fn(&T) -> String, lines: &mut Vec<String>) {
    let total_entries = node.children.len() + node.files.len();
    let mut idx = 0;

    for (name, child) in &node.children {
        idx += 1;
        let is_last = idx == total_entries;
        let connector = if is_last { "└── " } else { "├── " };
        lines.push(format!("{}{}{}/{}", prefix, connector, name, collapse_marker(child)));
        let extension = if is_last { "    " } else { "│   " };
        walk_tree(child, &format!("{}{}", prefix, extension), label, lines);
    }

    for file in &node.files {
        idx += 1;
        let connector = if idx == total_entries { "└── " } else { "├── " };
        lines.push(format!("{}{}{}", prefix, connector, label(file)));
    }
}

fn collapse_marker<T>(node: &TreeNode<T>) -> &'static str {
    if node.files.len() == 1 {
        " (collapses)"
    } else {
        ""
    }
}
