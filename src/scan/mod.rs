//! Source discovery: which files qualify and how they group into a tree

use crate::error::Result;
use std::path::{Path, PathBuf};

pub mod matcher;
pub mod tree;

pub use matcher::FileMatcher;
pub use tree::{construct, format_tree, prune, TreeNode};

/// Build and prune the tree of matching paths without converting anything.
pub fn scan_layout(root: &Path, matcher: &FileMatcher, follow_symlinks: bool) -> Result<TreeNode<PathBuf>> {
    let mut tree = construct(root, matcher, follow_symlinks, |_, file| Ok(file.to_path_buf()))?;
    prune(&mut tree);
    Ok(tree)
}
