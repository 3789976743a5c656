//! Configuration loading and merging
//!
//! Handles loading from config files and CLI arguments with proper
//! precedence (CLI > File > Defaults).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod loader;
pub mod merge;

pub use loader::load_config;
pub use merge::{merge_cli_with_config, CliOverrides};

pub const DEFAULT_OUTPUT_DIR: &str = "./docs";
pub const DEFAULT_FROM_FORMAT: &str = "markdown";
pub const DEFAULT_TO_FORMAT: &str = "rst";
pub const DEFAULT_PATTERN: &str = "*.md";
pub const DEFAULT_CONVERTER: &str = "pandoc";

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output_dir: PathBuf,
    pub from_format: String,
    pub to_format: String,
    pub pattern: String,
    #[serde(deserialize_with = "merge::string_or_list")]
    pub ignore_names: Vec<String>,
    #[serde(deserialize_with = "merge::path_or_list")]
    pub ignore_paths: Vec<PathBuf>,
    /// Defaults to `index.<ext>` for the target format.
    pub toc_file_name: Option<String>,
    /// Defaults to the built-in `toc.<ext>` template.
    pub toc_template: Option<String>,
    pub toc_title: String,
    pub template_dir: Option<PathBuf>,
    pub converter: PathBuf,
    pub follow_symlinks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            from_format: DEFAULT_FROM_FORMAT.to_string(),
            to_format: DEFAULT_TO_FORMAT.to_string(),
            pattern: DEFAULT_PATTERN.to_string(),
            ignore_names: Vec::new(),
            ignore_paths: Vec::new(),
            toc_file_name: None,
            toc_template: None,
            toc_title: crate::render::synth::DEFAULT_TOC_TITLE.to_string(),
            template_dir: None,
            converter: PathBuf::from(DEFAULT_CONVERTER),
            follow_symlinks: false,
        }
    }
}

impl Config {
    /// TOC file name, falling back to `index.<extension>`.
    pub fn toc_file_name_for(&self, extension: &str) -> String {
        self.toc_file_name.clone().unwrap_or_else(|| format!("index.{}", extension))
    }

    /// TOC template name, falling back to the built-in `toc.<extension>`.
    pub fn toc_template_for(&self, extension: &str) -> String {
        self.toc_template.clone().unwrap_or_else(|| format!("toc.{}", extension))
    }
}
