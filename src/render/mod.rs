//! TOC rendering: the template collaborator and the recursive synthesizer

use crate::error::{Result, TocError};
use minijinja::{AutoEscape, Environment, ErrorKind};
use serde::Serialize;
use std::fs;
use std::path::Path;

pub mod synth;

pub use synth::{RenderedToc, SynthesisReport, TocSynthesizer};

const TOC_RST: &str = include_str!("templates/toc.rst");
const TOC_MD: &str = include_str!("templates/toc.md");

/// Data handed to a TOC template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocContext {
    pub title: String,
    /// Immediate subdirectory names.
    pub items: Vec<String>,
    /// Base names (no extension) of standalone documents in this directory.
    pub files: Vec<String>,
    /// Inlined document body when the directory collapses.
    pub content: Option<String>,
    pub toc_name: String,
    pub toc_stem: String,
    pub extension: String,
}

/// Turns a [`TocContext`] into document text.
pub trait TocRenderer {
    fn has_template(&self, name: &str) -> bool;
    fn render(&self, name: &str, context: &TocContext) -> Result<String>;
}

/// minijinja-backed renderer with built-in `toc.rst` and `toc.md` templates.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_filter("underline", underline);
        let _ = env.add_template("toc.rst", TOC_RST);
        let _ = env.add_template("toc.md", TOC_MD);
        Self { env }
    }

    /// Also load every file in `dir`, keyed by file name. Files named like a
    /// built-in replace it.
    pub fn with_template_dir(mut self, dir: &Path) -> Result<Self> {
        let entries = fs::read_dir(dir).map_err(|e| TocError::io(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| TocError::io(dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let source = fs::read_to_string(&path).map_err(|e| TocError::io(&path, e))?;
            self.env
                .add_template_owned(name.clone(), source)
                .map_err(|source| TocError::Render { template: name.clone(), source })?;
            tracing::debug!(template = %name, path = %path.display(), "Loaded TOC template");
        }
        Ok(self)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TocRenderer for TemplateEngine {
    fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    fn render(&self, name: &str, context: &TocContext) -> Result<String> {
        let template = self.env.get_template(name).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => TocError::TemplateNotFound(name.to_string()),
            _ => TocError::Render { template: name.to_string(), source: e },
        })?;
        template
            .render(context)
            .map_err(|source| TocError::Render { template: name.to_string(), source })
    }
}

/// reST heading rule: `marker` repeated once per character of `value`.
fn underline(value: String, marker: Option<String>) -> String {
    let marker = marker.unwrap_or_else(|| "=".to_string());
    marker.repeat(value.chars().count())
}
