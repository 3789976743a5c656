//! Error types for the conversion and TOC pipeline.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = TocError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TocError {
    #[error("Directory Creation Error: Path '{path}', Error: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown target format '{format}': no output extension is registered for it (known: {known})")]
    UnknownFormat { format: String, known: String },

    #[error("Conversion Error: Path '{path}', Error: {message}")]
    Conversion { path: PathBuf, message: String },

    #[error("TOC template not found: '{0}'")]
    TemplateNotFound(String),

    #[error("Output Collision Error: Path '{path}' is claimed by '{document}' and another output")]
    OutputCollision { path: PathBuf, document: PathBuf },

    #[error("Template Render Error: Template '{template}', Error: {source}")]
    Render {
        template: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("Filesystem Error: Path '{path}', Error: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory Walk Error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Glob Pattern Error: Pattern '{pattern}', Error: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

impl TocError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TocError::Io { path: path.into(), source }
    }
}
