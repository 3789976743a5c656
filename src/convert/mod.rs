//! Document conversion collaborator and the format-extension table

use crate::error::{Result, TocError};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Target format identifier to output file extension.
const FORMAT_EXTENSIONS: &[(&str, &str)] = &[
    ("markdown", "md"),
    ("gfm", "md"),
    ("commonmark", "md"),
    ("rst", "rst"),
    ("html", "html"),
    ("html5", "html"),
    ("latex", "tex"),
    ("asciidoc", "adoc"),
    ("org", "org"),
    ("textile", "textile"),
    ("mediawiki", "wiki"),
    ("plain", "txt"),
];

/// Output extension for `format`, or [`TocError::UnknownFormat`].
pub fn extension_for(format: &str) -> Result<&'static str> {
    FORMAT_EXTENSIONS
        .iter()
        .find(|(name, _)| *name == format)
        .map(|(_, ext)| *ext)
        .ok_or_else(|| TocError::UnknownFormat { format: format.to_string(), known: known_formats().join(", ") })
}

fn known_formats() -> Vec<&'static str> {
    FORMAT_EXTENSIONS.iter().map(|(name, _)| *name).collect()
}

/// Turns one source document into text in another format.
#[cfg_attr(test, mockall::automock)]
pub trait Converter {
    fn convert(&self, source: &Path, from: &str, to: &str) -> Result<String>;
}

/// Shells out to pandoc (or a compatible program) for each document.
#[derive(Debug, Clone)]
pub struct PandocConverter {
    program: PathBuf,
}

impl PandocConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }
}

impl Default for PandocConverter {
    fn default() -> Self {
        Self::new("pandoc")
    }
}

impl Converter for PandocConverter {
    fn convert(&self, source: &Path, from: &str, to: &str) -> Result<String> {
        let output = Command::new(&self.program)
            .arg("--from")
            .arg(from)
            .arg("--to")
            .arg(to)
            .arg(source)
            .output()
            .map_err(|e| TocError::Conversion {
                path: source.to_path_buf(),
                message: format!("failed to run {}: {}", self.program.display(), e),
            })?;

        if !output.status.success() {
            return Err(TocError::Conversion {
                path: source.to_path_buf(),
                message: format!(
                    "{} exited with {}: {}",
                    self.program.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        tracing::debug!(
            source = %source.display(),
            from = from,
            to = to,
            bytes = output.stdout.len(),
            "Converted document"
        );

        String::from_utf8(output.stdout).map_err(|e| TocError::Conversion {
            path: source.to_path_buf(),
            message: format!("converter produced invalid UTF-8: {}", e),
        })
    }
}
