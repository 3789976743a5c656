//! Per-document conversion into buffered content records

use crate::convert::{extension_for, Converter};
use crate::error::{Result, TocError};
use crate::utils::{file_stem, path_stub};
use std::path::{Path, PathBuf};

const TITLE_DIRECTIVE: &str = "% ";

/// One converted source document.
///
/// The converted text is owned by the record and handed out exactly once via
/// [`ContentRecord::into_content`], which consumes the record.
#[derive(Debug, PartialEq, Eq)]
pub struct ContentRecord {
    source_path: PathBuf,
    output_path: PathBuf,
    title: String,
    content: String,
}

impl ContentRecord {
    pub fn new(
        source_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            output_path: output_path.into(),
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Output base name without extension, as listed in a TOC.
    pub fn stem(&self) -> String {
        file_stem(&self.output_path)
    }

    /// Release the buffered content.
    pub fn into_content(self) -> String {
        self.content
    }
}

/// Converts matched files into [`ContentRecord`]s placed under the output dir.
pub struct ContentMaterializer<'a> {
    base_path: PathBuf,
    output_dir: PathBuf,
    from_format: String,
    to_format: String,
    extension: &'static str,
    converter: &'a dyn Converter,
}

impl<'a> ContentMaterializer<'a> {
    /// Fails with [`TocError::UnknownFormat`] before any conversion happens
    /// when `to_format` has no registered extension.
    pub fn new(
        base_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        from_format: &str,
        to_format: &str,
        converter: &'a dyn Converter,
    ) -> Result<Self> {
        Ok(Self {
            base_path: base_path.into(),
            output_dir: output_dir.into(),
            from_format: from_format.to_string(),
            to_format: to_format.to_string(),
            extension: extension_for(to_format)?,
            converter,
        })
    }

    fn stub(&self, source_dir: &Path) -> Result<String> {
        path_stub(&self.base_path, source_dir).ok_or_else(|| {
            TocError::io(
                source_dir,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "path is outside the source root"),
            )
        })
    }

    /// `output_dir/<stub>/<stem>.<ext>`
    pub fn output_path(&self, source_dir: &Path, source_file: &Path) -> Result<PathBuf> {
        let stub = self.stub(source_dir)?;
        let mut path = self.output_dir.clone();
        for segment in stub.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push(format!("{}.{}", file_stem(source_file), self.extension));
        Ok(path)
    }

    pub fn materialize(&self, source_dir: &Path, source_file: &Path) -> Result<ContentRecord> {
        let stub = self.stub(source_dir)?;
        let output_path = self.output_path(source_dir, source_file)?;
        let content = self.converter.convert(source_file, &self.from_format, &self.to_format)?;
        let title = extract_title(&content, &stub, &file_stem(source_file));
        Ok(ContentRecord { source_path: source_file.to_path_buf(), output_path, title, content })
    }
}

/// Title from a leading `% <title>` line, else `"<stub>: <stem>"`
/// (just `<stem>` for documents at the source root).
pub fn extract_title(content: &str, path_stub: &str, stem: &str) -> String {
    let directive = content
        .lines()
        .next()
        .and_then(|line| line.strip_prefix(TITLE_DIRECTIVE))
        .map(str::trim)
        .filter(|title| !title.is_empty());

    match directive {
        Some(title) => title.to_string(),
        None if path_stub.is_empty() => stem.to_string(),
        None => format!("{}: {}", path_stub, stem),
    }
}
