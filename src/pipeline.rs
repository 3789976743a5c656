//! End-to-end run: validate settings, build and prune the tree, synthesize TOCs.

use crate::config::Config;
use crate::convert::{extension_for, Converter};
use crate::error::{Result, TocError};
use crate::materialize::ContentMaterializer;
use crate::output::OutputWriter;
use crate::render::{SynthesisReport, TocRenderer, TocSynthesizer};
use crate::scan::{construct, prune, scan_layout, FileMatcher, TreeNode};
use crate::utils::resolve_base;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configuration,
    TreeConstruction,
    Synthesis,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Configuration => "configuration",
            Stage::TreeConstruction => "document tree construction",
            Stage::Synthesis => "TOC synthesis",
        };
        f.write_str(name)
    }
}

/// A [`TocError`] tagged with the stage that raised it.
#[derive(Error, Debug)]
#[error("{stage} failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: TocError,
}

trait AtStage<T> {
    fn at(self, stage: Stage) -> std::result::Result<T, PipelineError>;
}

impl<T> AtStage<T> for Result<T> {
    fn at(self, stage: Stage) -> std::result::Result<T, PipelineError> {
        self.map_err(|source| PipelineError { stage, source })
    }
}

/// Matcher with freshly built ignore sets; ignore paths are resolved to
/// absolute form so they compare equal to walked directories.
pub fn build_matcher(config: &Config) -> Result<FileMatcher> {
    let ignore_names: HashSet<String> = config.ignore_names.iter().cloned().collect();
    let mut ignore_paths = HashSet::new();
    for path in &config.ignore_paths {
        ignore_paths.insert(resolve_base(path).map_err(|e| TocError::io(path, e))?);
    }
    Ok(FileMatcher::new(&config.pattern)?.ignore_names(ignore_names).ignore_paths(ignore_paths))
}

/// Pruned tree of matching source paths, without converting anything.
pub fn layout(source_root: &Path, config: &Config) -> std::result::Result<TreeNode<PathBuf>, PipelineError> {
    let matcher = build_matcher(config).at(Stage::Configuration)?;
    scan_layout(source_root, &matcher, config.follow_symlinks).at(Stage::TreeConstruction)
}

/// Convert every matching document under `source_root` and write the TOC
/// hierarchy to `config.output_dir`. Nothing touches the filesystem when
/// `write_output` is false.
pub fn build(
    source_root: &Path,
    config: &Config,
    converter: &dyn Converter,
    renderer: &dyn TocRenderer,
    write_output: bool,
) -> std::result::Result<SynthesisReport, PipelineError> {
    let extension = extension_for(&config.to_format).at(Stage::Configuration)?;
    let toc_file_name = config.toc_file_name_for(extension);
    let template_name = config.toc_template_for(extension);
    if !renderer.has_template(&template_name) {
        return Err(PipelineError {
            stage: Stage::Configuration,
            source: TocError::TemplateNotFound(template_name),
        });
    }

    let matcher = build_matcher(config).at(Stage::Configuration)?;
    let base = resolve_base(source_root).map_err(|e| TocError::io(source_root, e)).at(Stage::Configuration)?;
    let output_dir = std::path::absolute(&config.output_dir)
        .map_err(|e| TocError::io(&config.output_dir, e))
        .at(Stage::Configuration)?;

    tracing::info!(
        input_dir = %base.display(),
        output_dir = %output_dir.display(),
        from_format = %config.from_format,
        to_format = %config.to_format,
        pattern = %matcher.pattern(),
        dry_run = !write_output,
        "Starting build"
    );

    let materializer =
        ContentMaterializer::new(&base, &output_dir, &config.from_format, &config.to_format, converter)
            .at(Stage::Configuration)?;

    let mut tree = construct(&base, &matcher, config.follow_symlinks, |dir, file| {
        materializer.materialize(dir, file)
    })
    .at(Stage::TreeConstruction)?;
    let removed = prune(&mut tree);
    tracing::debug!(
        removed = removed,
        documents = tree.file_count(),
        directories = tree.node_count(),
        "Pruned document tree"
    );

    TocSynthesizer::new(renderer, OutputWriter::new(write_output), &toc_file_name, &template_name, extension)
        .default_title(&config.toc_title)
        .synthesize(&output_dir, tree)
        .at(Stage::Synthesis)
}
