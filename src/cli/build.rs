//! Build command implementation

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};

use super::utils::{parse_csv, resolve_source_root};
use crate::config::{load_config, merge_cli_with_config, CliOverrides, Config};
use crate::convert::PandocConverter;
use crate::pipeline;
use crate::render::{SynthesisReport, TemplateEngine};

#[derive(Args)]
pub struct BuildArgs {
    /// Root directory of the source documents
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Path to config file (manchego.toml or .manchego.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output path (absolute, or relative to the current directory)
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Format of source files, to convert from
    #[arg(short = 'f', long = "from", value_name = "FORMAT")]
    pub from_format: Option<String>,

    /// Format of destination files, to convert to
    #[arg(short = 't', long = "to", value_name = "FORMAT")]
    pub to_format: Option<String>,

    /// Shell glob selecting source files by name (e.g. '*.md')
    #[arg(short = 'p', long, value_name = "GLOB")]
    pub pattern: Option<String>,

    /// File names never converted (comma-separated)
    #[arg(long, value_name = "NAMES")]
    pub ignore_name: Option<String>,

    /// Directories whose own files are skipped, relative to SOURCE (comma-separated)
    #[arg(long, value_name = "DIRS")]
    pub ignore_path: Option<String>,

    /// File name of each generated TOC (default: index.<ext>)
    #[arg(long, value_name = "FILE")]
    pub toc_name: Option<String>,

    /// Template used to render TOCs (default: toc.<ext>)
    #[arg(long, value_name = "NAME")]
    pub toc_template: Option<String>,

    /// Title of TOCs for directories that do not collapse
    #[arg(long, value_name = "TEXT")]
    pub toc_title: Option<String>,

    /// Directory of additional TOC templates
    #[arg(long, value_name = "DIR")]
    pub template_dir: Option<PathBuf>,

    /// Converter program invoked as `<program> --from F --to T FILE`
    #[arg(long, value_name = "PROGRAM")]
    pub converter: Option<PathBuf>,

    /// Follow symbolic links when walking the source tree
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Do everything except write to the filesystem
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Summary format printed after the build
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    pub format: SummaryFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    Text,
    Json,
}

impl BuildArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            output_dir: self.output_dir.clone(),
            from_format: self.from_format.clone(),
            to_format: self.to_format.clone(),
            pattern: self.pattern.clone(),
            ignore_names: parse_csv(&self.ignore_name),
            ignore_paths: parse_csv(&self.ignore_path)
                .map(|dirs| dirs.into_iter().map(PathBuf::from).collect()),
            toc_file_name: self.toc_name.clone(),
            toc_template: self.toc_template.clone(),
            toc_title: self.toc_title.clone(),
            template_dir: self.template_dir.clone(),
            converter: self.converter.clone(),
            follow_symlinks: self.follow_symlinks,
        }
    }
}

pub fn run(args: BuildArgs) -> Result<()> {
    let root = resolve_source_root(&args.source)?;
    let file_config = load_config(&root, args.config.as_deref()).context("Failed loading configuration")?;
    let mut config = merge_cli_with_config(file_config, args.overrides());
    anchor_ignore_paths(&mut config, &root);

    let converter = PandocConverter::new(&config.converter);
    let mut engine = TemplateEngine::new();
    if let Some(dir) = &config.template_dir {
        engine = engine
            .with_template_dir(dir)
            .with_context(|| format!("Failed loading templates from {}", dir.display()))?;
    }

    let report = pipeline::build(&root, &config, &converter, &engine, !args.dry_run)?;

    match args.format {
        SummaryFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        SummaryFormat::Text => print_summary(&report, &config, args.dry_run),
    }
    Ok(())
}

/// Relative ignore paths name directories under the source root.
pub(crate) fn anchor_ignore_paths(config: &mut Config, root: &Path) {
    for path in &mut config.ignore_paths {
        if path.is_relative() {
            *path = root.join(&*path);
        }
    }
}

fn print_summary(report: &SynthesisReport, config: &Config, dry_run: bool) {
    let verb = if dry_run { "Would write" } else { "Wrote" };
    println!(
        "{} {} TOC file(s) ({} collapsed) and {} document(s) to {}",
        verb,
        report.tocs.len(),
        report.collapsed(),
        report.documents.len(),
        config.output_dir.display()
    );
    for toc in &report.tocs {
        let marker = if toc.collapsed { " (collapsed)" } else { "" };
        println!("  {}{}", toc.path.display(), marker);
    }
}
