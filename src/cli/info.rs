//! Info command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::build::anchor_ignore_paths;
use super::utils::{parse_csv, resolve_source_root};
use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::convert::extension_for;
use crate::pipeline;
use crate::scan::format_tree;

#[derive(Args)]
pub struct InfoArgs {
    /// Root directory of the source documents
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Path to config file (manchego.toml or .manchego.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Shell glob selecting source files by name (e.g. '*.md')
    #[arg(short = 'p', long, value_name = "GLOB")]
    pub pattern: Option<String>,

    /// File names never converted (comma-separated)
    #[arg(long, value_name = "NAMES")]
    pub ignore_name: Option<String>,

    /// Directories whose own files are skipped, relative to SOURCE (comma-separated)
    #[arg(long, value_name = "DIRS")]
    pub ignore_path: Option<String>,

    /// Follow symbolic links when walking the source tree
    #[arg(long)]
    pub follow_symlinks: bool,
}

pub fn run(args: InfoArgs) -> Result<()> {
    let root = resolve_source_root(&args.source)?;
    let file_config = load_config(&root, args.config.as_deref()).context("Failed loading configuration")?;
    let overrides = CliOverrides {
        pattern: args.pattern.clone(),
        ignore_names: parse_csv(&args.ignore_name),
        ignore_paths: parse_csv(&args.ignore_path).map(|dirs| dirs.into_iter().map(PathBuf::from).collect()),
        follow_symlinks: args.follow_symlinks,
        ..CliOverrides::default()
    };
    let mut config = merge_cli_with_config(file_config, overrides);
    anchor_ignore_paths(&mut config, &root);

    let tree = pipeline::layout(&root, &config)?;

    let source_name = root.file_name().and_then(|n| n.to_str()).unwrap_or(".");
    println!("Source: {}", root.display());
    println!("Pattern: {}", config.pattern);
    println!("Conversion: {} -> {}", config.from_format, config.to_format);
    if let Ok(ext) = extension_for(&config.to_format) {
        println!("TOC file: {}", config.toc_file_name_for(ext));
    } else {
        println!("TOC file: (unknown target format '{}')", config.to_format);
    }
    println!("Statistics:");
    println!("  Documents matched: {}", tree.file_count());
    println!("  Directories with TOCs: {}", tree.node_count());
    println!("  Collapsing directories: {}", tree.collapse_count());

    let label = |path: &PathBuf| path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    println!("\n{}", format_tree(&tree, source_name, &label));

    Ok(())
}
