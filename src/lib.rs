//! manchego: convert a tree of documents and synthesize a table of contents
//! for every directory.
//!
//! Matching source files are grouped into a directory-shaped tree, converted
//! through an external converter (pandoc by default), pruned of empty
//! branches, and written out bottom-up with one rendered TOC per directory.
//! A directory holding exactly one document collapses: that document becomes
//! the directory's TOC instead of a standalone file.

pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod materialize;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod scan;
pub mod utils;

pub use config::Config;
pub use convert::{Converter, PandocConverter};
pub use error::{Result, TocError};
pub use materialize::{ContentMaterializer, ContentRecord};
pub use output::OutputWriter;
pub use pipeline::{build, layout, PipelineError, Stage};
pub use render::{SynthesisReport, TemplateEngine, TocContext, TocRenderer, TocSynthesizer};
pub use scan::{FileMatcher, TreeNode};
