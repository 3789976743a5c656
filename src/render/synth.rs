//! Post-order TOC synthesis over the pruned document tree.

use super::{TocContext, TocRenderer};
use crate::error::{Result, TocError};
use crate::materialize::ContentRecord;
use crate::output::OutputWriter;
use crate::scan::TreeNode;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const DEFAULT_TOC_TITLE: &str = "Generated TOC";

/// One TOC document produced (or, under dry-run, planned).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedToc {
    pub path: PathBuf,
    pub title: String,
    pub items: Vec<String>,
    pub files: Vec<String>,
    pub collapsed: bool,
}

/// Everything a synthesis run produced, in production order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SynthesisReport {
    pub tocs: Vec<RenderedToc>,
    /// Standalone document outputs.
    pub documents: Vec<PathBuf>,
    pub records_consumed: usize,
}

impl SynthesisReport {
    pub fn collapsed(&self) -> usize {
        self.tocs.iter().filter(|t| t.collapsed).count()
    }
}

pub struct TocSynthesizer<'a> {
    renderer: &'a dyn TocRenderer,
    writer: OutputWriter,
    toc_file_name: String,
    template_name: String,
    default_title: String,
    extension: String,
}

impl<'a> TocSynthesizer<'a> {
    pub fn new(
        renderer: &'a dyn TocRenderer,
        writer: OutputWriter,
        toc_file_name: &str,
        template_name: &str,
        extension: &str,
    ) -> Self {
        Self {
            renderer,
            writer,
            toc_file_name: toc_file_name.to_string(),
            template_name: template_name.to_string(),
            default_title: DEFAULT_TOC_TITLE.to_string(),
            extension: extension.to_string(),
        }
    }

    /// Title for directories that do not collapse.
    pub fn default_title(mut self, title: &str) -> Self {
        self.default_title = title.to_string();
        self
    }

    /// Consume `root`, writing one TOC per node under `output_base`.
    ///
    /// Every record's content is released exactly once: written out as a
    /// standalone document, or inlined into its directory's TOC. Fails with
    /// [`TocError::OutputCollision`] before writing anything when two outputs
    /// would share a path.
    pub fn synthesize(&self, output_base: &Path, root: TreeNode<ContentRecord>) -> Result<SynthesisReport> {
        if !self.renderer.has_template(&self.template_name) {
            return Err(TocError::TemplateNotFound(self.template_name.clone()));
        }
        self.check_collisions(output_base, &root)?;
        if root.is_empty() {
            tracing::warn!(
                output = %output_base.display(),
                "No documents matched; writing an empty root TOC"
            );
        }

        let mut report = SynthesisReport::default();
        self.synthesize_node(output_base, root, &mut report)?;
        Ok(report)
    }

    /// Standalone documents of a directory must not share a path with each
    /// other or with the directory's TOC.
    fn check_collisions(&self, path: &Path, node: &TreeNode<ContentRecord>) -> Result<()> {
        for (segment, child) in &node.children {
            self.check_collisions(&path.join(segment), child)?;
        }
        if node.files.len() < 2 {
            return Ok(());
        }

        let toc_path = path.join(&self.toc_file_name);
        let mut claimed = HashSet::with_capacity(node.files.len());
        for record in &node.files {
            let output = record.output_path();
            if output == toc_path.as_path() || !claimed.insert(output) {
                return Err(TocError::OutputCollision {
                    path: output.to_path_buf(),
                    document: record.source_path().to_path_buf(),
                });
            }
        }
        Ok(())
    }

    fn synthesize_node(
        &self,
        path: &Path,
        node: TreeNode<ContentRecord>,
        report: &mut SynthesisReport,
    ) -> Result<()> {
        let TreeNode { children, files } = node;

        let mut items = Vec::with_capacity(children.len());
        for (segment, child) in children {
            self.synthesize_node(&path.join(&segment), child, report)?;
            items.push(segment);
        }

        let mut context = TocContext {
            title: self.default_title.clone(),
            items,
            files: Vec::new(),
            content: None,
            toc_name: self.toc_file_name.clone(),
            toc_stem: crate::utils::file_stem(Path::new(&self.toc_file_name)),
            extension: self.extension.clone(),
        };

        let collapsed = match <[ContentRecord; 1]>::try_from(files) {
            Ok([record]) => {
                tracing::debug!(
                    source = %record.source_path().display(),
                    toc = %path.display(),
                    "Collapsing single document into directory TOC"
                );
                context.title = record.title().to_string();
                context.content = Some(record.into_content());
                report.records_consumed += 1;
                true
            }
            Err(files) => {
                for record in files {
                    context.files.push(record.stem());
                    let output = record.output_path().to_path_buf();
                    let content = record.into_content();
                    if let Some(parent) = output.parent() {
                        self.writer.ensure_dir(parent)?;
                    }
                    self.writer.write_file(&output, &content)?;
                    report.documents.push(output);
                    report.records_consumed += 1;
                }
                false
            }
        };

        let text = self.renderer.render(&self.template_name, &context)?;
        // Inlined content is no longer needed once rendered.
        drop(context.content.take());

        self.writer.ensure_dir(path)?;
        let toc_path = path.join(&self.toc_file_name);
        self.writer.write_file(&toc_path, &text)?;
        tracing::info!(
            toc = %toc_path.display(),
            items = context.items.len(),
            files = context.files.len(),
            collapsed = collapsed,
            "Synthesized TOC"
        );

        report.tocs.push(RenderedToc {
            path: toc_path,
            title: context.title,
            items: context.items,
            files: context.files,
            collapsed,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    /// Renders `title|items|files|content` and remembers every context.
    #[derive(Default)]
    struct RecordingRenderer {
        seen: RefCell<Vec<TocContext>>,
    }

    impl TocRenderer for RecordingRenderer {
        fn has_template(&self, name: &str) -> bool {
            name == "toc"
        }

        fn render(&self, _name: &str, context: &TocContext) -> Result<String> {
            self.seen.borrow_mut().push(context.clone());
            Ok(format!(
                "{}|{}|{}|{}",
                context.title,
                context.items.join(","),
                context.files.join(","),
                context.content.as_deref().unwrap_or("")
            ))
        }
    }

    fn record(out: &Path, stub: &str, stem: &str) -> ContentRecord {
        ContentRecord::new(
            format!("/src/{stub}/{stem}.md"),
            out.join(stub).join(format!("{stem}.rst")),
            format!("Title {stem}"),
            format!("content of {stem}"),
        )
    }

    fn sample_tree(out: &Path) -> TreeNode<ContentRecord> {
        let mut tree = TreeNode::new();
        tree.get_or_create("a").files.extend([record(out, "a", "x"), record(out, "a", "y")]);
        tree.get_or_create("b").files.push(record(out, "b", "z"));
        tree
    }

    fn synthesizer<'a>(renderer: &'a RecordingRenderer, writer: OutputWriter) -> TocSynthesizer<'a> {
        TocSynthesizer::new(renderer, writer, "index.rst", "toc", "rst")
    }

    #[test]
    fn test_collapse_and_multi_file_laws() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("output");
        let renderer = RecordingRenderer::default();

        let report = synthesizer(&renderer, OutputWriter::new(true))
            .synthesize(&out, sample_tree(&out))
            .unwrap();

        assert_eq!(fs::read_to_string(out.join("a/x.rst")).unwrap(), "content of x");
        assert_eq!(fs::read_to_string(out.join("a/y.rst")).unwrap(), "content of y");
        assert_eq!(fs::read_to_string(out.join("a/index.rst")).unwrap(), "Generated TOC||x,y|");

        assert!(!out.join("b/z.rst").exists());
        assert_eq!(fs::read_to_string(out.join("b/index.rst")).unwrap(), "Title z|||content of z");

        assert_eq!(fs::read_to_string(out.join("index.rst")).unwrap(), "Generated TOC|a,b||");
        assert_eq!(report.records_consumed, 3);
        assert_eq!(report.documents, vec![out.join("a/x.rst"), out.join("a/y.rst")]);
        assert_eq!(report.collapsed(), 1);
    }

    #[test]
    fn test_children_render_before_parent() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().to_path_buf();
        let mut tree = sample_tree(&out);
        tree.get_or_create("a/deep").files.push(record(&out, "a/deep", "d"));
        let renderer = RecordingRenderer::default();

        let report = synthesizer(&renderer, OutputWriter::dry_run()).synthesize(&out, tree).unwrap();

        let order: Vec<PathBuf> = report.tocs.iter().map(|t| t.path.clone()).collect();
        assert_eq!(
            order,
            vec![
                out.join("a/deep/index.rst"),
                out.join("a/index.rst"),
                out.join("b/index.rst"),
                out.join("index.rst"),
            ]
        );
        assert_eq!(renderer.seen.borrow()[1].items, vec!["deep".to_string()]);
    }

    #[test]
    fn test_dry_run_writes_nothing_but_reports_the_same() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");

        let dry_renderer = RecordingRenderer::default();
        let dry = synthesizer(&dry_renderer, OutputWriter::dry_run())
            .synthesize(&out, sample_tree(&out))
            .unwrap();
        assert!(!out.exists());

        let real_renderer = RecordingRenderer::default();
        let real = synthesizer(&real_renderer, OutputWriter::new(true))
            .synthesize(&out, sample_tree(&out))
            .unwrap();
        assert!(out.join("index.rst").exists());

        similar_asserts::assert_eq!(dry, real);
        similar_asserts::assert_eq!(*dry_renderer.seen.borrow(), *real_renderer.seen.borrow());
    }

    #[test]
    fn test_empty_root_still_gets_toc() {
        let tmp = TempDir::new().unwrap();
        let renderer = RecordingRenderer::default();

        let report = synthesizer(&renderer, OutputWriter::new(true))
            .synthesize(tmp.path(), TreeNode::new())
            .unwrap();

        assert_eq!(report.tocs.len(), 1);
        assert_eq!(report.records_consumed, 0);
        assert_eq!(fs::read_to_string(tmp.path().join("index.rst")).unwrap(), "Generated TOC|||");
    }

    #[test]
    fn test_custom_default_title() {
        let tmp = TempDir::new().unwrap();
        let renderer = RecordingRenderer::default();
        let report = synthesizer(&renderer, OutputWriter::dry_run())
            .default_title("Handbook")
            .synthesize(tmp.path(), sample_tree(tmp.path()))
            .unwrap();
        let titles: Vec<&str> = report.tocs.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Handbook", "Title z", "Handbook"]);
    }

    #[test]
    fn test_missing_template_fails_before_any_write() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let renderer = RecordingRenderer::default();

        let err = TocSynthesizer::new(&renderer, OutputWriter::new(true), "index.rst", "other", "rst")
            .synthesize(&out, sample_tree(&out))
            .unwrap_err();

        assert!(matches!(err, TocError::TemplateNotFound(ref n) if n == "other"));
        assert!(!out.exists());
    }

    #[test]
    fn test_document_named_like_toc_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let mut tree = sample_tree(&out);
        tree.get_or_create("a").files.push(record(&out, "a", "index"));
        let renderer = RecordingRenderer::default();

        let err = synthesizer(&renderer, OutputWriter::new(true)).synthesize(&out, tree).unwrap_err();

        assert!(matches!(err, TocError::OutputCollision { ref path, .. } if *path == out.join("a/index.rst")));
        assert!(!out.exists());
        assert!(renderer.seen.borrow().is_empty());
    }

    #[test]
    fn test_single_document_named_like_toc_collapses() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let mut tree = TreeNode::new();
        tree.get_or_create("solo").files.push(record(&out, "solo", "index"));
        let renderer = RecordingRenderer::default();

        let report = synthesizer(&renderer, OutputWriter::dry_run()).synthesize(&out, tree).unwrap();

        assert_eq!(report.collapsed(), 1);
        assert!(report.documents.is_empty());
    }

    #[test]
    fn test_duplicate_output_paths_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let mut tree = TreeNode::new();
        tree.get_or_create("a").files.extend([
            ContentRecord::new("/src/a/x.md", out.join("a/x.rst"), "x md", "from md"),
            ContentRecord::new("/src/a/x.txt", out.join("a/x.rst"), "x txt", "from txt"),
        ]);
        let renderer = RecordingRenderer::default();

        let err = synthesizer(&renderer, OutputWriter::new(true)).synthesize(&out, tree).unwrap_err();

        match err {
            TocError::OutputCollision { path, document } => {
                assert_eq!(path, out.join("a/x.rst"));
                assert_eq!(document, PathBuf::from("/src/a/x.txt"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!out.exists());
    }

    #[test]
    fn test_unwritable_output_is_directory_error() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("taken");
        fs::write(&out, "not a dir").unwrap();
        let renderer = RecordingRenderer::default();

        let err = synthesizer(&renderer, OutputWriter::new(true))
            .synthesize(&out, sample_tree(&out))
            .unwrap_err();

        assert!(matches!(err, TocError::DirectoryCreate { .. }));
    }
}
