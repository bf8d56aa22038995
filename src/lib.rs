//! # unflat
//!
//! Document structure inference for Rust.
//!
//! This library takes the flat stream of text blocks an extractor produces
//! (text plus font family, size, bounding box and page number) and infers the
//! logical structure behind it: chapters, nested headings, paragraphs and
//! table-of-contents entries.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unflat::{analyze_file, render};
//!
//! fn main() -> unflat::Result<()> {
//!     // Analyze extracted blocks stored as JSON
//!     let doc = analyze_file("blocks.json")?;
//!
//!     // Convert to Markdown
//!     let options = render::RenderOptions::default();
//!     let markdown = render::to_markdown(&doc, &options)?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Font statistics**: heading fonts by frequency or size clustering
//! - **Structural patterns**: "Chapter 3", "2.1", "IV.", "Appendix B", localizable
//! - **Noise removal**: running headers/footers, page numbers, page markers
//! - **Paragraphs**: soft-wrap merging and de-hyphenation
//! - **Outputs**: JSON, Markdown, per-chapter XHTML and navigation trees
//! - **Parallel batches**: independent documents analyzed with Rayon

pub mod analysis;
pub mod error;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use analysis::{AnalysisOptions, FontStrategy, PatternSet, StructureAnalyzer, TocCoverage};
pub use error::{Error, Result};
pub use model::{
    BoundingBox, Chapter, Diagnostic, DiagnosticKind, Document, FontKey, Heading, SourceDocument,
    SourcePage, TextBlock, TocEntry,
};
pub use render::{JsonFormat, NavPoint, RenderOptions};

use std::path::Path;

/// Read a source document from JSON.
///
/// Accepts either a full `SourceDocument` object or a flat array of
/// `TextBlock`s, which is grouped into pages by page number.
pub fn load_source_str(json: &str) -> Result<SourceDocument> {
    if json.trim_start().starts_with('[') {
        let blocks: Vec<TextBlock> = serde_json::from_str(json)?;
        Ok(SourceDocument::from_blocks(blocks))
    } else {
        Ok(serde_json::from_str(json)?)
    }
}

/// Read a source document from a JSON file.
pub fn load_source<P: AsRef<Path>>(path: P) -> Result<SourceDocument> {
    let json = std::fs::read_to_string(path)?;
    load_source_str(&json)
}

/// Analyze a source document with default options.
///
/// # Example
///
/// ```
/// use unflat::{analyze, SourceDocument, TextBlock};
///
/// let source = SourceDocument::from_blocks(vec![
///     TextBlock::plain("Chapter 1: Intro", 1),
///     TextBlock::plain("Some text.", 1),
/// ]);
/// let doc = analyze(&source).unwrap();
/// assert_eq!(doc.chapters[0].title, "Chapter 1: Intro");
/// ```
pub fn analyze(source: &SourceDocument) -> Result<Document> {
    analyze_with_options(source, AnalysisOptions::default())
}

/// Analyze a source document with custom options.
///
/// # Example
///
/// ```no_run
/// use unflat::{analyze_with_options, load_source, AnalysisOptions};
///
/// let options = AnalysisOptions::new()
///     .size_clustering()
///     .with_margins(0.08, 0.08);
/// let source = load_source("blocks.json").unwrap();
/// let doc = analyze_with_options(&source, options).unwrap();
/// ```
pub fn analyze_with_options(source: &SourceDocument, options: AnalysisOptions) -> Result<Document> {
    StructureAnalyzer::new(options)?.analyze(source)
}

/// Analyze a flat block sequence with default options.
pub fn analyze_blocks(blocks: Vec<TextBlock>) -> Result<Document> {
    analyze(&SourceDocument::from_blocks(blocks))
}

/// Analyze a JSON file of blocks with default options.
pub fn analyze_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let source = load_source(path)?;
    analyze(&source)
}

/// Analyze independent documents in parallel.
///
/// Fails only when the options are invalid; per-document failures are
/// returned in place.
pub fn analyze_batch(
    sources: &[SourceDocument],
    options: AnalysisOptions,
) -> Result<Vec<Result<Document>>> {
    let analyzer = StructureAnalyzer::new(options)?;
    Ok(analyzer.analyze_batch(sources))
}

/// Convert a JSON file of blocks to Markdown.
///
/// # Example
///
/// ```no_run
/// use unflat::to_markdown;
///
/// let markdown = to_markdown("blocks.json").unwrap();
/// std::fs::write("output.md", markdown).unwrap();
/// ```
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = analyze_file(path)?;
    render::to_markdown(&doc, &RenderOptions::default())
}

/// Convert a JSON file of blocks to the JSON document model.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = analyze_file(path)?;
    render::to_json(&doc, format)
}

/// Builder for analyzing and rendering documents.
///
/// # Example
///
/// ```no_run
/// use unflat::Unflat;
///
/// let markdown = Unflat::new()
///     .size_clustering()
///     .with_frontmatter()
///     .with_outline()
///     .analyze_file("blocks.json")?
///     .to_markdown()?;
/// # Ok::<(), unflat::Error>(())
/// ```
pub struct Unflat {
    analysis_options: AnalysisOptions,
    render_options: RenderOptions,
}

impl Unflat {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            analysis_options: AnalysisOptions::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Replace the analysis options.
    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.analysis_options = options;
        self
    }

    /// Classify heading fonts by size clustering.
    pub fn size_clustering(mut self) -> Self {
        self.analysis_options = self.analysis_options.size_clustering();
        self
    }

    /// Set the pattern set.
    pub fn with_patterns(mut self, patterns: PatternSet) -> Self {
        self.analysis_options = self.analysis_options.with_patterns(patterns);
        self
    }

    /// Disable margin-band filtering.
    pub fn without_margins(mut self) -> Self {
        self.analysis_options = self.analysis_options.without_margins();
        self
    }

    /// Keep raw lines instead of reconstructing paragraphs.
    pub fn raw_lines(mut self) -> Self {
        self.analysis_options = self.analysis_options.with_paragraphs(false);
        self
    }

    /// Enable frontmatter in Markdown output.
    pub fn with_frontmatter(mut self) -> Self {
        self.render_options = self.render_options.with_frontmatter(true);
        self
    }

    /// Enable heading outlines in Markdown output.
    pub fn with_outline(mut self) -> Self {
        self.render_options = self.render_options.with_outline(true);
        self
    }

    /// Replace the render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Analyze a source document and return a result wrapper.
    pub fn analyze(self, source: &SourceDocument) -> Result<UnflatResult> {
        let document = StructureAnalyzer::new(self.analysis_options)?.analyze(source)?;
        Ok(UnflatResult {
            document,
            render_options: self.render_options,
        })
    }

    /// Analyze a JSON file of blocks.
    pub fn analyze_file<P: AsRef<Path>>(self, path: P) -> Result<UnflatResult> {
        let source = load_source(path)?;
        self.analyze(&source)
    }
}

impl Default for Unflat {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of analyzing a document.
pub struct UnflatResult {
    /// The analyzed document
    pub document: Document,
    /// Render options to use
    render_options: RenderOptions,
}

impl UnflatResult {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.document, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Navigation tree mirroring chapters and headings.
    pub fn navigation(&self) -> Vec<NavPoint> {
        render::navigation(&self.document)
    }

    /// Match detected table-of-contents entries against the structure.
    pub fn toc_coverage(&self) -> TocCoverage {
        analysis::TocExtractor::new().cross_check(&self.document)
    }

    /// Get plain text.
    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unflat_builder() {
        let unflat = Unflat::new()
            .size_clustering()
            .with_frontmatter()
            .raw_lines();

        assert_eq!(
            unflat.analysis_options.font_strategy,
            FontStrategy::size_clustering()
        );
        assert!(!unflat.analysis_options.reconstruct_paragraphs);
        assert!(unflat.render_options.include_frontmatter);
    }

    #[test]
    fn test_unflat_builder_default() {
        let builder = Unflat::default();
        assert!(!builder.render_options.include_frontmatter);
        assert!(!builder.render_options.include_outline);
        assert_eq!(builder.analysis_options, AnalysisOptions::default());
    }

    #[test]
    fn test_unflat_builder_without_margins() {
        let builder = Unflat::new().without_margins();
        assert_eq!(builder.analysis_options.margin_top, 0.0);
        assert_eq!(builder.analysis_options.margin_bottom, 0.0);
    }

    #[test]
    fn test_unflat_rejects_invalid_options() {
        let source = SourceDocument::from_blocks(vec![TextBlock::plain("Text.", 1)]);
        let result = Unflat::new()
            .with_options(AnalysisOptions::new().with_thresholds(0, 45))
            .analyze(&source);
        assert!(matches!(result, Err(Error::ConfigurationInvalid(_))));
    }

    #[test]
    fn test_unflat_result_outputs() {
        let source = SourceDocument::from_blocks(vec![
            TextBlock::plain("Chapter 1: Intro", 1),
            TextBlock::plain("1.1 Sub", 1),
            TextBlock::plain("Body text.", 1),
        ]);
        let result = Unflat::new().with_outline().analyze(&source).unwrap();

        let markdown = result.to_markdown().unwrap();
        assert!(markdown.contains("# Chapter 1: Intro"));
        assert!(markdown.contains("- 1.1 Sub"));
        assert_eq!(result.navigation()[0].children.len(), 1);
        assert!(result.to_json(JsonFormat::Compact).unwrap().contains("\"chapters\""));
    }

    #[test]
    fn test_load_source_str_accepts_both_shapes() {
        let flat = r#"[{"text": "a", "page_number": 2}, {"text": "b", "page_number": 1}]"#;
        let source = load_source_str(flat).unwrap();
        assert_eq!(source.pages.len(), 2);
        assert_eq!(source.pages[0].number, 2);

        let full = r#"{"metadata": {"title": "T"}, "pages": [{"number": 1, "width": 612.0, "height": 792.0, "blocks": []}]}"#;
        let source = load_source_str(full).unwrap();
        assert_eq!(source.metadata["title"], "T");
        assert!(source.pages[0].is_empty());
    }

    #[test]
    fn test_load_source_str_invalid() {
        assert!(matches!(load_source_str("[{"), Err(Error::Json(_))));
        assert!(matches!(load_source_str(""), Err(Error::Json(_))));
    }

    #[test]
    fn test_analyze_blocks() {
        let doc = analyze_blocks(vec![TextBlock::plain("Just text.", 1)]).unwrap();
        assert_eq!(doc.chapter_count(), 1);
        assert_eq!(doc.chapters[0].content, vec!["Just text."]);
    }

    #[test]
    fn test_analyze_batch_invalid_options() {
        let result = analyze_batch(&[], AnalysisOptions::new().with_margins(-0.1, 0.1));
        assert!(result.is_err());
    }

    #[test]
    fn test_json_format_variants() {
        let doc = analyze_blocks(vec![
            TextBlock::plain("Chapter 1", 1),
            TextBlock::plain("Body text.", 1),
        ])
        .unwrap();

        let pretty = render::to_json(&doc, JsonFormat::Pretty).unwrap();
        let compact = render::to_json(&doc, JsonFormat::Compact).unwrap();
        assert!(pretty.contains("\n  \"chapters\": ["));
        assert!(!compact.contains('\n'));
        assert!(compact.len() < pretty.len());

        let from_pretty = render::from_json(&pretty).unwrap();
        let from_compact = render::from_json(&compact).unwrap();
        assert_eq!(from_pretty.chapters, from_compact.chapters);
        assert_eq!(from_pretty.chapters[0].content, vec!["Body text."]);
    }
}
