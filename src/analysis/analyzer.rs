//! The structure analysis pipeline.

use std::sync::Arc;

use rayon::prelude::*;

use super::{
    classify_heading_fonts, AnalysisOptions, FontStatistics, HeadingFonts, HierarchyBuilder,
    LevelResolver, NoiseFilter, ParagraphReconstructor, PatternClassifier, TextNormalizer,
    TocExtractor, Validator,
};
use crate::error::{Error, Result};
use crate::model::{Chapter, Document, SourceDocument, TextBlock};

/// Title used when neither metadata nor chapters provide one.
pub const UNTITLED: &str = "Untitled";

/// Author used when the metadata has none.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Infers the logical structure of documents.
///
/// An analyzer holds validated options and compiled patterns; it is
/// immutable and can be shared across threads.
#[derive(Debug, Clone)]
pub struct StructureAnalyzer {
    options: AnalysisOptions,
    patterns: Arc<PatternClassifier>,
    noise: NoiseFilter,
}

impl StructureAnalyzer {
    /// Create an analyzer, rejecting invalid options.
    pub fn new(options: AnalysisOptions) -> Result<Self> {
        options.validate()?;
        let patterns = PatternClassifier::shared(&options.patterns)?;
        let noise = NoiseFilter::new(&options)?;
        Ok(Self {
            options,
            patterns,
            noise,
        })
    }

    /// The options this analyzer runs with.
    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Analyze one document.
    pub fn analyze(&self, source: &SourceDocument) -> Result<Document> {
        if !source.has_text() {
            return Err(Error::InputMalformed(
                "no block carries non-whitespace text".to_string(),
            ));
        }

        let mut pages = source.pages.clone();
        if self.options.normalize_text {
            let normalizer = TextNormalizer::new();
            for page in &mut pages {
                normalizer.normalize_blocks(&mut page.blocks);
            }
        }

        let raw_content = pages
            .iter()
            .flat_map(|page| page.blocks.iter())
            .filter(|block| !block.is_blank())
            .map(|block| block.text.trim())
            .collect::<Vec<_>>()
            .join("\n");

        let (mut blocks, in_margins) = self.noise.filter_margins(&pages);
        let stats = FontStatistics::collect(blocks.iter());
        let heading_fonts = classify_heading_fonts(&stats, &self.options.font_strategy);
        let markers = self.noise.remove_markers(&mut blocks, &stats, &heading_fonts);
        log::debug!(
            "Noise filter removed {} margin blocks and {} page markers",
            in_margins,
            markers
        );

        let chapters = self.build_chapters(&blocks, &heading_fonts);

        let mut document = Document::new();
        document.metadata = source.metadata.clone();
        document.chapters = chapters;
        document.toc = TocExtractor::new().extract(raw_content.lines());
        document.raw_content = raw_content;
        log::debug!("Detected {} table-of-contents entries", document.toc.len());

        self.resolve_metadata(&mut document);
        Validator::new(&self.options).validate(&mut document);

        log::info!(
            "Analyzed '{}': {} chapters, {} headings, {} diagnostics",
            document.title,
            document.chapter_count(),
            document.heading_count(),
            document.diagnostics.len()
        );
        Ok(document)
    }

    /// Analyze a flat block sequence grouped into pages by page number.
    pub fn analyze_blocks(&self, blocks: Vec<TextBlock>) -> Result<Document> {
        self.analyze(&SourceDocument::from_blocks(blocks))
    }

    /// Analyze independent documents in parallel.
    ///
    /// Results are returned in input order; one failure does not affect the
    /// other documents.
    pub fn analyze_batch(&self, sources: &[SourceDocument]) -> Vec<Result<Document>> {
        sources.par_iter().map(|source| self.analyze(source)).collect()
    }

    fn build_chapters(&self, blocks: &[TextBlock], heading_fonts: &HeadingFonts) -> Vec<Chapter> {
        let resolver = LevelResolver::new(&self.patterns, heading_fonts);
        let mut builder = HierarchyBuilder::new(resolver, &self.options.untitled_chapter_title);
        builder.extend(blocks);
        let mut chapters = builder.finish();

        let reconstructor = ParagraphReconstructor::new();
        for chapter in &mut chapters {
            chapter.content = if self.options.reconstruct_paragraphs {
                reconstructor.reconstruct(&chapter.content)
            } else {
                chapter
                    .content
                    .iter()
                    .map(|line| line.trim())
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect()
            };
        }

        log::debug!("Built {} chapters", chapters.len());
        chapters
    }

    fn resolve_metadata(&self, document: &mut Document) {
        let from_metadata = |key: &str| {
            document
                .metadata
                .get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let title = from_metadata("title").or_else(|| {
            document
                .chapters
                .iter()
                .map(|chapter| chapter.title.as_str())
                .find(|title| *title != self.options.untitled_chapter_title)
                .map(str::to_string)
        });
        let author = from_metadata("author");

        document.title = title.unwrap_or_else(|| UNTITLED.to_string());
        document.author = author.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
    }
}
