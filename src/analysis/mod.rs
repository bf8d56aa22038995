//! Structure inference.
//!
//! The pipeline turns layout-annotated text blocks into chapters with
//! nested headings:
//!
//! 1. text normalization (NFC, ligatures)
//! 2. margin-band filtering of running headers and footers
//! 3. font statistics and heading font classification
//! 4. page marker removal
//! 5. hierarchy building from pattern and font evidence
//! 6. paragraph reconstruction
//! 7. table-of-contents detection, metadata and validation

mod analyzer;
mod fonts;
mod hierarchy;
mod levels;
mod noise;
mod normalize;
mod options;
mod paragraphs;
mod patterns;
mod toc;
mod validate;

pub use analyzer::{StructureAnalyzer, UNKNOWN_AUTHOR, UNTITLED};
pub use fonts::{classify_heading_fonts, FontStatistics, HeadingFonts};
pub use hierarchy::HierarchyBuilder;
pub use levels::{HeadingSignal, LevelResolver};
pub use noise::NoiseFilter;
pub use normalize::TextNormalizer;
pub use options::{AnalysisOptions, CustomPattern, FontStrategy, PatternSet};
pub use paragraphs::ParagraphReconstructor;
pub use patterns::{is_roman_numeral, PatternClassifier, CHAPTER_LEVEL, NOT_A_HEADING};
pub use toc::{TocCoverage, TocExtractor};
pub use validate::Validator;
