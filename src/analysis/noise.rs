//! Removal of running headers, footers and page markers.
//!
//! Filtering happens in two passes. The positional pass drops blocks lying
//! entirely inside the top or bottom margin band of their page, before font
//! statistics are gathered. The textual pass drops standalone page numbers
//! and page markers once heading fonts are known, because a marker-looking
//! block set in a recurring heading font is kept.

use std::sync::{Arc, OnceLock};

use regex::{Regex, RegexBuilder};

use super::{AnalysisOptions, FontStatistics, HeadingFonts, PatternSet};
use crate::error::Result;
use crate::model::{SourcePage, TextBlock};

/// Standalone number, optionally dash-wrapped ("42", "- 7 -").
fn numeric_marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\s]*[-–—]?\s*\d+\s*[-–—]?\s*$").unwrap())
}

/// Fractional page marker ("3/12").
fn fraction_marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\d+\s*/\s*\d+\s*$").unwrap())
}

static DEFAULT_KEYWORD_MARKERS: OnceLock<Arc<Regex>> = OnceLock::new();

/// Keyword page markers ("Page 3", "p. 3 of 10", "стр. 17").
fn keyword_marker_regex(markers: &[String]) -> Result<Option<Arc<Regex>>> {
    if markers.is_empty() {
        return Ok(None);
    }
    let is_default = markers == PatternSet::default().page_markers.as_slice();
    if is_default {
        if let Some(regex) = DEFAULT_KEYWORD_MARKERS.get() {
            return Ok(Some(Arc::clone(regex)));
        }
    }

    let alternation = markers
        .iter()
        .map(|m| regex::escape(m.trim()))
        .collect::<Vec<_>>()
        .join("|");
    let regex = Arc::new(
        RegexBuilder::new(&format!(
            r"^\s*(?:{})\s*\d+(?:\s*(?:of|/)\s*\d+)?\s*$",
            alternation
        ))
        .case_insensitive(true)
        .build()?,
    );

    if is_default {
        return Ok(Some(Arc::clone(DEFAULT_KEYWORD_MARKERS.get_or_init(|| regex))));
    }
    Ok(Some(regex))
}

/// Subtractive filter for page furniture.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    margin_top: f32,
    margin_bottom: f32,
    remove_markers: bool,
    keyword_markers: Option<Arc<Regex>>,
}

impl NoiseFilter {
    /// Create a filter from analysis options.
    pub fn new(options: &AnalysisOptions) -> Result<Self> {
        Ok(Self {
            margin_top: options.margin_top,
            margin_bottom: options.margin_bottom,
            remove_markers: options.remove_page_markers,
            keyword_markers: keyword_marker_regex(&options.patterns.page_markers)?,
        })
    }

    /// Check if a block lies entirely inside the page's top or bottom band.
    ///
    /// Blocks without a position and pages without geometry are never in a band.
    pub fn in_margin_band(&self, block: &TextBlock, page: &SourcePage) -> bool {
        if !page.has_geometry() || block.bbox.is_unset() {
            return false;
        }
        let top = self.margin_top * page.height;
        let bottom = (1.0 - self.margin_bottom) * page.height;

        (self.margin_top > 0.0 && block.bbox.y1 <= top)
            || (self.margin_bottom > 0.0 && block.bbox.y0 >= bottom)
    }

    /// Check if a text is a standalone page number or page marker.
    pub fn is_page_marker(&self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        numeric_marker_regex().is_match(text)
            || fraction_marker_regex().is_match(text)
            || self
                .keyword_markers
                .as_ref()
                .map_or(false, |regex| regex.is_match(text))
    }

    /// Positional pass: collect the blocks of all pages outside the margin
    /// bands, in page order. Returns the kept blocks and the removed count.
    pub fn filter_margins(&self, pages: &[SourcePage]) -> (Vec<TextBlock>, usize) {
        let mut kept = Vec::new();
        let mut removed = 0;

        for page in pages.iter().filter(|p| !p.is_empty()) {
            for block in &page.blocks {
                if self.in_margin_band(block, page) {
                    removed += 1;
                } else {
                    kept.push(block.clone());
                }
            }
        }

        (kept, removed)
    }

    /// Textual pass: drop page markers unless set in a heading font that
    /// occurs at least twice. Returns the removed count.
    pub fn remove_markers(
        &self,
        blocks: &mut Vec<TextBlock>,
        stats: &FontStatistics,
        heading_fonts: &HeadingFonts,
    ) -> usize {
        if !self.remove_markers {
            return 0;
        }

        let before = blocks.len();
        blocks.retain(|block| {
            if !self.is_page_marker(&block.text) {
                return true;
            }
            let key = block.font_key();
            heading_fonts.contains(&key) && stats.count(&key) >= 2
        });
        before - blocks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, FontKey};

    fn filter() -> NoiseFilter {
        NoiseFilter::new(&AnalysisOptions::default()).unwrap()
    }

    fn at(text: &str, y0: f32, y1: f32) -> TextBlock {
        TextBlock::new(text, "Body", 11.0, BoundingBox::new(72.0, y0, 540.0, y1), 1)
    }

    #[test]
    fn test_page_markers() {
        let f = filter();
        assert!(f.is_page_marker("  42  "));
        assert!(f.is_page_marker("- 7 -"));
        assert!(f.is_page_marker("— 12 —"));
        assert!(f.is_page_marker("3/12"));
        assert!(f.is_page_marker("Page 3"));
        assert!(f.is_page_marker("page 3 of 10"));
        assert!(f.is_page_marker("p. 5"));
        assert!(f.is_page_marker("стр. 17"));
        assert!(f.is_page_marker("Seite 4 / 9"));

        assert!(!f.is_page_marker(""));
        assert!(!f.is_page_marker("42 apples"));
        assert!(!f.is_page_marker("Pages of history"));
        assert!(!f.is_page_marker("1. Introduction"));
    }

    #[test]
    fn test_margin_bands() {
        let f = filter();
        let page = SourcePage::letter(1);

        // Letter height 792: top band ends at 79.2, bottom band starts at 712.8
        assert!(f.in_margin_band(&at("Running header", 30.0, 45.0), &page));
        assert!(f.in_margin_band(&at("Footer", 740.0, 752.0), &page));
        assert!(!f.in_margin_band(&at("Body", 300.0, 312.0), &page));
        // Straddling the band edge
        assert!(!f.in_margin_band(&at("Title", 70.0, 90.0), &page));
        // No position
        assert!(!f.in_margin_band(&TextBlock::plain("Header", 1), &page));
    }

    #[test]
    fn test_margin_bands_disabled() {
        let f = NoiseFilter::new(&AnalysisOptions::new().without_margins()).unwrap();
        let page = SourcePage::letter(1);
        assert!(!f.in_margin_band(&at("Running header", 30.0, 45.0), &page));

        let flat = SourcePage::new(1, 612.0, 0.0);
        assert!(!filter().in_margin_band(&at("Running header", 0.0, 0.0), &flat));
    }

    #[test]
    fn test_filter_margins() {
        let mut page = SourcePage::letter(1);
        page.add_block(at("Journal of Things", 20.0, 32.0));
        page.add_block(at("Body text.", 200.0, 212.0));
        page.add_block(at("17", 750.0, 760.0));

        let (kept, removed) = filter().filter_margins(&[page, SourcePage::letter(2)]);
        assert_eq!(removed, 2);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text, "Body text.");
    }

    #[test]
    fn test_remove_markers_with_heading_exemption() {
        let heading = |text: &str| {
            TextBlock::new(text, "Bold", 16.0, BoundingBox::new(72.0, 300.0, 200.0, 316.0), 1)
        };
        let mut blocks = vec![
            at("  42  ", 300.0, 312.0),
            at("стр. 17", 320.0, 332.0),
            heading("42"),
            heading("Overview"),
            at("Body text.", 340.0, 352.0),
        ];
        let stats = FontStatistics::collect(blocks.iter());
        let fonts = HeadingFonts::from_keys([FontKey::new("Bold", 16.0)]);

        let removed = filter().remove_markers(&mut blocks, &stats, &fonts);
        assert_eq!(removed, 2);
        let texts: Vec<&str> = blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["42", "Overview", "Body text."]);
    }

    #[test]
    fn test_lone_heading_font_not_exempt() {
        let mut blocks = vec![TextBlock::new(
            "42",
            "Bold",
            16.0,
            BoundingBox::new(72.0, 300.0, 200.0, 316.0),
            1,
        )];
        let stats = FontStatistics::collect(blocks.iter());
        let fonts = HeadingFonts::from_keys([FontKey::new("Bold", 16.0)]);

        assert_eq!(filter().remove_markers(&mut blocks, &stats, &fonts), 1);
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_marker_removal_disabled() {
        let f = NoiseFilter::new(&AnalysisOptions::new().with_page_marker_removal(false)).unwrap();
        let mut blocks = vec![at("42", 300.0, 312.0)];
        let removed = f.remove_markers(&mut blocks, &FontStatistics::new(), &HeadingFonts::default());
        assert_eq!(removed, 0);
        assert_eq!(blocks.len(), 1);
    }
}
