//! Source pages: the input envelope handed over by the block extractor.

use super::TextBlock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single source page with its extracted blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcePage {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points; 0 disables margin-band filtering
    pub height: f32,

    /// Text blocks in reading order
    #[serde(default)]
    pub blocks: Vec<TextBlock>,
}

impl SourcePage {
    /// Create a new page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            blocks: Vec::new(),
        }
    }

    /// Create a new page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0) // 8.5 * 72, 11 * 72
    }

    /// Create a new page with standard A4 size (210 x 297 mm).
    pub fn a4(number: u32) -> Self {
        Self::new(number, 595.0, 842.0) // 210mm * 2.834, 297mm * 2.834
    }

    /// Create a page whose dimensions are unknown. Margin bands never apply.
    pub fn r#unsized(number: u32) -> Self {
        Self::new(number, 0.0, 0.0)
    }

    /// Add a block to the page.
    pub fn add_block(&mut self, block: TextBlock) {
        self.blocks.push(block);
    }

    /// Check if the page has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Whether the page geometry allows margin-band filtering.
    pub fn has_geometry(&self) -> bool {
        self.height.is_finite() && self.height > 0.0
    }
}

/// Everything the extractor hands to the analyzer for one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Source metadata (e.g., "title", "author")
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,

    /// Pages in document order
    #[serde(default)]
    pub pages: Vec<SourcePage>,
}

impl SourceDocument {
    /// Create a new empty source document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Group a flat block sequence into pages by page number.
    ///
    /// Blocks carry no page dimensions, so the pages are unsized and margin
    /// bands are not applied. Pages appear in order of first occurrence;
    /// block order within a page is preserved.
    pub fn from_blocks(blocks: Vec<TextBlock>) -> Self {
        let mut pages: Vec<SourcePage> = Vec::new();
        for block in blocks {
            match pages.iter_mut().find(|p| p.number == block.page_number) {
                Some(page) => page.add_block(block),
                None => {
                    let mut page = SourcePage::r#unsized(block.page_number);
                    page.add_block(block);
                    pages.push(page);
                }
            }
        }
        Self {
            metadata: BTreeMap::new(),
            pages,
        }
    }

    /// Set a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Add a page.
    pub fn add_page(&mut self, page: SourcePage) {
        self.pages.push(page);
    }

    /// Iterate over all blocks in page-then-reading order.
    pub fn blocks(&self) -> impl Iterator<Item = &TextBlock> {
        self.pages.iter().flat_map(|p| p.blocks.iter())
    }

    /// Total number of blocks.
    pub fn block_count(&self) -> usize {
        self.pages.iter().map(|p| p.blocks.len()).sum()
    }

    /// Check if any block carries visible text.
    pub fn has_text(&self) -> bool {
        self.blocks().any(|b| !b.is_blank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_blocks_groups_by_page() {
        let blocks = vec![
            TextBlock::plain("a", 1),
            TextBlock::plain("b", 2),
            TextBlock::plain("c", 1),
            TextBlock::plain("d", 2),
        ];
        let doc = SourceDocument::from_blocks(blocks);
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.pages[0].number, 1);
        let texts: Vec<&str> = doc.blocks().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c", "b", "d"]);
        assert!(!doc.pages[0].has_geometry());
    }

    #[test]
    fn test_has_text() {
        let doc = SourceDocument::from_blocks(vec![TextBlock::plain("   ", 1)]);
        assert!(!doc.has_text());
        assert_eq!(doc.block_count(), 1);
        assert!(!SourceDocument::new().has_text());
    }

    #[test]
    fn test_page_geometry() {
        assert!(SourcePage::a4(1).has_geometry());
        assert!(!SourcePage::new(1, 0.0, 0.0).has_geometry());
        assert!(!SourcePage::r#unsized(1).has_geometry());
    }
}
