//! Heading level resolution: fuses pattern and font evidence.

use super::{HeadingFonts, PatternClassifier};
use crate::model::{FontKey, TextBlock};

/// Evidence gathered for a single block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingSignal {
    /// Level from structural patterns (0 = no match)
    pub pattern_level: u8,
    /// Whether the block is set in a heading font
    pub heading_font: bool,
}

impl HeadingSignal {
    /// A block is heading-like when either signal fires.
    pub fn is_heading_like(&self) -> bool {
        self.pattern_level > 0 || self.heading_font
    }
}

/// Resolves the level of heading-like blocks.
#[derive(Debug, Clone, Copy)]
pub struct LevelResolver<'a> {
    patterns: &'a PatternClassifier,
    fonts: &'a HeadingFonts,
}

impl<'a> LevelResolver<'a> {
    /// Create a resolver over a pattern classifier and a heading font set.
    pub fn new(patterns: &'a PatternClassifier, fonts: &'a HeadingFonts) -> Self {
        Self { patterns, fonts }
    }

    /// Gather the pattern and font evidence for a block.
    pub fn signal(&self, block: &TextBlock) -> HeadingSignal {
        let key = block.font_key();
        HeadingSignal {
            pattern_level: self.patterns.classify(&block.text),
            heading_font: key.is_known() && self.fonts.contains(&key),
        }
    }

    /// Resolve the level of a heading-like text.
    ///
    /// Pattern evidence is authoritative; otherwise the level is the rank of
    /// the font size among heading sizes, largest first.
    pub fn resolve(&self, text: &str, key: &FontKey) -> u8 {
        self.level_for(self.patterns.classify(text), key)
    }

    /// Resolve a level when the pattern level is already known.
    pub fn level_for(&self, pattern_level: u8, key: &FontKey) -> u8 {
        if pattern_level > 0 {
            return pattern_level;
        }
        self.font_level(key)
    }

    /// 1-based rank of the key's size among heading sizes; sizes smaller than
    /// every heading size (and unknown fonts) rank one past the end.
    pub fn font_level(&self, key: &FontKey) -> u8 {
        let sizes = self.fonts.sizes_desc();
        let rank = if key.is_known() {
            sizes.iter().filter(|&&s| s > key.size_tenths).count() + 1
        } else {
            sizes.len() + 1
        };
        rank.min(u8::MAX as usize) as u8
    }
}
