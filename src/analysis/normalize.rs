//! Unicode normalization of block text.

use unicode_normalization::UnicodeNormalization;

use crate::model::TextBlock;

/// Typographic ligatures and their expansions.
const LIGATURES: [(char, &str); 7] = [
    ('\u{FB00}', "ff"),  // ﬀ
    ('\u{FB01}', "fi"),  // ﬁ
    ('\u{FB02}', "fl"),  // ﬂ
    ('\u{FB03}', "ffi"), // ﬃ
    ('\u{FB04}', "ffl"), // ﬄ
    ('\u{FB05}', "st"),  // ﬅ
    ('\u{FB06}', "st"),  // ﬆ
];

/// Applies NFC normalization and ligature expansion.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize a single text.
    pub fn normalize(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        for c in text.nfc() {
            match LIGATURES.iter().find(|(lig, _)| *lig == c) {
                Some((_, expansion)) => result.push_str(expansion),
                None => result.push(c),
            }
        }
        result
    }

    /// Normalize the text of every block in place.
    pub fn normalize_blocks(&self, blocks: &mut [TextBlock]) {
        for block in blocks {
            block.text = self.normalize(&block.text);
        }
    }
}

/// Check if a character lies in a Unicode Private Use Area.
pub(crate) fn is_private_use(c: char) -> bool {
    let code = c as u32;
    (0xE000..=0xF8FF).contains(&code)
        || (0xF0000..=0xFFFFD).contains(&code)
        || (0x100000..=0x10FFFD).contains(&code)
}
