//! Layout-annotated text blocks and font identities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned bounding box in page coordinates.
///
/// The origin is the top-left corner of the page and `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box height.
    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).abs()
    }

    /// Box width.
    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).abs()
    }

    /// Check if the box is unset (all coordinates zero).
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }
}

/// A unit of extracted text with font and position metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// The text content
    pub text: String,

    /// Font family name (e.g., "Helvetica-Bold"); empty when unknown
    #[serde(default)]
    pub font_family: String,

    /// Font size in points; 0 when unknown
    #[serde(default)]
    pub font_size: f32,

    /// Position on the page
    #[serde(default)]
    pub bbox: BoundingBox,

    /// Page number (1-indexed)
    pub page_number: u32,
}

impl TextBlock {
    /// Create a new text block.
    pub fn new(
        text: impl Into<String>,
        font_family: impl Into<String>,
        font_size: f32,
        bbox: BoundingBox,
        page_number: u32,
    ) -> Self {
        Self {
            text: text.into(),
            font_family: font_family.into(),
            font_size,
            bbox,
            page_number,
        }
    }

    /// Create a block without font metadata, as OCR output arrives.
    pub fn plain(text: impl Into<String>, page_number: u32) -> Self {
        Self::new(text, "", 0.0, BoundingBox::default(), page_number)
    }

    /// The font identity of this block.
    pub fn font_key(&self) -> FontKey {
        FontKey::new(self.font_family.clone(), self.font_size)
    }

    /// Check if the block carries no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Identity of a font appearance: family plus size.
///
/// Sizes are quantized to 0.1pt so that keys can be hashed and ordered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FontKey {
    /// Font family name
    pub family: String,
    /// Font size in tenths of a point
    pub size_tenths: i32,
}

impl FontKey {
    /// Create a key from a family name and a size in points.
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        let size_tenths = if size.is_finite() {
            (size * 10.0).round() as i32
        } else {
            0
        };
        Self {
            family: family.into(),
            size_tenths,
        }
    }

    /// Font size in points.
    pub fn size(&self) -> f32 {
        self.size_tenths as f32 / 10.0
    }

    /// A key is unknown when the extractor supplied no font metadata.
    pub fn is_known(&self) -> bool {
        !self.family.trim().is_empty() && self.size_tenths > 0
    }
}

impl fmt::Display for FontKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.1}pt", self.family, self.size())
    }
}
