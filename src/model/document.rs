//! Document-level types: the inferred chapter and heading tree.

use super::{Diagnostic, TocEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A document with its inferred logical structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document title
    pub title: String,

    /// Document author
    pub author: String,

    /// Chapters in document order
    pub chapters: Vec<Chapter>,

    /// Source metadata passed through from the extractor
    pub metadata: BTreeMap<String, String>,

    /// All block text in document order, one block per line
    pub raw_content: String,

    /// Table-of-contents entries detected in the raw lines
    pub toc: Vec<TocEntry>,

    /// Non-fatal findings from validation
    pub diagnostics: Vec<Diagnostic>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            chapters: Vec::new(),
            metadata: BTreeMap::new(),
            raw_content: String::new(),
            toc: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Get the number of chapters.
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    /// Add a chapter to the document.
    pub fn add_chapter(&mut self, chapter: Chapter) {
        self.chapters.push(chapter);
    }

    /// Check if the document has no chapters.
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Total number of headings across all chapters (including nested).
    pub fn heading_count(&self) -> usize {
        self.chapters.iter().map(|c| c.heading_count()).sum()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.chapters
            .iter()
            .map(|chapter| chapter.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Convert title, author and metadata to YAML frontmatter format.
    pub fn to_yaml_frontmatter(&self) -> String {
        let mut lines = vec!["---".to_string()];

        lines.push(format!("title: \"{}\"", escape_yaml(&self.title)));
        lines.push(format!("author: \"{}\"", escape_yaml(&self.author)));
        for (key, value) in &self.metadata {
            if key == "title" || key == "author" {
                continue;
            }
            lines.push(format!("{}: \"{}\"", key, escape_yaml(value)));
        }
        lines.push(format!("chapters: {}", self.chapters.len()));

        lines.push("---".to_string());
        lines.push(String::new());

        lines.join("\n")
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape special characters for YAML strings.
fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// A chapter: flat content lines plus a navigational heading tree.
///
/// Content is never distributed into headings; the flat list guarantees
/// that no text is lost while the tree indexes the same content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter title
    pub title: String,

    /// Content lines (paragraphs after reconstruction) in encounter order
    pub content: Vec<String>,

    /// Top-level headings
    pub headings: Vec<Heading>,

    /// Page the chapter starts on (1-indexed)
    pub page_number: u32,
}

impl Chapter {
    /// Create a new empty chapter.
    pub fn new(title: impl Into<String>, page_number: u32) -> Self {
        Self {
            title: title.into(),
            content: Vec::new(),
            headings: Vec::new(),
            page_number,
        }
    }

    /// Append a content line.
    pub fn add_line(&mut self, line: impl Into<String>) {
        self.content.push(line.into());
    }

    /// Append a top-level heading.
    pub fn add_heading(&mut self, heading: Heading) {
        self.headings.push(heading);
    }

    /// Total number of headings (including nested).
    pub fn heading_count(&self) -> usize {
        self.headings.iter().map(|h| h.total_count()).sum()
    }

    /// Check if the chapter has no content lines.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Get plain text content of the chapter.
    pub fn plain_text(&self) -> String {
        let mut parts = Vec::with_capacity(self.content.len() + 1);
        parts.push(self.title.clone());
        parts.extend(self.content.iter().cloned());
        parts.join("\n\n")
    }
}

/// A heading with its ordered subheadings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading text
    pub text: String,

    /// Nesting level (1 = outermost)
    pub level: u8,

    /// Child headings, each with a strictly greater level
    pub subheadings: Vec<Heading>,
}

impl Heading {
    /// Create a new heading without children.
    pub fn new(text: impl Into<String>, level: u8) -> Self {
        Self {
            text: text.into(),
            level: level.max(1),
            subheadings: Vec::new(),
        }
    }

    /// Add a child heading.
    pub fn add_subheading(&mut self, heading: Heading) {
        self.subheadings.push(heading);
    }

    /// Number of headings in this subtree, including this one.
    pub fn total_count(&self) -> usize {
        1 + self
            .subheadings
            .iter()
            .map(|h| h.total_count())
            .sum::<usize>()
    }

    /// Depth of this subtree (1 for a leaf).
    pub fn depth(&self) -> usize {
        1 + self
            .subheadings
            .iter()
            .map(|h| h.depth())
            .max()
            .unwrap_or(0)
    }

    /// Check that every descendant has a strictly greater level than its parent.
    pub fn is_well_nested(&self) -> bool {
        self.subheadings
            .iter()
            .all(|child| child.level > self.level && child.is_well_nested())
    }
}
