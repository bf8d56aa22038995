//! Markdown rendering for analyzed documents.

use crate::error::Result;
use crate::model::{Chapter, Document, Heading, TocEntry};

use super::RenderOptions;

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(doc)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a document to Markdown.
    pub fn render(&self, doc: &Document) -> Result<String> {
        let mut output = String::new();

        if self.options.include_frontmatter {
            output.push_str(&doc.to_yaml_frontmatter());
        }

        if self.options.include_toc && !doc.toc.is_empty() {
            self.render_toc(&mut output, &doc.toc);
        }

        for chapter in &doc.chapters {
            self.render_chapter(&mut output, chapter);
        }

        Ok(output.trim().to_string())
    }

    fn render_toc(&self, output: &mut String, toc: &[TocEntry]) {
        output.push_str("## Contents\n\n");
        for entry in toc {
            output.push_str(&format!(
                "{} {} ({})\n",
                self.options.list_marker,
                self.text(&entry.label),
                entry.page
            ));
        }
        output.push('\n');
    }

    fn render_chapter(&self, output: &mut String, chapter: &Chapter) {
        output.push_str("# ");
        output.push_str(&self.text(&chapter.title));
        output.push_str("\n\n");

        if self.options.include_outline && !chapter.headings.is_empty() {
            for heading in &chapter.headings {
                self.render_outline(output, heading, 0);
            }
            output.push('\n');
        }

        for paragraph in &chapter.content {
            output.push_str(&self.text(paragraph));
            output.push_str("\n\n");
        }
    }

    fn render_outline(&self, output: &mut String, heading: &Heading, depth: usize) {
        if heading.level > self.options.max_heading_level {
            return;
        }
        output.push_str(&"  ".repeat(depth));
        output.push(self.options.list_marker);
        output.push(' ');
        output.push_str(&self.text(&heading.text));
        output.push('\n');

        for child in &heading.subheadings {
            self.render_outline(output, child, depth + 1);
        }
    }

    fn text(&self, text: &str) -> String {
        if self.options.escape_special_chars {
            escape_markdown(text)
        } else {
            text.to_string()
        }
    }
}

/// Escape special Markdown characters.
/// Only escape characters that could be misinterpreted as Markdown syntax.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
