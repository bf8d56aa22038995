//! Per-chapter markup and navigation for packaging.
//!
//! A packager (e.g. an e-book writer) stores each chapter as its own XHTML
//! file and builds its navigation document from [`navigation`].

use serde::{Deserialize, Serialize};

use crate::model::{Chapter, Document, Heading};

/// A navigation entry mirroring a chapter or heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavPoint {
    /// Display label
    pub label: String,
    /// Target file, with a fragment for headings
    pub href: String,
    /// Nested entries
    pub children: Vec<NavPoint>,
}

impl NavPoint {
    /// Number of entries in this subtree, including this one.
    pub fn total_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.total_count()).sum::<usize>()
    }
}

/// Build the navigation tree: one entry per chapter, with its headings nested.
pub fn navigation(doc: &Document) -> Vec<NavPoint> {
    doc.chapters
        .iter()
        .enumerate()
        .map(|(index, chapter)| {
            let file = chapter_file_name(index, chapter);
            let children = heading_points(&chapter.headings, &file, None);
            NavPoint {
                label: chapter.title.clone(),
                href: file,
                children,
            }
        })
        .collect()
}

fn heading_points(headings: &[Heading], file: &str, parent: Option<&str>) -> Vec<NavPoint> {
    headings
        .iter()
        .enumerate()
        .map(|(i, heading)| {
            let anchor = anchor_id(parent, i);
            NavPoint {
                label: heading.text.clone(),
                href: format!("{}#{}", file, anchor),
                children: heading_points(&heading.subheadings, file, Some(&anchor)),
            }
        })
        .collect()
}

/// Anchor of the `index`-th child: "h2" at the top level, "h2-1" below it.
fn anchor_id(parent: Option<&str>, index: usize) -> String {
    match parent {
        Some(parent) => format!("{}-{}", parent, index + 1),
        None => format!("h{}", index + 1),
    }
}

/// File name for a chapter: its 1-based position and sanitized title.
pub fn chapter_file_name(index: usize, chapter: &Chapter) -> String {
    let slug = sanitize_filename(&chapter.title)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("{:03}-{}.xhtml", index + 1, slug)
}

/// Remove characters that are invalid in file names.
///
/// Returns `"untitled"` when nothing usable remains.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | '*' | '?' | ':' | '<' | '>' | '|' | '"'))
        .filter(|c| !c.is_control())
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Render a chapter as a standalone XHTML document.
///
/// The heading tree is emitted as an anchored outline before the content so
/// that navigation fragments resolve.
pub fn chapter_html(chapter: &Chapter) -> String {
    let title = html_escape::encode_text(&chapter.title);
    let mut html = String::new();

    html.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    html.push_str("<!DOCTYPE html>\n");
    html.push_str("<html xmlns=\"http://www.w3.org/1999/xhtml\">\n");
    html.push_str(&format!("<head>\n<title>{}</title>\n</head>\n", title));
    html.push_str("<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", title));

    if !chapter.headings.is_empty() {
        html.push_str("<nav>\n");
        push_headings(&mut html, &chapter.headings, None);
        html.push_str("</nav>\n");
    }

    for paragraph in &chapter.content {
        html.push_str("<p>");
        html.push_str(&html_escape::encode_text(paragraph));
        html.push_str("</p>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn push_headings(html: &mut String, headings: &[Heading], parent: Option<&str>) {
    html.push_str("<ul>\n");
    for (i, heading) in headings.iter().enumerate() {
        let anchor = anchor_id(parent, i);
        // h1 is the chapter title
        let tag = (heading.level as usize + 1).min(6);
        html.push_str(&format!(
            "<li><h{tag} id=\"{}\">{}</h{tag}>",
            anchor,
            html_escape::encode_text(&heading.text),
            tag = tag
        ));
        if !heading.subheadings.is_empty() {
            html.push('\n');
            push_headings(html, &heading.subheadings, Some(&anchor));
        }
        html.push_str("</li>\n");
    }
    html.push_str("</ul>\n");
}
