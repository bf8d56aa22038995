//! Final guarantees over the built document and non-fatal diagnostics.

use super::normalize::is_private_use;
use super::AnalysisOptions;
use crate::model::{Chapter, Diagnostic, DiagnosticKind, Document};

/// Guarantees a non-empty model and flags suspected extraction problems.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    options: &'a AnalysisOptions,
}

impl<'a> Validator<'a> {
    pub fn new(options: &'a AnalysisOptions) -> Self {
        Self { options }
    }

    /// Apply fallbacks, then record diagnostics on the document.
    pub fn validate(&self, document: &mut Document) {
        if document.chapters.is_empty() {
            log::warn!("No chapters detected; using a single chapter over the raw content");
            let mut chapter = Chapter::new(self.options.untitled_chapter_title.as_str(), 1);
            chapter.content = document
                .raw_content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect();
            document.add_chapter(chapter);
        }

        for chapter in &mut document.chapters {
            if chapter.content.is_empty() {
                log::debug!("Chapter '{}' has no content; adding placeholder", chapter.title);
                chapter.add_line(self.options.placeholder_text.as_str());
            }
        }

        let diagnostics = self.inspect(&document.chapters);
        for diagnostic in &diagnostics {
            log::warn!("{}", diagnostic);
        }
        document.diagnostics = diagnostics;
    }

    /// Collect diagnostics for all content lines.
    pub fn inspect(&self, chapters: &[Chapter]) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for (c, chapter) in chapters.iter().enumerate() {
            for (l, line) in chapter.content.iter().enumerate() {
                let length = line.chars().count();
                if length > self.options.long_line_threshold {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::LongLine,
                        c,
                        l,
                        format!(
                            "{} characters (threshold {})",
                            length, self.options.long_line_threshold
                        ),
                    ));
                }

                let longest = line
                    .split_whitespace()
                    .map(|token| token.chars().count())
                    .max()
                    .unwrap_or(0);
                if longest > self.options.long_token_threshold {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::UnbrokenToken,
                        c,
                        l,
                        format!(
                            "token of {} characters (threshold {})",
                            longest, self.options.long_token_threshold
                        ),
                    ));
                }

                let suspicious = line
                    .chars()
                    .filter(|&ch| ch == '\u{FFFD}' || is_private_use(ch))
                    .count();
                if suspicious > 0 {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::SuspectedCorruption,
                        c,
                        l,
                        format!("{} replacement or private-use characters", suspicious),
                    ));
                }
            }
        }

        diagnostics
    }
}
