//! Chapter and heading tree construction.
//!
//! The builder is a small state machine fed one block at a time. It keeps
//! the chain of open headings as a stack of levels and child indices, so a
//! new heading can be attached below its nearest shallower ancestor without
//! shared ownership of tree nodes.

use super::patterns::CHAPTER_LEVEL;
use super::{LevelResolver, TocExtractor};
use crate::model::{Chapter, Heading, TextBlock};

/// An open heading: its level and its index in the parent's child list.
#[derive(Debug, Clone, Copy)]
struct OpenHeading {
    level: u8,
    index: usize,
}

/// Builds chapters with nested heading trees from classified blocks.
#[derive(Debug)]
pub struct HierarchyBuilder<'a> {
    resolver: LevelResolver<'a>,
    untitled_title: &'a str,
    chapters: Vec<Chapter>,
    stack: Vec<OpenHeading>,
}

impl<'a> HierarchyBuilder<'a> {
    /// Create a builder. `untitled_title` names chapters synthesized for
    /// content that precedes the first chapter marker.
    pub fn new(resolver: LevelResolver<'a>, untitled_title: &'a str) -> Self {
        Self {
            resolver,
            untitled_title,
            chapters: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// Feed one block.
    pub fn push(&mut self, block: &TextBlock) {
        if block.is_blank() {
            return;
        }

        let text = block.text.trim();
        let signal = self.resolver.signal(block);
        // Contents listings name chapters without opening them.
        let leader = TocExtractor::new().is_leader_entry(text);

        if !leader && signal.pattern_level == CHAPTER_LEVEL {
            self.open_chapter(text, block.page_number);
            return;
        }

        if !leader && signal.is_heading_like() {
            let level = self
                .resolver
                .level_for(signal.pattern_level, &block.font_key());
            self.open_heading(text, level, block.page_number);
            return;
        }

        self.ensure_chapter(block.page_number);
        if let Some(chapter) = self.chapters.last_mut() {
            chapter.add_line(text);
        }
    }

    /// Feed every block of an iterator.
    pub fn extend<'b, I>(&mut self, blocks: I)
    where
        I: IntoIterator<Item = &'b TextBlock>,
    {
        for block in blocks {
            self.push(block);
        }
    }

    /// Close the open chapter and return all chapters.
    pub fn finish(self) -> Vec<Chapter> {
        self.chapters
    }

    fn open_chapter(&mut self, title: &str, page: u32) {
        self.stack.clear();
        self.chapters.push(Chapter::new(title, page));
    }

    fn ensure_chapter(&mut self, page: u32) {
        if self.chapters.is_empty() {
            log::debug!("Content before the first chapter marker; opening untitled chapter");
            let title = self.untitled_title;
            self.open_chapter(title, page);
        }
    }

    fn open_heading(&mut self, text: &str, level: u8, page: u32) {
        self.ensure_chapter(page);

        while self.stack.last().map_or(false, |top| top.level >= level) {
            self.stack.pop();
        }

        let Some(chapter) = self.chapters.last_mut() else {
            return;
        };

        // Keeps paragraphs on either side of the heading apart.
        if chapter.content.last().map_or(false, |line| !line.is_empty()) {
            chapter.add_line(String::new());
        }

        let mut siblings = &mut chapter.headings;
        for open in &self.stack {
            siblings = &mut siblings[open.index].subheadings;
        }
        let index = siblings.len();
        siblings.push(Heading::new(text, level));

        self.stack.push(OpenHeading { level, index });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{HeadingFonts, PatternClassifier, PatternSet};
    use crate::model::{BoundingBox, FontKey};

    fn heading(text: &str, size: f32) -> TextBlock {
        TextBlock::new(text, "Bold", size, BoundingBox::default(), 1)
    }

    fn body(text: &str) -> TextBlock {
        TextBlock::new(text, "Body", 11.0, BoundingBox::default(), 1)
    }

    fn build(blocks: &[TextBlock], fonts: &HeadingFonts) -> Vec<Chapter> {
        let patterns = PatternClassifier::new(&PatternSet::default()).unwrap();
        let resolver = LevelResolver::new(&patterns, fonts);
        let mut builder = HierarchyBuilder::new(resolver, "Chapter");
        builder.extend(blocks);
        builder.finish()
    }

    #[test]
    fn test_chapter_with_pattern_subheading() {
        let fonts = HeadingFonts::from_keys([FontKey::new("Bold", 18.0)]);
        let blocks = vec![
            heading("Chapter 1: Intro", 18.0),
            body("Para A."),
            body("1.1 Sub"),
            body("Para B."),
        ];

        let chapters = build(&blocks, &fonts);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, "Chapter 1: Intro");
        assert_eq!(chapters[0].content, vec!["Para A.", "", "Para B."]);
        assert_eq!(chapters[0].headings.len(), 1);
        assert_eq!(chapters[0].headings[0].text, "1.1 Sub");
        assert!(chapters[0].headings[0].subheadings.is_empty());
    }

    #[test]
    fn test_nested_headings_follow_stack() {
        let fonts = HeadingFonts::from_keys([
            FontKey::new("Bold", 18.0),
            FontKey::new("Bold", 14.0),
            FontKey::new("Bold", 12.0),
        ]);
        let blocks = vec![
            heading("Chapter 2", 18.0),
            heading("Background", 14.0),
            heading("Prior work", 12.0),
            body("Text."),
            heading("Related systems", 12.0),
            heading("Method", 14.0),
            body("More text."),
        ];

        let chapters = build(&blocks, &fonts);
        let headings = &chapters[0].headings;
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].text, "Background");
        assert_eq!(headings[0].level, 2);
        assert_eq!(headings[0].subheadings.len(), 2);
        assert_eq!(headings[0].subheadings[1].text, "Related systems");
        assert_eq!(headings[0].subheadings[1].level, 3);
        assert_eq!(headings[1].text, "Method");
        assert!(headings.iter().all(|h| h.is_well_nested()));
    }

    #[test]
    fn test_level_jump_attaches_to_remaining_ancestor() {
        let fonts = HeadingFonts::from_keys([FontKey::new("Bold", 14.0)]);
        let blocks = vec![
            heading("Overview", 14.0),
            body("5.2.3 Method Name"),
            body("2. Results"),
        ];

        let chapters = build(&blocks, &fonts);
        let headings = &chapters[0].headings;
        // Overview (1) > 5.2.3 (3); 2. (level 2) pops 5.2.3 and nests under Overview
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].subheadings.len(), 2);
        assert_eq!(headings[0].subheadings[0].level, 3);
        assert_eq!(headings[0].subheadings[1].level, 2);
        assert!(headings[0].is_well_nested());
    }

    #[test]
    fn test_new_chapter_clears_stack() {
        let fonts = HeadingFonts::default();
        let blocks = vec![
            body("Chapter 1"),
            body("1. First"),
            body("Chapter 2"),
            body("1. Again"),
            body("Text."),
        ];

        let chapters = build(&blocks, &fonts);
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[1].title, "Chapter 2");
        assert_eq!(chapters[1].headings.len(), 1);
        assert_eq!(chapters[1].headings[0].text, "1. Again");
        assert_eq!(chapters[1].content, vec!["Text."]);
    }

    #[test]
    fn test_plain_content_synthesizes_chapter() {
        let fonts = HeadingFonts::default();
        let blocks = vec![body("Just text."), body(""), body("More text.")];

        let chapters = build(&blocks, &fonts);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, "Chapter");
        assert_eq!(chapters[0].content, vec!["Just text.", "More text."]);
        assert!(chapters[0].headings.is_empty());
    }

    #[test]
    fn test_toc_leader_lines_stay_content() {
        let fonts = HeadingFonts::from_keys([FontKey::new("Bold", 14.0)]);
        let blocks = vec![
            body("Contents"),
            body("Chapter 1 Basics ........ 3"),
            heading("1.1 Setup . . . . 4", 14.0),
            body("Chapter 1 Basics"),
            body("Welcome."),
        ];

        let chapters = build(&blocks, &fonts);
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "Chapter");
        assert!(chapters[0].headings.is_empty());
        assert_eq!(
            chapters[0].content,
            vec!["Contents", "Chapter 1 Basics ........ 3", "1.1 Setup . . . . 4"]
        );
        assert_eq!(chapters[1].title, "Chapter 1 Basics");
        assert_eq!(chapters[1].content, vec!["Welcome."]);
    }

    #[test]
    fn test_heading_before_any_chapter() {
        let fonts = HeadingFonts::from_keys([FontKey::new("Bold", 16.0)]);
        let blocks = vec![heading("Preface", 16.0), body("Opening words.")];

        let chapters = build(&blocks, &fonts);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, "Chapter");
        assert_eq!(chapters[0].headings[0].text, "Preface");
        assert_eq!(chapters[0].content, vec!["Opening words."]);
    }
}
