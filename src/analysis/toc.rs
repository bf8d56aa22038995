//! Table-of-contents detection.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::{Document, Heading, TocEntry};

/// "5.2.3 Method Name 30"
fn numbered_entry_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<section>\d+(?:\.\d+)*)\.?\s+(?P<title>.+?)\s+(?P<page>\d+)$").unwrap()
    })
}

/// "Method Name ......... 30"
fn leader_entry_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<title>.*?)\s*(?:(?:\.\s*){3,}|…+\s*)(?P<page>\d+)$").unwrap()
    })
}

/// Scans lines for table-of-contents entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct TocExtractor;

impl TocExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parse a single line; the first matching pattern wins.
    pub fn parse_line(&self, line: &str) -> Option<TocEntry> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if let Some(caps) = numbered_entry_regex().captures(line) {
            if let Some(entry) = build_entry(
                Some(&caps["section"]),
                &caps["title"],
                &caps["page"],
            ) {
                return Some(entry);
            }
        }

        let caps = leader_entry_regex().captures(line)?;
        build_entry(None, &caps["title"], &caps["page"])
    }

    /// Check if a line is a dot-leader entry such as `Intro ..... 3`.
    pub fn is_leader_entry(&self, line: &str) -> bool {
        leader_entry_regex()
            .captures(line.trim())
            .map_or(false, |caps| {
                build_entry(None, &caps["title"], &caps["page"]).is_some()
            })
    }

    /// Extract entries from lines in order.
    pub fn extract<I, S>(&self, lines: I) -> Vec<TocEntry>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .filter_map(|line| self.parse_line(line.as_ref()))
            .collect()
    }

    /// Report which entries name a chapter or heading of the document.
    pub fn cross_check(&self, document: &Document) -> TocCoverage {
        let mut names = BTreeSet::new();
        for chapter in &document.chapters {
            names.insert(normalize_label(&chapter.title));
            collect_heading_names(&chapter.headings, &mut names);
        }

        let mut coverage = TocCoverage::default();
        for entry in &document.toc {
            let found = names.contains(&normalize_label(&entry.label))
                || names.contains(&normalize_label(&entry.title));
            if found {
                coverage.matched.push(entry.clone());
            } else {
                coverage.unmatched.push(entry.clone());
            }
        }
        coverage
    }
}

/// Result of matching TOC entries against the inferred structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TocCoverage {
    /// Entries whose label matches a chapter title or heading
    pub matched: Vec<TocEntry>,
    /// Entries with no counterpart in the structure
    pub unmatched: Vec<TocEntry>,
}

impl TocCoverage {
    /// Fraction of entries that matched (1.0 when there are no entries).
    pub fn ratio(&self) -> f32 {
        let total = self.matched.len() + self.unmatched.len();
        if total == 0 {
            1.0
        } else {
            self.matched.len() as f32 / total as f32
        }
    }
}

fn build_entry(section: Option<&str>, title: &str, page: &str) -> Option<TocEntry> {
    let title = title
        .trim_end_matches(|c: char| c == '.' || c == '…' || c.is_whitespace())
        .trim();
    if !title.chars().any(char::is_alphabetic) {
        return None;
    }
    let page = page.parse::<u32>().ok()?;
    Some(TocEntry::new(section.map(str::to_string), title, page))
}

fn collect_heading_names(headings: &[Heading], names: &mut BTreeSet<String>) {
    for heading in headings {
        names.insert(normalize_label(&heading.text));
        collect_heading_names(&heading.subheadings, names);
    }
}

fn normalize_label(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
