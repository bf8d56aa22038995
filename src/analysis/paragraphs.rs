//! Paragraph reconstruction from hard-wrapped lines.

use std::sync::OnceLock;

use regex::Regex;

/// Ends with a letter followed by a hyphen ("docu-").
fn hyphen_break_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\p{L}-$").unwrap())
}

/// Ends a sentence, allowing closing quotes or brackets after the mark.
fn sentence_end_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[.!?]["'”’»)\]]*$"#).unwrap())
}

/// Merges soft-wrapped lines into paragraphs and undoes hyphenation.
///
/// Rules, applied to each line against the paragraph accumulated so far:
/// 1. a word broken by a trailing hyphen and continued in lowercase is
///    joined without the hyphen;
/// 2. a sentence end followed by an uppercase start begins a new paragraph,
///    anything else is joined with a single space;
/// 3. a blank line always ends the paragraph.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParagraphReconstructor;

impl ParagraphReconstructor {
    pub fn new() -> Self {
        Self
    }

    /// Reconstruct paragraphs. Never fails; blank lines are not emitted.
    pub fn reconstruct<I, S>(&self, lines: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut paragraphs = Vec::new();
        let mut current = String::new();

        for line in lines {
            let line = line.as_ref().trim();

            if line.is_empty() {
                flush(&mut current, &mut paragraphs);
                continue;
            }

            if current.is_empty() {
                current.push_str(line);
                continue;
            }

            let starts_lower = line.chars().next().map_or(false, char::is_lowercase);
            let starts_upper = line.chars().next().map_or(false, char::is_uppercase);

            if starts_lower && hyphen_break_regex().is_match(&current) {
                current.pop();
                current.push_str(line);
            } else if starts_upper && sentence_end_regex().is_match(&current) {
                flush(&mut current, &mut paragraphs);
                current.push_str(line);
            } else {
                current.push(' ');
                current.push_str(line);
            }
        }

        flush(&mut current, &mut paragraphs);
        paragraphs
    }
}

fn flush(current: &mut String, paragraphs: &mut Vec<String>) {
    if !current.is_empty() {
        paragraphs.push(std::mem::take(current));
    }
}
