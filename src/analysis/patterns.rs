//! Pattern-based heading classification.
//!
//! Explicit structural markers ("Chapter 3", "2.1", "IV.", "Appendix B")
//! are recognized independently of typography and mapped to a heading level.

use std::sync::{Arc, OnceLock};

use regex::{Regex, RegexBuilder};

use super::PatternSet;
use crate::error::Result;

/// Level returned when no pattern matches.
pub const NOT_A_HEADING: u8 = 0;

/// Level of chapter markers; a block at this level opens a new chapter.
pub const CHAPTER_LEVEL: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleKind {
    ChapterMarker,
    PartMarker,
    Numbered,
    TwoLevel,
    Roman,
    ThreeLevel,
    Appendix,
    Custom,
}

#[derive(Debug, Clone)]
struct Rule {
    kind: RuleKind,
    regex: Regex,
    level: u8,
}

/// Ordered structural patterns; the first matching rule decides the level.
#[derive(Debug, Clone)]
pub struct PatternClassifier {
    rules: Vec<Rule>,
}

static DEFAULT_CLASSIFIER: OnceLock<Arc<PatternClassifier>> = OnceLock::new();

impl PatternClassifier {
    /// Compile a classifier for the given pattern set.
    pub fn new(set: &PatternSet) -> Result<Self> {
        let chapter = keyword_alternation(&set.chapter_keywords);
        let part = keyword_alternation(&set.part_keywords);
        let appendix = keyword_alternation(&set.appendix_keywords);

        let mut rules = vec![
            rule(
                RuleKind::ChapterMarker,
                &format!(r"^(?:{})\s+(?P<num>\d+|[ivxlcdm]+)\b", chapter),
                1,
            )?,
            rule(
                RuleKind::PartMarker,
                &format!(r"^(?:{})\s+(?P<num>[ivxlcdm]+)\b", part),
                1,
            )?,
            rule(RuleKind::Numbered, r"^\d+\.(?:\s|$)", 2)?,
            rule(RuleKind::TwoLevel, r"^\d+\.\d+\.?(?:\s|$)", 2)?,
            rule(RuleKind::Roman, r"^(?P<num>[ivxlcdm]+)\.(?:\s|$)", 2)?,
            rule(RuleKind::ThreeLevel, r"^\d+(?:\.\d+){2,}\.?(?:\s|$)", 3)?,
            rule(
                RuleKind::Appendix,
                &format!(r"^(?:{})\s+[a-z]\b", appendix),
                4,
            )?,
        ];

        for custom in &set.extra_patterns {
            rules.push(rule(RuleKind::Custom, &custom.pattern, custom.level)?);
        }

        Ok(Self { rules })
    }

    /// Get a classifier for the pattern set, reusing the process-wide
    /// compiled default when the set is the default one.
    pub fn shared(set: &PatternSet) -> Result<Arc<Self>> {
        if *set != PatternSet::default() {
            return Ok(Arc::new(Self::new(set)?));
        }
        if let Some(classifier) = DEFAULT_CLASSIFIER.get() {
            return Ok(Arc::clone(classifier));
        }
        let compiled = Arc::new(Self::new(set)?);
        Ok(Arc::clone(DEFAULT_CLASSIFIER.get_or_init(|| compiled)))
    }

    /// Classify a text: 0 when no structural pattern matches.
    pub fn classify(&self, text: &str) -> u8 {
        let text = text.trim();
        if text.is_empty() {
            return NOT_A_HEADING;
        }

        for rule in &self.rules {
            let Some(caps) = rule.regex.captures(text) else {
                continue;
            };
            let numeral_ok = match rule.kind {
                RuleKind::ChapterMarker | RuleKind::PartMarker | RuleKind::Roman => {
                    caps.name("num").map_or(true, |m| {
                        let num = m.as_str();
                        num.chars().all(|c| c.is_ascii_digit()) || is_roman_numeral(num)
                    })
                }
                _ => true,
            };
            if numeral_ok {
                return rule.level;
            }
        }

        NOT_A_HEADING
    }
}

fn rule(kind: RuleKind, pattern: &str, level: u8) -> Result<Rule> {
    let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
    Ok(Rule { kind, regex, level })
}

fn keyword_alternation(keywords: &[String]) -> String {
    keywords
        .iter()
        .map(|k| regex::escape(k.trim()))
        .collect::<Vec<_>>()
        .join("|")
}

/// Check if a string is a canonical Roman numeral (case-insensitive).
pub fn is_roman_numeral(s: &str) -> bool {
    let upper = s.to_ascii_uppercase();
    match roman_value(&upper) {
        Some(value) if value > 0 => to_roman(value) == upper,
        _ => false,
    }
}

fn roman_value(s: &str) -> Option<u32> {
    let mut total = 0u32;
    let mut prev = 0u32;
    for c in s.chars().rev() {
        let value = match c {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            _ => return None,
        };
        if value < prev {
            total = total.checked_sub(value)?;
        } else {
            total += value;
            prev = value;
        }
    }
    Some(total)
}

fn to_roman(mut num: u32) -> String {
    let numerals = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut result = String::new();
    for (value, symbol) in numerals {
        while num >= value {
            result.push_str(symbol);
            num -= value;
        }
    }
    result
}
