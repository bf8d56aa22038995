//! Analysis options and configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Options for structure analysis.
///
/// Every stage receives these options by reference; nothing is read from
/// process-wide mutable state, so one options value can drive any number of
/// concurrent analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// How heading fonts are separated from body fonts
    pub font_strategy: FontStrategy,

    /// Structural pattern keywords and custom patterns
    pub patterns: PatternSet,

    /// Top margin band as a fraction of page height
    pub margin_top: f32,

    /// Bottom margin band as a fraction of page height
    pub margin_bottom: f32,

    /// Remove standalone page numbers and page markers
    pub remove_page_markers: bool,

    /// Apply Unicode NFC normalization and ligature expansion to block text
    pub normalize_text: bool,

    /// Merge soft-wrapped lines into paragraphs
    pub reconstruct_paragraphs: bool,

    /// Title given to chapters synthesized for unattributed text
    pub untitled_chapter_title: String,

    /// Line inserted into chapters that end up without content
    pub placeholder_text: String,

    /// Content lines longer than this (in characters) are flagged
    pub long_line_threshold: usize,

    /// Tokens longer than this (in characters) are flagged
    pub long_token_threshold: usize,
}

impl AnalysisOptions {
    /// Create new analysis options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heading font strategy.
    pub fn with_font_strategy(mut self, strategy: FontStrategy) -> Self {
        self.font_strategy = strategy;
        self
    }

    /// Use size clustering with the default cluster count.
    pub fn size_clustering(mut self) -> Self {
        self.font_strategy = FontStrategy::size_clustering();
        self
    }

    /// Set the pattern set.
    pub fn with_patterns(mut self, patterns: PatternSet) -> Self {
        self.patterns = patterns;
        self
    }

    /// Set the top and bottom margin bands.
    pub fn with_margins(mut self, top: f32, bottom: f32) -> Self {
        self.margin_top = top;
        self.margin_bottom = bottom;
        self
    }

    /// Disable margin-band filtering.
    pub fn without_margins(self) -> Self {
        self.with_margins(0.0, 0.0)
    }

    /// Enable or disable page marker removal.
    pub fn with_page_marker_removal(mut self, remove: bool) -> Self {
        self.remove_page_markers = remove;
        self
    }

    /// Enable or disable text normalization.
    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize_text = normalize;
        self
    }

    /// Enable or disable paragraph reconstruction.
    pub fn with_paragraphs(mut self, reconstruct: bool) -> Self {
        self.reconstruct_paragraphs = reconstruct;
        self
    }

    /// Set the title of synthesized chapters.
    pub fn with_untitled_chapter_title(mut self, title: impl Into<String>) -> Self {
        self.untitled_chapter_title = title.into();
        self
    }

    /// Set the placeholder for empty chapters.
    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder_text = text.into();
        self
    }

    /// Set the diagnostic thresholds.
    pub fn with_thresholds(mut self, long_line: usize, long_token: usize) -> Self {
        self.long_line_threshold = long_line;
        self.long_token_threshold = long_token;
        self
    }

    /// Check all options before any processing starts.
    pub fn validate(&self) -> Result<()> {
        self.font_strategy.validate()?;
        self.patterns.validate()?;

        for (name, value) in [
            ("margin_top", self.margin_top),
            ("margin_bottom", self.margin_bottom),
        ] {
            if !value.is_finite() || !(0.0..0.5).contains(&value) {
                return Err(Error::ConfigurationInvalid(format!(
                    "{} must be within [0, 0.5), got {}",
                    name, value
                )));
            }
        }

        if self.long_line_threshold == 0 {
            return Err(Error::ConfigurationInvalid(
                "long_line_threshold must be positive".to_string(),
            ));
        }
        if self.long_token_threshold == 0 {
            return Err(Error::ConfigurationInvalid(
                "long_token_threshold must be positive".to_string(),
            ));
        }
        if self.placeholder_text.trim().is_empty() {
            return Err(Error::ConfigurationInvalid(
                "placeholder_text must not be blank".to_string(),
            ));
        }
        if self.untitled_chapter_title.trim().is_empty() {
            return Err(Error::ConfigurationInvalid(
                "untitled_chapter_title must not be blank".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            font_strategy: FontStrategy::default(),
            patterns: PatternSet::default(),
            margin_top: 0.10,
            margin_bottom: 0.10,
            remove_page_markers: true,
            normalize_text: true,
            reconstruct_paragraphs: true,
            untitled_chapter_title: "Chapter".to_string(),
            placeholder_text: "[No text content]".to_string(),
            long_line_threshold: 3000,
            long_token_threshold: 45,
        }
    }
}

/// Strategy for classifying heading fonts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FontStrategy {
    /// The least frequent fraction of font keys are heading fonts
    Frequency {
        /// Fraction of distinct keys classified as headings (rounded down)
        fraction: f32,
    },
    /// 1-D k-means over font sizes; the largest cluster mean is the heading cluster
    SizeClustering {
        /// Upper bound on the number of clusters
        max_clusters: usize,
    },
}

impl FontStrategy {
    /// Frequency threshold strategy with the default 20% fraction.
    pub fn frequency() -> Self {
        FontStrategy::Frequency { fraction: 0.2 }
    }

    /// Size clustering strategy with up to 3 clusters.
    pub fn size_clustering() -> Self {
        FontStrategy::SizeClustering { max_clusters: 3 }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            FontStrategy::Frequency { fraction } => {
                if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
                    return Err(Error::ConfigurationInvalid(format!(
                        "frequency fraction must be within [0, 1], got {}",
                        fraction
                    )));
                }
            }
            FontStrategy::SizeClustering { max_clusters } => {
                if max_clusters == 0 {
                    return Err(Error::ConfigurationInvalid(
                        "max_clusters must be at least 1".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Default for FontStrategy {
    fn default() -> Self {
        Self::frequency()
    }
}

/// Language-tunable keywords and patterns for structural markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternSet {
    /// Keywords introducing a chapter marker ("Chapter 3", "Section 2")
    pub chapter_keywords: Vec<String>,

    /// Keywords introducing a part marker ("Part IV")
    pub part_keywords: Vec<String>,

    /// Keywords introducing an appendix marker ("Appendix B")
    pub appendix_keywords: Vec<String>,

    /// Page marker prefixes ("page 3", "p. 3", "стр. 3")
    pub page_markers: Vec<String>,

    /// Additional regexes with their heading levels, tried after the built-ins
    pub extra_patterns: Vec<CustomPattern>,
}

impl PatternSet {
    /// Create the default English pattern set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add chapter keywords (e.g., "kapitel", "глава").
    pub fn with_chapter_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chapter_keywords
            .extend(keywords.into_iter().map(Into::into));
        self
    }

    /// Add page marker prefixes.
    pub fn with_page_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.page_markers.extend(markers.into_iter().map(Into::into));
        self
    }

    /// Add a custom heading pattern.
    pub fn with_pattern(mut self, pattern: impl Into<String>, level: u8) -> Self {
        self.extra_patterns.push(CustomPattern {
            pattern: pattern.into(),
            level,
        });
        self
    }

    fn validate(&self) -> Result<()> {
        for (name, list) in [
            ("chapter_keywords", &self.chapter_keywords),
            ("part_keywords", &self.part_keywords),
            ("appendix_keywords", &self.appendix_keywords),
        ] {
            if list.is_empty() || list.iter().any(|k| k.trim().is_empty()) {
                return Err(Error::ConfigurationInvalid(format!(
                    "{} must contain only non-blank keywords and at least one",
                    name
                )));
            }
        }
        if self.page_markers.iter().any(|m| m.trim().is_empty()) {
            return Err(Error::ConfigurationInvalid(
                "page_markers must not contain blank entries".to_string(),
            ));
        }
        for custom in &self.extra_patterns {
            if custom.level == 0 {
                return Err(Error::ConfigurationInvalid(format!(
                    "pattern '{}' has level 0",
                    custom.pattern
                )));
            }
            regex::Regex::new(&custom.pattern)?;
        }
        Ok(())
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            chapter_keywords: owned(&["chapter", "section"]),
            part_keywords: owned(&["part"]),
            appendix_keywords: owned(&["appendix"]),
            page_markers: owned(&["page", "p.", "pg.", "стр.", "с.", "seite", "s."]),
            extra_patterns: Vec::new(),
        }
    }
}

/// A caller-supplied heading pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPattern {
    /// Regular expression matched against the trimmed text
    pub pattern: String,
    /// Heading level assigned on match (1 = chapter marker)
    pub level: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_options_builder() {
        let options = AnalysisOptions::new()
            .size_clustering()
            .with_margins(0.12, 0.15)
            .with_paragraphs(false)
            .with_placeholder("(empty)");

        assert_eq!(options.font_strategy, FontStrategy::size_clustering());
        assert_eq!(options.margin_top, 0.12);
        assert_eq!(options.margin_bottom, 0.15);
        assert!(!options.reconstruct_paragraphs);
        assert_eq!(options.placeholder_text, "(empty)");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_default_options() {
        let options = AnalysisOptions::default();
        assert_eq!(options.font_strategy, FontStrategy::Frequency { fraction: 0.2 });
        assert!(options.remove_page_markers);
        assert!(options.reconstruct_paragraphs);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_invalid_margin() {
        let options = AnalysisOptions::new().with_margins(0.6, 0.1);
        assert!(matches!(
            options.validate(),
            Err(Error::ConfigurationInvalid(_))
        ));
    }

    #[test]
    fn test_invalid_fraction() {
        let options =
            AnalysisOptions::new().with_font_strategy(FontStrategy::Frequency { fraction: 1.5 });
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_zero_clusters() {
        let options = AnalysisOptions::new()
            .with_font_strategy(FontStrategy::SizeClustering { max_clusters: 0 });
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_invalid_custom_pattern() {
        let patterns = PatternSet::new().with_pattern("([unclosed", 2);
        let options = AnalysisOptions::new().with_patterns(patterns);
        assert!(matches!(
            options.validate(),
            Err(Error::ConfigurationInvalid(_))
        ));

        let patterns = PatternSet::new().with_pattern(r"^§\s*\d+", 0);
        let options = AnalysisOptions::new().with_patterns(patterns);
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_empty_keywords_rejected() {
        let patterns = PatternSet {
            chapter_keywords: Vec::new(),
            ..PatternSet::default()
        };
        assert!(AnalysisOptions::new()
            .with_patterns(patterns)
            .validate()
            .is_err());
    }

    #[test]
    fn test_deserialize_partial_options() {
        let json = r#"{"margin_top": 0.12, "font_strategy": {"kind": "size_clustering", "max_clusters": 4}}"#;
        let options: AnalysisOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.margin_top, 0.12);
        assert_eq!(options.margin_bottom, 0.10);
        assert_eq!(
            options.font_strategy,
            FontStrategy::SizeClustering { max_clusters: 4 }
        );
        assert_eq!(options.patterns, PatternSet::default());
    }
}
