//! Rendering options and configuration.

/// Options for rendering an analyzed document.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Include YAML frontmatter with title, author and metadata
    pub include_frontmatter: bool,

    /// Render each chapter's heading tree as a nested outline list
    pub include_outline: bool,

    /// Include detected table-of-contents entries
    pub include_toc: bool,

    /// Deepest heading level shown in outlines (1-6)
    pub max_heading_level: u8,

    /// Escape special Markdown characters in content
    pub escape_special_chars: bool,

    /// Character to use for outline list markers
    pub list_marker: char,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Enable or disable the heading outline.
    pub fn with_outline(mut self, include: bool) -> Self {
        self.include_outline = include;
        self
    }

    /// Enable or disable table-of-contents output.
    pub fn with_toc(mut self, include: bool) -> Self {
        self.include_toc = include;
        self
    }

    /// Set the maximum heading level.
    pub fn with_max_heading(mut self, level: u8) -> Self {
        self.max_heading_level = level.clamp(1, 6);
        self
    }

    /// Enable or disable Markdown escaping.
    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.escape_special_chars = escape;
        self
    }

    /// Set the list marker character.
    pub fn with_list_marker(mut self, marker: char) -> Self {
        self.list_marker = marker;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_frontmatter: false,
            include_outline: false,
            include_toc: false,
            max_heading_level: 6,
            escape_special_chars: true,
            list_marker: '-',
        }
    }
}
