//! Table-of-contents entries.

use serde::{Deserialize, Serialize};

/// A table-of-contents line detected in the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Full label (section number and title)
    pub label: String,

    /// Outline number such as "5.2.3", when present
    pub section: Option<String>,

    /// Title without the outline number
    pub title: String,

    /// Target page number
    pub page: u32,
}

impl TocEntry {
    /// Create a new entry.
    pub fn new(section: Option<String>, title: impl Into<String>, page: u32) -> Self {
        let title = title.into();
        let label = match &section {
            Some(section) => format!("{} {}", section, title),
            None => title.clone(),
        };
        Self {
            label,
            section,
            title,
            page,
        }
    }

    /// The `(label, page)` pair.
    pub fn as_pair(&self) -> (&str, u32) {
        (&self.label, self.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_with_section() {
        let entry = TocEntry::new(Some("5.2.3".to_string()), "Method Name", 30);
        assert_eq!(entry.as_pair(), ("5.2.3 Method Name", 30));
    }

    #[test]
    fn test_label_without_section() {
        let entry = TocEntry::new(None, "Preface", 7);
        assert_eq!(entry.label, "Preface");
        assert!(entry.section.is_none());
    }
}
