use serde::{Deserialize, Serialize};
use std::fmt;

/// Free-text grouping label of a question (an exam domain such as "Security").
///
/// Blank labels collapse to [`Category::DEFAULT`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Category(String);

impl Category {
    pub const DEFAULT: &'static str = "Uncategorized";

    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::uncategorized();
        }
        Self(trimmed.to_string())
    }

    /// Build a category from an optional label, defaulting when absent.
    #[must_use]
    pub fn from_optional(value: Option<String>) -> Self {
        value.map_or_else(Self::uncategorized, Self::new)
    }

    #[must_use]
    pub fn uncategorized() -> Self {
        Self(Self::DEFAULT.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_uncategorized(&self) -> bool {
        self.0 == Self::DEFAULT
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::uncategorized()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_missing_labels_default() {
        assert!(Category::new("   ").is_uncategorized());
        assert_eq!(Category::from_optional(None).as_str(), "Uncategorized");
    }

    #[test]
    fn labels_are_trimmed() {
        assert_eq!(Category::new("  Security ").as_str(), "Security");
    }
}
