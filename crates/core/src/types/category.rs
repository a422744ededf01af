//! Category filter with the virtual `"all"` category.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The active catalog filter.
///
/// `"all"` is a sentinel, not a real category: it selects every product.
/// Any other label is accepted without checking it against the loaded
/// category list, so a filter can be chosen before categories arrive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    /// Every product.
    #[default]
    All,
    /// Products whose category label matches exactly.
    Category(String),
}

impl CategoryFilter {
    /// Label of the virtual category that matches everything.
    pub const ALL_LABEL: &'static str = "all";

    /// Build a filter from a label; `"all"` maps to [`CategoryFilter::All`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label == Self::ALL_LABEL {
            Self::All
        } else {
            Self::Category(label.to_owned())
        }
    }

    /// The label this filter was built from.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => Self::ALL_LABEL,
            Self::Category(label) => label,
        }
    }

    /// Whether a product in `category` passes this filter.
    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Category(label) => label == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for CategoryFilter {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<&str> for CategoryFilter {
    fn from(label: &str) -> Self {
        Self::from_label(label)
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        match filter {
            CategoryFilter::All => CategoryFilter::ALL_LABEL.to_owned(),
            CategoryFilter::Category(label) => label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sentinel() {
        assert_eq!(CategoryFilter::from_label("all"), CategoryFilter::All);
        assert!(CategoryFilter::All.matches("anything"));
    }

    #[test]
    fn test_category_matches_exactly() {
        let filter = CategoryFilter::from("home");
        assert!(filter.matches("home"));
        assert!(!filter.matches("Home"));
        assert_eq!(filter.label(), "home");
    }

    #[test]
    fn test_unknown_label_is_accepted() {
        let filter = CategoryFilter::from_label("jewelery");
        assert_eq!(filter, CategoryFilter::Category("jewelery".to_owned()));
    }
}
