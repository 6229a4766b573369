//! Extension filtering for directory scans.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Case-insensitive set of file extensions a scan should keep.
///
/// An empty filter accepts every file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtensionFilter {
    extensions: BTreeSet<String>,
}

impl ExtensionFilter {
    /// Create a filter that accepts every file.
    pub fn any() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list such as `"jpg, .PNG ,txt"`.
    ///
    /// Tokens are trimmed, a single leading dot is dropped, and the result
    /// is lowercased. Empty tokens are ignored.
    pub fn parse(list: &str) -> Self {
        Self::from_iter(list.split(','))
    }

    /// Check whether the filter is empty (accepts everything).
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Number of extensions in the filter.
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Iterate over the normalised extensions.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    /// Check whether a path passes the filter.
    pub fn matches(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }

        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.extensions.contains(&ext))
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExtensionFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let extensions = iter
            .into_iter()
            .filter_map(|token| {
                let token = token.as_ref().trim();
                let token = token.strip_prefix('.').unwrap_or(token);
                (!token.is_empty()).then(|| token.to_lowercase())
            })
            .collect();

        Self { extensions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalises_tokens() {
        let filter = ExtensionFilter::parse(" jpg, .PNG ,,txt ");
        let exts: Vec<_> = filter.iter().collect();
        assert_eq!(exts, vec!["jpg", "png", "txt"]);
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = ExtensionFilter::parse("");
        assert!(filter.is_empty());
        assert!(filter.matches(Path::new("/tmp/a.bin")));
        assert!(filter.matches(Path::new("/tmp/Makefile")));
    }

    #[test]
    fn test_matches_case_insensitive() {
        let filter = ExtensionFilter::parse("jpg");
        assert!(filter.matches(Path::new("photo.JPG")));
        assert!(filter.matches(Path::new("photo.jpg")));
        assert!(!filter.matches(Path::new("photo.jpeg")));
        assert!(!filter.matches(Path::new("jpg")));
    }
}
