//! GitHub-style heading anchors.

use std::collections::HashSet;

/// Generates unique heading anchors within one document.
#[derive(Debug, Default)]
pub struct Anchorizer {
    used: HashSet<String>,
}

impl Anchorizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an explicit id as taken so generated anchors avoid it.
    pub fn reserve(&mut self, id: &str) {
        self.used.insert(id.to_owned());
    }

    /// Build a unique anchor for heading text.
    ///
    /// Text is lowercased, characters other than letters, digits, `-`, `_`
    /// and spaces are dropped, and spaces become `-`. Collisions get a
    /// numeric suffix: `intro`, `intro-1`, `intro-2`.
    pub fn anchorize(&mut self, text: &str) -> String {
        let base = slugify(text);
        let mut candidate = base.clone();
        let mut suffix = 0;
        while self.used.contains(&candidate) {
            suffix += 1;
            candidate = format!("{base}-{suffix}");
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

/// Lowercase slug of heading text without de-duplication.
#[must_use]
pub fn slugify(text: &str) -> String {
    text.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}
