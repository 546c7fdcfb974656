use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::DEFAULT_TAGS;

/// Ordered, de-duplicated set of event tags based on [`BTreeSet`].
///
/// Tags are trimmed on insert and empty values are dropped, so `"fdb, production"` style
/// input from the shell or a YAML scalar ends up as clean individual tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(BTreeSet<String>);

impl Tags {
    /// Create an empty set of tags.
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Insert a tag. Returns `self` for chaining.
    pub fn insert(&mut self, tag: impl AsRef<str>) -> &mut Self {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() {
            self.0.insert(tag.to_string());
        }
        self
    }

    /// Return a copy with `tag` added.
    pub fn with(mut self, tag: impl AsRef<str>) -> Self {
        self.insert(tag);
        self
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    /// Iterate through all tags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Parse a comma-separated list (`"fdb, production, backup"`).
    pub fn parse_csv(s: &str) -> Self {
        s.split(',').collect()
    }
}

impl Default for Tags {
    fn default() -> Self {
        DEFAULT_TAGS.into_iter().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Tags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tags = Tags::new();
        for tag in iter {
            tags.insert(tag);
        }
        tags
    }
}
