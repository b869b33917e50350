//! Case-insensitive tag sets
//!
//! Skills, certifications and drone capabilities are free-form labels typed
//! by operators ("Mapping", "mapping ", "MAPPING"). Membership folds case and
//! surrounding whitespace; the first spelling seen is kept for display.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Set of labels compared case-insensitively
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    /// Folded key -> display spelling
    tags: BTreeMap<String, String>,
}

fn fold(tag: &str) -> String {
    tag.trim().to_lowercase()
}

impl TagSet {
    /// Create an empty tag set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated cell ("Mapping, Survey"). Blank entries are dropped.
    pub fn parse_list(cell: &str) -> Self {
        cell.split(',').collect()
    }

    /// Insert a tag, keeping the existing spelling if already present
    pub fn insert(&mut self, tag: &str) -> bool {
        let key = fold(tag);
        if key.is_empty() || self.tags.contains_key(&key) {
            return false;
        }
        self.tags.insert(key, tag.trim().to_string());
        true
    }

    /// Case-insensitive membership
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains_key(&fold(tag))
    }

    /// True when every tag in `self` is present in `other`
    pub fn is_subset_of(&self, other: &TagSet) -> bool {
        self.tags.keys().all(|k| other.tags.contains_key(k))
    }

    /// Tags of `self` absent from `other`, in display spelling
    pub fn missing_from<'a>(&'a self, other: &TagSet) -> Vec<&'a str> {
        self.tags
            .iter()
            .filter(|(k, _)| !other.tags.contains_key(*k))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Iterate display spellings in folded order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Render as a comma-separated cell
    pub fn to_list(&self) -> String {
        self.iter().collect::<Vec<_>>().join(", ")
    }
}

impl<'a> FromIterator<&'a str> for TagSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_list())
    }
}

impl Serialize for TagSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for TagSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tags = Vec::<String>::deserialize(deserializer)?;
        Ok(tags.iter().map(String::as_str).collect())
    }
}
