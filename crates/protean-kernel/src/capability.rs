//! Capability tags and ordered capability sets.
//!
//! A capability tag names a contract an object is declared to satisfy;
//! dispatch elsewhere in a host system selects behavior by scanning a
//! capability set front to back. Order is therefore part of the contract:
//! the most specific tag comes first, and composition must never let a
//! later tag shadow an earlier one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named contract, e.g. `"content.document"` or `"behavior.versionable"`.
///
/// Tags are compared by name. Identity of the *sets* that carry them is
/// tracked separately (see [`crate::resolver::ResolvedCapabilities`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CapabilityTag(pub String);

impl CapabilityTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CapabilityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered set of capability tags, most specific first.
///
/// Duplicates are collapsed on construction, keeping the first occurrence
/// so that first-match-wins scans see the most specific declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    tags: Vec<CapabilityTag>,
}

impl CapabilitySet {
    pub fn new(tags: impl IntoIterator<Item = CapabilityTag>) -> Self {
        let mut out = Self::empty();
        for tag in tags {
            out.push(tag);
        }
        out
    }

    /// Convenience constructor from tag names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(CapabilityTag::new))
    }

    pub fn empty() -> Self {
        Self { tags: Vec::new() }
    }

    pub fn tags(&self) -> &[CapabilityTag] {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CapabilityTag> {
        self.tags.iter()
    }

    /// Compose a new set from `leading` tags followed by every tag of `base`.
    ///
    /// Ordering contract: leading tags keep their given order and precede
    /// the base set; duplicates keep their first (most specific) position.
    pub fn compose(leading: impl IntoIterator<Item = CapabilityTag>, base: &CapabilitySet) -> Self {
        let mut out = Self::empty();
        for tag in leading {
            out.push(tag);
        }
        for tag in &base.tags {
            out.push(tag.clone());
        }
        out
    }

    fn push(&mut self, tag: CapabilityTag) {
        if !self.contains(tag.name()) {
            self.tags.push(tag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_dedups_keeping_first_occurrence() {
        let set = CapabilitySet::from_names(["a", "b", "a", "c", "b"]);
        let names: Vec<&str> = set.iter().map(CapabilityTag::name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn compose_prepends_leading_tags_in_order() {
        let base = CapabilitySet::from_names(["x", "y"]);
        let composed = CapabilitySet::compose(
            [CapabilityTag::new("schema"), CapabilityTag::new("sub")],
            &base,
        );
        let names: Vec<&str> = composed.iter().map(CapabilityTag::name).collect();
        assert_eq!(names, vec!["schema", "sub", "x", "y"]);
    }

    #[test]
    fn compose_never_lets_base_shadow_leading_tags() {
        let base = CapabilitySet::from_names(["schema", "y"]);
        let composed = CapabilitySet::compose([CapabilityTag::new("schema")], &base);
        let names: Vec<&str> = composed.iter().map(CapabilityTag::name).collect();
        assert_eq!(names, vec!["schema", "y"]);
    }

    #[test]
    fn contains_matches_by_name() {
        let set = CapabilitySet::from_names(["content.item"]);
        assert!(set.contains("content.item"));
        assert!(!set.contains("content.container"));
    }
}
