use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An ordered set of category labels.
///
/// Iteration (and therefore rendered class order) is alphabetical, so two
/// resolutions of the same input always produce the same markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default, Hash)]
#[serde(transparent)]
pub struct LabelSet(BTreeSet<String>);

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the label was newly added.
    pub fn insert(&mut self, label: impl Into<String>) -> bool {
        self.0.insert(label.into())
    }

    pub fn remove(&mut self, label: &str) -> bool {
        self.0.remove(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Add every label of `other` to `self`.
    pub fn extend_from(&mut self, other: &LabelSet) {
        for l in other.iter() {
            if !self.0.contains(l) {
                self.0.insert(l.to_string());
            }
        }
    }

    /// Join labels with a separator after applying `prefix` to each one.
    ///
    /// Example: `{"error", "datetime"}` with prefix `highlight-` ->
    /// `highlight-datetime highlight-error`.
    pub fn to_class_string(&self, prefix: &str) -> String {
        let mut out = String::new();
        for (i, l) in self.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(prefix);
            out.push_str(l);
        }
        out
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_string_is_alphabetical() {
        let mut set = LabelSet::new();
        set.insert("warning");
        set.insert("error");
        set.insert("datetime");
        assert_eq!(
            set.to_class_string("highlight-"),
            "highlight-datetime highlight-error highlight-warning"
        );
    }

    #[test]
    fn duplicates_have_no_effect() {
        let mut set: LabelSet = ["x", "y"].into_iter().collect();
        assert!(!set.insert("x"));
        assert_eq!(set.len(), 2);
        assert!(set.remove("x"));
        assert!(!set.contains("x"));
    }
}
