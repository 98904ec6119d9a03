use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A half-open byte range `[start, end)` into the log text, as sent by the log
/// server for one highlight match.
///
/// Offsets are measured in bytes (UTF-8). This is deliberate:
/// - It matches Rust string indexing constraints.
/// - It stays stable even when the text contains multi-byte Unicode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Hash)]
pub struct Highlight {
    pub start: usize,
    pub end: usize,
}

impl Highlight {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "Highlight start must be <= end");
        Self { start, end }
    }
}

/// Category label -> highlight ranges, the `highlights` object of an `/api/log` reply.
///
/// A `BTreeMap` keeps label iteration alphabetical, so flattening is deterministic.
pub type Highlights = BTreeMap<String, Vec<Highlight>>;

/// A labeled half-open interval `[start, end)` over the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Interval {
    pub start: usize,
    pub end: usize,
    pub label: String,
}

impl Interval {
    pub fn new(start: usize, end: usize, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    #[inline]
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }
}

/// Flatten a highlight map into labeled intervals, labels in map order and
/// ranges in their given order.
pub fn flatten_highlights(highlights: &Highlights) -> Vec<Interval> {
    highlights
        .iter()
        .flat_map(|(label, ranges)| {
            ranges
                .iter()
                .map(move |h| Interval::new(h.start, h.end, label.as_str()))
        })
        .collect()
}
