use crate::model::LabelSet;
use serde::{Deserialize, Serialize};

/// Per-line metadata attached to the first span of each line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LineInfo {
    /// Zero-based line number.
    pub index: usize,

    /// Every label active anywhere on the line (the reserved line label excluded).
    pub labels: LabelSet,
}

/// A maximal run `[start, end)` of text with a constant active-label set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpan {
    pub start: usize,
    pub end: usize,

    /// Labels whose input interval covers this whole span.
    pub labels: LabelSet,

    /// Present when this span opens a line wrapper.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<LineInfo>,

    /// True for the last span of a line (closes the wrapper).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub line_end: bool,
}

impl OutputSpan {
    /// Slice of `text` covered by this span.
    ///
    /// `text` must be the same string the span was resolved against.
    pub fn text<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }

    pub fn starts_line(&self) -> bool {
        self.line.is_some()
    }
}
