//! Spans -> HTML renderer.
//!
//! This module operates **only** on resolved spans plus the text they were
//! resolved against; it never looks at the original intervals.
//!
//! Each line is wrapped in `<span class="line line-<label>...">` carrying every
//! label active anywhere on the line, and each labeled run is wrapped in
//! `<span class="highlight-<label>...">`. Category colors only apply while the
//! container carries the matching `enable-highlight-<label>` class (see [`page`]).

pub mod page;

use crate::model::{LabelSet, OutputSpan};
use crate::resolve::collect_lines;
use regex::{Regex, RegexBuilder};

/// Class added to line wrappers rejected by the line filter.
pub const DIMMED_CLASS: &str = "dimmed";

/// Regex line filter: lines that do not match are dimmed, not removed.
#[derive(Debug, Clone)]
pub struct LineFilter {
    regex: Regex,
    invert: bool,
}

impl LineFilter {
    pub fn new(pattern: &str, ignore_case: bool, invert: bool) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(ignore_case)
            .build()?;
        Ok(Self { regex, invert })
    }

    /// True if the line should stay fully visible.
    pub fn keeps(&self, line: &str) -> bool {
        self.regex.is_match(line) != self.invert
    }
}

/// Rendering options that control markup decisions.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Prefix applied to labels on highlight spans.
    pub highlight_class_prefix: String,

    /// Prefix applied to labels on line wrappers.
    pub line_class_prefix: String,

    /// If set, lines the filter rejects get the [`DIMMED_CLASS`] class.
    pub line_filter: Option<LineFilter>,

    /// Categories enabled on the page container. `None` enables every
    /// category present in the text.
    pub enabled: Option<Vec<String>>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            highlight_class_prefix: "highlight-".to_string(),
            line_class_prefix: "line-".to_string(),
            line_filter: None,
            enabled: None,
        }
    }
}

pub fn render_html(text: &str, spans: &[OutputSpan]) -> String {
    render_html_with_options(text, spans, &RenderOptions::default())
}

/// Serialize spans to an HTML fragment. All text is escaped, so arbitrary
/// file content can never inject markup.
pub fn render_html_with_options(text: &str, spans: &[OutputSpan], opts: &RenderOptions) -> String {
    let lines = match opts.line_filter {
        Some(_) => collect_lines(text),
        None => Vec::new(),
    };

    let mut out = String::with_capacity(text.len() + spans.len() * 32);
    for span in spans {
        if let Some(line) = &span.line {
            let dimmed = match (&opts.line_filter, lines.get(line.index)) {
                (Some(filter), Some(range)) => !filter.keeps(&text[range.start..range.end]),
                _ => false,
            };
            out.push_str("<span class=\"line");
            if !line.labels.is_empty() {
                out.push(' ');
                push_classes(&mut out, &line.labels, &opts.line_class_prefix);
            }
            if dimmed {
                out.push(' ');
                out.push_str(DIMMED_CLASS);
            }
            out.push_str("\">");
        }

        if !span.labels.is_empty() {
            out.push_str("<span class=\"");
            push_classes(&mut out, &span.labels, &opts.highlight_class_prefix);
            out.push_str("\">");
        }

        html_escape::encode_quoted_attribute_to_string(span.text(text), &mut out);

        if !span.labels.is_empty() {
            out.push_str("</span>");
        }
        if span.line_end {
            out.push_str("</span>");
        }
    }
    out
}

fn push_classes(out: &mut String, labels: &LabelSet, prefix: &str) {
    let classes = labels.to_class_string(prefix);
    html_escape::encode_double_quoted_attribute_to_string(&classes, out);
}
