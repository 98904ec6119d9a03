//! Standalone HTML page: stylesheet, category toggles and the rendered log.

use crate::model::{LabelSet, OutputSpan};
use crate::render::{RenderOptions, render_html_with_options};

/// Built-in category colors: `(label, background, foreground)`.
pub const CATEGORY_COLORS: &[(&str, &str, &str)] = &[
    ("datetime", "rgba(78, 201, 176, 0.2)", "#4ec9b0"),
    ("error", "rgba(244, 71, 71, 0.2)", "#f44747"),
    ("warning", "rgba(255, 204, 2, 0.2)", "#ffcc02"),
    ("info", "rgba(55, 148, 255, 0.2)", "#3794ff"),
    ("debug", "rgba(181, 206, 168, 0.2)", "#b5cea8"),
    ("stderr", "rgba(255, 107, 107, 0.2)", "#ff6b6b"),
    ("fatal", "rgba(255, 0, 102, 0.2)", "#ff0066"),
];

/// Metadata shown in the page header.
#[derive(Debug, Clone, Default)]
pub struct PageMeta {
    pub title: String,

    /// Modification date of the source, if known.
    pub modified: Option<String>,
}

/// Stylesheet with one rule per built-in category, active only under the
/// matching `enable-` class:
///
/// `.enable-highlight-error .highlight-error { background-color: ...; color: ...; }`
pub fn stylesheet(opts: &RenderOptions) -> String {
    let mut out = String::new();
    for (label, background, color) in CATEGORY_COLORS {
        let class = format!("{}{}", opts.highlight_class_prefix, label);
        out.push_str(&format!(
            ".enable-{class} .{class} {{ background-color: {background}; color: {color}; }}\n"
        ));
    }
    out.push_str(".dimmed { opacity: 0.4; }\n");
    out
}

/// Categories to enable on the container: the explicit list from the options,
/// else every label present in `spans`.
pub fn enabled_categories(spans: &[OutputSpan], opts: &RenderOptions) -> LabelSet {
    match &opts.enabled {
        Some(list) => list.iter().map(String::as_str).collect(),
        None => {
            let mut set = LabelSet::new();
            for s in spans {
                set.extend_from(&s.labels);
            }
            set
        }
    }
}

pub fn render_page(meta: &PageMeta, text: &str, spans: &[OutputSpan], opts: &RenderOptions) -> String {
    let title = html_escape::encode_text(&meta.title);
    let enabled = enabled_categories(spans, opts);

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{title}</title>\n"));
    out.push_str("<style>\n");
    out.push_str(&stylesheet(opts));
    out.push_str("</style>\n</head>\n<body>\n");

    out.push_str(&format!("<h1>{title}</h1>\n"));
    if let Some(modified) = &meta.modified {
        out.push_str(&format!(
            "<p class=\"meta\">Log modified: {}</p>\n",
            html_escape::encode_text(modified)
        ));
    }

    out.push_str("<pre id=\"log-viewer\"");
    if !enabled.is_empty() {
        let classes = enabled.to_class_string(&format!("enable-{}", opts.highlight_class_prefix));
        out.push_str(" class=\"");
        html_escape::encode_double_quoted_attribute_to_string(&classes, &mut out);
        out.push('"');
    }
    out.push('>');
    out.push_str(&render_html_with_options(text, spans, opts));
    out.push_str("</pre>\n</body>\n</html>\n");
    out
}
