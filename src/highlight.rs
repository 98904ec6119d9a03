//! Regex-based highlight generation.
//!
//! Produces the same `label -> [{start, end}]` map a log server returns from
//! `/api/log`, so local files and remote files go through the same resolver.

use crate::model::{Highlight, Highlights, LINE_LABEL};
use crate::resolve::collect_lines;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::{fs, io};
use thiserror::Error;

/// Label used for every datetime pattern match.
pub const DATETIME_LABEL: &str = "datetime";

#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("invalid pattern for {label:?}: {source}")]
    Pattern {
        label: String,
        #[source]
        source: regex::Error,
    },

    #[error("label {0:?} is reserved for line wrappers")]
    ReservedLabel(String),

    #[error("invalid pattern config: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("failed to read pattern config: {0}")]
    Io(#[from] io::Error),
}

pub type HighlightResult<T> = Result<T, HighlightError>;

/// Highlight patterns, loadable from YAML:
///
/// ```yaml
/// datetime:
///   - '\d{4}-\d{2}-\d{2}[\sT]\d{2}:\d{2}:\d{2}'
/// words:
///   error: '(?i)\b(error|err)\b'
/// ```
///
/// Missing keys fall back to the built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Patterns whose matches are labeled `datetime`.
    pub datetime: Vec<String>,

    /// Category label -> pattern.
    pub words: BTreeMap<String, String>,
}

impl Default for PatternConfig {
    fn default() -> Self {
        let datetime = [
            r"\d{4}-\d{2}-\d{2}[\sT]\d{2}:\d{2}:\d{2}", // ISO
            r"\d{2}/\d{2}/\d{4}\s\d{2}:\d{2}:\d{2}",    // US
            r"\d{2}-\d{2}-\d{4}\s\d{2}:\d{2}:\d{2}",    // EU
            r"\w{3}\s+\d{1,2}\s+\d{2}:\d{2}:\d{2}",     // syslog
        ];
        let words = [
            ("error", r"(?i)\b(error|err)\b"),
            ("warning", r"(?i)\b(warning|warn)\b"),
            ("info", r"(?i)\b(info|information)\b"),
            ("debug", r"(?i)\b(debug|dbg)\b"),
            ("stderr", r"(?i)\b(stderr)\b"),
            ("fatal", r"(?i)\b(fatal|critical|crit)\b"),
        ];

        Self {
            datetime: datetime.iter().map(|s| s.to_string()).collect(),
            words: words
                .iter()
                .map(|(l, p)| (l.to_string(), p.to_string()))
                .collect(),
        }
    }
}

impl PatternConfig {
    pub fn from_yaml_str(yaml: &str) -> HighlightResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: &Path) -> HighlightResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn compile(&self) -> HighlightResult<Highlighter> {
        let compile_one = |label: &str, pattern: &str| {
            Regex::new(pattern).map_err(|source| HighlightError::Pattern {
                label: label.to_string(),
                source,
            })
        };

        let datetime = self
            .datetime
            .iter()
            .map(|p| compile_one(DATETIME_LABEL, p))
            .collect::<HighlightResult<Vec<_>>>()?;

        let mut words = Vec::with_capacity(self.words.len());
        for (label, pattern) in &self.words {
            if label == LINE_LABEL {
                return Err(HighlightError::ReservedLabel(label.clone()));
            }
            words.push((label.clone(), compile_one(label, pattern)?));
        }

        Ok(Highlighter { datetime, words })
    }
}

/// Compiled form of a [`PatternConfig`].
#[derive(Debug, Clone)]
pub struct Highlighter {
    datetime: Vec<Regex>,
    words: Vec<(String, Regex)>,
}

impl Highlighter {
    /// Highlighter for the built-in patterns.
    pub fn with_defaults() -> HighlightResult<Self> {
        PatternConfig::default().compile()
    }

    /// Match every pattern line by line; matches never cross a newline.
    ///
    /// Every configured category appears as a key, even with no matches.
    pub fn highlight(&self, text: &str) -> Highlights {
        let mut out = Highlights::new();
        if !self.datetime.is_empty() {
            out.insert(DATETIME_LABEL.to_string(), Vec::new());
        }
        for (label, _) in &self.words {
            out.insert(label.clone(), Vec::new());
        }

        for line in collect_lines(text) {
            let content = &text[line.start..line.end];

            for re in &self.datetime {
                let ranges = out.entry(DATETIME_LABEL.to_string()).or_default();
                for m in re.find_iter(content) {
                    ranges.push(Highlight::new(line.start + m.start(), line.start + m.end()));
                }
            }

            for (label, re) in &self.words {
                let ranges = out.entry(label.clone()).or_default();
                for m in re.find_iter(content) {
                    ranges.push(Highlight::new(line.start + m.start(), line.start + m.end()));
                }
            }
        }
        out
    }
}
