use crate::model::{Highlights, OutputSpan};
use serde::{Deserialize, Serialize};

/// Body of a `POST /api/log` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRequest {
    pub path: String,
}

/// Successful `/api/log` reply: the file content plus its highlight ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogResponse {
    pub content: String,

    #[serde(default)]
    pub highlights: Highlights,

    /// Path of the file as resolved by the server.
    #[serde(default)]
    pub file_path: String,
}

/// Failed `/api/log` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Top-level JSON document written by `--format json`.
///
/// Wraps the resolved spans with metadata (schema versioning, span encoding,
/// source info) so the output can be consumed by other renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpansFile {
    /// Schema version for this JSON payload.
    pub schema_version: u32,

    pub generator: GeneratorInfo,

    /// How to interpret all offsets contained in this file.
    pub span_encoding: SpanEncoding,

    pub source: SourceInfo,

    pub spans: Vec<OutputSpan>,
}

/// Identifies the program that produced the spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorInfo {
    pub name: String,
    pub version: String,
}

/// Captures how span offsets should be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEncoding {
    pub unit: SpanUnit,
}

impl Default for SpanEncoding {
    fn default() -> Self {
        Self {
            unit: SpanUnit::Byte,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanUnit {
    /// Byte offsets (UTF-8).
    Byte,
}

/// Information about the text the spans were resolved against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// If available, the path of the log file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Length of the text in bytes.
    pub byte_len: u64,

    pub line_count: u64,
}
