//! Highlight data model.
//!
//! This module defines the **contract** between:
//! 1) the log server (or local generator) producing labeled ranges, and
//! 2) the resolver/renderer turning them into nested markup.
//!
//! Design goals:
//! - Offsets are byte offsets into the raw text (no normalization).
//! - Deterministic label ordering, so rendered output is stable.
//! - Stable JSON representation matching the `/api/log` wire format.

mod envelope;
mod error;
mod interval;
mod label_set;
mod span;

pub use envelope::*;
pub use error::*;
pub use interval::*;
pub use label_set::*;
pub use span::*;

/// JSON schema version for the spans envelope.
///
/// Bump this when making non-backwards-compatible changes to the JSON structure.
pub const SCHEMA_VERSION: u32 = 1;

/// The generator name stored in the JSON envelope.
pub const GENERATOR_NAME: &str = "loglight";

/// The generator version stored in the JSON envelope.
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Label reserved for the synthetic per-line intervals.
pub const LINE_LABEL: &str = "all";
