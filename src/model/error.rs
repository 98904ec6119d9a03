use thiserror::Error;

/// Errors produced while resolving highlight intervals into spans.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// An interval is out of range, reversed, or splits a UTF-8 character.
    #[error("invalid interval {label:?} [{start}, {end}) for text of length {len}: {reason}")]
    InvalidInterval {
        label: String,
        start: usize,
        end: usize,
        len: usize,
        reason: &'static str,
    },

    /// The input does not have the expected shape (e.g. a reserved or empty label).
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

/// Result type for resolver operations.
pub type ResolveResult<T> = Result<T, ResolveError>;
