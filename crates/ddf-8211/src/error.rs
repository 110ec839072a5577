//! Error types for DDF container writing.

use thiserror::Error;

/// Errors that can occur when building or writing a DDF container.
#[derive(Debug, Error)]
pub enum DdfError {
    /// A numeric leader or directory slot cannot hold its value.
    #[error("{what} {value} does not fit in {width} ASCII digits")]
    NumericOverflow {
        what: &'static str,
        value: usize,
        width: usize,
    },

    /// A field tag does not match the directory's tag width.
    #[error("tag '{tag}' has length {actual}, directory expects {expected}")]
    TagWidth {
        tag: String,
        expected: usize,
        actual: usize,
    },

    /// Two field definitions share one tag.
    #[error("duplicate field tag '{tag}'")]
    DuplicateTag { tag: String },

    /// An entry-map size digit is outside 1..=9.
    #[error("{what} must be a single digit 1-9, got {value}")]
    InvalidSizeField { what: &'static str, value: usize },

    /// A subfield format control could not be parsed.
    #[error("unrecognized subfield format '{format}'")]
    UnknownFormat { format: String },

    /// A fixed-width text slot cannot hold its value.
    #[error("value '{value}' does not fit subfield width {width}")]
    ValueOverflow { value: String, width: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for DDF operations.
pub type Result<T> = std::result::Result<T, DdfError>;
