//! Error taxonomy for description interpretation.
//!
//! Every variant is fatal: the run stops, already-flushed records stay
//! in the output file, and nothing is rolled back.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while interpreting a description tree.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The description file could not be read.
    #[error("cannot read description '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The description file is not well-formed XML.
    #[error("cannot parse description '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },

    /// The tree has no DDFModule marker node.
    #[error("cannot find DDFModule node in '{path}'")]
    MissingModule { path: PathBuf },

    /// Field definition tags disagree on width.
    #[error("field tag '{tag}' has length {actual}, other definitions use {expected}")]
    TagWidth {
        tag: String,
        expected: usize,
        actual: usize,
    },

    /// A record names a field the catalog never declared.
    #[error("record references undeclared field '{name}'")]
    UndeclaredField { name: String },

    /// A 0x literal is not decodable hex.
    #[error("malformed hex literal '0x{literal}': {source}")]
    HexLiteral {
        literal: String,
        #[source]
        source: hex::FromHexError,
    },

    /// Encoder-side failure.
    #[error(transparent)]
    Encode(#[from] ddf_8211::DdfError),
}

/// Result type alias for description interpretation.
pub type Result<T> = std::result::Result<T, ComposeError>;
