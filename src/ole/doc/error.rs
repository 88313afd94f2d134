//! Error types for Word binary decoding.
//!
//! Structural failures that leave the character-position space unknown are
//! fatal for the document. `TruncatedTable` is the one lenient class: it is
//! recorded as a warning and decoding continues.
use crate::common::binary::BinaryError;
use thiserror::Error;

/// Error type for decoding the main stream of a `.doc` file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocError {
    /// The FIB is too short, has an unknown signature, or points outside its
    /// streams.
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// The CLX/piece table is inconsistent with the FIB.
    #[error("Malformed piece table: {0}")]
    MalformedPieceTable(String),

    /// A table or operand stream ended early; the decoded prefix was kept.
    #[error("Truncated {table}: {detail}")]
    TruncatedTable { table: &'static str, detail: String },

    /// Run anchors are not strictly increasing.
    #[error("Out of order {table} run: offset {offset} after {previous}")]
    OutOfOrderRun {
        table: &'static str,
        previous: u32,
        offset: u32,
    },

    /// The file is a Word binary revision this decoder does not read.
    #[error("Unsupported format version: nFib 0x{0:04X}")]
    UnsupportedFormatVersion(u16),

    /// The document is password protected.
    #[error("Document is encrypted")]
    Encrypted,

    /// The container did not supply a required stream.
    #[error("Stream not found: {0}")]
    StreamNotFound(String),
}

impl DocError {
    /// Whether this error aborts decoding.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, DocError::TruncatedTable { .. })
    }

    pub(crate) fn truncated(table: &'static str, detail: impl Into<String>) -> Self {
        DocError::TruncatedTable {
            table,
            detail: detail.into(),
        }
    }

    pub(crate) fn header(err: BinaryError) -> Self {
        DocError::MalformedHeader(err.to_string())
    }

    pub(crate) fn piece_table(err: BinaryError) -> Self {
        DocError::MalformedPieceTable(err.to_string())
    }
}

/// Result type for DOC operations.
pub type Result<T> = std::result::Result<T, DocError>;
