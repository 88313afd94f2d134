//! docstream - a decoder for the main stream of legacy Word binary
//! documents (.doc, Word 97 and later).
//!
//! The crate turns the `WordDocument` and `0Table`/`1Table` streams of a
//! compound document into plain, ordered data: the text pieces, the
//! paragraph and character formatting runs, and the section breaks.
//! Reading the compound file itself is left to the caller, who hands the
//! streams over through [`ole::doc::StreamSource`].
//!
//! # Features
//!
//! - **FIB**: validates the header, the format version and the table stream
//!   selection
//! - **Piece table**: maps character positions to the stored text
//! - **Style sheet**: paragraph and character baselines per style
//! - **Runs**: paragraph and character formatting resolved from the
//!   property modifiers, including the four-state toggle operands
//! - **Sections**: section boundaries and their break kind
//!
//! # Example
//!
//! ```no_run
//! use docstream::ole::doc::{DecodeOptions, MemoryStorage, OleMainStream};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut storage = MemoryStorage::new();
//! storage.insert("WordDocument", std::fs::read("WordDocument.bin")?);
//! storage.insert("1Table", std::fs::read("1Table.bin")?);
//!
//! let stream = OleMainStream::decode(&storage, DecodeOptions::default())?;
//! println!("{}", stream.text()?);
//! for run in stream.character_format_runs() {
//!     println!("{}: bold={} size={}pt", run.document_offset, run.is_bold(), run.font_size_points());
//! }
//! # Ok(())
//! # }
//! ```

/// Shared binary helpers
pub mod common;

/// OLE2-based formats
///
/// Holds the record machinery shared by OLE formats (PLCFs, property
/// modifiers) and the `doc` module for Word documents.
pub mod ole;

pub use ole::doc;
