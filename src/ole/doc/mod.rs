/// Word (.doc) document support.
///
/// This module decodes the main stream of Microsoft Word documents in the
/// legacy binary format (.doc files).
///
/// # Architecture
///
/// - `OleMainStream`: runs the table decoders and publishes their results
/// - `parts`: one decoder per on-disk structure (FIB, piece table, style
///   sheet, bin tables, FKPs, section table) plus the property cascade
/// - `StreamSource`: where the streams come from
///
/// # DOC File Structure
///
/// A .doc file is an OLE2 structured storage containing several streams:
/// - **WordDocument**: FIB, text, FKP pages and SEPXs
/// - **1Table** or **0Table**: piece table, style sheet, bin tables and the
///   section table
///
/// # Example
///
/// ```rust
/// use docstream::ole::doc::{DecodeOptions, DocError, MemoryStorage, OleMainStream};
///
/// let storage = MemoryStorage::new();
/// let result = OleMainStream::decode(&storage, DecodeOptions::default());
/// assert!(matches!(result, Err(DocError::StreamNotFound(_))));
/// ```
pub mod error;
pub mod main_stream;
pub mod options;
pub mod parts;
pub mod storage;

#[cfg(test)]
pub(crate) mod fixture;

pub use error::{DocError, Result};
pub use main_stream::OleMainStream;
pub use options::DecodeOptions;
pub use parts::chp::{CharacterFormat, FontStyle};
pub use parts::pap::{Alignment, ParagraphFormat};
pub use parts::piece_table::Piece;
pub use parts::sep::SectionBreak;
pub use parts::stylesheet::{StyleSheet, StyleSheetEntry};
pub use storage::{MemoryStorage, StreamSource, WORD_DOCUMENT_STREAM};
