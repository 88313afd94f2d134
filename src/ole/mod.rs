/// Property list with character positions (PLCF)
pub mod plcf;

/// Property modifier (SPRM) parsing
pub mod sprm;

/// SPRM opcode constants
pub mod sprm_operations;

/// Legacy Word document (.doc) reader
///
/// This module decodes Microsoft Word documents in the legacy binary
/// format (.doc files), which are OLE2-based files.
pub mod doc;
