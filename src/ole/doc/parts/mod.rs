/// Internal parts for parsing DOC file structures.
///
/// This module contains parsers for the binary structures used in
/// legacy Word documents, including:
/// - FIB (File Information Block)
/// - Piece table
/// - Style sheet
/// - Character, paragraph and section properties
pub mod bin_table;
pub mod chp;
pub mod fib;
pub mod fkp;
pub mod operand;
pub mod pap;
pub mod piece_table;
pub mod sep;
pub mod stylesheet;
