/// SPRM opcodes understood by the property decoders.
///
/// # SPRM Structure
///
/// A SPRM consists of:
/// - **Opcode** (2 bytes): Encodes the operation type and size
///   - Bits 0-8: Operation code
///   - Bit 9: Special flag
///   - Bits 10-12: Property group (PAP=1, CHP=2, PIC=3, SEP=4, TAP=5)
///   - Bits 13-15: Size code (determines operand size)
/// - **Operand** (variable): The data for the operation
///
/// Opcodes not listed here are skipped by the decoders after their operand
/// has been consumed.

// CHP (Character Properties) SPRM opcodes

/// sprmCFRMarkDel - Text is marked as deleted by a revision
pub const SPRM_C_F_RMARK_DEL: u16 = 0x0800;

/// sprmCIstd - Character style index
pub const SPRM_C_ISTD: u16 = 0x4A30;

/// sprmCDefault - Clear emphasis back to off
pub const SPRM_C_DEFAULT: u16 = 0x2A32;

/// sprmCPlain - Reset to the paragraph style's character properties
pub const SPRM_C_PLAIN: u16 = 0x2A33;

/// sprmCFBold - Bold
pub const SPRM_C_F_BOLD: u16 = 0x0835;

/// sprmCFItalic - Italic
pub const SPRM_C_F_ITALIC: u16 = 0x0836;

/// sprmCFStrike - Strikethrough
pub const SPRM_C_F_STRIKE: u16 = 0x0837;

/// sprmCFSmallCaps - Small caps
pub const SPRM_C_F_SMALL_CAPS: u16 = 0x083A;

/// sprmCFCaps - All caps
pub const SPRM_C_F_CAPS: u16 = 0x083B;

/// sprmCFVanish - Hidden text
pub const SPRM_C_F_VANISH: u16 = 0x083C;

/// sprmCKul - Underline style
pub const SPRM_C_KUL: u16 = 0x2A3E;

/// sprmCHps - Font size in half-points
pub const SPRM_C_HPS: u16 = 0x4A43;

/// sprmCIss - Superscript/subscript
pub const SPRM_C_ISS: u16 = 0x2A48;

// PAP (Paragraph Properties) SPRM opcodes

/// sprmPIstd - Paragraph style index
pub const SPRM_P_ISTD: u16 = 0x4600;

/// sprmPJc80 - Physical justification
pub const SPRM_P_JC80: u16 = 0x2403;

/// sprmPJc - Logical justification
pub const SPRM_P_JC: u16 = 0x2461;

/// sprmPFPageBreakBefore - Page break before paragraph
pub const SPRM_P_F_PAGE_BREAK_BEFORE: u16 = 0x2407;

/// sprmPDxaRight80 - Right indent
pub const SPRM_P_DXA_RIGHT80: u16 = 0x840E;

/// sprmPDxaLeft80 - Left indent
pub const SPRM_P_DXA_LEFT80: u16 = 0x840F;

/// sprmPDxaLeft180 - First line indent
pub const SPRM_P_DXA_LEFT1_80: u16 = 0x8411;

/// sprmPDyaBefore - Space before paragraph
pub const SPRM_P_DYA_BEFORE: u16 = 0xA413;

/// sprmPDyaAfter - Space after paragraph
pub const SPRM_P_DYA_AFTER: u16 = 0xA414;

/// sprmPDxaRight - Right indent (logical)
pub const SPRM_P_DXA_RIGHT: u16 = 0x845D;

/// sprmPDxaLeft - Left indent (logical)
pub const SPRM_P_DXA_LEFT: u16 = 0x845E;

/// sprmPDxaLeft1 - First line indent (logical)
pub const SPRM_P_DXA_LEFT1: u16 = 0x8460;

// SEP (Section Properties) SPRM opcodes

/// sprmSBkc - Section break kind
pub const SPRM_S_BKC: u16 = 0x3009;
