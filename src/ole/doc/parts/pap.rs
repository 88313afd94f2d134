/// Paragraph formatting and the paragraph SPRM cascade.
///
/// Paragraph SPRMs are scalar: each one overwrites its field. The only flag,
/// page-break-before, is a plain set/unset.
use super::chp::{DEFAULT_FONT_SIZE, FontStyle};
use super::operand::StructuralFlag;
use super::stylesheet::{H1, H2, H3, ISTD_INVALID, STI_NIL};
use crate::ole::sprm::{Sprm, SprmIterator};
use crate::ole::sprm_operations::*;
use serde::{Deserialize, Serialize};

/// Paragraph justification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// Map a `jc` operand. Distributed and kashida variants justify; unknown
    /// values fall back to left.
    pub fn from_jc(jc: u8) -> Self {
        match jc {
            0 => Alignment::Left,
            1 => Alignment::Center,
            2 => Alignment::Right,
            3..=9 => Alignment::Justify,
            _ => Alignment::Left,
        }
    }
}

/// Paragraph formatting state at the start of a paragraph run.
///
/// Indents and spacing are in twips (1/1440 inch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphFormat {
    /// Character position where the run starts
    pub document_offset: u32,
    /// Style sheet index (istd) of the paragraph style
    pub style_id: u16,
    /// Style applied to the following paragraph unless overruled
    pub next_style_id: u16,
    /// Built-in style identifier (sti) of the paragraph style
    pub builtin_style_id: u16,
    pub has_page_break_before: bool,
    /// Vertical space before the paragraph
    pub space_before: u16,
    /// Vertical space after the paragraph
    pub space_after: u16,
    pub left_indent: i16,
    pub first_line_indent: i16,
    pub right_indent: i16,
    pub alignment: Alignment,
    /// Emphasis carried by the paragraph style
    pub font_style: FontStyle,
    /// Font size carried by the paragraph style, in half-points
    pub font_size: u16,
}

impl Default for ParagraphFormat {
    fn default() -> Self {
        Self::with_font_size(DEFAULT_FONT_SIZE)
    }
}

impl ParagraphFormat {
    /// Default paragraph formatting with the given font size.
    pub fn with_font_size(font_size: u16) -> Self {
        Self {
            document_offset: 0,
            style_id: ISTD_INVALID,
            next_style_id: ISTD_INVALID,
            builtin_style_id: STI_NIL,
            has_page_break_before: false,
            space_before: 0,
            space_after: 0,
            left_indent: 0,
            first_line_indent: 0,
            right_indent: 0,
            alignment: Alignment::Left,
            font_style: FontStyle::empty(),
            font_size,
        }
    }

    /// Copy of this state anchored at `offset`.
    pub fn at(&self, offset: u32) -> Self {
        Self {
            document_offset: offset,
            ..self.clone()
        }
    }

    /// Heading level (1-3) of the paragraph style, if it is a built-in
    /// heading.
    pub fn heading_level(&self) -> Option<u8> {
        match self.builtin_style_id {
            H1 => Some(1),
            H2 => Some(2),
            H3 => Some(3),
            _ => None,
        }
    }

    /// Apply a PAPX grpprl in stream order.
    ///
    /// Returns `false` when the grpprl ended in an incomplete SPRM.
    pub fn apply_grpprl(&mut self, grpprl: &[u8]) -> bool {
        let mut sprms = SprmIterator::new(grpprl);
        for sprm in sprms.by_ref() {
            self.apply_sprm(&sprm);
        }
        !sprms.is_truncated()
    }

    /// Apply a single SPRM. Unknown opcodes are ignored.
    pub fn apply_sprm(&mut self, sprm: &Sprm) {
        match sprm.opcode {
            SPRM_P_ISTD => {
                if let Some(istd) = sprm.operand_word() {
                    self.style_id = istd;
                }
            },
            SPRM_P_JC80 | SPRM_P_JC => {
                if let Some(jc) = sprm.operand_byte() {
                    self.alignment = Alignment::from_jc(jc);
                }
            },
            SPRM_P_F_PAGE_BREAK_BEFORE => {
                if let Some(value) = sprm.operand_byte() {
                    self.has_page_break_before = StructuralFlag::from_byte(value).is_set();
                }
            },
            SPRM_P_DXA_LEFT80 | SPRM_P_DXA_LEFT => {
                if let Some(dxa) = sprm.operand_i16() {
                    self.left_indent = dxa;
                }
            },
            SPRM_P_DXA_RIGHT80 | SPRM_P_DXA_RIGHT => {
                if let Some(dxa) = sprm.operand_i16() {
                    self.right_indent = dxa;
                }
            },
            SPRM_P_DXA_LEFT1_80 | SPRM_P_DXA_LEFT1 => {
                if let Some(dxa) = sprm.operand_i16() {
                    self.first_line_indent = dxa;
                }
            },
            SPRM_P_DYA_BEFORE => {
                if let Some(dya) = sprm.operand_word() {
                    self.space_before = dya;
                }
            },
            SPRM_P_DYA_AFTER => {
                if let Some(dya) = sprm.operand_word() {
                    self.space_after = dya;
                }
            },
            _ => {},
        }
    }
}
