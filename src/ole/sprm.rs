/// SPRM (Single Property Modifier) stream parsing.
///
/// A grpprl is a concatenation of SPRMs: a 2-byte opcode whose top three bits
/// give the operand size, followed by the operand. Paragraph, character and
/// section properties are all stored this way.
use crate::common::binary::{read_i16_le, read_u16_le, read_u32_le};
use smallvec::SmallVec;

/// sprmTDefTable carries a 2-byte operand length.
const SPRM_LONG_TABLE: u16 = 0xD608;

/// SPRM operand size class, from opcode bits 13-15.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SprmOperation {
    /// Size code 0 - toggle, 1 byte operand
    Toggle,
    /// Size code 1 - 1 byte operand
    Byte,
    /// Size code 2 - 2 byte operand
    Word,
    /// Size code 3 - 4 byte operand
    DWord,
    /// Size code 4 - 2 byte operand
    Word2,
    /// Size code 5 - 2 byte operand
    Word3,
    /// Size code 6 - variable length operand
    Variable,
    /// Size code 7 - 3 byte operand
    ThreeByte,
}

impl SprmOperation {
    /// Size class encoded in an opcode.
    #[inline]
    pub fn of(opcode: u16) -> Self {
        match (opcode >> 13) & 0x7 {
            0 => SprmOperation::Toggle,
            1 => SprmOperation::Byte,
            2 => SprmOperation::Word,
            3 => SprmOperation::DWord,
            4 => SprmOperation::Word2,
            5 => SprmOperation::Word3,
            6 => SprmOperation::Variable,
            _ => SprmOperation::ThreeByte,
        }
    }

    /// Fixed operand size, or `None` for variable-length operands.
    #[inline]
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            SprmOperation::Toggle | SprmOperation::Byte => Some(1),
            SprmOperation::Word | SprmOperation::Word2 | SprmOperation::Word3 => Some(2),
            SprmOperation::DWord => Some(4),
            SprmOperation::ThreeByte => Some(3),
            SprmOperation::Variable => None,
        }
    }
}

/// A decoded SPRM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprm {
    /// SPRM opcode
    pub opcode: u16,
    /// SPRM operand size class
    pub operation: SprmOperation,
    /// SPRM operand data, without any length prefix
    pub operand: SmallVec<[u8; 4]>,
}

impl Sprm {
    /// Get the operand as a byte.
    #[inline]
    pub fn operand_byte(&self) -> Option<u8> {
        self.operand.first().copied()
    }

    /// Get the operand as a word (u16).
    #[inline]
    pub fn operand_word(&self) -> Option<u16> {
        read_u16_le(&self.operand, 0).ok()
    }

    /// Get the operand as a signed word (i16).
    #[inline]
    pub fn operand_i16(&self) -> Option<i16> {
        read_i16_le(&self.operand, 0).ok()
    }

    /// Get the operand as a dword (u32).
    #[inline]
    pub fn operand_dword(&self) -> Option<u32> {
        read_u32_le(&self.operand, 0).ok()
    }
}

/// Iterator over the SPRMs of a grpprl.
///
/// Stops at the first SPRM whose declared size runs past the end of the
/// buffer. [`SprmIterator::is_truncated`] reports whether that happened.
#[derive(Debug, Clone)]
pub struct SprmIterator<'a> {
    grpprl: &'a [u8],
    offset: usize,
    truncated: bool,
}

impl<'a> SprmIterator<'a> {
    pub fn new(grpprl: &'a [u8]) -> Self {
        Self {
            grpprl,
            offset: 0,
            truncated: false,
        }
    }

    /// Whether iteration ended on an incomplete SPRM.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Bytes consumed by complete SPRMs so far.
    #[inline]
    pub fn consumed(&self) -> usize {
        self.offset
    }

    /// Returns (operand start, operand length) for the SPRM at `offset`.
    fn operand_span(&self, opcode: u16, offset: usize) -> Option<(usize, usize)> {
        match SprmOperation::of(opcode).fixed_size() {
            Some(size) => Some((offset, size)),
            None if opcode == SPRM_LONG_TABLE => {
                let cb = read_u16_le(self.grpprl, offset).ok()? as usize;
                Some((offset + 2, cb.saturating_sub(1)))
            },
            None => {
                let cb = *self.grpprl.get(offset)? as usize;
                Some((offset + 1, cb))
            },
        }
    }
}

impl Iterator for SprmIterator<'_> {
    type Item = Sprm;

    fn next(&mut self) -> Option<Sprm> {
        if self.truncated || self.offset >= self.grpprl.len() {
            return None;
        }

        let Ok(opcode) = read_u16_le(self.grpprl, self.offset) else {
            self.truncated = true;
            return None;
        };

        let Some((start, size)) = self.operand_span(opcode, self.offset + 2) else {
            self.truncated = true;
            return None;
        };
        let end = start + size;
        if end > self.grpprl.len() {
            self.truncated = true;
            return None;
        }

        self.offset = end;
        Some(Sprm {
            opcode,
            operation: SprmOperation::of(opcode),
            operand: SmallVec::from_slice(&self.grpprl[start..end]),
        })
    }
}

/// Parse all complete SPRMs from a grpprl.
pub fn parse_sprms(grpprl: &[u8]) -> Vec<Sprm> {
    SprmIterator::new(grpprl).collect()
}

/// Find a specific SPRM by opcode in a list of SPRMs.
#[inline]
pub fn find_sprm(sprms: &[Sprm], opcode: u16) -> Option<&Sprm> {
    sprms.iter().find(|sprm| sprm.opcode == opcode)
}
