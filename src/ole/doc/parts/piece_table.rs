/// Piece table (CLX) decoder.
///
/// The piece table maps character positions (CP) to byte offsets (FC) in the
/// WordDocument stream. Each piece is a contiguous range of characters stored
/// either as UTF-16LE or as single bytes.
///
/// References:
/// - [MS-DOC] 2.9.38 Clx, 2.9.177 Pcd, 2.8.35 PlcPcd
use crate::common::binary::ByteWindow;
use crate::ole::doc::error::{DocError, Result};
use crate::ole::plcf::PlcfParser;
use serde::{Deserialize, Serialize};

const CLX_PRC: u8 = 0x01;
const CLX_PCDT: u8 = 0x02;
const PCD_SIZE: usize = 8;
const FC_COMPRESSED: u32 = 0x4000_0000;
const FC_MASK: u32 = 0x3FFF_FFFF;

/// A contiguous range of characters stored at one place in the main stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    /// First character position of the piece
    pub start_cp: u32,
    /// Byte offset of the text in the WordDocument stream
    pub offset: u32,
    /// Length in characters
    pub length: u32,
    /// Single-byte (Windows-1252) text rather than UTF-16LE
    pub is_narrow: bool,
}

impl Piece {
    #[inline]
    pub fn end_cp(&self) -> u32 {
        self.start_cp.saturating_add(self.length)
    }

    /// Bytes per character.
    #[inline]
    pub fn stride(&self) -> u32 {
        if self.is_narrow { 1 } else { 2 }
    }

    /// Length of the piece's text in bytes.
    #[inline]
    pub fn byte_len(&self) -> u64 {
        self.length as u64 * self.stride() as u64
    }

    /// Byte offset just past the piece's text.
    #[inline]
    pub fn end_fc(&self) -> u64 {
        self.offset as u64 + self.byte_len()
    }

    /// Convert a CP inside this piece to an FC.
    pub fn cp_to_fc(&self, cp: u32) -> Option<u32> {
        if cp < self.start_cp || cp >= self.end_cp() {
            return None;
        }
        let fc = self.offset as u64 + (cp - self.start_cp) as u64 * self.stride() as u64;
        u32::try_from(fc).ok()
    }

    /// Convert an FC inside this piece to a CP.
    pub fn fc_to_cp(&self, fc: u32) -> Option<u32> {
        if fc < self.offset || fc as u64 >= self.end_fc() {
            return None;
        }
        self.start_cp.checked_add((fc - self.offset) / self.stride())
    }
}

/// Decoded piece table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PieceTable {
    pieces: Vec<Piece>,
}

impl PieceTable {
    /// Decode a CLX.
    ///
    /// Leading property-modifier blocks (Prc) are skipped. The piece
    /// boundaries must start at zero, increase strictly and end at
    /// `last_cp`, and every piece's text must lie within the first
    /// `main_len` bytes of the WordDocument stream.
    pub fn parse(clx: &[u8], last_cp: u64, main_len: usize) -> Result<Self> {
        let window = ByteWindow::new(clx);
        let mut offset = 0;

        loop {
            let tag = window.u8_at(offset).map_err(DocError::piece_table)?;
            match tag {
                CLX_PRC => {
                    let cb_grpprl = window.u16_at(offset + 1).map_err(DocError::piece_table)?;
                    offset += 3 + cb_grpprl as usize;
                },
                CLX_PCDT => break,
                other => {
                    return Err(DocError::MalformedPieceTable(format!(
                        "unexpected CLX block type 0x{:02X} at {}",
                        other, offset
                    )));
                },
            }
        }

        let lcb = window.u32_at(offset + 1).map_err(DocError::piece_table)? as usize;
        let plc_pcd = window
            .sub(offset + 5, lcb)
            .map_err(DocError::piece_table)?;
        let plcf = PlcfParser::parse(plc_pcd.as_slice(), PCD_SIZE).ok_or_else(|| {
            DocError::MalformedPieceTable(format!("PlcPcd of {} bytes is not a PLC", lcb))
        })?;

        let cps = plcf.positions();
        if cps.first() != Some(&0) {
            return Err(DocError::MalformedPieceTable(format!(
                "first piece starts at {:?}",
                cps.first()
            )));
        }
        if let Some(pair) = cps.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(DocError::MalformedPieceTable(format!(
                "piece boundary {} follows {}",
                pair[1], pair[0]
            )));
        }
        let end = cps.last().copied().unwrap_or(0);
        if end as u64 != last_cp {
            return Err(DocError::MalformedPieceTable(format!(
                "pieces end at {}, header expects {}",
                end, last_cp
            )));
        }

        let mut pieces = Vec::with_capacity(plcf.count());
        for i in 0..plcf.count() {
            let (start_cp, end_cp) = plcf
                .range(i)
                .ok_or_else(|| DocError::MalformedPieceTable(format!("piece {} has no range", i)))?;
            let pcd = plcf
                .element(i)
                .ok_or_else(|| DocError::MalformedPieceTable(format!("piece {} has no Pcd", i)))?;
            let fc = pcd.u32_at(2).map_err(DocError::piece_table)?;

            let is_narrow = fc & FC_COMPRESSED != 0;
            let offset = if is_narrow { (fc & FC_MASK) / 2 } else { fc & FC_MASK };
            let piece = Piece {
                start_cp,
                offset,
                length: end_cp - start_cp,
                is_narrow,
            };
            if piece.end_fc() > main_len as u64 {
                return Err(DocError::MalformedPieceTable(format!(
                    "piece {} spans bytes {}..{} of a {} byte stream",
                    i,
                    piece.offset,
                    piece.end_fc(),
                    main_len
                )));
            }
            pieces.push(piece);
        }

        log::debug!("decoded {} pieces ending at CP {}", pieces.len(), end);
        Ok(Self { pieces })
    }

    /// Pieces in character-position order.
    #[inline]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    #[inline]
    pub fn into_pieces(self) -> Vec<Piece> {
        self.pieces
    }

    /// Last character position covered by the table.
    pub fn last_cp(&self) -> u32 {
        self.pieces.last().map(Piece::end_cp).unwrap_or(0)
    }

    /// Restrict the table to characters before `end_cp`.
    ///
    /// Pieces starting at or after `end_cp` are dropped and a straddling
    /// piece is shortened.
    pub fn clip(&mut self, end_cp: u32) {
        self.pieces.retain(|piece| piece.start_cp < end_cp);
        if let Some(last) = self.pieces.last_mut() {
            if last.end_cp() > end_cp {
                last.length = end_cp - last.start_cp;
            }
        }
    }

    /// Find the piece containing a given CP.
    pub fn piece_for_cp(&self, cp: u32) -> Option<&Piece> {
        let index = self.pieces.partition_point(|piece| piece.end_cp() <= cp);
        self.pieces.get(index).filter(|piece| piece.start_cp <= cp)
    }

    pub fn cp_to_fc(&self, cp: u32) -> Option<u32> {
        self.piece_for_cp(cp)?.cp_to_fc(cp)
    }

    /// Convert an FC to a CP. Pieces are searched in CP order.
    pub fn fc_to_cp(&self, fc: u32) -> Option<u32> {
        self.pieces.iter().find_map(|piece| piece.fc_to_cp(fc))
    }
}
