/// File Information Block (FIB) parser for DOC files.
///
/// The FIB is located at the beginning of the WordDocument stream and gives:
/// - File format version and flags (encryption, which table stream to use)
/// - Character counts of the main text and of every subdocument
/// - (offset, length) pairs locating the tables in the table stream
///
/// The variable parts (`FibRgW97`, `FibRgLw97`, `FibRgFcLcb`) are located
/// through their count fields rather than assumed fixed offsets.
use crate::common::binary::ByteWindow;
use crate::ole::doc::error::{DocError, Result};

/// Smallest FIB that reaches the CLX descriptor of a Word 97 FIB.
pub const FIB_MIN_SIZE: usize = 0x1AA;

/// Word 97 and later.
const WIDENT_WORD8: u16 = 0xA5EC;
/// Word 6.0 / Word 95.
const WIDENT_WORD6: u16 = 0xA5DC;
/// Oldest nFib this decoder reads (Word 97).
const NFIB_WORD97: u16 = 0x00C1;

const FLAG_COMPLEX: u16 = 0x0004;
const FLAG_ENCRYPTED: u16 = 0x0100;
const FLAG_WHICH_TABLE_STREAM: u16 = 0x0200;

// FibRgFcLcb97 indices
const IDX_STSHF: usize = 1;
const IDX_PLCF_SED: usize = 6;
const IDX_PLCF_BTE_CHPX: usize = 12;
const IDX_PLCF_BTE_PAPX: usize = 13;
const IDX_CLX: usize = 33;

// FibRgLw97 indices
const IDX_CCP_TEXT: usize = 3;

/// Location of a structure in the table stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FcLcb {
    /// Byte offset
    pub fc: u32,
    /// Byte length
    pub lcb: u32,
}

impl FcLcb {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lcb == 0
    }

    /// Bytes of `stream` covered by this descriptor.
    pub fn slice<'a>(&self, stream: &'a [u8]) -> Option<&'a [u8]> {
        ByteWindow::slice_of(stream, self.fc as usize, self.lcb as usize)
            .ok()
            .map(|w| w.as_slice())
    }
}

/// Character counts of the main text and the subdocuments that follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharacterCounts {
    pub text: u32,
    pub footnotes: u32,
    pub headers: u32,
    pub macros: u32,
    pub annotations: u32,
    pub endnotes: u32,
    pub textboxes: u32,
    pub header_textboxes: u32,
}

impl CharacterCounts {
    fn subdocuments(&self) -> u64 {
        [
            self.footnotes,
            self.headers,
            self.macros,
            self.annotations,
            self.endnotes,
            self.textboxes,
            self.header_textboxes,
        ]
        .iter()
        .map(|&c| c as u64)
        .sum()
    }
}

/// File Information Block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInformationBlock {
    nfib: u16,
    flags: u16,
    fc_min: u32,
    fc_mac: u32,
    counts: CharacterCounts,
    stshf: FcLcb,
    plcf_sed: FcLcb,
    plcf_bte_chpx: FcLcb,
    plcf_bte_papx: FcLcb,
    clx: FcLcb,
}

impl FileInformationBlock {
    /// Parse a FIB from the start of the WordDocument stream.
    ///
    /// # Arguments
    ///
    /// * `header` - The first bytes of the WordDocument stream
    /// * `main_stream_len` - Total length of the WordDocument stream
    pub fn parse(header: &[u8], main_stream_len: usize) -> Result<Self> {
        if header.len() < FIB_MIN_SIZE {
            return Err(DocError::MalformedHeader(format!(
                "FIB needs {} bytes, got {}",
                FIB_MIN_SIZE,
                header.len()
            )));
        }
        let fib = ByteWindow::new(header);

        let magic = fib.u16_at(0x00).map_err(DocError::header)?;
        let nfib = fib.u16_at(0x02).map_err(DocError::header)?;
        let flags = fib.u16_at(0x0A).map_err(DocError::header)?;

        match magic {
            WIDENT_WORD8 => {},
            WIDENT_WORD6 => return Err(DocError::UnsupportedFormatVersion(nfib)),
            other => {
                return Err(DocError::MalformedHeader(format!(
                    "Invalid FIB magic number: 0x{:04X}",
                    other
                )));
            },
        }
        if nfib < NFIB_WORD97 {
            return Err(DocError::UnsupportedFormatVersion(nfib));
        }
        if flags & FLAG_ENCRYPTED != 0 {
            return Err(DocError::Encrypted);
        }

        let fc_min = fib.u32_at(0x18).map_err(DocError::header)?;
        let fc_mac = fib.u32_at(0x1C).map_err(DocError::header)?;
        if fc_min > fc_mac || fc_mac as usize > main_stream_len {
            return Err(DocError::MalformedHeader(format!(
                "text bytes [{}, {}) outside main stream of {} bytes",
                fc_min, fc_mac, main_stream_len
            )));
        }

        // FibBase (32 bytes), csw + FibRgW, cslw + FibRgLw, cbRgFcLcb + FibRgFcLcb
        let csw = fib.u16_at(0x20).map_err(DocError::header)? as usize;
        let rglw_count_at = 0x22 + csw * 2;
        let cslw = fib.u16_at(rglw_count_at).map_err(DocError::header)? as usize;
        let rglw = rglw_count_at + 2;
        if cslw <= IDX_CCP_TEXT + 7 {
            return Err(DocError::MalformedHeader(format!("FibRgLw has {} entries", cslw)));
        }
        let fclcb_count_at = rglw + cslw * 4;
        let cb_rg_fc_lcb = fib.u16_at(fclcb_count_at).map_err(DocError::header)? as usize;
        if cb_rg_fc_lcb <= IDX_CLX {
            return Err(DocError::MalformedHeader(format!(
                "FibRgFcLcb has {} entries",
                cb_rg_fc_lcb
            )));
        }
        let rgfclcb = fclcb_count_at + 2;

        let lw = |index: usize| fib.u32_at(rglw + index * 4).map_err(DocError::header);
        let counts = CharacterCounts {
            text: lw(IDX_CCP_TEXT)?,
            footnotes: lw(IDX_CCP_TEXT + 1)?,
            headers: lw(IDX_CCP_TEXT + 2)?,
            macros: lw(IDX_CCP_TEXT + 3)?,
            annotations: lw(IDX_CCP_TEXT + 4)?,
            endnotes: lw(IDX_CCP_TEXT + 5)?,
            textboxes: lw(IDX_CCP_TEXT + 6)?,
            header_textboxes: lw(IDX_CCP_TEXT + 7)?,
        };

        let pair = |index: usize| -> Result<FcLcb> {
            let at = rgfclcb + index * 8;
            Ok(FcLcb {
                fc: fib.u32_at(at).map_err(DocError::header)?,
                lcb: fib.u32_at(at + 4).map_err(DocError::header)?,
            })
        };

        Ok(Self {
            nfib,
            flags,
            fc_min,
            fc_mac,
            counts,
            stshf: pair(IDX_STSHF)?,
            plcf_sed: pair(IDX_PLCF_SED)?,
            plcf_bte_chpx: pair(IDX_PLCF_BTE_CHPX)?,
            plcf_bte_papx: pair(IDX_PLCF_BTE_PAPX)?,
            clx: pair(IDX_CLX)?,
        })
    }

    /// Check every table descriptor against the table stream length.
    pub fn check_table_ranges(&self, table_stream_len: usize) -> Result<()> {
        let tables = [
            ("Stshf", self.stshf),
            ("PlcfSed", self.plcf_sed),
            ("PlcfBteChpx", self.plcf_bte_chpx),
            ("PlcfBtePapx", self.plcf_bte_papx),
            ("Clx", self.clx),
        ];
        for (name, range) in tables {
            if range.is_empty() {
                continue;
            }
            let end = range.fc as u64 + range.lcb as u64;
            if end > table_stream_len as u64 {
                return Err(DocError::MalformedHeader(format!(
                    "{} [{}, {}) outside table stream of {} bytes",
                    name, range.fc, end, table_stream_len
                )));
            }
        }
        Ok(())
    }

    /// Get the file format version.
    #[inline]
    pub fn version(&self) -> u16 {
        self.nfib
    }

    /// Name of the table stream this document uses.
    #[inline]
    pub fn table_stream_name(&self) -> &'static str {
        if self.flags & FLAG_WHICH_TABLE_STREAM != 0 {
            "1Table"
        } else {
            "0Table"
        }
    }

    /// Whether the document was fast-saved (pieces out of file order).
    #[inline]
    pub fn is_complex(&self) -> bool {
        self.flags & FLAG_COMPLEX != 0
    }

    /// Byte range of the text in the WordDocument stream (fcMin, fcMac).
    #[inline]
    pub fn text_bytes(&self) -> (u32, u32) {
        (self.fc_min, self.fc_mac)
    }

    #[inline]
    pub fn counts(&self) -> &CharacterCounts {
        &self.counts
    }

    /// Start of the main text in character positions.
    #[inline]
    pub fn start_of_text(&self) -> u32 {
        0
    }

    /// End of the main text (ccpText), excluding subdocuments.
    #[inline]
    pub fn end_of_text(&self) -> u32 {
        self.counts.text
    }

    /// Last character position of the whole document.
    ///
    /// When any subdocument is present, one extra paragraph mark follows the
    /// last one.
    pub fn last_cp(&self) -> u64 {
        let sub = self.counts.subdocuments();
        self.counts.text as u64 + sub + u64::from(sub > 0)
    }

    #[inline]
    pub fn stylesheet(&self) -> FcLcb {
        self.stshf
    }

    #[inline]
    pub fn section_table(&self) -> FcLcb {
        self.plcf_sed
    }

    #[inline]
    pub fn character_bin_table(&self) -> FcLcb {
        self.plcf_bte_chpx
    }

    #[inline]
    pub fn paragraph_bin_table(&self) -> FcLcb {
        self.plcf_bte_papx
    }

    #[inline]
    pub fn piece_table(&self) -> FcLcb {
        self.clx
    }
}
