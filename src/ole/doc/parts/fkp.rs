/// FKP (Formatted Disk Page) parser for DOC files.
///
/// FKPs are 512-byte pages in the WordDocument stream holding the character
/// (CHPX) or paragraph (PAPX) properties of a series of runs.
///
/// Page layout:
/// - FC array at start (4 bytes each, crun+1 entries)
/// - BX array after FCs (1 byte for CHPX, 13 bytes for PAPX)
/// - property data at the end of the page (grows backwards)
/// - crun count at byte 511
///
/// References:
/// - [MS-DOC] 2.9.44 ChpxFkp, 2.9.181 PapxFkp, 2.9.23 BxPap
use crate::common::binary::ByteWindow;
use crate::ole::doc::error::{DocError, Result};

/// Size of an FKP page in bytes (always 512)
pub const FKP_PAGE_SIZE: usize = 512;

const MAX_CHPX_RUNS: usize = 0x65;
const MAX_PAPX_RUNS: usize = 0x1D;
const BX_PAP_SIZE: usize = 13;

/// One row of a CHPX FKP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChpxEntry<'a> {
    /// Byte offset of the run in the WordDocument stream
    pub fc: u32,
    /// Byte offset just past the end of the row's text
    pub fc_end: u32,
    /// Character SPRMs; empty for default formatting
    pub grpprl: &'a [u8],
    /// The CHPX claimed more bytes than the page holds
    pub truncated: bool,
}

/// One row of a PAPX FKP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PapxEntry<'a> {
    /// Byte offset of the paragraph in the WordDocument stream
    pub fc: u32,
    /// Byte offset just past the end of the row's text
    pub fc_end: u32,
    /// Paragraph style index
    pub istd: u16,
    /// Paragraph SPRMs
    pub grpprl: &'a [u8],
    /// The PAPX claimed more bytes than the page holds
    pub truncated: bool,
}

/// Read the FC array and run count shared by both page kinds.
fn read_fcs(page: ByteWindow<'_>, max_runs: usize, table: &'static str) -> Result<Vec<u32>> {
    if page.len() != FKP_PAGE_SIZE {
        return Err(DocError::truncated(
            table,
            format!("FKP page of {} bytes", page.len()),
        ));
    }
    let crun = page.u8_at(FKP_PAGE_SIZE - 1).unwrap_or(0) as usize;
    if crun == 0 || crun > max_runs {
        return Err(DocError::truncated(table, format!("FKP claims {} runs", crun)));
    }
    (0..=crun)
        .map(|i| {
            page.u32_at(i * 4)
                .map_err(|err| DocError::truncated(table, err.to_string()))
        })
        .collect()
}

/// CHPX FKP (Character Property Formatted Disk Page).
#[derive(Debug, Clone)]
pub struct ChpxFkp<'a> {
    entries: Vec<ChpxEntry<'a>>,
}

impl<'a> ChpxFkp<'a> {
    /// Parse a CHPX FKP from a 512-byte page.
    pub fn parse(page_data: &'a [u8]) -> Result<Self> {
        const TABLE: &str = "character bin table";
        let page = ByteWindow::new(page_data);
        let fcs = read_fcs(page, MAX_CHPX_RUNS, TABLE)?;
        let crun = fcs.len() - 1;

        let bx_offset = (crun + 1) * 4;
        let mut entries = Vec::with_capacity(crun);
        for (i, pair) in fcs.windows(2).enumerate() {
            let (fc, fc_end) = (pair[0], pair[1]);
            let b = page
                .u8_at(bx_offset + i)
                .map_err(|err| DocError::truncated(TABLE, err.to_string()))? as usize;

            // b = 0 means no formatting (use default)
            if b == 0 {
                entries.push(ChpxEntry {
                    fc,
                    fc_end,
                    grpprl: &[],
                    truncated: false,
                });
                continue;
            }

            let chpx_offset = b * 2;
            let cb = page.u8_at(chpx_offset).unwrap_or(0) as usize;
            let (grpprl, truncated) = page.clamped(chpx_offset + 1, cb);
            entries.push(ChpxEntry {
                fc,
                fc_end,
                grpprl: grpprl.as_slice(),
                truncated,
            });
        }

        Ok(Self { entries })
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn entries(&self) -> &[ChpxEntry<'a>] {
        &self.entries
    }
}

/// PAPX FKP (Paragraph Property Formatted Disk Page).
#[derive(Debug, Clone)]
pub struct PapxFkp<'a> {
    entries: Vec<PapxEntry<'a>>,
}

impl<'a> PapxFkp<'a> {
    /// Parse a PAPX FKP from a 512-byte page.
    ///
    /// A zero BX offset marks a paragraph with default properties; it is
    /// reported as style 0 with no SPRMs.
    pub fn parse(page_data: &'a [u8]) -> Result<Self> {
        const TABLE: &str = "paragraph bin table";
        let page = ByteWindow::new(page_data);
        let fcs = read_fcs(page, MAX_PAPX_RUNS, TABLE)?;
        let crun = fcs.len() - 1;

        let bx_offset = (crun + 1) * 4;
        let mut entries = Vec::with_capacity(crun);
        for (i, pair) in fcs.windows(2).enumerate() {
            let (fc, fc_end) = (pair[0], pair[1]);
            // BxPap: bOffset, then a 12-byte PHE we do not need
            let b = page
                .u8_at(bx_offset + i * BX_PAP_SIZE)
                .map_err(|err| DocError::truncated(TABLE, err.to_string()))?
                as usize;
            if b == 0 {
                entries.push(PapxEntry {
                    fc,
                    fc_end,
                    istd: 0,
                    grpprl: &[],
                    truncated: false,
                });
                continue;
            }

            // PapxInFkp: cb, then (cb != 0) 2*cb-1 bytes or (cb == 0) cb' and 2*cb' bytes
            let papx_offset = b * 2;
            let cb = page.u8_at(papx_offset).unwrap_or(0) as usize;
            let (start, len) = if cb != 0 {
                (papx_offset + 1, 2 * cb - 1)
            } else {
                let cb_prime = page.u8_at(papx_offset + 1).unwrap_or(0) as usize;
                (papx_offset + 2, 2 * cb_prime)
            };
            let (papx, mut truncated) = page.clamped(start, len);
            let istd = match papx.u16_at(0) {
                Ok(istd) => istd,
                Err(_) => {
                    truncated = true;
                    0
                },
            };
            let grpprl = papx.tail(2).map(|w| w.as_slice()).unwrap_or(&[]);
            entries.push(PapxEntry {
                fc,
                fc_end,
                istd,
                grpprl,
                truncated,
            });
        }

        Ok(Self { entries })
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn entries(&self) -> &[PapxEntry<'a>] {
        &self.entries
    }
}
