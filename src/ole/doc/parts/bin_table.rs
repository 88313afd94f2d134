/// Paragraph and character bin tables (PlcfBtePapx / PlcfBteChpx).
///
/// Both are two-level structures:
/// 1. A PLCF in the table stream whose elements are FKP page numbers
/// 2. 512-byte FKP pages in the WordDocument stream holding the runs
///
/// Run anchors are byte offsets; they are mapped to character positions
/// through the piece table and then ordered by position, since pieces need
/// not be stored in document order. A row also anchors at the start of every
/// piece whose first byte it covers. Rows whose text lies outside the
/// published pieces are skipped.
///
/// References:
/// - [MS-DOC] 2.8.6 PlcfBtePapx, 2.8.5 PlcfBteChpx, 2.9.193 PnFkpPapx
use super::chp::{CharacterContext, CharacterFormat};
use super::fkp::{ChpxFkp, FKP_PAGE_SIZE, PapxFkp};
use super::pap::ParagraphFormat;
use super::piece_table::PieceTable;
use super::stylesheet::StyleSheet;
use crate::ole::doc::error::{DocError, Result};
use crate::ole::plcf::PlcfParser;

const PARAGRAPH_TABLE: &str = "paragraph bin table";
const CHARACTER_TABLE: &str = "character bin table";
const PN_MASK: u32 = 0x003F_FFFF;

/// Reject an anchor that does not follow its predecessor.
pub(crate) fn ensure_increasing(
    table: &'static str,
    previous: &mut Option<u32>,
    offset: u32,
) -> Result<()> {
    if let Some(prev) = *previous {
        if offset <= prev {
            return Err(DocError::OutOfOrderRun {
                table,
                previous: prev,
                offset,
            });
        }
    }
    *previous = Some(offset);
    Ok(())
}

/// Resolve the FKP pages a bin table points at.
///
/// Pages that cannot be read are reported and skipped.
fn fkp_pages<'a>(
    plcf_bte: &[u8],
    word_document: &'a [u8],
    table: &'static str,
    warnings: &mut Vec<DocError>,
) -> Vec<&'a [u8]> {
    if plcf_bte.is_empty() {
        return Vec::new();
    }
    let Some(plcf) = PlcfParser::parse(plcf_bte, 4) else {
        warnings.push(DocError::truncated(
            table,
            format!("{} bytes do not form a bin table", plcf_bte.len()),
        ));
        return Vec::new();
    };

    let mut pages = Vec::with_capacity(plcf.count());
    for i in 0..plcf.count() {
        let Some(pn) = plcf.element(i).and_then(|e| e.u32_at(0).ok()) else {
            continue;
        };
        // The FIB occupies page 0
        let pn = (pn & PN_MASK) as usize;
        let start = pn * FKP_PAGE_SIZE;
        match word_document.get(start..start + FKP_PAGE_SIZE) {
            Some(page) if pn != 0 => pages.push(page),
            _ => warnings.push(DocError::truncated(
                table,
                format!("FKP page {} outside main stream", pn),
            )),
        }
    }
    pages
}

/// Character positions where a row spanning `[fc, fc_end)` takes effect.
fn row_anchors(fc: u32, fc_end: u32, pieces: &PieceTable) -> impl Iterator<Item = u32> + '_ {
    pieces.pieces().iter().filter_map(move |piece| match piece.fc_to_cp(fc) {
        Some(cp) => Some(cp),
        None if fc < piece.offset && piece.offset < fc_end => Some(piece.start_cp),
        None => None,
    })
}

/// Order runs by position and reject repeated anchors.
fn sort_runs<T>(
    table: &'static str,
    runs: &mut [T],
    offset_of: impl Fn(&T) -> u32,
) -> Result<()> {
    runs.sort_by_key(|run| offset_of(run));
    let mut previous = None;
    for run in runs.iter() {
        ensure_increasing(table, &mut previous, offset_of(run))?;
    }
    Ok(())
}

/// Style index of the paragraph run covering `offset`.
///
/// Linear scan; the last run starting at or before `offset` wins. Offsets
/// before the first run resolve to style 0.
pub fn istd_by_offset(offset: u32, paragraphs: &[ParagraphFormat]) -> u16 {
    let mut istd = 0;
    for paragraph in paragraphs {
        if paragraph.document_offset <= offset {
            istd = paragraph.style_id;
        }
    }
    istd
}

/// Decode paragraph runs from a PlcfBtePapx.
///
/// Each run starts from the baseline of its paragraph style and applies its
/// own SPRMs in order.
pub fn read_paragraph_runs(
    plcf_bte_papx: &[u8],
    word_document: &[u8],
    pieces: &PieceTable,
    styles: &StyleSheet,
    warnings: &mut Vec<DocError>,
) -> Result<Vec<ParagraphFormat>> {
    let mut runs: Vec<ParagraphFormat> = Vec::new();

    for page in fkp_pages(plcf_bte_papx, word_document, PARAGRAPH_TABLE, warnings) {
        let fkp = match PapxFkp::parse(page) {
            Ok(fkp) => fkp,
            Err(err) => {
                warnings.push(err);
                continue;
            },
        };
        for entry in fkp.entries() {
            let mut anchored = false;
            let mut complete = true;
            for cp in row_anchors(entry.fc, entry.fc_end, pieces) {
                let mut format = styles.paragraph_baseline(entry.istd).at(cp);
                format.style_id = entry.istd;
                complete &= format.apply_grpprl(entry.grpprl);
                anchored = true;
                runs.push(format);
            }
            if anchored && (entry.truncated || !complete) {
                warnings.push(DocError::truncated(
                    PARAGRAPH_TABLE,
                    format!("PAPX at FC {} ends early", entry.fc),
                ));
            }
        }
    }
    sort_runs(PARAGRAPH_TABLE, &mut runs, |run| run.document_offset)?;

    if runs.first().is_some_and(|run| run.document_offset > 0) {
        let mut baseline = styles.paragraph_baseline(0);
        baseline.style_id = 0;
        runs.insert(0, baseline);
    }

    log::debug!("decoded {} paragraph runs", runs.len());
    Ok(runs)
}

/// Decode character runs from a PlcfBteChpx.
///
/// Each run starts from the character baseline of the paragraph style in
/// effect at its position, so `paragraphs` must already be decoded.
pub fn read_character_runs(
    plcf_bte_chpx: &[u8],
    word_document: &[u8],
    pieces: &PieceTable,
    styles: &StyleSheet,
    paragraphs: &[ParagraphFormat],
    warnings: &mut Vec<DocError>,
) -> Result<Vec<CharacterFormat>> {
    let mut runs: Vec<CharacterFormat> = Vec::new();

    for page in fkp_pages(plcf_bte_chpx, word_document, CHARACTER_TABLE, warnings) {
        let fkp = match ChpxFkp::parse(page) {
            Ok(fkp) => fkp,
            Err(err) => {
                warnings.push(err);
                continue;
            },
        };
        for entry in fkp.entries() {
            let mut anchored = false;
            let mut complete = true;
            for cp in row_anchors(entry.fc, entry.fc_end, pieces) {
                let plain = styles.character_baseline(istd_by_offset(cp, paragraphs));
                let ctx = CharacterContext {
                    styles: Some(styles),
                    plain: &plain,
                };
                let mut format = plain.at(cp);
                complete &= format.apply_grpprl(entry.grpprl, &ctx);
                anchored = true;
                runs.push(format);
            }
            if anchored && (entry.truncated || !complete) {
                warnings.push(DocError::truncated(
                    CHARACTER_TABLE,
                    format!("CHPX at FC {} ends early", entry.fc),
                ));
            }
        }
    }
    sort_runs(CHARACTER_TABLE, &mut runs, |run| run.document_offset)?;

    if runs.first().is_some_and(|run| run.document_offset > 0) {
        runs.insert(0, styles.character_baseline(istd_by_offset(0, paragraphs)));
    }

    log::debug!("decoded {} character runs", runs.len());
    Ok(runs)
}
