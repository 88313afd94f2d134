/// Section table (PlcfSed) decoder.
///
/// Each section descriptor points at an optional SEPX in the WordDocument
/// stream whose SPRMs describe the section. Only the break kind is decoded.
///
/// References:
/// - [MS-DOC] 2.8.26 PlcfSed, 2.9.255 Sed, 2.9.253 Sepx
use super::bin_table::ensure_increasing;
use super::operand::StructuralFlag;
use crate::common::binary::ByteWindow;
use crate::ole::doc::error::{DocError, Result};
use crate::ole::plcf::PlcfParser;
use crate::ole::sprm::{Sprm, SprmIterator};
use crate::ole::sprm_operations::SPRM_S_BKC;
use serde::{Deserialize, Serialize};

const TABLE: &str = "section table";
const SED_SIZE: usize = 12;
/// fcSepx value meaning the section has default properties.
const NO_SEPX: u32 = 0xFFFF_FFFF;

/// A section boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionBreak {
    /// Character position where the section starts
    pub document_offset: u32,
    /// The section starts on a new page
    pub forces_new_page: bool,
}

impl SectionBreak {
    /// Section with default properties; sections start a new page unless
    /// told otherwise.
    pub fn at(document_offset: u32) -> Self {
        Self {
            document_offset,
            forces_new_page: true,
        }
    }

    /// Apply a SEPX grpprl. Returns `false` when it ended mid-SPRM.
    pub fn apply_grpprl(&mut self, grpprl: &[u8]) -> bool {
        let mut sprms = SprmIterator::new(grpprl);
        for sprm in sprms.by_ref() {
            self.apply_sprm(&sprm);
        }
        !sprms.is_truncated()
    }

    pub fn apply_sprm(&mut self, sprm: &Sprm) {
        if sprm.opcode == SPRM_S_BKC {
            if let Some(bkc) = sprm.operand_byte() {
                // bkcContinuous is 0; every other break kind starts a page
                self.forces_new_page = StructuralFlag::from_byte(bkc).is_set();
            }
        }
    }
}

/// Decode section breaks.
///
/// Sections starting at or beyond `end_cp` are dropped, except a section
/// at 0.
pub fn read_sections(
    plcf_sed: &[u8],
    word_document: &[u8],
    end_cp: u32,
    warnings: &mut Vec<DocError>,
) -> Result<Vec<SectionBreak>> {
    if plcf_sed.is_empty() {
        return Ok(Vec::new());
    }
    let Some(plcf) = PlcfParser::parse(plcf_sed, SED_SIZE) else {
        warnings.push(DocError::truncated(
            TABLE,
            format!("{} bytes do not form a section table", plcf_sed.len()),
        ));
        return Ok(Vec::new());
    };

    let main = ByteWindow::new(word_document);
    let mut sections = Vec::with_capacity(plcf.count());
    let mut previous = None;

    for i in 0..plcf.count() {
        let Some(cp) = plcf.position(i) else {
            break;
        };
        if cp > 0 && cp >= end_cp {
            continue;
        }
        ensure_increasing(TABLE, &mut previous, cp)?;

        let mut section = SectionBreak::at(cp);
        let fc_sepx = plcf
            .element(i)
            .and_then(|sed| sed.u32_at(2).ok())
            .unwrap_or(NO_SEPX);
        if fc_sepx != NO_SEPX {
            match main.u16_at(fc_sepx as usize) {
                Ok(cb) => {
                    let (grpprl, truncated) = main.clamped(fc_sepx as usize + 2, cb as usize);
                    let complete = section.apply_grpprl(grpprl.as_slice());
                    if truncated || !complete {
                        warnings.push(DocError::truncated(
                            TABLE,
                            format!("SEPX of section {} ends early", i),
                        ));
                    }
                },
                Err(err) => warnings.push(DocError::truncated(
                    TABLE,
                    format!("SEPX of section {}: {}", i, err),
                )),
            }
        }
        sections.push(section);
    }

    log::debug!("decoded {} sections", sections.len());
    Ok(sections)
}
