/// Style sheet (STSH) decoder.
///
/// Each style definition (STD) carries up to two UPXs holding the paragraph
/// and character SPRMs of the style. Every style is decoded on its own over
/// default formatting; `istdBase` is recorded but not followed, so a style's
/// baseline is exactly what its own SPRMs produce.
///
/// References:
/// - [MS-DOC] 2.9.271 STSH, 2.9.260 STD, 2.9.331 UPX
use super::chp::{CharacterContext, CharacterFormat};
use super::pap::ParagraphFormat;
use crate::common::binary::{BinaryResult, ByteWindow};
use crate::ole::doc::error::DocError;
use encoding_rs::UTF_16LE;
use serde::{Deserialize, Serialize};

/// Built-in style identifier of "heading 1".
pub const H1: u16 = 0x1;
/// Built-in style identifier of "heading 2".
pub const H2: u16 = 0x2;
/// Built-in style identifier of "heading 3".
pub const H3: u16 = 0x3;
/// Built-in style identifier shared by all user-defined styles.
pub const STI_USER: u16 = 0xFFE;
/// Built-in style identifier meaning "no built-in style".
pub const STI_NIL: u16 = 0xFFF;
/// Style index meaning "no style".
pub const ISTD_INVALID: u16 = 0xFFFF;

const TABLE: &str = "stylesheet";

/// Style kind (sgc).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleKind {
    Paragraph,
    Character,
    Table,
    Numbering,
    Unknown(u8),
}

impl From<u8> for StyleKind {
    fn from(sgc: u8) -> Self {
        match sgc {
            1 => StyleKind::Paragraph,
            2 => StyleKind::Character,
            3 => StyleKind::Table,
            4 => StyleKind::Numbering,
            other => StyleKind::Unknown(other),
        }
    }
}

/// One slot of the style sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSheetEntry {
    /// Index of the slot (istd)
    pub istd: u16,
    /// Whether the slot holds a decoded style definition
    pub filled: bool,
    /// Built-in style identifier
    pub sti: u16,
    pub kind: StyleKind,
    /// istdBase as stored; informational only
    pub base_style: u16,
    pub next_style: u16,
    pub name: String,
    /// Paragraph baseline (paragraph styles only)
    pub paragraph: ParagraphFormat,
    /// Character baseline
    pub character: CharacterFormat,
}

impl StyleSheetEntry {
    fn unfilled(istd: u16, defaults: &Defaults) -> Self {
        Self {
            istd,
            filled: false,
            sti: STI_NIL,
            kind: StyleKind::Unknown(0),
            base_style: ISTD_INVALID,
            next_style: ISTD_INVALID,
            name: String::new(),
            paragraph: defaults.paragraph.clone(),
            character: defaults.character.clone(),
        }
    }

    /// Heading level (1-3) for built-in heading styles.
    pub fn heading_level(&self) -> Option<u8> {
        match self.sti {
            H1 => Some(1),
            H2 => Some(2),
            H3 => Some(3),
            _ => None,
        }
    }

    #[inline]
    pub fn is_user_defined(&self) -> bool {
        self.sti == STI_USER
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Defaults {
    paragraph: ParagraphFormat,
    character: CharacterFormat,
}

/// Decoded style sheet, indexed by istd.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheet {
    entries: Vec<StyleSheetEntry>,
    defaults: Defaults,
}

impl StyleSheet {
    /// An empty style sheet; every lookup falls back to defaults.
    pub fn empty(default_font_size: u16) -> Self {
        Self {
            entries: Vec::new(),
            defaults: Defaults {
                paragraph: ParagraphFormat::with_font_size(default_font_size),
                character: CharacterFormat::with_font_size(default_font_size),
            },
        }
    }

    /// Decode an STSH.
    ///
    /// Never fails: damaged definitions are recorded in `warnings` and the
    /// affected slots stay unfilled or partially decoded.
    pub fn parse(stsh: &[u8], default_font_size: u16, warnings: &mut Vec<DocError>) -> Self {
        let mut sheet = Self::empty(default_font_size);
        let window = ByteWindow::new(stsh);
        if window.is_empty() {
            return sheet;
        }

        let header = (|| -> BinaryResult<(usize, u16, usize)> {
            let cb_stshi = window.u16_at(0)? as usize;
            let cstd = window.u16_at(2)?;
            let cb_std_base = window.u16_at(4)? as usize;
            Ok((cb_stshi, cstd, cb_std_base))
        })();
        let (cb_stshi, cstd, cb_std_base) = match header {
            Ok(header) => header,
            Err(err) => {
                warnings.push(DocError::truncated(TABLE, format!("STSHI: {}", err)));
                return sheet;
            },
        };

        let mut offset = 2 + cb_stshi;
        for istd in 0..cstd {
            let Ok(cb_std) = window.u16_at(offset) else {
                warnings.push(DocError::truncated(
                    TABLE,
                    format!("{} of {} style definitions present", istd, cstd),
                ));
                break;
            };
            let cb_std = cb_std as usize;
            offset += 2;

            if cb_std == 0 {
                sheet.entries.push(StyleSheetEntry::unfilled(istd, &sheet.defaults));
                continue;
            }

            let (std, truncated) = window.clamped(offset, cb_std);
            if truncated {
                warnings.push(DocError::truncated(
                    TABLE,
                    format!("style {} declares {} bytes, {} present", istd, cb_std, std.len()),
                ));
            }
            let entry = sheet.parse_std(istd, std, cb_std_base, warnings);
            sheet.entries.push(entry);
            offset += cb_std;
        }

        log::debug!(
            "decoded {} style slots, {} filled",
            sheet.entries.len(),
            sheet.entries.iter().filter(|e| e.filled).count()
        );
        sheet
    }

    fn parse_std(
        &self,
        istd: u16,
        std: ByteWindow<'_>,
        cb_std_base: usize,
        warnings: &mut Vec<DocError>,
    ) -> StyleSheetEntry {
        let mut entry = StyleSheetEntry::unfilled(istd, &self.defaults);

        let base = (|| -> BinaryResult<(u16, u16, u16)> {
            Ok((std.u16_at(0)?, std.u16_at(2)?, std.u16_at(4)?))
        })();
        let Ok((sti_word, sgc_word, cupx_word)) = base else {
            warnings.push(DocError::truncated(TABLE, format!("style {} base", istd)));
            return entry;
        };

        entry.sti = sti_word & 0x0FFF;
        entry.kind = StyleKind::from((sgc_word & 0x000F) as u8);
        entry.base_style = sgc_word >> 4;
        entry.next_style = cupx_word >> 4;
        let cupx = (cupx_word & 0x000F) as usize;

        let Ok(cch) = std.u16_at(cb_std_base) else {
            warnings.push(DocError::truncated(TABLE, format!("style {} name", istd)));
            return entry;
        };
        let name_start = cb_std_base + 2;
        let (name_bytes, _) = std.clamped(name_start, cch as usize * 2);
        let (name, _) = UTF_16LE.decode_without_bom_handling(name_bytes.as_slice());
        entry.name = name.into_owned();

        // name, then a 2-byte terminator
        let mut upx_offset = name_start + cch as usize * 2 + 2;
        let mut upxs = Vec::with_capacity(cupx);
        for _ in 0..cupx {
            if upx_offset % 2 == 1 {
                upx_offset += 1;
            }
            let Ok(cb_upx) = std.u16_at(upx_offset) else {
                break;
            };
            let (upx, truncated) = std.clamped(upx_offset + 2, cb_upx as usize);
            if truncated {
                warnings.push(DocError::truncated(
                    TABLE,
                    format!("style {} UPX declares {} bytes, {} present", istd, cb_upx, upx.len()),
                ));
            }
            upxs.push(upx);
            upx_offset += 2 + cb_upx as usize;
        }

        let plain = self.defaults.character.clone();
        let ctx = CharacterContext {
            styles: None,
            plain: &plain,
        };
        let mut complete = true;

        match (entry.kind, upxs.as_slice()) {
            (StyleKind::Paragraph, [papx, rest @ ..]) => {
                // PAPX UPX: istd, then SPRMs
                let grpprl = papx.tail(2).map(|w| w.as_slice()).unwrap_or(&[]);
                complete &= papx.len() >= 2;
                complete &= entry.paragraph.apply_grpprl(grpprl);
                if let Some(chpx) = rest.first() {
                    complete &= entry.character.apply_grpprl(chpx.as_slice(), &ctx);
                }
                entry.filled = true;
            },
            (StyleKind::Character, [chpx, ..]) => {
                complete &= entry.character.apply_grpprl(chpx.as_slice(), &ctx);
                entry.filled = true;
            },
            _ => {},
        }

        if !complete {
            warnings.push(DocError::truncated(
                TABLE,
                format!("style {} operands end mid-SPRM", istd),
            ));
        }

        entry.paragraph.style_id = istd;
        entry.paragraph.next_style_id = entry.next_style;
        entry.paragraph.builtin_style_id = entry.sti;
        entry.paragraph.font_style = entry.character.font_style;
        entry.paragraph.font_size = entry.character.font_size;
        entry
    }

    /// Number of slots present.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Slot at `istd`, filled or not.
    #[inline]
    pub fn entry(&self, istd: u16) -> Option<&StyleSheetEntry> {
        self.entries.get(istd as usize)
    }

    /// Position of the filled style `istd`, if any.
    pub fn style_index(&self, istd: u16) -> Option<usize> {
        self.entries.iter().position(|e| e.filled && e.istd == istd)
    }

    /// Filled slot at `istd`.
    pub fn filled(&self, istd: u16) -> Option<&StyleSheetEntry> {
        self.style_index(istd).map(|index| &self.entries[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleSheetEntry> {
        self.entries.iter()
    }

    /// Paragraph formatting a run with style `istd` starts from.
    ///
    /// Unfilled or missing styles resolve to default formatting.
    pub fn paragraph_baseline(&self, istd: u16) -> ParagraphFormat {
        match self.filled(istd) {
            Some(entry) => entry.paragraph.clone(),
            None => self.defaults.paragraph.clone(),
        }
    }

    /// Character formatting a run inside style `istd` starts from.
    pub fn character_baseline(&self, istd: u16) -> CharacterFormat {
        match self.filled(istd) {
            Some(entry) => entry.character.clone(),
            None => self.defaults.character.clone(),
        }
    }

    /// Default character formatting.
    #[inline]
    pub fn default_character(&self) -> &CharacterFormat {
        &self.defaults.character
    }
}
