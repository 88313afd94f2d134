/// Character formatting and the character SPRM cascade.
///
/// A character run starts from a baseline (the character properties of the
/// paragraph style active at the run, or of an explicit character style) and
/// applies its CHPX grpprl on top, in stream order.
use super::operand::ToggleOperand;
use super::stylesheet::StyleSheet;
use crate::ole::sprm::{Sprm, SprmIterator};
use crate::ole::sprm_operations::*;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Default font size in half-points (10pt).
pub const DEFAULT_FONT_SIZE: u16 = 20;

bitflags! {
    /// Emphasis flags of a run.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct FontStyle: u16 {
        const BOLD = 0x0001;
        const ITALIC = 0x0002;
        const UNDERLINE = 0x0004;
        const CAPITALS = 0x0008;
        const SMALL_CAPITALS = 0x0010;
        const STRIKETHROUGH = 0x0020;
        const HIDDEN = 0x0040;
        const MARKED_DELETED = 0x0080;
        const SUPERSCRIPT = 0x0100;
        const SUBSCRIPT = 0x0200;
    }
}

/// Character formatting state at the start of a run.
///
/// The run extends to the next `CharacterFormat`'s offset, or to the end of
/// the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterFormat {
    /// Character position where the run starts
    pub document_offset: u32,
    /// Emphasis flags
    pub font_style: FontStyle,
    /// Font size in half-points
    pub font_size: u16,
}

impl Default for CharacterFormat {
    fn default() -> Self {
        Self::with_font_size(DEFAULT_FONT_SIZE)
    }
}

impl CharacterFormat {
    /// Plain formatting with the given font size.
    pub fn with_font_size(font_size: u16) -> Self {
        Self {
            document_offset: 0,
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

    #[inline]
    pub fn is_bold(&self) -> bool {
        self.font_style.contains(FontStyle::BOLD)
    }

    #[inline]
    pub fn is_italic(&self) -> bool {
        self.font_style.contains(FontStyle::ITALIC)
    }

    /// Font size in points.
    #[inline]
    pub fn font_size_points(&self) -> f32 {
        self.font_size as f32 / 2.0
    }
}

/// Where character SPRMs that reset or rebase the accumulator look for their
/// baseline.
#[derive(Debug, Clone, Copy)]
pub struct CharacterContext<'a> {
    /// Style sheet for sprmCIstd; absent while the style sheet itself is
    /// being decoded.
    pub styles: Option<&'a StyleSheet>,
    /// Formatting restored by sprmCPlain.
    pub plain: &'a CharacterFormat,
}

impl CharacterFormat {
    /// Apply a CHPX grpprl in stream order.
    ///
    /// Returns `false` when the grpprl ended in an incomplete SPRM. Everything
    /// before that SPRM has been applied.
    pub fn apply_grpprl(&mut self, grpprl: &[u8], ctx: &CharacterContext<'_>) -> bool {
        let mut sprms = SprmIterator::new(grpprl);
        for sprm in sprms.by_ref() {
            self.apply_sprm(&sprm, ctx);
        }
        !sprms.is_truncated()
    }

    /// Apply a single SPRM. Unknown opcodes are ignored.
    pub fn apply_sprm(&mut self, sprm: &Sprm, ctx: &CharacterContext<'_>) {
        match sprm.opcode {
            SPRM_C_F_BOLD => self.toggle(sprm, FontStyle::BOLD),
            SPRM_C_F_ITALIC => self.toggle(sprm, FontStyle::ITALIC),
            SPRM_C_F_STRIKE => self.toggle(sprm, FontStyle::STRIKETHROUGH),
            SPRM_C_F_SMALL_CAPS => self.toggle(sprm, FontStyle::SMALL_CAPITALS),
            SPRM_C_F_CAPS => self.toggle(sprm, FontStyle::CAPITALS),
            SPRM_C_F_VANISH => self.toggle(sprm, FontStyle::HIDDEN),
            SPRM_C_F_RMARK_DEL => self.toggle(sprm, FontStyle::MARKED_DELETED),
            // kul is an underline kind; only none vs. some matters here
            SPRM_C_KUL => self.toggle(sprm, FontStyle::UNDERLINE),
            SPRM_C_HPS => {
                if let Some(hps) = sprm.operand_word() {
                    self.font_size = hps;
                }
            },
            SPRM_C_ISS => {
                if let Some(iss) = sprm.operand_byte() {
                    self.font_style
                        .remove(FontStyle::SUPERSCRIPT | FontStyle::SUBSCRIPT);
                    match iss {
                        1 => self.font_style.insert(FontStyle::SUPERSCRIPT),
                        2 => self.font_style.insert(FontStyle::SUBSCRIPT),
                        _ => {},
                    }
                }
            },
            SPRM_C_ISTD => {
                if let (Some(istd), Some(styles)) = (sprm.operand_word(), ctx.styles) {
                    let offset = self.document_offset;
                    *self = styles.character_baseline(istd).at(offset);
                }
            },
            SPRM_C_PLAIN => {
                let offset = self.document_offset;
                *self = ctx.plain.at(offset);
            },
            SPRM_C_DEFAULT => {
                self.font_style.remove(
                    FontStyle::BOLD
                        | FontStyle::ITALIC
                        | FontStyle::STRIKETHROUGH
                        | FontStyle::SMALL_CAPITALS
                        | FontStyle::CAPITALS
                        | FontStyle::HIDDEN
                        | FontStyle::UNDERLINE,
                );
            },
            _ => {},
        }
    }

    fn toggle(&mut self, sprm: &Sprm, flag: FontStyle) {
        if let Some(value) = sprm.operand_byte() {
            ToggleOperand::from_byte(value).apply(&mut self.font_style, flag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(base: &CharacterFormat, grpprl: &[u8]) -> (CharacterFormat, bool) {
        let plain = CharacterFormat::default();
        let ctx = CharacterContext {
            styles: None,
            plain: &plain,
        };
        let mut chp = base.clone();
        let complete = chp.apply_grpprl(grpprl, &ctx);
        (chp, complete)
    }

    fn bold_base() -> CharacterFormat {
        CharacterFormat {
            font_style: FontStyle::BOLD,
            ..CharacterFormat::default()
        }
    }

    #[test]
    fn test_default_chp() {
        let chp = CharacterFormat::default();
        assert_eq!(chp.document_offset, 0);
        assert!(chp.font_style.is_empty());
        assert_eq!(chp.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(chp.font_size_points(), 10.0);
    }

    #[test]
    fn test_unchanged_keeps_inherited_bit() {
        let (chp, _) = apply(&bold_base(), &[0x35, 0x08, 0x80]);
        assert!(chp.is_bold());

        let (chp, _) = apply(&CharacterFormat::default(), &[0x35, 0x08, 0x80]);
        assert!(!chp.is_bold());
    }

    #[test]
    fn test_negation_inverts_inherited_bit() {
        let (chp, _) = apply(&bold_base(), &[0x35, 0x08, 0x81]);
        assert!(!chp.is_bold());

        let (chp, _) = apply(&CharacterFormat::default(), &[0x35, 0x08, 0x81]);
        assert!(chp.is_bold());
    }

    #[test]
    fn test_set_and_unset() {
        let (chp, _) = apply(&CharacterFormat::default(), &[0x36, 0x08, 0x01]);
        assert!(chp.is_italic());
        let (chp, _) = apply(&bold_base(), &[0x35, 0x08, 0x00]);
        assert!(!chp.is_bold());
        // unknown non-zero operand falls back to set
        let (chp, _) = apply(&CharacterFormat::default(), &[0x37, 0x08, 0x05]);
        assert!(chp.font_style.contains(FontStyle::STRIKETHROUGH));
    }

    #[test]
    fn test_later_sprm_wins() {
        let grpprl = [
            0x43, 0x4A, 0x18, 0x00, // 12pt
            0x35, 0x08, 0x01, // bold on
            0x43, 0x4A, 0x1C, 0x00, // 14pt
            0x35, 0x08, 0x00, // bold off
        ];
        let (chp, complete) = apply(&CharacterFormat::default(), &grpprl);
        assert!(complete);
        assert_eq!(chp.font_size, 28);
        assert!(!chp.is_bold());
    }

    #[test]
    fn test_super_and_subscript_are_exclusive() {
        let (chp, _) = apply(&CharacterFormat::default(), &[0x48, 0x2A, 0x01]);
        assert_eq!(chp.font_style, FontStyle::SUPERSCRIPT);
        let (chp, _) = apply(&chp, &[0x48, 0x2A, 0x02]);
        assert_eq!(chp.font_style, FontStyle::SUBSCRIPT);
        let (chp, _) = apply(&chp, &[0x48, 0x2A, 0x00]);
        assert!(chp.font_style.is_empty());
    }

    #[test]
    fn test_underline_and_flags() {
        let grpprl = [
            0x3E, 0x2A, 0x03, // double underline
            0x3A, 0x08, 0x01, // small caps
            0x3B, 0x08, 0x01, // caps
            0x3C, 0x08, 0x01, // hidden
            0x00, 0x08, 0x01, // deleted
        ];
        let (chp, _) = apply(&CharacterFormat::default(), &grpprl);
        assert_eq!(
            chp.font_style,
            FontStyle::UNDERLINE
                | FontStyle::SMALL_CAPITALS
                | FontStyle::CAPITALS
                | FontStyle::HIDDEN
                | FontStyle::MARKED_DELETED
        );
    }

    #[test]
    fn test_plain_and_default() {
        let mut base = bold_base();
        base.font_style |= FontStyle::SUPERSCRIPT;
        base.font_size = 40;

        let (chp, _) = apply(&base, &[0x32, 0x2A, 0x00]);
        assert_eq!(chp.font_style, FontStyle::SUPERSCRIPT);
        assert_eq!(chp.font_size, 40);

        let (chp, _) = apply(&base.at(7), &[0x33, 0x2A, 0x00]);
        assert_eq!(chp, CharacterFormat::default().at(7));
    }

    #[test]
    fn test_truncated_grpprl_keeps_applied_prefix() {
        let grpprl = [0x35, 0x08, 0x01, 0x43, 0x4A, 0x18];
        let (chp, complete) = apply(&CharacterFormat::default(), &grpprl);
        assert!(!complete);
        assert!(chp.is_bold());
        assert_eq!(chp.font_size, DEFAULT_FONT_SIZE);
    }

    #[test]
    fn test_unknown_opcode_is_skipped() {
        let grpprl = [
            0x42, 0x2A, 0x06, // sprmCIco, not decoded
            0x03, 0x6A, 0x01, 0x02, 0x03, 0x04, // sprmCPicLocation, not decoded
            0x36, 0x08, 0x01,
        ];
        let (chp, complete) = apply(&CharacterFormat::default(), &grpprl);
        assert!(complete);
        assert_eq!(chp.font_style, FontStyle::ITALIC);
    }

    #[cfg(test)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        const TOGGLES: [(u16, FontStyle); 7] = [
            (SPRM_C_F_BOLD, FontStyle::BOLD),
            (SPRM_C_F_ITALIC, FontStyle::ITALIC),
            (SPRM_C_F_STRIKE, FontStyle::STRIKETHROUGH),
            (SPRM_C_F_SMALL_CAPS, FontStyle::SMALL_CAPITALS),
            (SPRM_C_F_CAPS, FontStyle::CAPITALS),
            (SPRM_C_F_VANISH, FontStyle::HIDDEN),
            (SPRM_C_F_RMARK_DEL, FontStyle::MARKED_DELETED),
        ];

        fn toggle_grpprl(index: usize, operand: u8) -> Vec<u8> {
            let [lo, hi] = TOGGLES[index].0.to_le_bytes();
            vec![lo, hi, operand]
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn prop_unchanged_is_noop(bits in 0u16..0x0400, index in 0usize..7, size in 2u16..200) {
                let base = CharacterFormat {
                    document_offset: 0,
                    font_style: FontStyle::from_bits_truncate(bits),
                    font_size: size,
                };
                let (chp, _) = apply(&base, &toggle_grpprl(index, 0x80));
                prop_assert_eq!(chp, base);
            }

            #[test]
            fn prop_negation_flips_only_target(bits in 0u16..0x0400, index in 0usize..7) {
                let base = CharacterFormat {
                    font_style: FontStyle::from_bits_truncate(bits),
                    ..CharacterFormat::default()
                };
                let flag = TOGGLES[index].1;
                let (chp, _) = apply(&base, &toggle_grpprl(index, 0x81));
                prop_assert_eq!(chp.font_style, base.font_style ^ flag);
            }

            #[test]
            fn prop_cascade_is_deterministic(grpprl in prop::collection::vec(any::<u8>(), 0..64)) {
                let base = bold_base();
                let (first, first_complete) = apply(&base, &grpprl);
                let (second, second_complete) = apply(&base, &grpprl);
                prop_assert_eq!(first, second);
                prop_assert_eq!(first_complete, second_complete);
            }
        }
    }
}
