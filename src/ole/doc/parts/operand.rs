/// Interpretation of single-byte flag operands.
///
/// Character emphasis SPRMs do not carry a plain boolean. Their operand is one
/// of four states, and two of them refer to the value the accumulator already
/// holds (inherited from the style baseline or from an earlier SPRM in the
/// same grpprl). Collapsing the operand to `operand != 0` turns "leave as is"
/// into "set", which is how inherited bold or italic gets corrupted.
use bitflags::Flags;

/// Four-state operand of a character toggle SPRM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOperand {
    /// 0: clear the property
    Unset,
    /// 1: set the property
    Set,
    /// 128: leave the property exactly as it is
    Unchanged,
    /// 129: invert the current value of the property
    Negation,
}

impl ToggleOperand {
    pub const UNSET: u8 = 0x00;
    pub const SET: u8 = 0x01;
    pub const UNCHANGED: u8 = 0x80;
    pub const NEGATION: u8 = 0x81;

    /// Classify an operand byte. Unknown non-zero values count as `Set`.
    #[inline]
    pub fn from_byte(value: u8) -> Self {
        match value {
            Self::UNSET => ToggleOperand::Unset,
            Self::SET => ToggleOperand::Set,
            Self::UNCHANGED => ToggleOperand::Unchanged,
            Self::NEGATION => ToggleOperand::Negation,
            _ => ToggleOperand::Set,
        }
    }

    /// Resolve against the current value of the property.
    #[inline]
    pub fn resolve(self, current: bool) -> bool {
        match self {
            ToggleOperand::Unset => false,
            ToggleOperand::Set => true,
            ToggleOperand::Unchanged => current,
            ToggleOperand::Negation => !current,
        }
    }

    /// Apply to `flag` inside a flag set.
    ///
    /// `Unchanged` does not write to `flags` at all.
    pub fn apply<F: Flags + Copy>(self, flags: &mut F, flag: F) {
        match self {
            ToggleOperand::Unchanged => {},
            other => {
                let value = other.resolve(flags.contains(flag));
                flags.set(flag, value);
            },
        }
    }
}

/// Two-state operand used by structural flags (page break before, section
/// break kind). Zero clears, anything else sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralFlag {
    Unset,
    Set,
}

impl StructuralFlag {
    #[inline]
    pub fn from_byte(value: u8) -> Self {
        if value == 0 {
            StructuralFlag::Unset
        } else {
            StructuralFlag::Set
        }
    }

    #[inline]
    pub fn is_set(self) -> bool {
        self == StructuralFlag::Set
    }
}
