//! Property List with Character Positions (PLCF) parser.
//!
//! A PLCF maps position boundaries to fixed-size data elements. The piece
//! table, both property bin tables and the section table are all PLCFs.

use crate::common::binary::ByteWindow;

/// A borrowed PLCF.
///
/// # Format
///
/// - n+1 positions (4 bytes each)
/// - n data elements (element_size bytes each)
///
/// # Examples
///
/// ```
/// use docstream::ole::plcf::PlcfParser;
///
/// // CPs: 0, 10, 20; elements: [1, 2], [3, 4]
/// let data = vec![
///     0x00, 0x00, 0x00, 0x00,
///     0x0A, 0x00, 0x00, 0x00,
///     0x14, 0x00, 0x00, 0x00,
///     0x01, 0x02,
///     0x03, 0x04,
/// ];
///
/// let plcf = PlcfParser::parse(&data, 2).unwrap();
/// assert_eq!(plcf.count(), 2);
/// assert_eq!(plcf.range(1), Some((10, 20)));
/// assert_eq!(plcf.property(0), Some(&[1u8, 2][..]));
/// ```
#[derive(Debug, Clone)]
pub struct PlcfParser<'a> {
    /// Position boundaries (n+1 entries)
    positions: Vec<u32>,
    /// Element area of the PLCF
    elements: ByteWindow<'a>,
    /// Size of each element in bytes
    element_size: usize,
}

impl<'a> PlcfParser<'a> {
    /// Parse a PLCF structure from binary data.
    ///
    /// Returns `None` when the data is shorter than one boundary, the element
    /// size is zero, or the length does not describe a whole number of
    /// elements.
    pub fn parse(data: &'a [u8], element_size: usize) -> Option<Self> {
        if data.len() < 4 || element_size == 0 {
            return None;
        }

        // n+1 CPs (4 bytes each) + n elements (element_size each)
        let body = data.len() - 4;
        if body % (4 + element_size) != 0 {
            return None;
        }
        let n = body / (4 + element_size);

        let window = ByteWindow::new(data);
        let mut positions = Vec::with_capacity(n + 1);
        for i in 0..=n {
            positions.push(window.u32_at(i * 4).ok()?);
        }

        let elements = window.sub((n + 1) * 4, n * element_size).ok()?;

        Some(Self {
            positions,
            elements,
            element_size,
        })
    }

    /// Get the number of elements in the PLCF.
    #[inline]
    pub fn count(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }

    /// Get position boundary at index (0..=count).
    #[inline]
    pub fn position(&self, index: usize) -> Option<u32> {
        self.positions.get(index).copied()
    }

    /// All position boundaries.
    #[inline]
    pub fn positions(&self) -> &[u32] {
        &self.positions
    }

    /// Get element data at index.
    #[inline]
    pub fn property(&self, index: usize) -> Option<&'a [u8]> {
        self.element(index).map(|w| w.as_slice())
    }

    /// Get element data at index as a window.
    pub fn element(&self, index: usize) -> Option<ByteWindow<'a>> {
        if index >= self.count() {
            return None;
        }
        self.elements
            .sub(index * self.element_size, self.element_size)
            .ok()
    }

    /// Get position range for element at index.
    ///
    /// Returns (start, end) tuple.
    pub fn range(&self, index: usize) -> Option<(u32, u32)> {
        if index >= self.count() {
            return None;
        }
        Some((self.positions[index], self.positions[index + 1]))
    }
}
