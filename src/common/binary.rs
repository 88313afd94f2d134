//! Binary data access shared by every table decoder.
//!
//! All reads are little-endian and bounds-checked. Decoders never index raw
//! slices with computed offsets; they carve [`ByteWindow`]s out of the stream
//! buffers and read through them, so an offset that points past the end of a
//! table surfaces as a [`BinaryError`] instead of a panic.

use zerocopy::{FromBytes, I16, I32, LE, U16, U32};

/// Binary parsing error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryError {
    /// Not enough data to read the requested type
    InsufficientData { expected: usize, available: usize },
    /// Failed to parse the data
    ParseError(String),
}

impl std::fmt::Display for BinaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryError::InsufficientData {
                expected,
                available,
            } => {
                write!(
                    f,
                    "Insufficient data: expected {}, got {}",
                    expected, available
                )
            },
            BinaryError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for BinaryError {}

/// Result type for binary operations
pub type BinaryResult<T> = Result<T, BinaryError>;

#[inline]
fn checked_end(data: &[u8], offset: usize, width: usize) -> BinaryResult<usize> {
    let end = offset
        .checked_add(width)
        .ok_or_else(|| BinaryError::ParseError(format!("offset {} overflows", offset)))?;
    if end > data.len() {
        return Err(BinaryError::InsufficientData {
            expected: end,
            available: data.len(),
        });
    }
    Ok(end)
}

/// Read a byte from a slice at the given offset.
#[inline]
pub fn read_u8(data: &[u8], offset: usize) -> BinaryResult<u8> {
    data.get(offset)
        .copied()
        .ok_or(BinaryError::InsufficientData {
            expected: offset + 1,
            available: data.len(),
        })
}

/// Read a little-endian u16 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use docstream::common::binary::read_u16_le;
/// let data = [0x34, 0x12, 0x78, 0x56];
/// assert_eq!(read_u16_le(&data, 0).unwrap(), 0x1234);
/// assert_eq!(read_u16_le(&data, 2).unwrap(), 0x5678);
/// ```
#[inline]
pub fn read_u16_le(data: &[u8], offset: usize) -> BinaryResult<u16> {
    let end = checked_end(data, offset, 2)?;
    U16::<LE>::read_from_bytes(&data[offset..end])
        .map(|v| v.get())
        .map_err(|_| BinaryError::ParseError("Failed to read u16".to_string()))
}

/// Read a little-endian i16 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use docstream::common::binary::read_i16_le;
/// let data = [0xFF, 0xFF];
/// assert_eq!(read_i16_le(&data, 0).unwrap(), -1i16);
/// ```
#[inline]
pub fn read_i16_le(data: &[u8], offset: usize) -> BinaryResult<i16> {
    let end = checked_end(data, offset, 2)?;
    I16::<LE>::read_from_bytes(&data[offset..end])
        .map(|v| v.get())
        .map_err(|_| BinaryError::ParseError("Failed to read i16".to_string()))
}

/// Read a little-endian u32 from a byte slice at the given offset.
#[inline]
pub fn read_u32_le(data: &[u8], offset: usize) -> BinaryResult<u32> {
    let end = checked_end(data, offset, 4)?;
    U32::<LE>::read_from_bytes(&data[offset..end])
        .map(|v| v.get())
        .map_err(|_| BinaryError::ParseError("Failed to read u32".to_string()))
}

/// Read a little-endian i32 from a byte slice at the given offset.
#[inline]
pub fn read_i32_le(data: &[u8], offset: usize) -> BinaryResult<i32> {
    let end = checked_end(data, offset, 4)?;
    I32::<LE>::read_from_bytes(&data[offset..end])
        .map(|v| v.get())
        .map_err(|_| BinaryError::ParseError("Failed to read i32".to_string()))
}

/// A read-only, bounds-checked view over part of a byte buffer.
///
/// The window borrows the buffer; it never owns or copies the bytes.
/// Offsets passed to the accessors are relative to the window start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteWindow<'a> {
    data: &'a [u8],
}

impl<'a> ByteWindow<'a> {
    /// Create a window over the whole buffer.
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Create a window over `len` bytes starting at `start` in `data`.
    pub fn slice_of(data: &'a [u8], start: usize, len: usize) -> BinaryResult<Self> {
        ByteWindow::new(data).sub(start, len)
    }

    /// Number of bytes visible through the window.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The underlying bytes of the window.
    #[inline]
    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    /// Narrow the window to `len` bytes starting at `start`.
    pub fn sub(&self, start: usize, len: usize) -> BinaryResult<ByteWindow<'a>> {
        let end = checked_end(self.data, start, len)?;
        Ok(ByteWindow {
            data: &self.data[start..end],
        })
    }

    /// Everything from `start` to the end of the window.
    pub fn tail(&self, start: usize) -> BinaryResult<ByteWindow<'a>> {
        if start > self.data.len() {
            return Err(BinaryError::InsufficientData {
                expected: start,
                available: self.data.len(),
            });
        }
        Ok(ByteWindow {
            data: &self.data[start..],
        })
    }

    /// Bytes from `start` up to `len`, or fewer if the window ends first.
    ///
    /// Returns the window and whether it had to be shortened.
    pub fn clamped(&self, start: usize, len: usize) -> (ByteWindow<'a>, bool) {
        let start = start.min(self.data.len());
        let available = self.data.len() - start;
        let take = len.min(available);
        (
            ByteWindow {
                data: &self.data[start..start + take],
            },
            take < len,
        )
    }

    #[inline]
    pub fn u8_at(&self, offset: usize) -> BinaryResult<u8> {
        read_u8(self.data, offset)
    }

    #[inline]
    pub fn u16_at(&self, offset: usize) -> BinaryResult<u16> {
        read_u16_le(self.data, offset)
    }

    #[inline]
    pub fn i16_at(&self, offset: usize) -> BinaryResult<i16> {
        read_i16_le(self.data, offset)
    }

    #[inline]
    pub fn u32_at(&self, offset: usize) -> BinaryResult<u32> {
        read_u32_le(self.data, offset)
    }

    #[inline]
    pub fn i32_at(&self, offset: usize) -> BinaryResult<i32> {
        read_i32_le(self.data, offset)
    }
}

impl<'a> From<&'a [u8]> for ByteWindow<'a> {
    fn from(data: &'a [u8]) -> Self {
        ByteWindow::new(data)
    }
}
