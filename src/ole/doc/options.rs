/// Options for decoding a Word binary document.
use super::parts::chp::DEFAULT_FONT_SIZE;

/// Controls how [`OleMainStream`](super::OleMainStream) publishes its result.
///
/// # Examples
///
/// ```
/// use docstream::ole::doc::DecodeOptions;
///
/// let options = DecodeOptions {
///     include_subdocuments: true,
///     ..Default::default()
/// };
/// assert_eq!(options.default_font_size, 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Font size in half-points for text no operand sizes
    pub default_font_size: u16,
    /// Publish footnotes, headers, annotations, endnotes and text boxes
    /// after the main text instead of clipping to it
    pub include_subdocuments: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            default_font_size: DEFAULT_FONT_SIZE,
            include_subdocuments: false,
        }
    }
}
