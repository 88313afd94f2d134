/// The decoded main stream of a Word binary document.
///
/// `OleMainStream` ties the table decoders together: it reads the FIB,
/// selects the table stream, decodes the style sheet and the piece table,
/// then the paragraph runs, the character runs (which depend on the
/// paragraph styles) and finally the sections. Any fatal failure leaves the
/// stream unopened; nothing is published from a partial decode.
use super::error::{DocError, Result};
use super::options::DecodeOptions;
use super::parts::bin_table::{read_character_runs, read_paragraph_runs};
use super::parts::chp::CharacterFormat;
use super::parts::fib::{FcLcb, FileInformationBlock};
use super::parts::pap::ParagraphFormat;
use super::parts::piece_table::{Piece, PieceTable};
use super::parts::sep::{SectionBreak, read_sections};
use super::parts::stylesheet::StyleSheet;
use super::storage::{StreamSource, WORD_DOCUMENT_STREAM};
use crate::common::binary::ByteWindow;
use bytes::Bytes;
use encoding_rs::{UTF_16LE, WINDOWS_1252};

/// Bytes of the main stream handed to the FIB parser.
const FIB_HEADER_SIZE: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Decoded {
    fib: FileInformationBlock,
    word_document: Bytes,
    styles: StyleSheet,
    pieces: Vec<Piece>,
    paragraphs: Vec<ParagraphFormat>,
    characters: Vec<CharacterFormat>,
    sections: Vec<SectionBreak>,
    warnings: Vec<DocError>,
}

/// Structural and formatting data of one `.doc` document.
///
/// # Examples
///
/// ```no_run
/// use docstream::ole::doc::{DecodeOptions, MemoryStorage, OleMainStream};
///
/// # fn streams() -> MemoryStorage { MemoryStorage::new() }
/// let storage = streams();
/// let stream = OleMainStream::decode(&storage, DecodeOptions::default())?;
/// for run in stream.paragraph_format_runs() {
///     println!("{} {:?}", run.document_offset, run.alignment);
/// }
/// println!("{}", stream.text()?);
/// # Ok::<(), docstream::ole::doc::DocError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct OleMainStream {
    options: DecodeOptions,
    decoded: Option<Decoded>,
}

impl OleMainStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecodeOptions) -> Self {
        Self {
            options,
            decoded: None,
        }
    }

    /// Decode `source` into a new, open stream.
    pub fn decode<S: StreamSource + ?Sized>(source: &S, options: DecodeOptions) -> Result<Self> {
        let mut stream = Self::with_options(options);
        stream.open(source)?;
        Ok(stream)
    }

    #[inline]
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode the document.
    ///
    /// On failure the stream stays unopened and may be opened again with
    /// other input. Opening an already open stream does nothing.
    pub fn open<S: StreamSource + ?Sized>(&mut self, source: &S) -> Result<()> {
        if self.decoded.is_some() {
            log::debug!("main stream already open");
            return Ok(());
        }
        self.decoded = Some(Self::decode_streams(source, &self.options)?);
        Ok(())
    }

    fn decode_streams<S: StreamSource + ?Sized>(
        source: &S,
        options: &DecodeOptions,
    ) -> Result<Decoded> {
        let word_document = source
            .stream(WORD_DOCUMENT_STREAM)
            .ok_or_else(|| DocError::StreamNotFound(WORD_DOCUMENT_STREAM.to_string()))?;
        let header = &word_document[..word_document.len().min(FIB_HEADER_SIZE)];
        let fib = FileInformationBlock::parse(header, word_document.len())?;

        let table_name = fib.table_stream_name();
        let table = source
            .stream(table_name)
            .ok_or_else(|| DocError::StreamNotFound(table_name.to_string()))?;
        fib.check_table_ranges(table.len())?;
        // ranges were checked above
        let slice = |range: FcLcb| range.slice(&table).unwrap_or(&[]);

        let mut warnings = Vec::new();
        let styles = StyleSheet::parse(
            slice(fib.stylesheet()),
            options.default_font_size,
            &mut warnings,
        );

        let mut pieces = PieceTable::parse(
            slice(fib.piece_table()),
            fib.last_cp(),
            word_document.len(),
        )?;
        let end_cp = if options.include_subdocuments {
            pieces.last_cp()
        } else {
            fib.end_of_text()
        };
        pieces.clip(end_cp);

        let paragraphs = read_paragraph_runs(
            slice(fib.paragraph_bin_table()),
            &word_document,
            &pieces,
            &styles,
            &mut warnings,
        )?;
        let characters = read_character_runs(
            slice(fib.character_bin_table()),
            &word_document,
            &pieces,
            &styles,
            &paragraphs,
            &mut warnings,
        )?;
        let sections = read_sections(
            slice(fib.section_table()),
            &word_document,
            end_cp,
            &mut warnings,
        )?;

        for warning in &warnings {
            log::warn!("{}", warning);
        }
        log::debug!(
            "opened main stream: {} pieces, {} paragraph runs, {} character runs, {} sections",
            pieces.pieces().len(),
            paragraphs.len(),
            characters.len(),
            sections.len()
        );

        Ok(Decoded {
            fib,
            word_document,
            styles,
            pieces: pieces.into_pieces(),
            paragraphs,
            characters,
            sections,
            warnings,
        })
    }

    /// Whether `open` has succeeded.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.decoded.is_some()
    }

    /// Text pieces in character-position order. Empty until opened.
    pub fn pieces(&self) -> &[Piece] {
        self.decoded.as_ref().map_or(&[], |d| d.pieces.as_slice())
    }

    /// Character runs in character-position order. Empty until opened.
    pub fn character_format_runs(&self) -> &[CharacterFormat] {
        self.decoded.as_ref().map_or(&[], |d| d.characters.as_slice())
    }

    /// Paragraph runs in character-position order. Empty until opened.
    pub fn paragraph_format_runs(&self) -> &[ParagraphFormat] {
        self.decoded.as_ref().map_or(&[], |d| d.paragraphs.as_slice())
    }

    /// Section boundaries in character-position order. Empty until opened.
    ///
    /// An empty list means the whole document is one section starting at 0.
    pub fn section_breaks(&self) -> &[SectionBreak] {
        self.decoded.as_ref().map_or(&[], |d| d.sections.as_slice())
    }

    pub fn fib(&self) -> Option<&FileInformationBlock> {
        self.decoded.as_ref().map(|d| &d.fib)
    }

    pub fn styles(&self) -> Option<&StyleSheet> {
        self.decoded.as_ref().map(|d| &d.styles)
    }

    /// Damage that was tolerated while decoding.
    pub fn warnings(&self) -> &[DocError] {
        self.decoded.as_ref().map_or(&[], |d| d.warnings.as_slice())
    }

    /// Text of one piece.
    pub fn piece_text(&self, piece: &Piece) -> Result<String> {
        let Some(decoded) = &self.decoded else {
            return Ok(String::new());
        };
        let len = usize::try_from(piece.byte_len()).map_err(|_| {
            DocError::MalformedPieceTable(format!("piece of {} bytes", piece.byte_len()))
        })?;
        let bytes = ByteWindow::slice_of(&decoded.word_document, piece.offset as usize, len)
            .map_err(DocError::piece_table)?;
        let encoding = if piece.is_narrow { WINDOWS_1252 } else { UTF_16LE };
        let (text, _) = encoding.decode_without_bom_handling(bytes.as_slice());
        Ok(text.into_owned())
    }

    /// Published text, pieces concatenated in order.
    pub fn text(&self) -> Result<String> {
        let mut text = String::new();
        for piece in self.pieces() {
            text.push_str(&self.piece_text(piece)?);
        }
        Ok(text)
    }
}
