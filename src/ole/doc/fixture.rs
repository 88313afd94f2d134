//! Builders for synthetic WordDocument and table streams used in tests.
use super::parts::fib::FcLcb;
use super::parts::fkp::FKP_PAGE_SIZE;
use super::storage::MemoryStorage;

const CB_STSHI: u16 = 18;
const CB_STD_BASE: u16 = 10;
const TEXT_START: u32 = 0x400;

/// A style definition for [`build_stsh`].
#[derive(Debug, Clone)]
pub struct StdSpec {
    sti: u16,
    sgc: u16,
    base: u16,
    next: u16,
    name: String,
    papx: Vec<u8>,
    chpx: Vec<u8>,
}

impl StdSpec {
    pub fn paragraph(sti: u16, name: &str) -> Self {
        Self {
            sti,
            sgc: 1,
            base: 0x0FFF,
            next: 0,
            name: name.to_string(),
            papx: Vec::new(),
            chpx: Vec::new(),
        }
    }

    pub fn character(sti: u16, name: &str) -> Self {
        Self {
            sgc: 2,
            ..Self::paragraph(sti, name)
        }
    }

    pub fn papx(mut self, grpprl: &[u8]) -> Self {
        self.papx = grpprl.to_vec();
        self
    }

    pub fn chpx(mut self, grpprl: &[u8]) -> Self {
        self.chpx = grpprl.to_vec();
        self
    }

    pub fn base(mut self, istd: u16) -> Self {
        self.base = istd;
        self
    }

    fn build(&self, istd: u16) -> Vec<u8> {
        let cupx: u16 = if self.sgc == 1 { 2 } else { 1 };
        let mut std = Vec::new();
        std.extend_from_slice(&self.sti.to_le_bytes());
        std.extend_from_slice(&(self.sgc | (self.base << 4)).to_le_bytes());
        std.extend_from_slice(&(cupx | (self.next << 4)).to_le_bytes());
        std.extend_from_slice(&[0u8; 4]);

        let name: Vec<u16> = self.name.encode_utf16().collect();
        std.extend_from_slice(&(name.len() as u16).to_le_bytes());
        for unit in name {
            std.extend_from_slice(&unit.to_le_bytes());
        }
        std.extend_from_slice(&[0, 0]);

        let mut upxs = Vec::new();
        if self.sgc == 1 {
            let mut papx = istd.to_le_bytes().to_vec();
            papx.extend_from_slice(&self.papx);
            upxs.push(papx);
        }
        upxs.push(self.chpx.clone());
        for upx in upxs {
            if std.len() % 2 == 1 {
                std.push(0);
            }
            std.extend_from_slice(&(upx.len() as u16).to_le_bytes());
            std.extend_from_slice(&upx);
        }
        std
    }
}

/// Build an STSH; `None` slots are written as empty definitions.
pub fn build_stsh(slots: &[Option<StdSpec>]) -> Vec<u8> {
    let mut stsh = Vec::new();
    stsh.extend_from_slice(&CB_STSHI.to_le_bytes());
    stsh.extend_from_slice(&(slots.len() as u16).to_le_bytes());
    stsh.extend_from_slice(&CB_STD_BASE.to_le_bytes());
    stsh.resize(2 + CB_STSHI as usize, 0);

    for (istd, slot) in slots.iter().enumerate() {
        match slot {
            Some(spec) => {
                let std = spec.build(istd as u16);
                stsh.extend_from_slice(&(std.len() as u16).to_le_bytes());
                stsh.extend_from_slice(&std);
            },
            None => stsh.extend_from_slice(&[0, 0]),
        }
    }
    stsh
}

/// A piece descriptor for [`build_clx`]; `offset` is the byte offset of the
/// text.
#[derive(Debug, Clone, Copy)]
pub struct PcdSpec {
    pub offset: u32,
    pub length: u32,
    pub narrow: bool,
}

impl PcdSpec {
    pub fn narrow(offset: u32, length: u32) -> Self {
        Self {
            offset,
            length,
            narrow: true,
        }
    }

    pub fn wide(offset: u32, length: u32) -> Self {
        Self {
            offset,
            length,
            narrow: false,
        }
    }

    fn fc(&self) -> u32 {
        if self.narrow {
            (self.offset * 2) | 0x4000_0000
        } else {
            self.offset
        }
    }
}

/// Build a CLX holding just a piece table.
pub fn build_clx(pieces: &[PcdSpec]) -> Vec<u8> {
    let mut plc = Vec::new();
    let mut cp = 0u32;
    plc.extend_from_slice(&cp.to_le_bytes());
    for piece in pieces {
        cp += piece.length;
        plc.extend_from_slice(&cp.to_le_bytes());
    }
    for piece in pieces {
        plc.extend_from_slice(&[0, 0]);
        plc.extend_from_slice(&piece.fc().to_le_bytes());
        plc.extend_from_slice(&[0, 0]);
    }

    let mut clx = vec![0x02];
    clx.extend_from_slice(&(plc.len() as u32).to_le_bytes());
    clx.extend_from_slice(&plc);
    clx
}

/// Write `data` backwards from the end of the property area, at an even
/// offset, and return that offset / 2.
fn place(page: &mut [u8], floor: &mut usize, data: &[u8]) -> u8 {
    let mut start = *floor - data.len();
    start &= !1;
    page[start..start + data.len()].copy_from_slice(data);
    *floor = start;
    (start / 2) as u8
}

/// Build a CHPX FKP. `None` rows have default formatting.
pub fn build_chpx_fkp(rows: &[(u32, Option<&[u8]>)], last_fc: u32) -> Vec<u8> {
    let mut page = vec![0u8; FKP_PAGE_SIZE];
    let crun = rows.len();
    for (i, (fc, _)) in rows.iter().enumerate() {
        page[i * 4..i * 4 + 4].copy_from_slice(&fc.to_le_bytes());
    }
    page[crun * 4..crun * 4 + 4].copy_from_slice(&last_fc.to_le_bytes());

    let bx = (crun + 1) * 4;
    let mut floor = FKP_PAGE_SIZE - 1;
    for (i, (_, grpprl)) in rows.iter().enumerate() {
        if let Some(grpprl) = grpprl {
            let mut chpx = vec![grpprl.len() as u8];
            chpx.extend_from_slice(grpprl);
            let b = place(&mut page, &mut floor, &chpx);
            page[bx + i] = b;
        }
    }
    page[FKP_PAGE_SIZE - 1] = crun as u8;
    page
}

/// Build a PAPX FKP. Rows carry `(istd, grpprl)`; `None` rows have default
/// properties.
pub fn build_papx_fkp(rows: &[(u32, Option<(u16, &[u8])>)], last_fc: u32) -> Vec<u8> {
    let mut page = vec![0u8; FKP_PAGE_SIZE];
    let crun = rows.len();
    for (i, (fc, _)) in rows.iter().enumerate() {
        page[i * 4..i * 4 + 4].copy_from_slice(&fc.to_le_bytes());
    }
    page[crun * 4..crun * 4 + 4].copy_from_slice(&last_fc.to_le_bytes());

    let bx = (crun + 1) * 4;
    let mut floor = FKP_PAGE_SIZE - 1;
    for (i, (_, papx)) in rows.iter().enumerate() {
        if let Some((istd, grpprl)) = papx {
            let mut content = istd.to_le_bytes().to_vec();
            content.extend_from_slice(grpprl);
            let mut bytes = if content.len() % 2 == 1 {
                vec![content.len().div_ceil(2) as u8]
            } else {
                vec![0, (content.len() / 2) as u8]
            };
            bytes.extend_from_slice(&content);
            let b = place(&mut page, &mut floor, &bytes);
            page[bx + i * 13] = b;
        }
    }
    page[FKP_PAGE_SIZE - 1] = crun as u8;
    page
}

/// Build a bin table PLCF from FC boundaries and page numbers.
pub fn build_bin_table(fcs: &[u32], pns: &[u32]) -> Vec<u8> {
    let mut plcf = Vec::new();
    for fc in fcs {
        plcf.extend_from_slice(&fc.to_le_bytes());
    }
    for pn in pns {
        plcf.extend_from_slice(&pn.to_le_bytes());
    }
    plcf
}

/// Build a PlcfSed from `(cp, fcSepx)` rows and the final boundary.
pub fn build_plcf_sed(rows: &[(u32, Option<u32>)], end_cp: u32) -> Vec<u8> {
    let mut plcf = Vec::new();
    for (cp, _) in rows {
        plcf.extend_from_slice(&cp.to_le_bytes());
    }
    plcf.extend_from_slice(&end_cp.to_le_bytes());
    for (_, fc_sepx) in rows {
        plcf.extend_from_slice(&[0, 0]);
        plcf.extend_from_slice(&fc_sepx.unwrap_or(0xFFFF_FFFF).to_le_bytes());
        plcf.extend_from_slice(&[0u8; 6]);
    }
    plcf
}

/// Field values for a synthetic Word 97 FIB.
#[derive(Debug, Clone)]
pub struct FibSpec {
    pub magic: u16,
    pub nfib: u16,
    pub flags: u16,
    pub fc_min: u32,
    pub fc_mac: u32,
    pub ccp_text: u32,
    pub ccp_footnotes: u32,
    pub cb_rg_fc_lcb: u16,
    /// FibRgFcLcb97 pairs by index
    pub tables: Vec<FcLcb>,
}

impl Default for FibSpec {
    fn default() -> Self {
        Self {
            magic: 0xA5EC,
            nfib: 0x00C1,
            flags: 0x0200,
            fc_min: TEXT_START,
            fc_mac: TEXT_START,
            ccp_text: 0,
            ccp_footnotes: 0,
            cb_rg_fc_lcb: 93,
            tables: vec![FcLcb::default(); 93],
        }
    }
}

impl FibSpec {
    /// Serialize with csw = 14 and cslw = 22; at least 1024 bytes.
    pub fn build(&self) -> Vec<u8> {
        let mut fib = vec![0u8; 32];
        fib[0..2].copy_from_slice(&self.magic.to_le_bytes());
        fib[2..4].copy_from_slice(&self.nfib.to_le_bytes());
        fib[0x0A..0x0C].copy_from_slice(&self.flags.to_le_bytes());
        fib[0x18..0x1C].copy_from_slice(&self.fc_min.to_le_bytes());
        fib[0x1C..0x20].copy_from_slice(&self.fc_mac.to_le_bytes());

        fib.extend_from_slice(&14u16.to_le_bytes());
        fib.extend_from_slice(&[0u8; 28]);
        fib.extend_from_slice(&22u16.to_le_bytes());
        let mut rglw = [0u32; 22];
        rglw[3] = self.ccp_text;
        rglw[4] = self.ccp_footnotes;
        for lw in rglw {
            fib.extend_from_slice(&lw.to_le_bytes());
        }

        fib.extend_from_slice(&self.cb_rg_fc_lcb.to_le_bytes());
        for i in 0..self.cb_rg_fc_lcb as usize {
            let pair = self.tables.get(i).copied().unwrap_or_default();
            fib.extend_from_slice(&pair.fc.to_le_bytes());
            fib.extend_from_slice(&pair.lcb.to_le_bytes());
        }
        if fib.len() < TEXT_START as usize {
            fib.resize(TEXT_START as usize, 0);
        }
        fib
    }
}

/// Text of one piece for [`DocBuilder`].
#[derive(Debug, Clone)]
enum PieceText {
    Narrow(String),
    Wide(String),
    /// A descriptor only; nothing is written to the main stream
    Raw(PcdSpec),
}

/// Assembles a complete WordDocument / 1Table pair.
///
/// Text is written at 0x400; FKP pages, SEPXs and the table stream follow.
/// Paragraph, character and section rows are given in character positions
/// and converted to byte offsets through the pieces.
#[derive(Debug, Clone, Default)]
pub struct DocBuilder {
    pub fib: FibSpec,
    pieces: Vec<PieceText>,
    main_text: Option<u32>,
    styles: Vec<Option<StdSpec>>,
    paragraphs: Vec<(u32, Option<(u16, Vec<u8>)>)>,
    characters: Vec<(u32, Option<Vec<u8>>)>,
    sections: Vec<(u32, Option<Vec<u8>>)>,
}

/// Streams produced by [`DocBuilder::build`].
#[derive(Debug, Clone)]
pub struct BuiltDoc {
    pub word_document: Vec<u8>,
    pub table: Vec<u8>,
    pub table_name: &'static str,
    /// Where the CLX sits in the table stream
    pub clx: FcLcb,
}

impl BuiltDoc {
    pub fn storage(&self) -> MemoryStorage {
        let mut storage = MemoryStorage::new();
        storage.insert("WordDocument", self.word_document.clone());
        storage.insert(self.table_name, self.table.clone());
        storage
    }
}

impl DocBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn narrow(mut self, text: &str) -> Self {
        self.pieces.push(PieceText::Narrow(text.to_string()));
        self
    }

    pub fn wide(mut self, text: &str) -> Self {
        self.pieces.push(PieceText::Wide(text.to_string()));
        self
    }

    pub fn raw_piece(mut self, piece: PcdSpec) -> Self {
        self.pieces.push(PieceText::Raw(piece));
        self
    }

    /// Declare only the first `ccp_text` characters as main text; the rest
    /// are footnotes followed by the closing paragraph mark.
    pub fn main_text(mut self, ccp_text: u32) -> Self {
        self.main_text = Some(ccp_text);
        self
    }

    pub fn style(mut self, spec: Option<StdSpec>) -> Self {
        self.styles.push(spec);
        self
    }

    pub fn paragraph(mut self, cp: u32, istd: u16, grpprl: &[u8]) -> Self {
        self.paragraphs.push((cp, Some((istd, grpprl.to_vec()))));
        self
    }

    pub fn run(mut self, cp: u32, grpprl: &[u8]) -> Self {
        self.characters.push((cp, Some(grpprl.to_vec())));
        self
    }

    pub fn section(mut self, cp: u32, sepx: Option<&[u8]>) -> Self {
        self.sections.push((cp, sepx.map(<[u8]>::to_vec)));
        self
    }

    fn length_of(piece: &PieceText) -> u32 {
        match piece {
            PieceText::Narrow(text) | PieceText::Wide(text) => text.encode_utf16().count() as u32,
            PieceText::Raw(spec) => spec.length,
        }
    }

    pub fn build(mut self) -> BuiltDoc {
        // text and piece descriptors
        let mut main = vec![0u8; TEXT_START as usize];
        let mut pcds = Vec::new();
        for piece in &self.pieces {
            let offset = main.len() as u32;
            match piece {
                PieceText::Narrow(text) => {
                    let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(text);
                    main.extend_from_slice(&bytes);
                    pcds.push(PcdSpec::narrow(offset, Self::length_of(piece)));
                },
                PieceText::Wide(text) => {
                    for unit in text.encode_utf16() {
                        main.extend_from_slice(&unit.to_le_bytes());
                    }
                    pcds.push(PcdSpec::wide(offset, Self::length_of(piece)));
                },
                PieceText::Raw(spec) => pcds.push(*spec),
            }
        }
        let text_end = main.len() as u32;
        let total: u32 = self.pieces.iter().map(Self::length_of).sum();

        let cp_to_fc = |cp: u32| -> u32 {
            let mut start = 0;
            for pcd in &pcds {
                if cp < start + pcd.length {
                    let stride = if pcd.narrow { 1 } else { 2 };
                    return pcd.offset + (cp - start) * stride;
                }
                start += pcd.length;
            }
            text_end
        };

        // FKP pages on 512-byte boundaries after the text
        let align = |main: &mut Vec<u8>| {
            let len = main.len().div_ceil(FKP_PAGE_SIZE) * FKP_PAGE_SIZE;
            main.resize(len, 0);
            (len / FKP_PAGE_SIZE) as u32
        };
        let mut papx_bte = Vec::new();
        if !self.paragraphs.is_empty() {
            let rows: Vec<(u32, Option<(u16, &[u8])>)> = self
                .paragraphs
                .iter()
                .map(|(cp, papx)| {
                    (cp_to_fc(*cp), papx.as_ref().map(|(istd, g)| (*istd, g.as_slice())))
                })
                .collect();
            let pn = align(&mut main);
            main.extend_from_slice(&build_papx_fkp(&rows, text_end));
            papx_bte = build_bin_table(&[rows[0].0, text_end], &[pn]);
        }
        let mut chpx_bte = Vec::new();
        if !self.characters.is_empty() {
            let rows: Vec<(u32, Option<&[u8]>)> = self
                .characters
                .iter()
                .map(|(cp, chpx)| (cp_to_fc(*cp), chpx.as_deref()))
                .collect();
            let pn = align(&mut main);
            main.extend_from_slice(&build_chpx_fkp(&rows, text_end));
            chpx_bte = build_bin_table(&[rows[0].0, text_end], &[pn]);
        }

        let mut sed_rows = Vec::new();
        for (cp, sepx) in &self.sections {
            let fc = sepx.as_ref().map(|grpprl| {
                let at = main.len() as u32;
                main.extend_from_slice(&(grpprl.len() as u16).to_le_bytes());
                main.extend_from_slice(grpprl);
                at
            });
            sed_rows.push((*cp, fc));
        }

        let ccp_text = self.main_text.unwrap_or(total);
        let ccp_footnotes = match self.main_text {
            Some(ccp) if total > ccp => total - ccp - 1,
            _ => 0,
        };

        // table stream
        let mut table = vec![0u8; 16];
        let put = |table: &mut Vec<u8>, bytes: &[u8]| {
            let at = FcLcb {
                fc: table.len() as u32,
                lcb: bytes.len() as u32,
            };
            table.extend_from_slice(bytes);
            at
        };
        let stsh = if self.styles.is_empty() {
            FcLcb::default()
        } else {
            put(&mut table, &build_stsh(&self.styles))
        };
        let sed = if sed_rows.is_empty() {
            FcLcb::default()
        } else {
            put(&mut table, &build_plcf_sed(&sed_rows, total))
        };
        let chpx = put(&mut table, &chpx_bte);
        let papx = put(&mut table, &papx_bte);
        let clx = put(&mut table, &build_clx(&pcds));

        self.fib.fc_min = TEXT_START;
        self.fib.fc_mac = text_end;
        self.fib.ccp_text = ccp_text;
        self.fib.ccp_footnotes = ccp_footnotes;
        self.fib.tables[1] = stsh;
        self.fib.tables[6] = sed;
        self.fib.tables[12] = chpx;
        self.fib.tables[13] = papx;
        self.fib.tables[33] = clx;
        let header = self.fib.build();
        main[..header.len()].copy_from_slice(&header);

        BuiltDoc {
            word_document: main,
            table,
            table_name: if self.fib.flags & 0x0200 != 0 { "1Table" } else { "0Table" },
            clx,
        }
    }
}
