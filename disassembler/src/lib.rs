//! Consumes the catalog crates and drives them across a byte image.
//!
//! The driver owns the mismatch policy: when no pattern matches, it emits
//! one `.byte` line per filler byte and advances by the catalog's minimum
//! instruction size, so any input decodes to completion.

mod fmt;
mod fs;

pub use fs::load_image;

use std::path::PathBuf;

use ast::Node;
use decoder::Catalog;

pub enum Error {
    Io(PathBuf, std::io::Error),
    UnknownArchitecture(String),
}

/// Resolve an architecture name from the command line.
pub fn catalog(name: &str) -> Result<&'static Catalog, Error> {
    match name {
        "i8051" | "8051" => Ok(&i8051::CATALOG),
        "thumb" | "arm" => Ok(&arm::thumb::CATALOG),
        _ => Err(Error::UnknownArchitecture(name.to_string())),
    }
}

/// Walks a byte image against one catalog, yielding disassembly lines in
/// address order. Unknown regions come out one `.byte 0xNN` line per byte.
pub struct InstructionStream<'data> {
    catalog: &'data Catalog,
    bytes: &'data [u8],
    offset: usize,
    start_address: u64,
    /// Filler bytes still owed from the last mismatch.
    filler: usize,
}

impl<'data> InstructionStream<'data> {
    pub fn new(catalog: &'data Catalog, bytes: &'data [u8], start_address: u64) -> Self {
        Self {
            catalog,
            bytes,
            offset: 0,
            start_address,
            filler: 0,
        }
    }

    /// Address of the next line this stream will yield.
    pub fn address(&self) -> u64 {
        self.start_address + self.offset as u64
    }
}

impl Iterator for InstructionStream<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.filler > 0 {
            let byte = self.bytes[self.offset];
            self.filler -= 1;
            self.offset += 1;
            return Some(format!(".byte 0x{byte:02X}"));
        }

        if self.offset >= self.bytes.len() {
            return None;
        }

        let window = &self.bytes[self.offset..];
        match self.catalog.dispatch(window) {
            Some(def) => {
                let line = def.disassemble(self.address(), window);
                self.offset += def.width();
                Some(line)
            }
            None => {
                // A short tail still drains byte by byte.
                self.filler = self.catalog.min_instruction_size.min(window.len());
                self.next()
            }
        }
    }
}

pub fn disassemble(catalog: &Catalog, bytes: &[u8], start_address: u64) -> Vec<String> {
    InstructionStream::new(catalog, bytes, start_address).collect()
}

/// Same walk as [`disassemble`], accumulating lifted fragments instead of
/// text. Unknown bytes contribute nothing but still advance the cursor.
pub fn decompile(catalog: &Catalog, bytes: &[u8], start_address: u64) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut offset = 0;

    while offset < bytes.len() {
        let window = &bytes[offset..];
        let address = start_address + offset as u64;

        match catalog.dispatch(window) {
            Some(def) => {
                nodes.extend(def.decompile(address, window));
                offset += def.width();
            }
            None => offset += catalog.min_instruction_size.min(window.len()),
        }
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use decoder::{BitPattern, Category, Endianness, InstructionDef};

    const TEST1: BitPattern = BitPattern::new("0101'1010'aaaa'aaaa", Endianness::Little);
    const TEST2: BitPattern = BitPattern::new("0101'1011'aaaa'aaaa", Endianness::Little);

    static TOY: [InstructionDef; 2] = [
        InstructionDef {
            mnemonic: "test1",
            pattern: TEST1,
            category: Category::Other,
            operands: |_, window| TEST1.extract(b'a', window).to_string(),
            lift: |_, _| Vec::new(),
        },
        InstructionDef {
            mnemonic: "test2",
            pattern: TEST2,
            category: Category::Other,
            operands: |_, window| TEST2.extract(b'a', window).to_string(),
            lift: |_, _| Vec::new(),
        },
    ];

    static TOY_CATALOG: Catalog = Catalog {
        name: "toy",
        min_instruction_size: 2,
        instructions: &TOY,
    };

    #[test]
    fn toy_catalog_first_match_over_a_stream() {
        // Little-endian patterns read each window back to front.
        let lines = disassemble(&TOY_CATALOG, &[0x0F, 0x5B, 0xF0, 0x5A], 0);
        assert_eq!(lines, vec!["test2 15", "test1 240"]);
    }

    #[test]
    fn toy_catalog_big_endian_variant() {
        const BIG1: BitPattern = BitPattern::new("0101'1010'aaaa'aaaa", Endianness::Big);
        const BIG2: BitPattern = BitPattern::new("0101'1011'aaaa'aaaa", Endianness::Big);

        static BIG: [InstructionDef; 2] = [
            InstructionDef {
                mnemonic: "test1",
                pattern: BIG1,
                category: Category::Other,
                operands: |_, window| BIG1.extract(b'a', window).to_string(),
                lift: |_, _| Vec::new(),
            },
            InstructionDef {
                mnemonic: "test2",
                pattern: BIG2,
                category: Category::Other,
                operands: |_, window| BIG2.extract(b'a', window).to_string(),
                lift: |_, _| Vec::new(),
            },
        ];

        static BIG_CATALOG: Catalog = Catalog {
            name: "toy-big",
            min_instruction_size: 2,
            instructions: &BIG,
        };

        // Same stream with the byte swap undone.
        let lines = disassemble(&BIG_CATALOG, &[0x5B, 0x0F, 0x5A, 0xF0], 0);
        assert_eq!(lines, vec!["test2 15", "test1 240"]);
    }

    #[test]
    fn unknown_bytes_become_filler() {
        let lines = disassemble(&TOY_CATALOG, &[0xFF, 0xEE], 0);
        assert_eq!(lines, vec![".byte 0xFF", ".byte 0xEE"]);

        assert!(decompile(&TOY_CATALOG, &[0xFF, 0xEE], 0).is_empty());
    }

    #[test]
    fn filler_resynchronizes_the_stream() {
        // 0xA5 has no 8051 encoding; decode picks back up right after it.
        let lines = disassemble(&i8051::CATALOG, &[0x00, 0xA5, 0xC3], 0);
        assert_eq!(lines, vec!["nop ", ".byte 0xA5", "clr C"]);
    }

    #[test]
    fn mixed_8051_stream() {
        let bytes = [0x00, 0xC3, 0x02, 0x12, 0x34];
        let lines = disassemble(&i8051::CATALOG, &bytes, 0);
        assert_eq!(lines, vec!["nop ", "clr C", "ljmp #0x1234"]);
    }

    #[test]
    fn start_address_shifts_relative_branches() {
        let lines = disassemble(&i8051::CATALOG, &[0x80, 0xFE, 0x00], 0x100);
        assert_eq!(lines, vec!["sjmp #0x100", "nop "]);
    }

    #[test]
    fn decompile_walks_past_unknown_bytes() {
        let nodes = decompile(&i8051::CATALOG, &[0xC3, 0xA5, 0x00], 0);
        assert_eq!(
            nodes,
            vec![Node::assign(Node::int(1), Node::flag("C"))]
        );
    }

    #[test]
    fn short_tail_drains_byte_by_byte() {
        // A lone trailing byte can never hold a halfword instruction.
        let lines = disassemble(&arm::thumb::CATALOG, &[0x42, 0x20, 0xFF], 0);
        assert_eq!(lines, vec!["movs R0, #0x42", ".byte 0xFF"]);
    }

    #[test]
    fn thumb_filler_advances_by_the_minimum_size() {
        // 0xBE00 is a breakpoint, which the catalog does not carry.
        let lines = disassemble(&arm::thumb::CATALOG, &[0x00, 0xBE, 0x42, 0x20], 0);
        assert_eq!(lines, vec![".byte 0x00", ".byte 0xBE", "movs R0, #0x42"]);
    }

    #[test]
    fn every_byte_is_consumed_exactly_once() {
        // Total consumption always equals the input length, whatever mix of
        // matches and filler the stream hits.
        let bytes: Vec<u8> = (0u16..=0xFF).map(|b| b as u8).collect();
        for catalog in [&i8051::CATALOG, &arm::thumb::CATALOG] {
            let mut stream = InstructionStream::new(catalog, &bytes, 0);
            while stream.next().is_some() {}
            assert_eq!(stream.address(), bytes.len() as u64);
        }
    }

    #[test]
    fn catalog_lookup_by_name() {
        assert_eq!(catalog("i8051").unwrap().name, "i8051");
        assert_eq!(catalog("thumb").unwrap().name, "thumb");
        assert!(matches!(
            catalog("z80"),
            Err(Error::UnknownArchitecture(_))
        ));
    }
}
