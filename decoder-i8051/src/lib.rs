//! Intel 8051 instruction catalog.
//!
//! Every encoding is one table entry: a big-endian bit pattern, the
//! operand formatter and the lifting function. The table covers the common
//! 8051 map; anything else falls through to the driver's `.byte` filler.

mod tests;

use std::borrow::Cow;

use ast::{BinaryOp, FlowChange, Node, UnaryOp};
use decoder::{BitPattern, Catalog, Category, Endianness, InstructionDef};

pub static CATALOG: Catalog = Catalog {
    name: "i8051",
    min_instruction_size: 1,
    instructions: INSTRUCTIONS,
};

/// Direct-address operands name the SFR they land on; plain RAM keeps the
/// register bank names for 0x00-0x07.
pub fn register_name(reg: u8) -> Cow<'static, str> {
    Cow::Borrowed(match reg {
        0x00 => "R0",
        0x01 => "R1",
        0x02 => "R2",
        0x03 => "R3",
        0x04 => "R4",
        0x05 => "R5",
        0x06 => "R6",
        0x07 => "R7",
        0x80 => "P0",
        0x81 => "SP",
        0x82 => "DPL",
        0x83 => "DPH",
        0x87 => "PCON",
        0x88 => "TCON",
        0x89 => "TMOD",
        0x8A => "TL0",
        0x8B => "TL1",
        0x8C => "TH0",
        0x8D => "TH1",
        0x90 => "P1",
        0x98 => "SCON",
        0x99 => "SBUF",
        0xA0 => "P2",
        0xA8 => "IE",
        0xB0 => "P3",
        0xB8 => "IP",
        0xD0 => "PSW",
        0xE0 => "ACC",
        0xF0 => "B",
        _ => return Cow::Owned(format!("SFR_{reg:02X}")),
    })
}

/// Name of a bit-addressable location. 0x00-0x7F index the bit-addressable
/// RAM region, 0x80 and up map onto SFR bits.
pub fn bit_name(index: u8) -> String {
    match index {
        0x00..=0x7F => format!("MEM.{index}"),
        0x80..=0x87 => format!("P0.{}", index - 0x80),
        0x90..=0x97 => format!("P1.{}", index - 0x90),
        0xA0..=0xA7 => format!("P2.{}", index - 0xA0),
        0xB0..=0xB7 => format!("P3.{}", index - 0xB0),
        0xE0..=0xE7 => format!("A.{}", index - 0xE0),
        0xF0..=0xF7 => format!("B.{}", index - 0xF0),
        _ => match index {
            // TCON
            0x88 => "IT0".into(),
            0x89 => "IE0".into(),
            0x8A => "IT1".into(),
            0x8B => "IE1".into(),
            0x8C => "TR0".into(),
            0x8D => "TF0".into(),
            0x8E => "TR1".into(),
            0x8F => "TF1".into(),

            // SCON
            0x98 => "RI".into(),
            0x99 => "TI".into(),
            0x9A => "RB8".into(),
            0x9B => "TB8".into(),
            0x9C => "REN".into(),
            0x9D => "SM2".into(),
            0x9E => "SM1".into(),
            0x9F => "SM0".into(),

            // IE
            0xA8 => "EX0".into(),
            0xA9 => "ET0".into(),
            0xAA => "EX1".into(),
            0xAB => "ET1".into(),
            0xAC => "ES".into(),
            0xAF => "EA".into(),

            // IP
            0xB8 => "PX0".into(),
            0xB9 => "PT0".into(),
            0xBA => "PX1".into(),
            0xBB => "PT1".into(),
            0xBC => "PS".into(),

            // PSW
            0xD0 => "P".into(),
            0xD1 => "F1".into(),
            0xD2 => "OV".into(),
            0xD3 => "RS0".into(),
            0xD4 => "RS1".into(),
            0xD5 => "F0".into(),
            0xD6 => "AC".into(),
            0xD7 => "CY".into(),

            _ => format!("0x{index:02X}"),
        },
    }
}

/// Destination of a relative branch: next instruction plus the
/// sign-extended offset, wrapped to the 16-bit program counter.
fn rel_dest(address: u64, width: u64, offset: u64) -> u32 {
    let offset = offset as u8 as i8 as i64;
    ((address as i64 + width as i64 + offset) as u64 & 0xFFFF) as u32
}

/// `ajmp`/`acall` replace the low eleven bits of the next instruction's
/// address.
fn page_dest(address: u64, high: u64, low: u64) -> u32 {
    let base = (address + 2) & 0xFFFF & 0xF800;
    (base | (high << 8) | low) as u32
}

/// `place = place <op> amount`, the shape shared by inc/dec/rotate style
/// instructions.
fn step(place: Node, op: BinaryOp, amount: u32) -> Vec<Node> {
    vec![Node::assign(
        Node::binary(op, place.clone(), Node::int(amount)),
        place,
    )]
}

/// `A = A <op> source`.
fn accumulate(op: BinaryOp, source: Node) -> Vec<Node> {
    vec![Node::assign(
        Node::binary(op, Node::reg("A"), source),
        Node::reg("A"),
    )]
}

/// `A = (A <op> source) <op> carry`, for the carry-involving arithmetic.
fn accumulate_carry(op: BinaryOp, source: Node) -> Vec<Node> {
    vec![Node::assign(
        Node::binary(
            op,
            Node::binary(op, Node::reg("A"), source),
            Node::flag("C"),
        ),
        Node::reg("A"),
    )]
}

/// Conditional forward to a resolved destination, with an empty else.
fn branch_if(cond: Node, dest: u32) -> Vec<Node> {
    vec![Node::cond(cond, vec![Node::jump(Node::int(dest))], Vec::new())]
}

macro_rules! instr {
    ($mnemonic:literal, $pattern:literal, $category:ident,
     |$ops_addr:tt, $ops_bytes:tt, $ops_pat:tt| $operands:expr,
     |$lift_addr:tt, $lift_bytes:tt, $lift_pat:tt| $lift:expr $(,)?) => {{
        const PATTERN: BitPattern = BitPattern::new($pattern, Endianness::Big);

        #[allow(unused_variables)]
        fn ops($ops_addr: u64, $ops_bytes: &[u8]) -> String {
            let $ops_pat = &PATTERN;
            $operands
        }

        #[allow(unused_variables)]
        fn lift($lift_addr: u64, $lift_bytes: &[u8]) -> Vec<Node> {
            let $lift_pat = &PATTERN;
            $lift
        }

        InstructionDef {
            mnemonic: $mnemonic,
            pattern: PATTERN,
            category: Category::$category,
            operands: ops,
            lift,
        }
    }};
}

#[rustfmt::skip]
static INSTRUCTIONS: &[InstructionDef] = &[
    instr!("nop", "0000'0000", Other,
        |_, _, _| String::new(),
        |_, _, _| Vec::new()),

    // Unconditional control transfers.
    instr!("ljmp", "0000'0010'aaaa'aaaa'aaaa'aaaa", UnconditionalJump,
        |_, bytes, pat| format!("#0x{:04X}", pat.extract(b'a', bytes)),
        |_, bytes, pat| vec![Node::jump(Node::int(pat.extract(b'a', bytes) as u32))]),
    instr!("ajmp", "ppp0'0001'aaaa'aaaa", UnconditionalJump,
        |addr, bytes, pat| {
            format!("#0x{:04X}", page_dest(addr, pat.extract(b'p', bytes), pat.extract(b'a', bytes)))
        },
        |addr, bytes, pat| {
            let dest = page_dest(addr, pat.extract(b'p', bytes), pat.extract(b'a', bytes));
            vec![Node::jump(Node::int(dest))]
        }),
    instr!("sjmp", "1000'0000'oooo'oooo", UnconditionalJump,
        |addr, bytes, pat| format!("#0x{:02X}", rel_dest(addr, 2, pat.extract(b'o', bytes))),
        |addr, bytes, pat| {
            vec![Node::jump(Node::int(rel_dest(addr, 2, pat.extract(b'o', bytes))))]
        }),
    instr!("jmp", "0111'0011", UnconditionalJump,
        |_, _, _| "@A+DPTR".into(),
        |_, _, _| {
            vec![Node::jump(Node::binary(BinaryOp::Add, Node::reg("A"), Node::reg("DPTR")))]
        }),
    instr!("lcall", "0001'0010'aaaa'aaaa'aaaa'aaaa", FunctionCall,
        |_, bytes, pat| format!("#0x{:04X}", pat.extract(b'a', bytes)),
        |_, bytes, pat| vec![Node::call(Node::int(pat.extract(b'a', bytes) as u32))]),
    instr!("acall", "ppp1'0001'aaaa'aaaa", FunctionCall,
        |addr, bytes, pat| {
            format!("#0x{:04X}", page_dest(addr, pat.extract(b'p', bytes), pat.extract(b'a', bytes)))
        },
        |addr, bytes, pat| {
            let dest = page_dest(addr, pat.extract(b'p', bytes), pat.extract(b'a', bytes));
            vec![Node::call(Node::int(dest))]
        }),
    instr!("ret", "0010'0010", FunctionReturn,
        |_, _, _| String::new(),
        |_, _, _| vec![Node::Flow(FlowChange::Return)]),
    instr!("reti", "0011'0010", FunctionReturn,
        |_, _, _| String::new(),
        |_, _, _| vec![Node::Flow(FlowChange::Return)]),

    // Conditional branches, all relative to the following instruction.
    instr!("jc", "0100'0000'oooo'oooo", ConditionalJump,
        |addr, bytes, pat| format!("#0x{:02X}", rel_dest(addr, 2, pat.extract(b'o', bytes))),
        |addr, bytes, pat| {
            let cond = Node::binary(BinaryOp::BoolEqual, Node::flag("PSW.C"), Node::int(1));
            branch_if(cond, rel_dest(addr, 2, pat.extract(b'o', bytes)))
        }),
    instr!("jnc", "0101'0000'oooo'oooo", ConditionalJump,
        |addr, bytes, pat| format!("#0x{:02X}", rel_dest(addr, 2, pat.extract(b'o', bytes))),
        |addr, bytes, pat| {
            let cond = Node::binary(BinaryOp::BoolEqual, Node::flag("PSW.C"), Node::int(0));
            branch_if(cond, rel_dest(addr, 2, pat.extract(b'o', bytes)))
        }),
    instr!("jz", "0110'0000'oooo'oooo", ConditionalJump,
        |addr, bytes, pat| format!("#0x{:02X}", rel_dest(addr, 2, pat.extract(b'o', bytes))),
        |addr, bytes, pat| {
            let cond = Node::binary(BinaryOp::BoolEqual, Node::reg("A"), Node::int(0));
            branch_if(cond, rel_dest(addr, 2, pat.extract(b'o', bytes)))
        }),
    instr!("jnz", "0111'0000'oooo'oooo", ConditionalJump,
        |addr, bytes, pat| format!("#0x{:02X}", rel_dest(addr, 2, pat.extract(b'o', bytes))),
        |addr, bytes, pat| {
            let cond = Node::binary(BinaryOp::BoolNotEqual, Node::reg("A"), Node::int(0));
            branch_if(cond, rel_dest(addr, 2, pat.extract(b'o', bytes)))
        }),
    instr!("jb", "0010'0000'bbbb'bbbb'oooo'oooo", ConditionalJump,
        |addr, bytes, pat| {
            format!("{}, #0x{:02X}",
                bit_name(pat.extract(b'b', bytes) as u8),
                rel_dest(addr, 3, pat.extract(b'o', bytes)))
        },
        |addr, bytes, pat| {
            let bit = Node::flag(bit_name(pat.extract(b'b', bytes) as u8));
            let cond = Node::binary(BinaryOp::BoolNotEqual, bit, Node::int(0));
            branch_if(cond, rel_dest(addr, 3, pat.extract(b'o', bytes)))
        }),
    instr!("jnb", "0011'0000'bbbb'bbbb'oooo'oooo", ConditionalJump,
        |addr, bytes, pat| {
            format!("{}, #0x{:02X}",
                bit_name(pat.extract(b'b', bytes) as u8),
                rel_dest(addr, 3, pat.extract(b'o', bytes)))
        },
        |addr, bytes, pat| {
            let bit = Node::flag(bit_name(pat.extract(b'b', bytes) as u8));
            let cond = Node::binary(BinaryOp::BoolEqual, bit, Node::int(0));
            branch_if(cond, rel_dest(addr, 3, pat.extract(b'o', bytes)))
        }),
    instr!("jbc", "0001'0000'bbbb'bbbb'oooo'oooo", ConditionalJump,
        |addr, bytes, pat| {
            format!("{}, #0x{:02X}",
                bit_name(pat.extract(b'b', bytes) as u8),
                rel_dest(addr, 3, pat.extract(b'o', bytes)))
        },
        |addr, bytes, pat| {
            // The taken path clears the tested bit before branching.
            let name = bit_name(pat.extract(b'b', bytes) as u8);
            let cond = Node::binary(BinaryOp::BoolNotEqual, Node::flag(name.clone()), Node::int(0));
            let dest = rel_dest(addr, 3, pat.extract(b'o', bytes));
            vec![Node::cond(
                cond,
                vec![
                    Node::assign(Node::int(0), Node::flag(name)),
                    Node::jump(Node::int(dest)),
                ],
                Vec::new(),
            )]
        }),
    instr!("cjne", "1011'0100'iiii'iiii'oooo'oooo", ConditionalJump,
        |addr, bytes, pat| {
            format!("A, #0x{:02X}, #0x{:02X}",
                pat.extract(b'i', bytes),
                rel_dest(addr, 3, pat.extract(b'o', bytes)))
        },
        |addr, bytes, pat| {
            let cond = Node::binary(
                BinaryOp::BoolNotEqual,
                Node::reg("A"),
                Node::int(pat.extract(b'i', bytes) as u32),
            );
            branch_if(cond, rel_dest(addr, 3, pat.extract(b'o', bytes)))
        }),
    instr!("cjne", "1011'0101'dddd'dddd'oooo'oooo", ConditionalJump,
        |addr, bytes, pat| {
            format!("A, {}, #0x{:02X}",
                register_name(pat.extract(b'd', bytes) as u8),
                rel_dest(addr, 3, pat.extract(b'o', bytes)))
        },
        |addr, bytes, pat| {
            let cond = Node::binary(
                BinaryOp::BoolNotEqual,
                Node::reg("A"),
                Node::reg(register_name(pat.extract(b'd', bytes) as u8)),
            );
            branch_if(cond, rel_dest(addr, 3, pat.extract(b'o', bytes)))
        }),
    instr!("cjne", "1011'1nnn'iiii'iiii'oooo'oooo", ConditionalJump,
        |addr, bytes, pat| {
            format!("R{}, #0x{:02X}, #0x{:02X}",
                pat.extract(b'n', bytes),
                pat.extract(b'i', bytes),
                rel_dest(addr, 3, pat.extract(b'o', bytes)))
        },
        |addr, bytes, pat| {
            let cond = Node::binary(
                BinaryOp::BoolNotEqual,
                Node::reg(format!("R{}", pat.extract(b'n', bytes))),
                Node::int(pat.extract(b'i', bytes) as u32),
            );
            branch_if(cond, rel_dest(addr, 3, pat.extract(b'o', bytes)))
        }),
    instr!("cjne", "1011'011r'iiii'iiii'oooo'oooo", ConditionalJump,
        |addr, bytes, pat| {
            format!("@R{}, #0x{:02X}, #0x{:02X}",
                pat.extract(b'r', bytes),
                pat.extract(b'i', bytes),
                rel_dest(addr, 3, pat.extract(b'o', bytes)))
        },
        |addr, bytes, pat| {
            let cond = Node::binary(
                BinaryOp::BoolNotEqual,
                Node::deref(Node::reg(format!("R{}", pat.extract(b'r', bytes)))),
                Node::int(pat.extract(b'i', bytes) as u32),
            );
            branch_if(cond, rel_dest(addr, 3, pat.extract(b'o', bytes)))
        }),
    instr!("djnz", "1101'0101'dddd'dddd'oooo'oooo", ConditionalJump,
        |addr, bytes, pat| {
            format!("#0x{:02X}, #0x{:02X}",
                pat.extract(b'd', bytes),
                rel_dest(addr, 3, pat.extract(b'o', bytes)))
        },
        |addr, bytes, pat| {
            let place = Node::deref(Node::int(pat.extract(b'd', bytes) as u32));
            let dest = rel_dest(addr, 3, pat.extract(b'o', bytes));
            let mut nodes = step(place.clone(), BinaryOp::Subtract, 1);
            nodes.extend(branch_if(
                Node::binary(BinaryOp::BoolNotEqual, place, Node::int(0)),
                dest,
            ));
            nodes
        }),
    instr!("djnz", "1101'1nnn'oooo'oooo", ConditionalJump,
        |addr, bytes, pat| {
            format!("R{}, #0x{:02X}",
                pat.extract(b'n', bytes),
                rel_dest(addr, 2, pat.extract(b'o', bytes)))
        },
        |addr, bytes, pat| {
            let place = Node::reg(format!("R{}", pat.extract(b'n', bytes)));
            let dest = rel_dest(addr, 2, pat.extract(b'o', bytes));
            let mut nodes = step(place.clone(), BinaryOp::Subtract, 1);
            nodes.extend(branch_if(
                Node::binary(BinaryOp::BoolNotEqual, place, Node::int(0)),
                dest,
            ));
            nodes
        }),

    // Increments and decrements.
    instr!("inc", "0000'0100", RegisterAccess,
        |_, _, _| "A".into(),
        |_, _, _| step(Node::reg("A"), BinaryOp::Add, 1)),
    instr!("inc", "0000'1nnn", RegisterAccess,
        |_, bytes, pat| format!("R{}", pat.extract(b'n', bytes)),
        |_, bytes, pat| {
            step(Node::reg(format!("R{}", pat.extract(b'n', bytes))), BinaryOp::Add, 1)
        }),
    instr!("inc", "0000'0101'dddd'dddd", MemoryAccess,
        |_, bytes, pat| format!("#0x{:02X}", pat.extract(b'd', bytes)),
        |_, bytes, pat| {
            let place = Node::deref(Node::int(pat.extract(b'd', bytes) as u32));
            step(place, BinaryOp::Add, 1)
        }),
    instr!("inc", "0000'011r", MemoryAccess,
        |_, bytes, pat| format!("@R{}", pat.extract(b'r', bytes)),
        |_, bytes, pat| {
            let place = Node::deref(Node::reg(format!("R{}", pat.extract(b'r', bytes))));
            step(place, BinaryOp::Add, 1)
        }),
    instr!("inc", "1010'0011", RegisterAccess,
        |_, _, _| "DPTR".into(),
        |_, _, _| step(Node::reg("DPTR"), BinaryOp::Add, 1)),
    instr!("dec", "0001'0100", RegisterAccess,
        |_, _, _| "A".into(),
        |_, _, _| step(Node::reg("A"), BinaryOp::Subtract, 1)),
    instr!("dec", "0001'1nnn", RegisterAccess,
        |_, bytes, pat| format!("R{}", pat.extract(b'n', bytes)),
        |_, bytes, pat| {
            step(Node::reg(format!("R{}", pat.extract(b'n', bytes))), BinaryOp::Subtract, 1)
        }),
    instr!("dec", "0001'0101'dddd'dddd", MemoryAccess,
        |_, bytes, pat| format!("#0x{:02X}", pat.extract(b'd', bytes)),
        |_, bytes, pat| {
            let place = Node::deref(Node::int(pat.extract(b'd', bytes) as u32));
            step(place, BinaryOp::Subtract, 1)
        }),
    instr!("dec", "0001'011r", MemoryAccess,
        |_, bytes, pat| format!("@R{}", pat.extract(b'r', bytes)),
        |_, bytes, pat| {
            let place = Node::deref(Node::reg(format!("R{}", pat.extract(b'r', bytes))));
            step(place, BinaryOp::Subtract, 1)
        }),

    // Accumulator arithmetic.
    instr!("add", "0010'1nnn", Arithmetic,
        |_, bytes, pat| format!("A, R{}", pat.extract(b'n', bytes)),
        |_, bytes, pat| {
            accumulate(BinaryOp::Add, Node::reg(format!("R{}", pat.extract(b'n', bytes))))
        }),
    instr!("add", "0010'0101'dddd'dddd", Arithmetic,
        |_, bytes, pat| format!("A, {}", register_name(pat.extract(b'd', bytes) as u8)),
        |_, bytes, pat| {
            accumulate(BinaryOp::Add, Node::reg(register_name(pat.extract(b'd', bytes) as u8)))
        }),
    instr!("add", "0010'011r", Arithmetic,
        |_, bytes, pat| format!("A, @R{}", pat.extract(b'r', bytes)),
        |_, bytes, pat| {
            accumulate(BinaryOp::Add, Node::deref(Node::reg(format!("R{}", pat.extract(b'r', bytes)))))
        }),
    instr!("add", "0010'0100'iiii'iiii", Arithmetic,
        |_, bytes, pat| format!("A, #0x{:02X}", pat.extract(b'i', bytes)),
        |_, bytes, pat| accumulate(BinaryOp::Add, Node::int(pat.extract(b'i', bytes) as u32))),
    instr!("addc", "0011'1nnn", Arithmetic,
        |_, bytes, pat| format!("A, R{}", pat.extract(b'n', bytes)),
        |_, bytes, pat| {
            accumulate_carry(BinaryOp::Add, Node::reg(format!("R{}", pat.extract(b'n', bytes))))
        }),
    instr!("addc", "0011'0101'dddd'dddd", Arithmetic,
        |_, bytes, pat| format!("A, {}", register_name(pat.extract(b'd', bytes) as u8)),
        |_, bytes, pat| {
            accumulate_carry(BinaryOp::Add, Node::reg(register_name(pat.extract(b'd', bytes) as u8)))
        }),
    instr!("addc", "0011'011r", Arithmetic,
        |_, bytes, pat| format!("A, @R{}", pat.extract(b'r', bytes)),
        |_, bytes, pat| {
            accumulate_carry(BinaryOp::Add, Node::deref(Node::reg(format!("R{}", pat.extract(b'r', bytes)))))
        }),
    instr!("addc", "0011'0100'iiii'iiii", Arithmetic,
        |_, bytes, pat| format!("A, #0x{:02X}", pat.extract(b'i', bytes)),
        |_, bytes, pat| {
            accumulate_carry(BinaryOp::Add, Node::int(pat.extract(b'i', bytes) as u32))
        }),
    instr!("subb", "1001'1nnn", Arithmetic,
        |_, bytes, pat| format!("A, R{}", pat.extract(b'n', bytes)),
        |_, bytes, pat| {
            accumulate_carry(BinaryOp::Subtract, Node::reg(format!("R{}", pat.extract(b'n', bytes))))
        }),
    instr!("subb", "1001'0101'dddd'dddd", Arithmetic,
        |_, bytes, pat| format!("A, {}", register_name(pat.extract(b'd', bytes) as u8)),
        |_, bytes, pat| {
            accumulate_carry(BinaryOp::Subtract, Node::reg(register_name(pat.extract(b'd', bytes) as u8)))
        }),
    instr!("subb", "1001'011r", Arithmetic,
        |_, bytes, pat| format!("A, @R{}", pat.extract(b'r', bytes)),
        |_, bytes, pat| {
            accumulate_carry(BinaryOp::Subtract, Node::deref(Node::reg(format!("R{}", pat.extract(b'r', bytes)))))
        }),
    instr!("subb", "1001'0100'iiii'iiii", Arithmetic,
        |_, bytes, pat| format!("A, #0x{:02X}", pat.extract(b'i', bytes)),
        |_, bytes, pat| {
            accumulate_carry(BinaryOp::Subtract, Node::int(pat.extract(b'i', bytes) as u32))
        }),
    instr!("mul", "1010'0100", Arithmetic,
        |_, _, _| "AB".into(),
        |_, _, _| vec![Node::asm("mul AB")]),
    instr!("div", "1000'0100", Arithmetic,
        |_, _, _| "AB".into(),
        |_, _, _| vec![Node::asm("div AB")]),
    instr!("da", "1101'0100", Arithmetic,
        |_, _, _| "A".into(),
        |_, _, _| vec![Node::asm("da A")]),

    // Boolean and bitwise accumulator logic.
    instr!("orl", "0100'1nnn", Arithmetic,
        |_, bytes, pat| format!("A, R{}", pat.extract(b'n', bytes)),
        |_, bytes, pat| {
            accumulate(BinaryOp::BitOr, Node::reg(format!("R{}", pat.extract(b'n', bytes))))
        }),
    instr!("orl", "0100'0101'dddd'dddd", Arithmetic,
        |_, bytes, pat| format!("A, {}", register_name(pat.extract(b'd', bytes) as u8)),
        |_, bytes, pat| {
            accumulate(BinaryOp::BitOr, Node::reg(register_name(pat.extract(b'd', bytes) as u8)))
        }),
    instr!("orl", "0100'011r", Arithmetic,
        |_, bytes, pat| format!("A, @R{}", pat.extract(b'r', bytes)),
        |_, bytes, pat| {
            accumulate(BinaryOp::BitOr, Node::deref(Node::reg(format!("R{}", pat.extract(b'r', bytes)))))
        }),
    instr!("orl", "0100'0100'iiii'iiii", Arithmetic,
        |_, bytes, pat| format!("A, #0x{:02X}", pat.extract(b'i', bytes)),
        |_, bytes, pat| accumulate(BinaryOp::BitOr, Node::int(pat.extract(b'i', bytes) as u32))),
    instr!("orl", "0100'0010'dddd'dddd", MemoryAccess,
        |_, bytes, pat| format!("{}, A", register_name(pat.extract(b'd', bytes) as u8)),
        |_, bytes, pat| {
            let place = Node::reg(register_name(pat.extract(b'd', bytes) as u8));
            vec![Node::assign(
                Node::binary(BinaryOp::BitOr, place.clone(), Node::reg("A")),
                place,
            )]
        }),
    instr!("orl", "0100'0011'dddd'dddd'iiii'iiii", MemoryAccess,
        |_, bytes, pat| {
            format!("{}, #0x{:02X}",
                register_name(pat.extract(b'd', bytes) as u8),
                pat.extract(b'i', bytes))
        },
        |_, bytes, pat| {
            let place = Node::reg(register_name(pat.extract(b'd', bytes) as u8));
            vec![Node::assign(
                Node::binary(BinaryOp::BitOr, place.clone(), Node::int(pat.extract(b'i', bytes) as u32)),
                place,
            )]
        }),
    instr!("anl", "0101'1nnn", Arithmetic,
        |_, bytes, pat| format!("A, R{}", pat.extract(b'n', bytes)),
        |_, bytes, pat| {
            accumulate(BinaryOp::BitAnd, Node::reg(format!("R{}", pat.extract(b'n', bytes))))
        }),
    instr!("anl", "0101'0101'dddd'dddd", Arithmetic,
        |_, bytes, pat| format!("A, {}", register_name(pat.extract(b'd', bytes) as u8)),
        |_, bytes, pat| {
            accumulate(BinaryOp::BitAnd, Node::reg(register_name(pat.extract(b'd', bytes) as u8)))
        }),
    instr!("anl", "0101'011r", Arithmetic,
        |_, bytes, pat| format!("A, @R{}", pat.extract(b'r', bytes)),
        |_, bytes, pat| {
            accumulate(BinaryOp::BitAnd, Node::deref(Node::reg(format!("R{}", pat.extract(b'r', bytes)))))
        }),
    instr!("anl", "0101'0100'iiii'iiii", Arithmetic,
        |_, bytes, pat| format!("A, #0x{:02X}", pat.extract(b'i', bytes)),
        |_, bytes, pat| accumulate(BinaryOp::BitAnd, Node::int(pat.extract(b'i', bytes) as u32))),
    instr!("anl", "0101'0010'dddd'dddd", MemoryAccess,
        |_, bytes, pat| format!("{}, A", register_name(pat.extract(b'd', bytes) as u8)),
        |_, bytes, pat| {
            let place = Node::reg(register_name(pat.extract(b'd', bytes) as u8));
            vec![Node::assign(
                Node::binary(BinaryOp::BitAnd, place.clone(), Node::reg("A")),
                place,
            )]
        }),
    instr!("anl", "0101'0011'dddd'dddd'iiii'iiii", MemoryAccess,
        |_, bytes, pat| {
            format!("{}, #0x{:02X}",
                register_name(pat.extract(b'd', bytes) as u8),
                pat.extract(b'i', bytes))
        },
        |_, bytes, pat| {
            let place = Node::reg(register_name(pat.extract(b'd', bytes) as u8));
            vec![Node::assign(
                Node::binary(BinaryOp::BitAnd, place.clone(), Node::int(pat.extract(b'i', bytes) as u32)),
                place,
            )]
        }),
    instr!("xrl", "0110'1nnn", Arithmetic,
        |_, bytes, pat| format!("A, R{}", pat.extract(b'n', bytes)),
        |_, bytes, pat| {
            accumulate(BinaryOp::BitXor, Node::reg(format!("R{}", pat.extract(b'n', bytes))))
        }),
    instr!("xrl", "0110'0101'dddd'dddd", Arithmetic,
        |_, bytes, pat| format!("A, {}", register_name(pat.extract(b'd', bytes) as u8)),
        |_, bytes, pat| {
            accumulate(BinaryOp::BitXor, Node::reg(register_name(pat.extract(b'd', bytes) as u8)))
        }),
    instr!("xrl", "0110'011r", Arithmetic,
        |_, bytes, pat| format!("A, @R{}", pat.extract(b'r', bytes)),
        |_, bytes, pat| {
            accumulate(BinaryOp::BitXor, Node::deref(Node::reg(format!("R{}", pat.extract(b'r', bytes)))))
        }),
    instr!("xrl", "0110'0100'iiii'iiii", Arithmetic,
        |_, bytes, pat| format!("A, #0x{:02X}", pat.extract(b'i', bytes)),
        |_, bytes, pat| accumulate(BinaryOp::BitXor, Node::int(pat.extract(b'i', bytes) as u32))),
    instr!("xrl", "0110'0010'dddd'dddd", MemoryAccess,
        |_, bytes, pat| format!("{}, A", register_name(pat.extract(b'd', bytes) as u8)),
        |_, bytes, pat| {
            let place = Node::reg(register_name(pat.extract(b'd', bytes) as u8));
            vec![Node::assign(
                Node::binary(BinaryOp::BitXor, place.clone(), Node::reg("A")),
                place,
            )]
        }),
    instr!("xrl", "0110'0011'dddd'dddd'iiii'iiii", MemoryAccess,
        |_, bytes, pat| {
            format!("{}, #0x{:02X}",
                register_name(pat.extract(b'd', bytes) as u8),
                pat.extract(b'i', bytes))
        },
        |_, bytes, pat| {
            let place = Node::reg(register_name(pat.extract(b'd', bytes) as u8));
            vec![Node::assign(
                Node::binary(BinaryOp::BitXor, place.clone(), Node::int(pat.extract(b'i', bytes) as u32)),
                place,
            )]
        }),

    // Carry-flag logic.
    instr!("orl", "0111'0010'bbbb'bbbb", RegisterAccess,
        |_, bytes, pat| format!("C, {}", bit_name(pat.extract(b'b', bytes) as u8)),
        |_, bytes, pat| {
            let bit = Node::flag(bit_name(pat.extract(b'b', bytes) as u8));
            vec![Node::assign(
                Node::binary(BinaryOp::BoolOr, Node::flag("C"), bit),
                Node::flag("C"),
            )]
        }),
    instr!("anl", "1000'0010'bbbb'bbbb", RegisterAccess,
        |_, bytes, pat| format!("C, {}", bit_name(pat.extract(b'b', bytes) as u8)),
        |_, bytes, pat| {
            let bit = Node::flag(bit_name(pat.extract(b'b', bytes) as u8));
            vec![Node::assign(
                Node::binary(BinaryOp::BoolAnd, Node::flag("C"), bit),
                Node::flag("C"),
            )]
        }),
    instr!("orl", "1010'0000'bbbb'bbbb", RegisterAccess,
        |_, bytes, pat| format!("C, /{}", bit_name(pat.extract(b'b', bytes) as u8)),
        |_, bytes, pat| {
            let bit = Node::flag(bit_name(pat.extract(b'b', bytes) as u8));
            vec![Node::assign(
                Node::binary(
                    BinaryOp::BoolOr,
                    Node::flag("C"),
                    Node::unary(UnaryOp::BoolNot, bit),
                ),
                Node::flag("C"),
            )]
        }),
    instr!("anl", "1011'0000'bbbb'bbbb", RegisterAccess,
        |_, bytes, pat| format!("C, /{}", bit_name(pat.extract(b'b', bytes) as u8)),
        |_, bytes, pat| {
            let bit = Node::flag(bit_name(pat.extract(b'b', bytes) as u8));
            vec![Node::assign(
                Node::binary(
                    BinaryOp::BoolAnd,
                    Node::flag("C"),
                    Node::unary(UnaryOp::BoolNot, bit),
                ),
                Node::flag("C"),
            )]
        }),

    // Rotates and complements.
    instr!("rr", "0000'0011", Arithmetic,
        |_, _, _| "A".into(),
        |_, _, _| step(Node::reg("A"), BinaryOp::RotateRight, 1)),
    instr!("rl", "0010'0011", Arithmetic,
        |_, _, _| "A".into(),
        |_, _, _| step(Node::reg("A"), BinaryOp::RotateLeft, 1)),
    instr!("rrc", "0001'0011", Arithmetic,
        |_, _, _| "A".into(),
        |_, _, _| vec![Node::asm("rrc A")]),
    instr!("rlc", "0011'0011", Arithmetic,
        |_, _, _| "A".into(),
        |_, _, _| vec![Node::asm("rlc A")]),
    instr!("swap", "1100'0100", Arithmetic,
        |_, _, _| "A".into(),
        |_, _, _| step(Node::reg("A"), BinaryOp::RotateLeft, 4)),
    instr!("cpl", "1111'0100", RegisterAccess,
        |_, _, _| "A".into(),
        |_, _, _| {
            vec![Node::assign(
                Node::unary(UnaryOp::BitNot, Node::reg("A")),
                Node::reg("A"),
            )]
        }),
    instr!("cpl", "1011'0011", RegisterAccess,
        |_, _, _| "C".into(),
        |_, _, _| {
            vec![Node::assign(
                Node::unary(UnaryOp::BoolNot, Node::flag("C")),
                Node::flag("C"),
            )]
        }),
    instr!("cpl", "1011'0010'bbbb'bbbb", MemoryAccess,
        |_, bytes, pat| bit_name(pat.extract(b'b', bytes) as u8),
        |_, bytes, pat| {
            let name = bit_name(pat.extract(b'b', bytes) as u8);
            vec![Node::assign(
                Node::unary(UnaryOp::BoolNot, Node::flag(name.clone())),
                Node::flag(name),
            )]
        }),

    // Flag and accumulator set/clear.
    instr!("clr", "1100'0010'bbbb'bbbb", MemoryAccess,
        |_, bytes, pat| bit_name(pat.extract(b'b', bytes) as u8),
        |_, bytes, pat| {
            vec![Node::assign(
                Node::int(0),
                Node::flag(bit_name(pat.extract(b'b', bytes) as u8)),
            )]
        }),
    instr!("clr", "1100'0011", RegisterAccess,
        |_, _, _| "C".into(),
        |_, _, _| vec![Node::assign(Node::int(1), Node::flag("C"))]),
    instr!("clr", "1110'0100", RegisterAccess,
        |_, _, _| "A".into(),
        |_, _, _| vec![Node::assign(Node::int(0), Node::reg("A"))]),
    instr!("setb", "1101'0010'bbbb'bbbb", MemoryAccess,
        |_, bytes, pat| bit_name(pat.extract(b'b', bytes) as u8),
        |_, bytes, pat| {
            vec![Node::assign(
                Node::int(1),
                Node::flag(bit_name(pat.extract(b'b', bytes) as u8)),
            )]
        }),
    instr!("setb", "1101'0011", RegisterAccess,
        |_, _, _| "C".into(),
        |_, _, _| vec![Node::assign(Node::int(1), Node::flag("C"))]),

    // Data movement.
    instr!("mov", "0111'0100'iiii'iiii", RegisterAccess,
        |_, bytes, pat| format!("A, #0x{:02X}", pat.extract(b'i', bytes)),
        |_, bytes, pat| {
            vec![Node::assign(Node::int(pat.extract(b'i', bytes) as u32), Node::reg("A"))]
        }),
    instr!("mov", "1110'0101'dddd'dddd", RegisterAccess,
        |_, bytes, pat| format!("A, {}", register_name(pat.extract(b'd', bytes) as u8)),
        |_, bytes, pat| {
            vec![Node::assign(
                Node::reg(register_name(pat.extract(b'd', bytes) as u8)),
                Node::reg("A"),
            )]
        }),
    instr!("mov", "1110'011r", RegisterAccess,
        |_, bytes, pat| format!("A, @R{}", pat.extract(b'r', bytes)),
        |_, bytes, pat| {
            vec![Node::assign(
                Node::deref(Node::reg(format!("R{}", pat.extract(b'r', bytes)))),
                Node::reg("A"),
            )]
        }),
    instr!("mov", "1110'1nnn", RegisterAccess,
        |_, bytes, pat| format!("A, R{}", pat.extract(b'n', bytes)),
        |_, bytes, pat| {
            vec![Node::assign(
                Node::reg(format!("R{}", pat.extract(b'n', bytes))),
                Node::reg("A"),
            )]
        }),
    instr!("mov", "0111'1nnn'iiii'iiii", RegisterAccess,
        |_, bytes, pat| {
            format!("R{}, #0x{:02X}", pat.extract(b'n', bytes), pat.extract(b'i', bytes))
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::int(pat.extract(b'i', bytes) as u32),
                Node::reg(format!("R{}", pat.extract(b'n', bytes))),
            )]
        }),
    instr!("mov", "1111'1nnn", RegisterAccess,
        |_, bytes, pat| format!("R{}, A", pat.extract(b'n', bytes)),
        |_, bytes, pat| {
            vec![Node::assign(
                Node::reg("A"),
                Node::reg(format!("R{}", pat.extract(b'n', bytes))),
            )]
        }),
    instr!("mov", "1010'1nnn'dddd'dddd", RegisterAccess,
        |_, bytes, pat| {
            format!("R{}, {}",
                pat.extract(b'n', bytes),
                register_name(pat.extract(b'd', bytes) as u8))
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::reg(register_name(pat.extract(b'd', bytes) as u8)),
                Node::reg(format!("R{}", pat.extract(b'n', bytes))),
            )]
        }),
    instr!("mov", "1000'0101'ssss'ssss'dddd'dddd", MemoryAccess,
        |_, bytes, pat| {
            format!("{}, {}",
                register_name(pat.extract(b'd', bytes) as u8),
                register_name(pat.extract(b's', bytes) as u8))
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::reg(register_name(pat.extract(b's', bytes) as u8)),
                Node::reg(register_name(pat.extract(b'd', bytes) as u8)),
            )]
        }),
    instr!("mov", "0111'0101'dddd'dddd'iiii'iiii", RegisterAccess,
        |_, bytes, pat| {
            format!("{}, #0x{:02X}",
                register_name(pat.extract(b'd', bytes) as u8),
                pat.extract(b'i', bytes))
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::int(pat.extract(b'i', bytes) as u32),
                Node::reg(register_name(pat.extract(b'd', bytes) as u8)),
            )]
        }),
    instr!("mov", "1000'011r'dddd'dddd", RegisterAccess,
        |_, bytes, pat| {
            format!("{}, @R{}",
                register_name(pat.extract(b'd', bytes) as u8),
                pat.extract(b'r', bytes))
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::deref(Node::reg(format!("R{}", pat.extract(b'r', bytes)))),
                Node::reg(register_name(pat.extract(b'd', bytes) as u8)),
            )]
        }),
    instr!("mov", "1111'0101'dddd'dddd", RegisterAccess,
        |_, bytes, pat| format!("{}, A", register_name(pat.extract(b'd', bytes) as u8)),
        |_, bytes, pat| {
            vec![Node::assign(
                Node::reg("A"),
                Node::reg(register_name(pat.extract(b'd', bytes) as u8)),
            )]
        }),
    instr!("mov", "1000'1nnn'dddd'dddd", RegisterAccess,
        |_, bytes, pat| {
            format!("{}, R{}",
                register_name(pat.extract(b'd', bytes) as u8),
                pat.extract(b'n', bytes))
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::reg(format!("R{}", pat.extract(b'n', bytes))),
                Node::reg(register_name(pat.extract(b'd', bytes) as u8)),
            )]
        }),
    instr!("mov", "0111'011r'iiii'iiii", MemoryAccess,
        |_, bytes, pat| {
            format!("@R{}, #0x{:02X}", pat.extract(b'r', bytes), pat.extract(b'i', bytes))
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::int(pat.extract(b'i', bytes) as u32),
                Node::deref(Node::reg(format!("R{}", pat.extract(b'r', bytes)))),
            )]
        }),
    instr!("mov", "1111'011r", MemoryAccess,
        |_, bytes, pat| format!("@R{}, A", pat.extract(b'r', bytes)),
        |_, bytes, pat| {
            vec![Node::assign(
                Node::reg("A"),
                Node::deref(Node::reg(format!("R{}", pat.extract(b'r', bytes)))),
            )]
        }),
    instr!("mov", "1010'011r'dddd'dddd", MemoryAccess,
        |_, bytes, pat| {
            format!("@R{}, {}",
                pat.extract(b'r', bytes),
                register_name(pat.extract(b'd', bytes) as u8))
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::reg(register_name(pat.extract(b'd', bytes) as u8)),
                Node::deref(Node::reg(format!("R{}", pat.extract(b'r', bytes)))),
            )]
        }),
    instr!("mov", "1001'0000'iiii'iiii'iiii'iiii", RegisterAccess,
        |_, bytes, pat| format!("DPTR, #0x{:04X}", pat.extract(b'i', bytes)),
        |_, bytes, pat| {
            vec![Node::assign(Node::int(pat.extract(b'i', bytes) as u32), Node::reg("DPTR"))]
        }),
    instr!("mov", "1001'0010'bbbb'bbbb", RegisterAccess,
        |_, bytes, pat| format!("{}, C", bit_name(pat.extract(b'b', bytes) as u8)),
        |_, bytes, pat| {
            vec![Node::assign(
                Node::flag("C"),
                Node::flag(bit_name(pat.extract(b'b', bytes) as u8)),
            )]
        }),
    instr!("mov", "1010'0010'bbbb'bbbb", RegisterAccess,
        |_, bytes, pat| format!("C, {}", bit_name(pat.extract(b'b', bytes) as u8)),
        |_, bytes, pat| {
            vec![Node::assign(
                Node::flag(bit_name(pat.extract(b'b', bytes) as u8)),
                Node::flag("C"),
            )]
        }),

    // External and code memory access.
    instr!("movx", "1110'0000", MemoryAccess,
        |_, _, _| "A, @DPTR".into(),
        |_, _, _| {
            vec![Node::assign(Node::deref(Node::reg("DPTR")), Node::reg("A"))]
        }),
    instr!("movx", "1111'0000", MemoryAccess,
        |_, _, _| "@DPTR, A".into(),
        |_, _, _| {
            vec![Node::assign(Node::reg("A"), Node::deref(Node::reg("DPTR")))]
        }),
    instr!("movx", "1110'001r", MemoryAccess,
        |_, bytes, pat| format!("A, @R{}", pat.extract(b'r', bytes)),
        |_, bytes, pat| {
            vec![Node::assign(
                Node::deref(Node::reg(format!("R{}", pat.extract(b'r', bytes)))),
                Node::reg("A"),
            )]
        }),
    instr!("movx", "1111'001r", MemoryAccess,
        |_, bytes, pat| format!("@R{}, A", pat.extract(b'r', bytes)),
        |_, bytes, pat| {
            vec![Node::assign(
                Node::reg("A"),
                Node::deref(Node::reg(format!("R{}", pat.extract(b'r', bytes)))),
            )]
        }),
    instr!("movc", "1001'0011", MemoryAccess,
        |_, _, _| "A, @A+DPTR".into(),
        |_, _, _| {
            vec![Node::assign(
                Node::deref(Node::binary(BinaryOp::Add, Node::reg("A"), Node::reg("DPTR"))),
                Node::reg("A"),
            )]
        }),
    instr!("movc", "1000'0011", MemoryAccess,
        |_, _, _| "A, @A+PC".into(),
        |_, _, _| {
            vec![Node::assign(
                Node::deref(Node::binary(BinaryOp::Add, Node::reg("A"), Node::reg("PC"))),
                Node::reg("A"),
            )]
        }),

    // Stack and exchange, kept as inline assembly in the lifted output.
    instr!("push", "1100'0000'dddd'dddd", MemoryAccess,
        |_, bytes, pat| register_name(pat.extract(b'd', bytes) as u8).into_owned(),
        |_, bytes, pat| {
            vec![Node::asm(format!("push {}", register_name(pat.extract(b'd', bytes) as u8)))]
        }),
    instr!("pop", "1101'0000'dddd'dddd", MemoryAccess,
        |_, bytes, pat| register_name(pat.extract(b'd', bytes) as u8).into_owned(),
        |_, bytes, pat| {
            vec![Node::asm(format!("pop {}", register_name(pat.extract(b'd', bytes) as u8)))]
        }),
    instr!("xch", "1100'1nnn", RegisterAccess,
        |_, bytes, pat| format!("A, R{}", pat.extract(b'n', bytes)),
        |_, bytes, pat| {
            vec![Node::asm(format!("xch A, R{}", pat.extract(b'n', bytes)))]
        }),
    instr!("xch", "1100'0101'dddd'dddd", RegisterAccess,
        |_, bytes, pat| format!("A, {}", register_name(pat.extract(b'd', bytes) as u8)),
        |_, bytes, pat| {
            vec![Node::asm(format!("xch A, {}", register_name(pat.extract(b'd', bytes) as u8)))]
        }),
    instr!("xch", "1100'011r", RegisterAccess,
        |_, bytes, pat| format!("A, @R{}", pat.extract(b'r', bytes)),
        |_, bytes, pat| {
            vec![Node::asm(format!("xch A, @R{}", pat.extract(b'r', bytes)))]
        }),
];
