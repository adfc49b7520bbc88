//! Thumb catalog: the 16-bit ARMv7-M base map plus the 32-bit `bl`.
//!
//! Thumb stores each halfword little-endian, so every pattern here is
//! declared [`Endianness::Little`]; the 32-bit `bl` is written as a single
//! four byte pattern over both halfwords.

use ast::{BinaryOp, FlowChange, Node, UnaryOp};
use bitvec::prelude::*;
use decoder::{BitPattern, Catalog, Category, Endianness, InstructionDef};

pub static CATALOG: Catalog = Catalog {
    name: "thumb",
    min_instruction_size: 2,
    instructions: INSTRUCTIONS,
};

pub fn reg_name(idx: u64) -> &'static str {
    match idx {
        0 => "R0",
        1 => "R1",
        2 => "R2",
        3 => "R3",
        4 => "R4",
        5 => "R5",
        6 => "R6",
        7 => "R7",
        8 => "R8",
        9 => "R9",
        10 => "R10",
        11 => "R11",
        12 => "R12",
        13 => "SP",
        14 => "LR",
        15 => "PC",
        _ => unreachable!("register fields are at most four bits"),
    }
}

/// `{R0, R4, LR}` style rendering of an eight bit register mask, with an
/// optional trailing extra register (`LR` on push, `PC` on pop). An empty
/// mask renders `{}`.
fn register_list(mask: u8, extra: Option<&'static str>) -> String {
    let mask = [mask];
    let mut names: Vec<&str> =
        mask.view_bits::<Lsb0>().iter_ones().map(|idx| reg_name(idx as u64)).collect();

    if let Some(extra) = extra {
        names.push(extra);
    }

    format!("{{{}}}", names.join(", "))
}

/// `FLAGS.<name> == value`, the building block of branch conditions.
fn flag_is(name: &'static str, value: u32) -> Node {
    Node::binary(BinaryOp::BoolEqual, Node::flag(name), Node::int(value))
}

fn both(lhs: Node, rhs: Node) -> Node {
    Node::binary(BinaryOp::BoolAnd, lhs, rhs)
}

fn either(lhs: Node, rhs: Node) -> Node {
    Node::binary(BinaryOp::BoolOr, lhs, rhs)
}

/// Signed comparisons test whether N and V agree.
fn flags_agree() -> Node {
    Node::binary(BinaryOp::BoolEqual, Node::flag("APSR.N"), Node::flag("APSR.V"))
}

fn flags_disagree() -> Node {
    Node::binary(BinaryOp::BoolNotEqual, Node::flag("APSR.N"), Node::flag("APSR.V"))
}

fn branch_if(cond: Node, dest: u32) -> Vec<Node> {
    vec![Node::cond(cond, vec![Node::jump(Node::int(dest))], Vec::new())]
}

/// Destination of a conditional branch: PC reads four past the instruction,
/// the eight bit offset is signed and halfword-scaled.
fn cond_dest(address: u64, offset: u64) -> u32 {
    let offset = offset as u8 as i8 as i64;
    (address as i64 + 4 + offset * 2) as u32
}

/// Eleven bit signed offset of the unconditional branch.
fn uncond_dest(address: u64, offset: u64) -> u32 {
    let offset = ((offset << 53) as i64) >> 53;
    (address as i64 + 4 + offset * 2) as u32
}

/// `cbz`/`cbnz` zero-extend their six bit offset; they only branch forward.
fn cb_dest(address: u64, offset: u64) -> u32 {
    (address + 4 + offset * 2) as u32
}

/// Recombine the `bl` immediate: `S:I1:I2:imm10:imm11:0`, 25 bits signed,
/// where `In = NOT(Jn XOR S)`.
fn bl_dest(address: u64, s: u64, j1: u64, j2: u64, imm10: u64, imm11: u64) -> u32 {
    let i1 = !(j1 ^ s) & 1;
    let i2 = !(j2 ^ s) & 1;
    let raw = (s << 24) | (i1 << 23) | (i2 << 22) | (imm10 << 12) | (imm11 << 1);
    let offset = ((raw << 39) as i64) >> 39;
    (address as i64 + 4 + offset) as u32
}

macro_rules! instr {
    ($mnemonic:literal, $pattern:literal, $category:ident,
     |$ops_addr:tt, $ops_bytes:tt, $ops_pat:tt| $operands:expr,
     |$lift_addr:tt, $lift_bytes:tt, $lift_pat:tt| $lift:expr $(,)?) => {{
        const PATTERN: BitPattern = BitPattern::new($pattern, Endianness::Little);

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

/// Conditional branch over an eight bit offset with a fixed condition node.
macro_rules! cond_branch {
    ($mnemonic:literal, $pattern:literal, $cond:expr) => {
        instr!($mnemonic, $pattern, ConditionalJump,
            |addr, bytes, pat| format!("#0x{:04X}", cond_dest(addr, pat.extract(b'o', bytes))),
            |addr, bytes, pat| branch_if($cond, cond_dest(addr, pat.extract(b'o', bytes))))
    };
}

#[rustfmt::skip]
static INSTRUCTIONS: &[InstructionDef] = &[
    // The only 32-bit encoding in the catalog, listed ahead of every
    // halfword pattern. The pattern's leading bytes describe the second
    // halfword, which the little-endian mapping finds at window[2..4].
    instr!("bl", "11a1'biii'iiii'iiii'1111'0sjj'jjjj'jjjj", FunctionCall,
        |addr, bytes, pat| {
            let dest = bl_dest(
                addr,
                pat.extract(b's', bytes),
                pat.extract(b'a', bytes),
                pat.extract(b'b', bytes),
                pat.extract(b'j', bytes),
                pat.extract(b'i', bytes),
            );
            format!("#0x{dest:04X}")
        },
        |addr, bytes, pat| {
            let dest = bl_dest(
                addr,
                pat.extract(b's', bytes),
                pat.extract(b'a', bytes),
                pat.extract(b'b', bytes),
                pat.extract(b'j', bytes),
                pat.extract(b'i', bytes),
            );
            vec![Node::call(Node::int(dest))]
        }),

    // Shifts by immediate.
    instr!("lsls", "0000'0iii'iimm'mddd", Arithmetic,
        |_, bytes, pat| {
            format!("R{}, R{}, #0x{:X}",
                pat.extract(b'd', bytes), pat.extract(b'm', bytes), pat.extract(b'i', bytes))
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::binary(
                    BinaryOp::ShiftLeftLogical,
                    Node::reg(reg_name(pat.extract(b'm', bytes))),
                    Node::int(pat.extract(b'i', bytes) as u32),
                ),
                Node::reg(reg_name(pat.extract(b'd', bytes))),
            )]
        }),
    instr!("lsrs", "0000'1iii'iimm'mddd", Arithmetic,
        |_, bytes, pat| {
            format!("R{}, R{}, #0x{:X}",
                pat.extract(b'd', bytes), pat.extract(b'm', bytes), pat.extract(b'i', bytes))
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::binary(
                    BinaryOp::ShiftRightLogical,
                    Node::reg(reg_name(pat.extract(b'm', bytes))),
                    Node::int(pat.extract(b'i', bytes) as u32),
                ),
                Node::reg(reg_name(pat.extract(b'd', bytes))),
            )]
        }),
    instr!("asrs", "0001'0iii'iimm'mddd", Arithmetic,
        |_, bytes, pat| {
            format!("R{}, R{}, #0x{:X}",
                pat.extract(b'd', bytes), pat.extract(b'm', bytes), pat.extract(b'i', bytes))
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::binary(
                    BinaryOp::ShiftRightArithmetic,
                    Node::reg(reg_name(pat.extract(b'm', bytes))),
                    Node::int(pat.extract(b'i', bytes) as u32),
                ),
                Node::reg(reg_name(pat.extract(b'd', bytes))),
            )]
        }),

    // Three-operand add/sub.
    instr!("adds", "0001'100m'mmnn'nddd", Arithmetic,
        |_, bytes, pat| {
            format!("R{}, R{}, R{}",
                pat.extract(b'd', bytes), pat.extract(b'n', bytes), pat.extract(b'm', bytes))
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::binary(
                    BinaryOp::Add,
                    Node::reg(reg_name(pat.extract(b'n', bytes))),
                    Node::reg(reg_name(pat.extract(b'm', bytes))),
                ),
                Node::reg(reg_name(pat.extract(b'd', bytes))),
            )]
        }),
    instr!("subs", "0001'101m'mmnn'nddd", Arithmetic,
        |_, bytes, pat| {
            format!("R{}, R{}, R{}",
                pat.extract(b'd', bytes), pat.extract(b'n', bytes), pat.extract(b'm', bytes))
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::binary(
                    BinaryOp::Subtract,
                    Node::reg(reg_name(pat.extract(b'n', bytes))),
                    Node::reg(reg_name(pat.extract(b'm', bytes))),
                ),
                Node::reg(reg_name(pat.extract(b'd', bytes))),
            )]
        }),
    instr!("adds", "0001'110i'iinn'nddd", Arithmetic,
        |_, bytes, pat| {
            format!("R{}, R{}, #0x{:X}",
                pat.extract(b'd', bytes), pat.extract(b'n', bytes), pat.extract(b'i', bytes))
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::binary(
                    BinaryOp::Add,
                    Node::reg(reg_name(pat.extract(b'n', bytes))),
                    Node::int(pat.extract(b'i', bytes) as u32),
                ),
                Node::reg(reg_name(pat.extract(b'd', bytes))),
            )]
        }),
    instr!("subs", "0001'111i'iinn'nddd", Arithmetic,
        |_, bytes, pat| {
            format!("R{}, R{}, #0x{:X}",
                pat.extract(b'd', bytes), pat.extract(b'n', bytes), pat.extract(b'i', bytes))
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::binary(
                    BinaryOp::Subtract,
                    Node::reg(reg_name(pat.extract(b'n', bytes))),
                    Node::int(pat.extract(b'i', bytes) as u32),
                ),
                Node::reg(reg_name(pat.extract(b'd', bytes))),
            )]
        }),

    // Immediate move, compare, add, subtract.
    instr!("movs", "0010'0ddd'iiii'iiii", RegisterAccess,
        |_, bytes, pat| {
            format!("R{}, #0x{:02X}", pat.extract(b'd', bytes), pat.extract(b'i', bytes))
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::int(pat.extract(b'i', bytes) as u32),
                Node::reg(reg_name(pat.extract(b'd', bytes))),
            )]
        }),
    instr!("cmp", "0010'1nnn'iiii'iiii", Arithmetic,
        |_, bytes, pat| {
            format!("R{}, #0x{:02X}", pat.extract(b'n', bytes), pat.extract(b'i', bytes))
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::binary(
                    BinaryOp::BoolEqual,
                    Node::reg(reg_name(pat.extract(b'n', bytes))),
                    Node::int(pat.extract(b'i', bytes) as u32),
                ),
                Node::flag("APSR.Z"),
            )]
        }),
    instr!("adds", "0011'0ddd'iiii'iiii", Arithmetic,
        |_, bytes, pat| {
            format!("R{}, #0x{:02X}", pat.extract(b'd', bytes), pat.extract(b'i', bytes))
        },
        |_, bytes, pat| {
            let place = Node::reg(reg_name(pat.extract(b'd', bytes)));
            vec![Node::assign(
                Node::binary(BinaryOp::Add, place.clone(), Node::int(pat.extract(b'i', bytes) as u32)),
                place,
            )]
        }),
    instr!("subs", "0011'1ddd'iiii'iiii", Arithmetic,
        |_, bytes, pat| {
            format!("R{}, #0x{:02X}", pat.extract(b'd', bytes), pat.extract(b'i', bytes))
        },
        |_, bytes, pat| {
            let place = Node::reg(reg_name(pat.extract(b'd', bytes)));
            vec![Node::assign(
                Node::binary(BinaryOp::Subtract, place.clone(), Node::int(pat.extract(b'i', bytes) as u32)),
                place,
            )]
        }),

    // Register-to-register data processing.
    instr!("ands", "0100'0000'00mm'mddd", Arithmetic,
        |_, bytes, pat| format!("R{}, R{}", pat.extract(b'd', bytes), pat.extract(b'm', bytes)),
        |_, bytes, pat| {
            let place = Node::reg(reg_name(pat.extract(b'd', bytes)));
            vec![Node::assign(
                Node::binary(BinaryOp::BitAnd, place.clone(), Node::reg(reg_name(pat.extract(b'm', bytes)))),
                place,
            )]
        }),
    instr!("eors", "0100'0000'01mm'mddd", Arithmetic,
        |_, bytes, pat| format!("R{}, R{}", pat.extract(b'd', bytes), pat.extract(b'm', bytes)),
        |_, bytes, pat| {
            let place = Node::reg(reg_name(pat.extract(b'd', bytes)));
            vec![Node::assign(
                Node::binary(BinaryOp::BitXor, place.clone(), Node::reg(reg_name(pat.extract(b'm', bytes)))),
                place,
            )]
        }),
    instr!("tst", "0100'0010'00mm'mnnn", Arithmetic,
        |_, bytes, pat| format!("R{}, R{}", pat.extract(b'n', bytes), pat.extract(b'm', bytes)),
        |_, bytes, pat| {
            vec![Node::assign(
                Node::binary(
                    BinaryOp::BoolEqual,
                    Node::binary(
                        BinaryOp::BitAnd,
                        Node::reg(reg_name(pat.extract(b'n', bytes))),
                        Node::reg(reg_name(pat.extract(b'm', bytes))),
                    ),
                    Node::int(0),
                ),
                Node::flag("APSR.Z"),
            )]
        }),
    instr!("cmp", "0100'0010'10mm'mnnn", Arithmetic,
        |_, bytes, pat| format!("R{}, R{}", pat.extract(b'n', bytes), pat.extract(b'm', bytes)),
        |_, bytes, pat| {
            vec![Node::assign(
                Node::binary(
                    BinaryOp::BoolEqual,
                    Node::reg(reg_name(pat.extract(b'n', bytes))),
                    Node::reg(reg_name(pat.extract(b'm', bytes))),
                ),
                Node::flag("APSR.Z"),
            )]
        }),
    instr!("orrs", "0100'0011'00mm'mddd", Arithmetic,
        |_, bytes, pat| format!("R{}, R{}", pat.extract(b'd', bytes), pat.extract(b'm', bytes)),
        |_, bytes, pat| {
            let place = Node::reg(reg_name(pat.extract(b'd', bytes)));
            vec![Node::assign(
                Node::binary(BinaryOp::BitOr, place.clone(), Node::reg(reg_name(pat.extract(b'm', bytes)))),
                place,
            )]
        }),
    instr!("bics", "0100'0011'10mm'mddd", Arithmetic,
        |_, bytes, pat| format!("R{}, R{}", pat.extract(b'd', bytes), pat.extract(b'm', bytes)),
        |_, bytes, pat| {
            let place = Node::reg(reg_name(pat.extract(b'd', bytes)));
            vec![Node::assign(
                Node::binary(
                    BinaryOp::BitAnd,
                    place.clone(),
                    Node::unary(UnaryOp::BitNot, Node::reg(reg_name(pat.extract(b'm', bytes)))),
                ),
                place,
            )]
        }),
    instr!("mvns", "0100'0011'11mm'mddd", Arithmetic,
        |_, bytes, pat| format!("R{}, R{}", pat.extract(b'd', bytes), pat.extract(b'm', bytes)),
        |_, bytes, pat| {
            vec![Node::assign(
                Node::unary(UnaryOp::BitNot, Node::reg(reg_name(pat.extract(b'm', bytes)))),
                Node::reg(reg_name(pat.extract(b'd', bytes))),
            )]
        }),

    // High-register move: the destination is the split D:ddd field.
    instr!("mov", "0100'0110'dmmm'mddd", RegisterAccess,
        |_, bytes, pat| {
            format!("{}, {}",
                reg_name(pat.extract(b'd', bytes)),
                reg_name(pat.extract(b'm', bytes)))
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::reg(reg_name(pat.extract(b'm', bytes))),
                Node::reg(reg_name(pat.extract(b'd', bytes))),
            )]
        }),
    instr!("bx", "0100'0111'0mmm'm000", UnconditionalJump,
        |_, bytes, pat| reg_name(pat.extract(b'm', bytes)).into(),
        |_, bytes, pat| {
            // Branching through the link register is the Thumb return.
            match pat.extract(b'm', bytes) {
                14 => vec![Node::Flow(FlowChange::Return)],
                m => vec![Node::jump(Node::reg(reg_name(m)))],
            }
        }),
    instr!("blx", "0100'0111'1mmm'm000", FunctionCall,
        |_, bytes, pat| reg_name(pat.extract(b'm', bytes)).into(),
        |_, bytes, pat| {
            vec![Node::call(Node::reg(reg_name(pat.extract(b'm', bytes))))]
        }),

    // Loads and stores.
    instr!("ldr", "0100'1ttt'iiii'iiii", MemoryAccess,
        |_, bytes, pat| {
            format!("R{}, [PC, #0x{:X}]",
                pat.extract(b't', bytes),
                pat.extract(b'i', bytes) * 4)
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::deref(Node::binary(
                    BinaryOp::Add,
                    Node::reg("PC"),
                    Node::int((pat.extract(b'i', bytes) * 4) as u32),
                )),
                Node::reg(reg_name(pat.extract(b't', bytes))),
            )]
        }),
    instr!("str", "0110'0iii'iinn'nttt", MemoryAccess,
        |_, bytes, pat| {
            format!("R{}, [R{}, #0x{:X}]",
                pat.extract(b't', bytes),
                pat.extract(b'n', bytes),
                pat.extract(b'i', bytes) * 4)
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::reg(reg_name(pat.extract(b't', bytes))),
                Node::deref(Node::binary(
                    BinaryOp::Add,
                    Node::reg(reg_name(pat.extract(b'n', bytes))),
                    Node::int((pat.extract(b'i', bytes) * 4) as u32),
                )),
            )]
        }),
    instr!("ldr", "0110'1iii'iinn'nttt", MemoryAccess,
        |_, bytes, pat| {
            format!("R{}, [R{}, #0x{:X}]",
                pat.extract(b't', bytes),
                pat.extract(b'n', bytes),
                pat.extract(b'i', bytes) * 4)
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::deref(Node::binary(
                    BinaryOp::Add,
                    Node::reg(reg_name(pat.extract(b'n', bytes))),
                    Node::int((pat.extract(b'i', bytes) * 4) as u32),
                )),
                Node::reg(reg_name(pat.extract(b't', bytes))),
            )]
        }),
    instr!("strb", "0111'0iii'iinn'nttt", MemoryAccess,
        |_, bytes, pat| {
            format!("R{}, [R{}, #0x{:X}]",
                pat.extract(b't', bytes),
                pat.extract(b'n', bytes),
                pat.extract(b'i', bytes))
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::reg(reg_name(pat.extract(b't', bytes))),
                Node::deref(Node::binary(
                    BinaryOp::Add,
                    Node::reg(reg_name(pat.extract(b'n', bytes))),
                    Node::int(pat.extract(b'i', bytes) as u32),
                )),
            )]
        }),
    instr!("ldrb", "0111'1iii'iinn'nttt", MemoryAccess,
        |_, bytes, pat| {
            format!("R{}, [R{}, #0x{:X}]",
                pat.extract(b't', bytes),
                pat.extract(b'n', bytes),
                pat.extract(b'i', bytes))
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::deref(Node::binary(
                    BinaryOp::Add,
                    Node::reg(reg_name(pat.extract(b'n', bytes))),
                    Node::int(pat.extract(b'i', bytes) as u32),
                )),
                Node::reg(reg_name(pat.extract(b't', bytes))),
            )]
        }),

    // PC- and SP-relative address arithmetic.
    instr!("adr", "1010'0ddd'iiii'iiii", RegisterAccess,
        |_, bytes, pat| {
            format!("R{}, #0x{:X}", pat.extract(b'd', bytes), pat.extract(b'i', bytes) * 4)
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::binary(
                    BinaryOp::Add,
                    Node::reg("PC"),
                    Node::int((pat.extract(b'i', bytes) * 4) as u32),
                ),
                Node::reg(reg_name(pat.extract(b'd', bytes))),
            )]
        }),
    instr!("add", "1010'1ddd'iiii'iiii", RegisterAccess,
        |_, bytes, pat| {
            format!("R{}, SP, #0x{:X}", pat.extract(b'd', bytes), pat.extract(b'i', bytes) * 4)
        },
        |_, bytes, pat| {
            vec![Node::assign(
                Node::binary(
                    BinaryOp::Add,
                    Node::reg("SP"),
                    Node::int((pat.extract(b'i', bytes) * 4) as u32),
                ),
                Node::reg(reg_name(pat.extract(b'd', bytes))),
            )]
        }),
    instr!("add", "1011'0000'0iii'iiii", RegisterAccess,
        |_, bytes, pat| format!("SP, #0x{:X}", pat.extract(b'i', bytes) * 4),
        |_, bytes, pat| {
            vec![Node::assign(
                Node::binary(
                    BinaryOp::Add,
                    Node::reg("SP"),
                    Node::int((pat.extract(b'i', bytes) * 4) as u32),
                ),
                Node::reg("SP"),
            )]
        }),
    instr!("sub", "1011'0000'1iii'iiii", RegisterAccess,
        |_, bytes, pat| format!("SP, #0x{:X}", pat.extract(b'i', bytes) * 4),
        |_, bytes, pat| {
            vec![Node::assign(
                Node::binary(
                    BinaryOp::Subtract,
                    Node::reg("SP"),
                    Node::int((pat.extract(b'i', bytes) * 4) as u32),
                ),
                Node::reg("SP"),
            )]
        }),

    // Compare-and-branch on zero, forward only.
    instr!("cbz", "1011'00i1'iiii'innn", ConditionalJump,
        |addr, bytes, pat| {
            format!("R{}, #0x{:04X}",
                pat.extract(b'n', bytes),
                cb_dest(addr, pat.extract(b'i', bytes)))
        },
        |addr, bytes, pat| {
            let cond = Node::binary(
                BinaryOp::BoolEqual,
                Node::reg(reg_name(pat.extract(b'n', bytes))),
                Node::int(0),
            );
            branch_if(cond, cb_dest(addr, pat.extract(b'i', bytes)))
        }),
    instr!("cbnz", "1011'10i1'iiii'innn", ConditionalJump,
        |addr, bytes, pat| {
            format!("R{}, #0x{:04X}",
                pat.extract(b'n', bytes),
                cb_dest(addr, pat.extract(b'i', bytes)))
        },
        |addr, bytes, pat| {
            let cond = Node::binary(
                BinaryOp::BoolNotEqual,
                Node::reg(reg_name(pat.extract(b'n', bytes))),
                Node::int(0),
            );
            branch_if(cond, cb_dest(addr, pat.extract(b'i', bytes)))
        }),

    // Register-list block transfers; the lifted form stays as assembly.
    instr!("push", "1011'010m'rrrr'rrrr", MemoryAccess,
        |_, bytes, pat| {
            let extra = (pat.extract(b'm', bytes) == 1).then_some("LR");
            register_list(pat.extract(b'r', bytes) as u8, extra)
        },
        |_, bytes, pat| {
            let extra = (pat.extract(b'm', bytes) == 1).then_some("LR");
            vec![Node::asm(format!(
                "push {}",
                register_list(pat.extract(b'r', bytes) as u8, extra)
            ))]
        }),
    instr!("pop", "1011'110p'rrrr'rrrr", MemoryAccess,
        |_, bytes, pat| {
            let extra = (pat.extract(b'p', bytes) == 1).then_some("PC");
            register_list(pat.extract(b'r', bytes) as u8, extra)
        },
        |_, bytes, pat| {
            // Popping the program counter ends the function.
            let pops_pc = pat.extract(b'p', bytes) == 1;
            let extra = pops_pc.then_some("PC");
            let mut nodes = vec![Node::asm(format!(
                "pop {}",
                register_list(pat.extract(b'r', bytes) as u8, extra)
            ))];
            if pops_pc {
                nodes.push(Node::Flow(FlowChange::Return));
            }
            nodes
        }),
    instr!("nop", "1011'1111'0000'0000", Other,
        |_, _, _| String::new(),
        |_, _, _| Vec::new()),
    instr!("stm", "1100'0nnn'rrrr'rrrr", MemoryAccess,
        |_, bytes, pat| {
            format!("R{}!, {}",
                pat.extract(b'n', bytes),
                register_list(pat.extract(b'r', bytes) as u8, None))
        },
        |_, bytes, pat| {
            vec![Node::asm(format!(
                "stm R{}!, {}",
                pat.extract(b'n', bytes),
                register_list(pat.extract(b'r', bytes) as u8, None)
            ))]
        }),
    instr!("ldm", "1100'1nnn'rrrr'rrrr", MemoryAccess,
        |_, bytes, pat| {
            format!("R{}!, {}",
                pat.extract(b'n', bytes),
                register_list(pat.extract(b'r', bytes) as u8, None))
        },
        |_, bytes, pat| {
            vec![Node::asm(format!(
                "ldm R{}!, {}",
                pat.extract(b'n', bytes),
                register_list(pat.extract(b'r', bytes) as u8, None)
            ))]
        }),

    // The two reserved condition slots decode ahead of the plain branches.
    instr!("udf", "1101'1110'iiii'iiii", Other,
        |_, bytes, pat| format!("#0x{:02X}", pat.extract(b'i', bytes)),
        |_, bytes, pat| {
            vec![Node::asm(format!("udf #0x{:02X}", pat.extract(b'i', bytes)))]
        }),
    instr!("svc", "1101'1111'iiii'iiii", FunctionCall,
        |_, bytes, pat| format!("#0x{:02X}", pat.extract(b'i', bytes)),
        |_, bytes, pat| {
            vec![Node::asm(format!("svc #0x{:02X}", pat.extract(b'i', bytes)))]
        }),

    cond_branch!("beq", "1101'0000'oooo'oooo", flag_is("APSR.Z", 1)),
    cond_branch!("bne", "1101'0001'oooo'oooo", flag_is("APSR.Z", 0)),
    cond_branch!("bcs", "1101'0010'oooo'oooo", flag_is("APSR.C", 1)),
    cond_branch!("bcc", "1101'0011'oooo'oooo", flag_is("APSR.C", 0)),
    cond_branch!("bmi", "1101'0100'oooo'oooo", flag_is("APSR.N", 1)),
    cond_branch!("bpl", "1101'0101'oooo'oooo", flag_is("APSR.N", 0)),
    cond_branch!("bvs", "1101'0110'oooo'oooo", flag_is("APSR.V", 1)),
    cond_branch!("bvc", "1101'0111'oooo'oooo", flag_is("APSR.V", 0)),
    cond_branch!("bhi", "1101'1000'oooo'oooo",
        both(flag_is("APSR.C", 1), flag_is("APSR.Z", 0))),
    cond_branch!("bls", "1101'1001'oooo'oooo",
        either(flag_is("APSR.C", 0), flag_is("APSR.Z", 1))),
    cond_branch!("bge", "1101'1010'oooo'oooo", flags_agree()),
    cond_branch!("blt", "1101'1011'oooo'oooo", flags_disagree()),
    cond_branch!("bgt", "1101'1100'oooo'oooo",
        both(flag_is("APSR.Z", 0), flags_agree())),
    cond_branch!("ble", "1101'1101'oooo'oooo",
        either(flag_is("APSR.Z", 1), flags_disagree())),

    instr!("b", "1110'0ooo'oooo'oooo", UnconditionalJump,
        |addr, bytes, pat| format!("#0x{:04X}", uncond_dest(addr, pat.extract(b'o', bytes))),
        |addr, bytes, pat| {
            vec![Node::jump(Node::int(uncond_dest(addr, pat.extract(b'o', bytes))))]
        }),
];
