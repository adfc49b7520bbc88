#![cfg(test)]

use crate::{bit_name, register_name, CATALOG};
use ast::{fmt, BinaryOp, FlowChange, Node};
use decoder::shadows;

fn disassemble_one(address: u64, bytes: &[u8]) -> String {
    let def = CATALOG
        .dispatch(bytes)
        .unwrap_or_else(|| panic!("no descriptor matched {bytes:02X?}"));
    def.disassemble(address, bytes)
}

fn lift_one(address: u64, bytes: &[u8]) -> Vec<Node> {
    let def = CATALOG
        .dispatch(bytes)
        .unwrap_or_else(|| panic!("no descriptor matched {bytes:02X?}"));
    def.decompile(address, bytes)
}

#[test]
fn nop_keeps_its_trailing_space() {
    assert_eq!(disassemble_one(0, &[0x00]), "nop ");
    assert!(lift_one(0, &[0x00]).is_empty());
}

#[test]
fn clr_carry() {
    assert_eq!(disassemble_one(0, &[0xC3]), "clr C");

    let nodes = lift_one(0, &[0xC3]);
    assert_eq!(nodes, vec![Node::assign(Node::int(1), Node::flag("C"))]);
    assert_eq!(fmt::render_node(&nodes[0]), "FLAGS.C = 0x01");
}

#[test]
fn ljmp_absolute() {
    let bytes = [0x02, 0x12, 0x34];
    assert_eq!(disassemble_one(0, &bytes), "ljmp #0x1234");

    let nodes = lift_one(0, &bytes);
    assert_eq!(nodes, vec![Node::jump(Node::int(0x1234))]);
    assert_eq!(fmt::render_node(&nodes[0]), "goto 0x1234");
}

#[test]
fn jc_resolves_against_the_following_instruction() {
    let nodes = lift_one(0x10, &[0x40, 0x05]);

    let expected = Node::cond(
        Node::binary(BinaryOp::BoolEqual, Node::flag("PSW.C"), Node::int(1)),
        vec![Node::jump(Node::int(0x10 + 0x05 + 2))],
        Vec::new(),
    );
    assert_eq!(nodes, vec![expected]);
    assert!(fmt::render_node(&nodes[0]).starts_with("if (FLAGS.PSW.C == 0x01) {"));
}

#[test]
fn relative_offsets_are_signed() {
    // 0xFE is -2: a branch back onto the instruction itself.
    assert_eq!(disassemble_one(0x20, &[0x80, 0xFE]), "sjmp #0x20");
    assert_eq!(disassemble_one(0x20, &[0xDB, 0xFE]), "djnz R3, #0x20");

    // Wrapping below zero stays inside the 16-bit program counter.
    assert_eq!(
        lift_one(0, &[0x80, 0xFC]),
        vec![Node::jump(Node::int(0xFFFE))]
    );
}

#[test]
fn ajmp_replaces_the_low_eleven_bits() {
    // 0x21 carries page bits 001, so the target is 0x105 within page 0.
    assert_eq!(disassemble_one(0, &[0x21, 0x05]), "ajmp #0x0105");
    // Same encoding from a higher page keeps the caller's page bits.
    assert_eq!(disassemble_one(0x4800, &[0x21, 0x05]), "ajmp #0x4905");

    assert_eq!(
        lift_one(0x4800, &[0x21, 0x05]),
        vec![Node::jump(Node::int(0x4905))]
    );
}

#[test]
fn acall_is_a_function_call() {
    let nodes = lift_one(0, &[0x11, 0x42]);
    assert_eq!(nodes, vec![Node::call(Node::int(0x42))]);
    assert_eq!(fmt::render_node(&nodes[0]), "sub_0x42()");
}

#[test]
fn lcall_absolute() {
    assert_eq!(disassemble_one(0, &[0x12, 0x80, 0x00]), "lcall #0x8000");
    assert_eq!(
        lift_one(0, &[0x12, 0x80, 0x00]),
        vec![Node::call(Node::int(0x8000))]
    );
}

#[test]
fn returns_lift_to_return() {
    assert_eq!(lift_one(0, &[0x22]), vec![Node::Flow(FlowChange::Return)]);
    assert_eq!(lift_one(0, &[0x32]), vec![Node::Flow(FlowChange::Return)]);
}

#[test]
fn mov_family_display() {
    assert_eq!(disassemble_one(0, &[0x74, 0x42]), "mov A, #0x42");
    assert_eq!(disassemble_one(0, &[0x7A, 0x07]), "mov R2, #0x07");
    assert_eq!(disassemble_one(0, &[0x90, 0xBE, 0xEF]), "mov DPTR, #0xBEEF");
    assert_eq!(disassemble_one(0, &[0xE5, 0xE0]), "mov A, ACC");
    assert_eq!(disassemble_one(0, &[0xE5, 0x42]), "mov A, SFR_42");
    assert_eq!(disassemble_one(0, &[0x85, 0x90, 0xA0]), "mov P2, P1");
    assert_eq!(disassemble_one(0, &[0xF7]), "mov @R1, A");
    assert_eq!(disassemble_one(0, &[0xEB]), "mov A, R3");
}

#[test]
fn mov_lifts_destination_from_the_mnemonic() {
    // mov A, @R1 reads memory into the accumulator.
    assert_eq!(
        lift_one(0, &[0xE7]),
        vec![Node::assign(Node::deref(Node::reg("R1")), Node::reg("A"))]
    );

    // mov direct, direct copies src into dst; operands print dst first.
    assert_eq!(
        lift_one(0, &[0x85, 0x90, 0xA0]),
        vec![Node::assign(Node::reg("P1"), Node::reg("P2"))]
    );
}

#[test]
fn movx_pair_follows_the_mnemonic() {
    assert_eq!(disassemble_one(0, &[0xE0]), "movx A, @DPTR");
    assert_eq!(
        lift_one(0, &[0xE0]),
        vec![Node::assign(Node::deref(Node::reg("DPTR")), Node::reg("A"))]
    );

    assert_eq!(disassemble_one(0, &[0xF0]), "movx @DPTR, A");
    assert_eq!(
        lift_one(0, &[0xF0]),
        vec![Node::assign(Node::reg("A"), Node::deref(Node::reg("DPTR")))]
    );
}

#[test]
fn inc_and_dec_step_their_place() {
    assert_eq!(disassemble_one(0, &[0x08]), "inc R0");
    assert_eq!(
        lift_one(0, &[0x08]),
        vec![Node::assign(
            Node::binary(BinaryOp::Add, Node::reg("R0"), Node::int(1)),
            Node::reg("R0"),
        )]
    );

    assert_eq!(disassemble_one(0, &[0x16]), "dec @R0");
    assert_eq!(
        lift_one(0, &[0x16]),
        vec![Node::assign(
            Node::binary(
                BinaryOp::Subtract,
                Node::deref(Node::reg("R0")),
                Node::int(1)
            ),
            Node::deref(Node::reg("R0")),
        )]
    );

    assert_eq!(disassemble_one(0, &[0xA3]), "inc DPTR");
}

#[test]
fn djnz_decrements_then_branches() {
    let nodes = lift_one(0x100, &[0xD8, 0x10]);
    assert_eq!(nodes.len(), 2);
    assert_eq!(
        nodes[0],
        Node::assign(
            Node::binary(BinaryOp::Subtract, Node::reg("R0"), Node::int(1)),
            Node::reg("R0"),
        )
    );
    assert_eq!(
        nodes[1],
        Node::cond(
            Node::binary(BinaryOp::BoolNotEqual, Node::reg("R0"), Node::int(0)),
            vec![Node::jump(Node::int(0x112))],
            Vec::new(),
        )
    );
}

#[test]
fn cjne_display_and_condition() {
    assert_eq!(
        disassemble_one(0x100, &[0xB4, 0x42, 0x05]),
        "cjne A, #0x42, #0x108"
    );

    let nodes = lift_one(0x100, &[0xB4, 0x42, 0x05]);
    assert_eq!(
        nodes,
        vec![Node::cond(
            Node::binary(BinaryOp::BoolNotEqual, Node::reg("A"), Node::int(0x42)),
            vec![Node::jump(Node::int(0x108))],
            Vec::new(),
        )]
    );
}

#[test]
fn jbc_clears_the_bit_on_the_taken_path() {
    let nodes = lift_one(0, &[0x10, 0x99, 0x10]);
    assert_eq!(
        nodes,
        vec![Node::cond(
            Node::binary(BinaryOp::BoolNotEqual, Node::flag("TI"), Node::int(0)),
            vec![
                Node::assign(Node::int(0), Node::flag("TI")),
                Node::jump(Node::int(0x13)),
            ],
            Vec::new(),
        )]
    );
}

#[test]
fn bit_addressed_branches_use_sfr_bit_names() {
    assert_eq!(disassemble_one(0, &[0x20, 0x99, 0x10]), "jb TI, #0x13");
    assert_eq!(disassemble_one(0, &[0x30, 0xD7, 0x02]), "jnb CY, #0x05");
    assert_eq!(disassemble_one(0, &[0xC2, 0xAF]), "clr EA");
    assert_eq!(disassemble_one(0, &[0xD2, 0x87]), "setb P0.7");
}

#[test]
fn bit_names_cover_the_addressable_map() {
    assert_eq!(bit_name(0x00), "MEM.0");
    assert_eq!(bit_name(0x7F), "MEM.127");
    assert_eq!(bit_name(0x90), "P1.0");
    assert_eq!(bit_name(0x98), "RI");
    assert_eq!(bit_name(0xD2), "OV");
    assert_eq!(bit_name(0xE3), "A.3");
    assert_eq!(bit_name(0xC0), "0xC0");
}

#[test]
fn register_names_cover_banks_and_sfrs() {
    assert_eq!(register_name(0x00), "R0");
    assert_eq!(register_name(0x07), "R7");
    assert_eq!(register_name(0x81), "SP");
    assert_eq!(register_name(0xD0), "PSW");
    assert_eq!(register_name(0x42), "SFR_42");
}

#[test]
fn accumulator_arithmetic_lifts() {
    // add A, R5
    assert_eq!(
        lift_one(0, &[0x2D]),
        vec![Node::assign(
            Node::binary(BinaryOp::Add, Node::reg("A"), Node::reg("R5")),
            Node::reg("A"),
        )]
    );

    // addc A, #0x10 folds the carry in.
    assert_eq!(
        lift_one(0, &[0x34, 0x10]),
        vec![Node::assign(
            Node::binary(
                BinaryOp::Add,
                Node::binary(BinaryOp::Add, Node::reg("A"), Node::int(0x10)),
                Node::flag("C"),
            ),
            Node::reg("A"),
        )]
    );

    // xrl A, @R0
    assert_eq!(
        lift_one(0, &[0x66]),
        vec![Node::assign(
            Node::binary(BinaryOp::BitXor, Node::reg("A"), Node::deref(Node::reg("R0"))),
            Node::reg("A"),
        )]
    );
}

#[test]
fn rotates_and_swap() {
    assert_eq!(
        lift_one(0, &[0x03]),
        vec![Node::assign(
            Node::binary(BinaryOp::RotateRight, Node::reg("A"), Node::int(1)),
            Node::reg("A"),
        )]
    );
    assert_eq!(
        lift_one(0, &[0xC4]),
        vec![Node::assign(
            Node::binary(BinaryOp::RotateLeft, Node::reg("A"), Node::int(4)),
            Node::reg("A"),
        )]
    );

    // Carry-threading rotates stay as assembly.
    assert_eq!(lift_one(0, &[0x33]), vec![Node::asm("rlc A")]);
}

#[test]
fn stack_and_exchange_stay_as_assembly() {
    assert_eq!(disassemble_one(0, &[0xC0, 0xE0]), "push ACC");
    assert_eq!(lift_one(0, &[0xC0, 0xE0]), vec![Node::asm("push ACC")]);
    assert_eq!(
        fmt::render_node(&lift_one(0, &[0xD0, 0xD0])[0]),
        "asm volatile { pop PSW }"
    );
    assert_eq!(disassemble_one(0, &[0xC9]), "xch A, R1");
}

#[test]
fn jmp_indirect_jumps_through_an_expression() {
    assert_eq!(disassemble_one(0, &[0x73]), "jmp @A+DPTR");
    assert_eq!(
        lift_one(0, &[0x73]),
        vec![Node::jump(Node::binary(
            BinaryOp::Add,
            Node::reg("A"),
            Node::reg("DPTR")
        ))]
    );
}

#[test]
fn movc_reads_code_memory() {
    assert_eq!(
        lift_one(0, &[0x93]),
        vec![Node::assign(
            Node::deref(Node::binary(BinaryOp::Add, Node::reg("A"), Node::reg("DPTR"))),
            Node::reg("A"),
        )]
    );
}

/// Build the window a descriptor matches, with every placeholder bit set to
/// `fill`.
fn window_for(def: &decoder::InstructionDef, fill: u8) -> Vec<u8> {
    (0..def.width())
        .map(|idx| {
            let (mask, value) = def.pattern.window_byte(idx);
            value | (!mask & fill)
        })
        .collect()
}

#[test]
fn no_descriptor_shadows_a_later_one() {
    let defs = CATALOG.instructions;
    for (i, earlier) in defs.iter().enumerate() {
        for later in &defs[i + 1..] {
            assert!(
                !shadows(earlier, later),
                "`{}` ({:?}) makes `{}` ({:?}) unreachable",
                earlier.mnemonic,
                earlier.pattern,
                later.mnemonic,
                later.pattern,
            );
        }
    }
}

#[test]
fn every_descriptor_is_dispatchable_and_total() {
    for def in CATALOG.instructions {
        for fill in [0x00, 0xFF] {
            let window = window_for(def, fill);
            let found = CATALOG
                .dispatch(&window)
                .unwrap_or_else(|| panic!("{} did not dispatch", def.mnemonic));
            assert!(
                std::ptr::eq(found, def),
                "{:02X?} dispatched to `{}` instead of `{}`",
                window,
                found.mnemonic,
                def.mnemonic,
            );

            // Formatting and lifting must hold for any field values.
            let line = def.disassemble(0x200, &window);
            assert!(line.starts_with(def.mnemonic));
            let _ = def.decompile(0x200, &window);
        }
    }
}
