use rstest::rstest;
use rv32hart_core::isa::disasm::disassemble;

use crate::common::builder::{encode, structured};

#[rstest]
#[case(encode("lw", &[10, 2, -4]), "lw a0, -4(sp)")]
#[case(encode("beq", &[10, 0, 16]), "beq a0, zero, 16")]
#[case(encode("lui", &[5, 0x12345]), "lui t0, 0x12345")]
#[case(encode("amoadd.w", &[10, 12, 11]), "amoadd.w a0, a1, (a2)")]
#[case(encode("csrrw", &[0, 0x305, 5]), "csrrw zero, mtvec, t0")]
#[case(encode("fadd.s", &[10, 11, 12]), "fadd.s fa0, fa1, fa2")]
#[case(0x0000_0073, "ecall")]
fn renders_raw_words(#[case] word: u32, #[case] text: &str) {
    assert_eq!(disassemble(word), text);
}

#[test]
fn structured_instructions_print_their_tokens() {
    assert_eq!(structured("la a0, message").to_string(), "la a0, message");
}
