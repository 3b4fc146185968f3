//! End-to-end runs of an iterative Fibonacci program.

use pretty_assertions::assert_eq;
use rv32hart_core::config::Config;
use rv32hart_core::sim::program::Program;
use rv32hart_core::soc::memory::{MemoryFlags, MemorySection};
use rv32hart_core::{Cpu, Simulator};

use crate::common::builder::{encode, listing};
use crate::common::harness::init_tracing;

/// `fib(10)` with `a`/`b` in `t0`/`t1`, exiting with the result.
fn raw_words() -> Vec<u32> {
    vec![
        encode("addi", &[10, 0, 10]), // a0 = n
        encode("addi", &[5, 0, 0]),   // t0 = 0
        encode("addi", &[6, 0, 1]),   // t1 = 1
        encode("beq", &[10, 0, 24]),  // loop: if n == 0 goto done
        encode("add", &[7, 5, 6]),
        encode("addi", &[5, 6, 0]),
        encode("addi", &[6, 7, 0]),
        encode("addi", &[10, 10, -1]),
        encode("jal", &[0, -20]),     // goto loop
        encode("addi", &[10, 5, 0]),  // done: a0 = t0
        encode("addi", &[17, 0, 93]),
        encode("ecall", &[]),
    ]
}

#[test]
fn raw_words_through_the_simulator() {
    init_tracing();
    let mut program = Program::new("fib");
    program
        .add_section(MemorySection::from_words(".text", 0, MemoryFlags::TEXT, &raw_words()))
        .unwrap();

    let mut sim = Simulator::new(&Config::default()).unwrap();
    let base = sim.load(program).unwrap();
    assert_eq!(base, 0x1000);
    assert_eq!(sim.run().unwrap(), 55);
    assert!(sim.is_launched());
    assert_eq!(sim.cpu.regs.get("t1").unwrap(), 89);
    assert_eq!(sim.take_exit(), Some(55));
    assert_eq!(sim.take_exit(), None);
}

#[test]
fn structured_instructions_with_labels() {
    init_tracing();
    let mut program = Program::new("fib");
    program
        .add_section(MemorySection::from_instructions(
            ".text",
            0,
            MemoryFlags::TEXT,
            listing(
                "
                li a0, 10
                li t0, 0
                li t1, 1
                beqz a0, done
                add t2, t0, t1
                mv t0, t1
                mv t1, t2
                addi a0, a0, -1
                j loop
                mv a0, t0
                li a7, 93
                ecall
                ",
            ),
        ))
        .unwrap();
    program.add_label("main", 0);
    program.add_label("loop", 12);
    program.add_label("done", 36);

    let mut cpu = Cpu::new(&Config::default()).unwrap();
    let base = cpu.load_program(program, Some(0x8000)).unwrap();
    assert_eq!(cpu.mmu.resolve_symbol("done"), Some(base + 36));

    cpu.launch(None).unwrap();
    assert_eq!(cpu.pc, 0x8000);
    assert_eq!(cpu.run().unwrap(), 55);
    assert_eq!(cpu.instret, 3 + 10 * 6 + 1 + 3);
}

#[test]
fn machine_mode_runs_report_the_halt_code() {
    init_tracing();
    let mut words = raw_words();
    let len = words.len();
    words[len - 2] = encode("csrrw", &[0, 0x789, 10]);
    words.truncate(len - 1);

    let mut config = Config::default();
    config.general.privileged = true;
    let mut program = Program::with_base("fib", 0x2000);
    program
        .add_section(MemorySection::from_words(".text", 0x2000, MemoryFlags::TEXT, &words))
        .unwrap();

    let mut sim = Simulator::new(&config).unwrap();
    let _ = sim.load(program).unwrap();
    assert_eq!(sim.run().unwrap(), 55);
}
