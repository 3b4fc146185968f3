use std::sync::Once;

use rv32hart_core::config::Config;
use rv32hart_core::core::Cpu;
use rv32hart_core::isa::instruction::Instruction;
use rv32hart_core::sim::program::Program;
use rv32hart_core::soc::memory::{MemoryFlags, MemorySection};
use tracing_subscriber::EnvFilter;

/// Base address test programs are loaded at.
pub const TEXT_BASE: u32 = 0x1000;

static TRACING: Once = Once::new();

/// Routes `tracing` output through the test writer; `RUST_LOG` selects the level.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub struct TestContext {
    pub cpu: Cpu,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// An unprivileged hart with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// A machine-mode hart.
    pub fn privileged() -> Self {
        let mut config = Config::default();
        config.general.privileged = true;
        Self::with_config(&config)
    }

    pub fn with_config(config: &Config) -> Self {
        init_tracing();
        let cpu = Cpu::new(config).expect("standard instruction sets are disjoint");
        Self { cpu }
    }

    /// Loads raw words at `TEXT_BASE` and labels it `_start`.
    pub fn load_words(self, words: &[u32]) -> Self {
        self.load_section(MemorySection::from_words(
            ".text",
            TEXT_BASE,
            MemoryFlags::TEXT,
            words,
        ))
    }

    /// Loads structured instructions at `TEXT_BASE`.
    pub fn load_structured(self, instructions: Vec<Instruction>) -> Self {
        self.load_section(MemorySection::from_instructions(
            ".text",
            TEXT_BASE,
            MemoryFlags::TEXT,
            instructions,
        ))
    }

    fn load_section(mut self, section: MemorySection) -> Self {
        let mut program = Program::with_base("test", TEXT_BASE);
        program.add_section(section).expect("single section");
        program.add_label("_start", TEXT_BASE);
        let _ = self
            .cpu
            .load_program(program, None)
            .expect("program fits");
        self
    }

    /// Loads an extra data section.
    pub fn with_data(mut self, name: &str, base: u32, bytes: Vec<u8>) -> Self {
        let mut program = Program::with_base(name, base);
        program
            .add_section(MemorySection::from_bytes(name, base, MemoryFlags::DATA, bytes))
            .expect("single section");
        let _ = self
            .cpu
            .load_program(program, None)
            .expect("data fits");
        self
    }

    /// Launches the hart at `TEXT_BASE`.
    pub fn launch(mut self) -> Self {
        self.cpu.launch(Some(TEXT_BASE)).expect("launch");
        self
    }

    pub fn step_n(&mut self, n: usize) {
        for _ in 0..n {
            self.cpu.step().expect("step");
        }
    }

    pub fn run(&mut self) -> u32 {
        self.cpu.run().expect("run to completion")
    }

    pub fn reg(&self, name: &str) -> i32 {
        self.cpu.regs.get(name).expect("register name")
    }

    pub fn set_reg(&mut self, name: &str, value: i32) {
        let _ = self.cpu.regs.set(name, value).expect("register name");
    }
}
