use mockall::mock;
use rv32hart_core::common::error::SyscallError;
use rv32hart_core::core::Cpu;
use rv32hart_core::core::cpu::{Debugger, Syscall, SyscallHandler, SyscallOutcome};
use rv32hart_core::core::units::mmu::Mmu;

mock! {
    pub Syscalls {}
    impl SyscallHandler for Syscalls {
        fn handle(&mut self, call: &Syscall, mmu: &mut Mmu) -> Result<SyscallOutcome, SyscallError>;
    }
}

mock! {
    pub Breakpoints {}
    impl Debugger for Breakpoints {
        fn launch(&mut self, cpu: &mut Cpu, breakpoint: u32);
    }
}
