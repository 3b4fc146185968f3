//! Control and Status Register (CSR) definitions and operations.
//!
//! This module implements the CSR subsystem for the hart. It provides:
//! 1. **Address Definitions:** Constants for the machine, counter and float CSRs.
//! 2. **Field Views:** `mstatus` sub-fields that are toggled without disturbing neighbours.
//! 3. **Register Storage:** The sparse `CsrStore`, with virtual registers for counters,
//!    the real-time clock, the timer compare pair and the halt register.
//! 4. **Access Logic:** Privilege gating encoded in the CSR address itself.

use std::collections::BTreeMap;

use crate::common::error::CsrError;
use crate::core::arch::mode::PrivilegeMode;

/// Floating-point accrued exception flags CSR address.
pub const FFLAGS: u32 = 0x001;

/// Floating-point dynamic rounding mode CSR address.
pub const FRM: u32 = 0x002;

/// Floating-point control and status CSR address.
pub const FCSR: u32 = 0x003;

/// Machine status register CSR address.
pub const MSTATUS: u32 = 0x300;

/// Machine ISA register CSR address.
pub const MISA: u32 = 0x301;

/// Machine interrupt enable register CSR address.
pub const MIE: u32 = 0x304;

/// Machine trap vector base address register CSR address.
pub const MTVEC: u32 = 0x305;

/// Machine timer compare, low word (memory-mapped on real parts, a CSR here).
pub const MTIMECMP: u32 = 0x321;

/// Machine timer compare, high word.
pub const MTIMECMPH: u32 = 0x322;

/// Machine scratch register CSR address.
pub const MSCRATCH: u32 = 0x340;

/// Machine exception program counter CSR address.
pub const MEPC: u32 = 0x341;

/// Machine cause register CSR address.
pub const MCAUSE: u32 = 0x342;

/// Machine trap value register CSR address.
pub const MTVAL: u32 = 0x343;

/// Machine interrupt pending register CSR address.
pub const MIP: u32 = 0x344;

/// Custom halt register. Writing a non-zero value halts the hart with that exit code.
pub const HALT: u32 = 0x789;

/// Machine cycle counter CSR address.
pub const MCYCLE: u32 = 0xB00;

/// Machine instructions retired counter CSR address.
pub const MINSTRET: u32 = 0xB02;

/// Machine cycle counter, high word.
pub const MCYCLEH: u32 = 0xB80;

/// Machine instructions retired counter, high word.
pub const MINSTRETH: u32 = 0xB82;

/// Cycle counter CSR address (read-only, user mode accessible).
pub const CYCLE: u32 = 0xC00;

/// Real-time counter CSR address (read-only, user mode accessible).
pub const TIME: u32 = 0xC01;

/// Instructions retired counter CSR address (read-only, user mode accessible).
pub const INSTRET: u32 = 0xC02;

/// Cycle counter, high word.
pub const CYCLEH: u32 = 0xC80;

/// Real-time counter, high word.
pub const TIMEH: u32 = 0xC81;

/// Instructions retired counter, high word.
pub const INSTRETH: u32 = 0xC82;

/// Machine vendor ID CSR address.
pub const MVENDORID: u32 = 0xF11;

/// Machine architecture ID CSR address.
pub const MARCHID: u32 = 0xF12;

/// Machine implementation ID CSR address.
pub const MIMPID: u32 = 0xF13;

/// Machine hardware thread ID CSR address.
pub const MHARTID: u32 = 0xF14;

/// Machine software interrupt enable/pending bit in `mie`/`mip`.
pub const MIP_MSIP: u32 = 1 << 3;

/// Machine timer interrupt enable/pending bit in `mie`/`mip`.
pub const MIP_MTIP: u32 = 1 << 7;

/// Machine external interrupt enable/pending bit in `mie`/`mip`.
pub const MIP_MEIP: u32 = 1 << 11;

/// Default `misa` value: MXL=1 (RV32) with the I, M, A, F, D and U bits.
pub const MISA_DEFAULT_RV32IMAFD: u32 = (1 << 30)
    | (1 << 0)
    | (1 << 3)
    | (1 << 5)
    | (1 << 8)
    | (1 << 12)
    | (1 << 20);

/// Bit shift of the rounding mode inside `fcsr`.
pub const FCSR_FRM_SHIFT: u32 = 5;

/// Mask of the accrued exception flags inside `fcsr`.
pub const FCSR_FFLAGS_MASK: u32 = 0x1F;

/// Mask of the rounding mode field (after shifting).
pub const FCSR_FRM_MASK: u32 = 0x7;

/// Mask of the trap vector mode bits in `mtvec`.
pub const MTVEC_MODE_MASK: u32 = 0b11;

/// `mtvec` mode value selecting vectored delivery.
pub const MTVEC_MODE_VECTORED: u32 = 1;

const CSR_NAMES: &[(&str, u32)] = &[
    ("fflags", FFLAGS),
    ("frm", FRM),
    ("fcsr", FCSR),
    ("mstatus", MSTATUS),
    ("misa", MISA),
    ("mie", MIE),
    ("mtvec", MTVEC),
    ("mtimecmp", MTIMECMP),
    ("mtimecmph", MTIMECMPH),
    ("mscratch", MSCRATCH),
    ("mepc", MEPC),
    ("mcause", MCAUSE),
    ("mtval", MTVAL),
    ("mip", MIP),
    ("halt", HALT),
    ("mcycle", MCYCLE),
    ("minstret", MINSTRET),
    ("mcycleh", MCYCLEH),
    ("minstreth", MINSTRETH),
    ("cycle", CYCLE),
    ("time", TIME),
    ("instret", INSTRET),
    ("cycleh", CYCLEH),
    ("timeh", TIMEH),
    ("instreth", INSTRETH),
    ("mvendorid", MVENDORID),
    ("marchid", MARCHID),
    ("mimpid", MIMPID),
    ("mhartid", MHARTID),
];

/// Looks up a CSR address by its assembler name.
pub fn csr_address(name: &str) -> Option<u32> {
    CSR_NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, addr)| *addr)
}

/// Looks up the assembler name of a CSR address.
pub fn csr_name(addr: u32) -> Option<&'static str> {
    CSR_NAMES
        .iter()
        .find(|(_, a)| *a == addr)
        .map(|(name, _)| *name)
}

/// Named sub-fields of `mstatus`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MstatusField {
    /// User interrupt enable.
    Uie,
    /// Supervisor interrupt enable.
    Sie,
    /// Machine interrupt enable.
    Mie,
    /// User previous interrupt enable.
    Upie,
    /// Supervisor previous interrupt enable.
    Spie,
    /// Machine previous interrupt enable.
    Mpie,
    /// Supervisor previous privilege.
    Spp,
    /// Machine previous privilege (2 bits).
    Mpp,
    /// Floating-point unit status (2 bits).
    Fs,
    /// Extension status (2 bits).
    Xs,
    /// Modify privilege.
    Mprv,
    /// Supervisor user memory access.
    Sum,
    /// Make executable readable.
    Mxr,
    /// Trap virtual memory.
    Tvm,
    /// Timeout wait.
    Tw,
    /// Trap SRET.
    Tsr,
    /// State dirty summary.
    Sd,
}

impl MstatusField {
    /// Lowest bit of the field.
    pub const fn lo(self) -> u32 {
        match self {
            Self::Uie => 0,
            Self::Sie => 1,
            Self::Mie => 3,
            Self::Upie => 4,
            Self::Spie => 5,
            Self::Mpie => 7,
            Self::Spp => 8,
            Self::Mpp => 11,
            Self::Fs => 13,
            Self::Xs => 15,
            Self::Mprv => 17,
            Self::Sum => 18,
            Self::Mxr => 19,
            Self::Tvm => 20,
            Self::Tw => 21,
            Self::Tsr => 22,
            Self::Sd => 31,
        }
    }

    /// Width of the field in bits.
    pub const fn width(self) -> u32 {
        match self {
            Self::Mpp | Self::Fs | Self::Xs => 2,
            _ => 1,
        }
    }

    /// Mask of the field, right-aligned.
    pub const fn mask(self) -> u32 {
        (1 << self.width()) - 1
    }
}

/// Computed or side-effecting CSR kinds dispatched by the store itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VirtualCsr {
    /// Naive storage.
    #[default]
    Plain,
    /// Low word of the cycle counter.
    CycleLow,
    /// High word of the cycle counter.
    CycleHigh,
    /// Low word of the retired-instruction counter.
    InstretLow,
    /// High word of the retired-instruction counter.
    InstretHigh,
    /// Hardware thread id.
    HartId,
    /// Low word of the real-time clock.
    TimeLow,
    /// High word of the real-time clock.
    TimeHigh,
    /// Low word of the timer compare value. Writes arm the timer.
    TimerCompareLow,
    /// High word of the timer compare value. Writes arm the timer.
    TimerCompareHigh,
    /// Accrued float flags, a view of `fcsr[4:0]`.
    FloatFlags,
    /// Dynamic rounding mode, a view of `fcsr[7:5]`.
    FloatRoundingMode,
    /// Halt register.
    Halt,
}

/// Getter hook: receives the address and raw stored value, returns the value read.
pub type CsrGetter = fn(addr: u32, raw: u32) -> u32;

/// Setter hook: receives the address, old stored value and new value, returns the value stored.
pub type CsrSetter = fn(addr: u32, old: u32, new: u32) -> u32;

/// Values of the free-running counters at the moment of a CSR read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    /// Cycles executed.
    pub cycle: u64,
    /// Instructions retired.
    pub instret: u64,
    /// Real-time clock ticks.
    pub time: u64,
    /// Hardware thread id.
    pub hart_id: u32,
}

/// Side effect requested by a CSR write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CsrEffect {
    /// Plain store, nothing else to do.
    None,
    /// Halt the hart with the given exit code.
    Halt(u32),
    /// (Re)arm the timer interrupt at the given compare value.
    ArmTimer(u64),
}

#[derive(Clone, Copy, Debug, Default)]
struct CsrSlot {
    raw: u32,
    kind: VirtualCsr,
    getter: Option<CsrGetter>,
    setter: Option<CsrSetter>,
}

/// Sparse 12-bit-addressed CSR bank.
///
/// Reading an address with no getter returns the last stored raw value (zero if never
/// written). Writing an address with no setter stores the value unchanged.
#[derive(Clone, Debug, Default)]
pub struct CsrStore {
    slots: BTreeMap<u32, CsrSlot>,
}

const fn low(v: u64) -> u32 {
    #[allow(clippy::cast_possible_truncation)]
    let w = v as u32;
    w
}

const fn high(v: u64) -> u32 {
    low(v >> 32)
}

impl CsrStore {
    /// Creates an empty store with no virtual registers.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a store with the hart's virtual registers and reset values installed.
    pub fn new() -> Self {
        let mut store = Self::empty();
        for (addr, kind) in [
            (CYCLE, VirtualCsr::CycleLow),
            (CYCLEH, VirtualCsr::CycleHigh),
            (MCYCLE, VirtualCsr::CycleLow),
            (MCYCLEH, VirtualCsr::CycleHigh),
            (INSTRET, VirtualCsr::InstretLow),
            (INSTRETH, VirtualCsr::InstretHigh),
            (MINSTRET, VirtualCsr::InstretLow),
            (MINSTRETH, VirtualCsr::InstretHigh),
            (TIME, VirtualCsr::TimeLow),
            (TIMEH, VirtualCsr::TimeHigh),
            (MHARTID, VirtualCsr::HartId),
            (MTIMECMP, VirtualCsr::TimerCompareLow),
            (MTIMECMPH, VirtualCsr::TimerCompareHigh),
            (FFLAGS, VirtualCsr::FloatFlags),
            (FRM, VirtualCsr::FloatRoundingMode),
            (HALT, VirtualCsr::Halt),
        ] {
            store.register_virtual(addr, kind);
        }
        store.set_raw(MISA, MISA_DEFAULT_RV32IMAFD);
        store.set_raw(MTIMECMP, u32::MAX);
        store.set_raw(MTIMECMPH, u32::MAX);
        store
    }

    /// Binds an address to a virtual register kind.
    pub fn register_virtual(&mut self, addr: u32, kind: VirtualCsr) {
        self.slots.entry(addr).or_default().kind = kind;
    }

    /// Installs an optional getter/setter pair for an address.
    pub fn register_callback(
        &mut self,
        addr: u32,
        getter: Option<CsrGetter>,
        setter: Option<CsrSetter>,
    ) {
        let slot = self.slots.entry(addr).or_default();
        slot.getter = getter;
        slot.setter = setter;
    }

    /// Reads a CSR.
    ///
    /// Virtual kinds are computed from `counters`; a registered getter then sees that
    /// value as its raw input.
    pub fn get(&self, addr: u32, counters: &CounterSnapshot) -> u32 {
        let Some(slot) = self.slots.get(&addr) else {
            return 0;
        };
        let value = match slot.kind {
            VirtualCsr::Plain
            | VirtualCsr::TimerCompareLow
            | VirtualCsr::TimerCompareHigh
            | VirtualCsr::Halt => slot.raw,
            VirtualCsr::CycleLow => low(counters.cycle),
            VirtualCsr::CycleHigh => high(counters.cycle),
            VirtualCsr::InstretLow => low(counters.instret),
            VirtualCsr::InstretHigh => high(counters.instret),
            VirtualCsr::TimeLow => low(counters.time),
            VirtualCsr::TimeHigh => high(counters.time),
            VirtualCsr::HartId => counters.hart_id,
            VirtualCsr::FloatFlags => self.raw(FCSR) & FCSR_FFLAGS_MASK,
            VirtualCsr::FloatRoundingMode => (self.raw(FCSR) >> FCSR_FRM_SHIFT) & FCSR_FRM_MASK,
        };
        slot.getter.map_or(value, |getter| getter(addr, value))
    }

    /// Writes a CSR and reports the side effect the caller must apply.
    pub fn set(&mut self, addr: u32, value: u32) -> CsrEffect {
        let slot = self.slots.entry(addr).or_default();
        let stored = slot.setter.map_or(value, |setter| setter(addr, slot.raw, value));
        slot.raw = stored;
        let kind = slot.kind;
        match kind {
            VirtualCsr::Halt if stored != 0 => CsrEffect::Halt(stored),
            VirtualCsr::TimerCompareLow | VirtualCsr::TimerCompareHigh => {
                CsrEffect::ArmTimer(self.timer_compare())
            }
            VirtualCsr::FloatFlags => {
                let fcsr = (self.raw(FCSR) & !FCSR_FFLAGS_MASK) | (stored & FCSR_FFLAGS_MASK);
                self.set_raw(FCSR, fcsr);
                CsrEffect::None
            }
            VirtualCsr::FloatRoundingMode => {
                let field = FCSR_FRM_MASK << FCSR_FRM_SHIFT;
                let fcsr =
                    (self.raw(FCSR) & !field) | ((stored & FCSR_FRM_MASK) << FCSR_FRM_SHIFT);
                self.set_raw(FCSR, fcsr);
                CsrEffect::None
            }
            _ => CsrEffect::None,
        }
    }

    /// Raw stored value, bypassing virtual kinds and getters.
    pub fn raw(&self, addr: u32) -> u32 {
        self.slots.get(&addr).map_or(0, |slot| slot.raw)
    }

    /// Stores a raw value, bypassing setters and effects.
    pub fn set_raw(&mut self, addr: u32, value: u32) {
        self.slots.entry(addr).or_default().raw = value;
    }

    /// Combined 64-bit timer compare value.
    pub fn timer_compare(&self) -> u64 {
        (u64::from(self.raw(MTIMECMPH)) << 32) | u64::from(self.raw(MTIMECMP))
    }

    /// Reads an `mstatus` sub-field.
    pub fn mstatus_field(&self, field: MstatusField) -> u32 {
        (self.raw(MSTATUS) >> field.lo()) & field.mask()
    }

    /// Writes an `mstatus` sub-field by toggling exactly the bits that differ.
    pub fn set_mstatus_field(&mut self, field: MstatusField, value: u32) {
        let current = self.mstatus_field(field);
        let toggle = (current ^ (value & field.mask())) << field.lo();
        let mstatus = self.raw(MSTATUS) ^ toggle;
        self.set_raw(MSTATUS, mstatus);
    }

    /// Checks that `mode` may access `addr`.
    ///
    /// Bits `[9:8]` of the address hold the lowest privilege allowed to access it;
    /// bits `[11:10] == 0b11` mark it read-only.
    ///
    /// # Errors
    ///
    /// `CsrError::InsufficientPrivilege` or `CsrError::ReadOnly`.
    pub fn check_access(addr: u32, mode: PrivilegeMode, write: bool) -> Result<(), CsrError> {
        let required = (addr >> 8) & 0b11;
        if mode.to_bits() < required {
            return Err(CsrError::InsufficientPrivilege { addr, mode });
        }
        if write && (addr >> 10) & 0b11 == 0b11 {
            return Err(CsrError::ReadOnly { addr });
        }
        Ok(())
    }

    /// Addresses that currently hold state, in ascending order.
    pub fn addresses(&self) -> impl Iterator<Item = u32> + '_ {
        self.slots.keys().copied()
    }
}
