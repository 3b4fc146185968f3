//! Instruction-Set Registry.
//!
//! Each instruction-set module contributes a list of `(mnemonic, handler)` pairs. This
//! module provides:
//! 1. **Contract:** The `InstructionSet` trait and the `Handler` signature.
//! 2. **Naming:** `instruction_table!`, which derives each mnemonic from the handler's
//!    identifier by turning `_` into `.` (`fadd_s` handles `fadd.s`).
//! 3. **Merging:** `DispatchTable`, built once per hart, rejecting duplicate mnemonics.

use std::collections::HashMap;
use std::fmt;

use crate::common::error::{CpuError, ExecError};
use crate::core::Cpu;
use crate::isa::instruction::Instruction;
use crate::isa::privileged::System;
use crate::isa::rv32a::Rv32a;
use crate::isa::rv32d::Rv32d;
use crate::isa::rv32f::Rv32f;
use crate::isa::rv32i::Rv32i;
use crate::isa::rv32m::Rv32m;
use crate::isa::zicsr::Zicsr;

/// Behaviour of one mnemonic.
pub type Handler = fn(&mut Cpu, &Instruction) -> Result<(), ExecError>;

/// A module of instruction handlers.
pub trait InstructionSet: fmt::Debug {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Mnemonic to handler mapping.
    fn load(&self) -> Vec<(String, Handler)>;
}

/// Builds a `Vec<(String, Handler)>` from handler identifiers.
macro_rules! instruction_table {
    ($($handler:ident),* $(,)?) => {
        vec![$(
            (
                stringify!($handler).replace('_', "."),
                $handler as $crate::isa::registry::Handler,
            )
        ),*]
    };
}

pub(crate) use instruction_table;

/// The instruction sets every hart loads by default.
pub fn standard_sets() -> Vec<Box<dyn InstructionSet>> {
    vec![
        Box::new(Rv32i),
        Box::new(Rv32m),
        Box::new(Rv32a),
        Box::new(Rv32f),
        Box::new(Rv32d),
        Box::new(Zicsr),
        Box::new(System),
    ]
}

/// Mnemonic to handler map merged from several instruction sets.
#[derive(Clone, Default)]
pub struct DispatchTable {
    handlers: HashMap<String, (Handler, &'static str)>,
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("mnemonics", &self.handlers.len())
            .finish()
    }
}

impl DispatchTable {
    /// Merges the handlers of `sets`.
    ///
    /// # Errors
    ///
    /// `CpuError::DuplicateMnemonic` if two sets (or one set twice) claim a mnemonic.
    pub fn build(sets: &[Box<dyn InstructionSet>]) -> Result<Self, CpuError> {
        let mut handlers: HashMap<String, (Handler, &'static str)> = HashMap::new();
        for set in sets {
            for (mnemonic, handler) in set.load() {
                if let Some(&(_, first)) = handlers.get(&mnemonic) {
                    return Err(CpuError::DuplicateMnemonic {
                        mnemonic,
                        first,
                        second: set.name(),
                    });
                }
                let _ = handlers.insert(mnemonic, (handler, set.name()));
            }
        }
        Ok(Self { handlers })
    }

    /// Handler for `mnemonic`.
    pub fn get(&self, mnemonic: &str) -> Option<Handler> {
        self.handlers.get(mnemonic).map(|(handler, _)| *handler)
    }

    /// Name of the set that registered `mnemonic`.
    pub fn owner(&self, mnemonic: &str) -> Option<&'static str> {
        self.handlers.get(mnemonic).map(|(_, set)| *set)
    }

    /// Number of registered mnemonics.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no mnemonic is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered mnemonics, sorted.
    pub fn mnemonics(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
