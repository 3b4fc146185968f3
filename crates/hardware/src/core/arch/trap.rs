//! Pending Trap Queue.
//!
//! This module holds traps between the moment they are raised and the next cycle
//! boundary. It performs the following:
//! 1. **Queuing:** Traps raised during execution are appended in order.
//! 2. **Selection:** Delivery pops the most recently queued trap; while `mstatus.MIE`
//!    is clear only synchronous exceptions are eligible.
//!
//! `mstatus.MIE` gates interrupts only. Synchronous exceptions are delivered whatever
//! its value, since an undelivered exception leaves `pc` on the faulting instruction
//! and the hart would fault on it forever.

use crate::common::error::Trap;
use crate::core::arch::mode::PrivilegeMode;

/// A raised trap together with the privilege level it is delivered to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrapEvent {
    /// The architectural trap.
    pub trap: Trap,
    /// Privilege level the handler runs at.
    pub target: PrivilegeMode,
}

impl TrapEvent {
    /// Wraps a trap targeting machine mode, the only trap-handling level.
    pub const fn machine(trap: Trap) -> Self {
        Self {
            trap,
            target: PrivilegeMode::Machine,
        }
    }
}

/// Ordered queue of traps awaiting delivery.
#[derive(Clone, Debug, Default)]
pub struct TrapQueue {
    pending: Vec<TrapEvent>,
}

impl TrapQueue {
    /// Creates an empty queue.
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Appends a trap.
    pub fn push(&mut self, event: TrapEvent) {
        self.pending.push(event);
    }

    /// Removes and returns the trap to deliver now, if any.
    ///
    /// # Arguments
    ///
    /// * `interrupts_enabled` - Current value of `mstatus.MIE`.
    pub fn pop_deliverable(&mut self, interrupts_enabled: bool) -> Option<TrapEvent> {
        if interrupts_enabled {
            return self.pending.pop();
        }
        let idx = self
            .pending
            .iter()
            .rposition(|event| !event.trap.is_interrupt())?;
        Some(self.pending.remove(idx))
    }

    /// Whether any interrupt is waiting, used to wake a hart parked in `wfi`.
    pub fn has_interrupt(&self) -> bool {
        self.pending.iter().any(|event| event.trap.is_interrupt())
    }

    /// Number of queued traps.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Iterates over queued traps, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TrapEvent> {
        self.pending.iter()
    }

    /// Drops every queued trap.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
