//! Register allocation
//!
//! The VM has a fixed register file. `r0` is scratch space used inside
//! single instruction sequences and is never handed out. Every other
//! register is owned by exactly one AST node between `alloc` and `dealloc`;
//! a register still owned when a module finishes is a compiler bug.

use crate::ast::NodeId;
use crate::error::{CompileResult, CompilerError};
use std::fmt;

/// Size of the VM register file
pub const MAX_REGISTERS: usize = 32;

/// An allocated register. Not `Clone`: giving it back to the allocator
/// consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct Register {
    index: u8,
    alias: Option<String>,
}

impl Register {
    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Physical name, ignoring any alias
    pub fn physical(&self) -> String {
        format!("r{}", self.index)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "${}", alias),
            None => write!(f, "r{}", self.index),
        }
    }
}

/// Allocation counters of one module
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterStats {
    pub allocations: usize,
    pub deallocations: usize,
    /// Most registers live at the same time
    pub peak: usize,
}

#[derive(Debug)]
pub struct RegisterAllocator {
    slots: [Option<NodeId>; MAX_REGISTERS],
    stats: RegisterStats,
}

impl Default for RegisterAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterAllocator {
    pub fn new() -> Self {
        Self {
            slots: [None; MAX_REGISTERS],
            stats: RegisterStats::default(),
        }
    }

    /// Hand out the lowest free register to `owner`
    pub fn alloc(
        &mut self,
        owner: NodeId,
        alias: Option<&str>,
        line: u32,
    ) -> CompileResult<Register> {
        let index = (1..MAX_REGISTERS)
            .find(|&i| self.slots[i].is_none())
            .ok_or_else(|| CompilerError::internal(line, "no more available registers"))?;

        self.slots[index] = Some(owner);
        self.stats.allocations += 1;
        self.stats.peak = self.stats.peak.max(self.live());
        log::trace!("alloc r{} for node {}", index, owner);

        Ok(Register {
            index: index as u8,
            alias: alias.map(str::to_string),
        })
    }

    pub fn dealloc(&mut self, register: Register, line: u32) -> CompileResult<()> {
        let index = register.index as usize;
        if index == 0 || index >= MAX_REGISTERS || self.slots[index].is_none() {
            return Err(CompilerError::internal(
                line,
                format!("register {} is not allocated", register.physical()),
            ));
        }

        log::trace!("dealloc {}", register.physical());
        self.slots[index] = None;
        self.stats.deallocations += 1;
        Ok(())
    }

    /// Number of registers currently owned
    pub fn live(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Fail if any register is still owned
    pub fn verify(&self, line: u32) -> CompileResult<()> {
        let leaked: Vec<String> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|owner| format!("r{} (node {})", i, owner)))
            .collect();
        if leaked.is_empty() {
            Ok(())
        } else {
            Err(CompilerError::internal(
                line,
                format!("register not deallocated: {}", leaked.join(", ")),
            ))
        }
    }

    pub fn stats(&self) -> RegisterStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_r0_is_never_allocated() {
        let mut regs = RegisterAllocator::new();
        let first = regs.alloc(NodeId(1), None, 1).unwrap();
        assert_eq!(first.index(), 1);
        assert_eq!(first.to_string(), "r1");
    }

    #[test]
    fn test_freed_register_is_reused() {
        let mut regs = RegisterAllocator::new();
        let a = regs.alloc(NodeId(1), None, 1).unwrap();
        let b = regs.alloc(NodeId(2), Some("total"), 1).unwrap();
        assert_eq!(b.to_string(), "$total");
        assert_eq!(b.physical(), "r2");

        regs.dealloc(a, 1).unwrap();
        let c = regs.alloc(NodeId(3), None, 1).unwrap();
        assert_eq!(c.index(), 1);

        regs.dealloc(b, 1).unwrap();
        regs.dealloc(c, 1).unwrap();
        regs.verify(1).unwrap();

        let stats = regs.stats();
        assert_eq!(stats.allocations, stats.deallocations);
        assert_eq!(stats.peak, 2);
    }

    #[test]
    fn test_exhaustion_is_internal_error() {
        let mut regs = RegisterAllocator::new();
        let mut held = Vec::new();
        for i in 1..MAX_REGISTERS {
            held.push(regs.alloc(NodeId(i as u32), None, 1).unwrap());
        }
        let err = regs.alloc(NodeId(99), None, 4).unwrap_err();
        assert!(err.is_internal());
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn test_leak_is_reported() {
        let mut regs = RegisterAllocator::new();
        let _kept = regs.alloc(NodeId(7), None, 1).unwrap();
        let err = regs.verify(10).unwrap_err();
        assert!(err.is_internal());
        assert!(err.to_string().contains("register not deallocated"));
    }

    #[test]
    fn test_double_free_is_rejected() {
        let mut regs = RegisterAllocator::new();
        let a = regs.alloc(NodeId(1), None, 1).unwrap();
        let forged = Register {
            index: a.index(),
            alias: None,
        };
        regs.dealloc(a, 1).unwrap();
        assert!(regs.dealloc(forged, 2).unwrap_err().is_internal());
    }
}
