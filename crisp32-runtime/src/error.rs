//! Runtime error types
//!
//! Two disjoint failure taxonomies exist in the engine. Guest-visible
//! faults (illegal opcode, memory fault, page fault, privilege violation)
//! are raised as interrupts and never surface as `Err` values. The types
//! here cover the engine-fatal conditions that make `run` return to the
//! host; the machine remains fully inspectable after any of them.

use thiserror::Error;

/// Memory window access failure
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    #[error("memory access out of bounds: address {addr:#010x}, width {width}, size {size:#x}")]
    OutOfBounds { addr: u32, width: u32, size: u32 },
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// PC was not 8-byte aligned at the start of a cycle. MEM_FAULT has
    /// been raised; the run ends without dispatching it.
    #[error("misaligned program counter: {pc:#010x}")]
    MisalignedPc { pc: u32 },

    /// Instruction fetch was denied by the MMU. PAGE_FAULT has been
    /// raised; the run ends without dispatching it.
    #[error("page fault during instruction fetch at {pc:#010x}")]
    FetchFault { pc: u32 },

    /// The translated PC fell outside the memory buffer.
    #[error("instruction fetch out of bounds at {pc:#010x}")]
    FetchOutOfBounds { pc: u32 },

    /// Interrupt dispatch could not read the vector table entry.
    #[error("interrupt vector {vector} has no readable table entry")]
    VectorUnreadable { vector: u8 },

    /// The register snapshot during dispatch would exceed memory bounds.
    #[error("interrupt register snapshot out of bounds at {addr:#010x}")]
    RegisterSnapshotOutOfBounds { addr: u32 },

    #[error(transparent)]
    Memory(#[from] MemoryError),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_error_display() {
        let err = MemoryError::OutOfBounds {
            addr: 0xDEAD_BEEF,
            width: 4,
            size: 0x10000,
        };
        assert_eq!(
            err.to_string(),
            "memory access out of bounds: address 0xdeadbeef, width 4, size 0x10000"
        );
    }

    #[test]
    fn test_runtime_error_display() {
        let err = RuntimeError::MisalignedPc { pc: 0x1004 };
        assert_eq!(err.to_string(), "misaligned program counter: 0x00001004");

        let err = RuntimeError::VectorUnreadable { vector: 30 };
        assert_eq!(
            err.to_string(),
            "interrupt vector 30 has no readable table entry"
        );
    }

    #[test]
    fn test_memory_error_converts() {
        let mem = MemoryError::OutOfBounds {
            addr: 0,
            width: 1,
            size: 0,
        };
        let err: RuntimeError = mem.into();
        assert!(matches!(err, RuntimeError::Memory(_)));
    }
}
