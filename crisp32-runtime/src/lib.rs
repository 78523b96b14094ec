//! CRISP-32 Runtime
//!
//! Execute CRISP-32 program images: the fetch/decode/execute pipeline, MMU
//! translation, interrupt dispatch and the privilege boundary.

pub mod machine;
pub mod memory;
pub mod mmu;
pub mod interrupt;
pub mod execute;
pub mod error;

pub use machine::{Machine, MachineConfig};
pub use memory::MemoryWindow;
pub use mmu::AccessKind;
pub use interrupt::InterruptState;
pub use error::{MemoryError, Result, RuntimeError};

use crisp32_spec::NUM_REGISTERS;

/// Simple execution: run an image to completion in a fresh memory buffer
/// and return the final register file.
pub fn run_image(
    image: &[u8],
    load_addr: u32,
    memory_size: usize,
) -> Result<[u32; NUM_REGISTERS]> {
    let mut memory = vec![0u8; memory_size];
    let mut machine = Machine::new(&mut memory);
    machine.load_image(image, load_addr)?;
    machine.set_pc(load_addr);
    machine.run()?;
    Ok(*machine.regs())
}
