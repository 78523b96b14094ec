//! Machine state and the step/run cycle
//!
//! One cycle is: interrupt dispatch check, PC alignment check, fetch
//! through the MMU, decode, execute, re-assert R0. All halting and fault
//! behavior funnels through [`Machine::step`]; `run` is a tight loop over
//! it.

use crate::error::{MemoryError, Result, RuntimeError};
use crate::execute;
use crate::interrupt::{self, InterruptState};
use crate::memory::MemoryWindow;
use crate::mmu::AccessKind;
use crisp32_spec::{
    Instruction, InstructionWord, Register, INSTRUCTION_SIZE, INT_ILLEGAL_OP, INT_MEM_FAULT,
    IVT_ENTRY_SIZE, NUM_REGISTERS,
};

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct MachineConfig {
    /// Steps `run` may execute before returning control to the host.
    /// `None` runs until a halt condition. Hitting the cap leaves
    /// `running` set so the host can call `run` again to continue.
    pub max_steps: Option<u64>,

    /// Emit a per-cycle trace line on stderr
    pub trace: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            max_steps: None,
            trace: false,
        }
    }
}

/// The CRISP-32 machine
///
/// Owns the guest memory window exclusively while it exists; the buffer
/// itself is supplied by and outlives the host call.
pub struct Machine<'m> {
    pub(crate) regs: [u32; NUM_REGISTERS],
    pub(crate) pc: u32,
    pub(crate) mem: MemoryWindow<'m>,
    pub(crate) running: bool,

    pub(crate) kernel_mode: bool,
    pub(crate) paging_enabled: bool,
    pub(crate) page_table_base: u32,
    pub(crate) num_pages: u32,

    pub(crate) interrupts: InterruptState,

    config: MachineConfig,
    steps: u64,
}

impl<'m> Machine<'m> {
    /// Create a machine over a host-supplied guest memory buffer.
    ///
    /// The machine starts halted, in kernel mode, with paging disabled and
    /// interrupts masked.
    pub fn new(memory: &'m mut [u8]) -> Self {
        Self::with_config(memory, MachineConfig::default())
    }

    pub fn with_config(memory: &'m mut [u8], config: MachineConfig) -> Self {
        Self {
            regs: [0; NUM_REGISTERS],
            pc: 0,
            mem: MemoryWindow::new(memory),
            running: false,
            kernel_mode: true,
            paging_enabled: false,
            page_table_base: 0,
            num_pages: 0,
            interrupts: InterruptState::new(),
            config,
            steps: 0,
        }
    }

    /// Clear registers, PC and the privilege and paging flags.
    ///
    /// Guest memory, the page-table registers and the interrupt subsystem
    /// are left untouched.
    pub fn reset(&mut self) {
        self.regs = [0; NUM_REGISTERS];
        self.pc = 0;
        self.running = false;
        self.kernel_mode = true;
        self.paging_enabled = false;
        self.steps = 0;
    }

    /// Copy a raw program image into guest memory at `addr`
    pub fn load_image(&mut self, image: &[u8], addr: u32) -> std::result::Result<(), MemoryError> {
        self.mem.copy_from_slice(addr, image)
    }

    /// Install a handler address in the interrupt vector table.
    ///
    /// Writes the first word of entry `vector`; the reserved upper four
    /// bytes of the entry are left untouched.
    pub fn set_interrupt_handler(
        &mut self,
        vector: u8,
        handler: u32,
    ) -> std::result::Result<(), MemoryError> {
        self.mem.write_u32(vector as u32 * IVT_ENTRY_SIZE, handler)
    }

    /// Mark interrupt `vector` pending
    pub fn raise_interrupt(&mut self, vector: u8) {
        self.interrupts.raise(vector);
    }

    /// Execute one cycle
    pub fn step(&mut self) -> Result<()> {
        self.steps += 1;

        // A dispatched interrupt consumes the whole cycle
        if interrupt::dispatch_pending(self)? {
            return Ok(());
        }

        if self.pc % INSTRUCTION_SIZE != 0 {
            self.interrupts.raise(INT_MEM_FAULT);
            return Err(RuntimeError::MisalignedPc { pc: self.pc });
        }

        let fetch_pc = self.pc;
        let phys_pc = match self.translate(fetch_pc, AccessKind::Fetch) {
            Ok(pa) => pa,
            Err(_) => return Err(RuntimeError::FetchFault { pc: fetch_pc }),
        };

        let slot = match self.mem.read_instruction(phys_pc) {
            Ok(slot) => slot,
            Err(_) => {
                self.running = false;
                return Err(RuntimeError::FetchOutOfBounds { pc: fetch_pc });
            }
        };
        let word = InstructionWord::from_bytes(&slot);

        // PC moves past the instruction before the body runs; branches and
        // jumps override it from the post-increment value.
        self.pc = fetch_pc.wrapping_add(INSTRUCTION_SIZE);

        match Instruction::decode(&word) {
            Ok(inst) => {
                if self.config.trace {
                    eprintln!("[{:6}] pc={:#010x} {:?}", self.steps, fetch_pc, inst);
                }
                execute::execute(self, &inst)?;
            }
            Err(_) => {
                self.interrupts.raise(INT_ILLEGAL_OP);
                self.running = false;
            }
        }

        // R0 is hardwired to zero
        self.regs[0] = 0;

        Ok(())
    }

    /// Run until a halt condition, the step cap, or an engine-fatal error
    pub fn run(&mut self) -> Result<()> {
        self.running = true;
        while self.running {
            if let Some(max) = self.config.max_steps {
                if self.steps >= max {
                    break;
                }
            }
            self.step()?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Host inspection and control
    // ------------------------------------------------------------------

    pub fn regs(&self) -> &[u32; NUM_REGISTERS] {
        &self.regs
    }

    pub fn reg(&self, r: Register) -> u32 {
        self.regs[r.index()]
    }

    /// Host register write. R0 stays hardwired to zero.
    pub fn set_reg(&mut self, r: Register, value: u32) {
        if !r.is_zero() {
            self.regs[r.index()] = value;
        }
    }

    pub fn pc(&self) -> u32 {
        self.pc
    }

    pub fn set_pc(&mut self, pc: u32) {
        self.pc = pc;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Host-side cancellation and restart hook
    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn kernel_mode(&self) -> bool {
        self.kernel_mode
    }

    pub fn paging_enabled(&self) -> bool {
        self.paging_enabled
    }

    pub fn page_table_base(&self) -> u32 {
        self.page_table_base
    }

    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn interrupts(&self) -> &InterruptState {
        &self.interrupts
    }

    pub fn interrupts_mut(&mut self) -> &mut InterruptState {
        &mut self.interrupts
    }

    pub fn memory(&self) -> &MemoryWindow<'m> {
        &self.mem
    }

    pub fn memory_mut(&mut self) -> &mut MemoryWindow<'m> {
        &mut self.mem
    }

    // Register helpers for the executor

    #[inline]
    pub(crate) fn read_reg(&self, r: Register) -> u32 {
        self.regs[r.index()]
    }

    #[inline]
    pub(crate) fn write_reg(&mut self, r: Register, value: u32) {
        self.regs[r.index()] = value;
    }
}
