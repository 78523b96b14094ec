//! Paging behavior end to end: a kernel sets up a page table, drops to
//! user mode and the MMU governs every subsequent access.

use crisp32_assembler::assemble;
use crisp32_runtime::{Machine, MachineConfig, RuntimeError};
use crisp32_spec::pte::{PTE_EXECUTABLE, PTE_USER, PTE_VALID, PTE_WRITABLE};
use crisp32_spec::{PageTableEntry, Register, INT_PAGE_FAULT};

const MEM_SIZE: usize = 64 * 1024;
const PT_BASE: u32 = 0x3000;

fn machine(memory: &mut [u8]) -> Machine<'_> {
    Machine::with_config(
        memory,
        MachineConfig {
            max_steps: Some(10_000),
            trace: false,
        },
    )
}

/// Identity-map pages 0..count with the given flags, then override
/// individual entries as needed.
fn identity_map(m: &mut Machine<'_>, count: u32, flags: u32) {
    for vpn in 0..count {
        let pte = PageTableEntry::new(vpn << 12, flags);
        m.memory_mut().write_u32(PT_BASE + vpn * 4, pte.0).unwrap();
    }
}

fn run_user_program<'m>(memory: &'m mut [u8], user_tail: &str) -> Machine<'m> {
    // Kernel prologue: install the table, enable paging, drop privilege.
    let source = format!(
        "addi t0, zero, 0x3000\n\
         addi t1, zero, 8\n\
         set_ptbr t0, t1\n\
         enable_paging\n\
         enter_user\n\
         {user_tail}"
    );
    let program = assemble(&source).expect("program must assemble");
    let mut m = machine(memory);
    m.load_image(&program.image, program.origin).unwrap();
    m.set_pc(program.origin);
    m
}

#[test]
fn test_user_store_load_through_identity_map() {
    let mut memory = vec![0u8; MEM_SIZE];
    let mut m = run_user_program(
        &mut memory,
        "addi at, zero, 0x77\n\
         sw at, zero, 0x2000\n\
         lw v0, zero, 0x2000\n\
         syscall\n",
    );
    identity_map(&mut m, 8, PTE_VALID | PTE_USER | PTE_WRITABLE | PTE_EXECUTABLE);

    m.run().unwrap();
    assert!(!m.is_running());

    assert_eq!(m.reg(Register::R2), 0x77);
    assert_eq!(m.memory().read_u32(0x2000).unwrap(), 0x77);
    assert!(!m.interrupts().is_pending(INT_PAGE_FAULT));
}

#[test]
fn test_user_store_to_readonly_page_faults() {
    let mut memory = vec![0u8; MEM_SIZE];
    let mut m = run_user_program(
        &mut memory,
        "addi at, zero, 0x77\n\
         sw at, zero, 0x2000\n\
         lw v0, zero, 0x2000\n\
         syscall\n",
    );
    identity_map(&mut m, 8, PTE_VALID | PTE_USER | PTE_WRITABLE | PTE_EXECUTABLE);
    // Page 2 loses its W bit
    let readonly = PageTableEntry::new(2 << 12, PTE_VALID | PTE_USER | PTE_EXECUTABLE);
    m.memory_mut().write_u32(PT_BASE + 2 * 4, readonly.0).unwrap();

    m.run().unwrap();

    // The store faulted and was dropped; the load still works
    assert!(m.interrupts().is_pending(INT_PAGE_FAULT));
    assert_eq!(m.memory().read_u32(0x2000).unwrap(), 0);
    assert_eq!(m.reg(Register::R2), 0);
}

#[test]
fn test_load_from_invalid_page_aborts_without_register_effect() {
    let mut memory = vec![0u8; MEM_SIZE];
    let mut m = run_user_program(
        &mut memory,
        "addi v0, zero, 0x55\n\
         addi t3, zero, 0x5000\n\
         lw v0, t3, 0\n\
         syscall\n",
    );
    identity_map(&mut m, 8, PTE_VALID | PTE_USER | PTE_WRITABLE | PTE_EXECUTABLE);
    // Page 5 is not mapped
    m.memory_mut().write_u32(PT_BASE + 5 * 4, 0).unwrap();

    m.run().unwrap();

    assert!(m.interrupts().is_pending(INT_PAGE_FAULT));
    assert_eq!(m.reg(Register::R2), 0x55);
}

#[test]
fn test_fetch_beyond_page_count_ends_run() {
    let mut memory = vec![0u8; MEM_SIZE];

    let source = "addi t0, zero, 0x3000\n\
                  addi t1, zero, 2\n\
                  set_ptbr t0, t1\n\
                  enable_paging\n\
                  enter_user\n\
                  addi t2, zero, 0x5000\n\
                  jr t2\n";
    let program = assemble(source).unwrap();
    let mut m = machine(&mut memory);
    m.load_image(&program.image, program.origin).unwrap();
    m.set_pc(program.origin);
    identity_map(&mut m, 2, PTE_VALID | PTE_USER | PTE_WRITABLE | PTE_EXECUTABLE);

    let err = m.run().unwrap_err();
    assert!(matches!(err, RuntimeError::FetchFault { pc: 0x5000 }));
    assert!(m.interrupts().is_pending(INT_PAGE_FAULT));
}

#[test]
fn test_fetch_from_non_executable_page_ends_run() {
    let mut memory = vec![0u8; MEM_SIZE];

    let source = "addi t0, zero, 0x3000\n\
                  addi t1, zero, 8\n\
                  set_ptbr t0, t1\n\
                  enable_paging\n\
                  enter_user\n\
                  addi t2, zero, 0x2000\n\
                  jr t2\n";
    let program = assemble(source).unwrap();
    let mut m = machine(&mut memory);
    m.load_image(&program.image, program.origin).unwrap();
    m.set_pc(program.origin);
    identity_map(&mut m, 8, PTE_VALID | PTE_USER | PTE_WRITABLE | PTE_EXECUTABLE);
    // Page 2: data only
    let no_exec = PageTableEntry::new(2 << 12, PTE_VALID | PTE_USER | PTE_WRITABLE);
    m.memory_mut().write_u32(PT_BASE + 2 * 4, no_exec.0).unwrap();

    let err = m.run().unwrap_err();
    assert!(matches!(err, RuntimeError::FetchFault { pc: 0x2000 }));
    assert!(m.interrupts().is_pending(INT_PAGE_FAULT));
}

#[test]
fn test_kernel_mode_bypasses_page_table() {
    // Paging is on but the kernel never set up usable PTEs; kernel-mode
    // accesses go straight through.
    let mut memory = vec![0u8; MEM_SIZE];
    let source = "addi t0, zero, 0x3000\n\
                  addi t1, zero, 1\n\
                  set_ptbr t0, t1\n\
                  enable_paging\n\
                  addi at, zero, 5\n\
                  sw at, zero, 0x2000\n\
                  syscall\n";
    let program = assemble(source).unwrap();
    let mut m = machine(&mut memory);
    m.load_image(&program.image, program.origin).unwrap();
    m.set_pc(program.origin);

    m.run().unwrap();

    assert_eq!(m.memory().read_u32(0x2000).unwrap(), 5);
    assert!(!m.interrupts().is_pending(INT_PAGE_FAULT));
}

#[test]
fn test_translation_remaps_to_other_frame() {
    // Map virtual page 2 to physical frame 9: the user sees its writes at
    // the translated location only.
    let mut memory = vec![0u8; MEM_SIZE];
    let mut m = run_user_program(
        &mut memory,
        "addi at, zero, 0x42\n\
         sw at, zero, 0x2010\n\
         syscall\n",
    );
    identity_map(&mut m, 8, PTE_VALID | PTE_USER | PTE_WRITABLE | PTE_EXECUTABLE);
    let remapped = PageTableEntry::new(9 << 12, PTE_VALID | PTE_USER | PTE_WRITABLE);
    m.memory_mut().write_u32(PT_BASE + 2 * 4, remapped.0).unwrap();

    m.run().unwrap();

    assert_eq!(m.memory().read_u32(0x9010).unwrap(), 0x42);
    assert_eq!(m.memory().read_u32(0x2010).unwrap(), 0);
}
