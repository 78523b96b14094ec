//! Virtual-to-physical address translation
//!
//! Kernel mode always bypasses translation: the kernel and physical
//! address spaces are identical. User-mode translation walks the
//! single-level page table at `page_table_base`. Page-table reads are
//! always physical, so guest stores to page-table memory take effect on
//! the next access; there is no TLB to invalidate.

use crate::machine::Machine;
use crisp32_spec::{PageTableEntry, INT_PAGE_FAULT, PAGE_OFFSET_MASK, PAGE_SHIFT};

/// Kind of memory access being translated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Fetch,
    Load,
    Store,
}

impl AccessKind {
    #[inline]
    fn is_write(self) -> bool {
        matches!(self, AccessKind::Store)
    }

    #[inline]
    fn is_exec(self) -> bool {
        matches!(self, AccessKind::Fetch)
    }
}

/// Marker for a denied translation.
///
/// The page-fault interrupt has already been raised by the time this is
/// returned; callers abort the access and carry no further state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageFault;

impl<'m> Machine<'m> {
    /// Map a virtual address to a physical one under the current privilege
    /// and paging settings.
    pub(crate) fn translate(
        &mut self,
        vaddr: u32,
        kind: AccessKind,
    ) -> Result<u32, PageFault> {
        // Kernel mode bypasses paging entirely
        if self.kernel_mode {
            return Ok(vaddr);
        }
        if !self.paging_enabled {
            return Ok(vaddr);
        }

        let vpn = vaddr >> PAGE_SHIFT;
        let offset = vaddr & PAGE_OFFSET_MASK;

        if vpn >= self.num_pages {
            self.interrupts.raise(INT_PAGE_FAULT);
            return Err(PageFault);
        }

        let pte_addr = self.page_table_base.wrapping_add(vpn.wrapping_mul(4));
        let pte = match self.mem.read_u32(pte_addr) {
            Ok(word) => PageTableEntry(word),
            Err(_) => {
                self.interrupts.raise(INT_PAGE_FAULT);
                return Err(PageFault);
            }
        };

        if !pte.valid() {
            self.interrupts.raise(INT_PAGE_FAULT);
            return Err(PageFault);
        }
        // User mode requires the U bit; kernel-only pages fault here
        if !pte.user() {
            self.interrupts.raise(INT_PAGE_FAULT);
            return Err(PageFault);
        }
        if kind.is_write() && !pte.writable() {
            self.interrupts.raise(INT_PAGE_FAULT);
            return Err(PageFault);
        }
        if kind.is_exec() && !pte.executable() {
            self.interrupts.raise(INT_PAGE_FAULT);
            return Err(PageFault);
        }

        Ok(pte.ppn() | offset)
    }
}
