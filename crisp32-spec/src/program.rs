//! Program container
//!
//! A CRISP-32 program is a raw byte image with no header, no relocations
//! and no entry-point record. The machine loads the bytes at the image's
//! origin and starts executing there. The origin is carried alongside the
//! image because absolute jump targets were resolved against it.

use crate::{DEFAULT_LOAD_ADDR, INSTRUCTION_SIZE};
use serde::{Deserialize, Serialize};

/// A raw program image plus the address it was assembled for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Raw image bytes, one 8-byte slot per instruction
    pub image: Vec<u8>,

    /// Load address the image was linked against
    pub origin: u32,
}

impl Program {
    /// Wrap an image assembled for the conventional load address
    pub fn new(image: Vec<u8>) -> Self {
        Self {
            image,
            origin: DEFAULT_LOAD_ADDR,
        }
    }

    /// Wrap an image assembled for a specific load address
    pub fn with_origin(image: Vec<u8>, origin: u32) -> Self {
        Self { image, origin }
    }

    /// Number of whole instruction slots in the image
    pub fn instruction_count(&self) -> usize {
        self.image.len() / INSTRUCTION_SIZE as usize
    }

    /// The 8-byte instruction slot at a byte offset, if fully present
    pub fn slot_at(&self, offset: usize) -> Option<&[u8]> {
        let end = offset.checked_add(INSTRUCTION_SIZE as usize)?;
        self.image.get(offset..end)
    }

    pub fn len(&self) -> usize {
        self.image.len()
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_origin() {
        let program = Program::new(vec![0; 16]);
        assert_eq!(program.origin, DEFAULT_LOAD_ADDR);
        assert_eq!(program.instruction_count(), 2);
    }

    #[test]
    fn test_slot_access() {
        let mut image = vec![0u8; 16];
        image[8] = 0xF0;
        let program = Program::new(image);

        assert_eq!(program.slot_at(8).unwrap()[0], 0xF0);
        assert!(program.slot_at(9).is_some()); // unaligned but in bounds
        assert!(program.slot_at(16).is_none());
    }
}
