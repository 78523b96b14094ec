//! Instruction decoding for disassembly
//!
//! The inverse of the assembler's encoder: an 8-byte slot back into a
//! typed [`Instruction`] via the field split in `crisp32-spec`.

use crate::error::Result;
use crisp32_spec::{Instruction, InstructionWord};

/// Decode one 8-byte instruction slot
pub fn decode(bytes: &[u8; 8]) -> Result<Instruction> {
    let word = InstructionWord::from_bytes(bytes);
    Ok(Instruction::decode(&word)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crisp32_spec::{IsaError, Register};
    use crate::error::DisassemblerError;

    #[test]
    fn test_decode_lw() {
        let bytes = [0x50, 0x00, 0x02, 0x00, 0x00, 0x20, 0x00, 0x00];
        assert_eq!(
            decode(&bytes).unwrap(),
            Instruction::Lw {
                rt: Register::R2,
                rs: Register::R0,
                imm: 0x2000,
            }
        );
    }

    #[test]
    fn test_decode_unknown_opcode() {
        let bytes = [0x5B, 0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(
            decode(&bytes),
            Err(DisassemblerError::Isa(IsaError::InvalidOpcode(0x5B)))
        ));
    }
}
