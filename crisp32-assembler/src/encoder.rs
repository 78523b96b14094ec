//! Instruction encoding
//!
//! Thin emission layer over the field split defined in `crisp32-spec`.

use crisp32_spec::Instruction;

/// Encode one instruction into its 8-byte slot
pub fn encode(inst: &Instruction) -> [u8; 8] {
    inst.encode().to_bytes()
}
