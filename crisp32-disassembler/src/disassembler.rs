//! Main disassembler logic

use crate::decoder::decode;
use crate::error::{DisassemblerError, Result};
use crate::formatter::format;
use crisp32_spec::{Program, INSTRUCTION_SIZE};

/// Disassemble a program into an annotated assembly listing.
///
/// Undecodable slots are listed as comments rather than aborting, so a
/// listing of a partially corrupt image still shows everything readable.
pub fn disassemble(program: &Program) -> Result<String> {
    if program.len() % INSTRUCTION_SIZE as usize != 0 {
        let offset = program.len() - program.len() % INSTRUCTION_SIZE as usize;
        return Err(DisassemblerError::TruncatedImage(offset));
    }

    let mut output = String::new();
    output.push_str("; CRISP-32 disassembly\n");
    output.push_str(&format!("; origin: {:#010x}\n", program.origin));
    output.push_str(&format!(
        "; size: {} bytes ({} instructions)\n\n",
        program.len(),
        program.instruction_count()
    ));

    for index in 0..program.instruction_count() {
        let offset = index * INSTRUCTION_SIZE as usize;
        let addr = program.origin.wrapping_add(offset as u32);
        let slot: [u8; 8] = program
            .slot_at(offset)
            .and_then(|s| s.try_into().ok())
            .ok_or(DisassemblerError::TruncatedImage(offset))?;

        output.push_str(&format!("{:#010x}:  ", addr));
        for byte in slot {
            output.push_str(&format!("{:02x} ", byte));
        }
        output.push(' ');

        match decode(&slot) {
            Ok(inst) => output.push_str(&format(&inst)),
            Err(e) => output.push_str(&format!("; undecodable: {}", e)),
        }
        output.push('\n');
    }

    Ok(output)
}
