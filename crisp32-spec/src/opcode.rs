//! # CRISP-32 Opcode Definitions
//!
//! Opcodes occupy the first byte of the 8-byte instruction word and are
//! organized by instruction family:
//! - 0x00-0x06: Arithmetic (NOP, ADD, ADDU, SUB, SUBU, ADDI, ADDIU)
//! - 0x10-0x17: Logical (AND, OR, XOR, NOR, ANDI, ORI, XORI, LUI)
//! - 0x20-0x25: Shift (SLL, SRL, SRA, SLLV, SRLV, SRAV)
//! - 0x30-0x33: Compare (SLT, SLTU, SLTI, SLTIU)
//! - 0x40-0x46: Multiply/Divide (MUL, MULH, MULHU, DIV, DIVU, REM, REMU)
//! - 0x50-0x5A: Load/Store (LW, LH, LHU, LB, LBU, SW, SH, SB)
//! - 0x60-0x65: Branch (BEQ, BNE, BLEZ, BGTZ, BLTZ, BGEZ)
//! - 0x70-0x73: Jump (J, JAL, JR, JALR)
//! - 0xF0-0xFC: System, interrupt control, privilege and MMU control

use serde::{Deserialize, Serialize};

/// Instruction opcode (one byte)
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// NOP: no operation
    Nop = 0x00,

    // ========== Arithmetic ==========
    /// ADD: rd = rs + rt
    Add = 0x01,
    /// ADDU: rd = rs + rt (identical to ADD under wrapping arithmetic)
    Addu = 0x02,
    /// SUB: rd = rs - rt
    Sub = 0x03,
    /// SUBU: rd = rs - rt
    Subu = 0x04,
    /// ADDI: rt = rs + imm
    Addi = 0x05,
    /// ADDIU: rt = rs + imm
    Addiu = 0x06,

    // ========== Logical ==========
    /// AND: rd = rs & rt
    And = 0x10,
    /// OR: rd = rs | rt
    Or = 0x11,
    /// XOR: rd = rs ^ rt
    Xor = 0x12,
    /// NOR: rd = ~(rs | rt)
    Nor = 0x13,
    /// ANDI: rt = rs & imm
    Andi = 0x14,
    /// ORI: rt = rs | imm
    Ori = 0x15,
    /// XORI: rt = rs ^ imm
    Xori = 0x16,
    /// LUI: rt = imm << 16
    Lui = 0x17,

    // ========== Shift (immediate amount) ==========
    /// SLL: rd = rt << (imm & 0x1F)
    Sll = 0x20,
    /// SRL: rd = rt >> (imm & 0x1F) (logical)
    Srl = 0x21,
    /// SRA: rd = rt >> (imm & 0x1F) (arithmetic)
    Sra = 0x22,

    // ========== Shift (register amount) ==========
    /// SLLV: rd = rt << (rs & 0x1F)
    Sllv = 0x23,
    /// SRLV: rd = rt >> (rs & 0x1F) (logical)
    Srlv = 0x24,
    /// SRAV: rd = rt >> (rs & 0x1F) (arithmetic)
    Srav = 0x25,

    // ========== Compare ==========
    /// SLT: rd = (rs < rt) ? 1 : 0 (signed)
    Slt = 0x30,
    /// SLTU: rd = (rs < rt) ? 1 : 0 (unsigned)
    Sltu = 0x31,
    /// SLTI: rt = (rs < imm) ? 1 : 0 (signed)
    Slti = 0x32,
    /// SLTIU: rt = (rs < imm) ? 1 : 0 (unsigned)
    Sltiu = 0x33,

    // ========== Multiply / Divide ==========
    /// MUL: rd = low 32 bits of rs * rt
    Mul = 0x40,
    /// MULH: rd = high 32 bits of the signed 64-bit product
    Mulh = 0x41,
    /// MULHU: rd = high 32 bits of the unsigned 64-bit product
    Mulhu = 0x42,
    /// DIV: rd = rs / rt (signed; divisor 0 yields 0)
    Div = 0x43,
    /// DIVU: rd = rs / rt (unsigned; divisor 0 yields 0)
    Divu = 0x44,
    /// REM: rd = rs % rt (signed; divisor 0 yields 0)
    Rem = 0x45,
    /// REMU: rd = rs % rt (unsigned; divisor 0 yields 0)
    Remu = 0x46,

    // ========== Load ==========
    /// LW: rt = mem[rs + imm] (4 bytes)
    Lw = 0x50,
    /// LH: rt = sign_extend(mem[rs + imm]) (2 bytes)
    Lh = 0x51,
    /// LHU: rt = zero_extend(mem[rs + imm]) (2 bytes)
    Lhu = 0x52,
    /// LB: rt = sign_extend(mem[rs + imm]) (1 byte)
    Lb = 0x53,
    /// LBU: rt = zero_extend(mem[rs + imm]) (1 byte)
    Lbu = 0x54,

    // ========== Store ==========
    /// SW: mem[rs + imm] = rt (4 bytes)
    Sw = 0x58,
    /// SH: mem[rs + imm] = rt[15:0]
    Sh = 0x59,
    /// SB: mem[rs + imm] = rt[7:0]
    Sb = 0x5A,

    // ========== Branch ==========
    /// BEQ: if (rs == rt) PC += imm
    Beq = 0x60,
    /// BNE: if (rs != rt) PC += imm
    Bne = 0x61,
    /// BLEZ: if (rs <= 0) PC += imm (signed)
    Blez = 0x62,
    /// BGTZ: if (rs > 0) PC += imm (signed)
    Bgtz = 0x63,
    /// BLTZ: if (rs < 0) PC += imm (signed)
    Bltz = 0x64,
    /// BGEZ: if (rs >= 0) PC += imm (signed)
    Bgez = 0x65,

    // ========== Jump ==========
    /// J: PC = imm
    J = 0x70,
    /// JAL: ra = PC; PC = imm
    Jal = 0x71,
    /// JR: PC = rs
    Jr = 0x72,
    /// JALR: rd = PC; PC = rs
    Jalr = 0x73,

    // ========== System ==========
    /// SYSCALL: raise interrupt 4 and halt
    Syscall = 0xF0,
    /// BREAK: raise interrupt 5 and halt
    Break = 0xF1,

    // ========== Interrupt Control ==========
    /// EI: enable interrupts (privileged)
    Ei = 0xF2,
    /// DI: disable interrupts (privileged)
    Di = 0xF3,
    /// IRET: return from interrupt handler (privileged)
    Iret = 0xF4,
    /// RAISE: raise interrupt imm & 0xFF
    Raise = 0xF5,
    /// GETPC: rd = PC saved at last interrupt dispatch
    Getpc = 0xF6,

    // ========== Privilege and MMU Control ==========
    /// ENABLE_PAGING (privileged)
    EnablePaging = 0xF7,
    /// DISABLE_PAGING (privileged)
    DisablePaging = 0xF8,
    /// SET_PTBR: page table base = rd, page count = rt (privileged)
    SetPtbr = 0xF9,
    /// ENTER_USER: drop to user mode (privileged)
    EnterUser = 0xFB,
    /// GETMODE: rd = 1 in kernel mode, 0 in user mode
    Getmode = 0xFC,
}

impl Opcode {
    /// Look up an opcode by its encoded byte
    pub fn from_u8(byte: u8) -> Option<Self> {
        Some(match byte {
            0x00 => Self::Nop,
            0x01 => Self::Add,
            0x02 => Self::Addu,
            0x03 => Self::Sub,
            0x04 => Self::Subu,
            0x05 => Self::Addi,
            0x06 => Self::Addiu,
            0x10 => Self::And,
            0x11 => Self::Or,
            0x12 => Self::Xor,
            0x13 => Self::Nor,
            0x14 => Self::Andi,
            0x15 => Self::Ori,
            0x16 => Self::Xori,
            0x17 => Self::Lui,
            0x20 => Self::Sll,
            0x21 => Self::Srl,
            0x22 => Self::Sra,
            0x23 => Self::Sllv,
            0x24 => Self::Srlv,
            0x25 => Self::Srav,
            0x30 => Self::Slt,
            0x31 => Self::Sltu,
            0x32 => Self::Slti,
            0x33 => Self::Sltiu,
            0x40 => Self::Mul,
            0x41 => Self::Mulh,
            0x42 => Self::Mulhu,
            0x43 => Self::Div,
            0x44 => Self::Divu,
            0x45 => Self::Rem,
            0x46 => Self::Remu,
            0x50 => Self::Lw,
            0x51 => Self::Lh,
            0x52 => Self::Lhu,
            0x53 => Self::Lb,
            0x54 => Self::Lbu,
            0x58 => Self::Sw,
            0x59 => Self::Sh,
            0x5A => Self::Sb,
            0x60 => Self::Beq,
            0x61 => Self::Bne,
            0x62 => Self::Blez,
            0x63 => Self::Bgtz,
            0x64 => Self::Bltz,
            0x65 => Self::Bgez,
            0x70 => Self::J,
            0x71 => Self::Jal,
            0x72 => Self::Jr,
            0x73 => Self::Jalr,
            0xF0 => Self::Syscall,
            0xF1 => Self::Break,
            0xF2 => Self::Ei,
            0xF3 => Self::Di,
            0xF4 => Self::Iret,
            0xF5 => Self::Raise,
            0xF6 => Self::Getpc,
            0xF7 => Self::EnablePaging,
            0xF8 => Self::DisablePaging,
            0xF9 => Self::SetPtbr,
            0xFB => Self::EnterUser,
            0xFC => Self::Getmode,
            _ => return None,
        })
    }

    /// Encoded byte value of this opcode
    #[inline]
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_u8_roundtrip() {
        for byte in 0..=255u8 {
            if let Some(op) = Opcode::from_u8(byte) {
                assert_eq!(op.to_u8(), byte);
            }
        }
    }

    #[test]
    fn test_known_values() {
        assert_eq!(Opcode::from_u8(0x00), Some(Opcode::Nop));
        assert_eq!(Opcode::from_u8(0x05), Some(Opcode::Addi));
        assert_eq!(Opcode::from_u8(0xF0), Some(Opcode::Syscall));
        assert_eq!(Opcode::from_u8(0xFC), Some(Opcode::Getmode));
    }

    #[test]
    fn test_unknown_values() {
        assert_eq!(Opcode::from_u8(0x07), None);
        assert_eq!(Opcode::from_u8(0x5B), None);
        // 0xFA is a gap in the privilege group
        assert_eq!(Opcode::from_u8(0xFA), None);
        assert_eq!(Opcode::from_u8(0xFF), None);
    }
}
