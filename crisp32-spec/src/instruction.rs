//! CRISP-32 Instruction set
//!
//! [`Instruction`] is the decoded form of one 8-byte word: a sum type over
//! the instruction families, so the executor can match exhaustively. Fields
//! keep the architectural names of the encoding (`rs`, `rt`, `rd`); the
//! immediate is carried as its raw 32-bit pattern and interpreted signed or
//! unsigned by the operation itself.

use crate::encoding::InstructionWord;
use crate::error::IsaError;
use crate::opcode::Opcode;
use crate::register::Register;
use serde::{Deserialize, Serialize};

/// CRISP-32 Instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    Nop,

    // Arithmetic (register-register)
    Add { rd: Register, rs: Register, rt: Register },
    Addu { rd: Register, rs: Register, rt: Register },
    Sub { rd: Register, rs: Register, rt: Register },
    Subu { rd: Register, rs: Register, rt: Register },

    // Arithmetic (register-immediate)
    Addi { rt: Register, rs: Register, imm: u32 },
    Addiu { rt: Register, rs: Register, imm: u32 },

    // Logical (register-register)
    And { rd: Register, rs: Register, rt: Register },
    Or { rd: Register, rs: Register, rt: Register },
    Xor { rd: Register, rs: Register, rt: Register },
    Nor { rd: Register, rs: Register, rt: Register },

    // Logical (register-immediate)
    Andi { rt: Register, rs: Register, imm: u32 },
    Ori { rt: Register, rs: Register, imm: u32 },
    Xori { rt: Register, rs: Register, imm: u32 },
    Lui { rt: Register, imm: u32 },

    // Shift (immediate amount; count is imm & 0x1F)
    Sll { rd: Register, rt: Register, imm: u32 },
    Srl { rd: Register, rt: Register, imm: u32 },
    Sra { rd: Register, rt: Register, imm: u32 },

    // Shift (register amount; count is rs & 0x1F)
    Sllv { rd: Register, rt: Register, rs: Register },
    Srlv { rd: Register, rt: Register, rs: Register },
    Srav { rd: Register, rt: Register, rs: Register },

    // Compare
    Slt { rd: Register, rs: Register, rt: Register },
    Sltu { rd: Register, rs: Register, rt: Register },
    Slti { rt: Register, rs: Register, imm: u32 },
    Sltiu { rt: Register, rs: Register, imm: u32 },

    // Multiply / divide
    Mul { rd: Register, rs: Register, rt: Register },
    Mulh { rd: Register, rs: Register, rt: Register },
    Mulhu { rd: Register, rs: Register, rt: Register },
    Div { rd: Register, rs: Register, rt: Register },
    Divu { rd: Register, rs: Register, rt: Register },
    Rem { rd: Register, rs: Register, rt: Register },
    Remu { rd: Register, rs: Register, rt: Register },

    // Loads (effective address rs + imm)
    Lw { rt: Register, rs: Register, imm: u32 },
    Lh { rt: Register, rs: Register, imm: u32 },
    Lhu { rt: Register, rs: Register, imm: u32 },
    Lb { rt: Register, rs: Register, imm: u32 },
    Lbu { rt: Register, rs: Register, imm: u32 },

    // Stores (effective address rs + imm)
    Sw { rt: Register, rs: Register, imm: u32 },
    Sh { rt: Register, rs: Register, imm: u32 },
    Sb { rt: Register, rs: Register, imm: u32 },

    // Branches (offset from the post-increment PC)
    Beq { rs: Register, rt: Register, imm: u32 },
    Bne { rs: Register, rt: Register, imm: u32 },
    Blez { rs: Register, imm: u32 },
    Bgtz { rs: Register, imm: u32 },
    Bltz { rs: Register, imm: u32 },
    Bgez { rs: Register, imm: u32 },

    // Jumps
    J { imm: u32 },
    Jal { imm: u32 },
    Jr { rs: Register },
    Jalr { rd: Register, rs: Register },

    // System
    Syscall,
    Break,

    // Interrupt control
    Ei,
    Di,
    Iret,
    Raise { imm: u32 },
    Getpc { rd: Register },

    // Privilege and MMU control
    EnablePaging,
    DisablePaging,
    SetPtbr { rd: Register, rt: Register },
    EnterUser,
    Getmode { rd: Register },
}

/// Convert a register byte into a typed register.
///
/// The encoding reserves a full byte per register field; values 32..255 do
/// not name a register and make the instruction undecodable.
fn reg(byte: u8) -> Result<Register, IsaError> {
    Register::from_index(byte as usize).ok_or(IsaError::InvalidRegister(byte))
}

impl Instruction {
    /// Decode the raw field split into a typed instruction.
    ///
    /// Fails on an unknown opcode byte or on an out-of-range register byte
    /// in a field the instruction actually uses; bytes in unused fields are
    /// ignored, matching the hardware which never reads them.
    pub fn decode(word: &InstructionWord) -> Result<Self, IsaError> {
        let opcode =
            Opcode::from_u8(word.opcode).ok_or(IsaError::InvalidOpcode(word.opcode))?;

        Ok(match opcode {
            Opcode::Nop => Self::Nop,

            Opcode::Add => Self::Add { rd: reg(word.rd)?, rs: reg(word.rs)?, rt: reg(word.rt)? },
            Opcode::Addu => Self::Addu { rd: reg(word.rd)?, rs: reg(word.rs)?, rt: reg(word.rt)? },
            Opcode::Sub => Self::Sub { rd: reg(word.rd)?, rs: reg(word.rs)?, rt: reg(word.rt)? },
            Opcode::Subu => Self::Subu { rd: reg(word.rd)?, rs: reg(word.rs)?, rt: reg(word.rt)? },

            Opcode::Addi => Self::Addi { rt: reg(word.rt)?, rs: reg(word.rs)?, imm: word.imm },
            Opcode::Addiu => Self::Addiu { rt: reg(word.rt)?, rs: reg(word.rs)?, imm: word.imm },

            Opcode::And => Self::And { rd: reg(word.rd)?, rs: reg(word.rs)?, rt: reg(word.rt)? },
            Opcode::Or => Self::Or { rd: reg(word.rd)?, rs: reg(word.rs)?, rt: reg(word.rt)? },
            Opcode::Xor => Self::Xor { rd: reg(word.rd)?, rs: reg(word.rs)?, rt: reg(word.rt)? },
            Opcode::Nor => Self::Nor { rd: reg(word.rd)?, rs: reg(word.rs)?, rt: reg(word.rt)? },

            Opcode::Andi => Self::Andi { rt: reg(word.rt)?, rs: reg(word.rs)?, imm: word.imm },
            Opcode::Ori => Self::Ori { rt: reg(word.rt)?, rs: reg(word.rs)?, imm: word.imm },
            Opcode::Xori => Self::Xori { rt: reg(word.rt)?, rs: reg(word.rs)?, imm: word.imm },
            Opcode::Lui => Self::Lui { rt: reg(word.rt)?, imm: word.imm },

            Opcode::Sll => Self::Sll { rd: reg(word.rd)?, rt: reg(word.rt)?, imm: word.imm },
            Opcode::Srl => Self::Srl { rd: reg(word.rd)?, rt: reg(word.rt)?, imm: word.imm },
            Opcode::Sra => Self::Sra { rd: reg(word.rd)?, rt: reg(word.rt)?, imm: word.imm },

            Opcode::Sllv => Self::Sllv { rd: reg(word.rd)?, rt: reg(word.rt)?, rs: reg(word.rs)? },
            Opcode::Srlv => Self::Srlv { rd: reg(word.rd)?, rt: reg(word.rt)?, rs: reg(word.rs)? },
            Opcode::Srav => Self::Srav { rd: reg(word.rd)?, rt: reg(word.rt)?, rs: reg(word.rs)? },

            Opcode::Slt => Self::Slt { rd: reg(word.rd)?, rs: reg(word.rs)?, rt: reg(word.rt)? },
            Opcode::Sltu => Self::Sltu { rd: reg(word.rd)?, rs: reg(word.rs)?, rt: reg(word.rt)? },
            Opcode::Slti => Self::Slti { rt: reg(word.rt)?, rs: reg(word.rs)?, imm: word.imm },
            Opcode::Sltiu => Self::Sltiu { rt: reg(word.rt)?, rs: reg(word.rs)?, imm: word.imm },

            Opcode::Mul => Self::Mul { rd: reg(word.rd)?, rs: reg(word.rs)?, rt: reg(word.rt)? },
            Opcode::Mulh => Self::Mulh { rd: reg(word.rd)?, rs: reg(word.rs)?, rt: reg(word.rt)? },
            Opcode::Mulhu => Self::Mulhu { rd: reg(word.rd)?, rs: reg(word.rs)?, rt: reg(word.rt)? },
            Opcode::Div => Self::Div { rd: reg(word.rd)?, rs: reg(word.rs)?, rt: reg(word.rt)? },
            Opcode::Divu => Self::Divu { rd: reg(word.rd)?, rs: reg(word.rs)?, rt: reg(word.rt)? },
            Opcode::Rem => Self::Rem { rd: reg(word.rd)?, rs: reg(word.rs)?, rt: reg(word.rt)? },
            Opcode::Remu => Self::Remu { rd: reg(word.rd)?, rs: reg(word.rs)?, rt: reg(word.rt)? },

            Opcode::Lw => Self::Lw { rt: reg(word.rt)?, rs: reg(word.rs)?, imm: word.imm },
            Opcode::Lh => Self::Lh { rt: reg(word.rt)?, rs: reg(word.rs)?, imm: word.imm },
            Opcode::Lhu => Self::Lhu { rt: reg(word.rt)?, rs: reg(word.rs)?, imm: word.imm },
            Opcode::Lb => Self::Lb { rt: reg(word.rt)?, rs: reg(word.rs)?, imm: word.imm },
            Opcode::Lbu => Self::Lbu { rt: reg(word.rt)?, rs: reg(word.rs)?, imm: word.imm },

            Opcode::Sw => Self::Sw { rt: reg(word.rt)?, rs: reg(word.rs)?, imm: word.imm },
            Opcode::Sh => Self::Sh { rt: reg(word.rt)?, rs: reg(word.rs)?, imm: word.imm },
            Opcode::Sb => Self::Sb { rt: reg(word.rt)?, rs: reg(word.rs)?, imm: word.imm },

            Opcode::Beq => Self::Beq { rs: reg(word.rs)?, rt: reg(word.rt)?, imm: word.imm },
            Opcode::Bne => Self::Bne { rs: reg(word.rs)?, rt: reg(word.rt)?, imm: word.imm },
            Opcode::Blez => Self::Blez { rs: reg(word.rs)?, imm: word.imm },
            Opcode::Bgtz => Self::Bgtz { rs: reg(word.rs)?, imm: word.imm },
            Opcode::Bltz => Self::Bltz { rs: reg(word.rs)?, imm: word.imm },
            Opcode::Bgez => Self::Bgez { rs: reg(word.rs)?, imm: word.imm },

            Opcode::J => Self::J { imm: word.imm },
            Opcode::Jal => Self::Jal { imm: word.imm },
            Opcode::Jr => Self::Jr { rs: reg(word.rs)? },
            Opcode::Jalr => Self::Jalr { rd: reg(word.rd)?, rs: reg(word.rs)? },

            Opcode::Syscall => Self::Syscall,
            Opcode::Break => Self::Break,

            Opcode::Ei => Self::Ei,
            Opcode::Di => Self::Di,
            Opcode::Iret => Self::Iret,
            Opcode::Raise => Self::Raise { imm: word.imm },
            Opcode::Getpc => Self::Getpc { rd: reg(word.rd)? },

            Opcode::EnablePaging => Self::EnablePaging,
            Opcode::DisablePaging => Self::DisablePaging,
            Opcode::SetPtbr => Self::SetPtbr { rd: reg(word.rd)?, rt: reg(word.rt)? },
            Opcode::EnterUser => Self::EnterUser,
            Opcode::Getmode => Self::Getmode { rd: reg(word.rd)? },
        })
    }

    /// Encode this instruction as its raw field split, unused fields zeroed
    pub fn encode(&self) -> InstructionWord {
        let mut word = InstructionWord::default();
        word.opcode = self.opcode().to_u8();

        match *self {
            Self::Nop
            | Self::Syscall
            | Self::Break
            | Self::Ei
            | Self::Di
            | Self::Iret
            | Self::EnablePaging
            | Self::DisablePaging
            | Self::EnterUser => {}

            Self::Add { rd, rs, rt }
            | Self::Addu { rd, rs, rt }
            | Self::Sub { rd, rs, rt }
            | Self::Subu { rd, rs, rt }
            | Self::And { rd, rs, rt }
            | Self::Or { rd, rs, rt }
            | Self::Xor { rd, rs, rt }
            | Self::Nor { rd, rs, rt }
            | Self::Slt { rd, rs, rt }
            | Self::Sltu { rd, rs, rt }
            | Self::Mul { rd, rs, rt }
            | Self::Mulh { rd, rs, rt }
            | Self::Mulhu { rd, rs, rt }
            | Self::Div { rd, rs, rt }
            | Self::Divu { rd, rs, rt }
            | Self::Rem { rd, rs, rt }
            | Self::Remu { rd, rs, rt } => {
                word.rd = rd.index() as u8;
                word.rs = rs.index() as u8;
                word.rt = rt.index() as u8;
            }

            Self::Addi { rt, rs, imm }
            | Self::Addiu { rt, rs, imm }
            | Self::Andi { rt, rs, imm }
            | Self::Ori { rt, rs, imm }
            | Self::Xori { rt, rs, imm }
            | Self::Slti { rt, rs, imm }
            | Self::Sltiu { rt, rs, imm }
            | Self::Lw { rt, rs, imm }
            | Self::Lh { rt, rs, imm }
            | Self::Lhu { rt, rs, imm }
            | Self::Lb { rt, rs, imm }
            | Self::Lbu { rt, rs, imm }
            | Self::Sw { rt, rs, imm }
            | Self::Sh { rt, rs, imm }
            | Self::Sb { rt, rs, imm } => {
                word.rt = rt.index() as u8;
                word.rs = rs.index() as u8;
                word.imm = imm;
            }

            Self::Lui { rt, imm } => {
                word.rt = rt.index() as u8;
                word.imm = imm;
            }

            Self::Sll { rd, rt, imm }
            | Self::Srl { rd, rt, imm }
            | Self::Sra { rd, rt, imm } => {
                word.rd = rd.index() as u8;
                word.rt = rt.index() as u8;
                word.imm = imm;
            }

            Self::Sllv { rd, rt, rs }
            | Self::Srlv { rd, rt, rs }
            | Self::Srav { rd, rt, rs } => {
                word.rd = rd.index() as u8;
                word.rt = rt.index() as u8;
                word.rs = rs.index() as u8;
            }

            Self::Beq { rs, rt, imm } | Self::Bne { rs, rt, imm } => {
                word.rs = rs.index() as u8;
                word.rt = rt.index() as u8;
                word.imm = imm;
            }

            Self::Blez { rs, imm }
            | Self::Bgtz { rs, imm }
            | Self::Bltz { rs, imm }
            | Self::Bgez { rs, imm } => {
                word.rs = rs.index() as u8;
                word.imm = imm;
            }

            Self::J { imm } | Self::Jal { imm } | Self::Raise { imm } => {
                word.imm = imm;
            }

            Self::Jr { rs } => {
                word.rs = rs.index() as u8;
            }

            Self::Jalr { rd, rs } => {
                word.rd = rd.index() as u8;
                word.rs = rs.index() as u8;
            }

            Self::Getpc { rd } | Self::Getmode { rd } => {
                word.rd = rd.index() as u8;
            }

            Self::SetPtbr { rd, rt } => {
                word.rd = rd.index() as u8;
                word.rt = rt.index() as u8;
            }
        }

        word
    }

    /// Opcode of this instruction
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Nop => Opcode::Nop,
            Self::Add { .. } => Opcode::Add,
            Self::Addu { .. } => Opcode::Addu,
            Self::Sub { .. } => Opcode::Sub,
            Self::Subu { .. } => Opcode::Subu,
            Self::Addi { .. } => Opcode::Addi,
            Self::Addiu { .. } => Opcode::Addiu,
            Self::And { .. } => Opcode::And,
            Self::Or { .. } => Opcode::Or,
            Self::Xor { .. } => Opcode::Xor,
            Self::Nor { .. } => Opcode::Nor,
            Self::Andi { .. } => Opcode::Andi,
            Self::Ori { .. } => Opcode::Ori,
            Self::Xori { .. } => Opcode::Xori,
            Self::Lui { .. } => Opcode::Lui,
            Self::Sll { .. } => Opcode::Sll,
            Self::Srl { .. } => Opcode::Srl,
            Self::Sra { .. } => Opcode::Sra,
            Self::Sllv { .. } => Opcode::Sllv,
            Self::Srlv { .. } => Opcode::Srlv,
            Self::Srav { .. } => Opcode::Srav,
            Self::Slt { .. } => Opcode::Slt,
            Self::Sltu { .. } => Opcode::Sltu,
            Self::Slti { .. } => Opcode::Slti,
            Self::Sltiu { .. } => Opcode::Sltiu,
            Self::Mul { .. } => Opcode::Mul,
            Self::Mulh { .. } => Opcode::Mulh,
            Self::Mulhu { .. } => Opcode::Mulhu,
            Self::Div { .. } => Opcode::Div,
            Self::Divu { .. } => Opcode::Divu,
            Self::Rem { .. } => Opcode::Rem,
            Self::Remu { .. } => Opcode::Remu,
            Self::Lw { .. } => Opcode::Lw,
            Self::Lh { .. } => Opcode::Lh,
            Self::Lhu { .. } => Opcode::Lhu,
            Self::Lb { .. } => Opcode::Lb,
            Self::Lbu { .. } => Opcode::Lbu,
            Self::Sw { .. } => Opcode::Sw,
            Self::Sh { .. } => Opcode::Sh,
            Self::Sb { .. } => Opcode::Sb,
            Self::Beq { .. } => Opcode::Beq,
            Self::Bne { .. } => Opcode::Bne,
            Self::Blez { .. } => Opcode::Blez,
            Self::Bgtz { .. } => Opcode::Bgtz,
            Self::Bltz { .. } => Opcode::Bltz,
            Self::Bgez { .. } => Opcode::Bgez,
            Self::J { .. } => Opcode::J,
            Self::Jal { .. } => Opcode::Jal,
            Self::Jr { .. } => Opcode::Jr,
            Self::Jalr { .. } => Opcode::Jalr,
            Self::Syscall => Opcode::Syscall,
            Self::Break => Opcode::Break,
            Self::Ei => Opcode::Ei,
            Self::Di => Opcode::Di,
            Self::Iret => Opcode::Iret,
            Self::Raise { .. } => Opcode::Raise,
            Self::Getpc { .. } => Opcode::Getpc,
            Self::EnablePaging => Opcode::EnablePaging,
            Self::DisablePaging => Opcode::DisablePaging,
            Self::SetPtbr { .. } => Opcode::SetPtbr,
            Self::EnterUser => Opcode::EnterUser,
            Self::Getmode { .. } => Opcode::Getmode,
        }
    }
}
