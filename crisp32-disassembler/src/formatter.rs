//! Instruction formatting to assembly text
//!
//! Output uses the assembler's surface syntax, so a formatted listing
//! reassembles to the same bytes (jump targets aside, which print as
//! absolute addresses).

use crisp32_spec::{Instruction, Register};

fn fmt_reg(r: Register) -> &'static str {
    r.name()
}

/// Immediates print signed when small and negative, hex otherwise
fn fmt_imm(imm: u32) -> String {
    let signed = imm as i32;
    if (-4096..4096).contains(&signed) {
        signed.to_string()
    } else {
        format!("{:#x}", imm)
    }
}

/// Branch offsets always print signed
fn fmt_offset(imm: u32) -> String {
    (imm as i32).to_string()
}

/// Format an instruction as assembly text
pub fn format(inst: &Instruction) -> String {
    match *inst {
        Instruction::Nop => "nop".to_string(),

        Instruction::Add { rd, rs, rt } => fmt_r("add", rd, rs, rt),
        Instruction::Addu { rd, rs, rt } => fmt_r("addu", rd, rs, rt),
        Instruction::Sub { rd, rs, rt } => fmt_r("sub", rd, rs, rt),
        Instruction::Subu { rd, rs, rt } => fmt_r("subu", rd, rs, rt),
        Instruction::And { rd, rs, rt } => fmt_r("and", rd, rs, rt),
        Instruction::Or { rd, rs, rt } => fmt_r("or", rd, rs, rt),
        Instruction::Xor { rd, rs, rt } => fmt_r("xor", rd, rs, rt),
        Instruction::Nor { rd, rs, rt } => fmt_r("nor", rd, rs, rt),
        Instruction::Slt { rd, rs, rt } => fmt_r("slt", rd, rs, rt),
        Instruction::Sltu { rd, rs, rt } => fmt_r("sltu", rd, rs, rt),
        Instruction::Mul { rd, rs, rt } => fmt_r("mul", rd, rs, rt),
        Instruction::Mulh { rd, rs, rt } => fmt_r("mulh", rd, rs, rt),
        Instruction::Mulhu { rd, rs, rt } => fmt_r("mulhu", rd, rs, rt),
        Instruction::Div { rd, rs, rt } => fmt_r("div", rd, rs, rt),
        Instruction::Divu { rd, rs, rt } => fmt_r("divu", rd, rs, rt),
        Instruction::Rem { rd, rs, rt } => fmt_r("rem", rd, rs, rt),
        Instruction::Remu { rd, rs, rt } => fmt_r("remu", rd, rs, rt),

        // Variable shifts keep the assembler's rd, rs, rt order
        Instruction::Sllv { rd, rt, rs } => fmt_r("sllv", rd, rs, rt),
        Instruction::Srlv { rd, rt, rs } => fmt_r("srlv", rd, rs, rt),
        Instruction::Srav { rd, rt, rs } => fmt_r("srav", rd, rs, rt),

        Instruction::Addi { rt, rs, imm } => fmt_i("addi", rt, rs, imm),
        Instruction::Addiu { rt, rs, imm } => fmt_i("addiu", rt, rs, imm),
        Instruction::Andi { rt, rs, imm } => fmt_i("andi", rt, rs, imm),
        Instruction::Ori { rt, rs, imm } => fmt_i("ori", rt, rs, imm),
        Instruction::Xori { rt, rs, imm } => fmt_i("xori", rt, rs, imm),
        Instruction::Slti { rt, rs, imm } => fmt_i("slti", rt, rs, imm),
        Instruction::Sltiu { rt, rs, imm } => fmt_i("sltiu", rt, rs, imm),

        Instruction::Lui { rt, imm } => format!("lui {}, {}", fmt_reg(rt), fmt_imm(imm)),

        Instruction::Sll { rd, rt, imm } => fmt_shift("sll", rd, rt, imm),
        Instruction::Srl { rd, rt, imm } => fmt_shift("srl", rd, rt, imm),
        Instruction::Sra { rd, rt, imm } => fmt_shift("sra", rd, rt, imm),

        Instruction::Lw { rt, rs, imm } => fmt_i("lw", rt, rs, imm),
        Instruction::Lh { rt, rs, imm } => fmt_i("lh", rt, rs, imm),
        Instruction::Lhu { rt, rs, imm } => fmt_i("lhu", rt, rs, imm),
        Instruction::Lb { rt, rs, imm } => fmt_i("lb", rt, rs, imm),
        Instruction::Lbu { rt, rs, imm } => fmt_i("lbu", rt, rs, imm),
        Instruction::Sw { rt, rs, imm } => fmt_i("sw", rt, rs, imm),
        Instruction::Sh { rt, rs, imm } => fmt_i("sh", rt, rs, imm),
        Instruction::Sb { rt, rs, imm } => fmt_i("sb", rt, rs, imm),

        Instruction::Beq { rs, rt, imm } => {
            format!("beq {}, {}, {}", fmt_reg(rs), fmt_reg(rt), fmt_offset(imm))
        }
        Instruction::Bne { rs, rt, imm } => {
            format!("bne {}, {}, {}", fmt_reg(rs), fmt_reg(rt), fmt_offset(imm))
        }
        Instruction::Blez { rs, imm } => format!("blez {}, {}", fmt_reg(rs), fmt_offset(imm)),
        Instruction::Bgtz { rs, imm } => format!("bgtz {}, {}", fmt_reg(rs), fmt_offset(imm)),
        Instruction::Bltz { rs, imm } => format!("bltz {}, {}", fmt_reg(rs), fmt_offset(imm)),
        Instruction::Bgez { rs, imm } => format!("bgez {}, {}", fmt_reg(rs), fmt_offset(imm)),

        Instruction::J { imm } => format!("j {:#x}", imm),
        Instruction::Jal { imm } => format!("jal {:#x}", imm),
        Instruction::Jr { rs } => format!("jr {}", fmt_reg(rs)),
        Instruction::Jalr { rd, rs } => format!("jalr {}, {}", fmt_reg(rd), fmt_reg(rs)),

        Instruction::Syscall => "syscall".to_string(),
        Instruction::Break => "break".to_string(),

        Instruction::Ei => "ei".to_string(),
        Instruction::Di => "di".to_string(),
        Instruction::Iret => "iret".to_string(),
        Instruction::Raise { imm } => format!("raise {}", fmt_imm(imm)),
        Instruction::Getpc { rd } => format!("getpc {}", fmt_reg(rd)),

        Instruction::EnablePaging => "enable_paging".to_string(),
        Instruction::DisablePaging => "disable_paging".to_string(),
        Instruction::SetPtbr { rd, rt } => {
            format!("set_ptbr {}, {}", fmt_reg(rd), fmt_reg(rt))
        }
        Instruction::EnterUser => "enter_user".to_string(),
        Instruction::Getmode { rd } => format!("getmode {}", fmt_reg(rd)),
    }
}

fn fmt_r(mnemonic: &str, a: Register, b: Register, c: Register) -> String {
    format!("{} {}, {}, {}", mnemonic, fmt_reg(a), fmt_reg(b), fmt_reg(c))
}

fn fmt_i(mnemonic: &str, rt: Register, rs: Register, imm: u32) -> String {
    format!("{} {}, {}, {}", mnemonic, fmt_reg(rt), fmt_reg(rs), fmt_imm(imm))
}

fn fmt_shift(mnemonic: &str, rd: Register, rt: Register, imm: u32) -> String {
    format!("{} {}, {}, {}", mnemonic, fmt_reg(rd), fmt_reg(rt), fmt_imm(imm))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_r_type() {
        let inst = Instruction::Add {
            rd: Register::R3,
            rs: Register::R1,
            rt: Register::R2,
        };
        assert_eq!(format(&inst), "add v1, at, v0");
    }

    #[test]
    fn test_format_i_type() {
        let inst = Instruction::Addi {
            rt: Register::R8,
            rs: Register::R8,
            imm: (-16i32) as u32,
        };
        assert_eq!(format(&inst), "addi t0, t0, -16");
    }

    #[test]
    fn test_format_large_immediate_as_hex() {
        let inst = Instruction::Ori {
            rt: Register::R1,
            rs: Register::R1,
            imm: 0x5678,
        };
        assert_eq!(format(&inst), "ori at, at, 0x5678");
    }

    #[test]
    fn test_format_branch_offset_signed() {
        let inst = Instruction::Bne {
            rs: Register::R8,
            rt: Register::R0,
            imm: (-24i32) as u32,
        };
        assert_eq!(format(&inst), "bne t0, zero, -24");
    }

    #[test]
    fn test_format_jump_absolute() {
        assert_eq!(format(&Instruction::J { imm: 0x1040 }), "j 0x1040");
    }

    #[test]
    fn test_format_system() {
        assert_eq!(format(&Instruction::Syscall), "syscall");
        assert_eq!(format(&Instruction::EnablePaging), "enable_paging");
        assert_eq!(
            format(&Instruction::Getpc { rd: Register::R9 }),
            "getpc t1"
        );
    }
}
