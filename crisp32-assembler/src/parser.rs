//! Assembly parser for CRISP-32
//!
//! Parses one tokenized instruction into an [`Instruction`]. Operand
//! orders follow the assembler's surface syntax:
//!
//! ```text
//! add   rd, rs, rt         lw    rt, rs, offset
//! addi  rt, rs, imm        sw    rt, rs, offset
//! lui   rt, imm            beq   rs, rt, target
//! sll   rd, rt, shamt      blez  rs, target
//! sllv  rd, rs, rt         j     target
//! jalr  rd, rs             raise imm
//! ```
//!
//! Branch targets given as labels resolve relative to the post-increment
//! PC of the branch; jump targets resolve absolute against the image
//! origin.

use crate::error::{AssemblerError, Result};
use crate::lexer::{Lexer, Token};
use crate::symbols::SymbolTable;
use crisp32_spec::{Instruction, Register, INSTRUCTION_SIZE};

/// Parse a register name: numbered (`r0`..`r31`) or ABI (`zero`, `sp`, ...)
pub fn parse_register(name: &str) -> Option<Register> {
    let lower = name.to_lowercase();
    let index = match lower.as_str() {
        "zero" => 0,
        "at" => 1,
        "v0" => 2,
        "v1" => 3,
        "a0" => 4,
        "a1" => 5,
        "a2" => 6,
        "a3" => 7,
        "t0" => 8,
        "t1" => 9,
        "t2" => 10,
        "t3" => 11,
        "t4" => 12,
        "t5" => 13,
        "t6" => 14,
        "t7" => 15,
        "s0" => 16,
        "s1" => 17,
        "s2" => 18,
        "s3" => 19,
        "s4" => 20,
        "s5" => 21,
        "s6" => 22,
        "s7" => 23,
        "t8" => 24,
        "t9" => 25,
        "k0" => 26,
        "k1" => 27,
        "gp" => 28,
        "sp" => 29,
        "fp" => 30,
        "ra" => 31,
        _ => {
            let digits = lower.strip_prefix('r')?;
            digits.parse::<usize>().ok().filter(|&n| n < 32)?
        }
    };
    Register::from_index(index)
}

/// Resolution context for label operands
struct Context<'a> {
    symbols: &'a SymbolTable,
    /// Address of the instruction being assembled, origin-relative
    addr: u32,
    /// Image origin; absolute jump targets are resolved against it
    origin: u32,
    line: usize,
}

/// Parse a single instruction from assembly text.
///
/// `addr` is the origin-relative address of the instruction slot being
/// assembled; `symbols` must already hold every label (pass one output).
pub fn parse_instruction(
    text: &str,
    symbols: &SymbolTable,
    addr: u32,
    origin: u32,
    line: usize,
) -> Result<Instruction> {
    let mut lexer = Lexer::new(text);
    let tokens = lexer
        .tokenize()
        .map_err(|message| AssemblerError::SyntaxError { line, message })?;

    // Commas are pure separators, as are line terminators
    let tokens: Vec<Token> = tokens
        .into_iter()
        .filter(|t| !matches!(t, Token::Comma | Token::Newline | Token::Eof))
        .collect();

    let Some(Token::Identifier(first)) = tokens.first() else {
        return Err(AssemblerError::SyntaxError {
            line,
            message: "expected instruction mnemonic".to_string(),
        });
    };
    let mnemonic = first.to_lowercase();
    let operands = &tokens[1..];
    let ctx = Context {
        symbols,
        addr,
        origin,
        line,
    };

    parse_mnemonic(&mnemonic, operands, &ctx)
}

fn parse_mnemonic(mnemonic: &str, ops: &[Token], ctx: &Context<'_>) -> Result<Instruction> {
    match mnemonic {
        // ========== No operands ==========
        "nop" => zero_ops(ops, ctx).map(|_| Instruction::Nop),
        "syscall" => zero_ops(ops, ctx).map(|_| Instruction::Syscall),
        "break" => zero_ops(ops, ctx).map(|_| Instruction::Break),
        "ei" => zero_ops(ops, ctx).map(|_| Instruction::Ei),
        "di" => zero_ops(ops, ctx).map(|_| Instruction::Di),
        "iret" => zero_ops(ops, ctx).map(|_| Instruction::Iret),
        "enable_paging" => zero_ops(ops, ctx).map(|_| Instruction::EnablePaging),
        "disable_paging" => zero_ops(ops, ctx).map(|_| Instruction::DisablePaging),
        "enter_user" => zero_ops(ops, ctx).map(|_| Instruction::EnterUser),

        // ========== R-type: rd, rs, rt ==========
        "add" => r_type(ops, ctx, |rd, rs, rt| Instruction::Add { rd, rs, rt }),
        "addu" => r_type(ops, ctx, |rd, rs, rt| Instruction::Addu { rd, rs, rt }),
        "sub" => r_type(ops, ctx, |rd, rs, rt| Instruction::Sub { rd, rs, rt }),
        "subu" => r_type(ops, ctx, |rd, rs, rt| Instruction::Subu { rd, rs, rt }),
        "and" => r_type(ops, ctx, |rd, rs, rt| Instruction::And { rd, rs, rt }),
        "or" => r_type(ops, ctx, |rd, rs, rt| Instruction::Or { rd, rs, rt }),
        "xor" => r_type(ops, ctx, |rd, rs, rt| Instruction::Xor { rd, rs, rt }),
        "nor" => r_type(ops, ctx, |rd, rs, rt| Instruction::Nor { rd, rs, rt }),
        "slt" => r_type(ops, ctx, |rd, rs, rt| Instruction::Slt { rd, rs, rt }),
        "sltu" => r_type(ops, ctx, |rd, rs, rt| Instruction::Sltu { rd, rs, rt }),
        "mul" => r_type(ops, ctx, |rd, rs, rt| Instruction::Mul { rd, rs, rt }),
        "mulh" => r_type(ops, ctx, |rd, rs, rt| Instruction::Mulh { rd, rs, rt }),
        "mulhu" => r_type(ops, ctx, |rd, rs, rt| Instruction::Mulhu { rd, rs, rt }),
        "div" => r_type(ops, ctx, |rd, rs, rt| Instruction::Div { rd, rs, rt }),
        "divu" => r_type(ops, ctx, |rd, rs, rt| Instruction::Divu { rd, rs, rt }),
        "rem" => r_type(ops, ctx, |rd, rs, rt| Instruction::Rem { rd, rs, rt }),
        "remu" => r_type(ops, ctx, |rd, rs, rt| Instruction::Remu { rd, rs, rt }),

        // ========== Variable shifts: rd, rs, rt (rs is the amount) ==========
        "sllv" => r_type(ops, ctx, |rd, rs, rt| Instruction::Sllv { rd, rt, rs }),
        "srlv" => r_type(ops, ctx, |rd, rs, rt| Instruction::Srlv { rd, rt, rs }),
        "srav" => r_type(ops, ctx, |rd, rs, rt| Instruction::Srav { rd, rt, rs }),

        // ========== I-type: rt, rs, imm ==========
        "addi" => i_type(ops, ctx, |rt, rs, imm| Instruction::Addi { rt, rs, imm }),
        "addiu" => i_type(ops, ctx, |rt, rs, imm| Instruction::Addiu { rt, rs, imm }),
        "andi" => i_type(ops, ctx, |rt, rs, imm| Instruction::Andi { rt, rs, imm }),
        "ori" => i_type(ops, ctx, |rt, rs, imm| Instruction::Ori { rt, rs, imm }),
        "xori" => i_type(ops, ctx, |rt, rs, imm| Instruction::Xori { rt, rs, imm }),
        "slti" => i_type(ops, ctx, |rt, rs, imm| Instruction::Slti { rt, rs, imm }),
        "sltiu" => i_type(ops, ctx, |rt, rs, imm| Instruction::Sltiu { rt, rs, imm }),

        // ========== Loads and stores: rt, rs, offset ==========
        "lw" => i_type(ops, ctx, |rt, rs, imm| Instruction::Lw { rt, rs, imm }),
        "lh" => i_type(ops, ctx, |rt, rs, imm| Instruction::Lh { rt, rs, imm }),
        "lhu" => i_type(ops, ctx, |rt, rs, imm| Instruction::Lhu { rt, rs, imm }),
        "lb" => i_type(ops, ctx, |rt, rs, imm| Instruction::Lb { rt, rs, imm }),
        "lbu" => i_type(ops, ctx, |rt, rs, imm| Instruction::Lbu { rt, rs, imm }),
        "sw" => i_type(ops, ctx, |rt, rs, imm| Instruction::Sw { rt, rs, imm }),
        "sh" => i_type(ops, ctx, |rt, rs, imm| Instruction::Sh { rt, rs, imm }),
        "sb" => i_type(ops, ctx, |rt, rs, imm| Instruction::Sb { rt, rs, imm }),

        // ========== LUI: rt, imm ==========
        "lui" => {
            expect_operands(ops, 2, ctx)?;
            let rt = reg_at(ops, 0, ctx)?;
            let imm = imm_at(ops, 1, ctx)?;
            Ok(Instruction::Lui { rt, imm })
        }

        // ========== Immediate shifts: rd, rt, shamt ==========
        "sll" => shift_type(ops, ctx, |rd, rt, imm| Instruction::Sll { rd, rt, imm }),
        "srl" => shift_type(ops, ctx, |rd, rt, imm| Instruction::Srl { rd, rt, imm }),
        "sra" => shift_type(ops, ctx, |rd, rt, imm| Instruction::Sra { rd, rt, imm }),

        // ========== Branches ==========
        "beq" => branch2(ops, ctx, |rs, rt, imm| Instruction::Beq { rs, rt, imm }),
        "bne" => branch2(ops, ctx, |rs, rt, imm| Instruction::Bne { rs, rt, imm }),
        "blez" => branch1(ops, ctx, |rs, imm| Instruction::Blez { rs, imm }),
        "bgtz" => branch1(ops, ctx, |rs, imm| Instruction::Bgtz { rs, imm }),
        "bltz" => branch1(ops, ctx, |rs, imm| Instruction::Bltz { rs, imm }),
        "bgez" => branch1(ops, ctx, |rs, imm| Instruction::Bgez { rs, imm }),

        // ========== Jumps ==========
        "j" => {
            expect_operands(ops, 1, ctx)?;
            let imm = jump_target_at(ops, 0, ctx)?;
            Ok(Instruction::J { imm })
        }
        "jal" => {
            expect_operands(ops, 1, ctx)?;
            let imm = jump_target_at(ops, 0, ctx)?;
            Ok(Instruction::Jal { imm })
        }
        "jr" => {
            expect_operands(ops, 1, ctx)?;
            let rs = reg_at(ops, 0, ctx)?;
            Ok(Instruction::Jr { rs })
        }
        "jalr" => {
            expect_operands(ops, 2, ctx)?;
            let rd = reg_at(ops, 0, ctx)?;
            let rs = reg_at(ops, 1, ctx)?;
            Ok(Instruction::Jalr { rd, rs })
        }

        // ========== Interrupt and MMU control with operands ==========
        "raise" => {
            expect_operands(ops, 1, ctx)?;
            let imm = imm_at(ops, 0, ctx)?;
            Ok(Instruction::Raise { imm })
        }
        "getpc" => {
            expect_operands(ops, 1, ctx)?;
            let rd = reg_at(ops, 0, ctx)?;
            Ok(Instruction::Getpc { rd })
        }
        "getmode" => {
            expect_operands(ops, 1, ctx)?;
            let rd = reg_at(ops, 0, ctx)?;
            Ok(Instruction::Getmode { rd })
        }
        "set_ptbr" => {
            expect_operands(ops, 2, ctx)?;
            let rd = reg_at(ops, 0, ctx)?;
            let rt = reg_at(ops, 1, ctx)?;
            Ok(Instruction::SetPtbr { rd, rt })
        }

        _ => Err(AssemblerError::UnknownInstruction {
            line: ctx.line,
            mnemonic: mnemonic.to_string(),
        }),
    }
}

// ----------------------------------------------------------------------
// Operand helpers
// ----------------------------------------------------------------------

fn expect_operands(ops: &[Token], count: usize, ctx: &Context<'_>) -> Result<()> {
    if ops.len() != count {
        return Err(AssemblerError::SyntaxError {
            line: ctx.line,
            message: format!("expected {} operand(s), found {}", count, ops.len()),
        });
    }
    Ok(())
}

fn zero_ops(ops: &[Token], ctx: &Context<'_>) -> Result<()> {
    expect_operands(ops, 0, ctx)
}

fn reg_at(ops: &[Token], index: usize, ctx: &Context<'_>) -> Result<Register> {
    match ops.get(index) {
        Some(Token::Register(name)) => {
            parse_register(name).ok_or_else(|| AssemblerError::InvalidRegister {
                line: ctx.line,
                register: name.clone(),
            })
        }
        Some(other) => Err(AssemblerError::SyntaxError {
            line: ctx.line,
            message: format!("expected register, found {}", other),
        }),
        None => Err(AssemblerError::SyntaxError {
            line: ctx.line,
            message: "missing register operand".to_string(),
        }),
    }
}

/// Immediate operand as its 32-bit pattern; negative decimals become
/// two's-complement.
fn imm_at(ops: &[Token], index: usize, ctx: &Context<'_>) -> Result<u32> {
    match ops.get(index) {
        Some(Token::Number(n)) => {
            if *n < i32::MIN as i64 || *n > u32::MAX as i64 {
                return Err(AssemblerError::InvalidImmediate {
                    line: ctx.line,
                    value: n.to_string(),
                });
            }
            Ok(*n as u32)
        }
        Some(Token::HexNumber(h)) => Ok(*h),
        Some(other) => Err(AssemblerError::SyntaxError {
            line: ctx.line,
            message: format!("expected immediate, found {}", other),
        }),
        None => Err(AssemblerError::SyntaxError {
            line: ctx.line,
            message: "missing immediate operand".to_string(),
        }),
    }
}

/// Branch target: a label resolves relative to the post-increment PC, a
/// numeric operand is a raw offset.
fn branch_target_at(ops: &[Token], index: usize, ctx: &Context<'_>) -> Result<u32> {
    match ops.get(index) {
        Some(Token::Identifier(name)) => {
            let target =
                ctx.symbols
                    .lookup(name)
                    .ok_or_else(|| AssemblerError::UndefinedSymbol {
                        line: ctx.line,
                        symbol: name.clone(),
                    })?;
            Ok(target.wrapping_sub(ctx.addr.wrapping_add(INSTRUCTION_SIZE)))
        }
        _ => imm_at(ops, index, ctx),
    }
}

/// Jump target: labels and numeric targets are both origin-relative and
/// resolve to absolute addresses.
fn jump_target_at(ops: &[Token], index: usize, ctx: &Context<'_>) -> Result<u32> {
    let relative = match ops.get(index) {
        Some(Token::Identifier(name)) => {
            ctx.symbols
                .lookup(name)
                .ok_or_else(|| AssemblerError::UndefinedSymbol {
                    line: ctx.line,
                    symbol: name.clone(),
                })?
        }
        _ => imm_at(ops, index, ctx)?,
    };
    Ok(ctx.origin.wrapping_add(relative))
}

fn r_type<F>(ops: &[Token], ctx: &Context<'_>, build: F) -> Result<Instruction>
where
    F: Fn(Register, Register, Register) -> Instruction,
{
    expect_operands(ops, 3, ctx)?;
    Ok(build(
        reg_at(ops, 0, ctx)?,
        reg_at(ops, 1, ctx)?,
        reg_at(ops, 2, ctx)?,
    ))
}

fn i_type<F>(ops: &[Token], ctx: &Context<'_>, build: F) -> Result<Instruction>
where
    F: Fn(Register, Register, u32) -> Instruction,
{
    expect_operands(ops, 3, ctx)?;
    Ok(build(
        reg_at(ops, 0, ctx)?,
        reg_at(ops, 1, ctx)?,
        imm_at(ops, 2, ctx)?,
    ))
}

fn shift_type<F>(ops: &[Token], ctx: &Context<'_>, build: F) -> Result<Instruction>
where
    F: Fn(Register, Register, u32) -> Instruction,
{
    expect_operands(ops, 3, ctx)?;
    Ok(build(
        reg_at(ops, 0, ctx)?,
        reg_at(ops, 1, ctx)?,
        imm_at(ops, 2, ctx)?,
    ))
}

fn branch2<F>(ops: &[Token], ctx: &Context<'_>, build: F) -> Result<Instruction>
where
    F: Fn(Register, Register, u32) -> Instruction,
{
    expect_operands(ops, 3, ctx)?;
    Ok(build(
        reg_at(ops, 0, ctx)?,
        reg_at(ops, 1, ctx)?,
        branch_target_at(ops, 2, ctx)?,
    ))
}

fn branch1<F>(ops: &[Token], ctx: &Context<'_>, build: F) -> Result<Instruction>
where
    F: Fn(Register, u32) -> Instruction,
{
    expect_operands(ops, 2, ctx)?;
    Ok(build(reg_at(ops, 0, ctx)?, branch_target_at(ops, 1, ctx)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Instruction> {
        let symbols = SymbolTable::new();
        parse_instruction(text, &symbols, 0, 0x1000, 1)
    }

    #[test]
    fn test_parse_register_names() {
        assert_eq!(parse_register("zero"), Some(Register::R0));
        assert_eq!(parse_register("sp"), Some(Register::R29));
        assert_eq!(parse_register("ra"), Some(Register::R31));
        assert_eq!(parse_register("r17"), Some(Register::R17));
        assert_eq!(parse_register("R5"), Some(Register::R5));
        assert_eq!(parse_register("r32"), None);
        assert_eq!(parse_register("x0"), None);
    }

    #[test]
    fn test_parse_r_type() {
        let inst = parse("add v0, a0, a1").unwrap();
        assert_eq!(
            inst,
            Instruction::Add {
                rd: Register::R2,
                rs: Register::R4,
                rt: Register::R5,
            }
        );
    }

    #[test]
    fn test_parse_i_type_negative_immediate() {
        let inst = parse("addi t0, t0, -16").unwrap();
        assert_eq!(
            inst,
            Instruction::Addi {
                rt: Register::R8,
                rs: Register::R8,
                imm: 0xFFFF_FFF0,
            }
        );
    }

    #[test]
    fn test_parse_load_store() {
        let inst = parse("lw v0, zero, 0x2000").unwrap();
        assert_eq!(
            inst,
            Instruction::Lw {
                rt: Register::R2,
                rs: Register::R0,
                imm: 0x2000,
            }
        );

        let inst = parse("sw v0, sp, 4").unwrap();
        assert_eq!(
            inst,
            Instruction::Sw {
                rt: Register::R2,
                rs: Register::R29,
                imm: 4,
            }
        );
    }

    #[test]
    fn test_parse_branch_with_label() {
        let mut symbols = SymbolTable::new();
        symbols.define("target", 0x40, 1).unwrap();

        // Branch at 0x10: offset = 0x40 - (0x10 + 8) = 0x28
        let inst = parse_instruction("beq t0, t1, target", &symbols, 0x10, 0x1000, 3).unwrap();
        assert_eq!(
            inst,
            Instruction::Beq {
                rs: Register::R8,
                rt: Register::R9,
                imm: 0x28,
            }
        );
    }

    #[test]
    fn test_parse_backward_branch() {
        let mut symbols = SymbolTable::new();
        symbols.define("loop", 0x00, 1).unwrap();

        // Branch at 0x10: offset = 0x00 - 0x18 = -0x18
        let inst = parse_instruction("bne t0, zero, loop", &symbols, 0x10, 0x1000, 4).unwrap();
        assert_eq!(
            inst,
            Instruction::Bne {
                rs: Register::R8,
                rt: Register::R0,
                imm: (-0x18i32) as u32,
            }
        );
    }

    #[test]
    fn test_parse_jump_resolves_against_origin() {
        let mut symbols = SymbolTable::new();
        symbols.define("func", 0x20, 1).unwrap();

        let inst = parse_instruction("jal func", &symbols, 0, 0x1000, 2).unwrap();
        assert_eq!(inst, Instruction::Jal { imm: 0x1020 });

        // Numeric jump targets are origin-relative too
        let inst = parse_instruction("j 0x40", &symbols, 0, 0x1000, 3).unwrap();
        assert_eq!(inst, Instruction::J { imm: 0x1040 });
    }

    #[test]
    fn test_parse_system_ops() {
        assert_eq!(parse("syscall").unwrap(), Instruction::Syscall);
        assert_eq!(parse("iret").unwrap(), Instruction::Iret);
        assert_eq!(parse("enable_paging").unwrap(), Instruction::EnablePaging);
        assert_eq!(parse("raise 16").unwrap(), Instruction::Raise { imm: 16 });
        assert_eq!(
            parse("set_ptbr t0, t1").unwrap(),
            Instruction::SetPtbr {
                rd: Register::R8,
                rt: Register::R9,
            }
        );
    }

    #[test]
    fn test_parse_uppercase_mnemonics() {
        let inst = parse("ADDI R1, R0, 42").unwrap();
        assert_eq!(
            inst,
            Instruction::Addi {
                rt: Register::R1,
                rs: Register::R0,
                imm: 42,
            }
        );
    }

    #[test]
    fn test_unknown_mnemonic() {
        assert!(matches!(
            parse("frobnicate a0"),
            Err(AssemblerError::UnknownInstruction { .. })
        ));
    }

    #[test]
    fn test_undefined_symbol() {
        assert!(matches!(
            parse("j nowhere"),
            Err(AssemblerError::UndefinedSymbol { .. })
        ));
    }

    #[test]
    fn test_wrong_operand_count() {
        assert!(matches!(
            parse("add a0, a1"),
            Err(AssemblerError::SyntaxError { .. })
        ));
        assert!(matches!(
            parse("nop a0"),
            Err(AssemblerError::SyntaxError { .. })
        ));
    }
}
