//! Two-pass assembler driver
//!
//! Pass one walks the source collecting label addresses at 8-byte
//! increments; pass two parses and encodes each instruction with the
//! complete symbol table in hand.

use crate::encoder::encode;
use crate::error::Result;
use crate::parser::parse_instruction;
use crate::symbols::SymbolTable;
use crisp32_spec::{Program, DEFAULT_LOAD_ADDR, INSTRUCTION_SIZE};

/// Assemble source into an image for the conventional load address
pub fn assemble(source: &str) -> Result<Program> {
    assemble_with_origin(source, DEFAULT_LOAD_ADDR)
}

/// Assemble source into an image for a specific load address.
///
/// Absolute jump targets are resolved against `origin`; the caller must
/// load the image there.
pub fn assemble_with_origin(source: &str, origin: u32) -> Result<Program> {
    // Pass 1: collect labels
    let mut symbols = SymbolTable::new();
    let mut addr = 0u32;
    for (index, raw) in source.lines().enumerate() {
        let line_num = index + 1;
        let line = strip_comment(raw);
        let (label, rest) = split_label(line);
        if let Some(name) = label {
            symbols.define(name, addr, line_num)?;
        }
        if !rest.trim().is_empty() {
            addr = addr.wrapping_add(INSTRUCTION_SIZE);
        }
    }

    // Pass 2: encode
    let mut image = Vec::with_capacity(addr as usize);
    let mut addr = 0u32;
    for (index, raw) in source.lines().enumerate() {
        let line_num = index + 1;
        let line = strip_comment(raw);
        let (_, rest) = split_label(line);
        let rest = rest.trim();
        if rest.is_empty() {
            continue;
        }
        let inst = parse_instruction(rest, &symbols, addr, origin, line_num)?;
        image.extend_from_slice(&encode(&inst));
        addr = addr.wrapping_add(INSTRUCTION_SIZE);
    }

    Ok(Program::with_origin(image, origin))
}

/// Drop a trailing `;` or `#` comment
fn strip_comment(line: &str) -> &str {
    match line.find([';', '#']) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Split a leading `label:` off a line, returning (label, rest)
fn split_label(line: &str) -> (Option<&str>, &str) {
    let trimmed = line.trim_start();
    let Some(colon) = trimmed.find(':') else {
        return (None, trimmed);
    };
    let candidate = &trimmed[..colon];
    let is_label = !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_');
    if is_label {
        (Some(candidate), &trimmed[colon + 1..])
    } else {
        (None, trimmed)
    }
}
