//! CRISP-32 Assembler
//!
//! Two-pass assembler for CRISP-32 assembly language: pass one collects
//! label addresses, pass two encodes instructions into a raw 8-byte-per-
//! instruction image.
//!
//! ## Example
//!
//! ```rust
//! use crisp32_assembler::assemble;
//!
//! let program = assemble(
//!     "start: addi a0, zero, 1\n\
//!      syscall\n",
//! )
//! .unwrap();
//!
//! assert_eq!(program.image.len(), 16);
//! ```

pub mod error;
pub mod lexer;
pub mod symbols;
pub mod parser;
pub mod encoder;
pub mod assembler;

pub use error::{AssemblerError, Result};
pub use assembler::{assemble, assemble_with_origin};
pub use parser::{parse_instruction, parse_register};
pub use encoder::encode;
pub use symbols::SymbolTable;
