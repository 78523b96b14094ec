//! Error types for the CRISP-32 assembler

use thiserror::Error;

/// Assembler error types
#[derive(Debug, Error)]
pub enum AssemblerError {
    /// Invalid syntax
    #[error("syntax error at line {line}: {message}")]
    SyntaxError { line: usize, message: String },

    /// Unknown mnemonic
    #[error("unknown instruction at line {line}: {mnemonic}")]
    UnknownInstruction { line: usize, mnemonic: String },

    /// Invalid register name
    #[error("invalid register at line {line}: {register}")]
    InvalidRegister { line: usize, register: String },

    /// Invalid immediate value
    #[error("invalid immediate at line {line}: {value}")]
    InvalidImmediate { line: usize, value: String },

    /// Reference to a label that is never defined
    #[error("undefined symbol at line {line}: {symbol}")]
    UndefinedSymbol { line: usize, symbol: String },

    /// Label defined twice
    #[error("duplicate label at line {line}: {label}")]
    DuplicateLabel { line: usize, label: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for assembler operations
pub type Result<T> = std::result::Result<T, AssemblerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AssemblerError::SyntaxError {
            line: 10,
            message: "unexpected token".to_string(),
        };
        assert_eq!(err.to_string(), "syntax error at line 10: unexpected token");

        let err = AssemblerError::UnknownInstruction {
            line: 5,
            mnemonic: "frobnicate".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unknown instruction at line 5: frobnicate"
        );

        let err = AssemblerError::DuplicateLabel {
            line: 20,
            label: "main".to_string(),
        };
        assert_eq!(err.to_string(), "duplicate label at line 20: main");
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let asm_err: AssemblerError = io_err.into();
        assert!(asm_err.to_string().contains("file not found"));
    }
}
