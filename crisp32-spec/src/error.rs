//! Error types for the CRISP-32 ISA definitions

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IsaError {
    #[error("invalid opcode: {0:#04x}")]
    InvalidOpcode(u8),

    #[error("invalid register byte: {0} (valid range: 0-31)")]
    InvalidRegister(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            IsaError::InvalidOpcode(0xEE).to_string(),
            "invalid opcode: 0xee"
        );
        assert_eq!(
            IsaError::InvalidRegister(40).to_string(),
            "invalid register byte: 40 (valid range: 0-31)"
        );
    }
}
