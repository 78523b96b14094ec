//! Error types for the CRISP-32 disassembler

use crisp32_spec::IsaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisassemblerError {
    /// The image ends mid-instruction
    #[error("truncated instruction at offset {0:#x}")]
    TruncatedImage(usize),

    /// Undecodable instruction word
    #[error(transparent)]
    Isa(#[from] IsaError),
}

pub type Result<T> = std::result::Result<T, DisassemblerError>;
