//! Register definitions for CRISP-32

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of general-purpose registers
pub const NUM_REGISTERS: usize = 32;

/// General-purpose register (R0-R31)
///
/// Hardware assigns meaning to three registers only: R0 reads as zero and
/// discards writes, R29 is the interrupt save stack pointer, and R31 is the
/// JAL link register. The remaining names follow the assembler's calling
/// convention.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Register {
    R0 = 0,   // zero - hardwired to 0
    R1 = 1,   // at   - assembler temporary
    R2 = 2,   // v0   - return value
    R3 = 3,   // v1
    R4 = 4,   // a0   - argument 0 / interrupt number
    R5 = 5,   // a1   - argument 1
    R6 = 6,   // a2   - argument 2
    R7 = 7,   // a3   - argument 3
    R8 = 8,   // t0   - temporary
    R9 = 9,   // t1
    R10 = 10, // t2
    R11 = 11, // t3
    R12 = 12, // t4
    R13 = 13, // t5
    R14 = 14, // t6
    R15 = 15, // t7
    R16 = 16, // s0   - saved
    R17 = 17, // s1
    R18 = 18, // s2
    R19 = 19, // s3
    R20 = 20, // s4
    R21 = 21, // s5
    R22 = 22, // s6
    R23 = 23, // s7
    R24 = 24, // t8
    R25 = 25, // t9
    R26 = 26, // k0   - kernel reserved
    R27 = 27, // k1
    R28 = 28, // gp   - global pointer
    R29 = 29, // sp   - stack pointer / interrupt save stack
    R30 = 30, // fp   - frame pointer
    R31 = 31, // ra   - return address (JAL link)
}

impl Register {
    pub const ZERO: Self = Self::R0;
    pub const A0: Self = Self::R4;
    pub const A1: Self = Self::R5;
    pub const A2: Self = Self::R6;
    pub const A3: Self = Self::R7;
    pub const SP: Self = Self::R29;
    pub const FP: Self = Self::R30;
    pub const RA: Self = Self::R31;

    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        if index < NUM_REGISTERS {
            Some(unsafe { std::mem::transmute(index as u8) })
        } else {
            None
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::R0 => "zero",
            Self::R1 => "at",
            Self::R2 => "v0",
            Self::R3 => "v1",
            Self::R4 => "a0",
            Self::R5 => "a1",
            Self::R6 => "a2",
            Self::R7 => "a3",
            Self::R8 => "t0",
            Self::R9 => "t1",
            Self::R10 => "t2",
            Self::R11 => "t3",
            Self::R12 => "t4",
            Self::R13 => "t5",
            Self::R14 => "t6",
            Self::R15 => "t7",
            Self::R16 => "s0",
            Self::R17 => "s1",
            Self::R18 => "s2",
            Self::R19 => "s3",
            Self::R20 => "s4",
            Self::R21 => "s5",
            Self::R22 => "s6",
            Self::R23 => "s7",
            Self::R24 => "t8",
            Self::R25 => "t9",
            Self::R26 => "k0",
            Self::R27 => "k1",
            Self::R28 => "gp",
            Self::R29 => "sp",
            Self::R30 => "fp",
            Self::R31 => "ra",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_index_roundtrip() {
        for i in 0..NUM_REGISTERS {
            let reg = Register::from_index(i).unwrap();
            assert_eq!(reg.index(), i);
        }
        assert_eq!(Register::from_index(32), None);
        assert_eq!(Register::from_index(255), None);
    }

    #[test]
    fn test_abi_names() {
        assert_eq!(Register::R0.name(), "zero");
        assert_eq!(Register::R4.name(), "a0");
        assert_eq!(Register::R29.name(), "sp");
        assert_eq!(Register::R31.name(), "ra");
    }

    #[test]
    fn test_aliases() {
        assert_eq!(Register::ZERO, Register::R0);
        assert_eq!(Register::SP, Register::R29);
        assert_eq!(Register::RA, Register::R31);
        assert!(Register::ZERO.is_zero());
        assert!(!Register::SP.is_zero());
    }
}
