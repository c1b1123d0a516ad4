use std::error;
use std::fmt;

use crate::memory::Word;

/// Exit status reported when the instruction pointer runs out of memory
pub const POINTER_EXHAUSTED_CODE: i32 = -110_002;

/// Why a program stopped successfully
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Halt {
    /// A `halt` instruction was executed
    Instruction,
    /// `pop` or `ret` found the stack empty
    StackEmpty { address: usize },
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Halt::Instruction => f.write_str("halt instruction"),
            Halt::StackEmpty { address } => write!(f, "stack empty at {}", address),
        }
    }
}

/// A terminal, non-recoverable execution outcome other than a halt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    /// The `in` instruction was reached
    UnimplementedInput { address: usize },
    /// The word at `address` is not an opcode
    InvalidOpcode {
        word: Word,
        address: usize,
        previous: Option<Word>,
        next: Option<Word>,
    },
    /// The instruction pointer left the memory without a halt
    PointerExhausted { pointer: usize },
    /// A destination operand does not name a register
    InvalidRegister { raw: Word, address: usize },
    /// `rmem` or `wmem` addressed a word outside of the memory
    InvalidAddress { target: Word, address: usize },
    /// `mod` with a zero divisor
    DivisionByZero { address: usize },
}

impl Fault {
    pub fn exit_code(&self) -> i32 {
        match self {
            Fault::UnimplementedInput { .. } => -1,
            Fault::InvalidOpcode { .. } => -2,
            Fault::InvalidRegister { .. }
            | Fault::InvalidAddress { .. }
            | Fault::DivisionByZero { .. } => -3,
            Fault::PointerExhausted { .. } => POINTER_EXHAUSTED_CODE,
        }
    }
}

struct Neighbour(Option<Word>);

impl fmt::Display for Neighbour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(word) => write!(f, "{}", word),
            None => f.write_str("-"),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Fault::UnimplementedInput { address } => {
                write!(f, "input is not implemented (at {})", address)
            }
            Fault::InvalidOpcode {
                word,
                address,
                previous,
                next,
            } => write!(
                f,
                "invalid opcode {} at {} (previous: {}, next: {})",
                word,
                address,
                Neighbour(previous),
                Neighbour(next)
            ),
            Fault::PointerExhausted { pointer } => {
                write!(f, "instruction pointer {} is outside of memory", pointer)
            }
            Fault::InvalidRegister { raw, address } => {
                write!(f, "operand {} at {} does not name a register", raw, address)
            }
            Fault::InvalidAddress { target, address } => {
                write!(f, "memory has no address `{}` (at {})", target, address)
            }
            Fault::DivisionByZero { address } => write!(f, "division by zero at {}", address),
        }
    }
}

impl error::Error for Fault {}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Halted(Halt),
    Faulted(Fault),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Halted(_))
    }

    /// Status handed to the operating environment
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Halted(_) => 0,
            Outcome::Faulted(fault) => fault.exit_code(),
        }
    }
}

impl From<Result<Halt, Fault>> for Outcome {
    fn from(result: Result<Halt, Fault>) -> Self {
        match result {
            Ok(halt) => Outcome::Halted(halt),
            Err(fault) => Outcome::Faulted(fault),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Halted(halt) => write!(f, "halted: {}", halt),
            Outcome::Faulted(fault) => write!(f, "faulted: {}", fault),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(Outcome::Halted(Halt::Instruction).exit_code(), 0);
        assert_eq!(Outcome::Halted(Halt::StackEmpty { address: 3 }).exit_code(), 0);
        assert_eq!(
            Outcome::Faulted(Fault::UnimplementedInput { address: 0 }).exit_code(),
            -1
        );
        assert_eq!(
            Outcome::Faulted(Fault::InvalidOpcode {
                word: 22,
                address: 0,
                previous: None,
                next: Some(0)
            })
            .exit_code(),
            -2
        );
        assert_eq!(
            Outcome::Faulted(Fault::DivisionByZero { address: 0 }).exit_code(),
            -3
        );
        assert_eq!(
            Outcome::Faulted(Fault::PointerExhausted { pointer: 32768 }).exit_code(),
            POINTER_EXHAUSTED_CODE
        );
    }

    #[test]
    fn invalid_opcode_message() {
        let fault = Fault::InvalidOpcode {
            word: 22,
            address: 0,
            previous: None,
            next: Some(7),
        };

        assert_eq!(
            fault.to_string(),
            "invalid opcode 22 at 0 (previous: -, next: 7)"
        );
    }
}
