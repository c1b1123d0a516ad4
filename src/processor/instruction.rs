use std::convert::TryFrom;
use std::fmt;

use num_enum::IntoPrimitive;
use num_enum::TryFromPrimitive;

use super::operand::{Register, Registers, Resolver};
use crate::memory::{Memory, Word};
use crate::outcome::Fault;

macro_rules! instructions {
    ( $( $( #[doc = $doc:expr] )+ $name:ident = $repr:literal => $mnemonic:literal , )+ ) => {
        /// Defines the opcodes
        #[repr(u16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[derive(TryFromPrimitive, IntoPrimitive)]
        pub enum Opcode {
            $(
                $( #[doc = $doc] )+
                $name = $repr,
            )+
        }

        impl Opcode {
            pub const ALL: &'static [Self] = &[
                $( Self::$name , )+
            ];

            pub fn name(&self) -> &'static str {
                match self {
                    $( Self::$name => $mnemonic , )+
                }
            }
        }

        impl ::std::fmt::Display for Opcode {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.name())
            }
        }
    }
}

instructions! {
    /// Stop execution and terminate the program
    Halt = 0 => "halt",
    /// Set register `a` to the value of `b`
    Set = 1 => "set",
    /// Push `a` onto the stack
    Push = 2 => "push",
    /// Pop the top of the stack into `a`; halts on an empty stack
    Pop = 3 => "pop",
    /// Set `a` to 1 if `b` equals `c`, 0 otherwise
    Eq = 4 => "eq",
    /// Set `a` to 1 if `b` is greater than `c`, 0 otherwise
    Gt = 5 => "gt",
    /// Jump to `a`
    Jmp = 6 => "jmp",
    /// Jump to `b` if `a` is non zero
    Jt = 7 => "jt",
    /// Jump to `b` if `a` is zero
    Jf = 8 => "jf",
    /// Store `b + c` (modulo 32768) into `a`
    Add = 9 => "add",
    /// Store `b * c` (modulo 32768) into `a`
    Mult = 10 => "mult",
    /// Store the remainder of `b / c` into `a`
    Mod = 11 => "mod",
    /// Store the bitwise and of `b` and `c` into `a`
    And = 12 => "and",
    /// Store the bitwise or of `b` and `c` into `a`
    Or = 13 => "or",
    /// Store the 15 bit inverse of `b` into `a`
    Not = 14 => "not",
    /// Read memory at address `b` into `a`
    Rmem = 15 => "rmem",
    /// Write `b` into memory at address `a`
    Wmem = 16 => "wmem",
    /// Push the address of the next instruction and jump to `a`
    Call = 17 => "call",
    /// Pop an address from the stack and jump to it; halts on an empty stack
    Ret = 18 => "ret",
    /// Write the character with code `a` to the output
    Out = 19 => "out",
    /// Read a character into `a`
    In = 20 => "in",
    /// No operation
    Noop = 21 => "noop",
}

/// A decoded instruction. Destinations are registers, every other operand is
/// already resolved to its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    Halt,
    Set(Register, Word),
    Push(Word),
    Pop(Register),
    Eq(Register, Word, Word),
    Gt(Register, Word, Word),
    Jmp(Word),
    Jt(Word, Word),
    Jf(Word, Word),
    Add(Register, Word, Word),
    Mult(Register, Word, Word),
    Mod(Register, Word, Word),
    And(Register, Word, Word),
    Or(Register, Word, Word),
    Not(Register, Word),
    Rmem(Register, Word),
    Wmem(Word, Word),
    Call(Word),
    Ret,
    Out(Word),
    In(Register),
    Noop,
}

impl Instruction {
    /// Decodes the instruction at `address`. Returns it together with the
    /// address of the following instruction. Neither memory nor registers are
    /// modified.
    pub fn decode<const S: usize>(
        memory: &Memory<S>,
        registers: &Registers,
        address: usize,
    ) -> Result<(Self, usize), Fault> {
        let mut operands = Resolver::new(memory, registers, address);
        let word = operands.fetch()?;
        let opcode = Opcode::try_from(word).map_err(|_| Fault::InvalidOpcode {
            word,
            address,
            previous: address
                .checked_sub(1)
                .and_then(|previous| memory.read_word(previous)),
            next: memory.read_word(address + 1),
        })?;

        let instruction = match opcode {
            Opcode::Halt => Instruction::Halt,
            Opcode::Set => Instruction::Set(operands.register()?, operands.value()?),
            Opcode::Push => Instruction::Push(operands.value()?),
            Opcode::Pop => Instruction::Pop(operands.register()?),
            Opcode::Eq => Instruction::Eq(
                operands.register()?,
                operands.value()?,
                operands.value()?,
            ),
            Opcode::Gt => Instruction::Gt(
                operands.register()?,
                operands.value()?,
                operands.value()?,
            ),
            Opcode::Jmp => Instruction::Jmp(operands.value()?),
            Opcode::Jt => Instruction::Jt(operands.value()?, operands.value()?),
            Opcode::Jf => Instruction::Jf(operands.value()?, operands.value()?),
            Opcode::Add => Instruction::Add(
                operands.register()?,
                operands.value()?,
                operands.value()?,
            ),
            Opcode::Mult => Instruction::Mult(
                operands.register()?,
                operands.value()?,
                operands.value()?,
            ),
            Opcode::Mod => Instruction::Mod(
                operands.register()?,
                operands.value()?,
                operands.value()?,
            ),
            Opcode::And => Instruction::And(
                operands.register()?,
                operands.value()?,
                operands.value()?,
            ),
            Opcode::Or => Instruction::Or(
                operands.register()?,
                operands.value()?,
                operands.value()?,
            ),
            Opcode::Not => Instruction::Not(operands.register()?, operands.value()?),
            Opcode::Rmem => Instruction::Rmem(operands.register()?, operands.value()?),
            Opcode::Wmem => Instruction::Wmem(operands.value()?, operands.value()?),
            Opcode::Call => Instruction::Call(operands.value()?),
            Opcode::Ret => Instruction::Ret,
            Opcode::Out => Instruction::Out(operands.value()?),
            Opcode::In => Instruction::In(operands.register()?),
            Opcode::Noop => Instruction::Noop,
        };

        Ok((instruction, operands.pointer()))
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Halt => Opcode::Halt,
            Instruction::Set(..) => Opcode::Set,
            Instruction::Push(..) => Opcode::Push,
            Instruction::Pop(..) => Opcode::Pop,
            Instruction::Eq(..) => Opcode::Eq,
            Instruction::Gt(..) => Opcode::Gt,
            Instruction::Jmp(..) => Opcode::Jmp,
            Instruction::Jt(..) => Opcode::Jt,
            Instruction::Jf(..) => Opcode::Jf,
            Instruction::Add(..) => Opcode::Add,
            Instruction::Mult(..) => Opcode::Mult,
            Instruction::Mod(..) => Opcode::Mod,
            Instruction::And(..) => Opcode::And,
            Instruction::Or(..) => Opcode::Or,
            Instruction::Not(..) => Opcode::Not,
            Instruction::Rmem(..) => Opcode::Rmem,
            Instruction::Wmem(..) => Opcode::Wmem,
            Instruction::Call(..) => Opcode::Call,
            Instruction::Ret => Opcode::Ret,
            Instruction::Out(..) => Opcode::Out,
            Instruction::In(..) => Opcode::In,
            Instruction::Noop => Opcode::Noop,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.opcode().name())?;

        match *self {
            Instruction::Halt | Instruction::Ret | Instruction::Noop => Ok(()),
            Instruction::Pop(a) | Instruction::In(a) => write!(f, " {}", a),
            Instruction::Push(a)
            | Instruction::Jmp(a)
            | Instruction::Call(a)
            | Instruction::Out(a) => write!(f, " {}", a),
            Instruction::Set(a, b) | Instruction::Not(a, b) | Instruction::Rmem(a, b) => {
                write!(f, " {} {}", a, b)
            }
            Instruction::Jt(a, b) | Instruction::Jf(a, b) | Instruction::Wmem(a, b) => {
                write!(f, " {} {}", a, b)
            }
            Instruction::Eq(a, b, c)
            | Instruction::Gt(a, b, c)
            | Instruction::Add(a, b, c)
            | Instruction::Mult(a, b, c)
            | Instruction::Mod(a, b, c)
            | Instruction::And(a, b, c)
            | Instruction::Or(a, b, c) => write!(f, " {} {} {}", a, b, c),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::memory::StdMem;
    use crate::processor::operand::{R0, R1};
    use crate::write_words;

    use super::*;
    use color_eyre::eyre::Result;

    #[test]
    fn opcode_range() {
        assert_eq!(Opcode::ALL.len(), 22);
        for (value, opcode) in Opcode::ALL.iter().enumerate() {
            assert_eq!(Word::from(*opcode), value as Word);
        }
        assert_eq!(Opcode::try_from(21u16).ok(), Some(Opcode::Noop));
        assert!(Opcode::try_from(22u16).is_err());
    }

    #[test]
    fn decode_add() -> Result<()> {
        let mut mem = StdMem::default();
        let mut registers = Registers::default();
        registers.set(Register::new(1).unwrap(), 38);
        write_words!(mem : 0 => Opcode::Add, R0, R1, 4, Opcode::Halt);

        let (instruction, next) = Instruction::decode(&mem, &registers, 0)?;

        assert_eq!(
            instruction,
            Instruction::Add(Register::new(0).unwrap(), 38, 4)
        );
        assert_eq!(next, 4);
        assert_eq!(instruction.to_string(), "add r0 38 4");

        Ok(())
    }

    #[test]
    fn decode_does_not_touch_state() -> Result<()> {
        let mut mem = StdMem::default();
        let registers = Registers::default();
        write_words!(mem : 0 => Opcode::Wmem, 10, 20);
        let before = mem.clone();

        let (instruction, next) = Instruction::decode(&mem, &registers, 0)?;

        assert_eq!(instruction, Instruction::Wmem(10, 20));
        assert_eq!(next, 3);
        assert_eq!(mem, before);
        assert_eq!(registers, Registers::default());

        Ok(())
    }

    #[test]
    fn decode_invalid_opcode() {
        let mut mem = StdMem::default();
        write_words!(mem : 4 => 19, 22, 7);

        assert_eq!(
            Instruction::decode(&mem, &Registers::default(), 5),
            Err(Fault::InvalidOpcode {
                word: 22,
                address: 5,
                previous: Some(19),
                next: Some(7),
            })
        );
    }

    #[test]
    fn decode_truncated_operands() {
        let mut mem = StdMem::default();
        write_words!(mem : 32766 => Opcode::Add, R0);

        assert_eq!(
            Instruction::decode(&mem, &Registers::default(), 32766),
            Err(Fault::PointerExhausted { pointer: 32768 })
        );
    }

    #[test]
    fn display_mnemonics() {
        let r0 = Register::new(0).unwrap();

        assert_eq!(Instruction::Halt.to_string(), "halt");
        assert_eq!(Instruction::Pop(r0).to_string(), "pop r0");
        assert_eq!(Instruction::Jt(1, 200).to_string(), "jt 1 200");
        assert_eq!(Opcode::Mult.to_string(), "mult");
    }
}
