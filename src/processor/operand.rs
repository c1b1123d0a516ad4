//! Operand resolution.
//!
//! Raw words `0..=32767` are literals, `32768..=32775` name the registers
//! `r0..=r7`. Values are resolved through [`Resolver::value`], destinations
//! through [`Resolver::register`].

use std::fmt;

use crate::memory::{Memory, Word};
use crate::outcome::Fault;

/// First raw word that names a register. Also the arithmetic modulus.
pub const REGISTER_BASE: Word = 0x8000;
pub const REGISTER_COUNT: usize = 8;

pub const R0: Word = REGISTER_BASE;
pub const R1: Word = REGISTER_BASE + 1;
pub const R2: Word = REGISTER_BASE + 2;
pub const R3: Word = REGISTER_BASE + 3;
pub const R4: Word = REGISTER_BASE + 4;
pub const R5: Word = REGISTER_BASE + 5;
pub const R6: Word = REGISTER_BASE + 6;
pub const R7: Word = REGISTER_BASE + 7;

/// Index of one of the eight registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Register(u8);

impl Register {
    pub fn new(index: u8) -> Option<Self> {
        if (index as usize) < REGISTER_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Address resolution: the raw word modulo 32768 taken as register index
    pub fn from_raw(raw: Word) -> Option<Self> {
        let index = raw % REGISTER_BASE;
        if (index as usize) < REGISTER_COUNT {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// A raw operand word, tagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    Literal(Word),
    Register(Register),
}

impl Operand {
    /// Words above the register range are malformed and pass through as literals.
    pub fn from_raw(raw: Word) -> Self {
        match raw.checked_sub(REGISTER_BASE) {
            Some(index) if (index as usize) < REGISTER_COUNT => {
                Operand::Register(Register(index as u8))
            }
            _ => Operand::Literal(raw),
        }
    }

    pub fn resolve(self, registers: &Registers) -> Word {
        match self {
            Operand::Literal(value) => value,
            Operand::Register(register) => registers.get(register),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(value) => write!(f, "{}", value),
            Operand::Register(register) => write!(f, "{}", register),
        }
    }
}

/// The register file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Registers([Word; REGISTER_COUNT]);

impl Registers {
    pub fn get(&self, register: Register) -> Word {
        self.0[register.index()]
    }

    pub fn set(&mut self, register: Register, value: Word) {
        self.0[register.index()] = value;
    }

    pub fn as_slice(&self) -> &[Word] {
        &self.0
    }
}

/// Reads operands one word at a time, starting at `pointer`
#[derive(Debug)]
pub struct Resolver<'a, const S: usize> {
    memory: &'a Memory<S>,
    registers: &'a Registers,
    pointer: usize,
}

impl<'a, const S: usize> Resolver<'a, S> {
    pub fn new(memory: &'a Memory<S>, registers: &'a Registers, pointer: usize) -> Self {
        Self {
            memory,
            registers,
            pointer,
        }
    }

    /// Address of the next word to be read
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Reads the raw word at the pointer and advances past it
    pub fn fetch(&mut self) -> Result<Word, Fault> {
        let raw = self
            .memory
            .read_word(self.pointer)
            .ok_or(Fault::PointerExhausted {
                pointer: self.pointer,
            })?;
        self.pointer += 1;
        Ok(raw)
    }

    /// Value resolution
    pub fn value(&mut self) -> Result<Word, Fault> {
        Ok(Operand::from_raw(self.fetch()?).resolve(self.registers))
    }

    /// Address resolution, for destination operands
    pub fn register(&mut self) -> Result<Register, Fault> {
        let address = self.pointer;
        let raw = self.fetch()?;
        Register::from_raw(raw).ok_or(Fault::InvalidRegister { raw, address })
    }
}

#[cfg(test)]
mod tests {
    use crate::memory::StdMem;
    use crate::write_words;

    use super::*;
    use color_eyre::eyre::Result;

    #[test]
    fn tag_operands() {
        assert_eq!(Operand::from_raw(0), Operand::Literal(0));
        assert_eq!(Operand::from_raw(32767), Operand::Literal(32767));
        assert_eq!(Operand::from_raw(R0), Operand::Register(Register(0)));
        assert_eq!(Operand::from_raw(R7), Operand::Register(Register(7)));
        assert_eq!(Operand::from_raw(32776), Operand::Literal(32776));
        assert_eq!(Operand::from_raw(0xFFFF), Operand::Literal(0xFFFF));
    }

    #[test]
    fn destination_registers() {
        assert_eq!(Register::from_raw(R3), Some(Register(3)));
        assert_eq!(Register::from_raw(3), Some(Register(3)));
        assert_eq!(Register::from_raw(R7 + 1), None);
        assert_eq!(Register::new(8), None);
    }

    #[test]
    fn resolve_values() -> Result<()> {
        let mut mem = StdMem::default();
        let mut registers = Registers::default();
        registers.set(Register(2), 1234);
        write_words!(mem : 10 => 42, R2, R2);

        let mut resolver = Resolver::new(&mem, &registers, 10);
        assert_eq!(resolver.value()?, 42);
        assert_eq!(resolver.value()?, 1234);
        assert_eq!(resolver.register()?, Register(2));
        assert_eq!(resolver.pointer(), 13);

        Ok(())
    }

    #[test]
    fn resolve_invalid_register() {
        let mut mem = StdMem::default();
        let registers = Registers::default();
        write_words!(mem : 0 => R7 + 1);

        let mut resolver = Resolver::new(&mem, &registers, 0);
        assert_eq!(
            resolver.register(),
            Err(Fault::InvalidRegister {
                raw: R7 + 1,
                address: 0
            })
        );
    }

    #[test]
    fn resolve_past_memory() {
        let mem = StdMem::default();
        let registers = Registers::default();

        let mut resolver = Resolver::new(&mem, &registers, 32768);
        assert_eq!(
            resolver.value(),
            Err(Fault::PointerExhausted { pointer: 32768 })
        );
    }

    #[test]
    fn display() {
        assert_eq!(Operand::from_raw(R5).to_string(), "r5");
        assert_eq!(Operand::from_raw(65).to_string(), "65");
    }
}
