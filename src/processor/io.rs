use std::io::{self, Write};

use crate::memory::{Byte, Word};

/// Character source for the `in` instruction.
///
/// Once a read starts the source must be able to deliver the rest of the line
/// (up to and including the newline) without asking again.
pub trait Input {
    /// The next character, or `None` if reading is not supported
    fn read_char(&mut self) -> Option<Byte>;
}

/// Input source that never delivers; every `in` faults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Unimplemented;

impl Input for Unimplemented {
    fn read_char(&mut self) -> Option<Byte> {
        None
    }
}

/// Append-only buffer filled by `out`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Output {
    buffer: Vec<Byte>,
}

impl Output {
    /// Appends the low byte of `value`
    pub fn push(&mut self, value: Word) {
        self.buffer.push((value & 0xFF) as Byte);
    }

    pub fn as_bytes(&self) -> &[Byte] {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Writes the buffered bytes to `writer` and empties the buffer
    pub fn flush<W: Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.buffer)?;
        writer.flush()?;
        self.buffer.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::Result;

    #[test]
    fn low_byte() {
        let mut output = Output::default();
        output.push(0x41);
        output.push(0x0142);

        assert_eq!(output.as_bytes(), b"AB");
    }

    #[test]
    fn flush_once() -> Result<()> {
        let mut output = Output::default();
        output.push(b'h' as Word);
        output.push(b'i' as Word);

        let mut sink = Vec::new();
        output.flush(&mut sink)?;
        output.flush(&mut sink)?;

        assert_eq!(sink, b"hi");
        assert!(output.is_empty());

        Ok(())
    }

    #[test]
    fn unimplemented_input() {
        assert_eq!(Unimplemented.read_char(), None);
    }
}
