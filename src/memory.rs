use std::fmt;

pub mod image;

pub type Byte = u8; // 1 byte
pub type Word = u16; // 2 bytes

/// Number of addressable words (15 bit address space)
pub const MEMORY_SIZE: usize = 0x8000;

/// Default memory
pub type StdMem = Memory<MEMORY_SIZE>;

/// Emulates the word addressed memory the program lives in
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Memory<const S: usize> {
    /// The actual data of the memory
    pub data: Box<[Word]>,
}

impl<const S: usize> Default for Memory<S> {
    /// Initializes the memory with zeroes
    fn default() -> Self {
        Memory {
            data: vec![0; S].into_boxed_slice(),
        }
    }
}

impl<const S: usize> fmt::Debug for Memory<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memory")
            .field("size", &S)
            .field("used", &self.used())
            .finish()
    }
}

impl<const S: usize> Memory<S> {
    /// Number of addressable words
    pub const fn size(&self) -> usize {
        S
    }

    /// Reads a word, `None` if `position` is outside of the memory
    pub fn read_word(&self, position: usize) -> Option<Word> {
        self.data.get(position).copied()
    }

    /// Writes a word. Returns `None` if `position` is outside of the memory.
    pub fn write_word(&mut self, position: usize, value: Word) -> Option<()> {
        let cell = self.data.get_mut(position)?;
        *cell = value;
        Some(())
    }

    /// Writes an array of words to the memory
    ///
    /// # Panics
    ///
    /// Panics if the array does not fit behind `position`.
    pub fn write_array(&mut self, position: usize, data: &[Word]) {
        self.data[position..position + data.len()].copy_from_slice(data);
    }

    /// Length of the populated region, up to and including the last non zero word
    pub fn used(&self) -> usize {
        self.data
            .iter()
            .rposition(|&word| word != 0)
            .map_or(0, |last| last + 1)
    }
}

/// Writes a block of words directly into the memory
#[macro_export]
macro_rules! write_words {
    ( $mem:ident : $pos:expr => $( $word:expr ),+ $(,)? ) => {
        $mem.write_array($pos, &[
            $(
                $word as $crate::memory::Word,
            )+
        ]);
    };
}
