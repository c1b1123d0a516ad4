use crate::memory::Word;

/// Unbounded LIFO shared by `push`/`pop` and `call`/`ret`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Stack {
    data: Vec<Word>,
}

impl Stack {
    pub fn push(&mut self, value: Word) {
        self.data.push(value);
    }

    /// `None` on an empty stack
    pub fn pop(&mut self) -> Option<Word> {
        self.data.pop()
    }

    pub fn peek(&self) -> Option<Word> {
        self.data.last().copied()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bottom first
    pub fn as_slice(&self) -> &[Word] {
        &self.data
    }
}
