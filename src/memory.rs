//! Word-addressed memory seen by the overlay engine.
//!
//! The engine never owns memory. It reads and writes whole 16-bit words through
//! the [Memory] trait, so an emulator can plug in paged or mapped storage.

use crate::errors::MemoryError;

/// A 16-bit storage unit, the addressable unit of the emulated machine.
pub type Word = u16;

/// A word-granular address ("long pointer"). Adding 1 advances one word.
pub type LongPointer = u32;

/// Raw word access supplied by the host.
pub trait Memory {
    /// Reads the word at `address`.
    fn read_word(&self, address: LongPointer) -> Result<Word, MemoryError>;

    /// Overwrites the word at `address` with `value`.
    fn write_word(&mut self, address: LongPointer, value: Word) -> Result<(), MemoryError>;
}

impl Memory for [Word] {
    fn read_word(&self, address: LongPointer) -> Result<Word, MemoryError> {
        self.get(address as usize)
            .copied()
            .ok_or(MemoryError::OutOfBounds { address })
    }

    fn write_word(&mut self, address: LongPointer, value: Word) -> Result<(), MemoryError> {
        let slot = self
            .get_mut(address as usize)
            .ok_or(MemoryError::OutOfBounds { address })?;
        *slot = value;

        Ok(())
    }
}

/// Flat, zero-initialised memory backed by a `Vec<Word>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordMemory {
    words: Vec<Word>,
}

impl WordMemory {
    /// Allocates `len` words, all zero.
    pub fn new(len: usize) -> Self {
        WordMemory {
            words: vec![0; len],
        }
    }

    /// Number of addressable words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True if no word is addressable.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The words in address order.
    pub fn as_slice(&self) -> &[Word] {
        &self.words
    }
}

impl From<Vec<Word>> for WordMemory {
    fn from(words: Vec<Word>) -> Self {
        WordMemory { words }
    }
}

impl Memory for WordMemory {
    fn read_word(&self, address: LongPointer) -> Result<Word, MemoryError> {
        self.words.as_slice().read_word(address)
    }

    fn write_word(&mut self, address: LongPointer, value: Word) -> Result<(), MemoryError> {
        self.words.as_mut_slice().write_word(address, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write_word() {
        let mut mem = WordMemory::new(4);
        mem.write_word(2, 0xBEEF).unwrap();
        assert_eq!(mem.read_word(2).unwrap(), 0xBEEF);
        assert_eq!(mem.as_slice(), &[0, 0, 0xBEEF, 0]);
    }

    #[test]
    fn test_read_out_of_bounds() {
        let mem = WordMemory::new(4);
        assert_eq!(
            mem.read_word(4).unwrap_err(),
            MemoryError::OutOfBounds { address: 4 }
        );
    }

    #[test]
    fn test_write_out_of_bounds() {
        let mut words = [0u16; 2];
        assert_eq!(
            words.as_mut_slice().write_word(7, 1).unwrap_err(),
            MemoryError::OutOfBounds { address: 7 }
        );
        assert_eq!(words, [0, 0]);
    }
}
