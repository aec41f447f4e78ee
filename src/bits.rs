//! Low-level mask and shift arithmetic for 16-bit words.
//!
//! Bits are numbered MSB-first: bit 0 is the high bit of the word and bit 15
//! the low bit, as in the Mesa processor documentation.

use crate::memory::Word;

/// Number of bits in a [Word].
pub const WORD_BITS: u8 = 16;

/// Highest valid bit number.
pub const LAST_BIT: u8 = WORD_BITS - 1;

/// Width of the inclusive range `start..=stop`.
pub const fn width(start_bit: u8, stop_bit: u8) -> u8 {
    stop_bit.saturating_sub(start_bit).saturating_add(1)
}

/// Right shift that moves bit `stop_bit` down to bit position 0 of an integer.
pub const fn shift(stop_bit: u8) -> u8 {
    LAST_BIT.saturating_sub(stop_bit)
}

/// In-word mask of the inclusive range `start..=stop`.
pub const fn mask(start_bit: u8, stop_bit: u8) -> Word {
    max_value(width(start_bit, stop_bit)) << shift(stop_bit)
}

/// Reads the masked bits of `word`, normalised to start at bit position 0.
pub const fn extract(word: Word, mask: Word, shift: u8) -> Word {
    (word & mask) >> shift
}

/// Replaces the masked bits of `word` with `value`. Bits of `value` that do not
/// fit under `mask` are dropped; bits outside `mask` are kept.
pub const fn deposit(word: Word, mask: Word, shift: u8, value: Word) -> Word {
    (((value as u32) << shift) as Word & mask) | (word & !mask)
}

/// Largest value a field of `width` bits can hold.
pub const fn max_value(width: u8) -> Word {
    if width >= WORD_BITS {
        Word::MAX
    } else {
        (1 << width) - 1
    }
}
