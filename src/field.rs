//! Field descriptors and the generic accessor that reads and writes them.
//!
//! A [Field] is static metadata: where a member sits relative to its record's
//! base address and which bits of that word it owns. Every read and write in
//! the crate goes through [Field::get] and [Field::set], so masks and shifts
//! are computed in exactly one place.

use log::trace;

use crate::{
    bits,
    errors::AccessError,
    memory::{LongPointer, Memory, Word},
    record::Record,
};

/// Inclusive bit range `start_bit..=stop_bit` inside one word, MSB-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitRange {
    pub start_bit: u8,
    pub stop_bit: u8,
}

impl BitRange {
    pub const fn new(start_bit: u8, stop_bit: u8) -> Self {
        BitRange {
            start_bit,
            stop_bit,
        }
    }

    /// True if the range is ordered and lies within bits 0..=15.
    pub const fn is_valid(&self) -> bool {
        self.start_bit <= self.stop_bit && self.stop_bit <= bits::LAST_BIT
    }

    pub const fn width(&self) -> u8 {
        bits::width(self.start_bit, self.stop_bit)
    }

    pub const fn shift(&self) -> u8 {
        bits::shift(self.stop_bit)
    }

    pub const fn mask(&self) -> Word {
        bits::mask(self.start_bit, self.stop_bit)
    }
}

/// How a field occupies its word(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// The whole word, no masking.
    Word,
    /// A sub-word bit range. One-bit ranges double as booleans.
    Bits(BitRange),
    /// Another record laid out starting at the field's offset.
    Record(&'static Record),
}

/// A named member of a [Record] at a fixed word offset from the record base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    /// Words from the record base.
    pub offset: u32,
    pub kind: FieldKind,
}

#[cfg(feature = "serde")]
impl TryFrom<crate::serde::FieldDef> for Field {
    type Error = crate::errors::LayoutError;

    fn try_from(value: crate::serde::FieldDef) -> Result<Self, Self::Error> {
        use crate::serde::FieldKindDef;

        let kind = match value.kind {
            FieldKindDef::Word => FieldKind::Word,
            FieldKindDef::Bits {
                start_bit,
                stop_bit,
            } => FieldKind::Bits(BitRange::new(start_bit, stop_bit)),
            FieldKindDef::Flag { bit } => FieldKind::Bits(BitRange::new(bit, bit)),
            FieldKindDef::Record { record } => FieldKind::Record(record.compile()?),
        };

        Ok(Field {
            name: value.name.leak(),
            offset: value.offset,
            kind,
        })
    }
}

impl Field {
    /// A full-word member.
    pub const fn word(name: &'static str, offset: u32) -> Self {
        Field {
            name,
            offset,
            kind: FieldKind::Word,
        }
    }

    /// A sub-word member covering `start_bit..=stop_bit` of word `offset`.
    pub const fn bits(name: &'static str, offset: u32, start_bit: u8, stop_bit: u8) -> Self {
        Field {
            name,
            offset,
            kind: FieldKind::Bits(BitRange::new(start_bit, stop_bit)),
        }
    }

    /// A one-bit boolean member.
    pub const fn flag(name: &'static str, offset: u32, bit: u8) -> Self {
        Field::bits(name, offset, bit, bit)
    }

    /// A member whose layout is another record.
    pub const fn record(name: &'static str, offset: u32, record: &'static Record) -> Self {
        Field {
            name,
            offset,
            kind: FieldKind::Record(record),
        }
    }

    /// Number of words the field spans.
    pub const fn span(&self) -> u32 {
        match self.kind {
            FieldKind::Word | FieldKind::Bits(_) => 1,
            FieldKind::Record(record) => record.size,
        }
    }

    /// Width of the stored value in bits, `None` for multi-word records.
    pub const fn width(&self) -> Option<u8> {
        match self.kind {
            FieldKind::Bits(range) => Some(range.width()),
            FieldKind::Word => Some(bits::WORD_BITS),
            FieldKind::Record(record) if record.size == 1 => Some(bits::WORD_BITS),
            FieldKind::Record(_) => None,
        }
    }

    /// Address of the field's first word; the base of a nested record.
    pub const fn offset(&self, base: LongPointer) -> LongPointer {
        base.wrapping_add(self.offset)
    }

    /// Mask and shift of the value within its word. A nested record that fits
    /// in one word is accessed as a full word.
    fn placement(&self) -> Result<(Word, u8), AccessError> {
        match self.kind {
            FieldKind::Bits(range) => Ok((range.mask(), range.shift())),
            FieldKind::Word => Ok((Word::MAX, 0)),
            FieldKind::Record(record) if record.size == 1 => Ok((Word::MAX, 0)),
            FieldKind::Record(_) => Err(AccessError::CompositeField(self.name.to_string())),
        }
    }

    /// Reads the field of the record at `base`, normalised to bit position 0.
    pub fn get<M: Memory + ?Sized>(&self, mem: &M, base: LongPointer) -> Result<Word, AccessError> {
        let (mask, shift) = self.placement()?;
        let word = mem.read_word(self.offset(base))?;

        Ok(bits::extract(word, mask, shift))
    }

    /// Writes the field of the record at `base`, leaving every other bit of the
    /// word untouched. High bits of `value` that do not fit are discarded.
    pub fn set<M: Memory + ?Sized>(
        &self,
        mem: &mut M,
        base: LongPointer,
        value: Word,
    ) -> Result<(), AccessError> {
        let (mask, shift) = self.placement()?;
        let address = self.offset(base);

        if mask == Word::MAX {
            mem.write_word(address, value)?;
            return Ok(());
        }

        if value & !(mask >> shift) != 0 {
            trace!(
                "truncating {:#x} to {} bits for field `{}`",
                value,
                mask.count_ones(),
                self.name
            );
        }

        let word = mem.read_word(address)?;
        mem.write_word(address, bits::deposit(word, mask, shift, value))?;

        Ok(())
    }

    /// Like [Field::set], but rejects values wider than the field without
    /// touching memory.
    pub fn set_checked<M: Memory + ?Sized>(
        &self,
        mem: &mut M,
        base: LongPointer,
        value: Word,
    ) -> Result<(), AccessError> {
        let width = self
            .width()
            .ok_or_else(|| AccessError::CompositeField(self.name.to_string()))?;

        if value > bits::max_value(width) {
            return Err(AccessError::ValueTooWide { value, width });
        }

        self.set(mem, base, value)
    }

    pub fn get_bool<M: Memory + ?Sized>(
        &self,
        mem: &M,
        base: LongPointer,
    ) -> Result<bool, AccessError> {
        Ok(self.get(mem, base)? != 0)
    }

    pub fn set_bool<M: Memory + ?Sized>(
        &self,
        mem: &mut M,
        base: LongPointer,
        value: bool,
    ) -> Result<(), AccessError> {
        self.set(mem, base, value as Word)
    }
}
