//! Record layouts: ordered field tables overlaid on word-addressed memory.
//!
//! A [Record] is built in `const` context from [Field] descriptors, checked once
//! with [Record::validate], and then used to read and write members of any
//! record instance by passing that instance's base address. Members of nested
//! records are addressed with dotted paths such as `"word.gfi"`.

use std::{collections::BTreeMap, ptr};

use log::debug;

use crate::{
    errors::{AccessError, LayoutError},
    field::{Field, FieldKind},
    memory::{LongPointer, Memory, Word},
};

/// A machine-dependent record: total size in words and its member fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub name: &'static str,
    /// Size in words.
    pub size: u32,
    /// Fields in declaration order.
    pub fields: &'static [Field],
}

impl Record {
    pub const fn new(name: &'static str, size: u32, fields: &'static [Field]) -> Self {
        Record { name, size, fields }
    }

    /// Looks up a direct member by name.
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Resolves a dotted path to the leaf field and the word offset, from this
    /// record's base, of the record that directly contains it.
    pub fn resolve(&self, path: &str) -> Result<(u32, &'static Field), AccessError> {
        let unknown = || AccessError::UnknownField(path.to_string());

        let mut segments = path.split('.');
        let mut record = *self;
        let mut offset = 0u32;
        let mut field = segments
            .next()
            .and_then(|name| record.field(name))
            .ok_or_else(unknown)?;

        for name in segments {
            let FieldKind::Record(inner) = field.kind else {
                return Err(unknown());
            };

            offset = offset.wrapping_add(field.offset);
            record = *inner;
            field = record.field(name).ok_or_else(unknown)?;
        }

        Ok((offset, field))
    }

    /// Address of the member at `path` for the record at `base`. For a nested
    /// record member this is the base of the nested record.
    pub fn offset(&self, base: LongPointer, path: &str) -> Result<LongPointer, AccessError> {
        let (offset, field) = self.resolve(path)?;
        Ok(field.offset(base.wrapping_add(offset)))
    }

    pub fn get<M: Memory + ?Sized>(
        &self,
        mem: &M,
        base: LongPointer,
        path: &str,
    ) -> Result<Word, AccessError> {
        let (offset, field) = self.resolve(path)?;
        field.get(mem, base.wrapping_add(offset))
    }

    pub fn set<M: Memory + ?Sized>(
        &self,
        mem: &mut M,
        base: LongPointer,
        path: &str,
        value: Word,
    ) -> Result<(), AccessError> {
        let (offset, field) = self.resolve(path)?;
        field.set(mem, base.wrapping_add(offset), value)
    }

    pub fn set_checked<M: Memory + ?Sized>(
        &self,
        mem: &mut M,
        base: LongPointer,
        path: &str,
        value: Word,
    ) -> Result<(), AccessError> {
        let (offset, field) = self.resolve(path)?;
        field.set_checked(mem, base.wrapping_add(offset), value)
    }

    pub fn get_bool<M: Memory + ?Sized>(
        &self,
        mem: &M,
        base: LongPointer,
        path: &str,
    ) -> Result<bool, AccessError> {
        let (offset, field) = self.resolve(path)?;
        field.get_bool(mem, base.wrapping_add(offset))
    }

    pub fn set_bool<M: Memory + ?Sized>(
        &self,
        mem: &mut M,
        base: LongPointer,
        path: &str,
        value: bool,
    ) -> Result<(), AccessError> {
        let (offset, field) = self.resolve(path)?;
        field.set_bool(mem, base.wrapping_add(offset), value)
    }

    /// Checks the layout invariants: well-formed bit ranges, unique names, no
    /// two fields claiming the same bit, every field inside the record, and a
    /// declared size equal to the number of words the fields occupy. Nested
    /// records are validated too.
    ///
    /// `static` tables may refer to each other, so a record can end up nested
    /// inside itself. Such a layout has no finite size and is rejected with
    /// [LayoutError::RecursiveRecord].
    pub fn validate(&self) -> Result<(), LayoutError> {
        self.validate_within(&mut Vec::new())
    }

    /// `active` holds the records whose validation is in progress further up
    /// the nesting chain.
    fn validate_within<'a>(&'a self, active: &mut Vec<&'a Record>) -> Result<(), LayoutError> {
        if active.iter().any(|record| ptr::eq(*record, self)) {
            return Err(LayoutError::RecursiveRecord {
                record: self.name.to_string(),
            });
        }
        active.push(self);

        let footprints = self.fields.iter().map(|field| -> Result<Footprint<'static>, LayoutError> {
            let mask = match field.kind {
                FieldKind::Bits(range) => range.is_valid().then_some(range.mask()),
                FieldKind::Record(inner) => {
                    inner.validate_within(active)?;
                    Some(Word::MAX)
                }
                FieldKind::Word => Some(Word::MAX),
            };

            Ok(Footprint {
                name: field.name,
                offset: field.offset,
                span: field.span(),
                mask,
            })
        });
        check_layout(self.name, self.size, footprints)?;

        active.pop();

        debug!(
            "layout `{}` validated: {} words, {} fields",
            self.name,
            self.size,
            self.fields.len()
        );

        Ok(())
    }
}

/// The words and bits one member claims.
pub(crate) struct Footprint<'a> {
    pub name: &'a str,
    pub offset: u32,
    pub span: u32,
    /// Bits claimed in every spanned word, `None` if the bit range is malformed.
    pub mask: Option<Word>,
}

/// Checks a record's members against each other and against its declared
/// size. Only words some member covers are tracked, so the cost follows the
/// members and not the declared size.
pub(crate) fn check_layout<'a>(
    record: &str,
    size: u32,
    footprints: impl IntoIterator<Item = Result<Footprint<'a>, LayoutError>>,
) -> Result<(), LayoutError> {
    let mut names: Vec<&'a str> = Vec::new();
    let mut words: BTreeMap<u32, Vec<(&'a str, Word)>> = BTreeMap::new();

    for footprint in footprints {
        let Footprint {
            name,
            offset,
            span,
            mask,
        } = footprint?;

        if name.is_empty() {
            return Err(LayoutError::InvalidFieldName {
                record: record.to_string(),
            });
        }

        if names.contains(&name) {
            return Err(LayoutError::DuplicateField {
                record: record.to_string(),
                field: name.to_string(),
            });
        }
        names.push(name);

        let Some(mask) = mask else {
            return Err(LayoutError::InvalidBitRange {
                field: name.to_string(),
            });
        };

        let end = match offset.checked_add(span) {
            Some(end) if end <= size => end,
            _ => {
                return Err(LayoutError::FieldOutsideRecord {
                    field: name.to_string(),
                });
            }
        };

        for word in offset..end {
            let occupants = words.entry(word).or_default();

            if let Some((other, other_mask)) =
                occupants.iter().find(|(_, other_mask)| other_mask & mask != 0)
            {
                if mask == Word::MAX || *other_mask == Word::MAX {
                    return Err(LayoutError::SharedWord {
                        field: name.to_string(),
                        offset: word,
                    });
                }

                return Err(LayoutError::OverlappingBits {
                    first: other.to_string(),
                    second: name.to_string(),
                    offset: word,
                });
            }

            occupants.push((name, mask));
        }
    }

    let computed = words.len() as u32;
    if computed != size {
        return Err(LayoutError::SizeMismatch {
            record: record.to_string(),
            declared: size,
            computed,
        });
    }

    Ok(())
}
