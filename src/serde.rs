//! JSON-deserializable record layout descriptions.
//!
//! These types describe the *shape* of machine-dependent records so an emulator
//! can ship layouts as data files. [RecordDef::compile] turns a description into
//! a validated [Record] that lives for the rest of the process, exactly like the
//! built-in tables in [crate::layouts].

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    errors::LayoutError,
    field::{BitRange, Field, FieldKind},
    memory::Word,
    record::{Footprint, Record, check_layout},
};

/// A record: name, size in words, and its fields.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RecordDef {
    pub name: String,
    /// Size of the record in words.
    pub size: u32,
    pub fields: Vec<FieldDef>,
}

/// A single member of a record.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    /// Word offset from the record base.
    pub offset: u32,
    pub kind: FieldKindDef,
}

/// How a member occupies its word(s).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum FieldKindDef {
    /// Whole word.
    Word,
    /// Inclusive bit range, bit 0 being the most significant bit.
    Bits { start_bit: u8, stop_bit: u8 },
    /// Single-bit boolean.
    Flag { bit: u8 },
    /// Nested record starting at the member's offset.
    Record { record: RecordDef },
}

impl RecordDef {
    /// Validates the description and builds the record. The compiled layout is
    /// leaked: layouts are loaded once and shared for the life of the process.
    /// A rejected description is checked in place and leaks nothing.
    pub fn compile(self) -> Result<&'static Record, LayoutError> {
        self.check()?;

        let name = self.name;
        let fields = self
            .fields
            .into_iter()
            .map(Field::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let record: &'static Record =
            Box::leak(Box::new(Record::new(name.leak(), self.size, fields.leak())));

        debug!("compiled layout `{}` from description", record.name);

        Ok(record)
    }

    /// Runs the same checks as [Record::validate] on the description itself.
    fn check<'a>(&'a self) -> Result<(), LayoutError> {
        let footprints = self.fields.iter().map(|field| -> Result<Footprint<'a>, LayoutError> {
            let (span, mask) = match &field.kind {
                FieldKindDef::Word => (1, Some(Word::MAX)),
                FieldKindDef::Bits {
                    start_bit,
                    stop_bit,
                } => (1, valid_mask(BitRange::new(*start_bit, *stop_bit))),
                FieldKindDef::Flag { bit } => (1, valid_mask(BitRange::new(*bit, *bit))),
                FieldKindDef::Record { record } => {
                    record.check()?;
                    (record.size, Some(Word::MAX))
                }
            };

            Ok(Footprint {
                name: &field.name,
                offset: field.offset,
                span,
                mask,
            })
        });

        check_layout(&self.name, self.size, footprints)
    }
}

fn valid_mask(range: BitRange) -> Option<Word> {
    range.is_valid().then_some(range.mask())
}

impl From<&Record> for RecordDef {
    fn from(record: &Record) -> Self {
        RecordDef {
            name: record.name.to_string(),
            size: record.size,
            fields: record.fields.iter().map(FieldDef::from).collect(),
        }
    }
}

impl From<&Field> for FieldDef {
    fn from(field: &Field) -> Self {
        let kind = match field.kind {
            FieldKind::Word => FieldKindDef::Word,
            FieldKind::Bits(range) if range.start_bit == range.stop_bit => FieldKindDef::Flag {
                bit: range.start_bit,
            },
            FieldKind::Bits(range) => FieldKindDef::Bits {
                start_bit: range.start_bit,
                stop_bit: range.stop_bit,
            },
            FieldKind::Record(record) => FieldKindDef::Record {
                record: record.into(),
            },
        };

        FieldDef {
            name: field.name.to_string(),
            offset: field.offset,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{layouts::GLOBAL_OVERHEAD, memory::WordMemory};

    use super::*;

    const CONDITION_JSON: &str = r#"{
        "name": "Condition",
        "size": 1,
        "fields": [
            { "name": "tail", "offset": 0, "kind": { "type": "Bits", "start_bit": 3, "stop_bit": 12 } },
            { "name": "abortable", "offset": 0, "kind": { "type": "Flag", "bit": 14 } },
            { "name": "wakeup", "offset": 0, "kind": { "type": "Flag", "bit": 15 } }
        ]
    }"#;

    #[test]
    fn test_compile_from_json() {
        let def: RecordDef = serde_json::from_str(CONDITION_JSON).unwrap();
        let record = def.compile().unwrap();

        assert_eq!(record.name, "Condition");
        assert_eq!(record.fields.len(), 3);

        let mut mem = WordMemory::new(1);
        record.set(&mut mem, 0, "tail", 0x3FF).unwrap();
        record.set_bool(&mut mem, 0, "wakeup", true).unwrap();
        assert_eq!(mem.as_slice(), &[0b0001_1111_1111_1001]);
    }

    #[test]
    fn test_compile_rejects_overlap() {
        let def: RecordDef = serde_json::from_str(
            r#"{
                "name": "Broken",
                "size": 1,
                "fields": [
                    { "name": "a", "offset": 0, "kind": { "type": "Bits", "start_bit": 0, "stop_bit": 8 } },
                    { "name": "b", "offset": 0, "kind": { "type": "Flag", "bit": 8 } }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(
            def.compile().unwrap_err(),
            LayoutError::OverlappingBits {
                first: "a".to_string(),
                second: "b".to_string(),
                offset: 0
            }
        );
    }

    #[test]
    fn test_builtin_layout_describes_itself() {
        let def = RecordDef::from(&GLOBAL_OVERHEAD);
        let json = serde_json::to_string(&def).unwrap();
        let parsed: RecordDef = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, def);

        let record = parsed.compile().unwrap();
        assert_eq!(*record, GLOBAL_OVERHEAD);
    }

    #[test]
    fn test_compile_huge_size() {
        let def: RecordDef =
            serde_json::from_str(r#"{ "name": "Huge", "size": 4000000000, "fields": [] }"#).unwrap();

        assert_eq!(
            def.compile().unwrap_err(),
            LayoutError::SizeMismatch {
                record: "Huge".to_string(),
                declared: 4_000_000_000,
                computed: 0
            }
        );
    }

    #[test]
    fn test_compile_rejects_nested_description() {
        let def: RecordDef = serde_json::from_str(
            r#"{
                "name": "Outer",
                "size": 2,
                "fields": [
                    { "name": "head", "offset": 0, "kind": { "type": "Word" } },
                    { "name": "tail", "offset": 1, "kind": { "type": "Record", "record": {
                        "name": "Tail",
                        "size": 1,
                        "fields": [
                            { "name": "bad", "offset": 0, "kind": { "type": "Bits", "start_bit": 12, "stop_bit": 4 } }
                        ]
                    } } }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(
            def.compile().unwrap_err(),
            LayoutError::InvalidBitRange {
                field: "bad".to_string()
            }
        );
    }

    #[test]
    fn test_description_check_matches_validate() {
        let mut def = RecordDef::from(&GLOBAL_OVERHEAD);
        assert_eq!(def.check(), Ok(()));

        def.fields[0].offset = 1;
        assert_eq!(
            def.check(),
            Err(LayoutError::SharedWord {
                field: "word".to_string(),
                offset: 1
            })
        );
    }
}
