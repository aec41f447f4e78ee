//! Courier type model built by the IDL compiler while parsing.
//!
//! Types are immutable once built. Constructors that encode a binary-format
//! limit check it up front and fail with a [CompilerError].

use std::fmt;

use crate::errors::CompilerError;

/// Largest element count a Courier sequence can carry (16-bit length prefix).
pub const MAX_SEQUENCE_SIZE: u64 = 65535;

/// Type kinds known to the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Boolean,
    Byte,
    Cardinal,
    LongCardinal,
    Integer,
    LongInteger,
    String,
    Unspecified,
    Unspecified2,
    Unspecified3,
    Array,
    Sequence,
    Reference,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Boolean => "BOOLEAN",
            Kind::Byte => "BYTE",
            Kind::Cardinal => "CARDINAL",
            Kind::LongCardinal => "LONG_CARDINAL",
            Kind::Integer => "INTEGER",
            Kind::LongInteger => "LONG_INTEGER",
            Kind::String => "STRING",
            Kind::Unspecified => "UNSPECIFIED",
            Kind::Unspecified2 => "UNSPECIFIED2",
            Kind::Unspecified3 => "UNSPECIFIED3",
            Kind::Array => "ARRAY",
            Kind::Sequence => "SEQUENCE",
            Kind::Reference => "REFERENCE",
        };

        f.write_str(name)
    }
}

/// A Courier type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Boolean,
    Byte,
    Cardinal,
    LongCardinal,
    Integer,
    LongInteger,
    String,
    Unspecified,
    Unspecified2,
    Unspecified3,
    Array(TypeArray),
    Sequence(TypeSequence),
    /// A type declared elsewhere, referred to by name.
    Reference(String),
}

impl Type {
    pub fn kind(&self) -> Kind {
        match self {
            Type::Boolean => Kind::Boolean,
            Type::Byte => Kind::Byte,
            Type::Cardinal => Kind::Cardinal,
            Type::LongCardinal => Kind::LongCardinal,
            Type::Integer => Kind::Integer,
            Type::LongInteger => Kind::LongInteger,
            Type::String => Kind::String,
            Type::Unspecified => Kind::Unspecified,
            Type::Unspecified2 => Kind::Unspecified2,
            Type::Unspecified3 => Kind::Unspecified3,
            Type::Array(_) => Kind::Array,
            Type::Sequence(_) => Kind::Sequence,
            Type::Reference(_) => Kind::Reference,
        }
    }

    /// Fixed size in 16-bit words when serialized, or `None` if the size depends
    /// on the value (strings, sequences) or on another declaration.
    pub fn word_size(&self) -> Option<u64> {
        match self {
            Type::Boolean
            | Type::Byte
            | Type::Cardinal
            | Type::Integer
            | Type::Unspecified => Some(1),
            Type::LongCardinal | Type::LongInteger | Type::Unspecified2 => Some(2),
            Type::Unspecified3 => Some(3),
            Type::Array(array) => array.word_size(),
            Type::String | Type::Sequence(_) | Type::Reference(_) => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Array(array) => fmt::Display::fmt(array, f),
            Type::Sequence(sequence) => fmt::Display::fmt(sequence, f),
            Type::Reference(name) => f.write_str(name),
            other => fmt::Display::fmt(&other.kind(), f),
        }
    }
}

/// Fixed-length array. The element count has no bound of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeArray {
    size: u64,
    element: Box<Type>,
}

impl TypeArray {
    pub fn new(size: u64, element: Type) -> Self {
        TypeArray {
            size,
            element: Box::new(element),
        }
    }

    /// Number of elements.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn element(&self) -> &Type {
        &self.element
    }

    pub fn word_size(&self) -> Option<u64> {
        self.element.word_size()?.checked_mul(self.size)
    }
}

impl From<TypeArray> for Type {
    fn from(value: TypeArray) -> Self {
        Type::Array(value)
    }
}

impl fmt::Display for TypeArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} ({}) {}]", Kind::Array, self.size, self.element)
    }
}

/// Variable-length sequence with an upper bound on its element count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSequence {
    max_size: u64,
    element: Box<Type>,
}

impl TypeSequence {
    /// Fails if `max_size` does not fit the 16-bit length prefix.
    pub fn new(max_size: u64, element: Type) -> Result<Self, CompilerError> {
        if max_size > MAX_SEQUENCE_SIZE {
            return Err(CompilerError::SequenceTooLong { size: max_size });
        }

        Ok(TypeSequence {
            max_size,
            element: Box::new(element),
        })
    }

    /// Sequence with the largest allowed bound.
    pub fn unbounded(element: Type) -> Self {
        TypeSequence {
            max_size: MAX_SEQUENCE_SIZE,
            element: Box::new(element),
        }
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    pub fn element(&self) -> &Type {
        &self.element
    }
}

impl From<TypeSequence> for Type {
    fn from(value: TypeSequence) -> Self {
        Type::Sequence(value)
    }
}

impl fmt::Display for TypeSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} ({}) {}]", Kind::Sequence, self.max_size, self.element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_display() {
        let array = TypeArray::new(4, Type::Cardinal);
        assert_eq!(array.to_string(), "[ARRAY (4) CARDINAL]");
        assert_eq!(Type::from(array).kind(), Kind::Array);
    }

    #[test]
    fn test_nested_array_display() {
        let inner = TypeArray::new(2, Type::Reference("Time".to_string()));
        let outer = TypeArray::new(3, inner.into());
        assert_eq!(outer.to_string(), "[ARRAY (3) [ARRAY (2) Time]]");
        assert_eq!(outer.element().kind(), Kind::Array);
    }

    #[test]
    fn test_array_has_no_size_bound() {
        let array = TypeArray::new(1 << 40, Type::Byte);
        assert_eq!(array.size(), 1 << 40);
    }

    #[test]
    fn test_word_size() {
        assert_eq!(Type::Boolean.word_size(), Some(1));
        assert_eq!(Type::LongCardinal.word_size(), Some(2));
        assert_eq!(Type::Unspecified3.word_size(), Some(3));
        assert_eq!(Type::String.word_size(), None);
        assert_eq!(Type::from(TypeArray::new(4, Type::LongInteger)).word_size(), Some(8));
        assert_eq!(TypeArray::new(4, Type::String).word_size(), None);
        assert_eq!(TypeArray::new(u64::MAX, Type::Unspecified2).word_size(), None);
    }

    #[test]
    fn test_sequence_bound() {
        let sequence = TypeSequence::new(65535, Type::Unspecified).unwrap();
        assert_eq!(sequence.to_string(), "[SEQUENCE (65535) UNSPECIFIED]");
        assert_eq!(
            TypeSequence::new(65536, Type::Unspecified).unwrap_err(),
            CompilerError::SequenceTooLong { size: 65536 }
        );
        assert_eq!(TypeSequence::unbounded(Type::Byte).max_size(), MAX_SEQUENCE_SIZE);
        assert_eq!(Type::from(sequence).word_size(), None);
    }
}
