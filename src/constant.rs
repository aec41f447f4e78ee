//! Courier constants: literal values appearing in IDL source.

use std::fmt;

use crate::errors::CompilerError;

/// Longest string constant, in UTF-16 code units. The wire format prefixes a
/// string with a 16-bit length.
pub const MAX_STRING_LENGTH: usize = 65535;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantKind {
    Boolean,
    Number,
    String,
}

impl fmt::Display for ConstantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConstantKind::Boolean => "BOOLEAN",
            ConstantKind::Number => "NUMBER",
            ConstantKind::String => "STRING",
        })
    }
}

/// A literal constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constant {
    Boolean(bool),
    Number(i64),
    String(ConstantString),
}

impl Constant {
    pub fn kind(&self) -> ConstantKind {
        match self {
            Constant::Boolean(_) => ConstantKind::Boolean,
            Constant::Number(_) => ConstantKind::Number,
            Constant::String(_) => ConstantKind::String,
        }
    }
}

impl From<ConstantString> for Constant {
    fn from(value: ConstantString) -> Self {
        Constant::String(value)
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Boolean(true) => f.write_str("TRUE"),
            Constant::Boolean(false) => f.write_str("FALSE"),
            Constant::Number(value) => write!(f, "{value}"),
            Constant::String(value) => fmt::Display::fmt(value, f),
        }
    }
}

/// A string literal.
///
/// A doubled quote (`""`) in the source text is the IDL's escape for a quote
/// character. It is stored as `\"`, the form the code generator emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantString {
    value: String,
}

impl ConstantString {
    /// Builds a string constant from the literal's source text (without the
    /// surrounding quotes). Fails if the text is absent or longer than
    /// [MAX_STRING_LENGTH] after escapes are folded.
    pub fn new(source: Option<&str>) -> Result<Self, CompilerError> {
        let source = source.ok_or(CompilerError::NullValue)?;
        let value = source.replace("\"\"", "\\\"");

        let length = value.encode_utf16().count();
        if length > MAX_STRING_LENGTH {
            return Err(CompilerError::ValueTooLong { length });
        }

        Ok(ConstantString { value })
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl TryFrom<&str> for ConstantString {
    type Error = CompilerError;

    fn try_from(source: &str) -> Result<Self, Self::Error> {
        ConstantString::new(Some(source))
    }
}

impl fmt::Display for ConstantString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doubled_quote_folds() {
        let constant = ConstantString::try_from(r#"a""b"#).unwrap();
        assert_eq!(constant.value(), r#"a\"b"#);
        assert_eq!(constant.to_string(), r#""a\"b""#);
    }

    #[test]
    fn test_null_value() {
        let err = ConstantString::new(None).unwrap_err();
        assert_eq!(err, CompilerError::NullValue);
        assert_eq!(err.to_string(), "value is null");
    }

    #[test]
    fn test_length_limit() {
        let longest = "x".repeat(65535);
        assert_eq!(ConstantString::try_from(longest.as_str()).unwrap().value().len(), 65535);

        let too_long = "x".repeat(65536);
        let err = ConstantString::try_from(too_long.as_str()).unwrap_err();
        assert_eq!(err, CompilerError::ValueTooLong { length: 65536 });
        assert_eq!(err.to_string(), "Length of value is too long. length = 65536");
    }

    #[test]
    fn test_length_counted_after_folding() {
        let source = "\"\"".repeat(32767) + "a";
        assert_eq!(ConstantString::try_from(source.as_str()).unwrap().value().len(), 65535);

        let source = "\"\"".repeat(32768);
        assert_eq!(
            ConstantString::try_from(source.as_str()).unwrap_err(),
            CompilerError::ValueTooLong { length: 65536 }
        );
    }

    #[test]
    fn test_length_in_utf16_units() {
        let source = "\u{1F600}".repeat(32768);
        assert_eq!(
            ConstantString::try_from(source.as_str()).unwrap_err(),
            CompilerError::ValueTooLong { length: 65536 }
        );
    }

    #[test]
    fn test_constant_display() {
        assert_eq!(Constant::Boolean(true).to_string(), "TRUE");
        assert_eq!(Constant::Number(-12).to_string(), "-12");

        let string: Constant = ConstantString::try_from("hi").unwrap().into();
        assert_eq!(string.kind(), ConstantKind::String);
        assert_eq!(string.to_string(), "\"hi\"");
    }
}
