use alloc::string::String;
use core::fmt;

use bstr::{BStr, BString};
use thiserror::Error;

/// Shorthand for results produced by the decode engine.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// An error produced while decoding, compacting or compiling a path.
///
/// Every variant that can be tied to the input carries the byte offset at
/// which the problem was detected. In stream mode that offset counts every
/// byte read from the source, not the position in the working buffer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("syntax error at offset {offset}: {source}")]
    Syntax { source: SyntaxError, offset: usize },

    #[error("unexpected end of JSON input while reading {context} at offset {offset}")]
    UnexpectedEnd { context: &'static str, offset: usize },

    #[error(transparent)]
    UnmarshalType(#[from] UnmarshalTypeError),

    #[error("exceeded max depth at offset {offset} (character {})", ByteRepr(*.byte))]
    ExceededMaxDepth { byte: u8, offset: usize },

    /// An error returned by a custom text-decoding hook.
    #[error("{0}")]
    Custom(String),

    #[error("invalid path {path:?} at offset {offset}: {reason}")]
    InvalidPath {
        path: String,
        offset: usize,
        reason: &'static str,
    },

    #[cfg(feature = "std")]
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),
}

/// The kind of malformed input behind an [`Error::Syntax`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("invalid character {} in {context}", ByteRepr(*.byte))]
    InvalidCharacter { byte: u8, context: &'static str },
    #[error("expected {0}")]
    Expected(&'static str),
    #[error("invalid string literal {0:?}")]
    InvalidString(BString),
    #[error("invalid character {} after top-level value", ByteRepr(*.0))]
    TrailingData(u8),
    #[error("{0}")]
    Message(String),
}

/// A JSON value of the wrong kind for the target type.
///
/// `struct_name` and `field` are filled in when the failing decoder was
/// built for a struct field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub struct UnmarshalTypeError {
    /// Description of the JSON value, e.g. `"array"` or `"number 300"`.
    pub value: String,
    /// Name of the Rust type that was being decoded into.
    pub type_name: &'static str,
    pub offset: usize,
    pub struct_name: Option<String>,
    pub field: Option<String>,
}

impl fmt::Display for UnmarshalTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.struct_name, &self.field) {
            (Some(s), Some(field)) => write!(
                f,
                "cannot unmarshal {} into field {s}.{field} of type {}",
                self.value, self.type_name
            ),
            _ => write!(
                f,
                "cannot unmarshal {} into value of type {}",
                self.value, self.type_name
            ),
        }
    }
}

impl UnmarshalTypeError {
    pub(crate) fn new(value: impl Into<String>, type_name: &'static str, offset: usize) -> Self {
        Self {
            value: value.into(),
            type_name,
            offset,
            struct_name: None,
            field: None,
        }
    }
}

/// Renders a single input byte the way error messages quote it.
struct ByteRepr(u8);

impl fmt::Display for ByteRepr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", BStr::new(&[self.0]))
    }
}

impl Error {
    /// Byte offset at which the error was detected, when the error is tied
    /// to a position in the input.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Syntax { offset, .. }
            | Self::UnexpectedEnd { offset, .. }
            | Self::ExceededMaxDepth { offset, .. }
            | Self::InvalidPath { offset, .. } => Some(*offset),
            Self::UnmarshalType(e) => Some(e.offset),
            Self::Custom(_) => None,
            #[cfg(feature = "std")]
            Self::Io(_) => None,
        }
    }

    /// Creates an error for a custom text-decoding hook.
    pub fn custom(msg: impl fmt::Display) -> Self {
        Self::Custom(alloc::format!("{msg}"))
    }

    /// Returns `true` if the lexer ran off the end of the available input.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::UnexpectedEnd { .. })
    }

    pub(crate) fn syntax(source: SyntaxError, offset: usize) -> Self {
        Self::Syntax { source, offset }
    }

    pub(crate) fn expected(what: &'static str, offset: usize) -> Self {
        Self::syntax(SyntaxError::Expected(what), offset)
    }

    pub(crate) fn invalid_character(byte: u8, context: &'static str, offset: usize) -> Self {
        Self::syntax(SyntaxError::InvalidCharacter { byte, context }, offset)
    }

    pub(crate) fn unexpected_end(context: &'static str, offset: usize) -> Self {
        Self::UnexpectedEnd { context, offset }
    }

    pub(crate) fn exceeded_max_depth(byte: u8, offset: usize) -> Self {
        tracing::debug!(target: "jsonvane::decode", offset, "max nesting depth exceeded");
        Self::ExceededMaxDepth { byte, offset }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn offsets_are_exposed_for_positional_errors() {
        assert_eq!(Error::expected("colon after object key", 7).offset(), Some(7));
        assert_eq!(Error::unexpected_end("null", 3).offset(), Some(3));
        assert_eq!(Error::custom("boom").offset(), None);
    }

    #[test]
    fn invalid_byte_is_quoted_legibly() {
        let err = Error::invalid_character(0xFF, "null", 2);
        insta::assert_snapshot!(err.to_string(), @r#"syntax error at offset 2: invalid character "\xff" in null"#);
    }

    #[test]
    fn unmarshal_type_error_names_the_field() {
        let mut e = UnmarshalTypeError::new("array", "Color", 0);
        assert_eq!(e.to_string(), "cannot unmarshal array into value of type Color");
        e.struct_name = Some("Paint".into());
        e.field = Some("color".into());
        assert_eq!(
            e.to_string(),
            "cannot unmarshal array into field Paint.color of type Color"
        );
    }
}
