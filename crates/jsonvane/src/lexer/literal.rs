use crate::{Error, Result, cursor::Cursor};

/// The three JSON keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    Null,
    True,
    False,
}

impl Literal {
    /// The literal a value starting with `first` must be, if any.
    #[must_use]
    pub fn from_first(first: u8) -> Option<Self> {
        match first {
            b'n' => Some(Self::Null),
            b't' => Some(Self::True),
            b'f' => Some(Self::False),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::Null => b"null",
            Self::True => b"true",
            Self::False => b"false",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::True => "true",
            Self::False => "false",
        }
    }
}

/// Consumes `literal` at the cursor, checking every byte.
///
/// A mismatch is reported at the offset of the offending byte; running out
/// of input is reported as an unexpected end at the offset where it ran out.
///
/// # Errors
///
/// [`Error::Syntax`] on a mismatched byte, [`Error::UnexpectedEnd`] on
/// truncated input.
pub fn expect_literal<C: Cursor + ?Sized>(c: &mut C, literal: Literal) -> Result<()> {
    for &want in literal.as_bytes() {
        match c.peek()? {
            Some(b) if b == want => c.consume(1),
            Some(b) => return Err(Error::invalid_character(b, literal.name(), c.offset())),
            None => return Err(Error::unexpected_end(literal.name(), c.offset())),
        }
    }
    Ok(())
}

/// Consumes a `null` literal at the cursor.
///
/// # Errors
///
/// See [`expect_literal`].
#[inline]
pub fn expect_null<C: Cursor + ?Sized>(c: &mut C) -> Result<()> {
    expect_literal(c, Literal::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        DecodeOptions, SyntaxError,
        cursor::{Buffered, Context},
    };

    fn run(input: &[u8], literal: Literal) -> Result<usize> {
        let mut ctx = Context::new(input, DecodeOptions::default());
        let mut c = Buffered::new(&mut ctx, 0);
        expect_literal(&mut c, literal)?;
        Ok(c.position())
    }

    #[test]
    fn consumes_exactly_the_literal() {
        assert_eq!(run(b"null,", Literal::Null).unwrap(), 4);
        assert_eq!(run(b"false]", Literal::False).unwrap(), 5);
    }

    #[test]
    fn mismatch_points_at_offending_byte() {
        match run(b"nul!", Literal::Null) {
            Err(Error::Syntax {
                source: SyntaxError::InvalidCharacter { byte: b'!', context: "null" },
                offset: 3,
            }) => {}
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn truncated_literal_is_unexpected_end() {
        let err = run(b"tr", Literal::True).unwrap_err();
        assert!(err.is_eof());
        assert_eq!(err.offset(), Some(2));
    }
}
