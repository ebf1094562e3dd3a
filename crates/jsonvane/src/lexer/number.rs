use crate::{Error, Result, cursor::Cursor};

/// Lexical hint so decoders can tell integers from floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    /// No fraction and no exponent.
    Integer,
    /// Has a fraction or an exponent.
    Float,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Minus,
    Zero,
    Int,
    Dot,
    Frac,
    Exp,
    ExpSign,
    ExpDigits,
}

impl State {
    fn accepts(self) -> bool {
        matches!(self, Self::Zero | Self::Int | Self::Frac | Self::ExpDigits)
    }

    fn step(self, b: u8) -> Option<Self> {
        Some(match (self, b) {
            (Self::Start, b'-') => Self::Minus,
            (Self::Start | Self::Minus, b'0') => Self::Zero,
            (Self::Start | Self::Minus, b'1'..=b'9') => Self::Int,
            (Self::Int, b'0'..=b'9') => Self::Int,
            (Self::Zero | Self::Int, b'.') => Self::Dot,
            (Self::Dot | Self::Frac, b'0'..=b'9') => Self::Frac,
            (Self::Zero | Self::Int | Self::Frac, b'e' | b'E') => Self::Exp,
            (Self::Exp, b'+' | b'-') => Self::ExpSign,
            (Self::Exp | Self::ExpSign | Self::ExpDigits, b'0'..=b'9') => Self::ExpDigits,
            _ => return None,
        })
    }
}

/// Bytes that can appear anywhere in a number token.
#[inline]
#[must_use]
pub fn is_number_byte(b: u8) -> bool {
    matches!(b, b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E')
}

/// Consumes a number token at the cursor and checks it against the JSON
/// number grammar.
///
/// Scanning is greedy over number bytes, so `01` or `1.2.3` are rejected at
/// the first byte that breaks the grammar rather than split into two tokens.
///
/// # Errors
///
/// [`Error::Syntax`] at the offending byte, or [`Error::UnexpectedEnd`] when
/// the input stops inside the token (for example after `-` or `1e`).
pub fn scan_number<C: Cursor + ?Sized>(c: &mut C) -> Result<NumberKind> {
    let mut state = State::Start;
    let mut float = false;
    loop {
        let base = c.offset();
        let buf = c.fill_buf()?;
        if buf.is_empty() {
            break;
        }
        let mut n = 0;
        let mut done = false;
        for &b in buf {
            if !is_number_byte(b) {
                done = true;
                break;
            }
            match state.step(b) {
                Some(next) => {
                    float |= matches!(next, State::Dot | State::Exp);
                    state = next;
                    n += 1;
                }
                None => {
                    return Err(Error::invalid_character(b, "numeric literal", base + n));
                }
            }
        }
        c.consume(n);
        if done {
            break;
        }
    }

    if state.accepts() {
        Ok(if float {
            NumberKind::Float
        } else {
            NumberKind::Integer
        })
    } else {
        match c.peek()? {
            Some(b) => Err(Error::invalid_character(b, "numeric literal", c.offset())),
            None => Err(Error::unexpected_end("number", c.offset())),
        }
    }
}
