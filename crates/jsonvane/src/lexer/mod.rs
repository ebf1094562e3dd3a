//! Lexical primitives shared by every decoder and by the compactor.
//!
//! All routines are generic over [`Cursor`], so the same code runs in buffer
//! and stream mode. None of them materialize values; they validate and
//! step over input, leaving interpretation to the caller.

mod literal;
mod number;
mod string;

pub use literal::{Literal, expect_literal, expect_null};
pub use number::{NumberKind, is_number_byte, scan_number};
pub use string::{skip_string, unquote};

use crate::{Error, Result, SyntaxError, cursor::Cursor};

/// The four whitespace bytes JSON allows between tokens.
pub static WHITESPACE: [bool; 256] = {
    let mut table = [false; 256];
    table[b' ' as usize] = true;
    table[b'\t' as usize] = true;
    table[b'\n' as usize] = true;
    table[b'\r' as usize] = true;
    table
};

/// Consumes whitespace and returns the next byte without consuming it, or
/// `None` at end of input.
///
/// # Errors
///
/// Propagates failures of the underlying source.
#[inline]
pub fn skip_whitespace<C: Cursor + ?Sized>(c: &mut C) -> Result<Option<u8>> {
    loop {
        let buf = c.fill_buf()?;
        let Some(n) = buf.iter().position(|&b| !WHITESPACE[b as usize]) else {
            if buf.is_empty() {
                return Ok(None);
            }
            let len = buf.len();
            c.consume(len);
            continue;
        };
        let next = buf[n];
        c.consume(n);
        return Ok(Some(next));
    }
}

/// Increments `depth` on entry to an object or array, failing once it
/// exceeds the cursor's ceiling.
///
/// # Errors
///
/// [`Error::ExceededMaxDepth`] naming the byte at the cursor.
#[inline]
pub fn enter<C: Cursor + ?Sized>(c: &mut C, depth: usize) -> Result<usize> {
    let depth = depth + 1;
    if depth > c.max_depth() {
        return Err(too_deep(c));
    }
    Ok(depth)
}

#[cold]
#[inline(never)]
fn too_deep<C: Cursor + ?Sized>(c: &mut C) -> Error {
    let byte = match c.peek() {
        Ok(byte) => byte.unwrap_or(0),
        Err(e) => return e,
    };
    tracing::debug!(target: "jsonvane::decode", offset = c.offset(), max_depth = c.max_depth(), "nesting ceiling reached");
    Error::exceeded_max_depth(byte, c.offset())
}

/// Skips whitespace and consumes `want`, or fails with "expected `what`".
///
/// # Errors
///
/// [`Error::Syntax`] on any other byte, [`Error::UnexpectedEnd`] at end of
/// input.
pub fn expect_byte<C: Cursor + ?Sized>(c: &mut C, want: u8, what: &'static str) -> Result<()> {
    match skip_whitespace(c)? {
        Some(b) if b == want => {
            c.consume(1);
            Ok(())
        }
        Some(_) => Err(Error::expected(what, c.offset())),
        None => Err(Error::unexpected_end(what, c.offset())),
    }
}

/// Describes the JSON value starting with `first` for unmarshal-type
/// errors, or `None` if no value can start with that byte.
#[must_use]
pub fn value_kind(first: u8) -> Option<&'static str> {
    Some(match first {
        b'{' => "object",
        b'[' => "array",
        b'"' => "string",
        b't' | b'f' => "bool",
        b'n' => "null",
        b'-' | b'0'..=b'9' => "number",
        _ => return None,
    })
}

/// Error for a byte that cannot start a value.
pub(crate) fn invalid_value_start(byte: u8, offset: usize) -> Error {
    Error::invalid_character(byte, "looking for beginning of value", offset)
}

/// Consumes one complete JSON value without materializing it.
///
/// Containers are walked structurally and count towards the depth ceiling.
///
/// # Errors
///
/// Any syntax error inside the value, [`Error::UnexpectedEnd`] on truncated
/// input, [`Error::ExceededMaxDepth`] on excessive nesting.
pub fn skip_value<C: Cursor + ?Sized>(c: &mut C, depth: usize) -> Result<()> {
    let Some(first) = skip_whitespace(c)? else {
        return Err(Error::unexpected_end("value", c.offset()));
    };
    match first {
        b'{' => {
            let depth = enter(c, depth)?;
            c.consume(1);
            if skip_whitespace(c)? == Some(b'}') {
                c.consume(1);
                return Ok(());
            }
            loop {
                skip_whitespace(c)?;
                skip_string(c)?;
                expect_byte(c, b':', "colon after object key")?;
                skip_value(c, depth)?;
                match skip_whitespace(c)? {
                    Some(b',') => c.consume(1),
                    Some(b'}') => {
                        c.consume(1);
                        return Ok(());
                    }
                    Some(_) => return Err(Error::expected("comma after object value", c.offset())),
                    None => return Err(Error::unexpected_end("object", c.offset())),
                }
            }
        }
        b'[' => {
            let depth = enter(c, depth)?;
            c.consume(1);
            if skip_whitespace(c)? == Some(b']') {
                c.consume(1);
                return Ok(());
            }
            loop {
                skip_value(c, depth)?;
                match skip_whitespace(c)? {
                    Some(b',') => c.consume(1),
                    Some(b']') => {
                        c.consume(1);
                        return Ok(());
                    }
                    Some(_) => return Err(Error::expected("comma after array value", c.offset())),
                    None => return Err(Error::unexpected_end("array", c.offset())),
                }
            }
        }
        b'"' => skip_string(c),
        b'-' | b'0'..=b'9' => scan_number(c).map(drop),
        b => match Literal::from_first(b) {
            Some(literal) => expect_literal(c, literal),
            None => Err(invalid_value_start(b, c.offset())),
        },
    }
}

/// Consumes the remaining members of an object whose opening brace and
/// at least one member have already been read, up to and including `}`.
///
/// # Errors
///
/// As [`skip_value`].
pub fn skip_object_rest<C: Cursor + ?Sized>(c: &mut C, depth: usize) -> Result<()> {
    loop {
        match skip_whitespace(c)? {
            Some(b'}') => {
                c.consume(1);
                return Ok(());
            }
            Some(b',') => {
                c.consume(1);
                skip_whitespace(c)?;
                skip_string(c)?;
                expect_byte(c, b':', "colon after object key")?;
                skip_value(c, depth)?;
            }
            Some(_) => return Err(Error::expected("comma after object value", c.offset())),
            None => return Err(Error::unexpected_end("object", c.offset())),
        }
    }
}

/// Checks that only whitespace follows the top-level value.
///
/// # Errors
///
/// [`SyntaxError::TrailingData`] at the first non-whitespace byte.
pub fn expect_end<C: Cursor + ?Sized>(c: &mut C) -> Result<()> {
    match skip_whitespace(c)? {
        None => Ok(()),
        Some(b) => Err(Error::syntax(SyntaxError::TrailingData(b), c.offset())),
    }
}
