//! String scanning and unescaping.
//!
//! [`skip_string`] finds the end of a quoted string without interpreting
//! it. [`unquote`] turns the raw, quote-delimited bytes into text, borrowing
//! the input when nothing needs rewriting.

use alloc::{borrow::Cow, string::String};

use crate::{Error, Result, cursor::Cursor};

const REPLACEMENT: char = '\u{FFFD}';

/// Consumes a quoted string at the cursor, including both quotes.
///
/// Escapes are stepped over but not validated; [`unquote`] does that.
///
/// # Errors
///
/// [`Error::Syntax`] if the cursor is not at `"`, [`Error::UnexpectedEnd`]
/// if the closing quote is missing.
pub fn skip_string<C: Cursor + ?Sized>(c: &mut C) -> Result<()> {
    match c.peek()? {
        Some(b'"') => c.consume(1),
        Some(b) => return Err(Error::invalid_character(b, "string", c.offset())),
        None => return Err(Error::unexpected_end("string", c.offset())),
    }
    let mut escaped = false;
    loop {
        let buf = c.fill_buf()?;
        if buf.is_empty() {
            return Err(Error::unexpected_end("string", c.offset()));
        }
        let mut n = 0;
        let mut closed = false;
        for &b in buf {
            n += 1;
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                closed = true;
                break;
            }
        }
        c.consume(n);
        if closed {
            return Ok(());
        }
    }
}

/// Decodes the four hex digits of a `\uXXXX` escape starting at `s[0]`.
fn getu4(s: &[u8]) -> Option<u32> {
    let [b'\\', b'u', digits @ ..] = s.get(..6)? else {
        return None;
    };
    digits
        .iter()
        .try_fold(0u32, |acc, &d| Some((acc << 4) | hex_val(d)?))
}

/// Convert a single ASCII hex digit into its 0..=15 value.
#[inline]
fn hex_val(c: u8) -> Option<u32> {
    match c {
        b'0'..=b'9' => Some(u32::from(c - b'0')),
        b'a'..=b'f' => Some(u32::from(c - b'a') + 10),
        b'A'..=b'F' => Some(u32::from(c - b'A') + 10),
        _ => None,
    }
}

fn is_surrogate(r: u32) -> bool {
    (0xD800..0xE000).contains(&r)
}

/// Combines a UTF-16 surrogate pair, or returns `None` if the two units do
/// not form one.
fn decode_surrogates(hi: u32, lo: u32) -> Option<char> {
    if (0xD800..0xDC00).contains(&hi) && (0xDC00..0xE000).contains(&lo) {
        char::from_u32(0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00))
    } else {
        None
    }
}

/// Unescapes a quote-delimited JSON string.
///
/// Returns the input itself (minus the quotes) when it has no escapes, no
/// control characters and is valid UTF-8. Otherwise the text is rebuilt:
/// simple escapes (including the non-standard `\'`) map to their byte,
/// `\uXXXX` escapes are decoded with surrogate pairs combined, and an
/// unpaired surrogate or malformed UTF-8 becomes U+FFFD.
///
/// Returns `None` when the input is not a valid string literal: missing
/// quotes, an unknown escape, a raw control character or an unescaped quote.
#[must_use]
pub fn unquote(s: &[u8]) -> Option<Cow<'_, str>> {
    let [b'"', body @ .., b'"'] = s else {
        return None;
    };

    let special = body
        .iter()
        .position(|&b| b == b'\\' || b == b'"' || b < b' ')
        .unwrap_or(body.len());
    let valid_up_to = match core::str::from_utf8(body) {
        Ok(text) if special == body.len() => return Some(Cow::Borrowed(text)),
        Ok(_) => body.len(),
        Err(e) => e.valid_up_to(),
    };
    let mut r = special.min(valid_up_to);

    let mut out = String::with_capacity(body.len() + 8);
    out.push_str(core::str::from_utf8(&body[..r]).ok()?);
    while r < body.len() {
        match body[r] {
            b'\\' => {
                r += 1;
                let simple = match *body.get(r)? {
                    b @ (b'"' | b'\\' | b'/' | b'\'') => b as char,
                    b'b' => '\u{8}',
                    b'f' => '\u{c}',
                    b'n' => '\n',
                    b'r' => '\r',
                    b't' => '\t',
                    b'u' => {
                        let unit = getu4(&body[r - 1..])?;
                        r += 5;
                        if is_surrogate(unit) {
                            let pair = getu4(&body[r..]).and_then(|lo| decode_surrogates(unit, lo));
                            if let Some(ch) = pair {
                                r += 6;
                                out.push(ch);
                            } else {
                                out.push(REPLACEMENT);
                            }
                        } else {
                            out.push(char::from_u32(unit)?);
                        }
                        continue;
                    }
                    _ => return None,
                };
                out.push(simple);
                r += 1;
            }
            b'"' | 0..=0x1F => return None,
            b if b.is_ascii() => {
                out.push(b as char);
                r += 1;
            }
            _ => {
                let (ch, size) = bstr::decode_utf8(&body[r..]);
                out.push(ch.unwrap_or(REPLACEMENT));
                r += size;
            }
        }
    }
    Some(Cow::Owned(out))
}
