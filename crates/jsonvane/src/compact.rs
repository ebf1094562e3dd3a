//! Minifying copy of JSON text with optional HTML-safe escaping.
//!
//! The compactor is a recursive-descent pass of its own, independent of
//! the decoders, but built on the same lexical primitives, so it validates
//! exactly the grammar the decoders accept.

use alloc::{format, vec::Vec};

use crate::{
    CompactOptions, DecodeOptions, Error, Result, SyntaxError,
    cursor::{Buffered, Context, Cursor},
    decoder::peek_value,
    lexer::{
        Literal, enter, expect_byte, expect_end, expect_literal, invalid_value_start, scan_number, skip_whitespace,
    },
};

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Bytes rewritten as `\u00XX` when HTML-safe escaping is on.
pub static HTML_ESCAPE: [bool; 256] = {
    let mut table = [false; 256];
    table[b'<' as usize] = true;
    table[b'>' as usize] = true;
    table[b'&' as usize] = true;
    table
};

/// Appends the minified form of `src` to `dst`.
///
/// With `escape` set, `<`, `>` and `&` inside strings become `\u003c`,
/// `\u003e` and `\u0026`, and U+2028/U+2029 become `\u2028`/`\u2029`.
///
/// ```
/// let mut out = Vec::new();
/// jsonvane::compact(&mut out, br#"{ "a" : 1 , "b" : [ true , null ] }"#, false)?;
/// assert_eq!(out, br#"{"a":1,"b":[true,null]}"#);
/// # Ok::<(), jsonvane::Error>(())
/// ```
///
/// # Errors
///
/// Any syntax error in `src`, reported at its offset. `dst` is left as it
/// was.
pub fn compact(dst: &mut Vec<u8>, src: &[u8], escape: bool) -> Result<()> {
    let options = CompactOptions {
        escape_html: escape,
        ..CompactOptions::default()
    };
    compact_with(dst, src, &options)
}

/// As [`compact`], with a configurable nesting ceiling.
///
/// # Errors
///
/// Any syntax error in `src`, trailing non-whitespace after the value, or
/// nesting beyond [`CompactOptions::max_depth`]. `dst` is left as it was.
pub fn compact_with(dst: &mut Vec<u8>, src: &[u8], options: &CompactOptions) -> Result<()> {
    let decode_options = DecodeOptions {
        max_depth: options.max_depth,
        ..DecodeOptions::default()
    };
    let mut ctx = Context::new(src, decode_options);
    let mut c = Buffered::new(&mut ctx, 0);
    let mut out = Vec::with_capacity(src.len());
    compact_cursor(&mut c, &mut out, options.escape_html)?;
    tracing::trace!(target: "jsonvane::compact", input = src.len(), output = out.len(), "compacted");
    dst.append(&mut out);
    Ok(())
}

/// Compacts the single document at `c` into `out`, trailing check included.
pub(crate) fn compact_cursor<C: Cursor + ?Sized>(c: &mut C, out: &mut Vec<u8>, escape: bool) -> Result<()> {
    let mut w = Compactor { out, escape };
    w.value(c, 0)?;
    expect_end(c)
}

struct Compactor<'o> {
    out: &'o mut Vec<u8>,
    escape: bool,
}

impl Compactor<'_> {
    fn value<C: Cursor + ?Sized>(&mut self, c: &mut C, depth: usize) -> Result<()> {
        match peek_value(c)? {
            b'{' => self.object(c, depth),
            b'[' => self.array(c, depth),
            b'"' => self.string(c),
            b'-' | b'0'..=b'9' => self.number(c),
            b => match Literal::from_first(b) {
                Some(literal) => {
                    expect_literal(c, literal)?;
                    self.out.extend_from_slice(literal.as_bytes());
                    Ok(())
                }
                None => Err(invalid_value_start(b, c.offset())),
            },
        }
    }

    /// Copies a number, rejecting literals outside the range of `f64`.
    fn number<C: Cursor + ?Sized>(&mut self, c: &mut C) -> Result<()> {
        let start = c.offset();
        c.begin_capture();
        let copied = scan_number(c).and_then(|_| {
            let text = core::str::from_utf8(c.captured()).unwrap_or_default();
            match text.parse::<f64>() {
                Ok(n) if n.is_finite() => {
                    self.out.extend_from_slice(text.as_bytes());
                    Ok(())
                }
                _ => Err(Error::syntax(SyntaxError::Message(format!("number {text} is out of range")), start)),
            }
        });
        c.end_capture();
        copied
    }

    fn object<C: Cursor + ?Sized>(&mut self, c: &mut C, depth: usize) -> Result<()> {
        let depth = enter(c, depth)?;
        c.consume(1);
        self.out.push(b'{');
        if skip_whitespace(c)? == Some(b'}') {
            c.consume(1);
            self.out.push(b'}');
            return Ok(());
        }
        loop {
            match skip_whitespace(c)? {
                Some(b'"') => self.string(c)?,
                Some(b) => return Err(Error::invalid_character(b, "object key", c.offset())),
                None => return Err(Error::unexpected_end("object key", c.offset())),
            }
            expect_byte(c, b':', "colon after object key")?;
            self.out.push(b':');
            self.value(c, depth)?;
            match skip_whitespace(c)? {
                Some(b',') => {
                    c.consume(1);
                    self.out.push(b',');
                }
                Some(b'}') => {
                    c.consume(1);
                    self.out.push(b'}');
                    return Ok(());
                }
                Some(_) => return Err(Error::expected("comma after object value", c.offset())),
                None => return Err(Error::unexpected_end("object", c.offset())),
            }
        }
    }

    fn array<C: Cursor + ?Sized>(&mut self, c: &mut C, depth: usize) -> Result<()> {
        let depth = enter(c, depth)?;
        c.consume(1);
        self.out.push(b'[');
        if skip_whitespace(c)? == Some(b']') {
            c.consume(1);
            self.out.push(b']');
            return Ok(());
        }
        loop {
            self.value(c, depth)?;
            match skip_whitespace(c)? {
                Some(b',') => {
                    c.consume(1);
                    self.out.push(b',');
                }
                Some(b']') => {
                    c.consume(1);
                    self.out.push(b']');
                    return Ok(());
                }
                Some(_) => return Err(Error::expected("comma after array value", c.offset())),
                None => return Err(Error::unexpected_end("array", c.offset())),
            }
        }
    }

    /// Copies a string in spans, breaking only at quotes, escapes, control
    /// characters and, when escaping, HTML-sensitive bytes.
    fn string<C: Cursor + ?Sized>(&mut self, c: &mut C) -> Result<()> {
        c.consume(1);
        self.out.push(b'"');
        let escape = self.escape;
        loop {
            let offset = c.offset();
            let buf = c.fill_buf()?;
            if buf.is_empty() {
                return Err(Error::unexpected_end("string", offset));
            }
            let stop = buf.iter().position(|&b| {
                b == b'"' || b == b'\\' || b < b' ' || escape && (HTML_ESCAPE[b as usize] || b == 0xE2)
            });
            let span = stop.unwrap_or(buf.len());
            self.out.extend_from_slice(&buf[..span]);
            let special = stop.map(|i| buf[i]);
            c.consume(span);

            match special {
                None => {}
                Some(b'"') => {
                    c.consume(1);
                    self.out.push(b'"');
                    return Ok(());
                }
                Some(b'\\') => self.escape_sequence(c)?,
                Some(0xE2) => self.line_separator(c)?,
                Some(b) if HTML_ESCAPE[b as usize] => {
                    c.consume(1);
                    self.out
                        .extend_from_slice(&[b'\\', b'u', b'0', b'0', HEX[usize::from(b >> 4)], HEX[usize::from(b & 0xF)]]);
                }
                Some(b) => return Err(Error::invalid_character(b, "string literal", c.offset())),
            }
        }
    }

    fn escape_sequence<C: Cursor + ?Sized>(&mut self, c: &mut C) -> Result<()> {
        c.consume(1);
        match c.peek()? {
            Some(b @ (b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't')) => {
                c.consume(1);
                self.out.extend_from_slice(&[b'\\', b]);
            }
            Some(b'u') => {
                c.consume(1);
                self.out.extend_from_slice(b"\\u");
                for _ in 0..4 {
                    match c.peek()? {
                        Some(h) if h.is_ascii_hexdigit() => {
                            c.consume(1);
                            self.out.push(h);
                        }
                        Some(h) => return Err(Error::invalid_character(h, "\\u hexadecimal character escape", c.offset())),
                        None => return Err(Error::unexpected_end("string", c.offset())),
                    }
                }
            }
            Some(b) => return Err(Error::invalid_character(b, "string escape code", c.offset())),
            None => return Err(Error::unexpected_end("string", c.offset())),
        }
        Ok(())
    }

    /// Handles a 0xE2 lead byte, which may start U+2028 or U+2029.
    fn line_separator<C: Cursor + ?Sized>(&mut self, c: &mut C) -> Result<()> {
        c.consume(1);
        if c.peek()? != Some(0x80) {
            self.out.push(0xE2);
            return Ok(());
        }
        c.consume(1);
        match c.peek()? {
            Some(b @ (0xA8 | 0xA9)) => {
                c.consume(1);
                self.out.extend_from_slice(b"\\u202");
                self.out.push(HEX[usize::from(b & 0xF)]);
            }
            _ => self.out.extend_from_slice(&[0xE2, 0x80]),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec};

    use rstest::rstest;

    use super::*;
    use crate::{SyntaxError, cursor::ChunkSource, cursor::Stream};

    fn run(src: &str, escape: bool) -> Result<String> {
        let mut out = Vec::new();
        compact(&mut out, src.as_bytes(), escape)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn minifies() {
        assert_eq!(
            run(r#"{ "a" : 1 , "b" : [ true , null ] }"#, false).unwrap(),
            r#"{"a":1,"b":[true,null]}"#
        );
        assert_eq!(run("\n[ ]\t", false).unwrap(), "[]");
        assert_eq!(run(r#" "x y" "#, false).unwrap(), r#""x y""#);
    }

    #[test]
    fn escapes_html_sensitive_characters() {
        let src = "\"<script>a&b</script>\u{2028}\u{2029}é\"";
        insta::assert_snapshot!(
            run(src, true).unwrap(),
            @r#""\u003cscript\u003ea\u0026b\u003c/script\u003e\u2028\u2029é""#
        );
        assert_eq!(run(src, false).unwrap(), src);
    }

    #[test]
    fn escapes_are_copied_verbatim() {
        let src = r#"["\"\\\/\b\f\n\r\té"]"#;
        assert_eq!(run(src, true).unwrap(), src);
    }

    #[rstest]
    #[case("", 0)]
    #[case(r#"{"a" 1}"#, 5)]
    #[case(r#"{"a":1 "b":2}"#, 7)]
    #[case("[1 2]", 3)]
    #[case("[1.]", 3)]
    #[case("01", 1)]
    #[case(r#""\x""#, 2)]
    #[case(r#""\u12g4""#, 5)]
    #[case("\"a\tb\"", 2)]
    #[case("nul", 3)]
    #[case("{} {}", 3)]
    #[case("}", 0)]
    fn errors_point_at_the_offending_byte(#[case] src: &str, #[case] offset: usize) {
        assert_eq!(run(src, false).unwrap_err().offset(), Some(offset));
    }

    #[test]
    fn trailing_data_is_named() {
        let err = run("[] x", false).unwrap_err();
        assert!(matches!(
            err,
            Error::Syntax {
                source: SyntaxError::TrailingData(b'x'),
                offset: 3
            }
        ));
    }

    #[test]
    fn destination_untouched_on_error() {
        let mut out = b"prefix".to_vec();
        assert!(compact(&mut out, br#"{"a":[1,2}"#, false).is_err());
        assert_eq!(out, b"prefix");
        compact(&mut out, b" 1 ", false).unwrap();
        assert_eq!(out, b"prefix1");
    }

    #[test]
    fn nesting_is_bounded() {
        let options = CompactOptions {
            max_depth: 2,
            ..CompactOptions::default()
        };
        let mut out = Vec::new();
        compact_with(&mut out, b"[[1]]", &options).unwrap();
        let err = compact_with(&mut out, b"[[[1]]]", &options).unwrap_err();
        assert!(matches!(err, Error::ExceededMaxDepth { byte: b'[', offset: 2 }));
    }

    #[test]
    fn separators_split_across_chunks() {
        let src = "\"a\u{2028}b\u{2029}\"".as_bytes();
        for split in 1..src.len() {
            let (head, tail) = src.split_at(split);
            let mut chunks = ChunkSource::new(vec![head, tail]);
            let mut s = Stream::new(&mut chunks, &DecodeOptions::default());
            let mut out = Vec::new();
            compact_cursor(&mut s, &mut out, true).unwrap();
            assert_eq!(out, br#""a\u2028b\u2029""#, "split at {split}");
        }
    }
}
