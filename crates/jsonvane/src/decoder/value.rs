use alloc::sync::Arc;

use super::{Decoder, DecoderKind, DecoderRef, cursor_methods, peek_value, read_string, select_member};
use crate::{
    Array, Error, Map, Result, UnmarshalTypeError, Value,
    cursor::{Buffered, Context, Cursor},
    lexer::{Literal, enter, expect_byte, expect_literal, invalid_value_start, scan_number, skip_value, skip_whitespace},
};

/// Decodes any JSON value into a dynamic [`Value`].
///
/// Objects and arrays replace the target wholesale. Numbers are parsed as
/// `f64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueDecoder;

impl ValueDecoder {
    #[must_use]
    pub fn shared() -> DecoderRef<Value> {
        Arc::new(Self)
    }

    fn decode_value<C: Cursor + ?Sized>(&self, c: &mut C, depth: usize, target: &mut Value) -> Result<()> {
        *target = match peek_value(c)? {
            b'{' => Value::Object(self.members(c, depth)?),
            b'[' => Value::Array(self.elements(c, depth)?),
            b'"' => Value::String(read_string(c)?),
            b => scalar(c, b)?,
        };
        Ok(())
    }

    /// Members of the object at the cursor.
    fn members<C: Cursor + ?Sized>(&self, c: &mut C, depth: usize) -> Result<Map> {
        let depth = enter(c, depth)?;
        c.consume(1);
        let mut map = Map::new();
        if skip_whitespace(c)? == Some(b'}') {
            c.consume(1);
            return Ok(map);
        }
        loop {
            match skip_whitespace(c)? {
                Some(b'"') => {}
                Some(b) => return Err(Error::invalid_character(b, "object key", c.offset())),
                None => return Err(Error::unexpected_end("object key", c.offset())),
            }
            let key = read_string(c)?;
            expect_byte(c, b':', "colon after object key")?;
            let mut value = Value::Null;
            self.decode_value(c, depth, &mut value)?;
            map.insert(key, value);
            match skip_whitespace(c)? {
                Some(b',') => c.consume(1),
                Some(b'}') => {
                    c.consume(1);
                    return Ok(map);
                }
                Some(_) => return Err(Error::expected("comma after object value", c.offset())),
                None => return Err(Error::unexpected_end("object", c.offset())),
            }
        }
    }

    /// Elements of the array at the cursor.
    fn elements<C: Cursor + ?Sized>(&self, c: &mut C, depth: usize) -> Result<Array> {
        let depth = enter(c, depth)?;
        c.consume(1);
        let mut items = Array::new();
        if skip_whitespace(c)? == Some(b']') {
            c.consume(1);
            return Ok(items);
        }
        loop {
            let mut value = Value::Null;
            self.decode_value(c, depth, &mut value)?;
            items.push(value);
            match skip_whitespace(c)? {
                Some(b',') => c.consume(1),
                Some(b']') => {
                    c.consume(1);
                    return Ok(items);
                }
                Some(_) => return Err(Error::expected("comma after array value", c.offset())),
                None => return Err(Error::unexpected_end("array", c.offset())),
            }
        }
    }
}

/// Numbers and literals, kept out of the recursive frame.
#[inline(never)]
fn scalar<C: Cursor + ?Sized>(c: &mut C, first: u8) -> Result<Value> {
    if let b'-' | b'0'..=b'9' = first {
        let start = c.offset();
        c.begin_capture();
        let number = scan_number(c).map(|_| {
            core::str::from_utf8(c.captured())
                .ok()
                .and_then(|text| text.parse::<f64>().ok())
        });
        c.end_capture();
        return match number? {
            Some(n) if n.is_finite() => Ok(Value::Number(n)),
            _ => Err(UnmarshalTypeError::new("number", "f64", start).into()),
        };
    }
    let Some(literal) = Literal::from_first(first) else {
        return Err(invalid_value_start(first, c.offset()));
    };
    expect_literal(c, literal)?;
    Ok(match literal {
        Literal::Null => Value::Null,
        Literal::True => Value::Boolean(true),
        Literal::False => Value::Boolean(false),
    })
}

impl Decoder for ValueDecoder {
    type Target = Value;

    cursor_methods!();

    /// With a path installed, objects keep only the selected member. When
    /// nothing is selected, either because the member is absent or the
    /// value is not an object, the value is skipped and the target left as
    /// is.
    fn decode_path(&self, ctx: &mut Context<'_>, cursor: usize, depth: usize, target: &mut Value) -> Result<usize> {
        let Some(node) = ctx.path().filter(|node| !node.is_empty()) else {
            return self.decode(ctx, cursor, depth, target);
        };
        let mut c = Buffered::new(ctx, cursor);
        if peek_value(&mut c)? != b'{' {
            skip_value(&mut c, depth)?;
            return Ok(c.position());
        }
        let mut map = Map::new();
        let found = select_member(&mut c, depth, node, |c, _, key, depth| {
            let mut value = Value::Null;
            c.with_context(|ctx, value_start| {
                let parent = ctx.replace_path(Some(node.child()));
                let end = self.decode_path(ctx, value_start, depth, &mut value);
                ctx.replace_path(parent);
                end
            })?;
            map.insert(key.into(), value);
            Ok(())
        })?;
        if found {
            *target = Value::Object(map);
        }
        Ok(c.position())
    }

    fn kind(&self) -> DecoderKind {
        DecoderKind::Value
    }
}
