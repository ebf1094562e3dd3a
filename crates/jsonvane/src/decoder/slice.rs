use alloc::{sync::Arc, vec::Vec};
use core::any::type_name;

use super::{Decoder, DecoderKind, DecoderRef, cursor_methods, mismatch, peek_value};
use crate::{
    Error, Result,
    cursor::Cursor,
    lexer::{enter, expect_null, skip_whitespace},
};

/// Decodes a JSON array into a `Vec<T>`.
///
/// The target is cleared before elements are appended; `null` leaves it
/// empty.
pub struct SliceDecoder<T> {
    elem: DecoderRef<T>,
}

impl<T: Default + 'static> SliceDecoder<T> {
    #[must_use]
    pub fn new(elem: DecoderRef<T>) -> Self {
        Self { elem }
    }

    #[must_use]
    pub fn shared(elem: DecoderRef<T>) -> DecoderRef<Vec<T>> {
        Arc::new(Self::new(elem))
    }

    fn decode_value<C: Cursor + ?Sized>(&self, c: &mut C, depth: usize, target: &mut Vec<T>) -> Result<()> {
        match peek_value(c)? {
            b'[' => {}
            b'n' => {
                expect_null(c)?;
                target.clear();
                return Ok(());
            }
            b => return Err(mismatch(b, type_name::<Vec<T>>(), c.offset())),
        }
        let depth = enter(c, depth)?;
        c.consume(1);
        target.clear();
        if skip_whitespace(c)? == Some(b']') {
            c.consume(1);
            return Ok(());
        }
        loop {
            let mut elem = T::default();
            c.decode_child(&*self.elem, depth, &mut elem)?;
            target.push(elem);
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
}

impl<T: Default + 'static> Decoder for SliceDecoder<T> {
    type Target = Vec<T>;

    cursor_methods!();

    fn kind(&self) -> DecoderKind {
        DecoderKind::Slice
    }
}
