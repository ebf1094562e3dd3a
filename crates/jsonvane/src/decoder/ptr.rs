use alloc::{boxed::Box, sync::Arc};

use super::{Decoder, DecoderKind, DecoderRef, cursor_methods, peek_value};
use crate::{
    Result,
    cursor::{Buffered, Context, Cursor},
    lexer::expect_null,
};

/// Decodes into an optional heap allocation, `Option<Box<T>>`.
///
/// `null` clears the target without consulting the inner decoder. Any other
/// value is decoded into a freshly allocated `T::default()`, which replaces
/// the target only once decoding has succeeded.
pub struct PtrDecoder<T> {
    inner: DecoderRef<T>,
}

impl<T: Default + 'static> PtrDecoder<T> {
    #[must_use]
    pub fn new(inner: DecoderRef<T>) -> Self {
        Self { inner }
    }

    #[must_use]
    pub fn shared(inner: DecoderRef<T>) -> DecoderRef<Option<Box<T>>> {
        Arc::new(Self::new(inner))
    }

    /// The decoder for the pointee.
    #[must_use]
    pub fn inner(&self) -> &DecoderRef<T> {
        &self.inner
    }

    fn decode_value<C: Cursor + ?Sized>(&self, c: &mut C, depth: usize, target: &mut Option<Box<T>>) -> Result<()> {
        if peek_value(c)? == b'n' {
            expect_null(c)?;
            *target = None;
            return Ok(());
        }
        let mut slot = Box::<T>::default();
        c.decode_child(&*self.inner, depth, &mut *slot)?;
        *target = Some(slot);
        Ok(())
    }
}

impl<T: Default + 'static> Decoder for PtrDecoder<T> {
    type Target = Option<Box<T>>;

    cursor_methods!();

    fn decode_path(&self, ctx: &mut Context<'_>, cursor: usize, depth: usize, target: &mut Self::Target) -> Result<usize> {
        let mut c = Buffered::new(ctx, cursor);
        if peek_value(&mut c)? == b'n' {
            expect_null(&mut c)?;
            *target = None;
            return Ok(c.position());
        }
        let cursor = c.position();
        let mut slot = Box::<T>::default();
        let end = self.inner.decode_path(ctx, cursor, depth, &mut *slot)?;
        *target = Some(slot);
        Ok(end)
    }

    fn kind(&self) -> DecoderKind {
        DecoderKind::Pointer
    }

    fn content_kind(&self) -> DecoderKind {
        self.inner.content_kind()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec::Vec};

    use super::*;
    use crate::{
        DecodeOptions, Error, IntDecoder, StringDecoder, cursor::ChunkSource, decode_slice, decode_source,
    };

    #[test]
    fn null_clears_and_consumes_exactly_the_literal() {
        let decoder = PtrDecoder::new(IntDecoder::<i32>::shared());
        let mut target = Some(Box::new(5));
        let options = DecodeOptions {
            disallow_trailing_data: false,
            ..Default::default()
        };
        let end = decode_slice(&decoder, b"  null, 1", &mut target, &options).unwrap();
        assert_eq!(end, 6);
        assert_eq!(target, None);
    }

    #[test]
    fn value_is_allocated_and_decoded_in_both_modes() {
        let decoder = PtrDecoder::new(StringDecoder::shared());
        let mut target = None;
        decode_slice(&decoder, br#""x""#, &mut target, &DecodeOptions::default()).unwrap();
        assert_eq!(target.as_deref().map(String::as_str), Some("x"));

        let mut target = None;
        let chunks: Vec<&[u8]> = alloc::vec![&b"\"y"[..], &b"z\""[..]];
        decode_source(&decoder, &mut ChunkSource::new(chunks), &mut target, &DecodeOptions::default()).unwrap();
        assert_eq!(target.as_deref().map(String::as_str), Some("yz"));
    }

    #[test]
    fn failed_decode_keeps_previous_value() {
        let decoder = PtrDecoder::new(IntDecoder::<u8>::shared());
        let mut target = Some(Box::new(1));
        let err = decode_slice(&decoder, b"300", &mut target, &DecodeOptions::default()).unwrap_err();
        assert!(matches!(err, Error::UnmarshalType(_)));
        assert_eq!(target.as_deref(), Some(&1));
    }

    #[test]
    fn content_kind_looks_through_nested_pointers() {
        let inner = PtrDecoder::shared(IntDecoder::<u16>::shared());
        let outer = PtrDecoder::new(inner);
        assert_eq!(outer.kind(), DecoderKind::Pointer);
        assert_eq!(outer.content_kind(), DecoderKind::Uint);
    }

    #[test]
    fn truncated_null_points_at_the_gap() {
        let decoder = PtrDecoder::new(IntDecoder::<i32>::shared());
        let err = decode_slice(&decoder, b"nu", &mut None, &DecodeOptions::default()).unwrap_err();
        assert!(err.is_eof());
        assert_eq!(err.offset(), Some(2));
        let err = decode_slice(&decoder, b"nuLl", &mut None, &DecodeOptions::default()).unwrap_err();
        assert_eq!(err.offset(), Some(2));
    }
}
