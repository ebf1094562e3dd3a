//! Type-directed decoders.
//!
//! A decoder graph mirrors the shape of the target type: a
//! [`MapDecoder`] owns decoders for its keys and values, a [`PtrDecoder`]
//! owns one for its pointee, and so on down to the scalar leaves. Graphs
//! are built once, shared through [`DecoderRef`], and reused across any
//! number of concurrent decode calls; all per-call state lives in the
//! cursor.
//!
//! Every decoder implements its grammar once, generically over
//! [`Cursor`], and exposes it through both [`Decoder::decode_stream`] and
//! [`Decoder::decode_buffered`].

mod map;
mod path;
mod ptr;
mod scalar;
mod slice;
mod text;
mod value;

use alloc::sync::Arc;

pub use map::{MapDecoder, MapTarget};
pub use path::PathBoundDecoder;
pub(crate) use path::select_member;
pub use ptr::PtrDecoder;
pub(crate) use scalar::read_string;
pub use scalar::{BoolDecoder, Float, FloatDecoder, IntDecoder, Integer, StringDecoder};
pub use slice::SliceDecoder;
pub use text::{TextDecoder, UnmarshalText};
pub use value::ValueDecoder;

use crate::{
    DecodeOptions, Error, Result, UnmarshalTypeError,
    cursor::{Buffered, Context, Cursor, Source, Stream},
    lexer::{expect_end, invalid_value_start, skip_whitespace, value_kind},
};

/// A shared, type-erased decoder for `T`.
pub type DecoderRef<T> = Arc<dyn Decoder<Target = T>>;

/// The decoding strategy a [`Decoder`] implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DecoderKind {
    Bool,
    Int,
    Uint,
    Float,
    String,
    Pointer,
    Map,
    Slice,
    UnmarshalText,
    Value,
    PathBound,
}

/// Decodes one JSON value into a `Target`.
///
/// On success the cursor is left just past the value: after a closing
/// brace or bracket, but before any whitespace or separator belonging to an
/// enclosing value. On error the cursor position is unspecified and
/// decoding must not continue.
///
/// `depth` is the nesting level of the value being decoded. Decoders for
/// objects and arrays increment it before descending and fail once it
/// exceeds the configured ceiling.
pub trait Decoder: Send + Sync {
    type Target;

    /// Decodes from an incremental source.
    ///
    /// # Errors
    ///
    /// Syntax, type and depth errors, and failures of the source.
    fn decode_stream(&self, s: &mut Stream<'_>, depth: usize, target: &mut Self::Target) -> Result<()>;

    /// Decodes from an in-memory cursor, leaving it just past the value.
    ///
    /// Children of composite values are decoded through the parent's
    /// cursor, so nesting costs one decoder frame per level.
    ///
    /// # Errors
    ///
    /// Syntax, type and depth errors.
    fn decode_buffered(&self, c: &mut Buffered<'_, '_>, depth: usize, target: &mut Self::Target) -> Result<()>;

    /// Decodes from the complete input held by `ctx`, starting at `cursor`,
    /// and returns the offset just past the value.
    ///
    /// # Errors
    ///
    /// Syntax, type and depth errors.
    fn decode(&self, ctx: &mut Context<'_>, cursor: usize, depth: usize, target: &mut Self::Target) -> Result<usize> {
        let mut c = Buffered::new(ctx, cursor);
        self.decode_buffered(&mut c, depth, target)?;
        Ok(c.position())
    }

    /// As [`decode`](Decoder::decode), restricted to the path installed in
    /// `ctx`. Decoders that cannot narrow their work decode in full.
    ///
    /// # Errors
    ///
    /// As [`decode`](Decoder::decode).
    fn decode_path(
        &self,
        ctx: &mut Context<'_>,
        cursor: usize,
        depth: usize,
        target: &mut Self::Target,
    ) -> Result<usize> {
        self.decode(ctx, cursor, depth, target)
    }

    fn kind(&self) -> DecoderKind;

    /// The strategy that ultimately decodes the content, looking through any
    /// pointer indirection.
    fn content_kind(&self) -> DecoderKind {
        self.kind()
    }

    /// Returns `self` if this is a plain string decoder.
    fn as_string_decoder(&self) -> Option<&StringDecoder> {
        None
    }
}

/// Implements [`Decoder::decode_stream`] and [`Decoder::decode_buffered`]
/// on top of an inherent `decode_value<C: Cursor>` method.
macro_rules! cursor_methods {
    () => {
        fn decode_stream(
            &self,
            s: &mut $crate::cursor::Stream<'_>,
            depth: usize,
            target: &mut Self::Target,
        ) -> $crate::Result<()> {
            self.decode_value(s, depth, target)
        }

        fn decode_buffered(
            &self,
            c: &mut $crate::cursor::Buffered<'_, '_>,
            depth: usize,
            target: &mut Self::Target,
        ) -> $crate::Result<()> {
            self.decode_value(c, depth, target)
        }
    };
}
pub(crate) use cursor_methods;

/// Skips whitespace and returns the first byte of the next value.
pub(crate) fn peek_value<C: Cursor + ?Sized>(c: &mut C) -> Result<u8> {
    match skip_whitespace(c)? {
        Some(b) => Ok(b),
        None => Err(Error::unexpected_end("value", c.offset())),
    }
}

/// Error for a value starting with `first` that `type_name` cannot hold.
pub(crate) fn mismatch(first: u8, type_name: &'static str, offset: usize) -> Error {
    match value_kind(first) {
        Some(kind) => UnmarshalTypeError::new(kind, type_name, offset).into(),
        None => invalid_value_start(first, offset),
    }
}

/// Applies the trailing-data check after a top-level buffer-mode decode.
pub(crate) fn finish(ctx: &mut Context<'_>, end: usize) -> Result<()> {
    if ctx.options().disallow_trailing_data {
        expect_end(&mut Buffered::new(ctx, end))?;
    }
    Ok(())
}

/// Decodes a complete JSON document held in memory.
///
/// Returns the offset just past the decoded value. Unless
/// [`DecodeOptions::disallow_trailing_data`] is cleared, anything but
/// whitespace after the value is an error.
///
/// # Examples
///
/// ```
/// use jsonvane::{DecodeOptions, IntDecoder, SliceDecoder, decode_slice};
///
/// let decoder = SliceDecoder::new(IntDecoder::<u8>::shared());
/// let mut out = Vec::new();
/// decode_slice(&decoder, b" [1, 2, 3] ", &mut out, &DecodeOptions::default())?;
/// assert_eq!(out, [1, 2, 3]);
/// # Ok::<(), jsonvane::Error>(())
/// ```
///
/// # Errors
///
/// Whatever the decoder reports, or [`SyntaxError::TrailingData`].
///
/// [`SyntaxError::TrailingData`]: crate::SyntaxError::TrailingData
pub fn decode_slice<D>(decoder: &D, data: &[u8], target: &mut D::Target, options: &DecodeOptions) -> Result<usize>
where
    D: Decoder + ?Sized,
{
    let mut ctx = Context::new(data, *options);
    let end = decoder.decode(&mut ctx, 0, 0, target)?;
    finish(&mut ctx, end)?;
    Ok(end)
}

/// Decodes one JSON document read incrementally from `source`.
///
/// When trailing data is allowed, decoding stops after the first value, but
/// bytes the stream already pulled from `source` past that point are not
/// returned to it.
///
/// # Errors
///
/// Whatever the decoder or the source reports, or
/// [`SyntaxError::TrailingData`].
///
/// [`SyntaxError::TrailingData`]: crate::SyntaxError::TrailingData
pub fn decode_source<D, S>(decoder: &D, source: &mut S, target: &mut D::Target, options: &DecodeOptions) -> Result<()>
where
    D: Decoder + ?Sized,
    S: Source,
{
    let mut s = Stream::new(source, options);
    decoder.decode_stream(&mut s, 0, target)?;
    if options.disallow_trailing_data {
        expect_end(&mut s)?;
    }
    tracing::trace!(target: "jsonvane::decode", consumed = s.offset(), "decoded from stream");
    Ok(())
}
