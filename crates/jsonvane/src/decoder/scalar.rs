use alloc::{borrow::ToOwned, format, string::String, sync::Arc};
use core::{any::type_name, marker::PhantomData, str::FromStr};

use bstr::BString;

use super::{Decoder, DecoderKind, DecoderRef, cursor_methods, mismatch, peek_value};
use crate::{
    Error, Result, SyntaxError, UnmarshalTypeError,
    cursor::Cursor,
    lexer::{Literal, NumberKind, expect_literal, expect_null, scan_number, skip_string, unquote},
};

/// Decodes `true`/`false` into a `bool`. `null` leaves the target as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolDecoder;

impl BoolDecoder {
    #[must_use]
    pub fn shared() -> DecoderRef<bool> {
        Arc::new(Self)
    }

    fn decode_value<C: Cursor + ?Sized>(&self, c: &mut C, _depth: usize, target: &mut bool) -> Result<()> {
        match peek_value(c)? {
            b't' => {
                expect_literal(c, Literal::True)?;
                *target = true;
            }
            b'f' => {
                expect_literal(c, Literal::False)?;
                *target = false;
            }
            b'n' => expect_null(c)?,
            b => return Err(mismatch(b, "bool", c.offset())),
        }
        Ok(())
    }
}

impl Decoder for BoolDecoder {
    type Target = bool;

    cursor_methods!();

    fn kind(&self) -> DecoderKind {
        DecoderKind::Bool
    }
}

/// Scans a number at the cursor and hands its text to `f`.
fn with_number<C, R>(c: &mut C, f: impl FnOnce(&str, NumberKind) -> R) -> Result<R>
where
    C: Cursor + ?Sized,
{
    c.begin_capture();
    let scanned = scan_number(c);
    let result = scanned.map(|kind| {
        // The number grammar only admits ASCII.
        let text = core::str::from_utf8(c.captured()).unwrap_or_default();
        f(text, kind)
    });
    c.end_capture();
    result
}

mod sealed {
    pub trait Sealed {}
}

/// Primitive integer types [`IntDecoder`] can produce.
pub trait Integer: FromStr + Copy + Send + Sync + sealed::Sealed + 'static {
    #[doc(hidden)]
    const SIGNED: bool;
}

macro_rules! integers {
    ($signed:literal: $($t:ty),*) => {
        $(
            impl sealed::Sealed for $t {}
            impl Integer for $t {
                const SIGNED: bool = $signed;
            }
        )*
    };
}

integers!(true: i8, i16, i32, i64, i128, isize);
integers!(false: u8, u16, u32, u64, u128, usize);

/// Decodes a JSON number into a primitive integer.
///
/// Fractions, exponents and out-of-range values are type errors: the JSON
/// value is a number, just not one `T` can hold.
pub struct IntDecoder<T> {
    _target: PhantomData<fn() -> T>,
}

impl<T: Integer> IntDecoder<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { _target: PhantomData }
    }

    #[must_use]
    pub fn shared() -> DecoderRef<T> {
        Arc::new(Self::new())
    }

    fn decode_value<C: Cursor + ?Sized>(&self, c: &mut C, _depth: usize, target: &mut T) -> Result<()> {
        let first = peek_value(c)?;
        let start = c.offset();
        match first {
            b'-' | b'0'..=b'9' => {}
            b'n' => return expect_null(c),
            b => return Err(mismatch(b, type_name::<T>(), start)),
        }
        let parsed = with_number(c, |text, kind| match kind {
            NumberKind::Integer => text.parse::<T>().map_err(|_| format!("number {text}")),
            NumberKind::Float => Err(format!("number {text}")),
        })?;
        *target = parsed.map_err(|value| UnmarshalTypeError::new(value, type_name::<T>(), start))?;
        Ok(())
    }
}

impl<T: Integer> Default for IntDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> core::fmt::Debug for IntDecoder<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "IntDecoder<{}>", type_name::<T>())
    }
}

impl<T: Integer> Decoder for IntDecoder<T> {
    type Target = T;

    cursor_methods!();

    fn kind(&self) -> DecoderKind {
        if T::SIGNED { DecoderKind::Int } else { DecoderKind::Uint }
    }
}

/// Floating-point types [`FloatDecoder`] can produce.
pub trait Float: FromStr + Copy + Send + Sync + sealed::Sealed + 'static {
    #[doc(hidden)]
    fn is_finite(self) -> bool;
}

impl sealed::Sealed for f32 {}
impl sealed::Sealed for f64 {}

impl Float for f32 {
    fn is_finite(self) -> bool {
        f32::is_finite(self)
    }
}

impl Float for f64 {
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

/// Decodes a JSON number into `f32` or `f64`. Values that overflow to
/// infinity are type errors.
pub struct FloatDecoder<T> {
    _target: PhantomData<fn() -> T>,
}

impl<T: Float> FloatDecoder<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { _target: PhantomData }
    }

    #[must_use]
    pub fn shared() -> DecoderRef<T> {
        Arc::new(Self::new())
    }

    fn decode_value<C: Cursor + ?Sized>(&self, c: &mut C, _depth: usize, target: &mut T) -> Result<()> {
        let first = peek_value(c)?;
        let start = c.offset();
        match first {
            b'-' | b'0'..=b'9' => {}
            b'n' => return expect_null(c),
            b => return Err(mismatch(b, type_name::<T>(), start)),
        }
        let parsed = with_number(c, |text, _| match text.parse::<T>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(format!("number {text}")),
        })?;
        *target = parsed.map_err(|value| UnmarshalTypeError::new(value, type_name::<T>(), start))?;
        Ok(())
    }
}

impl<T: Float> Default for FloatDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> core::fmt::Debug for FloatDecoder<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "FloatDecoder<{}>", type_name::<T>())
    }
}

impl<T: Float> Decoder for FloatDecoder<T> {
    type Target = T;

    cursor_methods!();

    fn kind(&self) -> DecoderKind {
        DecoderKind::Float
    }
}

/// Decodes a JSON string into a `String`, unescaping it.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringDecoder;

impl StringDecoder {
    #[must_use]
    pub fn shared() -> DecoderRef<String> {
        Arc::new(Self)
    }

    /// Reads the string at the cursor and passes its unescaped text to `f`.
    ///
    /// The text borrows the input whenever no unescaping was needed.
    ///
    /// # Errors
    ///
    /// [`Error::Syntax`] at the opening quote if the string is malformed.
    pub fn read_with<C, R>(c: &mut C, f: impl FnOnce(&str) -> R) -> Result<R>
    where
        C: Cursor + ?Sized,
    {
        let start = c.offset();
        c.begin_capture();
        let result = skip_string(c).and_then(|()| {
            let raw = c.captured();
            match unquote(raw) {
                Some(text) => Ok(f(&text)),
                None => Err(Error::syntax(SyntaxError::InvalidString(BString::from(raw)), start)),
            }
        });
        c.end_capture();
        result
    }

    fn decode_value<C: Cursor + ?Sized>(&self, c: &mut C, _depth: usize, target: &mut String) -> Result<()> {
        match peek_value(c)? {
            b'"' => Self::read_with(c, |text| text.clone_into(target)),
            b'n' => expect_null(c),
            b => Err(mismatch(b, "string", c.offset())),
        }
    }
}

impl Decoder for StringDecoder {
    type Target = String;

    cursor_methods!();

    fn kind(&self) -> DecoderKind {
        DecoderKind::String
    }

    fn as_string_decoder(&self) -> Option<&StringDecoder> {
        Some(self)
    }
}

/// Like [`StringDecoder::read_with`], for callers that want an owned copy.
pub(crate) fn read_string<C: Cursor + ?Sized>(c: &mut C) -> Result<String> {
    StringDecoder::read_with(c, |text| String::from(text))
}
