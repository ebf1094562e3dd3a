use alloc::{boxed::Box, format, string::String, sync::Arc};
use core::{any::type_name, fmt, marker::PhantomData};

use bstr::{BStr, BString};

use super::{Decoder, DecoderKind, DecoderRef, cursor_methods, peek_value};
use crate::{
    Error, Result, SyntaxError, UnmarshalTypeError,
    cursor::Cursor,
    lexer::{skip_value, unquote},
};

/// Types that decode themselves from the text of a scalar JSON value.
///
/// Strings arrive unescaped and without quotes; numbers, booleans and
/// `null` arrive as their literal JSON text.
pub trait UnmarshalText {
    /// # Errors
    ///
    /// Any error; it is propagated to the caller of the decode after being
    /// annotated with the value's offset and, for type errors, the field
    /// being decoded.
    fn unmarshal_text(&mut self, text: &[u8]) -> Result<()>;
}

macro_rules! text_integers {
    ($($t:ty),*) => {
        $(
            impl UnmarshalText for $t {
                fn unmarshal_text(&mut self, text: &[u8]) -> Result<()> {
                    let parsed = core::str::from_utf8(text).ok().and_then(|s| s.parse().ok());
                    *self = parsed.ok_or_else(|| {
                        UnmarshalTypeError::new(format!("string {:?}", BStr::new(text)), type_name::<$t>(), 0)
                    })?;
                    Ok(())
                }
            }
        )*
    };
}

text_integers!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Hands the text of a scalar JSON value to [`UnmarshalText`].
///
/// Arrays and objects are rejected up front with a type error naming the
/// JSON kind.
pub struct TextDecoder<T> {
    struct_name: Option<Box<str>>,
    field: Option<Box<str>>,
    _target: PhantomData<fn() -> T>,
}

impl<T: UnmarshalText + 'static> TextDecoder<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            struct_name: None,
            field: None,
            _target: PhantomData,
        }
    }

    /// Names the struct field being decoded, for error messages.
    #[must_use]
    pub fn with_field(mut self, struct_name: &str, field: &str) -> Self {
        self.struct_name = Some(struct_name.into());
        self.field = Some(field.into());
        self
    }

    #[must_use]
    pub fn shared() -> DecoderRef<T> {
        Arc::new(Self::new())
    }

    fn annotate(&self, err: Error, offset: usize) -> Error {
        match err {
            Error::UnmarshalType(mut e) => {
                if self.field.is_some() {
                    e.struct_name = self.struct_name.as_deref().map(String::from);
                    e.field = self.field.as_deref().map(String::from);
                }
                e.offset = offset;
                Error::UnmarshalType(e)
            }
            Error::Syntax { source, .. } => Error::Syntax { source, offset },
            other => other,
        }
    }

    fn call_hook(&self, target: &mut T, text: &[u8], offset: usize) -> Result<()> {
        target.unmarshal_text(text).map_err(|err| {
            tracing::debug!(
                target: "jsonvane::decode",
                offset,
                type_name = type_name::<T>(),
                error = %err,
                "text hook rejected value"
            );
            self.annotate(err, offset)
        })
    }

    fn decode_value<C: Cursor + ?Sized>(&self, c: &mut C, depth: usize, target: &mut T) -> Result<()> {
        let first = peek_value(c)?;
        let start = c.offset();
        let container = match first {
            b'[' => Some("array"),
            b'{' => Some("object"),
            _ => None,
        };
        if let Some(kind) = container {
            let err = UnmarshalTypeError::new(kind, type_name::<T>(), start).into();
            return Err(self.annotate(err, start));
        }

        c.begin_capture();
        let outcome = skip_value(c, depth).and_then(|()| {
            let raw = c.captured();
            if raw.first() == Some(&b'"') {
                let text = unquote(raw)
                    .ok_or_else(|| Error::syntax(SyntaxError::InvalidString(BString::from(raw)), start))?;
                self.call_hook(target, text.as_bytes(), start)
            } else {
                self.call_hook(target, raw, start)
            }
        });
        c.end_capture();
        outcome
    }
}

impl<T: UnmarshalText + 'static> Default for TextDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TextDecoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextDecoder")
            .field("type", &type_name::<T>())
            .field("struct_name", &self.struct_name)
            .field("field", &self.field)
            .finish()
    }
}

impl<T: UnmarshalText + 'static> Decoder for TextDecoder<T> {
    type Target = T;

    cursor_methods!();

    fn kind(&self) -> DecoderKind {
        DecoderKind::UnmarshalText
    }
}
