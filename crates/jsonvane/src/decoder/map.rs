use alloc::{boxed::Box, collections::BTreeMap, string::String, sync::Arc};
use core::{any::type_name, fmt, marker::PhantomData};

use super::{Decoder, DecoderKind, DecoderRef, cursor_methods, peek_value, select_member};
use crate::{
    Error, Result, UnmarshalTypeError,
    cursor::{Buffered, Context, Cursor},
    lexer::{enter, expect_byte, expect_null, skip_whitespace, value_kind},
};

/// An associative container a [`MapDecoder`] can fill.
pub trait MapTarget: Default {
    type Key: Default;
    type Value: Default;

    /// Inserts or overwrites one entry.
    fn insert_entry(&mut self, key: Self::Key, value: Self::Value);
}

impl<K: Ord + Default, V: Default> MapTarget for BTreeMap<K, V> {
    type Key = K;
    type Value = V;

    fn insert_entry(&mut self, key: K, value: V) {
        self.insert(key, value);
    }
}

#[cfg(feature = "std")]
impl<K, V, S> MapTarget for std::collections::HashMap<K, V, S>
where
    K: Eq + core::hash::Hash + Default,
    V: Default,
    S: core::hash::BuildHasher + Default,
{
    type Key = K;
    type Value = V;

    fn insert_entry(&mut self, key: K, value: V) {
        self.insert(key, value);
    }
}

/// Decodes a JSON object into a map, one key decoder call and one value
/// decoder call per member.
///
/// Entries are merged into whatever the target already holds; duplicate
/// keys keep the last value. `null` resets the target to an empty map.
pub struct MapDecoder<M: MapTarget> {
    key: DecoderRef<M::Key>,
    value: DecoderRef<M::Value>,
    struct_name: Option<Box<str>>,
    field: Option<Box<str>>,
    _target: PhantomData<fn() -> M>,
}

impl<M> MapDecoder<M>
where
    M: MapTarget + 'static,
    M::Key: 'static,
    M::Value: 'static,
{
    #[must_use]
    pub fn new(key: DecoderRef<M::Key>, value: DecoderRef<M::Value>) -> Self {
        Self {
            key,
            value,
            struct_name: None,
            field: None,
            _target: PhantomData,
        }
    }

    /// Names the struct field this map is decoded into, for error messages.
    #[must_use]
    pub fn with_field(mut self, struct_name: &str, field: &str) -> Self {
        self.struct_name = Some(struct_name.into());
        self.field = Some(field.into());
        self
    }

    #[must_use]
    pub fn shared(self) -> DecoderRef<M> {
        Arc::new(self)
    }

    fn type_error(&self, value: &str, type_name: &'static str, offset: usize) -> Error {
        let mut e = UnmarshalTypeError::new(value, type_name, offset);
        e.struct_name = self.struct_name.as_deref().map(String::from);
        e.field = self.field.as_deref().map(String::from);
        e.into()
    }

    /// Handles everything up to the opening brace. Returns `false` if the
    /// value was `null` and the target has been reset.
    fn open<C: Cursor + ?Sized>(&self, c: &mut C, target: &mut M) -> Result<bool> {
        match peek_value(c)? {
            b'{' => Ok(true),
            b'n' => {
                expect_null(c)?;
                *target = M::default();
                Ok(false)
            }
            b => Err(match value_kind(b) {
                Some(kind) => self.type_error(kind, type_name::<M>(), c.offset()),
                None => crate::lexer::invalid_value_start(b, c.offset()),
            }),
        }
    }

    fn decode_value<C: Cursor + ?Sized>(&self, c: &mut C, depth: usize, target: &mut M) -> Result<()> {
        if !self.open(c, target)? {
            return Ok(());
        }
        let depth = enter(c, depth)?;
        c.consume(1);
        if skip_whitespace(c)? == Some(b'}') {
            c.consume(1);
            return Ok(());
        }
        loop {
            match skip_whitespace(c)? {
                Some(b'"') => {}
                Some(b) => return Err(Error::invalid_character(b, "object key", c.offset())),
                None => return Err(Error::unexpected_end("object key", c.offset())),
            }
            let mut key = M::Key::default();
            c.decode_child(&*self.key, depth, &mut key)?;
            expect_byte(c, b':', "colon after object key")?;
            let mut value = M::Value::default();
            c.decode_child(&*self.value, depth, &mut value)?;
            target.insert_entry(key, value);

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
}

impl<M: MapTarget> fmt::Debug for MapDecoder<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapDecoder")
            .field("key", &self.key.kind())
            .field("value", &self.value.kind())
            .field("struct_name", &self.struct_name)
            .field("field", &self.field)
            .finish()
    }
}

impl<M> Decoder for MapDecoder<M>
where
    M: MapTarget + 'static,
    M::Key: 'static,
    M::Value: 'static,
{
    type Target = M;

    cursor_methods!();

    /// Decodes only the member the installed path selects, recursing into
    /// its value with the rest of the path.
    ///
    /// Members require string keys; `null` and `{}` are accepted whatever
    /// the key type.
    fn decode_path(&self, ctx: &mut Context<'_>, cursor: usize, depth: usize, target: &mut M) -> Result<usize> {
        let Some(node) = ctx.path().filter(|node| !node.is_empty()) else {
            return self.decode(ctx, cursor, depth, target);
        };

        let mut c = Buffered::new(ctx, cursor);
        if !self.open(&mut c, target)? {
            return Ok(c.position());
        }
        if self.key.as_string_decoder().is_none() {
            enter(&mut c, depth)?;
            c.consume(1);
            return match skip_whitespace(&mut c)? {
                Some(b'}') => {
                    c.consume(1);
                    Ok(c.position())
                }
                Some(_) => Err(self.type_error("string", type_name::<M::Key>(), c.offset())),
                None => Err(Error::unexpected_end("object key", c.offset())),
            };
        }
        select_member(&mut c, depth, node, |c, key_start, _, depth| {
            c.with_context(|ctx, value_start| {
                let mut key = M::Key::default();
                self.key.decode(ctx, key_start, depth, &mut key)?;
                let mut value = M::Value::default();
                let parent = ctx.replace_path(Some(node.child()));
                let end = self.value.decode_path(ctx, value_start, depth, &mut value);
                ctx.replace_path(parent);
                let end = end?;
                target.insert_entry(key, value);
                Ok(end)
            })
        })?;
        Ok(c.position())
    }

    fn kind(&self) -> DecoderKind {
        DecoderKind::Map
    }
}
