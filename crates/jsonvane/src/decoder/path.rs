use alloc::string::String;
use core::fmt;

use super::{Decoder, DecoderKind, DecoderRef, StringDecoder, cursor_methods, peek_value};
use crate::{
    Error, Result,
    cursor::Cursor,
    lexer::{enter, expect_byte, skip_object_rest, skip_value, skip_whitespace},
    path::{Path, PathNode},
};

/// Walks the object at the cursor looking for the member `node` selects.
///
/// The cursor must be at `{`. Members before the match are skipped
/// structurally. On a match, `on_match` is called with the cursor at the
/// member's value, the offset of its key, the unescaped key and the depth
/// inside the object; it must consume exactly the value. The rest of the
/// object is then skipped. Returns whether a member matched.
pub(crate) fn select_member<C, F>(c: &mut C, depth: usize, node: PathNode<'_>, on_match: F) -> Result<bool>
where
    C: Cursor + ?Sized,
    F: FnOnce(&mut C, usize, &str, usize) -> Result<()>,
{
    let depth = enter(c, depth)?;
    c.consume(1);
    if skip_whitespace(c)? == Some(b'}') {
        c.consume(1);
        return Ok(false);
    }
    loop {
        match skip_whitespace(c)? {
            Some(b'"') => {}
            Some(b) => return Err(Error::invalid_character(b, "object key", c.offset())),
            None => return Err(Error::unexpected_end("object key", c.offset())),
        }
        let key_start = c.offset();
        let matched = StringDecoder::read_with(c, |key| node.matches(key).then(|| String::from(key)))?;
        expect_byte(c, b':', "colon after object key")?;

        if let Some(key) = matched {
            tracing::trace!(target: "jsonvane::path", key = %key, offset = key_start, "path segment matched");
            skip_whitespace(c)?;
            on_match(c, key_start, &key, depth)?;
            skip_object_rest(c, depth)?;
            return Ok(true);
        }

        skip_value(c, depth)?;
        match skip_whitespace(c)? {
            Some(b',') => c.consume(1),
            Some(b'}') => {
                c.consume(1);
                tracing::trace!(target: "jsonvane::path", segment = node.first(), "path segment not found");
                return Ok(false);
            }
            Some(_) => return Err(Error::expected("comma after object value", c.offset())),
            None => return Err(Error::unexpected_end("object", c.offset())),
        }
    }
}

/// Decodes only the value a [`Path`] selects, into `Option<T>`.
///
/// The target becomes `Some` when the path occurs in the document and stays
/// untouched otherwise. Everything outside the selected branch is skipped
/// without being materialized; a non-object where a member was expected
/// counts as not found.
pub struct PathBoundDecoder<T> {
    path: Path,
    leaf: DecoderRef<T>,
}

impl<T: Default + 'static> PathBoundDecoder<T> {
    #[must_use]
    pub fn new(path: Path, leaf: DecoderRef<T>) -> Self {
        Self { path, leaf }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decode_value<C: Cursor + ?Sized>(&self, c: &mut C, depth: usize, target: &mut Option<T>) -> Result<()> {
        self.find(c, depth, self.path.node(), target)
    }

    fn find<C: Cursor + ?Sized>(
        &self,
        c: &mut C,
        depth: usize,
        node: PathNode<'_>,
        target: &mut Option<T>,
    ) -> Result<()> {
        if node.is_empty() {
            let mut value = T::default();
            c.decode_child(&*self.leaf, depth, &mut value)?;
            *target = Some(value);
            return Ok(());
        }
        if peek_value(c)? != b'{' {
            return skip_value(c, depth);
        }
        select_member(c, depth, node, |c, _, _, depth| self.find(c, depth, node.child(), target))?;
        Ok(())
    }
}

impl<T> fmt::Debug for PathBoundDecoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathBoundDecoder")
            .field("path", &self.path)
            .field("leaf", &self.leaf.kind())
            .finish()
    }
}

impl<T: Default + 'static> Decoder for PathBoundDecoder<T> {
    type Target = Option<T>;

    cursor_methods!();

    fn kind(&self) -> DecoderKind {
        DecoderKind::PathBound
    }

    fn content_kind(&self) -> DecoderKind {
        self.leaf.content_kind()
    }
}
