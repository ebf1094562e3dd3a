use super::Cursor;
use crate::{DecodeOptions, Result, decoder::Decoder, path::PathNode};

/// Per-call state for buffer-mode decoding.
///
/// Holds the complete input, the options in effect and, during
/// path-selective decoding, the path node still to be matched. Decoders
/// swap the path node on the way down and restore it on the way back up.
#[derive(Debug)]
pub struct Context<'a> {
    buf: &'a [u8],
    options: DecodeOptions,
    path: Option<PathNode<'a>>,
}

impl<'a> Context<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8], options: DecodeOptions) -> Self {
        Self {
            buf,
            options,
            path: None,
        }
    }

    pub(crate) fn with_path(buf: &'a [u8], options: DecodeOptions, path: PathNode<'a>) -> Self {
        Self {
            buf,
            options,
            path: Some(path),
        }
    }

    /// The complete input.
    #[must_use]
    pub fn buf(&self) -> &'a [u8] {
        self.buf
    }

    #[must_use]
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// The path node still to be matched, if path-selective decoding is
    /// active.
    #[must_use]
    pub fn path(&self) -> Option<PathNode<'a>> {
        self.path
    }

    /// Installs `path` as the current node and returns the previous one.
    pub fn replace_path(&mut self, path: Option<PathNode<'a>>) -> Option<PathNode<'a>> {
        core::mem::replace(&mut self.path, path)
    }
}

/// A [`Cursor`] over a [`Context`] starting at a given offset.
pub struct Buffered<'c, 'a> {
    ctx: &'c mut Context<'a>,
    pos: usize,
    mark: usize,
}

impl<'c, 'a> Buffered<'c, 'a> {
    pub fn new(ctx: &'c mut Context<'a>, cursor: usize) -> Self {
        Self {
            ctx,
            pos: cursor,
            mark: cursor,
        }
    }

    /// Current offset into the input.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Runs `f` with direct access to the context and the current offset,
    /// then continues from the offset it returns.
    pub(crate) fn with_context<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Context<'a>, usize) -> Result<usize>,
    {
        self.pos = f(self.ctx, self.pos)?;
        Ok(())
    }
}

impl Cursor for Buffered<'_, '_> {
    #[inline]
    fn fill_buf(&mut self) -> Result<&[u8]> {
        Ok(self.ctx.buf.get(self.pos..).unwrap_or_default())
    }

    #[inline]
    fn consume(&mut self, n: usize) {
        self.pos += n;
    }

    #[inline]
    fn offset(&self) -> usize {
        self.pos
    }

    fn max_depth(&self) -> usize {
        self.ctx.options.max_depth
    }

    fn begin_capture(&mut self) {
        self.mark = self.pos;
    }

    fn captured(&self) -> &[u8] {
        &self.ctx.buf[self.mark..self.pos]
    }

    fn end_capture(&mut self) {
        self.mark = self.pos;
    }

    fn decode_child<D>(&mut self, decoder: &D, depth: usize, target: &mut D::Target) -> Result<()>
    where
        D: Decoder + ?Sized,
    {
        decoder.decode_buffered(self, depth, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_buf_is_empty_past_the_end() {
        let mut ctx = Context::new(b"ab", DecodeOptions::default());
        let mut c = Buffered::new(&mut ctx, 1);
        assert_eq!(c.fill_buf().unwrap(), b"b");
        c.consume(1);
        assert!(c.fill_buf().unwrap().is_empty());
        assert_eq!(c.peek().unwrap(), None);
        assert_eq!(c.offset(), 2);
    }

    #[test]
    fn capture_spans_consumed_bytes() {
        let mut ctx = Context::new(b"  true,", DecodeOptions::default());
        let mut c = Buffered::new(&mut ctx, 2);
        c.begin_capture();
        c.consume(4);
        assert_eq!(c.captured(), b"true");
        c.end_capture();
        assert!(c.captured().is_empty());
    }
}
