use alloc::vec::Vec;

use super::Cursor;
use crate::{DecodeOptions, Result, decoder::Decoder};

/// Upper bound for a single refill request, however long the current token.
const MAX_CHUNK_SIZE: usize = 64 * 1024;

/// An incremental byte source for stream-mode decoding.
///
/// Refills are plain blocking calls; there is no suspension or retry inside
/// the engine.
pub trait Source {
    /// Appends the next bytes of input to `buf`, returning how many were
    /// appended. Returning zero signals end of input.
    ///
    /// `hint` is the number of bytes the stream would like; sources may
    /// append fewer or more.
    ///
    /// # Errors
    ///
    /// Failures reading the underlying input.
    fn read_into(&mut self, buf: &mut Vec<u8>, hint: usize) -> Result<usize>;
}

impl Source for &[u8] {
    fn read_into(&mut self, buf: &mut Vec<u8>, hint: usize) -> Result<usize> {
        let n = hint.max(1).min(self.len());
        let (head, tail) = self.split_at(n);
        buf.extend_from_slice(head);
        *self = tail;
        Ok(n)
    }
}

/// A [`Source`] yielding the chunks of an iterator one refill at a time.
///
/// Chunk boundaries can fall anywhere, including inside a token or a
/// multi-byte character, which makes this the tool for exercising refills.
#[derive(Debug, Clone)]
pub struct ChunkSource<I> {
    chunks: I,
}

impl<I> ChunkSource<I> {
    pub fn new<T>(chunks: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            chunks: chunks.into_iter(),
        }
    }
}

impl<I, B> Source for ChunkSource<I>
where
    I: Iterator<Item = B>,
    B: AsRef<[u8]>,
{
    fn read_into(&mut self, buf: &mut Vec<u8>, _hint: usize) -> Result<usize> {
        for chunk in self.chunks.by_ref() {
            let chunk = chunk.as_ref();
            if !chunk.is_empty() {
                buf.extend_from_slice(chunk);
                return Ok(chunk.len());
            }
        }
        Ok(0)
    }
}

/// A [`Source`] over any [`std::io::Read`].
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoSource<R> {
    reader: R,
}

#[cfg(feature = "std")]
impl<R: std::io::Read> IoSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> Source for IoSource<R> {
    fn read_into(&mut self, buf: &mut Vec<u8>, hint: usize) -> Result<usize> {
        let start = buf.len();
        buf.resize(start + hint.max(1), 0);
        let read = loop {
            match self.reader.read(&mut buf[start..]) {
                Ok(n) => break n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => {
                    buf.truncate(start);
                    return Err(e.into());
                }
            }
        };
        buf.truncate(start + read);
        Ok(read)
    }
}

/// Stream-mode cursor: a growable working buffer refilled from a [`Source`].
///
/// Consumed bytes are discarded on each refill unless a capture is active,
/// so `offset()` (the total offset) and the position in the working buffer
/// drift apart as decoding proceeds.
pub struct Stream<'s> {
    source: &'s mut dyn Source,
    buf: Vec<u8>,
    cursor: usize,
    base: usize,
    mark: Option<usize>,
    eof: bool,
    chunk_size: usize,
    max_depth: usize,
}

impl<'s> Stream<'s> {
    pub fn new(source: &'s mut dyn Source, options: &DecodeOptions) -> Self {
        Self {
            source,
            buf: Vec::new(),
            cursor: 0,
            base: 0,
            mark: None,
            eof: false,
            chunk_size: options.stream_chunk_size.max(1),
            max_depth: options.max_depth,
        }
    }

    fn refill(&mut self) -> Result<()> {
        let keep_from = self.mark.unwrap_or(self.cursor);
        if keep_from > 0 {
            self.buf.drain(..keep_from);
            self.base += keep_from;
            self.cursor -= keep_from;
            self.mark = self.mark.map(|m| m - keep_from);
        }
        if self.mark.is_some() && self.buf.len() >= self.chunk_size {
            self.chunk_size = (self.chunk_size * 2).min(MAX_CHUNK_SIZE);
        }

        let read = self.source.read_into(&mut self.buf, self.chunk_size)?;
        tracing::trace!(
            target: "jsonvane::stream",
            read,
            total_offset = self.base + self.buf.len(),
            "refilled stream buffer"
        );
        if read == 0 {
            self.eof = true;
        }
        Ok(())
    }
}

impl Cursor for Stream<'_> {
    fn fill_buf(&mut self) -> Result<&[u8]> {
        while self.cursor >= self.buf.len() && !self.eof {
            self.refill()?;
        }
        Ok(&self.buf[self.cursor..])
    }

    #[inline]
    fn consume(&mut self, n: usize) {
        self.cursor += n;
    }

    #[inline]
    fn offset(&self) -> usize {
        self.base + self.cursor
    }

    fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn begin_capture(&mut self) {
        self.mark = Some(self.cursor);
    }

    fn captured(&self) -> &[u8] {
        match self.mark {
            Some(m) => &self.buf[m..self.cursor],
            None => &[],
        }
    }

    fn end_capture(&mut self) {
        self.mark = None;
    }

    fn decode_child<D>(&mut self, decoder: &D, depth: usize, target: &mut D::Target) -> Result<()>
    where
        D: Decoder + ?Sized,
    {
        decoder.decode_stream(self, depth, target)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn refills_chunk_by_chunk_and_tracks_total_offset() {
        let mut src = ChunkSource::new(vec![&b"ab"[..], &b""[..], &b"cd"[..]]);
        let mut s = Stream::new(&mut src, &DecodeOptions::default());
        assert_eq!(s.fill_buf().unwrap(), b"ab");
        s.consume(2);
        assert_eq!(s.fill_buf().unwrap(), b"cd");
        s.consume(1);
        assert_eq!(s.offset(), 3);
        s.consume(1);
        assert!(s.fill_buf().unwrap().is_empty());
        assert_eq!(s.offset(), 4);
    }

    #[test]
    fn capture_survives_refill() {
        let mut src = ChunkSource::new(vec![&b"\"he"[..], &b"llo\""[..]]);
        let mut s = Stream::new(&mut src, &DecodeOptions::default());
        s.fill_buf().unwrap();
        s.begin_capture();
        s.consume(3);
        s.fill_buf().unwrap();
        s.consume(4);
        assert_eq!(s.captured(), b"\"hello\"");
        s.end_capture();
        assert_eq!(s.offset(), 7);
    }

    #[test]
    fn slice_source_honours_hint() {
        let mut input: &[u8] = b"12345";
        let mut buf = Vec::new();
        assert_eq!(input.read_into(&mut buf, 2).unwrap(), 2);
        assert_eq!(buf, b"12");
        assert_eq!(input, b"345");
    }
}
