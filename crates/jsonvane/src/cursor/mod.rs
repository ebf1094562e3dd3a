//! Traversal modes over JSON text.
//!
//! Decoders are written once against the [`Cursor`] trait and run unchanged
//! over either of its two implementations:
//!
//! - [`Buffered`]: the whole document is one contiguous slice held by a
//!   [`Context`]; the cursor is a plain offset into it.
//! - [`Stream`]: bytes arrive from a [`Source`] and are kept in a growable
//!   working buffer that is compacted on every refill. A running total
//!   offset is kept for error reporting.
//!
//! Both are bounds-checked on every access. Running out of bytes surfaces
//! as an empty [`Cursor::fill_buf`] result, which the lexer turns into
//! [`Error::UnexpectedEnd`](crate::Error::UnexpectedEnd).

mod buffer;
mod stream;

pub use buffer::{Buffered, Context};
#[cfg(feature = "std")]
pub use stream::IoSource;
pub use stream::{ChunkSource, Source, Stream};

use crate::{Result, decoder::Decoder};

/// Position-tracking access to JSON input, shared by both traversal modes.
pub trait Cursor {
    /// Returns the unread bytes currently available, refilling from the
    /// underlying source when none are left.
    ///
    /// An empty slice means the input is exhausted.
    ///
    /// # Errors
    ///
    /// Propagates failures of the underlying source.
    fn fill_buf(&mut self) -> Result<&[u8]>;

    /// Marks `n` bytes of the slice last returned by [`fill_buf`] as read.
    ///
    /// [`fill_buf`]: Cursor::fill_buf
    fn consume(&mut self, n: usize);

    /// Total number of bytes consumed since the start of the input.
    fn offset(&self) -> usize;

    /// Nesting ceiling for composite values.
    fn max_depth(&self) -> usize;

    /// Starts retaining consumed bytes so they can be read back with
    /// [`captured`](Cursor::captured), even across refills.
    fn begin_capture(&mut self);

    /// Bytes consumed since the last [`begin_capture`](Cursor::begin_capture).
    fn captured(&self) -> &[u8];

    /// Stops retaining consumed bytes.
    fn end_capture(&mut self);

    /// Runs `decoder` over the next value in the same traversal mode.
    ///
    /// # Errors
    ///
    /// Whatever `decoder` reports.
    fn decode_child<D>(&mut self, decoder: &D, depth: usize, target: &mut D::Target) -> Result<()>
    where
        D: Decoder + ?Sized;

    /// Returns the next byte without consuming it.
    ///
    /// # Errors
    ///
    /// Propagates failures of the underlying source.
    #[inline]
    fn peek(&mut self) -> Result<Option<u8>> {
        Ok(self.fill_buf()?.first().copied())
    }
}
