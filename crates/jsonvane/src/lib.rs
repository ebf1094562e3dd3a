//! Type-directed JSON decoding with two traversal modes.
//!
//! A graph of [`Decoder`]s, one per target type, is built once and then
//! driven either over a complete in-memory document ([`decode_slice`]) or
//! over bytes pulled incrementally from a [`Source`](cursor::Source)
//! ([`decode_source`]). Both modes share a single implementation of every
//! decoder and report identical results and error offsets.
//!
//! Alongside the decoders the crate offers:
//!
//! - [`compact`], which minifies JSON text and can escape it for embedding
//!   in HTML;
//! - [`Path`], a compiled member path that lets a decode skip everything
//!   outside the selected branch;
//! - [`Value`], a dynamic JSON tree.
//!
//! ```
//! use jsonvane::{DecodeOptions, IntDecoder, MapDecoder, StringDecoder, decode_slice};
//! use std::collections::BTreeMap;
//!
//! let decoder = MapDecoder::<BTreeMap<String, i64>>::new(StringDecoder::shared(), IntDecoder::shared());
//! let mut scores = BTreeMap::new();
//! decode_slice(&decoder, br#"{"ada": 36, "alan": 41}"#, &mut scores, &DecodeOptions::default())?;
//! assert_eq!(scores["alan"], 41);
//! # Ok::<(), jsonvane::Error>(())
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod cursor;
pub mod decoder;
pub mod lexer;

mod compact;
mod error;
mod options;
mod path;
mod value;

#[cfg(test)]
mod tests;

pub use compact::{HTML_ESCAPE, compact, compact_with};
pub use decoder::{
    BoolDecoder, Decoder, DecoderKind, DecoderRef, FloatDecoder, IntDecoder, MapDecoder, MapTarget, PathBoundDecoder,
    PtrDecoder, SliceDecoder, StringDecoder, TextDecoder, UnmarshalText, ValueDecoder, decode_slice, decode_source,
};
pub use error::{Error, Result, SyntaxError, UnmarshalTypeError};
pub use options::{CompactOptions, DEFAULT_MAX_DEPTH, DEFAULT_STREAM_CHUNK_SIZE, DecodeOptions};
pub use path::{Path, PathNode};
pub use value::{Array, Map, Value};
