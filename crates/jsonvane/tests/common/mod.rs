#![allow(dead_code)]

use jsonvane::{Decoder, DecodeOptions, Result, cursor::ChunkSource, decode_slice, decode_source};
use tracing_subscriber::EnvFilter;

/// Routes `tracing` output through the test harness; `RUST_LOG` picks the
/// level, e.g. `RUST_LOG=jsonvane=trace`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Options that stop after the first value, so the returned offset shows
/// exactly how much a decoder consumed.
pub fn lenient() -> DecodeOptions {
    DecodeOptions {
        disallow_trailing_data: false,
        ..DecodeOptions::default()
    }
}

/// Decodes `input` whole and again in `chunk`-byte pieces, asserting that
/// both modes agree, and returns the buffer-mode result.
pub fn decode_both<D>(decoder: &D, input: &[u8], chunk: usize) -> Result<D::Target>
where
    D: Decoder + ?Sized,
    D::Target: Default + PartialEq + std::fmt::Debug,
{
    let options = DecodeOptions::default();
    let mut whole = D::Target::default();
    let whole_result = decode_slice(decoder, input, &mut whole, &options).map(drop);

    let mut streamed = D::Target::default();
    let source = &mut ChunkSource::new(input.chunks(chunk));
    let streamed_result = decode_source(decoder, source, &mut streamed, &options);

    match (whole_result, streamed_result) {
        (Ok(()), Ok(())) => {
            assert_eq!(whole, streamed, "modes disagree on {:?}", String::from_utf8_lossy(input));
            Ok(whole)
        }
        (Err(a), Err(b)) => {
            assert_eq!(a.to_string(), b.to_string());
            Err(a)
        }
        (a, b) => panic!("modes disagree: {a:?} vs {b:?}"),
    }
}
