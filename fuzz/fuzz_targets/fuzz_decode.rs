#![no_main]
use arbitrary::Arbitrary;
use jsonvane::{
    CompactOptions, DecodeOptions, Error, Value, ValueDecoder, compact_with, cursor::ChunkSource, decode_slice,
    decode_source,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    escape: bool,
    splits: Vec<u8>,
    data: &'a [u8],
}

/// Cuts `data` into chunks whose sizes come from `splits`.
fn chunks<'a>(data: &'a [u8], splits: &[u8]) -> Vec<&'a [u8]> {
    let mut out = Vec::new();
    let mut rest = data;
    for &s in splits {
        if rest.is_empty() {
            break;
        }
        let (head, tail) = rest.split_at((usize::from(s) % rest.len()) + 1);
        out.push(head);
        rest = tail;
    }
    out.push(rest);
    out
}

fn decode_whole(data: &[u8], options: &DecodeOptions) -> Result<Value, Error> {
    let mut v = Value::Null;
    decode_slice(&ValueDecoder, data, &mut v, options).map(|_| v)
}

fuzz_target!(|input: Input<'_>| {
    let options = DecodeOptions::default();

    // Both traversal modes agree, errors and offsets included.
    let whole = decode_whole(input.data, &options);
    let mut streamed = Value::Null;
    let source = &mut ChunkSource::new(chunks(input.data, &input.splits));
    let streamed = decode_source(&ValueDecoder, source, &mut streamed, &options).map(|()| streamed);
    match (&whole, &streamed) {
        (Ok(a), Ok(b)) => assert_eq!(a, b),
        (Err(a), Err(b)) => assert_eq!(a.to_string(), b.to_string()),
        _ => panic!("modes disagree: {whole:?} vs {streamed:?}"),
    }

    let compact_options = CompactOptions {
        escape_html: input.escape,
        ..CompactOptions::default()
    };
    let mut out = Vec::new();
    let compacted = compact_with(&mut out, input.data, &compact_options);

    // serde_json stops short of 128 levels, inside the default ceiling.
    if serde_json::from_slice::<serde_json::Value>(input.data).is_ok() {
        assert!(compacted.is_ok(), "rejected valid JSON: {compacted:?}");
    }

    if compacted.is_ok() {
        // Compaction is idempotent and preserves meaning.
        let mut again = Vec::new();
        compact_with(&mut again, &out, &compact_options).unwrap();
        assert_eq!(again, out);
        match (&whole, decode_whole(&out, &options)) {
            (Ok(a), Ok(b)) => assert_eq!(*a, b),
            (a, b) => panic!("compaction changed the outcome: {a:?} vs {b:?}"),
        }
    }
});
