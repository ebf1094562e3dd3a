use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use quickcheck::QuickCheck;

use super::arbitrary::Splits;
use crate::{
    DecodeOptions, Result, Value, ValueDecoder, compact, compact::compact_cursor, cursor::ChunkSource, cursor::Stream,
    decode_slice, decode_source,
};

fn tests() -> u64 {
    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;
    tests
}

fn stream_value(chunks: Vec<&[u8]>) -> Result<Value> {
    let mut v = Value::Null;
    decode_source(&ValueDecoder, &mut ChunkSource::new(chunks), &mut v, &DecodeOptions::default())?;
    Ok(v)
}

fn buffer_value(src: &[u8]) -> Result<Value> {
    let mut v = Value::Null;
    decode_slice(&ValueDecoder, src, &mut v, &DecodeOptions::default())?;
    Ok(v)
}

/// Property: decoding a document fed in arbitrary chunks yields the same
/// value as decoding it whole, and both reproduce the value it was printed
/// from.
#[test]
fn partition_roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value, splits: Splits) -> bool {
        let src = value.to_string();
        let streamed = stream_value(splits.apply(src.as_bytes()));
        let whole = buffer_value(src.as_bytes());
        matches!((streamed, whole), (Ok(a), Ok(b)) if a == value && b == value)
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Value, Splits) -> bool);
}

/// Property: on damaged input the two modes fail identically, offset
/// included.
#[test]
fn partition_errors_agree_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value, cut: usize, junk: u8, splits: Splits) -> bool {
        let mut src = value.to_string().into_bytes();
        let at = cut % (src.len() + 1);
        src.insert(at, junk);
        let streamed = stream_value(splits.apply(&src));
        let whole = buffer_value(&src);
        match (streamed, whole) {
            (Ok(a), Ok(b)) => a == b,
            (Err(a), Err(b)) => a.to_string() == b.to_string() && a.offset() == b.offset(),
            _ => false,
        }
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Value, usize, u8, Splits) -> bool);
}

/// Property: compacting in stream mode matches compacting the whole buffer.
#[test]
fn partition_compact_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value, escape: bool, splits: Splits) -> bool {
        let src = value.to_string();
        let mut whole = Vec::new();
        let whole = compact(&mut whole, src.as_bytes(), escape).map(|()| whole);

        let mut chunks = ChunkSource::new(splits.apply(src.as_bytes()));
        let mut s = Stream::new(&mut chunks, &DecodeOptions::default());
        let mut streamed = Vec::new();
        let streamed = compact_cursor(&mut s, &mut streamed, escape).map(|()| streamed);

        matches!((whole, streamed), (Ok(a), Ok(b)) if a == b)
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Value, bool, Splits) -> bool);
}

/// Property: compacting pretty-printed text reproduces the compact form
/// another encoder writes for the same value, and the HTML-safe variant
/// still decodes to that value.
#[test]
fn compact_matches_serde_json_quickcheck() {
    fn to_json(value: &Value) -> serde_json::Value {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n).map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
            Value::Object(map) => {
                serde_json::Value::Object(map.iter().map(|(k, v)| (k.clone(), to_json(v))).collect())
            }
        }
    }

    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value) -> bool {
        let json = to_json(&value);
        let pretty = serde_json::to_string_pretty(&json).unwrap();
        let expected = serde_json::to_string(&json).unwrap();

        let mut plain = Vec::new();
        compact(&mut plain, pretty.as_bytes(), false).unwrap();
        let mut safe = Vec::new();
        compact(&mut safe, pretty.as_bytes(), true).unwrap();
        let safe = String::from_utf8(safe).unwrap();

        plain == expected.as_bytes()
            && !safe.contains(['<', '>', '&', '\u{2028}', '\u{2029}'])
            && buffer_value(safe.as_bytes()).is_ok_and(|v| v == value)
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Value) -> bool);
}
