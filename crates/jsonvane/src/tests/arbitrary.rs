use alloc::{string::String, vec::Vec};

use quickcheck::{Arbitrary, Gen};

use crate::{Array, Map, Value};

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct JsonNumber(f64);

impl Arbitrary for JsonNumber {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut value = f64::arbitrary(g);
        while !value.is_finite() {
            value = f64::arbitrary(g);
        }

        Self(value)
    }
}

impl Arbitrary for Value {
    fn arbitrary(g: &mut Gen) -> Self {
        fn gen_val(g: &mut Gen, depth: usize) -> Value {
            let choices = if depth == 0 { 4 } else { 6 };
            match usize::arbitrary(g) % choices {
                0 => Value::Null,
                1 => Value::Boolean(bool::arbitrary(g)),
                2 => Value::Number(JsonNumber::arbitrary(g).0),
                3 => Value::String(String::arbitrary(g)),
                4 => {
                    let len = usize::arbitrary(g) % 4;
                    Value::Array((0..len).map(|_| gen_val(g, depth - 1)).collect::<Array>())
                }
                _ => {
                    let len = usize::arbitrary(g) % 4;
                    let mut map = Map::new();
                    for _ in 0..len {
                        map.insert(String::arbitrary(g), gen_val(g, depth - 1));
                    }
                    Value::Object(map)
                }
            }
        }

        let depth = usize::arbitrary(g) % 4;
        gen_val(g, depth)
    }

    fn shrink(&self) -> alloc::boxed::Box<dyn Iterator<Item = Self>> {
        match self {
            Value::Array(items) => {
                let items = items.clone();
                alloc::boxed::Box::new(items.shrink().map(Value::Array))
            }
            Value::Object(map) => {
                let entries: Vec<(String, Value)> = map.clone().into_iter().collect();
                alloc::boxed::Box::new(
                    entries
                        .shrink()
                        .map(|entries| Value::Object(entries.into_iter().collect())),
                )
            }
            Value::String(s) => alloc::boxed::Box::new(s.shrink().map(Value::String)),
            _ => quickcheck::empty_shrinker(),
        }
    }
}

/// Where to cut a document into chunks.
#[derive(Debug, Clone)]
pub(crate) struct Splits(pub Vec<usize>);

impl Arbitrary for Splits {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 8;
        Self((0..len).map(|_| usize::arbitrary(g)).collect())
    }

    fn shrink(&self) -> alloc::boxed::Box<dyn Iterator<Item = Self>> {
        alloc::boxed::Box::new(self.0.shrink().map(Self))
    }
}

impl Splits {
    /// Cuts `src` at byte positions derived from the split values. Cuts may
    /// land inside a multi-byte character.
    pub(crate) fn apply<'a>(&self, src: &'a [u8]) -> Vec<&'a [u8]> {
        let mut chunks = Vec::new();
        let mut rest = src;
        for &s in &self.0 {
            if rest.is_empty() {
                break;
            }
            let (head, tail) = rest.split_at(1 + s % rest.len());
            chunks.push(head);
            rest = tail;
        }
        if !rest.is_empty() {
            chunks.push(rest);
        }
        chunks
    }
}
