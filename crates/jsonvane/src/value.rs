//! The dynamic JSON value produced by [`ValueDecoder`](crate::ValueDecoder).
use alloc::{collections::BTreeMap, string::String, vec::Vec};
use core::fmt::{self, Write as _};

pub type Map = BTreeMap<String, Value>;
pub type Array = Vec<Value>;

/// A JSON value as defined by [RFC 8259].
///
/// Decoding into a `Value` is the fallback when no typed decoder fits;
/// numbers are held as `f64`.
///
/// # Examples
///
/// ```
/// use jsonvane::{DecodeOptions, Map, Value, ValueDecoder, decode_slice};
///
/// let mut v = Value::Null;
/// decode_slice(&ValueDecoder, br#"{"key": "value"}"#, &mut v, &DecodeOptions::default())?;
///
/// let mut map = Map::new();
/// map.insert("key".to_string(), Value::String("value".into()));
/// assert_eq!(v, Value::Object(map));
/// assert_eq!(v.to_string(), r#"{"key":"value"}"#);
/// # Ok::<(), jsonvane::Error>(())
/// ```
///
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Array),
    Object(Map),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl Value {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(m) => Some(m),
            _ => None,
        }
    }

    /// Looks up `key` in an object, comparing keys case-insensitively the
    /// way path-selective decoding does. An exact match wins over a
    /// case-folded one.
    ///
    /// ```
    /// use jsonvane::{Map, Value};
    ///
    /// let mut map = Map::new();
    /// map.insert("Name".into(), Value::from("vane"));
    /// let v = Value::Object(map);
    /// assert_eq!(v.get_ignore_case("name").and_then(Value::as_str), Some("vane"));
    /// ```
    #[must_use]
    pub fn get_ignore_case(&self, key: &str) -> Option<&Value> {
        let map = self.as_object()?;
        map.get(key).or_else(|| {
            map.iter()
                .find(|(k, _)| crate::path::eq_ignore_case(k, key))
                .map(|(_, v)| v)
        })
    }
}

/// Writes `src` with quotes, backslashes and control characters escaped for
/// inclusion in a JSON string literal.
pub(crate) fn write_escaped_string<W: fmt::Write>(src: &str, f: &mut W) -> fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{2028}' | '\u{2029}' => write!(f, "\\u{:04x}", c as u32)?,
            c if c.is_ascii_control() => write!(f, "\\u{:04x}", c as u32)?,
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn escape_string(src: &str) -> String {
    let mut result = String::with_capacity(src.len() + 2);
    write_escaped_string(src, &mut result).unwrap();
    result
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Number(n) if n.is_finite() => write!(f, "{n}"),
            Value::Number(_) => f.write_str("null"),
            Value::String(s) => {
                f.write_char('"')?;
                write_escaped_string(s, f)?;
                f.write_char('"')
            }
            Value::Array(arr) => {
                f.write_char('[')?;
                for (i, v) in arr.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_char(']')
            }
            Value::Object(map) => {
                f.write_char('{')?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    f.write_char('"')?;
                    write_escaped_string(k, f)?;
                    write!(f, "\":{v}")?;
                }
                f.write_char('}')
            }
        }
    }
}
