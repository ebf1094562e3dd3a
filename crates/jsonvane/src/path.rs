//! Compiled field-access paths for selective decoding.
//!
//! A [`Path`] is parsed once from a textual form such as `$.user.name` or
//! `$['a.b'].c` and can then be applied to any number of documents. Segment
//! matching is case-insensitive throughout.

use alloc::{boxed::Box, string::String, sync::Arc, vec::Vec};
use core::{fmt, str::FromStr};

use crate::{
    DecodeOptions, Error, Result, Value,
    cursor::Context,
    decoder::{Decoder, DecoderRef, PathBoundDecoder},
};

/// A compiled, immutable sequence of object member names.
///
/// Cloning is cheap; the segments are shared.
///
/// # Examples
///
/// ```
/// use jsonvane::{IntDecoder, Path};
///
/// let path: Path = "$.a.B".parse()?;
/// let found = path.extract(br#"{"a":{"b":1},"c":2}"#, IntDecoder::<i64>::shared())?;
/// assert_eq!(found, Some(1));
/// # Ok::<(), jsonvane::Error>(())
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Path {
    raw: Box<str>,
    segments: Arc<[Box<str>]>,
}

/// A position within a [`Path`]: the segments still to be matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathNode<'p> {
    segments: &'p [Box<str>],
}

impl<'p> PathNode<'p> {
    /// The segment to match at this level, or `None` once the path has been
    /// fully matched.
    #[must_use]
    pub fn first(&self) -> Option<&'p str> {
        self.segments.first().map(|s| &**s)
    }

    /// The node below this one.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            segments: self.segments.get(1..).unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether `key` selects this node's segment.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        self.first().is_some_and(|segment| eq_ignore_case(key, segment))
    }
}

/// Unicode case-insensitive comparison that does not allocate.
pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

impl Path {
    /// Compiles a path.
    ///
    /// Accepted syntax: an optional leading `$`, then `.name` or `['name']`
    /// / `["name"]` member accesses. The first member may omit its dot.
    /// Bracketed names may contain dots. Array indices, wildcards and
    /// recursive descent are not supported.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPath`] naming the offset of the problem.
    pub fn parse(raw: &str) -> Result<Self> {
        let bytes = raw.as_bytes();
        let fail = |offset: usize, reason: &'static str| Error::InvalidPath {
            path: raw.into(),
            offset,
            reason,
        };
        if raw.is_empty() {
            return Err(fail(0, "empty path"));
        }

        let mut segments: Vec<Box<str>> = Vec::new();
        let mut i = 0;
        if bytes[0] == b'$' {
            i = 1;
        } else if !matches!(bytes[0], b'.' | b'[') {
            i = read_name(raw, 0, &fail, &mut segments)?;
        }

        while i < bytes.len() {
            match bytes[i] {
                b'.' => {
                    i += 1;
                    match bytes.get(i) {
                        Some(b'.') => return Err(fail(i, "recursive descent is not supported")),
                        Some(b'*') => return Err(fail(i, "wildcards are not supported")),
                        _ => {}
                    }
                    i = read_name(raw, i, &fail, &mut segments)?;
                }
                b'[' => {
                    i += 1;
                    let quote = match bytes.get(i) {
                        Some(&q @ (b'\'' | b'"')) => q,
                        Some(b'0'..=b'9' | b'-') => return Err(fail(i, "array indices are not supported")),
                        Some(b'*') => return Err(fail(i, "wildcards are not supported")),
                        _ => return Err(fail(i, "expected quoted member name")),
                    };
                    let start = i + 1;
                    let len = bytes[start..]
                        .iter()
                        .position(|&b| b == quote)
                        .ok_or_else(|| fail(i, "unterminated quoted name"))?;
                    if len == 0 {
                        return Err(fail(start, "empty member name"));
                    }
                    segments.push(raw[start..start + len].to_lowercase().into());
                    i = start + len + 1;
                    if bytes.get(i) != Some(&b']') {
                        return Err(fail(i, "expected ]"));
                    }
                    i += 1;
                }
                _ => return Err(fail(i, "expected . or [")),
            }
        }

        Ok(Self {
            raw: raw.into(),
            segments: segments.into(),
        })
    }

    /// The path as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The lowercased member names, outermost first.
    pub fn segments(&self) -> impl ExactSizeIterator<Item = &str> {
        self.segments.iter().map(|s| &**s)
    }

    #[must_use]
    pub fn node(&self) -> PathNode<'_> {
        PathNode {
            segments: &self.segments,
        }
    }

    /// Decodes `data` into `target` with this path installed, so that path
    /// aware decoders along the way only materialize the selected branch.
    ///
    /// # Errors
    ///
    /// Any decode error; see [`unmarshal_with`](Self::unmarshal_with).
    pub fn unmarshal<D>(&self, data: &[u8], decoder: &D, target: &mut D::Target) -> Result<()>
    where
        D: Decoder + ?Sized,
    {
        self.unmarshal_with(data, decoder, target, &DecodeOptions::default())
    }

    /// As [`unmarshal`](Self::unmarshal) with explicit options.
    ///
    /// # Errors
    ///
    /// Syntax and type errors encountered on the way to the selected value,
    /// and trailing data when the options disallow it. A path that does not
    /// occur in the document is not an error.
    pub fn unmarshal_with<D>(
        &self,
        data: &[u8],
        decoder: &D,
        target: &mut D::Target,
        options: &DecodeOptions,
    ) -> Result<()>
    where
        D: Decoder + ?Sized,
    {
        let mut ctx = Context::with_path(data, *options, self.node());
        let end = decoder.decode_path(&mut ctx, 0, 0, target)?;
        crate::decoder::finish(&mut ctx, end)
    }

    /// Decodes only the value this path selects, using `leaf` for it.
    ///
    /// Returns `None` when the path does not occur in `data`.
    ///
    /// # Errors
    ///
    /// Syntax errors anywhere in the document, and any error `leaf`
    /// reports for the selected value.
    pub fn extract<T>(&self, data: &[u8], leaf: DecoderRef<T>) -> Result<Option<T>>
    where
        T: Default + 'static,
    {
        let decoder = PathBoundDecoder::new(self.clone(), leaf);
        let mut found = None;
        crate::decode_slice(&decoder, data, &mut found, &DecodeOptions::default())?;
        Ok(found)
    }

    /// Looks the path up in an already-decoded [`Value`], matching member
    /// names case-insensitively.
    #[must_use]
    pub fn get<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        self.segments
            .iter()
            .try_fold(value, |v, segment| v.get_ignore_case(segment))
    }
}

fn read_name<F>(raw: &str, start: usize, fail: &F, segments: &mut Vec<Box<str>>) -> Result<usize>
where
    F: Fn(usize, &'static str) -> Error,
{
    let end = raw[start..]
        .find(['.', '['])
        .map_or(raw.len(), |n| start + n);
    if end == start {
        return Err(fail(start, "empty member name"));
    }
    segments.push(raw[start..end].to_lowercase().into());
    Ok(end)
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Path").field(&self.raw).finish()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        path.raw.into()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("$", vec![])]
    #[case("a", vec!["a"])]
    #[case("$.User.Name", vec!["user", "name"])]
    #[case("a.b", vec!["a", "b"])]
    #[case("$['a.b'].C", vec!["a.b", "c"])]
    #[case(r#"$["x"]['y']"#, vec!["x", "y"])]
    #[case(".a", vec!["a"])]
    fn parses_member_paths(#[case] raw: &str, #[case] expected: Vec<&str>) {
        let path = Path::parse(raw).unwrap();
        assert_eq!(path.segments().collect::<Vec<_>>(), expected);
        assert_eq!(path.as_str(), raw);
    }

    #[rstest]
    #[case("", 0, "empty path")]
    #[case("$..a", 2, "recursive descent is not supported")]
    #[case("$.a[0]", 4, "array indices are not supported")]
    #[case("$.*", 2, "wildcards are not supported")]
    #[case("$['a'", 5, "expected ]")]
    #[case("$['a", 2, "unterminated quoted name")]
    #[case("a.", 2, "empty member name")]
    #[case("$a", 1, "expected . or [")]
    fn rejects_unsupported_syntax(#[case] raw: &str, #[case] at: usize, #[case] why: &str) {
        match Path::parse(raw) {
            Err(Error::InvalidPath { offset, reason, .. }) => {
                assert_eq!((offset, reason), (at, why));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn nodes_walk_segments() {
        let path = Path::parse("a.b").unwrap();
        let node = path.node();
        assert!(node.matches("A"));
        assert!(!node.matches("b"));
        let child = node.child();
        assert_eq!(child.first(), Some("b"));
        assert!(child.child().is_empty());
        assert!(child.child().child().is_empty());
    }

    #[test]
    fn case_folding_covers_non_ascii() {
        assert!(eq_ignore_case("ÄPFEL", "äpfel"));
        assert!(eq_ignore_case("Id", "iD"));
        assert!(!eq_ignore_case("id", "idx"));
    }
}
