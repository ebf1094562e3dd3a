/// Nesting ceiling applied when no other limit is configured.
///
/// Every object or array entered while decoding (or compacting) counts one
/// level. Inputs nested deeper than this fail with
/// [`Error::ExceededMaxDepth`](crate::Error::ExceededMaxDepth) instead of
/// exhausting the stack.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Initial number of bytes requested from a stream source per refill.
pub const DEFAULT_STREAM_CHUNK_SIZE: usize = 512;

/// Configuration for the decode entry points.
///
/// # Examples
///
/// ```rust
/// use jsonvane::DecodeOptions;
///
/// let options = DecodeOptions {
///     max_depth: 64,
///     ..Default::default()
/// };
/// assert!(options.disallow_trailing_data);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Maximum nesting of objects and arrays.
    ///
    /// # Default
    ///
    /// [`DEFAULT_MAX_DEPTH`]
    pub max_depth: usize,

    /// Whether the top-level entry points reject non-whitespace bytes after
    /// the decoded value.
    ///
    /// When `false`, decoding stops right after the first value and whatever
    /// follows is left unread. This supports concatenated documents such as
    /// newline-delimited JSON.
    ///
    /// # Default
    ///
    /// `true`
    pub disallow_trailing_data: bool,

    /// Number of bytes requested from the source on the first refill in
    /// stream mode.
    ///
    /// The request doubles whenever a single token outgrows the working
    /// buffer, so this only tunes how eagerly small documents are read.
    ///
    /// # Default
    ///
    /// [`DEFAULT_STREAM_CHUNK_SIZE`]
    pub stream_chunk_size: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            disallow_trailing_data: true,
            stream_chunk_size: DEFAULT_STREAM_CHUNK_SIZE,
        }
    }
}

/// Configuration for [`compact_with`](crate::compact_with).
#[derive(Debug, Clone, Copy)]
pub struct CompactOptions {
    /// Rewrite `<`, `>`, `&`, U+2028 and U+2029 inside strings as `\u`
    /// escapes so the output can be embedded in HTML `<script>` tags.
    ///
    /// # Default
    ///
    /// `false`
    pub escape_html: bool,

    /// Maximum nesting of objects and arrays.
    ///
    /// # Default
    ///
    /// [`DEFAULT_MAX_DEPTH`]
    pub max_depth: usize,
}

impl Default for CompactOptions {
    fn default() -> Self {
        Self {
            escape_html: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
