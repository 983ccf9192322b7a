//! Configuration for parsing and writing.
//!
//! Both option structs follow the builder pattern:
//!
//! - [`ParseOptions`]: recursion and error-budget limits for the parser
//! - [`WriteOptions`]: indentation, encoding thresholds and base64 layout
//!   for the writer
//!
//! ## Examples
//!
//! ```rust
//! use nodus::{ParseOptions, WriteOptions, Indent};
//!
//! let parse = ParseOptions::new().with_recursion_limit(64).with_error_limit(1);
//! assert_eq!(parse.recursion_limit, 64);
//!
//! let write = WriteOptions::new()
//!     .with_indent(Indent::Spaces, 4)
//!     .with_block_threshold(256);
//! assert_eq!(write.indent_width, 4);
//! ```

/// Parser limits.
///
/// Parsing is recursive over nested nodes, so the recursion limit bounds
/// stack use on hostile input; the error limit bounds how often the error
/// sink is invoked. Neither limit stops the parse — see the crate docs.
///
/// # Examples
///
/// ```rust
/// use nodus::ParseOptions;
///
/// let options = ParseOptions::default();
/// assert_eq!(options.recursion_limit, 2000);
/// assert_eq!(options.error_limit, 10);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum node-body depth the parser descends into. A node at the
    /// limit keeps its id and data, but its body is skipped and
    /// [`ErrorKind::RecursionLimitReached`](crate::ErrorKind) reported.
    pub recursion_limit: usize,
    /// Maximum number of diagnostics delivered to the sink per parse;
    /// further ones are silently dropped.
    pub error_limit: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            recursion_limit: 2000,
            error_limit: 10,
        }
    }
}

impl ParseOptions {
    /// Creates the default limits (recursion 2000, error budget 10).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Sets the error budget.
    #[must_use]
    pub fn with_error_limit(mut self, limit: usize) -> Self {
        self.error_limit = limit;
        self
    }
}

/// Indentation style for the writer.
///
/// # Examples
///
/// ```rust
/// use nodus::Indent;
///
/// assert_eq!(Indent::Tabs.as_byte(), b'\t');
/// assert_eq!(Indent::Spaces.as_byte(), b' ');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Indent {
    #[default]
    Tabs,
    Spaces,
}

impl Indent {
    /// Returns the byte this indentation style repeats.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Indent::Tabs => b'\t',
            Indent::Spaces => b' ',
        }
    }
}

/// Writer formatting parameters.
///
/// The defaults (tabs, one per level, block threshold 128, base64 width
/// 60) produce output that re-parses to the same tree and is stable under
/// a further write.
///
/// # Examples
///
/// ```rust
/// use nodus::{to_bytes_with_options, Document, Node, WriteOptions, Indent};
///
/// let mut doc = Document::default();
/// doc.children.push(Node::with_data("Key", ["value"]));
///
/// let options = WriteOptions::new().with_indent(Indent::Spaces, 2);
/// let out = to_bytes_with_options(&doc, &options);
/// assert_eq!(out, b"Key value\n");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    /// Whether indentation uses tabs or spaces.
    pub indent_kind: Indent,
    /// Number of indentation bytes per depth level.
    pub indent_width: usize,
    /// Any datum at least this long is written as a block.
    pub block_threshold: usize,
    /// How far into a datum to look for binary bytes when deciding
    /// whether it needs a base64 block. The scan always covers at least
    /// [`WriteOptions::block_threshold`] bytes; binary bytes past the
    /// bound end up verbatim inside a text block.
    pub binary_scan_limit: usize,
    /// Base64 characters per line, effectively rounded up to a multiple
    /// of four (minimum one quartet per line).
    pub base64_line_width: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            indent_kind: Indent::Tabs,
            indent_width: 1,
            block_threshold: 128,
            binary_scan_limit: usize::MAX,
            base64_line_width: 60,
        }
    }
}

impl WriteOptions {
    /// Creates the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation style and width.
    #[must_use]
    pub fn with_indent(mut self, kind: Indent, width: usize) -> Self {
        self.indent_kind = kind;
        self.indent_width = width;
        self
    }

    /// Sets the length at which a datum is forced into a block.
    #[must_use]
    pub fn with_block_threshold(mut self, threshold: usize) -> Self {
        self.block_threshold = threshold;
        self
    }

    /// Sets the binary-detection scan bound.
    #[must_use]
    pub fn with_binary_scan_limit(mut self, limit: usize) -> Self {
        self.binary_scan_limit = limit;
        self
    }

    /// Sets the base64 line width.
    #[must_use]
    pub fn with_base64_line_width(mut self, width: usize) -> Self {
        self.base64_line_width = width;
        self
    }
}
