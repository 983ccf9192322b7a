//! # nodus
//!
//! Parser and writer for the nodus format: a small, human-editable,
//! hierarchical document format. A document is a tree of named nodes;
//! each node has an id, an ordered list of data fields, and an ordered
//! list of children.
//!
//! ## The format
//!
//! ```text
//! // Line comments, or /* block comments */.
//! Server web-1 "primary web head"
//! #Listen
//! 	Address 10.0.0.1 ; Port 8080
//! 	Secret { base64
//! 		AQIDBAU=
//! 	}
//! #
//! Motd {
//! 	Scheduled downtime at midnight,
//! 	then back to normal.
//! }
//! ```
//!
//! - A line `Id datum datum ...` is a node. A datum is a bare
//!   identifier, a `"quoted string"` with `\` escapes, or a `{ ... }`
//!   block: multiple lines, indentation-delimited, optionally prefixed
//!   with a codec word (`text`, the default, or `base64`).
//! - `#Id` opens a node that contains the following nodes; a lone `#`
//!   closes it.
//! - `;` ends a node's data list (several nodes can share a line), and a
//!   trailing `\` continues the list onto the next line.
//!
//! ## Key features
//!
//! - **Total parsing**: every input produces a tree. Problems are
//!   reported through an error sink with line/column positions and a
//!   bounded budget; the parser always recovers and runs to the end.
//! - **Two storage modes**: [`from_slice`] copies strings out of the
//!   source; [`from_mut_slice`] returns a zero-copy [`DocumentView`]
//!   whose strings borrow from your buffer, with escapes and base64
//!   resolved by rewriting the buffer in place.
//! - **Round-trip-stable writing**: [`to_bytes`] picks the most compact
//!   encoding per datum, re-parses to an equal tree, and is a fixpoint —
//!   writing what you parsed from written output reproduces it byte for
//!   byte.
//! - **Binary-safe**: data fields are byte strings; binary data travels
//!   in base64 blocks.
//!
//! ## Quick start
//!
//! ```rust
//! let doc = nodus::from_slice("Hello world!");
//!
//! assert_eq!(doc.children.len(), 1);
//! assert_eq!(doc.children[0].id_str(), Some("Hello"));
//! assert_eq!(doc.children[0].data_str_at(0), Some("world!"));
//!
//! assert_eq!(nodus::to_bytes(&doc), b"Hello world!\n");
//! ```
//!
//! Zero-copy parsing borrows from (and rewrites) the source buffer:
//!
//! ```rust
//! let mut buf = b"Key \"va\\tlue\"".to_vec();
//! let view = nodus::from_mut_slice(&mut buf);
//! assert_eq!(view.children[0].data_at(0), Some(&b"va\tlue"[..]));
//! ```
//!
//! Diagnostics go to a sink instead of failing the parse:
//!
//! ```rust
//! use nodus::ErrorKind;
//!
//! let mut errors = Vec::new();
//! let doc = nodus::from_slice_with("Key \"open\nNext", |e| errors.push(e));
//!
//! assert_eq!(doc.children.len(), 2);
//! assert_eq!(errors[0].kind, ErrorKind::StringNotClosed);
//! ```

pub mod convert;
pub mod error;
pub mod node;
pub mod options;

mod base64;
mod cursor;
mod parser;
mod storage;
mod syntax;
mod writer;

pub use convert::{as_bool, as_integer, opt_bool, opt_integer, Integer};
pub use error::{ErrorKind, ParseError};
pub use node::{Document, DocumentView, Node};
pub use options::{Indent, ParseOptions, WriteOptions};

use parser::Parser;
use storage::{resolve_spans, OwnedStorage, ViewStorage};
use writer::Writer;

use std::io;

/// Parses `source` into an owning [`Document`], ignoring diagnostics.
///
/// Parsing cannot fail; malformed input yields the tree that error
/// recovery produces. Use [`from_slice_with`] to observe diagnostics.
///
/// # Examples
///
/// ```rust
/// let doc = nodus::from_slice("Key value1 \"value 2\"");
/// assert_eq!(doc.children[0].data.len(), 2);
/// ```
#[must_use]
pub fn from_slice(source: impl AsRef<[u8]>) -> Document {
    from_slice_with(source, |_| {})
}

/// Parses `source` into an owning [`Document`], reporting diagnostics to
/// `sink`.
///
/// # Examples
///
/// ```rust
/// let mut errors = Vec::new();
/// let _ = nodus::from_slice_with("#Unclosed", |e| errors.push(e));
/// assert_eq!(errors.len(), 1);
/// ```
#[must_use]
pub fn from_slice_with(source: impl AsRef<[u8]>, sink: impl FnMut(ParseError)) -> Document {
    from_slice_with_options(source, &ParseOptions::default(), sink)
}

/// Parses `source` into an owning [`Document`] with explicit
/// [`ParseOptions`].
///
/// # Examples
///
/// ```rust
/// use nodus::{ErrorKind, ParseOptions};
///
/// let options = ParseOptions::new().with_error_limit(1);
/// let mut errors = Vec::new();
/// let _ = nodus::from_slice_with_options("\x01\x01\x01", &options, |e| errors.push(e));
/// assert_eq!(errors.len(), 1);
/// ```
#[must_use]
pub fn from_slice_with_options(
    source: impl AsRef<[u8]>,
    options: &ParseOptions,
    sink: impl FnMut(ParseError),
) -> Document {
    let mut doc = Document::default();
    from_slice_into_with_options(&mut doc, source, options, sink);
    doc
}

/// Parses `source` and appends its top-level nodes onto an existing
/// document.
///
/// # Examples
///
/// ```rust
/// use nodus::Document;
///
/// let mut doc = Document::default();
/// nodus::from_slice_into(&mut doc, "EmptyNode");
/// nodus::from_slice_into(&mut doc, "NodeWithData data1 data2");
/// assert_eq!(doc.children.len(), 2);
/// ```
pub fn from_slice_into(doc: &mut Document, source: impl AsRef<[u8]>) {
    from_slice_into_with_options(doc, source, &ParseOptions::default(), |_| {});
}

/// [`from_slice_into`] with explicit options and an error sink.
pub fn from_slice_into_with_options(
    doc: &mut Document,
    source: impl AsRef<[u8]>,
    options: &ParseOptions,
    sink: impl FnMut(ParseError),
) {
    let mut parser = Parser::new(OwnedStorage::new(source.as_ref()), options, sink);
    parser.parse_document(doc);
}

/// Parses in place, returning a [`DocumentView`] whose strings borrow
/// from `source`.
///
/// Escape sequences and base64 blocks are resolved by rewriting `source`
/// (rewrites only ever shrink, shifting bytes leftward), so no string
/// bytes are copied or allocated — only the tree structure is. The view
/// is valid for as long as the buffer borrow lasts.
///
/// # Examples
///
/// ```rust
/// let mut buf = b"Greeting { base64\n\taGVsbG8=\n}".to_vec();
/// let view = nodus::from_mut_slice(&mut buf);
/// assert_eq!(view.children[0].data_at(0), Some(&b"hello"[..]));
/// ```
#[must_use]
pub fn from_mut_slice(source: &mut [u8]) -> DocumentView<'_> {
    from_mut_slice_with(source, |_| {})
}

/// [`from_mut_slice`], reporting diagnostics to `sink`.
#[must_use]
pub fn from_mut_slice_with<'src>(
    source: &'src mut [u8],
    sink: impl FnMut(ParseError),
) -> DocumentView<'src> {
    from_mut_slice_with_options(source, &ParseOptions::default(), sink)
}

/// [`from_mut_slice`] with explicit [`ParseOptions`] and an error sink.
#[must_use]
pub fn from_mut_slice_with_options<'src>(
    source: &'src mut [u8],
    options: &ParseOptions,
    sink: impl FnMut(ParseError),
) -> DocumentView<'src> {
    let mut root = Node::default();
    let mut parser = Parser::new(ViewStorage::new(source), options, sink);
    parser.parse_document(&mut root);
    resolve_spans(parser.into_storage().into_bytes(), root)
}

/// Writes a document to bytes with default [`WriteOptions`].
///
/// The node passed in is treated as the root: its children become the
/// top-level nodes, and its own id and data are ignored (a root cannot be
/// represented in the format).
///
/// # Examples
///
/// ```rust
/// use nodus::{Document, Node};
///
/// let mut doc = Document::default();
/// doc.children.push(Node::with_data("Key", ["a", "b c"]));
/// assert_eq!(nodus::to_bytes(&doc), b"Key a \"b c\"\n");
/// ```
#[must_use]
pub fn to_bytes<S: AsRef<[u8]>>(root: &Node<S>) -> Vec<u8> {
    to_bytes_with_options(root, &WriteOptions::default())
}

/// Writes a document to bytes with explicit [`WriteOptions`].
///
/// # Examples
///
/// ```rust
/// use nodus::{Document, Node, WriteOptions, Indent};
///
/// let mut doc = Document::default();
/// let mut node = Node::with_data("Node", ["text"]);
/// node.children.push(Node::with_data("Nested", ["more data"]));
/// doc.children.push(node);
///
/// let options = WriteOptions::new().with_indent(Indent::Spaces, 4);
/// let out = nodus::to_bytes_with_options(&doc, &options);
/// assert_eq!(out, b"#Node text\n    Nested \"more data\"\n#\n");
/// ```
#[must_use]
pub fn to_bytes_with_options<S: AsRef<[u8]>>(root: &Node<S>, options: &WriteOptions) -> Vec<u8> {
    let mut out = Vec::new();
    let mut writer = Writer::new(options, |bytes: &[u8]| out.extend_from_slice(bytes));
    writer.write_document(root);
    out
}

/// Writes a document to an [`io::Write`] with default [`WriteOptions`].
///
/// # Errors
///
/// Returns any error the underlying writer reports.
pub fn to_writer<W: io::Write, S: AsRef<[u8]>>(writer: W, root: &Node<S>) -> io::Result<()> {
    to_writer_with_options(writer, root, &WriteOptions::default())
}

/// Writes a document to an [`io::Write`] with explicit [`WriteOptions`].
///
/// # Errors
///
/// Returns any error the underlying writer reports.
pub fn to_writer_with_options<W: io::Write, S: AsRef<[u8]>>(
    mut writer: W,
    root: &Node<S>,
    options: &WriteOptions,
) -> io::Result<()> {
    writer.write_all(&to_bytes_with_options(root, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_write_round_trip() {
        let doc = from_slice("Hello world!");
        assert_eq!(doc.children.len(), 1);
        assert_eq!(doc.children[0].id, b"Hello");
        assert_eq!(to_bytes(&doc), b"Hello world!\n");
    }

    #[test]
    fn empty_input_is_an_empty_root() {
        let mut errors = Vec::new();
        let doc = from_slice_with("", |e| errors.push(e));
        assert!(doc.id.is_empty());
        assert!(doc.data.is_empty());
        assert!(doc.children.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn view_and_owned_agree() {
        let source = "#Outer inline\n\tInner \"two words\"\n#\n";
        let owned = from_slice(source);

        let mut buf = source.as_bytes().to_vec();
        let view = from_mut_slice(&mut buf);

        assert_eq!(view, owned);
    }

    #[test]
    fn append_parsing_accumulates() {
        let mut doc = Document::default();
        from_slice_into(&mut doc, "First");
        from_slice_into(&mut doc, "#Second\nChild\n#");
        assert_eq!(doc.children.len(), 2);
        assert_eq!(doc.children[1].children.len(), 1);
    }

    #[test]
    fn to_writer_matches_to_bytes() {
        let doc = from_slice("Key value\n#Nested\nInner\n#\n");
        let mut out = Vec::new();
        to_writer(&mut out, &doc).unwrap();
        assert_eq!(out, to_bytes(&doc));
    }

    #[test]
    fn error_budget_is_respected() {
        let source = "\x01".repeat(50);
        let mut count = 0;
        let _ = from_slice_with(&source, |_| count += 1);
        assert_eq!(count, 10);

        let mut count = 0;
        let options = ParseOptions::new().with_error_limit(3);
        let _ = from_slice_with_options(&source, &options, |_| count += 1);
        assert_eq!(count, 3);
    }
}
