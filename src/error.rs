//! Parse diagnostics for the nodus format.
//!
//! Parsing never fails: the parser always returns a (possibly partial)
//! tree and reports problems through a caller-supplied sink instead of an
//! error return. Each diagnostic carries its [`ErrorKind`], the offending
//! byte where one applies, and a 1-based (line, column) position.
//!
//! A sink is any `FnMut(ParseError)`. The number of invocations per parse
//! is bounded by [`ParseOptions::error_limit`](crate::ParseOptions);
//! further diagnostics are dropped while parsing continues to completion.
//!
//! ## Examples
//!
//! ```rust
//! use nodus::{from_slice_with, ErrorKind};
//!
//! let mut errors = Vec::new();
//! let doc = from_slice_with("Key \"unterminated", |e| errors.push(e));
//!
//! assert_eq!(doc.children.len(), 1);
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].kind, ErrorKind::StringNotClosed);
//! assert_eq!((errors[0].line, errors[0].column), (1, 5));
//! ```

use thiserror::Error;

/// The kinds of problems the parser can report.
///
/// Kinds with a discriminant below [`ErrorKind::RequireNewline`] are
/// errors; the rest are warnings — the parser recovered without losing
/// data, but the source probably does not mean what it says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[repr(u8)]
pub enum ErrorKind {
    /// A byte was encountered where no grammar production applies. The
    /// byte is skipped and carried in [`ParseError::byte`].
    #[error("illegal character")]
    IllegalCharacter = 0,
    /// End of input inside a nested node body. Reported at the `#` that
    /// opened the unclosed node.
    #[error("nested node is never closed")]
    NodeNotClosed = 1,
    /// End of input inside `/* ... */`. Reported at the opening `/*`.
    #[error("comment is never closed")]
    CommentNotClosed = 2,
    /// Newline or end of input inside a quoted string. Reported at the
    /// opening `"`.
    #[error("string is never closed")]
    StringNotClosed = 3,
    /// End of input inside a block. Reported at the opening `{`.
    #[error("block is never closed")]
    BlockNotClosed = 4,
    /// A closing `#` with no nested node open. Reported at the stray `#`.
    #[error("too many node closing markers")]
    TooManyNodeClosingMarkers = 5,
    /// The codec word of a block was neither `text` nor `base64`; `text`
    /// is assumed. Reported at the start of the codec word.
    #[error("unknown block codec")]
    BadCodec = 6,
    /// Descending into this node would exceed the configured recursion
    /// limit; the node keeps its data but its body is not entered.
    #[error("recursion limit reached")]
    RecursionLimitReached = 7,
    /// Warning: a non-whitespace byte before the newline that should end
    /// a line continuation or a block codec line. The rest of the line is
    /// discarded.
    #[error("expected newline")]
    RequireNewline = 8,
    /// Warning: `\` followed by an unrecognised escape letter; no byte is
    /// emitted.
    #[error("invalid escape sequence")]
    InvalidEscape = 9,
    /// Warning: a `}` at the content indentation of a block rather than
    /// strictly left of it. It is kept as literal text; escape it if that
    /// is what you mean.
    #[error("misaligned block close")]
    BadBlockClose = 10,
}

impl ErrorKind {
    /// Returns `true` for the warning kinds ([`ErrorKind::RequireNewline`]
    /// and above).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nodus::ErrorKind;
    ///
    /// assert!(!ErrorKind::StringNotClosed.is_warning());
    /// assert!(ErrorKind::InvalidEscape.is_warning());
    /// ```
    #[must_use]
    pub const fn is_warning(self) -> bool {
        self as u8 >= ErrorKind::RequireNewline as u8
    }
}

/// One diagnostic reported during a parse.
///
/// `byte` is the offending byte for the kinds that have one
/// ([`ErrorKind::IllegalCharacter`], [`ErrorKind::RequireNewline`],
/// [`ErrorKind::InvalidEscape`]) and `0` otherwise. `line` and `column`
/// are 1-based and derived by counting LFs, so CRLF input positions match
/// what an editor shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub byte: u8,
    pub line: usize,
    pub column: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_threshold() {
        assert!(!ErrorKind::IllegalCharacter.is_warning());
        assert!(!ErrorKind::RecursionLimitReached.is_warning());
        assert!(ErrorKind::RequireNewline.is_warning());
        assert!(ErrorKind::BadBlockClose.is_warning());
    }

    #[test]
    fn display_includes_position() {
        let err = ParseError {
            kind: ErrorKind::StringNotClosed,
            byte: 0,
            line: 3,
            column: 7,
        };
        assert_eq!(err.to_string(), "string is never closed at line 3, column 7");
    }
}
