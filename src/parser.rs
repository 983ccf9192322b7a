//! The recursive-descent parser.
//!
//! A single mutable [`Cursor`] walks the source once, through a small set
//! of mutually recursive contexts: node body, node header, node data, the
//! three datum forms, block codec and body, comments, and escapes. The
//! parser is generic over the [`Storage`] policy, which is the only
//! difference between producing an owning tree and a borrowing one.
//!
//! There is no failure path. Every error site either consumes at least
//! one byte or is terminal, so parsing always reaches the end of the
//! source and always returns a tree; diagnostics go to the sink, subject
//! to the error budget.

use crate::cursor::{line_column, Cursor};
use crate::error::{ErrorKind, ParseError};
use crate::node::Node;
use crate::options::ParseOptions;
use crate::storage::Storage;
use crate::syntax::{
    self, is_identifier, is_newline, is_whitespace, is_whitespace_or_newline, BASE64_CODEC,
    BLOCK_CLOSE, BLOCK_OPEN, COMMENT_MARKER, COMMENT_MULTILINE_MARKER, DATA_TERMINATOR,
    ESCAPE_MARKER, NESTED_MARKER, STRING_MARKER, TEXT_CODEC,
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum DataKind {
    Identifier,
    String,
    Block,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Codec {
    Text,
    Base64,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Comment {
    CrossedNewline,
    StayedOnLine,
    NotAComment,
}

pub(crate) struct Parser<S, F> {
    storage: S,
    cursor: Cursor,
    recursion_limit: usize,
    errors_left: usize,
    sink: F,
}

impl<S, F> Parser<S, F>
where
    S: Storage,
    F: FnMut(ParseError),
{
    pub(crate) fn new(storage: S, options: &ParseOptions, sink: F) -> Self {
        Parser {
            storage,
            cursor: Cursor::default(),
            recursion_limit: options.recursion_limit,
            errors_left: options.error_limit,
            sink,
        }
    }

    pub(crate) fn parse_document(&mut self, root: &mut Node<S::Str>) {
        self.node_body(root, 0, 0);
    }

    pub(crate) fn into_storage(self) -> S {
        self.storage
    }

    // Cursor plumbing

    #[inline]
    fn eof(&self) -> bool {
        self.cursor.eof(self.storage.bytes())
    }

    #[inline]
    fn cur(&self) -> u8 {
        self.cursor.current(self.storage.bytes())
    }

    #[inline]
    fn peek(&self) -> u8 {
        self.cursor.peek_next(self.storage.bytes())
    }

    #[inline]
    fn pos(&self) -> usize {
        self.cursor.pos()
    }

    #[inline]
    fn advance(&mut self) {
        self.cursor.advance(self.storage.bytes());
    }

    /// Skips bytes matching `pred`; returns `false` once at end of input.
    fn skip(&mut self, pred: impl Fn(u8) -> bool) -> bool {
        while !self.eof() && pred(self.cur()) {
            self.advance();
        }
        !self.eof()
    }

    /// Skips bytes matching `pred` and returns the skipped range.
    fn read(&mut self, pred: impl Fn(u8) -> bool) -> (usize, usize) {
        let start = self.pos();
        self.skip(pred);
        (start, self.pos())
    }

    fn report(&mut self, kind: ErrorKind, byte: u8, at: usize) {
        if self.errors_left == 0 {
            return;
        }
        self.errors_left -= 1;
        let (line, column) = line_column(self.storage.bytes(), at);
        (self.sink)(ParseError {
            kind,
            byte,
            line,
            column,
        });
    }

    // Contexts

    /// The body of a node: children until a closing `#` or end of input.
    fn node_body(&mut self, node: &mut Node<S::Str>, depth: usize, start_pos: usize) {
        while self.skip(is_whitespace_or_newline) {
            if self.cur() == COMMENT_MARKER && self.comment() != Comment::NotAComment {
                continue;
            }

            let nested_start = self.pos();
            let is_nested = self.cur() == NESTED_MARKER;
            if is_nested {
                self.advance();
                if self.eof() || is_whitespace_or_newline(self.cur()) {
                    // A bare `#` closes the current body.
                    if depth == 0 {
                        self.report(ErrorKind::TooManyNodeClosingMarkers, 0, nested_start);
                    }
                    return;
                }
            }

            match self.detect_data_kind() {
                Some(kind @ (DataKind::Identifier | DataKind::String)) => {
                    let child = self.node_header(node, kind);
                    if depth + 1 >= self.recursion_limit {
                        self.report(ErrorKind::RecursionLimitReached, 0, nested_start);
                        self.skip(|b| !is_newline(b));
                    } else if is_nested {
                        self.node_body(&mut node.children[child], depth + 1, nested_start);
                    }
                }
                _ => {
                    self.report(ErrorKind::IllegalCharacter, self.cur(), self.pos());
                    // An unconsumed `#` is picked up as a nested marker on
                    // the next iteration instead.
                    if self.cur() != NESTED_MARKER {
                        self.advance();
                    }
                }
            }
        }

        if depth > 0 {
            self.report(ErrorKind::NodeNotClosed, 0, start_pos);
        }
    }

    /// One header line: appends a child, fills its id and data list, and
    /// returns the child's index.
    fn node_header(&mut self, parent: &mut Node<S::Str>, kind: DataKind) -> usize {
        let mut child = Node {
            id: self.single_data(kind),
            data: Vec::new(),
            children: Vec::new(),
        };
        self.node_data(&mut child);
        parent.children.push(child);
        parent.children.len() - 1
    }

    /// The data list of a header line, up to the newline, a `;`, or a
    /// comment that crosses onto the next line.
    fn node_data(&mut self, node: &mut Node<S::Str>) {
        while self.skip(is_whitespace) {
            let byte = self.cur();
            if byte == COMMENT_MARKER {
                match self.comment() {
                    Comment::CrossedNewline => return,
                    Comment::StayedOnLine => continue,
                    // A lone `/` starts an identifier datum.
                    Comment::NotAComment => {}
                }
            } else if byte == DATA_TERMINATOR {
                self.advance();
                return;
            } else if byte == ESCAPE_MARKER {
                // Line continuation.
                self.advance();
                self.skip_whitespace_until_newline();
                continue;
            } else if is_newline(byte) {
                return;
            }

            match self.detect_data_kind() {
                Some(kind) => {
                    let datum = self.single_data(kind);
                    node.data.push(datum);
                }
                None => {
                    self.report(ErrorKind::IllegalCharacter, byte, self.pos());
                    self.advance();
                }
            }
        }
    }

    fn detect_data_kind(&self) -> Option<DataKind> {
        let byte = self.cur();
        if is_identifier(byte) {
            Some(DataKind::Identifier)
        } else if byte == STRING_MARKER {
            Some(DataKind::String)
        } else if byte == BLOCK_OPEN {
            Some(DataKind::Block)
        } else {
            None
        }
    }

    fn single_data(&mut self, kind: DataKind) -> S::Str {
        match kind {
            DataKind::Identifier => self.identifier_data(),
            DataKind::String => self.string_data(),
            DataKind::Block => self.block_data(),
        }
    }

    fn identifier_data(&mut self) -> S::Str {
        let mut data = self.storage.make_data(self.pos());
        let (start, end) = self.read(is_identifier);
        self.storage.append_run(&mut data, start, end);
        data
    }

    fn string_data(&mut self) -> S::Str {
        let start_pos = self.pos();
        // Opening quote.
        self.advance();

        let mut data = self.storage.make_data(self.pos());
        loop {
            let (start, end) =
                self.read(|b| b != STRING_MARKER && b != ESCAPE_MARKER && !is_newline(b));
            self.storage.append_run(&mut data, start, end);

            if self.eof() {
                break;
            }
            let byte = self.cur();
            if byte == STRING_MARKER {
                self.advance();
                return data;
            } else if byte == ESCAPE_MARKER {
                self.read_escape(&mut data);
            } else {
                // Newline: strings cannot span lines.
                break;
            }
        }

        self.report(ErrorKind::StringNotClosed, 0, start_pos);
        data
    }

    fn block_data(&mut self) -> S::Str {
        let start_pos = self.pos();
        // Opening brace.
        self.advance();

        if !self.skip(is_whitespace) {
            self.report(ErrorKind::BlockNotClosed, 0, start_pos);
            let pos = self.pos();
            return self.storage.make_data(pos);
        }

        let is_base64 = is_identifier(self.cur()) && self.block_codec() == Codec::Base64;
        self.skip_whitespace_until_newline();

        let mut data = self.block_body(start_pos, is_base64);
        if is_base64 {
            self.storage.decode_base64(&mut data);
        }
        data
    }

    fn block_codec(&mut self) -> Codec {
        let codec_start = self.pos();
        let (start, end) = self.read(is_identifier);

        let word = &self.storage.bytes()[start..end];
        if word == BASE64_CODEC {
            return Codec::Base64;
        }
        if word != TEXT_CODEC {
            // Recoverable: assume text and keep going.
            self.report(ErrorKind::BadCodec, 0, codec_start);
        }
        Codec::Text
    }

    /// The lines of a block. The first content line fixes the indentation
    /// depth in bytes; a `}` strictly left of that depth (or anywhere on
    /// the first line) closes the block.
    fn block_body(&mut self, start_pos: usize, is_base64: bool) -> S::Str {
        let before_indent = self.pos();
        self.skip(is_whitespace);
        let indent_depth = self.pos() - before_indent;

        let pos = self.pos();
        let mut data = self.storage.make_data(pos);
        let mut is_first_line = true;
        let mut line_start = before_indent;

        while !self.eof() {
            if self.cur() == BLOCK_CLOSE {
                if is_first_line || self.pos() - line_start < indent_depth {
                    self.advance();
                    return data;
                }
                // At content indentation: kept as text, but flagged.
                self.report(ErrorKind::BadBlockClose, 0, self.pos());
            }

            if !is_first_line && !is_base64 {
                self.storage.append_byte(&mut data, b'\n');
            }

            self.block_line(&mut data);

            // Skip up to one indentation's worth of whitespace on the
            // next line; anything beyond it is content.
            line_start = self.pos();
            let target = line_start + indent_depth;
            while !self.eof() && self.pos() < target && is_whitespace(self.cur()) {
                self.advance();
            }
            is_first_line = false;
        }

        self.report(ErrorKind::BlockNotClosed, 0, start_pos);
        data
    }

    fn block_line(&mut self, data: &mut S::Str) {
        while !self.eof() {
            let (start, end) = self.read(|b| !is_newline(b) && b != ESCAPE_MARKER);
            self.storage.append_run(data, start, end);

            if self.eof() {
                break;
            } else if is_newline(self.cur()) {
                self.advance();
                return;
            } else {
                self.read_escape(data);
            }
        }
    }

    /// Resolves one `\x` escape into `data`. Unrecognised letters emit
    /// nothing but are still consumed, so the parser keeps moving.
    fn read_escape(&mut self, data: &mut S::Str) {
        // The backslash.
        self.advance();

        match syntax::escape_value(self.cur()) {
            Some(byte) => {
                self.storage.append_byte(data, byte);
                self.advance();
            }
            None => {
                self.report(ErrorKind::InvalidEscape, self.cur(), self.pos());
                if !self.eof() {
                    self.advance();
                }
            }
        }
    }

    /// Consumes trailing whitespace and the newline ending the current
    /// line, flagging (and discarding) anything else before it.
    fn skip_whitespace_until_newline(&mut self) {
        self.skip(is_whitespace);

        if !self.eof() && !is_newline(self.cur()) {
            self.report(ErrorKind::RequireNewline, self.cur(), self.pos());
            self.skip(|b| !is_newline(b));
        }

        if !self.eof() {
            self.advance();
        }
    }

    /// Skips `//` and `/* ... */` comments, reporting whether the comment
    /// moved past a newline (which ends a data context).
    fn comment(&mut self) -> Comment {
        let start_pos = self.pos();

        let next = self.peek();
        if next == COMMENT_MULTILINE_MARKER {
            self.advance();
            self.advance();

            let mut kind = Comment::StayedOnLine;
            while !self.eof() {
                if self.cur() == COMMENT_MULTILINE_MARKER && self.peek() == COMMENT_MARKER {
                    self.advance();
                    self.advance();
                    return kind;
                }
                if is_newline(self.cur()) {
                    kind = Comment::CrossedNewline;
                }
                self.advance();
            }

            self.report(ErrorKind::CommentNotClosed, 0, start_pos);
            kind
        } else if next == COMMENT_MARKER {
            self.skip(|b| !is_newline(b));
            Comment::CrossedNewline
        } else {
            Comment::NotAComment
        }
    }
}
