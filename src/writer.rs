//! The document writer.
//!
//! A recursive walk over the tree that picks the most compact encoding
//! for each datum — bare identifier, quoted string, text block, or base64
//! block — and emits deterministic, round-trip-stable output: parsing
//! what the writer produced yields a structurally equal tree, and writing
//! that tree again yields identical bytes.

use crate::node::Node;
use crate::options::WriteOptions;
use crate::syntax::{self, is_binary, is_identifier, is_whitespace};
use crate::base64;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Identifier,
    String,
    Block,
    Base64Block,
}

pub(crate) struct Writer<'opt, F> {
    sink: F,
    options: &'opt WriteOptions,
    indent_byte: u8,
}

impl<'opt, F: FnMut(&[u8])> Writer<'opt, F> {
    pub(crate) fn new(options: &'opt WriteOptions, sink: F) -> Self {
        Writer {
            sink,
            options,
            indent_byte: options.indent_kind.as_byte(),
        }
    }

    /// Writes `node`'s children as a document. The node itself is treated
    /// as the root: its own id and data are not representable at depth 0
    /// and are ignored.
    pub(crate) fn write_document<S: AsRef<[u8]>>(&mut self, root: &Node<S>) {
        self.write_node(root, 0);
    }

    fn write_node<S: AsRef<[u8]>>(&mut self, node: &Node<S>, depth: usize) {
        if depth > 0 {
            self.indent(depth - 1);
            if !node.children.is_empty() {
                self.emit(b"#");
            }

            let id = node.id.as_ref();
            match id_encoding(id) {
                Encoding::Identifier => self.emit(id),
                _ => self.write_string(id),
            }

            for data in &node.data {
                self.write_data(data.as_ref(), depth - 1);
            }
            self.emit(b"\n");
        }

        for child in &node.children {
            self.write_node(child, depth + 1);
        }

        if depth > 0 && !node.children.is_empty() {
            self.indent(depth - 1);
            self.emit(b"#\n");
        }
    }

    fn write_data(&mut self, data: &[u8], depth: usize) {
        self.emit(b" ");
        match self.data_encoding(data) {
            Encoding::Identifier => self.emit(data),
            Encoding::String => self.write_string(data),
            Encoding::Block => self.write_block(data, depth),
            Encoding::Base64Block => self.write_base64(data, depth),
        }
    }

    /// Picks the encoding for one datum. The scan is bounded; binary
    /// bytes beyond the bound end up verbatim inside a text block.
    fn data_encoding(&self, data: &[u8]) -> Encoding {
        if data.is_empty() {
            return Encoding::String;
        }

        let scan = data
            .len()
            .min(self.options.binary_scan_limit.max(self.options.block_threshold));
        let mut all_identifier = true;
        for &byte in &data[..scan] {
            if is_binary(byte) {
                return Encoding::Base64Block;
            }
            if !is_identifier(byte) {
                all_identifier = false;
            }
        }

        if data.len() >= self.options.block_threshold {
            Encoding::Block
        } else if all_identifier && !starts_comment(data) {
            Encoding::Identifier
        } else {
            Encoding::String
        }
    }

    fn write_string(&mut self, data: &[u8]) {
        self.emit(b"\"");
        let mut run_start = 0;
        for (i, &byte) in data.iter().enumerate() {
            let escaped: Option<[u8; 2]> = match byte {
                b'\\' => Some(*b"\\\\"),
                b'"' => Some(*b"\\\""),
                b'\n' | b'\r' => syntax::escape_letter(byte).map(|letter| [b'\\', letter]),
                _ => None,
            };
            if let Some(escaped) = escaped {
                self.emit(&data[run_start..i]);
                self.emit(&escaped);
                run_start = i + 1;
            }
        }
        self.emit(&data[run_start..]);
        self.emit(b"\"");
    }

    fn write_block(&mut self, data: &[u8], depth: usize) {
        self.emit(b"{\n");

        if !data.is_empty() {
            self.indent(depth + 1);
            for (i, &byte) in data.iter().enumerate() {
                if i == 0 && (is_whitespace(byte) || byte == b'}') {
                    // Protect the first byte where it would be read as
                    // indentation or as the block close.
                    self.emit(b"\\");
                    self.emit(&[byte]);
                } else if byte == b'\\' {
                    self.emit(b"\\\\");
                } else if byte == b'\n' {
                    self.emit(b"\n");
                    self.indent(depth + 1);
                } else if byte == b'\r' {
                    // A literal CR would be folded into the next LF on
                    // re-parse.
                    self.emit(b"\\r");
                } else {
                    self.emit(&[byte]);
                }
            }
            self.emit(b"\n");
        }

        self.indent(depth);
        self.emit(b"}");
    }

    fn write_base64(&mut self, data: &[u8], depth: usize) {
        self.emit(b"{ ");
        self.emit(syntax::BASE64_CODEC);
        self.emit(b"\n");

        if !data.is_empty() {
            // Effective width is rounded up to whole quartets, minimum one.
            let quartets_per_line = self.options.base64_line_width.div_ceil(4).max(1);

            self.indent(depth + 1);
            let mut quartets_on_line = 0;
            for group in data.chunks(3) {
                if quartets_on_line == quartets_per_line {
                    self.emit(b"\n");
                    self.indent(depth + 1);
                    quartets_on_line = 0;
                }
                let quartet = base64::encode_group(group);
                self.emit(&quartet);
                quartets_on_line += 1;
            }
            self.emit(b"\n");
        }

        self.indent(depth);
        self.emit(b"}");
    }

    fn indent(&mut self, depth: usize) {
        let chunk = [self.indent_byte; 32];
        let mut remaining = depth * self.options.indent_width;
        while remaining > 0 {
            let take = remaining.min(chunk.len());
            self.emit(&chunk[..take]);
            remaining -= take;
        }
    }

    #[inline]
    fn emit(&mut self, bytes: &[u8]) {
        (self.sink)(bytes);
    }
}

/// Ids never become blocks: identifier when every byte allows it, quoted
/// string otherwise (including the empty id).
fn id_encoding(id: &[u8]) -> Encoding {
    if !id.is_empty() && id.iter().all(|&byte| is_identifier(byte)) && !starts_comment(id) {
        Encoding::Identifier
    } else {
        Encoding::String
    }
}

/// `/` and `*` are ordinary identifier bytes, but a bare value starting
/// with `//` or `/*` would be read back as a comment.
fn starts_comment(data: &[u8]) -> bool {
    data.starts_with(b"//") || data.starts_with(b"/*")
}
