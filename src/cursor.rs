//! Byte-position cursor over a source buffer.
//!
//! The cursor does not hold the buffer itself — both storage modes need to
//! keep ownership of the source (the view mode mutably) — so every
//! operation takes the buffer as an argument. `\r\n` is collapsed into a
//! single newline transition by [`Cursor::advance`], and line/column
//! positions are derived on demand by counting LFs, which keeps the hot
//! path free of bookkeeping and is only paid when an error is reported.

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Cursor {
    pos: usize,
}

impl Cursor {
    #[inline]
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) fn eof(&self, buf: &[u8]) -> bool {
        self.pos >= buf.len()
    }

    /// The byte under the cursor, or NUL at end of input.
    #[inline]
    pub(crate) fn current(&self, buf: &[u8]) -> u8 {
        buf.get(self.pos).copied().unwrap_or(0)
    }

    /// The byte after the cursor, or NUL if that would be past the end.
    #[inline]
    pub(crate) fn peek_next(&self, buf: &[u8]) -> u8 {
        buf.get(self.pos + 1).copied().unwrap_or(0)
    }

    /// Steps over the current byte; a `\r\n` pair is stepped in one go so
    /// that it reads as a single newline.
    #[inline]
    pub(crate) fn advance(&mut self, buf: &[u8]) {
        if self.current(buf) == b'\r' && self.peek_next(buf) == b'\n' {
            self.pos += 1;
        }
        self.pos += 1;
    }
}

/// Converts a byte position to a 1-based (line, column) pair by counting
/// LFs from the start of the buffer. A lone CR does not advance the line;
/// `\r\n` does, through its LF.
pub(crate) fn line_column(buf: &[u8], pos: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for &byte in &buf[..pos.min(buf.len())] {
        if byte == b'\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}
