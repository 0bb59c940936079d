// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Byte cursor over an assembly source buffer.
//!
//! The cursor owns the whole source and a byte-level read position with
//! one-byte lookahead. Once the last byte has been consumed the current
//! byte is the NUL sentinel and no further movement occurs. Lookahead
//! restores position and current byte together; any drift between the
//! two would corrupt all subsequent lexing.

use std::fs;
use std::path::Path;

use crate::error::{AsmError, ErrorKind};

pub const NUL: u8 = 0;

pub struct SourceCursor {
    buf: Vec<u8>,
    pos: usize,
    current: u8,
    line: u32,
}

impl SourceCursor {
    /// Load a source file. The whole file is read once and the handle
    /// released; no further I/O occurs during lexing.
    pub fn from_path(path: &Path) -> Result<Self, AsmError> {
        if !path.exists() {
            return Err(AsmError::new(
                ErrorKind::File,
                0,
                format!("the file `{}` does not exist", path.display()),
            ));
        }
        let buf = fs::read(path).map_err(|err| {
            AsmError::new(
                ErrorKind::File,
                0,
                format!("there was an error opening the file `{}`: {err}", path.display()),
            )
        })?;
        if buf.len() <= 1 {
            return Err(AsmError::new(
                ErrorKind::File,
                0,
                format!(
                    "the file `{}` is empty. Try writing some code",
                    path.display()
                ),
            ));
        }
        Ok(Self::from_bytes(buf))
    }

    pub fn from_bytes(buf: Vec<u8>) -> Self {
        let current = buf.first().copied().unwrap_or(NUL);
        Self {
            buf,
            pos: 0,
            current,
            line: 1,
        }
    }

    pub fn contents(&self) -> &[u8] {
        &self.buf
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    /// Current 1-based source line. The lexer bumps this as it consumes
    /// newlines; the cursor itself never counts.
    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn bump_line(&mut self) {
        self.line = self.line.saturating_add(1);
    }

    /// Move one byte forward. At the end of the buffer the current byte
    /// becomes the NUL sentinel and the position stays put.
    pub fn advance(&mut self) {
        if self.pos.saturating_add(1) >= self.buf.len() {
            self.current = NUL;
            return;
        }
        self.pos += 1;
        self.current = self.buf[self.pos];
    }

    /// Inspect the next byte without committing to it.
    pub fn peek(&mut self) -> u8 {
        let saved = (self.pos, self.current);
        self.advance();
        let value = self.current;
        (self.pos, self.current) = saved;
        value
    }

    /// Peek one byte ahead and compare against `expected`. On a match
    /// the cursor stays advanced when `keep` is set; in every other
    /// case position and current byte are restored exactly.
    pub fn peek_and_test(&mut self, expected: u8, keep: bool) -> bool {
        let saved = (self.pos, self.current);
        self.advance();
        if self.current == expected {
            if !keep {
                (self.pos, self.current) = saved;
            }
            return true;
        }
        (self.pos, self.current) = saved;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::{SourceCursor, NUL};

    #[test]
    fn walks_buffer_and_hits_sentinel() {
        let mut cur = SourceCursor::from_bytes(b"ab".to_vec());
        assert_eq!(cur.current(), b'a');
        cur.advance();
        assert_eq!(cur.current(), b'b');
        cur.advance();
        assert_eq!(cur.current(), NUL);
        // No movement past the end.
        cur.advance();
        assert_eq!(cur.current(), NUL);
    }

    #[test]
    fn peek_restores_exactly() {
        let mut cur = SourceCursor::from_bytes(b"xyz".to_vec());
        assert_eq!(cur.peek(), b'y');
        assert_eq!(cur.current(), b'x');
        assert_eq!(cur.peek(), b'y');
        assert_eq!(cur.line(), 1);
        cur.advance();
        assert_eq!(cur.peek(), b'z');
        assert_eq!(cur.current(), b'y');
    }

    #[test]
    fn peek_at_last_byte_sees_sentinel() {
        let mut cur = SourceCursor::from_bytes(b"q!".to_vec());
        cur.advance();
        assert_eq!(cur.peek(), NUL);
        assert_eq!(cur.current(), b'!');
    }

    #[test]
    fn peek_and_test_keep_semantics() {
        let mut cur = SourceCursor::from_bytes(b"0x1".to_vec());
        assert!(cur.peek_and_test(b'x', false));
        assert_eq!(cur.current(), b'0');
        assert!(cur.peek_and_test(b'x', true));
        assert_eq!(cur.current(), b'x');
        assert!(!cur.peek_and_test(b'q', true));
        assert_eq!(cur.current(), b'x');
    }
}
