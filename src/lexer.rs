// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Lexeme scanner.
//!
//! The lexer walks the cursor and produces classified tokens:
//! identifiers (resolved through the vocabulary tables), numerals with
//! hex/decimal validation, single-character punctuation, and the end
//! of input. Comments are consumed here and never tokenized. Newlines
//! are left in place by the comment skipper so the line counter only
//! moves in one spot.

use crate::cursor::{SourceCursor, NUL};
use crate::error::{AsmError, ErrorKind};
use crate::token::{classify, Grammar, Token, TokenKind};

pub struct Lexer {
    cursor: SourceCursor,
}

impl Lexer {
    pub fn new(cursor: SourceCursor) -> Self {
        Self { cursor }
    }

    pub fn line(&self) -> u32 {
        self.cursor.line()
    }

    /// Fetch the next token, skipping whitespace, newlines, and
    /// comments. `register_ok` says whether the coming parse position
    /// may hold a register name.
    pub fn next_token(&mut self, register_ok: bool) -> Result<Token, AsmError> {
        loop {
            self.skip_whitespace();
            let byte = self.cursor.current();
            match byte {
                b'\n' => {
                    self.cursor.bump_line();
                    self.cursor.advance();
                }
                b';' => self.skip_comment(),
                NUL => return Ok(Token::new(TokenKind::Eof, "", self.cursor.line())),
                b if is_ident_start(b) => return self.scan_identifier(register_ok),
                b if b.is_ascii_digit() => return self.scan_numeral(),
                b => {
                    let line = self.cursor.line();
                    if let Some(g) = Grammar::from_byte(b) {
                        self.cursor.advance();
                        return Ok(Token::new(
                            TokenKind::Grammar(g),
                            (b as char).to_string(),
                            line,
                        ));
                    }
                    return Err(AsmError::new(
                        ErrorKind::UnexpectedToken,
                        line,
                        format!("unrecognized byte `{}` in source", b as char),
                    ));
                }
            }
        }
    }

    /// Fetch the next token on the current line. Reaching the end of
    /// the line first is an error; used where a value must follow
    /// inline, such as after a datatype keyword.
    pub fn next_token_inline(&mut self, register_ok: bool) -> Result<Token, AsmError> {
        self.skip_whitespace();
        if self.cursor.current() == b';' {
            self.skip_comment();
        }
        match self.cursor.current() {
            b'\n' | NUL => Err(AsmError::new(
                ErrorKind::UnexpectedNewline,
                self.cursor.line(),
                "a value is required before the end of the line",
            )),
            _ => self.next_token(register_ok),
        }
    }

    /// Fetch the next token on the current line, or `None` once the
    /// line is exhausted. The newline itself is not consumed; the main
    /// loop owns line accounting.
    pub fn next_token_or_line_end(
        &mut self,
        register_ok: bool,
    ) -> Result<Option<Token>, AsmError> {
        self.skip_whitespace();
        if self.cursor.current() == b';' {
            self.skip_comment();
        }
        match self.cursor.current() {
            b'\n' | NUL => Ok(None),
            _ => self.next_token(register_ok).map(Some),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.cursor.current(), b' ' | b'\t' | b'\r') {
            self.cursor.advance();
        }
    }

    /// Consume a `;` comment up to, but not including, the newline.
    fn skip_comment(&mut self) {
        while !matches!(self.cursor.current(), b'\n' | NUL) {
            self.cursor.advance();
        }
    }

    fn scan_identifier(&mut self, register_ok: bool) -> Result<Token, AsmError> {
        let line = self.cursor.line();
        let mut text = String::new();
        while is_ident_continue(self.cursor.current()) {
            text.push(self.cursor.current() as char);
            self.cursor.advance();
        }
        classify(&text, line, register_ok)
    }

    /// Scan a numeral and classify it as hex or decimal.
    ///
    /// Hex forms are `0x<hex>` and `<hex>h`. Classification errors are
    /// ranked: a bad `x` position or prefix is an invalid literal, a
    /// byte outside the hex alphabet is an invalid value, and hex
    /// letters with no marker at all are a missing marker.
    fn scan_numeral(&mut self) -> Result<Token, AsmError> {
        let line = self.cursor.line();
        let mut text = String::new();
        let mut digits = String::new();
        let mut has_marker = false;
        let mut has_hex_letter = false;
        loop {
            let byte = self.cursor.current();
            if is_numeral_terminator(byte) {
                break;
            }
            match byte {
                b'x' | b'X' => {
                    let next = self.cursor.peek();
                    if !(next.is_ascii_digit() || is_hex_letter(next)) {
                        return Err(AsmError::new(
                            ErrorKind::InvalidHexLiteral,
                            line,
                            format!("`{}` must be followed by a hex digit", byte as char),
                        ));
                    }
                    if digits != "0" {
                        return Err(AsmError::new(
                            ErrorKind::InvalidHexLiteral,
                            line,
                            "a hex literal must begin with the `0x` prefix",
                        ));
                    }
                    has_marker = true;
                    digits.clear();
                    text.push(byte as char);
                    self.cursor.advance();
                }
                b'h' | b'H' => {
                    if !is_numeral_terminator(self.cursor.peek()) {
                        return Err(AsmError::new(
                            ErrorKind::InvalidHexValue,
                            line,
                            "the `h` hex marker must end the literal",
                        ));
                    }
                    has_marker = true;
                    text.push(byte as char);
                    self.cursor.advance();
                }
                b if b.is_ascii_digit() => {
                    digits.push(b as char);
                    text.push(b as char);
                    self.cursor.advance();
                }
                b if is_hex_letter(b) => {
                    has_hex_letter = true;
                    digits.push(b as char);
                    text.push(b as char);
                    self.cursor.advance();
                }
                b => {
                    return Err(AsmError::new(
                        ErrorKind::InvalidHexValue,
                        line,
                        format!("`{}` is not a valid hex digit", b as char),
                    ));
                }
            }
        }
        if has_marker {
            let value = u32::from_str_radix(&digits, 16).map_err(|_| {
                AsmError::new(
                    ErrorKind::ImmediateOutOfRange,
                    line,
                    format!("hex literal `{text}` does not fit in 32 bits"),
                )
            })?;
            Ok(Token::new(TokenKind::ImmediateHex(value), text, line))
        } else if has_hex_letter {
            Err(AsmError::new(
                ErrorKind::MissingHexMarker,
                line,
                format!("`{text}` has hex digits but no `0x` prefix or `h` suffix"),
            ))
        } else {
            let value = digits.parse::<u32>().map_err(|_| {
                AsmError::new(
                    ErrorKind::ImmediateOutOfRange,
                    line,
                    format!("decimal literal `{text}` does not fit in 32 bits"),
                )
            })?;
            Ok(Token::new(TokenKind::ImmediateDecimal(value), text, line))
        }
    }
}

#[inline]
fn is_ident_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

#[inline]
fn is_ident_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

#[inline]
fn is_hex_letter(byte: u8) -> bool {
    matches!(byte, b'a'..=b'f' | b'A'..=b'F')
}

// Comma and closing bracket end a numeral so value lists and memory
// references lex without padding spaces.
#[inline]
fn is_numeral_terminator(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n' | b',' | b']' | NUL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Keyword, Register};

    fn lexer(src: &str) -> Lexer {
        Lexer::new(SourceCursor::from_bytes(src.as_bytes().to_vec()))
    }

    #[test]
    fn whitespace_only_input_yields_one_eof() {
        let mut lx = lexer("  \t\n   \n\t ");
        let tok = lx.next_token(false).unwrap();
        assert_eq!(tok.kind, TokenKind::Eof);
        let tok = lx.next_token(false).unwrap();
        assert_eq!(tok.kind, TokenKind::Eof);
    }

    #[test]
    fn hex_forms_agree_on_value() {
        for src in ["0x1A", "1Ah", "0x1a"] {
            let tok = lexer(src).next_token(false).unwrap();
            assert_eq!(tok.kind, TokenKind::ImmediateHex(26), "source `{src}`");
        }
        let tok = lexer("123").next_token(false).unwrap();
        assert_eq!(tok.kind, TokenKind::ImmediateDecimal(123));
    }

    #[test]
    fn numeral_error_ladder() {
        let err = lexer("0xZZ").next_token(false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHexLiteral);
        let err = lexer("12g").next_token(false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHexValue);
        let err = lexer("1A").next_token(false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingHexMarker);
    }

    #[test]
    fn wrong_prefix_form_is_invalid_literal() {
        let err = lexer("10x5").next_token(false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHexLiteral);
    }

    #[test]
    fn comments_are_discarded_and_lines_counted() {
        let mut lx = lexer("mov ax, bx ; note\njmp foo");
        let expect = [
            TokenKind::Keyword(Keyword::Mov),
            TokenKind::Register(Register::Ax),
            TokenKind::Grammar(Grammar::Comma),
            TokenKind::Register(Register::Bx),
        ];
        for kind in expect {
            assert_eq!(lx.next_token(true).unwrap().kind, kind);
        }
        let tok = lx.next_token(false).unwrap();
        assert_eq!(tok.kind, TokenKind::Keyword(Keyword::Jmp));
        assert_eq!(tok.line, 2);
        assert_eq!(lx.line(), 2);
    }

    #[test]
    fn numerals_end_at_commas_and_brackets() {
        let mut lx = lexer("[0x10], 2");
        assert_eq!(
            lx.next_token(false).unwrap().kind,
            TokenKind::Grammar(Grammar::OpenBracket)
        );
        assert_eq!(lx.next_token(false).unwrap().kind, TokenKind::ImmediateHex(16));
        assert_eq!(
            lx.next_token(false).unwrap().kind,
            TokenKind::Grammar(Grammar::CloseBracket)
        );
        assert_eq!(
            lx.next_token(false).unwrap().kind,
            TokenKind::Grammar(Grammar::Comma)
        );
        assert_eq!(
            lx.next_token(false).unwrap().kind,
            TokenKind::ImmediateDecimal(2)
        );
    }

    #[test]
    fn inline_fetch_rejects_line_end() {
        let mut lx = lexer("frog db\n12");
        assert_eq!(lx.next_token(false).unwrap().kind, TokenKind::Label);
        lx.next_token(false).unwrap();
        let err = lx.next_token_inline(false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedNewline);
    }

    #[test]
    fn line_end_fetch_stops_without_consuming() {
        let mut lx = lexer("1, 2\n3");
        assert_eq!(
            lx.next_token_or_line_end(false).unwrap().unwrap().kind,
            TokenKind::ImmediateDecimal(1)
        );
        lx.next_token(false).unwrap();
        assert_eq!(
            lx.next_token_or_line_end(false).unwrap().unwrap().kind,
            TokenKind::ImmediateDecimal(2)
        );
        assert!(lx.next_token_or_line_end(false).unwrap().is_none());
        assert_eq!(lx.line(), 1);
        let tok = lx.next_token(false).unwrap();
        assert_eq!(tok.kind, TokenKind::ImmediateDecimal(3));
        assert_eq!(tok.line, 2);
    }

    #[test]
    fn register_name_as_label_is_rejected() {
        let err = lexer("ax:").next_token(false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RegisterWithoutContext);
    }
}
