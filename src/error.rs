// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Error types and run reporting for the assembler front end.
//!
//! Every error is fatal for the run: the front end never recovers,
//! skips, or produces partial output once a line fails to parse.

use std::fmt;

/// Categories of front-end errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    File,
    Cli,
    InvalidHexLiteral,
    InvalidHexValue,
    MissingHexMarker,
    UnexpectedNewline,
    UnexpectedToken,
    RegisterWithoutContext,
    UnknownInstruction,
    OperandWidthMismatch,
    ImmediateOutOfRange,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::File => "FILE ERROR",
            ErrorKind::Cli => "ARGUMENT ERROR",
            ErrorKind::InvalidHexLiteral => "INVALID HEX LITERAL",
            ErrorKind::InvalidHexValue => "INVALID HEX VALUE",
            ErrorKind::MissingHexMarker => "MISSING HEX MARKER",
            ErrorKind::UnexpectedNewline => "UNEXPECTED NEWLINE",
            ErrorKind::UnexpectedToken => "UNEXPECTED TOKEN",
            ErrorKind::RegisterWithoutContext => "REGISTER WITHOUT CONTEXT",
            ErrorKind::UnknownInstruction => "UNKNOWN INSTRUCTION",
            ErrorKind::OperandWidthMismatch => "OPERAND WIDTH MISMATCH",
            ErrorKind::ImmediateOutOfRange => "IMMEDIATE OUT OF RANGE",
        }
    }
}

/// A front-end error with a kind, source line, and message.
///
/// Line 0 means the error has no source location (file and CLI errors).
#[derive(Debug, Clone)]
pub struct AsmError {
    kind: ErrorKind,
    line: u32,
    message: String,
}

impl AsmError {
    pub fn new(kind: ErrorKind, line: u32, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line > 0 {
            write!(f, "line {}: [{}] {}", self.line, self.kind.label(), self.message)
        } else {
            write!(f, "[{}] {}", self.kind.label(), self.message)
        }
    }
}

impl std::error::Error for AsmError {}

/// Error from a failed run, carrying the source for context rendering.
#[derive(Debug)]
pub struct RunError {
    error: AsmError,
    file: Option<String>,
    source_lines: Vec<String>,
}

impl RunError {
    pub fn new(error: AsmError, file: Option<String>, source_lines: Vec<String>) -> Self {
        Self {
            error,
            file,
            source_lines,
        }
    }

    pub fn error(&self) -> &AsmError {
        &self.error
    }

    pub fn source_lines(&self) -> &[String] {
        &self.source_lines
    }

    pub fn format_with_context(&self, use_color: bool) -> String {
        crate::report::format_error_with_context(
            &self.error,
            self.file.as_deref(),
            Some(&self.source_lines),
            use_color,
        )
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for RunError {}

#[cfg(test)]
mod tests {
    use super::{AsmError, ErrorKind};

    #[test]
    fn display_includes_line_and_label() {
        let err = AsmError::new(ErrorKind::MissingHexMarker, 7, "`1A` has no marker");
        assert_eq!(
            err.to_string(),
            "line 7: [MISSING HEX MARKER] `1A` has no marker"
        );
    }

    #[test]
    fn display_omits_line_zero() {
        let err = AsmError::new(ErrorKind::File, 0, "no such file");
        assert_eq!(err.to_string(), "[FILE ERROR] no such file");
    }
}
