// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Parser driver.
//!
//! Drives the lexer token by token: the first token of a line resolves
//! to an instruction or opens a label/variable declaration, the
//! instruction's contract installs the expectation set for each operand
//! position, and every fetched token is validated against the installed
//! set before it is accepted. The first error ends the run; no partial
//! output is ever produced.

use std::fmt;

use crate::error::{AsmError, ErrorKind};
use crate::instruction::{
    ExpectationSet, InstructionContext, InstructionKind, Operand, OperandRole,
};
use crate::lexer::Lexer;
use crate::token::{Datatype, Grammar, Token, TokenClass, TokenKind, Width};

/// One fully parsed logical line, the record a code-generation backend
/// would consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Instruction {
        mnemonic: String,
        kind: InstructionKind,
        left: Option<Operand>,
        right: Option<Operand>,
        line: u32,
    },
    LabelDef {
        name: String,
        line: u32,
    },
    Data {
        name: String,
        datatype: Datatype,
        values: Vec<u32>,
        line: u32,
    },
}

impl ParsedLine {
    pub fn line(&self) -> u32 {
        match self {
            ParsedLine::Instruction { line, .. }
            | ParsedLine::LabelDef { line, .. }
            | ParsedLine::Data { line, .. } => *line,
        }
    }
}

impl fmt::Display for ParsedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedLine::Instruction {
                mnemonic,
                left,
                right,
                ..
            } => {
                f.write_str(mnemonic)?;
                if let Some(left) = left {
                    write!(f, " {left}")?;
                }
                if let Some(right) = right {
                    write!(f, ", {right}")?;
                }
                Ok(())
            }
            ParsedLine::LabelDef { name, .. } => write!(f, "{name}:"),
            ParsedLine::Data {
                name,
                datatype,
                values,
                ..
            } => {
                write!(f, "{name} {}", datatype.name())?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {value:#x}")?;
                }
                Ok(())
            }
        }
    }
}

pub struct ParserDriver {
    lexer: Lexer,
}

impl ParserDriver {
    pub fn new(lexer: Lexer) -> Self {
        Self { lexer }
    }

    /// Parse the whole source into a line stream, stopping at end of
    /// input or the first error.
    pub fn parse_all(&mut self) -> Result<Vec<ParsedLine>, AsmError> {
        let mut lines = Vec::new();
        loop {
            let tok = self.lexer.next_token(false)?;
            match tok.kind {
                TokenKind::Eof => return Ok(lines),
                TokenKind::Keyword(_) => lines.push(self.parse_instruction(tok)?),
                TokenKind::Label => lines.push(self.parse_declaration(tok)?),
                _ => {
                    return Err(AsmError::new(
                        ErrorKind::UnexpectedToken,
                        tok.line,
                        format!(
                            "a line must begin with an instruction or a label, found {} `{}`",
                            tok.class(),
                            tok.text
                        ),
                    ));
                }
            }
        }
    }

    fn parse_instruction(&mut self, tok: Token) -> Result<ParsedLine, AsmError> {
        let kw = match tok.kind {
            TokenKind::Keyword(kw) => kw,
            _ => unreachable!("caller dispatches on keyword tokens"),
        };
        let kind = InstructionKind::from_keyword(kw, tok.line)?;
        let contract = kind.contract();
        let mut ctx = InstructionContext::new(kind);
        if let Some(left_set) = contract.left {
            ctx.left = Some(self.parse_operand(&left_set)?);
            if let Some(right_set) = contract.right {
                let sep = self.lexer.next_token_inline(true)?;
                if !sep.is_grammar(Grammar::Comma) {
                    return Err(AsmError::new(
                        ErrorKind::UnexpectedToken,
                        sep.line,
                        format!("expected `,` between operands, found `{}`", sep.text),
                    ));
                }
                ctx.role = OperandRole::Right;
                ctx.right = Some(self.parse_operand(&right_set)?);
            }
        }
        self.check_widths(&ctx, tok.line)?;
        Ok(ParsedLine::Instruction {
            mnemonic: tok.text,
            kind: ctx.kind,
            left: ctx.left,
            right: ctx.right,
            line: tok.line,
        })
    }

    /// Fetch one operand and validate it against the installed
    /// expectation set.
    fn parse_operand(&mut self, set: &ExpectationSet) -> Result<Operand, AsmError> {
        let register_ok = set.allows(TokenClass::Register);
        let tok = self.lexer.next_token_inline(register_ok)?;
        if !set.admits(&tok) {
            return Err(AsmError::new(
                ErrorKind::UnexpectedToken,
                tok.line,
                format!("expected {set}, found {} `{}`", tok.class(), tok.text),
            ));
        }
        match tok.kind {
            TokenKind::Register(reg) => Ok(Operand::Reg(reg)),
            TokenKind::ImmediateHex(v) | TokenKind::ImmediateDecimal(v) => Ok(Operand::Imm(v)),
            TokenKind::Label => Ok(Operand::Target(tok.text)),
            TokenKind::Grammar(Grammar::OpenBracket) => self.parse_memory_reference(),
            _ => Err(AsmError::new(
                ErrorKind::UnexpectedToken,
                tok.line,
                format!("`{}` cannot form an operand", tok.text),
            )),
        }
    }

    /// A memory reference is a bracketed immediate address; `[` was
    /// already consumed.
    fn parse_memory_reference(&mut self) -> Result<Operand, AsmError> {
        let inner = self.lexer.next_token_inline(false)?;
        let value = inner.immediate_value().ok_or_else(|| {
            AsmError::new(
                ErrorKind::UnexpectedToken,
                inner.line,
                format!(
                    "a memory reference holds an immediate address, found {} `{}`",
                    inner.class(),
                    inner.text
                ),
            )
        })?;
        let close = self.lexer.next_token_inline(false)?;
        if !close.is_grammar(Grammar::CloseBracket) {
            return Err(AsmError::new(
                ErrorKind::UnexpectedToken,
                close.line,
                format!(
                    "expected `]` to close the memory reference, found `{}`",
                    close.text
                ),
            ));
        }
        Ok(Operand::Mem(value))
    }

    fn check_widths(&self, ctx: &InstructionContext, line: u32) -> Result<(), AsmError> {
        if let Some(suffix) = ctx.kind.mov_suffix() {
            for operand in [ctx.left.as_ref(), ctx.right.as_ref()].into_iter().flatten() {
                match operand {
                    Operand::Reg(reg) if reg.width() != suffix => {
                        return Err(AsmError::new(
                            ErrorKind::OperandWidthMismatch,
                            line,
                            format!(
                                "register `{}` is {} bits wide but the instruction moves {} bits",
                                reg.name(),
                                reg.width().bits(),
                                suffix.bits()
                            ),
                        ));
                    }
                    Operand::Imm(value) if *value > suffix.limit() => {
                        return Err(AsmError::new(
                            ErrorKind::OperandWidthMismatch,
                            line,
                            format!(
                                "immediate {value:#x} does not fit the {}-bit move",
                                suffix.bits()
                            ),
                        ));
                    }
                    _ => {}
                }
            }
        } else if let InstructionKind::Mov { suffix: None } = ctx.kind {
            if let (Some(Operand::Reg(left)), Some(Operand::Reg(right))) =
                (ctx.left.as_ref(), ctx.right.as_ref())
            {
                if left.width() != right.width() {
                    return Err(AsmError::new(
                        ErrorKind::OperandWidthMismatch,
                        line,
                        format!(
                            "registers `{}` and `{}` have different widths",
                            left.name(),
                            right.name()
                        ),
                    ));
                }
            }
        }
        if ctx.kind == InstructionKind::Int {
            if let Some(Operand::Imm(vector)) = ctx.left.as_ref() {
                if *vector > Width::W8.limit() {
                    return Err(AsmError::new(
                        ErrorKind::ImmediateOutOfRange,
                        line,
                        format!("interrupt vector {vector:#x} does not fit in 8 bits"),
                    ));
                }
            }
        }
        Ok(())
    }

    /// A label at line start opens either a code label (`name:`) or a
    /// storage declaration (`name db 12`, `name dbarr 1, 2`).
    fn parse_declaration(&mut self, name_tok: Token) -> Result<ParsedLine, AsmError> {
        let name = name_tok.text;
        let line = name_tok.line;
        let next = self.lexer.next_token_inline(false)?;
        match next.kind {
            TokenKind::Grammar(Grammar::Colon) => Ok(ParsedLine::LabelDef { name, line }),
            TokenKind::Datatype(dt) => {
                let mut values = vec![self.parse_data_value(dt)?];
                if dt.is_array() {
                    loop {
                        match self.lexer.next_token_or_line_end(false)? {
                            None => break,
                            Some(tok) if tok.is_grammar(Grammar::Comma) => {
                                values.push(self.parse_data_value(dt)?);
                            }
                            Some(tok) => {
                                return Err(AsmError::new(
                                    ErrorKind::UnexpectedToken,
                                    tok.line,
                                    format!(
                                        "expected `,` or end of line in the value list, found `{}`",
                                        tok.text
                                    ),
                                ));
                            }
                        }
                    }
                }
                Ok(ParsedLine::Data {
                    name,
                    datatype: dt,
                    values,
                    line,
                })
            }
            _ => Err(AsmError::new(
                ErrorKind::UnexpectedToken,
                next.line,
                format!(
                    "a label must be followed by `:` or a datatype, found {} `{}`",
                    next.class(),
                    next.text
                ),
            )),
        }
    }

    /// One immediate for a storage declaration, range-checked at the
    /// datatype's element width.
    fn parse_data_value(&mut self, dt: Datatype) -> Result<u32, AsmError> {
        let tok = self.lexer.next_token_inline(false)?;
        let value = tok.immediate_value().ok_or_else(|| {
            AsmError::new(
                ErrorKind::UnexpectedToken,
                tok.line,
                format!(
                    "`{}` expects an immediate value, found {} `{}`",
                    dt.name(),
                    tok.class(),
                    tok.text
                ),
            )
        })?;
        if value > dt.width().limit() {
            return Err(AsmError::new(
                ErrorKind::ImmediateOutOfRange,
                tok.line,
                format!(
                    "`{}` does not fit in the {} bits of `{}`",
                    tok.text,
                    dt.width().bits(),
                    dt.name()
                ),
            ));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::SourceCursor;
    use crate::token::Register;

    fn parse(src: &str) -> Result<Vec<ParsedLine>, AsmError> {
        let cursor = SourceCursor::from_bytes(src.as_bytes().to_vec());
        ParserDriver::new(Lexer::new(cursor)).parse_all()
    }

    #[test]
    fn mov_register_immediate_parses() {
        let lines = parse("mov ax, 0x10").unwrap();
        assert_eq!(
            lines,
            vec![ParsedLine::Instruction {
                mnemonic: "mov".into(),
                kind: InstructionKind::Mov { suffix: None },
                left: Some(Operand::Reg(Register::Ax)),
                right: Some(Operand::Imm(0x10)),
                line: 1,
            }]
        );
    }

    #[test]
    fn bitwise_rejects_immediate_on_the_left() {
        let err = parse("or 0x10, ax").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedToken);
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn mov_suffix_width_agreement() {
        assert!(parse("movw ax, bx").is_ok());
        let err = parse("movb ax, bx").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OperandWidthMismatch);
        let err = parse("movd ax, 0x10").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OperandWidthMismatch);
        assert!(parse("movb al, 0xFF").is_ok());
        let err = parse("movb al, 0x100").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OperandWidthMismatch);
    }

    #[test]
    fn plain_mov_registers_must_agree() {
        let err = parse("mov ax, bl").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OperandWidthMismatch);
        assert!(parse("mov ah, bl").is_ok());
    }

    #[test]
    fn memory_references_parse_on_either_side() {
        let lines = parse("mov [0x7C00], ax\nlea si, [0x500]").unwrap();
        match &lines[0] {
            ParsedLine::Instruction { left, right, .. } => {
                assert_eq!(left, &Some(Operand::Mem(0x7C00)));
                assert_eq!(right, &Some(Operand::Reg(Register::Ax)));
            }
            other => panic!("unexpected line {other:?}"),
        }
        match &lines[1] {
            ParsedLine::Instruction { right, .. } => {
                assert_eq!(right, &Some(Operand::Mem(0x500)));
            }
            other => panic!("unexpected line {other:?}"),
        }
    }

    #[test]
    fn byte_declaration_is_range_checked() {
        let lines = parse("frog db 12").unwrap();
        assert_eq!(
            lines,
            vec![ParsedLine::Data {
                name: "frog".into(),
                datatype: Datatype::Db,
                values: vec![12],
                line: 1,
            }]
        );
        let err = parse("frog db 0x1FF").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ImmediateOutOfRange);
    }

    #[test]
    fn array_declaration_ends_at_the_line() {
        let lines = parse("nums dbarr 1, 2, 3\nhlt").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            ParsedLine::Data {
                name: "nums".into(),
                datatype: Datatype::Dbarr,
                values: vec![1, 2, 3],
                line: 1,
            }
        );
        match &lines[1] {
            ParsedLine::Instruction { mnemonic, line, .. } => {
                assert_eq!(mnemonic, "hlt");
                assert_eq!(*line, 2);
            }
            other => panic!("unexpected line {other:?}"),
        }
    }

    #[test]
    fn word_array_elements_checked_at_element_width() {
        assert!(parse("tbl dwarr 0xFFFF, 2").is_ok());
        let err = parse("tbl dwarr 0x10000").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ImmediateOutOfRange);
    }

    #[test]
    fn datatype_value_must_be_on_the_same_line() {
        let err = parse("frog db\nhlt").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedNewline);
    }

    #[test]
    fn code_labels_and_jump_targets() {
        let lines = parse("loop_start:\njmp loop_start").unwrap();
        assert_eq!(
            lines[0],
            ParsedLine::LabelDef {
                name: "loop_start".into(),
                line: 1,
            }
        );
        match &lines[1] {
            ParsedLine::Instruction { left, .. } => {
                assert_eq!(left, &Some(Operand::Target("loop_start".into())));
            }
            other => panic!("unexpected line {other:?}"),
        }
    }

    #[test]
    fn interrupt_vector_is_eight_bits() {
        assert!(parse("int 0x80").is_ok());
        let err = parse("int 0x100").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ImmediateOutOfRange);
    }

    #[test]
    fn port_io_operand_order() {
        assert!(parse("in al, 0x60").is_ok());
        assert!(parse("out 0x3F8, al").is_ok());
        // The port side never expects a register, so a register name
        // there is not even a legal token.
        let err = parse("out al, 0x3F8").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RegisterWithoutContext);
    }

    #[test]
    fn inclusion_directives_are_unknown_instructions() {
        let err = parse("incsrc").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownInstruction);
    }

    #[test]
    fn no_operand_instructions_take_nothing() {
        let lines = parse("cli\nhlt").unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn register_as_line_start_label_is_rejected() {
        let err = parse("ax:").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RegisterWithoutContext);
    }

    #[test]
    fn parsed_lines_render_for_debug_output() {
        let lines = parse("mov ax, [0x10]\nnums dbarr 1, 2").unwrap();
        assert_eq!(lines[0].to_string(), "mov ax, [0x10]");
        assert_eq!(lines[1].to_string(), "nums dbarr 0x1, 0x2");
    }
}
