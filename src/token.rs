// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Token categories and the lexeme classifier.
//!
//! An identifier lexeme is resolved against the keyword, datatype, and
//! register vocabularies in that order; anything left over is a user
//! label. Each vocabulary is a closed match so a new mnemonic has to be
//! added here before anything downstream can see it.

use std::fmt;

use crate::error::{AsmError, ErrorKind};

/// Operand width in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    W8,
    W16,
    W32,
}

impl Width {
    /// Largest value representable at this width.
    pub fn limit(self) -> u32 {
        match self {
            Width::W8 => 0xFF,
            Width::W16 => 0xFFFF,
            Width::W32 => 0xFFFF_FFFF,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            Width::W8 => 8,
            Width::W16 => 16,
            Width::W32 => 32,
        }
    }
}

/// Instruction mnemonics. `incbin`/`incsrc` are reserved words but have
/// no instruction-table entry; resolving one reports the instruction as
/// unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Mov,
    Movb,
    Movw,
    Movd,
    Or,
    And,
    Xor,
    Nand,
    Nor,
    Shl,
    Shr,
    Clc,
    Cld,
    Cli,
    Sti,
    Cmc,
    Cmp,
    Cmpsb,
    Cwd,
    Div,
    Mul,
    Dec,
    Inc,
    Adc,
    Add,
    Sub,
    Call,
    Hlt,
    Int,
    In,
    Out,
    Lea,
    Lock,
    Lodsb,
    Lodsw,
    Jmp,
    Jne,
    Jge,
    Jle,
    Jz,
    Jc,
    Jg,
    Jl,
    Incbin,
    Incsrc,
    Res,
}

impl Keyword {
    pub fn from_name(name: &str) -> Option<Keyword> {
        let kw = match name {
            "mov" => Keyword::Mov,
            "movb" => Keyword::Movb,
            "movw" => Keyword::Movw,
            "movd" => Keyword::Movd,
            "or" => Keyword::Or,
            "and" => Keyword::And,
            "xor" => Keyword::Xor,
            "nand" => Keyword::Nand,
            "nor" => Keyword::Nor,
            "shl" => Keyword::Shl,
            "shr" => Keyword::Shr,
            "clc" => Keyword::Clc,
            "cld" => Keyword::Cld,
            "cli" => Keyword::Cli,
            "sti" => Keyword::Sti,
            "cmc" => Keyword::Cmc,
            "cmp" => Keyword::Cmp,
            "cmpsb" => Keyword::Cmpsb,
            "cwd" => Keyword::Cwd,
            "div" => Keyword::Div,
            "mul" => Keyword::Mul,
            "dec" => Keyword::Dec,
            "inc" => Keyword::Inc,
            "adc" => Keyword::Adc,
            "add" => Keyword::Add,
            "sub" => Keyword::Sub,
            "call" => Keyword::Call,
            "hlt" => Keyword::Hlt,
            "int" => Keyword::Int,
            "in" => Keyword::In,
            "out" => Keyword::Out,
            "lea" => Keyword::Lea,
            "lock" => Keyword::Lock,
            "lodsb" => Keyword::Lodsb,
            "lodsw" => Keyword::Lodsw,
            "jmp" => Keyword::Jmp,
            "jne" => Keyword::Jne,
            "jge" => Keyword::Jge,
            "jle" => Keyword::Jle,
            "jz" => Keyword::Jz,
            "jc" => Keyword::Jc,
            "jg" => Keyword::Jg,
            "jl" => Keyword::Jl,
            "incbin" => Keyword::Incbin,
            "incsrc" => Keyword::Incsrc,
            "res" => Keyword::Res,
            _ => return None,
        };
        Some(kw)
    }
}

/// Storage declaration keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Datatype {
    Db,
    Dw,
    Dd,
    Dbarr,
    Dwarr,
    Ddarr,
}

impl Datatype {
    pub fn from_name(name: &str) -> Option<Datatype> {
        let dt = match name {
            "db" => Datatype::Db,
            "dw" => Datatype::Dw,
            "dd" => Datatype::Dd,
            "dbarr" => Datatype::Dbarr,
            "dwarr" => Datatype::Dwarr,
            "ddarr" => Datatype::Ddarr,
            _ => return None,
        };
        Some(dt)
    }

    /// Element width of the declared storage.
    pub fn width(self) -> Width {
        match self {
            Datatype::Db | Datatype::Dbarr => Width::W8,
            Datatype::Dw | Datatype::Dwarr => Width::W16,
            Datatype::Dd | Datatype::Ddarr => Width::W32,
        }
    }

    pub fn is_array(self) -> bool {
        matches!(self, Datatype::Dbarr | Datatype::Dwarr | Datatype::Ddarr)
    }

    pub fn name(self) -> &'static str {
        match self {
            Datatype::Db => "db",
            Datatype::Dw => "dw",
            Datatype::Dd => "dd",
            Datatype::Dbarr => "dbarr",
            Datatype::Dwarr => "dwarr",
            Datatype::Ddarr => "ddarr",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Ax,
    Ah,
    Al,
    Bx,
    Bh,
    Bl,
    Cx,
    Ch,
    Cl,
    Dx,
    Dh,
    Dl,
    Ip,
    Sp,
    Bp,
    Si,
    Di,
    Cs,
    Ds,
    Ss,
    Es,
    Fs,
    Gs,
}

impl Register {
    pub fn from_name(name: &str) -> Option<Register> {
        let reg = match name {
            "ax" => Register::Ax,
            "ah" => Register::Ah,
            "al" => Register::Al,
            "bx" => Register::Bx,
            "bh" => Register::Bh,
            "bl" => Register::Bl,
            "cx" => Register::Cx,
            "ch" => Register::Ch,
            "cl" => Register::Cl,
            "dx" => Register::Dx,
            "dh" => Register::Dh,
            "dl" => Register::Dl,
            "ip" => Register::Ip,
            "sp" => Register::Sp,
            "bp" => Register::Bp,
            "si" => Register::Si,
            "di" => Register::Di,
            "cs" => Register::Cs,
            "ds" => Register::Ds,
            "ss" => Register::Ss,
            "es" => Register::Es,
            "fs" => Register::Fs,
            "gs" => Register::Gs,
            _ => return None,
        };
        Some(reg)
    }

    /// Half registers are 8 bits wide, everything else 16.
    pub fn width(self) -> Width {
        match self {
            Register::Ah
            | Register::Al
            | Register::Bh
            | Register::Bl
            | Register::Ch
            | Register::Cl
            | Register::Dh
            | Register::Dl => Width::W8,
            _ => Width::W16,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Register::Ax => "ax",
            Register::Ah => "ah",
            Register::Al => "al",
            Register::Bx => "bx",
            Register::Bh => "bh",
            Register::Bl => "bl",
            Register::Cx => "cx",
            Register::Ch => "ch",
            Register::Cl => "cl",
            Register::Dx => "dx",
            Register::Dh => "dh",
            Register::Dl => "dl",
            Register::Ip => "ip",
            Register::Sp => "sp",
            Register::Bp => "bp",
            Register::Si => "si",
            Register::Di => "di",
            Register::Cs => "cs",
            Register::Ds => "ds",
            Register::Ss => "ss",
            Register::Es => "es",
            Register::Fs => "fs",
            Register::Gs => "gs",
        }
    }
}

/// Single-character punctuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    OpenBracket,
    CloseBracket,
    Colon,
    Comma,
    Dot,
    Dollar,
    OpenParen,
    CloseParen,
    Minus,
    Plus,
    SingleQuote,
    DoubleQuote,
    Percent,
}

impl Grammar {
    pub fn from_byte(byte: u8) -> Option<Grammar> {
        let g = match byte {
            b'[' => Grammar::OpenBracket,
            b']' => Grammar::CloseBracket,
            b':' => Grammar::Colon,
            b',' => Grammar::Comma,
            b'.' => Grammar::Dot,
            b'$' => Grammar::Dollar,
            b'(' => Grammar::OpenParen,
            b')' => Grammar::CloseParen,
            b'-' => Grammar::Minus,
            b'+' => Grammar::Plus,
            b'\'' => Grammar::SingleQuote,
            b'"' => Grammar::DoubleQuote,
            b'%' => Grammar::Percent,
            _ => return None,
        };
        Some(g)
    }

    pub fn as_char(self) -> char {
        match self {
            Grammar::OpenBracket => '[',
            Grammar::CloseBracket => ']',
            Grammar::Colon => ':',
            Grammar::Comma => ',',
            Grammar::Dot => '.',
            Grammar::Dollar => '$',
            Grammar::OpenParen => '(',
            Grammar::CloseParen => ')',
            Grammar::Minus => '-',
            Grammar::Plus => '+',
            Grammar::SingleQuote => '\'',
            Grammar::DoubleQuote => '"',
            Grammar::Percent => '%',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Keyword(Keyword),
    Register(Register),
    Datatype(Datatype),
    Grammar(Grammar),
    ImmediateHex(u32),
    ImmediateDecimal(u32),
    Label,
    Eof,
}

/// Coarse categories used by operand expectation sets. `Memory` is the
/// bracketed-reference pseudo-class; it matches an opening bracket at
/// expectation-check time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Keyword,
    Register,
    Immediate,
    Memory,
    Datatype,
    Grammar,
    Label,
    Eof,
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenClass::Keyword => "keyword",
            TokenClass::Register => "register",
            TokenClass::Immediate => "immediate",
            TokenClass::Memory => "memory reference",
            TokenClass::Datatype => "datatype",
            TokenClass::Grammar => "punctuation",
            TokenClass::Label => "label",
            TokenClass::Eof => "end of input",
        };
        f.write_str(name)
    }
}

/// A classified lexical unit. Immutable once produced; exactly one
/// unconsumed token exists at a time, owned by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    pub fn class(&self) -> TokenClass {
        match self.kind {
            TokenKind::Keyword(_) => TokenClass::Keyword,
            TokenKind::Register(_) => TokenClass::Register,
            TokenKind::Datatype(_) => TokenClass::Datatype,
            TokenKind::Grammar(_) => TokenClass::Grammar,
            TokenKind::ImmediateHex(_) | TokenKind::ImmediateDecimal(_) => TokenClass::Immediate,
            TokenKind::Label => TokenClass::Label,
            TokenKind::Eof => TokenClass::Eof,
        }
    }

    pub fn immediate_value(&self) -> Option<u32> {
        match self.kind {
            TokenKind::ImmediateHex(v) | TokenKind::ImmediateDecimal(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_grammar(&self, g: Grammar) -> bool {
        self.kind == TokenKind::Grammar(g)
    }
}

/// Resolve an identifier lexeme to a token. `register_ok` says whether
/// the current parse position may legally hold a register; a register
/// name anywhere else can never be a label and is an error.
pub fn classify(text: &str, line: u32, register_ok: bool) -> Result<Token, AsmError> {
    if let Some(kw) = Keyword::from_name(text) {
        return Ok(Token::new(TokenKind::Keyword(kw), text, line));
    }
    if let Some(dt) = Datatype::from_name(text) {
        return Ok(Token::new(TokenKind::Datatype(dt), text, line));
    }
    if let Some(reg) = Register::from_name(text) {
        if !register_ok {
            return Err(AsmError::new(
                ErrorKind::RegisterWithoutContext,
                line,
                format!("`{text}` is a reserved register name and cannot be used as a label"),
            ));
        }
        return Ok(Token::new(TokenKind::Register(reg), text, line));
    }
    Ok(Token::new(TokenKind::Label, text, line))
}
