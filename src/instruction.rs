// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Instruction kinds and the operand contract table.
//!
//! Every mnemonic resolves to an [`InstructionKind`], and every kind
//! owns a fixed [`OperandContract`] naming the token classes its left
//! and right operand positions accept. The driver installs the
//! contract's expectation sets wholesale per operand transition; sets
//! are never merged or appended to.

use std::fmt;

use crate::error::{AsmError, ErrorKind};
use crate::token::{Grammar, Keyword, Register, Token, TokenClass, Width};

/// Ordered set of token classes legal at the current parse position.
/// Order encodes priority for diagnostics, not alternation weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectationSet {
    classes: &'static [TokenClass],
}

impl ExpectationSet {
    pub const fn new(classes: &'static [TokenClass]) -> Self {
        Self { classes }
    }

    pub fn classes(&self) -> &'static [TokenClass] {
        self.classes
    }

    pub fn allows(&self, class: TokenClass) -> bool {
        self.classes.contains(&class)
    }

    /// Whether `token` satisfies the set. The `Memory` pseudo-class is
    /// matched by the opening bracket of a memory reference.
    pub fn admits(&self, token: &Token) -> bool {
        let class = token.class();
        for expected in self.classes {
            let hit = match expected {
                TokenClass::Memory => token.is_grammar(Grammar::OpenBracket),
                other => class == *other,
            };
            if hit {
                return true;
            }
        }
        false
    }
}

impl fmt::Display for ExpectationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, class) in self.classes.iter().enumerate() {
            if i > 0 {
                f.write_str(" or ")?;
            }
            write!(f, "{class}")?;
        }
        Ok(())
    }
}

pub const REG_OR_MEM: ExpectationSet =
    ExpectationSet::new(&[TokenClass::Register, TokenClass::Memory]);
pub const REG_IMM_MEM: ExpectationSet = ExpectationSet::new(&[
    TokenClass::Register,
    TokenClass::Immediate,
    TokenClass::Memory,
]);
pub const REG_ONLY: ExpectationSet = ExpectationSet::new(&[TokenClass::Register]);
pub const REG_OR_IMM: ExpectationSet =
    ExpectationSet::new(&[TokenClass::Register, TokenClass::Immediate]);
pub const LABEL_OR_IMM: ExpectationSet =
    ExpectationSet::new(&[TokenClass::Label, TokenClass::Immediate]);
pub const IMM_ONLY: ExpectationSet = ExpectationSet::new(&[TokenClass::Immediate]);
pub const MEM_ONLY: ExpectationSet = ExpectationSet::new(&[TokenClass::Memory]);

/// Token classes an instruction accepts at each operand position.
/// `None` means the position does not exist for this instruction.
#[derive(Debug, Clone, Copy)]
pub struct OperandContract {
    pub left: Option<ExpectationSet>,
    pub right: Option<ExpectationSet>,
}

impl OperandContract {
    const fn new(left: Option<ExpectationSet>, right: Option<ExpectationSet>) -> Self {
        Self { left, right }
    }
}

/// A mnemonic resolved against the instruction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionKind {
    /// `mov` and its width-suffixed forms.
    Mov { suffix: Option<Width> },
    /// `or and xor nand nor shl shr`.
    Bitwise(Keyword),
    /// `div mul dec inc res`; a single register operand.
    Unary(Keyword),
    /// `add sub adc cmp`; register left, register or immediate right.
    Binary(Keyword),
    /// `jmp jne jge jle jz jc jg jl call`; a label or immediate target.
    Jump(Keyword),
    /// `in reg, imm` port read.
    In,
    /// `out imm, reg` port write.
    Out,
    /// `int imm` with an 8-bit vector.
    Int,
    /// `lea reg, mem`.
    Lea,
    /// Operand-free mnemonics.
    NoOperand(Keyword),
}

impl InstructionKind {
    /// Resolve a keyword to its instruction-table entry. A reserved
    /// word with no entry is an unknown instruction; `incbin` and
    /// `incsrc` are deliberately absent since directive inclusion is
    /// not performed.
    pub fn from_keyword(kw: Keyword, line: u32) -> Result<InstructionKind, AsmError> {
        use Keyword::*;
        let kind = match kw {
            Mov => InstructionKind::Mov { suffix: None },
            Movb => InstructionKind::Mov {
                suffix: Some(Width::W8),
            },
            Movw => InstructionKind::Mov {
                suffix: Some(Width::W16),
            },
            Movd => InstructionKind::Mov {
                suffix: Some(Width::W32),
            },
            Or | And | Xor | Nand | Nor | Shl | Shr => InstructionKind::Bitwise(kw),
            Div | Mul | Dec | Inc | Res => InstructionKind::Unary(kw),
            Add | Sub | Adc | Cmp => InstructionKind::Binary(kw),
            Jmp | Jne | Jge | Jle | Jz | Jc | Jg | Jl | Call => InstructionKind::Jump(kw),
            In => InstructionKind::In,
            Out => InstructionKind::Out,
            Int => InstructionKind::Int,
            Lea => InstructionKind::Lea,
            Clc | Cld | Cli | Sti | Cmc | Hlt | Cwd | Cmpsb | Lock | Lodsb | Lodsw => {
                InstructionKind::NoOperand(kw)
            }
            Incbin | Incsrc => {
                return Err(AsmError::new(
                    ErrorKind::UnknownInstruction,
                    line,
                    "directive-file inclusion is not an instruction",
                ));
            }
        };
        Ok(kind)
    }

    pub fn contract(&self) -> OperandContract {
        match self {
            InstructionKind::Mov { .. } => {
                OperandContract::new(Some(REG_OR_MEM), Some(REG_IMM_MEM))
            }
            InstructionKind::Bitwise(_) | InstructionKind::Binary(_) => {
                OperandContract::new(Some(REG_ONLY), Some(REG_OR_IMM))
            }
            InstructionKind::Unary(_) => OperandContract::new(Some(REG_ONLY), None),
            InstructionKind::Jump(_) => OperandContract::new(Some(LABEL_OR_IMM), None),
            InstructionKind::In => OperandContract::new(Some(REG_ONLY), Some(IMM_ONLY)),
            InstructionKind::Out => OperandContract::new(Some(IMM_ONLY), Some(REG_ONLY)),
            InstructionKind::Int => OperandContract::new(Some(IMM_ONLY), None),
            InstructionKind::Lea => OperandContract::new(Some(REG_ONLY), Some(MEM_ONLY)),
            InstructionKind::NoOperand(_) => OperandContract::new(None, None),
        }
    }

    /// Width suffix for the mov family, if one was written.
    pub fn mov_suffix(&self) -> Option<Width> {
        match self {
            InstructionKind::Mov { suffix } => *suffix,
            _ => None,
        }
    }
}

/// A resolved operand, the record a code-generation backend would
/// consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Reg(Register),
    /// Bracketed memory reference holding the enclosed address value.
    Mem(u32),
    Imm(u32),
    /// Jump or call target named by a user label.
    Target(String),
}

impl Operand {
    /// Width of the operand where one is inherent. Memory references
    /// and label targets take their width from the instruction.
    pub fn width(&self) -> Option<Width> {
        match self {
            Operand::Reg(reg) => Some(reg.width()),
            _ => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg(reg) => f.write_str(reg.name()),
            Operand::Mem(addr) => write!(f, "[{addr:#x}]"),
            Operand::Imm(value) => write!(f, "{value:#x}"),
            Operand::Target(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandRole {
    Left,
    Right,
}

/// Live parse state for one instruction line; discarded at line end or
/// on the first error.
#[derive(Debug)]
pub struct InstructionContext {
    pub kind: InstructionKind,
    pub role: OperandRole,
    pub left: Option<Operand>,
    pub right: Option<Operand>,
}

impl InstructionContext {
    pub fn new(kind: InstructionKind) -> Self {
        Self {
            kind,
            role: OperandRole::Left,
            left: None,
            right: None,
        }
    }
}
