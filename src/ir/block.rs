//! Basic blocks and terminators.

use std::fmt;

use super::instr::Instr;
use super::value::{CmpOp, ValueId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BasicBlockId(pub u32);

impl fmt::Display for BasicBlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bb{}", self.0)
    }
}

/// How a block ends. Every reachable block has exactly one of these; there
/// is no implicit fallthrough.
#[derive(Debug, Clone, PartialEq)]
pub enum Terminator {
    Jump(BasicBlockId),
    CJump {
        op: CmpOp,
        lhs: ValueId,
        rhs: ValueId,
        if_true: BasicBlockId,
        if_false: BasicBlockId,
    },
    Return(Option<ValueId>),
}

impl Terminator {
    pub fn successors(&self) -> Vec<BasicBlockId> {
        match self {
            Terminator::Jump(b) => vec![*b],
            Terminator::CJump { if_true, if_false, .. } => vec![*if_true, *if_false],
            Terminator::Return(_) => vec![],
        }
    }
}

impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminator::Jump(b) => write!(f, "jmp {b}"),
            Terminator::CJump { op, lhs, rhs, if_true, if_false } => {
                write!(f, "cjmp {lhs} {op} {rhs} ? {if_true} : {if_false}")
            }
            Terminator::Return(Some(v)) => write!(f, "ret {v}"),
            Terminator::Return(None) => write!(f, "ret"),
        }
    }
}

/// A straight-line sequence of instructions ending in a single terminator.
#[derive(Debug, Clone)]
pub struct BasicBlock {
    pub id: BasicBlockId,
    pub instructions: Vec<Instr>,
    pub terminator: Option<Terminator>,
}

impl BasicBlock {
    pub fn new(id: BasicBlockId) -> Self {
        BasicBlock {
            id,
            instructions: Vec::new(),
            terminator: None,
        }
    }

    pub fn push(&mut self, instr: Instr) {
        self.instructions.push(instr);
    }

    pub fn set_terminator(&mut self, term: Terminator) {
        self.terminator = Some(term);
    }

    pub fn is_terminated(&self) -> bool {
        self.terminator.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty() && self.terminator.is_none()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn successors(&self) -> Vec<BasicBlockId> {
        self.terminator
            .as_ref()
            .map(|t| t.successors())
            .unwrap_or_default()
    }
}
