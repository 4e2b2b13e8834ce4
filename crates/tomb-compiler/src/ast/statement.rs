//! Statement nodes

use super::expression::{Expression, NodeMeta};
use crate::symbols::{ScopeId, VarId};

/// A braced sequence of statements with its own scope
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub scope: ScopeId,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssignSelector {
    /// The variable itself
    Whole,
    /// `v.field = ...`
    Field(String),
    /// `v[index] = ...`
    Index(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignTarget {
    pub var: VarId,
    pub selector: AssignSelector,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub value: Expression,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// `local x[: type] [= value];`
    Local {
        var: VarId,
        value: Option<Expression>,
    },
    /// Plain and compound assignment; compound forms are already expanded
    Assign {
        target: AssignTarget,
        value: Expression,
    },
    /// A call evaluated for its side effects
    Call(Expression),
    If {
        condition: Expression,
        body: Block,
        else_body: Option<Block>,
    },
    While {
        condition: Expression,
        body: Block,
    },
    DoWhile {
        body: Block,
        condition: Expression,
    },
    For {
        /// Scope holding the loop variable
        scope: ScopeId,
        init: Box<Statement>,
        condition: Expression,
        step: Box<Statement>,
        body: Block,
    },
    Switch {
        value: Expression,
        cases: Vec<SwitchCase>,
        default: Option<Block>,
    },
    Return(Option<Expression>),
    Throw(Expression),
    Break,
    Continue,
    /// `emit Event(address, value);`
    Emit {
        event: String,
        kind: u8,
        address: Expression,
        value: Expression,
    },
    /// Raw assembly lines
    Asm(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub meta: NodeMeta,
    pub kind: StatementKind,
}

impl Statement {
    pub fn line(&self) -> u32 {
        self.meta.line
    }
}
