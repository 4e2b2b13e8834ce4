//! Expression nodes
//!
//! Expressions are fully typed when the parser builds them; `ty` is the
//! type of the value the node leaves in its result register.

use crate::library::MethodInterface;
use crate::symbols::VarId;
use crate::types::TypeId;

/// Unique id of an AST node within one compilation, used for labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Id and source line stamped on every node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeMeta {
    pub id: NodeId,
    pub line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shl,
    Shr,
    And,
    Or,
    Xor,
    Equal,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl BinaryOp {
    /// Operator for a binary operator token. `!=` has no operator of its
    /// own and is built as the negation of `==`.
    pub fn from_token(op: &str) -> Option<Self> {
        let op = match op {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Mod,
            "<<" => BinaryOp::Shl,
            ">>" => BinaryOp::Shr,
            "&&" | "&" => BinaryOp::And,
            "||" | "|" => BinaryOp::Or,
            "^" => BinaryOp::Xor,
            "==" | "!=" => BinaryOp::Equal,
            "<" => BinaryOp::Less,
            "<=" => BinaryOp::LessEqual,
            ">" => BinaryOp::Greater,
            ">=" => BinaryOp::GreaterEqual,
            _ => return None,
        };
        Some(op)
    }

    /// Binary operator behind a compound assignment such as `+=`
    pub fn from_assignment(op: &str) -> Option<Self> {
        op.strip_suffix('=')
            .filter(|base| !base.is_empty())
            .and_then(Self::from_token)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Equal
                | BinaryOp::Less
                | BinaryOp::LessEqual
                | BinaryOp::Greater
                | BinaryOp::GreaterEqual
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or | BinaryOp::Xor)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Xor => "^",
            BinaryOp::Equal => "==",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
        }
    }
}

/// A resolved method call
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub method: MethodInterface,
    pub arguments: Vec<Expression>,
    /// Type given as `<T>` after the method name
    pub type_argument: Option<TypeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    /// Literal text as it is loaded into a register; the node type decides
    /// how (strings keep their quotes, decimals are already scaled)
    Literal(String),
    Constant { name: String, value: String },
    Variable(VarId),
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// Logical `!`
    Not(Box<Expression>),
    /// Arithmetic `-`
    Negate(Box<Expression>),
    /// Conversion to the node type
    Cast(Box<Expression>),
    Call(MethodCall),
    StructField {
        target: Box<Expression>,
        field: String,
    },
    ArrayElement {
        array: Box<Expression>,
        index: Box<Expression>,
    },
    /// `$THIS_ADDRESS`, the address of the module being compiled
    ThisAddress,
    /// Reference to a compiled module, loaded as its script bytes
    ModuleRef(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub meta: NodeMeta,
    pub ty: TypeId,
    pub kind: ExpressionKind,
}

impl Expression {
    pub fn line(&self) -> u32 {
        self.meta.line
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            ExpressionKind::Literal(_) | ExpressionKind::Constant { .. }
        )
    }

    /// Text of a literal or constant operand
    pub fn literal_value(&self) -> Option<&str> {
        match &self.kind {
            ExpressionKind::Literal(value) | ExpressionKind::Constant { value, .. } => {
                Some(value)
            }
            _ => None,
        }
    }

    /// Literal string contents without quotes
    pub fn string_value(&self) -> Option<&str> {
        self.literal_value()
            .and_then(|v| v.strip_prefix('"'))
            .and_then(|v| v.strip_suffix('"'))
    }
}
