//! Abstract syntax tree
//!
//! Nodes are produced by the parser already typed and resolved. Each node
//! carries a `NodeMeta` with its unique id and source line; code generation
//! lives in `codegen`.

pub mod expression;
pub mod statement;
pub mod visit;

pub use expression::{BinaryOp, Expression, ExpressionKind, MethodCall, NodeId, NodeMeta};
pub use statement::{AssignSelector, AssignTarget, Block, Statement, StatementKind, SwitchCase};
pub use visit::Node;
