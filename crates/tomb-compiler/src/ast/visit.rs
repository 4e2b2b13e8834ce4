//! Pre-order traversal and the liveness queries built on it

use super::expression::{Expression, ExpressionKind};
use super::statement::{AssignSelector, AssignTarget, Block, Statement, StatementKind};
use crate::symbols::VarId;

/// A node reached during traversal
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Statement(&'a Statement),
    Expression(&'a Expression),
}

impl Block {
    pub fn visit<'a, F: FnMut(Node<'a>)>(&'a self, f: &mut F) {
        for statement in &self.statements {
            statement.visit(f);
        }
    }

    /// Whether the block reads or writes `var` anywhere
    pub fn is_node_used(&self, var: VarId) -> bool {
        let mut used = false;
        self.visit(&mut |node| match node {
            Node::Expression(expr) => {
                if matches!(expr.kind, ExpressionKind::Variable(v) if v == var) {
                    used = true;
                }
            }
            Node::Statement(stmt) => {
                if stmt.assigned_var() == Some(var) {
                    used = true;
                }
            }
        });
        used
    }

    /// Whether any statement in the block assigns to `var`
    pub fn assigns(&self, var: VarId) -> bool {
        let mut assigned = false;
        self.visit(&mut |node| {
            if let Node::Statement(stmt) = node {
                if stmt.assigned_var() == Some(var) {
                    assigned = true;
                }
            }
        });
        assigned
    }

    /// Number of statements that write the whole of `var`
    pub fn initializations(&self, var: VarId) -> usize {
        let mut count = 0;
        self.visit(&mut |node| {
            if let Node::Statement(stmt) = node {
                if stmt.initialized_var() == Some(var) {
                    count += 1;
                }
            }
        });
        count
    }

    /// Whether every path through the block ends in `return` or `throw`
    pub fn always_returns(&self) -> bool {
        for statement in &self.statements {
            if matches!(statement.kind, StatementKind::Break | StatementKind::Continue) {
                return false;
            }
            if statement.always_returns() {
                return true;
            }
        }
        false
    }
}

impl Statement {
    pub fn visit<'a, F: FnMut(Node<'a>)>(&'a self, f: &mut F) {
        f(Node::Statement(self));
        match &self.kind {
            StatementKind::Local { value, .. } => {
                if let Some(value) = value {
                    value.visit(f);
                }
            }
            StatementKind::Assign { target, value } => {
                if let AssignSelector::Index(index) = &target.selector {
                    index.visit(f);
                }
                value.visit(f);
            }
            StatementKind::Call(expr) | StatementKind::Throw(expr) => expr.visit(f),
            StatementKind::If {
                condition,
                body,
                else_body,
            } => {
                condition.visit(f);
                body.visit(f);
                if let Some(else_body) = else_body {
                    else_body.visit(f);
                }
            }
            StatementKind::While { condition, body }
            | StatementKind::DoWhile { body, condition } => {
                condition.visit(f);
                body.visit(f);
            }
            StatementKind::For {
                init,
                condition,
                step,
                body,
                ..
            } => {
                init.visit(f);
                condition.visit(f);
                step.visit(f);
                body.visit(f);
            }
            StatementKind::Switch {
                value,
                cases,
                default,
            } => {
                value.visit(f);
                for case in cases {
                    case.value.visit(f);
                    case.body.visit(f);
                }
                if let Some(default) = default {
                    default.visit(f);
                }
            }
            StatementKind::Return(value) => {
                if let Some(value) = value {
                    value.visit(f);
                }
            }
            StatementKind::Emit { address, value, .. } => {
                address.visit(f);
                value.visit(f);
            }
            StatementKind::Break | StatementKind::Continue | StatementKind::Asm(_) => {}
        }
    }

    fn always_returns(&self) -> bool {
        match &self.kind {
            StatementKind::Return(_) | StatementKind::Throw(_) => true,
            StatementKind::If {
                body,
                else_body: Some(else_body),
                ..
            } => body.always_returns() && else_body.always_returns(),
            StatementKind::Switch {
                cases,
                default: Some(default),
                ..
            } => default.always_returns() && cases.iter().all(|c| c.body.always_returns()),
            _ => false,
        }
    }

    /// Variable replaced as a whole by this statement, if any
    pub fn initialized_var(&self) -> Option<VarId> {
        match &self.kind {
            StatementKind::Assign {
                target:
                    AssignTarget {
                        var,
                        selector: AssignSelector::Whole,
                    },
                ..
            } => Some(*var),
            StatementKind::Local {
                var,
                value: Some(_),
            } => Some(*var),
            _ => None,
        }
    }

    /// Variable written by this statement, if any
    pub fn assigned_var(&self) -> Option<VarId> {
        match &self.kind {
            StatementKind::Assign { target, .. } => Some(target.var),
            StatementKind::Local {
                var,
                value: Some(_),
            } => Some(*var),
            _ => None,
        }
    }
}

impl Expression {
    pub fn visit<'a, F: FnMut(Node<'a>)>(&'a self, f: &mut F) {
        f(Node::Expression(self));
        match &self.kind {
            ExpressionKind::Binary { left, right, .. } => {
                left.visit(f);
                right.visit(f);
            }
            ExpressionKind::Not(inner)
            | ExpressionKind::Negate(inner)
            | ExpressionKind::Cast(inner) => inner.visit(f),
            ExpressionKind::Call(call) => {
                for arg in &call.arguments {
                    arg.visit(f);
                }
            }
            ExpressionKind::StructField { target, .. } => target.visit(f),
            ExpressionKind::ArrayElement { array, index } => {
                array.visit(f);
                index.visit(f);
            }
            ExpressionKind::Literal(_)
            | ExpressionKind::Constant { .. }
            | ExpressionKind::Variable(_)
            | ExpressionKind::ThisAddress
            | ExpressionKind::ModuleRef(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AssignTarget, NodeId, NodeMeta};
    use crate::symbols::ScopeId;
    use crate::types::TypeId;

    fn meta(id: u32) -> NodeMeta {
        NodeMeta {
            id: NodeId(id),
            line: 1,
        }
    }

    fn var(id: u32) -> Expression {
        Expression {
            meta: meta(100 + id),
            ty: TypeId::NUMBER,
            kind: ExpressionKind::Variable(VarId(id)),
        }
    }

    fn block(statements: Vec<Statement>) -> Block {
        Block {
            scope: ScopeId(0),
            statements,
        }
    }

    #[test]
    fn test_reads_and_writes() {
        // x = y; if (z) { return w; }
        let body = block(vec![
            Statement {
                meta: meta(1),
                kind: StatementKind::Assign {
                    target: AssignTarget {
                        var: VarId(0),
                        selector: AssignSelector::Whole,
                    },
                    value: var(1),
                },
            },
            Statement {
                meta: meta(2),
                kind: StatementKind::If {
                    condition: var(2),
                    body: block(vec![Statement {
                        meta: meta(3),
                        kind: StatementKind::Return(Some(var(3))),
                    }]),
                    else_body: None,
                },
            },
        ]);

        assert!(body.is_node_used(VarId(0)));
        assert!(body.assigns(VarId(0)));
        assert!(body.is_node_used(VarId(1)));
        assert!(!body.assigns(VarId(1)));
        assert!(body.is_node_used(VarId(3)));
        assert!(!body.is_node_used(VarId(9)));
        assert_eq!(body.initializations(VarId(0)), 1);
        assert!(!body.always_returns());
    }

    #[test]
    fn test_pre_order() {
        let stmt = Statement {
            meta: meta(1),
            kind: StatementKind::Throw(var(0)),
        };
        let mut order = Vec::new();
        stmt.visit(&mut |node| match node {
            Node::Statement(s) => order.push(s.meta.id.0),
            Node::Expression(e) => order.push(e.meta.id.0),
        });
        assert_eq!(order, vec![1, 100]);
    }

    #[test]
    fn test_always_returns_needs_every_branch() {
        let ret = |id| Statement {
            meta: meta(id),
            kind: StatementKind::Return(Some(var(id))),
        };
        let branch = |else_body: Option<Block>| Statement {
            meta: meta(10),
            kind: StatementKind::If {
                condition: var(0),
                body: block(vec![ret(1)]),
                else_body,
            },
        };

        assert!(!block(vec![branch(None)]).always_returns());
        assert!(block(vec![branch(Some(block(vec![ret(2)])))]).always_returns());
        assert!(block(vec![branch(None), ret(3)]).always_returns());

        let broken = Statement {
            meta: meta(11),
            kind: StatementKind::Break,
        };
        assert!(!block(vec![broken, ret(4)]).always_returns());
    }
}
