//! Control flow helpers
//!
//! Label naming for structured statements and the loop stack that
//! `break`/`continue` resolve against.

use crate::ast::NodeId;

/// Manages loop context for break/continue statements
#[derive(Debug, Default)]
pub struct LoopStack {
    loops: Vec<LoopContext>,
}

/// Labels of one enclosing loop
#[derive(Debug, Clone, PartialEq, Eq)]
struct LoopContext {
    break_label: String,
    continue_label: String,
}

impl LoopStack {
    pub fn new() -> Self {
        Self { loops: Vec::new() }
    }

    pub fn push(&mut self, break_label: String, continue_label: String) {
        self.loops.push(LoopContext {
            break_label,
            continue_label,
        });
    }

    pub fn pop(&mut self) {
        self.loops.pop();
    }

    /// Break label of the innermost loop
    pub fn break_label(&self) -> Option<&str> {
        self.loops.last().map(|ctx| ctx.break_label.as_str())
    }

    /// Continue label of the innermost loop
    pub fn continue_label(&self) -> Option<&str> {
        self.loops.last().map(|ctx| ctx.continue_label.as_str())
    }

    pub fn is_in_loop(&self) -> bool {
        !self.loops.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.loops.len()
    }
}

/// Labels derived from a node id
pub struct Labels;

impl Labels {
    pub fn then_label(id: NodeId) -> String {
        format!("@then_{}", id)
    }

    pub fn else_label(id: NodeId) -> String {
        format!("@else_{}", id)
    }

    pub fn loop_start(id: NodeId) -> String {
        format!("@loop_start_{}", id)
    }

    pub fn loop_continue(id: NodeId) -> String {
        format!("@loop_continue_{}", id)
    }

    pub fn loop_end(id: NodeId) -> String {
        format!("@loop_end_{}", id)
    }

    pub fn case_label(id: NodeId, index: usize) -> String {
        format!("@case_{}_{}", id, index)
    }

    pub fn end_case(id: NodeId) -> String {
        format!("@end_case_{}", id)
    }

    pub fn expect_label(id: NodeId) -> String {
        format!("@expect_{}", id)
    }

    pub fn entry(method: &str) -> String {
        format!("@entry_{}", method)
    }

    pub fn exit(method: &str) -> String {
        format!("@exit_{}", method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_innermost_loop_wins() {
        let mut loops = LoopStack::new();
        assert!(!loops.is_in_loop());
        assert_eq!(loops.break_label(), None);

        loops.push(Labels::loop_end(NodeId(1)), Labels::loop_start(NodeId(1)));
        loops.push(Labels::loop_end(NodeId(7)), Labels::loop_continue(NodeId(7)));
        assert_eq!(loops.break_label(), Some("@loop_end_7"));
        assert_eq!(loops.continue_label(), Some("@loop_continue_7"));

        loops.pop();
        assert_eq!(loops.break_label(), Some("@loop_end_1"));
        assert_eq!(loops.continue_label(), Some("@loop_start_1"));
        assert_eq!(loops.depth(), 1);
    }

    #[test]
    fn test_label_names() {
        assert_eq!(Labels::end_case(NodeId(3)), "@end_case_3");
        assert_eq!(Labels::case_label(NodeId(3), 1), "@case_3_1");
        assert_eq!(Labels::entry("sum"), "@entry_sum");
    }
}
