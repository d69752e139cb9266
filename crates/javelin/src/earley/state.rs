//! Dotted items of the Earley parser

use crate::grammar::{Grammar, Part, RuleId};
use crate::syntax::{OperandStack, TreeNode};
use std::sync::Arc;

/// Identity of a state within one column
pub type StateKey = (RuleId, usize, usize);

/// A rule matched up to `dot`, started at column `origin`.
///
/// `operands` holds one tree node per matched part, in production order.
#[derive(Debug, Clone)]
pub struct State {
    rule: RuleId,
    dot: usize,
    origin: usize,
    operands: OperandStack,
}

impl State {
    /// A freshly predicted state
    #[must_use]
    pub fn predicted(rule: RuleId, origin: usize) -> Self {
        Self {
            rule,
            dot: 0,
            origin,
            operands: OperandStack::new(),
        }
    }

    #[must_use]
    pub const fn rule(&self) -> RuleId {
        self.rule
    }

    #[must_use]
    pub const fn dot(&self) -> usize {
        self.dot
    }

    #[must_use]
    pub const fn origin(&self) -> usize {
        self.origin
    }

    #[must_use]
    pub fn operands(&self) -> &OperandStack {
        &self.operands
    }

    /// Deduplication key
    #[must_use]
    pub const fn key(&self) -> StateKey {
        (self.rule, self.dot, self.origin)
    }

    /// The part after the dot, `None` once the rule is completed
    #[must_use]
    pub fn next_part(&self, grammar: &Grammar) -> Option<Part> {
        grammar.rule(self.rule).part(self.dot)
    }

    /// Move the dot over one part, pushing the node that matched it
    #[must_use]
    pub fn advance(&self, node: Arc<TreeNode>) -> Self {
        let mut operands = self.operands.clone();
        operands.push(node);
        Self {
            rule: self.rule,
            dot: self.dot + 1,
            origin: self.origin,
            operands,
        }
    }
}
