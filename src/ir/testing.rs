//! Fluent assertion helpers for construction tests
//!
//! Construction tests must verify tree structure, not just node counts.
//! `assert_tree` walks a built subtree with closures per child, so a test
//! reads like the shape it checks:
//!
//! ```ignore
//! assert_tree(&tree, add)
//!     .kind(NodeKind::BinaryExpr)
//!     .child_count(2)
//!     .child(0, |c| { c.constant(1); })
//!     .child(1, |c| { c.constant(2); });
//! ```
//!
//! Helpers panic with descriptive messages; they are for tests only.

use crate::ir::constant::ConstantValue;
use crate::ir::node::{NodeId, NodeKind};
use crate::ir::tree::Tree;

/// Entry point: assert on the subtree rooted at `node`
pub fn assert_tree(tree: &Tree, node: NodeId) -> TreeAssert<'_> {
    TreeAssert { tree, node }
}

pub struct TreeAssert<'a> {
    tree: &'a Tree,
    node: NodeId,
}

impl<'a> TreeAssert<'a> {
    pub fn kind(self, expected: NodeKind) -> Self {
        let actual = self
            .tree
            .kind(self.node)
            .unwrap_or_else(|e| panic!("kind of {}: {}", self.node, e));
        assert_eq!(actual, expected, "kind mismatch at {}", self.node);
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        let actual = self
            .tree
            .child_count(self.node)
            .unwrap_or_else(|e| panic!("child count of {}: {}", self.node, e));
        assert_eq!(actual, expected, "child count mismatch at {}", self.node);
        self
    }

    pub fn child(self, i: usize, f: impl FnOnce(TreeAssert<'_>)) -> Self {
        let child = self
            .tree
            .child(self.node, i)
            .unwrap_or_else(|e| panic!("child {} of {}: {}", i, self.node, e));
        f(TreeAssert {
            tree: self.tree,
            node: child,
        });
        self
    }

    /// Assert the node is a constant leaf with exactly this payload
    pub fn constant(self, expected: impl Into<ConstantValue>) -> Self {
        let expected = expected.into();
        match self.tree.value(self.node) {
            Some(actual) => assert_eq!(actual, &expected, "payload mismatch at {}", self.node),
            None => panic!("{} is not a constant leaf", self.node),
        }
        self
    }

    pub fn id(&self) -> NodeId {
        self.node
    }
}
