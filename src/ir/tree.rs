//! The node arena and factory surface
//!
//! A [`Tree`] owns every node built for one translation unit. Construction
//! is bottom-up: children first, then the node that references them. Each
//! tree carries a process-unique tag, and every child argument is validated
//! to be a node of *this* tree before construction proceeds; a stale or
//! foreign id fails with a `TypeViolation` naming the 1-based argument
//! position, exactly what a translator needs to find the bad call site.
//!
//! Nodes are immutable once constructed. A node is either an interior node
//! (kind + ordered children) or a constant leaf (kind `Constant` + payload),
//! never both.

use crate::ir::constant::{ConstantTag, ConstantValue};
use crate::ir::error::BridgeError;
use crate::ir::node::{ChildList, NodeId, NodeKind};
use serde::Serialize;
use std::any::Any;
use std::sync::atomic::{AtomicU32, Ordering};

// Tree tags start at 1 so the all-zero placeholder id never validates.
static NEXT_TREE_TAG: AtomicU32 = AtomicU32::new(1);

#[derive(Debug, Clone, PartialEq, Serialize)]
enum NodePayload {
    Children(ChildList),
    Constant(ConstantValue),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct NodeData {
    kind: NodeKind,
    payload: NodePayload,
}

/// Arena of immutable nodes for one translation unit
#[derive(Debug, Serialize)]
pub struct Tree {
    tag: u32,
    nodes: Vec<NodeData>,
}

impl Tree {
    pub fn new() -> Self {
        Tree {
            tag: NEXT_TREE_TAG.fetch_add(1, Ordering::Relaxed),
            nodes: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, id: NodeId) -> Option<&NodeData> {
        if id.tree_tag() != self.tag {
            return None;
        }
        self.nodes.get(id.index())
    }

    fn check_child(&self, id: NodeId, argument: usize) -> Result<(), BridgeError> {
        if self.node(id).is_some() {
            Ok(())
        } else {
            Err(BridgeError::not_a_node(
                argument,
                id.to_string(),
                "NodeId".to_string(),
            ))
        }
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId::new(self.tag, self.nodes.len() as u32);
        self.nodes.push(data);
        id
    }

    /// Build an interior node from a kind and its ordered children
    ///
    /// Covers the fixed 0-6 shapes and the n-ary shape alike; arity is
    /// implicit in the slice length. Every child is validated first and the
    /// first offender aborts construction.
    pub fn make_node(&mut self, kind: NodeKind, children: &[NodeId]) -> Result<NodeId, BridgeError> {
        for (i, child) in children.iter().enumerate() {
            self.check_child(*child, i + 1)?;
        }
        Ok(self.push(NodeData {
            kind,
            payload: NodePayload::Children(ChildList::from_slice(children)),
        }))
    }

    /// Build an interior node with one fixed child followed by an n-ary tail
    pub fn make_node_with(
        &mut self,
        kind: NodeKind,
        anchor: NodeId,
        rest: &[NodeId],
    ) -> Result<NodeId, BridgeError> {
        self.check_child(anchor, 1)?;
        for (i, child) in rest.iter().enumerate() {
            self.check_child(*child, i + 2)?;
        }
        Ok(self.push(NodeData {
            kind,
            payload: NodePayload::Children(ChildList::with_anchor(anchor, rest)),
        }))
    }

    /// Wrap a payload value as a constant leaf node
    ///
    /// String inputs are defensively copied on conversion; the caller's
    /// buffer may be freed or rewritten afterwards.
    pub fn make_constant(&mut self, value: impl Into<ConstantValue>) -> NodeId {
        self.push(NodeData {
            kind: NodeKind::Constant,
            payload: NodePayload::Constant(value.into()),
        })
    }

    /// The distinguished "switch default" leaf
    pub fn make_switch_default(&mut self) -> NodeId {
        self.make_constant(ConstantValue::SwitchDefault)
    }

    /// The call member-reference leaf handed to call-node builders
    pub fn make_call_reference(&mut self) -> NodeId {
        self.make_constant(ConstantValue::CallReference)
    }

    pub fn kind(&self, id: NodeId) -> Result<NodeKind, BridgeError> {
        self.node(id)
            .map(|n| n.kind)
            .ok_or_else(|| BridgeError::not_a_node(1, id.to_string(), "NodeId".to_string()))
    }

    pub fn child_count(&self, id: NodeId) -> Result<usize, BridgeError> {
        Ok(self.children(id)?.len())
    }

    pub fn child(&self, id: NodeId, i: usize) -> Result<NodeId, BridgeError> {
        let children = self.children(id)?;
        children.get(i).copied().ok_or_else(|| {
            BridgeError::ConstructionFailure(format!(
                "child index {} out of range for {} with {} children",
                i,
                id,
                children.len()
            ))
        })
    }

    /// Ordered child ids of a node; empty for constant leaves
    pub fn children(&self, id: NodeId) -> Result<&[NodeId], BridgeError> {
        self.check_child(id, 1)?;
        match self.node(id).map(|n| &n.payload) {
            Some(NodePayload::Children(list)) => Ok(list.as_slice()),
            _ => Ok(&[]),
        }
    }

    /// The payload of a node, if it is a constant leaf
    pub fn value(&self, id: NodeId) -> Option<&ConstantValue> {
        match self.node(id).map(|n| &n.payload) {
            Some(NodePayload::Constant(v)) => Some(v),
            _ => None,
        }
    }

    /// True iff the node carries a payload rather than children
    pub fn is_constant_value(&self, id: NodeId) -> bool {
        self.value(id).is_some()
    }

    /// True iff the node is a constant whose payload matches `tag`
    ///
    /// A non-constant node, or a stale id, reports `false`; this query
    /// never raises.
    pub fn is_constant_of_type(&self, id: NodeId, tag: ConstantTag) -> bool {
        self.value(id).map(|v| v.tag() == tag).unwrap_or(false)
    }

    /// Identity comparison against the switch-default sentinel
    pub fn is_switch_default_constant_value(&self, id: NodeId) -> bool {
        matches!(self.value(id), Some(ConstantValue::SwitchDefault))
    }

    fn payload_violation(&self, id: NodeId, expected: &str) -> BridgeError {
        let (printable, type_name) = match self.value(id) {
            Some(v) => (v.to_string(), v.type_name().to_string()),
            None => (id.to_string(), "non-constant node".to_string()),
        };
        BridgeError::TypeViolation {
            index: 1,
            printable,
            type_name: format!("{} (expected {})", type_name, expected),
        }
    }

    /// Extract a string constant's payload
    pub fn string_constant_value(&self, id: NodeId) -> Result<&str, BridgeError> {
        match self.value(id) {
            Some(ConstantValue::Str(s)) => Ok(s),
            _ => Err(self.payload_violation(id, "string")),
        }
    }

    /// Extract an int constant's payload
    pub fn int_constant_value(&self, id: NodeId) -> Result<i32, BridgeError> {
        match self.value(id) {
            Some(ConstantValue::Int(v)) => Ok(*v),
            _ => Err(self.payload_violation(id, "int")),
        }
    }

    /// Extract any constant's payload
    pub fn constant_value(&self, id: NodeId) -> Result<&ConstantValue, BridgeError> {
        self.value(id)
            .ok_or_else(|| self.payload_violation(id, "constant"))
    }

    /// Downcast an opaque host payload to the concrete type the caller expects
    pub fn host_constant_value<T: Any>(&self, id: NodeId) -> Result<&T, BridgeError> {
        match self.value(id) {
            Some(ConstantValue::Object(obj)) => obj
                .downcast_ref::<T>()
                .ok_or_else(|| self.payload_violation(id, std::any::type_name::<T>())),
            _ => Err(self.payload_violation(id, "host object")),
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Tree::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_of_two_constants() {
        let mut tree = Tree::new();
        let one = tree.make_constant(1);
        let two = tree.make_constant(2);
        let add = tree.make_node(NodeKind::BinaryExpr, &[one, two]).unwrap();

        assert_eq!(tree.kind(add).unwrap(), NodeKind::BinaryExpr);
        assert_eq!(tree.child_count(add).unwrap(), 2);
        assert_eq!(tree.int_constant_value(tree.child(add, 0).unwrap()).unwrap(), 1);
        assert_eq!(tree.int_constant_value(tree.child(add, 1).unwrap()).unwrap(), 2);
    }

    #[test]
    fn test_foreign_id_reports_argument_position() {
        let mut other = Tree::new();
        let foreign = other.make_constant(0);

        let mut tree = Tree::new();
        let ok = tree.make_constant(1);
        let err = tree
            .make_node(NodeKind::BlockStmt, &[ok, foreign])
            .unwrap_err();
        match err {
            BridgeError::TypeViolation { index, .. } => assert_eq!(index, 2),
            other => panic!("expected type violation, got {:?}", other),
        }
    }

    #[test]
    fn test_anchor_shape_counts_arguments_from_the_anchor() {
        let mut other = Tree::new();
        let foreign = other.make_constant(0);

        let mut tree = Tree::new();
        let anchor = tree.make_constant("f");
        let err = tree
            .make_node_with(NodeKind::Call, anchor, &[foreign])
            .unwrap_err();
        match err {
            BridgeError::TypeViolation { index, .. } => assert_eq!(index, 2),
            other => panic!("expected type violation, got {:?}", other),
        }
    }

    #[test]
    fn test_constant_shape_queries_never_raise() {
        let mut tree = Tree::new();
        let leaf = tree.make_constant(true);
        let interior = tree.make_node(NodeKind::BlockStmt, &[leaf]).unwrap();

        assert!(tree.is_constant_value(leaf));
        assert!(tree.is_constant_of_type(leaf, ConstantTag::Bool));
        assert!(!tree.is_constant_of_type(leaf, ConstantTag::Int));
        assert!(!tree.is_constant_value(interior));
        assert!(!tree.is_constant_of_type(interior, ConstantTag::Bool));
    }

    #[test]
    fn test_switch_default_is_identity_not_equality() {
        let mut tree = Tree::new();
        let default = tree.make_switch_default();
        let zero = tree.make_constant(0);
        assert!(tree.is_switch_default_constant_value(default));
        assert!(!tree.is_switch_default_constant_value(zero));
    }

    #[test]
    fn test_string_extraction_survives_caller_buffer_reuse() {
        let mut tree = Tree::new();
        let mut buffer = String::from("hello");
        let node = tree.make_constant(buffer.as_str());
        buffer.replace_range(.., "XXXXX");
        assert_eq!(tree.string_constant_value(node).unwrap(), "hello");
    }

    #[test]
    fn test_typed_extraction_violations() {
        let mut tree = Tree::new();
        let not_a_string = tree.make_constant(7);
        assert!(matches!(
            tree.string_constant_value(not_a_string),
            Err(BridgeError::TypeViolation { index: 1, .. })
        ));

        let interior = tree.make_node(NodeKind::Empty, &[]).unwrap();
        assert!(matches!(
            tree.constant_value(interior),
            Err(BridgeError::TypeViolation { .. })
        ));
    }

    #[test]
    fn test_host_object_downcast_through_the_tree() {
        use crate::ir::constant::HostObject;

        let mut tree = Tree::new();
        let node = tree.make_constant(HostObject::new(vec![1u32, 2, 3]));
        assert_eq!(
            tree.host_constant_value::<Vec<u32>>(node).unwrap(),
            &vec![1u32, 2, 3]
        );
        assert!(tree.host_constant_value::<String>(node).is_err());
    }
}
