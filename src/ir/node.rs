//! Node kinds, node identities, and child storage
//!
//! Nodes are referenced by stable identity, never structural equality: a
//! [`NodeId`] pairs the owning tree's tag with the node's arena index, and
//! that pair is the key for every external annotation (positions, types,
//! control-flow targets). An id minted by one tree is meaningless in another
//! and fails child validation there.
//!
//! Child storage is a single tagged list: up to six children live inline
//! (the overwhelmingly common case for operator nodes), longer lists spill
//! to the heap. Arity checking is implicit in the list length, so one
//! constructor path covers what would otherwise be nine factory shapes.

use crate::ir::error::BridgeError;
use once_cell::sync::Lazy;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Enumerated operator and control tags for tree nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    // Statement forms
    BlockStmt,
    ExprStmt,
    DeclStmt,
    Empty,
    Return,
    Goto,
    IfGoto,
    IfStmt,
    LabelStmt,
    Loop,
    Switch,
    Try,
    Catch,
    Throw,
    Unwind,
    LocalScope,
    FunctionStmt,

    // Expression forms
    FunctionExpr,
    BlockExpr,
    BinaryExpr,
    UnaryExpr,
    IfExpr,
    Assign,
    AssignPreOp,
    AssignPostOp,
    Call,
    New,
    Cast,
    InstanceOf,
    TypeOf,
    ExprList,
    EachElementGet,
    EachElementHasNext,
    GetCaughtException,

    // References and literals
    Var,
    Constant,
    This,
    ArrayLiteral,
    ObjectLiteral,
    ArrayRef,
    ObjectRef,
    Primitive,
    Void,
    Error,
}

impl NodeKind {
    pub const ALL: [NodeKind; 44] = [
        NodeKind::BlockStmt,
        NodeKind::ExprStmt,
        NodeKind::DeclStmt,
        NodeKind::Empty,
        NodeKind::Return,
        NodeKind::Goto,
        NodeKind::IfGoto,
        NodeKind::IfStmt,
        NodeKind::LabelStmt,
        NodeKind::Loop,
        NodeKind::Switch,
        NodeKind::Try,
        NodeKind::Catch,
        NodeKind::Throw,
        NodeKind::Unwind,
        NodeKind::LocalScope,
        NodeKind::FunctionStmt,
        NodeKind::FunctionExpr,
        NodeKind::BlockExpr,
        NodeKind::BinaryExpr,
        NodeKind::UnaryExpr,
        NodeKind::IfExpr,
        NodeKind::Assign,
        NodeKind::AssignPreOp,
        NodeKind::AssignPostOp,
        NodeKind::Call,
        NodeKind::New,
        NodeKind::Cast,
        NodeKind::InstanceOf,
        NodeKind::TypeOf,
        NodeKind::ExprList,
        NodeKind::EachElementGet,
        NodeKind::EachElementHasNext,
        NodeKind::GetCaughtException,
        NodeKind::Var,
        NodeKind::Constant,
        NodeKind::This,
        NodeKind::ArrayLiteral,
        NodeKind::ObjectLiteral,
        NodeKind::ArrayRef,
        NodeKind::ObjectRef,
        NodeKind::Primitive,
        NodeKind::Void,
        NodeKind::Error,
    ];

    /// Wire name of the kind, as native translators spell it
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::BlockStmt => "BLOCK_STMT",
            NodeKind::ExprStmt => "EXPR_STMT",
            NodeKind::DeclStmt => "DECL_STMT",
            NodeKind::Empty => "EMPTY",
            NodeKind::Return => "RETURN",
            NodeKind::Goto => "GOTO",
            NodeKind::IfGoto => "IF_GOTO",
            NodeKind::IfStmt => "IF_STMT",
            NodeKind::LabelStmt => "LABEL_STMT",
            NodeKind::Loop => "LOOP",
            NodeKind::Switch => "SWITCH",
            NodeKind::Try => "TRY",
            NodeKind::Catch => "CATCH",
            NodeKind::Throw => "THROW",
            NodeKind::Unwind => "UNWIND",
            NodeKind::LocalScope => "LOCAL_SCOPE",
            NodeKind::FunctionStmt => "FUNCTION_STMT",
            NodeKind::FunctionExpr => "FUNCTION_EXPR",
            NodeKind::BlockExpr => "BLOCK_EXPR",
            NodeKind::BinaryExpr => "BINARY_EXPR",
            NodeKind::UnaryExpr => "UNARY_EXPR",
            NodeKind::IfExpr => "IF_EXPR",
            NodeKind::Assign => "ASSIGN",
            NodeKind::AssignPreOp => "ASSIGN_PRE_OP",
            NodeKind::AssignPostOp => "ASSIGN_POST_OP",
            NodeKind::Call => "CALL",
            NodeKind::New => "NEW",
            NodeKind::Cast => "CAST",
            NodeKind::InstanceOf => "INSTANCEOF",
            NodeKind::TypeOf => "TYPE_OF",
            NodeKind::ExprList => "EXPR_LIST",
            NodeKind::EachElementGet => "EACH_ELEMENT_GET",
            NodeKind::EachElementHasNext => "EACH_ELEMENT_HAS_NEXT",
            NodeKind::GetCaughtException => "GET_CAUGHT_EXCEPTION",
            NodeKind::Var => "VAR",
            NodeKind::Constant => "CONSTANT",
            NodeKind::This => "THIS",
            NodeKind::ArrayLiteral => "ARRAY_LITERAL",
            NodeKind::ObjectLiteral => "OBJECT_LITERAL",
            NodeKind::ArrayRef => "ARRAY_REF",
            NodeKind::ObjectRef => "OBJECT_REF",
            NodeKind::Primitive => "PRIMITIVE",
            NodeKind::Void => "VOID",
            NodeKind::Error => "ERROR",
        }
    }

    /// Resolve a kind from its wire name through the one-time binding table
    pub fn named(name: &str) -> Result<NodeKind, BridgeError> {
        KIND_TABLE.get(name).copied().ok_or_else(|| {
            BridgeError::ResourceLookupFailure(format!("unknown node kind '{}'", name))
        })
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable name-to-kind table, built once per process and held read-only
static KIND_TABLE: Lazy<HashMap<&'static str, NodeKind>> =
    Lazy::new(|| NodeKind::ALL.iter().map(|k| (k.name(), *k)).collect());

/// Stable identity of a node: owning tree tag plus arena index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId {
    tree: u32,
    index: u32,
}

impl NodeId {
    pub(crate) const PLACEHOLDER: NodeId = NodeId { tree: 0, index: 0 };

    pub(crate) fn new(tree: u32, index: u32) -> Self {
        NodeId { tree, index }
    }

    pub(crate) fn tree_tag(&self) -> u32 {
        self.tree
    }

    pub(crate) fn index(&self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node #{} of tree {}", self.index, self.tree)
    }
}

const INLINE_CAPACITY: usize = 6;

#[derive(Debug, Clone)]
enum Repr {
    Inline { len: u8, ids: [NodeId; INLINE_CAPACITY] },
    Heap(Vec<NodeId>),
}

/// Ordered child sequence with inline storage for up to six children
#[derive(Debug, Clone)]
pub struct ChildList {
    repr: Repr,
}

impl ChildList {
    pub fn new() -> Self {
        ChildList::from_slice(&[])
    }

    pub fn from_slice(children: &[NodeId]) -> Self {
        if children.len() <= INLINE_CAPACITY {
            let mut ids = [NodeId::PLACEHOLDER; INLINE_CAPACITY];
            ids[..children.len()].copy_from_slice(children);
            ChildList {
                repr: Repr::Inline {
                    len: children.len() as u8,
                    ids,
                },
            }
        } else {
            ChildList {
                repr: Repr::Heap(children.to_vec()),
            }
        }
    }

    /// The "anchor + n-ary" shape: one fixed child followed by the rest
    pub fn with_anchor(anchor: NodeId, rest: &[NodeId]) -> Self {
        let mut all = Vec::with_capacity(rest.len() + 1);
        all.push(anchor);
        all.extend_from_slice(rest);
        ChildList::from_slice(&all)
    }

    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Inline { len, .. } => *len as usize,
            Repr::Heap(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, i: usize) -> Option<NodeId> {
        self.as_slice().get(i).copied()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        match &self.repr {
            Repr::Inline { len, ids } => &ids[..*len as usize],
            Repr::Heap(v) => v,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.as_slice().iter().copied()
    }
}

impl Default for ChildList {
    fn default() -> Self {
        ChildList::new()
    }
}

impl PartialEq for ChildList {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl From<&[NodeId]> for ChildList {
    fn from(children: &[NodeId]) -> Self {
        ChildList::from_slice(children)
    }
}

impl Serialize for ChildList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let slice = self.as_slice();
        let mut seq = serializer.serialize_seq(Some(slice.len()))?;
        for id in slice {
            seq.serialize_element(id)?;
        }
        seq.end()
    }
}
