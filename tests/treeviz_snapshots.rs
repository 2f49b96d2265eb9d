//! Snapshot tests for the treeviz renderer
//!
//! Inline snapshots pin the exact layout translator authors see in their
//! diagnostics; connector or label drift is a rendering regression.

use astkit::ir::formats::treeviz::to_treeviz_str;
use astkit::ir::node::NodeKind;
use astkit::ir::tree::Tree;
use insta::assert_snapshot;

#[test]
fn test_assignment_render() {
    let mut tree = Tree::new();
    let var = tree.make_node(NodeKind::Var, &[]).unwrap();
    let value = tree.make_constant(42);
    let assign = tree.make_node(NodeKind::Assign, &[var, value]).unwrap();

    assert_snapshot!(to_treeviz_str(&tree, assign), @r###"
    └─ ASSIGN
       ├─ VAR
       └─ CONSTANT: 42
    "###);
}

#[test]
fn test_call_with_string_and_sentinel_children() {
    let mut tree = Tree::new();
    let callee = tree.make_call_reference();
    let greeting = tree.make_constant("hello");
    let default = tree.make_switch_default();
    let call = tree
        .make_node(NodeKind::Call, &[callee, greeting, default])
        .unwrap();

    assert_snapshot!(to_treeviz_str(&tree, call), @r###"
    └─ CALL
       ├─ CONSTANT: <call reference>
       ├─ CONSTANT: "hello"
       └─ CONSTANT: <switch default>
    "###);
}

#[test]
fn test_three_level_nesting() {
    let mut tree = Tree::new();
    let cond = tree.make_constant(true);
    let one = tree.make_constant(1);
    let ret = tree.make_node(NodeKind::Return, &[one]).unwrap();
    let then_block = tree.make_node(NodeKind::BlockStmt, &[ret]).unwrap();
    let empty = tree.make_node(NodeKind::Empty, &[]).unwrap();
    let if_stmt = tree
        .make_node(NodeKind::IfStmt, &[cond, then_block, empty])
        .unwrap();

    assert_snapshot!(to_treeviz_str(&tree, if_stmt), @r###"
    └─ IF_STMT
       ├─ CONSTANT: true
       ├─ BLOCK_STMT
       │  └─ RETURN
       │     └─ CONSTANT: 1
       └─ EMPTY
    "###);
}
