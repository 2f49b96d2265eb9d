//! Treeviz formatter for IR nodes
//!
//! One line per node, structure encoded with box-drawing connectors, so a
//! translator author can scan a freshly built subtree at a glance:
//!
//!   └─ BINARY_EXPR
//!      ├─ CONSTANT: 1
//!      └─ CONSTANT: 2
//!
//! Constant payloads are shown after the kind, truncated so long string
//! literals don't wreck the layout.

use crate::ir::node::NodeId;
use crate::ir::tree::Tree;

const MAX_LABEL_CHARS: usize = 30;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

/// Render the subtree rooted at `root` to a human-readable string
///
/// Rendering itself never fails; a stale id is shown as an unbound marker
/// so diagnostics stay printable even for broken trees.
pub fn to_treeviz_str(tree: &Tree, root: NodeId) -> String {
    let mut result = String::new();
    append_node(&mut result, tree, root, "", true);
    result
}

fn node_label(tree: &Tree, node: NodeId) -> String {
    match tree.kind(node) {
        Ok(kind) => match tree.value(node) {
            Some(value) => format!("{}: {}", kind, truncate(&value.to_string(), MAX_LABEL_CHARS)),
            None => kind.to_string(),
        },
        Err(_) => format!("<unbound {}>", node),
    }
}

fn append_node(result: &mut String, tree: &Tree, node: NodeId, prefix: &str, is_last: bool) {
    let connector = if is_last { "└─" } else { "├─" };
    result.push_str(&format!("{}{} {}\n", prefix, connector, node_label(tree, node)));

    let children = match tree.children(node) {
        Ok(children) => children,
        Err(_) => return,
    };
    let new_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
    for (i, child) in children.iter().enumerate() {
        let child_is_last = i == children.len() - 1;
        append_node(result, tree, *child, &new_prefix, child_is_last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::node::NodeKind;

    #[test]
    fn test_nested_render() {
        let mut tree = Tree::new();
        let one = tree.make_constant(1);
        let two = tree.make_constant(2);
        let add = tree.make_node(NodeKind::BinaryExpr, &[one, two]).unwrap();
        let ret = tree.make_node(NodeKind::Return, &[add]).unwrap();

        let rendered = to_treeviz_str(&tree, ret);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "└─ RETURN");
        assert_eq!(lines[1], "   └─ BINARY_EXPR");
        assert_eq!(lines[2], "      ├─ CONSTANT: 1");
        assert_eq!(lines[3], "      └─ CONSTANT: 2");
    }

    #[test]
    fn test_long_string_payload_is_truncated() {
        let mut tree = Tree::new();
        let long = "x".repeat(80);
        let node = tree.make_constant(long.as_str());
        let rendered = to_treeviz_str(&tree, node);
        assert!(rendered.ends_with("...\n"));
        assert!(rendered.len() < long.len());
    }

    #[test]
    fn test_stale_id_renders_a_marker() {
        let mut other = Tree::new();
        let foreign = other.make_constant(0);
        let tree = Tree::new();
        let rendered = to_treeviz_str(&tree, foreign);
        assert!(rendered.contains("<unbound"));
    }
}
