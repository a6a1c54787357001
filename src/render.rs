//! ASCII tree rendering for the containment hierarchy.

use crate::models::{Node, NodeKind};
use crate::store::GraphStore;

const PROJECT: char = '◆';
const COMPONENT: char = '▣';
const FILE: char = '▤';
const FILE_COLLAPSED: char = '▸';
const FUNCTION: char = '·';

/// Get the glyph for a node, collapse-aware for files.
fn node_symbol(node: &Node) -> char {
    match node.kind {
        NodeKind::Project => PROJECT,
        NodeKind::Component => COMPONENT,
        NodeKind::File if node.data.collapsed => FILE_COLLAPSED,
        NodeKind::File => FILE,
        NodeKind::Function => FUNCTION,
    }
}

/// Render the containment hierarchy as ASCII art.
///
/// Example output:
/// ```text
/// ◆ My App
/// ▣ Auth Component
/// ├── ▤ AuthService.ts
/// │   ├── · login()
/// │   └── · logout()
/// └── ▸ Session.ts
/// ```
pub fn render_tree(store: &GraphStore) -> String {
    let mut output = String::new();
    let roots: Vec<&Node> = store
        .nodes()
        .iter()
        .filter(|n| n.parent_id.is_none())
        .collect();
    for root in roots {
        render_node(&mut output, store, root, "", true, true);
    }
    output
}

/// Recursively render a node and its children.
fn render_node(
    output: &mut String,
    store: &GraphStore,
    node: &Node,
    prefix: &str,
    is_last: bool,
    is_root: bool,
) {
    if is_root {
        // Root nodes: glyph + label, no branch characters.
        output.push(node_symbol(node));
        output.push(' ');
        output.push_str(&node.data.label);
        output.push('\n');
    } else {
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(branch);
        output.push(node_symbol(node));
        output.push(' ');
        output.push_str(&node.data.label);
        output.push('\n');
    }

    let child_prefix = if is_root {
        String::new()
    } else {
        let continuation = if is_last { "    " } else { "│   " };
        format!("{}{}", prefix, continuation)
    };

    let children = store.children(&node.id);
    let count = children.len();
    for (i, child) in children.into_iter().enumerate() {
        render_node(output, store, child, &child_prefix, i == count - 1, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NodeData, NodeKind};

    fn sample_store() -> GraphStore {
        let mut store = GraphStore::new();
        store
            .add_node(NodeKind::Project, None, Some(NodeData::with_label("My App")))
            .unwrap();
        let comp = store
            .add_node(NodeKind::Component, None, Some(NodeData::with_label("Auth")))
            .unwrap()
            .id
            .clone();
        let file = store
            .add_node(NodeKind::File, Some(&comp), Some(NodeData::with_label("auth.ts")))
            .unwrap()
            .id
            .clone();
        store
            .add_node(NodeKind::Function, Some(&file), Some(NodeData::with_label("login()")))
            .unwrap();
        store
            .add_node(NodeKind::Function, Some(&file), Some(NodeData::with_label("logout()")))
            .unwrap();
        store
    }

    #[test]
    fn renders_roots_without_branches() {
        let tree = render_tree(&sample_store());
        assert!(tree.starts_with("◆ My App\n"));
        assert!(tree.contains("▣ Auth\n"));
    }

    #[test]
    fn renders_children_with_branch_glyphs() {
        let tree = render_tree(&sample_store());
        assert!(tree.contains("└── ▤ auth.ts"));
        assert!(tree.contains("├── · login()"));
        assert!(tree.contains("└── · logout()"));
    }

    #[test]
    fn collapsed_files_get_their_own_glyph() {
        let mut store = sample_store();
        let file_id = store
            .nodes()
            .iter()
            .find(|n| n.kind == NodeKind::File)
            .unwrap()
            .id
            .clone();
        store.set_collapsed(&file_id, true);
        let tree = render_tree(&store);
        assert!(tree.contains("└── ▸ auth.ts"));
    }
}
