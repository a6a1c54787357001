//! The authoritative node/edge collection.
//!
//! All structural mutation funnels through [`GraphStore`]. Nodes live in
//! one flat `Vec` in creation order — `parent_id` is a lookup relation
//! into that collection, never an owning link, and the packing order the
//! layout engine depends on is exactly this insertion order. The store is
//! deliberately not thread-safe: it belongs to the single control thread
//! of the host UI loop.
//!
//! The store never triggers layout itself; callers (usually the
//! [`crate::engine::Diagram`] facade) run the layout pass after structural
//! changes.

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use crate::error::GraphError;
use crate::layout;
use crate::models::*;
use crate::sanitize;

/// Node and edge counts, for the stats readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub projects: usize,
    pub components: usize,
    pub files: usize,
    pub functions: usize,
    pub edges: usize,
}

/// The single source of truth for the diagram's nodes and edges.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

fn generate_id(prefix: &str) -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &uuid[..8])
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ============================================================
    // Read model
    // ============================================================

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Direct children of a node, in creation order.
    pub fn children(&self, parent_id: &str) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|n| n.parent_id.as_deref() == Some(parent_id))
            .collect()
    }

    /// Direct children of a node filtered to one kind, in creation order.
    pub fn children_of_kind(&self, parent_id: &str, kind: NodeKind) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|n| n.kind == kind && n.parent_id.as_deref() == Some(parent_id))
            .collect()
    }

    /// Every node reachable from `root_id` via child chains, breadth-first,
    /// not including the root itself.
    pub fn descendants(&self, root_id: &str) -> Vec<&Node> {
        let ids = self.descendant_ids(&[root_id.to_string()]);
        self.nodes.iter().filter(|n| ids.contains(&n.id)).collect()
    }

    /// The chain of containers from the root down to `id`, inclusive.
    /// Breadcrumb order: outermost ancestor first.
    pub fn ancestor_chain(&self, id: &str) -> Vec<&Node> {
        let mut chain = Vec::new();
        let mut current = self.node(id);
        while let Some(node) = current {
            chain.push(node);
            current = node.parent_id.as_deref().and_then(|pid| self.node(pid));
        }
        chain.reverse();
        chain
    }

    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            projects: self.count_kind(NodeKind::Project),
            components: self.count_kind(NodeKind::Component),
            files: self.count_kind(NodeKind::File),
            functions: self.count_kind(NodeKind::Function),
            edges: self.edges.len(),
        }
    }

    // ============================================================
    // Node operations
    // ============================================================

    /// Create a node of `kind` under `parent_id`, with default geometry and
    /// (optionally) caller-provided initial annotations.
    ///
    /// The only failure is a containment violation: a parent of the wrong
    /// kind, a missing required parent, or a dangling parent id.
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        parent_id: Option<&str>,
        data: Option<NodeData>,
    ) -> Result<&Node, GraphError> {
        self.check_containment(kind, parent_id)?;

        let id = generate_id(kind.as_str());
        let mut data = data.unwrap_or_else(|| self.default_data(kind));
        sanitize::sanitize_node_data(&mut data);
        if data.label.is_empty() {
            data.label = self.default_data(kind).label;
        }

        let node = Node {
            id,
            kind,
            parent_id: parent_id.map(str::to_string),
            position: self.default_position(kind, parent_id),
            style: default_style(kind),
            data,
            selected: false,
        };
        tracing::debug!(id = %node.id, kind = %kind, "add node");
        self.nodes.push(node);
        Ok(self.nodes.last().expect("just pushed"))
    }

    fn check_containment(&self, kind: NodeKind, parent_id: Option<&str>) -> Result<(), GraphError> {
        match parent_id {
            None => {
                if kind.parent_required() {
                    let container = kind.container().expect("required implies container");
                    return Err(GraphError::InvalidContainment(format!(
                        "{kind} nodes require a {container} parent"
                    )));
                }
            }
            Some(pid) => {
                let Some(container) = kind.container() else {
                    return Err(GraphError::InvalidContainment(format!(
                        "{kind} nodes cannot have a parent"
                    )));
                };
                let Some(parent) = self.node(pid) else {
                    return Err(GraphError::InvalidContainment(format!(
                        "parent {pid} does not exist"
                    )));
                };
                if parent.kind != container {
                    return Err(GraphError::InvalidContainment(format!(
                        "{kind} nodes cannot be placed under a {}",
                        parent.kind
                    )));
                }
            }
        }
        Ok(())
    }

    // New top-level nodes are staggered by the existing count of their kind
    // so consecutive creations don't land on top of each other. Nested
    // nodes start at their formula slot; the layout pass owns them anyway.
    fn default_position(&self, kind: NodeKind, parent_id: Option<&str>) -> Position {
        let siblings = match parent_id {
            Some(pid) => self.children_of_kind(pid, kind).len(),
            None => self.count_kind(kind),
        };
        let n = siblings as f64;
        match kind {
            NodeKind::Project => Position::new(100.0 + n * 60.0, 100.0 + n * 40.0),
            NodeKind::Component => Position::new(300.0 + n * 60.0, 100.0 + n * 40.0),
            NodeKind::File => Position::new(
                layout::COMP_PAD_H,
                layout::COMP_HEADER_H + layout::FILE_GAP_V + n * (layout::FILE_MIN_EXP + layout::FILE_GAP_V),
            ),
            NodeKind::Function => Position::new(layout::FN_X, layout::function_y(siblings)),
        }
    }

    fn default_data(&self, kind: NodeKind) -> NodeData {
        match kind {
            NodeKind::Project => {
                NodeData::with_label(format!("Project {}", self.count_kind(kind) + 1))
            }
            NodeKind::Component => {
                NodeData::with_label(format!("Component {}", self.count_kind(kind) + 1))
            }
            NodeKind::File => NodeData {
                label: "NewFile.ts".to_string(),
                file_type: Some(FileType::Typescript),
                ..NodeData::default()
            },
            NodeKind::Function => NodeData {
                label: "newFunction()".to_string(),
                description: Some("Add your logic here...".to_string()),
                ..NodeData::default()
            },
        }
    }

    /// Merge a partial annotation update into a node. Text fields pass
    /// through the sanitizer; enum fields are already in-domain by type.
    /// Returns false if the node does not exist.
    pub fn update_node_data(&mut self, id: &str, patch: NodePatch) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let data = &mut node.data;
        if let Some(label) = patch.label {
            data.label = sanitize::sanitize_label(&label);
        }
        if let Some(description) = patch.description {
            data.description = Some(sanitize::sanitize_description(&description));
        }
        if let Some(returns) = patch.returns {
            data.returns = Some(sanitize::sanitize_label(&returns));
        }
        if let Some(tags) = patch.tags {
            data.tags = sanitize::sanitize_tags(&tags);
        }
        if let Some(exports) = patch.exports {
            data.exports = sanitize::sanitize_tags(&exports);
        }
        if let Some(params) = patch.params {
            data.params = sanitize::sanitize_tags(&params);
        }
        if let Some(tech_stack) = patch.tech_stack {
            data.tech_stack = sanitize::sanitize_tags(&tech_stack);
        }
        if let Some(complexity) = patch.complexity {
            data.complexity = Some(complexity);
        }
        if let Some(file_type) = patch.file_type {
            data.file_type = Some(file_type);
        }
        if let Some(status) = patch.status {
            data.status = Some(status);
        }
        if let Some(stage) = patch.stage {
            data.stage = Some(stage);
        }
        if let Some(collapsed) = patch.collapsed {
            data.collapsed = collapsed;
        }
        true
    }

    /// Set a node's local position. The model accepts any value — keeping
    /// nodes visually inside their parent is the renderer's concern.
    pub fn move_node(&mut self, id: &str, position: Position) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Set a component's user-chosen width, clamped to the allowed range.
    /// Height is derived; the caller re-runs layout for the subtree.
    pub fn resize_component(&mut self, id: &str, width: f64) -> bool {
        let clamped = width.clamp(layout::COMP_MIN_W, layout::COMP_MAX_W);
        if clamped != width {
            tracing::debug!(id, width, clamped, "component width clamped");
        }
        match self.node_mut(id) {
            Some(node) if node.kind == NodeKind::Component => {
                node.set_width(clamped);
                true
            }
            _ => false,
        }
    }

    /// Toggle a file's collapse flag. Functions stay in the model; the
    /// layout pass clusters or restores their positions.
    pub fn set_collapsed(&mut self, id: &str, collapsed: bool) -> bool {
        match self.node_mut(id) {
            Some(node) if node.kind == NodeKind::File => {
                node.data.collapsed = collapsed;
                true
            }
            _ => false,
        }
    }

    /// Bulk collapse/expand over a selection; files only, others ignored.
    pub fn set_collapsed_bulk(&mut self, ids: &[String], collapsed: bool) {
        for node in &mut self.nodes {
            if node.kind == NodeKind::File && ids.contains(&node.id) {
                node.data.collapsed = collapsed;
            }
        }
    }

    /// Bulk complexity assignment over a selection; functions only.
    pub fn set_complexity_bulk(&mut self, ids: &[String], complexity: Complexity) {
        for node in &mut self.nodes {
            if node.kind == NodeKind::Function && ids.contains(&node.id) {
                node.data.complexity = Some(complexity);
            }
        }
    }

    pub fn set_selected(&mut self, id: &str, selected: bool) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.selected = selected;
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        for node in &mut self.nodes {
            node.selected = false;
        }
    }

    /// Selected node ids, in creation order.
    pub fn selected_ids(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|n| n.selected)
            .map(|n| n.id.clone())
            .collect()
    }

    /// Delete the given nodes, every descendant reachable through
    /// `parent_id` chains, and every edge touching the removed set.
    /// Returns the full set of removed node ids.
    pub fn delete_nodes(&mut self, ids: &[String]) -> Vec<String> {
        let mut doomed = self.descendant_ids(ids);
        for id in ids {
            if self.node(id).is_some() {
                doomed.insert(id.clone());
            }
        }
        if doomed.is_empty() {
            return Vec::new();
        }

        self.nodes.retain(|n| !doomed.contains(&n.id));
        self.edges
            .retain(|e| !doomed.contains(&e.source) && !doomed.contains(&e.target));

        tracing::debug!(count = doomed.len(), "deleted nodes");
        let mut removed: Vec<String> = doomed.into_iter().collect();
        removed.sort();
        removed
    }

    // Breadth-first closure over parent_id matches. The roots themselves
    // are not included.
    fn descendant_ids(&self, roots: &[String]) -> HashSet<String> {
        let mut result = HashSet::new();
        let mut queue: Vec<String> = roots.to_vec();
        while let Some(id) = queue.pop() {
            for node in &self.nodes {
                if node.parent_id.as_deref() == Some(id.as_str()) && result.insert(node.id.clone())
                {
                    queue.push(node.id.clone());
                }
            }
        }
        result
    }

    /// Deep-clone a node and its whole descendant chain: fresh ids,
    /// remapped parents, offset root position, a " (copy)" label suffix on
    /// the root. Everything else carries over. Returns the new root id.
    pub fn duplicate_subtree(&mut self, root_id: &str) -> Option<String> {
        let root = self.node(root_id)?.clone();

        let new_root_id = generate_id(root.kind.as_str());
        let mut clone = root.clone();
        clone.id = new_root_id.clone();
        clone.position = Position::new(root.position.x + 40.0, root.position.y + 40.0);
        clone.data.label = format!("{} (copy)", root.data.label);
        clone.selected = false;
        self.nodes.push(clone);

        self.clone_children(root_id, &new_root_id);
        tracing::debug!(from = root_id, to = %new_root_id, "duplicated subtree");
        Some(new_root_id)
    }

    fn clone_children(&mut self, parent_id: &str, new_parent_id: &str) {
        let children: Vec<Node> = self
            .children(parent_id)
            .into_iter()
            .cloned()
            .collect();
        for child in children {
            let new_child_id = generate_id(child.kind.as_str());
            let mut clone = child.clone();
            clone.id = new_child_id.clone();
            clone.parent_id = Some(new_parent_id.to_string());
            clone.selected = false;
            self.nodes.push(clone);
            self.clone_children(&child.id, &new_child_id);
        }
    }

    // ============================================================
    // Edge operations
    // ============================================================

    /// Connect two nodes with a typed edge. The kind's defaults fill the
    /// label, color, and animation. Returns `None` (and changes nothing)
    /// if either endpoint is missing.
    pub fn add_edge(&mut self, source: &str, target: &str, kind: EdgeKind) -> Option<&Edge> {
        if self.node(source).is_none() || self.node(target).is_none() {
            tracing::warn!(source, target, "connect rejected: unknown endpoint");
            return None;
        }
        let config = kind.config();
        let edge = Edge {
            id: generate_id("edge"),
            source: source.to_string(),
            target: target.to_string(),
            kind,
            animated: config.animated,
            data: Some(EdgeData {
                label: Some(config.label.to_string()),
                color: Some(config.color.to_string()),
            }),
            style: Some(EdgeStyle {
                stroke: Some(config.color.to_string()),
                stroke_width: Some(1.5),
            }),
        };
        self.edges.push(edge);
        self.edges.last()
    }

    pub fn remove_edge(&mut self, id: &str) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| e.id != id);
        self.edges.len() != before
    }

    // ============================================================
    // Wholesale replacement
    // ============================================================

    /// Replace the entire contents. Used by history restore, import, and
    /// the persistence collaborator's load path.
    pub fn replace(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
        self.nodes = nodes;
        self.edges = edges;
    }
}

fn default_style(kind: NodeKind) -> Option<NodeStyle> {
    match kind {
        NodeKind::Component => Some(NodeStyle {
            width: Some(layout::COMP_DEFAULT_W),
            height: Some(layout::COMP_MIN_H),
        }),
        NodeKind::File => Some(NodeStyle {
            width: Some(layout::FILE_W),
            height: None,
        }),
        NodeKind::Project | NodeKind::Function => None,
    }
}
