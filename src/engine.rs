//! The engine facade.
//!
//! [`Diagram`] owns one [`GraphStore`] and one [`HistoryManager`] and wires
//! the control flow the host UI relies on: every user intent mutates the
//! store, re-derives layout for the affected component subtree, and is
//! observed (and possibly committed) by history. Collaborators that only
//! read — renderers, persistence — go through the store accessor.

use std::time::Instant;

use crate::error::GraphError;
use crate::history::HistoryManager;
use crate::layout;
use crate::models::*;
use crate::serialize::{self, ImportReport};
use crate::store::{GraphStats, GraphStore};

/// A live diagram: graph state plus edit history.
pub struct Diagram {
    store: GraphStore,
    history: HistoryManager,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagram {
    /// An empty diagram.
    pub fn new() -> Self {
        let store = GraphStore::new();
        let history = HistoryManager::new(&store);
        Self { store, history }
    }

    /// The starter diagram new users get: one project wired to an auth
    /// component holding one file with two functions.
    pub fn sample() -> Self {
        let mut store = GraphStore::new();
        let project = store
            .add_node(NodeKind::Project, None, Some(NodeData::with_label("My App")))
            .expect("project is top-level")
            .id
            .clone();
        let component = store
            .add_node(
                NodeKind::Component,
                None,
                Some(NodeData::with_label("Auth Component")),
            )
            .expect("component is top-level")
            .id
            .clone();
        let file = store
            .add_node(
                NodeKind::File,
                Some(&component),
                Some(NodeData {
                    label: "AuthService.ts".to_string(),
                    file_type: Some(FileType::Typescript),
                    ..NodeData::default()
                }),
            )
            .expect("component exists")
            .id
            .clone();
        for (label, description) in [
            (
                "login()",
                "Validates user credentials against API. Returns JWT token on success.",
            ),
            ("logout()", "Clears session and revokes tokens."),
        ] {
            store
                .add_node(
                    NodeKind::Function,
                    Some(&file),
                    Some(NodeData {
                        label: label.to_string(),
                        description: Some(description.to_string()),
                        ..NodeData::default()
                    }),
                )
                .expect("file exists");
        }
        store.add_edge(&project, &component, EdgeKind::Default);
        layout::layout_all(&mut store);

        let history = HistoryManager::new(&store);
        Self { store, history }
    }

    /// Seed from an existing store (the persistence collaborator's load
    /// path). History starts fresh at the loaded state.
    pub fn from_store(mut store: GraphStore) -> Self {
        layout::layout_all(&mut store);
        let history = HistoryManager::new(&store);
        Self { store, history }
    }

    // ============================================================
    // Read model
    // ============================================================

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn nodes(&self) -> &[Node] {
        self.store.nodes()
    }

    pub fn edges(&self) -> &[Edge] {
        self.store.edges()
    }

    pub fn stats(&self) -> GraphStats {
        self.store.stats()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // After every mutation: re-derive the affected subtree's geometry,
    // then let history observe the settled store. A pending snapshot whose
    // settle window already elapsed commits first — it belongs to the
    // previous edit, not this one.
    fn after_mutation(&mut self, touched: Option<&str>) {
        match touched {
            Some(id) => layout::layout_subtree(&mut self.store, id),
            None => layout::layout_all(&mut self.store),
        }
        let now = Instant::now();
        self.history.poll_at(now);
        self.history.observe_at(&self.store, now);
    }

    // ============================================================
    // Intents
    // ============================================================

    /// Create a node. Returns its generated id.
    pub fn create(&mut self, kind: NodeKind, parent_id: Option<&str>) -> Result<String, GraphError> {
        let id = self.store.add_node(kind, parent_id, None)?.id.clone();
        self.after_mutation(Some(&id));
        Ok(id)
    }

    /// Create a node with initial annotations. Returns its generated id.
    pub fn create_with_data(
        &mut self,
        kind: NodeKind,
        parent_id: Option<&str>,
        data: NodeData,
    ) -> Result<String, GraphError> {
        let id = self.store.add_node(kind, parent_id, Some(data))?.id.clone();
        self.after_mutation(Some(&id));
        Ok(id)
    }

    /// Merge a partial annotation update (label edit, detail-panel save,
    /// collapse toggle via patch, ...).
    pub fn set_attribute(&mut self, id: &str, patch: NodePatch) -> bool {
        let changed = self.store.update_node_data(id, patch);
        if changed {
            self.after_mutation(Some(id));
        }
        changed
    }

    /// Drag intent: set a node's position.
    pub fn move_node(&mut self, id: &str, position: Position) -> bool {
        let changed = self.store.move_node(id, position);
        if changed {
            self.after_mutation(Some(id));
        }
        changed
    }

    /// Resize intent: set a component's width; the grid re-packs.
    pub fn resize(&mut self, id: &str, width: f64) -> bool {
        let changed = self.store.resize_component(id, width);
        if changed {
            self.after_mutation(Some(id));
        }
        changed
    }

    /// Connect gesture between two nodes. Returns the new edge id.
    pub fn connect(&mut self, source: &str, target: &str, kind: EdgeKind) -> Option<String> {
        let id = self.store.add_edge(source, target, kind)?.id.clone();
        self.after_mutation(None);
        Some(id)
    }

    pub fn disconnect(&mut self, edge_id: &str) -> bool {
        let changed = self.store.remove_edge(edge_id);
        if changed {
            self.after_mutation(None);
        }
        changed
    }

    /// Delete nodes plus their descendants and touching edges. Returns the
    /// removed node ids.
    pub fn delete(&mut self, ids: &[String]) -> Vec<String> {
        let removed = self.store.delete_nodes(ids);
        if !removed.is_empty() {
            self.after_mutation(None);
        }
        removed
    }

    /// Deep-clone a subtree. Returns the new root id.
    pub fn duplicate(&mut self, id: &str) -> Option<String> {
        let new_id = self.store.duplicate_subtree(id)?;
        self.after_mutation(Some(&new_id));
        Some(new_id)
    }

    /// Collapse or expand one file.
    pub fn set_collapsed(&mut self, id: &str, collapsed: bool) -> bool {
        let changed = self.store.set_collapsed(id, collapsed);
        if changed {
            self.after_mutation(Some(id));
        }
        changed
    }

    /// Collapse or expand every file in the diagram.
    pub fn collapse_all(&mut self, collapsed: bool) {
        let ids: Vec<String> = self
            .store
            .nodes()
            .iter()
            .filter(|n| n.kind == NodeKind::File)
            .map(|n| n.id.clone())
            .collect();
        self.store.set_collapsed_bulk(&ids, collapsed);
        self.after_mutation(None);
    }

    /// Bulk complexity assignment over a selection of functions.
    pub fn set_complexity(&mut self, ids: &[String], complexity: Complexity) {
        self.store.set_complexity_bulk(ids, complexity);
        self.after_mutation(None);
    }

    /// Selection is transient: it never re-derives layout and history
    /// ignores it by construction.
    pub fn select(&mut self, id: &str, selected: bool) -> bool {
        self.store.set_selected(id, selected)
    }

    pub fn clear_selection(&mut self) {
        self.store.clear_selection();
    }

    // ============================================================
    // History
    // ============================================================

    /// Step back one committed snapshot. The facade is synchronous, so the
    /// restore has fully propagated by the time this returns and the
    /// observation guard is released immediately.
    pub fn undo(&mut self) -> bool {
        let applied = self.history.undo(&mut self.store);
        self.history.restore_complete();
        applied
    }

    /// Step forward one committed snapshot.
    pub fn redo(&mut self) -> bool {
        let applied = self.history.redo(&mut self.store);
        self.history.restore_complete();
        applied
    }

    /// Pump the settle timer from the host loop.
    pub fn poll_history(&mut self) -> bool {
        self.history.poll()
    }

    /// Commit any pending edit immediately (before export, save, or in
    /// tests standing in for the settle window elapsing).
    pub fn flush_history(&mut self) -> bool {
        self.history.flush()
    }

    // ============================================================
    // Import / export
    // ============================================================

    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&serialize::export(&self.store))
    }

    /// Destructive import. On success the replacement is observed as one
    /// (undoable) edit; on failure the graph and history are untouched.
    pub fn import_json(&mut self, json: &str) -> Result<ImportReport, GraphError> {
        let report = serialize::import(&mut self.store, json)?;
        let now = Instant::now();
        self.history.poll_at(now);
        self.history.observe_at(&self.store, now);
        Ok(report)
    }
}
