//! Automatic layout.
//!
//! Containers are always sized to their visible contents: file heights
//! follow their function count and collapse state, component heights follow
//! the packed grid of their files. Geometry is derived, never authoritative
//! user state — every pass recomputes from the containment structure, so
//! running layout twice on unchanged input produces identical output.
//!
//! Files inside a component are **column-packed**: the component's width
//! fixes a column count, and each file (in creation order) lands in the
//! currently-shortest column, lowest column index winning ties.

use crate::models::{NodeKind, Position};
use crate::store::GraphStore;

pub const FILE_W: f64 = 280.0;
pub const FILE_GAP_H: f64 = 16.0;
pub const FILE_GAP_V: f64 = 12.0;
pub const FILE_COLLAPSED_H: f64 = 52.0;
pub const FILE_MIN_EXP: f64 = 130.0;
pub const FILE_PAD_B: f64 = 14.0;

pub const FN_SLOT: f64 = 52.0;
pub const FN_START_Y: f64 = 62.0;
pub const FN_X: f64 = 20.0;

pub const COMP_HEADER_H: f64 = 58.0;
pub const COMP_PAD_H: f64 = 24.0;
pub const COMP_PAD_V: f64 = 20.0;
pub const COMP_MIN_H: f64 = 200.0;
pub const COMP_MIN_W: f64 = FILE_W + COMP_PAD_H * 2.0;
pub const COMP_MAX_W: f64 = COMP_PAD_H * 2.0 + FILE_W * 4.0 + FILE_GAP_H * 3.0;
pub const COMP_DEFAULT_W: f64 = 350.0;

/// Height of a file node given its function count and collapse state.
pub fn file_height(function_count: usize, collapsed: bool) -> f64 {
    if collapsed {
        FILE_COLLAPSED_H
    } else {
        (FN_START_Y + function_count as f64 * FN_SLOT + FILE_PAD_B).max(FILE_MIN_EXP)
    }
}

/// Y of the function at `index` inside an expanded file.
pub fn function_y(index: usize) -> f64 {
    FN_START_Y + index as f64 * FN_SLOT
}

/// Number of file columns that fit in a component of the given width.
pub fn num_cols(comp_width: f64) -> usize {
    (((comp_width - COMP_PAD_H * 2.0 + FILE_GAP_H) / (FILE_W + FILE_GAP_H)).floor() as usize)
        .max(1)
}

/// One file's annotations as packing input.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    pub id: String,
    pub function_count: usize,
    pub collapsed: bool,
}

/// A file's packed slot inside its component.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSlot {
    pub id: String,
    pub position: Position,
    pub height: f64,
}

/// The computed grid for one component: per-file slots plus the container
/// height that fits them.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentPlan {
    pub slots: Vec<FileSlot>,
    pub height: f64,
}

/// Pack files into columns for a component of the given width.
///
/// Pure: the same entries in the same order with the same width always
/// produce the same plan. A width change re-packs from scratch — packing is
/// O(files), so there is nothing worth patching incrementally.
pub fn pack_files(files: &[FileEntry], comp_width: f64) -> ComponentPlan {
    let cols = num_cols(comp_width);
    let mut cursors = vec![COMP_HEADER_H + FILE_GAP_V; cols];

    let slots = files
        .iter()
        .map(|file| {
            let col = shortest_column(&cursors);
            let x = COMP_PAD_H + col as f64 * (FILE_W + FILE_GAP_H);
            let y = cursors[col];
            let height = file_height(file.function_count, file.collapsed);
            cursors[col] += height + FILE_GAP_V;
            FileSlot {
                id: file.id.clone(),
                position: Position::new(x, y),
                height,
            }
        })
        .collect();

    let tallest = cursors.iter().copied().fold(f64::MIN, f64::max);
    ComponentPlan {
        slots,
        height: (tallest + COMP_PAD_V).max(COMP_MIN_H),
    }
}

// Ties break toward the lowest index: the first strictly-smaller cursor
// wins, so equal columns fill left to right.
fn shortest_column(cursors: &[f64]) -> usize {
    let mut best = 0;
    for (i, &y) in cursors.iter().enumerate().skip(1) {
        if y < cursors[best] {
            best = i;
        }
    }
    best
}

/// Re-derive the geometry of one component and everything inside it:
/// pack its files, stack each file's functions, and grow the component to
/// fit. No-op if `comp_id` is not a component.
pub fn layout_component(store: &mut GraphStore, comp_id: &str) {
    let Some(comp) = store.node(comp_id) else {
        return;
    };
    if comp.kind != NodeKind::Component {
        return;
    }
    let width = comp
        .width()
        .unwrap_or(COMP_DEFAULT_W)
        .clamp(COMP_MIN_W, COMP_MAX_W);

    let entries: Vec<FileEntry> = store
        .children_of_kind(comp_id, NodeKind::File)
        .iter()
        .map(|f| FileEntry {
            id: f.id.clone(),
            function_count: store.children_of_kind(&f.id, NodeKind::Function).len(),
            collapsed: f.data.collapsed,
        })
        .collect();

    let plan = pack_files(&entries, width);

    for slot in &plan.slots {
        if let Some(file) = store.node_mut(&slot.id) {
            file.position = slot.position;
            file.set_width(FILE_W);
            file.set_height(slot.height);
        }
        layout_functions(store, &slot.id);
    }

    if let Some(comp) = store.node_mut(comp_id) {
        comp.set_width(width);
        comp.set_height(plan.height);
    }
}

/// Stack a file's functions. Expanded files place functions at their slot
/// formula positions; collapsed files cluster them at the header offset
/// (the slot-0 position) so expanding restores the stack exactly.
fn layout_functions(store: &mut GraphStore, file_id: &str) {
    let collapsed = store.node(file_id).map(|f| f.data.collapsed).unwrap_or(false);
    let function_ids: Vec<String> = store
        .children_of_kind(file_id, NodeKind::Function)
        .iter()
        .map(|f| f.id.clone())
        .collect();

    for (index, id) in function_ids.iter().enumerate() {
        if let Some(func) = store.node_mut(id) {
            let slot = if collapsed { 0 } else { index };
            func.position = Position::new(FN_X, function_y(slot));
        }
    }
}

/// Re-derive geometry for the component subtree containing `id`.
///
/// Any change below a component (file added, function added, collapse
/// toggled) can shift the packing of every sibling, so the unit of
/// recomputation is the owning component.
pub fn layout_subtree(store: &mut GraphStore, id: &str) {
    let Some(node) = store.node(id) else {
        return;
    };
    match node.kind {
        NodeKind::Component => layout_component(store, id),
        NodeKind::File | NodeKind::Function => {
            let comp = store
                .ancestor_chain(id)
                .iter()
                .find(|n| n.kind == NodeKind::Component)
                .map(|n| n.id.clone());
            if let Some(comp_id) = comp {
                layout_component(store, &comp_id);
            }
        }
        // Projects have fixed geometry; components under them are
        // positioned freely by the user.
        NodeKind::Project => {}
    }
}

/// Full pass: re-derive geometry for every component in the store.
pub fn layout_all(store: &mut GraphStore) {
    let comp_ids: Vec<String> = store
        .nodes()
        .iter()
        .filter(|n| n.kind == NodeKind::Component)
        .map(|n| n.id.clone())
        .collect();
    for id in comp_ids {
        layout_component(store, &id);
    }
}
