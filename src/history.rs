//! Debounced, branchable undo/redo.
//!
//! A command journal with a rolling window: an append-only list of full
//! selection-stripped snapshots plus a cursor. Bursts of rapid edits (a
//! drag firing every frame, a label typed keystroke by keystroke) coalesce
//! into one snapshot through a settle window; editing after an undo
//! truncates the stale redo branch.
//!
//! The engine has no event loop, so the settle timer is data rather than a
//! callback: [`HistoryManager::observe_at`] stamps a deadline on the
//! pending snapshot and the host pumps [`HistoryManager::poll_at`] from its
//! own loop. Every deadline comparison takes an explicit [`Instant`], which
//! keeps tests deterministic; the `observe`/`poll` wrappers use the real
//! clock.

use std::time::{Duration, Instant};

use crate::models::{Edge, Node};
use crate::store::GraphStore;

/// Oldest snapshots are evicted beyond this many entries.
pub const MAX_HISTORY: usize = 60;

/// Quiet period after the last edit before a snapshot commits. Short
/// enough to feel responsive, long enough to swallow a drag.
pub const SETTLE: Duration = Duration::from_millis(350);

/// A full copy of the graph at one point in the edit history, with the
/// transient `selected` flags stripped so selection changes never register
/// as edits.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Snapshot {
    fn capture(store: &GraphStore) -> Self {
        let nodes = store
            .nodes()
            .iter()
            .map(|n| {
                let mut n = n.clone();
                n.selected = false;
                n
            })
            .collect();
        Self {
            nodes,
            edges: store.edges().to_vec(),
        }
    }

    fn restore(&self, store: &mut GraphStore) {
        store.replace(self.nodes.clone(), self.edges.clone());
    }
}

struct Pending {
    snapshot: Snapshot,
    deadline: Instant,
}

/// Undo/redo over a [`GraphStore`].
pub struct HistoryManager {
    snapshots: Vec<Snapshot>,
    cursor: usize,
    pending: Option<Pending>,
    /// Re-entrancy guard: set while a restore is being applied so the
    /// restore itself is never observed as a new edit.
    applying: bool,
    settle: Duration,
}

impl HistoryManager {
    /// Seed the journal with the store's current state as snapshot zero.
    pub fn new(store: &GraphStore) -> Self {
        Self::with_settle(store, SETTLE)
    }

    /// Same, with a custom settle window.
    pub fn with_settle(store: &GraphStore, settle: Duration) -> Self {
        Self {
            snapshots: vec![Snapshot::capture(store)],
            cursor: 0,
            pending: None,
            applying: false,
            settle,
        }
    }

    /// Notice a (possible) state change now.
    pub fn observe(&mut self, store: &GraphStore) {
        self.observe_at(store, Instant::now());
    }

    /// Notice a (possible) state change at `now`.
    ///
    /// If the store differs from the snapshot under the cursor, the new
    /// state becomes the pending snapshot with a fresh settle deadline —
    /// re-observing within the window reschedules, which is what coalesces
    /// a burst into one undo step. If the store has come back to the
    /// cursor state, any pending commit is dropped: there is no edit left
    /// to record.
    pub fn observe_at(&mut self, store: &GraphStore, now: Instant) {
        if self.applying {
            return;
        }
        let snapshot = Snapshot::capture(store);
        if snapshot == self.snapshots[self.cursor] {
            self.pending = None;
            return;
        }
        self.pending = Some(Pending {
            snapshot,
            deadline: now + self.settle,
        });
    }

    /// Commit the pending snapshot if its settle deadline has passed.
    /// Returns whether a commit happened.
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    /// Commit the pending snapshot if `now` is at or past its deadline.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        if self.applying {
            return false;
        }
        let due = self.pending.as_ref().is_some_and(|p| now >= p.deadline);
        if !due {
            return false;
        }
        let pending = self.pending.take().expect("checked above");
        self.commit(pending.snapshot);
        true
    }

    /// Commit the pending snapshot immediately, settle window or not.
    /// Hosts call this before an export or an explicit save.
    pub fn flush(&mut self) -> bool {
        if self.applying {
            return false;
        }
        match self.pending.take() {
            Some(pending) => {
                self.commit(pending.snapshot);
                true
            }
            None => false,
        }
    }

    // Truncate any redo branch beyond the cursor, append, advance, evict
    // from the front once over capacity.
    fn commit(&mut self, snapshot: Snapshot) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        if self.snapshots.len() > MAX_HISTORY {
            let excess = self.snapshots.len() - MAX_HISTORY;
            self.snapshots.drain(..excess);
        }
        self.cursor = self.snapshots.len() - 1;
        tracing::debug!(len = self.snapshots.len(), cursor = self.cursor, "history commit");
    }

    /// Step back one snapshot, replacing the store's contents wholesale.
    /// A bounded no-op at the earliest snapshot. Any uncommitted pending
    /// edit is discarded.
    ///
    /// Sets the re-entrancy guard; the host clears it with
    /// [`Self::restore_complete`] once downstream consumers have seen the
    /// replacement.
    pub fn undo(&mut self, store: &mut GraphStore) -> bool {
        self.pending = None;
        if self.cursor == 0 {
            return false;
        }
        self.applying = true;
        self.cursor -= 1;
        self.snapshots[self.cursor].restore(store);
        true
    }

    /// Step forward one snapshot. A bounded no-op at the latest snapshot.
    pub fn redo(&mut self, store: &mut GraphStore) -> bool {
        self.pending = None;
        if self.cursor + 1 >= self.snapshots.len() {
            return false;
        }
        self.applying = true;
        self.cursor += 1;
        self.snapshots[self.cursor].restore(store);
        true
    }

    /// Clear the re-entrancy guard after a restore has propagated.
    pub fn restore_complete(&mut self) {
        self.applying = false;
    }

    pub fn is_applying(&self) -> bool {
        self.applying
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Number of committed snapshots (including the seed).
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
