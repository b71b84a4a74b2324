// Undo/Redo history over state snapshots
//
// Provides:
// - Undo and redo stacks of labelled snapshots
// - Depth-limited history (oldest entries dropped first)
// - A grid wrapper that records only when an operation commits
//
// The grid wrapper suits hosts whose undo state is the grid alone. Hosts
// that bundle more state use `record`/`undo`/`redo` directly and restore
// the grid through `GridState::with_id_floor`.

use crate::engine::CollageGrid;
use crate::error::LayoutError;
use crate::state::GridState;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default number of undo steps kept.
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// A labelled snapshot taken before an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct HistoryEntry<S> {
    label: String,
    state: S,
}

/// Snapshot-based undo/redo history.
///
/// `S` is whatever the caller needs to restore; grids use [`GridState`],
/// a host may bundle the grid with its own data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History<S = GridState> {
    max_depth: usize,
    undo_stack: Vec<HistoryEntry<S>>,
    redo_stack: Vec<HistoryEntry<S>>,
}

impl<S> Default for History<S> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl<S> History<S> {
    /// Create a history keeping at most `max_depth` undo steps.
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.max(1),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Push a snapshot taken before a committed change.
    pub fn record(&mut self, label: impl Into<String>, before: S) {
        // New changes invalidate the redo branch
        self.redo_stack.clear();
        self.undo_stack.push(HistoryEntry {
            label: label.into(),
            state: before,
        });
        if self.undo_stack.len() > self.max_depth {
            let dropped = self.undo_stack.len() - self.max_depth;
            self.undo_stack.drain(..dropped);
            debug!(dropped, "History limit reached");
        }
    }

    /// Step back: `current` goes on the redo stack and the prior snapshot
    /// is returned with its label.
    pub fn undo(&mut self, current: S) -> Option<(String, S)> {
        Self::step(&mut self.undo_stack, &mut self.redo_stack, current)
    }

    /// Step forward over the last undone change.
    pub fn redo(&mut self, current: S) -> Option<(String, S)> {
        Self::step(&mut self.redo_stack, &mut self.undo_stack, current)
    }

    fn step(
        from: &mut Vec<HistoryEntry<S>>,
        to: &mut Vec<HistoryEntry<S>>,
        current: S,
    ) -> Option<(String, S)> {
        let entry = from.pop()?;
        to.push(HistoryEntry {
            label: entry.label.clone(),
            state: current,
        });
        Some((entry.label, entry.state))
    }

    /// Whether there is a change to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether there is an undone change to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo steps available.
    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Label of the change `undo` would revert.
    #[must_use]
    pub fn next_undo(&self) -> Option<&str> {
        self.undo_stack.last().map(|e| e.label.as_str())
    }

    /// Label of the change `redo` would re-apply.
    #[must_use]
    pub fn next_redo(&self) -> Option<&str> {
        self.redo_stack.last().map(|e| e.label.as_str())
    }

    /// Drop all recorded history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl History<GridState> {
    /// Run `op` against the grid and record the prior state if it changed
    /// anything.
    ///
    /// A rejected operation leaves both the grid and the history unchanged.
    pub fn apply<T>(
        &mut self,
        grid: &mut CollageGrid,
        label: impl Into<String>,
        op: impl FnOnce(&mut CollageGrid) -> Result<T, LayoutError>,
    ) -> Result<T, LayoutError> {
        let before = grid.snapshot();
        let value = op(grid)?;
        if grid.snapshot() != before {
            self.record(label, before);
        }
        Ok(value)
    }

    /// Restore the grid to before the last change. Returns its label.
    ///
    /// The grid's id counter is kept, so undone ids are not issued again.
    pub fn undo_grid(&mut self, grid: &mut CollageGrid) -> Result<Option<String>, LayoutError> {
        if let Some(entry) = self.undo_stack.last() {
            entry.state.validate()?;
        }
        self.restore_step(grid, Self::undo)
    }

    /// Re-apply the last undone change to the grid. Returns its label.
    pub fn redo_grid(&mut self, grid: &mut CollageGrid) -> Result<Option<String>, LayoutError> {
        if let Some(entry) = self.redo_stack.last() {
            entry.state.validate()?;
        }
        self.restore_step(grid, Self::redo)
    }

    fn restore_step(
        &mut self,
        grid: &mut CollageGrid,
        step: fn(&mut Self, GridState) -> Option<(String, GridState)>,
    ) -> Result<Option<String>, LayoutError> {
        let current = grid.snapshot();
        let floor = current.next_id;
        match step(self, current) {
            Some((label, state)) => {
                grid.restore(state.with_id_floor(floor))?;
                Ok(Some(label))
            }
            None => Ok(None),
        }
    }
}
