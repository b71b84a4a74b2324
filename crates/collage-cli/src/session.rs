//! Editing session persisted between invocations.
//!
//! A session owns everything the engine leaves to its caller: the tray of
//! unplaced images, the current selection and the undo history.

use collage_layout::{
    CollageGrid, GridDims, GridState, History, ItemId, LayoutError, Tray, MAX_EXTENT,
};
use collage_yaml::ParseError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors surfaced by the command-line editor.
#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session file is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("config error: {0}")]
    Config(#[from] ParseError),

    #[error("grid must be between 1x1 and {max}x{max}, got {0}", max = MAX_EXTENT)]
    GridSize(GridDims),

    #[error("no item given and nothing is selected")]
    NoSelection,

    #[error("{} already exists; pass --force to replace it", .0.display())]
    Exists(PathBuf),

    #[error("unknown template '{0}'")]
    UnknownTemplate(String),

    #[error("no template available for {0} items")]
    NoTemplate(usize),
}

/// What an undo step restores: the grid together with the tray, so images
/// taken by an undone edit return to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Snapshot {
    grid: GridState,
    tray: Tray,
}

/// Persisted editor state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Session {
    pub(crate) grid: GridState,
    #[serde(default)]
    pub(crate) tray: Tray,
    #[serde(default)]
    pub(crate) selection: Option<ItemId>,
    #[serde(default)]
    pub(crate) history: History<Snapshot>,
}

impl Session {
    pub(crate) fn new(dims: GridDims, max_depth: usize) -> Self {
        Self {
            grid: CollageGrid::new(dims).snapshot(),
            tray: Tray::new(),
            selection: None,
            history: History::new(max_depth),
        }
    }

    /// Read a session file, validating the stored grid.
    pub(crate) fn load(path: &Path) -> Result<Self, SessionError> {
        let json = std::fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut session: Self = serde_json::from_str(&json)?;
        session.grid.validate()?;
        session.sync_selection();
        debug!(path = %path.display(), items = session.grid.items.len(), "Loaded session");
        Ok(session)
    }

    pub(crate) fn save(&self, path: &Path) -> Result<(), SessionError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Live engine over the stored state.
    pub(crate) fn grid(&self) -> Result<CollageGrid, SessionError> {
        Ok(CollageGrid::from_state(self.grid.clone())?)
    }

    /// Run an edit against the grid and tray.
    ///
    /// A rejected edit changes nothing. A committed edit that changed the
    /// grid or tray is recorded for undo.
    pub(crate) fn edit<T>(
        &mut self,
        label: &str,
        op: impl FnOnce(&mut CollageGrid, &mut Tray) -> Result<T, LayoutError>,
    ) -> Result<T, SessionError> {
        let mut grid = self.grid()?;
        let mut tray = self.tray.clone();
        let value = op(&mut grid, &mut tray)?;

        let after = grid.snapshot();
        if after != self.grid || tray != self.tray {
            let before = Snapshot {
                grid: std::mem::replace(&mut self.grid, after),
                tray: std::mem::replace(&mut self.tray, tray),
            };
            self.history.record(label, before);
        }
        self.sync_selection();
        Ok(value)
    }

    /// Select an existing item.
    pub(crate) fn select(&mut self, id: ItemId) -> Result<(), SessionError> {
        if !self.contains(id) {
            return Err(LayoutError::NotFound(id).into());
        }
        self.selection = Some(id);
        Ok(())
    }

    /// The explicit item, else the selection.
    pub(crate) fn target(&self, id: Option<u64>) -> Result<ItemId, SessionError> {
        id.map(ItemId::new)
            .or(self.selection)
            .ok_or(SessionError::NoSelection)
    }

    pub(crate) fn undo(&mut self) -> Result<Option<String>, SessionError> {
        let current = self.current();
        let step = self.history.undo(current);
        self.restore(step)
    }

    pub(crate) fn redo(&mut self) -> Result<Option<String>, SessionError> {
        let current = self.current();
        let step = self.history.redo(current);
        self.restore(step)
    }

    fn current(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
            tray: self.tray.clone(),
        }
    }

    fn restore(&mut self, step: Option<(String, Snapshot)>) -> Result<Option<String>, SessionError> {
        let Some((label, snapshot)) = step else {
            return Ok(None);
        };
        snapshot.grid.validate()?;
        self.grid = snapshot.grid.with_id_floor(self.grid.next_id);
        self.tray = snapshot.tray;
        self.sync_selection();
        Ok(Some(label))
    }

    fn contains(&self, id: ItemId) -> bool {
        self.grid.items.iter().any(|i| i.id == id)
    }

    /// Drop the selection once its item is gone.
    fn sync_selection(&mut self) {
        if let Some(id) = self.selection {
            if !self.contains(id) {
                debug!(item = %id, "Selected item removed; clearing selection");
                self.selection = None;
            }
        }
    }
}
