#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Placement commands and the session that records them.
//!
//! [`PlaceItemCommand`] is the reversible unit of work adapters build for every
//! placement attempt. [`Session`] couples one [`Grid`] with the history of
//! commands executed against it so that a placement and its undo record always
//! move together.

use std::fmt;

use gridpack_core::{CellCoord, DimensionError, GridDimensions, Item, PlacementError};
use gridpack_grid::Grid;
use gridpack_system_history::{CommandHistory, CommandOutcome, ReversibleCommand};
use tracing::{debug, info};

/// Callback invoked with the item and origin after a grid mutation.
pub type PlacementHook = Box<dyn FnMut(&Item, CellCoord)>;

/// Optional side effects attached to a placement command.
#[derive(Default)]
pub struct PlacementHooks {
    on_place: Option<PlacementHook>,
    on_remove: Option<PlacementHook>,
}

impl PlacementHooks {
    /// Creates an empty hook set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the callback run after the item is written to the grid.
    #[must_use]
    pub fn on_place(mut self, hook: impl FnMut(&Item, CellCoord) + 'static) -> Self {
        self.on_place = Some(Box::new(hook));
        self
    }

    /// Registers the callback run after the footprint is cleared on undo.
    #[must_use]
    pub fn on_remove(mut self, hook: impl FnMut(&Item, CellCoord) + 'static) -> Self {
        self.on_remove = Some(Box::new(hook));
        self
    }
}

impl fmt::Debug for PlacementHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlacementHooks")
            .field("on_place", &self.on_place.is_some())
            .field("on_remove", &self.on_remove.is_some())
            .finish()
    }
}

/// Places an item at a fixed origin and removes it again on undo.
///
/// `execute` only mutates the grid when the whole footprint is free. `undo`
/// clears the footprint unconditionally, including after a skipped execute,
/// so undoing a skipped command frees whatever currently covers those cells.
#[derive(Debug)]
pub struct PlaceItemCommand {
    item: Item,
    origin: CellCoord,
    hooks: PlacementHooks,
}

impl PlaceItemCommand {
    /// Creates a command without side-effect hooks.
    #[must_use]
    pub fn new(item: Item, origin: CellCoord) -> Self {
        Self::with_hooks(item, origin, PlacementHooks::default())
    }

    /// Creates a command that runs the provided hooks after each mutation.
    #[must_use]
    pub fn with_hooks(item: Item, origin: CellCoord, hooks: PlacementHooks) -> Self {
        Self {
            item,
            origin,
            hooks,
        }
    }

    /// Item the command places.
    #[must_use]
    pub const fn item(&self) -> &Item {
        &self.item
    }

    /// Origin cell anchoring the item's footprint.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }
}

impl ReversibleCommand<Grid> for PlaceItemCommand {
    fn execute(&mut self, grid: &mut Grid) -> CommandOutcome {
        if !grid.can_place(&self.item, self.origin) {
            return CommandOutcome::Skipped;
        }
        grid.place(&self.item, self.origin);
        if let Some(hook) = self.hooks.on_place.as_mut() {
            hook(&self.item, self.origin);
        }
        CommandOutcome::Applied
    }

    fn undo(&mut self, grid: &mut Grid) {
        grid.remove(&self.item, self.origin);
        if let Some(hook) = self.hooks.on_remove.as_mut() {
            hook(&self.item, self.origin);
        }
    }
}

/// One grid together with the history of commands executed against it.
#[derive(Debug)]
pub struct Session {
    grid: Grid,
    history: CommandHistory<Grid>,
}

impl Session {
    /// Starts a session on an empty grid of the provided size.
    pub fn new(dimensions: GridDimensions) -> Result<Self, DimensionError> {
        Ok(Self {
            grid: Grid::with_dimensions(dimensions)?,
            history: CommandHistory::new(),
        })
    }

    /// Read-only access to the session's grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of commands that can still be undone.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Validates the placement and, when it fits, records it as a command.
    ///
    /// Rejected placements leave both the grid and the history untouched.
    pub fn try_place(
        &mut self,
        item: Item,
        origin: CellCoord,
        hooks: PlacementHooks,
    ) -> Result<(), PlacementError> {
        if let Err(error) = self.grid.check_placement(&item, origin) {
            debug!(item = item.id().get(), %error, "placement rejected");
            return Err(error);
        }
        let command = PlaceItemCommand::with_hooks(item, origin, hooks);
        let _ = self.execute(Box::new(command));
        Ok(())
    }

    /// Executes an arbitrary command against the grid and records it.
    ///
    /// Unlike [`Session::try_place`] nothing is validated up front, so a
    /// skipped command is still recorded.
    pub fn execute(&mut self, command: Box<dyn ReversibleCommand<Grid>>) -> CommandOutcome {
        self.history.execute_command(&mut self.grid, command)
    }

    /// Reverts the most recent command. Returns `false` when nothing was recorded.
    pub fn undo_last(&mut self) -> bool {
        self.history.undo_last(&mut self.grid)
    }

    /// Forgets every recorded command while keeping the grid as it is.
    pub fn clear_history(&mut self) {
        self.history.clear_history();
    }

    /// Empties both the grid and the history.
    pub fn reset(&mut self) {
        info!(discarded = self.history.len(), "session reset");
        self.grid.clear();
        self.history.clear_history();
    }
}
