#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative occupancy state for a fixed-size placement grid.
//!
//! The [`Grid`] is a passive state holder: it answers bounds and overlap
//! questions and applies footprint mutations, but never validates on its own
//! behalf before mutating. Callers gate [`Grid::place`] behind
//! [`Grid::can_place`].

use gridpack_core::{CellCoord, DimensionError, GridDimensions, Item, ItemId, PlacementError};
use tracing::trace;

/// Dense occupancy table covering every cell of a fixed-size grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    dimensions: GridDimensions,
    cells: Vec<Option<ItemId>>,
}

impl Grid {
    /// Creates an empty grid, rejecting zero or oversized dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, DimensionError> {
        Self::with_dimensions(GridDimensions::new(width, height)?)
    }

    /// Creates an empty grid from already validated dimensions.
    ///
    /// Fails with [`DimensionError::TooManyCells`] when the occupancy table
    /// cannot be allocated.
    pub fn with_dimensions(dimensions: GridDimensions) -> Result<Self, DimensionError> {
        let too_many = DimensionError::TooManyCells {
            width: dimensions.width(),
            height: dimensions.height(),
        };
        let width = usize::try_from(dimensions.width()).map_err(|_| too_many)?;
        let height = usize::try_from(dimensions.height()).map_err(|_| too_many)?;
        let capacity = width.checked_mul(height).ok_or(too_many)?;

        let mut cells = Vec::new();
        cells.try_reserve_exact(capacity).map_err(|_| too_many)?;
        cells.resize(capacity, None);
        Ok(Self { dimensions, cells })
    }

    /// Dimensions the grid was constructed with.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn is_inside_grid(&self, cell: CellCoord) -> bool {
        self.dimensions.contains(cell)
    }

    /// Walks the item's footprint and reports the first cell that blocks it.
    pub fn check_placement(&self, item: &Item, origin: CellCoord) -> Result<(), PlacementError> {
        for cell in item.footprint(origin).cells() {
            let Some(index) = self.index(cell) else {
                return Err(PlacementError::OutOfBounds { cell });
            };
            if let Some(occupant) = self.cells[index] {
                return Err(PlacementError::Occupied { cell, occupant });
            }
        }
        Ok(())
    }

    /// Reports whether every footprint cell is inside the grid and free.
    #[must_use]
    pub fn can_place(&self, item: &Item, origin: CellCoord) -> bool {
        self.check_placement(item, origin).is_ok()
    }

    /// Marks every in-bounds footprint cell as covered by `item`.
    ///
    /// The footprint is not re-validated. Cells outside the grid are ignored
    /// and occupied cells are overwritten, so callers must confirm
    /// [`Grid::can_place`] first.
    pub fn place(&mut self, item: &Item, origin: CellCoord) {
        trace!(item = item.id().get(), x = origin.x(), y = origin.y(), "place");
        for cell in item.footprint(origin).cells() {
            if let Some(index) = self.index(cell) {
                self.cells[index] = Some(item.id());
            }
        }
    }

    /// Frees every in-bounds footprint cell.
    ///
    /// Ownership is not checked: the cells are cleared whichever item covers
    /// them, and cells outside the grid are skipped.
    pub fn remove(&mut self, item: &Item, origin: CellCoord) {
        trace!(item = item.id().get(), x = origin.x(), y = origin.y(), "remove");
        for cell in item.footprint(origin).cells() {
            if let Some(index) = self.index(cell) {
                self.cells[index] = None;
            }
        }
    }

    /// Frees every cell of the grid.
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.dimensions.contains(cell) {
            let row = usize::try_from(cell.y()).ok()?;
            let column = usize::try_from(cell.x()).ok()?;
            let width = usize::try_from(self.dimensions.width()).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Query functions that provide read-only access to the occupancy table.
pub mod query {
    use gridpack_core::{CellCoord, GridDimensions, ItemId};

    use super::Grid;

    /// Returns the item covering the provided cell, if any.
    #[must_use]
    pub fn occupant(grid: &Grid, cell: CellCoord) -> Option<ItemId> {
        grid.index(cell).and_then(|index| grid.cells[index])
    }

    /// Reports whether the cell is inside the grid and covered by an item.
    #[must_use]
    pub fn is_occupied(grid: &Grid, cell: CellCoord) -> bool {
        occupant(grid, cell).is_some()
    }

    /// Counts the cells currently covered by any item.
    #[must_use]
    pub fn occupied_count(grid: &Grid) -> usize {
        grid.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Exposes a read-only view of the dense occupancy table.
    #[must_use]
    pub fn occupancy_view(grid: &Grid) -> OccupancyView<'_> {
        OccupancyView { grid }
    }

    /// Read-only view into the dense occupancy table.
    #[derive(Clone, Copy, Debug)]
    pub struct OccupancyView<'a> {
        grid: &'a Grid,
    }

    impl<'a> OccupancyView<'a> {
        /// Provides the dimensions of the underlying grid.
        #[must_use]
        pub fn dimensions(&self) -> GridDimensions {
            self.grid.dimensions
        }

        /// Returns the item covering the provided cell, if any.
        #[must_use]
        pub fn occupant(&self, cell: CellCoord) -> Option<ItemId> {
            occupant(self.grid, cell)
        }

        /// Iterates over the rows of the grid from top to bottom.
        pub fn rows(&self) -> impl Iterator<Item = &'a [Option<ItemId>]> + 'a {
            let grid = self.grid;
            let width = usize::try_from(grid.dimensions.width()).unwrap_or(usize::MAX);
            grid.cells.chunks(width)
        }
    }
}
