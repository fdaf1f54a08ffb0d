#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the gridpack placement engine.
//!
//! This crate defines the leaf data types that connect the occupancy grid,
//! the command systems, and adapters. Adapters construct [`Item`] values and
//! pick an origin [`CellCoord`], the grid validates the resulting
//! [`CellRect`] footprint, and commands mutate the grid on the adapter's
//! behalf. Nothing in here holds mutable state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest extent accepted along either axis for grids and items.
///
/// Bounding extents to the signed coordinate range keeps every footprint cell
/// addressable by a [`CellCoord`].
pub const MAX_EXTENT: u32 = i32::MAX as u32;

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed so that callers may ask about origins to the left
/// of or above the grid. Such cells are never inside any grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: i32,
    y: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the cell shifted by the provided offset.
    ///
    /// Offsets that would leave the `i32` range saturate, which always lands
    /// outside any grid because grid extents never exceed [`MAX_EXTENT`].
    #[must_use]
    pub fn offset(self, dx: u32, dy: u32) -> Self {
        Self {
            x: saturating_shift(self.x, dx),
            y: saturating_shift(self.y, dy),
        }
    }
}

fn saturating_shift(base: i32, delta: u32) -> i32 {
    let shifted = i64::from(base) + i64::from(delta);
    i32::try_from(shifted).unwrap_or(i32::MAX)
}

/// Reasons a grid or item extent is rejected at construction time.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum DimensionError {
    /// The width was zero.
    #[error("width must be at least one cell")]
    ZeroWidth,
    /// The height was zero.
    #[error("height must be at least one cell")]
    ZeroHeight,
    /// One of the extents exceeded [`MAX_EXTENT`].
    #[error("extent {0} exceeds the maximum of {max} cells", max = MAX_EXTENT)]
    TooLarge(u32),
    /// The grid has more cells than the occupancy table can hold in memory.
    #[error("a {width}x{height} grid has too many cells to allocate")]
    TooManyCells {
        /// Requested width in cells.
        width: u32,
        /// Requested height in cells.
        height: u32,
    },
}

fn validate_extents(width: u32, height: u32) -> Result<(), DimensionError> {
    if width == 0 {
        return Err(DimensionError::ZeroWidth);
    }
    if height == 0 {
        return Err(DimensionError::ZeroHeight);
    }
    if width > MAX_EXTENT {
        return Err(DimensionError::TooLarge(width));
    }
    if height > MAX_EXTENT {
        return Err(DimensionError::TooLarge(height));
    }
    Ok(())
}

/// Width and height of an item measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawExtent", into = "RawExtent")]
pub struct ItemSize {
    width: u32,
    height: u32,
}

impl ItemSize {
    /// Creates a validated item size.
    pub fn new(width: u32, height: u32) -> Result<Self, DimensionError> {
        validate_extents(width, height)?;
        Ok(Self { width, height })
    }

    /// Width of the item in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the item in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells covered by an item of this size.
    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Fixed dimensions of an occupancy grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawExtent", into = "RawExtent")]
pub struct GridDimensions {
    width: u32,
    height: u32,
}

impl GridDimensions {
    /// Creates validated grid dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, DimensionError> {
        validate_extents(width, height)?;
        Ok(Self { width, height })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the cell lies within `0..width` by `0..height`.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        // Extents never exceed i32::MAX, so the casts are lossless.
        cell.x() >= 0
            && cell.y() >= 0
            && (cell.x() as u32) < self.width
            && (cell.y() as u32) < self.height
    }
}

#[derive(Clone, Copy, Serialize, Deserialize)]
struct RawExtent {
    width: u32,
    height: u32,
}

impl TryFrom<RawExtent> for ItemSize {
    type Error = DimensionError;

    fn try_from(raw: RawExtent) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.height)
    }
}

impl From<ItemSize> for RawExtent {
    fn from(size: ItemSize) -> Self {
        Self {
            width: size.width,
            height: size.height,
        }
    }
}

impl TryFrom<RawExtent> for GridDimensions {
    type Error = DimensionError;

    fn try_from(raw: RawExtent) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.height)
    }
}

impl From<GridDimensions> for RawExtent {
    fn from(dimensions: GridDimensions) -> Self {
        Self {
            width: dimensions.width,
            height: dimensions.height,
        }
    }
}

/// Opaque identity used to tell otherwise identical items apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates a new item identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Categories of items offered by a catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Ordinary item.
    #[default]
    Basic,
    /// Item unlocked later in a session.
    Advanced,
    /// Rare item.
    Special,
}

/// Immutable description of a rectangular item that can be placed on a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    size: ItemSize,
    score_value: i32,
    #[serde(default)]
    kind: ItemKind,
}

impl Item {
    /// Creates a basic item, rejecting zero or oversized dimensions.
    pub fn new(
        id: ItemId,
        width: u32,
        height: u32,
        score_value: i32,
    ) -> Result<Self, DimensionError> {
        Ok(Self::from_size(id, ItemSize::new(width, height)?, score_value))
    }

    /// Creates a basic item from an already validated size.
    #[must_use]
    pub const fn from_size(id: ItemId, size: ItemSize, score_value: i32) -> Self {
        Self {
            id,
            size,
            score_value,
            kind: ItemKind::Basic,
        }
    }

    /// Returns a copy of the item tagged with the provided kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    /// Identity of the item.
    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.id
    }

    /// Size of the item in cells.
    #[must_use]
    pub const fn size(&self) -> ItemSize {
        self.size
    }

    /// Width of the item in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.size.width()
    }

    /// Height of the item in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.size.height()
    }

    /// Score awarded for placing the item. May be negative.
    #[must_use]
    pub const fn score_value(&self) -> i32 {
        self.score_value
    }

    /// Category of the item.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Footprint covered by the item when anchored at `origin`.
    #[must_use]
    pub const fn footprint(&self, origin: CellCoord) -> CellRect {
        CellRect::from_origin_and_size(origin, self.size)
    }
}

/// Axis-aligned rectangle expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellRect {
    origin: CellCoord,
    size: ItemSize,
}

impl CellRect {
    /// Constructs a rectangle from an origin cell and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, size: ItemSize) -> Self {
        Self { origin, size }
    }

    /// Upper-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole cells.
    #[must_use]
    pub const fn size(&self) -> ItemSize {
        self.size
    }

    /// Reports whether the rectangle covers the provided cell.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        let dx = i64::from(cell.x()) - i64::from(self.origin.x());
        let dy = i64::from(cell.y()) - i64::from(self.origin.y());
        (0..i64::from(self.size.width())).contains(&dx)
            && (0..i64::from(self.size.height())).contains(&dy)
    }

    /// Iterates over every covered cell, column by column.
    ///
    /// Columns form the outer loop and rows the inner one, so validation that
    /// walks this iterator reports the same first failing cell regardless of
    /// the caller.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let origin = self.origin;
        let height = self.size.height();
        (0..self.size.width())
            .flat_map(move |dx| (0..height).map(move |dy| origin.offset(dx, dy)))
    }
}

/// Reasons a placement is rejected by the occupancy grid.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum PlacementError {
    /// A footprint cell falls outside the grid.
    #[error("cell ({}, {}) is outside the grid", .cell.x(), .cell.y())]
    OutOfBounds {
        /// First footprint cell found outside the grid.
        cell: CellCoord,
    },
    /// A footprint cell is already covered by another item.
    #[error(
        "cell ({}, {}) is already occupied by item {}",
        .cell.x(),
        .cell.y(),
        .occupant.get()
    )]
    Occupied {
        /// First footprint cell found occupied.
        cell: CellCoord,
        /// Item currently covering the cell.
        occupant: ItemId,
    },
}
