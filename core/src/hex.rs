//! Axial hex coordinates and the rectangular footprint they live in.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Axial offsets of the six neighbours, in the order every search visits them.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// Largest accepted footprint side length.
pub const MAX_FOOTPRINT_SIDE: u32 = 64;

/// Location of a single cell expressed in axial `(q, r)` coordinates.
///
/// Coordinates are ordered row-first (`r`, then `q`) so that sets of cells
/// iterate in reading order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexCoord {
    q: i32,
    r: i32,
}

impl HexCoord {
    /// Creates a coordinate from its axial components.
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Axial column component.
    #[must_use]
    pub const fn q(&self) -> i32 {
        self.q
    }

    /// Axial row component.
    #[must_use]
    pub const fn r(&self) -> i32 {
        self.r
    }

    /// Coordinate displaced by the provided axial delta.
    #[must_use]
    pub const fn offset(self, dq: i32, dr: i32) -> Self {
        Self::new(self.q.saturating_add(dq), self.r.saturating_add(dr))
    }

    /// Coordinate reached by a single step in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dq, dr) = direction.delta();
        self.offset(dq, dr)
    }

    /// The six neighbouring coordinates in [`NEIGHBOR_OFFSETS`] order.
    #[must_use]
    pub fn neighbors(self) -> [HexCoord; 6] {
        NEIGHBOR_OFFSETS.map(|(dq, dr)| self.offset(dq, dr))
    }

    /// Number of single steps separating two coordinates on the hex grid.
    #[must_use]
    pub fn hex_distance(self, other: HexCoord) -> u32 {
        let dq = i64::from(self.q) - i64::from(other.q);
        let dr = i64::from(self.r) - i64::from(other.r);
        let ds = dq + dr;
        let steps = dq.unsigned_abs().max(dr.unsigned_abs()).max(ds.unsigned_abs());
        u32::try_from(steps).unwrap_or(u32::MAX)
    }

    /// Integer key identifying the cell; distinct coordinates never share a key.
    #[must_use]
    pub const fn key(self) -> CellKey {
        CellKey::pack(self)
    }
}

impl Ord for HexCoord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.r.cmp(&other.r).then(self.q.cmp(&other.q))
    }
}

impl PartialOrd for HexCoord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Integer encoding of a [`HexCoord`]: `q` in the high 32 bits, `r` in the low 32 bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellKey(u64);

impl CellKey {
    const fn pack(coord: HexCoord) -> Self {
        let q = coord.q as u32 as u64;
        let r = coord.r as u32 as u64;
        Self((q << 32) | r)
    }

    /// Wraps a raw packed value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw packed value.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Decodes the coordinate the key was packed from.
    #[must_use]
    pub const fn coord(&self) -> HexCoord {
        let q = (self.0 >> 32) as u32 as i32;
        let r = self.0 as u32 as i32;
        HexCoord::new(q, r)
    }
}

/// The three slide directions a block can be pinned to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Index 0, axial delta `(+1, 0)`.
    East,
    /// Index 1, axial delta `(-1, +1)`.
    SouthWest,
    /// Index 2, axial delta `(0, -1)`.
    NorthWest,
}

impl Direction {
    /// All directions in index order.
    pub const ALL: [Direction; 3] = [Direction::East, Direction::SouthWest, Direction::NorthWest];

    /// Decodes a direction from its numeric index.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::East),
            1 => Some(Self::SouthWest),
            2 => Some(Self::NorthWest),
            _ => None,
        }
    }

    /// Numeric index in `0..3`.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::East => 0,
            Self::SouthWest => 1,
            Self::NorthWest => 2,
        }
    }

    /// Axial delta of a single step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::East => (1, 0),
            Self::SouthWest => (-1, 1),
            Self::NorthWest => (0, -1),
        }
    }

    /// Next direction in index order, wrapping after `NorthWest`.
    #[must_use]
    pub const fn rotated(self) -> Self {
        match self {
            Self::East => Self::SouthWest,
            Self::SouthWest => Self::NorthWest,
            Self::NorthWest => Self::East,
        }
    }
}

/// Which rows of the rectangular layout are shifted half a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowOffset {
    /// Odd rows are shifted; row `r` spans `q` in `-r/2 .. width - r/2`.
    #[default]
    Odd,
    /// Even rows are shifted; row `r` spans `q` in `-(r+1)/2 .. width - (r+1)/2`.
    Even,
}

/// Rectangular footprint of a pointy-top hex grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    width: u32,
    height: u32,
    offset: RowOffset,
}

impl Footprint {
    /// Creates a footprint with the default row offset.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self::with_offset(width, height, RowOffset::Odd)
    }

    /// Creates a footprint with an explicit row offset.
    #[must_use]
    pub const fn with_offset(width: u32, height: u32, offset: RowOffset) -> Self {
        Self {
            width,
            height,
            offset,
        }
    }

    /// Square footprint of the given side length.
    #[must_use]
    pub const fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    /// Number of cells per row.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Row offset convention of the layout.
    #[must_use]
    pub const fn offset(&self) -> RowOffset {
        self.offset
    }

    /// Total number of cells covered by the footprint.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let cells = u64::from(self.width) * u64::from(self.height);
        usize::try_from(cells).unwrap_or(usize::MAX)
    }

    /// Reports whether the coordinate belongs to the footprint.
    #[must_use]
    pub fn contains(&self, coord: HexCoord) -> bool {
        self.index(coord).is_some()
    }

    /// Dense row-major slot of an in-bounds coordinate.
    #[must_use]
    pub fn index(&self, coord: HexCoord) -> Option<usize> {
        let row = u32::try_from(coord.r()).ok()?;
        if row >= self.height {
            return None;
        }
        let column = u32::try_from(coord.q().checked_add(self.row_shift(coord.r()))?).ok()?;
        if column >= self.width {
            return None;
        }
        let slot = u64::from(row) * u64::from(self.width) + u64::from(column);
        usize::try_from(slot).ok()
    }

    /// Coordinate stored at a dense slot.
    #[must_use]
    pub fn coord_at(&self, index: usize) -> Option<HexCoord> {
        if index >= self.cell_count() || self.width == 0 {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        let row = i32::try_from(index / width).ok()?;
        let column = i32::try_from(index % width).ok()?;
        Some(HexCoord::new(column - self.row_shift(row), row))
    }

    /// Iterates every cell of the footprint in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = HexCoord> + '_ {
        (0..self.cell_count()).filter_map(move |index| self.coord_at(index))
    }

    fn row_shift(&self, row: i32) -> i32 {
        match self.offset {
            RowOffset::Odd => row.div_euclid(2),
            RowOffset::Even => row.div_euclid(2) + row.rem_euclid(2),
        }
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Self::square(10)
    }
}
