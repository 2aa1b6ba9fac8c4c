//! Blocks and the dense board arena that stores them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Direction, Footprint, HexCoord};

/// Number of playable colours in the palette.
pub const PALETTE_SIZE: usize = 10;

/// RGB swatches of the playable colours, indexed by [`ColorId`].
pub const PALETTE: [Swatch; PALETTE_SIZE] = [
    Swatch::from_rgb(0xef, 0x53, 0x50),
    Swatch::from_rgb(0x42, 0xa5, 0xf5),
    Swatch::from_rgb(0x66, 0xbb, 0x6a),
    Swatch::from_rgb(0xff, 0xa7, 0x26),
    Swatch::from_rgb(0xab, 0x47, 0xbc),
    Swatch::from_rgb(0x26, 0xc6, 0xda),
    Swatch::from_rgb(0xd4, 0xe1, 0x57),
    Swatch::from_rgb(0x8d, 0x6e, 0x63),
    Swatch::from_rgb(0x78, 0x90, 0x9c),
    Swatch::from_rgb(0xf0, 0x62, 0x92),
];

/// Swatch used to draw stones.
pub const STONE_SWATCH: Swatch = Swatch::from_rgb(0x37, 0x47, 0x4f);

/// Visual appearance of a block colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Swatch {
    red: u8,
    green: u8,
    blue: u8,
}

impl Swatch {
    /// Creates a new swatch from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the colour.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the colour.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the colour.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Index of a playable colour within [`PALETTE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColorId(u8);

impl ColorId {
    /// Creates a colour identifier, rejecting indices outside the palette.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < PALETTE_SIZE {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Palette index of the colour.
    #[must_use]
    pub const fn index(&self) -> u8 {
        self.0
    }

    /// Swatch used to draw the colour.
    #[must_use]
    pub const fn swatch(&self) -> Swatch {
        PALETTE[self.0 as usize]
    }

    /// Iterates the first `count` palette colours in palette order.
    pub fn first(count: usize) -> impl Iterator<Item = ColorId> {
        (0..count.min(PALETTE_SIZE)).map(|index| Self(index as u8))
    }
}

/// Colour of a block: a playable colour or one of the reserved sentinels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tint {
    /// Playable colour that participates in matches.
    Color(ColorId),
    /// Reserved tint of stones.
    Stone,
    /// Reserved tint of bombs.
    Bomb,
    /// Reserved tint of wildcards.
    Wildcard,
}

/// Variant of block occupying a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Plain coloured block.
    Normal,
    /// Promoted block that wipes its whole colour when matched again.
    Special,
    /// Immovable obstacle that never matches.
    Stone,
    /// Explosive placed by the player.
    Bomb,
    /// Joker that matches every colour.
    Wildcard,
}

/// Removal phase of a block still present on the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Block is in play.
    #[default]
    Active,
    /// Block was destroyed and waits for the next purge.
    MarkedForRemoval,
}

/// Unit occupying a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    kind: BlockKind,
    tint: Tint,
    direction: Direction,
    lifecycle: Lifecycle,
}

impl Block {
    const fn new(kind: BlockKind, tint: Tint, direction: Direction) -> Self {
        Self {
            kind,
            tint,
            direction,
            lifecycle: Lifecycle::Active,
        }
    }

    /// Plain coloured block pinned to `direction`.
    #[must_use]
    pub const fn normal(color: ColorId, direction: Direction) -> Self {
        Self::new(BlockKind::Normal, Tint::Color(color), direction)
    }

    /// Promoted coloured block pinned to `direction`.
    #[must_use]
    pub const fn special(color: ColorId, direction: Direction) -> Self {
        Self::new(BlockKind::Special, Tint::Color(color), direction)
    }

    /// Immovable stone.
    #[must_use]
    pub const fn stone() -> Self {
        Self::new(BlockKind::Stone, Tint::Stone, Direction::East)
    }

    /// Bomb awaiting detonation.
    #[must_use]
    pub const fn bomb() -> Self {
        Self::new(BlockKind::Bomb, Tint::Bomb, Direction::East)
    }

    /// Wildcard awaiting activation.
    #[must_use]
    pub const fn wildcard() -> Self {
        Self::new(BlockKind::Wildcard, Tint::Wildcard, Direction::East)
    }

    /// Variant of the block.
    #[must_use]
    pub const fn kind(&self) -> BlockKind {
        self.kind
    }

    /// Tint of the block, including sentinels.
    #[must_use]
    pub const fn tint(&self) -> Tint {
        self.tint
    }

    /// Playable colour of normal and special blocks.
    #[must_use]
    pub const fn color(&self) -> Option<ColorId> {
        match self.tint {
            Tint::Color(color) => Some(color),
            Tint::Stone | Tint::Bomb | Tint::Wildcard => None,
        }
    }

    /// Direction the block is allowed to slide toward.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Removal phase of the block.
    #[must_use]
    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Reports whether the block is a stone.
    #[must_use]
    pub const fn is_stone(&self) -> bool {
        matches!(self.kind, BlockKind::Stone)
    }

    /// Reports whether the block is a wildcard.
    #[must_use]
    pub const fn is_wildcard(&self) -> bool {
        matches!(self.kind, BlockKind::Wildcard)
    }

    /// Reports whether the block is a promoted special block.
    #[must_use]
    pub const fn is_special(&self) -> bool {
        matches!(self.kind, BlockKind::Special)
    }

    /// Reports whether the block waits for the purge.
    #[must_use]
    pub const fn is_marked(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::MarkedForRemoval)
    }

    /// Reports whether the player may slide the block.
    #[must_use]
    pub const fn is_movable(&self) -> bool {
        !matches!(self.kind, BlockKind::Stone | BlockKind::Wildcard)
    }

    /// Copy of the block pinned to a different direction.
    #[must_use]
    pub const fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Copy of the block promoted to [`BlockKind::Special`].
    ///
    /// Blocks without a playable colour are returned unchanged.
    #[must_use]
    pub const fn promoted(mut self) -> Self {
        if let Tint::Color(_) = self.tint {
            self.kind = BlockKind::Special;
        }
        self
    }

    /// Copy of the block marked for removal.
    #[must_use]
    pub const fn marked(mut self) -> Self {
        self.lifecycle = Lifecycle::MarkedForRemoval;
        self
    }
}

/// Errors raised when editing a [`Board`] directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The coordinate lies outside the board footprint.
    #[error("cell ({q}, {r}) lies outside the board footprint")]
    OutOfBounds {
        /// Axial column of the rejected cell.
        q: i32,
        /// Axial row of the rejected cell.
        r: i32,
    },
}

/// Dense arena mapping every footprint cell to an optional block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    footprint: Footprint,
    cells: Vec<Option<Block>>,
}

impl Board {
    /// Creates a board with every cell vacant.
    #[must_use]
    pub fn empty(footprint: Footprint) -> Self {
        Self {
            footprint,
            cells: vec![None; footprint.cell_count()],
        }
    }

    /// Footprint covered by the board.
    #[must_use]
    pub const fn footprint(&self) -> Footprint {
        self.footprint
    }

    /// Block occupying the cell, if any.
    #[must_use]
    pub fn get(&self, coord: HexCoord) -> Option<&Block> {
        self.footprint
            .index(coord)
            .and_then(|index| self.cells.get(index))
            .and_then(Option::as_ref)
    }

    /// Mutable access to the block occupying the cell, if any.
    pub fn get_mut(&mut self, coord: HexCoord) -> Option<&mut Block> {
        let index = self.footprint.index(coord)?;
        self.cells.get_mut(index).and_then(Option::as_mut)
    }

    /// Reports whether the cell is inside the footprint and holds no block.
    #[must_use]
    pub fn is_vacant(&self, coord: HexCoord) -> bool {
        self.footprint
            .index(coord)
            .and_then(|index| self.cells.get(index))
            .is_some_and(Option::is_none)
    }

    /// Stores `block` at `coord`, returning the block it replaced.
    pub fn place(&mut self, coord: HexCoord, block: Block) -> Result<Option<Block>, BoardError> {
        let slot = self.slot_mut(coord)?;
        Ok(slot.replace(block))
    }

    /// Removes and returns the block at `coord`.
    pub fn remove(&mut self, coord: HexCoord) -> Option<Block> {
        self.slot_mut(coord).ok().and_then(Option::take)
    }

    /// Iterates occupied cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (HexCoord, &Block)> + '_ {
        self.cells.iter().enumerate().filter_map(|(index, slot)| {
            let block = slot.as_ref()?;
            let coord = self.footprint.coord_at(index)?;
            Some((coord, block))
        })
    }

    /// Vacant cells in row-major order.
    #[must_use]
    pub fn vacant_cells(&self) -> Vec<HexCoord> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .filter_map(|(index, _)| self.footprint.coord_at(index))
            .collect()
    }

    /// Cells whose blocks wait for the purge, in row-major order.
    #[must_use]
    pub fn marked_cells(&self) -> Vec<HexCoord> {
        self.iter()
            .filter(|(_, block)| block.is_marked())
            .map(|(coord, _)| coord)
            .collect()
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|slot| slot.is_some()).count()
    }

    fn slot_mut(&mut self, coord: HexCoord) -> Result<&mut Option<Block>, BoardError> {
        let out_of_bounds = BoardError::OutOfBounds {
            q: coord.q(),
            r: coord.r(),
        };
        let index = self.footprint.index(coord).ok_or(out_of_bounds)?;
        self.cells.get_mut(index).ok_or(out_of_bounds)
    }
}
