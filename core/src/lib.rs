#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Hex Cascade engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing player intents, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! changed. Systems read immutable [`Board`] snapshots and never mutate them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use config::*;
pub use hex::*;

mod board;
mod config;
mod hex;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Deals a fresh board and resets every schedule.
    NewGame {
        /// Rules, footprint and seed of the new game.
        config: GameConfig,
    },
    /// Replaces the board with a prepared layout, keeping the configuration.
    LoadBoard {
        /// Layout to install.
        board: Board,
    },
    /// Advances the logical clock, running every effect that falls due.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Slides a block one step along its pinned direction.
    MoveBlock {
        /// Cell holding the block to move.
        from: HexCoord,
        /// Cell the block should land on.
        to: HexCoord,
    },
    /// Rotates a block's pinned direction to the next one.
    RotateBlock {
        /// Cell holding the block to rotate.
        cell: HexCoord,
    },
    /// Destroys a block together with its two nearest same-coloured blocks.
    DestroyNearest {
        /// Cell holding the targeted block.
        cell: HexCoord,
    },
    /// Drops a wildcard that resolves after the activation delay.
    PlaceWildcard {
        /// Vacant cell receiving the wildcard.
        cell: HexCoord,
    },
    /// Drops a bomb that detonates after the activation delay.
    PlaceBomb {
        /// Vacant cell receiving the bomb.
        cell: HexCoord,
    },
    /// Removes every block marked for removal without waiting for the timer.
    PurgeMarked,
    /// Edits a single cell directly, bypassing gameplay rules.
    PaintCell {
        /// Cell to edit.
        cell: HexCoord,
        /// Block to paint, or `None` to erase the cell.
        brush: Option<Brush>,
    },
}

/// Blocks that can be painted onto the board in editor mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Brush {
    /// Paints an immovable stone.
    Stone,
    /// Paints a wildcard that never activates on its own.
    Wildcard,
    /// Paints a plain coloured block.
    Block {
        /// Colour of the painted block.
        color: ColorId,
        /// Direction the painted block slides toward.
        direction: Direction,
    },
}

impl Brush {
    /// Block produced by the brush.
    #[must_use]
    pub const fn block(self) -> Block {
        match self {
            Self::Stone => Block::stone(),
            Self::Wildcard => Block::wildcard(),
            Self::Block { color, direction } => Block::normal(color, direction),
        }
    }
}

/// Player intent kinds, used to label rejections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// [`Command::MoveBlock`].
    Move,
    /// [`Command::RotateBlock`].
    Rotate,
    /// [`Command::DestroyNearest`].
    Destroy,
    /// [`Command::PlaceWildcard`].
    PlaceWildcard,
    /// [`Command::PlaceBomb`].
    PlaceBomb,
    /// [`Command::PaintCell`].
    Paint,
}

/// Reasons an intent may be rejected; the board is left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// The move source holds no block.
    EmptySource,
    /// The move source holds a stone or a wildcard.
    ImmovableSource,
    /// The target is not one step along the block's pinned direction.
    WrongDirection,
    /// The target lies outside the board footprint.
    OutOfBounds,
    /// The target must be vacant but holds a block.
    Occupied,
    /// The target must hold a block but is vacant.
    EmptyTarget,
    /// The target holds a stone, which tools cannot affect.
    StoneTarget,
}

/// What caused a batch of destroyed cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cause {
    /// A move completed a colour match.
    Match,
    /// A wildcard resolved against its neighbours.
    Wildcard,
    /// A bomb detonated.
    Bomb,
    /// The destroy tool was used.
    Destroy,
}

/// Deferred effects queued on the logical clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivationKind {
    /// Wildcard resolution.
    Wildcard,
    /// Bomb detonation.
    Bomb,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A fresh board was dealt.
    BoardGenerated {
        /// Footprint of the new board.
        footprint: Footprint,
        /// Number of stones placed.
        stones: usize,
        /// Number of coloured blocks placed.
        blocks: usize,
        /// Number of colours dealt after capping.
        colors: usize,
    },
    /// A prepared layout replaced the board.
    BoardLoaded {
        /// Footprint of the loaded board.
        footprint: Footprint,
    },
    /// Indicates that the logical clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// A block slid to a neighbouring cell.
    BlockMoved {
        /// Cell the block occupied before moving.
        from: HexCoord,
        /// Cell the block occupies after moving.
        to: HexCoord,
    },
    /// A block's pinned direction changed.
    BlockRotated {
        /// Cell holding the rotated block.
        cell: HexCoord,
        /// Direction after rotation.
        direction: Direction,
    },
    /// A bomb or wildcard was dropped and queued for activation.
    BlockPlaced {
        /// Cell receiving the block.
        cell: HexCoord,
        /// Deferred effect queued for the block.
        kind: ActivationKind,
        /// Logical time at which the effect runs.
        due: Duration,
    },
    /// A match promoted its trigger block to a special block.
    BlockPromoted {
        /// Cell holding the promoted block.
        cell: HexCoord,
    },
    /// Cells were destroyed and points awarded.
    CellsDestroyed {
        /// What destroyed the cells.
        cause: Cause,
        /// Every destroyed cell, in coordinate order.
        cells: Vec<HexCoord>,
        /// Score awarded for the destruction.
        score: u32,
    },
    /// Marked blocks were removed from the board.
    CellsPurged {
        /// Cells that became vacant, in coordinate order.
        cells: Vec<HexCoord>,
    },
    /// A cell was edited directly.
    CellPainted {
        /// Edited cell.
        cell: HexCoord,
        /// Block now occupying the cell, if any.
        block: Option<Block>,
    },
    /// An intent was rejected; the board is unchanged.
    ActionRejected {
        /// Intent that was rejected.
        action: Action,
        /// Cell the intent targeted.
        cell: HexCoord,
        /// Specific reason the intent failed.
        reason: Rejection,
    },
}

#[cfg(test)]
mod tests {
    use super::{
        Block, Board, Brush, ColorId, Difficulty, Direction, Footprint, GameConfig, HexCoord,
        Rejection,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn board_round_trips_through_bincode() {
        let mut board = Board::empty(Footprint::square(4));
        let color = ColorId::new(3).expect("palette colour");
        let _ = board
            .place(HexCoord::new(1, 1), Block::special(color, Direction::SouthWest))
            .expect("in bounds");
        let _ = board
            .place(HexCoord::new(2, 0), Block::stone())
            .expect("in bounds");
        assert_round_trip(&board);
    }

    #[test]
    fn game_config_round_trips_through_bincode() {
        let config = GameConfig::square(7, Difficulty::Hard, 99)
            .expect("valid footprint")
            .with_special_blocks(false);
        assert_round_trip(&config);
    }

    #[test]
    fn rejection_round_trips_through_bincode() {
        assert_round_trip(&Rejection::WrongDirection);
    }

    #[test]
    fn brushes_paint_matching_blocks() {
        let color = ColorId::new(1).expect("palette colour");
        let painted = Brush::Block {
            color,
            direction: Direction::NorthWest,
        }
        .block();
        assert_eq!(painted, Block::normal(color, Direction::NorthWest));
        assert!(Brush::Stone.block().is_stone());
        assert!(Brush::Wildcard.block().is_wildcard());
    }
}
