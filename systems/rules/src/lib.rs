#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Move legality and deadlock detection for directional blocks.

use hex_cascade_core::{Board, Direction, HexCoord, Rejection};

/// Cell a block may slide to, if the source holds a movable block.
///
/// The target is reported regardless of whether it is vacant or in bounds.
#[must_use]
pub fn move_target(board: &Board, from: HexCoord) -> Option<HexCoord> {
    board
        .get(from)
        .filter(|block| block.is_movable())
        .map(|block| from.step(block.direction()))
}

/// Validates sliding the block at `from` onto `to`.
pub fn check_move(board: &Board, from: HexCoord, to: HexCoord) -> Result<(), Rejection> {
    let block = board.get(from).ok_or(Rejection::EmptySource)?;
    if !block.is_movable() {
        return Err(Rejection::ImmovableSource);
    }
    if from.step(block.direction()) != to {
        return Err(Rejection::WrongDirection);
    }
    if !board.footprint().contains(to) {
        return Err(Rejection::OutOfBounds);
    }
    if !board.is_vacant(to) {
        return Err(Rejection::Occupied);
    }
    Ok(())
}

/// Reports whether pinning the block at `cell` to `direction` would close a
/// three-block cycle in which every block waits on another.
///
/// Only non-stone neighbours take part. The check is advisory: the generator
/// uses it to bias directions, play never enforces it.
#[must_use]
pub fn is_deadlock(board: &Board, cell: HexCoord, direction: Direction) -> bool {
    let [(first, first_direction), (second, second_direction)] = match direction {
        Direction::East => [
            (cell.offset(1, 0), Direction::SouthWest),
            (cell.offset(0, 1), Direction::NorthWest),
        ],
        Direction::SouthWest => [
            (cell.offset(-1, 0), Direction::East),
            (cell.offset(-1, 1), Direction::NorthWest),
        ],
        Direction::NorthWest => [
            (cell.offset(0, -1), Direction::East),
            (cell.offset(1, -1), Direction::SouthWest),
        ],
    };

    points(board, first, first_direction) && points(board, second, second_direction)
}

/// Enumerates every `(from, to)` slide currently allowed, in row-major
/// source order.
#[must_use]
pub fn legal_moves(board: &Board) -> Vec<(HexCoord, HexCoord)> {
    board
        .iter()
        .filter_map(|(from, _)| {
            let to = move_target(board, from)?;
            check_move(board, from, to).ok()?;
            Some((from, to))
        })
        .collect()
}

/// Reports whether the board is full and no block can slide.
#[must_use]
pub fn is_stalled(board: &Board) -> bool {
    board.vacant_cells().is_empty() && legal_moves(board).is_empty()
}

fn points(board: &Board, cell: HexCoord, direction: Direction) -> bool {
    board
        .get(cell)
        .is_some_and(|block| !block.is_stone() && block.direction() == direction)
}
