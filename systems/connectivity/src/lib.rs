#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure breadth-first searches over an immutable board.

use std::collections::{BTreeSet, VecDeque};

use hex_cascade_core::{Board, ColorId, HexCoord, Tint};

/// Collects the connected group of `color` containing `seed`.
///
/// The seed is always part of the group, whatever it holds. Expansion
/// proceeds through occupied, non-stone cells whose tint is `color` or whose
/// block is a wildcard. Blocks waiting for the purge still occupy their cells
/// and therefore still connect.
#[must_use]
pub fn find_connected_group(board: &Board, seed: HexCoord, color: ColorId) -> BTreeSet<HexCoord> {
    let mut group = BTreeSet::from([seed]);
    let mut queue = VecDeque::from([seed]);

    while let Some(current) = queue.pop_front() {
        for neighbor in current.neighbors() {
            if group.contains(&neighbor) || !joins_group(board, neighbor, color) {
                continue;
            }
            let _ = group.insert(neighbor);
            queue.push_back(neighbor);
        }
    }

    group
}

/// Finds up to `limit` blocks of exactly `color`, nearest to `seed` first.
///
/// The search expands through every cell of the footprint regardless of its
/// content, so the result is ordered by hex distance rather than by
/// connectivity. Wildcards, stones, blocks waiting for the purge and the seed
/// itself are never collected.
#[must_use]
pub fn find_nearest_same_color(
    board: &Board,
    seed: HexCoord,
    color: ColorId,
    limit: usize,
) -> Vec<HexCoord> {
    let footprint = board.footprint();
    let mut found = Vec::with_capacity(limit);
    if limit == 0 {
        return found;
    }

    let mut visited = BTreeSet::from([seed]);
    let mut queue = VecDeque::from([seed]);

    while let Some(current) = queue.pop_front() {
        for neighbor in current.neighbors() {
            if !footprint.contains(neighbor) || !visited.insert(neighbor) {
                continue;
            }

            let collectable = board.get(neighbor).is_some_and(|block| {
                block.tint() == Tint::Color(color) && !block.is_marked() && !block.is_stone()
            });
            if collectable {
                found.push(neighbor);
                if found.len() >= limit {
                    return found;
                }
            }
            queue.push_back(neighbor);
        }
    }

    found
}

fn joins_group(board: &Board, cell: HexCoord, color: ColorId) -> bool {
    board.get(cell).is_some_and(|block| {
        !block.is_stone() && (block.tint() == Tint::Color(color) || block.is_wildcard())
    })
}
