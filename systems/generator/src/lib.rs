#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded board generation.
//!
//! A board is dealt in three passes over one shuffled ordering of the
//! footprint: the first tenth of the cells becomes stones, the remainder
//! receives a shuffled pool of coloured blocks sized so that every colour
//! appears a multiple of three times, and each block is pinned to a random
//! direction that avoids closing a three-way cycle where possible.

use hex_cascade_core::{Block, Board, ColorId, Direction, GameConfig, HexCoord};
use hex_cascade_system_rules::is_deadlock;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Share of the footprint turned into stones, in percent.
pub const STONE_PERCENT: usize = 10;

/// Share of the remaining cells filled with coloured blocks, in percent.
pub const FILL_PERCENT: usize = 70;

/// Every colour is dealt in multiples of this many blocks.
pub const COLOR_SET: usize = 3;

/// Statistics describing a generated board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationReport {
    /// Number of stones placed.
    pub stones: usize,
    /// Cells left over after placing stones.
    pub available: usize,
    /// Number of coloured blocks the generator aimed for.
    pub target_fill: usize,
    /// Colours dealt, in palette order.
    pub colors: Vec<ColorId>,
    /// Blocks dealt per colour.
    pub per_color: usize,
    /// Coloured blocks actually placed.
    pub blocks: usize,
    /// Blocks whose every direction closed a cycle, kept on their first pick.
    pub deadlocked: usize,
}

/// Deals a fresh board for `config`.
///
/// The same configuration always yields the same board.
#[must_use]
pub fn generate(config: &GameConfig) -> (Board, GenerationReport) {
    let footprint = config.footprint();
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed());
    let mut board = Board::empty(footprint);

    let mut cells: Vec<HexCoord> = footprint.coords().collect();
    cells.shuffle(&mut rng);

    let total = cells.len();
    let stones = total * STONE_PERCENT / 100;
    let available = total - stones;
    let target_fill = available * FILL_PERCENT / 100;
    let (stone_cells, open_cells) = cells.split_at(stones);

    for cell in stone_cells {
        let _ = board.place(*cell, Block::stone());
    }

    let colors = pick_colors(config, target_fill, &mut rng);
    let per_color = per_color(target_fill, colors.len());

    let mut pool: Vec<ColorId> = colors
        .iter()
        .flat_map(|color| std::iter::repeat(*color).take(per_color))
        .collect();
    pool.shuffle(&mut rng);

    let mut blocks = 0;
    let mut deadlocked = 0;
    for (cell, color) in open_cells.iter().zip(pool) {
        let (direction, free) = pick_direction(&board, *cell, &mut rng);
        if !free {
            deadlocked += 1;
        }
        if board.place(*cell, Block::normal(color, direction)).is_ok() {
            blocks += 1;
        }
    }

    let report = GenerationReport {
        stones,
        available,
        target_fill,
        colors,
        per_color,
        blocks,
        deadlocked,
    };
    log::debug!(
        "generated {}x{} board from seed {}: {report:?}",
        footprint.width(),
        footprint.height(),
        config.seed()
    );

    (board, report)
}

fn pick_colors(config: &GameConfig, target_fill: usize, rng: &mut ChaCha8Rng) -> Vec<ColorId> {
    let mut colors: Vec<ColorId> = ColorId::first(config.difficulty().color_count()).collect();
    let max_colors = target_fill / COLOR_SET;

    if max_colors == 0 {
        log::warn!(
            "footprint {}x{} leaves room for {target_fill} blocks; dealing no colours",
            config.footprint().width(),
            config.footprint().height()
        );
        return Vec::new();
    }

    if colors.len() > max_colors {
        colors.shuffle(rng);
        colors.truncate(max_colors);
        colors.sort();
    }
    colors
}

fn per_color(target_fill: usize, colors: usize) -> usize {
    if colors == 0 {
        return 0;
    }
    let per_color = target_fill / colors;
    let rounded = per_color - per_color % COLOR_SET;
    if rounded == 0 {
        COLOR_SET
    } else {
        rounded
    }
}

fn pick_direction(board: &Board, cell: HexCoord, rng: &mut ChaCha8Rng) -> (Direction, bool) {
    let start: u8 = rng.gen_range(0..3);
    let initial = Direction::from_index(start).unwrap_or(Direction::East);

    let mut candidate = initial;
    for _ in 0..Direction::ALL.len() {
        if !is_deadlock(board, cell, candidate) {
            return (candidate, true);
        }
        candidate = candidate.rotated();
    }
    (initial, false)
}
