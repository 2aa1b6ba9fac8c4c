#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure resolution of matches, wildcards, bombs and player tools.
//!
//! Every resolver reads an immutable [`Board`] and describes its outcome as a
//! [`Resolution`]. Applying the outcome is left to the world, which marks,
//! removes and promotes the listed cells in one step.

use std::collections::BTreeSet;

use hex_cascade_core::{Block, Board, ColorId, Direction, GameConfig, HexCoord, Rejection, Tint};
use hex_cascade_system_connectivity::{find_connected_group, find_nearest_same_color};

/// Smallest connected group that clears.
pub const MIN_MATCH: usize = 3;

/// Smallest group that promotes its trigger block when special blocks are enabled.
pub const PROMOTION_THRESHOLD: usize = 4;

/// Number of additional same-coloured blocks the destroy tool takes with it.
pub const DESTROY_REACH: usize = 2;

/// Rule toggles affecting match resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchRules {
    /// Whether large matches promote their trigger block instead of clearing it.
    pub special_blocks: bool,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            special_blocks: true,
        }
    }
}

impl From<&GameConfig> for MatchRules {
    fn from(config: &GameConfig) -> Self {
        Self {
            special_blocks: config.special_blocks(),
        }
    }
}

/// Outcome of a resolver, applied atomically by the world.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    marked: BTreeSet<HexCoord>,
    removed: BTreeSet<HexCoord>,
    promoted: Option<HexCoord>,
    score: u32,
}

impl Resolution {
    /// Cells whose blocks must be marked for removal.
    #[must_use]
    pub fn marked(&self) -> &BTreeSet<HexCoord> {
        &self.marked
    }

    /// Cells whose blocks must be deleted immediately.
    #[must_use]
    pub fn removed(&self) -> &BTreeSet<HexCoord> {
        &self.removed
    }

    /// Cell whose block must be promoted to a special block.
    #[must_use]
    pub const fn promoted(&self) -> Option<HexCoord> {
        self.promoted
    }

    /// Points awarded for the resolution.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Every destroyed cell, marked or removed, in coordinate order.
    #[must_use]
    pub fn destroyed(&self) -> Vec<HexCoord> {
        self.marked.union(&self.removed).copied().collect()
    }

    /// Reports whether the resolution leaves the board untouched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.marked.is_empty() && self.removed.is_empty() && self.promoted.is_none()
    }

    fn marking(marked: BTreeSet<HexCoord>, score: usize) -> Self {
        Self {
            marked,
            removed: BTreeSet::new(),
            promoted: None,
            score: saturating_score(score),
        }
    }
}

/// Resolves the colour match triggered by a block of `color` arriving at `cell`.
///
/// Returns `None` when the connected group is smaller than [`MIN_MATCH`].
#[must_use]
pub fn resolve_match(
    board: &Board,
    cell: HexCoord,
    color: ColorId,
    rules: MatchRules,
) -> Option<Resolution> {
    let group = find_connected_group(board, cell, color);
    if group.len() < MIN_MATCH {
        return None;
    }

    if holds_special(board, &group) {
        let wiped = color_wipe(board, color);
        let score = wiped.len();
        return Some(Resolution::marking(wiped, score));
    }

    let size = group.len();
    if size >= PROMOTION_THRESHOLD && rules.special_blocks {
        let mut marked = group;
        let _ = marked.remove(&cell);
        return Some(Resolution {
            marked,
            removed: BTreeSet::new(),
            promoted: Some(cell),
            score: saturating_score(size),
        });
    }

    Some(Resolution::marking(group, size))
}

/// Resolves the wildcard sitting at `cell` against every neighbouring colour.
///
/// Returns `None` when the cell holds no wildcard or no colour reaches
/// [`MIN_MATCH`] through it.
#[must_use]
pub fn resolve_wildcard(board: &Board, cell: HexCoord) -> Option<Resolution> {
    if !board.get(cell).is_some_and(|block| block.is_wildcard()) {
        return None;
    }

    let mut colors: Vec<ColorId> = Vec::with_capacity(6);
    for neighbor in cell.neighbors() {
        let Some(color) = board.get(neighbor).and_then(|block| block.color()) else {
            continue;
        };
        if !colors.contains(&color) {
            colors.push(color);
        }
    }

    let mut union = BTreeSet::new();
    for color in colors {
        let group = find_connected_group(board, cell, color);
        if group.len() < MIN_MATCH {
            continue;
        }
        if holds_special(board, &group) {
            union.extend(color_wipe(board, color));
        } else {
            union.extend(group);
        }
    }

    if union.is_empty() {
        return None;
    }
    let score = union.len();
    Some(Resolution::marking(union, score))
}

/// Detonates a bomb at `cell`, destroying every occupied cell in its blast.
///
/// The centre is deleted outright whatever it holds; the six neighbours are
/// marked. Stones are not spared.
#[must_use]
pub fn resolve_bomb(board: &Board, cell: HexCoord) -> Resolution {
    let mut resolution = Resolution::default();
    let mut destroyed = 0;

    if board.get(cell).is_some() {
        let _ = resolution.removed.insert(cell);
        destroyed += 1;
    }
    for neighbor in cell.neighbors() {
        if board.get(neighbor).is_some() {
            let _ = resolution.marked.insert(neighbor);
            destroyed += 1;
        }
    }

    resolution.score = saturating_score(destroyed);
    resolution
}

/// Applies the destroy tool to the block at `cell` and its two nearest
/// same-coloured blocks.
pub fn resolve_destroy(board: &Board, cell: HexCoord) -> Result<Resolution, Rejection> {
    let block = target_block(board, cell)?;

    let mut marked = BTreeSet::from([cell]);
    if let Tint::Color(color) = block.tint() {
        marked.extend(find_nearest_same_color(board, cell, color, DESTROY_REACH));
    }

    let score = marked.len();
    Ok(Resolution::marking(marked, score))
}

/// Direction the block at `cell` takes after the rotate tool is applied.
pub fn resolve_rotation(board: &Board, cell: HexCoord) -> Result<Direction, Rejection> {
    target_block(board, cell).map(|block| block.direction().rotated())
}

fn target_block(board: &Board, cell: HexCoord) -> Result<Block, Rejection> {
    if !board.footprint().contains(cell) {
        return Err(Rejection::OutOfBounds);
    }
    let block = board.get(cell).copied().ok_or(Rejection::EmptyTarget)?;
    if block.is_stone() {
        return Err(Rejection::StoneTarget);
    }
    Ok(block)
}

fn holds_special(board: &Board, group: &BTreeSet<HexCoord>) -> bool {
    group
        .iter()
        .any(|cell| board.get(*cell).is_some_and(|block| block.is_special()))
}

fn color_wipe(board: &Board, color: ColorId) -> BTreeSet<HexCoord> {
    board
        .iter()
        .filter(|(_, block)| !block.is_stone() && block.tint() == Tint::Color(color))
        .map(|(cell, _)| cell)
        .collect()
}

fn saturating_score(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}
