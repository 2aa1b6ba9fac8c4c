//! Plain-text presentation of boards and events.

use std::{collections::BTreeSet, fmt::Write as _};

use hex_cascade_core::{
    Block, BlockKind, Board, ColorId, Direction, Event, HexCoord, RowOffset, Swatch, Tint,
    STONE_SWATCH,
};

const VACANT: &str = "..";
const STONE: &str = "##";
const WILDCARD: &str = "**";
const BOMB: &str = "@@";
const CELL_GAP: &str = "  ";
const ROW_INDENT: &str = "  ";

/// Draws the board one row per line, shifted rows indented by half a cell.
///
/// Coloured blocks show their palette index (`0`-`9`, letters once
/// promoted) followed by their direction, or `x` once marked for removal.
#[must_use]
pub(crate) fn board(board: &Board) -> String {
    let footprint = board.footprint();
    let mut out = String::new();
    let mut row = None;
    for cell in footprint.coords() {
        if row != Some(cell.r()) {
            if row.is_some() {
                out.push('\n');
            }
            row = Some(cell.r());
            if is_shifted(footprint.offset(), cell.r()) {
                out.push_str(ROW_INDENT);
            }
        } else {
            out.push_str(CELL_GAP);
        }
        match board.get(cell) {
            Some(block) => out.push_str(&token(block)),
            None => out.push_str(VACANT),
        }
    }
    out.push('\n');
    out
}

fn is_shifted(offset: RowOffset, row: i32) -> bool {
    match offset {
        RowOffset::Odd => row % 2 == 1,
        RowOffset::Even => row % 2 == 0,
    }
}

fn token(block: &Block) -> String {
    let color = match block.tint() {
        Tint::Stone => return STONE.to_owned(),
        Tint::Bomb => return BOMB.to_owned(),
        Tint::Wildcard if block.is_marked() => return "*x".to_owned(),
        Tint::Wildcard => return WILDCARD.to_owned(),
        Tint::Color(color) => color.index(),
    };
    let mark = if block.kind() == BlockKind::Special {
        char::from(b'A' + color)
    } else {
        char::from(b'0' + color)
    };
    let tail = if block.is_marked() {
        'x'
    } else {
        direction_glyph(block.direction())
    };
    format!("{mark}{tail}")
}

/// Maps the board tokens in use to their display colours, palette order.
#[must_use]
pub(crate) fn legend(board: &Board) -> String {
    let colors: BTreeSet<ColorId> = board.iter().filter_map(|(_, block)| block.color()).collect();
    let mut entries: Vec<String> = colors
        .into_iter()
        .map(|color| format!("{} {}", color.index(), rgb(color.swatch())))
        .collect();
    if board.iter().any(|(_, block)| block.is_stone()) {
        entries.push(format!("{STONE} {}", rgb(STONE_SWATCH)));
    }
    entries.join(", ")
}

fn rgb(swatch: Swatch) -> String {
    format!(
        "#{:02x}{:02x}{:02x}",
        swatch.red(),
        swatch.green(),
        swatch.blue()
    )
}

const fn direction_glyph(direction: Direction) -> char {
    match direction {
        Direction::East => '>',
        Direction::SouthWest => '/',
        Direction::NorthWest => '\\',
    }
}

fn cell(coord: HexCoord) -> String {
    format!("({}, {})", coord.q(), coord.r())
}

fn cells(coords: &[HexCoord]) -> String {
    coords.iter().map(|coord| cell(*coord)).collect::<Vec<_>>().join(" ")
}

/// One-line human readable description of an event.
#[must_use]
pub(crate) fn event(event: &Event) -> String {
    let mut out = String::new();
    let _ = match event {
        Event::BoardGenerated {
            footprint,
            stones,
            blocks,
            colors,
        } => write!(
            out,
            "dealt {}x{} board: {stones} stones, {blocks} blocks in {colors} colours",
            footprint.width(),
            footprint.height()
        ),
        Event::BoardLoaded { footprint } => write!(
            out,
            "loaded {}x{} board",
            footprint.width(),
            footprint.height()
        ),
        Event::TimeAdvanced { dt } => write!(out, "time +{}ms", dt.as_millis()),
        Event::BlockMoved { from, to } => write!(out, "moved {} -> {}", cell(*from), cell(*to)),
        Event::BlockRotated { cell: at, direction } => {
            write!(out, "rotated {} to {direction:?}", cell(*at))
        }
        Event::BlockPlaced { cell: at, kind, due } => write!(
            out,
            "placed {kind:?} at {}, resolves at {}ms",
            cell(*at),
            due.as_millis()
        ),
        Event::BlockPromoted { cell: at } => write!(out, "promoted {}", cell(*at)),
        Event::CellsDestroyed {
            cause,
            cells: destroyed,
            score,
        } => write!(
            out,
            "{cause:?} destroyed {} cells for {score} points: {}",
            destroyed.len(),
            cells(destroyed)
        ),
        Event::CellsPurged { cells: purged } => write!(out, "purged {}", cells(purged)),
        Event::CellPainted { cell: at, block } => match block {
            Some(block) => write!(out, "painted {} with {}", cell(*at), token(block)),
            None => write!(out, "erased {}", cell(*at)),
        },
        Event::ActionRejected {
            action,
            cell: at,
            reason,
        } => write!(out, "rejected {action:?} at {}: {reason:?}", cell(*at)),
    };
    out
}
