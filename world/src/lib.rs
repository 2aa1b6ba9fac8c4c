#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Hex Cascade.

use std::time::Duration;

use hex_cascade_core::{
    Action, ActivationKind, Block, Board, Brush, Cause, Command, Event, GameConfig, HexCoord,
    Rejection,
};
use hex_cascade_system_generator::{generate, GenerationReport};
use hex_cascade_system_resolution::{
    resolve_bomb, resolve_destroy, resolve_match, resolve_rotation, resolve_wildcard, MatchRules,
    Resolution,
};
use hex_cascade_system_rules::check_move;

pub use schedule::Activation;

mod schedule;

use schedule::{Due, Schedule};

/// Represents the authoritative Hex Cascade world state.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    board: Board,
    clock: Duration,
    schedule: Schedule,
}

impl World {
    /// Creates a world holding a board dealt from the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::dealt(GameConfig::default()).0
    }

    fn dealt(config: GameConfig) -> (Self, GenerationReport) {
        let (board, report) = generate(&config);
        let world = Self {
            config,
            board,
            clock: Duration::ZERO,
            schedule: Schedule::default(),
        };
        (world, report)
    }

    fn rules(&self) -> MatchRules {
        MatchRules::from(&self.config)
    }

    fn apply_resolution(&mut self, cause: Cause, resolution: &Resolution, out_events: &mut Vec<Event>) {
        for cell in resolution.removed() {
            let _ = self.board.remove(*cell);
        }
        for cell in resolution.marked() {
            if let Some(block) = self.board.get_mut(*cell) {
                *block = block.marked();
            }
        }
        if let Some(cell) = resolution.promoted() {
            if let Some(block) = self.board.get_mut(cell) {
                *block = block.promoted();
                out_events.push(Event::BlockPromoted { cell });
            }
        }

        if !resolution.marked().is_empty() {
            self.schedule
                .arm_purge(self.clock.saturating_add(self.config.timing().purge_grace));
        }

        let cells = resolution.destroyed();
        if cells.is_empty() {
            return;
        }
        log::debug!(
            "{cause:?} destroyed {} cells for {} points",
            cells.len(),
            resolution.score()
        );
        out_events.push(Event::CellsDestroyed {
            cause,
            cells,
            score: resolution.score(),
        });
    }

    fn purge(&mut self, out_events: &mut Vec<Event>) {
        self.schedule.disarm_purge();
        let cells = self.board.marked_cells();
        if cells.is_empty() {
            return;
        }
        for cell in &cells {
            let _ = self.board.remove(*cell);
        }
        log::trace!("purged {} cells at {:?}", cells.len(), self.clock);
        out_events.push(Event::CellsPurged { cells });
    }

    fn activate(&mut self, activation: Activation, out_events: &mut Vec<Event>) {
        let cell = activation.cell();
        match activation.kind() {
            ActivationKind::Bomb => {
                let resolution = resolve_bomb(&self.board, cell);
                self.apply_resolution(Cause::Bomb, &resolution, out_events);
            }
            ActivationKind::Wildcard => match resolve_wildcard(&self.board, cell) {
                Some(resolution) => self.apply_resolution(Cause::Wildcard, &resolution, out_events),
                None => log::trace!("wildcard at {cell:?} found no match"),
            },
        }
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let horizon = self.clock.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        while let Some(due) = self.schedule.pop_due(horizon) {
            match due {
                Due::Purge(at) => {
                    self.clock = at;
                    self.purge(out_events);
                }
                Due::Activation(activation) => {
                    self.clock = activation.due();
                    self.activate(activation, out_events);
                }
            }
        }

        self.clock = horizon;
    }

    fn move_block(&mut self, from: HexCoord, to: HexCoord, out_events: &mut Vec<Event>) {
        if let Err(reason) = check_move(&self.board, from, to) {
            reject(Action::Move, from, reason, out_events);
            return;
        }
        let Some(block) = self.board.remove(from) else {
            return;
        };
        let _ = self.board.place(to, block);
        out_events.push(Event::BlockMoved { from, to });

        if let Some(color) = block.color() {
            if let Some(resolution) = resolve_match(&self.board, to, color, self.rules()) {
                self.apply_resolution(Cause::Match, &resolution, out_events);
            }
        }
    }

    fn rotate_block(&mut self, cell: HexCoord, out_events: &mut Vec<Event>) {
        let direction = match resolve_rotation(&self.board, cell) {
            Ok(direction) => direction,
            Err(reason) => return reject(Action::Rotate, cell, reason, out_events),
        };
        if let Some(block) = self.board.get_mut(cell) {
            *block = block.with_direction(direction);
            out_events.push(Event::BlockRotated { cell, direction });
        }
    }

    fn destroy_nearest(&mut self, cell: HexCoord, out_events: &mut Vec<Event>) {
        match resolve_destroy(&self.board, cell) {
            Ok(resolution) => self.apply_resolution(Cause::Destroy, &resolution, out_events),
            Err(reason) => reject(Action::Destroy, cell, reason, out_events),
        }
    }

    fn drop_block(&mut self, cell: HexCoord, kind: ActivationKind, out_events: &mut Vec<Event>) {
        let (action, block) = match kind {
            ActivationKind::Bomb => (Action::PlaceBomb, Block::bomb()),
            ActivationKind::Wildcard => (Action::PlaceWildcard, Block::wildcard()),
        };
        if !self.board.footprint().contains(cell) {
            return reject(action, cell, Rejection::OutOfBounds, out_events);
        }
        if !self.board.is_vacant(cell) {
            return reject(action, cell, Rejection::Occupied, out_events);
        }
        if self.board.place(cell, block).is_err() {
            return reject(action, cell, Rejection::OutOfBounds, out_events);
        }

        let due = self
            .clock
            .saturating_add(self.config.timing().activation_delay);
        self.schedule.queue(cell, kind, due);
        out_events.push(Event::BlockPlaced { cell, kind, due });
    }

    fn paint(&mut self, cell: HexCoord, brush: Option<Brush>, out_events: &mut Vec<Event>) {
        if !self.board.footprint().contains(cell) {
            return reject(Action::Paint, cell, Rejection::OutOfBounds, out_events);
        }
        let block = brush.map(Brush::block);
        let _ = match block {
            Some(block) => self.board.place(cell, block).ok().flatten(),
            None => self.board.remove(cell),
        };
        out_events.push(Event::CellPainted { cell, block });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::NewGame { config } => {
            let (dealt, report) = World::dealt(config);
            *world = dealt;
            log::debug!("new game with seed {}", config.seed());
            out_events.push(Event::BoardGenerated {
                footprint: config.footprint(),
                stones: report.stones,
                blocks: report.blocks,
                colors: report.colors.len(),
            });
        }
        Command::LoadBoard { board } => {
            let footprint = board.footprint();
            world.board = board;
            world.clock = Duration::ZERO;
            world.schedule = Schedule::default();
            log::debug!(
                "loaded {}x{} board with {} blocks",
                footprint.width(),
                footprint.height(),
                world.board.occupied_count()
            );
            out_events.push(Event::BoardLoaded { footprint });
        }
        Command::Tick { dt } => world.advance(dt, out_events),
        Command::MoveBlock { from, to } => world.move_block(from, to, out_events),
        Command::RotateBlock { cell } => world.rotate_block(cell, out_events),
        Command::DestroyNearest { cell } => world.destroy_nearest(cell, out_events),
        Command::PlaceWildcard { cell } => {
            world.drop_block(cell, ActivationKind::Wildcard, out_events);
        }
        Command::PlaceBomb { cell } => world.drop_block(cell, ActivationKind::Bomb, out_events),
        Command::PurgeMarked => world.purge(out_events),
        Command::PaintCell { cell, brush } => world.paint(cell, brush, out_events),
    }
}

fn reject(action: Action, cell: HexCoord, reason: Rejection, out_events: &mut Vec<Event>) {
    log::debug!("rejected {action:?} at {cell:?}: {reason:?}");
    out_events.push(Event::ActionRejected {
        action,
        cell,
        reason,
    });
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{Activation, World};
    use hex_cascade_core::{Board, GameConfig, HexCoord};

    /// Provides read-only access to the board.
    #[must_use]
    pub fn board(world: &World) -> &Board {
        &world.board
    }

    /// Configuration of the current game.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Current reading of the logical clock.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Queued bomb and wildcard activations in execution order.
    #[must_use]
    pub fn pending_activations(world: &World) -> Vec<Activation> {
        world.schedule.pending()
    }

    /// Logical time of the next purge, if any block waits for one.
    #[must_use]
    pub fn purge_deadline(world: &World) -> Option<Duration> {
        world.schedule.purge_deadline()
    }

    /// Cells whose blocks are marked for removal.
    #[must_use]
    pub fn marked_cells(world: &World) -> Vec<HexCoord> {
        world.board.marked_cells()
    }

    /// Reports whether no activation or purge is pending.
    #[must_use]
    pub fn is_settled(world: &World) -> bool {
        world.schedule.is_idle()
    }
}
