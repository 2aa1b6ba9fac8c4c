#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player-facing session bookkeeping: score, tool stock, challenge clock and
//! game-over detection.
//!
//! The session never touches the board. It gates intents before they reach
//! the world and folds the world's events back into its own state.

use std::time::Duration;

use hex_cascade_core::{ActivationKind, Board, Cause, Command, Event};
use hex_cascade_system_rules::is_stalled;
use thiserror::Error;

/// Uses of each tool granted at the start of a game.
pub const DEFAULT_TOOL_STOCK: u32 = 3;

/// Length of a challenge-mode round.
pub const DEFAULT_CHALLENGE: Duration = Duration::from_secs(180);

/// Consumable player tools.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Rotates a block's pinned direction.
    Rotate,
    /// Destroys a block and its two nearest same-coloured blocks.
    Destroy,
    /// Drops a bomb.
    Bomb,
    /// Drops a wildcard.
    Wildcard,
}

impl Tool {
    /// Every tool in display order.
    pub const ALL: [Tool; 4] = [Tool::Rotate, Tool::Destroy, Tool::Bomb, Tool::Wildcard];

    /// Tool consumed by `command`, if any.
    #[must_use]
    pub const fn for_command(command: &Command) -> Option<Self> {
        match command {
            Command::RotateBlock { .. } => Some(Self::Rotate),
            Command::DestroyNearest { .. } => Some(Self::Destroy),
            Command::PlaceBomb { .. } => Some(Self::Bomb),
            Command::PlaceWildcard { .. } => Some(Self::Wildcard),
            _ => None,
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Rotate => 0,
            Self::Destroy => 1,
            Self::Bomb => 2,
            Self::Wildcard => 3,
        }
    }
}

/// Rules of a play session layered on top of the game configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Uses of each tool granted at the start of a game.
    pub tool_stock: u32,
    /// Whether tools may be used without limit.
    pub unlimited_tools: bool,
    /// Length of the challenge countdown, if challenge mode is on.
    pub challenge: Option<Duration>,
}

impl SessionConfig {
    /// Copy of the configuration with the default challenge countdown enabled.
    #[must_use]
    pub const fn challenge_mode(mut self) -> Self {
        self.challenge = Some(DEFAULT_CHALLENGE);
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tool_stock: DEFAULT_TOOL_STOCK,
            unlimited_tools: false,
            challenge: None,
        }
    }
}

/// Reason a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameOver {
    /// The board is full and no block can slide.
    Stalled,
    /// The challenge countdown reached zero.
    TimeUp,
}

/// Reasons the session refuses to forward an intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Refusal {
    /// The game has ended.
    #[error("the game is over ({0:?})")]
    GameOver(GameOver),
    /// The tool has no uses left.
    #[error("no {0:?} uses left")]
    OutOfStock(Tool),
}

/// Score, inventory and clock of one play session.
#[derive(Clone, Debug)]
pub struct Session {
    config: SessionConfig,
    score: u32,
    stock: [u32; 4],
    remaining: Option<Duration>,
    game_over: Option<GameOver>,
}

impl Session {
    /// Creates a session ready for its first game.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            score: 0,
            stock: [config.tool_stock; 4],
            remaining: config.challenge,
            game_over: None,
        }
    }

    /// Rules the session was created with.
    #[must_use]
    pub const fn config(&self) -> SessionConfig {
        self.config
    }

    /// Points accumulated in the current game.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Uses left of `tool`, or `None` when tools are unlimited.
    #[must_use]
    pub const fn stock(&self, tool: Tool) -> Option<u32> {
        if self.config.unlimited_tools {
            None
        } else {
            Some(self.stock[tool.slot()])
        }
    }

    /// Time left on the challenge countdown.
    #[must_use]
    pub const fn remaining(&self) -> Option<Duration> {
        self.remaining
    }

    /// Reason the current game ended, if it has.
    #[must_use]
    pub const fn game_over(&self) -> Option<GameOver> {
        self.game_over
    }

    /// Reports whether `tool` has a use left.
    #[must_use]
    pub const fn can_use(&self, tool: Tool) -> bool {
        match self.stock(tool) {
            None => true,
            Some(left) => left > 0,
        }
    }

    /// Checks whether `command` may be forwarded to the world.
    ///
    /// Clock, lifecycle and editor commands are always admitted.
    pub fn admit(&self, command: &Command) -> Result<(), Refusal> {
        match command {
            Command::NewGame { .. }
            | Command::LoadBoard { .. }
            | Command::Tick { .. }
            | Command::PurgeMarked
            | Command::PaintCell { .. } => return Ok(()),
            _ => {}
        }

        if let Some(reason) = self.game_over {
            return Err(Refusal::GameOver(reason));
        }
        match Tool::for_command(command) {
            Some(tool) if !self.can_use(tool) => Err(Refusal::OutOfStock(tool)),
            _ => Ok(()),
        }
    }

    /// Folds world events into the session.
    ///
    /// `settled` tells whether the world has no pending activation or purge;
    /// a full board only counts as stalled once nothing else can change it.
    pub fn handle(&mut self, events: &[Event], board: &Board, settled: bool) {
        for event in events {
            match event {
                Event::BoardGenerated { .. } | Event::BoardLoaded { .. } => self.reset(),
                Event::TimeAdvanced { dt } => self.count_down(*dt),
                Event::BlockRotated { .. } => self.consume(Tool::Rotate),
                Event::BlockPlaced { kind, .. } => self.consume(match kind {
                    ActivationKind::Bomb => Tool::Bomb,
                    ActivationKind::Wildcard => Tool::Wildcard,
                }),
                Event::CellsDestroyed { cause, score, .. } => {
                    self.score = self.score.saturating_add(*score);
                    if *cause == Cause::Destroy {
                        self.consume(Tool::Destroy);
                    }
                }
                _ => {}
            }
        }

        if self.game_over.is_none() && settled && is_stalled(board) {
            self.end(GameOver::Stalled);
        }
    }

    fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    fn consume(&mut self, tool: Tool) {
        if self.config.unlimited_tools {
            return;
        }
        let left = &mut self.stock[tool.slot()];
        *left = left.saturating_sub(1);
    }

    fn count_down(&mut self, dt: Duration) {
        if self.game_over.is_some() {
            return;
        }
        let Some(remaining) = self.remaining.as_mut() else {
            return;
        };
        *remaining = remaining.saturating_sub(dt);
        if remaining.is_zero() {
            self.end(GameOver::TimeUp);
        }
    }

    fn end(&mut self, reason: GameOver) {
        log::debug!("game over ({reason:?}) with score {}", self.score);
        self.game_over = Some(reason);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
