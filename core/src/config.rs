//! Game configuration shared by the world, the generator and adapters.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Footprint, RowOffset, MAX_FOOTPRINT_SIDE};

/// Grace window between marking a block for removal and purging it.
pub const DEFAULT_PURGE_GRACE: Duration = Duration::from_millis(300);

/// Delay between placing a bomb or wildcard and resolving it.
pub const DEFAULT_ACTIVATION_DELAY: Duration = Duration::from_millis(500);

/// Difficulty tier selecting how many palette colours are dealt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Four colours.
    Easy,
    /// Six colours.
    #[default]
    Medium,
    /// Ten colours.
    Hard,
}

impl Difficulty {
    /// Number of palette colours requested by the tier.
    #[must_use]
    pub const fn color_count(self) -> usize {
        match self {
            Self::Easy => 4,
            Self::Medium => 6,
            Self::Hard => 10,
        }
    }
}

/// Delays driving the world's scheduled effects, measured on the logical clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timing {
    /// Time a destroyed block stays on the board before it is purged.
    pub purge_grace: Duration,
    /// Time between placing a bomb or wildcard and its resolution.
    pub activation_delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            purge_grace: DEFAULT_PURGE_GRACE,
            activation_delay: DEFAULT_ACTIVATION_DELAY,
        }
    }
}

/// Errors raised while validating a [`GameConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A footprint side is zero or larger than [`MAX_FOOTPRINT_SIDE`].
    #[error("footprint {width}x{height} is outside the supported range 1..={MAX_FOOTPRINT_SIDE}")]
    InvalidFootprint {
        /// Requested number of cells per row.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
}

/// Everything required to deal and run a fresh game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    footprint: Footprint,
    difficulty: Difficulty,
    seed: u64,
    special_blocks: bool,
    timing: Timing,
}

impl GameConfig {
    /// Validates the footprint and creates a configuration with default rules.
    pub fn new(footprint: Footprint, difficulty: Difficulty, seed: u64) -> Result<Self, ConfigError> {
        let valid_side = |side: u32| (1..=MAX_FOOTPRINT_SIDE).contains(&side);
        if !valid_side(footprint.width()) || !valid_side(footprint.height()) {
            return Err(ConfigError::InvalidFootprint {
                width: footprint.width(),
                height: footprint.height(),
            });
        }

        Ok(Self {
            footprint,
            difficulty,
            seed,
            special_blocks: true,
            timing: Timing::default(),
        })
    }

    /// Square board of the given side length.
    pub fn square(side: u32, difficulty: Difficulty, seed: u64) -> Result<Self, ConfigError> {
        Self::new(
            Footprint::with_offset(side, side, RowOffset::Odd),
            difficulty,
            seed,
        )
    }

    /// Enables or disables promotion of large matches into special blocks.
    #[must_use]
    pub const fn with_special_blocks(mut self, enabled: bool) -> Self {
        self.special_blocks = enabled;
        self
    }

    /// Replaces the scheduled-effect delays.
    #[must_use]
    pub const fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Footprint of the board.
    #[must_use]
    pub const fn footprint(&self) -> Footprint {
        self.footprint
    }

    /// Difficulty tier used to pick colours.
    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Seed feeding the board generator.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether matches of four or more promote their trigger block.
    #[must_use]
    pub const fn special_blocks(&self) -> bool {
        self.special_blocks
    }

    /// Delays driving scheduled effects.
    #[must_use]
    pub const fn timing(&self) -> Timing {
        self.timing
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            footprint: Footprint::default(),
            difficulty: Difficulty::default(),
            seed: 0,
            special_blocks: true,
            timing: Timing::default(),
        }
    }
}
