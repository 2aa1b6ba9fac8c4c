//! Optional TOML settings file merged underneath the command-line flags.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use hex_cascade_core::{Difficulty, GameConfig, Timing};
use hex_cascade_system_session::{SessionConfig, DEFAULT_CHALLENGE};
use serde::Deserialize;

/// Board side used when neither a flag nor the settings file names one.
pub(crate) const DEFAULT_SIZE: u32 = 10;

/// Values read from a settings file. Absent keys fall back to flags or defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    size: Option<u32>,
    difficulty: Option<Difficulty>,
    seed: Option<u64>,
    challenge: Option<bool>,
    challenge_seconds: Option<u64>,
    unlimited_tools: Option<bool>,
    special_blocks: Option<bool>,
    tool_stock: Option<u32>,
    purge_grace_ms: Option<u64>,
    activation_delay_ms: Option<u64>,
}

/// Game options given on the command line. Switches only override when set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
    pub(crate) size: Option<u32>,
    pub(crate) difficulty: Option<Difficulty>,
    pub(crate) seed: Option<u64>,
    pub(crate) challenge: bool,
    pub(crate) unlimited_tools: bool,
    pub(crate) no_special_blocks: bool,
}

impl Settings {
    /// Reads and parses the settings file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse settings file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("settings are not valid TOML")
    }

    /// Merges `overrides` on top of the file values. `fallback_seed` is used
    /// when no seed is given anywhere.
    pub(crate) fn resolve(
        &self,
        overrides: Overrides,
        fallback_seed: u64,
    ) -> Result<(GameConfig, SessionConfig)> {
        let size = overrides.size.or(self.size).unwrap_or(DEFAULT_SIZE);
        let difficulty = overrides
            .difficulty
            .or(self.difficulty)
            .unwrap_or_default();
        let seed = overrides.seed.or(self.seed).unwrap_or(fallback_seed);
        let special_blocks = !overrides.no_special_blocks && self.special_blocks.unwrap_or(true);

        let defaults = Timing::default();
        let timing = Timing {
            purge_grace: self
                .purge_grace_ms
                .map_or(defaults.purge_grace, Duration::from_millis),
            activation_delay: self
                .activation_delay_ms
                .map_or(defaults.activation_delay, Duration::from_millis),
        };

        let game = GameConfig::square(size, difficulty, seed)
            .with_context(|| format!("board size {size} is not supported"))?
            .with_special_blocks(special_blocks)
            .with_timing(timing);

        let mut session = SessionConfig {
            unlimited_tools: overrides.unlimited_tools || self.unlimited_tools.unwrap_or(false),
            ..SessionConfig::default()
        };
        if let Some(stock) = self.tool_stock {
            session.tool_stock = stock;
        }
        if overrides.challenge || self.challenge.unwrap_or(false) {
            session.challenge = Some(
                self.challenge_seconds
                    .map_or(DEFAULT_CHALLENGE, Duration::from_secs),
            );
        }

        Ok((game, session))
    }
}
