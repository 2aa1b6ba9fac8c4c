#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that deals Hex Cascade boards and replays intent scripts.

mod board_transfer;
mod logger;
mod render;
mod script;
mod settings;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use board_transfer::BoardSnapshot;
use clap::{Args, Parser, Subcommand, ValueEnum};
use hex_cascade_core::{Command, Difficulty, Event, GameConfig};
use hex_cascade_system_session::{Session, SessionConfig, Tool};
use hex_cascade_world::{self as world, query, World};
use rand::Rng;
use settings::{Overrides, Settings};

/// Hex Cascade: slide coloured blocks into groups of three on a hex board.
#[derive(Debug, Parser)]
#[command(name = "hex-cascade", version, about, long_about = None)]
struct Cli {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// TOML settings file; flags override its values
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Deal a board and print it together with its snapshot string
    Generate {
        #[command(flatten)]
        game: GameArgs,
    },
    /// Replay an intent script against a dealt or imported board
    Play {
        #[command(flatten)]
        game: GameArgs,

        /// Script with one intent per line
        script: PathBuf,

        /// Start from a snapshot string instead of dealing a board
        #[arg(long, value_name = "SNAPSHOT")]
        board: Option<String>,
    },
}

#[derive(Debug, Args)]
struct GameArgs {
    /// Cells per side of the square board
    #[arg(long)]
    size: Option<u32>,

    /// Difficulty tier selecting the colour count
    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Play against the challenge countdown
    #[arg(long)]
    challenge: bool,

    /// Never run out of tools
    #[arg(long)]
    unlimited_tools: bool,

    /// Clear groups of four or more without promoting a special block
    #[arg(long)]
    no_special_blocks: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Self::Easy,
            DifficultyArg::Medium => Self::Medium,
            DifficultyArg::Hard => Self::Hard,
        }
    }
}

impl GameArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            size: self.size,
            difficulty: self.difficulty.map(Difficulty::from),
            seed: self.seed,
            challenge: self.challenge,
            unlimited_tools: self.unlimited_tools,
            no_special_blocks: self.no_special_blocks,
        }
    }
}

/// Entry point for the Hex Cascade command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(level) = cli.verbose.log_level() {
        logger::init_with_level(level).map_err(|error| anyhow!("failed to install logger: {error}"))?;
    }

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    match cli.mode {
        Mode::Generate { game } => {
            let (config, session) = resolve(&settings, &game)?;
            generate(config, session)
        }
        Mode::Play {
            game,
            script,
            board,
        } => {
            let (config, session) = resolve(&settings, &game)?;
            play(config, session, &script, board.as_deref())
        }
    }
}

fn resolve(settings: &Settings, game: &GameArgs) -> Result<(GameConfig, SessionConfig)> {
    let fallback_seed = rand::thread_rng().gen();
    let (config, session) = settings.resolve(game.overrides(), fallback_seed)?;
    log::info!("seed: {}", config.seed());
    Ok((config, session))
}

fn generate(config: GameConfig, session_config: SessionConfig) -> Result<()> {
    let mut world = World::new();
    let mut session = Session::new(session_config);
    let mut events = Vec::new();
    world::apply(&mut world, Command::NewGame { config }, &mut events);
    session.handle(&events, query::board(&world), query::is_settled(&world));

    print_events(None, &events);
    print_summary(&world, &session)
}

fn play(
    config: GameConfig,
    session_config: SessionConfig,
    script_path: &Path,
    snapshot: Option<&str>,
) -> Result<()> {
    let source = fs::read_to_string(script_path)
        .with_context(|| format!("failed to read script {}", script_path.display()))?;
    let steps = script::parse(&source)
        .with_context(|| format!("invalid script {}", script_path.display()))?;

    let mut world = World::new();
    let mut session = Session::new(session_config);
    let mut events = Vec::new();
    world::apply(&mut world, Command::NewGame { config }, &mut events);
    if let Some(encoded) = snapshot {
        let board = BoardSnapshot::decode(encoded)
            .and_then(BoardSnapshot::into_board)
            .context("failed to import board snapshot")?;
        world::apply(&mut world, Command::LoadBoard { board }, &mut events);
    }
    session.handle(&events, query::board(&world), query::is_settled(&world));
    print_events(None, &events);

    for step in steps {
        if let Err(refusal) = session.admit(&step.command) {
            println!("line {}: refused: {refusal}", step.line);
            continue;
        }
        events.clear();
        world::apply(&mut world, step.command, &mut events);
        session.handle(&events, query::board(&world), query::is_settled(&world));
        print_events(Some(step.line), &events);
    }

    print_summary(&world, &session)
}

fn print_events(line: Option<usize>, events: &[Event]) {
    for event in events {
        match line {
            Some(line) => println!("line {line}: {}", render::event(event)),
            None => println!("{}", render::event(event)),
        }
    }
}

fn print_summary(world: &World, session: &Session) -> Result<()> {
    println!("clock: {}ms", query::clock(world).as_millis());
    println!("score: {}", session.score());
    let stock: Vec<String> = Tool::ALL
        .iter()
        .map(|tool| {
            let name = format!("{tool:?}").to_lowercase();
            match session.stock(*tool) {
                Some(left) => format!("{name} {left}"),
                None => format!("{name} unlimited"),
            }
        })
        .collect();
    println!("tools: {}", stock.join(", "));
    if let Some(remaining) = session.remaining() {
        println!("time left: {}ms", remaining.as_millis());
    }
    if let Some(reason) = session.game_over() {
        println!("game over: {reason:?}");
    }

    let board = query::board(world);
    print!("{}", render::board(board));
    println!("legend: {}", render::legend(board));
    let snapshot = BoardSnapshot::capture(board)
        .encode()
        .context("failed to encode board snapshot")?;
    println!("snapshot: {snapshot}");
    Ok(())
}
