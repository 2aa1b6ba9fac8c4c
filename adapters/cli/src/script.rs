//! Line-oriented intent scripts replayed by the `play` subcommand.
//!
//! One command per line, `#` starts a comment:
//!
//! ```text
//! move 2 1 2 0
//! rotate 0 0
//! destroy 1 1
//! bomb 3 2
//! wildcard 0 4
//! paint 1 0 3 e      # colour 3 sliding east
//! paint 1 0 stone
//! paint 1 0 erase
//! tick 300
//! purge
//! ```

use std::time::Duration;

use hex_cascade_core::{Brush, ColorId, Command, Direction, HexCoord};
use thiserror::Error;

/// A parsed script command together with its 1-based source line.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Step {
    pub(crate) line: usize,
    pub(crate) command: Command,
}

/// Errors raised while parsing a script.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ScriptError {
    /// The line starts with a word that is not a known command.
    #[error("line {line}: unknown command '{word}'")]
    UnknownCommand {
        /// Offending line.
        line: usize,
        /// First word of the line.
        word: String,
    },
    /// The command received the wrong number of arguments.
    #[error("line {line}: '{command}' expects {expected} arguments, found {found}")]
    Arity {
        /// Offending line.
        line: usize,
        /// Command name.
        command: &'static str,
        /// Number of arguments the command takes.
        expected: &'static str,
        /// Number of arguments given.
        found: usize,
    },
    /// An argument could not be parsed.
    #[error("line {line}: invalid {what} '{value}'")]
    InvalidArgument {
        /// Offending line.
        line: usize,
        /// Kind of argument expected.
        what: &'static str,
        /// Text that failed to parse.
        value: String,
    },
}

/// Parses a whole script, stopping at the first malformed line.
pub(crate) fn parse(source: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = raw.split('#').next().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }
        let words: Vec<&str> = text.split_whitespace().collect();
        let command = parse_words(line, &words)?;
        steps.push(Step { line, command });
    }
    Ok(steps)
}

fn parse_words(line: usize, words: &[&str]) -> Result<Command, ScriptError> {
    let (name, args) = match words.split_first() {
        Some((name, args)) => (*name, args),
        None => {
            return Err(ScriptError::UnknownCommand {
                line,
                word: String::new(),
            })
        }
    };
    let arity = |command: &'static str, expected: &'static str| ScriptError::Arity {
        line,
        command,
        expected,
        found: args.len(),
    };

    match name {
        "move" => match args {
            [fq, fr, tq, tr] => Ok(Command::MoveBlock {
                from: cell(line, fq, fr)?,
                to: cell(line, tq, tr)?,
            }),
            _ => Err(arity("move", "4")),
        },
        "rotate" => cell_command(line, "rotate", args, |cell| Command::RotateBlock { cell }),
        "destroy" => cell_command(line, "destroy", args, |cell| Command::DestroyNearest { cell }),
        "bomb" => cell_command(line, "bomb", args, |cell| Command::PlaceBomb { cell }),
        "wildcard" => cell_command(line, "wildcard", args, |cell| Command::PlaceWildcard { cell }),
        "paint" => match args {
            [q, r, "erase"] => Ok(Command::PaintCell {
                cell: cell(line, q, r)?,
                brush: None,
            }),
            [q, r, "stone"] => Ok(Command::PaintCell {
                cell: cell(line, q, r)?,
                brush: Some(Brush::Stone),
            }),
            [q, r, "wildcard"] => Ok(Command::PaintCell {
                cell: cell(line, q, r)?,
                brush: Some(Brush::Wildcard),
            }),
            [q, r, color, direction] => Ok(Command::PaintCell {
                cell: cell(line, q, r)?,
                brush: Some(Brush::Block {
                    color: parse_color(line, color)?,
                    direction: parse_direction(line, direction)?,
                }),
            }),
            _ => Err(arity("paint", "3 or 4")),
        },
        "tick" => match args {
            [millis] => Ok(Command::Tick {
                dt: Duration::from_millis(number(line, "duration", millis)?),
            }),
            _ => Err(arity("tick", "1")),
        },
        "purge" => match args {
            [] => Ok(Command::PurgeMarked),
            _ => Err(arity("purge", "0")),
        },
        other => Err(ScriptError::UnknownCommand {
            line,
            word: other.to_owned(),
        }),
    }
}

fn cell_command(
    line: usize,
    name: &'static str,
    args: &[&str],
    build: impl FnOnce(HexCoord) -> Command,
) -> Result<Command, ScriptError> {
    match args {
        [q, r] => Ok(build(cell(line, q, r)?)),
        _ => Err(ScriptError::Arity {
            line,
            command: name,
            expected: "2",
            found: args.len(),
        }),
    }
}

fn cell(line: usize, q: &str, r: &str) -> Result<HexCoord, ScriptError> {
    Ok(HexCoord::new(
        number(line, "coordinate", q)?,
        number(line, "coordinate", r)?,
    ))
}

fn number<T: std::str::FromStr>(
    line: usize,
    what: &'static str,
    value: &str,
) -> Result<T, ScriptError> {
    value.parse().map_err(|_| ScriptError::InvalidArgument {
        line,
        what,
        value: value.to_owned(),
    })
}

fn parse_color(line: usize, value: &str) -> Result<ColorId, ScriptError> {
    number::<u8>(line, "colour", value)
        .ok()
        .and_then(ColorId::new)
        .ok_or_else(|| ScriptError::InvalidArgument {
            line,
            what: "colour",
            value: value.to_owned(),
        })
}

fn parse_direction(line: usize, value: &str) -> Result<Direction, ScriptError> {
    match value {
        "e" | "east" => Ok(Direction::East),
        "sw" | "southwest" => Ok(Direction::SouthWest),
        "nw" | "northwest" => Ok(Direction::NorthWest),
        _ => Err(ScriptError::InvalidArgument {
            line,
            what: "direction",
            value: value.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_command_and_skips_comments() {
        let steps = parse(
            "# warm-up\n\
             move 2 1 2 0\n\
             \n\
             rotate 0 0   # spin it\n\
             destroy 1 1\n\
             bomb -1 2\n\
             wildcard 0 3\n\
             paint 1 0 3 sw\n\
             paint 1 1 stone\n\
             paint 1 2 wildcard\n\
             paint 0 0 erase\n\
             tick 300\n\
             purge\n",
        )
        .expect("script parses");

        let lines: Vec<usize> = steps.iter().map(|step| step.line).collect();
        assert_eq!(lines, vec![2, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13]);

        assert_eq!(
            steps[0].command,
            Command::MoveBlock {
                from: HexCoord::new(2, 1),
                to: HexCoord::new(2, 0),
            }
        );
        assert_eq!(steps[3].command, Command::PlaceBomb { cell: HexCoord::new(-1, 2) });
        assert_eq!(
            steps[5].command,
            Command::PaintCell {
                cell: HexCoord::new(1, 0),
                brush: Some(Brush::Block {
                    color: ColorId::new(3).expect("palette colour"),
                    direction: Direction::SouthWest,
                }),
            }
        );
        assert_eq!(
            steps[8].command,
            Command::PaintCell {
                cell: HexCoord::new(0, 0),
                brush: None,
            }
        );
        assert_eq!(
            steps[9].command,
            Command::Tick {
                dt: Duration::from_millis(300)
            }
        );
        assert_eq!(steps[10].command, Command::PurgeMarked);
    }

    #[test]
    fn reports_the_offending_line() {
        assert_eq!(
            parse("purge\njump 1 1"),
            Err(ScriptError::UnknownCommand {
                line: 2,
                word: "jump".to_owned(),
            })
        );
        assert_eq!(
            parse("rotate 1"),
            Err(ScriptError::Arity {
                line: 1,
                command: "rotate",
                expected: "2",
                found: 1,
            })
        );
        assert_eq!(
            parse("wildcard 1 2 3"),
            Err(ScriptError::Arity {
                line: 1,
                command: "wildcard",
                expected: "2",
                found: 3,
            })
        );
        assert!(matches!(
            parse("paint 0 0 12 e"),
            Err(ScriptError::InvalidArgument { what: "colour", .. })
        ));
        assert!(matches!(
            parse("paint 0 0 1 north"),
            Err(ScriptError::InvalidArgument { what: "direction", .. })
        ));
        assert!(matches!(
            parse("tick -5"),
            Err(ScriptError::InvalidArgument { what: "duration", .. })
        ));
    }
}
