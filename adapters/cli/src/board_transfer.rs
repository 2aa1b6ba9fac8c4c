//! Single-line board snapshots for sharing layouts between runs.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use hex_cascade_core::{Block, Board, BoardError, CellKey, Footprint, RowOffset, MAX_FOOTPRINT_SIDE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "hexcascade";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "hexcascade:v1";
/// Delimiter used to separate the prefix, board dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Snapshot of every occupied cell together with the board footprint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BoardSnapshot {
    width: u32,
    height: u32,
    offset: RowOffset,
    cells: Vec<SnapshotCell>,
}

impl BoardSnapshot {
    /// Captures the occupied cells of `board`.
    #[must_use]
    pub(crate) fn capture(board: &Board) -> Self {
        let footprint = board.footprint();
        Self {
            width: footprint.width(),
            height: footprint.height(),
            offset: footprint.offset(),
            cells: board
                .iter()
                .map(|(cell, block)| SnapshotCell {
                    key: cell.key(),
                    block: *block,
                })
                .collect(),
        }
    }

    /// Rebuilds the board described by the snapshot.
    pub(crate) fn into_board(self) -> Result<Board, BoardTransferError> {
        let footprint = Footprint::with_offset(self.width, self.height, self.offset);
        let mut board = Board::empty(footprint);
        for cell in self.cells {
            let _ = board.place(cell.key.coord(), cell.block)?;
        }
        Ok(board)
    }

    /// Encodes the snapshot into a single-line string suitable for clipboard transfer.
    pub(crate) fn encode(&self) -> Result<String, BoardTransferError> {
        let payload = SerializableSnapshot {
            offset: self.offset,
            cells: self.cells.clone(),
        };
        let json = serde_json::to_vec(&payload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{SNAPSHOT_HEADER}:{}x{}:{encoded}",
            self.width, self.height
        ))
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, BoardTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(BoardTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(BoardTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(BoardTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(BoardTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(BoardTransferError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(BoardTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(BoardTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (width, height) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
        let decoded: SerializableSnapshot = serde_json::from_slice(&bytes)?;

        Ok(Self {
            width,
            height,
            offset: decoded.offset,
            cells: decoded.cells,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct SnapshotCell {
    key: CellKey,
    block: Block,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct SerializableSnapshot {
    offset: RowOffset,
    cells: Vec<SnapshotCell>,
}

/// Errors that can occur while encoding or decoding board transfer strings.
#[derive(Debug, Error)]
pub(crate) enum BoardTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("board snapshot was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded snapshot.
    #[error("board string is missing the prefix")]
    MissingPrefix,
    /// The encoded snapshot did not contain a version segment.
    #[error("board string is missing the version")]
    MissingVersion,
    /// The encoded snapshot did not include board dimensions.
    #[error("board string is missing the board dimensions")]
    MissingDimensions,
    /// The encoded snapshot did not include the payload segment.
    #[error("board string is missing the payload")]
    MissingPayload,
    /// The encoded snapshot used an unexpected prefix segment.
    #[error("board prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    #[error("board version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The board dimensions could not be parsed or fall outside the supported range.
    #[error("could not parse board dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode board payload: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    #[error("could not process board payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    /// A snapshot cell lies outside the declared footprint.
    #[error(transparent)]
    CellOutOfBounds(#[from] BoardError),
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), BoardTransferError> {
    let invalid = || BoardTransferError::InvalidDimensions(dimensions.to_owned());
    let (width, height) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
    let height = height.trim().parse::<u32>().map_err(|_| invalid())?;

    let supported = 1..=MAX_FOOTPRINT_SIDE;
    if !supported.contains(&width) || !supported.contains(&height) {
        return Err(invalid());
    }

    Ok((width, height))
}
