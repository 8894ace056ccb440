use std::path::PathBuf;

use crate::game::MoveError;

/// Errors raised by board construction and placement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("column {column} is outside the board (width {width})")]
    OutOfRange { column: usize, width: usize },

    #[error("column {column} is full")]
    InvalidMove { column: usize },

    #[error("board must be square, got {width}x{height}")]
    NonSquareBoard { width: usize, height: usize },

    #[error("invalid cell '{found}' at ({x}, {y}), expected 0, 1 or 2")]
    InvalidCell { found: char, x: usize, y: usize },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
}

/// Errors that can occur while playing an agent-vs-agent match.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("{agent} selected illegal column {column}: {source}")]
    IllegalMove {
        agent: String,
        column: usize,
        source: MoveError,
    },

    #[error("{agent} returned no move on a live game (legal: {legal:?})")]
    NoMove { agent: String, legal: Vec<usize> },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
