//! Error types for the harness.

use std::io;
use std::path::PathBuf;

/// Failures that stop the harness rather than being counted as an outcome.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The solver binary is missing or could not be started. This invalidates
    /// the whole run.
    #[error("failed to launch solver `{}`: {source}", .program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid run configuration: {0}")]
    Config(String),

    #[error("failed while waiting on solver: {0}")]
    Wait(#[source] io::Error),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
}

impl HarnessError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        HarnessError::Io {
            path: path.into(),
            source,
        }
    }
}

/// A puzzle file that does not follow the format or is not self-consistent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleError {
    #[error("puzzle file is empty")]
    Empty,

    #[error("puzzle file has no grid rows")]
    MissingGrid,

    #[error("line {line}: expected {expected} columns, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}, column {column}: unknown cell {symbol:?}")]
    UnknownCell {
        line: usize,
        column: usize,
        symbol: char,
    },

    #[error("shape {0:?} occupies the grid but is not declared")]
    UndeclaredShape(char),

    #[error("shape {0:?} is declared but absent from the grid")]
    MissingShape(char),
}
