use thiserror::Error;

use crate::cell::Cell;

/// Errors raised while setting up a board. The inference engine itself never fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MinesweeperError {
    #[error("a {height}x{width} board can hold at most {area} mines, requested {requested}")]
    TooManyMines {
        height: usize,
        width: usize,
        area: usize,
        requested: usize,
    },

    #[error("board dimensions must be non-zero, got {height}x{width}")]
    EmptyGrid { height: usize, width: usize },

    #[error("cell {0} lies outside the board")]
    OutOfBounds(Cell),

    #[error("could not parse cell from {0:?}, expected `row,col`")]
    InvalidCell(String),
}

/// Convenience Result type for board setup.
pub type Result<T> = std::result::Result<T, MinesweeperError>;
