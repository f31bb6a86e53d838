//! An automated minesweeper player.
//!
//! Each probed cell reports how many of its neighbors are mines. The player
//! turns every report into a [`Sentence`] ("exactly `count` of these cells are
//! mines"), resolves its knowledge base into cells that are certainly safe or
//! certainly mines, and picks its next probe from the safe ones, guessing only
//! when nothing is proven.
//!
//! ```
//! use minesweeper_ai::{Cell, Grid, MinesweeperAi};
//!
//! let mut ai = MinesweeperAi::new(Grid::new(8, 8));
//! ai.add_knowledge(Cell::new(1, 1), 0);
//! assert!(ai.make_safe_move().is_some());
//! ```

pub mod board;
pub mod cell;
pub mod error;
pub mod knowledge;
pub mod select;
pub mod sentence;
pub mod session;

pub use board::Board;
pub use cell::{Cell, Grid};
pub use error::{MinesweeperError, Result};
pub use knowledge::{Deductions, EngineConfig, Inference, MinesweeperAi};
pub use select::{Arbitrary, Lowest, Move, Random, Selector};
pub use sentence::Sentence;
pub use session::{GameState, Session, Turn};
