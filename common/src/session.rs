use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::cell::Cell;
use crate::knowledge::{Deductions, EngineConfig, MinesweeperAi};
use crate::select::{Move, Random, Selector};

/// Represents the current state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Playing,
    /// Every non-mine cell was probed and every mine flagged.
    Won,
    /// A random move landed on this mine.
    Lost(Cell),
    /// The player has no move left but the board is not cleared. Only
    /// reachable when the board reports counts inconsistent with its mines.
    Exhausted,
}

/// The result of one call to [`Session::step`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Turn {
    Probed {
        play: Move,
        count: usize,
        deductions: Deductions,
    },
    Detonated(Move),
}

impl Turn {
    pub fn play(&self) -> Move {
        match self {
            Turn::Probed { play, .. } | Turn::Detonated(play) => *play,
        }
    }
}

/// One board driven by one player until the game ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    board: Board,
    ai: MinesweeperAi,
    /// Probed cells and the neighbor counts the board reported for them.
    revealed: BTreeMap<Cell, usize>,
    state: GameState,
    /// Seeds the guesses made by [`Session::advance`].
    seed: Option<u64>,
}

impl Session {
    pub fn new(board: Board, config: EngineConfig) -> Self {
        let ai = MinesweeperAi::with_config(board.grid(), config);
        Session {
            board,
            ai,
            revealed: BTreeMap::new(),
            state: GameState::Playing,
            seed: None,
        }
    }

    /// Makes [`Session::advance`] reproducible: guesses are drawn from an RNG
    /// seeded with `seed` and the number of cells probed so far.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Deserializes a session from bytes.
    pub fn deserialize(bytes: &[u8]) -> anyhow::Result<Self> {
        Ok(bcs::from_bytes(bytes)?)
    }

    /// Serializes the session to bytes.
    pub fn serialize(&self) -> anyhow::Result<Vec<u8>> {
        Ok(bcs::to_bytes(self)?)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn ai(&self) -> &MinesweeperAi {
        &self.ai
    }

    pub fn revealed(&self) -> &BTreeMap<Cell, usize> {
        &self.revealed
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Plays one move: a known-safe cell if there is one, a random cell otherwise.
    ///
    /// Returns `None` without doing anything once the game is over.
    pub fn step<S: Selector + ?Sized>(&mut self, selector: &mut S) -> Option<Turn> {
        if self.state != GameState::Playing {
            return None;
        }

        let Some(play) = self.ai.next_move(selector) else {
            self.state = GameState::Exhausted;
            return None;
        };
        let cell = play.cell();

        if self.board.is_mine(cell) {
            self.state = GameState::Lost(cell);
            return Some(Turn::Detonated(play));
        }

        let count = self.board.nearby_mines(cell);
        let deductions = self.ai.add_knowledge(cell, count);
        self.revealed.insert(cell, count);

        if self.is_cleared() {
            self.flag_remaining();
            debug_assert!(self.board.won());
            self.state = GameState::Won;
        }

        Some(Turn::Probed {
            play,
            count,
            deductions,
        })
    }

    /// Steps until the game ends or `max_moves` turns were played.
    pub fn play<S: Selector + ?Sized>(
        &mut self,
        selector: &mut S,
        max_moves: Option<usize>,
    ) -> GameState {
        let mut moves = 0;
        while max_moves.is_none_or(|max| moves < max) && self.step(selector).is_some() {
            moves += 1;
        }
        self.state
    }

    /// Plays one move without a caller-provided selector, for callers that
    /// only keep the serialized session between moves.
    ///
    /// Seeded sessions replay identically; unseeded ones guess with `rand::rng()`.
    pub fn advance(&mut self) -> Option<Turn> {
        match self.seed {
            Some(seed) => {
                let rng = StdRng::seed_from_u64(seed.wrapping_add(self.revealed.len() as u64));
                self.step(&mut Random(rng))
            }
            None => self.step(&mut Random(rand::rng())),
        }
    }

    /// All non-mine cells have been probed.
    fn is_cleared(&self) -> bool {
        self.revealed.len() + self.board.mine_count() == self.board.grid().area()
    }

    /// Once the board is cleared every unprobed cell is a mine.
    fn flag_remaining(&mut self) {
        let unprobed: Vec<Cell> = self
            .board
            .grid()
            .cells()
            .filter(|cell| !self.revealed.contains_key(cell))
            .collect();
        for cell in unprobed {
            self.board.flag(cell);
        }
    }
}
