use std::collections::HashSet;

use itertools::Itertools;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::knowledge::MinesweeperAi;

/// Strategy for picking one cell out of a set of equally eligible candidates.
pub trait Selector {
    fn select(&mut self, candidates: &HashSet<Cell>) -> Option<Cell>;
}

impl<S: Selector + ?Sized> Selector for &mut S {
    fn select(&mut self, candidates: &HashSet<Cell>) -> Option<Cell> {
        (**self).select(candidates)
    }
}

impl<S: Selector + ?Sized> Selector for Box<S> {
    fn select(&mut self, candidates: &HashSet<Cell>) -> Option<Cell> {
        (**self).select(candidates)
    }
}

/// Whichever candidate the set yields first. No ordering guarantee.
#[derive(Debug, Clone, Copy, Default)]
pub struct Arbitrary;

impl Selector for Arbitrary {
    fn select(&mut self, candidates: &HashSet<Cell>) -> Option<Cell> {
        candidates.iter().next().copied()
    }
}

/// The smallest candidate in row-major order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lowest;

impl Selector for Lowest {
    fn select(&mut self, candidates: &HashSet<Cell>) -> Option<Cell> {
        candidates.iter().min().copied()
    }
}

/// A uniform choice among the candidates. Reproducible when `R` is seeded,
/// since candidates are sorted before sampling.
#[derive(Debug, Clone)]
pub struct Random<R>(pub R);

impl<R: Rng> Selector for Random<R> {
    fn select(&mut self, candidates: &HashSet<Cell>) -> Option<Cell> {
        let sorted: Vec<Cell> = candidates.iter().copied().sorted_unstable().collect();
        sorted.choose(&mut self.0).copied()
    }
}

/// A proposed probe, tagged with how it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    /// Proven not to be a mine.
    Safe(Cell),
    /// Status unknown; chosen because no safe move was known.
    Random(Cell),
}

impl Move {
    pub fn cell(&self) -> Cell {
        match *self {
            Move::Safe(cell) | Move::Random(cell) => cell,
        }
    }

    pub fn is_safe(&self) -> bool {
        matches!(self, Move::Safe(_))
    }
}

impl MinesweeperAi {
    /// Cells known to be safe that have not been probed yet.
    pub fn safe_candidates(&self) -> HashSet<Cell> {
        self.safes
            .iter()
            .filter(|cell| !self.moves_made.contains(cell) && !self.mines.contains(cell))
            .copied()
            .collect()
    }

    /// Cells neither probed nor known to be mines.
    pub fn random_candidates(&self) -> HashSet<Cell> {
        self.grid
            .cells()
            .filter(|cell| !self.moves_made.contains(cell) && !self.mines.contains(cell))
            .collect()
    }

    /// A known-safe cell that has not been probed, or `None` if there is none.
    pub fn make_safe_move(&self) -> Option<Cell> {
        self.make_safe_move_with(&mut Arbitrary)
    }

    pub fn make_safe_move_with<S: Selector + ?Sized>(&self, selector: &mut S) -> Option<Cell> {
        selector.select(&self.safe_candidates())
    }

    /// Any cell not yet probed and not known to be a mine, or `None` once the
    /// board is exhausted.
    pub fn make_random_move(&self) -> Option<Cell> {
        self.make_random_move_with(&mut Arbitrary)
    }

    pub fn make_random_move_with<S: Selector + ?Sized>(&self, selector: &mut S) -> Option<Cell> {
        selector.select(&self.random_candidates())
    }

    /// A safe move if one is known, a random move otherwise.
    pub fn next_move<S: Selector + ?Sized>(&self, selector: &mut S) -> Option<Move> {
        self.make_safe_move_with(selector)
            .map(Move::Safe)
            .or_else(|| self.make_random_move_with(selector).map(Move::Random))
    }
}
