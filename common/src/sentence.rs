use std::collections::HashSet;
use std::fmt;
use std::ops::Sub;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::cell::Cell;

/// A logical statement about the board: exactly `count` of `cells` are mines.
///
/// The engine keeps `count <= cells.len()` by removing classified cells as
/// soon as they are known. Equality is structural, cell order is irrelevant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    cells: HashSet<Cell>,
    count: usize,
}

impl Sentence {
    /// Builds a sentence from its own copy of `cells`. No validation is done,
    /// the caller guarantees `count <= |cells|`.
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: usize) -> Self {
        Sentence {
            cells: cells.into_iter().collect(),
            count,
        }
    }

    pub fn cells(&self) -> &HashSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }

    /// Every remaining cell when the count covers all of them.
    ///
    /// An empty sentence with count zero yields nothing: it carries no information.
    pub fn known_mines(&self) -> HashSet<Cell> {
        if self.count != 0 && self.count == self.cells.len() {
            self.cells.clone()
        } else {
            HashSet::new()
        }
    }

    /// Every remaining cell when the count is zero.
    pub fn known_safes(&self) -> HashSet<Cell> {
        if self.count == 0 && !self.cells.is_empty() {
            self.cells.clone()
        } else {
            HashSet::new()
        }
    }

    /// Drops `cell` and one mine from the count, if `cell` is part of the sentence.
    pub fn mark_mine(&mut self, cell: Cell) {
        if self.cells.remove(&cell) {
            self.count = self.count.saturating_sub(1);
        }
    }

    /// Drops `cell` without touching the count, if `cell` is part of the sentence.
    pub fn mark_safe(&mut self, cell: Cell) {
        self.cells.remove(&cell);
    }

    /// Removes known mines, decrementing the count by the size of the overlap.
    pub(crate) fn subtract_mines(&mut self, mines: &HashSet<Cell>) {
        let before = self.cells.len();
        self.cells.retain(|cell| !mines.contains(cell));
        self.count = self.count.saturating_sub(before - self.cells.len());
    }

    /// Removes cells whose status is already resolved as non-mine.
    pub(crate) fn discard(&mut self, resolved: &HashSet<Cell>) {
        self.cells.retain(|cell| !resolved.contains(cell));
    }

    /// True if every cell of `self` is also in `other`, and `other` has more.
    pub fn is_proper_subset(&self, other: &Sentence) -> bool {
        self.cells.len() < other.cells.len() && self.cells.is_subset(&other.cells)
    }
}

/// `{B} = n` minus `{A} = m` with `A ⊆ B` is `{B - A} = n - m`.
impl Sub for &Sentence {
    type Output = Sentence;

    fn sub(self, rhs: &Sentence) -> Sentence {
        Sentence {
            cells: &self.cells - &rhs.cells,
            count: self.count.saturating_sub(rhs.count),
        }
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}} = {}", self.cells.iter().sorted().join(", "), self.count)
    }
}
