use std::collections::HashSet;
use std::fmt;

use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

use crate::cell::{Cell, Grid};
use crate::error::{MinesweeperError, Result};

/// Ground truth for one game: where the mines are, and which ones were flagged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    grid: Grid,
    mines: HashSet<Cell>,
    mines_found: HashSet<Cell>,
}

impl Board {
    /// Places exactly `mines` mines uniformly at random.
    pub fn new<R: Rng + ?Sized>(grid: Grid, mines: usize, rng: &mut R) -> Result<Self> {
        Self::check_grid(grid)?;
        if mines > grid.area() {
            return Err(MinesweeperError::TooManyMines {
                height: grid.height,
                width: grid.width,
                area: grid.area(),
                requested: mines,
            });
        }

        let mines = index::sample(rng, grid.area(), mines)
            .into_iter()
            .map(|i| Cell::new(i / grid.width, i % grid.width))
            .collect();

        Ok(Board {
            grid,
            mines,
            mines_found: HashSet::new(),
        })
    }

    /// Board with a fixed mine layout.
    pub fn with_mines(grid: Grid, mines: impl IntoIterator<Item = Cell>) -> Result<Self> {
        Self::check_grid(grid)?;
        let mines: HashSet<Cell> = mines.into_iter().collect();
        if let Some(&outside) = mines.iter().find(|cell| !grid.contains(**cell)) {
            return Err(MinesweeperError::OutOfBounds(outside));
        }

        Ok(Board {
            grid,
            mines,
            mines_found: HashSet::new(),
        })
    }

    fn check_grid(grid: Grid) -> Result<()> {
        if grid.height == 0 || grid.width == 0 {
            return Err(MinesweeperError::EmptyGrid {
                height: grid.height,
                width: grid.width,
            });
        }
        Ok(())
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn mine_count(&self) -> usize {
        self.mines.len()
    }

    pub fn is_mine(&self, cell: Cell) -> bool {
        self.mines.contains(&cell)
    }

    /// Number of mines among the neighbors of `cell`, not counting `cell` itself.
    pub fn nearby_mines(&self, cell: Cell) -> usize {
        self.grid
            .neighbors(cell)
            .filter(|neighbor| self.is_mine(*neighbor))
            .count()
    }

    /// Records a flag on `cell`. Flags only count towards a win when they
    /// sit on actual mines.
    pub fn flag(&mut self, cell: Cell) {
        if self.is_mine(cell) {
            self.mines_found.insert(cell);
        }
    }

    pub fn mines_found(&self) -> &HashSet<Cell> {
        &self.mines_found
    }

    /// True once every mine has been flagged.
    pub fn won(&self) -> bool {
        self.mines_found == self.mines
    }
}

/// Where the mines are, one `|X|` per mine.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = format!("{}-", "--".repeat(self.grid.width));
        for row in 0..self.grid.height {
            writeln!(f, "{rule}")?;
            for col in 0..self.grid.width {
                let mark = if self.is_mine(Cell::new(row, col)) { 'X' } else { ' ' };
                write!(f, "|{mark}")?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{rule}")
    }
}
