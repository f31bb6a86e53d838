use std::fmt;
use std::str::FromStr;

use itertools::iproduct;
use serde::{Deserialize, Serialize};

use crate::error::MinesweeperError;

/// A (row, column) coordinate on the board, 0-indexed.
///
/// Ordering is row-major, which is what the deterministic selectors rely on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Cell { row, col }
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Parses `row,col`, surrounding whitespace allowed.
impl FromStr for Cell {
    type Err = MinesweeperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MinesweeperError::InvalidCell(s.to_string());
        let (row, col) = s.split_once(',').ok_or_else(invalid)?;
        let row = row.trim().parse().map_err(|_| invalid())?;
        let col = col.trim().parse().map_err(|_| invalid())?;
        Ok(Cell { row, col })
    }
}

/// Fixed rectangular board dimensions, shared by the board and the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub height: usize,
    pub width: usize,
}

impl Grid {
    pub const fn new(height: usize, width: usize) -> Self {
        Grid { height, width }
    }

    pub fn area(&self) -> usize {
        self.height * self.width
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Every cell of the board in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        iproduct!(0..self.height, 0..self.width).map(Cell::from)
    }

    /// All valid neighbor coordinates of `cell`, clipped at the edges and corners.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> {
        let height = self.height;
        let width = self.width;

        iproduct!(-1isize..=1, -1isize..=1).filter_map(move |(dr, dc)| {
            if dr == 0 && dc == 0 {
                return None;
            }

            let row = cell.row as isize + dr;
            let col = cell.col as isize + dc;

            if row >= 0 && row < height as isize && col >= 0 && col < width as isize {
                Some(Cell::new(row as usize, col as usize))
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_neighbors_are_clipped() {
        let grid = Grid::new(3, 3);

        // Corner, edge and center.
        assert_eq!(grid.neighbors(Cell::new(0, 0)).count(), 3);
        assert_eq!(grid.neighbors(Cell::new(0, 1)).count(), 5);
        assert_eq!(grid.neighbors(Cell::new(1, 1)).count(), 8);
        assert_eq!(grid.neighbors(Cell::new(2, 2)).count(), 3);
    }

    #[test]
    fn test_neighbors_exclude_self() {
        let grid = Grid::new(8, 8);
        let cell = Cell::new(4, 4);
        let neighbors: HashSet<Cell> = grid.neighbors(cell).collect();
        assert!(!neighbors.contains(&cell));
        assert!(neighbors.contains(&Cell::new(3, 3)));
        assert!(neighbors.contains(&Cell::new(5, 5)));
    }

    #[test]
    fn test_non_square_grid() {
        let grid = Grid::new(2, 5);
        assert_eq!(grid.cells().count(), 10);
        assert_eq!(grid.cells().last(), Some(Cell::new(1, 4)));
        assert!(grid.contains(Cell::new(1, 4)));
        assert!(!grid.contains(Cell::new(4, 1)));
        assert_eq!(grid.neighbors(Cell::new(1, 4)).count(), 3);
    }

    #[test]
    fn test_cells_are_row_major() {
        let cells: Vec<Cell> = Grid::new(2, 2).cells().collect();
        assert_eq!(
            cells,
            vec![
                Cell::new(0, 0),
                Cell::new(0, 1),
                Cell::new(1, 0),
                Cell::new(1, 1)
            ]
        );
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!("1,2".parse::<Cell>(), Ok(Cell::new(1, 2)));
        assert_eq!(" 3 , 4 ".parse::<Cell>(), Ok(Cell::new(3, 4)));
        assert!("3".parse::<Cell>().is_err());
        assert!("a,1".parse::<Cell>().is_err());
    }
}
