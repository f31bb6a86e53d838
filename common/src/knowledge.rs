use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, Grid};
use crate::sentence::Sentence;

/// Which resolution rules the fixpoint applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Inference {
    /// Only sentences whose count is zero or equals their size are resolved.
    #[default]
    Direct,
    /// Direct resolution, plus `B - A` is derived whenever `A ⊂ B`.
    Subset,
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub inference: Inference,
}

impl EngineConfig {
    /// Config that also derives sentences from nested pairs.
    pub fn with_subset_inference() -> Self {
        Self {
            inference: Inference::Subset,
        }
    }
}

/// Cells newly classified by one call to [`MinesweeperAi::add_knowledge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deductions {
    pub mines: HashSet<Cell>,
    pub safes: HashSet<Cell>,
}

impl Deductions {
    pub fn is_empty(&self) -> bool {
        self.mines.is_empty() && self.safes.is_empty()
    }
}

/// Minesweeper player: a knowledge base of sentences and the facts derived from it.
///
/// `moves_made`, `safes` and `mines` only ever grow. Sentences are simplified
/// in place and may end up empty, but are never removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinesweeperAi {
    pub(crate) grid: Grid,
    pub(crate) config: EngineConfig,
    pub(crate) moves_made: HashSet<Cell>,
    pub(crate) mines: HashSet<Cell>,
    pub(crate) safes: HashSet<Cell>,
    pub(crate) knowledge: Vec<Sentence>,
}

impl MinesweeperAi {
    pub fn new(grid: Grid) -> Self {
        Self::with_config(grid, EngineConfig::default())
    }

    pub fn with_config(grid: Grid, config: EngineConfig) -> Self {
        MinesweeperAi {
            grid,
            config,
            moves_made: HashSet::new(),
            mines: HashSet::new(),
            safes: HashSet::new(),
            knowledge: Vec::new(),
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn moves_made(&self) -> &HashSet<Cell> {
        &self.moves_made
    }

    pub fn mines(&self) -> &HashSet<Cell> {
        &self.mines
    }

    pub fn safes(&self) -> &HashSet<Cell> {
        &self.safes
    }

    pub fn knowledge(&self) -> &[Sentence] {
        &self.knowledge
    }

    /// Records `cell` as a mine and removes it from every sentence.
    pub fn mark_mine(&mut self, cell: Cell) {
        self.mines.insert(cell);
        for sentence in &mut self.knowledge {
            sentence.mark_mine(cell);
        }
    }

    /// Records `cell` as safe and removes it from every sentence.
    pub fn mark_safe(&mut self, cell: Cell) {
        self.safes.insert(cell);
        for sentence in &mut self.knowledge {
            sentence.mark_safe(cell);
        }
    }

    /// Feeds the observation that the probed `cell` has `count` neighboring mines.
    ///
    /// The observation becomes a new sentence over the still-unresolved
    /// neighbors, then every sentence is resolved until nothing new can be
    /// concluded. Returns the cells this call classified.
    ///
    /// The caller guarantees `count` is truthful and `cell` was not probed before;
    /// neither is checked.
    pub fn add_knowledge(&mut self, cell: Cell, count: usize) -> Deductions {
        self.moves_made.insert(cell);
        self.safes.insert(cell);

        let mut sentence = Sentence::new(self.grid.neighbors(cell), count);
        sentence.subtract_mines(&self.mines);
        sentence.discard(&self.safes);
        sentence.discard(&self.moves_made);

        for existing in &mut self.knowledge {
            existing.mark_safe(cell);
        }
        self.knowledge.push(sentence);

        let deductions = self.resolve();

        let resolved: HashSet<Cell> = self.safes.union(&self.mines).copied().collect();
        for sentence in &mut self.knowledge {
            sentence.discard(&resolved);
        }

        deductions
    }

    /// Runs resolution passes until a full pass classifies nothing.
    fn resolve(&mut self) -> Deductions {
        let mut deductions = Deductions::default();

        loop {
            let mut changed = false;

            for i in 0..self.knowledge.len() {
                for mine in self.knowledge[i].known_mines() {
                    if !self.mines.contains(&mine) {
                        deductions.mines.insert(mine);
                    }
                    self.mark_mine(mine);
                    changed = true;
                }
                for safe in self.knowledge[i].known_safes() {
                    if !self.safes.contains(&safe) {
                        deductions.safes.insert(safe);
                    }
                    self.mark_safe(safe);
                    changed = true;
                }
            }

            if !changed {
                if self.config.inference == Inference::Subset && self.infer_subsets() {
                    continue;
                }
                break;
            }
        }

        deductions
    }

    /// Appends `B - A` for every pair of live sentences with `A ⊂ B`.
    /// Returns whether anything new was learned.
    fn infer_subsets(&mut self) -> bool {
        let live: Vec<&Sentence> = self.knowledge.iter().filter(|s| !s.is_empty()).collect();

        let mut derived: Vec<Sentence> = Vec::new();
        for &inner in &live {
            for &outer in &live {
                if inner.is_proper_subset(outer) {
                    derived.push(outer - inner);
                }
            }
        }

        let mut learned = false;
        for sentence in derived {
            if !self.knowledge.contains(&sentence) {
                self.knowledge.push(sentence);
                learned = true;
            }
        }
        learned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn cell(row: usize, col: usize) -> Cell {
        Cell::new(row, col)
    }

    fn assert_invariants(ai: &MinesweeperAi) {
        assert!(ai.mines.is_disjoint(&ai.safes));
        assert!(ai.moves_made.is_subset(&ai.safes));
        for sentence in &ai.knowledge {
            assert!(sentence.count() <= sentence.len(), "{sentence}");
            assert!(sentence.cells().is_disjoint(&ai.mines));
            assert!(sentence.cells().is_disjoint(&ai.safes));
        }
    }

    #[test]
    fn test_zero_count_marks_all_neighbors_safe() {
        let mut ai = MinesweeperAi::new(Grid::new(8, 8));
        let deductions = ai.add_knowledge(cell(1, 1), 0);

        let neighbors: HashSet<Cell> = Grid::new(8, 8).neighbors(cell(1, 1)).collect();
        assert_eq!(neighbors.len(), 8);
        assert!(neighbors.is_subset(ai.safes()));
        assert_eq!(deductions.safes, neighbors);
        assert!(deductions.mines.is_empty());
        assert!(ai.mines().is_empty());
        assert_invariants(&ai);
    }

    #[test]
    fn test_revealed_cell_is_safe_and_made() {
        let mut ai = MinesweeperAi::new(Grid::new(3, 3));
        ai.add_knowledge(cell(1, 1), 2);
        assert!(ai.moves_made().contains(&cell(1, 1)));
        assert!(ai.safes().contains(&cell(1, 1)));
        assert_eq!(ai.knowledge().len(), 1);
        assert_eq!(ai.knowledge()[0].len(), 8);
        assert_eq!(ai.knowledge()[0].count(), 2);
    }

    #[test]
    fn test_full_count_marks_all_neighbors_mines() {
        let mut ai = MinesweeperAi::new(Grid::new(4, 4));
        let deductions = ai.add_knowledge(cell(0, 0), 3);

        let expected = HashSet::from([cell(0, 1), cell(1, 0), cell(1, 1)]);
        assert_eq!(ai.mines(), &expected);
        assert_eq!(deductions.mines, expected);
        assert!(ai.knowledge()[0].is_empty());
        assert_invariants(&ai);
    }

    #[test]
    fn test_known_mines_are_subtracted_from_new_sentences() {
        let mut ai = MinesweeperAi::new(Grid::new(3, 3));
        ai.mark_mine(cell(0, 1));
        ai.add_knowledge(cell(1, 1), 2);

        let sentence = ai.knowledge().last().unwrap();
        assert!(!sentence.contains(&cell(0, 1)));
        assert_eq!(sentence.count(), 1);
        assert_eq!(sentence.len(), 7);
    }

    #[test]
    fn test_new_move_removes_cell_from_existing_sentences() {
        let mut ai = MinesweeperAi::new(Grid::new(3, 3));
        ai.add_knowledge(cell(0, 0), 1);
        ai.add_knowledge(cell(1, 0), 1);

        for sentence in ai.knowledge() {
            assert!(!sentence.contains(&cell(1, 0)));
            assert!(!sentence.contains(&cell(0, 0)));
        }
    }

    #[test]
    fn test_chained_resolution() {
        // Mine at (0, 1) on a 2x3 board.
        let mut ai = MinesweeperAi::new(Grid::new(2, 3));
        ai.add_knowledge(cell(1, 0), 1);
        ai.add_knowledge(cell(0, 0), 1);
        assert!(ai.mines().is_empty());

        // {(0,1)} = 1 once (1,1) is known safe.
        ai.add_knowledge(cell(1, 1), 1);
        assert!(ai.mines().contains(&cell(0, 1)));
        assert!(ai.safes().contains(&cell(0, 2)));
        assert!(ai.safes().contains(&cell(1, 2)));
        assert_invariants(&ai);
    }

    #[test]
    fn test_engine_mark_updates_every_sentence() {
        let mut ai = MinesweeperAi::new(Grid::new(3, 3));
        ai.add_knowledge(cell(0, 0), 1);
        ai.add_knowledge(cell(2, 2), 1);

        ai.mark_safe(cell(1, 1));
        assert!(ai.knowledge().iter().all(|s| !s.contains(&cell(1, 1))));

        ai.mark_mine(cell(0, 1));
        assert!(ai.mines().contains(&cell(0, 1)));
        assert_eq!(ai.knowledge()[0], Sentence::new([cell(1, 0)], 0));
    }

    #[test]
    fn test_direct_inference_misses_nested_sentences() {
        // Mine at (0, 1). After probing (1, 0) and (1, 1):
        //   {(0,0), (0,1)} = 1 and {(0,0), (0,1), (0,2), (1,2)} = 1
        let mut ai = MinesweeperAi::new(Grid::new(2, 3));
        ai.add_knowledge(cell(1, 0), 1);
        let deductions = ai.add_knowledge(cell(1, 1), 1);

        assert!(deductions.is_empty());
        assert!(!ai.safes().contains(&cell(0, 2)));
    }

    #[test]
    fn test_subset_inference_resolves_nested_sentences() {
        let mut ai =
            MinesweeperAi::with_config(Grid::new(2, 3), EngineConfig::with_subset_inference());
        ai.add_knowledge(cell(1, 0), 1);
        let deductions = ai.add_knowledge(cell(1, 1), 1);

        assert_eq!(deductions.safes, HashSet::from([cell(0, 2), cell(1, 2)]));
        assert!(ai.mines().is_empty());

        ai.add_knowledge(cell(1, 2), 1);
        assert!(ai.mines().contains(&cell(0, 1)));
        assert!(ai.safes().contains(&cell(0, 0)));
        assert_invariants(&ai);
    }

    /// Probes every non-mine cell of a random board in a seeded order and
    /// checks the engine never contradicts the board.
    fn replay(seed: u64, height: usize, width: usize, mines: usize, config: EngineConfig) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = Grid::new(height, width);
        let board = Board::new(grid, mines, &mut rng).unwrap();
        let mut ai = MinesweeperAi::with_config(grid, config);

        let mut order: Vec<Cell> = grid.cells().filter(|c| !board.is_mine(*c)).collect();
        rand::seq::SliceRandom::shuffle(order.as_mut_slice(), &mut rng);

        let mut previous = (HashSet::new(), HashSet::new(), HashSet::new());
        for next in order {
            if ai.moves_made().contains(&next) {
                continue;
            }
            ai.add_knowledge(next, board.nearby_mines(next));
            assert_invariants(&ai);

            assert!(ai.mines().iter().all(|c| board.is_mine(*c)));
            assert!(ai.safes().iter().all(|c| !board.is_mine(*c)));

            assert!(previous.0.is_subset(ai.moves_made()));
            assert!(previous.1.is_subset(ai.safes()));
            assert!(previous.2.is_subset(ai.mines()));
            previous = (ai.moves_made.clone(), ai.safes.clone(), ai.mines.clone());
        }
    }

    proptest! {
        #[test]
        fn direct_inference_is_sound(
            seed in any::<u64>(),
            height in 1..9usize,
            width in 1..9usize,
            density in 0..40usize,
        ) {
            let mines = height * width * density / 100;
            replay(seed, height, width, mines, EngineConfig::default());
        }

        #[test]
        fn subset_inference_is_sound(
            seed in any::<u64>(),
            height in 1..7usize,
            width in 1..7usize,
            density in 0..40usize,
        ) {
            let mines = height * width * density / 100;
            replay(seed, height, width, mines, EngineConfig::with_subset_inference());
        }
    }
}
