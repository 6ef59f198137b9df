use super::{pairs, Rule, RuleGroup};
use crate::board::{Board, Cell};
use crate::formula::Clause;
use crate::solver::Emitter;
use crate::Error;

/// Requires that no two cells of a region share any of the given states: one
/// binary negative clause per state and cell pair.
#[derive(Debug)]
pub struct AtMostOneIn {
    states: Vec<String>,
    cells: Vec<Cell>,
}

impl AtMostOneIn {
    pub fn new<S: Into<String>>(
        states: impl IntoIterator<Item = S>,
        cells: Vec<Cell>,
    ) -> AtMostOneIn {
        AtMostOneIn {
            states: states.into_iter().map(Into::into).collect(),
            cells,
        }
    }
}

impl Rule for AtMostOneIn {
    fn states(&self) -> Vec<String> {
        self.states.clone()
    }

    fn emit(&self, emitter: &mut Emitter) -> Result<(), Error> {
        for state in &self.states {
            let mut vars = Vec::with_capacity(self.cells.len());
            for &cell in &self.cells {
                vars.push(emitter.var(cell, state)?);
            }
            for (&v1, &v2) in pairs(&vars) {
                let mut clause = Clause::new();
                clause.insert(v1, false);
                clause.insert(v2, false);
                emitter.emit(clause);
            }
        }
        Ok(())
    }
}

/// Requires at least one cell of a region to carry each of the given states:
/// one positive disjunction per state.
#[derive(Debug)]
pub struct AtLeastOneIn {
    states: Vec<String>,
    cells: Vec<Cell>,
}

impl AtLeastOneIn {
    pub fn new<S: Into<String>>(
        states: impl IntoIterator<Item = S>,
        cells: Vec<Cell>,
    ) -> AtLeastOneIn {
        AtLeastOneIn {
            states: states.into_iter().map(Into::into).collect(),
            cells,
        }
    }
}

impl Rule for AtLeastOneIn {
    fn states(&self) -> Vec<String> {
        self.states.clone()
    }

    fn emit(&self, emitter: &mut Emitter) -> Result<(), Error> {
        for state in &self.states {
            let mut clause = Clause::new();
            for &cell in &self.cells {
                clause.insert(emitter.var(cell, state)?, true);
            }
            emitter.emit(clause);
        }
        Ok(())
    }
}

/// Exactly one cell of the region carries each state: at-most-one plus
/// at-least-one.
pub fn exactly_one_in<S: Into<String>>(
    states: impl IntoIterator<Item = S>,
    cells: Vec<Cell>,
) -> RuleGroup {
    let states: Vec<String> = states.into_iter().map(Into::into).collect();
    RuleGroup::new(vec![
        Box::new(AtMostOneIn::new(states.clone(), cells.clone())),
        Box::new(AtLeastOneIn::new(states, cells)),
    ])
}

/// Tiles the board with `tile_height x tile_width` rectangles and requires
/// each to contain every state exactly once. Rows are `1 x width` tiles,
/// columns `height x 1`, Sudoku boxes the sub-rectangles.
pub fn exactly_one_tiled(
    board: &Board,
    states: &[String],
    tile_height: usize,
    tile_width: usize,
) -> RuleGroup {
    let height = board.height();
    let width = board.width();
    assert!(
        tile_height > 0 && tile_width > 0,
        "tiles must be at least 1x1"
    );
    assert!(
        height % tile_height == 0 && width % tile_width == 0,
        "{}x{} tiles do not cover a {}x{} board",
        tile_height,
        tile_width,
        height,
        width,
    );
    assert_eq!(
        states.len(),
        tile_height * tile_width,
        "need exactly one state per tile cell"
    );

    let tiles_across = width / tile_width;
    let num_tiles = (height / tile_height) * tiles_across;
    let mut tiles: Vec<Vec<Cell>> = vec![Vec::new(); num_tiles];
    for row in 0..height {
        for col in 0..width {
            let tile = (row / tile_height) * tiles_across + col / tile_width;
            tiles[tile].push((row, col));
        }
    }

    let mut rules: Vec<Box<dyn Rule>> = Vec::with_capacity(num_tiles);
    for cells in tiles {
        rules.push(Box::new(exactly_one_in(states.to_vec(), cells)));
    }
    RuleGroup::new(rules)
}

#[cfg(test)]
use crate::Solver;

#[test]
fn test_exactly_one_forces_the_remaining_cell() {
    let board = Board::empty(1, 3, vec!["s".to_owned()]);
    let rules: Vec<Box<dyn Rule>> = vec![
        Box::new(exactly_one_in(["s"], vec![(0, 0), (0, 1), (0, 2)])),
        Box::new(super::FixCells::new(
            "s",
            vec![((0, 0), false), ((0, 1), false)],
        )),
    ];
    let mut solver = Solver::new(board, rules).unwrap();
    let solutions = solver.solve(10);
    assert_eq!(solutions.len(), 1);
    assert!(solutions[0].is_true(solver.var((0, 2), "s").unwrap()));
}

#[test]
fn test_tiling_covers_the_board() {
    let board = Board::empty(4, 4, vec![]);
    let states: Vec<String> = (1..=4).map(|n| n.to_string()).collect();
    let group = exactly_one_tiled(&board, &states, 2, 2);
    // Four tiles, each an at-most/at-least pair.
    assert_eq!(group.children().unwrap().len(), 4);
}

#[test]
#[should_panic(expected = "do not cover")]
fn test_uneven_tiling_panics() {
    let board = Board::empty(4, 4, vec![]);
    let states: Vec<String> = (1..=3).map(|n| n.to_string()).collect();
    exactly_one_tiled(&board, &states, 3, 1);
}
