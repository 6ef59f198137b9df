use super::{pairs, Rule};
use crate::formula::Clause;
use crate::solver::Emitter;
use crate::Error;

/// Requires every cell to carry at least one of the given states. Combined
/// with an exclusivity group over the same states this makes the choice
/// exactly-one.
#[derive(Debug)]
pub struct AtLeastOnePerCell {
    states: Vec<String>,
}

impl AtLeastOnePerCell {
    pub fn new<S: Into<String>>(states: impl IntoIterator<Item = S>) -> AtLeastOnePerCell {
        AtLeastOnePerCell {
            states: states.into_iter().map(Into::into).collect(),
        }
    }
}

impl Rule for AtLeastOnePerCell {
    fn states(&self) -> Vec<String> {
        self.states.clone()
    }

    fn emit(&self, emitter: &mut Emitter) -> Result<(), Error> {
        for cell in emitter.board().cells().collect::<Vec<_>>() {
            let mut clause = Clause::new();
            for state in &self.states {
                clause.insert(emitter.var(cell, state)?, true);
            }
            emitter.emit(clause);
        }
        Ok(())
    }
}

/// Forbids cells with different states (from the given list) from touching
/// orthogonally. Emitted once per directed in-bounds edge and unordered state
/// pair; the duplicate per edge direction is harmless.
#[derive(Debug)]
pub struct NoAdjacentStates {
    states: Vec<String>,
}

impl NoAdjacentStates {
    pub fn new<S: Into<String>>(states: impl IntoIterator<Item = S>) -> NoAdjacentStates {
        NoAdjacentStates {
            states: states.into_iter().map(Into::into).collect(),
        }
    }
}

impl Rule for NoAdjacentStates {
    fn states(&self) -> Vec<String> {
        self.states.clone()
    }

    fn emit(&self, emitter: &mut Emitter) -> Result<(), Error> {
        let board = emitter.board();
        let mut edges = Vec::new();
        for cell in board.cells() {
            for neighbor in board.neighbors(cell) {
                edges.push((cell, neighbor));
            }
        }
        for (cell, neighbor) in edges {
            for (s1, s2) in pairs(&self.states) {
                let mut clause = Clause::new();
                clause.insert(emitter.var(cell, s1)?, false);
                clause.insert(emitter.var(neighbor, s2)?, false);
                emitter.emit(clause);
            }
        }
        Ok(())
    }
}

/// Forbids any axis-aligned 2x2 block from being entirely one of the given
/// states (Nurikabe's "no pool" rule).
#[derive(Debug)]
pub struct NoTwoByTwo {
    states: Vec<String>,
}

impl NoTwoByTwo {
    pub fn new<S: Into<String>>(states: impl IntoIterator<Item = S>) -> NoTwoByTwo {
        NoTwoByTwo {
            states: states.into_iter().map(Into::into).collect(),
        }
    }
}

impl Rule for NoTwoByTwo {
    fn states(&self) -> Vec<String> {
        self.states.clone()
    }

    fn emit(&self, emitter: &mut Emitter) -> Result<(), Error> {
        let height = emitter.board().height();
        let width = emitter.board().width();
        for row in 0..height.saturating_sub(1) {
            for col in 0..width.saturating_sub(1) {
                let square = [
                    (row, col),
                    (row + 1, col),
                    (row, col + 1),
                    (row + 1, col + 1),
                ];
                for state in &self.states {
                    let mut clause = Clause::new();
                    for &cell in &square {
                        clause.insert(emitter.var(cell, state)?, false);
                    }
                    emitter.emit(clause);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
use crate::{Board, Solver};

#[cfg(test)]
fn states(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_no_adjacent_states() {
    // Two regions on a 1x2 board may not touch.
    let board = Board::empty(1, 2, states(&["p", "q"]));
    let rules: Vec<Box<dyn Rule>> = vec![
        Box::new(AtLeastOnePerCell::new(["p", "q"])),
        Box::new(NoAdjacentStates::new(["p", "q"])),
    ];
    let mut solver = Solver::new(board, rules).unwrap();
    let solutions = solver.solve(100);
    assert!(!solutions.is_empty());
    let p0 = solver.var((0, 0), "p").unwrap();
    let q0 = solver.var((0, 0), "q").unwrap();
    let p1 = solver.var((0, 1), "p").unwrap();
    let q1 = solver.var((0, 1), "q").unwrap();
    for solution in &solutions {
        assert!(!(solution.is_true(p0) && solution.is_true(q1)));
        assert!(!(solution.is_true(q0) && solution.is_true(p1)));
    }
}

#[test]
fn test_no_two_by_two() {
    let board = Board::empty(2, 2, states(&["x"]));
    let rules: Vec<Box<dyn Rule>> = vec![Box::new(NoTwoByTwo::new(["x"]))];
    let mut solver = Solver::new(board, rules).unwrap();
    let solutions = solver.solve(1000);
    for solution in &solutions {
        let all_shaded = board_cells().iter().all(|&cell| {
            solution.is_true(solver.var(cell, "x").unwrap())
        });
        assert!(!all_shaded);
    }

    fn board_cells() -> Vec<crate::board::Cell> {
        vec![(0, 0), (0, 1), (1, 0), (1, 1)]
    }
}
