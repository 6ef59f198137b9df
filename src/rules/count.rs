use super::Rule;
use crate::formula::Clause;
use crate::solver::Emitter;
use crate::Error;

/// Bounds how many cells of the whole board may carry a state, by the
/// sequential-counter encoding: `bound` auxiliary register states
/// `<state>k0 .. <state>k{bound-1}` are threaded through the cells in
/// row-major order, `<state>kj` at a cell meaning "at least j+1 target cells
/// so far". O(cells * bound) clauses, and unit propagation stays local.
#[derive(Debug)]
pub struct AtMostInBoard {
    state: String,
    bound: usize,
    registers: Vec<String>,
}

impl AtMostInBoard {
    pub fn new(state: impl Into<String>, bound: usize) -> AtMostInBoard {
        let state = state.into();
        assert!(bound > 0, "an at-most-zero bound needs no counter");
        let registers = (0..bound).map(|j| format!("{}k{}", state, j)).collect();
        AtMostInBoard {
            state,
            bound,
            registers,
        }
    }
}

impl Rule for AtMostInBoard {
    fn states(&self) -> Vec<String> {
        let mut states = vec![self.state.clone()];
        states.extend(self.registers.iter().cloned());
        states
    }

    fn emit(&self, emitter: &mut Emitter) -> Result<(), Error> {
        let cells: Vec<_> = emitter.board().cells().collect();
        if self.bound >= cells.len() {
            return Err(Error::BadCountBound {
                state: self.state.clone(),
                bound: self.bound,
                cells: cells.len(),
            });
        }
        let first_register = &self.registers[0];
        let last_register = &self.registers[self.bound - 1];

        // A target cell fires the first register.
        for &cell in &cells {
            let mut clause = Clause::new();
            clause.insert(emitter.var(cell, &self.state)?, false);
            clause.insert(emitter.var(cell, first_register)?, true);
            emitter.emit(clause);
        }
        // At the first cell only the first register can hold.
        for register in &self.registers[1..] {
            let var = emitter.var(cells[0], register)?;
            emitter.emit(Clause::unit(var, false));
        }
        for i in 1..cells.len() {
            let cur = cells[i];
            let prev = cells[i - 1];
            for (j, register) in self.registers.iter().enumerate() {
                // Registers carry monotonically from cell to cell.
                let mut carry = Clause::new();
                carry.insert(emitter.var(prev, register)?, false);
                carry.insert(emitter.var(cur, register)?, true);
                emitter.emit(carry);
                // A target cell bumps the count by one.
                if j > 0 {
                    let mut bump = Clause::new();
                    bump.insert(emitter.var(cur, &self.state)?, false);
                    bump.insert(emitter.var(prev, &self.registers[j - 1])?, false);
                    bump.insert(emitter.var(cur, register)?, true);
                    emitter.emit(bump);
                }
            }
            // The last register may never overflow.
            let mut overflow = Clause::new();
            overflow.insert(emitter.var(cur, &self.state)?, false);
            overflow.insert(emitter.var(prev, last_register)?, false);
            emitter.emit(overflow);
        }
        Ok(())
    }
}

#[cfg(test)]
use super::{AtLeastOnePerCell, ExclusiveStates, FixCells};
#[cfg(test)]
use crate::{Board, Solver};

#[cfg(test)]
fn count_solver(bound: usize, fixed_true: Vec<crate::board::Cell>) -> Solver {
    let mut fixes = Vec::new();
    for cell in fixed_true {
        fixes.push((cell, true));
    }
    let board = Board::empty(2, 2, vec!["s".to_owned(), "o".to_owned()]);
    let rules: Vec<Box<dyn Rule>> = vec![
        Box::new(AtLeastOnePerCell::new(["s", "o"])),
        Box::new(ExclusiveStates::new(["s", "o"])),
        Box::new(AtMostInBoard::new("s", bound)),
        Box::new(FixCells::new("s", fixes)),
    ];
    Solver::new(board, rules).unwrap()
}

#[test]
fn test_at_most_bound_holds_in_every_solution() {
    let mut solver = count_solver(2, vec![]);
    let solutions = solver.solve(10_000);
    assert!(!solutions.is_empty());
    for solution in &solutions {
        let count = solver
            .board()
            .cells()
            .filter(|&cell| solution.is_true(solver.var(cell, "s").unwrap()))
            .count();
        assert!(count <= 2, "found a solution with {} target cells", count);
    }
}

#[test]
fn test_bound_is_tight() {
    // Three target cells fit under a bound of three...
    let mut solver = count_solver(3, vec![(0, 0), (0, 1), (1, 0)]);
    assert!(!solver.solve(1).is_empty());
    // ...but four do not.
    let mut solver = count_solver(3, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    assert!(solver.solve(1).is_empty());
}

#[test]
fn test_bound_of_cell_count_is_misuse() {
    let board = Board::empty(2, 2, vec!["s".to_owned()]);
    let rules: Vec<Box<dyn Rule>> = vec![Box::new(AtMostInBoard::new("s", 4))];
    assert!(matches!(
        Solver::new(board, rules),
        Err(Error::BadCountBound {
            bound: 4,
            cells: 4,
            ..
        })
    ));
}
