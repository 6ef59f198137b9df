use super::Rule;
use crate::board::Cell;
use crate::formula::Clause;
use crate::solver::Emitter;
use crate::Error;

/// Fixes one state at a list of cells, each to a given polarity, as unit
/// clauses. This is how puzzle givens and connectivity roots are seeded.
#[derive(Debug)]
pub struct FixCells {
    state: String,
    cells: Vec<(Cell, bool)>,
}

impl FixCells {
    pub fn new(state: impl Into<String>, cells: Vec<(Cell, bool)>) -> FixCells {
        FixCells {
            state: state.into(),
            cells,
        }
    }
}

impl Rule for FixCells {
    fn states(&self) -> Vec<String> {
        vec![self.state.clone()]
    }

    fn emit(&self, emitter: &mut Emitter) -> Result<(), Error> {
        for &(cell, polarity) in &self.cells {
            let var = emitter.var(cell, &self.state)?;
            emitter.emit(Clause::unit(var, polarity));
        }
        Ok(())
    }
}

/// Fixes every pre-filled board cell whose symbol is one of `states` with a
/// unit clause. Cells holding other symbols (or nothing) are left free.
#[derive(Debug)]
pub struct Givens {
    states: Vec<String>,
}

impl Givens {
    pub fn new<S: Into<String>>(states: impl IntoIterator<Item = S>) -> Givens {
        Givens {
            states: states.into_iter().map(Into::into).collect(),
        }
    }
}

impl Rule for Givens {
    fn states(&self) -> Vec<String> {
        self.states.clone()
    }

    fn emit(&self, emitter: &mut Emitter) -> Result<(), Error> {
        for cell in emitter.board().cells().collect::<Vec<_>>() {
            let symbol = match emitter.board().get(cell) {
                Some(symbol) => symbol.to_owned(),
                None => continue,
            };
            if self.states.iter().any(|state| *state == symbol) {
                let var = emitter.var(cell, &symbol)?;
                emitter.emit(Clause::unit(var, true));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
use crate::{Board, Solver};

#[test]
fn test_fix_cells_out_of_bounds_is_an_error() {
    let board = Board::empty(2, 2, vec!["a".to_owned()]);
    let rules: Vec<Box<dyn Rule>> =
        vec![Box::new(FixCells::new("a", vec![((5, 0), true)]))];
    assert!(matches!(
        Solver::new(board, rules),
        Err(Error::OutOfBounds { row: 5, .. })
    ));
}

#[test]
fn test_givens_fix_only_known_symbols() {
    let board = Board::new(
        vec![vec![Some("a".to_owned()), Some("?".to_owned()), None]],
        vec!["a".to_owned()],
    );
    let rules: Vec<Box<dyn Rule>> = vec![Box::new(Givens::new(["a"]))];
    let mut solver = Solver::new(board, rules).unwrap();
    let solutions = solver.solve(2);
    assert_eq!(solutions.len(), 1);
    assert!(solutions[0].is_true(solver.var((0, 0), "a").unwrap()));
    assert_eq!(solutions[0].get(solver.var((0, 1), "a").unwrap()), None);
}
