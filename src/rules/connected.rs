use super::{AtMostInBoard, FixCells, Rule, RuleGroup};
use crate::board::Cell;
use crate::formula::Clause;
use crate::solver::Emitter;
use crate::Error;

/// Ties auxiliary states to the main state they refine: per cell, each
/// auxiliary implies the main state, and the main state implies at least one
/// auxiliary.
#[derive(Debug)]
pub struct LinkStates {
    main: String,
    auxiliary: Vec<String>,
}

impl LinkStates {
    pub fn new<S: Into<String>>(
        main: impl Into<String>,
        auxiliary: impl IntoIterator<Item = S>,
    ) -> LinkStates {
        LinkStates {
            main: main.into(),
            auxiliary: auxiliary.into_iter().map(Into::into).collect(),
        }
    }
}

impl Rule for LinkStates {
    fn states(&self) -> Vec<String> {
        let mut states = vec![self.main.clone()];
        states.extend(self.auxiliary.iter().cloned());
        states
    }

    fn emit(&self, emitter: &mut Emitter) -> Result<(), Error> {
        for cell in emitter.board().cells().collect::<Vec<_>>() {
            let main = emitter.var(cell, &self.main)?;
            let mut some_auxiliary = Clause::unit(main, false);
            for auxiliary in &self.auxiliary {
                let aux = emitter.var(cell, auxiliary)?;
                let mut implies_main = Clause::unit(aux, false);
                implies_main.insert(main, true);
                emitter.emit(implies_main);
                some_auxiliary.insert(aux, true);
            }
            emitter.emit(some_auxiliary);
        }
        Ok(())
    }
}

/// Distance labels that force a region into a tree rooted at its seed.
///
/// Label `<prefix>_d` at a cell means the cell is within rooted-tree distance
/// `d` of the seed: every labeled cell (other than a seed) must see a
/// neighbor one label lower, so each region-colored cell has a strictly
/// decreasing path of labels down to the unique `<prefix>_0` cell, which is
/// connectivity. The labels are mutually exclusive per cell.
///
/// This rule only shapes the labels; combine it as in [`connected_region`]
/// to link them to the region state and to pin down a single seed.
#[derive(Debug)]
pub struct ConnectedTree {
    prefix: String,
    size: usize,
}

impl ConnectedTree {
    pub fn new(prefix: impl Into<String>, size: usize) -> ConnectedTree {
        let prefix = prefix.into();
        assert!(size > 0, "a connected region needs at least one cell");
        ConnectedTree { prefix, size }
    }

    /// The label state for distance `dist`.
    pub fn label(&self, dist: usize) -> String {
        format!("{}_{}", self.prefix, dist)
    }
}

impl Rule for ConnectedTree {
    fn states(&self) -> Vec<String> {
        (0..self.size).map(|dist| self.label(dist)).collect()
    }

    fn exclusivity(&self) -> Option<Vec<String>> {
        Some(self.states())
    }

    fn emit(&self, emitter: &mut Emitter) -> Result<(), Error> {
        for dist in 1..self.size {
            let label = self.label(dist);
            let lower = self.label(dist - 1);
            for cell in emitter.board().cells().collect::<Vec<_>>() {
                let mut clause = Clause::unit(emitter.var(cell, &label)?, false);
                clause.insert(emitter.var(cell, &lower)?, true);
                for neighbor in emitter.board().neighbors(cell) {
                    clause.insert(emitter.var(neighbor, &lower)?, true);
                }
                emitter.emit(clause);
            }
        }
        Ok(())
    }
}

/// Requires the cells carrying `prefix` to form one 4-connected region of at
/// most `size` cells (the size itself is not enforced here; see
/// [`bounded_region`]). If a cell is already known to belong to the region,
/// pass it as `seed` to anchor the tree there.
pub fn connected_region(
    prefix: impl Into<String>,
    size: usize,
    seed: Option<Cell>,
) -> RuleGroup {
    let prefix = prefix.into();
    let tree = ConnectedTree::new(prefix.clone(), size);
    let zero = tree.label(0);
    let labels = tree.states();
    let mut rules: Vec<Box<dyn Rule>> = vec![
        Box::new(tree),
        Box::new(AtMostInBoard::new(zero.clone(), 1)),
        Box::new(LinkStates::new(prefix, labels)),
    ];
    if let Some(seed) = seed {
        rules.push(Box::new(FixCells::new(zero, vec![(seed, true)])));
    }
    RuleGroup::new(rules)
}

/// A connected region of at most `size` cells, size enforced.
pub fn bounded_region(
    prefix: impl Into<String>,
    size: usize,
    seed: Option<Cell>,
) -> RuleGroup {
    let prefix = prefix.into();
    RuleGroup::new(vec![
        Box::new(connected_region(prefix.clone(), size, seed)),
        Box::new(AtMostInBoard::new(prefix, size)),
    ])
}

#[cfg(test)]
use crate::{Board, Solver};

#[cfg(test)]
fn region_cells(solver: &Solver, solution: &crate::Solution, state: &str) -> Vec<Cell> {
    solver
        .board()
        .cells()
        .filter(|&cell| solution.is_true(solver.var(cell, state).unwrap()))
        .collect()
}

#[cfg(test)]
use super::is_connected;

#[test]
fn test_region_is_connected_with_one_seed() {
    let board = Board::empty(3, 3, vec!["r".to_owned()]);
    let rules: Vec<Box<dyn Rule>> = vec![
        Box::new(bounded_region("r", 3, Some((0, 0)))),
        // Make the region state meaningful somewhere else on the board too.
        Box::new(FixCells::new("r", vec![((2, 0), true)])),
    ];
    let mut solver = Solver::new(board, rules).unwrap();
    let solutions = solver.solve(5);
    assert!(!solutions.is_empty());
    for solution in &solutions {
        let region = region_cells(&solver, solution, "r");
        assert!(region.contains(&(0, 0)));
        assert!(region.contains(&(2, 0)));
        assert!(region.len() <= 3);
        assert!(is_connected(&region));
        // Exactly one seed label.
        let seeds = solver
            .board()
            .cells()
            .filter(|&cell| solution.is_true(solver.var(cell, "r_0").unwrap()))
            .count();
        assert_eq!(seeds, 1);
    }
}

#[test]
fn test_disconnected_region_is_unsat() {
    // Two opposite corners of a 3x3 board cannot form a connected pair.
    let board = Board::empty(3, 3, vec!["r".to_owned()]);
    let rules: Vec<Box<dyn Rule>> = vec![
        Box::new(bounded_region("r", 2, Some((0, 0)))),
        Box::new(FixCells::new("r", vec![((2, 2), true)])),
    ];
    let mut solver = Solver::new(board, rules).unwrap();
    assert!(solver.solve(1).is_empty());
}
