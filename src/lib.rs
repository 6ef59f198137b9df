//! Some puzzles require a spark of insight, a sudden recognition, or a clever
//! twist of thought. Gridlock instead compiles them to propositional logic
//! and grinds.
//!
//! A puzzle is a [`Board`] plus a tree of [`rules::Rule`]s. Each rule
//! describes one reusable grid constraint — "each of these states appears
//! exactly once per row", "cells of this state form a connected region of at
//! most five cells" — and compiles itself to CNF clauses over variables that
//! encode "cell (r, c) has state s". The [`Solver`] owns the variable
//! numbering, the clause store and its variable index, and an exclusivity
//! table of state groups that can hold at most one member per cell; its
//! search is a backtracking substitution loop with unit propagation, where
//! asserting a grouped state automatically negates its siblings in the same
//! step.
//!
//! ## Solving a two-cell puzzle
//!
//! One cell, two states, at least one of which must hold, and which exclude
//! each other. Exactly two assignments satisfy that:
//!
//! ```
//! use gridlock::rules::{AtLeastOnePerCell, Rule, RuleGroup};
//! use gridlock::{Board, Solver};
//!
//! let board = Board::empty(1, 1, vec!["a".to_owned(), "b".to_owned()]);
//! let rules: Vec<Box<dyn Rule>> = vec![Box::new(RuleGroup::exclusive(
//!     vec![Box::new(AtLeastOnePerCell::new(["a", "b"]))],
//!     vec!["a".to_owned(), "b".to_owned()],
//! ))];
//!
//! let mut solver = Solver::new(board, rules).unwrap();
//! let solutions = solver.solve(10);
//! assert_eq!(solutions.len(), 2);
//!
//! let a = solver.var((0, 0), "a").unwrap();
//! let b = solver.var((0, 0), "b").unwrap();
//! for solution in &solutions {
//!     assert_ne!(solution.is_true(a), solution.is_true(b));
//! }
//! ```
//!
//! Ready-made rule sets for Sudoku and Nurikabe live in [`puzzles`]; the
//! building blocks they are made of live in [`rules`]. Project a solution
//! back onto the grid with [`Solver::solved_board`].

use std::fmt;

mod board;
mod display;
mod formula;
mod solver;

pub mod puzzles;
pub mod rules;

pub use board::{Board, Cell};
pub use display::BoardSet;
pub use formula::{Clause, ClauseId, Formula, Var};
pub use solver::{Emitter, Solution, Solver};

// When running `main`, this is loaded from command line args.
/// Configuration options. Set these using `Solver.config()`.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Log every forcing and guessing step of the search (very chatty)
    pub log_steps: bool,
    /// Log when a solution is found
    pub log_solutions: bool,
    /// Log how long the search took
    pub log_elapsed: bool,
}

/// A puzzle was put together wrongly. These surface while the rules compile,
/// before any search runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A rule referenced a coordinate outside the board.
    OutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },
    /// A rule referenced a state that no rule declared.
    UnknownState(String),
    /// A state was put in two exclusivity groups.
    SharedExclusivity(String),
    /// An at-most count covered the whole board or more.
    BadCountBound {
        state: String,
        bound: usize,
        cells: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OutOfBounds {
                row,
                col,
                height,
                width,
            } => write!(
                f,
                "cell ({}, {}) is outside the {}x{} board",
                row, col, height, width
            ),
            Error::UnknownState(state) => write!(f, "unknown state {:?}", state),
            Error::SharedExclusivity(state) => write!(
                f,
                "state {:?} belongs to more than one exclusivity group",
                state
            ),
            Error::BadCountBound {
                state,
                bound,
                cells,
            } => write!(
                f,
                "at most {} of state {:?} is no bound on a board of {} cells",
                bound, state, cells
            ),
        }
    }
}
