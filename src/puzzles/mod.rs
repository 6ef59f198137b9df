//! Ready-made puzzle rule sets built from the rule library.

mod nurikabe;
mod sudoku;

pub use nurikabe::nurikabe;
pub use sudoku::sudoku;
