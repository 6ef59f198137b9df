//! Solve a hard Sudoku with the ready-made rule set.

use gridlock::puzzles::sudoku;
use gridlock::rules::Rule;
use gridlock::{Board, Solver};

fn main() {
    println!("Solving a hard sudoku.");
    println!();

    let grid = [
        "8 . . . . . . 5 .",
        ". 1 . . 4 . 6 . 8",
        "7 . . . . 3 . . .",
        ". . . . 9 . . 2 .",
        ". 5 . . . . . 4 .",
        "1 . . 7 . . 9 . 5",
        ". . . . . . 2 . .",
        ". . 6 4 . . . . .",
        ". 8 . . 6 . 1 . 9",
    ];
    let states: Vec<String> = (1..=9).map(|n| n.to_string()).collect();
    let data = grid
        .iter()
        .map(|row| {
            row.split_whitespace()
                .map(|token| match token {
                    "." => None,
                    digit => Some(digit.to_owned()),
                })
                .collect()
        })
        .collect();
    let board = Board::new(data, states.clone());

    let rules: Vec<Box<dyn Rule>> = vec![Box::new(sudoku(&board, &states, 3, 3))];
    let mut solver = Solver::new(board, rules).expect("bad sudoku rules");
    solver.config().log_elapsed = true;

    match solver.solve(1).first() {
        Some(solution) => println!("{}", solver.solved_board(solution)),
        None => println!("unsatisfiable"),
    }
}
