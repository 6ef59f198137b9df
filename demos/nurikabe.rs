//! Solve a 7x7 Nurikabe (puzzle-nurikabe.com).

use gridlock::puzzles::nurikabe;
use gridlock::rules::Rule;
use gridlock::{Board, Solver};

fn main() {
    println!("Solving a 7x7 nurikabe.");
    println!();

    let mut board = Board::empty(7, 7, vec![".".to_owned(), "x".to_owned()]).with_clues([
        ((0, 0), 1),
        ((0, 6), 2),
        ((1, 2), 2),
        ((2, 5), 3),
        ((4, 5), 7),
        ((5, 2), 2),
        ((6, 6), 3),
    ]);
    board.set((3, 5), "x");

    let rules: Vec<Box<dyn Rule>> = vec![Box::new(nurikabe(&board, ".", "x"))];
    let mut solver = Solver::new(board, rules).expect("bad nurikabe rules");
    solver.config().log_elapsed = true;

    match solver.solve(1).first() {
        Some(solution) => println!("{}", solver.solved_board(solution)),
        None => println!("unsatisfiable"),
    }
}
