use crate::board::Board;
use crate::rules::{exactly_one_tiled, Givens, Rule, RuleGroup};

/// The classic Sudoku rule set over the given digit states: every row, every
/// column, and every `reg_height x reg_width` box contains each state exactly
/// once, the board's pre-filled cells are fixed, and the states are mutually
/// exclusive per cell.
pub fn sudoku(
    board: &Board,
    states: &[String],
    reg_height: usize,
    reg_width: usize,
) -> RuleGroup {
    let rows = exactly_one_tiled(board, states, 1, board.width());
    let cols = exactly_one_tiled(board, states, board.height(), 1);
    let boxes = exactly_one_tiled(board, states, reg_height, reg_width);
    let givens = Givens::new(states.iter().cloned());
    let rules: Vec<Box<dyn Rule>> = vec![
        Box::new(rows),
        Box::new(cols),
        Box::new(boxes),
        Box::new(givens),
    ];
    RuleGroup::exclusive(rules, states.to_vec())
}

#[cfg(test)]
use crate::Solver;

#[cfg(test)]
fn digit_states(n: usize) -> Vec<String> {
    (1..=n).map(|digit| digit.to_string()).collect()
}

#[cfg(test)]
fn board_from(grid: &[&str], states: Vec<String>) -> Board {
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
    Board::new(data, states)
}

/// Every row, column, and box of a solved grid holds each digit once.
#[cfg(test)]
fn assert_valid_sudoku(board: &Board, states: &[String], reg_height: usize, reg_width: usize) {
    let mut regions: Vec<Vec<(usize, usize)>> = Vec::new();
    for row in 0..board.height() {
        regions.push((0..board.width()).map(|col| (row, col)).collect());
    }
    for col in 0..board.width() {
        regions.push((0..board.height()).map(|row| (row, col)).collect());
    }
    for band in 0..board.height() / reg_height {
        for stack in 0..board.width() / reg_width {
            regions.push(
                (0..reg_height)
                    .flat_map(|r| {
                        (0..reg_width).map(move |c| (band * reg_height + r, stack * reg_width + c))
                    })
                    .collect(),
            );
        }
    }
    for region in regions {
        let mut found: Vec<&str> = region
            .iter()
            .map(|&cell| board.get(cell).expect("unfilled cell in a solved grid"))
            .collect();
        found.sort();
        let mut expected: Vec<&str> = states.iter().map(String::as_str).collect();
        expected.sort();
        assert_eq!(found, expected);
    }
}

#[test]
fn test_row_with_a_repeated_given_is_unsat() {
    let states = digit_states(4);
    let board = board_from(&["4 . . 4"], states.clone());
    // Rows only, plus givens: the duplicated 4 is already contradictory.
    let rules: Vec<Box<dyn Rule>> = vec![Box::new(RuleGroup::exclusive(
        vec![
            Box::new(exactly_one_tiled(&board, &states, 1, 4)),
            Box::new(Givens::new(states.iter().cloned())),
        ],
        states.clone(),
    ))];
    let mut solver = Solver::new(board, rules).unwrap();
    assert!(solver.solve(1).is_empty());
}

#[test]
fn test_empty_4x4_sudoku_is_solvable() {
    let states = digit_states(4);
    let board = Board::empty(4, 4, states.clone());
    let rules: Vec<Box<dyn Rule>> = vec![Box::new(sudoku(&board, &states, 2, 2))];
    let mut solver = Solver::new(board, rules).unwrap();
    let solutions = solver.solve(1);
    assert_eq!(solutions.len(), 1);
    let solved = solver.solved_board(&solutions[0]);
    assert_valid_sudoku(&solved, &states, 2, 2);
}

#[test]
fn test_easy_9x9_sudoku_has_a_unique_solution() {
    let states = digit_states(9);
    let board = board_from(
        &[
            "9 1 . 7 . . . . .",
            ". 3 2 6 . 9 . 8 .",
            ". . 7 . 8 . 9 . .",
            ". 8 6 . 3 . 1 7 .",
            "3 . . . . . . . 6",
            ". 5 1 . 2 . 8 4 .",
            ". . 9 . 5 . 3 . .",
            ". 2 . 3 . 1 4 9 .",
            ". . . . . 2 . 6 1",
        ],
        states.clone(),
    );
    let givens = board.clone();
    let rules: Vec<Box<dyn Rule>> = vec![Box::new(sudoku(&board, &states, 3, 3))];
    let mut solver = Solver::new(board, rules).unwrap();

    let solutions = solver.solve(2);
    assert_eq!(solutions.len(), 1);
    let solved = solver.solved_board(&solutions[0]);
    assert_valid_sudoku(&solved, &states, 3, 3);
    // The givens survive projection.
    for cell in givens.cells() {
        if let Some(digit) = givens.get(cell) {
            assert_eq!(solved.get(cell), Some(digit));
        }
    }
}
