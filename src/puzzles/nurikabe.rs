use crate::board::Board;
use crate::rules::{
    bounded_region, AtLeastOnePerCell, ExclusiveStates, Givens, LinkStates, NoAdjacentStates,
    NoTwoByTwo, Rule, RuleGroup,
};

/// The Nurikabe rule set (https://puzz.link/rules.html?nurikabe).
///
/// Every number clue on the board grows its own unshaded region state
/// `<empty>r<i>`, connected and of exactly the clue's size, seeded at the
/// clue cell. The shaded cells form one connected region of the remaining
/// size, seeded at the first pre-shaded cell if there is one. No 2x2 block is
/// fully shaded, unshaded regions never touch, every pre-filled cell is
/// honored, and each cell is exactly one of shaded or unshaded.
///
/// The region sizes come out exact even though each is only bounded above:
/// the bounds sum to the area of the board, so no region can fall short
/// without another overflowing.
pub fn nurikabe(board: &Board, empty: &str, filled: &str) -> RuleGroup {
    let mut remaining = board.height() * board.width();
    let mut rules: Vec<Box<dyn Rule>> = Vec::new();
    let mut region_states = Vec::new();
    for (i, (&cell, &size)) in board.clues().iter().enumerate() {
        let prefix = format!("{}r{}", empty, i + 1);
        region_states.push(prefix.clone());
        rules.push(Box::new(bounded_region(prefix, size, Some(cell))));
        assert!(
            remaining > size,
            "number clues at or above the board area leave no shaded cells"
        );
        remaining -= size;
    }
    let shaded_seed = board.cells().find(|&cell| board.get(cell) == Some(filled));
    rules.push(Box::new(bounded_region(filled, remaining, shaded_seed)));
    rules.push(Box::new(NoTwoByTwo::new([filled])));
    rules.push(Box::new(LinkStates::new(empty, region_states.clone())));
    rules.push(Box::new(AtLeastOnePerCell::new([empty, filled])));
    rules.push(Box::new(NoAdjacentStates::new(region_states.clone())));
    rules.push(Box::new(Givens::new([empty, filled])));
    rules.push(Box::new(ExclusiveStates::new(region_states)));
    RuleGroup::exclusive(rules, vec![empty.to_owned(), filled.to_owned()])
}

#[cfg(test)]
use crate::board::Cell;
#[cfg(test)]
use crate::rules::is_connected;
#[cfg(test)]
use crate::Solver;
#[cfg(test)]
use std::collections::HashSet;

/// Solves for up to two assignments and checks the puzzle has exactly one
/// board. The auxiliary states (distance labels, counter registers) admit
/// several satisfying assignments, so uniqueness is asserted on the
/// deduplicated projected boards, not on the raw solution count.
#[cfg(test)]
fn solve_unique(solver: &mut Solver) -> Board {
    let solutions = solver.solve(2);
    assert!(!solutions.is_empty());
    let boards: HashSet<Board> = solutions
        .iter()
        .map(|solution| solver.solved_board(solution))
        .collect();
    assert_eq!(boards.len(), 1, "expected every assignment to draw one board");
    boards.into_iter().next().unwrap()
}

/// Checks a projected board against the Nurikabe rules themselves: every
/// cell decided, each clue in an unshaded region of exactly its size, clue
/// regions disjoint and accounting for all unshaded cells, shaded cells
/// connected, and no fully shaded 2x2 block.
#[cfg(test)]
fn assert_valid_nurikabe(board: &Board, empty: &str, filled: &str) {
    let shaded: Vec<Cell> = board
        .cells()
        .filter(|&cell| board.get(cell) == Some(filled))
        .collect();
    let unshaded: Vec<Cell> = board
        .cells()
        .filter(|&cell| board.get(cell) == Some(empty))
        .collect();
    assert_eq!(
        shaded.len() + unshaded.len(),
        board.height() * board.width(),
        "every cell must be decided"
    );

    assert!(is_connected(&shaded), "shaded cells must form one region");

    for (row, col) in board.cells() {
        if row + 1 < board.height() && col + 1 < board.width() {
            let square = [
                (row, col),
                (row + 1, col),
                (row, col + 1),
                (row + 1, col + 1),
            ];
            assert!(
                !square.iter().all(|cell| shaded.contains(cell)),
                "2x2 block of shaded cells at ({}, {})",
                row,
                col
            );
        }
    }

    let mut accounted = 0;
    let mut seen: Vec<Cell> = Vec::new();
    for (&clue_cell, &size) in board.clues() {
        let region = flood_fill(&unshaded, clue_cell);
        assert_eq!(
            region.len(),
            size,
            "the region at {:?} must have exactly {} cells",
            clue_cell,
            size
        );
        for cell in &region {
            assert!(
                !seen.contains(cell),
                "two clue regions share the cell {:?}",
                cell
            );
            seen.push(*cell);
        }
        accounted += size;
    }
    assert_eq!(
        accounted,
        unshaded.len(),
        "every unshaded cell must belong to a clue region"
    );
}

#[cfg(test)]
fn flood_fill(cells: &[Cell], start: Cell) -> Vec<Cell> {
    assert!(cells.contains(&start), "clue cell {:?} is shaded", start);
    let mut reached = vec![start];
    let mut frontier = vec![start];
    while let Some((row, col)) = frontier.pop() {
        let mut neighbors = vec![(row + 1, col), (row, col + 1)];
        if row > 0 {
            neighbors.push((row - 1, col));
        }
        if col > 0 {
            neighbors.push((row, col - 1));
        }
        for neighbor in neighbors {
            if cells.contains(&neighbor) && !reached.contains(&neighbor) {
                reached.push(neighbor);
                frontier.push(neighbor);
            }
        }
    }
    reached
}

#[test]
fn test_4x4_nurikabe() {
    let board = Board::empty(4, 4, vec![".".to_owned(), "x".to_owned()])
        .with_clues([((0, 3), 2), ((3, 0), 3), ((3, 2), 2)]);
    let rules: Vec<Box<dyn Rule>> = vec![Box::new(nurikabe(&board, ".", "x"))];
    let mut solver = Solver::new(board, rules).unwrap();
    let solved = solve_unique(&mut solver);
    assert_valid_nurikabe(&solved, ".", "x");
}

#[test]
fn test_7x7_nurikabe_with_a_preshaded_cell() {
    let mut board = Board::empty(7, 7, vec![".".to_owned(), "x".to_owned()]).with_clues([
        ((1, 5), 5),
        ((2, 0), 1),
        ((3, 1), 1),
        ((3, 5), 3),
        ((4, 6), 5),
        ((5, 1), 1),
    ]);
    board.set((2, 5), "x");
    let rules: Vec<Box<dyn Rule>> = vec![Box::new(nurikabe(&board, ".", "x"))];
    let mut solver = Solver::new(board, rules).unwrap();
    let solved = solve_unique(&mut solver);
    assert_eq!(solved.get((2, 5)), Some("x"));
    assert_valid_nurikabe(&solved, ".", "x");
}

#[test]
#[should_panic(expected = "no shaded cells")]
fn test_clues_covering_the_board_panic() {
    let board = Board::empty(2, 2, vec![".".to_owned(), "x".to_owned()])
        .with_clues([((0, 0), 2), ((1, 1), 2)]);
    nurikabe(&board, ".", "x");
}
