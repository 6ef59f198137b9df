//! See README.md

use argh::FromArgs;
use gridlock::puzzles::{nurikabe, sudoku};
use gridlock::rules::{Rule, RuleGroup};
use gridlock::{Board, BoardSet, Solver};
use rayon::prelude::*;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use std::time::{Duration, Instant};

/************************
 *     Input            *
 ************************/

/// One token of a puzzle grid: a symbol, or '.' for an undecided cell.
#[derive(Debug, Clone)]
struct Entry(Option<String>);

impl FromStr for Entry {
    type Err = BadInput;

    fn from_str(word: &str) -> Result<Entry, BadInput> {
        if word == "." {
            Ok(Entry(None))
        } else if word.chars().all(|ch| ch.is_alphanumeric()) {
            Ok(Entry(Some(word.to_owned())))
        } else {
            Err(BadInput::BadEntry(word.to_owned()))
        }
    }
}

#[derive(Debug)]
enum BadInput {
    Empty,
    BadHeader(String),
    BadEntry(String),
    BadClue(String),
    BadShape(String),
    Ragged,
}

impl fmt::Display for BadInput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BadInput::Empty => write!(f, "empty puzzle file"),
            BadInput::BadHeader(line) => write!(
                f,
                "bad header '{}' (expected 'sudoku <box_height> <box_width>' or 'nurikabe')",
                line
            ),
            BadInput::BadEntry(word) => write!(f, "bad entry '{}'", word),
            BadInput::BadClue(word) => write!(f, "bad number clue '{}'", word),
            BadInput::BadShape(message) => write!(f, "{}", message),
            BadInput::Ragged => write!(f, "grid rows must all have the same width"),
        }
    }
}

/// Reads the grid lines below the header into rows of entries.
fn parse_grid(lines: &[&str]) -> Result<Vec<Vec<Entry>>, BadInput> {
    let mut grid = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(Entry::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        grid.push(row);
    }
    if grid.is_empty() {
        return Err(BadInput::Empty);
    }
    let width = grid[0].len();
    if grid.iter().any(|row| row.len() != width) {
        return Err(BadInput::Ragged);
    }
    Ok(grid)
}

/// A puzzle file is a one-line header naming the puzzle type, then the grid,
/// one whitespace-separated token per cell.
fn parse_puzzle(text: &str) -> Result<(Board, RuleGroup), BadInput> {
    let mut lines = text.lines().filter(|line| !line.trim_start().starts_with('#'));
    let header = lines.next().ok_or(BadInput::Empty)?;
    let rest: Vec<&str> = lines.collect();
    let mut header_words = header.split_whitespace();

    match header_words.next() {
        Some("sudoku") => {
            let reg_height = parse_dim(header_words.next(), header)?;
            let reg_width = parse_dim(header_words.next(), header)?;
            let grid = parse_grid(&rest)?;
            let size = grid[0].len();
            if grid.len() != size {
                return Err(BadInput::BadShape("a sudoku grid must be square".to_owned()));
            }
            if reg_height == 0 || reg_width == 0 || reg_height * reg_width != size {
                return Err(BadInput::BadShape(format!(
                    "{}x{} boxes do not tile a {}x{} grid",
                    reg_height, reg_width, size, size
                )));
            }
            let states: Vec<String> = (1..=size).map(|n| n.to_string()).collect();
            let data = grid
                .into_iter()
                .map(|row| row.into_iter().map(|Entry(symbol)| symbol).collect())
                .collect();
            let board = Board::new(data, states.clone());
            let rules = sudoku(&board, &states, reg_height, reg_width);
            Ok((board, rules))
        }
        Some("nurikabe") => {
            let grid = parse_grid(&rest)?;
            let mut data = Vec::with_capacity(grid.len());
            let mut clues = Vec::new();
            for (row_index, row) in grid.into_iter().enumerate() {
                let mut data_row = Vec::with_capacity(row.len());
                for (col_index, Entry(symbol)) in row.into_iter().enumerate() {
                    match symbol.as_deref() {
                        None => data_row.push(None),
                        Some("x") => data_row.push(Some("x".to_owned())),
                        Some(word) => {
                            let size = usize::from_str(word)
                                .map_err(|_| BadInput::BadClue(word.to_owned()))?;
                            if size == 0 {
                                return Err(BadInput::BadClue(word.to_owned()));
                            }
                            clues.push(((row_index, col_index), size));
                            data_row.push(None);
                        }
                    }
                }
                data.push(data_row);
            }
            let area = data.len() * data[0].len();
            let total: usize = clues.iter().map(|&(_, size)| size).sum();
            if total >= area {
                return Err(BadInput::BadShape(
                    "number clues cover the whole grid".to_owned(),
                ));
            }
            let board =
                Board::new(data, vec![".".to_owned(), "x".to_owned()]).with_clues(clues);
            let rules = nurikabe(&board, ".", "x");
            Ok((board, rules))
        }
        _ => Err(BadInput::BadHeader(header.to_owned())),
    }
}

fn parse_dim(word: Option<&str>, header: &str) -> Result<usize, BadInput> {
    word.and_then(|w| usize::from_str(w).ok())
        .ok_or_else(|| BadInput::BadHeader(header.to_owned()))
}

/************************
 *     Main             *
 ************************/

/// gridlock: solve grid logic puzzles by compiling them to CNF
#[derive(Debug, FromArgs)]
struct Args {
    /// puzzle files to solve
    #[argh(positional)]
    puzzles: Vec<PathBuf>,

    /// how many solutions to search for per puzzle (default 1)
    #[argh(option, short = 'n', long = "max-solutions", default = "1")]
    max_solutions: usize,

    /// give up on a puzzle after this many seconds
    #[argh(option, long = "timeout")]
    timeout: Option<u64>,

    /// log every forcing and guessing step (very chatty)
    #[argh(switch, long = "log-steps")]
    log_steps: bool,

    /// log when a solution is found
    #[argh(switch, long = "log-solutions")]
    log_solutions: bool,

    /// log how long each search took
    #[argh(switch, long = "log-elapsed")]
    log_elapsed: bool,
}

fn solve_file(path: &PathBuf, args: &Args) -> Result<Vec<Board>, String> {
    let text = fs::read_to_string(path).map_err(|err| err.to_string())?;
    let (board, rules) = parse_puzzle(&text).map_err(|err| err.to_string())?;
    let rules: Vec<Box<dyn Rule>> = vec![Box::new(rules)];
    let mut solver = Solver::new(board, rules).map_err(|err| err.to_string())?;
    solver.config().log_steps = args.log_steps;
    solver.config().log_solutions = args.log_solutions;
    solver.config().log_elapsed = args.log_elapsed;

    let deadline = args
        .timeout
        .map(|secs| Instant::now() + Duration::from_secs(secs));
    let solutions = solver.solve_until(args.max_solutions, deadline);
    Ok(solutions
        .iter()
        .map(|solution| solver.solved_board(solution))
        .collect())
}

fn main() {
    let args = argh::from_env::<Args>();
    if args.puzzles.is_empty() {
        eprintln!("no puzzle files given; try --help");
        process::exit(2);
    }

    // Puzzles are independent; solve them on parallel threads.
    let results: Vec<(&PathBuf, Result<Vec<Board>, String>)> = args
        .puzzles
        .par_iter()
        .map(|path| (path, solve_file(path, &args)))
        .collect();

    let width = termsize::get().map(|size| size.cols as usize).unwrap_or(90);
    let mut failed = false;
    for (path, result) in results {
        match result {
            Ok(boards) if !boards.is_empty() => {
                println!("{}: {} solution(s)", path.display(), boards.len());
                print!("{}", BoardSet::with_width(boards, width));
            }
            Ok(_) => {
                println!("{}: unsatisfiable", path.display());
                failed = true;
            }
            Err(message) => {
                eprintln!("{}: {}", path.display(), message);
                failed = true;
            }
        }
    }
    process::exit(if failed { 1 } else { 0 });
}

#[test]
fn test_parse_sudoku_file() {
    let (board, _) = parse_puzzle("sudoku 2 2\n. 1 . .\n. . 3 .\n4 . . .\n. . . 2\n").unwrap();
    assert_eq!(board.height(), 4);
    assert_eq!(board.get((0, 1)), Some("1"));
    assert_eq!(board.get((0, 0)), None);
}

#[test]
fn test_parse_nurikabe_file() {
    let (board, _) = parse_puzzle("nurikabe\n. 2 .\n. . x\n3 . .\n").unwrap();
    assert_eq!(board.get((1, 2)), Some("x"));
    assert_eq!(board.clues().get(&(0, 1)), Some(&2));
    assert_eq!(board.clues().get(&(2, 0)), Some(&3));
}

#[test]
fn test_bad_header_is_rejected() {
    assert!(parse_puzzle("kakuro\n. .\n").is_err());
    assert!(parse_puzzle("").is_err());
}
