use crate::board::Board;
use std::fmt;
use std::fmt::Display;

const PADDING: usize = 4;
const DEFAULT_WIDTH: usize = 90;

/// A bunch of boards. This type exists solely for its `Display` method, which
/// prints the boards side by side when they fit in the width budget.
pub struct BoardSet {
    boards: Vec<Board>,
    max_width: usize,
}

impl BoardSet {
    pub fn new(boards: Vec<Board>) -> BoardSet {
        BoardSet::with_width(boards, DEFAULT_WIDTH)
    }

    /// Caps the rendered width at `max_width` columns (e.g. the terminal
    /// width).
    pub fn with_width(boards: Vec<Board>, max_width: usize) -> BoardSet {
        BoardSet { boards, max_width }
    }
}

impl Display for BoardSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let blocks: Vec<Vec<String>> = self
            .boards
            .iter()
            .map(|board| format!("{}", board).lines().map(str::to_owned).collect())
            .collect();

        let mut row_start = 0;
        while row_start < blocks.len() {
            // Take as many boards as fit on one band of lines.
            let mut row_end = row_start + 1;
            let mut used = PADDING + block_width(&blocks[row_start]);
            while row_end < blocks.len() {
                let next = PADDING + block_width(&blocks[row_end]);
                if used + next > self.max_width {
                    break;
                }
                used += next;
                row_end += 1;
            }

            let band = &blocks[row_start..row_end];
            let depth = band.iter().map(Vec::len).max().unwrap_or(0);
            for line_index in 0..depth {
                let mut line = String::new();
                for block in band {
                    line.push_str(&format!("{:padding$}", "", padding = PADDING));
                    let content = block.get(line_index).map(String::as_str).unwrap_or("");
                    line.push_str(&format!(
                        "{:block_w$}",
                        content,
                        block_w = block_width(block)
                    ));
                }
                writeln!(f, "{}", line.trim_end())?;
            }
            if row_end < blocks.len() {
                writeln!(f)?;
            }
            row_start = row_end;
        }
        Ok(())
    }
}

fn block_width(lines: &[String]) -> usize {
    lines.iter().map(|line| line.chars().count()).max().unwrap_or(0)
}

#[test]
fn test_boards_pack_side_by_side() {
    let board = Board::new(
        vec![vec![Some("1".to_owned()), None]],
        vec!["1".to_owned()],
    );
    let set = BoardSet::with_width(vec![board.clone(), board.clone()], 80);
    assert_eq!(format!("{}", set), "    1 _    1 _\n");

    // Too narrow: one board per band.
    let set = BoardSet::with_width(vec![board.clone(), board], 10);
    assert_eq!(format!("{}", set), "    1 _\n\n    1 _\n");
}
