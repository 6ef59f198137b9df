//! The rule library: the [`Rule`] trait, the [`RuleGroup`] composite, and the
//! reusable grid constraints puzzles are assembled from.
//!
//! A rule knows which state symbols it introduces or consumes, optionally
//! declares those states mutually exclusive within a cell, and compiles
//! itself to clauses through the solver's [`Emitter`](crate::Emitter). Rules
//! never invent their own variable numbering.

use crate::solver::Emitter;
use crate::Error;
use std::fmt;

mod cell;
mod connected;
mod count;
mod given;
mod region;

pub use cell::{AtLeastOnePerCell, NoAdjacentStates, NoTwoByTwo};
pub use connected::{bounded_region, connected_region, ConnectedTree, LinkStates};
pub use count::AtMostInBoard;
pub use given::{FixCells, Givens};
pub use region::{exactly_one_in, exactly_one_tiled, AtLeastOneIn, AtMostOneIn};

/// One unit of constraint over a board.
///
/// Leaf rules emit clauses; composite rules expose children and are flattened
/// before registration. Either kind may declare one exclusivity group, but a
/// composite and a descendant must not both declare the same states.
pub trait Rule: fmt::Debug + Send + Sync {
    /// State symbols this rule introduces or constrains, in a fixed order.
    fn states(&self) -> Vec<String>;

    /// Child rules, for composites. Leaves return `None`.
    fn children(&self) -> Option<&[Box<dyn Rule>]> {
        None
    }

    /// States declared mutually exclusive within a cell at this level.
    fn exclusivity(&self) -> Option<Vec<String>> {
        None
    }

    /// Emits this rule's clauses. Composites never reach this point; leaves
    /// with no clauses of their own may keep the default.
    fn emit(&self, emitter: &mut Emitter) -> Result<(), Error> {
        let _ = emitter;
        Ok(())
    }
}

/// A grouping of rules, often sharing states, registered as a unit.
#[derive(Debug)]
pub struct RuleGroup {
    rules: Vec<Box<dyn Rule>>,
    states: Vec<String>,
    exclusive: bool,
}

impl RuleGroup {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> RuleGroup {
        RuleGroup {
            rules,
            states: Vec::new(),
            exclusive: false,
        }
    }

    /// A group that additionally declares `states` as one exclusivity group.
    /// No descendant may declare the same set.
    pub fn exclusive(rules: Vec<Box<dyn Rule>>, states: Vec<String>) -> RuleGroup {
        RuleGroup {
            rules,
            states,
            exclusive: true,
        }
    }

    pub fn push(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }
}

impl Rule for RuleGroup {
    fn states(&self) -> Vec<String> {
        self.states.clone()
    }

    fn children(&self) -> Option<&[Box<dyn Rule>]> {
        Some(&self.rules)
    }

    fn exclusivity(&self) -> Option<Vec<String>> {
        self.exclusive.then(|| self.states.clone())
    }
}

/// A leaf that emits no clauses: it exists to register its states and declare
/// them mutually exclusive.
#[derive(Debug)]
pub struct ExclusiveStates {
    states: Vec<String>,
}

impl ExclusiveStates {
    pub fn new<S: Into<String>>(states: impl IntoIterator<Item = S>) -> ExclusiveStates {
        ExclusiveStates {
            states: states.into_iter().map(Into::into).collect(),
        }
    }
}

impl Rule for ExclusiveStates {
    fn states(&self) -> Vec<String> {
        self.states.clone()
    }

    fn exclusivity(&self) -> Option<Vec<String>> {
        Some(self.states.clone())
    }
}

/// All unordered pairs of distinct items, in index order.
pub(crate) fn pairs<T>(items: &[T]) -> impl Iterator<Item = (&T, &T)> {
    items.iter().enumerate().flat_map(move |(i, first)| {
        items[i + 1..].iter().map(move |second| (first, second))
    })
}

/// Test support: whether a set of cells is 4-connected (vacuously true when
/// empty).
#[cfg(test)]
pub(crate) fn is_connected(cells: &[crate::board::Cell]) -> bool {
    if cells.is_empty() {
        return true;
    }
    let mut reached = vec![cells[0]];
    let mut frontier = vec![cells[0]];
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
    reached.len() == cells.len()
}

#[test]
fn test_pairs() {
    let items = [1, 2, 3];
    let all: Vec<(i32, i32)> = pairs(&items).map(|(&a, &b)| (a, b)).collect();
    assert_eq!(all, vec![(1, 2), (1, 3), (2, 3)]);
    assert_eq!(pairs::<i32>(&[]).count(), 0);
    assert_eq!(pairs(&[7]).count(), 0);
}
