use crate::board::{Board, Cell};
use crate::formula::{Clause, ClauseId, Formula, Var};
use crate::rules::Rule;
use crate::{Config, Error};
use bitvec::{bitvec, vec::BitVec};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::thread;
use std::time::Instant;

/// Index of a state symbol in the solver's registry.
pub(crate) type StateId = usize;

/// Deep unsatisfiable branches push one frame per substitution step, which
/// overruns the default stack on larger boards; the search gets its own
/// thread with room to spare.
const SEARCH_STACK: usize = 64 * 1024 * 1024;

fn encode(width: usize, numstates: usize, (row, col): Cell, state: StateId) -> Var {
    (row * width + col) * numstates + state
}

/// The compilation context handed to each leaf rule while its clauses are
/// emitted: the board, the frozen state registry, and the formula under
/// construction. Rules obtain variables exclusively through [`Emitter::var`],
/// so the whole crate shares one variable numbering.
pub struct Emitter<'a> {
    board: &'a Board,
    states: &'a [String],
    state_ids: &'a HashMap<String, StateId>,
    formula: &'a mut Formula,
}

impl<'a> Emitter<'a> {
    pub fn board(&self) -> &Board {
        self.board
    }

    /// The variable for "cell has state", by the solver's bijection.
    pub fn var(&self, cell: Cell, state: &str) -> Result<Var, Error> {
        let (row, col) = cell;
        if !self.board.in_bounds(row, col) {
            return Err(Error::OutOfBounds {
                row,
                col,
                height: self.board.height(),
                width: self.board.width(),
            });
        }
        let id = self
            .state_ids
            .get(state)
            .ok_or_else(|| Error::UnknownState(state.to_owned()))?;
        Ok(encode(self.board.width(), self.states.len(), cell, *id))
    }

    pub fn emit(&mut self, clause: Clause) -> ClauseId {
        self.formula.add(clause)
    }
}

/// Mutually-exclusive state groups, with a reverse map from state to its
/// group. A state belongs to at most one group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Exclusivity {
    groups: Vec<Vec<StateId>>,
    lookup: HashMap<StateId, usize>,
}

impl Exclusivity {
    fn build(
        group_names: Vec<Vec<String>>,
        states: &[String],
        state_ids: &HashMap<String, StateId>,
    ) -> Result<Exclusivity, Error> {
        let mut exclusivity = Exclusivity::default();
        for names in group_names {
            let mut group = Vec::with_capacity(names.len());
            for name in &names {
                let &id = state_ids
                    .get(name)
                    .ok_or_else(|| Error::UnknownState(name.clone()))?;
                if exclusivity.lookup.contains_key(&id) {
                    return Err(Error::SharedExclusivity(states[id].clone()));
                }
                exclusivity.lookup.insert(id, exclusivity.groups.len());
                group.push(id);
            }
            exclusivity.groups.push(group);
        }
        Ok(exclusivity)
    }

    fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn group_of(&self, state: StateId) -> Option<&[StateId]> {
        self.lookup.get(&state).map(|&i| self.groups[i].as_slice())
    }
}

/// One satisfying assignment: polarity for every variable substituted on the
/// search path that produced it. Snapshots are dense and independent of the
/// solver, so they stay valid while the search continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    assigned: BitVec,
    values: BitVec,
}

impl Solution {
    fn new(num_vars: usize) -> Solution {
        Solution {
            assigned: bitvec![0; num_vars],
            values: bitvec![0; num_vars],
        }
    }

    fn set(&mut self, var: Var, polarity: bool) {
        self.assigned.set(var, true);
        self.values.set(var, polarity);
    }

    /// The polarity assigned to `var`, or `None` if the search never touched
    /// it.
    pub fn get(&self, var: Var) -> Option<bool> {
        if var < self.assigned.len() && self.assigned[var] {
            Some(self.values[var])
        } else {
            None
        }
    }

    pub fn is_true(&self, var: Var) -> bool {
        self.get(var) == Some(true)
    }

    /// Variables assigned true, in ascending order.
    pub fn true_vars(&self) -> impl Iterator<Item = Var> + '_ {
        self.assigned.iter_ones().filter(|&var| self.values[var])
    }

    pub fn len(&self) -> usize {
        self.assigned.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.not_any()
    }
}

enum UndoOp {
    Assigned(Var),
    ClauseRemoved(ClauseId, Clause),
    LiteralRemoved(ClauseId, Var, bool),
    IndexRemoved(Var, crate::formula::Occurrences),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The formula emptied out: the trail is a satisfying assignment.
    Satisfied,
    /// A clause emptied out, or one step demanded both polarities of a
    /// variable.
    Conflict,
    /// Neither; keep searching.
    Continue,
}

/// A reversible substitution step. Holds every mutation the step made, in
/// order; reverting plays them back in reverse, restoring the formula, the
/// index, and the trail to structural equality with their prior state.
pub(crate) struct Frame {
    ops: Vec<UndoOp>,
    pub(crate) outcome: Outcome,
}

enum Step {
    Forced(Vec<(Var, bool)>),
    Guess(Var, bool),
    Dead,
}

/// Compiles a board plus rules to CNF and searches for satisfying
/// assignments.
///
/// Construction runs the three registration phases (flatten rules, intern
/// states, emit clauses, collect exclusivity); `solve` runs the recursive
/// substitute/backtrack search. The formula and index are mutated in place
/// during search and restored before `solve` returns, so a solver can be
/// reused.
pub struct Solver {
    board: Board,
    formula: Formula,
    states: Vec<String>,
    state_ids: HashMap<String, StateId>,
    exclusivity: Exclusivity,
    trail: HashMap<Var, bool>,
    config: Config,
}

impl Solver {
    pub fn new(board: Board, rules: Vec<Box<dyn Rule>>) -> Result<Solver, Error> {
        let mut leaves = Vec::new();
        for rule in &rules {
            flatten(rule.as_ref(), &mut leaves);
        }

        // Intern every state, in declaration order; the registry is frozen
        // before any clause is emitted because the bijection depends on it.
        let mut states: Vec<String> = Vec::new();
        let mut state_ids: HashMap<String, StateId> = HashMap::new();
        for leaf in &leaves {
            for state in leaf.states() {
                if !state_ids.contains_key(&state) {
                    state_ids.insert(state.clone(), states.len());
                    states.push(state);
                }
            }
        }

        let mut formula = Formula::new();
        {
            let mut emitter = Emitter {
                board: &board,
                states: &states,
                state_ids: &state_ids,
                formula: &mut formula,
            };
            for leaf in &leaves {
                leaf.emit(&mut emitter)?;
            }
        }

        let mut groups = Vec::new();
        for rule in &rules {
            collect_exclusivity(rule.as_ref(), &mut groups);
        }
        let exclusivity = Exclusivity::build(groups, &states, &state_ids)?;

        Ok(Solver {
            board,
            formula,
            states,
            state_ids,
            exclusivity,
            trail: HashMap::new(),
            config: Config::default(),
        })
    }

    pub fn config(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_vars(&self) -> usize {
        self.board.height() * self.board.width() * self.states.len()
    }

    pub(crate) fn formula(&self) -> &Formula {
        &self.formula
    }

    /// The variable for "cell has state". Same bijection the rules compiled
    /// with.
    pub fn var(&self, cell: Cell, state: &str) -> Result<Var, Error> {
        let (row, col) = cell;
        if !self.board.in_bounds(row, col) {
            return Err(Error::OutOfBounds {
                row,
                col,
                height: self.board.height(),
                width: self.board.width(),
            });
        }
        let id = self
            .state_ids
            .get(state)
            .ok_or_else(|| Error::UnknownState(state.to_owned()))?;
        Ok(encode(self.board.width(), self.states.len(), cell, *id))
    }

    fn decode(&self, var: Var) -> (usize, usize, StateId) {
        let numstates = self.states.len();
        let row = var / (self.board.width() * numstates);
        let col = var / numstates % self.board.width();
        let state = var % numstates;
        (row, col, state)
    }

    /// Debug rendering of a variable as `"<row>_<col>_<state>"`.
    pub fn var_name(&self, var: Var) -> String {
        let (row, col, state) = self.decode(var);
        format!("{}_{}_{}", row, col, self.states[state])
    }

    /// Searches for up to `max_sols` satisfying assignments.
    ///
    /// An empty vector means the formula is unsatisfiable; a formula with no
    /// clauses yields the empty assignment exactly once.
    pub fn solve(&mut self, max_sols: usize) -> Vec<Solution> {
        self.solve_until(max_sols, None)
    }

    /// Like [`Solver::solve`], but additionally gives up once `deadline`
    /// passes. The deadline is polled between substitution steps; on expiry
    /// every pending substitution is unwound, so the solver stays reusable.
    pub fn solve_until(&mut self, max_sols: usize, deadline: Option<Instant>) -> Vec<Solution> {
        #[cfg(debug_assertions)]
        let checkpoint = self.formula.clone();

        let start = Instant::now();
        let mut solutions = Vec::new();
        if !self.formula.has_empty_clause() {
            thread::scope(|scope| {
                thread::Builder::new()
                    .name("gridlock-search".to_owned())
                    .stack_size(SEARCH_STACK)
                    .spawn_scoped(scope, || {
                        self.search(&mut solutions, max_sols, deadline, 0);
                    })
                    .expect("failed to spawn the search thread");
            });
        }
        if self.config.log_elapsed {
            eprintln!(
                "search finished in {}ms with {} solution(s)",
                start.elapsed().as_millis(),
                solutions.len()
            );
        }

        debug_assert!(self.trail.is_empty(), "search left entries on the trail");
        #[cfg(debug_assertions)]
        debug_assert!(
            self.formula == checkpoint,
            "backtracking failed to restore the formula"
        );
        solutions
    }

    /// Projects a satisfying assignment onto a fresh copy of the board. True
    /// variables carrying visible states fill in their cells; auxiliary
    /// states are dropped.
    pub fn solved_board(&self, solution: &Solution) -> Board {
        let mut board = self.board.clone();
        for var in solution.true_vars() {
            let (row, col, state) = self.decode(var);
            board.set((row, col), &self.states[state]);
        }
        board
    }

    fn search(
        &mut self,
        solutions: &mut Vec<Solution>,
        max_sols: usize,
        deadline: Option<Instant>,
        depth: usize,
    ) -> bool {
        if solutions.len() >= max_sols {
            return false;
        }
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                return false;
            }
        }
        if self.formula.is_empty() {
            solutions.push(self.snapshot());
            return true;
        }

        let (entries, forcing) = match self.pick_step() {
            Step::Dead => return false,
            Step::Forced(entries) => (entries, true),
            Step::Guess(var, polarity) => (vec![(var, polarity)], false),
        };
        if self.config.log_steps {
            eprintln!(
                "depth {:4}: {} {}",
                depth,
                if forcing { "forcing" } else { "guessing" },
                self.render_entries(&entries),
            );
        }

        let found = self.branch(&entries, solutions, max_sols, deadline, depth);
        if forcing {
            // Forced literals have no alternative branch.
            return found;
        }
        if solutions.len() >= max_sols {
            return found;
        }

        // A guess always tries the opposite polarity too; that is what lets
        // enumeration continue past the first solution.
        let (var, polarity) = entries[0];
        let found_alt = self.branch(&[(var, !polarity)], solutions, max_sols, deadline, depth);
        found || found_alt
    }

    /// Substitutes `entries`, explores the subtree, and reverts.
    fn branch(
        &mut self,
        entries: &[(Var, bool)],
        solutions: &mut Vec<Solution>,
        max_sols: usize,
        deadline: Option<Instant>,
        depth: usize,
    ) -> bool {
        let frame = self.substitute(entries);
        let found = match frame.outcome {
            Outcome::Satisfied => {
                if self.config.log_solutions {
                    eprintln!("solution found at depth {}", depth);
                }
                solutions.push(self.snapshot());
                true
            }
            Outcome::Conflict => false,
            Outcome::Continue => self.search(solutions, max_sols, deadline, depth + 1),
        };
        self.revert(frame);
        found
    }

    /// Scans the formula, smallest clause id first. Any unit clauses force
    /// their literals as one atomic step; otherwise the smallest-variable
    /// literal of the smallest-id clause becomes the guess.
    fn pick_step(&self) -> Step {
        let mut forced = BTreeSet::new();
        let mut guess = None;
        for (_, clause) in self.formula.iter() {
            match clause.len() {
                0 => return Step::Dead,
                1 => {
                    let literal = clause.first().expect("unit clause with no literal");
                    forced.insert(literal);
                }
                _ => {
                    if guess.is_none() {
                        guess = clause.first();
                    }
                }
            }
        }
        if !forced.is_empty() {
            Step::Forced(forced.into_iter().collect())
        } else {
            let (var, polarity) = guess.expect("no clause to guess from");
            Step::Guess(var, polarity)
        }
    }

    /// Applies a set of (variable, polarity) pairs atomically, returning the
    /// reversible frame.
    ///
    /// Asserting a variable whose state belongs to an exclusivity group
    /// expands to negations of every sibling state at the same cell, within
    /// the same step. Already-substituted variables drop out of the
    /// expansion; a step that demands both polarities of one variable is a
    /// conflict, as is emptying any clause.
    pub(crate) fn substitute(&mut self, entries: &[(Var, bool)]) -> Frame {
        let mut expanded = BTreeSet::new();
        for &entry in entries {
            self.expand_exclusive(entry, &mut expanded);
        }
        assert!(
            !expanded.is_empty(),
            "substitution expanded to nothing; the formula should not mention assigned variables"
        );

        let mut ops = Vec::new();
        let mut outcome = Outcome::Continue;
        let mut seen: HashMap<Var, bool> = HashMap::new();
        'entries: for (var, polarity) in expanded {
            match seen.get(&var) {
                Some(&p) if p == polarity => continue,
                Some(_) => {
                    outcome = Outcome::Conflict;
                    break;
                }
                None => {}
            }
            seen.insert(var, polarity);
            self.trail.insert(var, polarity);
            ops.push(UndoOp::Assigned(var));

            if !self.formula.has_var(var) {
                continue;
            }
            // Clauses the literal satisfies disappear whole.
            for id in self.formula.occurrences(var, polarity) {
                if let Some(clause) = self.formula.take_clause(id) {
                    ops.push(UndoOp::ClauseRemoved(id, clause));
                }
            }
            // Clauses with the opposite literal shrink by one.
            let mut emptied = false;
            for id in self.formula.occurrences(var, !polarity) {
                let Some(remaining) = self.formula.remove_literal(id, var) else {
                    continue;
                };
                ops.push(UndoOp::LiteralRemoved(id, var, !polarity));
                if remaining == 0 {
                    outcome = Outcome::Conflict;
                    emptied = true;
                    break;
                }
            }
            let occurrences = self.formula.take_occurrences(var);
            ops.push(UndoOp::IndexRemoved(var, occurrences));
            if emptied {
                break 'entries;
            }
        }

        if !matches!(outcome, Outcome::Conflict) && self.formula.is_empty() {
            outcome = Outcome::Satisfied;
        }
        Frame { ops, outcome }
    }

    /// Undoes a substitution frame, strictly in reverse.
    pub(crate) fn revert(&mut self, frame: Frame) {
        for op in frame.ops.into_iter().rev() {
            match op {
                UndoOp::Assigned(var) => {
                    self.trail.remove(&var);
                }
                UndoOp::ClauseRemoved(id, clause) => self.formula.restore_clause(id, clause),
                UndoOp::LiteralRemoved(id, var, polarity) => {
                    self.formula.restore_literal(id, var, polarity)
                }
                UndoOp::IndexRemoved(var, occurrences) => {
                    self.formula.restore_occurrences(var, occurrences)
                }
            }
        }
    }

    fn expand_exclusive(&self, (var, polarity): (Var, bool), out: &mut BTreeSet<(Var, bool)>) {
        if !polarity || self.exclusivity.is_empty() {
            if !self.trail.contains_key(&var) {
                out.insert((var, polarity));
            }
            return;
        }
        let (row, col, state) = self.decode(var);
        match self.exclusivity.group_of(state) {
            None => {
                if !self.trail.contains_key(&var) {
                    out.insert((var, polarity));
                }
            }
            Some(group) => {
                for &sibling in group {
                    let sibling_var =
                        encode(self.board.width(), self.states.len(), (row, col), sibling);
                    if self.trail.contains_key(&sibling_var) {
                        continue;
                    }
                    out.insert((sibling_var, sibling_var == var));
                }
            }
        }
    }

    fn snapshot(&self) -> Solution {
        let mut solution = Solution::new(self.num_vars());
        for (&var, &polarity) in &self.trail {
            solution.set(var, polarity);
        }
        solution
    }

    fn render_entries(&self, entries: &[(Var, bool)]) -> String {
        let rendered: Vec<String> = entries
            .iter()
            .map(|&(var, polarity)| {
                format!("{}{}", if polarity { "" } else { "!" }, self.var_name(var))
            })
            .collect();
        rendered.join(" ")
    }
}

impl fmt::Debug for Solver {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Solver")
            .field("states", &self.states)
            .field("clauses", &self.formula.len())
            .field("trail", &self.trail.len())
            .finish()
    }
}

fn flatten<'a>(rule: &'a dyn Rule, out: &mut Vec<&'a dyn Rule>) {
    match rule.children() {
        Some(children) => {
            for child in children {
                flatten(child.as_ref(), out);
            }
        }
        None => out.push(rule),
    }
}

fn collect_exclusivity(rule: &dyn Rule, out: &mut Vec<Vec<String>>) {
    if let Some(group) = rule.exclusivity() {
        out.push(group);
    }
    if let Some(children) = rule.children() {
        for child in children {
            collect_exclusivity(child.as_ref(), out);
        }
    }
}

#[cfg(test)]
use crate::rules::{exactly_one_in, AtLeastOneIn, AtLeastOnePerCell, ExclusiveStates, RuleGroup};

#[cfg(test)]
fn states(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_variable_bijection() {
    let board = Board::empty(3, 4, states(&["a", "b", "c"]));
    let rules: Vec<Box<dyn Rule>> = vec![Box::new(AtLeastOnePerCell::new(["a", "b", "c"]))];
    let solver = Solver::new(board, rules).unwrap();
    for row in 0..3 {
        for col in 0..4 {
            for state in ["a", "b", "c"] {
                let var = solver.var((row, col), state).unwrap();
                let (r, c, s) = solver.decode(var);
                assert_eq!((r, c, solver.states[s].as_str()), (row, col, state));
            }
        }
    }
    assert_eq!(solver.var_name(solver.var((2, 3), "b").unwrap()), "2_3_b");
    assert!(solver.var((3, 0), "a").is_err());
    assert!(solver.var((0, 0), "zzz").is_err());
}

#[test]
fn test_tiny_sat() {
    // (a | b) & (!a | !b), with a = cell (0,0) and b = cell (0,1).
    let board = Board::empty(1, 2, states(&["on"]));
    let cells = vec![(0, 0), (0, 1)];
    let rules: Vec<Box<dyn Rule>> = vec![Box::new(exactly_one_in(["on"], cells))];
    let mut solver = Solver::new(board, rules).unwrap();

    let solutions = solver.solve(10);
    assert_eq!(solutions.len(), 2);
    let a = solver.var((0, 0), "on").unwrap();
    let b = solver.var((0, 1), "on").unwrap();
    for solution in &solutions {
        assert_ne!(solution.is_true(a), solution.is_true(b));
    }
}

#[test]
fn test_solutions_satisfy_every_original_clause() {
    let board = Board::empty(2, 2, states(&["a", "b"]));
    let rules: Vec<Box<dyn Rule>> = vec![Box::new(RuleGroup::exclusive(
        vec![Box::new(AtLeastOnePerCell::new(["a", "b"]))],
        states(&["a", "b"]),
    ))];
    let mut solver = Solver::new(board, rules).unwrap();
    let original = solver.formula().clone();

    let solutions = solver.solve(100);
    // Two choices per cell, four cells.
    assert_eq!(solutions.len(), 16);
    for solution in &solutions {
        for (_, clause) in original.iter() {
            assert!(
                clause
                    .iter()
                    .any(|(var, polarity)| solution.get(var) == Some(polarity)),
                "clause {} unsatisfied",
                clause
            );
        }
        // Exclusivity: at most one of each group per cell.
        for cell in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            let a = solver.var(cell, "a").unwrap();
            let b = solver.var(cell, "b").unwrap();
            assert!(!(solution.is_true(a) && solution.is_true(b)));
        }
    }
}

#[test]
fn test_empty_formula_yields_empty_assignment_once() {
    let board = Board::empty(2, 2, vec![]);
    let mut solver = Solver::new(board, Vec::new()).unwrap();
    let solutions = solver.solve(5);
    assert_eq!(solutions.len(), 1);
    assert!(solutions[0].is_empty());
}

#[test]
fn test_empty_clause_yields_no_solutions() {
    let board = Board::empty(1, 1, states(&["a"]));
    // An at-least-one over zero cells is the empty clause.
    let rules: Vec<Box<dyn Rule>> = vec![
        Box::new(AtLeastOneIn::new(["a"], Vec::new())),
        Box::new(AtLeastOnePerCell::new(["a"])),
    ];
    let mut solver = Solver::new(board, rules).unwrap();
    assert!(solver.solve(5).is_empty());
}

#[test]
fn test_exclusivity_expansion_on_the_trail() {
    let board = Board::empty(1, 1, states(&["a", "b", "c"]));
    let rules: Vec<Box<dyn Rule>> = vec![
        Box::new(AtLeastOnePerCell::new(["a", "b", "c"])),
        Box::new(ExclusiveStates::new(["a", "b", "c"])),
    ];
    let mut solver = Solver::new(board, rules).unwrap();
    let before = solver.formula().clone();

    let a = solver.var((0, 0), "a").unwrap();
    let b = solver.var((0, 0), "b").unwrap();
    let c = solver.var((0, 0), "c").unwrap();

    // Asserting a=true must, in the same step, record b=false and c=false.
    let frame = solver.substitute(&[(a, true)]);
    assert!(matches!(frame.outcome, Outcome::Satisfied));
    assert_eq!(solver.trail.get(&a), Some(&true));
    assert_eq!(solver.trail.get(&b), Some(&false));
    assert_eq!(solver.trail.get(&c), Some(&false));

    // Reverting removes all three and restores the formula exactly.
    solver.revert(frame);
    assert!(solver.trail.is_empty());
    assert_eq!(solver.formula(), &before);
}

#[test]
fn test_conflicting_step_is_rejected_and_reverted() {
    let board = Board::empty(1, 2, states(&["a"]));
    let rules: Vec<Box<dyn Rule>> =
        vec![Box::new(AtLeastOneIn::new(["a"], vec![(0, 0), (0, 1)]))];
    let mut solver = Solver::new(board, rules).unwrap();
    let before = solver.formula().clone();

    let a = solver.var((0, 0), "a").unwrap();
    let frame = solver.substitute(&[(a, true), (a, false)]);
    assert!(matches!(frame.outcome, Outcome::Conflict));
    solver.revert(frame);
    assert!(solver.trail.is_empty());
    assert_eq!(solver.formula(), &before);
}

#[test]
fn test_solver_is_reusable_after_solving() {
    let board = Board::empty(1, 2, states(&["on"]));
    let rules: Vec<Box<dyn Rule>> =
        vec![Box::new(exactly_one_in(["on"], vec![(0, 0), (0, 1)]))];
    let mut solver = Solver::new(board, rules).unwrap();
    let first = solver.solve(10);
    let second = solver.solve(10);
    assert_eq!(first, second);
}

#[test]
fn test_deadline_in_the_past_finds_nothing() {
    let board = Board::empty(1, 2, states(&["on"]));
    let rules: Vec<Box<dyn Rule>> =
        vec![Box::new(exactly_one_in(["on"], vec![(0, 0), (0, 1)]))];
    let mut solver = Solver::new(board, rules).unwrap();
    let solutions = solver.solve_until(10, Some(Instant::now()));
    assert!(solutions.is_empty());
    // Still reusable afterwards.
    assert_eq!(solver.solve(10).len(), 2);
}

#[test]
fn test_state_in_two_groups_is_rejected() {
    let board = Board::empty(1, 1, states(&["a", "b", "c"]));
    let rules: Vec<Box<dyn Rule>> = vec![
        Box::new(AtLeastOnePerCell::new(["a", "b", "c"])),
        Box::new(ExclusiveStates::new(["a", "b"])),
        Box::new(ExclusiveStates::new(["b", "c"])),
    ];
    match Solver::new(board, rules) {
        Err(Error::SharedExclusivity(state)) => assert_eq!(state, "b"),
        other => panic!("expected a shared-exclusivity error, got {:?}", other.map(|_| ())),
    }
}
