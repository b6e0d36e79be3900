//! A plain backtracking solver for 3-CNF (and general CNF) formulas.
//!
//! This is deliberately simple: variables are tried in increasing order, each
//! branch assigns true then false, and a branch is abandoned as soon as some
//! clause is falsified. There are no heuristics, no propagation, no learning —
//! the solver exists to exercise reduced formulas, not to compete.

use crate::sat::assignment::{Assignment, Solutions};
use crate::sat::clause::Clause;
use crate::sat::clause_storage::LiteralStorage;
use crate::sat::cnf::Cnf;
use crate::sat::literal::{Literal, PackedLiteral};
use smallvec::SmallVec;

/// A recursive backtracking SAT solver.
#[derive(Debug, Clone)]
pub struct Backtracking<L: Literal = PackedLiteral, S: LiteralStorage<L> = SmallVec<[L; 3]>> {
    /// The formula under consideration.
    pub cnf: Cnf<L, S>,
    assignment: Assignment,
    backtracks: u64,
}

impl<L: Literal, S: LiteralStorage<L>> Backtracking<L, S> {
    /// Creates a solver for the given formula.
    pub fn new(cnf: Cnf<L, S>) -> Self {
        let assignment = Assignment::new(cnf.num_vars);
        Self {
            cnf,
            assignment,
            backtracks: 0,
        }
    }

    /// Searches for a satisfying assignment.
    ///
    /// Returns the model in signed-integer form if one exists, `None` if the
    /// formula is unsatisfiable.
    pub fn solve(&mut self) -> Option<Solutions> {
        self.assignment = Assignment::new(self.cnf.num_vars);
        self.backtracks = 0;

        if self.search() {
            Some(self.assignment.get_solutions())
        } else {
            None
        }
    }

    /// The assignment as left by the last `solve` call.
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// Number of search nodes visited by the last `solve` call.
    pub fn backtracks(&self) -> u64 {
        self.backtracks
    }

    fn search(&mut self) -> bool {
        self.backtracks += 1;

        if self.has_conflict() {
            return false;
        }

        let Some(var) = self.assignment.first_unassigned() else {
            return self.is_satisfied();
        };

        for value in [true, false] {
            self.assignment.set(var, value);
            if self.search() {
                return true;
            }
        }

        self.assignment.unset(var);
        false
    }

    /// The value of a clause under the current partial assignment: `Some(true)`
    /// if some literal is true, `Some(false)` if all literals are false, `None`
    /// while undetermined.
    fn clause_value(&self, clause: &Clause<L, S>) -> Option<bool> {
        let mut has_unassigned = false;

        for &lit in clause.iter() {
            match self.assignment.literal_value(lit) {
                Some(true) => return Some(true),
                Some(false) => {}
                None => has_unassigned = true,
            }
        }

        if has_unassigned { None } else { Some(false) }
    }

    fn has_conflict(&self) -> bool {
        self.cnf
            .iter()
            .any(|clause| self.clause_value(clause) == Some(false))
    }

    fn is_satisfied(&self) -> bool {
        self.cnf
            .iter()
            .all(|clause| self.clause_value(clause) == Some(true))
    }
}
