//! A formula in conjunctive normal form: a conjunction of clauses.

use crate::sat::clause::Clause;
use crate::sat::clause_storage::LiteralStorage;
use crate::sat::literal::{Literal, PackedLiteral};
use smallvec::SmallVec;
use std::fmt::{self, Display};

/// A CNF formula. Clauses are kept in the order they were given.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf<L: Literal = PackedLiteral, S: LiteralStorage<L> = SmallVec<[L; 3]>> {
    /// The clauses of the formula.
    pub clauses: Vec<Clause<L, S>>,
    /// The number of variables, taken to be the largest variable identifier
    /// occurring in the formula (or declared by the source).
    pub num_vars: usize,
}

impl<L: Literal, S: LiteralStorage<L>> Cnf<L, S> {
    /// Creates a formula from clauses in signed-integer form, deriving the
    /// variable count from the largest identifier present.
    pub fn new(clauses: Vec<Vec<i32>>) -> Self {
        let num_vars = clauses
            .iter()
            .flatten()
            .map(|l| l.unsigned_abs() as usize)
            .max()
            .unwrap_or(0);

        Self {
            clauses: clauses.iter().map(|c| Clause::new(c)).collect(),
            num_vars,
        }
    }

    /// Creates a formula with an explicit variable count. The count is raised
    /// if a clause mentions a larger identifier.
    pub fn with_num_vars(clauses: Vec<Vec<i32>>, num_vars: usize) -> Self {
        let mut cnf = Self::new(clauses);
        cnf.num_vars = cnf.num_vars.max(num_vars);
        cnf
    }

    /// Iterates over the clauses in order.
    pub fn iter(&self) -> impl Iterator<Item = &Clause<L, S>> {
        self.clauses.iter()
    }

    /// `true` if the formula has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Number of clauses.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }
}

impl<L: Literal, S: LiteralStorage<L>> From<Vec<Vec<i32>>> for Cnf<L, S> {
    fn from(clauses: Vec<Vec<i32>>) -> Self {
        Self::new(clauses)
    }
}

impl<L: Literal, S: LiteralStorage<L>> Display for Cnf<L, S> {
    /// Renders the formula in DIMACS CNF format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        for clause in &self.clauses {
            for lit in clause.iter() {
                write!(f, "{} ", lit.to_i32())?;
            }
            writeln!(f, "0")?;
        }
        Ok(())
    }
}
