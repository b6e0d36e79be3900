//! A clause: a disjunction of literals.

use crate::sat::clause_storage::LiteralStorage;
use crate::sat::literal::{Literal, PackedLiteral};
use core::ops::{Index, IndexMut};
use smallvec::SmallVec;
use std::fmt::{self, Display};
use std::marker::PhantomData;

/// A disjunction of literals. Order and duplicates are preserved as given.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Clause<L: Literal = PackedLiteral, S: LiteralStorage<L> = SmallVec<[L; 3]>> {
    /// The literals of the clause.
    pub literals: S,
    phantom: PhantomData<L>,
}

impl<L: Literal, S: LiteralStorage<L>> Clause<L, S> {
    /// Creates a clause from DIMACS-style signed integers.
    pub fn new(literals: &[i32]) -> Self {
        Self {
            literals: literals.iter().map(|&l| L::from_i32(l)).collect(),
            phantom: PhantomData,
        }
    }

    /// Number of literals (the arity of the clause).
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// `true` if the clause has no literals (an empty disjunction, i.e. false).
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// `true` if the clause has exactly one literal.
    pub fn is_unit(&self) -> bool {
        self.len() == 1
    }

    /// Iterates over the literals.
    pub fn iter(&self) -> impl Iterator<Item = &L> {
        self.literals.iter()
    }

    /// The literals in signed-integer form, in order.
    pub fn to_i32s(&self) -> Vec<i32> {
        self.literals.iter().map(|l| l.to_i32()).collect()
    }
}

impl<L: Literal, S: LiteralStorage<L>> From<Vec<L>> for Clause<L, S> {
    fn from(literals: Vec<L>) -> Self {
        Self {
            literals: S::from(literals),
            phantom: PhantomData,
        }
    }
}

impl<L: Literal, S: LiteralStorage<L>> From<&[i32]> for Clause<L, S> {
    fn from(literals: &[i32]) -> Self {
        Self::new(literals)
    }
}

impl<L: Literal, S: LiteralStorage<L>> Index<usize> for Clause<L, S> {
    type Output = L;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl<L: Literal, S: LiteralStorage<L>> IndexMut<usize> for Clause<L, S> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.literals[index]
    }
}

impl<L: Literal, S: LiteralStorage<L>> Display for Clause<L, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.iter().map(|l| l.to_i32().to_string()).collect();
        write!(f, "({})", rendered.join(" \u{2228} "))
    }
}
