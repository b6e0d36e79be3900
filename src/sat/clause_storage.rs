//! Storage backends for the literals of a clause.
//!
//! Reduced clauses always hold exactly three literals, so the default storage
//! is a `SmallVec` with inline capacity for three; source clauses of arbitrary
//! arity can use a plain `Vec`.

use crate::sat::literal;
use crate::sat::literal::Literal;
use smallvec::SmallVec;
use std::fmt::Debug;
use std::ops::{Index, IndexMut};
use std::slice::Iter;

/// Abstraction over the container holding a clause's literals.
pub trait LiteralStorage<L: Literal>:
    Index<usize, Output = L>
    + IndexMut<usize, Output = L>
    + FromIterator<L>
    + From<Vec<L>>
    + Extend<L>
    + Clone
    + Default
    + Debug
    + AsRef<[L]>
{
    /// Appends a literal.
    fn push(&mut self, literal: L);

    /// Number of literals stored.
    fn len(&self) -> usize;

    /// `true` if no literals are stored.
    fn is_empty(&self) -> bool;

    /// Iterates over the stored literals.
    fn iter(&self) -> Iter<L>;
}

impl<L: Literal> LiteralStorage<L> for Vec<L> {
    fn push(&mut self, literal: L) {
        self.push(literal);
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn is_empty(&self) -> bool {
        self.is_empty()
    }

    fn iter(&self) -> Iter<L> {
        self.as_slice().iter()
    }
}

impl<L: Literal, const N: usize> LiteralStorage<L> for SmallVec<[L; N]> {
    fn push(&mut self, literal: L) {
        self.push(literal);
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn is_empty(&self) -> bool {
        self.is_empty()
    }

    fn iter(&self) -> Iter<L> {
        self.as_slice().iter()
    }
}

/// Converts the literals of one storage into a `Vec` of another literal type.
pub fn convert<L: Literal, U: Literal, T: LiteralStorage<L>>(literals: &T) -> Vec<U> {
    literals.iter().map(literal::convert::<L, U>).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::literal::PackedLiteral;

    #[test]
    fn test_smallvec_storage() {
        let mut storage: SmallVec<[PackedLiteral; 3]> = SmallVec::new();
        storage.push(PackedLiteral::from_i32(1));
        storage.push(PackedLiteral::from_i32(-2));
        assert_eq!(LiteralStorage::len(&storage), 2);
        assert!(!LiteralStorage::is_empty(&storage));
    }
}
