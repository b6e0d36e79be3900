#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Literal representations for CNF formulas.
//!
//! A literal is a variable together with a polarity: `true` for the variable
//! itself, `false` for its negation. The `Literal` trait abstracts over the
//! concrete encoding so the reducer and solver can be instantiated with
//! whichever representation suits the caller.

use core::ops::Not;
use std::fmt::Debug;
use std::hash::Hash;

/// A variable identifier. Identifiers are positive; `0` is never a valid
/// variable.
pub type Variable = u32;

/// A literal: a variable reference with a polarity.
pub trait Literal: Copy + Debug + Eq + Hash + Default {
    /// Creates a literal for `var` with the given polarity (`true` = positive).
    fn new(var: Variable, polarity: bool) -> Self;

    /// The variable this literal refers to.
    fn variable(self) -> Variable;

    /// `true` if the literal is the plain variable, `false` if negated.
    fn polarity(self) -> bool;

    /// The same variable with the opposite polarity.
    #[must_use]
    fn negated(self) -> Self;

    /// `true` if this literal is a negation.
    fn is_negated(self) -> bool {
        !self.polarity()
    }

    /// Builds a literal from DIMACS-style signed-integer form: positive
    /// integers are plain variables, negative integers are negations.
    #[must_use]
    fn from_i32(value: i32) -> Self {
        let polarity = value.is_positive();
        let var = value.unsigned_abs();
        Self::new(var, polarity)
    }

    /// The signed-integer form of this literal.
    ///
    /// # Panics
    ///
    /// If the variable identifier does not fit in an `i32`.
    #[must_use]
    fn to_i32(self) -> i32 {
        let var = i32::try_from(self.variable()).expect("variable id overflowed i32");
        if self.polarity() { var } else { -var }
    }
}

/// A literal packed into a single `u32`: the top bit holds the polarity, the
/// remaining 31 bits hold the variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PackedLiteral(u32);

impl Literal for PackedLiteral {
    fn new(var: Variable, polarity: bool) -> Self {
        Self(var & 0x7FFF_FFFF | (u32::from(polarity) << 31))
    }

    fn variable(self) -> Variable {
        self.0 & 0x7FFF_FFFF
    }

    fn polarity(self) -> bool {
        (self.0 >> 31) != 0
    }

    fn negated(self) -> Self {
        Self(self.0 ^ (1 << 31))
    }
}

impl Not for PackedLiteral {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

/// A literal stored directly in DIMACS signed-integer form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NegativeLiteral(i32);

impl Literal for NegativeLiteral {
    fn new(var: Variable, polarity: bool) -> Self {
        let var = i32::try_from(var).expect("variable id overflowed i32");

        if polarity { Self(var) } else { Self(-var) }
    }

    fn variable(self) -> Variable {
        self.0.unsigned_abs()
    }

    fn polarity(self) -> bool {
        self.0.is_positive()
    }

    fn negated(self) -> Self {
        Self(-self.0)
    }
}

impl Not for NegativeLiteral {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

/// Converts a literal from one representation to another.
pub fn convert<L: Literal, U: Literal>(lit: &L) -> U {
    U::new(lit.variable(), lit.polarity())
}
