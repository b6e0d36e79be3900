//! Truth assignments over a fixed range of variables.

use crate::sat::literal::{Literal, Variable};
use core::ops::Index;

/// The state of a single variable within an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default, Hash, PartialOrd, Ord)]
pub enum VarState {
    /// No value has been assigned yet.
    #[default]
    Unassigned,
    /// The variable has been assigned the contained value.
    Assigned(bool),
}

impl VarState {
    /// `true` if a value has been assigned.
    pub const fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned(_))
    }
}

/// A (possibly partial) mapping from variables `1..=n` to booleans.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment(Vec<VarState>);

/// A model in signed-integer form: `v` for variables assigned true, `-v` for
/// variables assigned false. Unassigned variables are omitted.
pub type Solutions = Vec<i32>;

impl Assignment {
    /// Creates an empty assignment for `n` variables.
    pub fn new(n: usize) -> Self {
        Self(vec![VarState::Unassigned; n + 1])
    }

    /// Number of variables covered (the `n` given at construction).
    pub fn num_vars(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Assigns `value` to `var`.
    pub fn set(&mut self, var: Variable, value: bool) {
        self.0[var as usize] = VarState::Assigned(value);
    }

    /// Removes any value assigned to `var`.
    pub fn unset(&mut self, var: Variable) {
        self.0[var as usize] = VarState::Unassigned;
    }

    /// The value of `var`, or `None` if unassigned or out of range.
    pub fn var_value(&self, var: Variable) -> Option<bool> {
        match self.0.get(var as usize) {
            Some(VarState::Assigned(b)) => Some(*b),
            _ => None,
        }
    }

    /// The value of a literal under this assignment, or `None` if its variable
    /// is unassigned.
    pub fn literal_value<L: Literal>(&self, lit: L) -> Option<bool> {
        let b = self.var_value(lit.variable())?;
        Some(if lit.is_negated() { !b } else { b })
    }

    /// `true` once every variable from 1 to `n` carries a value.
    pub fn is_complete(&self) -> bool {
        self.0.iter().skip(1).all(VarState::is_assigned)
    }

    /// The first unassigned variable in increasing order, if any.
    pub fn first_unassigned(&self) -> Option<Variable> {
        self.0
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, s)| !s.is_assigned())
            .map(|(i, _)| i as Variable)
    }

    /// The model in signed-integer form.
    pub fn get_solutions(&self) -> Solutions {
        self.0
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(i, s)| match s {
                VarState::Assigned(true) => Some(i as i32),
                VarState::Assigned(false) => Some(-(i as i32)),
                VarState::Unassigned => None,
            })
            .collect()
    }

    /// Builds a complete assignment from a signed-integer model.
    pub fn from_solutions(n: usize, solutions: &Solutions) -> Self {
        let mut assignment = Self::new(n);
        for &lit in solutions {
            assignment.set(lit.unsigned_abs(), lit.is_positive());
        }
        assignment
    }
}

impl Index<Variable> for Assignment {
    type Output = VarState;

    fn index(&self, index: Variable) -> &Self::Output {
        &self.0[index as usize]
    }
}
