//! Checking assignments against CNF formulas.
//!
//! The verifier is independent of the reducer and the solver: it takes a
//! formula and a candidate assignment and reports which clauses hold. It works
//! for clauses of any arity, so it can check both source formulas and reduced
//! 3-CNF output.

use crate::sat::assignment::{Assignment, Solutions};
use crate::sat::clause::Clause;
use crate::sat::clause_storage::LiteralStorage;
use crate::sat::cnf::Cnf;
use crate::sat::literal::{Literal, Variable};
use std::error::Error;
use std::fmt::{self, Display};

/// Failures while evaluating a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    /// A clause mentions a variable the assignment gives no value for.
    Unassigned {
        /// The variable without a value.
        variable: Variable,
        /// Index of the clause that mentions it.
        clause_index: usize,
    },
}

impl Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unassigned {
                variable,
                clause_index,
            } => write!(
                f,
                "variable {variable} in clause {clause_index} has no assigned value"
            ),
        }
    }
}

impl Error for VerifyError {}

/// The outcome of verifying a formula against an assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    /// Total clauses checked.
    pub total_clauses: usize,
    /// How many clauses the assignment satisfies.
    pub satisfied_clauses: usize,
    /// Indices of the clauses the assignment falsifies.
    pub unsatisfied: Vec<usize>,
}

impl VerifyReport {
    /// `true` if every clause is satisfied.
    pub fn is_valid(&self) -> bool {
        self.unsatisfied.is_empty()
    }
}

/// Evaluates one clause under a complete assignment.
///
/// # Errors
///
/// [`VerifyError::Unassigned`] if the clause mentions an unassigned variable.
pub fn evaluate_clause<L: Literal, S: LiteralStorage<L>>(
    clause: &Clause<L, S>,
    assignment: &Assignment,
    clause_index: usize,
) -> Result<bool, VerifyError> {
    let mut satisfied = false;

    for &lit in clause.iter() {
        match assignment.literal_value(lit) {
            Some(true) => satisfied = true,
            Some(false) => {}
            None => {
                return Err(VerifyError::Unassigned {
                    variable: lit.variable(),
                    clause_index,
                });
            }
        }
    }

    Ok(satisfied)
}

/// Checks every clause of `cnf` against `assignment` and reports the result.
///
/// # Errors
///
/// [`VerifyError::Unassigned`] if some clause mentions an unassigned variable.
pub fn verify<L: Literal, S: LiteralStorage<L>>(
    cnf: &Cnf<L, S>,
    assignment: &Assignment,
) -> Result<VerifyReport, VerifyError> {
    let mut report = VerifyReport {
        total_clauses: cnf.len(),
        ..VerifyReport::default()
    };

    for (index, clause) in cnf.iter().enumerate() {
        if evaluate_clause(clause, assignment, index)? {
            report.satisfied_clauses += 1;
        } else {
            report.unsatisfied.push(index);
        }
    }

    Ok(report)
}

/// Convenience check of a signed-integer model against a formula. Returns
/// `false` if the model leaves a mentioned variable unassigned.
pub fn check_model<L: Literal, S: LiteralStorage<L>>(
    cnf: &Cnf<L, S>,
    solutions: &Solutions,
) -> bool {
    let assignment = Assignment::from_solutions(cnf.num_vars, solutions);
    verify(cnf, &assignment).is_ok_and(|report| report.is_valid())
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestCnf = Cnf;

    #[test]
    fn test_satisfying_assignment() {
        let cnf = TestCnf::new(vec![vec![1, -2, 3], vec![-1, 2, 3]]);
        let report = verify(&cnf, &Assignment::from_solutions(3, &vec![1, 2, 3])).unwrap();

        assert!(report.is_valid());
        assert_eq!(report.satisfied_clauses, 2);
    }

    #[test]
    fn test_falsifying_assignment_reports_indices() {
        let cnf = TestCnf::new(vec![vec![1, 2, 3], vec![-1, 2, 3], vec![1, -2, -3]]);
        let report = verify(&cnf, &Assignment::from_solutions(3, &vec![1, -2, -3])).unwrap();

        assert!(!report.is_valid());
        assert_eq!(report.unsatisfied, vec![1]);
        assert_eq!(report.satisfied_clauses, 2);
    }

    #[test]
    fn test_unassigned_variable_is_an_error() {
        let cnf = TestCnf::new(vec![vec![1, 2]]);
        let err = verify(&cnf, &Assignment::new(2)).unwrap_err();
        assert_eq!(
            err,
            VerifyError::Unassigned {
                variable: 1,
                clause_index: 0
            }
        );
    }

    #[test]
    fn test_check_model() {
        let cnf = TestCnf::new(vec![vec![1, 2], vec![-1, 2]]);
        assert!(check_model(&cnf, &vec![-1, 2]));
        assert!(!check_model(&cnf, &vec![1, -2]));
    }
}
