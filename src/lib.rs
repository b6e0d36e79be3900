#![deny(missing_docs)]
//! This crate reduces SAT formulas in general CNF to equisatisfiable strict
//! 3-CNF formulas, and bundles the small collaborators needed to work with the
//! result: a DIMACS reader/writer, a backtracking solver, and a verifier.

/// The `sat` module holds the CNF data structures, the clause reducer, and the
/// solver/verifier collaborators.
pub mod sat;
