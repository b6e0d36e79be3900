#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! CNF data structures, the SAT to 3-SAT reducer, and its collaborators.

pub mod assignment;
pub mod clause;
pub mod clause_storage;
pub mod cnf;
pub mod dimacs;
pub mod literal;
pub mod reduction;
pub mod solver;
pub mod verifier;
