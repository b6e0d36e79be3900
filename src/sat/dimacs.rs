#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Reading and writing the DIMACS CNF file format.
//!
//! The DIMACS CNF format is the standard text format for boolean
//! satisfiability problems:
//!
//! - Comment lines start with 'c'.
//! - A problem line 'p cnf <`num_variables`> <`num_clauses`>' declares the
//!   formula's size. The declared variable count is honoured, and raised if a
//!   clause mentions a larger identifier.
//! - Clause lines hold whitespace-separated signed integers terminated by '0'.
//! - An optional '%' line marks end-of-data (common in SATLIB benchmark files).

use crate::sat::clause_storage::LiteralStorage;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use itertools::Itertools;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Parses DIMACS formatted data from a `BufRead` source into a `Cnf`.
///
/// Comment and problem lines are handled as described in the module docs;
/// every other line is read as a clause with its terminating '0' stripped.
/// A line holding nothing but "0" is kept as an empty clause (an immediately
/// unsatisfiable formula, which the reducer rejects explicitly).
///
/// # Panics
///
/// - If reading a line from `reader` fails.
/// - If a token where a literal is expected does not parse as an `i32`,
///   implying a malformed DIMACS file.
pub fn parse_dimacs<R: BufRead, L: Literal, S: LiteralStorage<L>>(reader: R) -> Cnf<L, S> {
    let mut lines = reader
        .lines()
        .map(|line_result| line_result.unwrap_or_else(|e| panic!("Failed to read line: {e}")));

    let mut clauses: Vec<Vec<i32>> = Vec::new();
    let mut declared_vars: usize = 0;

    for line_str in &mut lines {
        let mut parts = line_str.split_whitespace().peekable();

        match parts.peek() {
            Some(&"%") => break,
            None | Some(&"c") => {}
            Some(&"p") => {
                // p cnf <num_variables> <num_clauses>
                let fields = parts.collect_vec();
                if fields.len() >= 4 && fields[1] == "cnf" {
                    declared_vars = fields[2].parse().unwrap_or(0);
                }
            }
            Some(_) => {
                let clause_literals: Vec<i32> = parts
                    .map(|s| {
                        s.parse::<i32>()
                            .unwrap_or_else(|e| panic!("Failed to parse literal '{s}' as i32: {e}"))
                    })
                    .take_while(|&p| p != 0)
                    .collect_vec();

                clauses.push(clause_literals);
            }
        }
    }

    Cnf::with_num_vars(clauses, declared_vars)
}

/// Parses a DIMACS CNF file specified by its path.
///
/// # Errors
///
/// Returns `io::Result::Err` if the file cannot be opened. Panics from
/// `parse_dimacs` (malformed content) propagate.
pub fn parse_file<L: Literal, S: LiteralStorage<L>>(
    file_path: impl AsRef<Path>,
) -> io::Result<Cnf<L, S>> {
    let file = std::fs::File::open(file_path)?;
    let reader = io::BufReader::new(file);
    Ok(parse_dimacs(reader))
}

/// Writes a formula to `writer` in DIMACS CNF format, preceded by the given
/// comment lines.
///
/// # Errors
///
/// Returns `io::Result::Err` if writing fails.
pub fn write_dimacs<W: Write, L: Literal, S: LiteralStorage<L>>(
    writer: &mut W,
    cnf: &Cnf<L, S>,
    comments: &[&str],
) -> io::Result<()> {
    for comment in comments {
        writeln!(writer, "c {comment}")?;
    }
    write!(writer, "{cnf}")
}

/// Writes a formula to a file in DIMACS CNF format.
///
/// # Errors
///
/// Returns `io::Result::Err` if the file cannot be created or written.
pub fn write_file<L: Literal, S: LiteralStorage<L>>(
    file_path: impl AsRef<Path>,
    cnf: &Cnf<L, S>,
    comments: &[&str],
) -> io::Result<()> {
    let file = std::fs::File::create(file_path)?;
    let mut writer = io::BufWriter::new(file);
    write_dimacs(&mut writer, cnf, comments)
}
