//! Reduction of general CNF formulas to strict 3-CNF.
//!
//! Every source clause of arity `k` is rewritten into clauses of exactly three
//! literals, introducing fresh auxiliary variables where needed:
//!
//! - `k = 1`: 4 clauses, 2 fresh variables — the single literal padded with
//!   all four sign combinations of the fresh pair.
//! - `k = 2`: 2 clauses, 1 fresh variable — the pair padded with `y` and `¬y`.
//! - `k = 3`: 1 clause, no fresh variables — already in target form.
//! - `k ≥ 4`: `k − 2` clauses, `k − 3` fresh variables — the chain
//!   `(l₀ ∨ l₁ ∨ y₁)`, `(¬yᵢ₋₁ ∨ lᵢ ∨ yᵢ)`, ..., `(¬yₖ₋₃ ∨ lₖ₋₂ ∨ lₖ₋₁)`.
//!
//! The output formula is equisatisfiable with the source: any satisfying
//! assignment of the source extends to the auxiliary variables, and any
//! satisfying assignment of the output restricts to one of the source.
//! Auxiliary identifiers are issued strictly above the largest original
//! identifier, so the two variable populations never overlap.

use crate::sat::assignment::{Assignment, Solutions};
use crate::sat::clause::Clause;
use crate::sat::clause_storage::LiteralStorage;
use crate::sat::cnf::Cnf;
use crate::sat::literal::{Literal, PackedLiteral, Variable};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::error::Error;
use std::fmt::{self, Display};
use std::marker::PhantomData;
use std::time::{Duration, Instant};

/// A source literal at the API boundary.
///
/// Callers hand clauses over either as `(variable, is_negated)` pairs or as
/// DIMACS-style signed integers; both convert into this one canonical type, so
/// the arity rules never see an ambiguous encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawLiteral {
    /// The variable referenced.
    pub var: Variable,
    /// `true` if the literal is the variable's negation.
    pub negated: bool,
}

impl From<(Variable, bool)> for RawLiteral {
    fn from((var, negated): (Variable, bool)) -> Self {
        Self { var, negated }
    }
}

impl From<i32> for RawLiteral {
    fn from(value: i32) -> Self {
        Self {
            var: value.unsigned_abs(),
            negated: value < 0,
        }
    }
}

/// Converts a source clause into the crate's literal representation,
/// preserving order and count.
pub fn normalize<L: Literal>(clause: &[RawLiteral]) -> Vec<L> {
    clause.iter().map(|r| L::new(r.var, !r.negated)).collect()
}

/// Failures the reducer reports to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceError {
    /// A source clause had no literals. An empty disjunction is vacuously
    /// false, so the formula cannot be satisfied and no 3-CNF encoding exists
    /// for it.
    EmptyClause {
        /// Index of the offending clause in the source formula.
        index: usize,
    },
}

impl Display for ReduceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyClause { index } => {
                write!(f, "source clause {index} is empty (unsatisfiable formula)")
            }
        }
    }
}

impl Error for ReduceError {}

/// Issues fresh auxiliary variable identifiers for one reduction run.
///
/// Identifiers start at `max_original_var + 1` and increase by one per call,
/// so they can never collide with an original variable. The base is fixed at
/// construction and every issued identifier is recorded.
#[derive(Debug, Clone, Default)]
pub struct AuxAllocator {
    next: Variable,
    issued: FxHashSet<Variable>,
}

impl AuxAllocator {
    /// Creates an allocator issuing identifiers strictly above
    /// `max_original_var`.
    pub fn new(max_original_var: Variable) -> Self {
        Self {
            next: max_original_var,
            issued: FxHashSet::default(),
        }
    }

    /// Returns the next fresh identifier.
    pub fn fresh(&mut self) -> Variable {
        self.next += 1;
        self.issued.insert(self.next);
        self.next
    }

    /// Number of identifiers issued so far.
    pub fn count(&self) -> usize {
        self.issued.len()
    }

    /// The set of issued identifiers.
    pub fn issued(&self) -> &FxHashSet<Variable> {
        &self.issued
    }
}

/// Counts and timings collected while reducing one formula.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReductionStats {
    /// Variables in the source formula.
    pub original_vars: usize,
    /// Clauses in the source formula.
    pub original_clauses: usize,
    /// Source clauses of arity 1.
    pub clauses_k1: usize,
    /// Source clauses of arity 2.
    pub clauses_k2: usize,
    /// Source clauses of arity 3.
    pub clauses_k3: usize,
    /// Source clauses of arity 4 or more.
    pub clauses_k4plus: usize,
    /// Clauses in the reduced formula.
    pub output_clauses: usize,
    /// Auxiliary variables introduced.
    pub auxiliary_vars: usize,
    /// Wall time spent in `reduce`.
    pub elapsed: Duration,
}

/// The result of one reduction: the 3-CNF formula, the variable populations,
/// and diagnostics.
#[derive(Debug, Clone)]
pub struct Reduction<L: Literal = PackedLiteral, S: LiteralStorage<L> = SmallVec<[L; 3]>> {
    /// The reduced formula. Every clause has exactly three literals.
    pub cnf: Cnf<L, S>,
    /// The variables of the source formula.
    pub original_vars: FxHashSet<Variable>,
    /// The auxiliary variables introduced by the reduction.
    pub auxiliary_vars: FxHashSet<Variable>,
    /// Diagnostic counts and timings.
    pub stats: ReductionStats,
}

impl<L: Literal, S: LiteralStorage<L>> Reduction<L, S> {
    /// Projects a 3-CNF assignment back onto the source formula's variables.
    ///
    /// The input is expected to cover every variable of the reduced formula;
    /// the output is the sub-mapping over original variables only. No check is
    /// made that the assignment satisfies anything — that is the verifier's
    /// job.
    pub fn project(&self, assignment: &Assignment) -> FxHashMap<Variable, bool> {
        self.original_vars
            .iter()
            .filter_map(|&var| assignment.var_value(var).map(|value| (var, value)))
            .collect()
    }

    /// Projects a signed-integer model, keeping only original variables.
    pub fn project_solutions(&self, solutions: &Solutions) -> Solutions {
        solutions
            .iter()
            .copied()
            .filter(|lit| self.original_vars.contains(&lit.unsigned_abs()))
            .collect()
    }
}

/// Reduces general CNF formulas to strict 3-CNF.
///
/// A reducer may be reused across independent formulas: all internal state is
/// reset at the start of every [`reduce`](Reducer::reduce) call. It is not
/// meant for concurrent use; run concurrent reductions on separate instances.
#[derive(Debug, Clone, Default)]
pub struct Reducer<L: Literal = PackedLiteral, S: LiteralStorage<L> = SmallVec<[L; 3]>> {
    allocator: AuxAllocator,
    original_vars: FxHashSet<Variable>,
    phantom: PhantomData<(L, S)>,
}

impl<L: Literal, S: LiteralStorage<L>> Reducer<L, S> {
    /// Creates a reducer.
    pub fn new() -> Self {
        Self {
            allocator: AuxAllocator::default(),
            original_vars: FxHashSet::default(),
            phantom: PhantomData,
        }
    }

    /// Reduces a source formula to 3-CNF.
    ///
    /// `variables` lists the source formula's variable identifiers; `clauses`
    /// holds its clauses in order. Output clauses appear in source-clause
    /// order: everything produced for the first clause precedes everything
    /// produced for the second, and so on.
    ///
    /// # Errors
    ///
    /// [`ReduceError::EmptyClause`] if a source clause has no literals.
    ///
    /// # Panics
    ///
    /// If an arity rule emits a clause whose length is not exactly 3. This
    /// indicates a bug in the reducer, not bad input; downstream consumers
    /// depend on the arity guarantee, so it is never propagated as a value.
    pub fn reduce(
        &mut self,
        variables: &[Variable],
        clauses: &[Vec<RawLiteral>],
    ) -> Result<Reduction<L, S>, ReduceError> {
        let start = Instant::now();

        self.original_vars = variables.iter().copied().collect();

        // The allocator base covers the declared variables and anything the
        // clauses mention beyond them, fixed once before any allocation.
        let declared_max = self.original_vars.iter().copied().max().unwrap_or(0);
        let mentioned_max = clauses
            .iter()
            .flatten()
            .map(|r| r.var)
            .max()
            .unwrap_or(0);
        let max_original_var = declared_max.max(mentioned_max);
        self.allocator = AuxAllocator::new(max_original_var);

        let mut stats = ReductionStats {
            original_vars: self.original_vars.len(),
            original_clauses: clauses.len(),
            ..ReductionStats::default()
        };

        let mut output: Vec<Clause<L, S>> = Vec::with_capacity(clauses.len());

        for (index, clause) in clauses.iter().enumerate() {
            let literals: Vec<L> = normalize(clause);

            let reduced = match literals.len() {
                0 => return Err(ReduceError::EmptyClause { index }),
                1 => {
                    stats.clauses_k1 += 1;
                    self.reduce_unit(literals[0])
                }
                2 => {
                    stats.clauses_k2 += 1;
                    self.reduce_binary(&literals)
                }
                3 => {
                    stats.clauses_k3 += 1;
                    Self::reduce_ternary(&literals)
                }
                _ => {
                    stats.clauses_k4plus += 1;
                    self.reduce_wide(&literals)
                }
            };

            for c in &reduced {
                assert_eq!(
                    c.len(),
                    3,
                    "arity rule emitted a clause of length {} for source clause {index}",
                    c.len()
                );
            }

            output.extend(reduced);
        }

        let num_vars = max_original_var as usize + self.allocator.count();

        stats.output_clauses = output.len();
        stats.auxiliary_vars = self.allocator.count();
        stats.elapsed = start.elapsed();

        Ok(Reduction {
            cnf: Cnf {
                clauses: output,
                num_vars,
            },
            original_vars: self.original_vars.clone(),
            auxiliary_vars: self.allocator.issued().clone(),
            stats,
        })
    }

    /// Reduces a formula already held as a [`Cnf`], treating `1..=num_vars` as
    /// the original variable population.
    ///
    /// # Errors
    ///
    /// [`ReduceError::EmptyClause`] if a source clause has no literals.
    pub fn reduce_cnf(&mut self, cnf: &Cnf<L, S>) -> Result<Reduction<L, S>, ReduceError> {
        let variables: Vec<Variable> = (1..=cnf.num_vars as Variable).collect();
        let clauses: Vec<Vec<RawLiteral>> = cnf
            .iter()
            .map(|c| c.to_i32s().into_iter().map(RawLiteral::from).collect())
            .collect();
        self.reduce(&variables, &clauses)
    }

    /// `(l)` becomes the four clauses `(l ∨ y ∨ z)`, `(l ∨ y ∨ ¬z)`,
    /// `(l ∨ ¬y ∨ z)`, `(l ∨ ¬y ∨ ¬z)`. With `y` and `z` free to take any
    /// value, all four hold only when `l` does.
    fn reduce_unit(&mut self, lit: L) -> Vec<Clause<L, S>> {
        let y = self.allocator.fresh();
        let z = self.allocator.fresh();

        [(true, true), (true, false), (false, true), (false, false)]
            .iter()
            .map(|&(py, pz)| Clause::from(vec![lit, L::new(y, py), L::new(z, pz)]))
            .collect()
    }

    /// `(l₁ ∨ l₂)` becomes `(l₁ ∨ l₂ ∨ y)` and `(l₁ ∨ l₂ ∨ ¬y)`. Whatever
    /// value `y` takes, one of the two reduces to the original pair.
    fn reduce_binary(&mut self, literals: &[L]) -> Vec<Clause<L, S>> {
        let y = self.allocator.fresh();

        vec![
            Clause::from(vec![literals[0], literals[1], L::new(y, true)]),
            Clause::from(vec![literals[0], literals[1], L::new(y, false)]),
        ]
    }

    /// Already in target form; the clause passes through unchanged.
    fn reduce_ternary(literals: &[L]) -> Vec<Clause<L, S>> {
        vec![Clause::from(literals.to_vec())]
    }

    /// `(l₀ ∨ ... ∨ lₖ₋₁)` becomes the chain `(l₀ ∨ l₁ ∨ y₁)`,
    /// `(¬yᵢ₋₁ ∨ lᵢ ∨ yᵢ)` for `i` in `2..=k−3`, `(¬yₖ₋₃ ∨ lₖ₋₂ ∨ lₖ₋₁)`:
    /// `k − 2` clauses and `k − 3` fresh variables, with `k − 4` intermediate
    /// chain clauses (zero when `k = 4`).
    fn reduce_wide(&mut self, literals: &[L]) -> Vec<Clause<L, S>> {
        let k = literals.len();
        let mut clauses = Vec::with_capacity(k - 2);

        let mut prev = self.allocator.fresh();
        clauses.push(Clause::from(vec![
            literals[0],
            literals[1],
            L::new(prev, true),
        ]));

        for &lit in &literals[2..k - 2] {
            let next = self.allocator.fresh();
            clauses.push(Clause::from(vec![
                L::new(prev, false),
                lit,
                L::new(next, true),
            ]));
            prev = next;
        }

        clauses.push(Clause::from(vec![
            L::new(prev, false),
            literals[k - 2],
            literals[k - 1],
        ]));

        clauses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::solver::Backtracking;
    use crate::sat::verifier;

    type TestReducer = Reducer<PackedLiteral, SmallVec<[PackedLiteral; 3]>>;

    fn raw(clause: &[i32]) -> Vec<RawLiteral> {
        clause.iter().map(|&l| RawLiteral::from(l)).collect()
    }

    fn as_i32s(reduction: &Reduction) -> Vec<Vec<i32>> {
        reduction.cnf.iter().map(Clause::to_i32s).collect()
    }

    #[test]
    fn test_raw_literal_encodings_agree() {
        assert_eq!(RawLiteral::from(-2), RawLiteral::from((2, true)));
        assert_eq!(RawLiteral::from(7), RawLiteral::from((7, false)));
    }

    #[test]
    fn test_normalize_preserves_order_and_count() {
        let literals: Vec<PackedLiteral> = normalize(&raw(&[3, 3, -1]));
        let back: Vec<i32> = literals.iter().map(|l| l.to_i32()).collect();
        assert_eq!(back, vec![3, 3, -1]);
    }

    #[test]
    fn test_allocator_starts_above_max_original() {
        let mut allocator = AuxAllocator::new(5);
        assert_eq!(allocator.fresh(), 6);
        assert_eq!(allocator.fresh(), 7);
        assert_eq!(allocator.count(), 2);
    }

    #[test]
    fn test_k1_rule() {
        let mut reducer = TestReducer::new();
        let reduction = reducer.reduce(&[1], &[raw(&[1])]).unwrap();

        let clauses = as_i32s(&reduction);
        assert_eq!(
            clauses,
            vec![
                vec![1, 2, 3],
                vec![1, 2, -3],
                vec![1, -2, 3],
                vec![1, -2, -3],
            ]
        );
        assert_eq!(reduction.stats.auxiliary_vars, 2);
        assert_eq!(reduction.cnf.num_vars, 3);
    }

    #[test]
    fn test_k2_rule() {
        let mut reducer = TestReducer::new();
        let reduction = reducer.reduce(&[1, 2], &[raw(&[1, -2])]).unwrap();

        assert_eq!(as_i32s(&reduction), vec![vec![1, -2, 3], vec![1, -2, -3]]);
        assert_eq!(reduction.stats.auxiliary_vars, 1);
    }

    #[test]
    fn test_k3_passes_through_unchanged() {
        let mut reducer = TestReducer::new();
        let reduction = reducer.reduce(&[1, 2, 3], &[raw(&[1, -2, 3])]).unwrap();

        assert_eq!(as_i32s(&reduction), vec![vec![1, -2, 3]]);
        assert_eq!(reduction.stats.auxiliary_vars, 0);
        assert_eq!(reduction.cnf.num_vars, 3);
    }

    #[test]
    fn test_k4_has_no_intermediate_chain_clauses() {
        let mut reducer = TestReducer::new();
        let reduction = reducer
            .reduce(&[1, 2, 3, 4], &[raw(&[1, 2, 3, 4])])
            .unwrap();

        assert_eq!(as_i32s(&reduction), vec![vec![1, 2, 5], vec![-5, 3, 4]]);
        assert_eq!(reduction.stats.auxiliary_vars, 1);
    }

    #[test]
    fn test_k5_worked_example() {
        let mut reducer = TestReducer::new();
        let reduction = reducer
            .reduce(&[1, 2, 3, 4, 5], &[raw(&[1, 2, 3, 4, 5])])
            .unwrap();

        assert_eq!(
            as_i32s(&reduction),
            vec![vec![1, 2, 6], vec![-6, 3, 7], vec![-7, 4, 5]]
        );
        assert_eq!(reduction.stats.auxiliary_vars, 2);
        assert_eq!(reduction.cnf.num_vars, 7);
    }

    #[test]
    fn test_clause_and_aux_counts_by_rule() {
        for (k, expected_clauses, expected_aux) in
            [(1usize, 4, 2), (2, 2, 1), (3, 1, 0), (4, 2, 1), (7, 5, 4), (10, 8, 7)]
        {
            let variables: Vec<Variable> = (1..=k as Variable).collect();
            let clause: Vec<i32> = (1..=k as i32).collect();

            let mut reducer = TestReducer::new();
            let reduction = reducer.reduce(&variables, &[raw(&clause)]).unwrap();

            assert_eq!(reduction.cnf.len(), expected_clauses, "clauses for k={k}");
            assert_eq!(
                reduction.stats.auxiliary_vars, expected_aux,
                "aux vars for k={k}"
            );
        }
    }

    #[test]
    fn test_arity_invariant_holds() {
        let mut reducer = TestReducer::new();
        let reduction = reducer
            .reduce(
                &[1, 2, 3, 4, 5, 6],
                &[
                    raw(&[-4]),
                    raw(&[2, 5]),
                    raw(&[1, -2, 3]),
                    raw(&[1, 2, 3, 4, 5, 6]),
                ],
            )
            .unwrap();

        assert!(reduction.cnf.iter().all(|c| c.len() == 3));
    }

    #[test]
    fn test_mixed_formula_totals() {
        // Arities 1, 2, 3, 4 together: 4 + 2 + 1 + 2 = 9 clauses,
        // 2 + 1 + 0 + 1 = 4 auxiliary variables.
        let mut reducer = TestReducer::new();
        let reduction = reducer
            .reduce(
                &[1, 2, 3, 4],
                &[
                    raw(&[1]),
                    raw(&[1, 2]),
                    raw(&[1, 2, 3]),
                    raw(&[1, 2, 3, 4]),
                ],
            )
            .unwrap();

        assert_eq!(reduction.cnf.len(), 9);
        assert_eq!(reduction.stats.auxiliary_vars, 4);
        assert_eq!(reduction.stats.clauses_k1, 1);
        assert_eq!(reduction.stats.clauses_k2, 1);
        assert_eq!(reduction.stats.clauses_k3, 1);
        assert_eq!(reduction.stats.clauses_k4plus, 1);
        assert_eq!(reduction.cnf.num_vars, 8);
    }

    #[test]
    fn test_aux_vars_disjoint_from_originals() {
        let mut reducer = TestReducer::new();
        let reduction = reducer
            .reduce(&[1, 2, 3, 9], &[raw(&[1, 2, 3, 9]), raw(&[-9])])
            .unwrap();

        assert!(reduction.original_vars.is_disjoint(&reduction.auxiliary_vars));
        assert!(reduction.auxiliary_vars.iter().all(|&v| v > 9));
    }

    #[test]
    fn test_empty_clause_is_rejected() {
        let mut reducer = TestReducer::new();
        let err = reducer.reduce(&[1], &[raw(&[1]), raw(&[])]).unwrap_err();
        assert_eq!(err, ReduceError::EmptyClause { index: 1 });
    }

    #[test]
    fn test_empty_formula() {
        let mut reducer = TestReducer::new();
        let reduction = reducer.reduce(&[], &[]).unwrap();
        assert!(reduction.cnf.is_empty());
        assert_eq!(reduction.cnf.num_vars, 0);
    }

    #[test]
    fn test_reducer_reuse_resets_state() {
        let mut reducer = TestReducer::new();

        let first = reducer.reduce(&[1, 2, 3, 4, 5], &[raw(&[1, 2, 3, 4, 5])]).unwrap();
        let second = reducer.reduce(&[1, 2], &[raw(&[1, 2])]).unwrap();

        // The second run starts allocating from its own maximum, not where the
        // first run stopped.
        assert_eq!(first.stats.auxiliary_vars, 2);
        assert_eq!(as_i32s(&second), vec![vec![1, 2, 3], vec![1, 2, -3]]);
    }

    #[test]
    fn test_undeclared_clause_variables_do_not_collide() {
        // Variable 7 appears only in a clause, not in the declared list; the
        // auxiliary variables must still land above it.
        let mut reducer = TestReducer::new();
        let reduction = reducer.reduce(&[1, 2], &[raw(&[1, 2, 7, -2])]).unwrap();

        assert!(reduction.auxiliary_vars.iter().all(|&v| v > 7));
    }

    #[test]
    fn test_projection_restricts_to_original_vars() {
        let mut reducer = TestReducer::new();
        let reduction = reducer.reduce(&[1, 2], &[raw(&[1, 2])]).unwrap();

        let mut assignment = Assignment::new(reduction.cnf.num_vars);
        assignment.set(1, true);
        assignment.set(2, false);
        assignment.set(3, true);

        let projected = reduction.project(&assignment);
        assert_eq!(projected.len(), 2);
        assert_eq!(projected.get(&1), Some(&true));
        assert_eq!(projected.get(&2), Some(&false));
        assert!(!projected.contains_key(&3));

        let model = reduction.project_solutions(&assignment.get_solutions());
        assert_eq!(model, vec![1, -2]);
    }

    #[test]
    fn test_satisfiable_formula_stays_satisfiable() {
        // (x1 ∨ x2 ∨ x3 ∨ x4 ∨ x5) ∧ (¬x1) ∧ (¬x2 ∨ x3)
        let source = vec![raw(&[1, 2, 3, 4, 5]), raw(&[-1]), raw(&[-2, 3])];
        let mut reducer = TestReducer::new();
        let reduction = reducer.reduce(&[1, 2, 3, 4, 5], &source).unwrap();

        let mut solver = Backtracking::new(reduction.cnf.clone());
        let solutions = solver.solve().expect("reduced formula should be SAT");

        let report = verifier::verify(
            &reduction.cnf,
            &Assignment::from_solutions(reduction.cnf.num_vars, &solutions),
        )
        .unwrap();
        assert!(report.is_valid());

        // The projected model satisfies the source formula.
        let projected = reduction.project_solutions(&solutions);
        let source_cnf: Cnf = Cnf::new(vec![vec![1, 2, 3, 4, 5], vec![-1], vec![-2, 3]]);
        assert!(verifier::check_model(&source_cnf, &projected));
    }

    #[test]
    fn test_unsatisfiable_formula_stays_unsatisfiable() {
        // (x1) ∧ (¬x1) has no model, and neither does its reduction.
        let mut reducer = TestReducer::new();
        let reduction = reducer.reduce(&[1], &[raw(&[1]), raw(&[-1])]).unwrap();

        let mut solver = Backtracking::new(reduction.cnf.clone());
        assert!(solver.solve().is_none());
    }
}
