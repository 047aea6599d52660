//! The engines an [`LpSolver`](crate::LpSolver) can hand problems to.

mod exact;
mod float;

pub use exact::ExactBackend;
pub use float::MicrolpBackend;

use crate::{
    algebra::{Coefficient, Variable},
    config::LpSolverKind,
    solver::{Column, LpResult, Row, RowSense},
};
use num_traits::Zero;
use rustc_hash::FxHashMap;
use std::fmt::Debug;

/// Are we looking for the smallest or largest objective value?
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ObjectiveSense {
    #[default]
    Minimise,
    Maximise,
}

/// A read-only view of everything a backend needs to solve a problem.
#[derive(Debug, Copy, Clone)]
pub struct LpProblem<'a> {
    pub columns: &'a [Column],
    pub rows: &'a [Row],
    /// Maps each column's variable to its index in `columns`.
    pub index: &'a FxHashMap<Variable, usize>,
    pub sense: ObjectiveSense,
    /// How much strict bounds get tightened by.
    pub delta: &'a Coefficient,
    pub max_iterations: usize,
}

impl<'a> LpProblem<'a> {
    /// The `(column index, coefficient)` pairs making up a row.
    pub fn row_entries(
        &self,
        row: &'a Row,
    ) -> impl Iterator<Item = (usize, &'a Coefficient)> + 'a {
        let index = self.index;

        row.addends()
            .iter()
            .filter_map(move |(var, coeff)| Some((*index.get(var)?, coeff)))
    }

    /// The row's bounds with strict relations turned into closed ones.
    pub fn closed_bounds(
        &self,
        row: &Row,
    ) -> (Option<Coefficient>, Option<Coefficient>) {
        let lb = row.lb().cloned();
        let ub = row.ub().cloned();

        if !row.is_strict() || self.delta.is_zero() {
            return (lb, ub);
        }

        match row.sense() {
            RowSense::Gt => (lb.map(|lb| lb + self.delta), ub),
            RowSense::Lt => (lb, ub.map(|ub| ub - self.delta)),
            _ => (lb, ub),
        }
    }
}

/// What a backend found.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendSolution {
    pub result: LpResult,
    /// One value per column, only populated when the problem has a
    /// solution.
    pub primal: Vec<Coefficient>,
    /// One value per row, how much the optimal objective changes when the
    /// row's bound is moved by one. Empty when the backend can't tell.
    pub dual: Vec<Coefficient>,
}

impl BackendSolution {
    pub fn optimal(primal: Vec<Coefficient>) -> Self {
        BackendSolution {
            result: LpResult::Optimal,
            primal,
            dual: Vec::new(),
        }
    }

    pub fn with_dual(self, dual: Vec<Coefficient>) -> Self {
        BackendSolution { dual, ..self }
    }

    pub fn without_solution(result: LpResult) -> Self {
        BackendSolution {
            result,
            primal: Vec::new(),
            dual: Vec::new(),
        }
    }
}

/// An LP engine.
pub trait LpBackend: Debug + Send {
    fn name(&self) -> &'static str;

    /// Solve `problem`, working to within `precision` when the engine uses
    /// floating-point arithmetic.
    fn solve(
        &mut self,
        problem: &LpProblem<'_>,
        precision: f64,
    ) -> BackendSolution;
}

pub fn backend_for(kind: LpSolverKind) -> Box<dyn LpBackend> {
    match kind {
        LpSolverKind::Exact => Box::new(ExactBackend::default()),
        LpSolverKind::Microlp => Box::new(MicrolpBackend::default()),
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use super::*;
    use crate::algebra::FormulaKind;
    use num_bigint::BigInt;

    pub fn q(n: i64) -> Coefficient {
        Coefficient::from_integer(BigInt::from(n))
    }

    /// A small problem description which owns its columns and rows.
    #[derive(Debug, Default)]
    pub struct Problem {
        pub columns: Vec<Column>,
        pub rows: Vec<Row>,
        pub index: FxHashMap<Variable, usize>,
        pub sense: ObjectiveSense,
        pub delta: Coefficient,
    }

    impl Problem {
        pub fn column(&mut self, column: Column) -> Variable {
            let var = column.var().clone();
            self.index.insert(var.clone(), self.columns.len());
            self.columns.push(column);
            var
        }

        pub fn row(
            &mut self,
            addends: Vec<(&Variable, i64)>,
            kind: FormulaKind,
            rhs: i64,
        ) {
            let addends = addends
                .into_iter()
                .map(|(var, coeff)| (var.clone(), q(coeff)))
                .collect();
            let row = Row::new(addends, RowSense::from(kind), q(rhs))
                .expect("Only closed relations are used in tests");
            self.rows.push(row);
        }

        pub fn view(&self) -> LpProblem<'_> {
            LpProblem {
                columns: &self.columns,
                rows: &self.rows,
                index: &self.index,
                sense: self.sense,
                delta: &self.delta,
                max_iterations: 10_000,
            }
        }
    }
}
