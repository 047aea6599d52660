//! A backend built on the floating-point simplex from the `microlp` crate.

use crate::{
    algebra::Coefficient,
    solver::{
        backend::{BackendSolution, LpBackend, LpProblem, ObjectiveSense},
        LpResult,
    },
};
use microlp::{ComparisonOp, OptimizationDirection, Problem};
use num_traits::ToPrimitive;

/// Hands problems to [`microlp`], converting to and from `f64` at the
/// boundary.
///
/// Values within `precision` of an integer (relative to their magnitude) are
/// snapped to that integer before being turned back into exact rationals, so
/// "nice" solutions come back exactly. `microlp` doesn't report dual values,
/// so solutions never carry any.
#[derive(Debug, Default)]
pub struct MicrolpBackend;

impl LpBackend for MicrolpBackend {
    fn name(&self) -> &'static str { "microlp" }

    fn solve(
        &mut self,
        problem: &LpProblem<'_>,
        precision: f64,
    ) -> BackendSolution {
        let direction = match problem.sense {
            ObjectiveSense::Minimise => OptimizationDirection::Minimize,
            ObjectiveSense::Maximise => OptimizationDirection::Maximize,
        };
        let mut lp = Problem::new(direction);

        let vars: Vec<_> = problem
            .columns
            .iter()
            .map(|column| {
                let obj = column.obj().map_or(0.0, to_f64);
                let lb = column.lb().map_or(f64::NEG_INFINITY, to_f64);
                let ub = column.ub().map_or(f64::INFINITY, to_f64);
                lp.add_var(obj, (lb, ub))
            })
            .collect();

        for row in problem.rows {
            let terms: Vec<_> = problem
                .row_entries(row)
                .map(|(col, coeff)| (vars[col], to_f64(coeff)))
                .collect();

            match problem.closed_bounds(row) {
                (Some(lb), Some(ub)) if lb == ub => {
                    lp.add_constraint(&terms, ComparisonOp::Eq, to_f64(&lb));
                },
                (lb, ub) => {
                    if let Some(lb) = lb {
                        lp.add_constraint(
                            &terms,
                            ComparisonOp::Ge,
                            to_f64(&lb),
                        );
                    }
                    if let Some(ub) = ub {
                        lp.add_constraint(
                            &terms,
                            ComparisonOp::Le,
                            to_f64(&ub),
                        );
                    }
                },
            }
        }

        match lp.solve() {
            Ok(solution) => {
                let primal = vars
                    .iter()
                    .map(|&var| to_coefficient(solution[var], precision))
                    .collect();
                BackendSolution::optimal(primal)
            },
            Err(microlp::Error::Infeasible) => {
                BackendSolution::without_solution(LpResult::Infeasible)
            },
            Err(microlp::Error::Unbounded) => {
                BackendSolution::without_solution(LpResult::Unbounded)
            },
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "microlp failed to solve the problem"
                );
                BackendSolution::without_solution(LpResult::Error)
            },
        }
    }
}

fn to_f64(value: &Coefficient) -> f64 { value.to_f64().unwrap_or(f64::NAN) }

/// Convert a value back to an exact rational, snapping it to the nearest
/// integer when it is close enough.
fn to_coefficient(value: f64, precision: f64) -> Coefficient {
    let rounded = value.round();
    let epsilon = precision.max(f64::EPSILON);

    let value = if approx::relative_eq!(
        value,
        rounded,
        epsilon = epsilon,
        max_relative = epsilon
    ) {
        rounded
    } else {
        value
    };

    Coefficient::from_float(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        algebra::FormulaKind,
        solver::{
            backend::test_helpers::{q, Problem},
            Column,
        },
        Variable,
    };
    use approx::assert_relative_eq;

    fn solve(problem: &Problem) -> BackendSolution {
        MicrolpBackend::default().solve(&problem.view(), 1e-9)
    }

    #[test]
    fn minimise_with_a_single_covering_row() {
        let mut problem = Problem::default();
        let x = problem.column(Column::new(Variable::new("x")).with_obj(9));
        let y = problem.column(Column::new(Variable::new("y")).with_obj(1));
        problem.row(vec![(&x, 1), (&y, 1)], FormulaKind::Geq, 10);

        let got = solve(&problem);

        assert_eq!(got, BackendSolution::optimal(vec![q(0), q(10)]));
    }

    #[test]
    fn maximise_with_column_bounds() {
        let mut problem = Problem::default();
        problem.sense = ObjectiveSense::Maximise;
        let x = problem
            .column(Column::new(Variable::new("x")).with_obj(3).with_ub(3));
        let y = problem.column(Column::new(Variable::new("y")).with_obj(2));
        problem.row(vec![(&x, 1), (&y, 1)], FormulaKind::Leq, 4);
        problem.row(vec![(&x, 1), (&y, 3)], FormulaKind::Leq, 6);

        let got = solve(&problem);

        assert_eq!(got, BackendSolution::optimal(vec![q(3), q(1)]));
    }

    #[test]
    fn fractional_values_stay_approximately_right() {
        let mut problem = Problem::default();
        let x = problem.column(Column::new(Variable::new("x")).with_obj(1));
        let y = problem.column(Column::new(Variable::new("y")).with_obj(1));
        problem.row(vec![(&x, 3), (&y, 1)], FormulaKind::Geq, 1);
        problem.row(vec![(&x, 1), (&y, 3)], FormulaKind::Geq, 1);

        let got = solve(&problem);

        assert_eq!(got.result, LpResult::Optimal);
        for value in &got.primal {
            assert_relative_eq!(to_f64(value), 0.25, epsilon = 1e-9);
        }
    }

    #[test]
    fn infeasible_and_unbounded() {
        let mut infeasible = Problem::default();
        let x = infeasible.column(Column::new(Variable::new("x")));
        infeasible.row(vec![(&x, 1)], FormulaKind::Geq, 5);
        infeasible.row(vec![(&x, 1)], FormulaKind::Leq, 3);

        assert_eq!(solve(&infeasible).result, LpResult::Infeasible);

        let mut unbounded = Problem::default();
        unbounded.sense = ObjectiveSense::Maximise;
        let x = unbounded.column(Column::new(Variable::new("x")).with_obj(1));
        let y = unbounded.column(Column::new(Variable::new("y")));
        unbounded.row(vec![(&x, 1), (&y, -1)], FormulaKind::Leq, 1);

        assert_eq!(solve(&unbounded).result, LpResult::Unbounded);
    }

    #[test]
    fn snapping_to_integers() {
        assert_eq!(to_coefficient(2.0 - 1e-12, 1e-9), q(2));
        assert_eq!(to_coefficient(-7.0 + 1e-12, 1e-9), q(-7));
        assert_eq!(
            to_coefficient(0.5, 1e-9),
            Coefficient::new(1.into(), 2.into())
        );
    }
}
