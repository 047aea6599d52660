//! A two-phase primal simplex working entirely with exact rationals.

use crate::{
    algebra::Coefficient,
    solver::{
        backend::{BackendSolution, LpBackend, LpProblem, ObjectiveSense},
        LpResult,
    },
};
use nalgebra::DMatrix;
use num_traits::{One, Signed, Zero};

/// Solves problems exactly, so every solution it finds satisfies the problem
/// with no violation at all.
///
/// Pivots are chosen with Bland's rule, which is slow on large problems but
/// guaranteed not to cycle.
#[derive(Debug, Default)]
pub struct ExactBackend;

impl LpBackend for ExactBackend {
    fn name(&self) -> &'static str { "exact" }

    fn solve(
        &mut self,
        problem: &LpProblem<'_>,
        _precision: f64,
    ) -> BackendSolution {
        let form = match StandardForm::new(problem) {
            Some(form) => form,
            None => {
                return BackendSolution::without_solution(LpResult::Infeasible)
            },
        };

        let mut tableau = Tableau::new(&form, problem.max_iterations);

        match tableau.solve(&form.costs) {
            Ok(()) => {
                let values = tableau.values(form.num_vars);
                let duals = tableau.duals();
                BackendSolution::optimal(form.recover(&values))
                    .with_dual(form.row_duals(&duals, problem.sense))
            },
            Err(SimplexError::Infeasible) => {
                BackendSolution::without_solution(LpResult::Infeasible)
            },
            Err(SimplexError::Unbounded) => {
                BackendSolution::without_solution(LpResult::Unbounded)
            },
            Err(SimplexError::IterationLimit) => {
                tracing::warn!(
                    max_iterations = problem.max_iterations,
                    "Gave up after reaching the iteration limit"
                );
                BackendSolution::without_solution(LpResult::Error)
            },
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum SimplexError {
    Infeasible,
    Unbounded,
    IterationLimit,
}

/// How a column's value is recovered from the non-negative variables of the
/// standard form.
#[derive(Debug, Clone, PartialEq)]
enum ColumnMapping {
    /// `x = offset + v`
    Shifted { offset: Coefficient, var: usize },
    /// `x = offset - v`
    Mirrored { offset: Coefficient, var: usize },
    /// `x = positive - negative`
    Split { positive: usize, negative: usize },
}

impl ColumnMapping {
    /// Add `coeff * x` to a linear combination over the standard form
    /// variables, returning the constant it contributes.
    fn expand(
        &self,
        coeff: &Coefficient,
        terms: &mut Vec<(usize, Coefficient)>,
    ) -> Coefficient {
        match self {
            ColumnMapping::Shifted { offset, var } => {
                terms.push((*var, coeff.clone()));
                coeff * offset
            },
            ColumnMapping::Mirrored { offset, var } => {
                terms.push((*var, -coeff));
                coeff * offset
            },
            ColumnMapping::Split { positive, negative } => {
                terms.push((*positive, coeff.clone()));
                terms.push((*negative, -coeff));
                Coefficient::zero()
            },
        }
    }

    fn recover(&self, values: &[Coefficient]) -> Coefficient {
        match self {
            ColumnMapping::Shifted { offset, var } => offset + &values[*var],
            ColumnMapping::Mirrored { offset, var } => offset - &values[*var],
            ColumnMapping::Split { positive, negative } => {
                &values[*positive] - &values[*negative]
            },
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Relation {
    Le,
    Ge,
    Eq,
}

#[derive(Debug, Clone, PartialEq)]
struct Constraint {
    terms: Vec<(usize, Coefficient)>,
    relation: Relation,
    rhs: Coefficient,
}

/// The problem rewritten as `min c'v` subject to linear constraints, where
/// every variable is non-negative.
#[derive(Debug, Clone, PartialEq)]
struct StandardForm {
    num_vars: usize,
    mappings: Vec<ColumnMapping>,
    constraints: Vec<Constraint>,
    /// The constraints each of the problem's rows turned into.
    row_constraints: Vec<Vec<usize>>,
    costs: Vec<Coefficient>,
}

impl StandardForm {
    /// Returns `None` when some column has contradictory bounds.
    fn new(problem: &LpProblem<'_>) -> Option<StandardForm> {
        let mut num_vars = 0;
        let mut mappings = Vec::with_capacity(problem.columns.len());
        let mut constraints = Vec::new();

        for column in problem.columns {
            let mapping = match (column.lb(), column.ub()) {
                (Some(lb), ub) => {
                    let var = num_vars;
                    num_vars += 1;

                    if let Some(ub) = ub {
                        if ub < lb {
                            return None;
                        }
                        constraints.push(Constraint {
                            terms: vec![(var, Coefficient::one())],
                            relation: Relation::Le,
                            rhs: ub - lb,
                        });
                    }

                    ColumnMapping::Shifted {
                        offset: lb.clone(),
                        var,
                    }
                },
                (None, Some(ub)) => {
                    let var = num_vars;
                    num_vars += 1;
                    ColumnMapping::Mirrored {
                        offset: ub.clone(),
                        var,
                    }
                },
                (None, None) => {
                    let positive = num_vars;
                    num_vars += 2;
                    ColumnMapping::Split {
                        positive,
                        negative: positive + 1,
                    }
                },
            };

            mappings.push(mapping);
        }

        let mut row_constraints = Vec::with_capacity(problem.rows.len());

        for row in problem.rows {
            let mut terms = Vec::new();
            let mut constant = Coefficient::zero();
            let first = constraints.len();

            for (col, coeff) in problem.row_entries(row) {
                constant += mappings[col].expand(coeff, &mut terms);
            }

            let (lb, ub) = problem.closed_bounds(row);

            match (lb, ub) {
                (Some(lb), Some(ub)) if lb == ub => {
                    constraints.push(Constraint {
                        terms,
                        relation: Relation::Eq,
                        rhs: lb - &constant,
                    });
                },
                (lb, ub) => {
                    if let Some(lb) = lb {
                        constraints.push(Constraint {
                            terms: terms.clone(),
                            relation: Relation::Ge,
                            rhs: lb - &constant,
                        });
                    }
                    if let Some(ub) = ub {
                        constraints.push(Constraint {
                            terms,
                            relation: Relation::Le,
                            rhs: ub - &constant,
                        });
                    }
                },
            }

            row_constraints.push((first..constraints.len()).collect());
        }

        let mut costs = vec![Coefficient::zero(); num_vars];

        for (column, mapping) in problem.columns.iter().zip(&mappings) {
            let obj = match (column.obj(), problem.sense) {
                (Some(obj), ObjectiveSense::Minimise) => obj.clone(),
                (Some(obj), ObjectiveSense::Maximise) => -obj,
                (None, _) => continue,
            };

            let mut terms = Vec::new();
            // constant offsets don't change where the optimum is
            let _ = mapping.expand(&obj, &mut terms);

            for (var, coeff) in terms {
                costs[var] += coeff;
            }
        }

        Some(StandardForm {
            num_vars,
            mappings,
            constraints,
            row_constraints,
            costs,
        })
    }

    fn recover(&self, values: &[Coefficient]) -> Vec<Coefficient> {
        self.mappings.iter().map(|m| m.recover(values)).collect()
    }

    /// Combine the duals of each row's constraints, undoing the negation
    /// used to turn maximisation into minimisation.
    fn row_duals(
        &self,
        duals: &[Coefficient],
        sense: ObjectiveSense,
    ) -> Vec<Coefficient> {
        self.row_constraints
            .iter()
            .map(|indices| {
                let sum = indices
                    .iter()
                    .fold(Coefficient::zero(), |acc, &i| acc + &duals[i]);

                match sense {
                    ObjectiveSense::Minimise => sum,
                    ObjectiveSense::Maximise => -sum,
                }
            })
            .collect()
    }
}

/// A dense simplex tableau.
///
/// Columns are laid out as `[structural | slack | artificial | rhs]` and the
/// last row holds the reduced costs, with the negated objective value in its
/// rhs cell.
#[derive(Debug, Clone)]
struct Tableau {
    cells: DMatrix<Coefficient>,
    basis: Vec<usize>,
    /// For each constraint, the column which started out as its identity
    /// column and whether the constraint was negated.
    units: Vec<(usize, bool)>,
    first_artificial: usize,
    iterations: usize,
    max_iterations: usize,
}

impl Tableau {
    fn new(form: &StandardForm, max_iterations: usize) -> Tableau {
        let num_rows = form.constraints.len();
        let num_slacks = form
            .constraints
            .iter()
            .filter(|c| c.relation != Relation::Eq)
            .count();

        // figure out which rows can start with their slack in the basis
        let mut slack_signs = Vec::with_capacity(num_rows);
        let mut num_artificials = 0;

        for constraint in &form.constraints {
            let flip = constraint.rhs.is_negative();
            let sign = match (constraint.relation, flip) {
                (Relation::Eq, _) => None,
                (Relation::Le, false) | (Relation::Ge, true) => Some(true),
                (Relation::Le, true) | (Relation::Ge, false) => Some(false),
            };
            if sign != Some(true) {
                num_artificials += 1;
            }
            slack_signs.push((flip, sign));
        }

        let first_slack = form.num_vars;
        let first_artificial = first_slack + num_slacks;
        let rhs = first_artificial + num_artificials;

        let mut cells =
            DMatrix::from_element(num_rows + 1, rhs + 1, Coefficient::zero());
        let mut basis = Vec::with_capacity(num_rows);
        let mut units = Vec::with_capacity(num_rows);
        let mut next_slack = first_slack;
        let mut next_artificial = first_artificial;
        let one = Coefficient::one();

        for (i, (constraint, (flip, sign))) in
            form.constraints.iter().zip(slack_signs).enumerate()
        {
            for (var, coeff) in &constraint.terms {
                let value = &cells[(i, *var)] + coeff;
                cells[(i, *var)] = value;
            }
            cells[(i, rhs)] = constraint.rhs.clone();

            if flip {
                for j in 0..=rhs {
                    let negated = -&cells[(i, j)];
                    cells[(i, j)] = negated;
                }
            }

            match sign {
                Some(true) => {
                    cells[(i, next_slack)] = one.clone();
                    basis.push(next_slack);
                    next_slack += 1;
                },
                Some(false) => {
                    cells[(i, next_slack)] = -&one;
                    next_slack += 1;
                    cells[(i, next_artificial)] = one.clone();
                    basis.push(next_artificial);
                    next_artificial += 1;
                },
                None => {
                    cells[(i, next_artificial)] = one.clone();
                    basis.push(next_artificial);
                    next_artificial += 1;
                },
            }
            units.push((basis[i], flip));
        }

        Tableau {
            cells,
            basis,
            units,
            first_artificial,
            iterations: 0,
            max_iterations,
        }
    }

    fn rhs(&self) -> usize { self.cells.ncols() - 1 }

    fn objective_row(&self) -> usize { self.cells.nrows() - 1 }

    fn objective_value(&self) -> Coefficient {
        -&self.cells[(self.objective_row(), self.rhs())]
    }

    fn solve(&mut self, costs: &[Coefficient]) -> Result<(), SimplexError> {
        let rhs = self.rhs();

        if self.first_artificial < rhs {
            // phase 1, minimise the sum of the artificial variables
            let phase_one: Vec<Coefficient> = (0..rhs)
                .map(|j| {
                    if j >= self.first_artificial {
                        Coefficient::one()
                    } else {
                        Coefficient::zero()
                    }
                })
                .collect();
            self.set_objective(&phase_one);

            // the phase 1 objective is bounded below by 0, so this can only
            // fail by running out of iterations
            self.run(rhs)?;

            if self.objective_value().is_positive() {
                return Err(SimplexError::Infeasible);
            }

            self.drive_out_artificials();
        }

        let mut phase_two = costs.to_vec();
        phase_two.resize(rhs, Coefficient::zero());
        self.set_objective(&phase_two);

        self.run(self.first_artificial)
    }

    /// Replace the objective row with `costs`, then price out the basic
    /// variables so their reduced costs are zero.
    fn set_objective(&mut self, costs: &[Coefficient]) {
        let obj = self.objective_row();
        let rhs = self.rhs();

        for (j, cost) in costs.iter().enumerate() {
            self.cells[(obj, j)] = cost.clone();
        }
        self.cells[(obj, rhs)] = Coefficient::zero();

        for i in 0..self.basis.len() {
            let cost = self.cells[(obj, self.basis[i])].clone();
            if cost.is_zero() {
                continue;
            }

            for j in 0..=rhs {
                let value = &self.cells[(obj, j)] - &cost * &self.cells[(i, j)];
                self.cells[(obj, j)] = value;
            }
        }
    }

    /// Keep pivoting until no column below `entering_limit` can improve the
    /// objective.
    fn run(&mut self, entering_limit: usize) -> Result<(), SimplexError> {
        let obj = self.objective_row();
        let rhs = self.rhs();

        loop {
            let entering = (0..entering_limit)
                .find(|&j| self.cells[(obj, j)].is_negative());
            let col = match entering {
                Some(col) => col,
                None => return Ok(()),
            };

            if self.iterations >= self.max_iterations {
                return Err(SimplexError::IterationLimit);
            }
            self.iterations += 1;

            let mut leaving: Option<(usize, Coefficient)> = None;

            for i in 0..self.basis.len() {
                let a = &self.cells[(i, col)];
                if !a.is_positive() {
                    continue;
                }

                let ratio = &self.cells[(i, rhs)] / a;
                let better = match &leaving {
                    None => true,
                    Some((best, best_ratio)) => {
                        ratio < *best_ratio
                            || (ratio == *best_ratio
                                && self.basis[i] < self.basis[*best])
                    },
                };

                if better {
                    leaving = Some((i, ratio));
                }
            }

            match leaving {
                Some((row, _)) => self.pivot(row, col),
                None => return Err(SimplexError::Unbounded),
            }
        }
    }

    fn pivot(&mut self, row: usize, col: usize) {
        let rhs = self.rhs();
        let pivot = self.cells[(row, col)].clone();

        for j in 0..=rhs {
            let value = &self.cells[(row, j)] / &pivot;
            self.cells[(row, j)] = value;
        }

        for i in 0..self.cells.nrows() {
            if i == row {
                continue;
            }

            let factor = self.cells[(i, col)].clone();
            if factor.is_zero() {
                continue;
            }

            for j in 0..=rhs {
                let delta = &factor * &self.cells[(row, j)];
                if delta.is_zero() {
                    continue;
                }
                let value = &self.cells[(i, j)] - delta;
                self.cells[(i, j)] = value;
            }
        }

        self.basis[row] = col;
    }

    /// After phase 1 every artificial variable is zero, but some may still
    /// be basic. Swap them for real variables where possible. Rows where that
    /// isn't possible are redundant and their artificial stays at zero.
    fn drive_out_artificials(&mut self) {
        for i in 0..self.basis.len() {
            if self.basis[i] < self.first_artificial {
                continue;
            }

            let replacement = (0..self.first_artificial)
                .find(|&j| !self.cells[(i, j)].is_zero());

            if let Some(col) = replacement {
                self.pivot(i, col);
            }
        }
    }

    /// The dual value of each constraint, read from the reduced costs of the
    /// columns which started out as the identity. Those columns cost nothing
    /// in phase 2, so their reduced cost is the negated dual.
    fn duals(&self) -> Vec<Coefficient> {
        let obj = self.objective_row();

        self.units
            .iter()
            .map(|&(col, flipped)| {
                let dual = -&self.cells[(obj, col)];
                if flipped {
                    -dual
                } else {
                    dual
                }
            })
            .collect()
    }

    /// The value of each of the first `num_vars` variables.
    fn values(&self, num_vars: usize) -> Vec<Coefficient> {
        let rhs = self.rhs();
        let mut values = vec![Coefficient::zero(); num_vars];

        for (i, &var) in self.basis.iter().enumerate() {
            if var < num_vars {
                values[var] = self.cells[(i, rhs)].clone();
            }
        }

        values
    }
}
