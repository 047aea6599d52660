//! A uniform interface for building and solving linear programs.
//!
//! An [`LpSolver`] keeps track of a table of [`Column`]s (variables, their
//! bounds and objective coefficients) and a table of [`Row`]s (constraints).
//! Solving hands both tables to whichever [`LpBackend`] the [`Config`]
//! selected, and the solution is read back one variable at a time.

mod backend;
mod column;
mod result;

pub use backend::{
    backend_for, BackendSolution, ExactBackend, LpBackend, LpProblem,
    MicrolpBackend, ObjectiveSense,
};
pub use column::{Column, Row, RowSense};
pub use result::LpResult;

use crate::{
    algebra::{
        Coefficient, Environment, Expression, Formula, FormulaKind,
        IntoCoefficient, Variable,
    },
    config::{Config, ConfigError, Format, LpSolverKind},
};
use num_traits::Zero;
use rustc_hash::FxHashMap;
use std::{
    fmt::{self, Display, Formatter},
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
    time::{Duration, Instant},
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LpError {
    #[error("\"{var}\" already has a column")]
    DuplicateColumn { var: Variable },
    #[error("\"{var}\" isn't registered with the solver")]
    UnknownVariable { var: Variable },
    #[error("There is no solution to read, the last solve was {result}")]
    NoSolution { result: LpResult },
    #[error("A row can't express the \"{kind}\" relation")]
    UnsupportedRelation { kind: FormulaKind },
    #[error("The lower bound, {lb}, is greater than the upper bound, {ub}")]
    InvalidBounds { lb: Coefficient, ub: Coefficient },
    #[error("There is no row {idx}")]
    RowOutOfRange { idx: usize },
    #[error("There is no column {idx}")]
    ColumnOutOfRange { idx: usize },
    #[error("The {backend} backend doesn't compute dual values")]
    NoDualSolution { backend: &'static str },
    #[error("Invalid configuration")]
    Config(#[from] ConfigError),
}

/// Bookkeeping about the work an [`LpSolver`] has done.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct SolveStats {
    pub solves: usize,
    pub elapsed: Duration,
}

type Registry = FxHashMap<(Format, LpSolverKind), Arc<Mutex<LpSolver>>>;

static INSTANCES: OnceLock<Mutex<Registry>> = OnceLock::new();

fn instances() -> MutexGuard<'static, Registry> {
    INSTANCES
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// The facade in front of an LP engine.
///
/// # Examples
///
/// ```rust
/// use linprog_core::{
///     Column, Config, LpResult, LpSolver, Relational, Variable,
/// };
///
/// let x = Variable::new("x");
/// let y = Variable::new("y");
///
/// let mut solver = LpSolver::new(Config::default());
/// solver.add_column(Column::new(x.clone()).with_obj(9)).unwrap();
/// solver.add_column(Column::new(y.clone()).with_obj(1)).unwrap();
/// solver.add_row(&(x.clone() + y.clone()).greater_eq(10)).unwrap();
///
/// assert_eq!(solver.solve(1e-9), LpResult::Optimal);
/// assert_eq!(solver.solution(&x).unwrap().to_string(), "0");
/// assert_eq!(solver.solution(&y).unwrap().to_string(), "10");
/// ```
#[derive(Debug)]
pub struct LpSolver {
    config: Config,
    backend: Box<dyn LpBackend>,
    columns: Vec<Column>,
    rows: Vec<Row>,
    var_to_col: FxHashMap<Variable, usize>,
    sense: ObjectiveSense,
    result: LpResult,
    solution: Vec<Coefficient>,
    dual_solution: Vec<Coefficient>,
    objective_value: Option<Coefficient>,
    precision: Coefficient,
    stats: SolveStats,
}

impl LpSolver {
    /// Create a standalone solver which isn't shared with anyone else.
    pub fn new(config: Config) -> Self {
        let backend = backend_for(config.lp_solver);

        LpSolver {
            config,
            backend,
            columns: Vec::new(),
            rows: Vec::new(),
            var_to_col: FxHashMap::default(),
            sense: ObjectiveSense::default(),
            result: LpResult::Unsolved,
            solution: Vec::new(),
            dual_solution: Vec::new(),
            objective_value: None,
            precision: Coefficient::zero(),
            stats: SolveStats::default(),
        }
    }

    /// Create a solver from the textual names of a format and backend.
    pub fn from_options(
        format: &str,
        lp_solver: &str,
    ) -> Result<Self, LpError> {
        let config = Config::from_options(format, lp_solver)?;
        Ok(LpSolver::new(config))
    }

    /// Get the process-wide solver for this configuration's format and
    /// backend, creating it on first use.
    ///
    /// Asking again with an equivalent configuration gives you the same
    /// instance back, updated to use the new `config`. Anything already
    /// added to it stays around until you [`LpSolver::reset()`] it or the
    /// instance is dropped with [`LpSolver::release_instance()`].
    ///
    /// # Deadlocks
    ///
    /// Refreshing the config locks the instance, so calling this while you
    /// still hold a guard for the same instance will never return.
    pub fn get_instance(config: &Config) -> Arc<Mutex<LpSolver>> {
        let instance = {
            let mut instances = instances();
            let instance = instances
                .entry(config.instance_key())
                .or_insert_with(|| {
                    tracing::debug!(
                        format = %config.format,
                        lp_solver = %config.lp_solver,
                        "Creating a new LP solver instance"
                    );
                    Arc::new(Mutex::new(LpSolver::new(config.clone())))
                });
            Arc::clone(instance)
        };

        instance
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .config = config.clone();

        instance
    }

    /// Forget the shared instance for this configuration, returning whether
    /// there was one. Existing handles keep working.
    pub fn release_instance(config: &Config) -> bool {
        instances().remove(&config.instance_key()).is_some()
    }

    pub fn config(&self) -> &Config { &self.config }

    pub fn backend_name(&self) -> &'static str { self.backend.name() }

    /// Register a new column, returning its index.
    pub fn add_column<C>(&mut self, column: C) -> Result<usize, LpError>
    where
        C: Into<Column>,
    {
        let column = column.into();

        if self.var_to_col.contains_key(column.var()) {
            return Err(LpError::DuplicateColumn {
                var: column.var().clone(),
            });
        }
        check_bounds(&column)?;

        let idx = self.columns.len();
        tracing::trace!(idx, %column, "Adding column");
        self.var_to_col.insert(column.var().clone(), idx);
        self.columns.push(column);

        Ok(idx)
    }

    /// Turn a [`Formula`] into a row, returning its index.
    ///
    /// Only addends whose variable already has a column are kept. Strict
    /// relations are tightened by the configured precision when solving and
    /// `!=` can't be represented at all.
    pub fn add_row(&mut self, formula: &Formula) -> Result<usize, LpError> {
        if formula.kind() == FormulaKind::Neq {
            return Err(LpError::UnsupportedRelation {
                kind: formula.kind(),
            });
        }

        let mut addends = Vec::with_capacity(formula.expression().len());

        for (var, coeff) in formula.expression().addends() {
            if self.var_to_col.contains_key(var) {
                addends.push((var.clone(), coeff.clone()));
            } else {
                tracing::warn!(
                    %var,
                    %formula,
                    "Dropping an addend which doesn't have a column"
                );
            }
        }

        let row = Row::new(
            addends,
            RowSense::from(formula.kind()),
            formula.rhs().clone(),
        )
        .ok_or(LpError::UnsupportedRelation {
            kind: formula.kind(),
        })?;

        let idx = self.rows.len();
        tracing::trace!(idx, %row, "Adding row");
        self.rows.push(row);

        Ok(idx)
    }

    pub fn var(&self, idx: usize) -> Option<&Variable> {
        self.columns.get(idx).map(Column::var)
    }

    pub fn column(&self, idx: usize) -> Option<&Column> {
        self.columns.get(idx)
    }

    pub fn row(&self, idx: usize) -> Option<&Row> { self.rows.get(idx) }

    pub fn columns(&self) -> &[Column] { &self.columns }

    pub fn rows(&self) -> &[Row] { &self.rows }

    pub fn num_columns(&self) -> usize { self.columns.len() }

    pub fn num_rows(&self) -> usize { self.rows.len() }

    pub fn column_index(&self, var: &Variable) -> Option<usize> {
        self.var_to_col.get(var).copied()
    }

    fn column_mut(&mut self, var: &Variable) -> Result<&mut Column, LpError> {
        match self.var_to_col.get(var) {
            Some(&idx) => Ok(&mut self.columns[idx]),
            None => Err(LpError::UnknownVariable { var: var.clone() }),
        }
    }

    /// Set a single column's objective coefficient.
    pub fn set_objective(
        &mut self,
        var: &Variable,
        obj: Coefficient,
    ) -> Result<(), LpError> {
        self.column_mut(var)?.set_obj(obj);
        Ok(())
    }

    /// Replace a column's bounds, leaving it untouched if they contradict
    /// each other.
    pub fn set_bounds(
        &mut self,
        var: &Variable,
        lb: Option<Coefficient>,
        ub: Option<Coefficient>,
    ) -> Result<(), LpError> {
        let column = self.column_mut(var)?;
        let mut updated = column.clone();
        updated.set_bounds(lb, ub);
        check_bounds(&updated)?;

        *column = updated;
        Ok(())
    }

    /// Set the coefficient `column`'s variable has in `row`. A zero
    /// coefficient removes the variable from the row.
    pub fn set_coefficient<C: IntoCoefficient>(
        &mut self,
        row: usize,
        column: usize,
        value: C,
    ) -> Result<(), LpError> {
        let var = self
            .columns
            .get(column)
            .map(Column::var)
            .ok_or(LpError::ColumnOutOfRange { idx: column })?;
        let target = self
            .rows
            .get_mut(row)
            .ok_or(LpError::RowOutOfRange { idx: row })?;

        target.set_coefficient(var, value.into_coefficient());
        tracing::trace!(row, column, %target, "Updated a coefficient");

        Ok(())
    }

    /// Replace the objective function with `objective` and minimise it.
    pub fn minimise(&mut self, objective: &Expression) -> Result<(), LpError> {
        self.set_objective_function(objective, ObjectiveSense::Minimise)
    }

    /// Replace the objective function with `objective` and maximise it.
    pub fn maximise(&mut self, objective: &Expression) -> Result<(), LpError> {
        self.set_objective_function(objective, ObjectiveSense::Maximise)
    }

    fn set_objective_function(
        &mut self,
        objective: &Expression,
        sense: ObjectiveSense,
    ) -> Result<(), LpError> {
        if let Some(var) = objective
            .variables()
            .iter()
            .find(|var| !self.var_to_col.contains_key(*var))
        {
            return Err(LpError::UnknownVariable { var: var.clone() });
        }

        for column in &mut self.columns {
            column.set_obj(Coefficient::zero());
        }

        for (var, coeff) in objective.addends() {
            if let Some(&idx) = self.var_to_col.get(var) {
                self.columns[idx].set_obj(coeff.clone());
            }
        }

        self.sense = sense;
        Ok(())
    }

    pub fn sense(&self) -> ObjectiveSense { self.sense }

    /// Hand the problem to the backend, keeping the solution around so it
    /// can be read back afterwards.
    ///
    /// `precision` is the tolerance floating-point backends work with. The
    /// exact backend ignores it.
    pub fn solve(&mut self, precision: f64) -> LpResult {
        self.solve_with(precision, true)
    }

    /// Hand the problem to the backend. When `store_solution` is `false`
    /// only the result, objective value and precision are kept, which is
    /// all you need to check feasibility.
    pub fn solve_with(
        &mut self,
        precision: f64,
        store_solution: bool,
    ) -> LpResult {
        let delta = self.config.precision_delta();
        let problem = LpProblem {
            columns: &self.columns,
            rows: &self.rows,
            index: &self.var_to_col,
            sense: self.sense,
            delta: &delta,
            max_iterations: self.config.max_iterations,
        };

        tracing::debug!(
            backend = self.backend.name(),
            columns = self.columns.len(),
            rows = self.rows.len(),
            precision,
            store_solution,
            "Solving"
        );

        let start = Instant::now();
        let BackendSolution {
            result,
            primal,
            dual,
        } = self.backend.solve(&problem, precision);
        let elapsed = start.elapsed();

        self.stats.solves += 1;
        self.stats.elapsed += elapsed;
        self.solution.clear();
        self.dual_solution.clear();
        self.objective_value = None;
        self.precision = Coefficient::zero();

        self.result = match result {
            LpResult::Optimal | LpResult::DeltaOptimal
                if primal.len() != self.columns.len() =>
            {
                tracing::error!(
                    expected = self.columns.len(),
                    actual = primal.len(),
                    "The backend returned the wrong number of values"
                );
                LpResult::Error
            },
            LpResult::Optimal | LpResult::DeltaOptimal => {
                self.objective_value = Some(self.evaluate_objective(&primal));

                let (violation, strict_ok) = self.check_solution(&primal);
                let exact = violation.is_zero() && strict_ok;
                self.precision = violation;

                if store_solution {
                    self.solution = primal;
                    if dual.len() == self.rows.len() {
                        self.dual_solution = dual;
                    }
                }

                if exact {
                    result
                } else {
                    result.relaxed()
                }
            },
            other => other,
        };

        tracing::debug!(result = %self.result, ?elapsed, "Finished solving");

        self.result
    }

    /// The outcome of the last [`LpSolver::solve()`].
    pub fn result(&self) -> LpResult { self.result }

    /// The stored solution, as long as it still covers every column.
    fn stored_solution(&self) -> Result<&[Coefficient], LpError> {
        if self.result.has_solution()
            && self.solution.len() == self.columns.len()
        {
            Ok(&self.solution)
        } else {
            Err(LpError::NoSolution {
                result: self.result,
            })
        }
    }

    /// The value `var` was given by the last solve.
    pub fn solution(&self, var: &Variable) -> Result<&Coefficient, LpError> {
        let solution = self.stored_solution()?;

        self.var_to_col
            .get(var)
            .and_then(|&idx| solution.get(idx))
            .ok_or_else(|| LpError::UnknownVariable { var: var.clone() })
    }

    /// The dual value of each row in the last solution, indexed like
    /// [`LpSolver::row()`]. Each one is how much the optimal objective
    /// changes per unit the row's bound moves.
    pub fn dual_solution(&self) -> Result<&[Coefficient], LpError> {
        self.stored_solution()?;

        if self.dual_solution.len() == self.rows.len() {
            Ok(&self.dual_solution)
        } else {
            Err(LpError::NoDualSolution {
                backend: self.backend.name(),
            })
        }
    }

    /// Every column's value in the last solution.
    pub fn model(&self) -> Result<Environment, LpError> {
        let solution = self.stored_solution()?;

        Ok(self
            .columns
            .iter()
            .map(Column::var)
            .cloned()
            .zip(solution.iter().cloned())
            .collect())
    }

    /// The objective function's value at the last solution.
    pub fn objective_value(&self) -> Option<&Coefficient> {
        self.objective_value.as_ref()
    }

    /// The rows, turned back into [`Formula`]s.
    pub fn constraints(&self) -> Vec<Formula> {
        self.rows.iter().filter_map(Row::to_formula).collect()
    }

    /// Re-check the last solution against every bound and row, returning
    /// the largest violation.
    pub fn verify(&self) -> Result<Coefficient, LpError> {
        let solution = self.stored_solution()?;
        Ok(self.check_solution(solution).0)
    }

    /// The largest violation of any bound or row by the last solution.
    pub fn precision(&self) -> &Coefficient { &self.precision }

    pub fn stats(&self) -> SolveStats { self.stats }

    /// Remove every column and row, and forget about any previous solution.
    pub fn reset(&mut self) {
        tracing::debug!(backend = self.backend.name(), "Resetting");

        self.columns.clear();
        self.rows.clear();
        self.var_to_col.clear();
        self.sense = ObjectiveSense::default();
        self.result = LpResult::Unsolved;
        self.solution.clear();
        self.dual_solution.clear();
        self.objective_value = None;
        self.precision = Coefficient::zero();
        self.stats = SolveStats::default();
    }

    fn value_of(&self, primal: &[Coefficient], var: &Variable) -> Coefficient {
        self.var_to_col
            .get(var)
            .and_then(|&idx| primal.get(idx))
            .cloned()
            .unwrap_or_else(Coefficient::zero)
    }

    fn evaluate_objective(&self, primal: &[Coefficient]) -> Coefficient {
        self.columns
            .iter()
            .zip(primal)
            .filter_map(|(column, value)| column.obj().map(|obj| obj * value))
            .fold(Coefficient::zero(), |acc, term| acc + term)
    }

    /// Find the largest violation in `primal` and whether strict rows hold
    /// strictly.
    fn check_solution(&self, primal: &[Coefficient]) -> (Coefficient, bool) {
        let mut worst = Coefficient::zero();
        let mut strict_ok = true;

        for (column, value) in self.columns.iter().zip(primal) {
            worst = worst.max(column.violation(value));
        }

        for row in &self.rows {
            let activity = row.activity(|var| self.value_of(primal, var));
            worst = worst.max(row.violation(&activity));
            strict_ok &= row.is_satisfied_by(&activity);
        }

        (worst, strict_ok)
    }
}

fn check_bounds(column: &Column) -> Result<(), LpError> {
    match (column.lb(), column.ub()) {
        (Some(lb), Some(ub)) if column.is_empty() => {
            Err(LpError::InvalidBounds {
                lb: lb.clone(),
                ub: ub.clone(),
            })
        },
        _ => Ok(()),
    }
}

impl Display for LpSolver {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sense = match self.sense {
            ObjectiveSense::Minimise => "minimise",
            ObjectiveSense::Maximise => "maximise",
        };

        writeln!(
            f,
            "LpSolver({}) {} [{}]",
            self.backend.name(),
            sense,
            self.result
        )?;

        for column in &self.columns {
            writeln!(f, "  {}", column)?;
        }
        for row in &self.rows {
            writeln!(f, "  {}", row)?;
        }

        Ok(())
    }
}
