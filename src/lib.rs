//! Linear arithmetic over exact rationals.
//!
//! The [`algebra`] module contains the symbolic side of things, [`Variable`]s,
//! linear [`Expression`]s built from them and [`Formula`]s relating an
//! expression to a constant. The [`solver`] module turns formulas into the
//! rows of a linear program and hands them to a backend.
//!
//! ```rust
//! use linprog_core::{
//!     Column, Config, LpResult, LpSolver, Relational, Variable,
//! };
//!
//! let x = Variable::new("x");
//! let y = Variable::new("y");
//! let objective = 3 * x.clone() + 2 * y.clone();
//!
//! let mut solver = LpSolver::new(Config::default());
//! solver.add_column(Column::new(x.clone()).with_ub(3)).unwrap();
//! solver.add_column(&y).unwrap();
//! solver.add_row(&(x.clone() + y.clone()).less_eq(4)).unwrap();
//! solver.maximise(&objective).unwrap();
//!
//! assert_eq!(solver.solve(1e-9), LpResult::Optimal);
//! assert_eq!(solver.objective_value().unwrap().to_string(), "11");
//! ```

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

pub mod algebra;
mod config;
pub mod solver;

pub use algebra::{
    ArithmeticError, Coefficient, Environment, Expression, Formula,
    FormulaKind, Relational, Variable,
};
pub use config::{Config, ConfigError, Format, LpSolverKind};
pub use solver::{Column, LpError, LpResult, LpSolver, Row, RowSense};
