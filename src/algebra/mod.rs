//! The symbolic algebra system.

mod expr;
mod formula;
pub mod ops;
mod variable;

pub use expr::{
    ArithmeticError, Coefficient, Environment, Expression, VariableMap,
};
pub use formula::{relate, Formula, FormulaKind, Operand, Relational};
pub use ops::IntoCoefficient;
pub use variable::Variable;
