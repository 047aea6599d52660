use crate::algebra::{
    Coefficient, Environment, Expression, Variable, VariableMap,
};
use num_bigint::BigInt;
use num_traits::Zero;
use rustc_hash::FxHasher;
use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
    hash::{Hash, Hasher},
    ops::{Neg, Not},
};

/// The relation a [`Formula`] asserts between its expression and its
/// right-hand side.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormulaKind {
    Eq,
    Neq,
    Gt,
    Geq,
    Lt,
    Leq,
}

impl FormulaKind {
    pub fn symbol(self) -> &'static str {
        match self {
            FormulaKind::Eq => "=",
            FormulaKind::Neq => "!=",
            FormulaKind::Gt => ">",
            FormulaKind::Geq => ">=",
            FormulaKind::Lt => "<",
            FormulaKind::Leq => "<=",
        }
    }

    pub fn is_strict(self) -> bool {
        matches!(self, FormulaKind::Gt | FormulaKind::Lt)
    }
}

/// Mirror the relation, the kind you get by swapping both sides.
impl Neg for FormulaKind {
    type Output = FormulaKind;

    fn neg(self) -> FormulaKind {
        match self {
            FormulaKind::Gt => FormulaKind::Lt,
            FormulaKind::Geq => FormulaKind::Leq,
            FormulaKind::Lt => FormulaKind::Gt,
            FormulaKind::Leq => FormulaKind::Geq,
            other => other,
        }
    }
}

/// The logical negation of the relation.
impl Not for FormulaKind {
    type Output = FormulaKind;

    fn not(self) -> FormulaKind {
        match self {
            FormulaKind::Eq => FormulaKind::Neq,
            FormulaKind::Neq => FormulaKind::Eq,
            FormulaKind::Gt => FormulaKind::Leq,
            FormulaKind::Geq => FormulaKind::Lt,
            FormulaKind::Lt => FormulaKind::Geq,
            FormulaKind::Leq => FormulaKind::Gt,
        }
    }
}

impl Display for FormulaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A linear constraint, `expression <kind> rhs`.
#[derive(Debug, Clone)]
pub struct Formula {
    expression: Expression,
    kind: FormulaKind,
    rhs: Coefficient,
}

impl Formula {
    pub fn new(
        expression: Expression,
        kind: FormulaKind,
        rhs: Coefficient,
    ) -> Self {
        Formula {
            expression,
            kind,
            rhs,
        }
    }

    pub fn expression(&self) -> &Expression { &self.expression }

    pub fn kind(&self) -> FormulaKind { self.kind }

    pub fn rhs(&self) -> &Coefficient { &self.rhs }

    pub fn equal_to(&self, other: &Formula) -> bool {
        self.kind == other.kind
            && self.rhs == other.rhs
            && self.expression.equal_to(&other.expression)
    }

    pub fn less(&self, other: &Formula) -> bool {
        self.cmp(other) == Ordering::Less
    }

    pub fn hash_value(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.expression.hash_value().hash(&mut hasher);
        self.kind.hash(&mut hasher);
        self.rhs.hash(&mut hasher);
        hasher.finish()
    }

    /// Does the relation hold under `env`? Missing variables are treated as
    /// `0`.
    pub fn evaluate(&self, env: &Environment) -> bool {
        let value = self.expression.evaluate(env);

        match self.kind {
            FormulaKind::Eq => value == self.rhs,
            FormulaKind::Neq => value != self.rhs,
            FormulaKind::Gt => value > self.rhs,
            FormulaKind::Geq => value >= self.rhs,
            FormulaKind::Lt => value < self.rhs,
            FormulaKind::Leq => value <= self.rhs,
        }
    }

    /// Replace every variable assigned in `env` with its value, moving the
    /// result over to the right-hand side.
    pub fn substitute(&self, env: &Environment) -> Formula {
        let mut rhs = self.rhs.clone();

        for (var, coeff) in self.expression.addends() {
            if let Some(value) = env.get(var) {
                rhs -= coeff * value;
            }
        }

        Formula::new(self.expression.substitute(env), self.kind, rhs)
    }

    pub fn rename(&self, map: &VariableMap) -> Formula {
        Formula::new(self.expression.rename(map), self.kind, self.rhs.clone())
    }
}

/// Multiply both sides by `-1`.
impl Neg for Formula {
    type Output = Formula;

    fn neg(self) -> Formula {
        Formula::new(-self.expression, -self.kind, -self.rhs)
    }
}

impl Not for Formula {
    type Output = Formula;

    fn not(self) -> Formula {
        Formula::new(self.expression, !self.kind, self.rhs)
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Formula) -> bool { self.equal_to(other) }
}

impl Eq for Formula {}

impl Hash for Formula {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_value());
    }
}

impl PartialOrd for Formula {
    fn partial_cmp(&self, other: &Formula) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Formula {
    fn cmp(&self, other: &Formula) -> Ordering {
        self.kind
            .cmp(&other.kind)
            .then_with(|| self.rhs.cmp(&other.rhs))
            .then_with(|| self.expression.cmp(&other.expression))
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.expression, self.kind, self.rhs)
    }
}

/// One side of a relation.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Expression(Expression),
    Constant(Coefficient),
}

impl From<Expression> for Operand {
    fn from(expr: Expression) -> Operand { Operand::Expression(expr) }
}

impl From<&Expression> for Operand {
    fn from(expr: &Expression) -> Operand { Operand::Expression(expr.clone()) }
}

impl From<Variable> for Operand {
    fn from(var: Variable) -> Operand { Operand::Expression(var.into()) }
}

impl From<&Variable> for Operand {
    fn from(var: &Variable) -> Operand { Operand::Expression(var.into()) }
}

impl From<Coefficient> for Operand {
    fn from(value: Coefficient) -> Operand { Operand::Constant(value) }
}

impl From<&Coefficient> for Operand {
    fn from(value: &Coefficient) -> Operand { Operand::Constant(value.clone()) }
}

impl From<BigInt> for Operand {
    fn from(value: BigInt) -> Operand {
        Operand::Constant(Coefficient::from_integer(value))
    }
}

impl From<i32> for Operand {
    fn from(value: i32) -> Operand { BigInt::from(value).into() }
}

impl From<i64> for Operand {
    fn from(value: i64) -> Operand { BigInt::from(value).into() }
}

/// Build a [`Formula`] from `lhs <kind> rhs`.
///
/// Comparing two expressions moves everything to the left, giving
/// `lhs - rhs <kind> 0`. Comparing an expression with a constant keeps the
/// expression as-is and uses the constant as the right-hand side. When the
/// constant is on the left the relation is mirrored, so `3 < e` becomes
/// `e > 3`.
pub fn relate<L, R>(lhs: L, kind: FormulaKind, rhs: R) -> Formula
where
    L: Into<Operand>,
    R: Into<Operand>,
{
    match (lhs.into(), rhs.into()) {
        (Operand::Expression(left), Operand::Expression(right)) => {
            Formula::new(left - right, kind, Coefficient::zero())
        },
        (Operand::Expression(left), Operand::Constant(right)) => {
            Formula::new(left, kind, right)
        },
        (Operand::Constant(left), Operand::Expression(right)) => {
            Formula::new(right, -kind, left)
        },
        (Operand::Constant(left), Operand::Constant(right)) => {
            Formula::new(Expression::new(), kind, right - left)
        },
    }
}

/// Relational operators for anything which can be one side of a
/// [`Formula`].
///
/// Rust's comparison operators have to return `bool`, so these are named
/// methods instead.
pub trait Relational: Into<Operand> + Sized {
    fn equals<R: Into<Operand>>(self, rhs: R) -> Formula {
        relate(self, FormulaKind::Eq, rhs)
    }

    fn not_equals<R: Into<Operand>>(self, rhs: R) -> Formula {
        relate(self, FormulaKind::Neq, rhs)
    }

    fn less_than<R: Into<Operand>>(self, rhs: R) -> Formula {
        relate(self, FormulaKind::Lt, rhs)
    }

    fn less_eq<R: Into<Operand>>(self, rhs: R) -> Formula {
        relate(self, FormulaKind::Leq, rhs)
    }

    fn greater_than<R: Into<Operand>>(self, rhs: R) -> Formula {
        relate(self, FormulaKind::Gt, rhs)
    }

    fn greater_eq<R: Into<Operand>>(self, rhs: R) -> Formula {
        relate(self, FormulaKind::Geq, rhs)
    }
}

impl<T: Into<Operand>> Relational for T {}
