//! Arithmetic operators for [`Variable`]s and [`Expression`]s.
//!
//! Only operations which keep things linear are provided, so you can add and
//! subtract expressions but only ever multiply or divide them by a constant.

use crate::algebra::{Coefficient, Expression, Variable};
use num_bigint::BigInt;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign,
};

/// Something which can be used as an exact [`Coefficient`].
pub trait IntoCoefficient {
    fn into_coefficient(self) -> Coefficient;
}

macro_rules! integer_coefficients {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoCoefficient for $ty {
                fn into_coefficient(self) -> Coefficient {
                    Coefficient::from_integer(BigInt::from(self))
                }
            }
        )*
    };
}

integer_coefficients!(i32, i64, u32, u64, usize);

// Only `i32` gets the scalar-on-the-left impls so `2 * x` can infer the
// literal's type.
impl Mul<Expression> for i32 {
    type Output = Expression;

    fn mul(self, expr: Expression) -> Expression { expr * self }
}

impl Mul<Variable> for i32 {
    type Output = Expression;

    fn mul(self, var: Variable) -> Expression { var * self }
}

impl IntoCoefficient for BigInt {
    fn into_coefficient(self) -> Coefficient { Coefficient::from_integer(self) }
}

impl IntoCoefficient for Coefficient {
    fn into_coefficient(self) -> Coefficient { self }
}

impl IntoCoefficient for &Coefficient {
    fn into_coefficient(self) -> Coefficient { self.clone() }
}

impl Mul<Expression> for Coefficient {
    type Output = Expression;

    fn mul(self, expr: Expression) -> Expression { expr * self }
}

impl Mul<Variable> for Coefficient {
    type Output = Expression;

    fn mul(self, var: Variable) -> Expression { var * self }
}

fn add_scaled(lhs: &mut Expression, rhs: &Expression, negate: bool) {
    if lhs.is_empty() && !negate {
        // just share rhs's terms
        *lhs = rhs.clone();
        return;
    }

    for (var, coeff) in rhs.addends() {
        if negate {
            lhs.add_term(var, -coeff);
        } else {
            lhs.add_term(var, coeff);
        }
    }
}

impl Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Expression { self * -1 }
}

impl Neg for &Expression {
    type Output = Expression;

    fn neg(self) -> Expression { self.clone() * -1 }
}

impl Neg for Variable {
    type Output = Expression;

    fn neg(self) -> Expression { Expression::from((self, -1)) }
}

impl Neg for &Variable {
    type Output = Expression;

    fn neg(self) -> Expression { Expression::from((self.clone(), -1)) }
}

impl AddAssign<&Expression> for Expression {
    fn add_assign(&mut self, other: &Expression) {
        add_scaled(self, other, false);
    }
}

impl AddAssign<Expression> for Expression {
    fn add_assign(&mut self, other: Expression) { *self += &other; }
}

impl AddAssign<&Variable> for Expression {
    fn add_assign(&mut self, var: &Variable) { self.add_term(var, 1); }
}

impl AddAssign<Variable> for Expression {
    fn add_assign(&mut self, var: Variable) { self.add_term(&var, 1); }
}

impl SubAssign<&Expression> for Expression {
    fn sub_assign(&mut self, other: &Expression) {
        add_scaled(self, other, true);
    }
}

impl SubAssign<Expression> for Expression {
    fn sub_assign(&mut self, other: Expression) { *self -= &other; }
}

impl SubAssign<&Variable> for Expression {
    fn sub_assign(&mut self, var: &Variable) { self.subtract_term(var, 1); }
}

impl SubAssign<Variable> for Expression {
    fn sub_assign(&mut self, var: Variable) { self.subtract_term(&var, 1); }
}

impl Add<&Expression> for Expression {
    type Output = Expression;

    fn add(mut self, other: &Expression) -> Expression {
        self += other;
        self
    }
}

impl Add for Expression {
    type Output = Expression;

    fn add(mut self, other: Expression) -> Expression {
        self += &other;
        self
    }
}

impl Add<Variable> for Expression {
    type Output = Expression;

    fn add(mut self, var: Variable) -> Expression {
        self += var;
        self
    }
}

impl Add<&Variable> for Expression {
    type Output = Expression;

    fn add(mut self, var: &Variable) -> Expression {
        self += var;
        self
    }
}

impl Sub<&Expression> for Expression {
    type Output = Expression;

    fn sub(mut self, other: &Expression) -> Expression {
        self -= other;
        self
    }
}

impl Sub for Expression {
    type Output = Expression;

    fn sub(mut self, other: Expression) -> Expression {
        self -= &other;
        self
    }
}

impl Sub<Variable> for Expression {
    type Output = Expression;

    fn sub(mut self, var: Variable) -> Expression {
        self -= var;
        self
    }
}

impl Sub<&Variable> for Expression {
    type Output = Expression;

    fn sub(mut self, var: &Variable) -> Expression {
        self -= var;
        self
    }
}

impl Add for Variable {
    type Output = Expression;

    fn add(self, other: Variable) -> Expression {
        Expression::from(self) + other
    }
}

impl Add<Expression> for Variable {
    type Output = Expression;

    fn add(self, expr: Expression) -> Expression {
        Expression::from(self) + expr
    }
}

impl Sub for Variable {
    type Output = Expression;

    fn sub(self, other: Variable) -> Expression {
        Expression::from(self) - other
    }
}

impl Sub<Expression> for Variable {
    type Output = Expression;

    fn sub(self, expr: Expression) -> Expression {
        Expression::from(self) - expr
    }
}

impl<C: IntoCoefficient> MulAssign<C> for Expression {
    fn mul_assign(&mut self, factor: C) { self.scale(factor); }
}

/// # Panics
///
/// Dividing by zero will panic. Use [`Expression::divide()`] if you want to
/// handle that case yourself.
impl<C: IntoCoefficient> DivAssign<C> for Expression {
    fn div_assign(&mut self, divisor: C) {
        if let Err(e) = self.divide(divisor) {
            panic!("{}", e);
        }
    }
}

impl<C: IntoCoefficient> Mul<C> for Expression {
    type Output = Expression;

    fn mul(mut self, factor: C) -> Expression {
        self *= factor;
        self
    }
}

impl<C: IntoCoefficient> Div<C> for Expression {
    type Output = Expression;

    fn div(mut self, divisor: C) -> Expression {
        self /= divisor;
        self
    }
}

impl<C: IntoCoefficient> Mul<C> for Variable {
    type Output = Expression;

    fn mul(self, factor: C) -> Expression { Expression::from((self, factor)) }
}

impl<C: IntoCoefficient> Div<C> for Variable {
    type Output = Expression;

    fn div(self, divisor: C) -> Expression { Expression::from(self) / divisor }
}
