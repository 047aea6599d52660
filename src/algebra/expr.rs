use crate::algebra::{ops::IntoCoefficient, Variable};
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use rustc_hash::{FxHashMap, FxHasher};
use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
    hash::{Hash, Hasher},
    sync::Arc,
};

/// The exact numeric type used for coefficients, bounds and values.
pub type Coefficient = BigRational;

/// An assignment of values to variables.
pub type Environment = FxHashMap<Variable, Coefficient>;

/// A variable-to-variable renaming.
pub type VariableMap = FxHashMap<Variable, Variable>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArithmeticError {
    #[error("Division by zero")]
    DivisionByZero,
}

/// A linear combination of variables, `c_1*x_1 + c_2*x_2 + ... + c_n*x_n`.
///
/// Coefficients are never zero. An addend whose coefficient cancels out is
/// removed, so two expressions with the same terms always have the same
/// representation regardless of how they were built.
///
/// # Sharing
///
/// Cloning an [`Expression`] is cheap because the clone shares its terms with
/// the original (see [`Expression::use_count()`]). The first mutation through
/// either handle detaches it, so a clone is always an independent snapshot.
#[derive(Debug, Clone, Default)]
pub struct Expression {
    cell: Arc<ExpressionCell>,
}

/// The shared storage behind an [`Expression`].
///
/// `coefficients` is the canonical content while `order` remembers when each
/// variable first got a non-zero coefficient.
#[derive(Debug, Clone, Default)]
struct ExpressionCell {
    coefficients: BTreeMap<Variable, Coefficient>,
    order: Vec<Variable>,
}

impl ExpressionCell {
    fn add(&mut self, var: &Variable, coeff: &Coefficient) {
        if coeff.is_zero() {
            return;
        }

        match self.coefficients.get_mut(var) {
            Some(existing) => {
                let sum = &*existing + coeff;

                if sum.is_zero() {
                    self.coefficients.remove(var);
                    self.order.retain(|v| v != var);
                } else {
                    *existing = sum;
                }
            },
            None => {
                self.coefficients.insert(var.clone(), coeff.clone());
                self.order.push(var.clone());
            },
        }
    }

    fn multiply(&mut self, factor: &Coefficient) {
        if factor.is_zero() {
            self.coefficients.clear();
            self.order.clear();
            return;
        }

        for coeff in self.coefficients.values_mut() {
            *coeff = &*coeff * factor;
        }
    }

    fn hash_value(&self) -> u64 {
        if self.coefficients.is_empty() {
            return 0;
        }

        let mut hasher = FxHasher::default();

        for (var, coeff) in &self.coefficients {
            var.hash(&mut hasher);
            coeff.hash(&mut hasher);
        }

        hasher.finish()
    }
}

impl Expression {
    /// The additive identity, an expression with no terms.
    pub fn new() -> Self { Expression::default() }

    /// Build an expression by adding up a sequence of terms.
    pub fn from_addends<I, C>(addends: I) -> Self
    where
        I: IntoIterator<Item = (Variable, C)>,
        C: IntoCoefficient,
    {
        let mut expr = Expression::new();

        for (var, coeff) in addends {
            expr.add_term(&var, coeff);
        }

        expr
    }

    /// The variables with a non-zero coefficient, in the order they were
    /// first added.
    pub fn variables(&self) -> &[Variable] { &self.cell.order }

    /// Iterate over each term in the same order as
    /// [`Expression::variables()`].
    pub fn addends(
        &self,
    ) -> impl Iterator<Item = (&Variable, &Coefficient)> + '_ {
        self.cell
            .order
            .iter()
            .filter_map(move |var| self.cell.coefficients.get_key_value(var))
    }

    pub fn coefficient(&self, var: &Variable) -> Option<&Coefficient> {
        self.cell.coefficients.get(var)
    }

    pub fn depends_on(&self, var: &Variable) -> bool {
        self.cell.coefficients.contains_key(var)
    }

    pub fn len(&self) -> usize { self.cell.coefficients.len() }

    pub fn is_empty(&self) -> bool { self.cell.coefficients.is_empty() }

    /// How many [`Expression`]s currently share this expression's terms.
    pub fn use_count(&self) -> usize { Arc::strong_count(&self.cell) }

    pub fn equal_to(&self, other: &Expression) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
            || self.cell.coefficients == other.cell.coefficients
    }

    pub fn less(&self, other: &Expression) -> bool {
        self.cmp(other) == Ordering::Less
    }

    /// A hash of the expression's terms. The empty expression always hashes
    /// to `0`.
    pub fn hash_value(&self) -> u64 { self.cell.hash_value() }

    /// Get mutable access to the terms, detaching from any other
    /// [`Expression`] we share them with.
    fn cell_mut(&mut self) -> &mut ExpressionCell {
        Arc::make_mut(&mut self.cell)
    }

    /// Add `coeff * var` to the expression.
    pub fn add_term<C>(&mut self, var: &Variable, coeff: C) -> &mut Self
    where
        C: IntoCoefficient,
    {
        let coeff = coeff.into_coefficient();

        if !coeff.is_zero() {
            self.cell_mut().add(var, &coeff);
        }

        self
    }

    /// Subtract `coeff * var` from the expression.
    pub fn subtract_term<C>(&mut self, var: &Variable, coeff: C) -> &mut Self
    where
        C: IntoCoefficient,
    {
        let coeff = coeff.into_coefficient();
        self.add_term(var, -coeff)
    }

    /// Multiply every coefficient by `factor`. Scaling by zero leaves the
    /// empty expression.
    pub fn scale<C>(&mut self, factor: C) -> &mut Self
    where
        C: IntoCoefficient,
    {
        let factor = factor.into_coefficient();

        if !factor.is_one() && !self.is_empty() {
            self.cell_mut().multiply(&factor);
        }

        self
    }

    /// Divide every coefficient by `divisor`.
    pub fn divide<C>(
        &mut self,
        divisor: C,
    ) -> Result<&mut Self, ArithmeticError>
    where
        C: IntoCoefficient,
    {
        let divisor = divisor.into_coefficient();

        if divisor.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }

        Ok(self.scale(divisor.recip()))
    }

    /// Evaluate the expression. Variables missing from `env` are treated as
    /// `0`.
    pub fn evaluate(&self, env: &Environment) -> Coefficient {
        let mut total = Coefficient::zero();

        for (var, coeff) in &self.cell.coefficients {
            if let Some(value) = env.get(var) {
                total += coeff * value;
            }
        }

        total
    }

    /// Remove every term whose variable has been assigned a value in `env`.
    ///
    /// An [`Expression`] has no constant term to fold the values into, see
    /// [`Formula::substitute()`](crate::Formula::substitute) for a version
    /// which keeps track of them.
    pub fn substitute(&self, env: &Environment) -> Expression {
        self.addends()
            .filter(|(var, _)| !env.contains_key(var))
            .map(|(var, coeff)| (var.clone(), coeff.clone()))
            .collect()
    }

    /// Replace variables according to `map`. All replacements happen
    /// simultaneously, so `{x: y, y: x}` swaps the two variables.
    pub fn rename(&self, map: &VariableMap) -> Expression {
        self.addends()
            .map(|(var, coeff)| {
                let target = map.get(var).unwrap_or(var);
                (target.clone(), coeff.clone())
            })
            .collect()
    }
}

impl From<Variable> for Expression {
    fn from(var: Variable) -> Expression { Expression::from(&var) }
}

impl From<&Variable> for Expression {
    fn from(var: &Variable) -> Expression {
        let mut expr = Expression::new();
        expr.add_term(var, 1);
        expr
    }
}

impl<C: IntoCoefficient> From<(Variable, C)> for Expression {
    fn from((var, coeff): (Variable, C)) -> Expression {
        let mut expr = Expression::new();
        expr.add_term(&var, coeff);
        expr
    }
}

impl<C: IntoCoefficient> FromIterator<(Variable, C)> for Expression {
    fn from_iter<I: IntoIterator<Item = (Variable, C)>>(iter: I) -> Self {
        Expression::from_addends(iter)
    }
}

impl<C: IntoCoefficient> Extend<(Variable, C)> for Expression {
    fn extend<I: IntoIterator<Item = (Variable, C)>>(&mut self, iter: I) {
        for (var, coeff) in iter {
            self.add_term(&var, coeff);
        }
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Expression) -> bool { self.equal_to(other) }
}

impl Eq for Expression {}

impl Hash for Expression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_value());
    }
}

impl PartialOrd for Expression {
    fn partial_cmp(&self, other: &Expression) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Expression {
    fn cmp(&self, other: &Expression) -> Ordering {
        if Arc::ptr_eq(&self.cell, &other.cell) {
            return Ordering::Equal;
        }

        self.cell.coefficients.iter().cmp(other.cell.coefficients.iter())
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;

        if self.is_empty() {
            write!(f, "0")?;
        }

        for (i, (var, coeff)) in self.addends().enumerate() {
            write_addend(f, i == 0, var, coeff)?;
        }

        write!(f, ")")
    }
}

fn write_addend(
    f: &mut Formatter<'_>,
    first: bool,
    var: &Variable,
    coeff: &Coefficient,
) -> fmt::Result {
    let magnitude = if coeff.is_negative() {
        if first {
            write!(f, "-")?;
        } else {
            write!(f, " - ")?;
        }
        -coeff
    } else {
        if !first {
            write!(f, " + ")?;
        }
        coeff.clone()
    };

    // don't print "1 * x"
    if !magnitude.is_one() {
        write!(f, "{} * ", magnitude)?;
    }

    write!(f, "{}", var)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn q(n: i64) -> Coefficient { Coefficient::from_integer(BigInt::from(n)) }

    fn ratio(numer: i64, denom: i64) -> Coefficient {
        Coefficient::new(BigInt::from(numer), BigInt::from(denom))
    }

    fn env(values: &[(&Variable, i64)]) -> Environment {
        values
            .iter()
            .map(|(var, value)| (Variable::clone(var), q(*value)))
            .collect()
    }

    #[test]
    fn default_expression_is_the_additive_identity() {
        let e = Expression::new();

        assert!(e.is_empty());
        assert_eq!(e.addends().count(), 0);
        assert_eq!(e.hash_value(), 0);
        assert!(e.equal_to(&e));
        assert!(!e.less(&e));
        assert!(e.variables().is_empty());
        assert_eq!(e.evaluate(&Environment::default()), q(0));
        assert!(e.substitute(&Environment::default()).is_empty());
    }

    #[test]
    fn from_a_single_variable() {
        let x = Variable::new("x");

        let e = Expression::from(&x);

        assert_eq!(e.len(), 1);
        assert_eq!(e.coefficient(&x), Some(&q(1)));
        assert_ne!(e.hash_value(), 0);
        assert!(e.equal_to(&e));
        assert!(!e.less(&e));
        assert_eq!(e.variables(), &[x]);
    }

    #[test]
    fn from_an_addend() {
        let x = Variable::new("x");

        let e = Expression::from((x.clone(), 2));

        assert_eq!(e.len(), 1);
        assert_eq!(e.coefficient(&x), Some(&q(2)));
        assert_eq!(e.variables(), &[x]);
    }

    #[test]
    fn from_many_addends() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let z = Variable::new("z");

        let e = Expression::from_addends(vec![
            (x.clone(), 1),
            (y.clone(), 2),
            (z.clone(), 6),
            (x.clone(), -1),
        ]);

        assert_eq!(e.len(), 2);
        assert_eq!(e.coefficient(&x), None);
        assert_eq!(e.coefficient(&y), Some(&q(2)));
        assert_eq!(e.coefficient(&z), Some(&q(6)));
        assert_eq!(e.variables(), &[y, z]);
    }

    #[test]
    fn copies_share_storage_until_mutated() {
        let x = Variable::new("x");
        let e = Expression::new();

        let mut copy = e.clone();
        assert_eq!(e.use_count(), 2);
        assert_eq!(copy.use_count(), 2);

        copy.add_term(&x, 1);

        assert_eq!(e.use_count(), 1);
        assert_eq!(copy.use_count(), 1);
        assert_eq!(copy.variables().len(), 1);
        assert_eq!(e.variables().len(), 0);
    }

    #[test]
    fn mutating_the_original_leaves_the_copy_untouched() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let mut original = Expression::from((x.clone(), 2));
        let copy = original.clone();
        assert_eq!(original.use_count(), 2);

        original.add_term(&y, 3);

        assert_eq!(original.use_count(), 1);
        assert_eq!(copy.use_count(), 1);
        assert_eq!(copy.variables(), &[x.clone()]);
        assert_eq!(original.variables(), &[x, y]);
    }

    #[test]
    fn aliases_see_every_mutation() {
        let x = Variable::new("x");
        let mut e = Expression::new();

        {
            let alias = &mut e;
            alias.add_term(&x, 5);
            assert_eq!(alias.use_count(), 1);
        }

        assert_eq!(e.coefficient(&x), Some(&q(5)));
        assert_eq!(e.use_count(), 1);
    }

    #[test]
    fn reference_counts_drop_with_the_copies() {
        let x = Variable::new("x");
        let e = Expression::from((x, 2));
        assert_eq!(e.use_count(), 1);

        {
            let first = e.clone();
            assert_eq!(e.use_count(), 2);
            let second = first.clone();
            assert_eq!(e.use_count(), 3);
            assert_eq!(second.use_count(), 3);
        }

        assert_eq!(e.use_count(), 1);
    }

    #[test]
    fn moving_keeps_a_single_owner() {
        let x = Variable::new("x");
        let e = Expression::from((x, 2));

        let moved = e;
        assert_eq!(moved.use_count(), 1);
        let moved_again = moved;
        assert_eq!(moved_again.use_count(), 1);
    }

    #[test]
    fn hash_follows_the_content() {
        let x = Variable::new("x");
        let mut e1 = Expression::new();
        let e2 = Expression::new();
        assert_eq!(e1.hash_value(), e2.hash_value());

        let c1 = e1.clone();
        assert_eq!(c1.hash_value(), e1.hash_value());
        e1.add_term(&x, 4);
        assert_ne!(c1.hash_value(), e1.hash_value());

        let c2 = e1.clone();
        assert_eq!(c2.hash_value(), e1.hash_value());
        e1 *= 2;
        assert_ne!(c2.hash_value(), e1.hash_value());

        let c3 = e1.clone();
        assert_eq!(c3.hash_value(), e1.hash_value());
        e1 /= 2;
        assert_ne!(c3.hash_value(), e1.hash_value());
        assert_eq!(c2.hash_value(), e1.hash_value());

        e1.add_term(&x, -4);
        assert_eq!(e1.hash_value(), e2.hash_value());
        assert!(e1.equal_to(&e2));
    }

    #[test]
    fn hash_ignores_insertion_order() {
        let x = Variable::new("x");
        let y = Variable::new("y");

        let xy = Expression::from_addends(vec![(x.clone(), 1), (y.clone(), 2)]);
        let yx = Expression::from_addends(vec![(y, 2), (x, 1)]);

        assert_eq!(xy.hash_value(), yx.hash_value());
        assert!(xy.equal_to(&yx));
        assert!(!xy.less(&yx));
        assert!(!yx.less(&xy));
    }

    #[test]
    fn add_accumulates_and_prunes() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let mut e = Expression::new();

        e.add_term(&x, 1);
        assert_eq!(e.variables().len(), 1);
        assert_eq!(e.coefficient(&x), Some(&q(1)));

        e.add_term(&x, 4);
        assert_eq!(e.variables().len(), 1);
        assert_eq!(e.coefficient(&x), Some(&q(5)));

        e.add_term(&x, -6);
        assert_eq!(e.variables().len(), 1);
        assert_eq!(e.coefficient(&x), Some(&q(-1)));

        e.add_term(&y, -7);
        assert_eq!(e.variables().len(), 2);
        assert_eq!(e.coefficient(&x), Some(&q(-1)));
        assert_eq!(e.coefficient(&y), Some(&q(-7)));

        e.add_term(&y, 7);
        assert_eq!(e.variables().len(), 1);
        assert_eq!(e.len(), 1);
        assert_eq!(e.coefficient(&x), Some(&q(-1)));
        assert_eq!(e.coefficient(&y), None);
    }

    #[test]
    fn adding_zero_doesnt_detach_a_copy() {
        let x = Variable::new("x");
        let mut e = Expression::from(&x);
        let copy = e.clone();

        e.add_term(&x, 0);

        assert_eq!(e.use_count(), 2);
        assert_eq!(copy.use_count(), 2);
    }

    #[test]
    fn cancelled_variables_move_to_the_back() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let z = Variable::new("z");
        let mut e = Expression::from_addends(vec![
            (x.clone(), 1),
            (y.clone(), 3),
            (z.clone(), 1),
        ]);

        e.add_term(&y, -3);
        assert_eq!(e.variables(), &[x.clone(), z.clone()]);

        e.add_term(&y, 3);
        assert_eq!(e.variables(), &[x, z, y]);
    }

    #[test]
    fn multiply() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let z = Variable::new("z");
        let mut e = Expression::new();
        e.add_term(&x, 7).add_term(&y, 12);

        e *= 2;
        assert_eq!(e.coefficient(&x), Some(&q(14)));
        assert_eq!(e.coefficient(&y), Some(&q(24)));

        e *= 1;
        assert_eq!(e.coefficient(&x), Some(&q(14)));
        assert_eq!(e.coefficient(&y), Some(&q(24)));

        e *= -1;
        assert_eq!(e.coefficient(&x), Some(&q(-14)));
        assert_eq!(e.coefficient(&y), Some(&q(-24)));

        e.add_term(&x, 1).add_term(&y, 1).add_term(&z, 1);
        assert_eq!(e.variables().len(), 3);
        assert_eq!(e.coefficient(&x), Some(&q(-13)));
        assert_eq!(e.coefficient(&y), Some(&q(-23)));
        assert_eq!(e.coefficient(&z), Some(&q(1)));

        e *= 0;
        assert!(e.variables().is_empty());
        assert_eq!(e.addends().count(), 0);
        assert_eq!(e.hash_value(), 0);
    }

    #[test]
    fn divide() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let z = Variable::new("z");
        let mut e = Expression::new();
        e.add_term(&x, 18).add_term(&y, 12);

        e /= 2;
        assert_eq!(e.coefficient(&x), Some(&q(9)));
        assert_eq!(e.coefficient(&y), Some(&q(6)));

        e /= 1;
        assert_eq!(e.coefficient(&x), Some(&q(9)));
        assert_eq!(e.coefficient(&y), Some(&q(6)));

        e /= -1;
        assert_eq!(e.coefficient(&x), Some(&q(-9)));
        assert_eq!(e.coefficient(&y), Some(&q(-6)));

        e.add_term(&x, 1).add_term(&y, 1).add_term(&z, 1);
        assert_eq!(e.coefficient(&x), Some(&q(-8)));
        assert_eq!(e.coefficient(&y), Some(&q(-5)));
        assert_eq!(e.coefficient(&z), Some(&q(1)));

        e /= 16;
        assert_eq!(e.coefficient(&x), Some(&ratio(-1, 2)));
        assert_eq!(e.coefficient(&y), Some(&ratio(-5, 16)));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let x = Variable::new("x");
        let mut e = Expression::from(&x);

        let got = e.divide(0).map(|_| ());

        assert_eq!(got, Err(ArithmeticError::DivisionByZero));
        assert_eq!(e.coefficient(&x), Some(&q(1)));
    }

    #[test]
    #[should_panic(expected = "Division by zero")]
    fn division_operator_panics_on_zero() {
        let x = Variable::new("x");
        let mut e = Expression::from(&x);

        e /= 0;
    }

    #[test]
    fn dividing_undoes_multiplying() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let original = Expression::from_addends(vec![(x, 3), (y, -7)]);

        let mut e = original.clone();
        e *= ratio(5, 3);
        e /= ratio(5, 3);

        assert_eq!(e, original);
        assert_eq!(e.hash_value(), original.hash_value());
    }

    #[test]
    fn evaluate() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let z = Variable::new("z");
        let e = Expression::from_addends(vec![
            (x.clone(), 1),
            (y.clone(), 2),
            (z.clone(), 3),
        ]);

        let got = e.evaluate(&env(&[(&x, 1), (&y, 2), (&z, 3)]));

        assert_eq!(got, q(14));
    }

    #[test]
    fn missing_variables_evaluate_to_zero() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let e = Expression::from_addends(vec![(x.clone(), 3), (y, 5)]);

        let got = e.evaluate(&env(&[(&x, 2)]));

        assert_eq!(got, q(6));
    }

    #[test]
    fn substitute_drops_assigned_variables() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let z = Variable::new("z");
        let e = Expression::from_addends(vec![
            (x.clone(), 1),
            (y.clone(), 2),
            (z.clone(), 3),
        ]);

        let got = e.substitute(&env(&[(&y, 10)]));

        assert_eq!(got.variables(), &[x.clone(), z.clone()]);
        assert_eq!(got.coefficient(&x), Some(&q(1)));
        assert_eq!(got.coefficient(&z), Some(&q(3)));
        // the original is left untouched
        assert_eq!(e.len(), 3);
    }

    #[test]
    fn rename_is_simultaneous() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let e = Expression::from_addends(vec![(x.clone(), 1), (y.clone(), 5)]);
        let swap: VariableMap =
            vec![(x.clone(), y.clone()), (y.clone(), x.clone())]
                .into_iter()
                .collect();

        let got = e.rename(&swap);

        assert_eq!(got.coefficient(&x), Some(&q(5)));
        assert_eq!(got.coefficient(&y), Some(&q(1)));
    }

    #[test]
    fn rename_merges_terms() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let e = Expression::from_addends(vec![(x.clone(), 1), (y.clone(), -1)]);
        let merge: VariableMap =
            vec![(x.clone(), y.clone())].into_iter().collect();

        let got = e.rename(&merge);

        assert!(got.is_empty());
    }

    #[test]
    fn ordering_is_consistent_with_equality() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let small = Expression::from((x.clone(), 1));
        let big = Expression::from((x.clone(), 2));
        let other = Expression::from((y, 1));

        assert!(small.less(&big));
        assert!(!big.less(&small));
        assert!(small.less(&other));
        assert!(Expression::new().less(&small));

        let mut sorted = vec![other.clone(), big.clone(), small.clone()];
        sorted.sort();
        assert_eq!(sorted, vec![small, big, other]);
    }

    #[test]
    fn the_dummy_variable_is_an_ordinary_term() {
        let x = Variable::new("x");
        let mut e = Expression::from(&Variable::dummy());

        e.add_term(&x, 2);
        e.add_term(&Variable::dummy(), 3);

        assert_eq!(e.variables(), &[Variable::dummy(), x.clone()]);
        assert_eq!(e.coefficient(&Variable::dummy()), Some(&q(4)));
        assert_eq!(e.coefficient(&x), Some(&q(2)));
    }

    #[test]
    fn display() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let z = Variable::new("z");

        let inputs = vec![
            (Expression::new(), "(0)"),
            (Expression::from(&x), "(x)"),
            (
                Expression::from_addends(vec![
                    (x.clone(), 2),
                    (y.clone(), 3),
                    (z.clone(), 4),
                ]),
                "(2 * x + 3 * y + 4 * z)",
            ),
            (
                Expression::from_addends(vec![(x.clone(), -1), (y.clone(), 1)]),
                "(-x + y)",
            ),
            (
                Expression::from_addends(vec![
                    (x.clone(), q(1)),
                    (y.clone(), q(-2)),
                    (z.clone(), ratio(1, 2)),
                ]),
                "(x - 2 * y + 1/2 * z)",
            ),
        ];

        for (expr, should_be) in inputs {
            let got = expr.to_string();
            assert_eq!(got, should_be);
        }
    }
}
