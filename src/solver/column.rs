use crate::algebra::{
    Coefficient, Expression, Formula, FormulaKind, IntoCoefficient, Variable,
};
use num_traits::{One, Zero};
use std::fmt::{self, Display, Formatter};

/// A variable registered with an [`LpSolver`](crate::LpSolver), along with
/// its bounds and objective coefficient.
///
/// A fresh column has a lower bound of `0`, no upper bound and doesn't
/// contribute to the objective.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    var: Variable,
    lb: Option<Coefficient>,
    ub: Option<Coefficient>,
    obj: Option<Coefficient>,
}

impl Column {
    pub fn new(var: Variable) -> Self {
        Column {
            var,
            lb: Some(Coefficient::zero()),
            ub: None,
            obj: None,
        }
    }

    pub fn with_obj<C: IntoCoefficient>(mut self, obj: C) -> Self {
        self.set_obj(obj.into_coefficient());
        self
    }

    pub fn with_lb<C: IntoCoefficient>(self, lb: C) -> Self {
        Column {
            lb: Some(lb.into_coefficient()),
            ..self
        }
    }

    pub fn with_ub<C: IntoCoefficient>(self, ub: C) -> Self {
        Column {
            ub: Some(ub.into_coefficient()),
            ..self
        }
    }

    pub fn with_bounds<L, U>(self, lb: L, ub: U) -> Self
    where
        L: IntoCoefficient,
        U: IntoCoefficient,
    {
        self.with_lb(lb).with_ub(ub)
    }

    /// Let the column take arbitrarily negative values.
    pub fn unbounded_below(self) -> Self { Column { lb: None, ..self } }

    pub fn var(&self) -> &Variable { &self.var }

    pub fn lb(&self) -> Option<&Coefficient> { self.lb.as_ref() }

    pub fn ub(&self) -> Option<&Coefficient> { self.ub.as_ref() }

    /// The objective coefficient, `None` when the column doesn't contribute
    /// to the objective.
    pub fn obj(&self) -> Option<&Coefficient> { self.obj.as_ref() }

    pub(crate) fn set_obj(&mut self, obj: Coefficient) {
        self.obj = if obj.is_zero() { None } else { Some(obj) };
    }

    pub(crate) fn set_bounds(
        &mut self,
        lb: Option<Coefficient>,
        ub: Option<Coefficient>,
    ) {
        self.lb = lb;
        self.ub = ub;
    }

    /// Are the bounds contradictory?
    pub fn is_empty(&self) -> bool {
        match (&self.lb, &self.ub) {
            (Some(lb), Some(ub)) => lb > ub,
            _ => false,
        }
    }

    /// How far `value` is outside of this column's bounds.
    pub fn violation(&self, value: &Coefficient) -> Coefficient {
        bound_violation(value, self.lb.as_ref(), self.ub.as_ref())
    }
}

impl From<Variable> for Column {
    fn from(var: Variable) -> Column { Column::new(var) }
}

impl From<&Variable> for Column {
    fn from(var: &Variable) -> Column { Column::new(var.clone()) }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Column{{ {} in ", self.var)?;
        write_interval(f, self.lb.as_ref(), self.ub.as_ref())?;
        match &self.obj {
            Some(obj) => write!(f, ", obj = {} }}", obj),
            None => write!(f, ", obj = 0 }}"),
        }
    }
}

/// The relation a [`Row`] enforces, using the single-letter codes from the
/// MPS format.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RowSense {
    /// Strictly less than.
    Lt,
    Eq,
    Le,
    Ge,
    /// Strictly greater than.
    Gt,
    /// Not equal to.
    Nq,
}

impl RowSense {
    pub fn as_char(self) -> char {
        match self {
            RowSense::Gt => 'g',
            RowSense::Ge => 'G',
            RowSense::Eq => 'E',
            RowSense::Nq => 'N',
            RowSense::Le => 'L',
            RowSense::Lt => 'l',
        }
    }

    pub fn is_strict(self) -> bool {
        matches!(self, RowSense::Lt | RowSense::Gt)
    }
}

impl From<FormulaKind> for RowSense {
    fn from(kind: FormulaKind) -> RowSense {
        match kind {
            FormulaKind::Eq => RowSense::Eq,
            FormulaKind::Neq => RowSense::Nq,
            FormulaKind::Gt => RowSense::Gt,
            FormulaKind::Geq => RowSense::Ge,
            FormulaKind::Lt => RowSense::Lt,
            FormulaKind::Leq => RowSense::Le,
        }
    }
}

impl Display for RowSense {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A constraint registered with an [`LpSolver`](crate::LpSolver),
/// `lb <= sum(coeff * var) <= ub`.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    addends: Vec<(Variable, Coefficient)>,
    lb: Option<Coefficient>,
    ub: Option<Coefficient>,
    sense: RowSense,
}

impl Row {
    /// Create a row from its addends and a relation against `rhs`.
    ///
    /// Strict relations keep `rhs` as their bound and remember they are
    /// strict through [`Row::sense()`]. Returns `None` for [`RowSense::Nq`],
    /// which can't be written as a single closed interval.
    pub fn new(
        addends: Vec<(Variable, Coefficient)>,
        sense: RowSense,
        rhs: Coefficient,
    ) -> Option<Row> {
        let (lb, ub) = match sense {
            RowSense::Eq => (Some(rhs.clone()), Some(rhs)),
            RowSense::Le | RowSense::Lt => (None, Some(rhs)),
            RowSense::Ge | RowSense::Gt => (Some(rhs), None),
            RowSense::Nq => return None,
        };

        Some(Row {
            addends,
            lb,
            ub,
            sense,
        })
    }

    pub fn addends(&self) -> &[(Variable, Coefficient)] { &self.addends }

    pub fn lb(&self) -> Option<&Coefficient> { self.lb.as_ref() }

    pub fn ub(&self) -> Option<&Coefficient> { self.ub.as_ref() }

    pub fn sense(&self) -> RowSense { self.sense }

    pub fn is_strict(&self) -> bool { self.sense.is_strict() }

    /// Replace `var`'s coefficient, removing it from the row when `coeff` is
    /// zero.
    pub(crate) fn set_coefficient(
        &mut self,
        var: &Variable,
        coeff: Coefficient,
    ) {
        let existing = self.addends.iter().position(|(v, _)| v == var);

        match (existing, coeff.is_zero()) {
            (Some(i), true) => {
                self.addends.remove(i);
            },
            (Some(i), false) => self.addends[i].1 = coeff,
            (None, true) => {},
            (None, false) => self.addends.push((var.clone(), coeff)),
        }
    }

    /// The value of the row's left-hand side for a particular assignment.
    pub fn activity<F>(&self, mut value_of: F) -> Coefficient
    where
        F: FnMut(&Variable) -> Coefficient,
    {
        self.addends
            .iter()
            .map(|(var, coeff)| coeff * value_of(var))
            .fold(Coefficient::zero(), |acc, term| acc + term)
    }

    /// How far `activity` is outside of the row's bounds.
    pub fn violation(&self, activity: &Coefficient) -> Coefficient {
        bound_violation(activity, self.lb.as_ref(), self.ub.as_ref())
    }

    /// Does `activity` satisfy the row exactly, including strictness?
    pub fn is_satisfied_by(&self, activity: &Coefficient) -> bool {
        if !self.violation(activity).is_zero() {
            return false;
        }

        match self.sense {
            RowSense::Lt => self.ub.as_ref().map_or(true, |ub| activity < ub),
            RowSense::Gt => self.lb.as_ref().map_or(true, |lb| activity > lb),
            _ => true,
        }
    }

    /// Turn the row back into the [`Formula`] it represents.
    pub fn to_formula(&self) -> Option<Formula> {
        let expression: Expression = self.addends.iter().cloned().collect();

        let (kind, rhs) = match self.sense {
            RowSense::Eq => (FormulaKind::Eq, self.ub.clone()?),
            RowSense::Le => (FormulaKind::Leq, self.ub.clone()?),
            RowSense::Lt => (FormulaKind::Lt, self.ub.clone()?),
            RowSense::Ge => (FormulaKind::Geq, self.lb.clone()?),
            RowSense::Gt => (FormulaKind::Gt, self.lb.clone()?),
            RowSense::Nq => return None,
        };

        Some(Formula::new(expression, kind, rhs))
    }
}

impl Display for Row {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Row{{ ")?;

        for (i, (var, coeff)) in self.addends.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            if !coeff.is_one() {
                write!(f, "{} * ", coeff)?;
            }
            write!(f, "{}", var)?;
        }

        write!(f, " in ")?;
        write_interval(f, self.lb.as_ref(), self.ub.as_ref())?;
        write!(f, " }}")
    }
}

fn bound_violation(
    value: &Coefficient,
    lb: Option<&Coefficient>,
    ub: Option<&Coefficient>,
) -> Coefficient {
    if let Some(lb) = lb {
        if value < lb {
            return lb - value;
        }
    }

    if let Some(ub) = ub {
        if value > ub {
            return value - ub;
        }
    }

    Coefficient::zero()
}

fn write_interval(
    f: &mut Formatter<'_>,
    lb: Option<&Coefficient>,
    ub: Option<&Coefficient>,
) -> fmt::Result {
    match lb {
        Some(lb) => write!(f, "[ {}", lb)?,
        None => write!(f, "[ -inf")?,
    }
    match ub {
        Some(ub) => write!(f, " , {} ]", ub),
        None => write!(f, " , inf ]"),
    }
}
