use std::fmt::{self, Display, Formatter};

/// The outcome of [`LpSolver::solve()`](crate::LpSolver::solve).
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LpResult {
    /// The solver hasn't been run yet.
    #[default]
    Unsolved,
    Optimal,
    /// An optimal solution was found, but it only satisfies the problem to
    /// within the reported precision.
    DeltaOptimal,
    Unbounded,
    Infeasible,
    /// The backend failed for reasons unrelated to the problem itself.
    Error,
}

impl LpResult {
    /// Is there a solution we can read values from?
    pub fn has_solution(self) -> bool {
        matches!(self, LpResult::Optimal | LpResult::DeltaOptimal)
    }

    /// Does the problem have at least one feasible point?
    pub fn is_feasible(self) -> bool {
        matches!(
            self,
            LpResult::Optimal | LpResult::DeltaOptimal | LpResult::Unbounded
        )
    }

    /// The process exit code you would report for this result.
    pub fn exit_code(self) -> i32 {
        match self {
            LpResult::Optimal
            | LpResult::DeltaOptimal
            | LpResult::Unbounded
            | LpResult::Infeasible => 0,
            LpResult::Error => 1,
            LpResult::Unsolved => 2,
        }
    }

    /// Downgrade an optimal result to its delta counterpart.
    pub fn relaxed(self) -> LpResult {
        match self {
            LpResult::Optimal => LpResult::DeltaOptimal,
            other => other,
        }
    }
}

impl Display for LpResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LpResult::Unsolved => write!(f, "unsolved"),
            LpResult::Optimal => write!(f, "optimal"),
            LpResult::DeltaOptimal => write!(f, "delta-optimal"),
            LpResult::Unbounded => write!(f, "unbounded"),
            LpResult::Infeasible => write!(f, "infeasible"),
            LpResult::Error => write!(f, "error"),
        }
    }
}
