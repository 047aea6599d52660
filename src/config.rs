use crate::algebra::Coefficient;
use num_traits::Zero;
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// The problem serialization format an [`LpSolver`](crate::LpSolver) is
/// bound to.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Format {
    /// Pick the format based on the input.
    #[default]
    Auto,
    Mps,
}

impl FromStr for Format {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Format::Auto),
            "mps" => Ok(Format::Mps),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Format::Auto => write!(f, "auto"),
            Format::Mps => write!(f, "mps"),
        }
    }
}

/// Which engine an [`LpSolver`](crate::LpSolver) hands problems to.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LpSolverKind {
    /// A simplex implementation which works with exact rationals.
    #[default]
    Exact,
    /// The floating-point simplex from the `microlp` crate.
    Microlp,
}

impl LpSolverKind {
    pub const ALL: [LpSolverKind; 2] =
        [LpSolverKind::Exact, LpSolverKind::Microlp];
}

impl FromStr for LpSolverKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(LpSolverKind::Exact),
            "microlp" => Ok(LpSolverKind::Microlp),
            _ => Err(ConfigError::UnknownLpSolver(s.to_string())),
        }
    }
}

impl Display for LpSolverKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LpSolverKind::Exact => write!(f, "exact"),
            LpSolverKind::Microlp => write!(f, "microlp"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown LP solver \"{0}\", expected one of: exact, microlp")]
    UnknownLpSolver(String),
    #[error("Unknown format \"{0}\", expected one of: auto, mps")]
    UnknownFormat(String),
}

/// Settings used when creating and running an [`LpSolver`](crate::LpSolver).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub format: Format,
    pub lp_solver: LpSolverKind,
    /// The delta used to tighten strict bounds and the tolerance the
    /// floating-point backend works with.
    pub precision: f64,
    /// Give up on a solve after this many pivots.
    pub max_iterations: usize,
}

impl Config {
    pub const DEFAULT_PRECISION: f64 = 9.999999999999996e-4;
    pub const DEFAULT_MAX_ITERATIONS: usize = 100_000;

    pub fn new(format: Format, lp_solver: LpSolverKind) -> Self {
        Config {
            format,
            lp_solver,
            ..Default::default()
        }
    }

    /// Create a [`Config`] from the textual names of a format and an LP
    /// solver (e.g. `"mps"` and `"exact"`).
    pub fn from_options(
        format: &str,
        lp_solver: &str,
    ) -> Result<Self, ConfigError> {
        Ok(Config::new(format.parse()?, lp_solver.parse()?))
    }

    pub fn with_format(self, format: Format) -> Self {
        Config { format, ..self }
    }

    pub fn with_lp_solver(self, lp_solver: LpSolverKind) -> Self {
        Config { lp_solver, ..self }
    }

    pub fn with_precision(self, precision: f64) -> Self {
        Config { precision, ..self }
    }

    pub fn with_max_iterations(self, max_iterations: usize) -> Self {
        Config {
            max_iterations,
            ..self
        }
    }

    /// The key used to look up shared solver instances.
    pub fn instance_key(&self) -> (Format, LpSolverKind) {
        (self.format, self.lp_solver)
    }

    /// The precision as an exact rational. Anything which isn't a finite,
    /// positive number is treated as `0`.
    pub fn precision_delta(&self) -> Coefficient {
        if self.precision.is_finite() && self.precision > 0.0 {
            Coefficient::from_float(self.precision)
                .unwrap_or_else(Coefficient::zero)
        } else {
            Coefficient::zero()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            format: Format::default(),
            lp_solver: LpSolverKind::default(),
            precision: Config::DEFAULT_PRECISION,
            max_iterations: Config::DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl Display for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ format = {}, lp_solver = {}, ",
            self.format, self.lp_solver
        )?;
        write!(
            f,
            "precision = {}, max_iterations = {} }}",
            self.precision, self.max_iterations
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();

        assert_eq!(config.format, Format::Auto);
        assert_eq!(config.lp_solver, LpSolverKind::Exact);
        assert_eq!(config.precision, 9.999999999999996e-4);
        assert_eq!(config.max_iterations, 100_000);
    }

    #[test]
    fn parse_known_options() {
        let inputs = vec![
            ("auto", "exact", Format::Auto, LpSolverKind::Exact),
            ("mps", "microlp", Format::Mps, LpSolverKind::Microlp),
            ("MPS", " Exact ", Format::Mps, LpSolverKind::Exact),
        ];

        for (format, lp_solver, format_should_be, lp_solver_should_be) in inputs
        {
            let got = Config::from_options(format, lp_solver).unwrap();

            assert_eq!(got.format, format_should_be);
            assert_eq!(got.lp_solver, lp_solver_should_be);
        }
    }

    #[test]
    fn unknown_options_fail_fast() {
        assert_eq!(
            Config::from_options("mps", "soplex"),
            Err(ConfigError::UnknownLpSolver(String::from("soplex")))
        );
        assert_eq!(
            Config::from_options("lp", "exact"),
            Err(ConfigError::UnknownFormat(String::from("lp")))
        );
    }

    #[test]
    fn names_round_trip_through_display() {
        for kind in LpSolverKind::ALL {
            let got: LpSolverKind = kind.to_string().parse().unwrap();
            assert_eq!(got, kind);
        }

        for format in [Format::Auto, Format::Mps] {
            let got: Format = format.to_string().parse().unwrap();
            assert_eq!(got, format);
        }
    }

    #[test]
    fn precision_as_a_rational() {
        let config = Config::default().with_precision(0.5);
        assert_eq!(
            config.precision_delta(),
            Coefficient::new(1.into(), 2.into())
        );

        let config = config.with_precision(0.0);
        assert!(config.precision_delta().is_zero());

        let config = config.with_precision(f64::NAN);
        assert!(config.precision_delta().is_zero());
    }

    #[test]
    fn builder_setters_only_touch_their_field() {
        let config = Config::default()
            .with_format(Format::Mps)
            .with_lp_solver(LpSolverKind::Microlp)
            .with_max_iterations(10);

        assert_eq!(
            config.instance_key(),
            (Format::Mps, LpSolverKind::Microlp)
        );
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.precision, Config::DEFAULT_PRECISION);
    }
}
