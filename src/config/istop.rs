use std::str::FromStr;

/// When the incremental driver should stop extending the horizon.
///
/// Corresponds to the `--istop` CLI constant of the original incremental main loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopCriterion {
    /// Stop as soon as a step is satisfiable (and `imin` steps have been taken).
    Sat,

    /// Stop as soon as a step is unsatisfiable.
    Unsat,

    /// Stop as soon as a step result is unknown (e.g. the host engine was interrupted).
    Unknown,
}

impl Default for StopCriterion {
    fn default() -> Self {
        Self::Sat
    }
}

impl std::fmt::Display for StopCriterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sat => write!(f, "sat"),
            Self::Unsat => write!(f, "unsat"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for StopCriterion {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sat" => Ok(Self::Sat),
            "unsat" => Ok(Self::Unsat),
            "unknown" => Ok(Self::Unknown),
            _unknown_string => Err(()),
        }
    }
}
