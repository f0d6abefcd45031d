//! Session phase and tolerance.
//!
//! The tolerance is never stored: it is computed from the phase on every
//! read, so a phase change is immediately visible to the path judge.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Development phase declared by the user for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Phase {
    /// Move fast; the default.
    Mvp,
    /// Throwaway exploration.
    Experiment,
    /// Cleaning up existing code.
    Refactor,
    /// Preparing for release.
    Stabilize,
}

impl Default for Phase {
    fn default() -> Self {
        Self::Mvp
    }
}

/// How permissive the path judge is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tolerance {
    High,
    Medium,
    Low,
}

impl Phase {
    /// All phases, in declaration order.
    pub const ALL: [Phase; 4] = [
        Phase::Mvp,
        Phase::Experiment,
        Phase::Refactor,
        Phase::Stabilize,
    ];

    /// The fixed phase → tolerance table.
    pub fn tolerance(self) -> Tolerance {
        match self {
            Phase::Mvp | Phase::Experiment => Tolerance::High,
            Phase::Refactor => Tolerance::Medium,
            Phase::Stabilize => Tolerance::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Mvp => "MVP",
            Phase::Experiment => "EXPERIMENT",
            Phase::Refactor => "REFACTOR",
            Phase::Stabilize => "STABILIZE",
        }
    }
}

impl Tolerance {
    pub fn as_str(self) -> &'static str {
        match self {
            Tolerance::High => "HIGH",
            Tolerance::Medium => "MEDIUM",
            Tolerance::Low => "LOW",
        }
    }

    /// Whether security-sensitive paths are blocked at this level.
    pub fn guards_sensitive(self) -> bool {
        matches!(self, Tolerance::Medium | Tolerance::Low)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = String;

    /// Parses a phase name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MVP" => Ok(Phase::Mvp),
            "EXPERIMENT" => Ok(Phase::Experiment),
            "REFACTOR" => Ok(Phase::Refactor),
            "STABILIZE" => Ok(Phase::Stabilize),
            other => Err(format!("unknown phase: {other}")),
        }
    }
}

/// Read-only view of the session context.
///
/// Built from a phase, so `tolerance` always agrees with `phase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextState {
    pub phase: Phase,
    pub tolerance: Tolerance,
}

impl ContextState {
    pub fn from_phase(phase: Phase) -> Self {
        Self {
            phase,
            tolerance: phase.tolerance(),
        }
    }
}

impl Default for ContextState {
    fn default() -> Self {
        Self::from_phase(Phase::default())
    }
}

impl fmt::Display for ContextState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.phase, self.tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_table() {
        assert_eq!(Phase::Mvp.tolerance(), Tolerance::High);
        assert_eq!(Phase::Experiment.tolerance(), Tolerance::High);
        assert_eq!(Phase::Refactor.tolerance(), Tolerance::Medium);
        assert_eq!(Phase::Stabilize.tolerance(), Tolerance::Low);
    }

    #[test]
    fn default_is_mvp_high() {
        let state = ContextState::default();
        assert_eq!(state.phase, Phase::Mvp);
        assert_eq!(state.tolerance, Tolerance::High);
        assert_eq!(state.to_string(), "MVP/HIGH");
    }

    #[test]
    fn from_phase_always_consistent() {
        for phase in Phase::ALL {
            let state = ContextState::from_phase(phase);
            assert_eq!(state.tolerance, phase.tolerance());
        }
    }

    #[test]
    fn parse_phase_case_insensitive() {
        assert_eq!("stabilize".parse::<Phase>().unwrap(), Phase::Stabilize);
        assert_eq!(" Refactor ".parse::<Phase>().unwrap(), Phase::Refactor);
        assert!("later".parse::<Phase>().is_err());
    }

    #[test]
    fn guards_sensitive_only_below_high() {
        assert!(!Tolerance::High.guards_sensitive());
        assert!(Tolerance::Medium.guards_sensitive());
        assert!(Tolerance::Low.guards_sensitive());
    }

    #[test]
    fn serde_uppercase() {
        let json = serde_json::to_string(&ContextState::from_phase(Phase::Refactor)).unwrap();
        assert_eq!(json, r#"{"phase":"REFACTOR","tolerance":"MEDIUM"}"#);
    }
}
