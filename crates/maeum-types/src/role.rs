//! File roles and path verdicts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Structural category of a source file.
///
/// The set is closed: pattern entries naming anything else are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Request entry points (controllers, routes, handlers).
    Entry,
    /// Business logic (services, use cases, domain).
    Core,
    /// Persistence and external adapters.
    Infra,
    /// Tests and specs.
    Test,
    /// Everything else.
    Peripheral,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Entry,
        Role::Core,
        Role::Infra,
        Role::Test,
        Role::Peripheral,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Entry => "entry",
            Role::Core => "core",
            Role::Infra => "infra",
            Role::Test => "test",
            Role::Peripheral => "peripheral",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entry" => Ok(Role::Entry),
            "core" => Ok(Role::Core),
            "infra" => Ok(Role::Infra),
            "test" => Ok(Role::Test),
            "peripheral" => Ok(Role::Peripheral),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Admissibility of a path under the current tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "GO")]
    Go,
    #[serde(rename = "NO-GO")]
    NoGo,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Go => "GO",
            Verdict::NoGo => "NO-GO",
        })
    }
}

/// Output of the path judge. Returned to the caller, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub role: Role,
    pub verdict: Verdict,
    /// Role and, for NO-GO, the security keyword that triggered it.
    pub rationale: String,
}

impl Decision {
    /// The two-line user-visible form.
    pub fn render(&self) -> String {
        format!("Role: {}\nDecision: {}", self.role, self.verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_roundtrip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_rejected() {
        assert!("gateway".parse::<Role>().is_err());
    }

    #[test]
    fn render_two_lines() {
        let d = Decision {
            role: Role::Core,
            verdict: Verdict::NoGo,
            rationale: "core file; touches auth".into(),
        };
        assert_eq!(d.render(), "Role: core\nDecision: NO-GO");
    }

    #[test]
    fn verdict_serializes_with_dash() {
        assert_eq!(serde_json::to_string(&Verdict::NoGo).unwrap(), "\"NO-GO\"");
    }
}
