//! Pattern vocabulary.
//!
//! A [`Pattern`] is a named architectural shape: which roles an entity
//! must have, which role depends on which, how far apart its files may
//! live, and optionally a layer order. The vocabulary is built once at
//! startup from the built-in table plus any configured entries; entries
//! that fail validation are skipped with a warning.

use std::collections::BTreeSet;
use std::fmt;

use tracing::warn;

use maeum_types::config::{LayeringSpec, PatternSpec};
use maeum_types::{MaeumError, Result, Role};

/// Layer order, top layer first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layering {
    pub layers: Vec<Vec<Role>>,
    pub no_reverse_dependency: bool,
}

impl Layering {
    /// Index of the layer holding `role`, if any.
    pub fn layer_of(&self, role: Role) -> Option<usize> {
        self.layers.iter().position(|layer| layer.contains(&role))
    }

    /// Whether a dependency `from -> to` points from a lower layer to a
    /// higher one.
    pub fn is_upward(&self, from: Role, to: Role) -> bool {
        matches!(
            (self.layer_of(from), self.layer_of(to)),
            (Some(a), Some(b)) if a > b
        )
    }
}

/// A validated, immutable vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub name: String,
    pub required_roles: BTreeSet<Role>,
    /// `(a, b)` means "a depends on b".
    pub flow: Vec<(Role, Role)>,
    pub max_file_distance: usize,
    pub layering: Option<Layering>,
}

impl Pattern {
    /// Validate a declarative entry.
    ///
    /// # Errors
    ///
    /// [`MaeumError::InvalidPattern`] when a role is outside the closed
    /// set, a flow pair is a self-loop, names a role that is not required,
    /// contradicts another pair, or points upward against the layering.
    pub fn from_spec(spec: &PatternSpec) -> Result<Self> {
        let invalid = |reason: String| MaeumError::InvalidPattern {
            name: spec.name.clone(),
            reason,
        };

        if spec.name.trim().is_empty() {
            return Err(invalid("empty name".into()));
        }

        let required_roles = spec
            .required_roles
            .iter()
            .map(|r| r.parse::<Role>())
            .collect::<std::result::Result<BTreeSet<_>, _>>()
            .map_err(invalid)?;
        if required_roles.is_empty() {
            return Err(invalid("no required roles".into()));
        }

        let mut flow: Vec<(Role, Role)> = Vec::new();
        for raw in &spec.flow {
            let (a, b) = parse_flow_pair(raw).map_err(&invalid)?;
            if a == b {
                return Err(invalid(format!("self-loop flow {a} -> {b}")));
            }
            for role in [a, b] {
                if !required_roles.contains(&role) {
                    return Err(invalid(format!("flow role {role} is not required")));
                }
            }
            if flow.contains(&(b, a)) {
                return Err(invalid(format!("contradictory flow {a} -> {b} and {b} -> {a}")));
            }
            if !flow.contains(&(a, b)) {
                flow.push((a, b));
            }
        }

        let layering = spec
            .layering
            .as_ref()
            .map(parse_layering)
            .transpose()
            .map_err(&invalid)?;
        if let Some(layering) = &layering
            && let Some((a, b)) = flow.iter().find(|(a, b)| layering.is_upward(*a, *b))
        {
            return Err(invalid(format!("flow {a} -> {b} points upward against layering")));
        }

        Ok(Self {
            name: spec.name.trim().to_string(),
            required_roles,
            flow,
            max_file_distance: spec.max_file_distance,
            layering,
        })
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let roles: Vec<&str> = self.required_roles.iter().map(|r| r.as_str()).collect();
        let flow: Vec<String> = self
            .flow
            .iter()
            .map(|(a, b)| format!("{a} -> {b}"))
            .collect();
        write!(
            f,
            "{}: roles [{}], flow [{}], max distance {}",
            self.name,
            roles.join(", "),
            flow.join(", "),
            self.max_file_distance
        )?;
        if let Some(layering) = &self.layering {
            let layers: Vec<String> = layering
                .layers
                .iter()
                .map(|l| l.iter().map(|r| r.as_str()).collect::<Vec<_>>().join("|"))
                .collect();
            write!(f, ", layers {}", layers.join(" > "))?;
            if layering.no_reverse_dependency {
                f.write_str(" (no reverse)")?;
            }
        }
        Ok(())
    }
}

fn parse_flow_pair(raw: &str) -> std::result::Result<(Role, Role), String> {
    let Some((a, b)) = raw.split_once("->") else {
        return Err(format!("flow entry {raw:?} is not `a -> b`"));
    };
    Ok((a.parse()?, b.parse()?))
}

fn parse_layering(spec: &LayeringSpec) -> std::result::Result<Layering, String> {
    let mut layers: Vec<Vec<Role>> = Vec::with_capacity(spec.layers.len());
    for raw_layer in &spec.layers {
        let mut layer = Vec::with_capacity(raw_layer.len());
        for raw in raw_layer {
            let role: Role = raw.parse()?;
            if layers.iter().any(|l| l.contains(&role)) || layer.contains(&role) {
                return Err(format!("role {role} appears in more than one layer"));
            }
            layer.push(role);
        }
        layers.push(layer);
    }
    Ok(Layering {
        layers,
        no_reverse_dependency: spec.no_reverse_dependency,
    })
}

// ── Built-in table ──────────────────────────────────────────────────────

fn spec(
    name: &str,
    roles: &[&str],
    flow: &[&str],
    max_file_distance: usize,
    layers: &[&[&str]],
) -> PatternSpec {
    PatternSpec {
        name: name.to_string(),
        required_roles: roles.iter().map(|r| r.to_string()).collect(),
        flow: flow.iter().map(|f| f.to_string()).collect(),
        max_file_distance,
        layering: (!layers.is_empty()).then(|| LayeringSpec {
            layers: layers
                .iter()
                .map(|l| l.iter().map(|r| r.to_string()).collect())
                .collect(),
            no_reverse_dependency: true,
        }),
    }
}

/// The built-in entries, in declaration (tie-break) order.
pub fn builtin_specs() -> Vec<PatternSpec> {
    vec![
        spec(
            "LAYERED",
            &["entry", "core", "infra"],
            &["entry -> core", "core -> infra"],
            3,
            &[&["entry"], &["core"], &["infra"]],
        ),
        spec(
            "REPOSITORY",
            &["core", "infra"],
            &["core -> infra"],
            2,
            &[&["core"], &["infra"]],
        ),
        spec("REST_RESOURCE", &["entry", "core"], &["entry -> core"], 2, &[]),
        spec("THIN_SERVICE", &["entry", "infra"], &["entry -> infra"], 1, &[]),
        spec("TESTED_MODULE", &["core", "test"], &["test -> core"], 3, &[]),
    ]
}

// ── Vocabulary ──────────────────────────────────────────────────────────

/// The immutable, ordered set of valid patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternVocabulary {
    patterns: Vec<Pattern>,
}

impl PatternVocabulary {
    /// Validate entries in order, skipping the invalid ones.
    ///
    /// Returns the vocabulary and the rejection reasons.
    pub fn from_specs(specs: &[PatternSpec]) -> (Self, Vec<MaeumError>) {
        let mut patterns = Vec::with_capacity(specs.len());
        let mut rejected = Vec::new();
        for spec in specs {
            match Pattern::from_spec(spec) {
                Ok(p) if patterns.iter().any(|q: &Pattern| q.name == p.name) => {
                    warn!(pattern = %p.name, "skipping duplicate pattern");
                    rejected.push(MaeumError::InvalidPattern {
                        name: p.name,
                        reason: "duplicate name".into(),
                    });
                }
                Ok(p) => patterns.push(p),
                Err(e) => {
                    warn!(pattern = %spec.name, error = %e, "skipping pattern");
                    rejected.push(e);
                }
            }
        }
        (Self { patterns }, rejected)
    }

    pub fn builtin() -> Self {
        Self::from_specs(&builtin_specs()).0
    }

    /// Built-ins followed by `custom` entries.
    pub fn with_custom(custom: &[PatternSpec]) -> (Self, Vec<MaeumError>) {
        let mut specs = builtin_specs();
        specs.extend_from_slice(custom);
        Self::from_specs(&specs)
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn get(&self, name: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
