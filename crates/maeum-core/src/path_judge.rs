//! Path role classification and GO/NO-GO verdicts.
//!
//! Role groups are checked in priority order; the first group with a
//! keyword contained in some path segment wins. A path that matches
//! nothing is `peripheral`.

use maeum_types::{ContextState, Decision, Role, Verdict};

/// A role and the path substrings that indicate it.
struct RoleKeywords {
    role: Role,
    keywords: &'static [&'static str],
}

/// Checked in order: entry, core, infra, test.
const ROLE_KEYWORDS: &[RoleKeywords] = &[
    RoleKeywords {
        role: Role::Entry,
        keywords: &["controller", "route", "handler", "api"],
    },
    RoleKeywords {
        role: Role::Core,
        keywords: &["service", "usecase", "domain"],
    },
    RoleKeywords {
        role: Role::Infra,
        keywords: &["repo", "dao", "db", "storage"],
    },
    RoleKeywords {
        role: Role::Test,
        keywords: &["test", "spec"],
    },
];

/// Substrings that mark a path as security-sensitive.
const SENSITIVE_KEYWORDS: &[&str] = &["auth", "token", "jwt", "crypto", "payment"];

/// Split one path segment into lowercase tokens.
///
/// Breaks on `.`, `_`, `-`, whitespace and camelCase boundaries
/// (`UserHTTPController` → `user`, `http`, `controller`).
pub fn split_tokens(segment: &str) -> Vec<String> {
    let chars: Vec<char> = segment.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '.' | '_' | '-') || c.is_whitespace() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower)
            {
                tokens.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Classify a path into a role, returning the keyword that decided it.
pub fn classify_role_with_keyword(path: &str) -> (Role, Option<&'static str>) {
    let segments: Vec<String> = path
        .split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect();
    for group in ROLE_KEYWORDS {
        if let Some(kw) = group
            .keywords
            .iter()
            .find(|kw| segments.iter().any(|s| s.contains(**kw)))
        {
            return (group.role, Some(*kw));
        }
    }
    (Role::Peripheral, None)
}

pub fn classify_role(path: &str) -> Role {
    classify_role_with_keyword(path).0
}

/// First security keyword contained in the path, case-insensitively.
pub fn sensitive_keyword(path: &str) -> Option<&'static str> {
    let lower = path.to_lowercase();
    SENSITIVE_KEYWORDS
        .iter()
        .copied()
        .find(|kw| lower.contains(kw))
}

/// Renders a role and verdict for a single path.
///
/// The judge holds no state: tolerance is passed in on every call, so a
/// phase change is visible to the very next judgement.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathRoleJudge;

impl PathRoleJudge {
    pub fn new() -> Self {
        Self
    }

    pub fn judge(&self, path: &str, state: ContextState) -> Decision {
        let (role, role_kw) = classify_role_with_keyword(path);
        let sensitive = sensitive_keyword(path);

        let role_note = match role_kw {
            Some(kw) => format!("{role} file (matched `{kw}`)"),
            None => format!("{role} file"),
        };

        let (verdict, rationale) = match sensitive {
            Some(kw) if state.tolerance.guards_sensitive() => (
                Verdict::NoGo,
                format!(
                    "{role_note}; touches `{kw}` at {} tolerance",
                    state.tolerance
                ),
            ),
            Some(kw) => (
                Verdict::Go,
                format!(
                    "{role_note}; touches `{kw}`, allowed at {} tolerance",
                    state.tolerance
                ),
            ),
            None => (Verdict::Go, role_note),
        };

        Decision {
            role,
            verdict,
            rationale,
        }
    }
}
