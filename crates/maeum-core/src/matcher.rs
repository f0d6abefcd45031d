//! Pattern matching against a semantic graph.
//!
//! Every entity holding at least one of a pattern's required roles is a
//! candidate. For a candidate the matcher counts constraints:
//!
//! - one per required role (present in the entity);
//! - one per flow pair `a -> b` (an edge from the entity's `a` file to some
//!   `b` file, and with `noReverseDependency` no edge back from its `b` file
//!   to an `a` file);
//! - one for the file-distance bound;
//! - one for the layering, when declared (the entity has outgoing edges
//!   and none of them points upward).
//!
//! A pattern's score is its best candidate's satisfied fraction. Adding an
//! edge that completes a flow pair can only raise it. A pattern that
//! declares a flow is reported only when at least one flow pair is backed
//! by an edge; role names alone never claim a flow.

use maeum_types::Role;

use crate::graph::{Entity, SemanticGraph};
use crate::patterns::{Pattern, PatternVocabulary};

/// How well one pattern fits the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternScore<'a> {
    pub pattern: &'a Pattern,
    /// The entity that scored best.
    pub entity: String,
    pub satisfied: usize,
    pub total: usize,
    /// Flow pairs backed by an edge.
    pub flow_satisfied: usize,
}

impl PatternScore<'_> {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.satisfied as f64 / self.total as f64
        }
    }

    /// Whether the score rests on more than role names.
    pub fn is_reportable(&self) -> bool {
        self.pattern.flow.is_empty() || self.flow_satisfied > 0
    }

    /// Exact comparison without float rounding.
    fn beats(&self, other: &PatternScore<'_>) -> bool {
        self.satisfied * other.total > other.satisfied * self.total
    }
}

/// Directory-segment distance between two file paths.
///
/// Counts the directory segments not shared by the two paths: files in
/// the same directory are 0 apart, siblings one level down are 2 apart.
pub fn dir_distance(a: &str, b: &str) -> usize {
    let dirs = |p: &'_ str| -> Vec<String> {
        let mut segs: Vec<String> = p.split('/').map(String::from).collect();
        segs.pop();
        segs
    };
    let (da, db) = (dirs(a), dirs(b));
    let common = da.iter().zip(&db).take_while(|(x, y)| x == y).count();
    (da.len() - common) + (db.len() - common)
}

/// Constraint counts for one entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub satisfied: usize,
    pub total: usize,
    pub flow_satisfied: usize,
}

/// Constraint counts of `pattern` for one entity.
pub fn score_entity(pattern: &Pattern, entity: &Entity, graph: &SemanticGraph) -> Tally {
    let mut satisfied = 0;
    let mut total = 0;
    let mut flow_satisfied = 0;

    for role in &pattern.required_roles {
        total += 1;
        if entity.roles.contains_key(role) {
            satisfied += 1;
        }
    }

    let no_reverse = pattern
        .layering
        .as_ref()
        .is_some_and(|l| l.no_reverse_dependency);
    let has_edge = |from: Role, to: Role| {
        graph
            .edges_from(&entity.name)
            .any(|e| e.from_role == from && e.to_role == to)
    };
    for &(a, b) in &pattern.flow {
        total += 1;
        let forward = has_edge(a, b);
        let reverse = no_reverse && has_edge(b, a);
        if forward && !reverse {
            satisfied += 1;
            flow_satisfied += 1;
        }
    }

    total += 1;
    let files: Vec<&str> = pattern
        .required_roles
        .iter()
        .filter_map(|r| entity.roles.get(r).map(String::as_str))
        .collect();
    let max_distance = files
        .iter()
        .enumerate()
        .flat_map(|(i, a)| files[i + 1..].iter().map(move |b| dir_distance(a, b)))
        .max()
        .unwrap_or(0);
    if max_distance <= pattern.max_file_distance {
        satisfied += 1;
    }

    if let Some(layering) = &pattern.layering {
        total += 1;
        let mut outgoing = graph.edges_from(&entity.name).peekable();
        let connected = outgoing.peek().is_some();
        let upward = outgoing.any(|e| layering.is_upward(e.from_role, e.to_role));
        if connected && !upward {
            satisfied += 1;
        }
    }

    Tally {
        satisfied,
        total,
        flow_satisfied,
    }
}

/// Best-scoring candidate entity for `pattern`, if any entity holds one
/// of its required roles.
pub fn score_pattern<'a>(pattern: &'a Pattern, graph: &SemanticGraph) -> Option<PatternScore<'a>> {
    let mut best: Option<PatternScore<'a>> = None;
    for entity in graph.entities() {
        if !pattern
            .required_roles
            .iter()
            .any(|r| entity.roles.contains_key(r))
        {
            continue;
        }
        let tally = score_entity(pattern, entity, graph);
        let candidate = PatternScore {
            pattern,
            entity: entity.name.clone(),
            satisfied: tally.satisfied,
            total: tally.total,
            flow_satisfied: tally.flow_satisfied,
        };
        if best.as_ref().is_none_or(|b| candidate.beats(b)) {
            best = Some(candidate);
        }
    }
    best
}

/// The highest-scoring pattern at or above `min_satisfaction`.
///
/// Ties go to the pattern declared first. Below the threshold, or with
/// no edge behind a declared flow, nothing is reported, even if a partial
/// match exists.
pub fn best_pattern<'a>(
    vocabulary: &'a PatternVocabulary,
    graph: &SemanticGraph,
    min_satisfaction: f64,
) -> Option<PatternScore<'a>> {
    let mut best: Option<PatternScore<'a>> = None;
    for pattern in vocabulary.patterns() {
        let Some(score) = score_pattern(pattern, graph) else {
            continue;
        };
        if !score.is_reportable() || score.fraction() + f64::EPSILON < min_satisfaction {
            continue;
        }
        if best.as_ref().is_none_or(|b| score.beats(b)) {
            best = Some(score);
        }
    }
    best
}
