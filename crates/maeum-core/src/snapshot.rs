//! ARCH_SNAPSHOT rendering: always exactly four lines.

use maeum_types::Role;

use crate::graph::SemanticGraph;
use crate::matcher::PatternScore;

pub const SNAPSHOT_MARKER: &str = "[ARCH_SNAPSHOT]";

/// Entity names shown on the Core line before eliding the rest.
const MAX_CORE_NAMES: usize = 20;

/// Render consecutive flow pairs as chains.
///
/// `[(entry, core), (core, infra)]` → `entry -> core -> infra`; a pair that
/// does not continue the current chain starts a new one, joined by `, `.
pub fn flow_chain(flow: &[(Role, Role)]) -> String {
    let mut chains: Vec<Vec<Role>> = Vec::new();
    for &(a, b) in flow {
        match chains.last_mut() {
            Some(chain) if chain.last() == Some(&a) => chain.push(b),
            _ => chains.push(vec![a, b]),
        }
    }
    if chains.is_empty() {
        return "none".into();
    }
    chains
        .iter()
        .map(|c| c.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(" -> "))
        .collect::<Vec<_>>()
        .join(", ")
}

fn core_line(graph: &SemanticGraph) -> String {
    let names = graph.entity_order();
    if names.is_empty() {
        return "none".into();
    }
    let shown = names
        .iter()
        .take(MAX_CORE_NAMES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    match names.len().saturating_sub(MAX_CORE_NAMES) {
        0 => shown,
        more => format!("{shown} (+{more} more)"),
    }
}

/// The four snapshot lines for a graph and its best pattern, if any.
pub fn render_snapshot(graph: &SemanticGraph, best: Option<&PatternScore<'_>>) -> String {
    let (flow, pattern) = match best {
        Some(score) => (flow_chain(&score.pattern.flow), score.pattern.name.as_str()),
        None => ("none".to_string(), "none"),
    };
    format!(
        "{SNAPSHOT_MARKER}\nCore: {}\nFlow: {flow}\nPattern: {pattern}",
        core_line(graph)
    )
}
