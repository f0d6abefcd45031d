//! Listing → nodes and entities.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

use tracing::debug;

use maeum_types::Role;

use super::edges::{DeclaredDependencies, EdgeInference};
use super::{Entity, FileEntry, Node, SemanticGraph};
use crate::detector::strip_tree_decoration;
use crate::path_judge::{classify_role, split_tokens};

/// Stem tokens that name a role or a generic file rather than a concept.
const ROLE_WORDS: &[&str] = &[
    "controller",
    "controllers",
    "service",
    "services",
    "repository",
    "repositories",
    "repo",
    "repos",
    "handler",
    "handlers",
    "route",
    "routes",
    "router",
    "api",
    "dao",
    "db",
    "storage",
    "usecase",
    "domain",
    "test",
    "tests",
    "spec",
    "specs",
    "model",
    "models",
    "entity",
    "dto",
    "mock",
    "stub",
    "impl",
    "index",
    "mod",
    "init",
];

/// Role words glued onto a concept (`userservice`, `orderrepo`).
const ROLE_SUFFIXES: &[&str] = &[
    "controller",
    "handler",
    "router",
    "route",
    "service",
    "usecase",
    "repository",
    "repo",
];

fn strip_role_suffix(token: String) -> String {
    ROLE_SUFFIXES
        .iter()
        .find_map(|suffix| token.strip_suffix(suffix).filter(|rest| rest.len() >= 2))
        .map(str::to_string)
        .unwrap_or(token)
}

/// Canonical form of a listing path.
///
/// Strips tree decoration, converts `\` to `/`, drops leading `./`,
/// collapses repeated separators and trailing `/`.
pub fn normalize_path(raw: &str) -> String {
    let (_, rest) = strip_tree_decoration(raw.trim());
    let unified = rest.trim().replace('\\', "/");
    let mut path = unified.as_str();
    while let Some(stripped) = path.strip_prefix("./") {
        path = stripped;
    }
    let leading = if path.starts_with('/') { "/" } else { "" };
    let joined = path
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect::<Vec<_>>()
        .join("/");
    format!("{leading}{joined}")
}

/// The entity a file belongs to: its stem minus role words.
///
/// Falls back to the parent directory name when nothing is left.
pub fn entity_name(path: &str) -> String {
    let mut segments = path.rsplit('/');
    let file = segments.next().unwrap_or_default();
    let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);

    let mut tokens: Vec<String> = split_tokens(stem)
        .into_iter()
        .filter(|t| !ROLE_WORDS.contains(&t.as_str()))
        .map(strip_role_suffix)
        .collect();
    if tokens.ends_with(&["use".to_string(), "case".to_string()]) {
        tokens.truncate(tokens.len() - 2);
    }
    if !tokens.is_empty() {
        return tokens.join("_");
    }

    match segments.next() {
        Some(dir) if !dir.is_empty() => split_tokens(dir).join("_"),
        _ => split_tokens(stem).join("_"),
    }
}

/// Builds a [`SemanticGraph`] from a file listing.
///
/// Building is deterministic: the same listing always yields the same
/// nodes, entities and edges.
#[derive(Clone)]
pub struct SemanticGraphBuilder {
    inference: Arc<dyn EdgeInference>,
}

impl Default for SemanticGraphBuilder {
    fn default() -> Self {
        Self::new(Arc::new(DeclaredDependencies))
    }
}

impl SemanticGraphBuilder {
    pub fn new(inference: Arc<dyn EdgeInference>) -> Self {
        Self { inference }
    }

    pub fn build(&self, files: &[FileEntry]) -> SemanticGraph {
        let mut graph = SemanticGraph::default();

        // Dedup by normalized path, merging declared references.
        let mut merged: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut listing_order: Vec<String> = Vec::new();
        for file in files {
            let path = normalize_path(&file.path);
            if path.is_empty() {
                continue;
            }
            match merged.entry(path.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(file.references.clone());
                    listing_order.push(path);
                }
                Entry::Occupied(mut slot) => {
                    for r in &file.references {
                        if !slot.get().contains(r) {
                            slot.get_mut().push(r.clone());
                        }
                    }
                }
            }
        }

        for path in &listing_order {
            let role = classify_role(path);
            let entity = entity_name(path);
            self.add_node(&mut graph, path, role, entity);
        }

        let normalized: Vec<FileEntry> = listing_order
            .iter()
            .map(|path| FileEntry {
                path: path.clone(),
                references: merged.remove(path).unwrap_or_default(),
            })
            .collect();
        for edge in self.inference.infer_edges(&normalized, &graph) {
            graph.insert_edge(edge);
        }

        debug!(
            files = graph.nodes.len(),
            entities = graph.entities.len(),
            edges = graph.edge_count(),
            "semantic graph built"
        );
        graph
    }

    fn add_node(&self, graph: &mut SemanticGraph, path: &str, role: Role, entity: String) {
        if !graph.entities.contains_key(&entity) {
            graph.order.push(entity.clone());
        }
        let slot = graph
            .entities
            .entry(entity.clone())
            .or_insert_with(|| Entity {
                name: entity.clone(),
                roles: BTreeMap::new(),
            });
        slot.roles
            .entry(role)
            .and_modify(|kept| {
                if path < kept.as_str() {
                    *kept = path.to_string();
                }
            })
            .or_insert_with(|| path.to_string());

        graph.nodes.insert(
            path.to_string(),
            Node {
                path: path.to_string(),
                role,
                entity,
            },
        );
    }
}
