//! Edge inference.
//!
//! Edge inference is the least certain part of graph building, so it sits
//! behind [`EdgeInference`] and the matcher never depends on how edges
//! were found.

use std::collections::BTreeMap;

use maeum_types::config::SOURCE_EXTENSIONS;

use super::{Edge, FileEntry, Node, SemanticGraph};

/// Turns a node/entity graph (without edges) into cross-file edges.
pub trait EdgeInference: Send + Sync {
    /// Return the edges implied by `files`. Duplicates are harmless.
    fn infer_edges(&self, files: &[FileEntry], graph: &SemanticGraph) -> Vec<Edge>;
}

/// An edge exists when a file's declared dependency names another file.
///
/// A reference resolves to every file whose stem it names
/// (`./user.service`, `app.user_service`, `crate::user::service`). If no
/// stem matches, a reference naming an entity links to all of that
/// entity's files. Self-references are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredDependencies;

impl EdgeInference for DeclaredDependencies {
    fn infer_edges(&self, files: &[FileEntry], graph: &SemanticGraph) -> Vec<Edge> {
        let mut stems: BTreeMap<String, Vec<&Node>> = BTreeMap::new();
        for node in graph.nodes() {
            stems
                .entry(file_stem(&node.path).to_lowercase())
                .or_default()
                .push(node);
        }

        let mut edges = Vec::new();
        for file in files {
            let Some(from) = graph.node(&file.path) else {
                continue;
            };
            for reference in &file.references {
                for to in resolve(reference, &stems, graph) {
                    if to.path != from.path {
                        edges.push(Edge::import(from, to));
                    }
                }
            }
        }
        edges
    }
}

fn resolve<'g>(
    reference: &str,
    stems: &BTreeMap<String, Vec<&'g Node>>,
    graph: &'g SemanticGraph,
) -> Vec<&'g Node> {
    for key in reference_keys(reference) {
        if let Some(nodes) = stems.get(&key) {
            return nodes.clone();
        }
        if let Some(entity) = graph.entity(&key) {
            return entity
                .roles
                .values()
                .filter_map(|path| graph.node(path))
                .collect();
        }
    }
    Vec::new()
}

/// Candidate lookup keys for a reference, most specific first.
fn reference_keys(reference: &str) -> Vec<String> {
    let cleaned = reference
        .trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '`' | ';'))
        .replace('\\', "/")
        .to_lowercase();
    let mut keys: Vec<String> = Vec::new();
    let mut push = |key: &str| {
        let key = strip_source_extension(key);
        if !key.is_empty() && !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    };

    if let Some(last) = cleaned.rsplit('/').next() {
        push(last);
    }
    if cleaned.contains("::") {
        for segment in cleaned.rsplit("::") {
            if !matches!(segment, "crate" | "super" | "self" | "") {
                push(segment);
            }
        }
    } else if let Some(last) = cleaned.rsplit('/').next()
        && let Some((_, tail)) = strip_source_extension(last).rsplit_once('.')
    {
        push(tail);
    }
    keys
}

fn strip_source_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if SOURCE_EXTENSIONS.contains(&ext) => stem,
        _ => name,
    }
}

fn file_stem(path: &str) -> &str {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.rsplit_once('.').map_or(file, |(stem, _)| stem)
}
