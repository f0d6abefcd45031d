//! Semantic graph: files grouped into entities, with role-tagged edges.
//!
//! # Module Structure
//!
//! - [`builder`] -- [`SemanticGraphBuilder`]: listing → nodes and entities
//! - [`edges`] -- [`EdgeInference`] seam and the default import-based rule
//! - [`imports`] -- per-language import/require extraction
//! - [`listing`] -- parse a pasted directory listing into file entries

pub mod builder;
pub mod edges;
pub mod imports;
pub mod listing;

pub use builder::{SemanticGraphBuilder, entity_name, normalize_path};
pub use edges::{DeclaredDependencies, EdgeInference};

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use maeum_types::Role;

/// One file of the tree, with the names it declares dependencies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    #[serde(default)]
    pub references: Vec<String>,
}

impl FileEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            references: Vec::new(),
        }
    }

    pub fn with_references<I, S>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.references = references.into_iter().map(Into::into).collect();
        self
    }
}

/// A file, its inferred role and the entity it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub path: String,
    pub role: Role,
    pub entity: String,
}

/// A business concept: same-named files across roles.
///
/// At most one file per role; on collision the smallest path is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    pub roles: BTreeMap<Role, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
    Import,
}

/// `from` (in role `from_role`) depends on `to` (in role `to_role`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub from: String,
    pub from_role: Role,
    pub to: String,
    pub to_role: Role,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn import(from: &Node, to: &Node) -> Self {
        Self {
            from: from.entity.clone(),
            from_role: from.role,
            to: to.entity.clone(),
            to_role: to.role,
            kind: EdgeKind::Import,
        }
    }
}

/// Result of one build. Not persisted across turns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SemanticGraph {
    nodes: BTreeMap<String, Node>,
    entities: BTreeMap<String, Entity>,
    /// Entity names in order of first appearance in the listing.
    order: Vec<String>,
    edges: BTreeSet<Edge>,
}

impl SemanticGraph {
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node(&self, path: &str) -> Option<&Node> {
        self.nodes.get(path)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    /// Entity names in first-appearance order.
    pub fn entity_order(&self) -> &[String] {
        &self.order
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Edges leaving `entity`.
    pub fn edges_from<'a>(&'a self, entity: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.from == entity)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add an edge; returns whether it was new.
    pub fn insert_edge(&mut self, edge: Edge) -> bool {
        self.edges.insert(edge)
    }
}
