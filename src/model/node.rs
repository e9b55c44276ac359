use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// All nodes of one project graph, keyed by module coordinate (`group:name:version`).
pub type NodeIndex = HashMap<String, DependencyNode>;

/// A single module in a project's dependency graph.
///
/// Children are coordinates that point back into the [`NodeIndex`], never owned nodes, so cyclic
/// graphs need no special teardown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyNode {
    /// Scopes such as `implementation` or `testRuntimeClasspath` that reach this module.
    #[serde(rename = "configurations")]
    pub scopes: HashSet<String>,
    pub unresolved: bool,
    pub children: HashSet<String>,
}

impl DependencyNode {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scopes: HashSet::from([scope.into()]),
            ..Default::default()
        }
    }

    pub fn unresolved(scope: impl Into<String>) -> Self {
        Self {
            unresolved: true,
            ..Self::new(scope)
        }
    }

    pub fn add_scope(&mut self, scope: impl Into<String>) {
        self.scopes.insert(scope.into());
    }

    /// A module counts as resolved as soon as any path resolved it.
    pub fn merge_unresolved(&mut self, unresolved: bool) {
        self.unresolved = self.unresolved && unresolved;
    }

    pub fn add_child(&mut self, id: impl Into<String>) {
        self.children.insert(id.into());
    }

    pub fn merge(&mut self, other: DependencyNode) {
        self.scopes.extend(other.scopes);
        self.merge_unresolved(other.unresolved);
        self.children.extend(other.children);
    }
}

/// Inserts `node` under `id`, or merges it into the node already indexed there.
pub fn merge_into(nodes: &mut NodeIndex, id: &str, node: DependencyNode) {
    match nodes.get_mut(id) {
        Some(existing) => existing.merge(node),
        None => {
            nodes.insert(id.to_owned(), node);
        }
    }
}
