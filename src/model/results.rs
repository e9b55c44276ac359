use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use super::{
    node::{DependencyNode, NodeIndex},
    ParseError,
};

/// The dependency graph of one project: the root coordinate and every node reachable from it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectResult {
    pub root: String,
    pub nodes: NodeIndex,
}

/// Output view of a node with scopes and children sorted, so the JSON does not depend on hash order.
#[derive(Serialize)]
struct SortedNode<'a> {
    unresolved: bool,
    configurations: Vec<&'a str>,
    children: Vec<&'a str>,
}

#[derive(Serialize)]
struct SortedResult<'a> {
    root: &'a str,
    nodes: BTreeMap<&'a str, SortedNode<'a>>,
}

impl<'a> From<&'a DependencyNode> for SortedNode<'a> {
    fn from(node: &'a DependencyNode) -> Self {
        let mut configurations: Vec<&str> = node.scopes.iter().map(String::as_str).collect();
        configurations.sort_unstable();
        let mut children: Vec<&str> = node.children.iter().map(String::as_str).collect();
        children.sort_unstable();
        SortedNode {
            unresolved: node.unresolved,
            configurations,
            children,
        }
    }
}

impl ProjectResult {
    pub fn new(root: impl Into<String>, nodes: NodeIndex) -> Self {
        Self {
            root: root.into(),
            nodes,
        }
    }

    pub fn root_node(&self) -> Option<&DependencyNode> {
        self.nodes.get(&self.root)
    }

    /// Pretty printed JSON with two-space indentation. Equal graphs always produce equal bytes.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let sorted = SortedResult {
            root: &self.root,
            nodes: self
                .nodes
                .iter()
                .map(|(id, node)| (id.as_str(), SortedNode::from(node)))
                .collect(),
        };
        serde_json::to_string_pretty(&sorted)
    }

    pub fn from_json(s: &str) -> Result<ProjectResult, ParseError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_file(path: &Path) -> Result<ProjectResult, ParseError> {
        ProjectResult::from_json(&std::fs::read_to_string(path)?)
    }
}
