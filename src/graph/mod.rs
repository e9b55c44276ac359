mod project;

use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use crate::{
    model::node::{merge_into, DependencyNode, NodeIndex},
    resolver::{DeclaredDependency, DependencyResult, ResolutionResult, Scope, ScopeKind},
};

pub use project::build_project_result;

/// How many times the subtree of one module is expanded while traversing a single scope.
/// Path-based cycle detection alone is exponential on diamond-shaped graphs.
pub const MAX_DEP_POPULATIONS_IN_SCOPE: usize = 10;

/// Adds a scope and everything reachable from it to the project graph rooted at `root`.
pub fn add_scope(root: &str, scope: &Scope, nodes: &mut NodeIndex) {
    match &scope.kind {
        ScopeKind::Resolvable(result) => add_resolved_scope(root, &scope.name, result, nodes),
        ScopeKind::DeclaredOnly(dependencies) => {
            add_declared_scope(root, &scope.name, dependencies, nodes)
        }
    }
}

fn add_resolved_scope(root: &str, scope: &str, result: &ResolutionResult, nodes: &mut NodeIndex) {
    trace!("Adding resolved scope {}", scope);
    let mut root_node = DependencyNode::default();
    root_node.add_scope(scope);
    merge_into(nodes, root, root_node);

    let mut traversal = Traversal {
        scope,
        result,
        nodes,
        populations: HashMap::new(),
    };
    for dependency in result.dependencies(result.root()) {
        traversal.populate(root, dependency, &HashSet::new());
    }
}

/// Declared-only scopes carry no transitive information: every dependency becomes an unresolved
/// leaf under the root.
fn add_declared_scope(
    root: &str,
    scope: &str,
    dependencies: &[DeclaredDependency],
    nodes: &mut NodeIndex,
) {
    trace!("Adding declared scope {}", scope);
    for dependency in dependencies {
        match dependency.module_id() {
            Some(id) => add_child(nodes, root, &id, DependencyNode::unresolved(scope)),
            None => debug!(
                "Skipping {} in {}: no version was declared",
                dependency.name, scope
            ),
        }
    }
}

struct Traversal<'a> {
    scope: &'a str,
    result: &'a ResolutionResult,
    nodes: &'a mut NodeIndex,
    /// Expansions per module id during this scope.
    populations: HashMap<String, usize>,
}

impl Traversal<'_> {
    /// `path` holds the ids between the scope root and `parent`; each branch gets its own copy.
    fn populate(&mut self, parent: &str, dependency: &DependencyResult, path: &HashSet<String>) {
        let result = self.result;
        let selected = match dependency {
            DependencyResult::Unresolved { requested } => {
                add_child(self.nodes, parent, requested, DependencyNode::unresolved(self.scope));
                return;
            }
            DependencyResult::Resolved { selected } => *selected,
        };

        let Some(id) = result
            .component(selected)
            .and_then(|component| component.module_id.as_deref())
        else {
            // Never fetched from a repository, e.g. an API provided by the build tool itself
            debug!("Skipping component {} in {}: no module version", selected, self.scope);
            return;
        };

        if path.contains(id) {
            trace!("Cycle detected at {} in {}", id, self.scope);
            if let Some(parent) = self.nodes.get_mut(parent) {
                parent.add_child(id);
            }
            return;
        }

        add_child(self.nodes, parent, id, DependencyNode::new(self.scope));

        let populations = self.populations.entry(id.to_owned()).or_default();
        if *populations >= MAX_DEP_POPULATIONS_IN_SCOPE {
            trace!("{} was already expanded {} times in {}", id, populations, self.scope);
            return;
        }
        *populations += 1;

        let mut path = path.clone();
        path.insert(id.to_owned());
        for child in result.dependencies(selected) {
            self.populate(id, child, &path);
        }
    }
}

/// Merges `child` into the index under `id` and links it from `parent`.
fn add_child(nodes: &mut NodeIndex, parent: &str, id: &str, child: DependencyNode) {
    merge_into(nodes, id, child);
    if let Some(parent) = nodes.get_mut(parent) {
        parent.add_child(id);
    }
}
