use log::debug;

use crate::{
    model::{DependencyNode, NodeIndex, Project, ProjectResult},
    resolver::ResolutionSource,
};

use super::add_scope;

/// Generates the dependency graph of every scope of `project`.
pub fn build_project_result<S>(project: &Project, source: &S) -> anyhow::Result<ProjectResult>
where
    S: ResolutionSource + ?Sized,
{
    let root = project.module_id();
    let mut nodes = NodeIndex::from([(root.clone(), DependencyNode::default())]);

    for scope in source.scopes(project)? {
        add_scope(&root, &scope, &mut nodes);
    }
    debug!("Project {} has {} nodes", project, nodes.len());

    Ok(ProjectResult::new(root, nodes))
}
