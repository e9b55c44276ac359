use std::collections::{BTreeMap, HashMap};

use anyhow::{anyhow, bail};
use log::{debug, trace};

use crate::model::{
    build::{BuildModel, DeclaredModel, DependencyModel, ProjectModel, ScopeModel},
    Project,
};

use super::{
    ComponentId, DeclaredDependency, DependencyResult, ProjectSelection, ProjectSetProvider,
    ResolutionResult, ResolutionSource, Scope,
};

impl ProjectSetProvider for BuildModel {
    fn projects(&self, selection: &ProjectSelection) -> anyhow::Result<Vec<Project>> {
        let (invoked, subprojects) = self
            .projects
            .split_first()
            .ok_or_else(|| anyhow!("The build model contains no projects"))?;

        let mut projects = vec![invoked.project.clone()];
        for subproject in subprojects {
            // Subprojects with their own build file get their own invocation unless asked otherwise
            if selection.include_all_build_files || !subproject.build_file {
                projects.push(subproject.project.clone());
            } else {
                debug!("Skipping {}: it has its own build file", subproject.project);
            }
        }

        if selection.include_included_builds {
            for build in &self.included_builds {
                debug!("Adding projects of included build {}", build.name);
                projects.extend(build.projects.iter().map(|p| p.project.clone()));
            }
        }
        Ok(projects)
    }
}

impl ResolutionSource for BuildModel {
    fn scopes(&self, project: &Project) -> anyhow::Result<Vec<Scope>> {
        let model = self
            .all_projects()
            .find(|model| &model.project == project)
            .ok_or_else(|| anyhow!("Project {} is not part of the build", project))?;
        project_scopes(model)
    }
}

fn project_scopes(model: &ProjectModel) -> anyhow::Result<Vec<Scope>> {
    model
        .scopes
        .iter()
        .map(|scope| match scope {
            ScopeModel::Resolvable {
                name,
                failure: Some(failure),
                ..
            } => bail!(
                "Could not resolve {} of project {}: {}",
                name,
                model.project,
                failure
            ),
            ScopeModel::Resolvable {
                name,
                dependencies,
                modules,
                failure: None,
            } => Ok(Scope::resolvable(
                name.clone(),
                resolution_result(dependencies, modules),
            )),
            ScopeModel::Declared { name, dependencies } => Ok(Scope::declared_only(
                name.clone(),
                dependencies.iter().map(declared_dependency).collect(),
            )),
        })
        .collect()
}

fn declared_dependency(model: &DeclaredModel) -> DeclaredDependency {
    DeclaredDependency {
        group: model.group.clone(),
        name: model.name.clone(),
        version: model.version.clone(),
    }
}

/// Builds the resolution graph of a scope. Every coordinate maps to exactly one component, so a
/// module listing one of its ancestors produces a real cycle.
fn resolution_result(
    dependencies: &[DependencyModel],
    modules: &BTreeMap<String, Vec<DependencyModel>>,
) -> ResolutionResult {
    struct Arena {
        result: ResolutionResult,
        ids: HashMap<String, ComponentId>,
    }

    impl Arena {
        fn component(&mut self, module: &str) -> ComponentId {
            if let Some(id) = self.ids.get(module) {
                return *id;
            }
            let id = self.result.add_component(Some(module.to_owned()));
            self.ids.insert(module.to_owned(), id);
            id
        }

        fn dependency(&mut self, model: &DependencyModel) -> DependencyResult {
            match model {
                DependencyModel::Coordinate(module) | DependencyModel::Module { module } => {
                    DependencyResult::resolved(self.component(module))
                }
                DependencyModel::Unresolved { requested } => {
                    DependencyResult::unresolved(requested.clone())
                }
                DependencyModel::Unversioned { component } => {
                    trace!("{} has no module version", component);
                    DependencyResult::resolved(self.result.add_component(None))
                }
            }
        }

        fn add(&mut self, from: ComponentId, models: &[DependencyModel]) {
            for model in models {
                let dependency = self.dependency(model);
                self.result.add_dependency(from, dependency);
            }
        }
    }

    let mut arena = Arena {
        result: ResolutionResult::new(),
        ids: HashMap::new(),
    };
    let root = arena.result.root();
    arena.add(root, dependencies);
    for (module, children) in modules {
        let from = arena.component(module);
        arena.add(from, children);
    }
    arena.result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ScopeKind;

    use pretty_assertions::assert_eq;

    const MULTI: &str = r#"
        [[projects]]
        name = "root"
        build_file = true

        [[projects]]
        name = "shared"

        [[projects]]
        name = "api"
        build_file = true

        [[included_builds]]
        name = "plugins"

        [[included_builds.projects]]
        name = "tooling"
        build_file = true
    "#;

    fn names(projects: Vec<Project>) -> Vec<String> {
        projects.into_iter().map(|p| p.name).collect()
    }

    #[test]
    fn default_selection_skips_subprojects_with_build_files() {
        let model = BuildModel::from_toml_str(MULTI).unwrap();
        let projects = model.projects(&ProjectSelection::default()).unwrap();
        assert_eq!(names(projects), vec!["root", "shared"]);
    }

    #[test]
    fn include_all_build_files() {
        let model = BuildModel::from_toml_str(MULTI).unwrap();
        let selection = ProjectSelection {
            include_all_build_files: true,
            ..Default::default()
        };
        assert_eq!(
            names(model.projects(&selection).unwrap()),
            vec!["root", "shared", "api"]
        );
    }

    #[test]
    fn include_included_builds() {
        let model = BuildModel::from_toml_str(MULTI).unwrap();
        let selection = ProjectSelection {
            include_included_builds: true,
            ..Default::default()
        };
        assert_eq!(
            names(model.projects(&selection).unwrap()),
            vec!["root", "shared", "tooling"]
        );
    }

    #[test]
    fn scopes_share_components_by_coordinate() {
        let model = BuildModel::from_toml_str(
            r#"
            [[projects]]
            name = "a"

            [[projects.scopes]]
            kind = "resolvable"
            name = "runtimeClasspath"
            dependencies = ["g:b:1", { requested = "g:missing:1" }]

            [projects.scopes.modules]
            "g:b:1" = ["g:c:1"]
            "g:c:1" = ["g:b:1"]
            "#,
        )
        .unwrap();
        let scopes = model.scopes(&Project::new("a", "", "")).unwrap();
        assert_eq!(scopes.len(), 1);
        let ScopeKind::Resolvable(result) = &scopes[0].kind else {
            panic!("expected a resolvable scope");
        };

        let direct = result.dependencies(result.root());
        assert_eq!(direct[1], DependencyResult::unresolved("g:missing:1"));
        let DependencyResult::Resolved { selected: b } = direct[0] else {
            panic!("expected a resolved dependency");
        };
        let DependencyResult::Resolved { selected: c } = result.dependencies(b)[0] else {
            panic!("expected a resolved dependency");
        };
        assert_eq!(result.dependencies(c), &[DependencyResult::resolved(b)]);
    }

    #[test]
    fn failed_scope_fails_the_project() {
        let model = BuildModel::from_toml_str(
            r#"
            [[projects]]
            name = "a"

            [[projects.scopes]]
            kind = "resolvable"
            name = "compileClasspath"
            failure = "Could not GET 'https://repo.example.com/'"
            "#,
        )
        .unwrap();
        let error = model.scopes(&Project::new("a", "", "")).unwrap_err();
        assert!(error.to_string().contains("compileClasspath"));
    }

    #[test]
    fn unknown_project() {
        let model = BuildModel::from_toml_str(MULTI).unwrap();
        model
            .scopes(&Project::new("nope", "", ""))
            .expect_err("project is not in the build");
    }
}
