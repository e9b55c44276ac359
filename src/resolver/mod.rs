mod model;

use std::fmt::Display;

use crate::model::Project;

/// Hands out the scopes of a project together with the build tool's resolution results.
///
/// Implementations must not resolve lazily behind the engine's back: an error returned from
/// [`ResolutionSource::scopes`] fails the whole project.
pub trait ResolutionSource {
    fn scopes(&self, project: &Project) -> anyhow::Result<Vec<Scope>>;
}

/// Which projects take part in one invocation and in which order their outputs are reported.
pub trait ProjectSetProvider {
    fn projects(&self, selection: &ProjectSelection) -> anyhow::Result<Vec<Project>>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectSelection {
    /// Include subprojects that have their own build file.
    pub include_all_build_files: bool,
    /// Include the projects of included builds.
    pub include_included_builds: bool,
}

/// A named dependency category of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub name: String,
    pub kind: ScopeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    /// The build tool resolved this scope, transitive dependencies included.
    Resolvable(ResolutionResult),
    /// Only the direct declarations are known.
    DeclaredOnly(Vec<DeclaredDependency>),
}

impl Scope {
    pub fn resolvable(name: impl Into<String>, result: ResolutionResult) -> Self {
        Self {
            name: name.into(),
            kind: ScopeKind::Resolvable(result),
        }
    }

    pub fn declared_only(name: impl Into<String>, dependencies: Vec<DeclaredDependency>) -> Self {
        Self {
            name: name.into(),
            kind: ScopeKind::DeclaredOnly(dependencies),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDependency {
    pub group: Option<String>,
    pub name: String,
    pub version: Option<String>,
}

impl DeclaredDependency {
    pub fn new(group: Option<&str>, name: &str, version: Option<&str>) -> Self {
        Self {
            group: group.map(str::to_owned),
            name: name.to_owned(),
            version: version.map(str::to_owned),
        }
    }

    /// `group:name:version`, or `None` when no version was declared (e.g. `gradleApi()`).
    pub fn module_id(&self) -> Option<String> {
        self.version.as_ref().map(|version| {
            format!(
                "{}:{}:{}",
                self.group.as_deref().unwrap_or_default(),
                self.name,
                version
            )
        })
    }
}

/// Index of a component inside its [`ResolutionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(usize);

impl Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyResult {
    Resolved { selected: ComponentId },
    Unresolved { requested: String },
}

impl DependencyResult {
    pub fn resolved(selected: ComponentId) -> Self {
        DependencyResult::Resolved { selected }
    }

    pub fn unresolved(requested: impl Into<String>) -> Self {
        DependencyResult::Unresolved {
            requested: requested.into(),
        }
    }
}

/// A module selected by the build tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedComponent {
    /// `None` for components that were never fetched from a repository, such as platform APIs.
    pub module_id: Option<String>,
    pub dependencies: Vec<DependencyResult>,
}

/// The resolution graph of one scope. Components live in an arena and refer to each other by
/// [`ComponentId`], so cycles between projects are representable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    root: ComponentId,
    components: Vec<ResolvedComponent>,
}

impl Default for ResolutionResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionResult {
    /// A result holding only the (empty) root component.
    pub fn new() -> Self {
        Self {
            root: ComponentId(0),
            components: vec![ResolvedComponent::default()],
        }
    }

    pub fn root(&self) -> ComponentId {
        self.root
    }

    pub fn add_component(&mut self, module_id: Option<String>) -> ComponentId {
        self.components.push(ResolvedComponent {
            module_id,
            dependencies: Vec::new(),
        });
        ComponentId(self.components.len() - 1)
    }

    /// Records a dependency of `from`. Ids must come from this result.
    pub fn add_dependency(&mut self, from: ComponentId, dependency: DependencyResult) {
        if let Some(component) = self.components.get_mut(from.0) {
            component.dependencies.push(dependency);
        }
    }

    pub fn component(&self, id: ComponentId) -> Option<&ResolvedComponent> {
        self.components.get(id.0)
    }

    pub fn dependencies(&self, id: ComponentId) -> &[DependencyResult] {
        self.component(id)
            .map(|component| component.dependencies.as_slice())
            .unwrap_or_default()
    }
}
