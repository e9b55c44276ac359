use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use super::{ParseError, Project};

/// A build exported by the host build tool: the invoked project first, then its subprojects, plus
/// any included builds. Read from TOML, or JSON when the file has a `.json` extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildModel {
    pub projects: Vec<ProjectModel>,
    #[serde(default)]
    pub included_builds: Vec<IncludedBuildModel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludedBuildModel {
    pub name: String,
    #[serde(default)]
    pub projects: Vec<ProjectModel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectModel {
    #[serde(flatten)]
    pub project: Project,
    /// Whether the project has a build file of its own.
    #[serde(default)]
    pub build_file: bool,
    #[serde(default)]
    pub repositories: Vec<String>,
    #[serde(default)]
    pub scopes: Vec<ScopeModel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScopeModel {
    Resolvable {
        name: String,
        /// Direct dependencies of the scope.
        #[serde(default)]
        dependencies: Vec<DependencyModel>,
        /// Dependencies of each resolved module, keyed by coordinate.
        #[serde(default)]
        modules: BTreeMap<String, Vec<DependencyModel>>,
        /// Set when the build tool failed to resolve the scope at all.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        failure: Option<String>,
    },
    Declared {
        name: String,
        #[serde(default)]
        dependencies: Vec<DeclaredModel>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencyModel {
    /// `"group:name:version"` shorthand for a resolved module.
    Coordinate(String),
    Module { module: String },
    Unresolved { requested: String },
    /// Resolved to something that was never fetched from a repository.
    Unversioned { component: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl BuildModel {
    pub fn from_file(path: &Path) -> Result<BuildModel, ParseError> {
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => BuildModel::from_json_str(&contents),
            _ => BuildModel::from_toml_str(&contents),
        }
    }

    pub fn from_toml_str(data: &str) -> Result<BuildModel, ParseError> {
        let model: BuildModel = toml::from_str(data)?;
        model.validate()
    }

    pub fn from_json_str(data: &str) -> Result<BuildModel, ParseError> {
        let model: BuildModel = serde_json::from_str(data)?;
        model.validate()
    }

    fn validate(self) -> Result<BuildModel, ParseError> {
        if self.projects.is_empty() {
            return Err(ParseError::MissingKey("projects".to_string()));
        }
        Ok(self)
    }

    /// Every project model, included builds last.
    pub fn all_projects(&self) -> impl Iterator<Item = &ProjectModel> {
        self.projects.iter().chain(
            self.included_builds
                .iter()
                .flat_map(|build| build.projects.iter()),
        )
    }

    pub fn all_projects_mut(&mut self) -> impl Iterator<Item = &mut ProjectModel> {
        self.projects.iter_mut().chain(
            self.included_builds
                .iter_mut()
                .flat_map(|build| build.projects.iter_mut()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn load_valid_toml() {
        let str = r#"
            [[projects]]
            name = "basic"
            group = "org.example"
            version = "1.0"
            build_file = true
            repositories = ["https://repo1.maven.org/maven2/"]

            [[projects.scopes]]
            kind = "declared"
            name = "implementation"
            dependencies = [
                { group = "joda-time", name = "joda-time", version = "2.2" },
                { name = "gradleApi" },
            ]

            [[projects.scopes]]
            kind = "resolvable"
            name = "testRuntimeClasspath"
            dependencies = [
                "junit:junit:4.12",
                { requested = "missing:dependency:404" },
                { component = "Gradle API" },
            ]

            [projects.scopes.modules]
            "junit:junit:4.12" = [{ module = "org.hamcrest:hamcrest-core:1.1" }]
        "#;
        let expected = BuildModel {
            projects: vec![ProjectModel {
                project: Project::new("basic", "org.example", "1.0"),
                build_file: true,
                repositories: vec!["https://repo1.maven.org/maven2/".to_string()],
                scopes: vec![
                    ScopeModel::Declared {
                        name: "implementation".to_string(),
                        dependencies: vec![
                            DeclaredModel {
                                group: Some("joda-time".to_string()),
                                name: "joda-time".to_string(),
                                version: Some("2.2".to_string()),
                            },
                            DeclaredModel {
                                group: None,
                                name: "gradleApi".to_string(),
                                version: None,
                            },
                        ],
                    },
                    ScopeModel::Resolvable {
                        name: "testRuntimeClasspath".to_string(),
                        dependencies: vec![
                            DependencyModel::Coordinate("junit:junit:4.12".to_string()),
                            DependencyModel::Unresolved {
                                requested: "missing:dependency:404".to_string(),
                            },
                            DependencyModel::Unversioned {
                                component: "Gradle API".to_string(),
                            },
                        ],
                        modules: BTreeMap::from([(
                            "junit:junit:4.12".to_string(),
                            vec![DependencyModel::Module {
                                module: "org.hamcrest:hamcrest-core:1.1".to_string(),
                            }],
                        )]),
                        failure: None,
                    },
                ],
            }],
            included_builds: vec![],
        };
        assert_eq!(BuildModel::from_toml_str(str).unwrap(), expected);
    }

    #[test]
    fn load_valid_json() {
        let str = r#"{
            "projects": [{ "name": "empty" }],
            "included_builds": [{ "name": "plugins", "projects": [{ "name": "tooling" }] }]
        }"#;
        let model = BuildModel::from_json_str(str).unwrap();
        let names: Vec<&str> = model
            .all_projects()
            .map(|p| p.project.name.as_str())
            .collect();
        assert_eq!(names, vec!["empty", "tooling"]);
        assert!(!model.projects[0].build_file);
        assert!(model.projects[0].scopes.is_empty());
    }

    #[test]
    fn load_no_projects() {
        BuildModel::from_toml_str("projects = []").expect_err("a build has at least one project");
    }
}
