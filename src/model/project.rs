use std::fmt::Display;

use serde::{Deserialize, Serialize};

const UNSPECIFIED: &str = "unspecified";

/// A build module whose dependency graph is generated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub version: String,
}

impl Project {
    pub fn new(
        name: impl Into<String>,
        group: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            version: version.into(),
        }
    }

    /// The coordinate of the project's root node; empty parts are reported as `unspecified`.
    pub fn module_id(&self) -> String {
        [&self.group, &self.name, &self.version]
            .map(|part| if part.is_empty() { UNSPECIFIED } else { part.as_str() })
            .join(":")
    }
}

impl Display for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn module_id() {
        let project = Project::new("api", "org.jfrog.test.gradle.publish", "1.0-SNAPSHOT");
        assert_eq!(
            project.module_id(),
            "org.jfrog.test.gradle.publish:api:1.0-SNAPSHOT"
        );
    }

    #[test]
    fn module_id_unspecified_parts() {
        assert_eq!(
            Project::new("shared", "", "").module_id(),
            "unspecified:shared:unspecified"
        );
        assert_eq!(
            Project::new("", "", "").module_id(),
            "unspecified:unspecified:unspecified"
        );
    }
}
