use log::{debug, info};
use regex_lite::Regex;

use crate::model::build::BuildModel;

const AUDIT_PATH: &str = "api/curation/audit/";

/// Points Artifactory repositories at their curation audit endpoint, so that resolution reports
/// which packages curation would block.
pub struct CurationAudit {
    artifactory: Regex,
}

impl CurationAudit {
    pub fn new() -> Result<Self, regex_lite::Error> {
        Ok(Self {
            artifactory: Regex::new(r"^(?P<base>.*?/artifactory/)(?P<path>.*)$")?,
        })
    }

    /// Returns the rewritten URL, or `None` if it is not an Artifactory URL or already points to
    /// the audit endpoint.
    pub fn rewrite_url(&self, url: &str) -> Option<String> {
        let captures = self.artifactory.captures(url)?;
        let base = captures.name("base")?.as_str();
        let path = captures.name("path").map_or("", |m| m.as_str());
        if path.starts_with(AUDIT_PATH) {
            return None;
        }
        Some(format!("{base}{AUDIT_PATH}{path}"))
    }

    /// Rewrites the repositories of every project of the build in place.
    pub fn apply(&self, model: &mut BuildModel) {
        for project in model.all_projects_mut() {
            for repository in &mut project.repositories {
                match self.rewrite_url(repository) {
                    Some(rewritten) => {
                        info!(
                            "Using curation audit repository {} for {}",
                            rewritten, project.project
                        );
                        *repository = rewritten;
                    }
                    None => debug!("Keeping repository {} for {}", repository, project.project),
                }
            }
        }
    }
}
