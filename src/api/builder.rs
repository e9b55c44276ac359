use std::{env, error::Error, path::PathBuf};

use crate::{config::DepTreeConfig, resolver::ProjectSelection, DepTree};

#[derive(Default)]
pub struct DepTreeBuilder {
    // Relative paths are resolved against `root`
    root: Option<PathBuf>,
    build_directory: Option<PathBuf>,
    output_file: Option<PathBuf>,

    include_all_build_files: Option<bool>,
    include_included_builds: Option<bool>,
    curation_audit_mode: Option<bool>,
    jobs: Option<usize>,
}

impl DepTreeBuilder {
    /// Project root directory.
    ///
    /// Defaults to the current directory.
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Build directory of the invoked project.
    ///
    /// Defaults to `build`.
    pub fn build_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.build_directory = Some(path.into());
        self
    }

    /// File listing the generated graphs. Required for generating.
    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// Include subprojects with their own build file.
    ///
    /// Defaults to `DEPTREE_INCLUDE_ALL_BUILD_FILES`, or `false`.
    pub fn include_all_build_files(mut self, include: bool) -> Self {
        self.include_all_build_files = Some(include);
        self
    }

    /// Include projects of included builds.
    ///
    /// Defaults to `DEPTREE_INCLUDE_INCLUDED_BUILDS`, or `false`.
    pub fn include_included_builds(mut self, include: bool) -> Self {
        self.include_included_builds = Some(include);
        self
    }

    /// Defaults to `DEPTREE_CURATION_AUDIT_MODE`, or `false`.
    pub fn curation_audit_mode(mut self, enabled: bool) -> Self {
        self.curation_audit_mode = Some(enabled);
        self
    }

    /// Number of projects processed in parallel.
    ///
    /// Defaults to `DEPTREE_JOBS`, or one at a time.
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    pub fn try_build(self) -> Result<DepTree, Box<dyn Error>> {
        let config = DepTreeConfig::load()?;
        self.build_with(config)
    }

    fn build_with(self, config: DepTreeConfig) -> Result<DepTree, Box<dyn Error>> {
        let Self {
            root,
            build_directory,
            output_file,
            include_all_build_files,
            include_included_builds,
            curation_audit_mode,
            jobs,
        } = self;
        let root = match root {
            Some(root) => root,
            None => env::current_dir()?,
        };

        let build_dir = root.join(build_directory.unwrap_or_else(|| PathBuf::from("build")));
        let output_file = output_file.map(|file| root.join(file));

        let selection = ProjectSelection {
            include_all_build_files: include_all_build_files
                .unwrap_or(config.include_all_build_files),
            include_included_builds: include_included_builds
                .unwrap_or(config.include_included_builds),
        };

        Ok(DepTree {
            build_dir,
            output_file,
            selection,
            curation_audit_mode: curation_audit_mode.unwrap_or(config.curation_audit_mode),
            jobs: jobs.or(config.jobs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn flags_override_config() {
        let config = DepTreeConfig {
            include_all_build_files: true,
            include_included_builds: true,
            curation_audit_mode: true,
            jobs: Some(8),
        };
        let dep_tree = DepTree::builder()
            .root("/work")
            .include_all_build_files(false)
            .jobs(2)
            .build_with(config)
            .unwrap();

        assert_eq!(dep_tree.output_directory(), PathBuf::from("/work/build/dep-tree"));
        assert!(!dep_tree.selection.include_all_build_files);
        assert!(dep_tree.selection.include_included_builds);
        assert!(dep_tree.curation_audit_mode);
        assert_eq!(dep_tree.jobs, Some(2));
    }

    #[test]
    fn generate_requires_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let dep_tree = DepTree::builder()
            .root(dir.path())
            .build_with(DepTreeConfig::default())
            .unwrap();
        let error = dep_tree.generate("build-model.toml").unwrap_err();
        assert!(error.to_string().contains("output file"));
    }
}
