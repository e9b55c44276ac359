use std::{
    error::Error,
    path::{Path, PathBuf},
};

use crate::{
    cli::command_handlers::{do_clean, do_generate, do_generate_from},
    generate::output_directory,
    resolver::{ProjectSelection, ProjectSetProvider, ResolutionSource},
};

mod builder;

pub use builder::DepTreeBuilder;

pub struct DepTree {
    build_dir: PathBuf,
    output_file: Option<PathBuf>,
    selection: ProjectSelection,
    curation_audit_mode: bool,
    jobs: Option<usize>,
}

impl DepTree {
    pub fn builder() -> DepTreeBuilder {
        DepTreeBuilder::default()
    }

    /// Generates the dependency graphs of the projects in a build model file.
    /// Returns the paths of the generated files.
    pub fn generate(&self, model_path: impl AsRef<Path>) -> Result<Vec<PathBuf>, Box<dyn Error>> {
        do_generate(
            model_path.as_ref(),
            &self.build_dir,
            self.require_output_file()?,
            &self.selection,
            self.curation_audit_mode,
            self.jobs,
        )
    }

    /// Generates the dependency graphs using a custom project set and resolution source.
    pub fn generate_from<P, S>(
        &self,
        provider: &P,
        source: &S,
    ) -> Result<Vec<PathBuf>, Box<dyn Error>>
    where
        P: ProjectSetProvider + ?Sized,
        S: ResolutionSource + Sync + ?Sized,
    {
        do_generate_from(
            provider,
            source,
            &self.build_dir,
            self.require_output_file()?,
            &self.selection,
            self.jobs,
        )
    }

    /// Deletes generated graphs and the summary file
    pub fn clean(&self) -> Result<(), Box<dyn Error>> {
        do_clean(&self.build_dir, self.output_file.as_deref())
    }

    pub fn output_directory(&self) -> PathBuf {
        output_directory(&self.build_dir)
    }

    fn require_output_file(&self) -> Result<&Path, Box<dyn Error>> {
        self.output_file
            .as_deref()
            .ok_or_else(|| "The output file is mandatory for generating dependency graphs".into())
    }
}
