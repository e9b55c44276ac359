use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Generates a deduplicated dependency graph per project of a build.
#[derive(Debug, Parser)]
#[clap(version)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub cmd: Command,
    /// Build directory of the invoked project. Graphs are written to its `dep-tree` subdirectory.
    #[clap(short, long, default_value = "build")]
    pub build_directory: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generates the dependency graph of every selected project
    Generate {
        /// Build model exported by the build tool (TOML, or JSON with a `.json` extension)
        #[clap(default_value = "build-model.toml")]
        model: PathBuf,
        /// File that receives the paths of the generated graphs, one per line
        #[clap(short, long, env = "DEPTREE_OUTPUT_FILE")]
        output_file: PathBuf,
        /// Also generate graphs of subprojects that have their own build file
        #[clap(long)]
        include_all_build_files: bool,
        /// Also generate graphs of the projects of included builds
        #[clap(long)]
        include_included_builds: bool,
        /// Rewrite Artifactory repositories to their curation audit endpoint
        #[clap(long)]
        curation_audit_mode: bool,
        /// Number of projects processed in parallel
        #[clap(short, long)]
        jobs: Option<usize>,
    },
    /// Deletes the generated graphs and the summary file
    Clean {
        /// Summary file written by `generate`
        #[clap(short, long, env = "DEPTREE_OUTPUT_FILE")]
        output_file: Option<PathBuf>,
    },
}
