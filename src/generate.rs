use std::{
    collections::HashMap,
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use log::{debug, info};
use rayon::prelude::*;
use thiserror::Error;

use crate::{
    flock::FileLock,
    graph::build_project_result,
    model::{build::BuildModel, Project},
    resolver::ResolutionSource,
};

/// Per-project graphs are written to this directory under the build directory.
pub const OUTPUT_DIRECTORY_NAME: &str = "dep-tree";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Failed to generate the dependency graph of project {project}: {source}")]
    Resolution {
        project: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("Failed to serialize the dependency graph of project {project}: {source}")]
    Serialize {
        project: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("File '{}' is not writable: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Projects {first} and {second} would both be written to '{file}'")]
    DuplicateOutput {
        first: String,
        second: String,
        file: String,
    },
    #[error("Failed to serialize the build model: {0}")]
    Model(#[source] serde_json::Error),
    #[error("Output directory cannot be locked: {0}")]
    Lock(#[from] crate::flock::Error),
    #[error("Failed to start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Build model with the repositories rewritten in curation audit mode, next to the output directory.
pub const CURATION_MODEL_FILE_NAME: &str = "dep-tree-curation-audit.json";

pub fn output_directory(build_dir: &Path) -> PathBuf {
    build_dir.join(OUTPUT_DIRECTORY_NAME)
}

pub fn curation_model_path(build_dir: &Path) -> PathBuf {
    build_dir.join(CURATION_MODEL_FILE_NAME)
}

/// Project names may contain any character, so the file name is their base64 encoding.
pub fn project_file_name(project: &Project) -> String {
    BASE64.encode(project.name.as_bytes())
}

/// Generates and writes the graph of every project, in order. Returns the absolute paths of the
/// written files.
///
/// Nothing is written unless the graphs of all projects could be generated.
pub fn generate<S>(
    projects: &[Project],
    source: &S,
    output_dir: &Path,
    jobs: Option<usize>,
) -> Result<Vec<PathBuf>, GenerateError>
where
    S: ResolutionSource + Sync + ?Sized,
{
    check_file_names(projects)?;
    let graphs = build_graphs(projects, source, jobs)?;

    std::fs::create_dir_all(output_dir).map_err(|source| GenerateError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let output_dir = output_dir
        .canonicalize()
        .map_err(|source| GenerateError::Write {
            path: output_dir.to_path_buf(),
            source,
        })?;
    let _lock = FileLock::new(&output_dir.with_extension("lock"))?;

    let mut files = Vec::with_capacity(projects.len());
    for (project, json) in projects.iter().zip(graphs) {
        let path = output_dir.join(project_file_name(project));
        std::fs::write(&path, json).map_err(|source| GenerateError::Write {
            path: path.clone(),
            source,
        })?;
        info!("Wrote dependency graph of {} to {}", project, path.display());
        files.push(path);
    }
    Ok(files)
}

/// File names derive from project names only, which included builds may reuse.
fn check_file_names(projects: &[Project]) -> Result<(), GenerateError> {
    let mut seen: HashMap<String, &Project> = HashMap::with_capacity(projects.len());
    for project in projects {
        let file = project_file_name(project);
        if let Some(first) = seen.get(&file) {
            return Err(GenerateError::DuplicateOutput {
                first: first.module_id(),
                second: project.module_id(),
                file,
            });
        }
        seen.insert(file, project);
    }
    Ok(())
}

fn build_graphs<S>(
    projects: &[Project],
    source: &S,
    jobs: Option<usize>,
) -> Result<Vec<String>, GenerateError>
where
    S: ResolutionSource + Sync + ?Sized,
{
    let build = |project: &Project| -> Result<String, GenerateError> {
        debug!("Generating dependency graph of {}", project);
        let result =
            build_project_result(project, source).map_err(|source| GenerateError::Resolution {
                project: project.name.clone(),
                source,
            })?;
        result.to_json().map_err(|source| GenerateError::Serialize {
            project: project.name.clone(),
            source,
        })
    };

    match jobs {
        Some(count) if count > 1 => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(count).build()?;
            pool.install(|| projects.par_iter().map(build).collect())
        }
        _ => projects.iter().map(build).collect(),
    }
}

/// Writes `model` as JSON, readable back with [`BuildModel::from_file`].
pub fn write_build_model(path: &Path, model: &BuildModel) -> Result<(), GenerateError> {
    let json = serde_json::to_string_pretty(model).map_err(GenerateError::Model)?;
    std::fs::write(path, json).map_err(|source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Lists the generated files, one absolute path per line, so callers need not derive file names.
pub fn write_summary(output_file: &Path, files: &[PathBuf]) -> Result<(), GenerateError> {
    let error = |source| GenerateError::Write {
        path: output_file.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(output_file).map_err(error)?);
    for file in files {
        writeln!(writer, "{}", file.display()).map_err(error)?;
    }
    writer.flush().map_err(error)
}
