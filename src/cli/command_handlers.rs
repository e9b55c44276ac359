use log::{debug, info};

use crate::{
    curation::CurationAudit,
    generate::{self, curation_model_path, output_directory},
    model::build::BuildModel,
    resolver::{ProjectSelection, ProjectSetProvider, ResolutionSource},
};
use std::{
    error::Error,
    path::{Path, PathBuf},
};

/// Handler to generate command
/// 1 - Loads the build model
/// 2 - Rewrites repositories in curation audit mode
/// 3 - Generates and writes the graph of each selected project
/// 4 - Writes the summary file
/// 5 - Writes the rewritten build model in curation audit mode
pub fn do_generate(
    model_path: &Path,
    build_dir: &Path,
    output_file: &Path,
    selection: &ProjectSelection,
    curation_audit_mode: bool,
    jobs: Option<usize>,
) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    debug!("Loading build model {}", model_path.display());
    let mut model = BuildModel::from_file(model_path)?;
    if curation_audit_mode {
        CurationAudit::new()?.apply(&mut model);
    }
    let files = do_generate_from(&model, &model, build_dir, output_file, selection, jobs)?;

    if curation_audit_mode {
        let model_path = curation_model_path(build_dir);
        generate::write_build_model(&model_path, &model)?;
        info!(
            "Wrote the curation audit build model to {}",
            model_path.display()
        );
    }
    Ok(files)
}

/// Generates graphs with caller-provided collaborators instead of a build model file.
pub fn do_generate_from<P, S>(
    provider: &P,
    source: &S,
    build_dir: &Path,
    output_file: &Path,
    selection: &ProjectSelection,
    jobs: Option<usize>,
) -> Result<Vec<PathBuf>, Box<dyn Error>>
where
    P: ProjectSetProvider + ?Sized,
    S: ResolutionSource + Sync + ?Sized,
{
    let projects = provider.projects(selection)?;
    info!(
        "Generating dependency graphs of {} project(s)...",
        projects.len()
    );

    let files = generate::generate(&projects, source, &output_directory(build_dir), jobs)?;
    generate::write_summary(output_file, &files)?;
    info!("Wrote the list of dependency graphs to {}", output_file.display());

    Ok(files)
}

/// Deletes the output directory, the curation audit model and the summary file; missing files are
/// fine.
pub fn do_clean(build_dir: &Path, output_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let output_directory_path = output_directory(build_dir);
    info!(
        "Cleaning dependency graphs folder {}.",
        output_directory_path.display()
    );
    let curation_model = curation_model_path(build_dir);
    let mut outputs = vec![
        (
            std::fs::remove_dir_all(&output_directory_path),
            output_directory_path,
        ),
        (std::fs::remove_file(&curation_model), curation_model),
    ];
    if let Some(output_file) = output_file {
        outputs.push((std::fs::remove_file(output_file), output_file.to_path_buf()));
    }

    for (output, path) in outputs {
        match output {
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("{} is already removed, nothing to do", path.display());
                Ok(())
            }
            otherwise => otherwise,
        }?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProjectResult;

    use pretty_assertions::assert_eq;

    const MODEL: &str = r#"
        [[projects]]
        name = "root"
        repositories = ["https://acme.jfrog.io/artifactory/maven-remote"]

        [[projects.scopes]]
        kind = "resolvable"
        name = "testRuntimeClasspath"
        dependencies = ["junit:junit:4.12"]

        [[projects]]
        name = "api"
        build_file = true
    "#;

    #[test]
    fn generate_and_clean() {
        let dir = tempfile::tempdir().unwrap();
        let model_path = dir.path().join("build-model.toml");
        std::fs::write(&model_path, MODEL).unwrap();
        let build_dir = dir.path().join("build");
        let output_file = dir.path().join("outputs.txt");

        let files = do_generate(
            &model_path,
            &build_dir,
            &output_file,
            &ProjectSelection::default(),
            true,
            None,
        )
        .unwrap();

        assert_eq!(files.len(), 1);
        let results = ProjectResult::from_file(&files[0]).unwrap();
        assert_eq!(results.root, "unspecified:root:unspecified");
        assert_eq!(
            std::fs::read_to_string(&output_file).unwrap(),
            format!("{}\n", files[0].display())
        );

        let curated = BuildModel::from_file(&curation_model_path(&build_dir)).unwrap();
        assert_eq!(
            curated.projects[0].repositories,
            vec!["https://acme.jfrog.io/artifactory/api/curation/audit/maven-remote"]
        );

        do_clean(&build_dir, Some(&output_file)).unwrap();
        assert!(!output_directory(&build_dir).exists());
        assert!(!curation_model_path(&build_dir).exists());
        assert!(!output_file.exists());

        // Cleaning twice is not an error
        do_clean(&build_dir, Some(&output_file)).unwrap();
    }

    #[test]
    fn generate_without_curation_keeps_model() {
        let dir = tempfile::tempdir().unwrap();
        let model_path = dir.path().join("build-model.toml");
        std::fs::write(&model_path, MODEL).unwrap();
        let build_dir = dir.path().join("build");

        do_generate(
            &model_path,
            &build_dir,
            &dir.path().join("outputs.txt"),
            &ProjectSelection::default(),
            false,
            None,
        )
        .unwrap();

        assert!(output_directory(&build_dir).is_dir());
        assert!(!curation_model_path(&build_dir).exists());
    }

    #[test]
    fn generate_missing_model() {
        let dir = tempfile::tempdir().unwrap();
        do_generate(
            &dir.path().join("missing.toml"),
            dir.path(),
            &dir.path().join("outputs.txt"),
            &ProjectSelection::default(),
            false,
            None,
        )
        .expect_err("model file does not exist");
    }
}
