use std::path::PathBuf;

use anyhow::Context;
use poetry_image_build::{DockerfileGenerator, Matrix, MatrixEntry, TemplateDir};
use poetry_image_core::VersionsFile;

use super::Project;

pub fn dockerfiles(version: Option<&str>) -> anyhow::Result<()> {
    let project = Project::load()?;

    match version {
        Some(version) => {
            let entry: MatrixEntry = version.parse()?;
            let templates = TemplateDir::new(project.config.paths.templates_dir(&project.root));
            let dockerfile = DockerfileGenerator::new(&templates)
                .render(&entry)
                .with_context(|| format!("cannot render Dockerfile for {entry}"))?;
            print!("{dockerfile}");
        }
        None => {
            let versions = project.load_versions()?;
            let written = write_current(&project, &versions)?;
            println!("Generated {} Dockerfiles", written.len());
        }
    }
    Ok(())
}

/// Regenerate every current-matrix Dockerfile under the project root.
pub(crate) fn write_current(
    project: &Project,
    versions: &VersionsFile,
) -> anyhow::Result<Vec<PathBuf>> {
    let templates = TemplateDir::new(project.config.paths.templates_dir(&project.root));
    let entries = Matrix::new(versions).current();
    let written = DockerfileGenerator::new(&templates).write_all(&project.root, &entries)?;

    for (entry, path) in entries.iter().zip(&written) {
        println!("  {entry} -> {}", path.display());
    }
    tracing::info!(count = written.len(), "regenerated Dockerfiles");
    Ok(written)
}
