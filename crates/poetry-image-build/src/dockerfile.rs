use std::path::{Path, PathBuf};

use crate::matrix::MatrixEntry;

pub const PYTHON_PLACEHOLDER: &str = "{{PYTHON_VERSION}}";
pub const POETRY_PLACEHOLDER: &str = "{{POETRY_VERSION}}";

/// Source of per-variant Dockerfile templates.
pub trait TemplateSource {
    fn template(&self, variant: &str) -> Result<String, DockerfileError>;
}

/// Templates stored as `{dir}/Dockerfile-{variant}.template`.
pub struct TemplateDir {
    dir: PathBuf,
}

impl TemplateDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, variant: &str) -> PathBuf {
        self.dir.join(format!("Dockerfile-{variant}.template"))
    }
}

impl TemplateSource for TemplateDir {
    fn template(&self, variant: &str) -> Result<String, DockerfileError> {
        let path = self.path_for(variant);
        std::fs::read_to_string(&path).map_err(|e| DockerfileError::ReadTemplate { path, source: e })
    }
}

/// Substitute both version placeholders.
pub fn render_template(template: &str, entry: &MatrixEntry) -> String {
    template
        .replace(PYTHON_PLACEHOLDER, &entry.python.to_string())
        .replace(POETRY_PLACEHOLDER, &entry.poetry.to_string())
}

/// Renders matrix entries into Dockerfiles.
pub struct DockerfileGenerator<'a, T: TemplateSource> {
    templates: &'a T,
}

impl<'a, T: TemplateSource> DockerfileGenerator<'a, T> {
    pub fn new(templates: &'a T) -> Self {
        Self { templates }
    }

    pub fn render(&self, entry: &MatrixEntry) -> Result<String, DockerfileError> {
        let template = self.templates.template(&entry.variant)?;
        Ok(render_template(&template, entry))
    }

    /// Write `{root}/{entry directory}/Dockerfile` for every entry,
    /// overwriting previous output. Returns the written paths.
    pub fn write_all(
        &self,
        root: &Path,
        entries: &[MatrixEntry],
    ) -> Result<Vec<PathBuf>, DockerfileError> {
        let mut written = Vec::with_capacity(entries.len());
        for entry in entries {
            let dir = root.join(entry.directory());
            std::fs::create_dir_all(&dir).map_err(|e| DockerfileError::CreateDir {
                path: dir.clone(),
                source: e,
            })?;

            let content = self.render(entry)?;
            let path = dir.join("Dockerfile");
            std::fs::write(&path, content).map_err(|e| DockerfileError::Write {
                path: path.clone(),
                source: e,
            })?;
            tracing::debug!(path = %path.display(), version = %entry, "wrote Dockerfile");
            written.push(path);
        }
        Ok(written)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DockerfileError {
    #[error("failed to read Dockerfile template {path}")]
    ReadTemplate {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write Dockerfile at {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
