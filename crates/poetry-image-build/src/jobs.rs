//! GitHub Actions job matrices (`{"include": [...]}`) for CI and CD.

use poetry_image_core::{NewVersions, VersionsFile};
use serde::Serialize;

use crate::matrix::{Matrix, MatrixEntry};
use crate::tags::{TagSynthesizer, tag_args};

/// A `strategy.matrix` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobMatrix<T> {
    pub include: Vec<T>,
}

/// CI job: build and test one version-controlled Dockerfile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CiJob {
    pub dockerfile: String,
    pub version: String,
}

/// CD job: render, build and push one image with all its tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CdJob {
    pub version: String,
    pub tags: String,
}

/// One job per current-matrix Dockerfile.
pub fn ci_jobs(versions: &VersionsFile) -> JobMatrix<CiJob> {
    let include = Matrix::new(versions)
        .current()
        .into_iter()
        .map(|entry| CiJob {
            dockerfile: entry.dockerfile_path(),
            version: entry.full_version(),
        })
        .collect();
    JobMatrix { include }
}

/// One job per full-matrix build, limited to builds touched by the last
/// update when `changed` is given.
pub fn cd_jobs(
    versions: &VersionsFile,
    image: &str,
    changed: Option<&NewVersions>,
) -> poetry_image_core::Result<JobMatrix<CdJob>> {
    let synthesizer = TagSynthesizer::new(versions)?;
    let include = Matrix::new(versions)
        .full()
        .into_iter()
        .filter(|entry| affected(entry, changed))
        .map(|entry| {
            let tags = synthesizer.tags(&entry)?;
            Ok(CdJob {
                version: entry.full_version(),
                tags: tag_args(image, &tags),
            })
        })
        .collect::<poetry_image_core::Result<Vec<_>>>()?;
    tracing::debug!(jobs = include.len(), filtered = changed.is_some(), "built CD matrix");
    Ok(JobMatrix { include })
}

fn affected(entry: &MatrixEntry, changed: Option<&NewVersions>) -> bool {
    changed.is_none_or(|changed| changed.affects(entry.poetry, entry.python))
}
