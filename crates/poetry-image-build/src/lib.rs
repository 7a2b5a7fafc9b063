//! Build matrix, tags, Dockerfiles and job matrices for the Poetry image.
//!
//! # Pipeline
//!
//! ```text
//! versions.toml
//!   ├─ Matrix::current() ── DockerfileGenerator::write_all() ── {poetry}/python{python}-{variant}/Dockerfile
//!   ├─ Matrix::current() ── ci_jobs()                       ── {"include": [{dockerfile, version}]}
//!   └─ Matrix::full()    ── TagSynthesizer::tags() ── cd_jobs() ── {"include": [{version, tags}]}
//! ```
//!
//! # Tags
//!
//! - `{poetry}-python{python}{alias}` for every build
//! - `{poetry minor}-python{python minor}{alias}` when both patches are the highest tracked
//! - `latest` for the unsuffixed build of the newest Poetry on the newest Python

pub mod dockerfile;
pub mod jobs;
pub mod matrix;
pub mod tags;

pub use dockerfile::{DockerfileError, DockerfileGenerator, TemplateDir, TemplateSource};
pub use jobs::{CdJob, CiJob, JobMatrix, cd_jobs, ci_jobs};
pub use matrix::{EntryParseError, Matrix, MatrixEntry};
pub use tags::{TagSynthesizer, tag_args};
