//! Everything outside the working tree: upstream release tags and git.

pub mod client;
pub mod docker_hub;
pub mod executor;
pub mod git;
pub mod github;
pub mod source;

pub use client::{GitClient, commit_message};
pub use docker_hub::DockerHubTags;
pub use executor::{GitExecutor, RealExecutor};
pub use git::GitError;
pub use github::GitHubTags;
pub use source::{TagSource, UpstreamError};
