use poetry_image_core::Software;

use crate::executor::{GitExecutor, RealExecutor};
use crate::git::GitError;

/// Git operations for publishing a version bump, parameterized over the
/// executor for testability.
pub struct GitClient<E: GitExecutor = RealExecutor> {
    executor: E,
}

impl GitClient<RealExecutor> {
    pub fn new(work_tree: impl Into<std::path::PathBuf>) -> Self {
        Self {
            executor: RealExecutor::new(work_tree),
        }
    }
}

impl<E: GitExecutor> GitClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    pub async fn configure_identity(&self, name: &str, email: &str) -> Result<(), GitError> {
        self.executor
            .exec(&args(["config", "user.name", name]))
            .await?;
        self.executor
            .exec(&args(["config", "user.email", email]))
            .await?;
        Ok(())
    }

    pub async fn add_all(&self) -> Result<(), GitError> {
        self.executor.exec(&args(["add", "--all"])).await?;
        Ok(())
    }

    pub async fn commit(&self, message: &str) -> Result<(), GitError> {
        self.executor.exec(&args(["commit", "-m", message])).await?;
        Ok(())
    }

    pub async fn push(&self) -> Result<(), GitError> {
        self.executor.exec(&args(["push"])).await?;
        Ok(())
    }

    /// Stage everything, commit the bump for `software` and push.
    ///
    /// Stops at the first failing command.
    pub async fn publish_update(&self, software: Software) -> Result<(), GitError> {
        self.add_all().await?;
        self.commit(&commit_message(software)).await?;
        self.push().await?;
        tracing::info!(%software, "pushed version update");
        Ok(())
    }
}

pub fn commit_message(software: Software) -> String {
    format!("⬆ Update {software} versions")
}

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}
