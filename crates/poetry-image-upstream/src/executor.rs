use std::path::PathBuf;

use crate::git::GitError;

/// Abstraction over git CLI execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait GitExecutor: Send + Sync {
    /// Execute a git command and capture stdout.
    async fn exec(&self, args: &[String]) -> Result<String, GitError>;
}

/// Runs `git` in a fixed working tree.
pub struct RealExecutor {
    work_tree: PathBuf,
}

impl RealExecutor {
    pub fn new(work_tree: impl Into<PathBuf>) -> Self {
        Self {
            work_tree: work_tree.into(),
        }
    }
}

impl GitExecutor for RealExecutor {
    async fn exec(&self, args: &[String]) -> Result<String, GitError> {
        use std::process::Stdio;

        tracing::debug!(?args, work_tree = %self.work_tree.display(), "running git");
        let output = tokio::process::Command::new("git")
            .args(args)
            .current_dir(&self.work_tree)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| GitError::NotFound { source: e })?;

        if output.status.success() {
            String::from_utf8(output.stdout).map_err(|e| GitError::InvalidUtf8 { source: e })
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            Err(GitError::CommandFailed {
                args: args.to_vec(),
                stderr,
            })
        }
    }
}
