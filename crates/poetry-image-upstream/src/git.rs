#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("git not found on PATH")]
    NotFound { source: std::io::Error },

    #[error("git command failed: {args:?}\n{stderr}")]
    CommandFailed { args: Vec<String>, stderr: String },

    #[error("git output was not valid UTF-8")]
    InvalidUtf8 { source: std::string::FromUtf8Error },
}
