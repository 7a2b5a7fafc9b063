use std::path::PathBuf;

use crate::version::MinorVersion;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    // ── Versions file ──
    #[error("failed to read versions file {path}")]
    VersionsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse versions file {path}")]
    VersionsParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to serialize versions file")]
    VersionsSerialize { source: toml::ser::Error },

    #[error("failed to write versions file {path}")]
    VersionsWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{software} version table is empty: track at least one minor version")]
    EmptyTable { software: &'static str },

    #[error("{software} {minor} has no patch versions")]
    EmptyPatches {
        software: &'static str,
        minor: MinorVersion,
    },

    #[error("variation {variant:?} has no tag aliases")]
    EmptyAliases { variant: String },

    // ── Versions ──
    #[error("invalid version {input:?}: expected {expected}")]
    InvalidVersion {
        input: String,
        expected: &'static str,
    },

    #[error("{minor} is not a tracked version")]
    UnknownMinor { minor: MinorVersion },

    #[error("{variant:?} is not a known image variation")]
    UnknownVariant { variant: String },

    // ── Handoff file ──
    #[error("failed to read new versions file {path}")]
    HandoffRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse new versions file {path}")]
    HandoffParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize new versions")]
    HandoffSerialize { source: serde_json::Error },

    #[error("failed to write new versions file {path}")]
    HandoffWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}
