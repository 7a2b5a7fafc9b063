//! Core types for the Poetry Docker image pipeline.
//!
//! This crate defines the pinned version tables ([`VersionsFile`]), the
//! integer-ordered [`Version`]/[`MinorVersion`] types, update reconciliation
//! against upstream releases ([`reconcile`]), the CD handoff file
//! ([`NewVersions`]), the `poetry-image.toml` schema ([`ImageConfig`]) and
//! shared error types.

pub mod config;
pub mod error;
pub mod handoff;
pub mod reconcile;
pub mod table;
pub mod version;

pub use config::{GitConfig, ImageConfig, PathsConfig, ProjectConfig, UpstreamConfig};
pub use error::{Error, Result};
pub use handoff::NewVersions;
pub use reconcile::{Diagnostic, UpdateCandidate, UpdateKind, apply_updates, reconcile};
pub use table::{Software, VariationSet, VersionTable, VersionsFile};
pub use version::{MinorVersion, Version};
