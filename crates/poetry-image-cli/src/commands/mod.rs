mod cd;
mod ci;
mod dockerfiles;
mod update;

use std::path::PathBuf;

use anyhow::Context;
use poetry_image_core::{ImageConfig, VersionsFile};

pub use cd::cd;
pub use ci::ci;
pub use dockerfiles::dockerfiles;
pub use update::{UpdateOptions, update};

/// Commands run from the project root: the directory holding
/// `versions.toml` and the optional `poetry-image.toml`.
pub(crate) struct Project {
    pub root: PathBuf,
    pub config: ImageConfig,
}

impl Project {
    pub fn load() -> anyhow::Result<Self> {
        let root = PathBuf::from(".");
        let config = ImageConfig::load(&root)?;
        Ok(Self { root, config })
    }

    pub fn versions_path(&self) -> PathBuf {
        self.config.paths.versions_file(&self.root)
    }

    pub fn load_versions(&self) -> anyhow::Result<VersionsFile> {
        let path = self.versions_path();
        VersionsFile::load(&path)
            .with_context(|| format!("cannot load version tables from {}", path.display()))
    }
}
