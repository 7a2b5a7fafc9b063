//! The "new versions" handoff between the update job and the CD job.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::table::Software;
use crate::version::Version;

/// Versions added by the last update run, per software.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVersions {
    #[serde(rename = "Poetry", default)]
    pub poetry: Vec<Version>,
    #[serde(rename = "Python", default)]
    pub python: Vec<Version>,
}

impl NewVersions {
    /// Handoff for a run that updated only `software`.
    pub fn for_software(software: Software, versions: Vec<Version>) -> Self {
        let mut new_versions = Self::default();
        *new_versions.versions_mut(software) = versions;
        new_versions
    }

    pub fn versions(&self, software: Software) -> &[Version] {
        match software {
            Software::Poetry => &self.poetry,
            Software::Python => &self.python,
        }
    }

    fn versions_mut(&mut self, software: Software) -> &mut Vec<Version> {
        match software {
            Software::Poetry => &mut self.poetry,
            Software::Python => &mut self.python,
        }
    }

    /// Whether a build of `poetry` on `python` was touched by the last update.
    pub fn affects(&self, poetry: Version, python: Version) -> bool {
        self.poetry.contains(&poetry) || self.python.contains(&python)
    }

    /// Read the handoff file; `None` when it does not exist.
    pub fn load(path: &Path) -> crate::Result<Option<Self>> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no new versions file");
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(|e| crate::Error::HandoffRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| crate::Error::HandoffParse {
                path: path.to_path_buf(),
                source: e,
            })
    }

    pub fn save(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| crate::Error::HandoffWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let content =
            serde_json::to_string(self).map_err(|e| crate::Error::HandoffSerialize { source: e })?;
        std::fs::write(path, content).map_err(|e| crate::Error::HandoffWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
