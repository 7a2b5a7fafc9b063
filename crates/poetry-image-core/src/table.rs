//! Pinned version tables and the `versions.toml` data file.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::version::{MinorVersion, Version};

/// The software tracked by a version table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Software {
    Poetry,
    Python,
}

impl Software {
    /// Display name, also used as the handoff file key.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Poetry => "Poetry",
            Self::Python => "Python",
        }
    }

    /// Table name inside `versions.toml`.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Poetry => "poetry",
            Self::Python => "python",
        }
    }
}

impl fmt::Display for Software {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tracked patches per minor version.
///
/// Keys and patches are kept sorted by value, so the current version of a
/// minor is always the last patch of its set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionTable(BTreeMap<MinorVersion, BTreeSet<u32>>);

impl VersionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, version: Version) -> bool {
        self.0
            .get(&version.minor_version())
            .is_some_and(|patches| patches.contains(&version.patch))
    }

    /// Tracked minors in ascending order.
    pub fn minors(&self) -> impl Iterator<Item = MinorVersion> + '_ {
        self.0.keys().copied()
    }

    /// Minors with their patch sets, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (MinorVersion, &BTreeSet<u32>)> + '_ {
        self.0.iter().map(|(minor, patches)| (*minor, patches))
    }

    pub fn patches(&self, minor: MinorVersion) -> crate::Result<&BTreeSet<u32>> {
        self.0
            .get(&minor)
            .ok_or(crate::Error::UnknownMinor { minor })
    }

    /// Every tracked version, ascending.
    pub fn versions(&self) -> impl Iterator<Item = Version> + '_ {
        self.iter().flat_map(|(minor, patches)| {
            patches.iter().map(move |patch| minor.with_patch(*patch))
        })
    }

    /// The highest tracked patch of every minor, ascending.
    pub fn current_versions(&self) -> impl Iterator<Item = Version> + '_ {
        self.iter().filter_map(|(minor, patches)| {
            patches.last().map(|patch| minor.with_patch(*patch))
        })
    }

    /// Highest tracked version of `minor`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownMinor`](crate::Error::UnknownMinor) if `minor` is not tracked.
    pub fn resolve_version(&self, minor: MinorVersion) -> crate::Result<Version> {
        self.patches(minor)?
            .last()
            .map(|patch| minor.with_patch(*patch))
            .ok_or(crate::Error::UnknownMinor { minor })
    }

    /// Greatest tracked minor, compared as integers.
    pub fn newest_minor(&self) -> Option<MinorVersion> {
        self.0.keys().next_back().copied()
    }

    /// Highest patch of the newest minor.
    pub fn newest_version(&self) -> Option<Version> {
        let (minor, patches) = self.0.last_key_value()?;
        patches.last().map(|patch| minor.with_patch(*patch))
    }

    /// Whether `version` is the highest tracked patch of its minor.
    pub fn is_current(&self, version: Version) -> bool {
        self.0
            .get(&version.minor_version())
            .and_then(|patches| patches.last())
            .is_some_and(|patch| *patch == version.patch)
    }

    /// Track `version`, creating its minor when needed.
    ///
    /// Returns `false` when it was already tracked.
    pub fn insert(&mut self, version: Version) -> bool {
        self.0
            .entry(version.minor_version())
            .or_default()
            .insert(version.patch)
    }

    fn validate(&self, software: Software) -> crate::Result<()> {
        if self.is_empty() {
            return Err(crate::Error::EmptyTable {
                software: software.name(),
            });
        }
        if let Some((minor, _)) = self.0.iter().find(|(_, patches)| patches.is_empty()) {
            return Err(crate::Error::EmptyPatches {
                software: software.name(),
                minor: *minor,
            });
        }
        Ok(())
    }
}

impl FromIterator<Version> for VersionTable {
    fn from_iter<I: IntoIterator<Item = Version>>(iter: I) -> Self {
        let mut table = Self::new();
        for version in iter {
            table.insert(version);
        }
        table
    }
}

/// Image variations (OS flavours) and their tag suffixes.
///
/// The empty suffix marks the variation whose tags go unsuffixed, which is
/// the one eligible for `latest`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariationSet(BTreeMap<String, Vec<String>>);

impl VariationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, variant: impl Into<String>, aliases: Vec<String>) {
        self.0.insert(variant.into(), aliases);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    pub fn aliases(&self, variant: &str) -> crate::Result<&[String]> {
        self.0
            .get(variant)
            .map(Vec::as_slice)
            .ok_or_else(|| crate::Error::UnknownVariant {
                variant: variant.to_owned(),
            })
    }

    fn validate(&self) -> crate::Result<()> {
        match self.0.iter().find(|(_, aliases)| aliases.is_empty()) {
            Some((variant, _)) => Err(crate::Error::EmptyAliases {
                variant: variant.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<S>)> for VariationSet {
    fn from_iter<I: IntoIterator<Item = (S, Vec<S>)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(variant, aliases)| {
                    (variant.into(), aliases.into_iter().map(Into::into).collect())
                })
                .collect(),
        )
    }
}

/// Contents of `versions.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionsFile {
    pub poetry: VersionTable,
    pub python: VersionTable,
    #[serde(default)]
    pub variations: VariationSet,
}

impl VersionsFile {
    /// Load and validate the versions file.
    ///
    /// # Errors
    ///
    /// - [`Error::VersionsRead`](crate::Error::VersionsRead) if the file cannot be read
    /// - [`Error::VersionsParse`](crate::Error::VersionsParse) on invalid TOML or version keys
    /// - [`Error::EmptyTable`](crate::Error::EmptyTable) /
    ///   [`Error::EmptyPatches`](crate::Error::EmptyPatches) /
    ///   [`Error::EmptyAliases`](crate::Error::EmptyAliases) when an invariant is broken
    pub fn load(path: &Path) -> crate::Result<Self> {
        tracing::debug!(path = %path.display(), "loading versions file");
        let content = std::fs::read_to_string(path).map_err(|e| crate::Error::VersionsRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let file: Self = toml::from_str(&content).map_err(|e| crate::Error::VersionsParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        file.validate()?;
        Ok(file)
    }

    /// Serialize the whole file back to `path`.
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content =
            toml::to_string(self).map_err(|e| crate::Error::VersionsSerialize { source: e })?;
        std::fs::write(path, content).map_err(|e| crate::Error::VersionsWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), "versions file written");
        Ok(())
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.poetry.validate(Software::Poetry)?;
        self.python.validate(Software::Python)?;
        self.variations.validate()
    }

    pub fn table(&self, software: Software) -> &VersionTable {
        match software {
            Software::Poetry => &self.poetry,
            Software::Python => &self.python,
        }
    }

    pub fn table_mut(&mut self, software: Software) -> &mut VersionTable {
        match software {
            Software::Poetry => &mut self.poetry,
            Software::Python => &mut self.python,
        }
    }

    /// Highest version of the newest minor of `software`.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTable`](crate::Error::EmptyTable) if nothing is tracked.
    pub fn newest_version(&self, software: Software) -> crate::Result<Version> {
        self.table(software)
            .newest_version()
            .ok_or(crate::Error::EmptyTable {
                software: software.name(),
            })
    }
}
