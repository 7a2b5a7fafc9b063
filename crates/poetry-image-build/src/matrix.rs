use std::fmt;
use std::str::FromStr;

use poetry_image_core::{Version, VersionsFile};

/// One image build: a Poetry version on a Python version and OS variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatrixEntry {
    pub poetry: Version,
    pub python: Version,
    pub variant: String,
}

impl MatrixEntry {
    pub fn new(poetry: Version, python: Version, variant: impl Into<String>) -> Self {
        Self {
            poetry,
            python,
            variant: variant.into(),
        }
    }

    /// Version-controlled directory, e.g. `1.5/python3.11-bullseye`.
    pub fn directory(&self) -> String {
        format!(
            "{poetry}/python{python}-{variant}",
            poetry = self.poetry.minor_version(),
            python = self.python.minor_version(),
            variant = self.variant,
        )
    }

    pub fn dockerfile_path(&self) -> String {
        format!("{}/Dockerfile", self.directory())
    }

    /// Full image version, e.g. `1.5.1-python3.11.4-bullseye`.
    pub fn full_version(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MatrixEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-python{}-{}", self.poetry, self.python, self.variant)
    }
}

impl FromStr for MatrixEntry {
    type Err = EntryParseError;

    /// Parse `POETRY-pythonPYTHON-VARIANT`; the variant may contain `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = s.splitn(3, '-');
        let (Some(poetry), Some(python), Some(variant)) =
            (segments.next(), segments.next(), segments.next())
        else {
            return Err(EntryParseError::Segments {
                input: s.to_owned(),
            });
        };
        if variant.is_empty() {
            return Err(EntryParseError::Segments {
                input: s.to_owned(),
            });
        }
        let python = python
            .strip_prefix("python")
            .ok_or_else(|| EntryParseError::MissingPythonPrefix {
                input: s.to_owned(),
            })?;

        let parse = |version: &str| {
            version
                .parse::<Version>()
                .map_err(|e| EntryParseError::Version {
                    input: s.to_owned(),
                    source: e,
                })
        };

        Ok(Self::new(parse(poetry)?, parse(python)?, variant))
    }
}

/// Expands the pinned tables into build entries.
///
/// Entries are ordered Poetry first, then Python, then variant.
pub struct Matrix<'a> {
    versions: &'a VersionsFile,
}

impl<'a> Matrix<'a> {
    pub fn new(versions: &'a VersionsFile) -> Self {
        Self { versions }
    }

    /// One entry per Poetry minor × Python minor × variant, on the highest
    /// patch of each minor.
    pub fn current(&self) -> Vec<MatrixEntry> {
        let poetry: Vec<Version> = self.versions.poetry.current_versions().collect();
        let python: Vec<Version> = self.versions.python.current_versions().collect();
        self.expand(&poetry, &python)
    }

    /// One entry per tracked Poetry patch × Python patch × variant.
    pub fn full(&self) -> Vec<MatrixEntry> {
        let poetry: Vec<Version> = self.versions.poetry.versions().collect();
        let python: Vec<Version> = self.versions.python.versions().collect();
        self.expand(&poetry, &python)
    }

    fn expand(&self, poetry: &[Version], python: &[Version]) -> Vec<MatrixEntry> {
        let mut entries = Vec::new();
        for poetry in poetry {
            for python in python {
                for variant in self.versions.variations.names() {
                    entries.push(MatrixEntry::new(*poetry, *python, variant));
                }
            }
        }
        entries
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EntryParseError {
    #[error(
        "invalid image version {input:?}: expected POETRY-pythonPYTHON-VARIANT, \
         e.g. 1.5.1-python3.11.4-bullseye"
    )]
    Segments { input: String },
    #[error("invalid image version {input:?}: second segment must start with \"python\"")]
    MissingPythonPrefix { input: String },
    #[error("invalid image version {input:?}")]
    Version {
        input: String,
        source: poetry_image_core::Error,
    },
}
