//! Three-level `major.minor.patch` versions.
//!
//! Every comparison goes through the integer components, so `3.9` always
//! orders before `3.10`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A `major.minor` version, the key of a version table.
///
/// # Examples
///
/// ```
/// use poetry_image_core::MinorVersion;
///
/// let old: MinorVersion = "3.9".parse().unwrap();
/// let new: MinorVersion = "3.10".parse().unwrap();
/// assert!(old < new);
/// assert_eq!(new.to_string(), "3.10");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MinorVersion {
    pub major: u32,
    pub minor: u32,
}

/// A full `major.minor.patch` version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl MinorVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// The full version for `patch` of this minor.
    pub const fn with_patch(self, patch: u32) -> Version {
        Version {
            major: self.major,
            minor: self.minor,
            patch,
        }
    }
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    pub const fn minor_version(self) -> MinorVersion {
        MinorVersion::new(self.major, self.minor)
    }

    /// Parse a release identifier, accepting only numeric `major.minor.patch`.
    ///
    /// Pre-releases (`1.5.2rc1`), suffixed image tags (`3.11.4-slim`) and
    /// anything with a different number of labels yield `None`.
    pub fn parse_release(tag: &str) -> Option<Self> {
        let labels = numeric_labels::<3>(tag)?;
        Some(Self::new(labels[0], labels[1], labels[2]))
    }
}

/// Split on `.` into exactly `N` non-empty ASCII-digit labels.
fn numeric_labels<const N: usize>(input: &str) -> Option<[u32; N]> {
    let mut labels = [0; N];
    let mut parts = input.split('.');
    for slot in &mut labels {
        let part = parts.next()?;
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = match part.parse() {
            Ok(label) => label,
            Err(_) => return None,
        };
    }
    if parts.next().is_some() {
        return None;
    }
    Some(labels)
}

impl FromStr for MinorVersion {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        numeric_labels::<2>(s)
            .map(|[major, minor]| Self::new(major, minor))
            .ok_or_else(|| crate::Error::InvalidVersion {
                input: s.to_owned(),
                expected: "major.minor",
            })
    }
}

impl FromStr for Version {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::parse_release(s).ok_or_else(|| crate::Error::InvalidVersion {
            input: s.to_owned(),
            expected: "major.minor.patch",
        })
    }
}

impl fmt::Display for MinorVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl TryFrom<String> for MinorVersion {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        value.parse()
    }
}

impl TryFrom<String> for Version {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        value.parse()
    }
}

impl From<MinorVersion> for String {
    fn from(value: MinorVersion) -> Self {
        value.to_string()
    }
}

impl From<Version> for String {
    fn from(value: Version) -> Self {
        value.to_string()
    }
}
