//! Registry tags for one build.
//!
//! Every build gets its pinned tags. A build on the highest patch of both its
//! Poetry minor and its Python minor also carries the floating
//! `{poetry minor}-python{python minor}` tags, and the unsuffixed build of the
//! newest Poetry on the newest Python is `latest`.

use std::collections::BTreeSet;

use poetry_image_core::{Software, VersionsFile};

use crate::matrix::MatrixEntry;

pub const LATEST: &str = "latest";

pub struct TagSynthesizer<'a> {
    versions: &'a VersionsFile,
    latest_anchor: String,
}

impl<'a> TagSynthesizer<'a> {
    /// # Errors
    ///
    /// [`EmptyTable`](poetry_image_core::Error::EmptyTable) if either table
    /// tracks nothing.
    pub fn new(versions: &'a VersionsFile) -> poetry_image_core::Result<Self> {
        let poetry = versions.newest_version(Software::Poetry)?;
        let python = versions.newest_version(Software::Python)?;
        Ok(Self {
            versions,
            latest_anchor: format!("{poetry}-python{python}"),
        })
    }

    /// Tags for `entry`, sorted.
    ///
    /// # Errors
    ///
    /// [`UnknownVariant`](poetry_image_core::Error::UnknownVariant) if the
    /// entry's variant has no aliases.
    pub fn tags(&self, entry: &MatrixEntry) -> poetry_image_core::Result<BTreeSet<String>> {
        let aliases = self.versions.variations.aliases(&entry.variant)?;
        let current = self.versions.poetry.is_current(entry.poetry)
            && self.versions.python.is_current(entry.python);

        let mut tags = BTreeSet::new();
        for alias in aliases {
            tags.insert(format!(
                "{poetry}-python{python}{alias}",
                poetry = entry.poetry,
                python = entry.python,
            ));
            if current {
                tags.insert(format!(
                    "{poetry}-python{python}{alias}",
                    poetry = entry.poetry.minor_version(),
                    python = entry.python.minor_version(),
                ));
            }
        }
        if tags.contains(&self.latest_anchor) {
            tags.insert(LATEST.to_owned());
        }
        Ok(tags)
    }
}

/// `docker build` arguments tagging `image` with every tag.
pub fn tag_args<'t>(image: &str, tags: impl IntoIterator<Item = &'t String>) -> String {
    tags.into_iter()
        .map(|tag| format!("--tag {image}:{tag}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use poetry_image_core::{VariationSet, Version, VersionTable};

    fn versions() -> VersionsFile {
        let poetry: VersionTable = [
            Version::new(1, 4, 2),
            Version::new(1, 5, 0),
            Version::new(1, 5, 1),
        ]
        .into_iter()
        .collect();
        let python: VersionTable = [
            Version::new(3, 10, 12),
            Version::new(3, 11, 3),
            Version::new(3, 11, 4),
        ]
        .into_iter()
        .collect();
        let variations: VariationSet = [
            ("bullseye", vec!["", "-bullseye"]),
            ("slim-bullseye", vec!["-slim", "-slim-bullseye"]),
        ]
        .into_iter()
        .collect();
        VersionsFile {
            poetry,
            python,
            variations,
        }
    }

    fn tags_for(version: &str) -> Vec<String> {
        let versions = versions();
        let synthesizer = TagSynthesizer::new(&versions).unwrap();
        let entry: MatrixEntry = version.parse().unwrap();
        synthesizer.tags(&entry).unwrap().into_iter().collect()
    }

    #[test]
    fn newest_default_variant_is_latest() {
        assert_eq!(
            tags_for("1.5.1-python3.11.4-bullseye"),
            [
                "1.5-python3.11",
                "1.5-python3.11-bullseye",
                "1.5.1-python3.11.4",
                "1.5.1-python3.11.4-bullseye",
                "latest",
            ]
        );
    }

    #[test]
    fn newest_slim_variant_floats_but_is_not_latest() {
        assert_eq!(
            tags_for("1.5.1-python3.11.4-slim-bullseye"),
            [
                "1.5-python3.11-slim",
                "1.5-python3.11-slim-bullseye",
                "1.5.1-python3.11.4-slim",
                "1.5.1-python3.11.4-slim-bullseye",
            ]
        );
    }

    #[test]
    fn old_poetry_patch_gets_only_pinned_tags() {
        assert_eq!(
            tags_for("1.5.0-python3.11.4-bullseye"),
            ["1.5.0-python3.11.4", "1.5.0-python3.11.4-bullseye"]
        );
    }

    #[test]
    fn old_python_patch_gets_only_pinned_tags() {
        assert_eq!(
            tags_for("1.5.1-python3.11.3-bullseye"),
            ["1.5.1-python3.11.3", "1.5.1-python3.11.3-bullseye"]
        );
    }

    #[test]
    fn current_older_minor_floats_without_latest() {
        assert_eq!(
            tags_for("1.4.2-python3.10.12-bullseye"),
            [
                "1.4-python3.10",
                "1.4-python3.10-bullseye",
                "1.4.2-python3.10.12",
                "1.4.2-python3.10.12-bullseye",
            ]
        );
    }

    #[test]
    fn unknown_variant_errors() {
        let versions = versions();
        let synthesizer = TagSynthesizer::new(&versions).unwrap();
        let entry: MatrixEntry = "1.5.1-python3.11.4-alpine".parse().unwrap();
        assert!(synthesizer.tags(&entry).is_err());
    }

    #[test]
    fn tag_args_prefix_every_tag_with_image() {
        let tags: BTreeSet<String> = ["latest".to_owned(), "1.5-python3.11".to_owned()].into();
        assert_eq!(
            tag_args("acme/poetry", &tags),
            "--tag acme/poetry:1.5-python3.11 --tag acme/poetry:latest"
        );
    }
}
