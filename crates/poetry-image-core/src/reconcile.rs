//! Update reconciliation: which upstream releases are missing from a table.
//!
//! ```text
//! upstream tags ──filter──▶ major.minor.patch ──group──▶ minor → patches
//!                                                          │
//!                tracked minor, patch ≥ floor, untracked ──┼──▶ patch update
//!                minor newer than every tracked minor ─────┴──▶ minor update
//! ```
//!
//! The result is a list of records; rendering them (diagnostics, commit
//! messages) is left to the caller.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::table::{Software, VersionTable};
use crate::version::{MinorVersion, Version};

/// Why a discovered version is missing from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UpdateKind {
    /// A new patch of a tracked minor.
    Patch,
    /// A release of a minor newer than every tracked one.
    Minor,
}

/// A released version the table does not track yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UpdateCandidate {
    pub version: Version,
    pub kind: UpdateKind,
}

/// Group numeric `major.minor.patch` tags by minor, dropping everything else.
pub fn group_releases<I, S>(tags: I) -> BTreeMap<MinorVersion, BTreeSet<u32>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut groups: BTreeMap<MinorVersion, BTreeSet<u32>> = BTreeMap::new();
    for tag in tags {
        if let Some(version) = Version::parse_release(tag.as_ref()) {
            groups
                .entry(version.minor_version())
                .or_default()
                .insert(version.patch);
        }
    }
    groups
}

/// Compute the update candidates for `table` from raw upstream tags.
///
/// A patch lower than the lowest tracked patch of its minor is history, not
/// an update. Candidates are sorted by version.
pub fn reconcile<I, S>(tags: I, table: &VersionTable) -> Vec<UpdateCandidate>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let groups = group_releases(tags);
    let mut candidates = BTreeSet::new();

    for (minor, tracked) in table.iter() {
        let (Some(floor), Some(found)) = (tracked.first(), groups.get(&minor)) else {
            continue;
        };
        candidates.extend(
            found
                .iter()
                .filter(|patch| *patch >= floor && !tracked.contains(*patch))
                .map(|patch| UpdateCandidate {
                    version: minor.with_patch(*patch),
                    kind: UpdateKind::Patch,
                }),
        );
    }

    if let Some(newest) = table.newest_minor() {
        for (minor, found) in groups.iter().filter(|(minor, _)| **minor > newest) {
            candidates.extend(found.iter().map(|patch| UpdateCandidate {
                version: minor.with_patch(*patch),
                kind: UpdateKind::Minor,
            }));
        }
    }

    let candidates: Vec<UpdateCandidate> = candidates.into_iter().collect();
    tracing::debug!(count = candidates.len(), "reconciled upstream releases");
    candidates
}

/// Apply candidates to `table`, returning the versions actually added.
pub fn apply_updates(table: &mut VersionTable, candidates: &[UpdateCandidate]) -> Vec<Version> {
    candidates
        .iter()
        .filter(|candidate| table.insert(candidate.version))
        .map(|candidate| candidate.version)
        .collect()
}

/// A human-readable "add this version" line for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub software: Software,
    pub candidate: UpdateCandidate,
    /// Where the table lives, for the message.
    pub location: String,
}

impl Diagnostic {
    pub fn for_candidates(
        software: Software,
        candidates: &[UpdateCandidate],
        location: &str,
    ) -> Vec<Self> {
        candidates
            .iter()
            .map(|candidate| Self {
                software,
                candidate: *candidate,
                location: location.to_owned(),
            })
            .collect()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Add {software} version {version} to [{key}] in {location}",
            software = self.software,
            version = self.candidate.version,
            key = self.software.key(),
            location = self.location,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &[u32])]) -> VersionTable {
        entries
            .iter()
            .flat_map(|(minor, patches)| {
                let minor: MinorVersion = minor.parse().unwrap();
                patches.iter().map(move |p| minor.with_patch(*p))
            })
            .collect()
    }

    fn versions(candidates: &[UpdateCandidate]) -> Vec<String> {
        candidates.iter().map(|c| c.version.to_string()).collect()
    }

    #[test]
    fn finds_patch_and_minor_updates_and_skips_pre_releases() {
        let t = table(&[("1.5", &[0, 1])]);
        let found = reconcile(["1.5.0", "1.5.1", "1.5.2", "1.5.2rc1", "2.0.0"], &t);
        assert_eq!(
            found,
            vec![
                UpdateCandidate {
                    version: Version::new(1, 5, 2),
                    kind: UpdateKind::Patch,
                },
                UpdateCandidate {
                    version: Version::new(2, 0, 0),
                    kind: UpdateKind::Minor,
                },
            ]
        );
    }

    #[test]
    fn release_candidate_alone_is_not_an_update() {
        let t = table(&[("1.5", &[0, 1])]);
        let found = reconcile(["1.5.0", "1.5.1", "1.5.2rc1", "2.0.0"], &t);
        assert_eq!(versions(&found), ["2.0.0"]);
    }

    #[test]
    fn patches_below_floor_are_history() {
        let t = table(&[("1.1", &[14, 15])]);
        let found = reconcile(["1.1.12", "1.1.13", "1.1.14", "1.1.15"], &t);
        assert!(found.is_empty(), "got: {found:?}");
    }

    #[test]
    fn gaps_inside_tracked_range_are_updates() {
        let t = table(&[("3.10", &[6, 8])]);
        let found = reconcile(["3.10.6", "3.10.7", "3.10.8"], &t);
        assert_eq!(versions(&found), ["3.10.7"]);
    }

    #[test]
    fn older_untracked_minors_are_ignored() {
        let t = table(&[("3.10", &[6]), ("3.11", &[0])]);
        let found = reconcile(["3.8.17", "3.9.18", "3.12.0"], &t);
        assert_eq!(versions(&found), ["3.12.0"]);
        assert!(found.iter().all(|c| c.kind == UpdateKind::Minor));
    }

    #[test]
    fn new_minor_comparison_is_numeric() {
        let t = table(&[("3.9", &[0])]);
        let found = reconcile(["3.10.0", "3.10.1"], &t);
        assert_eq!(versions(&found), ["3.10.0", "3.10.1"]);
    }

    #[test]
    fn tracked_minor_without_upstream_tags_yields_nothing() {
        let t = table(&[("1.4", &[2]), ("1.5", &[1])]);
        let found = reconcile(["1.5.1", "1.5.2"], &t);
        assert_eq!(versions(&found), ["1.5.2"]);
    }

    #[test]
    fn duplicate_tags_produce_one_candidate() {
        let t = table(&[("1.5", &[0])]);
        let found = reconcile(["1.5.1", "1.5.1"], &t);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn apply_updates_inserts_by_value_and_adds_new_minors() {
        let mut t = table(&[("3.10", &[6, 7])]);
        let found = reconcile(["3.10.10", "3.10.9", "3.11.0", "3.11.1"], &t);
        let added = apply_updates(&mut t, &found);

        let added: Vec<String> = added.iter().map(ToString::to_string).collect();
        assert_eq!(added, ["3.10.9", "3.10.10", "3.11.0", "3.11.1"]);
        let all: Vec<String> = t.versions().map(|v| v.to_string()).collect();
        assert_eq!(
            all,
            ["3.10.6", "3.10.7", "3.10.9", "3.10.10", "3.11.0", "3.11.1"]
        );
        assert!(reconcile(["3.10.10", "3.11.1"], &t).is_empty());
    }

    #[test]
    fn diagnostic_names_software_version_and_location() {
        let candidate = UpdateCandidate {
            version: Version::new(1, 5, 2),
            kind: UpdateKind::Patch,
        };
        let lines = Diagnostic::for_candidates(Software::Poetry, &[candidate], "versions.toml");
        assert_eq!(
            lines[0].to_string(),
            "Add Poetry version 1.5.2 to [poetry] in versions.toml"
        );

        let minor = UpdateCandidate {
            version: Version::new(3, 12, 0),
            kind: UpdateKind::Minor,
        };
        let lines = Diagnostic::for_candidates(Software::Python, &[minor], "./versions.toml");
        assert_eq!(
            lines[0].to_string(),
            "Add Python version 3.12.0 to [python] in ./versions.toml"
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn tag() -> impl Strategy<Value = String> {
            prop_oneof![
                (1u32..4, 0u32..12, 0u32..20).prop_map(|(a, b, c)| format!("{a}.{b}.{c}")),
                (1u32..4, 0u32..12, 0u32..20).prop_map(|(a, b, c)| format!("{a}.{b}.{c}rc1")),
                "[a-z0-9.-]{0,12}",
            ]
        }

        fn tracked() -> impl Strategy<Value = VersionTable> {
            proptest::collection::vec((1u32..4, 0u32..12, 0u32..20), 1..10)
                .prop_map(|v| v.into_iter().map(|(a, b, c)| Version::new(a, b, c)).collect())
        }

        proptest! {
            #[test]
            fn never_reports_tracked_or_below_floor(
                tags in proptest::collection::vec(tag(), 0..40),
                table in tracked(),
            ) {
                for candidate in reconcile(&tags, &table) {
                    let version = candidate.version;
                    prop_assert!(!table.contains(version));
                    if let Ok(patches) = table.patches(version.minor_version()) {
                        prop_assert!(Some(&version.patch) >= patches.first());
                    }
                }
            }

            #[test]
            fn candidates_are_sorted_and_unique(
                tags in proptest::collection::vec(tag(), 0..40),
                table in tracked(),
            ) {
                let found = reconcile(&tags, &table);
                prop_assert!(found.windows(2).all(|w| w[0].version < w[1].version));
            }

            #[test]
            fn applying_candidates_leaves_nothing_to_do(
                tags in proptest::collection::vec(tag(), 0..40),
                table in tracked(),
            ) {
                let mut table = table;
                let found = reconcile(&tags, &table);
                let added = apply_updates(&mut table, &found);
                prop_assert_eq!(added.len(), found.len());
                prop_assert!(reconcile(&tags, &table).is_empty());
            }
        }
    }
}
