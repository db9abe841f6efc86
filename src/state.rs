//! Core data types shared across the search, enrichment, and session layers.
//!
//! This module defines the small value types that flow through the pipeline:
//! query descriptors, registry-reported package summaries, the requested
//! metadata kinds, per-package enrichment payloads, the installed-package
//! snapshot, and the fully merged display rows consumed by the interactive
//! session.

use std::collections::HashMap;

/// How the query terms are interpreted by the search stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchMode {
    /// Relevance-scored search over the registry search endpoint, truncated
    /// to the highest-scoring `limit` entries.
    Ranked,
    /// Prefix-anchored regular-expression filter over the full package-name
    /// catalog, unranked and unlimited.
    Pattern,
}

/// A user query as dispatched to the search stage.
#[derive(Clone, Debug)]
pub struct SearchQuery {
    /// Individual query terms as given on the command line.
    pub terms: Vec<String>,
    /// Ranked vs pattern interpretation of `terms`.
    pub mode: SearchMode,
    /// Result-count limit for ranked mode; `0` yields an empty result set.
    pub limit: usize,
}

impl SearchQuery {
    /// The full query as a single string: terms joined by single spaces.
    ///
    /// Used for exact-name matching in the scorer, so a multi-term query can
    /// exact-match a name with embedded spaces.
    #[must_use]
    pub fn joined(&self) -> String {
        self.terms.join(" ")
    }
}

/// Minimal package summary as reported by the registry search or
/// latest-release endpoints. Immutable once fetched.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PackageSummary {
    /// Canonical package name.
    pub name: String,
    /// Version string as reported by the registry.
    pub version: String,
    /// One-line description; may be empty when the registry omits it.
    #[serde(default)]
    pub summary: String,
}

/// One kind of secondary metadata that can be requested per package.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InfoKind {
    /// License identifier from the release metadata.
    License,
    /// Upstream homepage URL.
    HomePage,
    /// Upload date of the release, reformatted for display.
    Date,
    /// Size of the release archive, humanized for display.
    Size,
}

/// The ordered, de-duplicated set of metadata kinds to fetch per package.
///
/// The insertion order is preserved and drives the order in which the
/// non-homepage fields are concatenated for display.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InfoRequest(Vec<InfoKind>);

impl InfoRequest {
    /// Build a request from individual display toggles, in the canonical
    /// insertion order: license, homepage, date, size.
    #[must_use]
    pub fn from_flags(license: bool, homepage: bool, date: bool, size: bool) -> Self {
        let mut kinds = Vec::new();
        if license {
            kinds.push(InfoKind::License);
        }
        if homepage {
            kinds.push(InfoKind::HomePage);
        }
        if date {
            kinds.push(InfoKind::Date);
        }
        if size {
            kinds.push(InfoKind::Size);
        }
        Self(kinds)
    }

    /// A request for every metadata kind, as used by the detail view.
    #[must_use]
    pub fn all() -> Self {
        Self::from_flags(true, true, true, true)
    }

    /// Whether no metadata kinds are requested (no enrichment fetch needed).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `kind` is part of this request.
    #[must_use]
    pub fn contains(&self, kind: InfoKind) -> bool {
        self.0.contains(&kind)
    }

    /// Requested kinds in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = InfoKind> + '_ {
        self.0.iter().copied()
    }
}

/// Display-ready metadata for one package, correlated to its summary by the
/// summary's position in the ordered result list.
///
/// Absent fields were either not requested, not reported by the registry, or
/// lost to a fetch failure; the distinction is intentionally invisible here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Enrichment {
    /// License identifier, omitted when the registry reports it unknown.
    pub license: Option<String>,
    /// Homepage URL, omitted when the registry reports it unknown.
    pub home_page: Option<String>,
    /// Upload date, already reformatted for display.
    pub date: Option<String>,
    /// Archive size, already humanized for display.
    pub size: Option<String>,
}

/// Snapshot of locally installed packages, taken once at startup and
/// read-only afterward.
#[derive(Clone, Debug, Default)]
pub struct InstalledIndex(HashMap<String, String>);

impl InstalledIndex {
    /// Wrap a name → version mapping.
    #[must_use]
    pub fn new(map: HashMap<String, String>) -> Self {
        Self(map)
    }

    /// Installed version for `name` by exact name match, if any.
    #[must_use]
    pub fn version_of(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Number of installed packages in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the snapshot is empty (also the failure fallback).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Installed-state annotation for one result row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstallState {
    /// Not present in the installed snapshot.
    NotInstalled,
    /// Installed and the installed version equals the candidate version.
    Latest,
    /// Installed at a different version than the candidate; carries the
    /// installed version for display.
    Stale(String),
}

impl InstallState {
    /// Whether the package is installed at all.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        !matches!(self, Self::NotInstalled)
    }
}

/// Fully merged, render-ready representation of one result.
///
/// Constructed by the list model, consumed by the session; never mutated
/// after construction.
#[derive(Clone, Debug)]
pub struct DisplayRow {
    /// The base summary in search order.
    pub summary: PackageSummary,
    /// Non-homepage enrichment fields joined in request order, empty when
    /// nothing was requested or nothing survived the fetch.
    pub extra: String,
    /// Homepage URL, rendered on its own line above the summary.
    pub home_page: Option<String>,
    /// Installed-state annotation for this row.
    pub installed: InstallState,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// What: Request construction preserves the canonical insertion order.
    ///
    /// Inputs:
    /// - All four display toggles enabled.
    ///
    /// Output:
    /// - Kinds iterate as license, homepage, date, size.
    #[test]
    fn info_request_preserves_insertion_order() {
        let req = InfoRequest::from_flags(true, true, true, true);
        let kinds: Vec<InfoKind> = req.iter().collect();
        assert_eq!(
            kinds,
            vec![
                InfoKind::License,
                InfoKind::HomePage,
                InfoKind::Date,
                InfoKind::Size
            ]
        );
    }

    /// What: An all-false request is empty and contains nothing.
    ///
    /// Inputs:
    /// - All display toggles disabled.
    ///
    /// Output:
    /// - `is_empty` true, `contains` false for every kind.
    #[test]
    fn info_request_empty_when_no_flags() {
        let req = InfoRequest::from_flags(false, false, false, false);
        assert!(req.is_empty());
        assert!(!req.contains(InfoKind::License));
        assert!(!req.contains(InfoKind::Size));
    }

    /// What: Multi-term queries join with single spaces for exact matching.
    ///
    /// Inputs:
    /// - A two-term ranked query.
    ///
    /// Output:
    /// - `joined` yields the space-separated full query.
    #[test]
    fn search_query_joins_terms_with_spaces() {
        let q = SearchQuery {
            terms: vec!["data".into(), "frames".into()],
            mode: SearchMode::Ranked,
            limit: 10,
        };
        assert_eq!(q.joined(), "data frames");
    }

    /// What: Installed-state helper distinguishes installed from absent.
    ///
    /// Inputs:
    /// - Each `InstallState` variant.
    ///
    /// Output:
    /// - `is_installed` false only for `NotInstalled`.
    #[test]
    fn install_state_installed_helper() {
        assert!(!InstallState::NotInstalled.is_installed());
        assert!(InstallState::Latest.is_installed());
        assert!(InstallState::Stale("1.0".into()).is_installed());
    }
}
