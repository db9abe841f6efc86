//! Result-list assembly: the pure merge of base summaries, enrichment data,
//! and the installed snapshot into display rows.

use crate::state::{
    DisplayRow, Enrichment, InfoKind, InfoRequest, InstallState, InstalledIndex, PackageSummary,
};

/// Separator between the inline extra fields.
const FIELD_SEPARATOR: &str = " | ";

/// What: Merge the ordered summaries with their enrichments and the
/// installed snapshot into display rows.
///
/// Inputs:
/// - `summaries`: Base results in search order.
/// - `enrichments`: Index-aligned enrichment data; short vectors are padded
///   with absence.
/// - `installed`: Installed-package snapshot for exact-name lookup.
/// - `request`: Drives the order of the inline extra fields.
///
/// Output:
/// - Display rows in the same order as `summaries`.
///
/// Details:
/// - Pure: no I/O, no concurrency, no mutation of inputs.
#[must_use]
pub fn build_rows(
    summaries: Vec<PackageSummary>,
    enrichments: Vec<Enrichment>,
    installed: &InstalledIndex,
    request: &InfoRequest,
) -> Vec<DisplayRow> {
    let mut enrichments = enrichments.into_iter();
    summaries
        .into_iter()
        .map(|summary| {
            let enrichment = enrichments.next().unwrap_or_default();
            let state = install_state(installed, &summary);
            DisplayRow {
                extra: extra_string(request, &enrichment),
                home_page: enrichment.home_page,
                installed: state,
                summary,
            }
        })
        .collect()
}

/// What: Derive the installed-state annotation for one candidate.
///
/// Inputs:
/// - `installed`: Snapshot to look up (exact name match).
/// - `summary`: Candidate name and version.
///
/// Output:
/// - `Latest` when versions match, `Stale` with the installed version when
///   they differ, `NotInstalled` otherwise.
#[must_use]
pub fn install_state(installed: &InstalledIndex, summary: &PackageSummary) -> InstallState {
    match installed.version_of(&summary.name) {
        Some(v) if v == summary.version => InstallState::Latest,
        Some(v) => InstallState::Stale(v.to_string()),
        None => InstallState::NotInstalled,
    }
}

/// What: Join the present non-homepage fields in request order.
///
/// Inputs:
/// - `request`: Requested kinds, in insertion order.
/// - `enrichment`: Fetched values.
///
/// Output:
/// - `" | "`-joined string of the present values; empty when none.
#[must_use]
pub fn extra_string(request: &InfoRequest, enrichment: &Enrichment) -> String {
    let mut fields: Vec<&str> = Vec::new();
    for kind in request.iter() {
        let value = match kind {
            InfoKind::License => enrichment.license.as_deref(),
            InfoKind::Date => enrichment.date.as_deref(),
            InfoKind::Size => enrichment.size.as_deref(),
            // Rendered on its own line, never inline.
            InfoKind::HomePage => None,
        };
        if let Some(v) = value {
            fields.push(v);
        }
    }
    fields.join(FIELD_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn summary(name: &str, version: &str) -> PackageSummary {
        PackageSummary {
            name: name.into(),
            version: version.into(),
            summary: format!("{name} summary"),
        }
    }

    fn installed(pairs: &[(&str, &str)]) -> InstalledIndex {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(n, v)| ((*n).to_string(), (*v).to_string()))
            .collect();
        InstalledIndex::new(map)
    }

    /// What: Installed-state annotation covers the three documented cases.
    ///
    /// Inputs:
    /// - "foo" installed at 2.0 vs candidates 2.0 and absent names;
    ///   "bar" installed at 1.0 vs candidate 2.0.
    ///
    /// Output:
    /// - Latest, Stale("1.0"), and NotInstalled respectively.
    #[test]
    fn model_install_state_cases() {
        let idx = installed(&[("foo", "2.0"), ("bar", "1.0")]);
        assert_eq!(install_state(&idx, &summary("foo", "2.0")), InstallState::Latest);
        assert_eq!(
            install_state(&idx, &summary("bar", "2.0")),
            InstallState::Stale("1.0".into())
        );
        assert_eq!(
            install_state(&idx, &summary("baz", "2.0")),
            InstallState::NotInstalled
        );
    }

    /// What: Extra fields join in request insertion order, homepage never
    /// inline.
    ///
    /// Inputs:
    /// - All kinds requested; all values present.
    ///
    /// Output:
    /// - "license | date | size" ordering, homepage excluded.
    #[test]
    fn model_extra_string_orders_fields() {
        let request = InfoRequest::from_flags(true, true, true, true);
        let e = Enrichment {
            license: Some("MIT".into()),
            home_page: Some("https://example.org".into()),
            date: Some("05/29/24".into()),
            size: Some("1.50 KB".into()),
        };
        assert_eq!(extra_string(&request, &e), "MIT | 05/29/24 | 1.50 KB");
    }

    /// What: Absent values simply drop out of the joined string.
    ///
    /// Inputs:
    /// - License+size requested, license absent.
    ///
    /// Output:
    /// - Only the size remains, no stray separator.
    #[test]
    fn model_extra_string_skips_absent() {
        let request = InfoRequest::from_flags(true, false, false, true);
        let e = Enrichment {
            size: Some("1.50 KB".into()),
            ..Enrichment::default()
        };
        assert_eq!(extra_string(&request, &e), "1.50 KB");
    }

    /// What: Row building aligns enrichments by index and keeps order.
    ///
    /// Inputs:
    /// - Two summaries, enrichments only for the first, one installed.
    ///
    /// Output:
    /// - Rows in input order; second row has empty extra and no homepage.
    #[test]
    fn model_build_rows_aligns_and_pads() {
        let request = InfoRequest::from_flags(true, true, false, false);
        let summaries = vec![summary("requests", "2.32.5"), summary("rich", "13.7.1")];
        let enrichments = vec![Enrichment {
            license: Some("Apache-2.0".into()),
            home_page: Some("https://requests.readthedocs.io".into()),
            ..Enrichment::default()
        }];
        let idx = installed(&[("rich", "13.7.1")]);
        let rows = build_rows(summaries, enrichments, &idx, &request);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].summary.name, "requests");
        assert_eq!(rows[0].extra, "Apache-2.0");
        assert_eq!(
            rows[0].home_page.as_deref(),
            Some("https://requests.readthedocs.io")
        );
        assert_eq!(rows[0].installed, InstallState::NotInstalled);
        assert_eq!(rows[1].summary.name, "rich");
        assert_eq!(rows[1].extra, "");
        assert_eq!(rows[1].home_page, None);
        assert_eq!(rows[1].installed, InstallState::Latest);
    }
}
