//! Search-stage dispatch: ranked relevance search or pattern-based catalog
//! filtering, both producing the ordered base result list.

use std::sync::Arc;

use crate::rank;
use crate::registry::{RegistryClient, Result};
use crate::state::{PackageSummary, SearchMode, SearchQuery};

/// What: Run the search stage for `query` and return the ordered base list.
///
/// Inputs:
/// - `client`: Registry handle (blocking calls run on the blocking pool).
/// - `query`: Terms, mode, and ranked-mode limit.
///
/// Output:
/// - Ranked mode: ascending-by-score summaries truncated to the highest
///   `limit`. Pattern mode: catalog-order summaries for matching names.
///
/// Details:
/// - The heavy lifting happens inside one `spawn_blocking` call since the
///   registry client is synchronous.
pub async fn run(client: Arc<dyn RegistryClient>, query: &SearchQuery) -> Result<Vec<PackageSummary>> {
    let q = query.clone();
    tokio::task::spawn_blocking(move || match q.mode {
        SearchMode::Ranked => ranked(client.as_ref(), &q),
        SearchMode::Pattern => pattern(client.as_ref(), &q.joined()),
    })
    .await?
}

/// What: Ranked path: registry search, then score-and-truncate.
///
/// Inputs:
/// - `client`: Registry handle.
/// - `query`: Terms and limit.
///
/// Output:
/// - Ascending-by-score summaries, highest `limit` kept.
fn ranked(client: &dyn RegistryClient, query: &SearchQuery) -> Result<Vec<PackageSummary>> {
    let raw = client.search(&query.terms)?;
    tracing::debug!(candidates = raw.len(), "ranked search returned");
    let ranked = rank::rank(raw, &query.terms, &query.joined(), query.limit);
    Ok(ranked.into_iter().map(|sp| sp.package).collect())
}

/// What: Pattern path: filter the catalog by a prefix-anchored regular
/// expression and resolve each match's latest release.
///
/// Inputs:
/// - `client`: Registry handle.
/// - `pattern`: User pattern; anchored at position 0 before matching.
///
/// Output:
/// - Summaries in catalog enumeration order. Names without releases are
///   skipped; a failed lookup skips only that name.
fn pattern(client: &dyn RegistryClient, pattern: &str) -> Result<Vec<PackageSummary>> {
    let re = regex::Regex::new(&format!("^(?:{pattern})"))
        .map_err(|e| format!("invalid pattern {pattern:?}: {e}"))?;
    let names = client.list_names()?;
    tracing::debug!(catalog = names.len(), "catalog listed");

    let mut out = Vec::new();
    for name in names {
        if !re.is_match(&name) {
            continue;
        }
        match client.latest_release(&name) {
            Ok(Some(summary)) => out.push(summary),
            Ok(None) => tracing::debug!(%name, "no releases, skipped"),
            Err(e) => tracing::debug!(%name, error = %e, "lookup failed, skipped"),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ReleaseInfo;

    /// Catalog-backed fake: `latest_release` errors for names listed in
    /// `failing`, returns `None` for names in `releaseless`.
    struct FakeCatalog {
        names: Vec<String>,
        releaseless: Vec<String>,
        failing: Vec<String>,
    }

    impl RegistryClient for FakeCatalog {
        fn search(&self, _terms: &[String]) -> Result<Vec<PackageSummary>> {
            Ok(Vec::new())
        }

        fn list_names(&self) -> Result<Vec<String>> {
            Ok(self.names.clone())
        }

        fn latest_release(&self, name: &str) -> Result<Option<PackageSummary>> {
            if self.failing.iter().any(|n| n == name) {
                return Err("boom".into());
            }
            if self.releaseless.iter().any(|n| n == name) {
                return Ok(None);
            }
            Ok(Some(PackageSummary {
                name: name.to_string(),
                version: "1.0".into(),
                summary: String::new(),
            }))
        }

        fn release_info(&self, _name: &str, _version: &str) -> Result<ReleaseInfo> {
            Ok(ReleaseInfo::default())
        }
    }

    /// What: Pattern matching is anchored at the start of the name.
    ///
    /// Inputs:
    /// - Catalog with names that contain the pattern at and after position 0.
    ///
    /// Output:
    /// - Only prefix matches survive, in catalog order.
    #[test]
    fn search_pattern_is_prefix_anchored() {
        let client = FakeCatalog {
            names: vec![
                "requests".into(),
                "pyrequests".into(),
                "requests-cache".into(),
            ],
            releaseless: vec![],
            failing: vec![],
        };
        let got = pattern(&client, "req.*").expect("pattern search");
        let names: Vec<&str> = got.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["requests", "requests-cache"]);
    }

    /// What: Release-less and failing names are skipped without aborting.
    ///
    /// Inputs:
    /// - Catalog where one match has no releases and one lookup errors.
    ///
    /// Output:
    /// - Only the healthy match remains.
    #[test]
    fn search_pattern_skips_releaseless_and_failing() {
        let client = FakeCatalog {
            names: vec!["aaa".into(), "aab".into(), "aac".into()],
            releaseless: vec!["aab".into()],
            failing: vec!["aac".into()],
        };
        let got = pattern(&client, "aa").expect("pattern search");
        let names: Vec<&str> = got.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["aaa"]);
    }

    /// What: An invalid pattern is a reportable error, not a panic.
    ///
    /// Inputs:
    /// - An unbalanced parenthesis pattern.
    ///
    /// Output:
    /// - `Err` mentioning the pattern.
    #[test]
    fn search_pattern_invalid_regex_errors() {
        let client = FakeCatalog {
            names: vec![],
            releaseless: vec![],
            failing: vec![],
        };
        let err = pattern(&client, "(unclosed").expect_err("must fail");
        assert!(err.to_string().contains("invalid pattern"));
    }
}
