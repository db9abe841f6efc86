//! Relevance scoring and ordering for ranked searches.

use crate::state::PackageSummary;
use crate::util::count_occurrences;

/// Score awarded when the candidate name equals the full query verbatim.
const EXACT_NAME_SCORE: usize = 1000;
/// Weight of a query-term occurrence inside the candidate name.
const NAME_WEIGHT: usize = 3;
/// Weight of a query-term occurrence inside the candidate summary.
const SUMMARY_WEIGHT: usize = 1;

/// A summary paired with its relevance score.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoredPackage {
    /// Relevance score; higher is more relevant.
    pub score: usize,
    /// The scored summary.
    pub package: PackageSummary,
}

/// What: Score one candidate against the query.
///
/// Inputs:
/// - `terms`: Individual query terms.
/// - `full_query`: Terms joined by single spaces (for exact-name matching).
/// - `item`: Candidate summary.
///
/// Output:
/// - 1000 for an exact (case-insensitive) name match, plus 3 per term
///   occurrence in the name and 1 per occurrence in the summary.
#[must_use]
pub fn score(terms: &[String], full_query: &str, item: &PackageSummary) -> usize {
    let name = item.name.to_lowercase();
    let summary = item.summary.to_lowercase();
    let query = full_query.to_lowercase();

    let mut total = if name == query { EXACT_NAME_SCORE } else { 0 };
    for term in terms {
        let t = term.to_lowercase();
        total += NAME_WEIGHT * count_occurrences(&name, &t);
        total += SUMMARY_WEIGHT * count_occurrences(&summary, &t);
    }
    total
}

/// What: Order candidates ascending by score and keep the highest `limit`.
///
/// Inputs:
/// - `items`: Raw unordered candidates from the registry.
/// - `terms`: Individual query terms.
/// - `full_query`: Terms joined by single spaces.
/// - `limit`: Number of top entries to keep; `0` keeps nothing.
///
/// Output:
/// - Ascending-by-score sequence truncated from the front so only the
///   `limit` highest scores remain; equal scores keep discovery order
///   (stable sort).
#[must_use]
pub fn rank(
    items: Vec<PackageSummary>,
    terms: &[String],
    full_query: &str,
    limit: usize,
) -> Vec<ScoredPackage> {
    let mut scored: Vec<ScoredPackage> = items
        .into_iter()
        .map(|package| ScoredPackage {
            score: score(terms, full_query, &package),
            package,
        })
        .collect();
    scored.sort_by_key(|sp| sp.score);
    let cut = scored.len().saturating_sub(limit);
    scored.split_off(cut)
}
