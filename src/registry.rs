//! Registry abstraction: the remote lookup operations the pipeline needs.
//!
//! The trait keeps the calls synchronous; async callers wrap them in
//! [`tokio::task::spawn_blocking`] the way the rest of the codebase wraps
//! its blocking fetchers. Everything behind the trait is replaceable, which
//! is what the pipeline tests rely on.

pub mod pypi;

use crate::state::PackageSummary;

/// Error carrier shared by all registry operations.
pub type Error = Box<dyn std::error::Error + Send + Sync>;
/// Result alias shared by all registry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Raw secondary metadata for one release, as reported by the registry.
///
/// The registry's `UNKNOWN` sentinel for license/homepage is already folded
/// into `None` here; formatting for display happens later.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReleaseInfo {
    /// License identifier, absent when unreported or unknown.
    pub license: Option<String>,
    /// Homepage URL, absent when unreported or unknown.
    pub home_page: Option<String>,
    /// ISO upload timestamp of the release archive.
    pub upload_time: Option<String>,
    /// Size of the release archive in bytes.
    pub size: Option<u64>,
}

/// The remote registry operations consumed by the search and enrichment
/// stages.
pub trait RegistryClient: Send + Sync {
    /// Raw, unordered summaries for a ranked search over `terms`.
    fn search(&self, terms: &[String]) -> Result<Vec<PackageSummary>>;

    /// The full package-name catalog in enumeration order.
    fn list_names(&self) -> Result<Vec<String>>;

    /// Most recent release of `name` as a summary; `Ok(None)` when the
    /// package has no releases.
    fn latest_release(&self, name: &str) -> Result<Option<PackageSummary>>;

    /// Secondary metadata for one specific release.
    fn release_info(&self, name: &str, version: &str) -> Result<ReleaseInfo>;
}
