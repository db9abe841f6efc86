//! Bounded concurrent metadata enrichment.
//!
//! A fixed pool of worker tasks pulls per-package fetch jobs from a shared
//! queue, calls the registry's metadata endpoint, and publishes
//! display-ready results tagged with the originating row index. The
//! coordinator merges results into a position-indexed arena, so worker
//! completion order can never reorder the list, counts completions itself
//! (one per result message, no shared-write counter), and joins every
//! worker before returning.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use crate::registry::{RegistryClient, ReleaseInfo};
use crate::state::{Enrichment, InfoKind, InfoRequest, PackageSummary};
use crate::util::{human_size, short_date};

/// Maximum number of concurrent fetch workers.
pub const POOL_SIZE: usize = 16;

/// One fetch job: which row, which release.
struct Job {
    /// Position of the summary in the ordered result list; the stable
    /// correlation key (names may repeat).
    index: usize,
    /// Package name to fetch.
    name: String,
    /// Release version to fetch.
    version: String,
}

/// What: Fetch the requested metadata kinds for every summary concurrently.
///
/// Inputs:
/// - `client`: Registry handle shared by the workers.
/// - `items`: Ordered base results; output is aligned index-for-index.
/// - `request`: Metadata kinds to fetch; identical for all rows.
/// - `on_progress`: Invoked with `(done, total)` once per completed job,
///   `done` covering `1..=total` with no value skipped or repeated.
///
/// Output:
/// - One enrichment per input row, in input order. Rows whose fetch failed
///   carry an empty enrichment.
///
/// Details:
/// - An empty `request` or empty `items` performs no network activity and
///   reports no progress.
/// - At most [`POOL_SIZE`] workers run, never more than there are jobs.
/// - Returns only after every worker has been joined.
pub async fn enrich_all(
    client: Arc<dyn RegistryClient>,
    items: &[PackageSummary],
    request: &InfoRequest,
    mut on_progress: impl FnMut(usize, usize),
) -> Vec<Enrichment> {
    let total = items.len();
    let mut out = vec![Enrichment::default(); total];
    if request.is_empty() || total == 0 {
        return out;
    }

    let (job_tx, job_rx) = mpsc::channel::<Job>(total);
    for (index, item) in items.iter().enumerate() {
        let job = Job {
            index,
            name: item.name.clone(),
            version: item.version.clone(),
        };
        // Capacity equals the job count, so this never blocks.
        if job_tx.send(job).await.is_err() {
            break;
        }
    }
    drop(job_tx);
    let job_rx = Arc::new(Mutex::new(job_rx));

    let (result_tx, mut result_rx) = mpsc::unbounded_channel::<(usize, Enrichment)>();
    let workers = POOL_SIZE.min(total);
    let mut handles = Vec::with_capacity(workers);
    for _ in 0..workers {
        let job_rx = Arc::clone(&job_rx);
        let result_tx = result_tx.clone();
        let client = Arc::clone(&client);
        let request = request.clone();
        handles.push(tokio::spawn(async move {
            loop {
                let job = { job_rx.lock().await.recv().await };
                let Some(job) = job else { break };
                let enrichment = fetch_one(&client, &request, &job).await;
                if result_tx.send((job.index, enrichment)).is_err() {
                    break;
                }
            }
        }));
    }
    drop(result_tx);

    let mut done = 0usize;
    while done < total {
        let Some((index, enrichment)) = result_rx.recv().await else {
            break;
        };
        if let Some(slot) = out.get_mut(index) {
            *slot = enrichment;
        }
        done += 1;
        on_progress(done, total);
    }

    // Explicit completion barrier; by now all queues are drained, so this
    // only reaps finished tasks.
    futures::future::join_all(handles).await;
    out
}

/// What: Run one job's blocking metadata fetch and shape the result.
///
/// Inputs:
/// - `client`: Registry handle.
/// - `request`: Kinds to extract.
/// - `job`: Target release and row index.
///
/// Output:
/// - Extracted enrichment; empty when the fetch fails (fail-soft).
async fn fetch_one(
    client: &Arc<dyn RegistryClient>,
    request: &InfoRequest,
    job: &Job,
) -> Enrichment {
    let client = Arc::clone(client);
    let name = job.name.clone();
    let version = job.version.clone();
    let fetched =
        tokio::task::spawn_blocking(move || client.release_info(&name, &version)).await;
    match fetched {
        Ok(Ok(info)) => extract(request, &info),
        Ok(Err(e)) => {
            tracing::debug!(name = %job.name, error = %e, "metadata fetch failed");
            Enrichment::default()
        }
        Err(e) => {
            tracing::debug!(name = %job.name, error = %e, "metadata task failed");
            Enrichment::default()
        }
    }
}

/// What: Extract only the requested kinds from raw release metadata,
/// formatting size and date for display.
///
/// Inputs:
/// - `request`: Kinds to keep.
/// - `info`: Raw metadata (unknown license/homepage already absent).
///
/// Output:
/// - Display-ready enrichment; unrequested kinds stay absent.
#[must_use]
pub fn extract(request: &InfoRequest, info: &ReleaseInfo) -> Enrichment {
    let mut out = Enrichment::default();
    if request.contains(InfoKind::License) {
        out.license = info.license.clone();
    }
    if request.contains(InfoKind::HomePage) {
        out.home_page = info.home_page.clone();
    }
    if request.contains(InfoKind::Date) {
        out.date = info.upload_time.as_deref().and_then(short_date);
    }
    if request.contains(InfoKind::Size) {
        out.size = info.size.map(human_size);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Result;
    use std::time::Duration;

    /// Fake registry whose per-package latency is derived from the name, so
    /// completion order scrambles relative to submission order.
    struct StaggeredRegistry {
        /// Names whose metadata fetch fails outright.
        failing: Vec<String>,
    }

    impl RegistryClient for StaggeredRegistry {
        fn search(&self, _terms: &[String]) -> Result<Vec<PackageSummary>> {
            Ok(Vec::new())
        }

        fn list_names(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn latest_release(&self, _name: &str) -> Result<Option<PackageSummary>> {
            Ok(None)
        }

        fn release_info(&self, name: &str, version: &str) -> Result<ReleaseInfo> {
            let jitter = u64::from(name.bytes().fold(0u8, u8::wrapping_add)) % 7;
            std::thread::sleep(Duration::from_millis(jitter));
            if self.failing.iter().any(|n| n == name) {
                return Err("simulated network error".into());
            }
            Ok(ReleaseInfo {
                license: Some(format!("LIC-{name}")),
                home_page: Some(format!("https://example.org/{name}")),
                upload_time: Some("2024-05-29T15:04:05Z".into()),
                size: Some(1024 * (u64::from(name.len() as u8) + version.len() as u64)),
            })
        }
    }

    fn summaries(n: usize) -> Vec<PackageSummary> {
        (0..n)
            .map(|i| PackageSummary {
                name: format!("pkg-{i}"),
                version: "1.0".into(),
                summary: String::new(),
            })
            .collect()
    }

    /// What: Output order equals input order despite scrambled completion.
    ///
    /// Inputs:
    /// - 40 packages with name-derived latencies, license+size requested.
    ///
    /// Output:
    /// - Enrichment `i` carries the license derived from package `i`.
    #[tokio::test(flavor = "multi_thread")]
    async fn enrich_preserves_input_order() {
        let client: Arc<dyn RegistryClient> = Arc::new(StaggeredRegistry { failing: vec![] });
        let items = summaries(40);
        let request = InfoRequest::from_flags(true, false, false, true);
        let got = enrich_all(client, &items, &request, |_, _| {}).await;
        assert_eq!(got.len(), 40);
        for (i, e) in got.iter().enumerate() {
            assert_eq!(e.license.as_deref(), Some(format!("LIC-pkg-{i}").as_str()));
            assert!(e.size.is_some());
            // Unrequested kinds stay absent.
            assert!(e.home_page.is_none());
            assert!(e.date.is_none());
        }
    }

    /// What: Progress hits every value 1..=N exactly once, for the
    /// documented job counts.
    ///
    /// Inputs:
    /// - N ∈ {0, 1, 16, 100} packages with license requested.
    ///
    /// Output:
    /// - Recorded progress sequence equals `[1, 2, …, N]`.
    #[tokio::test(flavor = "multi_thread")]
    async fn enrich_progress_counts_every_job_once() {
        for n in [0usize, 1, 16, 100] {
            let client: Arc<dyn RegistryClient> = Arc::new(StaggeredRegistry { failing: vec![] });
            let items = summaries(n);
            let request = InfoRequest::from_flags(true, false, false, false);
            let mut seen = Vec::new();
            let got = enrich_all(client, &items, &request, |done, total| {
                assert_eq!(total, n);
                seen.push(done);
            })
            .await;
            assert_eq!(got.len(), n);
            let expected: Vec<usize> = (1..=n).collect();
            assert_eq!(seen, expected, "progress sequence for N={n}");
        }
    }

    /// What: An empty request performs no fetches and reports no progress.
    ///
    /// Inputs:
    /// - 8 packages, empty request.
    ///
    /// Output:
    /// - All-empty enrichments and zero progress callbacks.
    #[tokio::test(flavor = "multi_thread")]
    async fn enrich_empty_request_short_circuits() {
        let client: Arc<dyn RegistryClient> = Arc::new(StaggeredRegistry { failing: vec![] });
        let items = summaries(8);
        let mut calls = 0usize;
        let got = enrich_all(client, &items, &InfoRequest::default(), |_, _| calls += 1).await;
        assert_eq!(got.len(), 8);
        assert!(got.iter().all(|e| *e == Enrichment::default()));
        assert_eq!(calls, 0);
    }

    /// What: One failing fetch degrades only its own row.
    ///
    /// Inputs:
    /// - 5 packages, one of which fails, license requested.
    ///
    /// Output:
    /// - The failing row is empty; the other four carry data; progress
    ///   still reaches 5.
    #[tokio::test(flavor = "multi_thread")]
    async fn enrich_failure_is_partial_and_counted() {
        let client: Arc<dyn RegistryClient> = Arc::new(StaggeredRegistry {
            failing: vec!["pkg-2".into()],
        });
        let items = summaries(5);
        let request = InfoRequest::from_flags(true, false, false, false);
        let mut last = 0usize;
        let got = enrich_all(client, &items, &request, |done, _| last = done).await;
        assert_eq!(last, 5);
        assert_eq!(got[2], Enrichment::default());
        for (i, e) in got.iter().enumerate() {
            if i != 2 {
                assert!(e.license.is_some(), "row {i} should have data");
            }
        }
    }

    /// What: Extraction honors the requested kinds and formats values.
    ///
    /// Inputs:
    /// - Full metadata, date+size requested.
    ///
    /// Output:
    /// - Only date and size set, date shortened, size humanized.
    #[test]
    fn enrich_extract_requested_kinds_only() {
        let info = ReleaseInfo {
            license: Some("MIT".into()),
            home_page: Some("https://example.org".into()),
            upload_time: Some("2024-05-29T15:04:05.000000Z".into()),
            size: Some(1536),
        };
        let request = InfoRequest::from_flags(false, false, true, true);
        let got = extract(&request, &info);
        assert_eq!(got.license, None);
        assert_eq!(got.home_page, None);
        assert_eq!(got.date.as_deref(), Some("05/29/24"));
        assert_eq!(got.size.as_deref(), Some("1.50 KB"));
    }
}
