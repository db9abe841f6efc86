//! Application runtime: wires the search, enrichment, merge, and session
//! stages together so the binary entrypoint stays minimal.

use std::sync::Arc;

use crate::args::Args;
use crate::config;
use crate::enrich;
use crate::index;
use crate::install;
use crate::model;
use crate::registry::{RegistryClient, Result, pypi::PypiClient};
use crate::search;
use crate::session;
use crate::state::{InfoRequest, SearchMode, SearchQuery};
use crate::ui;

/// What: Run one full search-browse-act cycle.
///
/// Inputs:
/// - `args`: Parsed command line.
///
/// Output:
/// - `Ok(())` on every clean path (including zero results and user quits);
///   boxed error when the search stage itself fails.
///
/// Details:
/// - A Ctrl-C task exits the process immediately with code 0 at any point,
///   including mid-enrichment; abandoned workers die with the process.
/// - The installed snapshot and the initial search run concurrently; the
///   enrichment pool runs after both so row indices are final.
pub async fn run(args: Args) -> Result<()> {
    tokio::spawn(async {
        let _ = tokio::signal::ctrl_c().await;
        std::process::exit(0);
    });

    let settings = config::settings();
    let color = settings.color && !args.no_color;
    let request = InfoRequest::from_flags(args.license, args.homepage, args.date, args.size);
    let query = SearchQuery {
        terms: args.query,
        mode: if args.regex {
            SearchMode::Pattern
        } else {
            SearchMode::Ranked
        },
        limit: args.limit.unwrap_or(settings.limit),
    };

    let client: Arc<dyn RegistryClient> = Arc::new(PypiClient::new()?);
    let pip = install::resolve_pip(&settings);

    let (installed, found) = tokio::join!(
        index::snapshot(&pip),
        search::run(Arc::clone(&client), &query)
    );
    let found = found?;
    tracing::info!(results = found.len(), mode = ?query.mode, "search complete");
    if found.is_empty() {
        ui::no_results(&query.joined());
        return Ok(());
    }

    let enrichments = enrich::enrich_all(Arc::clone(&client), &found, &request, |done, total| {
        ui::render_progress(done, total, color);
    })
    .await;

    let rows = model::build_rows(found, enrichments, &installed, &request);
    tokio::task::spawn_blocking(move || session::run(&rows, client.as_ref(), &settings, color))
        .await?
}
