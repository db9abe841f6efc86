//! The interactive browsing state machine.
//!
//! Two states, List and Detail, driven by line input. The loop is an
//! explicit finite-state transition function, so repeated homepage opens
//! self-loop without growing the stack. Every unrecognized input — and any
//! action whose precondition does not hold — ends the session cleanly.

use std::process::{Command, Stdio};

use crate::config::Settings;
use crate::enrich;
use crate::install::{self, PipAction};
use crate::registry::{RegistryClient, Result};
use crate::state::{DisplayRow, Enrichment, InfoRequest, InstallState};
use crate::ui;

/// Outcome of one Detail-state input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailAction {
    /// Return to the list without re-fetching.
    Back,
    /// Install the package (only when not installed).
    Install,
    /// Upgrade the package (only when installed at another version).
    Update,
    /// Remove the package (only when installed).
    Remove,
    /// Open the homepage and stay in the detail view.
    OpenHomepage,
    /// End the session.
    Quit,
}

/// Session state: which view is active.
enum View {
    /// The results list.
    List,
    /// Detail for one row, carrying its fetched metadata so homepage
    /// self-loops and re-renders need no new network calls.
    Detail(usize, Enrichment),
}

/// What: Parse a list-selection input.
///
/// Inputs:
/// - `input`: Raw line from the user.
/// - `len`: Number of rows.
///
/// Output:
/// - `Some(index)` for a numeric, in-range selection; `None` otherwise
///   (which terminates the session).
#[must_use]
pub fn parse_selection(input: &str, len: usize) -> Option<usize> {
    let index = input.trim().parse::<usize>().ok()?;
    (index < len).then_some(index)
}

/// What: Map a Detail-state input to its action, enforcing preconditions.
///
/// Inputs:
/// - `input`: Raw line from the user.
/// - `state`: Installed-state of the selected row.
/// - `has_homepage`: Whether a homepage is known for the row.
///
/// Output:
/// - The matching action; `Quit` for unrecognized keys and for keys whose
///   precondition does not hold.
#[must_use]
pub fn detail_action(input: &str, state: &InstallState, has_homepage: bool) -> DetailAction {
    match input.trim() {
        "b" => DetailAction::Back,
        "i" if !state.is_installed() => DetailAction::Install,
        "u" if matches!(state, InstallState::Stale(_)) => DetailAction::Update,
        "r" if state.is_installed() => DetailAction::Remove,
        "o" if has_homepage => DetailAction::OpenHomepage,
        _ => DetailAction::Quit,
    }
}

/// What: Drive the List/Detail loop until the user quits or completes an
/// action.
///
/// Inputs:
/// - `rows`: Merged display rows in search order.
/// - `client`: Registry handle for on-demand detail fetches.
/// - `settings`: Pip and privilege configuration.
/// - `color`: Whether to style output.
///
/// Output:
/// - `Ok(())` on every clean exit path.
///
/// Details:
/// - Runs blocking I/O (stdin, pip, detail fetches); callers invoke it off
///   the async runtime.
pub fn run(
    rows: &[DisplayRow],
    client: &dyn RegistryClient,
    settings: &Settings,
    color: bool,
) -> Result<()> {
    let mut view = View::List;
    loop {
        view = match view {
            View::List => {
                ui::render_list(rows, color);
                let Some(input) = ui::prompt("Select a package number (anything else quits): ")
                else {
                    return Ok(());
                };
                let Some(index) = parse_selection(&input, rows.len()) else {
                    tracing::debug!(%input, "selection ended the session");
                    return Ok(());
                };
                let Some(row) = rows.get(index) else {
                    return Ok(());
                };
                View::Detail(index, fetch_detail(client, row))
            }
            View::Detail(index, detail) => {
                let Some(row) = rows.get(index) else {
                    return Ok(());
                };
                ui::render_detail(row, &detail, color);
                let Some(input) = ui::prompt("> ") else {
                    return Ok(());
                };
                match detail_action(&input, &row.installed, detail.home_page.is_some()) {
                    DetailAction::Back => View::List,
                    DetailAction::OpenHomepage => {
                        if let Some(url) = &detail.home_page {
                            open_homepage(url);
                        }
                        View::Detail(index, detail)
                    }
                    DetailAction::Install => {
                        return run_action(PipAction::Install, row, settings);
                    }
                    DetailAction::Update => {
                        return run_action(PipAction::Update, row, settings);
                    }
                    DetailAction::Remove => {
                        return run_action(PipAction::Remove, row, settings);
                    }
                    DetailAction::Quit => {
                        tracing::debug!(%input, "detail input ended the session");
                        return Ok(());
                    }
                }
            }
        };
    }
}

/// What: Fetch the full metadata set for the detail view.
///
/// Inputs:
/// - `client`: Registry handle.
/// - `row`: Selected row.
///
/// Output:
/// - All four kinds when the fetch succeeds; otherwise the data already
///   known from the list stage (fail-soft).
fn fetch_detail(client: &dyn RegistryClient, row: &DisplayRow) -> Enrichment {
    match client.release_info(&row.summary.name, &row.summary.version) {
        Ok(info) => enrich::extract(&InfoRequest::all(), &info),
        Err(e) => {
            tracing::debug!(name = %row.summary.name, error = %e, "detail fetch failed");
            Enrichment {
                home_page: row.home_page.clone(),
                ..Enrichment::default()
            }
        }
    }
}

/// What: Perform a package-manager action, asking before any sudo retry.
///
/// Inputs:
/// - `action`: Operation to perform.
/// - `row`: Target row.
/// - `settings`: Pip and privilege configuration.
///
/// Output:
/// - `Ok(())`; the session ends after a completed action.
fn run_action(action: PipAction, row: &DisplayRow, settings: &Settings) -> Result<()> {
    install::perform(action, &row.summary.name, settings, || {
        matches!(
            ui::prompt("Command failed. Retry with elevated privileges? [y/N]: ").as_deref(),
            Some("y" | "Y")
        )
    })
}

/// What: Open `url` in the user's browser, fire-and-forget.
///
/// Inputs:
/// - `url`: Full homepage URL as stored on the row.
///
/// Output:
/// - None; spawn failures only reach the log.
fn open_homepage(url: &str) {
    let result = Command::new("xdg-open")
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    match result {
        Ok(_) => tracing::debug!(%url, "opened homepage"),
        Err(e) => tracing::warn!(%url, error = %e, "failed to open homepage"),
    }
}
