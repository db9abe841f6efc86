//! Terminal rendering: the results list, the detail view, the enrichment
//! progress bar, and line-oriented prompts.
//!
//! Color is optional everywhere; when disabled the same text is emitted
//! unstyled, so output stays grep-friendly in pipes and tests.

use std::io::{BufRead, Write};

use crossterm::style::Stylize;
use unicode_width::UnicodeWidthStr;

use crate::state::{DisplayRow, Enrichment, InstallState};

/// Width of the progress bar in characters.
const BAR_WIDTH: usize = 24;

/// What: Human-readable installed-state annotation for a row.
///
/// Inputs:
/// - `state`: Installed-state of the row.
///
/// Output:
/// - `"not installed"`, `"installed, latest"`, or
///   `"installed (VERSION)"` for stale installs.
#[must_use]
pub fn install_label(state: &InstallState) -> String {
    match state {
        InstallState::NotInstalled => "not installed".to_string(),
        InstallState::Latest => "installed, latest".to_string(),
        InstallState::Stale(v) => format!("installed ({v})"),
    }
}

/// What: Render the full results list in search order.
///
/// Inputs:
/// - `rows`: Merged display rows.
/// - `color`: Whether to style the output.
///
/// Output:
/// - Writes the list to stdout; the highest-ranked entries end up closest
///   to the prompt below.
pub fn render_list(rows: &[DisplayRow], color: bool) {
    let name_col = rows
        .iter()
        .map(|r| head_of(r).width())
        .max()
        .unwrap_or(0);
    let index_col = rows.len().saturating_sub(1).to_string().len();

    let mut out = std::io::stdout().lock();
    for (i, row) in rows.iter().enumerate() {
        let head = head_of(row);
        let pad = " ".repeat(name_col.saturating_sub(head.width()));
        let label = install_label(&row.installed);
        let head_styled = if color {
            head.clone().bold().to_string()
        } else {
            head.clone()
        };
        let label_styled = paint_label(&label, &row.installed, color);
        let mut line = format!("{i:>index_col$}  {head_styled}{pad}  [{label_styled}]");
        if !row.extra.is_empty() {
            let extra = if color {
                row.extra.clone().dark_grey().to_string()
            } else {
                row.extra.clone()
            };
            line.push_str("  ");
            line.push_str(&extra);
        }
        let _ = writeln!(out, "{line}");
        let indent = " ".repeat(index_col + 2);
        if let Some(url) = &row.home_page {
            let url_styled = if color {
                url.clone().underlined().to_string()
            } else {
                url.clone()
            };
            let _ = writeln!(out, "{indent}{url_styled}");
        }
        if !row.summary.summary.is_empty() {
            let _ = writeln!(out, "{indent}{}", row.summary.summary);
        }
    }
    let _ = out.flush();
}

/// What: Render the detail view for one row.
///
/// Inputs:
/// - `row`: The selected row.
/// - `detail`: Freshly fetched metadata (all kinds requested).
/// - `color`: Whether to style the output.
///
/// Output:
/// - Writes the detail block and the action menu to stdout.
pub fn render_detail(row: &DisplayRow, detail: &Enrichment, color: bool) {
    let title = format!("{} {}", row.summary.name, row.summary.version);
    let title = if color {
        title.bold().to_string()
    } else {
        title
    };
    let mut out = std::io::stdout().lock();
    let _ = writeln!(out, "\n{title}");
    let label = install_label(&row.installed);
    let _ = writeln!(out, "  state   : {}", paint_label(&label, &row.installed, color));
    if !row.summary.summary.is_empty() {
        let _ = writeln!(out, "  summary : {}", row.summary.summary);
    }
    if let Some(v) = &detail.license {
        let _ = writeln!(out, "  license : {v}");
    }
    if let Some(v) = &detail.home_page {
        let _ = writeln!(out, "  homepage: {v}");
    }
    if let Some(v) = &detail.date {
        let _ = writeln!(out, "  date    : {v}");
    }
    if let Some(v) = &detail.size {
        let _ = writeln!(out, "  size    : {v}");
    }
    let _ = writeln!(out, "\n{}", action_menu(row, detail));
    let _ = out.flush();
}

/// What: Build the action menu matching the row's preconditions.
///
/// Inputs:
/// - `row`: Selected row (installed state).
/// - `detail`: Fetched metadata (homepage presence).
///
/// Output:
/// - One line listing the applicable keys; anything else quits.
#[must_use]
pub fn action_menu(row: &DisplayRow, detail: &Enrichment) -> String {
    let mut parts = vec!["b: back".to_string()];
    match &row.installed {
        InstallState::NotInstalled => parts.push("i: install".to_string()),
        InstallState::Stale(_) => {
            parts.push("u: update".to_string());
            parts.push("r: remove".to_string());
        }
        InstallState::Latest => parts.push("r: remove".to_string()),
    }
    if detail.home_page.is_some() {
        parts.push("o: open homepage".to_string());
    }
    format!("{} (anything else quits)", parts.join(", "))
}

/// What: Paint the installed-state label when color is on.
///
/// Inputs:
/// - `label`: Text to paint.
/// - `state`: Drives the color choice.
/// - `color`: Whether to style at all.
///
/// Output:
/// - Styled or plain label text.
fn paint_label(label: &str, state: &InstallState, color: bool) -> String {
    if !color {
        return label.to_string();
    }
    match state {
        InstallState::NotInstalled => label.dark_grey().to_string(),
        InstallState::Latest => label.green().to_string(),
        InstallState::Stale(_) => label.yellow().to_string(),
    }
}

/// What: The list head: `name (version)`.
///
/// Inputs:
/// - `row`: Row to format.
///
/// Output:
/// - Unstyled head text (styling is applied after width measurement).
fn head_of(row: &DisplayRow) -> String {
    format!("{} ({})", row.summary.name, row.summary.version)
}

/// What: Redraw the enrichment progress bar in place.
///
/// Inputs:
/// - `done`: Completed jobs so far.
/// - `total`: Total job count (non-zero when called).
/// - `color`: Whether to style the output.
///
/// Output:
/// - Rewrites the current line; emits the terminating newline at 100%.
pub fn render_progress(done: usize, total: usize, color: bool) {
    let pct = if total == 0 {
        100
    } else {
        done * 100 / total
    };
    let filled = if total == 0 {
        BAR_WIDTH
    } else {
        done * BAR_WIDTH / total
    };
    let bar = format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled)
    );
    let bar = if color {
        bar.cyan().to_string()
    } else {
        bar
    };
    let mut out = std::io::stdout().lock();
    let _ = write!(out, "\rfetching metadata {bar} {pct:>3}% ({done}/{total})");
    if done >= total {
        let _ = writeln!(out);
    }
    let _ = out.flush();
}

/// What: Print `message` and read one line of input.
///
/// Inputs:
/// - `message`: Prompt text, printed without a trailing newline.
///
/// Output:
/// - `Some(trimmed_line)` on success, `None` on EOF or read failure.
#[must_use]
pub fn prompt(message: &str) -> Option<String> {
    {
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "{message}");
        let _ = out.flush();
    }
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

/// What: Print the empty-result notice.
///
/// Inputs:
/// - `query`: The original query text.
///
/// Output:
/// - One line on stdout.
pub fn no_results(query: &str) {
    println!("No packages found for {query:?}.");
}

/// What: Print a short error notice to stderr.
///
/// Inputs:
/// - `message`: One-line description; never a backtrace.
///
/// Output:
/// - One line on stderr.
pub fn error(message: &str) {
    eprintln!("pipseek: {message}");
}
