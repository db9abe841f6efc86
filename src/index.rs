//! Installed-package snapshot.
//!
//! The local pip environment is queried exactly once at startup; the
//! resulting name → version map is read-only for the rest of the run and is
//! what the list model annotates rows against.

use std::collections::HashMap;

use serde_json::Value;

use crate::state::InstalledIndex;
use crate::util::s;

/// What: Snapshot the locally installed packages via `pip list`.
///
/// Inputs:
/// - `pip`: Resolved pip executable.
///
/// Output:
/// - Installed index; empty when pip is missing or its output is
///   unparseable (annotations then fall back to "not installed").
///
/// Details:
/// - Runs on the blocking pool; the JSON format avoids locale- and
///   layout-dependent parsing of the human-readable table.
pub async fn snapshot(pip: &str) -> InstalledIndex {
    let pip = pip.to_string();
    match tokio::task::spawn_blocking(move || run_pip_list(&pip)).await {
        Ok(Ok(body)) => {
            let index = parse_pip_list(&body);
            tracing::debug!(installed = index.len(), "installed snapshot taken");
            index
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "pip list failed; treating nothing as installed");
            InstalledIndex::default()
        }
        Err(e) => {
            tracing::warn!(error = %e, "pip list task failed");
            InstalledIndex::default()
        }
    }
}

/// What: Execute `pip list --format=json` and return its stdout.
///
/// Inputs:
/// - `pip`: Pip executable to invoke.
///
/// Output:
/// - `Ok(String)` with UTF-8 stdout on success; boxed error otherwise.
fn run_pip_list(pip: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let out = std::process::Command::new(pip)
        .args(["list", "--format=json", "--disable-pip-version-check"])
        .output()?;
    if !out.status.success() {
        return Err(format!("{pip} list exited with {:?}", out.status).into());
    }
    Ok(String::from_utf8(out.stdout)?)
}

/// What: Parse `pip list --format=json` output into an installed index.
///
/// Inputs:
/// - `body`: JSON array of `{name, version}` objects.
///
/// Output:
/// - Installed index; entries without a name are dropped, malformed input
///   yields an empty index.
#[must_use]
pub fn parse_pip_list(body: &str) -> InstalledIndex {
    let Ok(v) = serde_json::from_str::<Value>(body) else {
        return InstalledIndex::default();
    };
    let mut map = HashMap::new();
    if let Some(arr) = v.as_array() {
        for entry in arr {
            let name = s(entry, "name");
            if name.is_empty() {
                continue;
            }
            map.insert(name, s(entry, "version"));
        }
    }
    InstalledIndex::new(map)
}
