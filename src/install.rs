//! External package-manager invocation: install, update, and removal via
//! pip, with the elevated-privilege retry flow.

use std::process::{Command, Stdio};

use crate::config::Settings;
use crate::registry::Result;

/// Package-manager actions the detail view can trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipAction {
    /// Install a package that is not present yet.
    Install,
    /// Upgrade an installed package to the candidate version.
    Update,
    /// Remove an installed package.
    Remove,
}

/// What: Resolve the pip executable to invoke.
///
/// Inputs:
/// - `settings`: May carry an explicit `pip_command` override.
///
/// Output:
/// - The override when set; otherwise `pip` from PATH, falling back to
///   `pip3`, falling back to the bare name `pip`.
#[must_use]
pub fn resolve_pip(settings: &Settings) -> String {
    if let Some(cmd) = &settings.pip_command
        && !cmd.trim().is_empty()
    {
        return cmd.clone();
    }
    for candidate in ["pip", "pip3"] {
        if which::which(candidate).is_ok() {
            return candidate.to_string();
        }
    }
    "pip".to_string()
}

/// What: Build the pip argument list for an action.
///
/// Inputs:
/// - `action`: Which operation to perform.
/// - `name`: Target package name.
///
/// Output:
/// - Arguments to pass to the pip executable.
#[must_use]
pub fn action_args(action: PipAction, name: &str) -> Vec<String> {
    match action {
        PipAction::Install => vec!["install".into(), name.into()],
        PipAction::Update => vec!["install".into(), "--upgrade".into(), name.into()],
        PipAction::Remove => vec!["uninstall".into(), "--yes".into(), name.into()],
    }
}

/// What: Perform a package-manager action with the privilege-retry flow.
///
/// Inputs:
/// - `action`: Operation to perform.
/// - `name`: Target package name.
/// - `settings`: Pip override and the privileged-by-default toggle.
/// - `confirm_elevated`: Asked once when the non-privileged attempt fails;
///   returning `false` abandons the action.
///
/// Output:
/// - `Ok(())` in every recovered path; the elevated invocation's status is
///   not inspected.
///
/// Details:
/// - With `assume_sudo` set, the non-privileged attempt is skipped.
/// - The subprocess inherits the terminal so pip's own output and prompts
///   work as usual.
pub fn perform(
    action: PipAction,
    name: &str,
    settings: &Settings,
    confirm_elevated: impl FnOnce() -> bool,
) -> Result<()> {
    let pip = resolve_pip(settings);
    let args = action_args(action, name);

    if settings.assume_sudo {
        run_elevated(&pip, &args);
        return Ok(());
    }

    let succeeded = match run_pip(&pip, &args) {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!(%pip, error = %e, "pip invocation failed to start");
            false
        }
    };
    if succeeded {
        return Ok(());
    }
    if confirm_elevated() {
        run_elevated(&pip, &args);
    }
    Ok(())
}

/// What: Run pip non-privileged with an inherited terminal.
///
/// Inputs:
/// - `pip`: Executable.
/// - `args`: Argument list.
///
/// Output:
/// - `Ok(true)` on zero exit, `Ok(false)` on non-zero, boxed error when the
///   process cannot be spawned.
fn run_pip(pip: &str, args: &[String]) -> Result<bool> {
    tracing::info!(%pip, ?args, "running package manager");
    let status = Command::new(pip)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;
    Ok(status.success())
}

/// What: Run pip through sudo; the result is not inspected.
///
/// Inputs:
/// - `pip`: Executable.
/// - `args`: Argument list.
///
/// Output:
/// - None; failures only reach the log.
fn run_elevated(pip: &str, args: &[String]) {
    tracing::info!(%pip, ?args, "running package manager elevated");
    let result = Command::new("sudo")
        .arg(pip)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status();
    if let Err(e) = result {
        tracing::warn!(error = %e, "elevated invocation failed to start");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// What: Argument builders match the pip command line per action.
    ///
    /// Inputs:
    /// - Each action with a sample package name.
    ///
    /// Output:
    /// - `install`, `install --upgrade`, and `uninstall --yes` argument
    ///   lists.
    #[test]
    fn install_action_args_per_action() {
        assert_eq!(action_args(PipAction::Install, "requests"), ["install", "requests"]);
        assert_eq!(
            action_args(PipAction::Update, "requests"),
            ["install", "--upgrade", "requests"]
        );
        assert_eq!(
            action_args(PipAction::Remove, "requests"),
            ["uninstall", "--yes", "requests"]
        );
    }

    /// What: An explicit pip override wins over discovery.
    ///
    /// Inputs:
    /// - Settings with `pip_command` set; and with a blank override.
    ///
    /// Output:
    /// - The override verbatim; a non-empty discovered fallback otherwise.
    #[test]
    fn install_resolve_pip_prefers_override() {
        let with_override = Settings {
            pip_command: Some("/opt/py/bin/pip".into()),
            ..Settings::default()
        };
        assert_eq!(resolve_pip(&with_override), "/opt/py/bin/pip");

        let blank = Settings {
            pip_command: Some("   ".into()),
            ..Settings::default()
        };
        let resolved = resolve_pip(&blank);
        assert!(resolved == "pip" || resolved == "pip3");
    }
}
