//! User settings and on-disk paths.
//!
//! Settings live in `~/.config/pipseek/pipseek.conf` as plain `key = value`
//! lines; anything missing or malformed falls back to the defaults so a bad
//! config can never keep the tool from starting. Logs go to a `logs/`
//! subdirectory next to the config file.

use std::env;
use std::path::{Path, PathBuf};

/// Tunable settings read once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Default ranked-search result limit when `--limit` is not given.
    pub limit: usize,
    /// Explicit pip executable; `None` means discover `pip`/`pip3` on PATH.
    pub pip_command: Option<String>,
    /// Skip the non-privileged attempt and invoke pip through sudo directly.
    pub assume_sudo: bool,
    /// Colored output unless disabled here or via `--no-color`.
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            limit: 100,
            pip_command: None,
            assume_sudo: false,
            color: true,
        }
    }
}

/// What: Check whether a config line should be skipped (empty or comment).
///
/// Inputs:
/// - `line`: Raw line from the config file.
///
/// Output:
/// - `true` for empty lines and lines starting with `#`, `//`, or `;`.
fn skip_comment_or_empty(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.starts_with("//")
        || trimmed.starts_with(';')
}

/// What: Parse one `key = value` line.
///
/// Inputs:
/// - `line`: Line possibly containing a `=` separator.
///
/// Output:
/// - `Some((key, value))` with both sides trimmed, `None` without a `=`.
fn parse_key_value(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim();
    if !trimmed.contains('=') {
        return None;
    }
    let mut parts = trimmed.splitn(2, '=');
    let key = parts.next()?.trim().to_string();
    let value = parts.next()?.trim().to_string();
    Some((key, value))
}

/// What: Parse a boolean setting value.
///
/// Inputs:
/// - `val`: Raw value text.
///
/// Output:
/// - `Some(bool)` for true/false/yes/no/on/off/1/0, else `None`.
fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// What: Apply config file `content` on top of the defaults.
///
/// Inputs:
/// - `content`: Full text of the config file.
///
/// Output:
/// - Settings with every recognized key applied; unknown keys and
///   unparseable values are ignored.
#[must_use]
pub fn parse_settings(content: &str) -> Settings {
    let mut out = Settings::default();
    for line in content.lines() {
        if skip_comment_or_empty(line) {
            continue;
        }
        let Some((raw_key, val)) = parse_key_value(line) else {
            continue;
        };
        let key = raw_key.to_lowercase().replace(['.', '-', ' '], "_");
        match key.as_str() {
            "limit" => {
                if let Ok(v) = val.parse::<usize>() {
                    out.limit = v;
                }
            }
            "pip_command" => {
                if !val.is_empty() {
                    out.pip_command = Some(val);
                }
            }
            "assume_sudo" => {
                if let Some(v) = parse_bool(&val) {
                    out.assume_sudo = v;
                }
            }
            "color" => {
                if let Some(v) = parse_bool(&val) {
                    out.color = v;
                }
            }
            _ => {}
        }
    }
    out
}

/// What: Load settings from the config file in [`config_dir`].
///
/// Inputs:
/// - None.
///
/// Output:
/// - Parsed settings, or the defaults when the file is missing/unreadable.
#[must_use]
pub fn settings() -> Settings {
    let path = config_dir().join("pipseek.conf");
    match std::fs::read_to_string(&path) {
        Ok(content) => parse_settings(&content),
        Err(_) => Settings::default(),
    }
}

/// What: Resolve an XDG base directory from environment or `$HOME` segments.
///
/// Inputs:
/// - `var`: Environment variable to check (e.g. `XDG_CONFIG_HOME`).
/// - `home_default`: Fallback segments relative to `$HOME`.
///
/// Output:
/// - Resolved base directory path.
fn xdg_base_dir(var: &str, home_default: &[&str]) -> PathBuf {
    if let Ok(p) = env::var(var)
        && !p.trim().is_empty()
    {
        return PathBuf::from(p);
    }
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let mut base = PathBuf::from(home);
    for seg in home_default {
        base = base.join(seg);
    }
    base
}

/// What: Return `$HOME/.config/pipseek`, ensuring it exists.
///
/// Inputs: none
///
/// Output:
/// - `Some(PathBuf)` when HOME is set and the directory can be created.
fn home_config_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        let dir = Path::new(&home).join(".config").join("pipseek");
        if std::fs::create_dir_all(&dir).is_ok() {
            return Some(dir);
        }
    }
    None
}

/// Config directory for pipseek (ensured to exist).
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(dir) = home_config_dir() {
        return dir;
    }
    let base = xdg_base_dir("XDG_CONFIG_HOME", &[".config"]);
    let dir = base.join("pipseek");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Logs directory under config (ensured to exist).
#[must_use]
pub fn logs_dir() -> PathBuf {
    let dir = config_dir().join("logs");
    let _ = std::fs::create_dir_all(&dir);
    dir
}
