//! Small utility helpers for URL encoding, JSON field extraction, and
//! size/date display formatting.
//!
//! The functions in this module are intentionally lightweight; they are used
//! by the registry client, the enrichment workers, and the UI.

use serde_json::Value;
use std::fmt::Write;

/// Sentinel rendered for sizes at or beyond 1024 PB.
pub const SIZE_OVERFLOW: &str = "huge";

/// What: Percent-encode a string for use in URLs according to RFC 3986.
///
/// Inputs:
/// - `input`: String to encode.
///
/// Output:
/// - Percent-encoded string with reserved characters escaped.
///
/// Details:
/// - Unreserved characters (`A-Z`, `a-z`, `0-9`, `-`, `.`, `_`, `~`) pass
///   through; space becomes `%20`; every other byte becomes `%XX`.
#[must_use]
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &b in input.as_bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push_str("%20"),
            _ => {
                out.push('%');
                let _ = write!(out, "{b:02X}");
            }
        }
    }
    out
}

/// What: Extract a string value from a JSON object by key.
///
/// Inputs:
/// - `v`: JSON value to extract from.
/// - `key`: Key to look up.
///
/// Output:
/// - The string value, or `""` when missing or not a string.
#[must_use]
pub fn s(v: &Value, key: &str) -> String {
    v.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

/// What: Extract the first available string from a list of candidate keys.
///
/// Inputs:
/// - `v`: JSON value to extract from.
/// - `keys`: Candidate keys tried in order.
///
/// Output:
/// - `Some(String)` for the first key mapping to a JSON string, else `None`.
#[must_use]
pub fn ss(v: &Value, keys: &[&str]) -> Option<String> {
    for k in keys {
        if let Some(s) = v.get(*k).and_then(|x| x.as_str()) {
            return Some(s.to_owned());
        }
    }
    None
}

/// What: Extract an unsigned integer from a JSON object by trying keys in order.
///
/// Inputs:
/// - `v`: JSON value to extract from.
/// - `keys`: Candidate keys tried in order.
///
/// Output:
/// - The first value representable as `u64` (number or numeric string), else
///   `None`.
#[must_use]
pub fn u64_of(v: &Value, keys: &[&str]) -> Option<u64> {
    for k in keys {
        if let Some(n) = v.get(*k) {
            if let Some(u) = n.as_u64() {
                return Some(u);
            }
            if let Some(i) = n.as_i64()
                && let Ok(u) = u64::try_from(i)
            {
                return Some(u);
            }
            if let Some(s) = n.as_str()
                && let Ok(p) = s.parse::<u64>()
            {
                return Some(p);
            }
        }
    }
    None
}

/// What: Format a byte count as a human-readable binary-scaled string.
///
/// Inputs:
/// - `bytes`: Raw size in bytes.
///
/// Output:
/// - `"X.XX UNIT"` with binary units B/KB/MB/GB/TB/PB, or [`SIZE_OVERFLOW`]
///   for magnitudes of 1024 PB and beyond.
///
/// Details:
/// - Two decimal places at every scale, so `0` renders as `"0.00 B"` and
///   `1536` as `"1.50 KB"`.
#[must_use]
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];
    #[allow(clippy::cast_precision_loss)]
    let mut n = bytes as f64;
    for unit in UNITS {
        if n < 1024.0 {
            return format!("{n:.2} {unit}");
        }
        n /= 1024.0;
    }
    SIZE_OVERFLOW.to_string()
}

/// What: Reformat a registry ISO timestamp into the short date form.
///
/// Inputs:
/// - `iso`: Timestamp such as `2023-04-01T12:34:56.000000Z`,
///   `2023-04-01T12:34:56`, or a bare `2023-04-01`.
///
/// Output:
/// - `Some("MM/DD/YY")` when the input parses, `None` otherwise.
#[must_use]
pub fn short_date(iso: &str) -> Option<String> {
    const OUT: &str = "%m/%d/%y";
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(iso) {
        return Some(dt.format(OUT).to_string());
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.format(OUT).to_string());
    }
    if let Ok(d) = chrono::NaiveDate::parse_from_str(iso, "%Y-%m-%d") {
        return Some(d.format(OUT).to_string());
    }
    None
}

/// What: Count non-overlapping occurrences of `needle` within `haystack`.
///
/// Inputs:
/// - `haystack`: Text to scan.
/// - `needle`: Substring to count; empty needles count as zero.
///
/// Output:
/// - Number of non-overlapping matches.
#[must_use]
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}
