//! PyPI-backed implementation of the registry client.
//!
//! Three upstream surfaces are used: the HTML search pages (the JSON search
//! API no longer exists upstream, so the result snippets are parsed with
//! `scraper`), the JSON simple index for the full project catalog, and the
//! per-project JSON API for release resolution and metadata.

use serde_json::Value;

use super::{RegistryClient, ReleaseInfo, Result};
use crate::state::PackageSummary;
use crate::util::{percent_encode, s, ss, u64_of};

/// Upstream registry origin.
const PYPI_BASE: &str = "https://pypi.org";
/// Search pages fetched per query; the scorer re-ranks everything anyway.
const SEARCH_PAGES: u32 = 2;
/// Media type for the JSON rendering of the simple index.
const SIMPLE_JSON: &str = "application/vnd.pypi.simple.v1+json";

/// Registry client talking to pypi.org over HTTP.
pub struct PypiClient {
    /// Blocking HTTP client; callers are expected to already be off the
    /// async runtime when invoking this type.
    http: reqwest::blocking::Client,
    /// Origin to build request URLs against.
    base: String,
}

impl PypiClient {
    /// What: Build a client with the pipseek user agent and a request timeout.
    ///
    /// Inputs:
    /// - None.
    ///
    /// Output:
    /// - `Ok(PypiClient)`; boxed error if the TLS backend fails to set up.
    pub fn new() -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("pipseek/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base: PYPI_BASE.to_string(),
        })
    }

    /// What: Fetch `url` and parse the body as JSON.
    ///
    /// Inputs:
    /// - `url`: Absolute URL.
    /// - `accept`: Optional `Accept` header value.
    ///
    /// Output:
    /// - Parsed JSON body; boxed error on HTTP or parse failure.
    fn get_json(&self, url: &str, accept: Option<&str>) -> Result<Value> {
        let mut req = self.http.get(url);
        if let Some(a) = accept {
            req = req.header(reqwest::header::ACCEPT, a);
        }
        let v = req.send()?.error_for_status()?.json()?;
        Ok(v)
    }

    /// What: Fetch `url` and return the body as text.
    ///
    /// Inputs:
    /// - `url`: Absolute URL.
    ///
    /// Output:
    /// - Response body; boxed error on HTTP failure.
    fn get_text(&self, url: &str) -> Result<String> {
        let body = self.http.get(url).send()?.error_for_status()?.text()?;
        Ok(body)
    }
}

impl RegistryClient for PypiClient {
    fn search(&self, terms: &[String]) -> Result<Vec<PackageSummary>> {
        let q = percent_encode(terms.join(" ").trim());
        let mut items = Vec::new();
        for page in 1..=SEARCH_PAGES {
            let url = format!("{}/search/?q={q}&page={page}", self.base);
            match self.get_text(&url) {
                Ok(body) => items.extend(parse_search_page(&body)?),
                // The first page failing means search is down; later pages
                // may simply not exist for sparse queries.
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    tracing::debug!(page, error = %e, "search page unavailable");
                    break;
                }
            }
        }
        Ok(items)
    }

    fn list_names(&self) -> Result<Vec<String>> {
        let url = format!("{}/simple/", self.base);
        let v = self.get_json(&url, Some(SIMPLE_JSON))?;
        let names = v
            .get("projects")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .map(|p| s(p, "name"))
                    .filter(|n| !n.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        Ok(names)
    }

    fn latest_release(&self, name: &str) -> Result<Option<PackageSummary>> {
        let url = format!("{}/pypi/{}/json", self.base, percent_encode(name));
        let resp = self.http.get(&url).send()?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let v: Value = resp.error_for_status()?.json()?;
        Ok(parse_latest_release(&v))
    }

    fn release_info(&self, name: &str, version: &str) -> Result<ReleaseInfo> {
        let url = format!(
            "{}/pypi/{}/{}/json",
            self.base,
            percent_encode(name),
            percent_encode(version)
        );
        let v = self.get_json(&url, None)?;
        Ok(parse_release_info(&v))
    }
}

/// What: Extract package summaries from one registry search-results page.
///
/// Inputs:
/// - `html`: Full page body.
///
/// Output:
/// - Summaries in page order; snippets without a name are dropped.
pub fn parse_search_page(html: &str) -> Result<Vec<PackageSummary>> {
    let doc = scraper::Html::parse_document(html);
    let snippet = selector("a.package-snippet")?;
    let name_sel = selector(".package-snippet__name")?;
    let version_sel = selector(".package-snippet__version")?;
    let summary_sel = selector(".package-snippet__description")?;

    let mut out = Vec::new();
    for el in doc.select(&snippet) {
        let name = first_text(&el, &name_sel);
        if name.is_empty() {
            continue;
        }
        out.push(PackageSummary {
            name,
            version: first_text(&el, &version_sel),
            summary: first_text(&el, &summary_sel),
        });
    }
    Ok(out)
}

/// What: Compile a CSS selector, boxing the non-Send parse error.
///
/// Inputs:
/// - `css`: Selector text.
///
/// Output:
/// - Compiled selector or a boxed error message.
fn selector(css: &str) -> Result<scraper::Selector> {
    scraper::Selector::parse(css).map_err(|e| format!("bad selector {css}: {e}").into())
}

/// What: Collect the trimmed text of the first `sel` match under `el`.
///
/// Inputs:
/// - `el`: Element to search under.
/// - `sel`: Compiled selector.
///
/// Output:
/// - Trimmed text content, or empty when nothing matches.
fn first_text(el: &scraper::ElementRef<'_>, sel: &scraper::Selector) -> String {
    el.select(sel)
        .next()
        .map(|n| n.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// What: Read the latest-release summary out of a project JSON document.
///
/// Inputs:
/// - `v`: Parsed `/pypi/{name}/json` body.
///
/// Output:
/// - `Some(summary)` when the project has at least one release, else `None`.
#[must_use]
pub fn parse_latest_release(v: &Value) -> Option<PackageSummary> {
    let info = v.get("info")?;
    let name = s(info, "name");
    let version = s(info, "version");
    if name.is_empty() || version.is_empty() {
        return None;
    }
    let has_release = v
        .get("releases")
        .and_then(Value::as_object)
        .is_some_and(|m| !m.is_empty());
    if !has_release {
        return None;
    }
    Some(PackageSummary {
        name,
        version,
        summary: s(info, "summary"),
    })
}

/// What: Read license, homepage, upload time, and size out of a release
/// JSON document.
///
/// Inputs:
/// - `v`: Parsed `/pypi/{name}/{version}/json` body.
///
/// Output:
/// - Release metadata with the `UNKNOWN` sentinel folded into absence; the
///   upload time and size come from the first release file, if any.
#[must_use]
pub fn parse_release_info(v: &Value) -> ReleaseInfo {
    let info = v.get("info").cloned().unwrap_or(Value::Null);
    let first_url = v
        .get("urls")
        .and_then(Value::as_array)
        .and_then(|a| a.first())
        .cloned()
        .unwrap_or(Value::Null);
    ReleaseInfo {
        license: known(&s(&info, "license")),
        home_page: known(&s(&info, "home_page")),
        upload_time: ss(&first_url, &["upload_time_iso_8601", "upload_time"]),
        size: u64_of(&first_url, &["size"]),
    }
}

/// What: Fold empty strings and the registry's `UNKNOWN` sentinel into `None`.
///
/// Inputs:
/// - `val`: Raw field text.
///
/// Output:
/// - `Some(trimmed)` for real values, `None` otherwise.
fn known(val: &str) -> Option<String> {
    let trimmed = val.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("unknown") {
        None
    } else {
        Some(trimmed.to_string())
    }
}
