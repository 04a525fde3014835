//! URL construction and model-name normalization.

use std::fmt;

use crate::traits::HttpResponse;

/// Strip trailing slashes from a base URL.
#[must_use]
pub fn normalize_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

/// `/orgs/{org}` when an organization is set, empty otherwise.
#[must_use]
pub fn org_segment(org: Option<&str>) -> String {
    org.filter(|o| !o.is_empty())
        .map_or_else(String::new, |o| format!("/orgs/{o}"))
}

/// Chat completions endpoint, organization-scoped when `org` is set.
#[must_use]
pub fn chat_completions_url(base_url: &str, org: Option<&str>) -> String {
    format!(
        "{}{}/inference/chat/completions",
        normalize_base(base_url),
        org_segment(org)
    )
}

/// Legacy text completions endpoint, organization-scoped when `org` is set.
#[must_use]
pub fn completions_url(base_url: &str, org: Option<&str>) -> String {
    format!(
        "{}{}/inference/completions",
        normalize_base(base_url),
        org_segment(org)
    )
}

/// Strip whitespace and leading `/` from an explicit model name.
///
/// ```
/// use github_models::client::normalize_model;
///
/// assert_eq!(normalize_model("  /claude-sonnet-3.5 "), "claude-sonnet-3.5");
/// ```
#[must_use]
pub fn normalize_model(model: &str) -> String {
    model
        .trim_start_matches(|c: char| c == '/' || c.is_whitespace())
        .trim_end()
        .to_string()
}

/// One URL hypothesis tried while listing models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateEndpoint {
    /// Absolute URL to GET.
    pub url: String,
}

impl CandidateEndpoint {
    /// Create a candidate.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Whether `response` counts as a successful listing.
    #[must_use]
    pub const fn accepts(&self, response: &HttpResponse) -> bool {
        response.is_success()
    }
}

impl fmt::Display for CandidateEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// The eight model-listing candidates, configured host first.
///
/// Without an organization some entries coincide; they are still tried in
/// place so the order stays fixed.
#[must_use]
pub fn model_list_candidates(
    base_url: &str,
    org: Option<&str>,
    public_host: &str,
) -> Vec<CandidateEndpoint> {
    let base = normalize_base(base_url);
    let public = normalize_base(public_host);
    let org = org_segment(org);

    [
        format!("{base}{org}/models"),
        format!("{base}/models"),
        format!("{base}{org}/inference/models"),
        format!("{base}/inference/models"),
        format!("{public}/models"),
        format!("{public}{org}/models"),
        format!("{public}{org}/inference/models"),
        format!("{public}/inference/models"),
    ]
    .into_iter()
    .map(CandidateEndpoint::new)
    .collect()
}
