use serde::{Deserialize, Serialize};
use url::{ParseError, Url};

use crate::error::ConfigurationError;

/// Response headers the viewer reads when range-fetching scene data.
pub const EXPOSED_HEADERS: [&str; 4] = ["ETag", "Content-Type", "Accept-Ranges", "Content-Length"];
pub const ALLOW_ALL_HEADERS: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CorsMethod {
    Get,
    Head,
    Put,
    Post,
    Delete,
}

impl CorsMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorsRule {
    pub allowed_headers: Vec<String>,
    pub allowed_methods: Vec<CorsMethod>,
    pub allowed_origins: Vec<String>,
    pub expose_headers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age_seconds: Option<i32>,
}

/// Complete CORS configuration for one bucket. Always applied as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CorsRuleSet {
    pub rules: Vec<CorsRule>,
}

impl CorsRuleSet {
    pub fn allowed_origins(&self) -> impl Iterator<Item = &str> {
        self.rules
            .iter()
            .flat_map(|rule| rule.allowed_origins.iter().map(String::as_str))
    }
}

/// Builds the read-only rule set granting `origin` access to bucket objects.
///
/// The origin is normalized first, so `http://lb.example.com/` and
/// `http://lb.example.com` produce identical rule sets.
pub fn rule_set_for_origin(origin: &str) -> Result<CorsRuleSet, ConfigurationError> {
    let origin = normalize_origin(origin)?;
    Ok(CorsRuleSet {
        rules: vec![CorsRule {
            allowed_headers: vec![ALLOW_ALL_HEADERS.to_string()],
            allowed_methods: vec![CorsMethod::Head, CorsMethod::Get],
            allowed_origins: vec![origin],
            expose_headers: EXPOSED_HEADERS.iter().map(|h| h.to_string()).collect(),
            max_age_seconds: None,
        }],
    })
}

/// Reduces an endpoint URL to a browser `Origin` value (`scheme://host[:port]`).
pub fn normalize_origin(raw: &str) -> Result<String, ConfigurationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigurationError::missing("allowed_origin"));
    }
    if trimmed == "*" {
        return Ok(trimmed.to_string());
    }

    let parsed = Url::parse(trimmed).map_err(|error| match error {
        ParseError::EmptyHost => malformed_origin("host is missing"),
        ParseError::RelativeUrlWithoutBase => malformed_origin("scheme must be http or https"),
        other => malformed_origin(format!("is not a valid URL ({other})")),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(malformed_origin("scheme must be http or https"));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(malformed_origin("host is missing"));
    }
    if !parsed.username().is_empty() || parsed.password().is_some() {
        return Err(malformed_origin("origin must not carry credentials"));
    }
    if parsed.path() != "/" || parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(malformed_origin(
            "origin must not contain a path, query, or fragment",
        ));
    }

    Ok(parsed.origin().ascii_serialization())
}

fn malformed_origin(reason: impl Into<String>) -> ConfigurationError {
    ConfigurationError::malformed("allowed_origin", reason)
}
