//! Parsed fetch targets.

use std::fmt;

use serde::Serialize;
use url::Url;

use crate::error::FetchError;

/// Query keys whose values are masked in [`TargetUrl::redacted`].
const SENSITIVE_QUERY_KEYS: &[&str] = &[
    "apikey",
    "api_key",
    "token",
    "access_token",
    "key",
    "password",
    "secret",
];

const REDACTED: &str = "REDACTED";

/// An absolute `http` or `https` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUrl {
    url: Url,
}

/// Component breakdown returned by [`TargetUrl::components`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlComponents {
    pub url: String,
    pub scheme: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
    pub has_credentials: bool,
}

impl TargetUrl {
    pub fn parse(input: &str) -> Result<Self, FetchError> {
        let trimmed = input.trim();
        let url = Url::parse(trimmed)
            .map_err(|err| FetchError::invalid_url(&mask_userinfo(trimmed), err))?;
        Self::from_url(url)
    }

    pub fn from_url(url: Url) -> Result<Self, FetchError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::invalid_url(
                &redact_url(&url),
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        if url.host().is_none() {
            return Err(FetchError::invalid_url(&redact_url(&url), "missing host"));
        }
        Ok(Self { url })
    }

    /// Redacted form of arbitrary user input, parsed or not.
    pub fn redact_input(input: &str) -> String {
        let trimmed = input.trim();
        match Url::parse(trimmed) {
            Ok(url) => redact_url(&url),
            Err(_) => mask_userinfo(trimmed),
        }
    }

    pub fn as_url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn is_https(&self) -> bool {
        self.url.scheme() == "https"
    }

    /// The URL with userinfo and credential-like query values masked.
    pub fn redacted(&self) -> String {
        redact_url(&self.url)
    }

    /// Breakdown of the redacted URL, for display.
    pub fn components(&self) -> UrlComponents {
        let redacted = self.redacted();
        let parsed = Url::parse(&redacted).unwrap_or_else(|_| self.url.clone());
        UrlComponents {
            url: redacted,
            scheme: parsed.scheme().to_string(),
            host: parsed.host_str().map(str::to_string),
            port: parsed.port_or_known_default(),
            path: parsed.path().to_string(),
            query: parsed.query().map(str::to_string),
            fragment: parsed.fragment().map(str::to_string),
            has_credentials: !self.url.username().is_empty() || self.url.password().is_some(),
        }
    }
}

impl fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

fn redact_url(original: &Url) -> String {
    let mut url = original.clone();
    if !url.username().is_empty() {
        url.set_username(REDACTED).unwrap_or(());
    }
    if url.password().is_some() {
        url.set_password(Some(REDACTED)).unwrap_or(());
    }

    if url.query().is_some() {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| {
                if is_sensitive_key(&key) {
                    (key.into_owned(), REDACTED.to_string())
                } else {
                    (key.into_owned(), value.into_owned())
                }
            })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    url.into()
}

/// Mask the userinfo of a string that does not parse as a URL.
fn mask_userinfo(input: &str) -> String {
    let Some((scheme, rest)) = input.split_once("://") else {
        return input.to_string();
    };
    let authority_end = rest.find(&['/', '?', '#'][..]).unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{scheme}://{REDACTED}@{}", &rest[at + 1..]),
        None => input.to_string(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let lowered = key.to_ascii_lowercase();
    SENSITIVE_QUERY_KEYS.contains(&lowered.as_str())
}
