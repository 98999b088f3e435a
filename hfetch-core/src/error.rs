//! Fetch failures.
//!
//! Every way a fetch can go wrong maps to one [`FetchError`] variant, and every
//! variant reports a [`FetchErrorKind`] so callers can branch on the failure
//! without parsing messages. Messages carry the full cause chain because the
//! outermost `reqwest` error is rarely descriptive on its own.

use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::target::TargetUrl;

/// Coarse classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// The target could not be parsed or is not an http(s) URL
    InvalidUrl,
    /// The HTTP client could not be constructed
    Client,
    /// DNS lookup, TCP connect or TLS handshake failed
    Connect,
    /// A configured timeout elapsed
    Timeout,
    /// The request could not be sent
    Request,
    /// Reading the response body failed
    Body,
    /// The body exceeded the configured size cap
    BodyTooLarge,
    /// Non-success status while status checking is enabled
    HttpStatus,
    /// A blocking fetch could not drive its runtime
    Runtime,
}

impl FetchErrorKind {
    pub const fn user_label(&self) -> &'static str {
        match self {
            Self::InvalidUrl => "Invalid URL",
            Self::Client => "HTTP client unavailable",
            Self::Connect => "Connection failed",
            Self::Timeout => "Request timed out",
            Self::Request => "Request failed",
            Self::Body => "Failed to read response body",
            Self::BodyTooLarge => "Response body too large",
            Self::HttpStatus => "Unsuccessful HTTP status",
            Self::Runtime => "Runtime unavailable",
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidUrl => "invalid_url",
            Self::Client => "client",
            Self::Connect => "connect",
            Self::Timeout => "timeout",
            Self::Request => "request",
            Self::Body => "body",
            Self::BodyTooLarge => "body_too_large",
            Self::HttpStatus => "http_status",
            Self::Runtime => "runtime",
        }
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_label())
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("connection to {url} failed: {detail}")]
    Connect { url: String, detail: String },

    #[error("request to {url} timed out: {detail}")]
    Timeout { url: String, detail: String },

    #[error("request to {url} failed: {detail}")]
    Request { url: String, detail: String },

    #[error("failed to read response body from {url}: {detail}")]
    Body { url: String, detail: String },

    #[error("response body from {url} exceeds {limit} bytes")]
    BodyTooLarge { url: String, limit: u64 },

    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("cannot run a blocking fetch: {0}")]
    Runtime(String),
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::InvalidUrl { .. } => FetchErrorKind::InvalidUrl,
            Self::Client(_) => FetchErrorKind::Client,
            Self::Connect { .. } => FetchErrorKind::Connect,
            Self::Timeout { .. } => FetchErrorKind::Timeout,
            Self::Request { .. } => FetchErrorKind::Request,
            Self::Body { .. } => FetchErrorKind::Body,
            Self::BodyTooLarge { .. } => FetchErrorKind::BodyTooLarge,
            Self::HttpStatus { .. } => FetchErrorKind::HttpStatus,
            Self::Runtime(_) => FetchErrorKind::Runtime,
        }
    }

    pub(crate) fn invalid_url(url: &str, reason: impl fmt::Display) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Classify a transport error raised while sending the request.
    pub(crate) fn from_send(target: &TargetUrl, err: &reqwest::Error) -> Self {
        let (url, detail) = redacted_detail(target, err);
        if err.is_timeout() {
            Self::Timeout { url, detail }
        } else if err.is_connect() {
            Self::Connect { url, detail }
        } else if err.is_body() || err.is_decode() {
            Self::Body { url, detail }
        } else {
            Self::Request { url, detail }
        }
    }

    /// Classify a transport error raised while reading the body.
    pub(crate) fn from_read(target: &TargetUrl, err: &reqwest::Error) -> Self {
        let (url, detail) = redacted_detail(target, err);
        if err.is_timeout() {
            Self::Timeout { url, detail }
        } else {
            Self::Body { url, detail }
        }
    }
}

// reqwest quotes the request URL in its messages, credentials included.
fn redacted_detail(target: &TargetUrl, err: &reqwest::Error) -> (String, String) {
    let url = target.redacted();
    let detail = error_chain(err).replace(target.as_str(), &url);
    (url, detail)
}

/// `outer: cause: root cause`, skipping causes already quoted by their parent.
pub(crate) fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
