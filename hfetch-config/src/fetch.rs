use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::DEFAULT_TARGET_URL;

/// How the response body is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BodyMode {
    /// Read the body line by line and concatenate the lines without any
    /// separator. Line terminators are dropped.
    #[default]
    JoinedLines,
    /// Decode the body bytes as they arrive.
    Raw,
}

impl BodyMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::JoinedLines => "joined-lines",
            Self::Raw => "raw",
        }
    }
}

impl std::fmt::Display for BodyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `[fetch]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Absolute http(s) URL fetched when no target is given on the command line.
    #[serde(default = "FetchConfig::default_url")]
    pub url: String,
    /// How the response body is read.
    #[serde(default)]
    pub body_mode: BodyMode,
    /// Connect timeout in seconds. 0 waits indefinitely.
    #[serde(default)]
    pub connect_timeout_seconds: u64,
    /// Whole-request timeout in seconds. 0 waits indefinitely.
    #[serde(default)]
    pub request_timeout_seconds: u64,
    /// Upper bound on the body size in bytes. 0 means unbounded.
    #[serde(default)]
    pub max_body_bytes: u64,
    /// Refuse plain `http://` targets.
    #[serde(default)]
    pub https_only: bool,
    /// Report non-2xx statuses as failures instead of returning the body.
    #[serde(default)]
    pub fail_on_http_status: bool,
    /// Optional `User-Agent` header. No headers are sent when unset.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
            body_mode: BodyMode::default(),
            connect_timeout_seconds: 0,
            request_timeout_seconds: 0,
            max_body_bytes: 0,
            https_only: false,
            fail_on_http_status: false,
            user_agent: None,
        }
    }
}

impl FetchConfig {
    fn default_url() -> String {
        DEFAULT_TARGET_URL.to_string()
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        seconds_to_duration(self.connect_timeout_seconds)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        seconds_to_duration(self.request_timeout_seconds)
    }

    pub fn body_limit(&self) -> Option<u64> {
        (self.max_body_bytes > 0).then_some(self.max_body_bytes)
    }

    pub fn validate(&self) -> Result<()> {
        // The URL may carry credentials, so it is not echoed back.
        let parsed = Url::parse(self.url.trim()).context("fetch.url is not a valid absolute URL")?;

        ensure!(
            matches!(parsed.scheme(), "http" | "https"),
            "fetch.url must use http or https, got '{}'",
            parsed.scheme()
        );

        ensure!(
            !self.https_only || parsed.scheme() == "https",
            "fetch.url must use https when fetch.https_only is enabled"
        );

        if let Some(agent) = &self.user_agent {
            ensure!(
                !agent.trim().is_empty(),
                "fetch.user_agent must not be empty when set"
            );
        }

        Ok(())
    }
}

fn seconds_to_duration(seconds: u64) -> Option<Duration> {
    if seconds == 0 {
        None
    } else {
        Some(Duration::from_secs(seconds))
    }
}
