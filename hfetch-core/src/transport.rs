//! HTTP transport seam.
//!
//! [`Fetcher`](crate::Fetcher) talks to the network only through
//! [`HttpTransport`], so tests can substitute a canned transport. The
//! production implementation wraps a `reqwest` client that keeps no idle
//! connections: every request dials its own connection and drops it once the
//! body has been read.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, trace};
use url::Url;

use crate::error::{FetchError, error_chain};
use crate::target::TargetUrl;

/// Status, final URL and complete body of one GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub url: Url,
    pub status: u16,
    pub body: Vec<u8>,
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a GET request and read the full body.
    async fn get(&self, target: &TargetUrl) -> Result<RawResponse, FetchError>;
}

/// Client settings for [`ReqwestTransport`]. Everything is off by default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportOptions {
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
    pub max_body_bytes: Option<u64>,
    pub https_only: bool,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    max_body_bytes: Option<u64>,
}

impl ReqwestTransport {
    pub fn new(options: &TransportOptions) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .https_only(options.https_only);

        if let Some(timeout) = options.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(agent) = &options.user_agent {
            builder = builder.user_agent(agent.as_str());
        }

        let client = builder
            .build()
            .map_err(|err| FetchError::Client(error_chain(&err)))?;

        Ok(Self {
            client,
            max_body_bytes: options.max_body_bytes,
        })
    }

    fn exceeds_limit(&self, size: u64) -> Option<u64> {
        self.max_body_bytes.filter(|limit| size > *limit)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, target: &TargetUrl) -> Result<RawResponse, FetchError> {
        let display_url = target.redacted();
        debug!(url = %display_url, "sending GET request");

        let mut response = self
            .client
            .get(target.as_url().clone())
            .send()
            .await
            .map_err(|err| FetchError::from_send(target, &err))?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        trace!(status, url = %display_url, "response headers received");

        if let Some(limit) = response
            .content_length()
            .and_then(|length| self.exceeds_limit(length))
        {
            return Err(FetchError::BodyTooLarge {
                url: display_url,
                limit,
            });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|err| FetchError::from_read(target, &err))?
        {
            let size = u64::try_from(body.len() + chunk.len()).unwrap_or(u64::MAX);
            if let Some(limit) = self.exceeds_limit(size) {
                return Err(FetchError::BodyTooLarge {
                    url: display_url,
                    limit,
                });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(RawResponse {
            url: final_url,
            status,
            body,
        })
    }
}
