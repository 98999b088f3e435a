use std::time::{Duration, Instant};

use hfetch_config::FetchConfig;
use serde::Serialize;
use tracing::{debug, warn};

use crate::body::{BodyMode, decode_body};
use crate::error::FetchError;
use crate::target::TargetUrl;
use crate::transport::{HttpTransport, ReqwestTransport, TransportOptions};

/// Settings for a [`Fetcher`].
///
/// The default matches the plain one-shot fetch: lines joined without
/// separators, no timeouts, no size cap, no custom headers, and HTTP statuses
/// passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    pub body_mode: BodyMode,
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
    pub max_body_bytes: Option<u64>,
    pub https_only: bool,
    pub fail_on_http_status: bool,
    pub user_agent: Option<String>,
}

impl FetchOptions {
    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            connect_timeout: self.connect_timeout,
            request_timeout: self.request_timeout,
            max_body_bytes: self.max_body_bytes,
            https_only: self.https_only,
            user_agent: self.user_agent.clone(),
        }
    }
}

impl From<&FetchConfig> for FetchOptions {
    fn from(config: &FetchConfig) -> Self {
        Self {
            body_mode: config.body_mode,
            connect_timeout: config.connect_timeout(),
            request_timeout: config.request_timeout(),
            max_body_bytes: config.body_limit(),
            https_only: config.https_only,
            fail_on_http_status: config.fail_on_http_status,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// A successfully read response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchedBody {
    /// Final URL after redirects.
    pub url: String,
    pub status: u16,
    pub text: String,
}

impl FetchedBody {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Performs GET requests and returns the body as text.
///
/// A `Fetcher` keeps no per-request state and no idle connections, so one
/// instance can be shared across tasks; each call is independent.
#[derive(Debug, Clone)]
pub struct Fetcher<T = ReqwestTransport> {
    transport: T,
    options: FetchOptions,
}

impl Fetcher<ReqwestTransport> {
    pub fn new(options: FetchOptions) -> Result<Self, FetchError> {
        let transport = ReqwestTransport::new(&options.transport_options())?;
        Ok(Self { transport, options })
    }

    pub fn from_config(config: &FetchConfig) -> Result<Self, FetchError> {
        Self::new(FetchOptions::from(config))
    }
}

impl<T: HttpTransport> Fetcher<T> {
    pub fn with_transport(transport: T, options: FetchOptions) -> Self {
        Self { transport, options }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchedBody, FetchError> {
        let target = TargetUrl::parse(url).inspect_err(|err| {
            warn!(error = %err, "rejected fetch target");
        })?;
        self.fetch_target(&target).await
    }

    pub async fn fetch_target(&self, target: &TargetUrl) -> Result<FetchedBody, FetchError> {
        let started = Instant::now();
        self.execute(target).await.inspect_err(|err| {
            warn!(
                url = %target.redacted(),
                kind = err.kind().as_str(),
                elapsed_ms = started.elapsed().as_millis(),
                error = %err,
                "fetch failed"
            );
        })
    }

    /// Synchronous [`fetch`](Self::fetch) on a private current-thread runtime.
    ///
    /// Works from any thread. When the caller is already inside a tokio
    /// runtime (including `spawn_blocking` threads), the private runtime is
    /// driven on a scoped helper thread so it never nests in the caller's.
    pub fn fetch_blocking(&self, url: &str) -> Result<FetchedBody, FetchError> {
        if tokio::runtime::Handle::try_current().is_err() {
            return self.block_on_fetch(url);
        }

        std::thread::scope(|scope| {
            scope
                .spawn(|| self.block_on_fetch(url))
                .join()
                .unwrap_or_else(|_| {
                    Err(FetchError::Runtime("helper thread panicked".to_string()))
                })
        })
    }

    fn block_on_fetch(&self, url: &str) -> Result<FetchedBody, FetchError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| FetchError::Runtime(err.to_string()))?;

        runtime.block_on(self.fetch(url))
    }

    async fn execute(&self, target: &TargetUrl) -> Result<FetchedBody, FetchError> {
        let started = Instant::now();

        if self.options.https_only && !target.is_https() {
            return Err(FetchError::invalid_url(
                &target.redacted(),
                "https is required",
            ));
        }

        let raw = self.transport.get(target).await?;

        if self.options.fail_on_http_status && !(200..300).contains(&raw.status) {
            return Err(FetchError::HttpStatus {
                url: target.redacted(),
                status: raw.status,
            });
        }

        let text = decode_body(&raw.body, self.options.body_mode);
        debug!(
            url = %target.redacted(),
            status = raw.status,
            bytes = raw.body.len(),
            body_mode = %self.options.body_mode,
            elapsed_ms = started.elapsed().as_millis(),
            "fetch complete"
        );

        Ok(FetchedBody {
            url: raw.url.to_string(),
            status: raw.status,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchErrorKind;
    use crate::transport::RawResponse;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns the same canned response for every request.
    struct CannedTransport {
        status: u16,
        body: &'static [u8],
        calls: AtomicUsize,
    }

    impl CannedTransport {
        fn new(status: u16, body: &'static [u8]) -> Self {
            Self {
                status,
                body,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl HttpTransport for CannedTransport {
        async fn get(&self, target: &TargetUrl) -> Result<RawResponse, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(RawResponse {
                url: target.as_url().clone(),
                status: self.status,
                body: self.body.to_vec(),
            })
        }
    }

    struct RefusingTransport;

    #[async_trait]
    impl HttpTransport for RefusingTransport {
        async fn get(&self, target: &TargetUrl) -> Result<RawResponse, FetchError> {
            Err(FetchError::Connect {
                url: target.redacted(),
                detail: "connection refused".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn joins_lines_from_transport() {
        let fetcher = Fetcher::with_transport(
            CannedTransport::new(200, b"line1\nline2\n"),
            FetchOptions::default(),
        );

        let body = fetcher.fetch("https://example.com/").await.unwrap();

        assert_eq!(
            body,
            FetchedBody {
                url: "https://example.com/".to_string(),
                status: 200,
                text: "line1line2".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn repeated_fetches_are_identical() {
        let fetcher = Fetcher::with_transport(
            CannedTransport::new(200, b"alpha\r\nbeta\r\n"),
            FetchOptions::default(),
        );

        let first = fetcher.fetch("https://example.com/a").await.unwrap();
        let second = fetcher.fetch("https://example.com/a").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.text, "alphabeta");
        assert_eq!(fetcher.transport().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn raw_mode_keeps_line_breaks() {
        let options = FetchOptions {
            body_mode: BodyMode::Raw,
            ..FetchOptions::default()
        };
        let fetcher = Fetcher::with_transport(CannedTransport::new(200, b"a\nb\n"), options);

        let body = fetcher.fetch("https://example.com/").await.unwrap();
        assert_eq!(body.text, "a\nb\n");
    }

    #[tokio::test]
    async fn error_status_body_is_returned_by_default() {
        let fetcher = Fetcher::with_transport(
            CannedTransport::new(500, b"<h1>oops</h1>"),
            FetchOptions::default(),
        );

        let body = fetcher.fetch("https://example.com/").await.unwrap();
        assert_eq!(body.status, 500);
        assert!(!body.is_success());
        assert_eq!(body.into_text(), "<h1>oops</h1>");
    }

    #[tokio::test]
    async fn error_status_fails_when_enabled() {
        let options = FetchOptions {
            fail_on_http_status: true,
            ..FetchOptions::default()
        };
        let fetcher = Fetcher::with_transport(CannedTransport::new(503, b"busy"), options);

        let err = fetcher.fetch("https://example.com/").await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::HttpStatus);
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn invalid_url_never_reaches_transport() {
        let fetcher = Fetcher::with_transport(
            CannedTransport::new(200, b"unused"),
            FetchOptions::default(),
        );

        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::InvalidUrl);
        assert_eq!(fetcher.transport().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn https_only_is_checked_before_transport() {
        let options = FetchOptions {
            https_only: true,
            ..FetchOptions::default()
        };
        let fetcher = Fetcher::with_transport(CannedTransport::new(200, b"unused"), options);

        let err = fetcher.fetch("http://example.com/").await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::InvalidUrl);
        assert_eq!(fetcher.transport().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn transport_errors_propagate_with_kind() {
        let fetcher = Fetcher::with_transport(RefusingTransport, FetchOptions::default());

        let err = fetcher.fetch("https://example.com/").await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Connect);
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn blocking_fetch_inside_runtime_still_fetches() {
        let fetcher = Fetcher::with_transport(
            CannedTransport::new(200, b"line1\nline2"),
            FetchOptions::default(),
        );

        let body = fetcher.fetch_blocking("https://example.com/").unwrap();
        assert_eq!(body.text, "line1line2");
        assert_eq!(fetcher.transport().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn blocking_fetch_from_spawn_blocking() {
        let fetcher = Arc::new(Fetcher::with_transport(
            CannedTransport::new(200, b"alpha\r\nbeta"),
            FetchOptions::default(),
        ));

        let worker = Arc::clone(&fetcher);
        let body =
            tokio::task::spawn_blocking(move || worker.fetch_blocking("https://example.com/"))
                .await
                .unwrap()
                .unwrap();

        assert_eq!(body.text, "alphabeta");
        assert_eq!(fetcher.transport().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn blocking_fetch_outside_runtime_works() {
        let fetcher = Fetcher::with_transport(
            CannedTransport::new(200, b"line1\nline2"),
            FetchOptions::default(),
        );

        let body = fetcher.fetch_blocking("https://example.com/").unwrap();
        assert_eq!(body.text, "line1line2");
    }

    #[test]
    fn options_follow_config() {
        let config = FetchConfig {
            url: "https://example.com/".to_string(),
            body_mode: BodyMode::Raw,
            connect_timeout_seconds: 2,
            request_timeout_seconds: 0,
            max_body_bytes: 64,
            https_only: true,
            fail_on_http_status: true,
            user_agent: Some("hfetch-test".to_string()),
        };

        let options = FetchOptions::from(&config);
        assert_eq!(
            options,
            FetchOptions {
                body_mode: BodyMode::Raw,
                connect_timeout: Some(Duration::from_secs(2)),
                request_timeout: None,
                max_body_bytes: Some(64),
                https_only: true,
                fail_on_http_status: true,
                user_agent: Some("hfetch-test".to_string()),
            }
        );
        assert_eq!(options.transport_options().max_body_bytes, Some(64));
    }
}
