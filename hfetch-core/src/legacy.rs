//! String-only fetch API.
//!
//! These functions collapse [`FetchError`] into a `"Error: "`-prefixed
//! description so the result is always a plain `String`. Callers that need to
//! tell failure from content should use [`Fetcher`] directly; a body that
//! happens to start with the prefix is indistinguishable from a failure here.

pub use hfetch_config::constants::{DEFAULT_TARGET_URL, LEGACY_ERROR_PREFIX};

use crate::error::FetchError;
use crate::fetcher::{FetchOptions, FetchedBody, Fetcher};
use crate::transport::HttpTransport;

/// Body text on success, `"Error: <description>"` on failure.
pub fn render(result: Result<FetchedBody, FetchError>) -> String {
    match result {
        Ok(body) => body.into_text(),
        Err(err) => format!("{LEGACY_ERROR_PREFIX}{err}"),
    }
}

/// Blocking GET of `url` with default options. Never panics.
pub fn fetch_text(url: &str) -> String {
    match Fetcher::new(FetchOptions::default()) {
        Ok(fetcher) => fetch_text_with(&fetcher, url),
        Err(err) => render(Err(err)),
    }
}

/// Blocking GET of `url` through an existing fetcher.
pub fn fetch_text_with<T: HttpTransport>(fetcher: &Fetcher<T>, url: &str) -> String {
    render(fetcher.fetch_blocking(url))
}

/// [`fetch_text`] against [`DEFAULT_TARGET_URL`].
pub fn fetch_default_target() -> String {
    fetch_text(DEFAULT_TARGET_URL)
}

/// [`fetch_text_with`] against [`DEFAULT_TARGET_URL`].
pub fn fetch_default_target_with<T: HttpTransport>(fetcher: &Fetcher<T>) -> String {
    fetch_text_with(fetcher, DEFAULT_TARGET_URL)
}
