//! One-shot HTTP(S) GET fetching.
//!
//! [`Fetcher`] issues a single GET request per call and returns the body as
//! text in a [`FetchedBody`], or a [`FetchError`] describing what failed. By
//! default the body is read line by line and the lines are concatenated with
//! no separator ([`BodyMode::JoinedLines`]); [`BodyMode::Raw`] keeps the text
//! as sent. No timeouts are applied unless configured.
//!
//! ```rust,ignore
//! use hfetch_core::{FetchOptions, Fetcher};
//!
//! let fetcher = Fetcher::new(FetchOptions::default())?;
//! let body = fetcher.fetch("https://api.github.com/").await?;
//! println!("{} -> {}", body.status, body.text);
//! ```
//!
//! The [`legacy`] module offers the string-only form, where failures come back
//! as `"Error: ..."` text.

pub mod body;
pub mod error;
pub mod fetcher;
pub mod legacy;
pub mod target;
pub mod transport;

pub use body::{BodyMode, decode_body};
pub use error::{FetchError, FetchErrorKind};
pub use fetcher::{FetchOptions, FetchedBody, Fetcher};
pub use target::{TargetUrl, UrlComponents};
pub use transport::{HttpTransport, RawResponse, ReqwestTransport, TransportOptions};
