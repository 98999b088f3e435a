use std::path::PathBuf;

use clap::Parser;
use hfetch_config::{BodyMode, ConfigBuilder};

#[derive(Debug, Parser)]
#[command(name = "hfetch")]
#[command(about = "Fetch a URL with a single GET request and print the body")]
#[command(version)]
pub struct Cli {
    /// Target URL (defaults to `fetch.url` from the configuration)
    pub url: Option<String>,

    /// Configuration file to use instead of ./hfetch.toml
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Keep line breaks instead of joining lines
    #[arg(long)]
    pub raw: bool,

    /// Print the body or an `Error: ...` line, and always exit successfully
    #[arg(long, conflicts_with_all = ["json", "inspect"])]
    pub legacy: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Describe the target URL (credentials redacted) without fetching it
    #[arg(long)]
    pub inspect: bool,

    /// Connect timeout in seconds (0 waits indefinitely)
    #[arg(long, value_name = "SECS")]
    pub connect_timeout: Option<u64>,

    /// Whole-request timeout in seconds (0 waits indefinitely)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Refuse bodies larger than this many bytes (0 for no limit)
    #[arg(long, value_name = "BYTES")]
    pub max_body_bytes: Option<u64>,

    /// Refuse plain http:// targets
    #[arg(long)]
    pub https_only: bool,

    /// Treat non-2xx responses as failures
    #[arg(long)]
    pub fail_on_status: bool,

    /// Log request details to stderr
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    /// Dotted-key overrides for the runtime configuration layer.
    pub fn config_overrides(&self) -> Vec<(&'static str, toml::Value)> {
        let mut overrides = Vec::new();

        if let Some(url) = &self.url {
            overrides.push(("fetch.url", toml::Value::String(url.clone())));
        }
        if self.raw {
            overrides.push((
                "fetch.body_mode",
                toml::Value::from(BodyMode::Raw.as_str()),
            ));
        }
        if let Some(seconds) = self.connect_timeout {
            overrides.push(("fetch.connect_timeout_seconds", integer_value(seconds)));
        }
        if let Some(seconds) = self.timeout {
            overrides.push(("fetch.request_timeout_seconds", integer_value(seconds)));
        }
        if let Some(bytes) = self.max_body_bytes {
            overrides.push(("fetch.max_body_bytes", integer_value(bytes)));
        }
        if self.https_only {
            overrides.push(("fetch.https_only", toml::Value::Boolean(true)));
        }
        if self.fail_on_status {
            overrides.push(("fetch.fail_on_http_status", toml::Value::Boolean(true)));
        }

        overrides
    }

    pub fn config_builder(&self) -> ConfigBuilder {
        let mut builder = ConfigBuilder::new();
        if let Some(path) = &self.config {
            builder = builder.config_file(path.clone());
        }
        for (key, value) in self.config_overrides() {
            builder = builder.cli_override(key, value);
        }
        builder
    }
}

// TOML integers are signed; anything past i64::MAX is effectively unbounded.
fn integer_value(value: u64) -> toml::Value {
    toml::Value::Integer(i64::try_from(value).unwrap_or(i64::MAX))
}
