use std::io::{self, Write};

use anyhow::{Context, Result};
use hfetch_config::LoggingConfig;
use hfetch_config::constants::logging::DEFAULT_TRACE_TARGETS;
use hfetch_core::{FetchError, FetchedBody, UrlComponents};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::args::Cli;

/// Install a stderr subscriber from `RUST_LOG` or `--debug`.
///
/// Returns `true` when a subscriber was installed, in which case the
/// configuration's `[logging]` section is ignored.
pub(crate) fn initialize_tracing(args: &Cli) -> bool {
    if std::env::var("RUST_LOG").is_ok() {
        install_stderr_subscriber(EnvFilter::from_default_env());
        return true;
    }

    if args.debug {
        let directive = DEFAULT_TRACE_TARGETS
            .iter()
            .map(|target| format!("{target}=debug"))
            .collect::<Vec<_>>()
            .join(",");
        install_stderr_subscriber(EnvFilter::new(directive));
        return true;
    }

    false
}

pub(crate) fn initialize_tracing_from_config(logging: &LoggingConfig) {
    if !logging.enable_tracing {
        install_stderr_subscriber(EnvFilter::new("error"));
        return;
    }

    let directive = logging.filter_directive();
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|err| {
        eprintln!("warning: invalid trace filter '{directive}': {err}");
        EnvFilter::new("error")
    });
    install_stderr_subscriber(filter);
}

fn install_stderr_subscriber(filter: EnvFilter) {
    use tracing_subscriber::prelude::*;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(true);

    let init_result = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();

    if let Err(err) = init_result {
        tracing::warn!(error = %err, "tracing already initialized; skipping stderr tracing setup");
    }
}

#[derive(Debug, Serialize)]
struct JsonFailure<'a> {
    url: &'a str,
    error: String,
    kind: &'static str,
}

/// Write the body, ending it with a newline if it does not have one.
pub(crate) fn write_body(body: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(body.as_bytes())
        .context("Failed to write body to stdout")?;
    if !body.ends_with('\n') {
        stdout.write_all(b"\n").context("Failed to write body to stdout")?;
    }
    stdout.flush().context("Failed to flush stdout")
}

pub(crate) fn write_json_success(body: &FetchedBody) -> Result<()> {
    let rendered = serde_json::to_string_pretty(body).context("Failed to serialize response")?;
    println!("{rendered}");
    Ok(())
}

pub(crate) fn write_json_failure(url: &str, err: &FetchError) -> Result<()> {
    let failure = JsonFailure {
        url,
        error: err.to_string(),
        kind: err.kind().as_str(),
    };
    let rendered = serde_json::to_string_pretty(&failure).context("Failed to serialize error")?;
    println!("{rendered}");
    Ok(())
}

pub(crate) fn write_components(components: &UrlComponents, as_json: bool) -> Result<()> {
    if as_json {
        let rendered =
            serde_json::to_string_pretty(components).context("Failed to serialize URL")?;
        println!("{rendered}");
        return Ok(());
    }

    println!("url:         {}", components.url);
    println!("scheme:      {}", components.scheme);
    println!("host:        {}", components.host.as_deref().unwrap_or("-"));
    match components.port {
        Some(port) => println!("port:        {port}"),
        None => println!("port:        -"),
    }
    println!("path:        {}", components.path);
    println!("query:       {}", components.query.as_deref().unwrap_or("-"));
    println!("fragment:    {}", components.fragment.as_deref().unwrap_or("-"));
    println!("credentials: {}", if components.has_credentials { "yes" } else { "no" });
    Ok(())
}
