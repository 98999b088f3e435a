//! hfetch - fetch a URL with a single GET request and print the body.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use hfetch_core::{Fetcher, TargetUrl, legacy};

mod args;
mod main_helpers;

use args::Cli;
use main_helpers::{
    initialize_tracing, initialize_tracing_from_config, write_body, write_components,
    write_json_failure, write_json_success,
};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Cli::parse();

    let tracing_from_env = initialize_tracing(&args);

    let manager = match args
        .config_builder()
        .build()
        .context("Failed to load configuration")
    {
        Ok(manager) => manager,
        Err(err) if args.legacy => {
            write_body(&format!("{}{err:#}", legacy::LEGACY_ERROR_PREFIX))?;
            return Ok(ExitCode::SUCCESS);
        }
        Err(err) => return Err(err),
    };
    if !tracing_from_env {
        initialize_tracing_from_config(&manager.config().logging);
    }
    if let Some(path) = manager.config_path() {
        tracing::debug!(path = %path.display(), "loaded configuration");
    }

    let config = manager.into_config();
    let url = config.fetch.url.as_str();

    if args.inspect {
        let target = TargetUrl::parse(url)?;
        write_components(&target.components(), args.json)?;
        return Ok(ExitCode::SUCCESS);
    }

    let result = match Fetcher::from_config(&config.fetch) {
        Ok(fetcher) => fetcher.fetch(url).await,
        Err(err) => Err(err),
    };

    if args.legacy {
        write_body(&legacy::render(result))?;
        return Ok(ExitCode::SUCCESS);
    }

    match result {
        Ok(body) if args.json => {
            write_json_success(&body)?;
            Ok(ExitCode::SUCCESS)
        }
        Ok(body) => {
            write_body(&body.text)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) if args.json => {
            write_json_failure(&TargetUrl::redact_input(url), &err)?;
            Ok(ExitCode::FAILURE)
        }
        Err(err) => {
            eprintln!("{}{err}", legacy::LEGACY_ERROR_PREFIX);
            Ok(ExitCode::FAILURE)
        }
    }
}
