//! Terminal client for the docmatch document scanner.
//!
//! One binary, one screen stack: scan-and-match workflow, login/register,
//! credit requests, and the admin dashboard, all against a scanner backend
//! reached over HTTP with cookie-based sessions.
#![allow(missing_docs)]

mod app;
mod event;
mod state;
mod ui;
mod view;
mod workflow;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use docmatch_client::ApiClient;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "docmatch",
    version,
    about = "Terminal client for the docmatch document scanner"
)]
struct Args {
    /// Base URL of the scanner backend (falls back to DOCMATCH_SERVER)
    #[arg(long)]
    server: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Log filter directives, e.g. `debug` or `docmatch=trace` (overrides
    /// RUST_LOG)
    #[arg(long)]
    log: Option<String>,
}

impl Args {
    fn log_filter(&self) -> Result<EnvFilter> {
        match &self.log {
            Some(directives) => EnvFilter::try_new(directives)
                .with_context(|| format!("invalid --log filter: {directives}")),
            None => Ok(EnvFilter::from_default_env()),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so they never corrupt the alternate screen.
    tracing_subscriber::fmt()
        .with_env_filter(args.log_filter()?)
        .with_writer(std::io::stderr)
        .init();

    let server = args
        .server
        .or_else(|| std::env::var("DOCMATCH_SERVER").ok())
        .unwrap_or_else(|| "http://localhost:5000".to_string());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;

    let client = ApiClient::new(&server, Duration::from_secs(args.timeout))
        .context("create API client")?;

    app::run(client, runtime.handle().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_flag_builds_a_filter_and_rejects_garbage() {
        let args = Args::parse_from(["docmatch", "--log", "docmatch=debug"]);
        assert!(args.log_filter().is_ok());

        let args = Args::parse_from(["docmatch", "--log", "docmatch=!!"]);
        assert!(args.log_filter().is_err());
    }

    #[test]
    fn log_flag_is_optional() {
        let args = Args::parse_from(["docmatch"]);
        assert_eq!(args.log, None);
        assert!(args.log_filter().is_ok());
    }
}
