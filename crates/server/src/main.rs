//! geupsik daemon entry point.
//!
//! Serves the school-meal operation catalog over TCP. `NEIS_API_KEY` must
//! be set before startup; the daemon refuses to come up without it rather
//! than failing per-request later.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use geupsik_neis::{NeisClient, NeisConfig};
use geupsik_server::{build_dispatcher, daemon};
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Parser, Debug)]
#[command(name = "geupsik-server", about = "급식 조회 서버", version)]
struct Args {
    /// TCP port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Log to stderr only; stdout stays free for redirection.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();
    let config = NeisConfig::from_env().context("NEIS configuration")?;

    let api = Arc::new(NeisClient::new(config));
    let dispatcher = Arc::new(build_dispatcher(api, || Local::now().date_naive()));

    let listener = TcpListener::bind(("0.0.0.0", args.port))
        .await
        .with_context(|| format!("bind port {}", args.port))?;
    log::info!("geupsik server starting on port {}", args.port);

    daemon::serve(listener, dispatcher).await
}
