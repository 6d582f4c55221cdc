//! Askboard Stub Backend
//!
//! Run with: cargo run --bin askboard-stub
//!
//! Serves the demo script on the backend's routes so the CLI can be tried
//! without the real query/forecast service.

use askboard::config::LoggingConfig;
use askboard::stub::{serve_stub, StubScript};
use clap::Parser;
use std::net::SocketAddr;

#[derive(Parser)]
#[command(name = "askboard-stub")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scripted stand-in for the sales analytics backend")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    addr: SocketAddr,

    /// Log level filter (RUST_LOG takes precedence)
    #[arg(long, default_value = "askboard=info,tower_http=debug")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    askboard::logging::init(&LoggingConfig {
        level: args.log_level,
        ..Default::default()
    })?;

    tracing::info!("Starting stub backend v{}", env!("CARGO_PKG_VERSION"));
    serve_stub(StubScript::demo(), args.addr).await?;
    Ok(())
}
