mod bridge;
mod classify;
mod cli;
mod config;
mod model;
mod protocol;
mod respond;
mod session;
mod storage;
mod surface;

use std::{io, process};

use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    if let Err(e) = cli::run() {
        eprintln!("\n❌ Error in checkpoint: {e}");
        eprintln!("\n🔄 Please run the checkpoint again to continue...");
        process::exit(1);
    }
}

/// Diagnostics go to stderr; stdout carries the conversation and the
/// response block.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("CHECKPOINT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
