//! # berth — local runner CLI
//!
//! Translates a multi-container descriptor into a docker-compose file so the
//! application can run locally, and manages the environment variables layered
//! over it.

mod commands;
mod output;

use clap::Parser;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    commands::execute(cli)
}
