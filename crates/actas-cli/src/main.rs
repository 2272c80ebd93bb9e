#![warn(clippy::all, rust_2018_idioms)]

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = actas_cli::cli::Cli::parse();

    if let Err(e) = actas_cli::tracing::init(&args) {
        eprintln!("Failed to start tracing: {e}");
    }

    let configuration =
        actas_cli::configuration::get_configuration().context("failed to read configuration")?;
    actas_cli::run(args.command, &configuration).await
}
