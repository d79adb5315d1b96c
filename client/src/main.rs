#![deny(unused_must_use, deprecated)]
#![warn(clippy::pedantic)]

use std::{path::PathBuf, process};

use clap::Parser;
use client::{
    config::Instructions,
    defaults,
    error::RunFailure,
    session::Session,
};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Batch-mode encrypted file transfer client.
#[derive(Parser)]
#[command(version, about = "Uploads one file to a transfer server, encrypted end to end")]
struct Cli {
    /// Path to the transfer instructions file
    #[arg(long, default_value = defaults::INSTRUCTIONS_FILE)]
    instructions: PathBuf,

    /// Path to the persisted identity file
    #[arg(long, default_value = defaults::IDENTITY_FILE)]
    identity: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    if let Err(err) = run(cli).await {
        error!("{err}");
        process::exit(1);
    }
    info!("client routine finished successfully");
}

async fn run(cli: Cli) -> Result<(), RunFailure> {
    let instructions =
        Instructions::load(&cli.instructions).map_err(RunFailure::at("startup"))?;
    info!(
        "sending {} to {} as {}",
        instructions.filename, instructions.server, instructions.username
    );

    let session = Session::connect(instructions, cli.identity)
        .await
        .map_err(RunFailure::at("connect"))?;
    session.run().await
}
