#![deny(missing_docs)]

//! # paramdoc CLI
//!
//! Command Line Interface for inspecting documented handler parameters.
//!
//! Supported Commands:
//! - `explode`: Prints each handler's parameters with parameter objects expanded.
//! - `list`: Lists the handlers found in a source tree.

use clap::{Parser, Subcommand};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::CliResult;

mod error;
mod explode;
mod sources;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Handler parameter documentation toolkit")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Expand parameter objects and print the documented parameters.
    Explode(explode::ExplodeArgs),
    /// List discovered handlers.
    List(explode::ListArgs),
}

fn main() -> CliResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Commands::Explode(args) => explode::execute(args, &mut out)?,
        Commands::List(args) => explode::list(args, &mut out)?,
    }

    Ok(())
}
