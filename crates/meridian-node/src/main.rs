//! Meridian node — entry point.
//!
//! Subcommands: init, start, status, route, sign-proof.

mod api;
mod commands;
mod config;
mod state;

use clap::{Parser, Subcommand};

/// Meridian — deterministic attested routing.
#[derive(Parser, Debug)]
#[command(name = "meridian-node", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default config file and generate an authority keypair.
    Init(commands::init::InitArgs),
    /// Start the routing node.
    Start(commands::start::StartArgs),
    /// Query the status of a running node.
    Status(commands::status::StatusArgs),
    /// Submit a routing task to a running node.
    Route(commands::route::RouteArgs),
    /// Issue an attestation proof with the authority secret key.
    SignProof(commands::sign_proof::SignProofArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init(args) => commands::init::run(args),
        Commands::Start(args) => commands::start::run(args).await,
        Commands::Status(args) => commands::status::run(args).await,
        Commands::Route(args) => commands::route::run(args).await,
        Commands::SignProof(args) => commands::sign_proof::run(args),
    }
}
