//! `meridian-node start` — Start the routing node.

use clap::Args;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use meridian_crypto::{AuthorityPublicKey, Ed25519AttestationVerifier};
use meridian_routing::{RoutingEngine, SharedSigmaMonitor};

use crate::api;
use crate::config::MeridianConfig;
use crate::state::NodeState;

#[derive(Args, Debug)]
pub struct StartArgs {
    /// Path to the config file.
    #[arg(short, long, default_value = "meridian.toml")]
    pub config: PathBuf,

    /// Override the API port.
    #[arg(long)]
    pub port: Option<u16>,

    /// Override the log level.
    #[arg(long)]
    pub log_level: Option<String>,
}

pub async fn run(args: &StartArgs) -> anyhow::Result<()> {
    let mut config = MeridianConfig::load(&args.config)?;
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    tracing::info!("Meridian node v{}", env!("CARGO_PKG_VERSION"));

    let authority_hex = config
        .attestation
        .authority_public_key
        .as_deref()
        .ok_or_else(|| {
            anyhow::anyhow!("no attestation.authority_public_key configured; run `meridian-node init` first")
        })?;
    let authority = AuthorityPublicKey::from_hex(authority_hex)?;
    let verifier = Arc::new(Ed25519AttestationVerifier::new(authority));

    let monitor = SharedSigmaMonitor::new(config.engine.initial_sigma);

    let topology = Arc::new(config.build_topology());
    if topology.node_count() == 0 {
        tracing::warn!("topology is empty; every routing task will fail validation");
    } else {
        tracing::info!(nodes = topology.node_count(), "topology loaded");
    }

    let engine = Arc::new(RoutingEngine::new(
        verifier,
        Arc::new(monitor.clone()),
        topology,
        config.engine_config(),
    ));

    // Periodic sweep keeps the table from accumulating dead entries
    // between lookups.
    let sweeper = Arc::clone(&engine);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            ticker.tick().await;
            let removed = sweeper.table().remove_expired(chrono::Utc::now());
            if removed > 0 {
                tracing::debug!(removed, "swept expired routes");
            }
        }
    });

    let state = Arc::new(NodeState::new(config.node.name.clone(), engine, monitor));
    let listen_addr: SocketAddr =
        format!("{}:{}", config.api.listen_addr, config.api.port).parse()?;

    tokio::select! {
        result = api::start_api_server(listen_addr, state) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received shutdown signal");
            Ok(())
        }
    }
}
