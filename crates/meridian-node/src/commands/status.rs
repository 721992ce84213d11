//! `meridian-node status` — Query the status of a running node.

use clap::Args;
use serde::Deserialize;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// API endpoint of the node.
    #[arg(short, long, default_value = "http://127.0.0.1:7800")]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct StatusResponse {
    version: String,
    node_name: String,
    topology_nodes: usize,
    cached_routes: usize,
    current_sigma: f64,
    uptime_secs: u64,
}

pub async fn run(args: &StatusArgs) -> anyhow::Result<()> {
    let url = format!("{}/api/v1/status", args.endpoint);
    let resp = reqwest::get(&url).await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let status: StatusResponse = r.json().await?;
            println!("Node Status:");
            println!("  Version:        {}", status.version);
            println!("  Name:           {}", status.node_name);
            println!("  Topology nodes: {}", status.topology_nodes);
            println!("  Cached routes:  {}", status.cached_routes);
            println!("  Current sigma:  {:.6e}", status.current_sigma);
            println!("  Uptime:         {}s", status.uptime_secs);
        }
        Ok(r) => {
            anyhow::bail!("node returned HTTP {}", r.status());
        }
        Err(e) => {
            println!("Could not reach node at {}", args.endpoint);
            println!("  Error: {}", e);
            println!();
            println!("Is the node running? Start it with: meridian-node start");
        }
    }

    Ok(())
}
