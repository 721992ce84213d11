//! `meridian-node route` — Submit a routing task to a running node.

use clap::Args;
use serde_json::json;

#[derive(Args, Debug)]
pub struct RouteArgs {
    /// API endpoint of the node.
    #[arg(short, long, default_value = "http://127.0.0.1:7800")]
    pub endpoint: String,

    /// Originating node.
    #[arg(long)]
    pub source: String,

    /// Destination node.
    #[arg(long)]
    pub target: String,

    /// Hex-encoded attestation proof.
    #[arg(long, default_value = "")]
    pub proof: String,

    /// Freshness token.
    #[arg(long, default_value = "")]
    pub nonce: String,

    /// Priority class (emergency, consciousness, data; anything else is
    /// best-effort).
    #[arg(long)]
    pub priority: Option<String>,
}

pub async fn run(args: &RouteArgs) -> anyhow::Result<()> {
    let url = format!("{}/api/v1/routes", args.endpoint);
    let body = json!({
        "action": "route_packet",
        "source": args.source,
        "target": args.target,
        "proof": args.proof,
        "nonce": args.nonce,
        "priority": args.priority,
    });

    let client = reqwest::Client::new();
    let resp = client.post(&url).json(&body).send().await?;
    let http_status = resp.status();
    let payload: serde_json::Value = resp.json().await?;

    if http_status.is_success() {
        println!("{}", serde_json::to_string_pretty(&payload["content"])?);
    } else {
        anyhow::bail!(
            "routing failed (HTTP {}): {}",
            http_status,
            payload["content"].as_str().unwrap_or("unknown error")
        );
    }

    Ok(())
}
