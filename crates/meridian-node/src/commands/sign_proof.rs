//! `meridian-node sign-proof` — Issue an attestation proof.

use clap::Args;
use std::path::PathBuf;

use meridian_core::types::NodeId;
use meridian_crypto::{issue_proof, AuthorityKeypair};

#[derive(Args, Debug)]
pub struct SignProofArgs {
    /// Path to the authority secret key (hex).
    #[arg(long, default_value = "meridian-authority.key")]
    pub key_file: PathBuf,

    /// Originating node.
    #[arg(long)]
    pub source: String,

    /// Destination node.
    #[arg(long)]
    pub target: String,
}

pub fn run(args: &SignProofArgs) -> anyhow::Result<()> {
    let secret_hex = std::fs::read_to_string(&args.key_file)?;
    let keypair = AuthorityKeypair::from_hex(&secret_hex)?;

    let source = NodeId::from(args.source.as_str());
    let destination = NodeId::from(args.target.as_str());
    let proof = issue_proof(&keypair, &source, &destination);

    println!("{}", hex::encode(proof));
    Ok(())
}
