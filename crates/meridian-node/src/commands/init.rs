//! `meridian-node init` — Write a default config and authority keypair.

use clap::Args;
use std::path::PathBuf;

use meridian_crypto::AuthorityKeypair;

use crate::config::MeridianConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path for the config file.
    #[arg(short, long, default_value = "meridian.toml")]
    pub config: PathBuf,

    /// Path for the authority secret key (hex).
    #[arg(long, default_value = "meridian-authority.key")]
    pub key_file: PathBuf,

    /// Overwrite existing files.
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs) -> anyhow::Result<()> {
    if !args.force && args.config.exists() {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            args.config.display()
        );
    }
    if !args.force && args.key_file.exists() {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            args.key_file.display()
        );
    }

    let keypair = AuthorityKeypair::generate();
    std::fs::write(&args.key_file, keypair.secret_hex())?;

    let mut config = MeridianConfig::default().with_demo_topology();
    config.attestation.authority_public_key = Some(keypair.public().to_hex());
    config.save(&args.config)?;

    println!("Wrote config:        {}", args.config.display());
    println!("Wrote authority key: {}", args.key_file.display());
    println!("Authority public key: {}", keypair.public().to_hex());
    println!();
    println!("Start the node with: meridian-node start --config {}", args.config.display());

    Ok(())
}
