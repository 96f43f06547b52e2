//! Key pair CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use lexsig_keys::{store, KeyPair, KeyType};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Args)]
pub struct KeysArgs {
    #[command(subcommand)]
    pub command: KeysCommand,
}

#[derive(Debug, Subcommand)]
pub enum KeysCommand {
    /// Generate a key pair and save it as <DIR>/keypair.json
    Generate {
        /// Key algorithm: p256, secp256k1 or ed25519
        #[arg(long = "type", default_value = "p256")]
        key_type: KeyType,
        /// Directory for keypair.json (created if missing)
        #[arg(long, env = "LEXSIG_KEY_DIR", default_value = "keys")]
        dir: PathBuf,
        /// Also print the private key
        #[arg(long)]
        print: bool,
    },
    /// Load a key pair file and check that its three encodings agree
    Check {
        /// Path to a keypair.json file
        path: PathBuf,
    },
}

pub fn run(args: KeysArgs) -> Result<()> {
    match args.command {
        KeysCommand::Generate {
            key_type,
            dir,
            print,
        } => cmd_generate(key_type, &dir, print),
        KeysCommand::Check { path } => cmd_check(&path),
    }
}

/// Handle `lexsig keys generate`.
pub fn cmd_generate(key_type: KeyType, dir: &Path, print_private: bool) -> Result<()> {
    let pair = KeyPair::generate(key_type).context("failed to generate key pair")?;
    let path = store::save(&pair, dir)
        .with_context(|| format!("failed to save key pair to {}", dir.display()))?;

    // Read the file back so what is on disk is what gets checked.
    let stored = store::load(&path)?;
    stored
        .check()
        .with_context(|| format!("saved key pair at {} failed verification", path.display()))?;
    info!(%key_type, path = %path.display(), did = %stored.did_key, "generated key pair");

    println!("{}", format!("Generated {key_type} Key Pair").bold().underline());
    if print_private {
        println!("{}: {}", "Private Key (Multibase)".bold().red(), stored.private_key);
    }
    println!("{}: {}", "Public Key (Multibase)".bold(), stored.public_key);
    println!("{}: {}", "Public Key (DID)".bold().green(), stored.did_key);
    println!("{} Key pair saved to {}", "✓".green(), path.display());
    println!("{} Key pair verified", "✓".green());
    if print_private {
        println!();
        println!("{}", "WARNING: Keep the private key secret!".yellow().bold());
    }
    Ok(())
}

/// Handle `lexsig keys check`.
pub fn cmd_check(path: &Path) -> Result<()> {
    let pair = store::load(path)
        .with_context(|| format!("failed to load key pair from {}", path.display()))?;
    pair.check()
        .with_context(|| format!("key pair at {} is inconsistent", path.display()))?;

    let key_type = pair.public_key()?.key_type();
    info!(%key_type, path = %path.display(), "key pair checked");

    println!("{} Key pair valid", "✓".green().bold());
    println!("  {}: {}", "Type".bold(), key_type);
    println!("  {}: {}", "DID".bold(), pair.did_key);
    Ok(())
}
