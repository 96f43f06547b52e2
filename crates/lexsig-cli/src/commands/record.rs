//! Record CLI commands.
//!
//! Records on disk are JSON objects. Any object can be signed; `record new`
//! writes a lexicon post as a starting point.

use super::DEFAULT_KEYPAIR_PATH;
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use clap::{Args, Subcommand};
use colored::Colorize;
use lexsig_envelope::{parse_json_record, LexiconRecord, RecordSigning};
use lexsig_keys::{store, PublicKey};
use serde_json::{Map, Value};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming the key pair file.
const KEYPAIR_ENV: &str = "LEXSIG_KEYPAIR";

/// A record file as loaded from disk.
pub type JsonRecord = Map<String, Value>;

#[derive(Debug, Args)]
pub struct RecordArgs {
    #[command(subcommand)]
    pub command: RecordCommand,
}

#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// Write a new unsigned lexicon record
    New {
        /// Post text
        #[arg(long)]
        text: String,
        /// Author DID
        #[arg(long)]
        author: String,
        /// Lexicon type identifier
        #[arg(long = "type", default_value = "app.bsky.feed.post")]
        record_type: String,
        /// RFC 3339 creation time (default: now)
        #[arg(long)]
        created_at: Option<String>,
        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Sign a record with a stored key pair
    Sign {
        /// Path to the record JSON file
        record: PathBuf,
        /// Path to keypair.json
        #[arg(long, env = KEYPAIR_ENV, default_value = DEFAULT_KEYPAIR_PATH)]
        keys: PathBuf,
        /// Write the signed record here instead of overwriting the input
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Verify a record's signature
    Verify {
        /// Path to the record JSON file
        record: PathBuf,
        /// Path to keypair.json [default: $LEXSIG_KEYPAIR, then keys/keypair.json]
        #[arg(long)]
        keys: Option<PathBuf>,
        /// Verify against a did:key or multibase public key instead of a key file
        #[arg(long, conflicts_with = "keys")]
        did: Option<String>,
    },
    /// Print the canonical bytes a signature covers
    Canonical {
        /// Path to the record JSON file
        record: PathBuf,
    },
}

pub fn run(args: RecordArgs) -> Result<()> {
    match args.command {
        RecordCommand::New {
            text,
            author,
            record_type,
            created_at,
            out,
        } => cmd_new(&record_type, &text, &author, created_at.as_deref(), out.as_deref()),
        RecordCommand::Sign { record, keys, out } => {
            cmd_sign(&record, &keys, out.as_deref().unwrap_or(record.as_path()))
        }
        RecordCommand::Verify { record, keys, did } => {
            let public_key = match did {
                Some(did) => did
                    .parse::<PublicKey>()
                    .with_context(|| format!("invalid public key {did}"))?,
                None => {
                    let path = keys
                        .or_else(|| env::var_os(KEYPAIR_ENV).map(PathBuf::from))
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_KEYPAIR_PATH));
                    load_public_key(&path)?
                }
            };
            cmd_verify(&record, &public_key)
        }
        RecordCommand::Canonical { record } => cmd_canonical(&record),
    }
}

/// Handle `lexsig record new`.
pub fn cmd_new(
    record_type: &str,
    text: &str,
    author: &str,
    created_at: Option<&str>,
    out: Option<&Path>,
) -> Result<()> {
    let created_at = match created_at {
        Some(ts) => {
            DateTime::parse_from_rfc3339(ts)
                .with_context(|| format!("createdAt {ts:?} is not an RFC 3339 timestamp"))?;
            ts.to_string()
        }
        None => Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    let record = LexiconRecord::new(record_type, text, created_at, author);
    let json = serde_json::to_string_pretty(&record)?;
    match out {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("failed to write record to {}", path.display()))?;
            println!("{} Record written to {}", "✓".green(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Handle `lexsig record sign`.
pub fn cmd_sign(record_path: &Path, keys_path: &Path, out: &Path) -> Result<()> {
    let mut record = load_record(record_path)?;
    let pair = store::load(keys_path)
        .with_context(|| format!("failed to load key pair from {}", keys_path.display()))?;
    let private_key = pair
        .private_key()
        .with_context(|| format!("invalid private key in {}", keys_path.display()))?;

    record
        .sign_with(&private_key)
        .with_context(|| format!("failed to sign {}", record_path.display()))?;
    save_record(&record, out)?;

    info!(record = %record_path.display(), did = %pair.did_key, "signed record");
    println!("{} Record signed by {}", "✓".green(), pair.did_key);
    println!("  {}: {}", "Output".bold(), out.display());
    Ok(())
}

/// Handle `lexsig record verify`.
pub fn cmd_verify(record_path: &Path, public_key: &PublicKey) -> Result<()> {
    let record = load_record(record_path)?;
    record
        .verify_with(public_key)
        .with_context(|| format!("verification of {} failed", record_path.display()))?;

    info!(record = %record_path.display(), did = %public_key, "verified record");
    println!("{} Signature valid", "✓".green().bold());
    println!("  {}: {}", "Signer".bold(), public_key.did_key());
    println!("  {}: {}", "Status".bold(), "VALID".green().bold());
    Ok(())
}

/// Handle `lexsig record canonical`.
pub fn cmd_canonical(record_path: &Path) -> Result<()> {
    let record = load_record(record_path)?;
    let canonical = record.canonical_bytes()?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&canonical)?;
    writeln!(stdout)?;
    Ok(())
}

/// Load a record file; it must contain a JSON object with no repeated keys.
pub fn load_record(path: &Path) -> Result<JsonRecord> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read record {}", path.display()))?;
    parse_json_record(&content)
        .with_context(|| format!("failed to parse record {}", path.display()))
}

fn save_record(record: &JsonRecord, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(record)?;
    fs::write(path, json).with_context(|| format!("failed to write record to {}", path.display()))
}

fn load_public_key(keys_path: &Path) -> Result<PublicKey> {
    let pair = store::load(keys_path)
        .with_context(|| format!("failed to load key pair from {}", keys_path.display()))?;
    pair.public_key()
        .with_context(|| format!("invalid public key in {}", keys_path.display()))
}
