//! Subcommand handlers.

pub mod keys;
pub mod record;

/// Key pair location used when neither a flag nor the environment names one.
pub const DEFAULT_KEYPAIR_PATH: &str = "keys/keypair.json";
