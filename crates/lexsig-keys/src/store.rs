//! JSON persistence for [`KeyPair`].

use crate::{KeyPair, StoreError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name used inside the key directory.
pub const KEYPAIR_FILE: &str = "keypair.json";

/// Write `pair` as pretty-printed JSON to `<dir>/keypair.json`, creating `dir`
/// if needed. Returns the path written.
pub fn save<P: AsRef<Path>>(pair: &KeyPair, dir: P) -> Result<PathBuf, StoreError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let json = serde_json::to_string_pretty(pair)?;
    let path = dir.join(KEYPAIR_FILE);
    write_private(&path, json.as_bytes()).map_err(|source| StoreError::Io {
        path: path.clone(),
        source,
    })?;

    debug!(path = %path.display(), did = %pair.did_key, "saved key pair");
    Ok(path)
}

/// Read and parse a key pair file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<KeyPair, StoreError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let pair: KeyPair = serde_json::from_str(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), did = %pair.did_key, "loaded key pair");
    Ok(pair)
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation; tighten a pre-existing file too.
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    fs::write(path, contents)
}
