//! Integration tests for the lexsig binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn command(args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lexsig"));
    cmd.args(args)
        .env_remove("LEXSIG_KEY_DIR")
        .env_remove("LEXSIG_KEYPAIR")
        .env("NO_COLOR", "1");
    cmd
}

fn lexsig(args: &[&str]) -> Output {
    command(args).output().expect("failed to execute lexsig")
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

/// Generate a key pair and an unsigned record inside `dir`.
fn setup(dir: &TempDir) -> (PathBuf, PathBuf) {
    let keys_dir = dir.path().join("keys");
    let output = lexsig(&["keys", "generate", "--dir", path_str(&keys_dir)]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let record_path = dir.path().join("record.json");
    let output = lexsig(&[
        "record",
        "new",
        "--text",
        "Hello, AT Protocol! This is a signed lexicon record.",
        "--author",
        "did:plc:example123",
        "--created-at",
        "2023-04-10T12:00:00Z",
        "--out",
        path_str(&record_path),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    (keys_dir.join("keypair.json"), record_path)
}

#[test]
fn test_keys_generate_writes_keypair() {
    let dir = TempDir::new().unwrap();
    let keys_dir = dir.path().join("keys");

    let output = lexsig(&["keys", "generate", "--dir", path_str(&keys_dir)]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Generated P-256 Key Pair"));
    assert!(stdout.contains("did:key:zDn"));
    assert!(stdout.contains("Key pair verified"));
    assert!(!stdout.contains("Private Key"));

    let content = fs::read_to_string(keys_dir.join("keypair.json")).unwrap();
    let pair: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(pair["privateKey"].is_string());
    assert!(pair["publicKey"].is_string());
    assert!(pair["didKey"].as_str().unwrap().starts_with("did:key:"));
}

#[test]
fn test_keys_generate_other_type_and_print() {
    let dir = TempDir::new().unwrap();
    let output = lexsig(&[
        "keys",
        "generate",
        "--type",
        "ed25519",
        "--dir",
        path_str(dir.path()),
        "--print",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Private Key"));
    assert!(stdout.contains("did:key:z6Mk"));
}

#[test]
fn test_keys_generate_rejects_unknown_type() {
    let dir = TempDir::new().unwrap();
    let output = lexsig(&["keys", "generate", "--type", "rsa", "--dir", path_str(dir.path())]);
    assert!(!output.status.success());
}

#[test]
fn test_keys_check() {
    let dir = TempDir::new().unwrap();
    let (keys_path, _) = setup(&dir);

    let output = lexsig(&["keys", "check", path_str(&keys_path)]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Key pair valid"));
}

#[test]
fn test_keys_check_missing_file() {
    let output = lexsig(&["keys", "check", "/nonexistent/keypair.json"]);
    assert!(!output.status.success());
}

#[test]
fn test_sign_then_verify_with_key_file() {
    let dir = TempDir::new().unwrap();
    let (keys_path, record_path) = setup(&dir);

    let output = lexsig(&[
        "record",
        "sign",
        path_str(&record_path),
        "--keys",
        path_str(&keys_path),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let signed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&record_path).unwrap()).unwrap();
    assert!(signed["signature"].is_string());

    let output = lexsig(&[
        "record",
        "verify",
        path_str(&record_path),
        "--keys",
        path_str(&keys_path),
    ]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("VALID"));
}

#[test]
fn test_verify_with_did() {
    let dir = TempDir::new().unwrap();
    let (keys_path, record_path) = setup(&dir);
    lexsig(&["record", "sign", path_str(&record_path), "--keys", path_str(&keys_path)]);

    let pair: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&keys_path).unwrap()).unwrap();
    let did = pair["didKey"].as_str().unwrap();

    let output = lexsig(&["record", "verify", path_str(&record_path), "--did", did]);
    assert!(output.status.success());
}

#[test]
fn test_verify_rejects_both_keys_and_did() {
    let dir = TempDir::new().unwrap();
    let (keys_path, record_path) = setup(&dir);
    lexsig(&["record", "sign", path_str(&record_path), "--keys", path_str(&keys_path)]);

    let output = lexsig(&[
        "record",
        "verify",
        path_str(&record_path),
        "--keys",
        path_str(&keys_path),
        "--did",
        "did:key:zDnaepBuvsQ8cpsWrVKw8fbpGpvPeNSjVPTWoq6cRqaYzBKVP",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot be used with"));
}

#[test]
fn test_verify_did_ignores_keypair_env() {
    let dir = TempDir::new().unwrap();
    let (keys_path, record_path) = setup(&dir);
    lexsig(&["record", "sign", path_str(&record_path), "--keys", path_str(&keys_path)]);

    let pair: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&keys_path).unwrap()).unwrap();
    let did = pair["didKey"].as_str().unwrap();

    let output = command(&["record", "verify", path_str(&record_path), "--did", did])
        .env("LEXSIG_KEYPAIR", "/nonexistent/keypair.json")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn test_verify_falls_back_to_keypair_env() {
    let dir = TempDir::new().unwrap();
    let (keys_path, record_path) = setup(&dir);
    lexsig(&["record", "sign", path_str(&record_path), "--keys", path_str(&keys_path)]);

    let output = command(&["record", "verify", path_str(&record_path)])
        .env("LEXSIG_KEYPAIR", &keys_path)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn test_verify_rejects_repeated_key_record() {
    let dir = TempDir::new().unwrap();
    let (keys_path, record_path) = setup(&dir);
    fs::write(&record_path, r#"{"text":"good"}"#).unwrap();
    lexsig(&["record", "sign", path_str(&record_path), "--keys", path_str(&keys_path)]);

    let signed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&record_path).unwrap()).unwrap();
    let signature = signed["signature"].as_str().unwrap();
    let forged = format!(r#"{{"text":"evil","text":"good","signature":"{signature}"}}"#);
    fs::write(&record_path, forged).unwrap();

    let output = lexsig(&[
        "record",
        "verify",
        path_str(&record_path),
        "--keys",
        path_str(&keys_path),
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("duplicate key"));
}

#[test]
fn test_verify_tampered_record_fails() {
    let dir = TempDir::new().unwrap();
    let (keys_path, record_path) = setup(&dir);
    lexsig(&["record", "sign", path_str(&record_path), "--keys", path_str(&keys_path)]);

    let mut record: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&record_path).unwrap()).unwrap();
    record["text"] = serde_json::json!("Tampered text");
    fs::write(&record_path, serde_json::to_string(&record).unwrap()).unwrap();

    let output = lexsig(&[
        "record",
        "verify",
        path_str(&record_path),
        "--keys",
        path_str(&keys_path),
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not match"));
}

#[test]
fn test_verify_unsigned_record_fails() {
    let dir = TempDir::new().unwrap();
    let (keys_path, record_path) = setup(&dir);

    let output = lexsig(&[
        "record",
        "verify",
        path_str(&record_path),
        "--keys",
        path_str(&keys_path),
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot verify unsigned record"));
}

#[test]
fn test_canonical_omits_signature() {
    let dir = TempDir::new().unwrap();
    let (keys_path, record_path) = setup(&dir);

    let before = lexsig(&["record", "canonical", path_str(&record_path)]);
    lexsig(&["record", "sign", path_str(&record_path), "--keys", path_str(&keys_path)]);
    let after = lexsig(&["record", "canonical", path_str(&record_path)]);

    assert!(before.status.success());
    assert_eq!(before.stdout, after.stdout);
    let canonical = String::from_utf8_lossy(&after.stdout);
    assert!(canonical.starts_with(r#"{"$type":"app.bsky.feed.post","author":"did:plc:example123""#));
    assert!(!canonical.contains("signature"));
}
