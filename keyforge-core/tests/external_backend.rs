//! Integration tests for the external derivation backend, driven by stub
//! `subkey`-lookalike scripts.

#![cfg(unix)]

use std::{fs, os::unix::fs::PermissionsExt, path::PathBuf, time::Duration};

use keyforge_core::{
    generate_session_keys, KeyforgeError, MasterPhrase, SessionBackend, SubkeyTool,
};

const TEST_PHRASE: &str = "test test test test test test test test test test test junk";

/// Writes an executable stub script and returns its path.
fn stub(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn names(labels: &[&str]) -> Vec<keyforge_core::DerivationPath> {
    labels.iter().map(|l| l.parse().unwrap()).collect()
}

#[tokio::test]
async fn parses_stub_tool_output() {
    let dir = tempfile::tempdir().unwrap();
    let script = stub(
        &dir,
        "subkey-ok",
        r#"echo "Secret Key URI \`$2\` is account:"
echo "  Secret seed:       0x1111111111111111111111111111111111111111111111111111111111111111"
echo "  Public key (hex):  0x2222222222222222222222222222222222222222222222222222222222222222"
"#,
    );

    let backend =
        SessionBackend::External(SubkeyTool::new(script.to_string_lossy()));
    let phrase = MasterPhrase::new(TEST_PHRASE).unwrap();
    let outcome = generate_session_keys(&phrase, &names(&["diego"]), &backend).await;

    assert!(outcome.is_complete());
    let set = &outcome.records[0];
    assert_eq!(
        set.babe.secret,
        "0x1111111111111111111111111111111111111111111111111111111111111111"
    );
    assert_eq!(
        set.gran.public,
        "0x2222222222222222222222222222222222222222222222222222222222222222"
    );
}

#[tokio::test]
async fn missing_field_fails_the_label() {
    let dir = tempfile::tempdir().unwrap();
    let script = stub(
        &dir,
        "subkey-partial",
        r#"echo "  Public key (hex):  0x2222222222222222222222222222222222222222222222222222222222222222"
"#,
    );

    let backend =
        SessionBackend::External(SubkeyTool::new(script.to_string_lossy()));
    let phrase = MasterPhrase::new(TEST_PHRASE).unwrap();
    let outcome = generate_session_keys(&phrase, &names(&["diego"]), &backend).await;

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].label.to_string(), "diego");
    assert!(matches!(
        outcome.failures[0].error,
        KeyforgeError::MalformedExternalOutput {
            field: "Secret seed"
        }
    ));
}

#[tokio::test]
async fn nonzero_exit_fails_the_label_but_not_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let script = stub(
        &dir,
        "subkey-flaky",
        r#"case "$2" in
  *bad*) echo "boom" >&2; exit 1 ;;
esac
echo "  Secret seed:       0x1111111111111111111111111111111111111111111111111111111111111111"
echo "  Public key (hex):  0x2222222222222222222222222222222222222222222222222222222222222222"
"#,
    );

    let backend =
        SessionBackend::External(SubkeyTool::new(script.to_string_lossy()));
    let phrase = MasterPhrase::new(TEST_PHRASE).unwrap();
    let outcome =
        generate_session_keys(&phrase, &names(&["bad", "diego"]), &backend).await;

    // the failing name is reported, the healthy one still derives
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].label.to_string(), "bad");
    assert!(matches!(
        outcome.failures[0].error,
        KeyforgeError::ExternalToolFailure(_)
    ));
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].name.to_string(), "diego");
}

#[tokio::test]
async fn missing_binary_fails_fast() {
    let backend = SessionBackend::External(SubkeyTool::new(
        "/nonexistent/definitely-not-subkey",
    ));
    let phrase = MasterPhrase::new(TEST_PHRASE).unwrap();
    let outcome = generate_session_keys(&phrase, &names(&["diego"]), &backend).await;

    assert_eq!(outcome.failures.len(), 1);
    assert!(matches!(
        outcome.failures[0].error,
        KeyforgeError::ExternalToolFailure(_)
    ));
}

#[tokio::test]
async fn hanging_tool_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let script = stub(&dir, "subkey-hang", "sleep 30\n");

    let tool = SubkeyTool::new(script.to_string_lossy())
        .with_timeout(Duration::from_millis(100))
        .with_retries(1);
    let backend = SessionBackend::External(tool);
    let phrase = MasterPhrase::new(TEST_PHRASE).unwrap();
    let outcome = generate_session_keys(&phrase, &names(&["diego"]), &backend).await;

    assert_eq!(outcome.failures.len(), 1);
    assert!(matches!(
        outcome.failures[0].error,
        KeyforgeError::ExternalToolTimeout { .. }
    ));
}
