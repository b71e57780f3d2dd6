use thiserror::Error;

/// Error outputs from the KeyForge derivation engine.
///
/// Per-label failures carry only the cause; the batch layer pairs them with
/// the offending label so the operator can re-run just that derivation.
#[derive(Debug, Error)]
pub enum KeyforgeError {
    /// A required input was absent or empty where that is not permitted.
    #[error("missing_input: {0}")]
    MissingInput(&'static str),

    /// A derivation path segment is empty or contains a path separator.
    #[error("invalid_path_segment: `{0}`")]
    InvalidPathSegment(String),

    /// The master phrase is not a valid BIP-39 mnemonic. The entropy-based
    /// session-key seed construction requires one; plain account seeds do not.
    #[error("invalid_mnemonic: {0}")]
    InvalidMnemonic(String),

    /// The derived seed bytes are not a valid private key for the target
    /// curve. Effectively never occurs, but is surfaced rather than ignored.
    #[error("invalid_seed: {0}")]
    InvalidSeed(String),

    /// The external derivation tool failed to launch or exited non-zero.
    #[error("external_tool_failure: {0}")]
    ExternalToolFailure(String),

    /// The external derivation tool did not finish within the configured
    /// timeout. The only error kind that is automatically retried.
    #[error("external_tool_timeout: no response within {timeout_ms}ms")]
    ExternalToolTimeout {
        /// The timeout that expired, in milliseconds.
        timeout_ms: u64,
    },

    /// The external tool's output is missing a required field. The pair is
    /// rejected outright rather than returned with an empty field.
    #[error("malformed_external_output: field `{field}` not found")]
    MalformedExternalOutput {
        /// The field that could not be found in the output.
        field: &'static str,
    },
}
