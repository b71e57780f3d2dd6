use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::error::KeyforgeError;

/// The single human-memorable secret all keys are derived from.
///
/// Stored as a [`SecretString`] so the phrase never leaks through debug
/// output or logs; it is exposed only at the derivation boundary.
pub struct MasterPhrase(SecretString);

impl MasterPhrase {
    /// Wraps a phrase, rejecting absent input before any derivation begins.
    ///
    /// An unusual but non-blank phrase is accepted: derivation is still
    /// deterministic for it, and validity as a BIP-39 mnemonic is only
    /// required by the session-key schemes, which check it themselves.
    ///
    /// # Errors
    ///
    /// Returns [`KeyforgeError::MissingInput`] if the phrase is empty or
    /// contains only whitespace.
    pub fn new(phrase: impl Into<String>) -> Result<Self, KeyforgeError> {
        let phrase = phrase.into();
        if phrase.trim().is_empty() {
            return Err(KeyforgeError::MissingInput("mnemonic"));
        }
        Ok(Self(SecretString::from(phrase)))
    }

    /// Exposes the phrase for assembling a derivation input.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for MasterPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterPhrase(<redacted>)")
    }
}
