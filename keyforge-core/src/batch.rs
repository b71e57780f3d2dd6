//! Batch orchestration: iterate the configured labels in order, derive,
//! and collect per-label failures without aborting the rest of the run.
//!
//! Labels are independent, so one label's failure never hides another
//! label's result; the outcome carries both lists and the caller decides
//! how loudly to fail.

use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    address::seed_to_address,
    error::KeyforgeError,
    hdkd::derive_session_pair,
    path::DerivationPath,
    phrase::MasterPhrase,
    seed::{derive_seed, Seed},
    session::{SessionKeyPair, SessionRole},
    subkey::SubkeyTool,
};

/// One derived technical account.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    /// The account's label.
    pub name: DerivationPath,
    /// The derived secret seed.
    pub seed: Seed,
    /// The checksummed account address.
    pub address: String,
}

/// A full set of session keys for one validator name.
#[derive(Debug, Clone, Serialize)]
pub struct SessionKeySet {
    /// The validator's account name.
    pub name: DerivationPath,
    /// Block-production key (sr25519).
    pub babe: SessionKeyPair,
    /// Finality key (ed25519).
    pub gran: SessionKeyPair,
    /// Liveness key (sr25519).
    pub imon: SessionKeyPair,
}

impl SessionKeySet {
    /// The set's pairs tagged by role, in fixed output order.
    #[must_use]
    pub const fn in_role_order(&self) -> [(SessionRole, &SessionKeyPair); 3] {
        [
            (SessionRole::Babe, &self.babe),
            (SessionRole::Gran, &self.gran),
            (SessionRole::Imon, &self.imon),
        ]
    }
}

/// A failed label, kept alongside the successes so the operator can re-run
/// just that derivation.
#[derive(Debug)]
pub struct LabelFailure {
    /// The label that failed.
    pub label: DerivationPath,
    /// Why it failed.
    pub error: KeyforgeError,
}

/// The outcome of a batch: the records that succeeded, in configured
/// order, plus the labels that failed. Partial success is visible, never
/// silently dropped.
#[derive(Debug)]
pub struct BatchOutcome<T> {
    /// Successful records, in configured order.
    pub records: Vec<T>,
    /// Per-label failures, in encounter order.
    pub failures: Vec<LabelFailure>,
}

impl<T> BatchOutcome<T> {
    /// True if every label succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Backend used for session-key derivation.
#[derive(Debug, Clone)]
pub enum SessionBackend {
    /// Derive in-process with the embedded scheme implementations.
    Embedded,
    /// Shell out to a `subkey`-compatible binary.
    External(SubkeyTool),
}

impl SessionBackend {
    async fn derive(
        &self,
        phrase: &str,
        path: &DerivationPath,
        role: SessionRole,
    ) -> Result<SessionKeyPair, KeyforgeError> {
        match self {
            Self::Embedded => derive_session_pair(phrase, path, role.scheme()),
            Self::External(tool) => tool.derive(phrase, path, role.scheme()).await,
        }
    }
}

/// Derives every configured technical account, in order.
///
/// A label whose seed fails curve validation is recorded as a failure; the
/// remaining labels still derive.
#[must_use]
pub fn generate_accounts(
    phrase: &MasterPhrase,
    names: &[DerivationPath],
) -> BatchOutcome<Account> {
    let mut records = Vec::with_capacity(names.len());
    let mut failures = Vec::new();
    for name in names {
        let seed = derive_seed(phrase.expose(), name);
        match seed_to_address(&seed) {
            Ok(address) => {
                debug!(%name, %address, "derived account");
                records.push(Account {
                    name: name.clone(),
                    seed,
                    address,
                });
            }
            Err(error) => {
                warn!(%name, %error, "account derivation failed");
                failures.push(LabelFailure {
                    label: name.clone(),
                    error,
                });
            }
        }
    }
    BatchOutcome { records, failures }
}

/// Derives babe/gran/imon session keys for each configured validator name,
/// roles in fixed order.
///
/// One role's failure fails that whole name (a partial role set would be
/// unusable as node configuration) but never the other names.
pub async fn generate_session_keys(
    phrase: &MasterPhrase,
    names: &[DerivationPath],
    backend: &SessionBackend,
) -> BatchOutcome<SessionKeySet> {
    let mut records = Vec::with_capacity(names.len());
    let mut failures = Vec::new();
    for name in names {
        match session_set(phrase.expose(), name, backend).await {
            Ok(set) => {
                debug!(%name, "derived session keys");
                records.push(set);
            }
            Err(error) => {
                warn!(%name, %error, "session key derivation failed");
                failures.push(LabelFailure {
                    label: name.clone(),
                    error,
                });
            }
        }
    }
    BatchOutcome { records, failures }
}

async fn session_set(
    phrase: &str,
    name: &DerivationPath,
    backend: &SessionBackend,
) -> Result<SessionKeySet, KeyforgeError> {
    let babe = derive_role(phrase, name, SessionRole::Babe, backend).await?;
    let gran = derive_role(phrase, name, SessionRole::Gran, backend).await?;
    let imon = derive_role(phrase, name, SessionRole::Imon, backend).await?;
    Ok(SessionKeySet {
        name: name.clone(),
        babe,
        gran,
        imon,
    })
}

async fn derive_role(
    phrase: &str,
    name: &DerivationPath,
    role: SessionRole,
    backend: &SessionBackend,
) -> Result<SessionKeyPair, KeyforgeError> {
    let path = name.child(&role.to_string())?;
    backend.derive(phrase, &path, role).await
}
