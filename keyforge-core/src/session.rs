use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A validator-facing operational role with its own session key.
///
/// The variant order here is the fixed output order: babe, gran, imon.
/// Downstream node configuration keys off that layout, so it must be
/// reproduced exactly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SessionRole {
    /// Block production.
    Babe,
    /// Finality voting (GRANDPA).
    Gran,
    /// Liveness heartbeats (I'm Online).
    Imon,
}

impl SessionRole {
    /// All roles, in their fixed output order.
    pub const ALL: [Self; 3] = [Self::Babe, Self::Gran, Self::Imon];

    /// The signature scheme each role is bound to.
    ///
    /// The binding is part of the run's configuration in the sense of being
    /// explicit and inspectable here, rather than buried in control flow.
    #[must_use]
    pub const fn scheme(self) -> SessionScheme {
        match self {
            Self::Babe | Self::Imon => SessionScheme::Sr25519,
            Self::Gran => SessionScheme::Ed25519,
        }
    }
}

/// A signature scheme used for session keys.
///
/// The string form matches the scheme names accepted by `subkey inspect
/// --scheme`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SessionScheme {
    /// Schnorr signatures over the Ristretto group.
    Sr25519,
    /// Edwards-curve signatures.
    Ed25519,
}

/// One derived session key: hex secret seed and hex public key, exactly as
/// the backend returned them.
///
/// The hex case and prefix are left untouched; they are part of the
/// compatibility contract with tooling that consumes the output.
#[derive(Debug, Clone, Serialize)]
pub struct SessionKeyPair {
    /// Hex secret seed.
    pub secret: String,
    /// Hex public key.
    pub public: String,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn role_order_is_babe_gran_imon() {
        let names: Vec<String> =
            SessionRole::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["babe", "gran", "imon"]);
    }

    #[test]
    fn role_scheme_binding() {
        assert_eq!(SessionRole::Babe.scheme(), SessionScheme::Sr25519);
        assert_eq!(SessionRole::Gran.scheme(), SessionScheme::Ed25519);
        assert_eq!(SessionRole::Imon.scheme(), SessionScheme::Sr25519);
    }

    #[test]
    fn scheme_names_match_subkey() {
        assert_eq!(SessionScheme::Sr25519.to_string(), "sr25519");
        assert_eq!(SessionScheme::Ed25519.to_string(), "ed25519");
        assert_eq!(
            SessionScheme::from_str("sr25519").unwrap(),
            SessionScheme::Sr25519
        );
    }
}
