use std::fmt;

use pbkdf2::pbkdf2_hmac;
use serde::{Serialize, Serializer};
use sha2::Sha512;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::path::{DerivationPath, SEPARATOR};

/// PBKDF2 rounds, per the BIP-39 seed-derivation step.
const ROUNDS: u32 = 2048;

/// Literal salt, per the BIP-39 seed-derivation step with an empty
/// passphrase.
const SALT: &[u8] = b"mnemonic";

/// A 32-byte secret seed, deterministically derived from (phrase, label).
///
/// Zeroed on drop. Serializes and renders as lowercase `0x`-prefixed hex;
/// that exact formatting is a compatibility contract of the output stage.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; 32]);

impl Seed {
    /// Wraps raw seed bytes, e.g. a seed produced outside this engine.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw seed bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase `0x`-prefixed hex rendering.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(<redacted>)")
    }
}

impl Serialize for Seed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Derives the secret seed for one label.
///
/// The derivation input is always `phrase//label`, binding every derived
/// seed to the specific root phrase and preventing cross-phrase seed
/// collisions. The function is the BIP-39 seed step (PBKDF2-HMAC-SHA512,
/// 2048 rounds, literal salt `mnemonic`, output truncated to 32 bytes)
/// applied to a non-standard password input, used purely as a reproducible,
/// slow, one-way function.
///
/// Pure: no I/O, no shared state, safe to call concurrently for different
/// labels. An empty phrase is still a valid, deterministic input at this
/// layer; absent input is rejected earlier by [`crate::MasterPhrase::new`].
#[must_use]
pub fn derive_seed(phrase: &str, path: &DerivationPath) -> Seed {
    let mut input = format!("{phrase}{SEPARATOR}{path}");
    let mut out = [0u8; 32];
    pbkdf2_hmac::<Sha512>(input.as_bytes(), SALT, ROUNDS, &mut out);
    input.zeroize();
    Seed(out)
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    const TEST_PHRASE: &str =
        "test test test test test test test test test test test junk";

    fn path(s: &str) -> DerivationPath {
        s.parse().unwrap()
    }

    #[test]
    fn golden_vector() {
        let seed = derive_seed(TEST_PHRASE, &path("diego"));
        assert_eq!(
            seed.as_bytes(),
            &hex!("691db80c78f74f7add4824afb0483060184d6df083b0c25dd4c767c5ec573dbf")
        );
        assert_eq!(
            seed.to_hex(),
            "0x691db80c78f74f7add4824afb0483060184d6df083b0c25dd4c767c5ec573dbf"
        );
    }

    #[test]
    fn same_inputs_yield_byte_identical_output() {
        let a = derive_seed(TEST_PHRASE, &path("diego"));
        let b = derive_seed(TEST_PHRASE, &path("diego"));
        assert_eq!(a, b);
    }

    #[test]
    fn seed_is_bound_to_the_phrase() {
        let a = derive_seed(TEST_PHRASE, &path("diego"));
        let b = derive_seed("another phrase entirely", &path("diego"));
        assert_ne!(a, b);
    }

    #[test]
    fn changing_only_the_label_changes_the_seed() {
        let a = derive_seed(TEST_PHRASE, &path("diego"));
        let b = derive_seed(TEST_PHRASE, &path("diego//stash"));
        let c = derive_seed(TEST_PHRASE, &path("pele"));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn empty_phrase_is_deterministic() {
        let a = derive_seed("", &path("diego"));
        let b = derive_seed("", &path("diego"));
        assert_eq!(a, b);
    }

    #[test]
    fn debug_output_hides_the_bytes() {
        let seed = derive_seed(TEST_PHRASE, &path("diego"));
        assert_eq!(format!("{seed:?}"), "Seed(<redacted>)");
    }
}
