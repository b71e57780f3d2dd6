//! In-process session-key derivation.
//!
//! Reproduces the hard-junction derivation performed by `subkey inspect`
//! for SURIs of the form `phrase//segment//segment`, so session keys can be
//! derived without a subprocess boundary: mnemonic entropy → mini secret →
//! one hard derivation per path segment → scheme key pair.

use bip39::Mnemonic;
use blake2::{digest::consts::U32, Blake2b, Digest};
use pbkdf2::pbkdf2_hmac;
use schnorrkel::{derive::ChainCode, ExpansionMode, MiniSecretKey};
use sha2::Sha512;
use zeroize::Zeroize;

use crate::{
    error::KeyforgeError,
    path::DerivationPath,
    session::{SessionKeyPair, SessionScheme},
};

type Blake2b256 = Blake2b<U32>;

/// Domain tag for hard derivation of non-ristretto schemes.
const HDKD_TAG: &[u8] = b"Ed25519HDKD";

/// Derives one session key pair in-process.
///
/// Output hex is lowercase and `0x`-prefixed, matching what `subkey`
/// prints, so both backends satisfy the same output contract.
///
/// # Errors
///
/// Returns [`KeyforgeError::InvalidMnemonic`] if the phrase is not a valid
/// BIP-39 mnemonic; unlike the plain account seeds, the session-key seed is
/// built from the phrase's entropy, which requires one.
pub fn derive_session_pair(
    phrase: &str,
    path: &DerivationPath,
    scheme: SessionScheme,
) -> Result<SessionKeyPair, KeyforgeError> {
    let mut secret = mini_secret(phrase)?;
    for segment in path.segments() {
        let cc = chain_code(segment);
        let next = match scheme {
            SessionScheme::Sr25519 => sr25519_hard(&secret, &cc)?,
            SessionScheme::Ed25519 => ed25519_hard(&secret, &cc),
        };
        secret.zeroize();
        secret = next;
    }
    let public = match scheme {
        SessionScheme::Sr25519 => sr25519_public(&secret)?,
        SessionScheme::Ed25519 => ed25519_public(&secret),
    };
    let pair = SessionKeyPair {
        secret: format!("0x{}", hex::encode(secret)),
        public: format!("0x{}", hex::encode(public)),
    };
    secret.zeroize();
    Ok(pair)
}

/// Derives the 32-byte mini secret from a BIP-39 mnemonic.
///
/// This is the substrate seed construction: PBKDF2-HMAC-SHA512 over the
/// phrase's *entropy* (not the phrase string itself), salt `mnemonic` with
/// an empty passphrase, truncated to 32 bytes.
fn mini_secret(phrase: &str) -> Result<[u8; 32], KeyforgeError> {
    let mnemonic = Mnemonic::parse_normalized(phrase)
        .map_err(|e| KeyforgeError::InvalidMnemonic(e.to_string()))?;
    let mut entropy = mnemonic.to_entropy();
    let mut seed = [0u8; 64];
    pbkdf2_hmac::<Sha512>(&entropy, b"mnemonic", 2048, &mut seed);
    entropy.zeroize();
    let mut mini = [0u8; 32];
    mini.copy_from_slice(&seed[..32]);
    seed.zeroize();
    Ok(mini)
}

/// Chain code for one path segment: the SCALE encoding of the segment,
/// hashed down with blake2b-256 if longer than 32 bytes, zero-padded
/// otherwise.
fn chain_code(segment: &str) -> [u8; 32] {
    let encoded = scale_encode_segment(segment);
    let mut cc = [0u8; 32];
    if encoded.len() > 32 {
        cc.copy_from_slice(&Blake2b256::digest(&encoded));
    } else {
        cc[..encoded.len()].copy_from_slice(&encoded);
    }
    cc
}

/// SCALE encoding of a junction segment: numeric segments encode as a u64,
/// everything else as a length-prefixed string, mirroring the junction
/// rules of the external tool.
fn scale_encode_segment(segment: &str) -> Vec<u8> {
    if let Ok(n) = segment.parse::<u64>() {
        return n.to_le_bytes().to_vec();
    }
    let mut out = scale_compact_len(segment.len());
    out.extend_from_slice(segment.as_bytes());
    out
}

/// SCALE compact encoding of a length. Real segments are far below the
/// single-byte limit; the wider modes are covered for completeness.
#[allow(clippy::cast_possible_truncation)]
fn scale_compact_len(len: usize) -> Vec<u8> {
    match len {
        0..=0x3f => vec![(len as u8) << 2],
        0x40..=0x3fff => (((len as u16) << 2) | 0b01).to_le_bytes().to_vec(),
        _ => (((len as u32) << 2) | 0b10).to_le_bytes().to_vec(),
    }
}

/// One sr25519 hard junction: expanded secret → derived mini secret.
fn sr25519_hard(seed: &[u8; 32], cc: &[u8; 32]) -> Result<[u8; 32], KeyforgeError> {
    let mini = MiniSecretKey::from_bytes(seed)
        .map_err(|e| KeyforgeError::InvalidSeed(e.to_string()))?;
    let expanded = mini.expand(ExpansionMode::Ed25519);
    let (derived, _) = expanded.hard_derive_mini_secret_key(Some(ChainCode(*cc)), b"");
    Ok(derived.to_bytes())
}

/// Public key for an sr25519 mini secret.
fn sr25519_public(seed: &[u8; 32]) -> Result<[u8; 32], KeyforgeError> {
    let mini = MiniSecretKey::from_bytes(seed)
        .map_err(|e| KeyforgeError::InvalidSeed(e.to_string()))?;
    Ok(mini.expand_to_public(ExpansionMode::Ed25519).to_bytes())
}

/// One ed25519 hard junction:
/// `blake2b-256(SCALE(("Ed25519HDKD", seed, cc)))`.
fn ed25519_hard(seed: &[u8; 32], cc: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(scale_compact_len(HDKD_TAG.len()));
    hasher.update(HDKD_TAG);
    hasher.update(seed);
    hasher.update(cc);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Public key for an ed25519 seed.
fn ed25519_public(seed: &[u8; 32]) -> [u8; 32] {
    ed25519_dalek::SigningKey::from_bytes(seed)
        .verifying_key()
        .to_bytes()
}
