use alloy_primitives::Address;
use k256::ecdsa::SigningKey;

use crate::{error::KeyforgeError, seed::Seed};

/// Computes the checksummed account address for a seed.
///
/// The seed bytes are used directly as a secp256k1 private key; the address
/// is the standard 20-byte identifier of the corresponding public key,
/// rendered with the mixed-case checksum encoding in which each character's
/// case is determined by a hash of the lowercase hex form. The checksum
/// algorithm is a compatibility surface and is delegated to
/// [`Address::to_checksum`] rather than re-implemented.
///
/// # Errors
///
/// Returns [`KeyforgeError::InvalidSeed`] if the seed is not a valid
/// private key for the curve (zero, or not below the group order). The
/// probability of hitting this with a derived seed is effectively zero,
/// but it is surfaced rather than ignored.
pub fn seed_to_address(seed: &Seed) -> Result<String, KeyforgeError> {
    let key = SigningKey::from_bytes(seed.as_bytes().into())
        .map_err(|e| KeyforgeError::InvalidSeed(e.to_string()))?;
    Ok(Address::from_private_key(&key).to_checksum(None))
}
