//! # ECDSA Recovery (secp256k1)
//!
//! Turns a 65-byte `r || s || v` signature plus a message digest into a
//! recovered 20-byte signer address, or a definite rejection.
//!
//! ## Security Notes
//!
//! - **Malleability**: an S value strictly above half the curve order is the
//!   mirrored encoding of a valid signature and is rejected outright, so each
//!   logical signature has exactly one accepted form.
//! - **Recovery id**: `27`/`28` accepted directly, `0`/`1` normalized up;
//!   everything else is rejected.
//! - **Constant time**: scalar comparisons use the `subtle` crate.
//!
//! The signing half (`sign_digest`) is the validator-side counterpart: it
//! produces exactly the encoding the verifier accepts, so operator tooling
//! and the test suite share one implementation.

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use shared_types::{Address, Hash};
use subtle::Choice;
use zeroize::Zeroize;

use crate::domain::digest::keccak256;
use crate::domain::errors::SignatureError;

/// Required signature encoding length: r (32) || s (32) || v (1).
pub const SIGNATURE_LENGTH: usize = 65;

/// secp256k1 curve order n
/// n = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
const SECP256K1_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// Half of the secp256k1 curve order (malleability boundary).
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

// =============================================================================
// RECOVERY
// =============================================================================

/// Recover the signer address from a digest and a 65-byte signature.
///
/// Rejections, in order:
/// 1. `InvalidLength` unless the signature is exactly 65 bytes;
/// 2. `InvalidSValue` if S exceeds half the curve order;
/// 3. `InvalidSignature` for any recovery id outside `{0, 1, 27, 28}`,
///    malformed scalars, failed curve recovery, or a zero recovered address.
///
/// Pure: no side effects beyond clearing its own scratch buffer.
pub fn recover(digest: &Hash, signature: &[u8]) -> Result<Address, SignatureError> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(SignatureError::InvalidLength {
            got: signature.len(),
        });
    }

    let mut s = [0u8; 32];
    s.copy_from_slice(&signature[32..64]);
    if is_high_s(&s) {
        return Err(SignatureError::InvalidSValue);
    }

    let recovery_id = normalize_v(signature[64])?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes.copy_from_slice(&signature[..64]);
    let parsed = Signature::from_slice(&sig_bytes);
    sig_bytes.zeroize();
    let sig = parsed.map_err(|_| SignatureError::InvalidSignature)?;

    let recovered = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|_| SignatureError::InvalidSignature)?;

    let address = address_from_pubkey(&recovered);
    if address.is_zero() {
        return Err(SignatureError::InvalidSignature);
    }
    Ok(address)
}

/// Recover every signature in a batch, in parallel.
///
/// Any individual failure aborts the whole call with that signature's
/// specific error.
pub fn recover_all(digest: &Hash, signatures: &[Vec<u8>]) -> Result<Vec<Address>, SignatureError> {
    use rayon::prelude::*;

    signatures
        .par_iter()
        .map(|signature| recover(digest, signature))
        .collect()
}

/// Derive the Ethereum-style address from a public key.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let encoded = public_key.to_encoded_point(false);
    // Skip the 0x04 uncompressed-point prefix.
    let hash = keccak256(&encoded.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Address::new(address)
}

// =============================================================================
// SIGNING (validator-side)
// =============================================================================

/// Sign a digest, producing the one 65-byte encoding `recover` accepts:
/// low-S, recovery id encoded as 27 or 28.
pub fn sign_digest(key: &SigningKey, digest: &Hash) -> Result<[u8; 65], SignatureError> {
    let (sig, recovery_id) = key
        .sign_prehash_recoverable(digest)
        .map_err(|_| SignatureError::InvalidSignature)?;

    let bytes = sig.to_bytes();
    let mut s = [0u8; 32];
    s.copy_from_slice(&bytes[32..]);
    let mut v = recovery_id.to_byte() + 27;

    // Mirror a high-S signature into canonical form; the recovery id parity
    // flips with it.
    if is_high_s(&s) {
        s = invert_s(&s);
        v = if v == 27 { 28 } else { 27 };
    }

    let mut out = [0u8; 65];
    out[..32].copy_from_slice(&bytes[..32]);
    out[32..64].copy_from_slice(&s);
    out[64] = v;
    Ok(out)
}

/// Compute `n - s`, the mirrored S of the same logical signature.
pub fn invert_s(s: &[u8; 32]) -> [u8; 32] {
    let mut result = [0u8; 32];
    let mut borrow: i32 = 0;

    for i in (0..32).rev() {
        let diff = (SECP256K1_ORDER[i] as i32) - (s[i] as i32) - borrow;
        if diff < 0 {
            result[i] = (diff + 256) as u8;
            borrow = 1;
        } else {
            result[i] = diff as u8;
            borrow = 0;
        }
    }

    result
}

// =============================================================================
// HELPERS
// =============================================================================

/// Constant-time check for S strictly above half the curve order.
fn is_high_s(s: &[u8; 32]) -> bool {
    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for i in 0..32 {
        let s_byte = s[i];
        let h_byte = SECP256K1_HALF_ORDER[i];

        let not_decided = !(less | greater);
        let byte_less = Choice::from((s_byte < h_byte) as u8);
        let byte_greater = Choice::from((s_byte > h_byte) as u8);

        less |= not_decided & byte_less;
        greater |= not_decided & byte_greater;
    }

    greater.into()
}

/// Map an encoded recovery byte to a recovery id.
///
/// Accepts the literal values 27/28 and the raw ids 0/1.
fn normalize_v(v: u8) -> Result<RecoveryId, SignatureError> {
    let id = match v {
        0 | 27 => 0u8,
        1 | 28 => 1u8,
        _ => return Err(SignatureError::InvalidSignature),
    };
    RecoveryId::try_from(id).map_err(|_| SignatureError::InvalidSignature)
}
