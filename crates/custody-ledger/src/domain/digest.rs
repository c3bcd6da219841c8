//! # Canonical Digest Construction
//!
//! Builds the domain-separated message every validator signs. The byte
//! layout is ABI-style packed encoding and must be reproduced bit-exactly by
//! signer tooling:
//!
//! ```text
//! message = keccak256(
//!     separator            (32 bytes)
//!     token                (20 bytes)
//!     users[i]             (each left-padded to 32 bytes)
//!     balances[i]          (each uint256 big-endian, u128 left-padded)
//!     batch_id             (uint256 big-endian, u64 left-padded)
//! )
//! digest = keccak256("\x19Ethereum Signed Message:\n32" || message)
//! ```
//!
//! The separator binds every signed message to one deployment (project name,
//! project version, chain id, custody account), so a signature produced for
//! one deployment can never be replayed against another.

use sha3::{Digest, Keccak256};
use shared_types::{Address, Hash, TokenId};

/// Type string hashed into the first slot of the domain separator.
const DOMAIN_TYPE: &[u8] =
    b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// Personal-message prefix for a 32-byte payload.
const SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Compute the Keccak-256 hash of arbitrary data.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

// =============================================================================
// DOMAIN SEPARATOR
// =============================================================================

/// Deployment-bound salt for every signed message.
///
/// Computed once at construction as
/// `keccak256(typeHash || keccak256(name) || keccak256(version) ||
/// uint256(chain_id) || address-left-padded)`; a pure function of its
/// immutable inputs with no error conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DomainSeparator {
    separator: Hash,
}

impl DomainSeparator {
    pub fn new(name: &str, version: &str, chain_id: u64, verifying_contract: Address) -> Self {
        // Five 32-byte slots, ABI encode layout.
        let mut data = [0u8; 160];
        data[0..32].copy_from_slice(&keccak256(DOMAIN_TYPE));
        data[32..64].copy_from_slice(&keccak256(name.as_bytes()));
        data[64..96].copy_from_slice(&keccak256(version.as_bytes()));

        // uint256 chain id - left-padded, big-endian
        data[96 + 24..128].copy_from_slice(&chain_id.to_be_bytes());

        // address - left-padded to 32 bytes
        data[128 + 12..160].copy_from_slice(verifying_contract.as_bytes());

        Self {
            separator: keccak256(&data),
        }
    }

    pub fn separator(&self) -> Hash {
        self.separator
    }
}

// =============================================================================
// BATCH MESSAGE
// =============================================================================

/// Packed batch message hash, before the personal-message prefix.
pub fn batch_message(
    separator: &Hash,
    token: TokenId,
    users: &[Address],
    balances: &[u128],
    batch_id: u64,
) -> Hash {
    let mut data = Vec::with_capacity(84 + 32 * (users.len() + balances.len()));
    data.extend_from_slice(separator);
    data.extend_from_slice(token.as_bytes());

    // Array elements are padded to 32-byte slots in packed encoding.
    for user in users {
        let mut slot = [0u8; 32];
        slot[12..].copy_from_slice(user.as_bytes());
        data.extend_from_slice(&slot);
    }
    for balance in balances {
        let mut slot = [0u8; 32];
        slot[16..].copy_from_slice(&balance.to_be_bytes());
        data.extend_from_slice(&slot);
    }

    let mut slot = [0u8; 32];
    slot[24..].copy_from_slice(&batch_id.to_be_bytes());
    data.extend_from_slice(&slot);

    keccak256(&data)
}

/// Wrap a 32-byte message hash with the personal-message prefix.
pub fn signed_message_hash(message: &Hash) -> Hash {
    let mut data = [0u8; 60];
    data[..28].copy_from_slice(SIGNED_MESSAGE_PREFIX);
    data[28..].copy_from_slice(message);
    keccak256(&data)
}

/// The digest validators actually sign for one batch.
pub fn batch_digest(
    separator: &Hash,
    token: TokenId,
    users: &[Address],
    balances: &[u128],
    batch_id: u64,
) -> Hash {
    signed_message_hash(&batch_message(separator, token, users, balances, batch_id))
}
