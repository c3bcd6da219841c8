//! # Domain Entities
//!
//! Configuration, batch, and receipt types for the custody subsystem.

use serde::{Deserialize, Serialize};
use shared_types::{Address, TokenId};

/// Default floor on the active validator set before any batch is processed.
pub const DEFAULT_MIN_VALIDATORS: usize = 2;

// =============================================================================
// QUORUM POLICY
// =============================================================================

/// How many distinct valid validator signatures a batch needs, as a function
/// of the current validator-set size.
///
/// Injected through [`CustodyConfig`] so the policy is swappable and testable
/// in isolation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuorumPolicy {
    /// Two thirds of the set, rounded up.
    TwoThirds,
    /// Strict majority.
    Majority,
    /// A fixed signature count regardless of set size.
    Fixed(usize),
}

impl QuorumPolicy {
    /// Required distinct signer count for a validator set of `set_size`.
    pub fn required(&self, set_size: usize) -> usize {
        match self {
            QuorumPolicy::TwoThirds => set_size.saturating_mul(2).div_ceil(3),
            QuorumPolicy::Majority => set_size / 2 + 1,
            QuorumPolicy::Fixed(count) => *count,
        }
    }
}

impl Default for QuorumPolicy {
    fn default() -> Self {
        QuorumPolicy::TwoThirds
    }
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Custody configuration, fixed at service construction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CustodyConfig {
    /// Project name bound into the domain separator
    pub project_name: String,
    /// Project version bound into the domain separator
    pub project_version: String,
    /// Chain id bound into the domain separator
    pub chain_id: u64,
    /// The custody account: holds deposited tokens and salts the separator
    /// as the verifying contract
    pub custody_address: Address,
    /// Floor on the active validator set for batch processing
    pub min_validators: usize,
    /// Signature-count threshold policy
    pub quorum: QuorumPolicy,
    /// Whether the pause switch also blocks attestation batches
    /// (deposit and withdraw are always blocked while paused)
    pub pause_gates_attestation: bool,
}

impl CustodyConfig {
    pub fn new(
        project_name: impl Into<String>,
        project_version: impl Into<String>,
        chain_id: u64,
        custody_address: Address,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            project_version: project_version.into(),
            chain_id,
            custody_address,
            min_validators: DEFAULT_MIN_VALIDATORS,
            quorum: QuorumPolicy::default(),
            pause_gates_attestation: false,
        }
    }
}

// =============================================================================
// BATCH
// =============================================================================

/// One attested set of balance allocations for a single token.
///
/// `users[i]` is credited `balances[i]`; `batch_id` is the caller-chosen,
/// globally unique replay key; `signatures` are independently produced
/// 65-byte encodings over the canonical batch digest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceBatch {
    pub token: TokenId,
    pub users: Vec<Address>,
    pub balances: Vec<u128>,
    pub batch_id: u64,
    pub signatures: Vec<Vec<u8>>,
}

// =============================================================================
// RECEIPTS
// =============================================================================

/// Record of one applied deposit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositReceipt {
    pub depositor: Address,
    pub token: TokenId,
    pub amount: u128,
}

/// Record of one applied attestation batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReceipt {
    pub token: TokenId,
    pub batch_id: u64,
    pub users: Vec<Address>,
    pub balances: Vec<u128>,
    /// Distinct active validators whose signatures counted toward quorum
    pub signers: Vec<Address>,
}

/// Record of one completed withdrawal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawReceipt {
    pub user: Address,
    pub token: TokenId,
    pub amount: u128,
}
