//! # Inbound Ports (Driving Ports / API)
//!
//! The public API of the custody subsystem. Implementations must be
//! thread-safe (`Send + Sync`); every mutating operation executes as a single
//! atomic unit against the shared state.

use shared_types::{Address, TokenId};

use crate::domain::entities::{BalanceBatch, BatchReceipt, DepositReceipt, WithdrawReceipt};
use crate::domain::errors::CustodyError;

/// Primary custody API.
pub trait CustodyApi: Send + Sync {
    // =========================================================================
    // Fund Movement
    // =========================================================================

    /// Pull `amount` of `token` from `depositor` into custody and grow the
    /// token's locked pool.
    ///
    /// Requires the token to be allow-listed and custody to be unpaused;
    /// token-collaborator failures propagate with their own reason.
    fn deposit(
        &self,
        depositor: Address,
        token: TokenId,
        amount: u128,
    ) -> Result<DepositReceipt, CustodyError>;

    /// Drain the caller's entire available balance of `token` and pay it out
    /// through the token gateway.
    ///
    /// The balance is zeroed before the external transfer; a failed transfer
    /// restores it and surfaces the gateway's reason.
    fn withdraw(&self, caller: Address, token: TokenId) -> Result<WithdrawReceipt, CustodyError>;

    /// Validate and apply one attestation batch.
    ///
    /// The caller must itself be an active validator; the batch must carry a
    /// quorum of distinct, valid, currently-active validator signatures over
    /// the canonical digest, and its id must never have been applied before.
    fn attest(&self, caller: Address, batch: BalanceBatch) -> Result<BatchReceipt, CustodyError>;

    // =========================================================================
    // Owner Operations
    // =========================================================================

    /// Add validators to the active set. Owner only; zero addresses reject
    /// the whole call; re-adding is a no-op per entry.
    fn add_validators(&self, caller: Address, validators: &[Address])
        -> Result<(), CustodyError>;

    /// Remove validators from the active set. Owner only; absent entries are
    /// no-ops.
    fn remove_validators(
        &self,
        caller: Address,
        validators: &[Address],
    ) -> Result<(), CustodyError>;

    /// Enable or disable a token for deposit. Owner only; the zero token is
    /// rejected.
    fn set_supported_token(
        &self,
        caller: Address,
        token: TokenId,
        enabled: bool,
    ) -> Result<(), CustodyError>;

    /// Halt deposits and withdrawals. Owner only; fails if already paused.
    fn pause(&self, caller: Address) -> Result<(), CustodyError>;

    /// Resume deposits and withdrawals. Owner only; fails if not paused.
    fn unpause(&self, caller: Address) -> Result<(), CustodyError>;

    /// Hand ownership to another address. Owner only; the zero address is
    /// rejected.
    fn transfer_ownership(&self, caller: Address, new_owner: Address)
        -> Result<(), CustodyError>;

    // =========================================================================
    // Queries
    // =========================================================================

    /// Custodied value of `token` not yet allocated to any user.
    fn locked_balance(&self, token: TokenId) -> u128;

    /// Withdrawable value of `token` allocated to `user`.
    fn available_balance(&self, token: TokenId, user: Address) -> u128;

    /// Snapshot of the active validator set.
    fn active_validators(&self) -> Vec<Address>;

    /// Allow-listed tokens in insertion order.
    fn supported_tokens(&self) -> Vec<TokenId>;

    /// Current owner.
    fn owner(&self) -> Address;

    /// Whether custody is paused.
    fn is_paused(&self) -> bool;
}
