//! # Custody Errors
//!
//! Error types for the custody subsystem. Every failure is synchronous,
//! carries a specific reason, and leaves state unchanged.

use shared_types::TokenId;
use thiserror::Error;

/// Errors produced by signature parsing and recovery.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The signature byte string is not exactly 65 bytes
    #[error("invalid signature length: expected 65 bytes, got {got}")]
    InvalidLength { got: usize },

    /// The S component exceeds half the curve order (malleable encoding)
    #[error("invalid signature 's' value")]
    InvalidSValue,

    /// Bad recovery id, malformed scalars, or failed curve recovery
    #[error("invalid signature")]
    InvalidSignature,
}

/// Errors produced by custody operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CustodyError {
    // ========================================================================
    // Access
    // ========================================================================
    /// Caller is not the owner
    #[error("caller is not the owner")]
    NotOwner,

    /// Attestation caller is not an active validator
    #[error("caller is not an active validator")]
    CallerNotValidator,

    // ========================================================================
    // Input Validation
    // ========================================================================
    /// A zero address was supplied where a validator is expected
    #[error("validator cannot be the zero address")]
    ZeroValidatorAddress,

    /// The zero token can never be allow-listed
    #[error("token cannot be the zero address")]
    ZeroTokenAddress,

    /// Ownership can never be transferred to the zero address
    #[error("new owner cannot be the zero address")]
    ZeroOwnerAddress,

    /// Batch user and balance lists differ in length
    #[error("users and balances lengths do not match: {users} != {balances}")]
    LengthMismatch { users: usize, balances: usize },

    /// A signature in the batch failed parsing or recovery
    #[error(transparent)]
    Signature(#[from] SignatureError),

    // ========================================================================
    // State Conflicts
    // ========================================================================
    /// The batch id has already been applied
    #[error("batch {0} already recorded")]
    BatchAlreadyRecorded(u64),

    /// Operation rejected because custody is paused
    #[error("custody is paused")]
    Paused,

    /// Unpause requested while custody is not paused
    #[error("custody is not paused")]
    NotPaused,

    // ========================================================================
    // Quorum
    // ========================================================================
    /// The active validator set is below the processing floor
    #[error("not enough active validators: {active} < {required}")]
    NotEnoughValidators { active: usize, required: usize },

    /// Too few distinct valid validator signatures
    #[error("not enough valid signatures: {valid} < {required}")]
    NotEnoughSignatures { valid: usize, required: usize },

    // ========================================================================
    // Funds
    // ========================================================================
    /// The batch would allocate more than the token's locked pool holds
    #[error("not enough locked balance for {token}: required {required}, locked {locked}")]
    InsufficientLocked {
        token: TokenId,
        required: u128,
        locked: u128,
    },

    /// Balance arithmetic would overflow
    #[error("balance arithmetic overflow")]
    BalanceOverflow,

    /// The token collaborator rejected a transfer; reason passed through verbatim
    #[error("{0}")]
    Token(String),

    // ========================================================================
    // Lookups
    // ========================================================================
    /// Withdrawal requested with no available balance
    #[error("no available balance")]
    NoBalance,

    /// Deposit of a token that is not on the allow-list
    #[error("token {0} is not supported")]
    UnsupportedToken(TokenId),
}
