//! # Outbound Ports (Driven Ports)
//!
//! The token collaborator the ledger depends on. The custody core never
//! touches token internals: it asks the gateway to pull funds on deposit and
//! push them on withdrawal, and it surfaces the gateway's textual failure
//! reasons to callers verbatim.

use shared_types::{Address, TokenId};
use thiserror::Error;

/// Failure from the token collaborator.
///
/// Display output is the exact reason propagated to custody callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The spender's allowance does not cover the transfer
    #[error("insufficient allowance")]
    InsufficientAllowance,

    /// The sender's balance does not cover the transfer
    #[error("transfer amount exceeds balance")]
    InsufficientBalance,

    /// Any other rejection, with the collaborator's own reason
    #[error("{reason}")]
    Rejected { reason: String },
}

/// Gateway to the fungible-token implementation.
///
/// Implementations are assumed to faithfully move value or report failure;
/// the custody core holds no token balances of its own.
pub trait TokenGateway: Send + Sync {
    /// Pull `amount` of `token` from `from` into `to` using the allowance
    /// `from` granted to the custody account.
    fn transfer_from(
        &self,
        token: TokenId,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), TokenError>;

    /// Push `amount` of `token` held by the custody account out to `to`.
    fn transfer(&self, token: TokenId, to: Address, amount: u128) -> Result<(), TokenError>;
}
