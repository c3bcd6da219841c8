//! # Custody Ledger
//!
//! The conserved locked/available accounting. For every token:
//!
//! ```text
//! locked[token] + Σ_user available[token, user]
//! ```
//!
//! changes only through deposits (locked grows) and withdrawals (available
//! shrinks, paid out through the token gateway). Attestation batches move
//! value from locked to available without changing the sum, and they do so
//! atomically: every credit is validated before anything is written, so a
//! failing batch leaves no trace.

use serde::{Deserialize, Serialize};
use shared_types::{Address, TokenId};
use std::collections::HashMap;

use crate::domain::errors::CustodyError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodyLedger {
    locked: HashMap<TokenId, u128>,
    available: HashMap<TokenId, HashMap<Address, u128>>,
}

impl CustodyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Custodied value of a token not yet allocated to any user.
    pub fn locked_balance(&self, token: &TokenId) -> u128 {
        self.locked.get(token).copied().unwrap_or(0)
    }

    /// Withdrawable value allocated to one user.
    pub fn available_balance(&self, token: &TokenId, user: &Address) -> u128 {
        self.available
            .get(token)
            .and_then(|balances| balances.get(user))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of all allocated balances for a token.
    pub fn total_available(&self, token: &TokenId) -> u128 {
        self.available
            .get(token)
            .map(|balances| balances.values().fold(0u128, |acc, b| acc.saturating_add(*b)))
            .unwrap_or(0)
    }

    // =========================================================================
    // Deposits
    // =========================================================================

    /// Check that the locked pool can absorb `amount` without overflow.
    ///
    /// Run before the external token pull so a deposit that cannot be
    /// recorded is rejected before any value moves.
    pub fn ensure_can_lock(&self, token: &TokenId, amount: u128) -> Result<(), CustodyError> {
        self.locked_balance(token)
            .checked_add(amount)
            .ok_or(CustodyError::BalanceOverflow)?;
        Ok(())
    }

    /// Grow the locked pool after a successful token pull.
    ///
    /// Returns the new locked balance.
    pub fn lock(&mut self, token: TokenId, amount: u128) -> Result<u128, CustodyError> {
        let updated = self
            .locked_balance(&token)
            .checked_add(amount)
            .ok_or(CustodyError::BalanceOverflow)?;
        self.locked.insert(token, updated);
        Ok(updated)
    }

    // =========================================================================
    // Batch Credits
    // =========================================================================

    /// Move value from the locked pool into the named users' available
    /// balances, all-or-nothing.
    ///
    /// The whole batch is validated first: the aggregate must fit in the
    /// locked pool (`InsufficientLocked` otherwise) and no per-user balance
    /// may overflow. Only then is anything written, so a failed call cannot
    /// leave partial credits behind. Duplicate users within one batch
    /// accumulate.
    pub fn credit_batch(
        &mut self,
        token: TokenId,
        entries: &[(Address, u128)],
    ) -> Result<(), CustodyError> {
        let locked = self.locked_balance(&token);

        let mut total: u128 = 0;
        let mut planned: HashMap<Address, u128> = HashMap::with_capacity(entries.len());
        for (user, delta) in entries {
            total = total
                .checked_add(*delta)
                .ok_or(CustodyError::BalanceOverflow)?;
            let base = planned
                .get(user)
                .copied()
                .unwrap_or_else(|| self.available_balance(&token, user));
            let updated = base
                .checked_add(*delta)
                .ok_or(CustodyError::BalanceOverflow)?;
            planned.insert(*user, updated);
        }

        if total > locked {
            return Err(CustodyError::InsufficientLocked {
                token,
                required: total,
                locked,
            });
        }

        self.locked.insert(token, locked - total);
        let balances = self.available.entry(token).or_default();
        for (user, updated) in planned {
            balances.insert(user, updated);
        }
        Ok(())
    }

    // =========================================================================
    // Withdrawals
    // =========================================================================

    /// Zero a user's available balance and return the drained amount.
    ///
    /// Zeroing happens before the external payout; if the payout fails the
    /// caller restores the balance with [`CustodyLedger::restore_available`].
    pub fn take_available(&mut self, token: &TokenId, user: &Address) -> Result<u128, CustodyError> {
        let amount = self.available_balance(token, user);
        if amount == 0 {
            return Err(CustodyError::NoBalance);
        }
        if let Some(balances) = self.available.get_mut(token) {
            balances.remove(user);
        }
        Ok(amount)
    }

    /// Undo a [`CustodyLedger::take_available`] after a failed payout.
    pub fn restore_available(&mut self, token: TokenId, user: Address, amount: u128) {
        self.available.entry(token).or_default().insert(user, amount);
    }
}
