//! In-memory token gateway for tests and simulations.
//!
//! Implements ERC20-style balances and allowances for any number of tokens,
//! with the same failure order and reasons a real token reports: allowance
//! is spent before balance is checked.

use parking_lot::RwLock;
use shared_types::{Address, TokenId};
use std::collections::HashMap;

use crate::ports::outbound::{TokenError, TokenGateway};

#[derive(Default)]
struct TokenBankState {
    balances: HashMap<(TokenId, Address), u128>,
    allowances: HashMap<(TokenId, Address, Address), u128>,
}

/// In-memory implementation of [`TokenGateway`].
///
/// `transfer` spends the custody account's holdings, mirroring a token call
/// issued by the custody contract itself.
pub struct InMemoryTokenBank {
    custody_account: Address,
    inner: RwLock<TokenBankState>,
}

impl InMemoryTokenBank {
    pub fn new(custody_account: Address) -> Self {
        Self {
            custody_account,
            inner: RwLock::new(TokenBankState::default()),
        }
    }

    /// Credit an account out of thin air.
    pub fn mint(&self, token: TokenId, account: Address, amount: u128) {
        let mut state = self.inner.write();
        let balance = state.balances.entry((token, account)).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    /// Grant `spender` the right to pull up to `amount` from `owner`.
    pub fn approve(&self, token: TokenId, owner: Address, spender: Address, amount: u128) {
        let mut state = self.inner.write();
        state.allowances.insert((token, owner, spender), amount);
    }

    pub fn balance_of(&self, token: TokenId, account: Address) -> u128 {
        let state = self.inner.read();
        state.balances.get(&(token, account)).copied().unwrap_or(0)
    }

    pub fn allowance(&self, token: TokenId, owner: Address, spender: Address) -> u128 {
        let state = self.inner.read();
        state
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or(0)
    }
}

impl TokenGateway for InMemoryTokenBank {
    fn transfer_from(
        &self,
        token: TokenId,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), TokenError> {
        let mut state = self.inner.write();

        let allowance = state
            .allowances
            .get(&(token, from, to))
            .copied()
            .unwrap_or(0);
        if allowance < amount {
            return Err(TokenError::InsufficientAllowance);
        }

        let from_balance = state.balances.get(&(token, from)).copied().unwrap_or(0);
        if from_balance < amount {
            return Err(TokenError::InsufficientBalance);
        }

        state
            .allowances
            .insert((token, from, to), allowance - amount);
        state.balances.insert((token, from), from_balance - amount);
        let to_balance = state.balances.entry((token, to)).or_insert(0);
        *to_balance = to_balance.saturating_add(amount);
        Ok(())
    }

    fn transfer(&self, token: TokenId, to: Address, amount: u128) -> Result<(), TokenError> {
        let mut state = self.inner.write();
        let custody = self.custody_account;

        let custody_balance = state.balances.get(&(token, custody)).copied().unwrap_or(0);
        if custody_balance < amount {
            return Err(TokenError::InsufficientBalance);
        }

        state
            .balances
            .insert((token, custody), custody_balance - amount);
        let to_balance = state.balances.entry((token, to)).or_insert(0);
        *to_balance = to_balance.saturating_add(amount);
        Ok(())
    }
}
