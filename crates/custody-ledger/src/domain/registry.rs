//! # Validator and Token Registries
//!
//! Owner-managed membership sets. Mutation is idempotent per entry; zero
//! addresses are rejected before anything is touched, so a call either
//! applies to every entry or to none.

use serde::{Deserialize, Serialize};
use shared_types::{Address, TokenId};
use std::collections::HashSet;

use crate::domain::errors::CustodyError;

// =============================================================================
// VALIDATOR REGISTRY
// =============================================================================

/// The set of currently-active validator addresses.
///
/// Membership, not order, is meaningful; snapshots are returned sorted only
/// so output is reproducible.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorRegistry {
    active: HashSet<Address>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add validators; re-adding an active validator is a no-op for that
    /// entry. Any zero address fails the whole call before any mutation.
    ///
    /// Returns how many entries were actually inserted.
    pub fn add_many(&mut self, validators: &[Address]) -> Result<usize, CustodyError> {
        if validators.iter().any(Address::is_zero) {
            return Err(CustodyError::ZeroValidatorAddress);
        }
        let mut added = 0;
        for validator in validators {
            if self.active.insert(*validator) {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Remove validators; removing an absent address is a no-op for that
    /// entry. Returns how many entries were actually removed.
    pub fn remove_many(&mut self, validators: &[Address]) -> usize {
        let mut removed = 0;
        for validator in validators {
            if self.active.remove(validator) {
                removed += 1;
            }
        }
        removed
    }

    pub fn contains(&self, validator: &Address) -> bool {
        self.active.contains(validator)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Read-only snapshot of the active set.
    pub fn snapshot(&self) -> Vec<Address> {
        let mut validators: Vec<Address> = self.active.iter().copied().collect();
        validators.sort();
        validators
    }
}

// =============================================================================
// TOKEN ALLOW-LIST
// =============================================================================

/// Tokens eligible for deposit, enumerated in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAllowList {
    order: Vec<TokenId>,
    members: HashSet<TokenId>,
}

impl TokenAllowList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable a token. Enabling an already-supported token or
    /// disabling an unsupported one is a no-op. The zero token is never a
    /// member.
    ///
    /// Returns whether the set actually changed.
    pub fn set_supported(&mut self, token: TokenId, enabled: bool) -> Result<bool, CustodyError> {
        if token.is_zero() {
            return Err(CustodyError::ZeroTokenAddress);
        }
        if enabled {
            if self.members.insert(token) {
                self.order.push(token);
                Ok(true)
            } else {
                Ok(false)
            }
        } else if self.members.remove(&token) {
            self.order.retain(|t| t != &token);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn contains(&self, token: &TokenId) -> bool {
        self.members.contains(token)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Supported tokens in insertion order.
    pub fn tokens(&self) -> &[TokenId] {
        &self.order
    }
}
