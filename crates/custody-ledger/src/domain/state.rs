//! # Custody State
//!
//! The single mutable aggregate every operation runs against. The service
//! layer holds exactly one of these behind a lock; domain logic receives it
//! by reference and never stores it.

use serde::{Deserialize, Serialize};
use shared_types::Address;
use std::collections::HashSet;

use crate::domain::ledger::CustodyLedger;
use crate::domain::registry::{TokenAllowList, ValidatorRegistry};

/// Append-only record of applied batch ids.
///
/// Created empty at initialization; never shrinks. Membership is global, not
/// per token: a batch id applied once can never be applied again for any
/// token.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedBatches {
    seen: HashSet<u64>,
}

impl ProcessedBatches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, batch_id: u64) -> bool {
        self.seen.contains(&batch_id)
    }

    /// Mark a batch id as applied. Irreversible.
    pub fn mark(&mut self, batch_id: u64) {
        self.seen.insert(batch_id);
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// The full custody state: ownership, pause switch, registries, balances,
/// and replay protection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodyState {
    pub owner: Address,
    pub paused: bool,
    pub validators: ValidatorRegistry,
    pub tokens: TokenAllowList,
    pub ledger: CustodyLedger,
    pub processed: ProcessedBatches,
}

impl CustodyState {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            paused: false,
            validators: ValidatorRegistry::new(),
            tokens: TokenAllowList::new(),
            ledger: CustodyLedger::new(),
            processed: ProcessedBatches::new(),
        }
    }
}
