//! # Batch Processor
//!
//! The attestation state machine. A batch passes an ordered sequence of
//! gates (pause, shape, caller, replay, validator floor, signature recovery,
//! distinct-signer quorum) and is then applied as one atomic ledger update.
//! An abort at any gate leaves no observable change.

use shared_types::{Address, Hash};
use std::collections::HashSet;

use crate::domain::digest::{batch_digest, DomainSeparator};
use crate::domain::ecdsa::recover_all;
use crate::domain::entities::{BalanceBatch, BatchReceipt, CustodyConfig, QuorumPolicy};
use crate::domain::errors::CustodyError;
use crate::domain::state::CustodyState;

/// Validates and applies attestation batches.
///
/// Holds only immutable policy: the deployment-bound domain separator, the
/// quorum rule, and the validator-set floor. All mutable state is passed in.
#[derive(Clone, Debug)]
pub struct BatchProcessor {
    separator: Hash,
    quorum: QuorumPolicy,
    min_validators: usize,
    pause_gates_attestation: bool,
}

impl BatchProcessor {
    pub fn new(config: &CustodyConfig) -> Self {
        let separator = DomainSeparator::new(
            &config.project_name,
            &config.project_version,
            config.chain_id,
            config.custody_address,
        )
        .separator();

        Self {
            separator,
            quorum: config.quorum,
            min_validators: config.min_validators,
            pause_gates_attestation: config.pause_gates_attestation,
        }
    }

    /// The separator salted into every digest this processor accepts.
    pub fn domain_separator(&self) -> Hash {
        self.separator
    }

    /// Validate and apply one attestation batch.
    ///
    /// Every gate failure is terminal for the call; callers may resubmit
    /// corrected inputs, but a committed batch id is burned forever.
    pub fn process(
        &self,
        state: &mut CustodyState,
        caller: Address,
        batch: &BalanceBatch,
    ) -> Result<BatchReceipt, CustodyError> {
        if self.pause_gates_attestation && state.paused {
            return Err(CustodyError::Paused);
        }

        if batch.users.len() != batch.balances.len() {
            return Err(CustodyError::LengthMismatch {
                users: batch.users.len(),
                balances: batch.balances.len(),
            });
        }

        if !state.validators.contains(&caller) {
            return Err(CustodyError::CallerNotValidator);
        }

        if state.processed.contains(batch.batch_id) {
            return Err(CustodyError::BatchAlreadyRecorded(batch.batch_id));
        }

        let active = state.validators.len();
        if active < self.min_validators {
            return Err(CustodyError::NotEnoughValidators {
                active,
                required: self.min_validators,
            });
        }

        let digest = batch_digest(
            &self.separator,
            batch.token,
            &batch.users,
            &batch.balances,
            batch.batch_id,
        );

        // Any malformed signature aborts here with its specific error.
        let recovered = recover_all(&digest, &batch.signatures)?;

        // Duplicate signers collapse; only active validators count.
        let mut signers: HashSet<Address> = HashSet::with_capacity(recovered.len());
        for signer in recovered {
            if state.validators.contains(&signer) {
                signers.insert(signer);
            }
        }

        let required = self.quorum.required(active);
        if signers.len() < required {
            return Err(CustodyError::NotEnoughSignatures {
                valid: signers.len(),
                required,
            });
        }

        // Atomic application: the ledger validates every credit before
        // writing, and the batch id is only burned once the credits land.
        let entries: Vec<(Address, u128)> = batch
            .users
            .iter()
            .copied()
            .zip(batch.balances.iter().copied())
            .collect();
        state.ledger.credit_batch(batch.token, &entries)?;
        state.processed.mark(batch.batch_id);

        let mut counted: Vec<Address> = signers.into_iter().collect();
        counted.sort();

        Ok(BatchReceipt {
            token: batch.token,
            batch_id: batch.batch_id,
            users: batch.users.clone(),
            balances: batch.balances.clone(),
            signers: counted,
        })
    }
}
