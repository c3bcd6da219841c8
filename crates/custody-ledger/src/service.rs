//! # Custody Service
//!
//! Wires the domain logic to the ports. All mutable state lives in one
//! [`CustodyState`] behind a single lock, so every operation executes to
//! completion as an atomic unit and no two operations ever interleave.

use parking_lot::RwLock;
use shared_types::{Address, Hash, TokenId};

use crate::domain::batch::BatchProcessor;
use crate::domain::entities::{
    BalanceBatch, BatchReceipt, CustodyConfig, DepositReceipt, WithdrawReceipt,
};
use crate::domain::errors::CustodyError;
use crate::domain::state::CustodyState;
use crate::ports::inbound::CustodyApi;
use crate::ports::outbound::TokenGateway;

/// The custody subsystem behind its inbound port.
pub struct CustodyService<G: TokenGateway> {
    config: CustodyConfig,
    processor: BatchProcessor,
    state: RwLock<CustodyState>,
    gateway: G,
}

impl<G: TokenGateway> CustodyService<G> {
    /// Create a service with an empty ledger owned by `owner`.
    pub fn new(config: CustodyConfig, owner: Address, gateway: G) -> Result<Self, CustodyError> {
        if owner.is_zero() {
            return Err(CustodyError::ZeroOwnerAddress);
        }
        let processor = BatchProcessor::new(&config);
        Ok(Self {
            config,
            processor,
            state: RwLock::new(CustodyState::new(owner)),
            gateway,
        })
    }

    /// The deployment-bound separator salted into every batch digest.
    ///
    /// Signer tooling reads this instead of re-deriving it.
    pub fn domain_separator(&self) -> Hash {
        self.processor.domain_separator()
    }

    /// The token gateway this service moves value through.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    fn ensure_owner(state: &CustodyState, caller: Address) -> Result<(), CustodyError> {
        if state.owner != caller {
            return Err(CustodyError::NotOwner);
        }
        Ok(())
    }
}

impl<G: TokenGateway> CustodyApi for CustodyService<G> {
    // =========================================================================
    // Fund Movement
    // =========================================================================

    fn deposit(
        &self,
        depositor: Address,
        token: TokenId,
        amount: u128,
    ) -> Result<DepositReceipt, CustodyError> {
        let mut state = self.state.write();

        if !state.tokens.contains(&token) {
            return Err(CustodyError::UnsupportedToken(token));
        }
        if state.paused {
            return Err(CustodyError::Paused);
        }

        // Reject unrecordable deposits before any value moves.
        state.ledger.ensure_can_lock(&token, amount)?;

        self.gateway
            .transfer_from(token, depositor, self.config.custody_address, amount)
            .map_err(|e| CustodyError::Token(e.to_string()))?;

        let locked = state.ledger.lock(token, amount)?;

        tracing::info!(
            depositor = %depositor,
            token = %token,
            amount,
            locked,
            "deposit recorded"
        );
        Ok(DepositReceipt {
            depositor,
            token,
            amount,
        })
    }

    fn withdraw(&self, caller: Address, token: TokenId) -> Result<WithdrawReceipt, CustodyError> {
        let mut state = self.state.write();

        if state.paused {
            return Err(CustodyError::Paused);
        }

        // Zero first, then pay out; a re-entering caller finds no balance.
        let amount = state.ledger.take_available(&token, &caller)?;

        if let Err(e) = self.gateway.transfer(token, caller, amount) {
            state.ledger.restore_available(token, caller, amount);
            return Err(CustodyError::Token(e.to_string()));
        }

        tracing::info!(user = %caller, token = %token, amount, "withdrawal paid out");
        Ok(WithdrawReceipt {
            user: caller,
            token,
            amount,
        })
    }

    fn attest(&self, caller: Address, batch: BalanceBatch) -> Result<BatchReceipt, CustodyError> {
        let mut state = self.state.write();

        let receipt = self.processor.process(&mut state, caller, &batch)?;

        tracing::info!(
            token = %receipt.token,
            batch_id = receipt.batch_id,
            users = receipt.users.len(),
            signers = receipt.signers.len(),
            "attestation batch applied"
        );
        Ok(receipt)
    }

    // =========================================================================
    // Owner Operations
    // =========================================================================

    fn add_validators(
        &self,
        caller: Address,
        validators: &[Address],
    ) -> Result<(), CustodyError> {
        let mut state = self.state.write();
        Self::ensure_owner(&state, caller)?;

        let added = state.validators.add_many(validators)?;
        tracing::info!(added, active = state.validators.len(), "validator set changed");
        Ok(())
    }

    fn remove_validators(
        &self,
        caller: Address,
        validators: &[Address],
    ) -> Result<(), CustodyError> {
        let mut state = self.state.write();
        Self::ensure_owner(&state, caller)?;

        let removed = state.validators.remove_many(validators);
        tracing::info!(removed, active = state.validators.len(), "validator set changed");
        Ok(())
    }

    fn set_supported_token(
        &self,
        caller: Address,
        token: TokenId,
        enabled: bool,
    ) -> Result<(), CustodyError> {
        let mut state = self.state.write();
        Self::ensure_owner(&state, caller)?;

        let changed = state.tokens.set_supported(token, enabled)?;
        if changed {
            tracing::info!(token = %token, enabled, "token allow-list changed");
        }
        Ok(())
    }

    fn pause(&self, caller: Address) -> Result<(), CustodyError> {
        let mut state = self.state.write();
        Self::ensure_owner(&state, caller)?;

        if state.paused {
            return Err(CustodyError::Paused);
        }
        state.paused = true;
        tracing::info!("custody paused");
        Ok(())
    }

    fn unpause(&self, caller: Address) -> Result<(), CustodyError> {
        let mut state = self.state.write();
        Self::ensure_owner(&state, caller)?;

        if !state.paused {
            return Err(CustodyError::NotPaused);
        }
        state.paused = false;
        tracing::info!("custody unpaused");
        Ok(())
    }

    fn transfer_ownership(
        &self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), CustodyError> {
        let mut state = self.state.write();
        Self::ensure_owner(&state, caller)?;

        if new_owner.is_zero() {
            return Err(CustodyError::ZeroOwnerAddress);
        }
        state.owner = new_owner;
        tracing::info!(owner = %new_owner, "ownership transferred");
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    fn locked_balance(&self, token: TokenId) -> u128 {
        self.state.read().ledger.locked_balance(&token)
    }

    fn available_balance(&self, token: TokenId, user: Address) -> u128 {
        self.state.read().ledger.available_balance(&token, &user)
    }

    fn active_validators(&self) -> Vec<Address> {
        self.state.read().validators.snapshot()
    }

    fn supported_tokens(&self) -> Vec<TokenId> {
        self.state.read().tokens.tokens().to_vec()
    }

    fn owner(&self) -> Address {
        self.state.read().owner
    }

    fn is_paused(&self) -> bool {
        self.state.read().paused
    }
}
