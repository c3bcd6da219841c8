//! # Custody Ledger Subsystem
//!
//! A validator-attested custody ledger for a token bridge. Users deposit
//! fungible tokens into per-token locked pools; an off-chain set of
//! validators signs attestation batches that allocate locked value to
//! individual users; users withdraw their allocated balance on demand.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): pure protocol logic: signature recovery,
//!   digest construction, registries, the conserved ledger, and the batch
//!   state machine. No I/O.
//! - **Ports Layer** (`ports/`): trait definitions for the subsystem API
//!   (inbound) and the token collaborator (outbound).
//! - **Adapters Layer** (`adapters/`): in-memory token gateway for tests and
//!   simulations.
//! - **Service Layer** (`service.rs`): wires domain logic to ports behind a
//!   single mutual-exclusion lock.
//!
//! ## Security Notes
//!
//! - **Malleability Prevention**: signatures with an S value above half the
//!   curve order are rejected, so each logical signature has exactly one
//!   accepted encoding.
//! - **Replay Protection**: every applied batch id is recorded globally and
//!   can never be applied again.
//! - **Conservation**: for each token, locked pool plus the sum of user
//!   balances changes only through deposits and withdrawals; attestation
//!   batches merely reallocate, atomically.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use crate::adapters::InMemoryTokenBank;
pub use crate::domain::batch::BatchProcessor;
pub use crate::domain::digest::{batch_digest, keccak256, DomainSeparator};
pub use crate::domain::ecdsa::{address_from_pubkey, recover, sign_digest};
pub use crate::domain::entities::{
    BalanceBatch, BatchReceipt, CustodyConfig, DepositReceipt, QuorumPolicy, WithdrawReceipt,
};
pub use crate::domain::errors::{CustodyError, SignatureError};
pub use crate::domain::state::CustodyState;
pub use crate::ports::inbound::CustodyApi;
pub use crate::ports::outbound::{TokenError, TokenGateway};
pub use crate::service::CustodyService;
