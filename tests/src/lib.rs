//! # Bridge Custody Test Suite
//!
//! Unified test crate for cross-component scenarios.
//!
//! ## Structure
//!
//! ```text
//! tests/src/integration/
//! ├── fixtures.rs       # Shared harness: service, keyed validators, funded users
//! ├── deposits.rs       # Allow-list management and deposit flows
//! ├── validators.rs     # Validator-set management and the processing floor
//! ├── batches.rs        # Attestation gates: signatures, quorum, replay
//! ├── withdrawals.rs    # Withdrawal flows and payout failure recovery
//! ├── pause.rs          # Pause state machine and gating
//! ├── ownership.rs      # Ownership transfer rules
//! └── conservation.rs   # Locked/available conservation across mixed sequences
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p custody-tests
//! ```

#![allow(dead_code)]

pub mod integration;
