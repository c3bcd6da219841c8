//! # Shared Types Crate
//!
//! Identity primitives for the bridge custody workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every crate that names an account or a token
//!   uses the types defined here.
//! - **Opaque Identity**: `Address` and `TokenId` are distinct newtypes over
//!   the same 20-byte representation, so a token can never be used where an
//!   account is expected (or vice versa) without an explicit conversion.

pub mod entities;

pub use entities::{Address, Hash, IdentityParseError, TokenId};
