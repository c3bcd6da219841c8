//! # Adapters Layer

mod mock_token;

pub use mock_token::InMemoryTokenBank;
