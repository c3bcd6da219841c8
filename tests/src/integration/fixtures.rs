//! Shared test harness.
//!
//! Mirrors the canonical deployment shape: eleven active validators (ten with
//! signing keys held by the tests, one without), two supported tokens with
//! different unit scales, and three depositors who each locked 1,000 units of
//! both tokens before any test runs.

use custody_ledger::domain::digest::batch_digest;
use custody_ledger::domain::ecdsa::{address_from_pubkey, sign_digest};
use custody_ledger::{
    BalanceBatch, CustodyApi, CustodyConfig, CustodyService, InMemoryTokenBank,
};
use k256::ecdsa::SigningKey;
use shared_types::{Address, Hash, TokenId};

pub const CHAIN_ID: u64 = 1337;

/// Smallest-unit scale of the six-decimal test token.
pub const USD_UNIT: u128 = 1_000_000;

/// Smallest-unit scale of the eighteen-decimal test token.
pub const COIN_UNIT: u128 = 1_000_000_000_000_000_000;

/// Amount each depositor locks of each token during setup.
pub const SEED_DEPOSIT_UNITS: u128 = 1_000;

pub fn account(n: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[19] = n;
    Address::new(bytes)
}

pub fn token_id(n: u8) -> TokenId {
    let mut bytes = [0u8; 20];
    bytes[19] = n;
    TokenId::new(bytes)
}

pub struct Harness {
    pub service: CustodyService<InMemoryTokenBank>,
    /// Signing keys for the first ten validators.
    pub keys: Vec<SigningKey>,
    /// All eleven active validators; the last is the keyless owner.
    pub validators: Vec<Address>,
    pub owner: Address,
    pub custody: Address,
    /// Three depositors; the first is also the owner.
    pub users: Vec<Address>,
    pub usd_token: TokenId,
    pub coin_token: TokenId,
}

impl Harness {
    pub fn separator(&self) -> Hash {
        self.service.domain_separator()
    }

    /// Signatures from the first `count` keyed validators over the canonical
    /// digest of the given batch contents.
    pub fn sign(
        &self,
        count: usize,
        token: TokenId,
        users: &[Address],
        balances: &[u128],
        batch_id: u64,
    ) -> Vec<Vec<u8>> {
        let digest = batch_digest(&self.separator(), token, users, balances, batch_id);
        self.keys[..count]
            .iter()
            .map(|key| sign_digest(key, &digest).unwrap().to_vec())
            .collect()
    }

    /// A fully-formed batch signed by the first `count` keyed validators.
    pub fn batch(
        &self,
        count: usize,
        token: TokenId,
        users: &[Address],
        balances: &[u128],
        batch_id: u64,
    ) -> BalanceBatch {
        BalanceBatch {
            token,
            users: users.to_vec(),
            balances: balances.to_vec(),
            batch_id,
            signatures: self.sign(count, token, users, balances, batch_id),
        }
    }

    /// Grant allowance and deposit in one step.
    pub fn approve_and_deposit(&self, user: Address, token: TokenId, amount: u128) {
        self.service.gateway().approve(token, user, self.custody, amount);
        self.service.deposit(user, token, amount).unwrap();
    }
}

pub fn setup() -> Harness {
    setup_with(|_| {})
}

/// Build a harness with a tweaked configuration.
pub fn setup_with(tweak: impl FnOnce(&mut CustodyConfig)) -> Harness {
    let owner = account(1);
    let custody = account(0xCC);
    let users = vec![account(1), account(2), account(3)];
    let usd_token = token_id(0xA1);
    let coin_token = token_id(0xB2);

    let mut config = CustodyConfig::new("BridgeCustody", "tests", CHAIN_ID, custody);
    tweak(&mut config);

    let bank = InMemoryTokenBank::new(custody);
    for user in &users {
        bank.mint(usd_token, *user, 11_000 * USD_UNIT);
        bank.mint(coin_token, *user, 11_000 * COIN_UNIT);
    }

    let service = CustodyService::new(config, owner, bank).unwrap();

    let mut rng = rand::thread_rng();
    let keys: Vec<SigningKey> = (0..10).map(|_| SigningKey::random(&mut rng)).collect();
    let mut validators: Vec<Address> = keys
        .iter()
        .map(|key| address_from_pubkey(key.verifying_key()))
        .collect();
    // Eleventh validator participates in the set but holds no key here.
    validators.push(owner);

    service.add_validators(owner, &validators).unwrap();
    service.set_supported_token(owner, usd_token, true).unwrap();
    service.set_supported_token(owner, coin_token, true).unwrap();

    let harness = Harness {
        service,
        keys,
        validators,
        owner,
        custody,
        users,
        usd_token,
        coin_token,
    };

    for user in harness.users.clone() {
        harness.approve_and_deposit(user, usd_token, SEED_DEPOSIT_UNITS * USD_UNIT);
        harness.approve_and_deposit(user, coin_token, SEED_DEPOSIT_UNITS * COIN_UNIT);
    }

    harness
}
