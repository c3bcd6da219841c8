//! Withdrawal flows: full-balance payout, zero-then-transfer ordering, and
//! payout failure recovery.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{
        account, setup, token_id, COIN_UNIT, USD_UNIT,
    };
    use custody_ledger::{
        CustodyApi, CustodyConfig, CustodyError, CustodyService, InMemoryTokenBank, TokenError,
        TokenGateway, WithdrawReceipt,
    };
    use shared_types::{Address, TokenId};
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Credits `amount` of `token` to two users through a full-quorum batch.
    fn credit_two_users(
        h: &crate::integration::fixtures::Harness,
        token: TokenId,
        amount: u128,
        batch_id: u64,
    ) {
        let users = [h.users[1], h.users[2]];
        let batch = h.batch(8, token, &users, &[amount, amount], batch_id);
        h.service.attest(h.owner, batch).unwrap();
    }

    #[test]
    fn test_withdraw_pays_out_and_zeroes_balance() {
        let h = setup();
        let amount = 500 * USD_UNIT;
        let initial_locked = h.service.locked_balance(h.usd_token);
        credit_two_users(&h, h.usd_token, amount, 100_123);

        assert_eq!(
            initial_locked,
            h.service.locked_balance(h.usd_token) + 2 * amount
        );

        let balance1_before = h.service.gateway().balance_of(h.usd_token, h.users[1]);
        let receipt = h.service.withdraw(h.users[1], h.usd_token).unwrap();

        assert_eq!(
            receipt,
            WithdrawReceipt {
                user: h.users[1],
                token: h.usd_token,
                amount,
            }
        );
        assert_eq!(
            h.service.gateway().balance_of(h.usd_token, h.users[1]),
            balance1_before + amount
        );
        assert_eq!(h.service.available_balance(h.usd_token, h.users[1]), 0);

        // The other user's allocation is untouched.
        assert_eq!(h.service.available_balance(h.usd_token, h.users[2]), amount);
    }

    #[test]
    fn test_withdraw_works_per_token() {
        let h = setup();
        credit_two_users(&h, h.usd_token, 500 * USD_UNIT, 100_123);
        credit_two_users(&h, h.coin_token, 500 * COIN_UNIT, 100_124);

        h.service.withdraw(h.users[1], h.usd_token).unwrap();

        // The same user's coin allocation is a separate pot.
        assert_eq!(
            h.service.available_balance(h.coin_token, h.users[1]),
            500 * COIN_UNIT
        );
        h.service.withdraw(h.users[1], h.coin_token).unwrap();
        assert_eq!(h.service.available_balance(h.coin_token, h.users[1]), 0);
    }

    #[test]
    fn test_second_withdraw_finds_nothing() {
        let h = setup();
        credit_two_users(&h, h.usd_token, 500 * USD_UNIT, 100_123);

        h.service.withdraw(h.users[1], h.usd_token).unwrap();
        let err = h.service.withdraw(h.users[1], h.usd_token).unwrap_err();
        assert_eq!(err, CustodyError::NoBalance);
    }

    #[test]
    fn test_withdraw_unknown_token_finds_nothing() {
        let h = setup();
        let err = h.service.withdraw(h.users[1], token_id(0x55)).unwrap_err();
        assert_eq!(err, CustodyError::NoBalance);
    }

    #[test]
    fn test_withdraw_with_no_allocation_finds_nothing() {
        let h = setup();
        let err = h.service.withdraw(account(0x44), h.usd_token).unwrap_err();
        assert_eq!(err, CustodyError::NoBalance);
    }

    // =========================================================================
    // Payout failure recovery
    // =========================================================================

    /// Gateway whose outbound transfers can be switched off.
    struct FlakyGateway {
        bank: InMemoryTokenBank,
        payouts_offline: AtomicBool,
    }

    impl TokenGateway for FlakyGateway {
        fn transfer_from(
            &self,
            token: TokenId,
            from: Address,
            to: Address,
            amount: u128,
        ) -> Result<(), TokenError> {
            self.bank.transfer_from(token, from, to, amount)
        }

        fn transfer(&self, token: TokenId, to: Address, amount: u128) -> Result<(), TokenError> {
            if self.payouts_offline.load(Ordering::SeqCst) {
                return Err(TokenError::Rejected {
                    reason: "token contract unavailable".into(),
                });
            }
            self.bank.transfer(token, to, amount)
        }
    }

    #[test]
    fn test_failed_payout_restores_balance() {
        let owner = account(1);
        let custody = account(0xCC);
        let user = account(2);
        let token = token_id(0xA1);
        let amount = 500 * USD_UNIT;

        let gateway = FlakyGateway {
            bank: InMemoryTokenBank::new(custody),
            payouts_offline: AtomicBool::new(false),
        };
        gateway.bank.mint(token, user, 1_000 * USD_UNIT);
        gateway.bank.approve(token, user, custody, 1_000 * USD_UNIT);

        let mut config = CustodyConfig::new("BridgeCustody", "tests", 1337, custody);
        config.min_validators = 1;
        let service = CustodyService::new(config, owner, gateway).unwrap();

        let keys: Vec<k256::ecdsa::SigningKey> = (0..2)
            .map(|_| k256::ecdsa::SigningKey::random(&mut rand::thread_rng()))
            .collect();
        let mut validators: Vec<Address> = keys
            .iter()
            .map(|k| custody_ledger::address_from_pubkey(k.verifying_key()))
            .collect();
        validators.push(owner);
        service.add_validators(owner, &validators).unwrap();
        service.set_supported_token(owner, token, true).unwrap();
        service.deposit(user, token, 1_000 * USD_UNIT).unwrap();

        let users = vec![user];
        let balances = vec![amount];
        let digest = custody_ledger::batch_digest(
            &service.domain_separator(),
            token,
            &users,
            &balances,
            1,
        );
        let signatures = keys
            .iter()
            .map(|k| custody_ledger::sign_digest(k, &digest).unwrap().to_vec())
            .collect();
        service
            .attest(
                owner,
                custody_ledger::BalanceBatch {
                    token,
                    users,
                    balances,
                    batch_id: 1,
                    signatures,
                },
            )
            .unwrap();

        // Payout path down: the withdrawal fails and the allocation survives.
        service.gateway().payouts_offline.store(true, Ordering::SeqCst);
        let err = service.withdraw(user, token).unwrap_err();
        assert_eq!(
            err,
            CustodyError::Token("token contract unavailable".into())
        );
        assert_eq!(service.available_balance(token, user), amount);

        // Payout path back up: the same withdrawal succeeds.
        service
            .gateway()
            .payouts_offline
            .store(false, Ordering::SeqCst);
        service.withdraw(user, token).unwrap();
        assert_eq!(service.available_balance(token, user), 0);
        assert_eq!(service.gateway().bank.balance_of(token, user), amount);
    }
}
